//! Single-section impedance matching.
//!
//! Two solvers are provided. [`design_single_stub_match`] evaluates the
//! classic closed-form length and impedance expressions in terms of the load
//! reflection `ρ∠φ`. [`design_series_section_match`] solves the series
//! section exactly, so its result transforms the load to `Z0`.

use crate::consts::REL_EPS;
use crate::error::{Result, RfError};
use crate::math::{near_zero, vswr, z_to_gamma};
use num_complex::{c64, Complex64};
use serde::Serialize;
use std::f64::consts::PI;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum MatchMethod {
    ClosedForm,
    SeriesSection,
}

/// Length and impedance of a lossless matching section
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct MatchingSolution {
    /// Electrical length in wavelengths, in `[0, 0.5)`
    pub length_lambda: f64,
    /// Characteristic impedance of the section
    pub z1: f64,
    pub gamma_load: Complex64,
    /// VSWR of the load before matching
    pub vswr: f64,
    /// `Z_L / Z0`
    pub normalized_load: Complex64,
    pub method: MatchMethod,
}

impl MatchingSolution {
    /// Length in degrees
    pub fn length_degrees(&self) -> f64 {
        self.length_lambda * 360.0
    }

    /// Physical length for a guided wavelength in meters
    pub fn length_m(&self, wavelength: f64) -> f64 {
        self.length_lambda * wavelength
    }

    /// Impedance seen through the section when terminated by `zl`
    pub fn input_impedance(&self, zl: Complex64) -> Result<Complex64> {
        let theta = 2.0 * PI * self.length_lambda;
        let (s, c) = theta.sin_cos();
        let z1 = c64(self.z1, 0.0);
        let j = Complex64::i();
        let den = z1 * c + j * zl * s;
        if near_zero(den.norm(), self.z1 + zl.norm()) {
            return Err(RfError::singular("matching section presents an open circuit"));
        }
        Ok(z1 * (zl * c + j * z1 * s) / den)
    }

    /// Reflection against `z0` left after the section, zero for an exact match
    pub fn residual_reflection(&self, z0: f64, zl: Complex64) -> Result<Complex64> {
        z_to_gamma(self.input_impedance(zl)?, c64(z0, 0.0))
    }
}

struct Load {
    gamma: Complex64,
    rho: f64,
    vswr: f64,
}

fn check_load(z0: f64, zl: Complex64) -> Result<Load> {
    if !(z0.is_finite() && z0 > 0.0) {
        return Err(RfError::input("z0", format!("must be positive, got {}", z0)));
    }
    if !(zl.re.is_finite() && zl.im.is_finite()) {
        return Err(RfError::input("zl", "load impedance must be finite"));
    }
    let gamma = z_to_gamma(zl, c64(z0, 0.0))?;
    let rho = gamma.norm();
    if rho >= 1.0 - REL_EPS {
        return Err(RfError::UnmatchableLoad { rho });
    }
    Ok(Load {
        gamma,
        rho,
        vswr: vswr(gamma)?,
    })
}

fn already_matched(z0: f64, zl: Complex64, load: &Load, method: MatchMethod) -> MatchingSolution {
    MatchingSolution {
        length_lambda: 0.0,
        z1: z0,
        gamma_load: load.gamma,
        vswr: load.vswr,
        normalized_load: zl / z0,
        method,
    }
}

/// Closed-form single-section design:
///
/// `θ = (acos((1−ρ²)/(2ρ·sin φ)) − φ)/2`, length `θ/2π` folded into
/// `[0, 0.5)`, and `Z1 = Z0·sqrt((1+ρ²+2ρ·cos φ)/(1−ρ²))`.
///
/// The `acos` argument is never clamped; outside `[-1, 1]` (which includes
/// every purely resistive mismatch) the result is
/// [`RfError::NoRealSolution`].
pub fn design_single_stub_match(z0: f64, zl: Complex64) -> Result<MatchingSolution> {
    let load = check_load(z0, zl)?;
    if near_zero(load.rho, 1.0) {
        return Ok(already_matched(z0, zl, &load, MatchMethod::ClosedForm));
    }
    let (rho, phi) = (load.rho, load.gamma.arg());

    let arg = (1.0 - rho * rho) / (2.0 * rho * phi.sin());
    if !arg.is_finite() || arg.abs() > 1.0 {
        return Err(RfError::NoRealSolution(format!(
            "acos argument {} is outside [-1, 1] for ρ = {}, φ = {}°",
            arg,
            rho,
            phi.to_degrees()
        )));
    }
    let theta = (arg.acos() - phi) / 2.0;
    let length_lambda = (theta / (2.0 * PI)).rem_euclid(0.5);
    let z1 = z0 * ((1.0 + rho * rho + 2.0 * rho * phi.cos()) / (1.0 - rho * rho)).sqrt();

    Ok(MatchingSolution {
        length_lambda,
        z1,
        gamma_load: load.gamma,
        vswr: load.vswr,
        normalized_load: zl / z0,
        method: MatchMethod::ClosedForm,
    })
}

/// Exact series section between `Z0` and `Z_L = R_L + jX_L`:
///
/// `Z1² = Z0·(|Z_L|² − Z0·R_L)/(R_L − Z0)`, `tan θ = Z1·(Z0 − R_L)/(Z0·X_L)`.
/// Resistive loads reduce to the quarter-wave transformer `Z1 = sqrt(Z0·R_L)`.
pub fn design_series_section_match(z0: f64, zl: Complex64) -> Result<MatchingSolution> {
    let load = check_load(z0, zl)?;
    if near_zero(load.rho, 1.0) {
        return Ok(already_matched(z0, zl, &load, MatchMethod::SeriesSection));
    }
    let (rl, xl) = (zl.re, zl.im);

    let (z1, length_lambda) = if near_zero(xl, zl.norm() + z0) {
        ((z0 * rl).sqrt(), 0.25)
    } else {
        if near_zero(rl - z0, z0) {
            return Err(RfError::NoRealSolution(format!(
                "R_L = Z0 with X_L = {} Ω cannot be matched by one series section",
                xl
            )));
        }
        let z1_sq = z0 * (zl.norm_sqr() - z0 * rl) / (rl - z0);
        if !(z1_sq.is_finite() && z1_sq > 0.0) {
            return Err(RfError::NoRealSolution(format!(
                "Z1² = {} Ω² for Z_L = {} {:+}j",
                z1_sq, rl, xl
            )));
        }
        let z1 = z1_sq.sqrt();
        let mut theta = (z1 * (z0 - rl) / (z0 * xl)).atan();
        if theta < 0.0 {
            theta += PI;
        }
        (z1, theta / (2.0 * PI))
    };

    Ok(MatchingSolution {
        length_lambda,
        z1,
        gamma_load: load.gamma,
        vswr: load.vswr,
        normalized_load: zl / z0,
        method: MatchMethod::SeriesSection,
    })
}

#[cfg(test)]
mod matching_tests {
    use super::*;
    use crate::util::{comp_c64, comp_f64, NumMargin};

    #[test]
    fn test_closed_form() {
        let sol = design_single_stub_match(50.0, c64(10.0, 50.0)).unwrap();
        comp_f64(&0.48556778306299947, &sol.length_lambda, NumMargin::absolute(1e-12), "length", "");
        comp_f64(&114.01754250991381, &sol.z1, NumMargin::absolute(1e-9), "z1", "");
        comp_c64(
            &c64(0.016393442622950866, 0.819672131147541),
            &sol.gamma_load,
            NumMargin::absolute(1e-12),
            "gamma",
            "",
        );
        comp_c64(&c64(0.2, 1.0), &sol.normalized_load, NumMargin::default(), "z", "");
        assert_eq!(sol.method, MatchMethod::ClosedForm);
        assert!(sol.length_lambda >= 0.0 && sol.length_lambda < 0.5);
        comp_f64(&(sol.length_lambda * 360.0), &sol.length_degrees(), NumMargin::default(), "deg", "");
    }

    #[test]
    fn test_closed_form_failures() {
        // sin φ = 0 for resistive loads
        assert!(matches!(
            design_single_stub_match(50.0, c64(75.0, 0.0)),
            Err(RfError::NoRealSolution(_))
        ));
        assert!(matches!(
            design_single_stub_match(50.0, c64(0.0, 50.0)),
            Err(RfError::UnmatchableLoad { .. })
        ));
        assert!(matches!(
            design_single_stub_match(0.0, c64(75.0, 0.0)),
            Err(RfError::InvalidInput { .. })
        ));
        let sol = design_single_stub_match(50.0, c64(50.0, 0.0)).unwrap();
        assert_eq!(sol.length_lambda, 0.0);
        assert_eq!(sol.z1, 50.0);
    }

    #[test]
    fn test_series_section() {
        let zl = c64(100.0, 50.0);
        let sol = design_series_section_match(50.0, zl).unwrap();
        comp_f64(&7500.0_f64.sqrt(), &sol.z1, NumMargin::absolute(1e-9), "z1", "");
        comp_f64(&(1.0 / 3.0), &sol.length_lambda, NumMargin::absolute(1e-12), "length", "");
        let residual = sol.residual_reflection(50.0, zl).unwrap();
        assert!(residual.norm() < 1e-9);
        comp_c64(&c64(50.0, 0.0), &sol.input_impedance(zl).unwrap(), NumMargin::absolute(1e-9), "zin", "");
    }

    #[test]
    fn test_quarter_wave() {
        let zl = c64(100.0, 0.0);
        let sol = design_series_section_match(50.0, zl).unwrap();
        comp_f64(&5000.0_f64.sqrt(), &sol.z1, NumMargin::absolute(1e-9), "z1", "");
        assert_eq!(sol.length_lambda, 0.25);
        assert!(sol.residual_reflection(50.0, zl).unwrap().norm() < 1e-9);
        comp_f64(&0.125, &sol.length_m(0.5), NumMargin::default(), "meters", "");
    }

    #[test]
    fn test_series_section_failures() {
        assert!(matches!(
            design_series_section_match(50.0, c64(50.0, 30.0)),
            Err(RfError::NoRealSolution(_))
        ));
        // Z1² < 0 for a small reactive load
        assert!(matches!(
            design_series_section_match(50.0, c64(10.0, 50.0)),
            Err(RfError::NoRealSolution(_))
        ));
        assert!(matches!(
            design_series_section_match(50.0, c64(0.0, -20.0)),
            Err(RfError::UnmatchableLoad { .. })
        ));
    }
}
