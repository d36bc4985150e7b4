use crate::consts::REL_EPS;
use crate::error::{Result, RfError};
use num_complex::Complex64;
use std::f64::consts::PI;

/// `|val|` is negligible next to `reference`. Uses [`REL_EPS`] scaled by the
/// reference magnitude, never exact equality.
pub fn near_zero(val: f64, reference: f64) -> bool {
    val.abs() <= REL_EPS * reference.abs().max(f64::MIN_POSITIVE)
}

/// Reflection coefficient of `z` referenced to `z0`
pub fn z_to_gamma(z: Complex64, z0: Complex64) -> Result<Complex64> {
    let den = z + z0;
    if near_zero(den.norm(), z.norm() + z0.norm()) {
        return Err(RfError::singular(format!(
            "Z + Z0 vanishes for Z = {} {:+}j, Z0 = {} {:+}j",
            z.re, z.im, z0.re, z0.im
        )));
    }
    Ok((z - z0) / den)
}

/// Voltage standing wave ratio for a reflection magnitude. Undefined on and
/// beyond the unit circle.
pub fn vswr(gamma: Complex64) -> Result<f64> {
    let rho = gamma.norm();
    if rho >= 1.0 - REL_EPS || !rho.is_finite() {
        return Err(RfError::UndefinedVswr { gamma });
    }
    Ok((1.0 + rho) / (1.0 - rho))
}

/// Return loss `-20·log10|Γ|` in dB; `f64::INFINITY` for a perfect match
pub fn return_loss_db(gamma: Complex64) -> f64 {
    let rho = gamma.norm();
    if near_zero(rho, 1.0) {
        f64::INFINITY
    } else {
        -20.0 * rho.log10()
    }
}

/// Power lost to reflection, `-10·log10(1 - |Γ|²)` in dB
pub fn mismatch_loss_db(gamma: Complex64) -> Result<f64> {
    let rho = gamma.norm();
    if rho >= 1.0 - REL_EPS {
        return Err(RfError::UndefinedVswr { gamma });
    }
    Ok(-10.0 * (1.0 - rho * rho).log10())
}

/// Remove 2π jumps between consecutive phase samples (radians)
pub fn unwrap_phase(phase: &[f64]) -> Vec<f64> {
    let mut out = Vec::with_capacity(phase.len());
    let mut offset = 0.0;
    for (i, &phi) in phase.iter().enumerate() {
        if i > 0 {
            let diff = phi - phase[i - 1];
            if diff > PI {
                offset -= 2.0 * PI * ((diff + PI) / (2.0 * PI)).floor();
            } else if diff < -PI {
                offset += 2.0 * PI * ((-diff + PI) / (2.0 * PI)).floor();
            }
        }
        out.push(phi + offset);
    }
    out
}
