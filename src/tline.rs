//! Lossy transmission line: propagation constant, input impedance and
//! reflection along the line.

pub mod matching;

use crate::consts::{C0, MU0, REL_EPS, SIGMA_COPPER};
use crate::error::{Result, RfError};
use crate::math::{mismatch_loss_db, near_zero, return_loss_db, vswr, z_to_gamma};
use crate::scale::Scale;
use crate::unit::{Unit, UnitVal};
use ndarray::Array1;
use num_complex::{c64, Complex64};
use serde::{Deserialize, Serialize};
use simple_error::SimpleError;
use std::f64::consts::PI;
use std::{fmt, str::FromStr};

/// Line construction presets. Each sets `εr`, `tanδ` and a 50 Ω `Z0`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LineKind {
    #[default]
    Microstrip,
    Stripline,
    Coax,
    Waveguide,
}

impl LineKind {
    pub fn er(&self) -> f64 {
        match self {
            LineKind::Microstrip => 4.4,
            LineKind::Stripline => 3.38,
            LineKind::Coax => 2.2,
            LineKind::Waveguide => 1.0,
        }
    }

    pub fn tand(&self) -> f64 {
        match self {
            LineKind::Microstrip => 0.02,
            LineKind::Stripline => 0.0027,
            LineKind::Coax => 0.0009,
            LineKind::Waveguide => 0.0,
        }
    }

    pub fn z0(&self) -> f64 {
        50.0
    }

    pub fn to_str(&self) -> &str {
        match self {
            LineKind::Microstrip => "microstrip",
            LineKind::Stripline => "stripline",
            LineKind::Coax => "coax",
            LineKind::Waveguide => "waveguide",
        }
    }
}

impl FromStr for LineKind {
    type Err = SimpleError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "microstrip" | "Microstrip" | "MLIN" | "mlin" => Ok(LineKind::Microstrip),
            "stripline" | "Stripline" => Ok(LineKind::Stripline),
            "coax" | "Coax" | "coaxial" => Ok(LineKind::Coax),
            "waveguide" | "Waveguide" => Ok(LineKind::Waveguide),
            _ => simple_error::bail!("unknown line kind: {}", s),
        }
    }
}

impl fmt::Display for LineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_str())
    }
}

/// Terminated transmission line.
///
/// `sigma` may be `f64::INFINITY` for a perfect conductor, which together
/// with `tand = 0` gives a lossless line.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransmissionLine {
    freq: f64,
    z0: f64,
    zl: Complex64,
    er: f64,
    tand: f64,
    sigma: f64,
    length: UnitVal,
}

/// Attenuation and phase constants of a line, in Np/m and rad/m
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct PropagationConstant {
    /// Conductor loss
    pub alpha_c: f64,
    /// Dielectric loss
    pub alpha_d: f64,
    pub alpha: f64,
    pub beta: f64,
    /// `α + jβ`
    pub gamma: Complex64,
}

impl PropagationConstant {
    /// Total attenuation in dB/m
    pub fn alpha_db_per_m(&self) -> f64 {
        20.0 * std::f64::consts::E.log10() * self.alpha
    }
}

/// Reflection seen at the load and at the line input
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ReflectionState {
    /// `Γ_L = (Z_L − Z0)/(Z_L + Z0)`
    pub gamma_load: Complex64,
    /// `Γ_in = Γ_L·e^(−2γl)`
    pub gamma_in: Complex64,
    /// VSWR from `|Γ_L|`
    pub vswr: f64,
    /// Return loss from `|Γ_L|` in dB, `f64::INFINITY` when matched
    pub return_loss_db: f64,
    pub vswr_in: f64,
    /// Return loss at the input, including the round trip attenuation
    pub return_loss_in_db: f64,
    pub mismatch_loss_db: f64,
}

/// `Γ(d)` sampled from the load (`d = 0`) to the input (`d = l`)
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ReflectionTrajectory {
    pub distance: Array1<f64>,
    pub gamma: Array1<Complex64>,
}

impl TransmissionLine {
    pub fn freq(&self) -> f64 {
        self.freq
    }

    pub fn z0(&self) -> f64 {
        self.z0
    }

    pub fn zl(&self) -> Complex64 {
        self.zl
    }

    pub fn er(&self) -> f64 {
        self.er
    }

    pub fn tand(&self) -> f64 {
        self.tand
    }

    pub fn sigma(&self) -> f64 {
        self.sigma
    }

    pub fn length(&self) -> UnitVal {
        self.length
    }

    /// Same line with another load
    pub fn with_load(&self, zl: Complex64) -> TransmissionLine {
        TransmissionLine {
            zl,
            ..self.clone()
        }
    }

    /// Same line with another length
    pub fn with_length(&self, length: UnitVal) -> TransmissionLine {
        TransmissionLine {
            length,
            ..self.clone()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.freq.is_finite() && self.freq > 0.0) {
            return Err(RfError::input("frequency", format!("must be positive, got {}", self.freq)));
        }
        if !(self.z0.is_finite() && self.z0 > 0.0) {
            return Err(RfError::input("z0", format!("must be positive, got {}", self.z0)));
        }
        if !(self.zl.re.is_finite() && self.zl.im.is_finite()) {
            return Err(RfError::input("zl", "load impedance must be finite"));
        }
        if !(self.er.is_finite() && self.er >= 1.0) {
            return Err(RfError::input("er", format!("must be at least 1, got {}", self.er)));
        }
        if !(self.tand.is_finite() && self.tand >= 0.0) {
            return Err(RfError::input("tand", format!("must be non-negative, got {}", self.tand)));
        }
        if self.sigma.is_nan() || self.sigma <= 0.0 {
            return Err(RfError::input("sigma", format!("must be positive, got {}", self.sigma)));
        }
        Ok(())
    }

    /// `c0/√εr` in m/s
    pub fn phase_velocity(&self) -> f64 {
        C0 / self.er.sqrt()
    }

    /// Guided wavelength in meters
    pub fn guided_wavelength(&self) -> f64 {
        self.phase_velocity() / self.freq
    }

    /// Physical length in meters, electrical lengths resolved against the
    /// guided wavelength
    pub fn length_m(&self) -> Result<f64> {
        self.validate()?;
        let l = self.length.to_meters(self.guided_wavelength())?;
        if !(l.is_finite() && l >= 0.0) {
            return Err(RfError::input("length", format!("must be non-negative, got {} m", l)));
        }
        Ok(l)
    }
}

impl Default for TransmissionLine {
    fn default() -> Self {
        TransmissionLine {
            freq: 2.4e9,
            z0: 50.0,
            zl: c64(75.0, 0.0),
            er: LineKind::Microstrip.er(),
            tand: LineKind::Microstrip.tand(),
            sigma: SIGMA_COPPER,
            length: UnitVal::new(0.01, Scale::Milli, Unit::Meter),
        }
    }
}

/// Builder design pattern for TransmissionLine.
///
/// ## Example
/// ```
/// use rftoolbox::scale::Scale;
/// use rftoolbox::tline::{LineKind, TransmissionLineBuilder};
/// use rftoolbox::unit::Unit;
/// use num_complex::c64;
///
/// let line = TransmissionLineBuilder::new()
///     .kind(LineKind::Coax)
///     .freq_scaled(1.0, Scale::Giga)
///     .zl(c64(100.0, 25.0))
///     .length_scaled(0.25, Scale::Base, Unit::Lambda)
///     .build();
/// assert_eq!(line.er(), 2.2);
/// ```
#[derive(Default)]
pub struct TransmissionLineBuilder {
    line: TransmissionLine,
}

impl TransmissionLineBuilder {
    pub fn new() -> Self {
        TransmissionLineBuilder::default()
    }

    /// Sets `εr`, `tanδ` and `Z0` from a preset
    pub fn kind(mut self, kind: LineKind) -> Self {
        self.line.er = kind.er();
        self.line.tand = kind.tand();
        self.line.z0 = kind.z0();
        self
    }

    pub fn freq(mut self, freq: f64) -> Self {
        self.line.freq = freq;
        self
    }

    pub fn freq_scaled(self, freq: f64, scale: Scale) -> Self {
        self.freq(scale.unscale(freq))
    }

    pub fn z0(mut self, z0: f64) -> Self {
        self.line.z0 = z0;
        self
    }

    pub fn zl(mut self, zl: Complex64) -> Self {
        self.line.zl = zl;
        self
    }

    pub fn er(mut self, er: f64) -> Self {
        self.line.er = er;
        self
    }

    pub fn tand(mut self, tand: f64) -> Self {
        self.line.tand = tand;
        self
    }

    pub fn sigma(mut self, sigma: f64) -> Self {
        self.line.sigma = sigma;
        self
    }

    /// Perfect conductor and loss-free dielectric
    pub fn lossless(mut self) -> Self {
        self.line.sigma = f64::INFINITY;
        self.line.tand = 0.0;
        self
    }

    pub fn length(mut self, length: UnitVal) -> Self {
        self.line.length = length;
        self
    }

    pub fn length_scaled(self, val: f64, scale: Scale, unit: Unit) -> Self {
        self.length(UnitVal::new_scaled(val, scale, unit))
    }

    pub fn build(self) -> TransmissionLine {
        self.line
    }
}

/// Conductor and dielectric attenuation plus the phase constant
pub fn compute_propagation_constant(line: &TransmissionLine) -> Result<PropagationConstant> {
    line.validate()?;
    let f = line.freq;
    let alpha_c = (PI * f * MU0 / line.sigma).sqrt() / (2.0 * line.z0);
    let alpha_d = (2.0 * PI * f * line.er.sqrt() / C0) * (line.tand / 2.0);
    let alpha = alpha_c + alpha_d;
    let beta = 2.0 * PI / line.guided_wavelength();
    Ok(PropagationConstant {
        alpha_c,
        alpha_d,
        alpha,
        beta,
        gamma: c64(alpha, beta),
    })
}

/// `Z_in = Z0·(Z_L + Z0·tanh γl)/(Z0 + Z_L·tanh γl)`; a zero length returns
/// `Z_L` unchanged.
///
/// `tanh γl` is written as `(1 − e)/(1 + e)` with `e = e^(−2γl)` and the
/// common `1 + e` cleared, so lossless quarter-wave lengths stay finite.
pub fn compute_input_impedance(line: &TransmissionLine) -> Result<Complex64> {
    let gamma = compute_propagation_constant(line)?.gamma;
    let l = line.length_m()?;
    if l == 0.0 {
        return Ok(line.zl);
    }
    let e = (-2.0 * gamma * l).exp();
    let (plus, minus) = (1.0 + e, 1.0 - e);
    let z0 = c64(line.z0, 0.0);
    let num = line.zl * plus + z0 * minus;
    let den = z0 * plus + line.zl * minus;
    if near_zero(den.norm(), (z0 * plus).norm() + (line.zl * minus).norm()) {
        return Err(RfError::singular(format!(
            "Z0 + Z_L·tanh(γl) vanishes for Z_L = {} {:+}j",
            line.zl.re, line.zl.im
        )));
    }
    Ok(z0 * num / den)
}

/// Load and input reflection with VSWR, return loss and mismatch loss.
/// Loads on the unit circle (`|Γ_L| ≥ 1 − ε`) are [`RfError::UndefinedVswr`].
pub fn compute_reflection(line: &TransmissionLine) -> Result<ReflectionState> {
    let gamma = compute_propagation_constant(line)?.gamma;
    let l = line.length_m()?;
    let gamma_load = z_to_gamma(line.zl, c64(line.z0, 0.0))?;
    if gamma_load.norm() >= 1.0 - REL_EPS {
        return Err(RfError::UndefinedVswr { gamma: gamma_load });
    }
    let gamma_in = gamma_load * (-2.0 * gamma * l).exp();
    Ok(ReflectionState {
        gamma_load,
        gamma_in,
        vswr: vswr(gamma_load)?,
        return_loss_db: return_loss_db(gamma_load),
        vswr_in: vswr(gamma_in)?,
        return_loss_in_db: return_loss_db(gamma_in),
        mismatch_loss_db: mismatch_loss_db(gamma_load)?,
    })
}

/// `npts` samples of `Γ(d) = Γ_L·e^(−2γd)` from the load to the input, for
/// plotting on a Smith chart
pub fn reflection_trajectory(line: &TransmissionLine, npts: usize) -> Result<ReflectionTrajectory> {
    if npts < 2 {
        return Err(RfError::InsufficientSamples {
            required: 2,
            got: npts,
        });
    }
    let gamma = compute_propagation_constant(line)?.gamma;
    let l = line.length_m()?;
    let gamma_load = z_to_gamma(line.zl, c64(line.z0, 0.0))?;
    let distance = Array1::linspace(0.0, l, npts);
    let traj = distance.map(|d| gamma_load * (-2.0 * gamma * *d).exp());
    Ok(ReflectionTrajectory {
        distance,
        gamma: traj,
    })
}
