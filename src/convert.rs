//! Frequency, wavelength and power conversions.

use crate::consts::C0;
use crate::error::{Result, RfError};
use crate::scale::Scale;
use serde::{Deserialize, Serialize};
use simple_error::SimpleError;
use std::{fmt, str::FromStr};

/// Common propagation media with their relative permittivity
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub enum Medium {
    #[default]
    Vacuum,
    Air,
    Fr4,
    Ro4003c,
    Alumina,
}

impl Medium {
    pub fn er(&self) -> f64 {
        match self {
            Medium::Vacuum => 1.0,
            Medium::Air => 1.0006,
            Medium::Fr4 => 4.4,
            Medium::Ro4003c => 3.38,
            Medium::Alumina => 9.8,
        }
    }

    pub fn to_str(&self) -> &str {
        match self {
            Medium::Vacuum => "vacuum",
            Medium::Air => "air",
            Medium::Fr4 => "FR-4",
            Medium::Ro4003c => "RO4003C",
            Medium::Alumina => "alumina",
        }
    }

    pub fn wavelength(&self, freq: f64) -> Result<f64> {
        wavelength(freq, self.er(), 1.0)
    }
}

impl FromStr for Medium {
    type Err = SimpleError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "vacuum" | "Vacuum" => Ok(Medium::Vacuum),
            "air" | "Air" => Ok(Medium::Air),
            "fr4" | "FR4" | "FR-4" => Ok(Medium::Fr4),
            "ro4003c" | "RO4003C" => Ok(Medium::Ro4003c),
            "alumina" | "Alumina" => Ok(Medium::Alumina),
            _ => simple_error::bail!("unknown medium: {}", s),
        }
    }
}

impl fmt::Display for Medium {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_str())
    }
}

fn check_positive(param: &str, val: f64) -> Result<f64> {
    if val.is_finite() && val > 0.0 {
        Ok(val)
    } else {
        Err(RfError::input(param, format!("must be positive and finite, got {}", val)))
    }
}

/// Phase velocity `c0/sqrt(εr·μr)` in m/s
pub fn phase_velocity(er: f64, mur: f64) -> Result<f64> {
    check_positive("er", er)?;
    check_positive("mur", mur)?;
    Ok(C0 / (er * mur).sqrt())
}

/// Wavelength in meters of `freq` (Hz) in a medium
pub fn wavelength(freq: f64, er: f64, mur: f64) -> Result<f64> {
    check_positive("frequency", freq)?;
    Ok(phase_velocity(er, mur)? / freq)
}

/// Frequency in Hz whose wavelength in a medium is `lambda` meters
pub fn frequency_from_wavelength(lambda: f64, er: f64, mur: f64) -> Result<f64> {
    check_positive("wavelength", lambda)?;
    Ok(phase_velocity(er, mur)? / lambda)
}

/// Power in watts to dBm
pub fn w_to_dbm(watts: f64) -> Result<f64> {
    check_positive("power", watts)?;
    Ok(10.0 * (watts / 1e-3).log10())
}

/// Power in watts to dBW
pub fn w_to_dbw(watts: f64) -> Result<f64> {
    check_positive("power", watts)?;
    Ok(10.0 * watts.log10())
}

pub fn dbm_to_w(dbm: f64) -> f64 {
    1e-3 * 10f64.powf(dbm / 10.0)
}

pub fn dbw_to_w(dbw: f64) -> f64 {
    10f64.powf(dbw / 10.0)
}

pub fn dbm_to_dbw(dbm: f64) -> f64 {
    dbm - 30.0
}

pub fn dbw_to_dbm(dbw: f64) -> f64 {
    dbw + 30.0
}

/// Power given in a scaled watt unit (mW, μW, nW, ...) to dBm
pub fn scaled_w_to_dbm(val: f64, scale: Scale) -> Result<f64> {
    w_to_dbm(scale.unscale(val))
}

/// Power ratio to dB
pub fn ratio_to_db(ratio: f64) -> Result<f64> {
    check_positive("ratio", ratio)?;
    Ok(10.0 * ratio.log10())
}

pub fn db_to_ratio(db: f64) -> f64 {
    10f64.powf(db / 10.0)
}

/// Amplitude (voltage) ratio to dB
pub fn db20(mag: f64) -> f64 {
    20.0 * mag.log10()
}
