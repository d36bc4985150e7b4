use ndarray::Array1;
use serde::{Deserialize, Serialize};
use simple_error::SimpleError;
use std::{fmt, str::FromStr};

/// Descriptor of scaling
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Scale {
    Atto,
    Femto,
    Pico,
    Nano,
    Micro,
    Milli,
    Centi,
    #[default]
    Base,
    Kilo,
    Mega,
    Giga,
    Tera,
}

/// Prefixes considered for display, largest first
const ENGINEERING: [Scale; 11] = [
    Scale::Tera,
    Scale::Giga,
    Scale::Mega,
    Scale::Kilo,
    Scale::Base,
    Scale::Milli,
    Scale::Micro,
    Scale::Nano,
    Scale::Pico,
    Scale::Femto,
    Scale::Atto,
];

impl Scale {
    pub fn to_long_string(&self) -> String {
        match self {
            Scale::Tera => "tera".to_string(),
            Scale::Giga => "giga".to_string(),
            Scale::Mega => "mega".to_string(),
            Scale::Kilo => "kilo".to_string(),
            Scale::Base => "".to_string(),
            Scale::Centi => "centi".to_string(),
            Scale::Milli => "milli".to_string(),
            Scale::Micro => "micro".to_string(),
            Scale::Nano => "nano".to_string(),
            Scale::Pico => "pico".to_string(),
            Scale::Femto => "femto".to_string(),
            Scale::Atto => "atto".to_string(),
        }
    }

    pub fn to_str(&self) -> &str {
        match self {
            Scale::Atto => "a",
            Scale::Femto => "f",
            Scale::Pico => "p",
            Scale::Nano => "n",
            Scale::Micro => "μ",
            Scale::Milli => "m",
            Scale::Centi => "c",
            Scale::Base => "",
            Scale::Kilo => "k",
            Scale::Mega => "M",
            Scale::Giga => "G",
            Scale::Tera => "T",
        }
    }

    /// Provides multiplier for scale
    /// Scale::Pico = 1e-12
    pub fn multiplier(&self) -> f64 {
        match self {
            Scale::Atto => 1e-18,
            Scale::Femto => 1e-15,
            Scale::Pico => 1e-12,
            Scale::Nano => 1e-9,
            Scale::Micro => 1e-6,
            Scale::Milli => 1e-3,
            Scale::Centi => 1e-2,
            Scale::Base => 1.0,
            Scale::Kilo => 1e3,
            Scale::Mega => 1e6,
            Scale::Giga => 1e9,
            Scale::Tera => 1e12,
        }
    }

    /// Convert a base-unit value into this scale, e.g. 2.4e9 Hz -> 2.4 GHz
    pub fn scale(&self, val: f64) -> f64 {
        val / self.multiplier()
    }

    pub fn scale_array(&self, val: &Array1<f64>) -> Array1<f64> {
        val.map(|&x| x / self.multiplier())
    }

    /// Convert a value in this scale into base units
    pub fn unscale(&self, val: f64) -> f64 {
        val * self.multiplier()
    }

    pub fn unscale_array(&self, val: &Array1<f64>) -> Array1<f64> {
        val.map(|&x| x * self.multiplier())
    }

    /// Largest engineering prefix that keeps the scaled magnitude at or above one.
    /// Zero and non-finite values keep the base scale.
    pub fn engineering(val: f64) -> Scale {
        let mag = val.abs();
        if mag == 0.0 || !mag.is_finite() {
            return Scale::Base;
        }
        ENGINEERING
            .iter()
            .copied()
            .find(|s| mag >= s.multiplier() * (1.0 - 1e-12))
            .unwrap_or(Scale::Atto)
    }

    /// Strict single-prefix lookup used by the quantity parser
    pub fn from_prefix(prefix: &str) -> Option<Scale> {
        match prefix {
            "" => Some(Scale::Base),
            "a" => Some(Scale::Atto),
            "f" => Some(Scale::Femto),
            "p" => Some(Scale::Pico),
            "n" => Some(Scale::Nano),
            "u" | "μ" | "µ" => Some(Scale::Micro),
            "m" => Some(Scale::Milli),
            "c" => Some(Scale::Centi),
            "k" | "K" => Some(Scale::Kilo),
            "M" => Some(Scale::Mega),
            "G" => Some(Scale::Giga),
            "T" => Some(Scale::Tera),
            _ => None,
        }
    }
}

impl FromStr for Scale {
    type Err = SimpleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Atto" | "atto" | "a" | "aF" | "aH" => Ok(Scale::Atto),
            "Femto" | "femto" | "f" | "fF" | "fH" => Ok(Scale::Femto),
            "Pico" | "pico" | "p" | "pF" | "pH" => Ok(Scale::Pico),
            "Nano" | "nano" | "n" | "nF" | "nH" => Ok(Scale::Nano),
            "Micro" | "micro" | "u" | "μ" | "uF" | "μF" | "uH" | "μH" | "uW" | "μW" => {
                Ok(Scale::Micro)
            }
            "Milli" | "milli" | "m" | "mm" | "mF" | "mH" | "mW" => Ok(Scale::Milli),
            "Centi" | "centi" | "c" | "cm" => Ok(Scale::Centi),
            "" | "Base" | "base" => Ok(Scale::Base),
            "Kilo" | "kilo" | "k" | "kΩ" | "kHz" | "khz" | "km" => Ok(Scale::Kilo),
            "Mega" | "mega" | "M" | "MΩ" | "MHz" | "mhz" => Ok(Scale::Mega),
            "Giga" | "giga" | "G" | "GHz" | "ghz" => Ok(Scale::Giga),
            "Tera" | "tera" | "T" | "THz" | "thz" => Ok(Scale::Tera),
            _ => simple_error::bail!("unknown scale: {}", s),
        }
    }
}

impl fmt::Display for Scale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_str())
    }
}
