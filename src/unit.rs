use crate::error::{Result, RfError};
use crate::scale::Scale;
use num_complex::{c64, Complex64};
use regex::Regex;
use serde::{Deserialize, Serialize};
use simple_error::SimpleError;
use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

/// Descriptor of sweep type
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub enum Sweep {
    #[default]
    Linear,
    Log,
}

/// Descriptor of unit
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Unit {
    #[default]
    None, // No Unit
    Hz,     // Frequency in Hz
    Degree, // Electrical length in degrees
    Radian, // Electrical length in radians
    Lambda, // Length in wavelengths
    Meter,  // Length in meters
    Inch,   // Length in inches
    Farad,  // Capacitance in farads
    Henry,  // Inductance in henries
    Ohm,    // Resistance in ohms
    Watt,   // Power in watts
    Dbm,    // Power relative to 1 mW
    Dbw,    // Power relative to 1 W
    Db,     // Ratio in decibels
    Neper,  // Attenuation in nepers
}

impl Unit {
    pub fn to_long_string(&self) -> String {
        match self {
            Unit::None => "".to_string(),
            Unit::Hz => "hertz".to_string(),
            Unit::Degree => "degree".to_string(),
            Unit::Radian => "radian".to_string(),
            Unit::Lambda => "lambda".to_string(),
            Unit::Meter => "meter".to_string(),
            Unit::Inch => "inch".to_string(),
            Unit::Farad => "farad".to_string(),
            Unit::Henry => "henry".to_string(),
            Unit::Ohm => "ohm".to_string(),
            Unit::Watt => "watt".to_string(),
            Unit::Dbm => "decibel-milliwatt".to_string(),
            Unit::Dbw => "decibel-watt".to_string(),
            Unit::Db => "decibel".to_string(),
            Unit::Neper => "neper".to_string(),
        }
    }

    pub fn to_str(&self) -> &str {
        match self {
            Unit::None => "",
            Unit::Hz => "Hz",
            Unit::Degree => "°",
            Unit::Radian => "rad",
            Unit::Lambda => "λ",
            Unit::Meter => "m",
            Unit::Inch => "in",
            Unit::Farad => "F",
            Unit::Henry => "H",
            Unit::Ohm => "Ω",
            Unit::Watt => "W",
            Unit::Dbm => "dBm",
            Unit::Dbw => "dBW",
            Unit::Db => "dB",
            Unit::Neper => "Np",
        }
    }

    /// Logarithmic units never take a scale prefix
    pub fn is_logarithmic(&self) -> bool {
        matches!(self, Unit::Dbm | Unit::Dbw | Unit::Db | Unit::Neper)
    }

    pub fn is_length(&self) -> bool {
        matches!(
            self,
            Unit::Meter | Unit::Inch | Unit::Lambda | Unit::Degree | Unit::Radian
        )
    }
}

impl FromStr for Unit {
    type Err = SimpleError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "" => Ok(Unit::None),
            "HZ" | "Hz" | "hz" => Ok(Unit::Hz),
            "Degree" | "degree" | "deg" | "°" => Ok(Unit::Degree),
            "Radian" | "radian" | "rad" => Ok(Unit::Radian),
            "Lambda" | "lambda" | "λ" => Ok(Unit::Lambda),
            "Meter" | "meter" | "m" => Ok(Unit::Meter),
            "Inch" | "inch" | "in" => Ok(Unit::Inch),
            "Farad" | "farad" | "F" => Ok(Unit::Farad),
            "Henry" | "henry" | "H" => Ok(Unit::Henry),
            "Ohm" | "ohm" | "Ω" => Ok(Unit::Ohm),
            "Watt" | "watt" | "W" => Ok(Unit::Watt),
            "dBm" | "dbm" => Ok(Unit::Dbm),
            "dBW" | "dBw" | "dbw" => Ok(Unit::Dbw),
            "dB" | "db" => Ok(Unit::Db),
            "Neper" | "neper" | "Np" => Ok(Unit::Neper),
            _ => simple_error::bail!("unknown unit: {}", s),
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_str())
    }
}

/// Encapsulation of a value with scale. Value is stored unscaled.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct UnitVal {
    val: f64,
    scale: Scale,
    unit: Unit,
}

impl UnitVal {
    pub fn new(val: f64, scale: Scale, unit: Unit) -> Self {
        UnitVal { val, scale, unit }
    }

    pub fn new_scaled(val: f64, scale: Scale, unit: Unit) -> Self {
        UnitVal {
            val: scale.unscale(val),
            scale,
            unit,
        }
    }

    /// Value in base units with the best-fitting display prefix
    pub fn engineering(val: f64, unit: Unit) -> Self {
        let scale = if unit.is_logarithmic() {
            Scale::Base
        } else {
            Scale::engineering(val)
        };
        UnitVal { val, scale, unit }
    }

    /// Retrieve value unscaled
    pub fn val(&self) -> f64 {
        self.val
    }

    /// Retrieve value in scaled scale
    pub fn val_scaled(&self) -> f64 {
        self.scale.scale(self.val)
    }

    /// Retrieve scale
    pub fn scale(&self) -> Scale {
        self.scale
    }

    /// Retrieve unit
    pub fn unit(&self) -> Unit {
        self.unit
    }

    /// Set value unscaled
    pub fn set_val(&mut self, val: f64) -> &Self {
        self.val = val;
        self
    }

    /// Set scale
    pub fn set_scale(&mut self, scale: Scale) -> &Self {
        self.scale = scale;
        self
    }

    /// Physical length in meters. Electrical lengths (λ, degrees, radians) are
    /// resolved against `wavelength`, the guided wavelength in meters.
    pub fn to_meters(&self, wavelength: f64) -> Result<f64> {
        match self.unit {
            Unit::Meter | Unit::None => Ok(self.val),
            Unit::Inch => Ok(self.val * 0.0254),
            Unit::Lambda => Ok(self.val * wavelength),
            Unit::Degree => Ok(self.val / 360.0 * wavelength),
            Unit::Radian => Ok(self.val / (2.0 * PI) * wavelength),
            unit => Err(RfError::input(
                "length",
                format!("{} is not a length unit", unit.to_long_string()),
            )),
        }
    }
}

impl Default for UnitVal {
    fn default() -> Self {
        UnitVal {
            val: 0.0,
            scale: Scale::Base,
            unit: Unit::None,
        }
    }
}

impl fmt::Display for UnitVal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prec = f.precision().unwrap_or(3);
        write!(
            f,
            "{:.*} {}{}",
            prec,
            self.val_scaled(),
            self.scale,
            self.unit
        )
    }
}

impl FromStr for UnitVal {
    type Err = RfError;

    fn from_str(s: &str) -> Result<Self> {
        parse_quantity(s)
    }
}

/// Builder design pattern for UnitVal.
///
/// ## Example
/// ```
/// use rftoolbox::unit::{Unit, UnitValBuilder};
/// use rftoolbox::scale::Scale;
///
/// let length = UnitValBuilder::new()
///     .val_scaled(10.0, Scale::Milli)
///     .unit(Unit::Meter)
///     .build();
/// assert_eq!(length.val(), 0.01);
/// ```
#[derive(Default)]
pub struct UnitValBuilder {
    val: f64,
    scale: Scale,
    unit: Unit,
}

impl UnitValBuilder {
    pub fn new() -> Self {
        UnitValBuilder::default()
    }

    pub fn val(mut self, val: f64) -> Self {
        self.val = val;
        self
    }

    pub fn val_scaled(mut self, val: f64, scale: Scale) -> Self {
        self.val = scale.unscale(val);
        self.scale = scale;
        self
    }

    pub fn scale(mut self, scale: Scale) -> Self {
        self.scale = scale;
        self
    }

    pub fn unit(mut self, unit: Unit) -> Self {
        self.unit = unit;
        self
    }

    pub fn build(self) -> UnitVal {
        UnitVal {
            val: self.val,
            scale: self.scale,
            unit: self.unit,
        }
    }
}

const NUMBER: &str = r"(?:\d+\.?\d*|\.\d+)(?:[eE][-+]?\d+)?";

/// Unit suffixes, longest first so that `dBm` wins over `dB` and `m`
const SUFFIXES: [(&str, Unit); 15] = [
    ("dBm", Unit::Dbm),
    ("dBW", Unit::Dbw),
    ("ohm", Unit::Ohm),
    ("rad", Unit::Radian),
    ("Hz", Unit::Hz),
    ("dB", Unit::Db),
    ("Np", Unit::Neper),
    ("in", Unit::Inch),
    ("Ω", Unit::Ohm),
    ("λ", Unit::Lambda),
    ("°", Unit::Degree),
    ("m", Unit::Meter),
    ("F", Unit::Farad),
    ("H", Unit::Henry),
    ("W", Unit::Watt),
];

fn quantity_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(&format!(r"^\s*(?P<val>[-+]?{})\s*(?P<suffix>\S*)\s*$", NUMBER))
            .expect("quantity pattern is valid")
    })
}

fn impedance_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(&format!(
            r"^\s*(?P<re>[-+]?{n})?\s*(?:(?P<sign>[-+])?\s*[jJ]\s*(?P<im>{n}))?\s*(?:Ω|ohms?)?\s*$",
            n = NUMBER
        ))
        .expect("impedance pattern is valid")
    })
}

/// Parse a quantity such as `"2.4 GHz"`, `"10mm"`, `"0.25λ"` or `"-3 dBm"`.
/// A bare number parses with [`Unit::None`].
pub fn parse_quantity(text: &str) -> Result<UnitVal> {
    let caps = quantity_regex()
        .captures(text)
        .ok_or_else(|| RfError::input("quantity", format!("cannot parse '{}'", text)))?;
    let val: f64 = caps["val"]
        .parse()
        .map_err(|_| RfError::input("quantity", format!("bad number in '{}'", text)))?;
    let suffix = &caps["suffix"];
    if suffix.is_empty() {
        return Ok(UnitVal::new(val, Scale::Base, Unit::None));
    }

    for (name, unit) in SUFFIXES {
        if let Some(prefix) = suffix.strip_suffix(name) {
            if unit.is_logarithmic() && !prefix.is_empty() {
                continue;
            }
            if let Some(scale) = Scale::from_prefix(prefix) {
                return Ok(UnitVal::new_scaled(val, scale, unit));
            }
        }
    }
    Err(SimpleError::new(format!("unknown unit suffix '{}'", suffix)).into())
}

/// Parse a complex impedance such as `"75"`, `"75-j25"`, `"j50"` or `"10 + j 5 Ω"`
pub fn parse_impedance(text: &str) -> Result<Complex64> {
    let bad = || RfError::input("impedance", format!("cannot parse '{}'", text));
    let caps = impedance_regex().captures(text).ok_or_else(bad)?;
    if caps.name("re").is_none() && caps.name("im").is_none() {
        return Err(bad());
    }
    let re = match caps.name("re") {
        Some(m) => m.as_str().parse::<f64>().map_err(|_| bad())?,
        None => 0.0,
    };
    let im = match caps.name("im") {
        Some(m) => m.as_str().parse::<f64>().map_err(|_| bad())?,
        None => 0.0,
    };
    let sign = match caps.name("sign").map(|m| m.as_str()) {
        Some("-") => -1.0,
        _ => 1.0,
    };
    Ok(c64(re, sign * im))
}
