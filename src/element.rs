//! Lumped elements of a ladder network.

use crate::error::{Result, RfError};
use crate::unit::{Unit, UnitVal};
use num_complex::{c64, Complex64};
use serde::{Deserialize, Serialize};
use simple_error::SimpleError;
use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ElemType {
    #[default]
    Capacitor,
    Inductor,
    Resistor,
}

impl ElemType {
    /// Convert ElemType to String
    pub fn to_str(&self) -> &str {
        match self {
            ElemType::Capacitor => "Capacitor",
            ElemType::Inductor => "Inductor",
            ElemType::Resistor => "Resistor",
        }
    }

    /// Schematic letter
    pub fn symbol(&self) -> &str {
        match self {
            ElemType::Capacitor => "C",
            ElemType::Inductor => "L",
            ElemType::Resistor => "R",
        }
    }

    /// SI unit of the element value
    pub fn unit(&self) -> Unit {
        match self {
            ElemType::Capacitor => Unit::Farad,
            ElemType::Inductor => Unit::Henry,
            ElemType::Resistor => Unit::Ohm,
        }
    }
}

impl FromStr for ElemType {
    type Err = SimpleError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "C" | "c" | "Cap" | "cap" | "Capacitor" | "capacitor" => Ok(ElemType::Capacitor),
            "L" | "l" | "Ind" | "ind" | "Inductor" | "inductor" => Ok(ElemType::Inductor),
            "R" | "r" | "Res" | "res" | "Resistor" | "resistor" => Ok(ElemType::Resistor),
            _ => simple_error::bail!("ElemType not recognized: {}", s),
        }
    }
}

impl fmt::Display for ElemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_str())
    }
}

/// Place of an element in the ladder. Branch indices count from 1.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Position {
    Source,
    Series(usize),
    Shunt(usize),
    Load,
}

impl Position {
    /// Branch index, `None` for the terminations
    pub fn branch(&self) -> Option<usize> {
        match self {
            Position::Series(k) | Position::Shunt(k) => Some(*k),
            Position::Source | Position::Load => None,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Position::Source => write!(f, "source"),
            Position::Series(k) => write!(f, "series {}", k),
            Position::Shunt(k) => write!(f, "shunt {}", k),
            Position::Load => write!(f, "load"),
        }
    }
}

/// How the elements sharing a branch combine
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Arm {
    /// The branch is this element alone
    #[default]
    Single,
    /// Elements of the branch are in series (L-C resonator)
    SeriesResonator,
    /// Elements of the branch are in parallel (L||C tank)
    ParallelResonator,
}

/// One inductor, capacitor or resistor in a ladder
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FilterElement {
    kind: ElemType,
    value: f64,
    position: Position,
    arm: Arm,
}

impl FilterElement {
    /// `value` is in SI units (H, F or Ω) and must be positive and finite
    pub fn new(kind: ElemType, value: f64, position: Position, arm: Arm) -> Result<FilterElement> {
        if !(value.is_finite() && value > 0.0) {
            return Err(RfError::input(
                kind.symbol(),
                format!("{} at {} must be positive, got {}", kind, position, value),
            ));
        }
        Ok(FilterElement {
            kind,
            value,
            position,
            arm,
        })
    }

    pub fn inductor(value: f64, position: Position) -> Result<FilterElement> {
        FilterElement::new(ElemType::Inductor, value, position, Arm::Single)
    }

    pub fn capacitor(value: f64, position: Position) -> Result<FilterElement> {
        FilterElement::new(ElemType::Capacitor, value, position, Arm::Single)
    }

    pub fn resistor(value: f64, position: Position) -> Result<FilterElement> {
        FilterElement::new(ElemType::Resistor, value, position, Arm::Single)
    }

    pub fn kind(&self) -> ElemType {
        self.kind
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn arm(&self) -> Arm {
        self.arm
    }

    pub fn is_reactive(&self) -> bool {
        self.kind != ElemType::Resistor
    }

    /// Value with an engineering prefix, e.g. 6.09 nH
    pub fn unitval(&self) -> UnitVal {
        UnitVal::engineering(self.value, self.kind.unit())
    }

    /// Impedance at `freq` in Hz
    pub fn z(&self, freq: f64) -> Complex64 {
        let w = 2.0 * PI * freq;
        match self.kind {
            ElemType::Resistor => c64(self.value, 0.0),
            ElemType::Inductor => c64(0.0, w * self.value),
            ElemType::Capacitor => c64(0.0, -1.0 / (w * self.value)),
        }
    }

    /// Admittance at `freq` in Hz
    pub fn y(&self, freq: f64) -> Complex64 {
        let w = 2.0 * PI * freq;
        match self.kind {
            ElemType::Resistor => c64(1.0 / self.value, 0.0),
            ElemType::Inductor => c64(0.0, -1.0 / (w * self.value)),
            ElemType::Capacitor => c64(0.0, w * self.value),
        }
    }
}

impl fmt::Display for FilterElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} = {}", self.position, self.kind.symbol(), self.unitval())
    }
}
