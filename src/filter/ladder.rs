//! Doubly terminated LC ladder realization of Butterworth responses.
//!
//! Only Butterworth transfer functions are synthesized. The other families
//! are evaluated as transfer functions but have no element extraction here,
//! and asking for one is an [`RfError::InvalidSpec`].

use super::transfer::TransferFunction;
use super::{Cutoffs, ResponseFamily, Topology};
use crate::element::{Arm, ElemType, FilterElement, Position};
use crate::error::{Result, RfError};
use crate::math::near_zero;
use log::debug;
use ndarray::{array, Array2};
use num_complex::{c64, Complex64};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt;

/// Element extraction strategy
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LadderMethod {
    /// Closed-form Butterworth g-values, `g_k = 2·sin((2k−1)π/2n)`,
    /// scaled to the reference impedance and band
    #[default]
    GValue,
    /// Pairwise walk over the normalized numerator and denominator
    /// coefficients: `L = Z0·b_i`, `C = 1/(Z0·a_i)` for odd `i`, swapped for
    /// highpass and bandstop.
    ///
    /// This is an approximation kept for compatibility with older designs.
    /// It does not reproduce the transfer function: lowpass gives no
    /// elements at all, and topologies whose numerator has vanishing
    /// coefficients fail with [`RfError::SingularConfiguration`].
    CoefficientWalk,
}

/// Ordered ladder elements from source to load
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Ladder {
    elements: Vec<FilterElement>,
    z0: f64,
    topology: Topology,
    method: LadderMethod,
}

impl Ladder {
    pub fn elements(&self) -> &[FilterElement] {
        &self.elements
    }

    /// Reference impedance of both terminations
    pub fn z0(&self) -> f64 {
        self.z0
    }

    pub fn topology(&self) -> Topology {
        self.topology
    }

    pub fn method(&self) -> LadderMethod {
        self.method
    }

    pub fn iter(&self) -> impl Iterator<Item = &FilterElement> + '_ {
        self.elements.iter()
    }

    pub fn reactive(&self) -> impl Iterator<Item = &FilterElement> + '_ {
        self.elements.iter().filter(|e| e.is_reactive())
    }

    pub fn reactive_count(&self) -> usize {
        self.reactive().count()
    }

    /// ABCD matrix of the reactive branches at `freq` in Hz. The
    /// terminations are not included.
    pub fn abcd(&self, freq: f64) -> Array2<Complex64> {
        let one = c64(1.0, 0.0);
        let zero = c64(0.0, 0.0);
        let mut total = array![[one, zero], [zero, one]];

        let branches: Vec<&FilterElement> = self.reactive().collect();
        let mut i = 0;
        while i < branches.len() {
            let pos = branches[i].position();
            let arm = branches[i].arm();
            let mut j = i;
            while j < branches.len() && branches[j].position() == pos {
                j += 1;
            }
            let group = &branches[i..j];
            let sum_z: Complex64 = group.iter().map(|e| e.z(freq)).sum();
            let sum_y: Complex64 = group.iter().map(|e| e.y(freq)).sum();

            let m = match pos {
                Position::Shunt(_) => {
                    let y = match arm {
                        Arm::SeriesResonator => sum_z.inv(),
                        Arm::Single | Arm::ParallelResonator => sum_y,
                    };
                    array![[one, zero], [y, one]]
                }
                _ => {
                    let z = match arm {
                        Arm::ParallelResonator => sum_y.inv(),
                        Arm::Single | Arm::SeriesResonator => sum_z,
                    };
                    array![[one, z], [zero, one]]
                }
            };
            total = total.dot(&m);
            i = j;
        }
        total
    }

    /// Transmission coefficient between `z0` terminations at `freq` in Hz
    pub fn s21(&self, freq: f64) -> Complex64 {
        let m = self.abcd(freq);
        let z0 = self.z0;
        2.0 / (m[[0, 0]] + m[[0, 1]] / z0 + m[[1, 0]] * z0 + m[[1, 1]])
    }

    pub fn s21_db(&self, freq: f64) -> f64 {
        20.0 * self.s21(freq).norm().log10()
    }
}

impl fmt::Display for Ladder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, e) in self.elements.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", e)?;
        }
        Ok(())
    }
}

/// Butterworth ladder using [`LadderMethod::GValue`]
pub fn synthesize_ladder(tf: &TransferFunction, z0_ref: f64, topology: Topology) -> Result<Ladder> {
    synthesize_ladder_with(tf, z0_ref, topology, LadderMethod::GValue)
}

pub fn synthesize_ladder_with(
    tf: &TransferFunction,
    z0_ref: f64,
    topology: Topology,
    method: LadderMethod,
) -> Result<Ladder> {
    if !(z0_ref.is_finite() && z0_ref > 0.0) {
        return Err(RfError::input("z0_ref", format!("must be positive, got {}", z0_ref)));
    }
    match tf.family() {
        Some(ResponseFamily::Butterworth) => {}
        Some(family) => {
            return Err(RfError::spec(format!(
                "ladder synthesis covers Butterworth responses only, not {}",
                family
            )))
        }
        None => {
            return Err(RfError::spec(
                "ladder synthesis needs a Butterworth design, got a bare transfer function",
            ))
        }
    }
    let band = tf
        .band()
        .ok_or_else(|| RfError::spec("ladder synthesis needs a frequency-transformed design"))?;
    if band.topology != topology {
        return Err(RfError::spec(format!(
            "transfer function is {}, ladder requested for {}",
            band.topology, topology
        )));
    }

    let elements = match method {
        LadderMethod::GValue => g_value_ladder(tf.prototype_order(), z0_ref, topology, band.cutoffs)?,
        LadderMethod::CoefficientWalk => coefficient_walk(tf, z0_ref, topology)?,
    };
    let ladder = Ladder {
        elements,
        z0: z0_ref,
        topology,
        method,
    };
    debug!(
        "{} ladder ({:?}): {} reactive elements at {} Ω",
        topology,
        method,
        ladder.reactive_count(),
        z0_ref
    );
    Ok(ladder)
}

/// Butterworth g-value for element `k` of an order `n` prototype, with `k`
/// counted from 1
pub fn g_value(k: usize, n: usize) -> Result<f64> {
    if k == 0 || k > n {
        return Err(RfError::input(
            "k",
            format!("element index must lie in 1..={}, got {}", n, k),
        ));
    }
    Ok(2.0 * ((2 * k - 1) as f64 * PI / (2 * n) as f64).sin())
}

fn g_value_ladder(
    n: usize,
    z0: f64,
    topology: Topology,
    cutoffs: Cutoffs,
) -> Result<Vec<FilterElement>> {
    let w = cutoffs.omega_ref();
    let delta = match cutoffs {
        Cutoffs::Band(f1, f2) => (f2 - f1) / (f1 * f2).sqrt(),
        Cutoffs::Single(_) => 1.0,
    };

    let mut elements = vec![FilterElement::resistor(z0, Position::Source)?];
    for k in 1..=n {
        let g = g_value(k, n)?;
        let series = k % 2 == 1;
        let pos = if series {
            Position::Series(k)
        } else {
            Position::Shunt(k)
        };
        let pair = |l: f64, c: f64, arm: Arm| -> Result<[FilterElement; 2]> {
            Ok([
                FilterElement::new(ElemType::Inductor, l, pos, arm)?,
                FilterElement::new(ElemType::Capacitor, c, pos, arm)?,
            ])
        };
        match (topology, series) {
            (Topology::Lowpass, true) => elements.push(FilterElement::inductor(g * z0 / w, pos)?),
            (Topology::Lowpass, false) => {
                elements.push(FilterElement::capacitor(g / (z0 * w), pos)?)
            }
            (Topology::Highpass, true) => {
                elements.push(FilterElement::capacitor(1.0 / (g * z0 * w), pos)?)
            }
            (Topology::Highpass, false) => {
                elements.push(FilterElement::inductor(z0 / (g * w), pos)?)
            }
            (Topology::Bandpass, true) => elements.extend(pair(
                g * z0 / (w * delta),
                delta / (w * g * z0),
                Arm::SeriesResonator,
            )?),
            (Topology::Bandpass, false) => elements.extend(pair(
                delta * z0 / (w * g),
                g / (w * delta * z0),
                Arm::ParallelResonator,
            )?),
            (Topology::Bandstop, true) => elements.extend(pair(
                g * delta * z0 / w,
                1.0 / (w * g * delta * z0),
                Arm::ParallelResonator,
            )?),
            (Topology::Bandstop, false) => elements.extend(pair(
                z0 / (w * g * delta),
                g * delta / (w * z0),
                Arm::SeriesResonator,
            )?),
        }
    }
    elements.push(FilterElement::resistor(z0, Position::Load)?);
    Ok(elements)
}

/// Coefficients divided by the leading one and rescaled to physical `s`
fn physical_normalized(coeffs: &[f64], w: f64) -> Result<Vec<f64>> {
    let lead = coeffs
        .first()
        .copied()
        .filter(|c| *c != 0.0)
        .ok_or_else(|| RfError::singular("transfer function has a zero leading coefficient"))?;
    Ok(coeffs
        .iter()
        .enumerate()
        .map(|(i, c)| c / lead * w.powi(i as i32))
        .collect())
}

fn coefficient_walk(tf: &TransferFunction, z0: f64, topology: Topology) -> Result<Vec<FilterElement>> {
    let w = tf.omega_ref();
    let b = physical_normalized(&tf.numerator(), w)?;
    let a = physical_normalized(&tf.denominator(), w)?;

    let mut elements = vec![];
    for i in (1..b.len()).step_by(2) {
        if i == 1 {
            elements.push(FilterElement::resistor(z0, Position::Source)?);
        }
        let (bi, ai) = (b[i], a[i]);
        let scale = w.powi(i as i32);
        if near_zero(bi, scale) || near_zero(ai, scale) {
            return Err(RfError::singular(format!(
                "coefficient walk hits a vanishing coefficient at index {}",
                i
            )));
        }
        match topology {
            Topology::Lowpass | Topology::Bandpass => {
                elements.push(FilterElement::inductor(z0 * bi, Position::Series(i))?);
                elements.push(FilterElement::capacitor(1.0 / (z0 * ai), Position::Shunt(i))?);
            }
            Topology::Highpass | Topology::Bandstop => {
                elements.push(FilterElement::capacitor(1.0 / (z0 * bi), Position::Series(i))?);
                elements.push(FilterElement::inductor(z0 / ai, Position::Shunt(i))?);
            }
        }
    }
    Ok(elements)
}
