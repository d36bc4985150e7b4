//! Lowpass-to-X frequency transformations in zero-pole-gain form. The result
//! stays normalized: `omega_ref` becomes the cutoff (or geometric band center)
//! in rad/s and the roots are expressed relative to it.

use super::transfer::{Band, TransferFunction};
use super::{Cutoffs, Topology};
use crate::error::{Result, RfError};
use crate::math::near_zero;
use num_complex::{c64, Complex64};

fn neg_product(vals: &[Complex64]) -> Complex64 {
    vals.iter().fold(c64(1.0, 0.0), |acc, v| acc * -v)
}

fn invert_all(vals: &[Complex64], what: &str) -> Result<Vec<Complex64>> {
    vals.iter()
        .map(|v| {
            if near_zero(v.norm(), 1.0) {
                Err(RfError::singular(format!("prototype {} at the origin", what)))
            } else {
                Ok(v.inv())
            }
        })
        .collect()
}

/// Each root `r` maps to the pair `r ± sqrt(r² − 1)`
fn split_roots(vals: &[Complex64]) -> Vec<Complex64> {
    let mut plus: Vec<Complex64> = Vec::with_capacity(2 * vals.len());
    let mut minus = Vec::with_capacity(vals.len());
    for &v in vals {
        let root = (v * v - 1.0).sqrt();
        plus.push(v + root);
        minus.push(v - root);
    }
    plus.extend(minus);
    plus
}

/// Moves a normalized lowpass prototype to `topology` with edges `cutoffs`.
///
/// Lowpass keeps the roots, highpass substitutes `s → 1/s`, and the band
/// transforms substitute `s → (s² + 1)/(s·Δ)` (bandpass) or its reciprocal
/// (bandstop), where `Δ` is the fractional bandwidth.
pub fn frequency_transform(
    prototype: &TransferFunction,
    topology: Topology,
    cutoffs: Cutoffs,
) -> Result<TransferFunction> {
    cutoffs.validate(topology)?;
    if prototype.band().is_some() || prototype.omega_ref() != 1.0 {
        return Err(RfError::spec(
            "frequency transforms apply to a normalized lowpass prototype",
        ));
    }

    let zeros = prototype.zeros();
    let poles = prototype.poles();
    let gain = prototype.gain();
    let degree = poles.len() - zeros.len();
    let band = Band { topology, cutoffs };

    let (z, p, k) = match (topology, cutoffs) {
        (Topology::Lowpass, _) => (zeros.to_vec(), poles.to_vec(), gain),
        (Topology::Highpass, _) => {
            let mut z = invert_all(zeros, "zero")?;
            let p = invert_all(poles, "pole")?;
            z.extend(std::iter::repeat(c64(0.0, 0.0)).take(degree));
            let k = gain * (neg_product(zeros) / neg_product(poles)).re;
            (z, p, k)
        }
        (Topology::Bandpass, Cutoffs::Band(f1, f2)) => {
            let bw = (f2 - f1) / (f1 * f2).sqrt();
            let half = |v: &[Complex64]| v.iter().map(|r| r * (bw / 2.0)).collect::<Vec<_>>();
            let mut z = split_roots(&half(zeros));
            let p = split_roots(&half(poles));
            z.extend(std::iter::repeat(c64(0.0, 0.0)).take(degree));
            (z, p, gain * bw.powi(degree as i32))
        }
        (Topology::Bandstop, Cutoffs::Band(f1, f2)) => {
            let bw = (f2 - f1) / (f1 * f2).sqrt();
            let over = |v: &[Complex64], what: &str| -> Result<Vec<Complex64>> {
                Ok(invert_all(v, what)?.iter().map(|r| r * (bw / 2.0)).collect())
            };
            let mut z = split_roots(&over(zeros, "zero")?);
            let p = split_roots(&over(poles, "pole")?);
            z.extend(std::iter::repeat(c64(0.0, 1.0)).take(degree));
            z.extend(std::iter::repeat(c64(0.0, -1.0)).take(degree));
            let k = gain * (neg_product(zeros) / neg_product(poles)).re;
            (z, p, k)
        }
        // validate() rejects single edges for band topologies
        (_, Cutoffs::Single(_)) => {
            return Err(RfError::spec(format!("{} needs two band edges", topology)))
        }
    };
    Ok(prototype.transformed(z, p, k, band))
}
