use super::{Cutoffs, ResponseFamily, Topology};
use crate::error::{Result, RfError};
use crate::frequency::Frequency;
use crate::poly::real_poly_from_roots;
use num_complex::{c64, Complex64};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Topology and edges a transfer function was transformed to
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Band {
    pub topology: Topology,
    pub cutoffs: Cutoffs,
}

/// Rational transfer function in zero-pole-gain form.
///
/// Zeros and poles live in the normalized variable `s / omega_ref`, which
/// keeps the polynomial coefficients near unity for RF cutoffs:
///
/// `H(s) = gain · Π(s/ωr − zᵢ) / Π(s/ωr − pᵢ)`
///
/// A prototype straight out of
/// [`select_prototype`](super::prototype::select_prototype) has
/// `omega_ref = 1` and no band.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TransferFunction {
    zeros: Vec<Complex64>,
    poles: Vec<Complex64>,
    gain: f64,
    omega_ref: f64,
    family: Option<ResponseFamily>,
    prototype_order: usize,
    band: Option<Band>,
}

impl TransferFunction {
    /// Arbitrary zero-pole-gain function. Complex roots must come in
    /// conjugate pairs for the coefficients to be real.
    pub fn from_zpk(
        zeros: Vec<Complex64>,
        poles: Vec<Complex64>,
        gain: f64,
        omega_ref: f64,
    ) -> Result<TransferFunction> {
        if !(omega_ref.is_finite() && omega_ref > 0.0) {
            return Err(RfError::input("omega_ref", format!("must be positive, got {}", omega_ref)));
        }
        if !gain.is_finite() {
            return Err(RfError::input("gain", "must be finite"));
        }
        if zeros.iter().chain(poles.iter()).any(|r| !r.re.is_finite() || !r.im.is_finite()) {
            return Err(RfError::input("zpk", "zeros and poles must be finite"));
        }
        if zeros.len() > poles.len() {
            return Err(RfError::spec(format!(
                "improper transfer function: {} zeros, {} poles",
                zeros.len(),
                poles.len()
            )));
        }
        Ok(TransferFunction {
            prototype_order: poles.len(),
            zeros,
            poles,
            gain,
            omega_ref,
            family: None,
            band: None,
        })
    }

    pub(crate) fn prototype(
        zeros: Vec<Complex64>,
        poles: Vec<Complex64>,
        gain: f64,
        family: ResponseFamily,
    ) -> TransferFunction {
        TransferFunction {
            prototype_order: poles.len(),
            zeros,
            poles,
            gain,
            omega_ref: 1.0,
            family: Some(family),
            band: None,
        }
    }

    /// Copy of `self`'s design metadata with new roots, placed in `band`
    pub(crate) fn transformed(
        &self,
        zeros: Vec<Complex64>,
        poles: Vec<Complex64>,
        gain: f64,
        band: Band,
    ) -> TransferFunction {
        TransferFunction {
            zeros,
            poles,
            gain,
            omega_ref: band.cutoffs.omega_ref(),
            family: self.family,
            prototype_order: self.prototype_order,
            band: Some(band),
        }
    }

    pub fn zeros(&self) -> &[Complex64] {
        &self.zeros
    }

    pub fn poles(&self) -> &[Complex64] {
        &self.poles
    }

    pub fn gain(&self) -> f64 {
        self.gain
    }

    /// Normalizing angular frequency in rad/s
    pub fn omega_ref(&self) -> f64 {
        self.omega_ref
    }

    pub fn family(&self) -> Option<ResponseFamily> {
        self.family
    }

    pub fn band(&self) -> Option<Band> {
        self.band
    }

    /// Order of the lowpass prototype; band transforms double the pole count
    pub fn prototype_order(&self) -> usize {
        self.prototype_order
    }

    /// Number of poles
    pub fn order(&self) -> usize {
        self.poles.len()
    }

    pub fn is_stable(&self) -> bool {
        self.poles.iter().all(|p| p.re < 0.0)
    }

    /// Numerator coefficients in the normalized variable, highest power first
    pub fn numerator(&self) -> Vec<f64> {
        real_poly_from_roots(&self.zeros)
            .iter()
            .map(|c| c * self.gain)
            .collect()
    }

    /// Monic denominator coefficients in the normalized variable
    pub fn denominator(&self) -> Vec<f64> {
        real_poly_from_roots(&self.poles)
    }

    /// `H` at a normalized complex frequency
    pub fn eval_normalized(&self, s: Complex64) -> Complex64 {
        // interleave the factors to keep high orders in range
        let n = self.zeros.len().max(self.poles.len());
        let mut h = c64(self.gain, 0.0);
        for i in 0..n {
            if let Some(z) = self.zeros.get(i) {
                h *= s - z;
            }
            if let Some(p) = self.poles.get(i) {
                h /= s - p;
            }
        }
        h
    }

    /// `H` at a complex angular frequency in rad/s
    pub fn eval_s(&self, s: Complex64) -> Complex64 {
        self.eval_normalized(s / self.omega_ref)
    }

    /// `H(j·2πf)` for `freq` in Hz
    pub fn eval_freq(&self, freq: f64) -> Complex64 {
        self.eval_s(c64(0.0, 2.0 * PI * freq))
    }

    /// Lazily evaluated `(frequency, H)` samples over a sweep. Each call
    /// starts a fresh pass.
    pub fn samples<'a>(
        &'a self,
        sweep: &'a Frequency,
    ) -> impl Iterator<Item = (f64, Complex64)> + 'a {
        sweep.iter().map(move |&f| (f, self.eval_freq(f)))
    }
}
