use super::transfer::TransferFunction;
use crate::error::{Result, RfError};
use crate::frequency::Frequency;
use crate::math::unwrap_phase;
use ndarray::Array1;
use num_complex::Complex64;
use serde::Serialize;
use std::f64::consts::PI;

/// One sample of a [`FrequencyResponse`]
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ResponsePoint {
    pub freq: f64,
    pub h: Complex64,
    pub mag_db: f64,
    pub phase_deg: f64,
    pub group_delay: f64,
}

/// Sampled response of a transfer function. Phase is unwrapped across the
/// sweep; group delay is in seconds.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FrequencyResponse {
    freq: Array1<f64>,
    h: Array1<Complex64>,
    mag_db: Array1<f64>,
    phase_deg: Array1<f64>,
    group_delay: Array1<f64>,
}

impl FrequencyResponse {
    pub fn freq(&self) -> &Array1<f64> {
        &self.freq
    }

    pub fn h(&self) -> &Array1<Complex64> {
        &self.h
    }

    /// `20·log10|H|`; `-∞` exactly on a transmission zero
    pub fn mag_db(&self) -> &Array1<f64> {
        &self.mag_db
    }

    pub fn phase_deg(&self) -> &Array1<f64> {
        &self.phase_deg
    }

    pub fn group_delay(&self) -> &Array1<f64> {
        &self.group_delay
    }

    pub fn npts(&self) -> usize {
        self.freq.len()
    }

    pub fn at(&self, idx: usize) -> Option<ResponsePoint> {
        if idx >= self.npts() {
            return None;
        }
        Some(ResponsePoint {
            freq: self.freq[idx],
            h: self.h[idx],
            mag_db: self.mag_db[idx],
            phase_deg: self.phase_deg[idx],
            group_delay: self.group_delay[idx],
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = ResponsePoint> + '_ {
        (0..self.npts()).filter_map(move |i| self.at(i))
    }

    /// Largest magnitude in dB, ignoring NaN samples
    pub fn max_mag_db(&self) -> f64 {
        self.mag_db
            .iter()
            .copied()
            .filter(|v| !v.is_nan())
            .fold(f64::NEG_INFINITY, f64::max)
    }

    pub fn min_mag_db(&self) -> f64 {
        self.mag_db
            .iter()
            .copied()
            .filter(|v| !v.is_nan())
            .fold(f64::INFINITY, f64::min)
    }
}

/// Evaluates `H(j2πf)` over `sweep`.
///
/// Group delay `-dφ/dω` comes from finite differences of the unwrapped
/// phase: central differences inside the sweep, one-sided at the ends.
pub fn evaluate_response(tf: &TransferFunction, sweep: &Frequency) -> Result<FrequencyResponse> {
    let npts = sweep.npts();
    if npts < 2 {
        return Err(RfError::InsufficientSamples {
            required: 2,
            got: npts,
        });
    }

    let freq = sweep.freq().clone();
    let h: Array1<Complex64> = tf.samples(sweep).map(|(_, h)| h).collect();
    let mag_db = h.map(|v| 20.0 * v.norm().log10());
    let phase = unwrap_phase(&h.iter().map(|v| v.arg()).collect::<Vec<_>>());
    let w = sweep.w();

    let group_delay = Array1::from_shape_fn(npts, |i| {
        let (lo, hi) = match i {
            0 => (0, 1),
            i if i == npts - 1 => (npts - 2, npts - 1),
            i => (i - 1, i + 1),
        };
        -(phase[hi] - phase[lo]) / (w[hi] - w[lo])
    });
    let phase_deg = Array1::from_iter(phase.iter().map(|p| p * 180.0 / PI));

    Ok(FrequencyResponse {
        freq,
        h,
        mag_db,
        phase_deg,
        group_delay,
    })
}
