use crate::error::{Result, RfError};
use crate::scale::Scale;
use crate::unit::Sweep;
use ndarray::Array1;
use serde::Serialize;
use std::f64::consts::PI;

/// Ordered frequency sweep. Values are stored in Hz, finite, non-negative and
/// strictly increasing.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Frequency {
    pts: Array1<f64>,
}

impl Frequency {
    pub fn new(pts: Array1<f64>) -> Result<Frequency> {
        for (i, &f) in pts.iter().enumerate() {
            if !f.is_finite() || f < 0.0 {
                return Err(RfError::input(
                    "frequency",
                    format!("point {} must be finite and non-negative, got {}", i, f),
                ));
            }
        }
        if pts.windows(2).into_iter().any(|w| w[1] <= w[0]) {
            return Err(RfError::input(
                "frequency",
                "sweep must be strictly increasing",
            ));
        }
        Ok(Frequency { pts })
    }

    pub fn new_scaled(pts: Array1<f64>, scale: Scale) -> Result<Frequency> {
        Frequency::new(scale.unscale_array(&pts))
    }

    pub fn from_vec(f: Vec<f64>, scale: Scale) -> Result<Frequency> {
        Frequency::new_scaled(Array1::from(f), scale)
    }

    /// `npts` linearly spaced points from `start` to `stop` inclusive
    pub fn from_lin_range(start: f64, stop: f64, npts: usize, scale: Scale) -> Result<Frequency> {
        check_range(start, stop, npts)?;
        Frequency::new_scaled(Array1::linspace(start, stop, npts), scale)
    }

    /// `npts` logarithmically spaced points from `start` to `stop` inclusive
    pub fn from_log_range(start: f64, stop: f64, npts: usize, scale: Scale) -> Result<Frequency> {
        check_range(start, stop, npts)?;
        if start <= 0.0 {
            return Err(RfError::input("start", "log sweep must start above zero"));
        }
        let mut pts = Array1::logspace(10.0, start.log10(), stop.log10(), npts);
        // pin the end points against log/exp rounding
        pts[0] = start;
        pts[npts - 1] = stop;
        Frequency::new_scaled(pts, scale)
    }

    pub fn freq(&self) -> &Array1<f64> {
        &self.pts
    }

    pub fn freq_at(&self, pt: usize) -> f64 {
        self.pts[pt]
    }

    pub fn freq_scaled(&self, scale: Scale) -> Array1<f64> {
        scale.scale_array(&self.pts)
    }

    pub fn freq_scaled_at(&self, pt: usize, scale: Scale) -> f64 {
        scale.scale(self.pts[pt])
    }

    pub fn npts(&self) -> usize {
        self.pts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &f64> + '_ {
        self.pts.iter()
    }

    /// Angular frequency in rad/s
    pub fn w(&self) -> Array1<f64> {
        self.pts.map(|f| 2.0 * PI * f)
    }
}

fn check_range(start: f64, stop: f64, npts: usize) -> Result<()> {
    if npts == 0 {
        return Err(RfError::input("npts", "sweep needs at least one point"));
    }
    if npts == 1 && start != stop {
        return Err(RfError::input("npts", "single point sweep needs start == stop"));
    }
    if npts > 1 && stop <= start {
        return Err(RfError::input("stop", "stop must be above start"));
    }
    Ok(())
}

/// Builder design pattern for Frequency.
///
/// ## Example
/// ```
/// use rftoolbox::frequency::FrequencyBuilder;
/// use rftoolbox::scale::Scale;
/// use rftoolbox::unit::Sweep;
///
/// let freq = FrequencyBuilder::new()
///     .start_stop_step(1.0, 10.0, 10)
///     .scale(Scale::Giga)
///     .sweep(Sweep::Log)
///     .build()
///     .unwrap();
/// assert_eq!(freq.npts(), 10);
/// ```
pub struct FrequencyBuilder {
    start: f64,
    stop: f64,
    npts: usize,
    scale: Scale,
    sweep: Sweep,
}

impl Default for FrequencyBuilder {
    fn default() -> Self {
        FrequencyBuilder {
            start: 1.0,
            stop: 10.0,
            npts: 101,
            scale: Scale::Giga,
            sweep: Sweep::Linear,
        }
    }
}

impl FrequencyBuilder {
    pub fn new() -> Self {
        FrequencyBuilder::default()
    }

    pub fn start_stop_step(mut self, start: f64, stop: f64, npts: usize) -> Self {
        self.start = start;
        self.stop = stop;
        self.npts = npts;
        self
    }

    pub fn scale(mut self, scale: Scale) -> Self {
        self.scale = scale;
        self
    }

    pub fn sweep(mut self, sweep: Sweep) -> Self {
        self.sweep = sweep;
        self
    }

    pub fn build(self) -> Result<Frequency> {
        match self.sweep {
            Sweep::Linear => Frequency::from_lin_range(self.start, self.stop, self.npts, self.scale),
            Sweep::Log => Frequency::from_log_range(self.start, self.stop, self.npts, self.scale),
        }
    }
}
