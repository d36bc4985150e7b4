use super::response::evaluate_response;
use super::{FilterSpec, Topology};
use crate::consts::MAX_FILTER_ORDER;
use crate::error::{Result, RfError};
use crate::frequency::Frequency;
use crate::scale::Scale;
use log::debug;
use serde::{Deserialize, Serialize};

/// Which stopband sample decides whether a design meets the target
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum StopbandCriterion {
    /// The smallest magnitude over the windows must reach the target
    #[default]
    Deepest,
    /// Every sample in the windows must reach the target
    Worst,
}

/// Where the bandstop window sits relative to `[f1, f2]`
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum BandstopWindow {
    /// From `lower · f1` to `upper · f2`, straddling both band edges
    Spanning { lower: f64, upper: f64 },
    /// Inside `[f1, f2]`, with `trim` of the width cut from each side
    Trimmed { trim: f64 },
}

impl Default for BandstopWindow {
    fn default() -> Self {
        BandstopWindow::Spanning {
            lower: 0.5,
            upper: 2.0,
        }
    }
}

/// Settings of the minimum-order search.
///
/// The stopband is sampled in windows placed relative to the band edges:
/// above `lowpass_factor · fc` for lowpass, below `highpass_factor · fc` for
/// highpass, outside `[bandpass_lower · f1, bandpass_upper · f2]` for bandpass
/// and per [`BandstopWindow`] for bandstop. The windows reach `decades`
/// beyond their band-side edge.
///
/// With the default [`StopbandCriterion::Deepest`] a design passes as soon as
/// the smallest sampled magnitude is at most `-target_db`.
/// [`OrderSearch::strict`] asks the same of the largest sample instead.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OrderSearch {
    pub max_order: usize,
    pub points_per_decade: usize,
    pub decades: f64,
    pub lowpass_factor: f64,
    pub highpass_factor: f64,
    pub bandpass_lower: f64,
    pub bandpass_upper: f64,
    pub bandstop: BandstopWindow,
    pub criterion: StopbandCriterion,
}

impl Default for OrderSearch {
    fn default() -> Self {
        OrderSearch {
            max_order: MAX_FILTER_ORDER,
            points_per_decade: 200,
            decades: 3.0,
            lowpass_factor: 2.0,
            highpass_factor: 0.5,
            bandpass_lower: 0.5,
            bandpass_upper: 2.0,
            bandstop: BandstopWindow::default(),
            criterion: StopbandCriterion::default(),
        }
    }
}

impl OrderSearch {
    pub fn new() -> Self {
        OrderSearch::default()
    }

    /// Every stopband sample must meet the target, and the bandstop window
    /// keeps to the middle half of the stop band
    pub fn strict() -> Self {
        OrderSearch::default()
            .criterion(StopbandCriterion::Worst)
            .bandstop_trim(0.25)
    }

    pub fn max_order(mut self, max_order: usize) -> Self {
        self.max_order = max_order;
        self
    }

    pub fn points_per_decade(mut self, npts: usize) -> Self {
        self.points_per_decade = npts;
        self
    }

    pub fn decades(mut self, decades: f64) -> Self {
        self.decades = decades;
        self
    }

    pub fn lowpass_factor(mut self, factor: f64) -> Self {
        self.lowpass_factor = factor;
        self
    }

    pub fn highpass_factor(mut self, factor: f64) -> Self {
        self.highpass_factor = factor;
        self
    }

    pub fn bandpass_factors(mut self, lower: f64, upper: f64) -> Self {
        self.bandpass_lower = lower;
        self.bandpass_upper = upper;
        self
    }

    pub fn bandstop_factors(mut self, lower: f64, upper: f64) -> Self {
        self.bandstop = BandstopWindow::Spanning { lower, upper };
        self
    }

    pub fn bandstop_trim(mut self, trim: f64) -> Self {
        self.bandstop = BandstopWindow::Trimmed { trim };
        self
    }

    pub fn criterion(mut self, criterion: StopbandCriterion) -> Self {
        self.criterion = criterion;
        self
    }

    fn points_for(&self, lo: f64, hi: f64) -> usize {
        ((self.points_per_decade as f64 * (hi / lo).log10()).ceil() as usize).max(2)
    }

    fn window(&self, lo: f64, hi: f64) -> Result<Frequency> {
        if !(lo > 0.0 && lo < hi && hi.is_finite()) {
            return Err(RfError::spec(format!(
                "empty stopband window from {} Hz to {} Hz",
                lo, hi
            )));
        }
        Frequency::from_log_range(lo, hi, self.points_for(lo, hi), Scale::Base)
    }

    /// Stopband sample windows for `spec`
    pub fn windows(&self, spec: &FilterSpec) -> Result<Vec<Frequency>> {
        if self.points_per_decade < 2 || !(self.decades.is_finite() && self.decades > 0.0) {
            return Err(RfError::spec("order search needs at least 2 points and a positive span"));
        }
        let span = 10f64.powf(self.decades);
        let (f1, f2) = (spec.cutoff1(), spec.cutoff2());
        match spec.topology() {
            Topology::Lowpass => {
                check_factor("lowpass_factor", self.lowpass_factor, true)?;
                let lo = f1 * self.lowpass_factor;
                Ok(vec![self.window(lo, lo * span)?])
            }
            Topology::Highpass => {
                check_factor("highpass_factor", self.highpass_factor, false)?;
                let hi = f1 * self.highpass_factor;
                Ok(vec![self.window(hi / span, hi)?])
            }
            Topology::Bandpass => {
                check_factor("bandpass_lower", self.bandpass_lower, false)?;
                check_factor("bandpass_upper", self.bandpass_upper, true)?;
                let hi = f1 * self.bandpass_lower;
                let lo = f2 * self.bandpass_upper;
                Ok(vec![self.window(hi / span, hi)?, self.window(lo, lo * span)?])
            }
            Topology::Bandstop => match self.bandstop {
                BandstopWindow::Spanning { lower, upper } => {
                    check_factor("bandstop lower", lower, false)?;
                    check_factor("bandstop upper", upper, true)?;
                    Ok(vec![self.window(f1 * lower, f2 * upper)?])
                }
                BandstopWindow::Trimmed { trim } => {
                    if !(trim.is_finite() && (0.0..0.5).contains(&trim)) {
                        return Err(RfError::spec(format!(
                            "bandstop trim {} must lie in [0, 0.5)",
                            trim
                        )));
                    }
                    let cut = trim * (f2 - f1);
                    Ok(vec![self.window(f1 + cut, f2 - cut)?])
                }
            },
        }
    }

    /// Stopband magnitude in dB that [`OrderSearch::run`] compares against
    /// the target: the smallest sample for [`StopbandCriterion::Deepest`], the
    /// largest for [`StopbandCriterion::Worst`]
    pub fn stopband_db(&self, spec: &FilterSpec) -> Result<f64> {
        let tf = spec.transfer_function()?;
        let windows = self.windows(spec)?;
        let mut level = match self.criterion {
            StopbandCriterion::Deepest => f64::INFINITY,
            StopbandCriterion::Worst => f64::NEG_INFINITY,
        };
        for window in windows {
            let resp = evaluate_response(&tf, &window)?;
            level = match self.criterion {
                StopbandCriterion::Deepest => level.min(resp.min_mag_db()),
                StopbandCriterion::Worst => level.max(resp.max_mag_db()),
            };
        }
        Ok(level)
    }

    /// Smallest order, starting from `spec.order()`, whose stopband meets
    /// `target_db` of attenuation. A spec that already meets the target comes
    /// back unchanged.
    pub fn run(&self, spec: &FilterSpec, target_db: f64) -> Result<FilterSpec> {
        if !(target_db.is_finite() && target_db > 0.0) {
            return Err(RfError::input(
                "target_db",
                format!("stopband target must be a positive attenuation, got {}", target_db),
            ));
        }
        spec.validate()?;
        let max_order = self.max_order.min(MAX_FILTER_ORDER);
        self.windows(spec)?;

        let mut achieved = f64::NEG_INFINITY;
        for order in spec.order()..=max_order {
            let candidate = spec.with_order(order)?;
            let level = self.stopband_db(&candidate)?;
            debug!(
                "order search: {} {} order {} stopband {:.2} dB ({:?}, target -{} dB)",
                spec.family(),
                spec.topology(),
                order,
                level,
                self.criterion,
                target_db
            );
            if level <= -target_db {
                return Ok(candidate);
            }
            achieved = achieved.max(-level);
        }
        Err(RfError::UnreachableTarget {
            target_db,
            max_order,
            achieved_db: achieved,
        })
    }
}

fn check_factor(name: &str, factor: f64, above_one: bool) -> Result<()> {
    let ok = factor.is_finite() && if above_one { factor > 1.0 } else { factor > 0.0 && factor < 1.0 };
    if ok {
        Ok(())
    } else {
        Err(RfError::spec(format!(
            "{} = {} puts the stopband window inside the passband",
            name, factor
        )))
    }
}

/// [`OrderSearch::run`] with default settings
pub fn optimize_order(spec: &FilterSpec, target_db: f64) -> Result<FilterSpec> {
    OrderSearch::default().run(spec, target_db)
}
