//! Analog filter synthesis: prototypes, frequency transforms, ladder
//! realization and response evaluation.

pub mod elliptic;
pub mod ladder;
pub mod optimize;
pub mod prototype;
pub mod response;
pub mod transfer;
pub mod transform;

use crate::consts::MAX_FILTER_ORDER;
use crate::error::{Result, RfError};
use crate::scale::Scale;
use ladder::{synthesize_ladder, Ladder};
use log::debug;
use prototype::select_prototype;
use serde::{Deserialize, Serialize};
use simple_error::SimpleError;
use std::{fmt, str::FromStr};
use transfer::TransferFunction;
use transform::frequency_transform;

/// Filter topology
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Topology {
    #[default]
    Lowpass,
    Highpass,
    Bandpass,
    Bandstop,
}

impl Topology {
    pub fn to_str(&self) -> &str {
        match self {
            Topology::Lowpass => "lowpass",
            Topology::Highpass => "highpass",
            Topology::Bandpass => "bandpass",
            Topology::Bandstop => "bandstop",
        }
    }

    /// Bandpass and bandstop take two band edges
    pub fn is_band(&self) -> bool {
        matches!(self, Topology::Bandpass | Topology::Bandstop)
    }
}

impl FromStr for Topology {
    type Err = SimpleError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "lowpass" | "Lowpass" | "lp" | "LP" => Ok(Topology::Lowpass),
            "highpass" | "Highpass" | "hp" | "HP" => Ok(Topology::Highpass),
            "bandpass" | "Bandpass" | "bp" | "BP" => Ok(Topology::Bandpass),
            "bandstop" | "Bandstop" | "bs" | "BS" | "notch" => Ok(Topology::Bandstop),
            _ => simple_error::bail!("unknown filter topology: {}", s),
        }
    }
}

impl fmt::Display for Topology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_str())
    }
}

/// Approximation family of the lowpass prototype
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResponseFamily {
    /// Maximally flat magnitude
    #[default]
    Butterworth,
    /// Equiripple passband
    ChebyshevI,
    /// Equiripple stopband; the cutoff is the stopband edge
    ChebyshevII,
    /// Equiripple passband and stopband
    Elliptic,
    /// Maximally flat group delay, normalized to a delay of `1/ωc` at DC
    Bessel,
}

impl ResponseFamily {
    pub fn to_str(&self) -> &str {
        match self {
            ResponseFamily::Butterworth => "Butterworth",
            ResponseFamily::ChebyshevI => "Chebyshev I",
            ResponseFamily::ChebyshevII => "Chebyshev II",
            ResponseFamily::Elliptic => "elliptic",
            ResponseFamily::Bessel => "Bessel",
        }
    }

    pub fn uses_ripple(&self) -> bool {
        matches!(self, ResponseFamily::ChebyshevI | ResponseFamily::Elliptic)
    }

    pub fn uses_stopband(&self) -> bool {
        matches!(self, ResponseFamily::ChebyshevII | ResponseFamily::Elliptic)
    }
}

impl FromStr for ResponseFamily {
    type Err = SimpleError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "butterworth" | "Butterworth" | "butter" => Ok(ResponseFamily::Butterworth),
            "chebyshev1" | "Chebyshev I" | "cheby1" => Ok(ResponseFamily::ChebyshevI),
            "chebyshev2" | "Chebyshev II" | "cheby2" => Ok(ResponseFamily::ChebyshevII),
            "elliptic" | "Elliptic" | "ellip" | "cauer" => Ok(ResponseFamily::Elliptic),
            "bessel" | "Bessel" | "thomson" => Ok(ResponseFamily::Bessel),
            _ => simple_error::bail!("unknown response family: {}", s),
        }
    }
}

impl fmt::Display for ResponseFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_str())
    }
}

/// Band edges in Hz
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum Cutoffs {
    Single(f64),
    Band(f64, f64),
}

impl Cutoffs {
    /// Reference angular frequency: the cutoff, or the geometric band center
    pub fn omega_ref(&self) -> f64 {
        let f = match *self {
            Cutoffs::Single(fc) => fc,
            Cutoffs::Band(f1, f2) => (f1 * f2).sqrt(),
        };
        2.0 * std::f64::consts::PI * f
    }

    /// Checks the edges against a topology
    pub fn validate(&self, topology: Topology) -> Result<()> {
        match (*self, topology.is_band()) {
            (Cutoffs::Single(fc), false) => {
                check_freq("cutoff", fc)?;
                Ok(())
            }
            (Cutoffs::Band(f1, f2), true) => {
                check_freq("cutoff1", f1)?;
                check_freq("cutoff2", f2)?;
                if f1 >= f2 {
                    return Err(RfError::spec(format!(
                        "{} needs cutoff1 < cutoff2, got {} Hz and {} Hz",
                        topology, f1, f2
                    )));
                }
                Ok(())
            }
            (Cutoffs::Single(_), true) => Err(RfError::spec(format!(
                "{} needs two band edges",
                topology
            ))),
            (Cutoffs::Band(..), false) => Err(RfError::spec(format!(
                "{} takes a single cutoff",
                topology
            ))),
        }
    }
}

fn check_freq(param: &str, f: f64) -> Result<()> {
    if f.is_finite() && f > 0.0 {
        Ok(())
    } else {
        Err(RfError::input(param, format!("must be a positive frequency, got {}", f)))
    }
}

/// Complete description of an analog filter request.
/// Frequencies are in Hz, ripple and attenuation in dB.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FilterSpec {
    topology: Topology,
    family: ResponseFamily,
    order: usize,
    cutoff1: f64,
    cutoff2: f64,
    ripple_db: f64,
    stopband_db: f64,
    z0: f64,
}

impl FilterSpec {
    pub fn topology(&self) -> Topology {
        self.topology
    }

    pub fn family(&self) -> ResponseFamily {
        self.family
    }

    pub fn order(&self) -> usize {
        self.order
    }

    pub fn cutoff1(&self) -> f64 {
        self.cutoff1
    }

    /// Upper band edge; ignored for lowpass and highpass
    pub fn cutoff2(&self) -> f64 {
        self.cutoff2
    }

    pub fn ripple_db(&self) -> f64 {
        self.ripple_db
    }

    pub fn stopband_db(&self) -> f64 {
        self.stopband_db
    }

    pub fn z0(&self) -> f64 {
        self.z0
    }

    pub fn cutoffs(&self) -> Cutoffs {
        if self.topology.is_band() {
            Cutoffs::Band(self.cutoff1, self.cutoff2)
        } else {
            Cutoffs::Single(self.cutoff1)
        }
    }

    /// Same request at a different order
    pub fn with_order(&self, order: usize) -> Result<FilterSpec> {
        let spec = FilterSpec {
            order,
            ..self.clone()
        };
        spec.validate()?;
        Ok(spec)
    }

    pub fn validate(&self) -> Result<()> {
        if self.order == 0 || self.order > MAX_FILTER_ORDER {
            return Err(RfError::spec(format!(
                "order must be between 1 and {}, got {}",
                MAX_FILTER_ORDER, self.order
            )));
        }
        self.cutoffs().validate(self.topology)?;
        if !(self.z0.is_finite() && self.z0 > 0.0) {
            return Err(RfError::input("z0", format!("must be positive, got {}", self.z0)));
        }
        prototype::check_ripple(self.family, self.ripple_db, self.stopband_db)
    }

    /// Prototype of the requested family transformed to the requested band
    pub fn transfer_function(&self) -> Result<TransferFunction> {
        self.validate()?;
        let proto = select_prototype(self.order, self.family, self.ripple_db, self.stopband_db)?;
        frequency_transform(&proto, self.topology, self.cutoffs())
    }
}

impl Default for FilterSpec {
    fn default() -> Self {
        FilterSpec {
            topology: Topology::Lowpass,
            family: ResponseFamily::Butterworth,
            order: 4,
            cutoff1: 1e9,
            cutoff2: 2e9,
            ripple_db: 1.0,
            stopband_db: 40.0,
            z0: 50.0,
        }
    }
}

impl fmt::Display for FilterSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let f1 = Scale::engineering(self.cutoff1);
        write!(
            f,
            "order {} {} {} at {} {}Hz",
            self.order,
            self.family,
            self.topology,
            f1.scale(self.cutoff1),
            f1
        )?;
        if self.topology.is_band() {
            let f2 = Scale::engineering(self.cutoff2);
            write!(f, " to {} {}Hz", f2.scale(self.cutoff2), f2)?;
        }
        write!(f, " ({} Ω)", self.z0)
    }
}

/// Builder design pattern for FilterSpec.
///
/// ## Example
/// ```
/// use rftoolbox::filter::{FilterSpecBuilder, ResponseFamily, Topology};
/// use rftoolbox::scale::Scale;
///
/// let spec = FilterSpecBuilder::new()
///     .topology(Topology::Bandpass)
///     .family(ResponseFamily::ChebyshevI)
///     .order(3)
///     .band_scaled(2.3, 2.5, Scale::Giga)
///     .ripple_db(0.5)
///     .build()
///     .unwrap();
/// assert_eq!(spec.cutoff2(), 2.5e9);
/// ```
#[derive(Default)]
pub struct FilterSpecBuilder {
    spec: FilterSpec,
}

impl FilterSpecBuilder {
    pub fn new() -> Self {
        FilterSpecBuilder::default()
    }

    pub fn topology(mut self, topology: Topology) -> Self {
        self.spec.topology = topology;
        self
    }

    pub fn family(mut self, family: ResponseFamily) -> Self {
        self.spec.family = family;
        self
    }

    pub fn order(mut self, order: usize) -> Self {
        self.spec.order = order;
        self
    }

    /// Cutoff in Hz for lowpass/highpass, lower edge for bandpass/bandstop
    pub fn cutoff(mut self, freq: f64) -> Self {
        self.spec.cutoff1 = freq;
        self
    }

    pub fn cutoff_scaled(self, freq: f64, scale: Scale) -> Self {
        self.cutoff(scale.unscale(freq))
    }

    pub fn band(mut self, lower: f64, upper: f64) -> Self {
        self.spec.cutoff1 = lower;
        self.spec.cutoff2 = upper;
        self
    }

    pub fn band_scaled(self, lower: f64, upper: f64, scale: Scale) -> Self {
        self.band(scale.unscale(lower), scale.unscale(upper))
    }

    pub fn ripple_db(mut self, ripple: f64) -> Self {
        self.spec.ripple_db = ripple;
        self
    }

    pub fn stopband_db(mut self, atten: f64) -> Self {
        self.spec.stopband_db = atten;
        self
    }

    pub fn z0(mut self, z0: f64) -> Self {
        self.spec.z0 = z0;
        self
    }

    pub fn build(self) -> Result<FilterSpec> {
        self.spec.validate()?;
        Ok(self.spec)
    }
}

/// Result of [`design_filter`]
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FilterDesign {
    pub spec: FilterSpec,
    pub transfer: TransferFunction,
    /// Lumped realization; only Butterworth responses have one
    pub ladder: Option<Ladder>,
}

/// Transfer function plus, for Butterworth responses, the lumped ladder
pub fn design_filter(spec: &FilterSpec) -> Result<FilterDesign> {
    let transfer = spec.transfer_function()?;
    let ladder = match spec.family {
        ResponseFamily::Butterworth => {
            Some(synthesize_ladder(&transfer, spec.z0, spec.topology)?)
        }
        _ => None,
    };
    debug!(
        "designed {}: {} poles, {} zeros, ladder {}",
        spec,
        transfer.poles().len(),
        transfer.zeros().len(),
        if ladder.is_some() { "yes" } else { "no" }
    );
    Ok(FilterDesign {
        spec: spec.clone(),
        transfer,
        ladder,
    })
}

#[cfg(test)]
mod filter_tests {
    use super::*;

    #[test]
    fn test_enums_from_str() {
        assert_eq!(Topology::from_str("bp").unwrap(), Topology::Bandpass);
        assert_eq!(Topology::from_str("notch").unwrap(), Topology::Bandstop);
        assert!(Topology::from_str("allpass").is_err());
        assert_eq!(
            ResponseFamily::from_str("cheby2").unwrap(),
            ResponseFamily::ChebyshevII
        );
        assert!(ResponseFamily::from_str("gaussian").is_err());
        assert_eq!(Topology::Highpass.to_string(), "highpass");
    }

    #[test]
    fn test_builder_defaults() {
        let spec = FilterSpecBuilder::new().build().unwrap();
        assert_eq!(spec, FilterSpec::default());
        assert_eq!(spec.cutoffs(), Cutoffs::Single(1e9));
        assert_eq!(spec.to_string(), "order 4 Butterworth lowpass at 1 GHz (50 Ω)");
    }

    #[test]
    fn test_band_edges() {
        let err = FilterSpecBuilder::new()
            .topology(Topology::Bandpass)
            .band(2e9, 1e9)
            .build()
            .unwrap_err();
        assert!(matches!(err, RfError::InvalidSpec(_)));

        let err = FilterSpecBuilder::new()
            .topology(Topology::Bandstop)
            .band(1e9, 1e9)
            .build()
            .unwrap_err();
        assert!(matches!(err, RfError::InvalidSpec(_)));

        let spec = FilterSpecBuilder::new()
            .topology(Topology::Bandstop)
            .band_scaled(1.0, 2.0, Scale::Giga)
            .build()
            .unwrap();
        assert_eq!(spec.cutoffs(), Cutoffs::Band(1e9, 2e9));
        assert_eq!(
            spec.to_string(),
            "order 4 Butterworth bandstop at 1 GHz to 2 GHz (50 Ω)"
        );
    }

    #[test]
    fn test_invalid_values() {
        let err = FilterSpecBuilder::new().order(0).build().unwrap_err();
        assert!(matches!(err, RfError::InvalidSpec(_)));
        let err = FilterSpecBuilder::new().order(21).build().unwrap_err();
        assert!(matches!(err, RfError::InvalidSpec(_)));
        let err = FilterSpecBuilder::new().cutoff(-1.0).build().unwrap_err();
        assert!(matches!(err, RfError::InvalidInput { .. }));
        let err = FilterSpecBuilder::new().z0(0.0).build().unwrap_err();
        assert!(matches!(err, RfError::InvalidInput { .. }));
        let err = FilterSpecBuilder::new()
            .family(ResponseFamily::ChebyshevI)
            .ripple_db(0.0)
            .build()
            .unwrap_err();
        assert!(matches!(err, RfError::InvalidInput { .. }));
        let err = FilterSpecBuilder::new()
            .family(ResponseFamily::Elliptic)
            .ripple_db(3.0)
            .stopband_db(2.0)
            .build()
            .unwrap_err();
        assert!(matches!(err, RfError::InvalidSpec(_)));

        let spec = FilterSpec::default();
        assert!(spec.with_order(0).is_err());
        assert_eq!(spec.with_order(7).unwrap().order(), 7);
    }

    #[test]
    fn test_cutoffs_omega_ref() {
        let w = Cutoffs::Band(1e9, 4e9).omega_ref();
        assert!((w - 2.0 * std::f64::consts::PI * 2e9).abs() < 1e-3);
    }

    #[test]
    fn test_design_filter() {
        let design = design_filter(&FilterSpec::default()).unwrap();
        assert_eq!(design.transfer.poles().len(), 4);
        assert_eq!(design.ladder.unwrap().reactive_count(), 4);

        let spec = FilterSpecBuilder::new()
            .family(ResponseFamily::Elliptic)
            .build()
            .unwrap();
        let design = design_filter(&spec).unwrap();
        assert!(design.ladder.is_none());
        assert_eq!(design.transfer.zeros().len(), 4);
    }
}
