//! Point-to-point RF link budget.

use crate::antenna::AntennaParams;
use crate::consts::{C0, THERMAL_NOISE_DBM_HZ};
use crate::error::{Result, RfError};
use crate::scale::Scale;
use crate::tline::ReflectionState;
use log::debug;
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use simple_error::SimpleError;
use std::f64::consts::PI;
use std::{fmt, str::FromStr};

/// Margin below which [`LinkBudget::suggestions`] proposes changes
pub const MIN_LINK_MARGIN_DB: f64 = 10.0;
/// SNR assumed by the computed receiver sensitivity
pub const REQUIRED_SNR_DB: f64 = 6.0;
const MAX_TX_POWER_DBM: f64 = 30.0;
const MAX_ANTENNA_GAIN_DBI: f64 = 20.0;
const TARGET_EFFICIENCY: f64 = 0.95;
const LOW_NOISE_FIGURE_DB: f64 = 1.5;
const SUGGESTION_STEP_DB: f64 = 5.0;

/// Propagation environment, each adding a fixed excess loss to free space
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    #[default]
    FreeSpace,
    Urban,
    Suburban,
    Rural,
    Indoor,
}

impl Environment {
    /// Excess loss over free space in dB
    pub fn extra_loss_db(&self) -> f64 {
        match self {
            Environment::FreeSpace => 0.0,
            Environment::Urban => 25.0,
            Environment::Suburban => 15.0,
            Environment::Rural => 7.0,
            Environment::Indoor => 20.0,
        }
    }

    pub fn to_str(&self) -> &str {
        match self {
            Environment::FreeSpace => "free space",
            Environment::Urban => "urban",
            Environment::Suburban => "suburban",
            Environment::Rural => "rural",
            Environment::Indoor => "indoor",
        }
    }
}

impl FromStr for Environment {
    type Err = SimpleError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "free space" | "free" | "FreeSpace" | "freespace" => Ok(Environment::FreeSpace),
            "urban" | "Urban" => Ok(Environment::Urban),
            "suburban" | "Suburban" => Ok(Environment::Suburban),
            "rural" | "Rural" => Ok(Environment::Rural),
            "indoor" | "Indoor" => Ok(Environment::Indoor),
            _ => simple_error::bail!("unknown environment: {}", s),
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_str())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComponentKind {
    Amplifier,
    Filter,
    #[default]
    Cable,
    Splitter,
    Coupler,
    Attenuator,
    Mismatch,
}

impl ComponentKind {
    pub fn to_str(&self) -> &str {
        match self {
            ComponentKind::Amplifier => "amplifier",
            ComponentKind::Filter => "filter",
            ComponentKind::Cable => "cable",
            ComponentKind::Splitter => "splitter",
            ComponentKind::Coupler => "coupler",
            ComponentKind::Attenuator => "attenuator",
            ComponentKind::Mismatch => "mismatch",
        }
    }
}

impl FromStr for ComponentKind {
    type Err = SimpleError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "amplifier" | "amp" => Ok(ComponentKind::Amplifier),
            "filter" => Ok(ComponentKind::Filter),
            "cable" => Ok(ComponentKind::Cable),
            "splitter" | "divider" => Ok(ComponentKind::Splitter),
            "coupler" => Ok(ComponentKind::Coupler),
            "attenuator" | "pad" => Ok(ComponentKind::Attenuator),
            "mismatch" => Ok(ComponentKind::Mismatch),
            _ => simple_error::bail!("unknown component kind: {}", s),
        }
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_str())
    }
}

/// In-line component with a loss in dB. Gain (an amplifier) is a negative loss.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Component {
    pub kind: ComponentKind,
    pub loss_db: f64,
    pub note: String,
}

impl Component {
    pub fn new(kind: ComponentKind, loss_db: f64, note: &str) -> Self {
        Component {
            kind,
            loss_db,
            note: note.to_string(),
        }
    }
}

/// Free-space path loss in dB for `freq` in Hz over `distance` in meters
pub fn fspl_db(freq: f64, distance: f64) -> Result<f64> {
    if !(freq.is_finite() && freq > 0.0) {
        return Err(RfError::input("frequency", format!("must be positive, got {}", freq)));
    }
    if !(distance.is_finite() && distance > 0.0) {
        return Err(RfError::input("distance", format!("must be positive, got {}", distance)));
    }
    Ok(20.0 * distance.log10() + 20.0 * freq.log10() + 20.0 * (4.0 * PI / C0).log10())
}

fn efficiency_db(param: &str, eff: f64) -> Result<f64> {
    if eff.is_finite() && eff > 0.0 && eff <= 1.0 {
        Ok(10.0 * eff.log10())
    } else {
        Err(RfError::input(param, format!("must lie in (0, 1], got {}", eff)))
    }
}

fn finite(param: &str, val: f64) -> Result<()> {
    if val.is_finite() {
        Ok(())
    } else {
        Err(RfError::input(param, format!("must be finite, got {}", val)))
    }
}

fn non_negative(param: &str, val: f64) -> Result<()> {
    if val.is_finite() && val >= 0.0 {
        Ok(())
    } else {
        Err(RfError::input(param, format!("must be non-negative, got {}", val)))
    }
}

/// Link parameters. Powers in dBm, gains in dBi, losses in dB, frequency and
/// bandwidth in Hz, distance in meters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LinkBudget {
    freq: f64,
    distance: f64,
    environment: Environment,
    polarization_loss_db: f64,
    rain_loss_db: f64,
    atmospheric_loss_db: f64,
    tx_power_dbm: f64,
    tx_efficiency: f64,
    tx_gain_dbi: f64,
    tx_antenna_efficiency: f64,
    rx_gain_dbi: f64,
    rx_antenna_efficiency: f64,
    noise_figure_db: f64,
    bandwidth: f64,
    required_sensitivity_dbm: f64,
    components: Vec<Component>,
}

impl Default for LinkBudget {
    fn default() -> Self {
        LinkBudget {
            freq: 2.4e9,
            distance: 1e3,
            environment: Environment::FreeSpace,
            polarization_loss_db: 3.0,
            rain_loss_db: 0.0,
            atmospheric_loss_db: 0.5,
            tx_power_dbm: 20.0,
            tx_efficiency: 0.8,
            tx_gain_dbi: 10.0,
            tx_antenna_efficiency: 0.9,
            rx_gain_dbi: 10.0,
            rx_antenna_efficiency: 0.9,
            noise_figure_db: 3.0,
            bandwidth: 20e6,
            required_sensitivity_dbm: -100.0,
            components: Vec::new(),
        }
    }
}

/// Computed link figures
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LinkResult {
    pub fspl_db: f64,
    /// Free-space loss plus the environment excess
    pub propagation_loss_db: f64,
    pub total_path_loss_db: f64,
    pub tx_power_eff_dbm: f64,
    pub tx_gain_eff_dbi: f64,
    pub rx_gain_eff_dbi: f64,
    pub component_loss_db: f64,
    pub received_power_dbm: f64,
    pub noise_power_dbm: f64,
    /// Noise power plus [`REQUIRED_SNR_DB`]
    pub sensitivity_dbm: f64,
    pub margin_db: f64,
    pub snr_db: f64,
}

/// One step of the power cascade from transmitter to receiver
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LinkStage {
    pub name: &'static str,
    pub delta_db: f64,
    pub level_dbm: f64,
}

impl LinkResult {
    /// Power level after each stage. The last level equals the received power.
    pub fn cascade(&self) -> Vec<LinkStage> {
        let steps = [
            ("tx antenna gain", self.tx_gain_eff_dbi),
            ("path loss", -self.total_path_loss_db),
            ("component loss", -self.component_loss_db),
            ("rx antenna gain", self.rx_gain_eff_dbi),
        ];
        let mut level = self.tx_power_eff_dbm;
        let mut stages = vec![LinkStage {
            name: "tx power",
            delta_db: level,
            level_dbm: level,
        }];
        for (name, delta) in steps {
            level += delta;
            stages.push(LinkStage {
                name,
                delta_db: delta,
                level_dbm: level,
            });
        }
        stages
    }
}

/// Change that would raise a weak link margin
#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum Suggestion {
    IncreaseTxPower { to_dbm: f64 },
    IncreaseTxGain { to_dbi: f64 },
    IncreaseRxGain { to_dbi: f64 },
    ReduceComponentLoss { current_db: f64 },
    ImproveTxEfficiency,
    ImproveRxEfficiency,
    LowerNoiseFigure,
}

impl fmt::Display for Suggestion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Suggestion::IncreaseTxPower { to_dbm } => {
                write!(f, "increase transmit power to {} dBm", to_dbm)
            }
            Suggestion::IncreaseTxGain { to_dbi } => {
                write!(f, "increase transmit antenna gain to {} dBi", to_dbi)
            }
            Suggestion::IncreaseRxGain { to_dbi } => {
                write!(f, "increase receive antenna gain to {} dBi", to_dbi)
            }
            Suggestion::ReduceComponentLoss { current_db } => {
                write!(f, "reduce component losses (now {:.2} dB)", current_db)
            }
            Suggestion::ImproveTxEfficiency => write!(f, "improve transmit antenna efficiency"),
            Suggestion::ImproveRxEfficiency => write!(f, "improve receive antenna efficiency"),
            Suggestion::LowerNoiseFigure => write!(f, "lower the receiver noise figure"),
        }
    }
}

impl LinkBudget {
    pub fn freq(&self) -> f64 {
        self.freq
    }

    pub fn distance(&self) -> f64 {
        self.distance
    }

    pub fn environment(&self) -> Environment {
        self.environment
    }

    pub fn tx_power_dbm(&self) -> f64 {
        self.tx_power_dbm
    }

    pub fn tx_gain_dbi(&self) -> f64 {
        self.tx_gain_dbi
    }

    pub fn rx_gain_dbi(&self) -> f64 {
        self.rx_gain_dbi
    }

    pub fn noise_figure_db(&self) -> f64 {
        self.noise_figure_db
    }

    pub fn bandwidth(&self) -> f64 {
        self.bandwidth
    }

    pub fn required_sensitivity_dbm(&self) -> f64 {
        self.required_sensitivity_dbm
    }

    pub fn components(&self) -> &[Component] {
        &self.components
    }

    /// Sum of the component losses in dB
    pub fn component_loss_db(&self) -> f64 {
        self.components.iter().map(|c| c.loss_db).sum()
    }

    /// Same link over another distance
    pub fn with_distance(&self, distance: f64) -> LinkBudget {
        LinkBudget {
            distance,
            ..self.clone()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.bandwidth.is_finite() && self.bandwidth > 0.0) {
            return Err(RfError::input("bandwidth", format!("must be positive, got {}", self.bandwidth)));
        }
        non_negative("polarization_loss", self.polarization_loss_db)?;
        non_negative("rain_loss", self.rain_loss_db)?;
        non_negative("atmospheric_loss", self.atmospheric_loss_db)?;
        non_negative("noise_figure", self.noise_figure_db)?;
        finite("tx_power", self.tx_power_dbm)?;
        finite("tx_gain", self.tx_gain_dbi)?;
        finite("rx_gain", self.rx_gain_dbi)?;
        finite("required_sensitivity", self.required_sensitivity_dbm)?;
        for c in self.components.iter() {
            finite(c.kind.to_str(), c.loss_db)?;
        }
        Ok(())
    }

    fn path_loss_db(&self, distance: f64) -> Result<(f64, f64, f64)> {
        let fspl = fspl_db(self.freq, distance)?;
        let propagation = fspl + self.environment.extra_loss_db();
        let total = propagation + self.polarization_loss_db + self.rain_loss_db + self.atmospheric_loss_db;
        Ok((fspl, propagation, total))
    }

    /// Received power, noise, sensitivity, margin and SNR
    pub fn compute(&self) -> Result<LinkResult> {
        self.validate()?;
        let (fspl, propagation, total) = self.path_loss_db(self.distance)?;
        let tx_power_eff = self.tx_power_dbm + efficiency_db("tx_efficiency", self.tx_efficiency)?;
        let tx_gain_eff = self.tx_gain_dbi + efficiency_db("tx_antenna_efficiency", self.tx_antenna_efficiency)?;
        let rx_gain_eff = self.rx_gain_dbi + efficiency_db("rx_antenna_efficiency", self.rx_antenna_efficiency)?;
        let component_loss = self.component_loss_db();

        let received = tx_power_eff + tx_gain_eff - total - component_loss + rx_gain_eff;
        let noise = THERMAL_NOISE_DBM_HZ + 10.0 * self.bandwidth.log10() + self.noise_figure_db;
        let result = LinkResult {
            fspl_db: fspl,
            propagation_loss_db: propagation,
            total_path_loss_db: total,
            tx_power_eff_dbm: tx_power_eff,
            tx_gain_eff_dbi: tx_gain_eff,
            rx_gain_eff_dbi: rx_gain_eff,
            component_loss_db: component_loss,
            received_power_dbm: received,
            noise_power_dbm: noise,
            sensitivity_dbm: noise + REQUIRED_SNR_DB,
            margin_db: received - self.required_sensitivity_dbm,
            snr_db: received - noise,
        };
        debug!(
            "link {} over {} m ({}): received {:.2} dBm, margin {:.2} dB",
            self.freq, self.distance, self.environment, result.received_power_dbm, result.margin_db
        );
        Ok(result)
    }

    /// Changes worth making when the margin is under [`MIN_LINK_MARGIN_DB`].
    /// Empty when the link already has enough margin.
    pub fn suggestions(&self) -> Result<Vec<Suggestion>> {
        let result = self.compute()?;
        let mut out = Vec::new();
        if result.margin_db >= MIN_LINK_MARGIN_DB {
            return Ok(out);
        }
        if self.tx_power_dbm < MAX_TX_POWER_DBM {
            out.push(Suggestion::IncreaseTxPower {
                to_dbm: self.tx_power_dbm + SUGGESTION_STEP_DB,
            });
        }
        if self.tx_gain_dbi < MAX_ANTENNA_GAIN_DBI {
            out.push(Suggestion::IncreaseTxGain {
                to_dbi: self.tx_gain_dbi + SUGGESTION_STEP_DB,
            });
        }
        if self.rx_gain_dbi < MAX_ANTENNA_GAIN_DBI {
            out.push(Suggestion::IncreaseRxGain {
                to_dbi: self.rx_gain_dbi + SUGGESTION_STEP_DB,
            });
        }
        if result.component_loss_db > 0.0 {
            out.push(Suggestion::ReduceComponentLoss {
                current_db: result.component_loss_db,
            });
        }
        if self.tx_antenna_efficiency < TARGET_EFFICIENCY {
            out.push(Suggestion::ImproveTxEfficiency);
        }
        if self.rx_antenna_efficiency < TARGET_EFFICIENCY {
            out.push(Suggestion::ImproveRxEfficiency);
        }
        if self.noise_figure_db > LOW_NOISE_FIGURE_DB {
            out.push(Suggestion::LowerNoiseFigure);
        }
        Ok(out)
    }

    /// Link margin in dB at each distance in meters
    pub fn margin_vs_distance(&self, distances: &[f64]) -> Result<Array1<f64>> {
        let base = self.compute()?;
        let fixed = base.tx_power_eff_dbm + base.tx_gain_eff_dbi + base.rx_gain_eff_dbi
            - base.component_loss_db
            - self.required_sensitivity_dbm;
        distances
            .iter()
            .map(|&d| Ok(fixed - self.path_loss_db(d)?.2))
            .collect::<Result<Vec<f64>>>()
            .map(Array1::from)
    }
}

/// Builder design pattern for LinkBudget.
///
/// ## Example
/// ```
/// use rftoolbox::link::{ComponentKind, Environment, LinkBudgetBuilder};
/// use rftoolbox::scale::Scale;
///
/// let link = LinkBudgetBuilder::new()
///     .freq_scaled(5.8, Scale::Giga)
///     .distance_scaled(2.0, Scale::Kilo)
///     .environment(Environment::Suburban)
///     .component(ComponentKind::Cable, 1.5, "feeder")
///     .build();
/// let result = link.compute().unwrap();
/// assert!(result.received_power_dbm < link.tx_power_dbm());
/// ```
#[derive(Default)]
pub struct LinkBudgetBuilder {
    link: LinkBudget,
}

impl LinkBudgetBuilder {
    pub fn new() -> Self {
        LinkBudgetBuilder::default()
    }

    pub fn freq(mut self, freq: f64) -> Self {
        self.link.freq = freq;
        self
    }

    pub fn freq_scaled(self, freq: f64, scale: Scale) -> Self {
        self.freq(scale.unscale(freq))
    }

    pub fn distance(mut self, distance: f64) -> Self {
        self.link.distance = distance;
        self
    }

    pub fn distance_scaled(self, distance: f64, scale: Scale) -> Self {
        self.distance(scale.unscale(distance))
    }

    pub fn environment(mut self, environment: Environment) -> Self {
        self.link.environment = environment;
        self
    }

    pub fn polarization_loss_db(mut self, loss: f64) -> Self {
        self.link.polarization_loss_db = loss;
        self
    }

    pub fn rain_loss_db(mut self, loss: f64) -> Self {
        self.link.rain_loss_db = loss;
        self
    }

    pub fn atmospheric_loss_db(mut self, loss: f64) -> Self {
        self.link.atmospheric_loss_db = loss;
        self
    }

    pub fn tx_power_dbm(mut self, power: f64) -> Self {
        self.link.tx_power_dbm = power;
        self
    }

    pub fn tx_efficiency(mut self, eff: f64) -> Self {
        self.link.tx_efficiency = eff;
        self
    }

    pub fn tx_gain_dbi(mut self, gain: f64) -> Self {
        self.link.tx_gain_dbi = gain;
        self
    }

    pub fn tx_antenna_efficiency(mut self, eff: f64) -> Self {
        self.link.tx_antenna_efficiency = eff;
        self
    }

    pub fn rx_gain_dbi(mut self, gain: f64) -> Self {
        self.link.rx_gain_dbi = gain;
        self
    }

    pub fn rx_antenna_efficiency(mut self, eff: f64) -> Self {
        self.link.rx_antenna_efficiency = eff;
        self
    }

    /// Gain and efficiency of the transmit antenna from an estimate
    pub fn tx_antenna(self, params: &AntennaParams) -> Self {
        self.tx_gain_dbi(params.gain_dbi)
            .tx_antenna_efficiency(params.efficiency)
    }

    /// Gain and efficiency of the receive antenna from an estimate
    pub fn rx_antenna(self, params: &AntennaParams) -> Self {
        self.rx_gain_dbi(params.gain_dbi)
            .rx_antenna_efficiency(params.efficiency)
    }

    pub fn noise_figure_db(mut self, nf: f64) -> Self {
        self.link.noise_figure_db = nf;
        self
    }

    pub fn bandwidth(mut self, bandwidth: f64) -> Self {
        self.link.bandwidth = bandwidth;
        self
    }

    pub fn bandwidth_scaled(self, bandwidth: f64, scale: Scale) -> Self {
        self.bandwidth(scale.unscale(bandwidth))
    }

    pub fn required_sensitivity_dbm(mut self, sensitivity: f64) -> Self {
        self.link.required_sensitivity_dbm = sensitivity;
        self
    }

    pub fn component(mut self, kind: ComponentKind, loss_db: f64, note: &str) -> Self {
        self.link.components.push(Component::new(kind, loss_db, note));
        self
    }

    /// Adds the mismatch loss of a terminated line as a component
    pub fn mismatch(self, state: &ReflectionState) -> Self {
        self.component(ComponentKind::Mismatch, state.mismatch_loss_db, "load mismatch")
    }

    pub fn build(self) -> LinkBudget {
        self.link
    }
}
