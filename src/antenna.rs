//! First-order antenna estimates and starting dimensions for five common
//! archetypes.
//!
//! The expressions are empirical approximations meant for quick link
//! planning, not full-wave results. All lengths are in meters, angles in
//! degrees and gains in dBi.

use crate::consts::C0;
use crate::error::{Result, RfError};
use crate::scale::Scale;
use crate::unit::{Unit, UnitVal};
use log::debug;
use num_complex::{c64, Complex64};
use serde::{Deserialize, Serialize};
use simple_error::SimpleError;
use std::f64::consts::PI;
use std::{fmt, str::FromStr};

const DIPOLE_GAIN_DBI: f64 = 2.15;
const DIPOLE_BEAMWIDTH: f64 = 78.0;
const YAGI_GAIN_DBI: f64 = 12.0;
const YAGI_BEAMWIDTH: f64 = 45.0;
/// Substrate thickness assumed by the patch design helper
const PATCH_DESIGN_HEIGHT: f64 = 1.6e-3;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AntennaKind {
    #[default]
    Dipole,
    Patch,
    Horn,
    Yagi,
    Parabolic,
}

impl AntennaKind {
    pub fn to_str(&self) -> &str {
        match self {
            AntennaKind::Dipole => "dipole",
            AntennaKind::Patch => "patch",
            AntennaKind::Horn => "horn",
            AntennaKind::Yagi => "yagi",
            AntennaKind::Parabolic => "parabolic",
        }
    }

    /// Normalized power pattern at `theta` radians, see [`pattern`]
    pub fn pattern(&self, theta: f64) -> f64 {
        pattern(*self, theta)
    }
}

impl FromStr for AntennaKind {
    type Err = SimpleError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "dipole" | "Dipole" => Ok(AntennaKind::Dipole),
            "patch" | "Patch" | "microstrip" => Ok(AntennaKind::Patch),
            "horn" | "Horn" => Ok(AntennaKind::Horn),
            "yagi" | "Yagi" | "yagi-uda" => Ok(AntennaKind::Yagi),
            "parabolic" | "Parabolic" | "dish" => Ok(AntennaKind::Parabolic),
            _ => simple_error::bail!("unknown antenna kind: {}", s),
        }
    }
}

impl fmt::Display for AntennaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_str())
    }
}

/// Physical description of an antenna.
///
/// `length` doubles as the aperture diameter for a parabolic reflector.
/// `width`, `er` and `height` only matter for the archetypes that use them
/// (patch and horn).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AntennaSpec {
    kind: AntennaKind,
    freq: f64,
    length: f64,
    width: f64,
    er: f64,
    height: f64,
    efficiency: f64,
}

impl Default for AntennaSpec {
    fn default() -> Self {
        AntennaSpec {
            kind: AntennaKind::Dipole,
            freq: 2.4e9,
            length: 62.5e-3,
            width: 31.25e-3,
            er: 4.4,
            height: 1.6e-3,
            efficiency: 0.9,
        }
    }
}

impl AntennaSpec {
    pub fn kind(&self) -> AntennaKind {
        self.kind
    }

    pub fn freq(&self) -> f64 {
        self.freq
    }

    pub fn length(&self) -> f64 {
        self.length
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn er(&self) -> f64 {
        self.er
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn efficiency(&self) -> f64 {
        self.efficiency
    }

    /// Free-space wavelength in meters
    pub fn wavelength(&self) -> f64 {
        C0 / self.freq
    }

    pub fn validate(&self) -> Result<()> {
        positive("frequency", self.freq)?;
        positive("length", self.length)?;
        if !(self.efficiency.is_finite() && self.efficiency > 0.0 && self.efficiency <= 1.0) {
            return Err(RfError::input(
                "efficiency",
                format!("must lie in (0, 1], got {}", self.efficiency),
            ));
        }
        if matches!(self.kind, AntennaKind::Patch | AntennaKind::Horn) {
            positive("width", self.width)?;
        }
        if self.kind == AntennaKind::Patch {
            positive("height", self.height)?;
            if !(self.er.is_finite() && self.er >= 1.0) {
                return Err(RfError::input("er", format!("must be at least 1, got {}", self.er)));
            }
        }
        Ok(())
    }
}

fn positive(param: &str, val: f64) -> Result<()> {
    if val.is_finite() && val > 0.0 {
        Ok(())
    } else {
        Err(RfError::input(param, format!("must be positive, got {}", val)))
    }
}

/// Builder design pattern for AntennaSpec.
///
/// ## Example
/// ```
/// use rftoolbox::antenna::{estimate, AntennaKind, AntennaSpecBuilder};
/// use rftoolbox::scale::Scale;
///
/// let spec = AntennaSpecBuilder::new()
///     .kind(AntennaKind::Horn)
///     .freq_scaled(10.0, Scale::Giga)
///     .length_scaled(150.0, Scale::Milli)
///     .width_scaled(90.0, Scale::Milli)
///     .build();
/// let params = estimate(&spec).unwrap();
/// assert!(params.gain_dbi > 20.0);
/// ```
#[derive(Default)]
pub struct AntennaSpecBuilder {
    spec: AntennaSpec,
}

impl AntennaSpecBuilder {
    pub fn new() -> Self {
        AntennaSpecBuilder::default()
    }

    pub fn kind(mut self, kind: AntennaKind) -> Self {
        self.spec.kind = kind;
        self
    }

    pub fn freq(mut self, freq: f64) -> Self {
        self.spec.freq = freq;
        self
    }

    pub fn freq_scaled(self, freq: f64, scale: Scale) -> Self {
        self.freq(scale.unscale(freq))
    }

    pub fn length(mut self, length: f64) -> Self {
        self.spec.length = length;
        self
    }

    pub fn length_scaled(self, length: f64, scale: Scale) -> Self {
        self.length(scale.unscale(length))
    }

    pub fn width(mut self, width: f64) -> Self {
        self.spec.width = width;
        self
    }

    pub fn width_scaled(self, width: f64, scale: Scale) -> Self {
        self.width(scale.unscale(width))
    }

    pub fn er(mut self, er: f64) -> Self {
        self.spec.er = er;
        self
    }

    pub fn height(mut self, height: f64) -> Self {
        self.spec.height = height;
        self
    }

    pub fn efficiency(mut self, efficiency: f64) -> Self {
        self.spec.efficiency = efficiency;
        self
    }

    pub fn build(self) -> AntennaSpec {
        self.spec
    }
}

/// Estimated radiation and circuit parameters
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AntennaParams {
    pub kind: AntennaKind,
    pub freq: f64,
    /// Free-space wavelength in meters
    pub wavelength: f64,
    pub gain_dbi: f64,
    /// H-plane half-power beamwidth in degrees
    pub beamwidth_h: f64,
    /// E-plane half-power beamwidth in degrees
    pub beamwidth_e: f64,
    /// Effective aperture in m²
    pub effective_area: f64,
    pub input_impedance: Complex64,
    /// Effective permittivity, patch only
    pub er_eff: Option<f64>,
    /// Resonant length `λg/2 − 2ΔL`, patch only
    pub patch_length: Option<f64>,
    pub efficiency: f64,
}

/// Effective aperture `λ²·G/4π` for a gain in dBi
pub fn effective_area(wavelength: f64, gain_dbi: f64) -> f64 {
    wavelength * wavelength * 10f64.powf(gain_dbi / 10.0) / (4.0 * PI)
}

/// Hammerstad effective permittivity of a microstrip of width `w` on a
/// substrate of thickness `h`
pub fn effective_permittivity(er: f64, h: f64, w: f64) -> f64 {
    (er + 1.0) / 2.0 + (er - 1.0) / 2.0 * (1.0 + 12.0 * h / w).sqrt()
}

/// Fringing length extension `ΔL` of a patch edge
pub fn fringing_extension(er_eff: f64, h: f64, w: f64) -> f64 {
    0.412 * h * (er_eff + 0.3) * (w / h + 0.264) / ((er_eff - 0.258) * (w / h + 0.8))
}

/// Estimate gain, beamwidth, aperture and impedance of `spec`
pub fn estimate(spec: &AntennaSpec) -> Result<AntennaParams> {
    spec.validate()?;
    let lambda = spec.wavelength();
    let (l, w, eff) = (spec.length, spec.width, spec.efficiency);

    let mut params = AntennaParams {
        kind: spec.kind,
        freq: spec.freq,
        wavelength: lambda,
        gain_dbi: 0.0,
        beamwidth_h: 0.0,
        beamwidth_e: 0.0,
        effective_area: 0.0,
        input_impedance: c64(50.0, 0.0),
        er_eff: None,
        patch_length: None,
        efficiency: eff,
    };

    match spec.kind {
        AntennaKind::Dipole => {
            params.gain_dbi = DIPOLE_GAIN_DBI;
            params.beamwidth_h = DIPOLE_BEAMWIDTH;
            params.beamwidth_e = DIPOLE_BEAMWIDTH;
            params.effective_area = effective_area(lambda, DIPOLE_GAIN_DBI);
            params.input_impedance = c64(73.1, 42.5);
        }
        AntennaKind::Patch => {
            let h = spec.height;
            let er_eff = effective_permittivity(spec.er, h, w);
            let lambda_g = lambda / er_eff.sqrt();
            let dl = fringing_extension(er_eff, h, w);
            let radiation = 60.0 * er_eff * (l / lambda).powi(2) * (w / lambda)
                / ((er_eff + 1.0) * (1.0 + 0.25 * h / lambda_g));
            params.gain_dbi = 10.0 * radiation.log10() + DIPOLE_GAIN_DBI;
            params.beamwidth_h = 101.0 * lambda / w;
            params.beamwidth_e = 101.0 * lambda / l;
            params.effective_area = effective_area(lambda, params.gain_dbi);
            params.input_impedance = c64(377.0 * (w / l) * spec.er.sqrt(), 0.0);
            params.er_eff = Some(er_eff);
            params.patch_length = Some(lambda_g / 2.0 - 2.0 * dl);
        }
        AntennaKind::Horn => {
            params.gain_dbi = 10.0 * (eff * 4.0 * PI * l * w / (lambda * lambda)).log10();
            params.beamwidth_h = 51.0 * lambda / w;
            params.beamwidth_e = 51.0 * lambda / l;
            params.effective_area = l * w * eff;
        }
        AntennaKind::Yagi => {
            params.gain_dbi = YAGI_GAIN_DBI + 10.0 * eff.log10();
            params.beamwidth_h = YAGI_BEAMWIDTH;
            params.beamwidth_e = YAGI_BEAMWIDTH;
            params.effective_area = effective_area(lambda, params.gain_dbi);
        }
        AntennaKind::Parabolic => {
            params.gain_dbi = 10.0 * (eff * (PI * l / lambda).powi(2)).log10();
            params.beamwidth_h = 70.0 * lambda / l;
            params.beamwidth_e = params.beamwidth_h;
            params.effective_area = PI * (l / 2.0).powi(2) * eff;
        }
    }

    debug!(
        "{} antenna at {} Hz: {:.2} dBi, beamwidth {:.1}°/{:.1}°",
        spec.kind, spec.freq, params.gain_dbi, params.beamwidth_h, params.beamwidth_e
    );
    Ok(params)
}

/// Physical dimensions of a designed antenna, in meters
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub enum AntennaDimensions {
    Dipole {
        length: f64,
        wire_diameter: f64,
    },
    Patch {
        width: f64,
        length: f64,
        substrate_height: f64,
    },
    Horn {
        aperture_width: f64,
        length: f64,
    },
    Yagi {
        director: f64,
        reflector: f64,
        driven: f64,
        spacing: f64,
        elements: usize,
    },
    Parabolic {
        diameter: f64,
    },
}

impl AntennaDimensions {
    pub fn kind(&self) -> AntennaKind {
        match self {
            AntennaDimensions::Dipole { .. } => AntennaKind::Dipole,
            AntennaDimensions::Patch { .. } => AntennaKind::Patch,
            AntennaDimensions::Horn { .. } => AntennaKind::Horn,
            AntennaDimensions::Yagi { .. } => AntennaKind::Yagi,
            AntennaDimensions::Parabolic { .. } => AntennaKind::Parabolic,
        }
    }

    /// Labelled lengths in display order
    pub fn lengths(&self) -> Vec<(&'static str, f64)> {
        match *self {
            AntennaDimensions::Dipole {
                length,
                wire_diameter,
            } => vec![("length", length), ("wire diameter", wire_diameter)],
            AntennaDimensions::Patch {
                width,
                length,
                substrate_height,
            } => vec![
                ("width", width),
                ("length", length),
                ("substrate height", substrate_height),
            ],
            AntennaDimensions::Horn {
                aperture_width,
                length,
            } => vec![("aperture width", aperture_width), ("length", length)],
            AntennaDimensions::Yagi {
                director,
                reflector,
                driven,
                spacing,
                ..
            } => vec![
                ("director", director),
                ("reflector", reflector),
                ("driven element", driven),
                ("spacing", spacing),
            ],
            AntennaDimensions::Parabolic { diameter } => vec![("diameter", diameter)],
        }
    }
}

impl fmt::Display for AntennaDimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, meters) in self.lengths() {
            writeln!(f, "  {} = {}", name, UnitVal::engineering(meters, Unit::Meter))?;
        }
        if let AntennaDimensions::Yagi { elements, .. } = self {
            writeln!(f, "  elements = {}", elements)?;
        }
        Ok(())
    }
}

/// Starting dimensions for an archetype at a design frequency
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AntennaDesign {
    pub kind: AntennaKind,
    pub freq: f64,
    pub wavelength: f64,
    pub dimensions: AntennaDimensions,
    pub expected_gain_dbi: f64,
    pub expected_efficiency: f64,
}

impl fmt::Display for AntennaDesign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} at {}: {:.2} dBi expected",
            self.kind,
            UnitVal::engineering(self.freq, Unit::Hz),
            self.expected_gain_dbi
        )?;
        write!(f, "{}", self.dimensions)
    }
}

/// Starting dimensions for `kind` at `freq`. `er` is only used by the patch.
pub fn design(kind: AntennaKind, freq: f64, er: f64) -> Result<AntennaDesign> {
    positive("frequency", freq)?;
    let lambda = C0 / freq;

    let (dimensions, gain, eff) = match kind {
        AntennaKind::Dipole => {
            let length = lambda / 2.0;
            let dims = AntennaDimensions::Dipole {
                length,
                wire_diameter: length / 100.0,
            };
            (dims, DIPOLE_GAIN_DBI, 0.9)
        }
        AntennaKind::Patch => {
            if !(er.is_finite() && er >= 1.0) {
                return Err(RfError::input("er", format!("must be at least 1, got {}", er)));
            }
            let width = lambda / (2.0 * ((er + 1.0) / 2.0).sqrt());
            let er_eff = effective_permittivity(er, PATCH_DESIGN_HEIGHT, width);
            let dims = AntennaDimensions::Patch {
                width,
                length: lambda / er_eff.sqrt() / 2.0,
                substrate_height: PATCH_DESIGN_HEIGHT,
            };
            (dims, 6.5, 0.85)
        }
        AntennaKind::Horn => {
            let dims = AntennaDimensions::Horn {
                aperture_width: 3.0 * lambda,
                length: 5.0 * lambda,
            };
            (dims, 15.0, 0.95)
        }
        AntennaKind::Yagi => {
            let dims = AntennaDimensions::Yagi {
                director: 0.47 * lambda,
                reflector: 0.52 * lambda,
                driven: 0.49 * lambda,
                spacing: 0.2 * lambda,
                elements: 6,
            };
            (dims, YAGI_GAIN_DBI, 0.8)
        }
        AntennaKind::Parabolic => {
            let (gain, eff) = (30.0, 0.7);
            // G = eff·(πD/λ)²
            let diameter = lambda / PI * (10f64.powf(gain / 10.0) / eff).sqrt();
            (AntennaDimensions::Parabolic { diameter }, gain, eff)
        }
    };

    Ok(AntennaDesign {
        kind,
        freq,
        wavelength: lambda,
        dimensions,
        expected_gain_dbi: gain,
        expected_efficiency: eff,
    })
}

/// Normalized power pattern at `theta` radians from the element axis.
///
/// Dipole `sin²θ`, patch and horn `sin²θ·cos²(π·sinθ/2)`, Yagi `sin⁴θ`,
/// parabolic `sin¹⁰θ`.
pub fn pattern(kind: AntennaKind, theta: f64) -> f64 {
    let s = theta.sin();
    match kind {
        AntennaKind::Dipole => s.powi(2),
        AntennaKind::Patch | AntennaKind::Horn => s.powi(2) * (PI * s / 2.0).cos().powi(2),
        AntennaKind::Yagi => s.powi(4),
        AntennaKind::Parabolic => s.powi(10),
    }
}

#[cfg(test)]
mod antenna_tests {
    use super::*;
    use crate::util::{comp_c64, comp_f64, NumMargin};

    #[test]
    fn test_kind() {
        assert_eq!(AntennaKind::from_str("dish").unwrap(), AntennaKind::Parabolic);
        assert_eq!(AntennaKind::from_str("Yagi").unwrap(), AntennaKind::Yagi);
        assert!(AntennaKind::from_str("helix").is_err());
        assert_eq!(AntennaKind::Patch.to_string(), "patch");
    }

    #[test]
    fn test_dipole() {
        let params = estimate(&AntennaSpec::default()).unwrap();
        assert_eq!(params.gain_dbi, 2.15);
        assert_eq!(params.beamwidth_h, 78.0);
        comp_f64(&0.12491352416666666, &params.wavelength, NumMargin::default(), "lambda", "");
        comp_f64(&0.002037084566285815, &params.effective_area, NumMargin::absolute(1e-15), "aeff", "");
        assert_eq!(params.input_impedance, c64(73.1, 42.5));
        assert_eq!(params.er_eff, None);
    }

    #[test]
    fn test_patch() {
        let spec = AntennaSpecBuilder::new().kind(AntennaKind::Patch).build();
        let params = estimate(&spec).unwrap();
        let margin = NumMargin::absolute(1e-9);
        comp_f64(&4.860003703700529, &params.er_eff.unwrap(), margin, "er_eff", "");
        comp_f64(&0.026891665637961876, &params.patch_length.unwrap(), margin, "length", "");
        comp_f64(&7.056165379723856, &params.gain_dbi, margin, "gain", "");
        comp_f64(&403.72051010666667, &params.beamwidth_h, margin, "bw", "h");
        comp_f64(&201.86025505333333, &params.beamwidth_e, margin, "bw", "e");
        comp_f64(&0.006304136329585795, &params.effective_area, NumMargin::absolute(1e-12), "aeff", "");
        comp_c64(&c64(395.40093576014715, 0.0), &params.input_impedance, margin, "z", "");
        comp_f64(
            &0.0007196430881020114,
            &fringing_extension(4.860003703700529, 1.6e-3, 31.25e-3),
            NumMargin::absolute(1e-12),
            "dl",
            "",
        );
    }

    #[test]
    fn test_horn_yagi_parabolic() {
        let lambda = C0 / 10e9;
        let spec = AntennaSpecBuilder::new()
            .kind(AntennaKind::Horn)
            .freq(10e9)
            .length(5.0 * lambda)
            .width(3.0 * lambda)
            .build();
        let horn = estimate(&spec).unwrap();
        comp_f64(&22.295436325171025, &horn.gain_dbi, NumMargin::absolute(1e-9), "horn", "gain");
        comp_f64(&17.0, &horn.beamwidth_h, NumMargin::absolute(1e-9), "horn", "h");
        comp_f64(&10.2, &horn.beamwidth_e, NumMargin::absolute(1e-9), "horn", "e");
        assert_eq!(horn.input_impedance, c64(50.0, 0.0));

        let yagi = estimate(&AntennaSpecBuilder::new().kind(AntennaKind::Yagi).build()).unwrap();
        comp_f64(&11.542425094393248, &yagi.gain_dbi, NumMargin::absolute(1e-9), "yagi", "");
        assert_eq!(yagi.beamwidth_e, 45.0);

        let dish = estimate(
            &AntennaSpecBuilder::new()
                .kind(AntennaKind::Parabolic)
                .freq(10e9)
                .length(1.0)
                .build(),
        )
        .unwrap();
        comp_f64(&39.94900848971738, &dish.gain_dbi, NumMargin::absolute(1e-9), "dish", "gain");
        comp_f64(&2.098547206, &dish.beamwidth_h, NumMargin::absolute(1e-9), "dish", "bw");
        comp_f64(&0.7068583470577035, &dish.effective_area, NumMargin::absolute(1e-12), "dish", "aeff");
    }

    #[test]
    fn test_invalid_spec() {
        let bad = AntennaSpecBuilder::new().efficiency(1.2).build();
        assert!(matches!(estimate(&bad), Err(RfError::InvalidInput { .. })));
        let bad = AntennaSpecBuilder::new().freq(0.0).build();
        assert!(estimate(&bad).is_err());
        let bad = AntennaSpecBuilder::new().kind(AntennaKind::Patch).er(0.5).build();
        assert!(estimate(&bad).is_err());
        // width is ignored by a dipole
        let ok = AntennaSpecBuilder::new().width(-1.0).build();
        assert!(estimate(&ok).is_ok());
    }

    #[test]
    fn test_design() {
        let dipole = design(AntennaKind::Dipole, 2.4e9, 1.0).unwrap();
        match dipole.dimensions {
            AntennaDimensions::Dipole {
                length,
                wire_diameter,
            } => {
                comp_f64(&0.06245676208333333, &length, NumMargin::default(), "dipole", "");
                comp_f64(&0.0006245676208333333, &wire_diameter, NumMargin::default(), "wire", "");
            }
            other => panic!("expected dipole dimensions, got {:?}", other),
        }

        let patch = design(AntennaKind::Patch, 2.4e9, 4.4).unwrap();
        match patch.dimensions {
            AntennaDimensions::Patch {
                width,
                length,
                substrate_height,
            } => {
                comp_f64(&0.038009974957527795, &width, NumMargin::absolute(1e-12), "patch", "w");
                comp_f64(&0.028550267408016243, &length, NumMargin::absolute(1e-12), "patch", "l");
                assert_eq!(substrate_height, PATCH_DESIGN_HEIGHT);
            }
            other => panic!("expected patch dimensions, got {:?}", other),
        }

        let dish = design(AntennaKind::Parabolic, 2.4e9, 1.0).unwrap();
        let AntennaDimensions::Parabolic { diameter } = dish.dimensions else {
            panic!("expected a diameter, got {:?}", dish.dimensions);
        };
        comp_f64(&1.5028324655467653, &diameter, NumMargin::absolute(1e-9), "dish", "");
        let spec = AntennaSpecBuilder::new()
            .kind(AntennaKind::Parabolic)
            .length(diameter)
            .efficiency(dish.expected_efficiency)
            .build();
        comp_f64(&30.0, &estimate(&spec).unwrap().gain_dbi, NumMargin::absolute(1e-9), "dish", "gain");

        let yagi = design(AntennaKind::Yagi, 2.4e9, 1.0).unwrap();
        assert!(matches!(yagi.dimensions, AntennaDimensions::Yagi { elements: 6, .. }));
        assert_eq!(yagi.dimensions.lengths().len(), 4);
        assert_eq!(yagi.dimensions.kind(), AntennaKind::Yagi);

        assert!(design(AntennaKind::Patch, 2.4e9, 0.0).is_err());
        assert!(design(AntennaKind::Horn, -1.0, 1.0).is_err());
    }

    #[test]
    fn test_design_display() {
        let dipole = design(AntennaKind::Dipole, 2.4e9, 1.0).unwrap();
        let text = dipole.to_string();
        assert!(text.starts_with("dipole at 2.400 GHz"));
        assert!(text.contains("length = 62.457 mm"));

        let yagi = design(AntennaKind::Yagi, 2.4e9, 1.0).unwrap().to_string();
        assert!(yagi.contains("elements = 6"));
    }

    #[test]
    fn test_pattern() {
        let broadside = PI / 2.0;
        for kind in [AntennaKind::Dipole, AntennaKind::Yagi, AntennaKind::Parabolic] {
            comp_f64(&1.0, &pattern(kind, broadside), NumMargin::default(), "broadside", kind.to_str());
            comp_f64(&0.0, &pattern(kind, 0.0), NumMargin::default(), "axis", kind.to_str());
        }
        comp_f64(&0.125, &AntennaKind::Patch.pattern(PI / 6.0), NumMargin::absolute(1e-12), "patch", "30°");
        assert!(pattern(AntennaKind::Parabolic, 1.0) < pattern(AntennaKind::Dipole, 1.0));
    }
}
