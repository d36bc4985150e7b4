//! Physical constants and numeric tolerances shared by the engines.

use std::f64::consts::PI;

/// Speed of light in vacuum (m/s)
pub const C0: f64 = 299_792_458.0;

/// Permeability of free space (H/m)
pub const MU0: f64 = 4.0e-7 * PI;

/// Permittivity of free space (F/m)
pub const EPS0: f64 = 1.0 / (MU0 * C0 * C0);

/// Impedance of free space (Ω)
pub const ETA0: f64 = MU0 * C0;

/// Thermal noise density at 290 K (dBm/Hz)
pub const THERMAL_NOISE_DBM_HZ: f64 = -174.0;

/// Relative epsilon for comparisons against zero, scaled by operand magnitude
pub const REL_EPS: f64 = 1.0e-9;

/// Upper bound on analog filter order
pub const MAX_FILTER_ORDER: usize = 20;

/// Annealed copper conductivity (S/m)
pub const SIGMA_COPPER: f64 = 5.8e7;
