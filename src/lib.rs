//! Numerical engines for RF design: lossy transmission lines and matching,
//! analog filter synthesis, antenna estimates and link budgets.
//!
//! ```
//! use rftoolbox::prelude::*;
//!
//! let line = TransmissionLineBuilder::new().zl(c64(100.0, 0.0)).build();
//! let state = compute_reflection(&line).unwrap();
//! assert!((state.vswr - 2.0).abs() < 1e-12);
//!
//! let design = design_filter(&FilterSpec::default()).unwrap();
//! assert_eq!(design.ladder.unwrap().reactive_count(), 4);
//! ```

pub mod antenna;
pub mod consts;
pub mod convert;
pub mod element;
pub mod error;
pub mod filter;
pub mod frequency;
pub mod link;
pub mod math;
pub mod poly;
pub mod prelude;
pub mod scale;
pub mod tline;
pub mod unit;
pub mod util;
