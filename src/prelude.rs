//! rftoolbox prelude.
//!
//! This module contains the most used types, functions and traits that you
//! can import easily as a group.
//!
//! ```
//! use rftoolbox::prelude::*;
//!
//! ```

#[doc(no_inline)]
pub use num_complex::{c64, Complex64};

#[doc(no_inline)]
pub use crate::error::{Result, RfError};

#[doc(no_inline)]
pub use crate::frequency::{Frequency, FrequencyBuilder};

#[doc(no_inline)]
pub use crate::scale::Scale;

#[doc(no_inline)]
pub use crate::unit::{parse_impedance, parse_quantity, Sweep, Unit, UnitVal, UnitValBuilder};

#[doc(no_inline)]
pub use crate::element::{ElemType, FilterElement, Position};

#[doc(no_inline)]
pub use crate::tline::matching::{
    design_series_section_match, design_single_stub_match, MatchingSolution,
};
#[doc(no_inline)]
pub use crate::tline::{
    compute_input_impedance, compute_propagation_constant, compute_reflection,
    reflection_trajectory, LineKind, PropagationConstant, ReflectionState, TransmissionLine,
    TransmissionLineBuilder,
};

#[doc(no_inline)]
pub use crate::filter::ladder::{synthesize_ladder, Ladder, LadderMethod};
#[doc(no_inline)]
pub use crate::filter::optimize::{optimize_order, BandstopWindow, OrderSearch, StopbandCriterion};
#[doc(no_inline)]
pub use crate::filter::prototype::select_prototype;
#[doc(no_inline)]
pub use crate::filter::response::{evaluate_response, FrequencyResponse};
#[doc(no_inline)]
pub use crate::filter::transfer::TransferFunction;
#[doc(no_inline)]
pub use crate::filter::transform::frequency_transform;
#[doc(no_inline)]
pub use crate::filter::{
    design_filter, Cutoffs, FilterDesign, FilterSpec, FilterSpecBuilder, ResponseFamily, Topology,
};

#[doc(no_inline)]
pub use crate::antenna::{AntennaDesign, AntennaDimensions, AntennaKind, AntennaParams, AntennaSpec, AntennaSpecBuilder};

#[doc(no_inline)]
pub use crate::link::{fspl_db, Environment, LinkBudget, LinkBudgetBuilder, LinkResult};

#[doc(no_inline)]
pub use crate::util::{ApproxEq, NumMargin};
