use num_complex::Complex64;
use simple_error::SimpleError;
use std::fmt;

pub type Result<T> = std::result::Result<T, RfError>;

/// Error types for the line, filter, antenna and link engines
#[derive(Clone, Debug, PartialEq)]
pub enum RfError {
    /// Out-of-domain scalar, e.g. a negative frequency or `σ ≤ 0`
    InvalidInput { param: String, reason: String },
    /// Structurally inconsistent request, e.g. band edges out of order
    InvalidSpec(String),
    /// A calculation would divide by (nearly) zero
    SingularConfiguration(String),
    /// Load on the unit circle, no passive section can match it
    UnmatchableLoad { rho: f64 },
    NoRealSolution(String),
    /// Reflection magnitude at or beyond the unit circle
    UndefinedVswr { gamma: Complex64 },
    InsufficientSamples { required: usize, got: usize },
    /// Order search hit its cap without meeting the stopband target
    UnreachableTarget {
        target_db: f64,
        max_order: usize,
        achieved_db: f64,
    },
}

impl RfError {
    pub(crate) fn input(param: &str, reason: impl Into<String>) -> Self {
        RfError::InvalidInput {
            param: param.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn spec(msg: impl Into<String>) -> Self {
        RfError::InvalidSpec(msg.into())
    }

    pub(crate) fn singular(msg: impl Into<String>) -> Self {
        RfError::SingularConfiguration(msg.into())
    }
}

impl fmt::Display for RfError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RfError::InvalidInput { param, reason } => {
                write!(f, "Invalid input for {}: {}", param, reason)
            }
            RfError::InvalidSpec(msg) => write!(f, "Invalid specification: {}", msg),
            RfError::SingularConfiguration(msg) => write!(f, "Singular configuration: {}", msg),
            RfError::UnmatchableLoad { rho } => {
                write!(f, "Load cannot be matched: |Γ| = {} lies on the unit circle", rho)
            }
            RfError::NoRealSolution(msg) => write!(f, "No real solution: {}", msg),
            RfError::UndefinedVswr { gamma } => write!(
                f,
                "VSWR undefined for |Γ| = {} (Γ = {} {:+}j)",
                gamma.norm(),
                gamma.re,
                gamma.im
            ),
            RfError::InsufficientSamples { required, got } => write!(
                f,
                "Insufficient samples: at least {} required, {} supplied",
                required, got
            ),
            RfError::UnreachableTarget {
                target_db,
                max_order,
                achieved_db,
            } => write!(
                f,
                "Stopband target of {} dB not reached by order {} (best {:.2} dB)",
                target_db, max_order, achieved_db
            ),
        }
    }
}

impl std::error::Error for RfError {}

impl From<SimpleError> for RfError {
    fn from(err: SimpleError) -> Self {
        RfError::input("text", err.as_str())
    }
}
