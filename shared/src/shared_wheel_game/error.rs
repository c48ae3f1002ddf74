use thiserror::Error;

/// Errors raised by the prize wheel engine.
///
/// Every variant is a configuration problem: a denied spin during cooldown is a
/// normal outcome and is reported through `SpinAttempt::Denied` instead.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum WheelError {
    #[error("Prize catalog is empty")]
    EmptyCatalog,

    #[error("Duplicate prize id in catalog: {0}")]
    DuplicatePrizeId(String),

    #[error("Invalid prize {id}: {reason}")]
    InvalidPrize { id: String, reason: String },

    /// Every prize is suppressed or weighted at zero. Not retryable.
    #[error("Total effective weight must be positive, got {total}")]
    DegenerateWeights { total: f64 },

    #[error("Segment {index} is out of range for a wheel of {count} segments")]
    InvalidSegment { index: usize, count: usize },

    #[error("Invalid wheel configuration: {0}")]
    InvalidConfig(String),

    /// The caller's wheel angle is not finite or too large to rotate precisely.
    #[error("Wheel angle {0} is out of range")]
    InvalidAngle(f64),
}

impl WheelError {
    /// Fatal errors mean the wheel cannot serve any player until it is reconfigured.
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            WheelError::InvalidSegment { .. } | WheelError::InvalidAngle(_)
        )
    }
}
