/// Errors raised while building pipeline result records.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TargetingError {
    /// The target count does not fit the one-byte count field.
    #[error("too many targets ({count}, max {max})")]
    TooManyTargets { count: usize, max: usize },

    /// More fiducial ids than the multi-tag record has slots for.
    #[error("too many fiducial ids ({count}, max {max})")]
    TooManyFiducialIds { count: usize, max: usize },

    /// Fiducial ids are non-negative; -1 marks an unused slot on the wire.
    #[error("invalid fiducial id {0}")]
    InvalidFiducialId(i16),
}

pub type Result<T> = std::result::Result<T, TargetingError>;
