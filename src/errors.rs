use thiserror::Error;

/// Errors reported back to callers of the sizing engine.
///
/// All of these represent invalid input rather than transient failure: none
/// are retried, and a calculation that fails yields no result at all (there
/// is no partial-success mode). Callers are expected to map these onto
/// user-correctable messages.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum SizingError {
    #[error("No appliance loads recorded for this project - add at least one load before sizing")]
    EmptyLoad,
    #[error("Monthly consumption input was insufficient: {0}")]
    InsufficientInput(String),
    #[error("Location {0:?} could not be resolved against the peak sun hours table")]
    LocationNotFound(String),
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

impl SizingError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidParameter(message.into())
    }

    pub(crate) fn insufficient(message: impl Into<String>) -> Self {
        Self::InsufficientInput(message.into())
    }
}
