//! Flow errors

use crate::view::notice::MSG_NO_FILE;
use thiserror::Error;

/// Actions the prediction flow refuses
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FlowError {
    #[error("{}", MSG_NO_FILE)]
    NoFile,

    #[error("A prediction is already in progress")]
    AlreadySubmitting,

    #[error("No prediction to give feedback on")]
    NoResult,
}

pub type FlowResult<T> = Result<T, FlowError>;
