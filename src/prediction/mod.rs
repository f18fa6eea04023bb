//! Upload and prediction flow

pub mod error;
pub mod flow;

pub use error::{FlowError, FlowResult};
pub use flow::{run_submission, Completion, FlowState, PredictionFlow, SubmitTicket, Submission};
