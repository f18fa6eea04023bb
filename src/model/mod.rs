//! Domain model
//!
//! Types shared by the session store, the gateway, the prediction flow and the
//! local backend.
//!
//! ## Canonical schema
//!
//! Everything in this crate writes `blood_group`, `history`, `result`, `date`
//! and `profile`. Older backends wrote `bloodGroup`, `predictions`,
//! `blood_group`, `timestamp` and `user`; those spellings are still accepted
//! when reading.

mod blood_group;
mod records;
mod upload;
pub mod wire;

pub use blood_group::{BloodGroup, ParseBloodGroupError};
pub use records::{Feedback, HistoryEntry, Prediction, Profile, User, UserId, GUEST_USER_ID};
pub use upload::{PredictionUpload, SelectedFile};
