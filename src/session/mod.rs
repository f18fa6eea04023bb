//! Session management
//!
//! [`SessionStore`] owns who is logged in and mirrors it into a
//! [`DurableStorage`] backend: a JSON file natively, `localStorage` in the
//! browser, memory in tests.

mod error;
mod storage;
mod store;

pub use error::{SessionError, SessionResult};
#[cfg(not(target_arch = "wasm32"))]
pub use storage::FileStorage;
pub use storage::{DurableStorage, MemoryStorage};
pub use store::{Session, SessionStore, LOGGED_IN_KEY, USER_KEY};
