//! API Routes
//!
//! Route handlers organized by functionality.

pub mod account;
pub mod auth;
pub mod feedback;
pub mod health;
pub mod predict;
