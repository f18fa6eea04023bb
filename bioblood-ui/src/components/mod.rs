//! UI Components
//!
//! Reusable Leptos components for the app shell and the dashboard.

pub mod auth_modal;
pub mod loading;
pub mod nav;
pub mod prediction;
pub mod toast;

pub use auth_modal::AuthModal;
pub use loading::{ListSkeleton, Loading};
pub use nav::Nav;
pub use prediction::PredictionPanel;
pub use toast::Toast;
