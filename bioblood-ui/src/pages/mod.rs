//! Pages
//!
//! Top-level page components for each route.

pub mod about;
pub mod dashboard;
pub mod home;

pub use about::About;
pub use dashboard::Dashboard;
pub use home::Home;
