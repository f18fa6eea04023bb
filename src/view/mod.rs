//! View model
//!
//! Everything a front end needs to decide what to draw, without drawing it:
//! the screen for a section/tab selection, navigation rules, notices and the
//! display formatting of domain values.

pub mod content;
pub mod format;
pub mod notice;
pub mod screen;

pub use format::{format_confidence, format_date, history_rows, profile_rows, HistoryRow};
pub use notice::{Notice, NoticeLevel};
pub use screen::{navigate, render, startup_section, DashboardView, NavAction, NavState, Screen, Section, Tab};
