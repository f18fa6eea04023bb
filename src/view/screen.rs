//! Screen model
//!
//! [`render`] maps the selected section and tab plus the session to the
//! screen that should be shown. It performs no I/O; tabs that need server
//! data name what to fetch and the front end fetches it.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::notice::{Notice, MSG_DASHBOARD_DENIED};
use crate::model::{User, UserId};
use crate::session::Session;

/// Top-level navigation target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    #[default]
    Home,
    About,
    Dashboard,
}

impl Section {
    pub fn as_str(&self) -> &'static str {
        match self {
            Section::Home => "home",
            Section::About => "about",
            Section::Dashboard => "dashboard",
        }
    }

    /// Router path in the browser front end
    pub fn path(&self) -> &'static str {
        match self {
            Section::Home => "/",
            Section::About => "/about",
            Section::Dashboard => "/dashboard",
        }
    }

    /// Inverse of [`Section::path`]
    pub fn from_path(path: &str) -> Option<Section> {
        match path.trim_end_matches('/') {
            "" => Some(Section::Home),
            rest => rest.strip_prefix('/').and_then(|name| name.parse().ok()),
        }
    }
}

impl FromStr for Section {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "home" => Ok(Section::Home),
            "about" => Ok(Section::About),
            "dashboard" => Ok(Section::Dashboard),
            other => Err(format!("Unknown section: {}", other)),
        }
    }
}

/// Dashboard tab
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tab {
    #[default]
    Predict,
    History,
    Profile,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::Predict, Tab::History, Tab::Profile];

    pub fn label(&self) -> &'static str {
        match self {
            Tab::Predict => "Predict",
            Tab::History => "History",
            Tab::Profile => "Profile",
        }
    }
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Dashboard content for the selected tab
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DashboardView {
    /// Upload form; predictions are attributed to this user
    Predict { user_id: UserId },
    /// History list to fetch for this user
    History { user_id: UserId },
    /// Profile card to fetch for this user
    Profile { user_id: UserId },
}

/// What the main area shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    Home,
    About,
    Dashboard { tab: Tab, view: DashboardView },
    /// Protected section requested without a session
    Denied(Notice),
}

impl Screen {
    pub fn is_denied(&self) -> bool {
        matches!(self, Screen::Denied(_))
    }
}

pub fn render(section: Section, tab: Tab, session: &Session) -> Screen {
    match section {
        Section::Home => Screen::Home,
        Section::About => Screen::About,
        Section::Dashboard => match session.user() {
            Some(user) => Screen::Dashboard {
                tab,
                view: dashboard_view(tab, user),
            },
            None => Screen::Denied(Notice::error(MSG_DASHBOARD_DENIED)),
        },
    }
}

fn dashboard_view(tab: Tab, user: &User) -> DashboardView {
    match tab {
        Tab::Predict => DashboardView::Predict { user_id: user.id },
        Tab::History => DashboardView::History { user_id: user.id },
        Tab::Profile => DashboardView::Profile { user_id: user.id },
    }
}

/// Section to show after a navigation request
///
/// A denied request keeps `current` and returns the notice to display.
pub fn navigate(current: Section, requested: Section, session: &Session) -> (Section, Option<Notice>) {
    match render(requested, Tab::default(), session) {
        Screen::Denied(notice) => (current, Some(notice)),
        _ => (requested, None),
    }
}

/// Dashboard when a session was restored, Home otherwise
pub fn startup_section(session: &Session) -> Section {
    if session.is_logged_in() {
        Section::Dashboard
    } else {
        Section::Home
    }
}

/// Navigation bar state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavState {
    LoggedIn { greeting: String },
    LoggedOut,
}

impl NavState {
    pub fn for_session(session: &Session) -> Self {
        match session.user() {
            Some(user) => NavState::LoggedIn {
                greeting: format!("Welcome, {}", user.name),
            },
            None => NavState::LoggedOut,
        }
    }

    pub fn shows_logout(&self) -> bool {
        matches!(self, NavState::LoggedIn { .. })
    }

    /// Buttons offered in the auth area, left to right
    pub fn actions(&self) -> &'static [NavAction] {
        match self {
            NavState::LoggedIn { .. } => &[NavAction::Logout],
            NavState::LoggedOut => &[NavAction::Login, NavAction::Signup],
        }
    }
}

/// Auth control in the navigation bar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavAction {
    Login,
    Signup,
    Logout,
}

impl NavAction {
    pub fn label(&self) -> &'static str {
        match self {
            NavAction::Login => "Login",
            NavAction::Signup => "Sign Up",
            NavAction::Logout => "Logout",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn logged_in() -> Session {
        Session::logged_in(User::new(1, "Demo User", "a@b.com"))
    }

    #[test]
    fn test_dashboard_guard() {
        let screen = render(Section::Dashboard, Tab::History, &Session::logged_out());
        assert_eq!(
            screen,
            Screen::Denied(Notice::error("Please login to access dashboard"))
        );

        let screen = render(Section::Dashboard, Tab::History, &logged_in());
        assert_eq!(
            screen,
            Screen::Dashboard {
                tab: Tab::History,
                view: DashboardView::History { user_id: 1 }
            }
        );
    }

    #[test]
    fn test_public_sections_ignore_session() {
        assert_eq!(render(Section::About, Tab::Profile, &Session::logged_out()), Screen::About);
        assert_eq!(render(Section::Home, Tab::Predict, &logged_in()), Screen::Home);
    }

    #[test]
    fn test_denied_navigation_keeps_current() {
        let (section, notice) = navigate(Section::About, Section::Dashboard, &Session::logged_out());
        assert_eq!(section, Section::About);
        assert!(notice.unwrap().is_error());

        let (section, notice) = navigate(Section::About, Section::Dashboard, &logged_in());
        assert_eq!(section, Section::Dashboard);
        assert!(notice.is_none());
    }

    #[test]
    fn test_startup_and_nav() {
        assert_eq!(startup_section(&logged_in()), Section::Dashboard);
        assert_eq!(startup_section(&Session::logged_out()), Section::Home);

        assert_eq!(
            NavState::for_session(&logged_in()),
            NavState::LoggedIn {
                greeting: "Welcome, Demo User".to_string()
            }
        );
        assert_eq!(
            NavState::for_session(&Session::logged_out()).actions(),
            &[NavAction::Login, NavAction::Signup]
        );
        assert_eq!(NavState::for_session(&logged_in()).actions(), &[NavAction::Logout]);
    }

    #[test]
    fn test_section_parsing() {
        assert_eq!("Dashboard".parse::<Section>().unwrap(), Section::Dashboard);
        assert!("settings".parse::<Section>().is_err());
    }

    #[test]
    fn test_section_from_path() {
        for section in [Section::Home, Section::About, Section::Dashboard] {
            assert_eq!(Section::from_path(section.path()), Some(section));
        }
        assert_eq!(Section::from_path(""), Some(Section::Home));
        assert_eq!(Section::from_path("/about/"), Some(Section::About));
        assert_eq!(Section::from_path("/settings"), None);
    }
}
