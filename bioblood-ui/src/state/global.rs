//! Global Application State
//!
//! Reactive state management using Leptos signals. The session store and the
//! gateway are created once here and reached through context; nothing else
//! keeps its own copy.

use bioblood::gateway::ApiGateway;
use bioblood::model::User;
use bioblood::prediction::PredictionFlow;
use bioblood::session::{Session, SessionResult, SessionStore};
use bioblood::view::Notice;
use leptos::*;
use std::sync::Arc;

use crate::api::{self, LocalStorage};

/// Which form the auth modal shows
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuthMode {
    Login,
    Signup,
}

/// Global application state provided to all components
#[derive(Clone)]
pub struct GlobalState {
    /// Owner of the durable session; write through [`GlobalState::log_in`]
    store: StoredValue<SessionStore>,
    /// Reactive mirror of the store's session
    pub session: RwSignal<Session>,
    pub gateway: StoredValue<ApiGateway>,
    /// The predict tab's upload cycle
    pub flow: RwSignal<PredictionFlow>,
    /// Open auth modal, if any
    pub auth_modal: RwSignal<Option<AuthMode>>,
    /// Global loading state
    pub loading: RwSignal<bool>,
    /// Toast currently shown
    pub notice: RwSignal<Option<Notice>>,
}

/// Provide global state to the component tree
pub fn provide_global_state() {
    let store = SessionStore::open(Arc::new(LocalStorage));
    let session = store.session().clone();

    let state = GlobalState {
        store: store_value(store),
        session: create_rw_signal(session),
        gateway: store_value(api::build_gateway()),
        flow: create_rw_signal(PredictionFlow::new()),
        auth_modal: create_rw_signal(None),
        loading: create_rw_signal(false),
        notice: create_rw_signal(None),
    };

    provide_context(state);
}

/// The global state; panics outside the App tree
pub fn use_global_state() -> GlobalState {
    use_context::<GlobalState>().expect("GlobalState not found")
}

impl GlobalState {
    pub fn gateway(&self) -> ApiGateway {
        self.gateway.get_value()
    }

    /// Persist `user` as the logged-in user
    pub fn log_in(&self, user: User) -> SessionResult<()> {
        let result = self.store.try_update_value(|store| store.save(user));
        self.sync_session();
        result.unwrap_or(Ok(()))
    }

    pub fn log_out(&self) -> SessionResult<()> {
        let result = self.store.try_update_value(|store| store.clear());
        self.sync_session();
        self.flow.update(|flow| flow.invalidate());
        result.unwrap_or(Ok(()))
    }

    fn sync_session(&self) {
        if let Some(session) = self.store.try_with_value(|store| store.session().clone()) {
            self.session.set(session);
        }
    }

    /// Show a notice (auto-clears after timeout)
    pub fn show(&self, notice: Notice) {
        let timeout = if notice.is_error() { 5000 } else { 3000 };
        self.notice.set(Some(notice.clone()));

        let notice_signal = self.notice;
        gloo_timers::callback::Timeout::new(timeout, move || {
            // A newer notice keeps its own timer
            if notice_signal.get_untracked().as_ref() == Some(&notice) {
                notice_signal.set(None);
            }
        })
        .forget();
    }

    pub fn show_success(&self, message: &str) {
        self.show(Notice::success(message));
    }

    pub fn show_error(&self, message: &str) {
        self.show(Notice::error(message));
    }

    pub fn clear_notice(&self) {
        self.notice.set(None);
    }
}
