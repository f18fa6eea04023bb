//! Navigation Component
//!
//! Header navigation bar with section links and the login, signup and logout controls.

use bioblood::view::notice::MSG_LOGOUT_OK;
use bioblood::view::{navigate, NavAction, NavState, Section};
use leptos::*;
use leptos_router::{use_location, use_navigate, A};

use crate::state::{use_global_state, AuthMode};

/// Navigation header component
#[component]
pub fn Nav() -> impl IntoView {
    let state = use_global_state();
    let session = state.session;
    let auth_modal = state.auth_modal;
    let nav_state = create_memo(move |_| NavState::for_session(&session.get()));

    let on_logout = {
        let go = use_navigate();
        move |_: ev::MouseEvent| {
            match state.log_out() {
                Ok(()) => state.show_success(MSG_LOGOUT_OK),
                Err(e) => state.show_error(&e.to_string()),
            }
            go(Section::Home.path(), Default::default());
        }
    };

    view! {
        <nav class="bg-gray-800 border-b border-gray-700">
            <div class="container mx-auto px-4">
                <div class="flex items-center justify-between h-16">
                    // Logo and brand
                    <A href="/" class="flex items-center space-x-3">
                        <span class="text-2xl">"🩸"</span>
                        <span class="text-xl font-bold text-white">"BioBlood"</span>
                    </A>

                    // Section links
                    <div class="flex items-center space-x-1">
                        <NavLink section=Section::Home label="Home" />
                        <NavLink section=Section::About label="About" />
                        <NavLink section=Section::Dashboard label="Dashboard" />
                    </div>

                    // Auth controls
                    <div class="flex items-center space-x-3">
                        {move || {
                            let nav = nav_state.get();
                            let greeting = match &nav {
                                NavState::LoggedIn { greeting } => Some(greeting.clone()),
                                NavState::LoggedOut => None,
                            };
                            let on_logout = on_logout.clone();

                            view! {
                                {greeting.map(|g| view! { <span class="text-gray-300">{g}</span> })}
                                {nav.actions().iter().map(|&action| {
                                    let on_logout = on_logout.clone();
                                    let (class, mode) = match action {
                                        NavAction::Login => ("bg-red-600 hover:bg-red-700", Some(AuthMode::Login)),
                                        NavAction::Signup => ("bg-gray-700 hover:bg-gray-600", Some(AuthMode::Signup)),
                                        NavAction::Logout => ("bg-gray-700 hover:bg-gray-600", None),
                                    };
                                    view! {
                                        <button
                                            class=format!("px-4 py-2 rounded-lg transition-colors {}", class)
                                            on:click=move |ev: ev::MouseEvent| match mode {
                                                Some(mode) => auth_modal.set(Some(mode)),
                                                None => on_logout(ev),
                                            }
                                        >
                                            {action.label()}
                                        </button>
                                    }
                                }).collect_view()}
                            }
                        }}
                    </div>
                </div>
            </div>
        </nav>
    }
}

/// Section link; a denied request stays put and shows the reason
#[component]
fn NavLink(
    section: Section,
    label: &'static str,
) -> impl IntoView {
    let state = use_global_state();
    let pathname = use_location().pathname;
    let go = use_navigate();

    let current = move || Section::from_path(&pathname.get()).unwrap_or_default();
    let on_click = move |_: ev::MouseEvent| {
        let current = Section::from_path(&pathname.get_untracked()).unwrap_or_default();
        match navigate(current, section, &state.session.get_untracked()) {
            (_, Some(notice)) => state.show(notice),
            (target, None) => go(target.path(), Default::default()),
        }
    };

    view! {
        <button
            class="px-4 py-2 rounded-lg text-gray-300 hover:text-white hover:bg-gray-700 transition-colors"
            class:bg-gray-700=move || current() == section
            on:click=on_click
        >
            {label}
        </button>
    }
}
