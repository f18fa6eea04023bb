//! Home Page
//!
//! Landing section with the headline numbers.

use bioblood::view::content::{HOME_STATS, HOME_TAGLINE, HOME_TITLE};
use bioblood::view::Section;
use leptos::*;
use leptos_router::use_navigate;

use crate::state::{use_global_state, AuthMode};

#[component]
pub fn Home() -> impl IntoView {
    let state = use_global_state();
    let session = state.session;
    let auth_modal = state.auth_modal;
    let go = use_navigate();

    // Logged in: straight to the dashboard, otherwise ask to log in first
    let on_start = move |_: ev::MouseEvent| {
        if session.get_untracked().is_logged_in() {
            go(Section::Dashboard.path(), Default::default());
        } else {
            auth_modal.set(Some(AuthMode::Login));
        }
    };

    view! {
        <div class="space-y-12 text-center">
            <section class="py-12">
                <h1 class="text-5xl font-bold mb-4">{HOME_TITLE}</h1>
                <p class="text-xl text-gray-400 mb-8">{HOME_TAGLINE}</p>
                <button
                    class="px-8 py-3 bg-red-600 hover:bg-red-700 rounded-lg font-medium transition-colors"
                    on:click=on_start
                >
                    "Get Started"
                </button>
            </section>

            <section class="grid grid-cols-1 md:grid-cols-3 gap-6">
                {HOME_STATS.into_iter().map(|stat| view! {
                    <div class="bg-gray-800 rounded-xl p-6">
                        <p class="text-4xl font-bold text-red-500">{stat.value}</p>
                        <p class="text-gray-400 mt-2">{stat.label}</p>
                    </div>
                }).collect_view()}
            </section>
        </div>
    }
}
