//! Toast Notification Component
//!
//! Shows the current notice.

use bioblood::view::{Notice, NoticeLevel};
use leptos::*;

use crate::state::use_global_state;

/// Toast notification container
#[component]
pub fn Toast() -> impl IntoView {
    let state = use_global_state();
    let notice = state.notice;

    view! {
        <div class="fixed bottom-20 right-4 z-50 space-y-2">
            {move || notice.get().map(|notice| view! { <ToastMessage notice=notice /> })}
        </div>
    }
}

#[component]
fn ToastMessage(notice: Notice) -> impl IntoView {
    let state = use_global_state();

    let (icon, bg_class) = match notice.level {
        NoticeLevel::Success => ("✓", "bg-green-600"),
        NoticeLevel::Error => ("✕", "bg-red-600"),
        NoticeLevel::Warning => ("⚠", "bg-yellow-600"),
        NoticeLevel::Info => ("ℹ", "bg-blue-600"),
    };

    view! {
        <div
            class=format!(
                "flex items-center space-x-3 {} text-white px-4 py-3 rounded-lg shadow-lg \
                 transform transition-all duration-300 ease-out animate-slide-in",
                bg_class
            )
            role="alert"
            on:click=move |_| state.clear_notice()
        >
            <span class="text-lg">{icon}</span>
            <span class="text-sm font-medium">{notice.message}</span>
        </div>
    }
}
