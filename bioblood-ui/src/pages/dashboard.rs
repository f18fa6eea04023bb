//! Dashboard Page
//!
//! Predict, history and profile tabs. Only reachable with a session; a
//! direct visit without one is sent back home with the reason.

use bioblood::model::{HistoryEntry, Profile, UserId};
use bioblood::view::{
    history_rows, profile_rows, render, DashboardView, Screen, Section, Tab,
};
use leptos::*;
use leptos_router::Redirect;

use crate::components::{ListSkeleton, Loading, PredictionPanel};
use crate::state::use_global_state;

/// Dashboard page component
#[component]
pub fn Dashboard() -> impl IntoView {
    let state = use_global_state();
    let session = state.session;
    let (tab, set_tab) = create_signal(Tab::default());

    let screen = create_memo(move |_| render(Section::Dashboard, tab.get(), &session.get()));
    // Only a direct visit explains itself; a logout just leaves
    let rendered = store_value(false);

    view! {
        {move || {
            let first = !rendered.get_value();
            rendered.set_value(true);

            match screen.get() {
                Screen::Denied(notice) => {
                    if first {
                        state.show(notice);
                    }
                    view! { <Redirect path=Section::Home.path() /> }.into_view()
                }
                Screen::Dashboard { tab: current, view: content } => view! {
                    <div class="space-y-8">
                        // Page header
                        <div>
                            <h1 class="text-3xl font-bold">"Dashboard"</h1>
                            <p class="text-gray-400 mt-1">"Upload a fingerprint or review past results"</p>
                        </div>

                        // Tab bar
                        <div class="flex space-x-2 border-b border-gray-700">
                            {Tab::ALL.into_iter().map(|t| view! {
                                <button
                                    class="px-4 py-2 -mb-px border-b-2 transition-colors"
                                    class:border-red-500=t == current
                                    class:border-transparent=t != current
                                    on:click=move |_| set_tab.set(t)
                                >
                                    {t.label()}
                                </button>
                            }).collect_view()}
                        </div>

                        {match content {
                            DashboardView::Predict { .. } => view! { <PredictionPanel /> }.into_view(),
                            DashboardView::History { user_id } => view! { <HistoryTab user_id=user_id /> }.into_view(),
                            DashboardView::Profile { user_id } => view! { <ProfileTab user_id=user_id /> }.into_view(),
                        }}
                    </div>
                }.into_view(),
                _ => view! {}.into_view(),
            }
        }}
    }
}

/// Recent predictions, fetched each time the tab opens
#[component]
fn HistoryTab(user_id: UserId) -> impl IntoView {
    let state = use_global_state();
    let (entries, set_entries) = create_signal(None::<Vec<HistoryEntry>>);

    let gateway = state.gateway();
    spawn_local(async move {
        match gateway.history(user_id).await {
            Ok(history) => set_entries.set(Some(history)),
            Err(e) => {
                web_sys::console::error_1(&format!("Failed to fetch history: {}", e).into());
                state.show_error(&e.to_string());
                set_entries.set(Some(Vec::new()));
            }
        }
    });

    view! {
        <section class="bg-gray-800 rounded-xl p-6">
            <h2 class="text-xl font-semibold mb-4">"Prediction History"</h2>
            {move || match entries.get() {
                None => view! { <ListSkeleton count=5 /> }.into_view(),
                Some(entries) if entries.is_empty() => view! {
                    <p class="text-gray-400 text-sm">"No predictions yet"</p>
                }.into_view(),
                Some(entries) => view! {
                    <table class="w-full text-left">
                        <thead>
                            <tr class="text-gray-400 border-b border-gray-700">
                                <th class="py-2">"Date"</th>
                                <th class="py-2">"Result"</th>
                                <th class="py-2">"Confidence"</th>
                            </tr>
                        </thead>
                        <tbody>
                            {history_rows(&entries).into_iter().map(|row| view! {
                                <tr class="border-b border-gray-700 last:border-0">
                                    <td class="py-2">{row.date}</td>
                                    <td class="py-2 font-semibold">{row.result}</td>
                                    <td class="py-2">{row.confidence}</td>
                                </tr>
                            }).collect_view()}
                        </tbody>
                    </table>
                }.into_view(),
            }}
        </section>
    }
}

/// Account details, fetched each time the tab opens
#[component]
fn ProfileTab(user_id: UserId) -> impl IntoView {
    let state = use_global_state();
    let (profile, set_profile) = create_signal(None::<Profile>);
    let (failed, set_failed) = create_signal(false);

    let gateway = state.gateway();
    spawn_local(async move {
        match gateway.profile(user_id).await {
            Ok(p) => set_profile.set(Some(p)),
            Err(e) => {
                web_sys::console::error_1(&format!("Failed to fetch profile: {}", e).into());
                state.show_error(&e.to_string());
                set_failed.set(true);
            }
        }
    });

    view! {
        <section class="bg-gray-800 rounded-xl p-6">
            <h2 class="text-xl font-semibold mb-4">"Profile"</h2>
            {move || match (profile.get(), failed.get()) {
                (Some(profile), _) => view! {
                    <dl class="space-y-3">
                        {profile_rows(&profile).into_iter().map(|(label, value)| view! {
                            <div class="flex justify-between border-b border-gray-700 pb-2">
                                <dt class="text-gray-400">{label}</dt>
                                <dd>{value}</dd>
                            </div>
                        }).collect_view()}
                    </dl>
                }.into_view(),
                (None, true) => view! {
                    <p class="text-gray-400 text-sm">"Profile unavailable"</p>
                }.into_view(),
                (None, false) => view! { <Loading /> }.into_view(),
            }}
        </section>
    }
}
