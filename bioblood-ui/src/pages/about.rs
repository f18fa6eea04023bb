//! About Page

use bioblood::view::content::{ABOUT_FEATURES, ABOUT_SUMMARY, ABOUT_TITLE};
use leptos::*;

#[component]
pub fn About() -> impl IntoView {
    view! {
        <div class="space-y-8">
            <div>
                <h1 class="text-3xl font-bold">{ABOUT_TITLE}</h1>
                <p class="text-gray-400 mt-2">{ABOUT_SUMMARY}</p>
            </div>

            <div class="grid md:grid-cols-3 gap-6">
                {ABOUT_FEATURES.into_iter().map(|feature| view! {
                    <section class="bg-gray-800 rounded-xl p-6">
                        <h2 class="text-xl font-semibold mb-2">{feature.title}</h2>
                        <p class="text-gray-400">{feature.description}</p>
                    </section>
                }).collect_view()}
            </div>
        </div>
    }
}
