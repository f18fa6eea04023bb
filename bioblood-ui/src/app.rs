//! App Root Component
//!
//! Main application component with routing and global providers.

use bioblood::view::{startup_section, Section};
use leptos::*;
use leptos_router::*;

use crate::components::{AuthModal, Nav, Toast};
use crate::pages::{About, Dashboard, Home};
use crate::state::{provide_global_state, use_global_state};

/// Root application component
#[component]
pub fn App() -> impl IntoView {
    // Provide global state to all components
    provide_global_state();

    view! {
        <Router>
            <div class="min-h-screen bg-gray-900 text-white flex flex-col">
                // Navigation header
                <Nav />

                // Main content area
                <main class="flex-1 container mx-auto px-4 py-8 pb-24">
                    <Routes>
                        <Route path="/" view=Home />
                        <Route path="/about" view=About />
                        <Route path="/dashboard" view=Dashboard />
                        <Route path="/*any" view=NotFound />
                    </Routes>
                </main>

                <RestoreSection />

                // Footer with request status
                <Footer />

                <AuthModal />

                // Toast notifications
                <Toast />
            </div>
        </Router>
    }
}

/// Opens the dashboard on first load when a session was restored
#[component]
fn RestoreSection() -> impl IntoView {
    let state = use_global_state();
    let pathname = use_location().pathname;
    let go = use_navigate();

    let section = startup_section(&state.session.get_untracked());
    if section != Section::Home
        && Section::from_path(&pathname.get_untracked()) == Some(Section::Home)
    {
        // After the router has finished its first render
        request_animation_frame(move || {
            go(section.path(), NavigateOptions { replace: true, ..Default::default() });
        });
    }
}

/// Footer component showing the request status
#[component]
fn Footer() -> impl IntoView {
    let state = use_global_state();
    let loading = state.loading;

    view! {
        <footer class="fixed bottom-0 left-0 right-0 bg-gray-800 border-t border-gray-700 py-3 px-4">
            <div class="container mx-auto flex items-center justify-between text-sm">
                <div class="text-gray-400">"BioBlood © 2024"</div>

                // Loading indicator
                {move || {
                    if loading.get() {
                        view! {
                            <div class="flex items-center space-x-2 text-red-400">
                                <div class="loading-spinner w-4 h-4" />
                                <span>"Processing..."</span>
                            </div>
                        }.into_view()
                    } else {
                        view! {}.into_view()
                    }
                }}
            </div>
        </footer>
    }
}

/// 404 Not Found page
#[component]
fn NotFound() -> impl IntoView {
    view! {
        <div class="flex flex-col items-center justify-center min-h-[60vh] text-center">
            <div class="text-6xl mb-4">"🔍"</div>
            <h1 class="text-3xl font-bold mb-2">"Page Not Found"</h1>
            <p class="text-gray-400 mb-6">"The page you're looking for doesn't exist."</p>
            <A
                href="/"
                class="px-6 py-3 bg-red-600 hover:bg-red-700 rounded-lg font-medium transition-colors"
            >
                "Go Home"
            </A>
        </div>
    }
}
