//! Auth Modal Component
//!
//! Login and signup forms. A successful submit saves the session, closes
//! the modal and opens the dashboard.

use bioblood::view::notice::{MSG_LOGIN_OK, MSG_SIGNUP_OK};
use bioblood::view::Section;
use leptos::*;
use leptos_router::use_navigate;

use crate::components::loading::InlineLoading;
use crate::state::{use_global_state, AuthMode};

/// Modal shown while `auth_modal` is set
#[component]
pub fn AuthModal() -> impl IntoView {
    let state = use_global_state();
    let auth_modal = state.auth_modal;

    view! {
        {move || auth_modal.get().map(|mode| view! {
            <div class="fixed inset-0 z-40 bg-black/60 flex items-center justify-center">
                <div class="bg-gray-800 rounded-xl p-6 w-full max-w-md shadow-xl">
                    <div class="flex items-center justify-between mb-4">
                        <h2 class="text-xl font-semibold">
                            {match mode {
                                AuthMode::Login => "Login",
                                AuthMode::Signup => "Create Account",
                            }}
                        </h2>
                        <button
                            class="text-gray-400 hover:text-white"
                            on:click=move |_| auth_modal.set(None)
                        >
                            "✕"
                        </button>
                    </div>
                    <AuthForm mode=mode />
                </div>
            </div>
        })}
    }
}

#[component]
fn AuthForm(mode: AuthMode) -> impl IntoView {
    let state = use_global_state();
    let go = use_navigate();

    let (name, set_name) = create_signal(String::new());
    let (email, set_email) = create_signal(String::new());
    let (password, set_password) = create_signal(String::new());
    let (submitting, set_submitting) = create_signal(false);

    let on_submit = move |ev: ev::SubmitEvent| {
        ev.prevent_default();
        if submitting.get_untracked() {
            return;
        }
        set_submitting.set(true);

        let state = state.clone();
        let go = go.clone();
        let (name, email, password) = (
            name.get_untracked(),
            email.get_untracked(),
            password.get_untracked(),
        );

        spawn_local(async move {
            let gateway = state.gateway();
            let result = match mode {
                AuthMode::Login => gateway.login(&email, &password).await,
                AuthMode::Signup => gateway.signup(&name, &email, &password).await,
            };

            match result {
                Ok(user) => match state.log_in(user) {
                    Ok(()) => {
                        state.auth_modal.set(None);
                        state.show_success(match mode {
                            AuthMode::Login => MSG_LOGIN_OK,
                            AuthMode::Signup => MSG_SIGNUP_OK,
                        });
                        go(Section::Dashboard.path(), Default::default());
                    }
                    Err(e) => state.show_error(&e.to_string()),
                },
                Err(e) => state.show_error(&e.to_string()),
            }
            set_submitting.set(false);
        });
    };

    let input_class = "w-full px-4 py-2 rounded-lg bg-gray-700 border border-gray-600 focus:border-red-500 outline-none";

    view! {
        <form on:submit=on_submit class="space-y-4">
            <Show when=move || mode == AuthMode::Signup>
                <input
                    type="text"
                    placeholder="Full name"
                    required
                    class=input_class
                    prop:value=name
                    on:input=move |ev| set_name.set(event_target_value(&ev))
                />
            </Show>
            <input
                type="email"
                placeholder="Email"
                required
                class=input_class
                prop:value=email
                on:input=move |ev| set_email.set(event_target_value(&ev))
            />
            <input
                type="password"
                placeholder="Password"
                required
                class=input_class
                prop:value=password
                on:input=move |ev| set_password.set(event_target_value(&ev))
            />

            <button
                type="submit"
                class="w-full px-6 py-3 bg-red-600 hover:bg-red-700 rounded-lg font-medium transition-colors disabled:opacity-50"
                disabled=submitting
            >
                {move || if submitting.get() {
                    view! { <InlineLoading /> }.into_view()
                } else {
                    match mode {
                        AuthMode::Login => "Login",
                        AuthMode::Signup => "Sign Up",
                    }.into_view()
                }}
            </button>

            <SwitchMode mode=mode />
        </form>
    }
}

/// "No account yet?" / "Already registered?" link
#[component]
fn SwitchMode(mode: AuthMode) -> impl IntoView {
    let auth_modal = use_global_state().auth_modal;

    let (prompt, label, target) = match mode {
        AuthMode::Login => ("Don't have an account?", "Sign up", AuthMode::Signup),
        AuthMode::Signup => ("Already have an account?", "Login", AuthMode::Login),
    };

    view! {
        <p class="text-sm text-gray-400 text-center">
            {prompt}" "
            <button
                type="button"
                class="text-red-400 hover:text-red-300"
                on:click=move |_| auth_modal.set(Some(target))
            >
                {label}
            </button>
        </p>
    }
}
