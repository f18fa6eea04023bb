//! Prediction Panel
//!
//! Fingerprint upload with preview, the prediction result and the
//! "was this correct?" feedback loop. State lives in the global
//! [`PredictionFlow`]; this component only binds it to the DOM.

use bioblood::model::{BloodGroup, Feedback, SelectedFile};
use bioblood::prediction::{run_submission, Completion, FlowState, PredictionFlow};
use bioblood::view::format_confidence;
use leptos::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;

use crate::components::loading::LoadingOverlay;
use crate::state::{use_global_state, GlobalState};

/// Upload, predict and feedback panel
#[component]
pub fn PredictionPanel() -> impl IntoView {
    let state = use_global_state();
    let flow = state.flow;
    let (preview, set_preview) = create_signal(None::<String>);

    let busy = Signal::derive(move || flow.with(PredictionFlow::is_busy));
    let can_submit = Signal::derive(move || flow.with(PredictionFlow::can_submit));

    let on_file_change = {
        let state = state.clone();
        move |ev: ev::Event| {
            let Some(file) = event_file(&ev) else {
                return;
            };

            let state = state.clone();
            spawn_local(async move {
                match read_file(&file).await {
                    Ok(selected) => match flow.try_update(|f| f.select_file(selected)) {
                        // The previous selection and its preview stay in place
                        Some(Err(notice)) => state.show(notice),
                        Some(Ok(())) => {
                            if let Some(old) = preview.get_untracked() {
                                let _ = web_sys::Url::revoke_object_url(&old);
                            }
                            set_preview.set(web_sys::Url::create_object_url_with_blob(&file).ok());
                        }
                        None => {}
                    },
                    Err(e) => state.show_error(&e),
                }
            });
        }
    };

    let on_predict = {
        let state = state.clone();
        move |_: ev::MouseEvent| submit(state.clone())
    };

    // Leaving the panel abandons the cycle; a prediction still in flight
    // comes back stale and is dropped
    on_cleanup(move || {
        flow.update(|f| f.invalidate());
        if let Some(url) = preview.get_untracked() {
            let _ = web_sys::Url::revoke_object_url(&url);
        }
    });

    view! {
        <section class="bg-gray-800 rounded-xl p-6 space-y-6">
            <h2 class="text-xl font-semibold">"Upload Fingerprint"</h2>

            <LoadingOverlay loading=busy>
                <label class="block border-2 border-dashed border-gray-600 rounded-lg p-8 text-center cursor-pointer hover:border-red-500 transition-colors">
                    {move || match preview.get() {
                        Some(url) => view! {
                            <img src=url alt="Fingerprint preview" class="mx-auto max-h-64 rounded" />
                        }.into_view(),
                        None => view! {
                            <p class="text-gray-400">"Click to choose a fingerprint image"</p>
                        }.into_view(),
                    }}
                    <input
                        type="file"
                        accept="image/*"
                        class="hidden"
                        on:change=on_file_change
                    />
                </label>
            </LoadingOverlay>

            <button
                class="w-full px-6 py-3 bg-red-600 hover:bg-red-700 rounded-lg font-medium transition-colors disabled:opacity-50"
                disabled=move || !can_submit.get()
                on:click=on_predict
            >
                {move || if busy.get() { "Analyzing..." } else { "Predict Blood Group" }}
            </button>

            <ResultCard />
        </section>
    }
}

/// Prediction result plus the feedback controls
#[component]
fn ResultCard() -> impl IntoView {
    let state = use_global_state();
    let flow = state.flow;

    let result = create_memo(move |_| flow.with(|f| f.result().cloned()));
    let selecting = create_memo(move |_| flow.with(PredictionFlow::shows_group_selector));
    // Still asked after a failed "yes" so it can be sent again
    let asking = create_memo(move |_| {
        flow.with(|f| {
            matches!(f.state(), FlowState::ResultShown | FlowState::FeedbackPending)
                && !f.shows_group_selector()
        })
    });
    let (actual, set_actual) = create_signal(BloodGroup::APositive);

    let on_yes = {
        let state = state.clone();
        move |_: ev::MouseEvent| match flow.try_update(|f| f.answer(true)) {
            Some(Ok(Some(feedback))) => send_feedback(state.clone(), feedback),
            Some(Err(e)) => state.show_error(&e.to_string()),
            _ => {}
        }
    };

    let on_no = {
        let state = state.clone();
        move |_: ev::MouseEvent| {
            if let Some(Err(e)) = flow.try_update(|f| f.answer(false)) {
                state.show_error(&e.to_string());
            }
        }
    };

    let on_correct = {
        let state = state.clone();
        move |_: ev::MouseEvent| match flow.with_untracked(|f| f.correct_to(actual.get_untracked())) {
            Ok(feedback) => send_feedback(state.clone(), feedback),
            Err(e) => state.show_error(&e.to_string()),
        }
    };

    view! {
        {move || result.get().map(|response| {
            let prediction = response.prediction;
            view! {
                <div class="bg-gray-900 rounded-lg p-6 space-y-4">
                    <div class="text-center">
                        <p class="text-gray-400">"Predicted Blood Group"</p>
                        <p class="text-5xl font-bold text-red-500">{prediction.blood_group.to_string()}</p>
                        <p class="text-gray-300 mt-2">
                            "Confidence: "{format_confidence(prediction.confidence)}
                        </p>
                    </div>

                    <ul class="grid grid-cols-3 gap-2 text-sm">
                        {prediction.model_predictions.into_iter().map(|(model, group)| view! {
                            <li class="bg-gray-800 rounded p-2 text-center">
                                <span class="block text-gray-400">{model}</span>
                                <span class="font-semibold">{group.to_string()}</span>
                            </li>
                        }).collect_view()}
                    </ul>
                </div>
            }
        })}

        <Show when=move || asking.get()>
            <div class="flex items-center justify-center space-x-3">
                <span class="text-gray-300">"Is this prediction correct?"</span>
                <button class="px-4 py-2 rounded-lg bg-green-600 hover:bg-green-700" on:click=on_yes.clone()>
                    "Yes"
                </button>
                <button class="px-4 py-2 rounded-lg bg-gray-600 hover:bg-gray-500" on:click=on_no.clone()>
                    "No"
                </button>
            </div>
        </Show>

        <Show when=move || selecting.get()>
            <div class="flex items-center justify-center space-x-3">
                <span class="text-gray-300">"Actual blood group:"</span>
                <select
                    class="px-3 py-2 rounded-lg bg-gray-700 border border-gray-600"
                    on:change=move |ev| {
                        if let Ok(group) = event_target_value(&ev).parse() {
                            set_actual.set(group);
                        }
                    }
                >
                    {BloodGroup::ALL.into_iter().map(|group| view! {
                        <option value=group.as_str() selected=move || actual.get() == group>
                            {group.as_str()}
                        </option>
                    }).collect_view()}
                </select>
                <button class="px-4 py-2 rounded-lg bg-red-600 hover:bg-red-700" on:click=on_correct.clone()>
                    "Submit"
                </button>
            </div>
        </Show>
    }
}

/// Start a submission and apply its completion
///
/// The completion is dropped by the flow when the view changed meanwhile.
fn submit(state: GlobalState) {
    let flow = state.flow;
    let session = state.session.get_untracked();

    let ticket = match flow.try_update(|f| f.begin_submit(&session)) {
        Some(Ok(ticket)) => ticket,
        Some(Err(e)) => {
            state.show_error(&e.to_string());
            return;
        }
        None => return,
    };

    state.loading.set(true);
    spawn_local(async move {
        let gateway = state.gateway();
        let outcome = run_submission(&gateway, ticket.upload.clone(), session.user_id()).await;

        match flow.try_update(|f| f.finish_submit(&ticket, outcome)) {
            Some(Completion::Failed(notice)) => state.show(notice),
            Some(Completion::Stale) => {
                web_sys::console::log_1(&"Dropped prediction for a previous view".into());
            }
            _ => {}
        }
        state.loading.set(false);
    });
}

fn send_feedback(state: GlobalState, feedback: Feedback) {
    spawn_local(async move {
        let outcome = state.gateway().feedback(&feedback).await;
        if let Some(notice) = state.flow.try_update(|f| f.finish_feedback(outcome)) {
            state.show(notice);
        }
    });
}

fn event_file(ev: &ev::Event) -> Option<web_sys::File> {
    let input = ev.target()?.dyn_into::<web_sys::HtmlInputElement>().ok()?;
    input.files()?.get(0)
}

async fn read_file(file: &web_sys::File) -> Result<SelectedFile, String> {
    let buffer = JsFuture::from(file.array_buffer())
        .await
        .map_err(|e| format!("Failed to read file: {:?}", e))?;
    let bytes = js_sys::Uint8Array::new(&buffer).to_vec();

    Ok(SelectedFile::new(file.name(), file.type_(), bytes))
}
