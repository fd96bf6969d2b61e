use leptos::prelude::*;
use wasm_bindgen_futures::spawn_local;

use bellwether_shared::Route;

use crate::api;
use crate::app::{CurrentRoute, navigate, redirect, warn};
use crate::storage::{is_logged_in, session_guard};

/// Password form. A visitor who already holds a valid session is sent back to
/// the map.
#[component]
pub fn LoginPage() -> impl IntoView {
    let CurrentRoute(current) = expect_context();
    let password = RwSignal::new(String::new());
    let error = RwSignal::new(None::<String>);
    let pending = RwSignal::new(false);

    Effect::new(move || {
        if is_logged_in() {
            navigate(current, Route::Map);
        }
    });

    let submit = move |e: web_sys::SubmitEvent| {
        e.prevent_default();
        if pending.get_untracked() {
            return;
        }
        let entered = password.get_untracked();
        if entered.is_empty() {
            error.set(Some("Please enter the password".to_string()));
            return;
        }
        pending.set(true);
        error.set(None);
        spawn_local(async move {
            let outcome = match api::login(&entered).await {
                Ok(response) => session_guard()
                    .login_success(&response.token, chrono::Utc::now())
                    .map(|_| ())
                    .map_err(|e| {
                        warn(&format!("failed to store session: {e}"));
                        "Unable to store the session in this browser".to_string()
                    }),
                Err(message) => Err(message),
            };
            match outcome {
                // Full navigation so every view picks up the new session.
                Ok(()) => redirect("/"),
                Err(message) => {
                    pending.set(false);
                    error.set(Some(message));
                }
            }
        });
    };

    view! {
        <div style="flex: 1; display: flex; align-items: center; justify-content: center; padding: 48px 16px;">
            <div style="width: 100%; max-width: 380px; background: #ffffff; border-radius: 8px; box-shadow: 0 2px 10px rgba(0,0,0,0.08); padding: 32px;">
                <h2 style="margin: 0 0 20px; text-align: center; font-size: 1.6rem;">"Log in"</h2>
                {move || {
                    error
                        .get()
                        .map(|message| {
                            view! {
                                <div style="margin-bottom: 12px; color: #c53030; text-align: center; font-size: 0.9rem;">
                                    {message}
                                </div>
                            }
                        })
                }}
                <form style="display: flex; flex-direction: column; gap: 14px;" on:submit=submit>
                    <input
                        type="password"
                        placeholder="Password"
                        autocomplete="current-password"
                        style="padding: 10px 14px; border: 1px solid #cbd5e0; border-radius: 6px; font-size: 1rem;"
                        prop:value=move || password.get()
                        on:input=move |e| password.set(event_target_value(&e))
                    />
                    <button
                        type="submit"
                        disabled=move || pending.get()
                        style="padding: 10px; border: none; border-radius: 6px; background: #3182ce; color: #ffffff; font-size: 1rem; cursor: pointer;"
                    >
                        {move || if pending.get() { "Logging in..." } else { "Log in" }}
                    </button>
                </form>
            </div>
        </div>
    }
}
