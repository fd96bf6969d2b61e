use leptos::prelude::*;
use wasm_bindgen_futures::spawn_local;

use bellwether_shared::MIN_PASSWORD_LEN;

use crate::api;
use crate::app::{redirect, warn};
use crate::storage::session_guard;

/// Checked before the request goes out. The retry client treats a 400 like
/// any other failure and would repeat it.
fn check_new_password(candidate: &str) -> Result<(), String> {
    if candidate.trim().chars().count() < MIN_PASSWORD_LEN {
        return Err(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        ));
    }
    Ok(())
}

/// Password rotation and logout. Rendered behind the session guard.
#[component]
pub fn AdminSettings() -> impl IntoView {
    let new_password = RwSignal::new(String::new());
    let message = RwSignal::new(None::<String>);
    let error = RwSignal::new(None::<String>);
    let pending = RwSignal::new(false);

    let submit = move |e: web_sys::SubmitEvent| {
        e.prevent_default();
        if pending.get_untracked() {
            return;
        }
        let candidate = new_password.get_untracked();
        message.set(None);
        if let Err(reason) = check_new_password(&candidate) {
            error.set(Some(reason));
            return;
        }
        error.set(None);
        pending.set(true);
        spawn_local(async move {
            match api::change_password(&candidate).await {
                Ok(reply) => {
                    message.set(Some(reply.message));
                    new_password.set(String::new());
                }
                Err(e) => {
                    warn(&format!("password change failed: {e}"));
                    error.set(Some(e.user_message()));
                }
            }
            pending.set(false);
        });
    };

    let logout = move |_| {
        session_guard().logout();
        redirect("/");
    };

    view! {
        <div style="padding: 32px 16px;">
            <div style="max-width: 420px; margin: 0 auto; background: #ffffff; border-radius: 8px; box-shadow: 0 2px 10px rgba(0,0,0,0.08); padding: 24px;">
                <div style="display: flex; justify-content: space-between; align-items: center; margin-bottom: 20px;">
                    <h1 style="margin: 0; font-size: 1.5rem;">"Admin settings"</h1>
                    <button
                        type="button"
                        style="padding: 6px 12px; border: 1px solid #cbd5e0; border-radius: 6px; background: #ffffff; cursor: pointer;"
                        on:click=logout
                    >
                        "Log out"
                    </button>
                </div>
                <form style="display: flex; flex-direction: column; gap: 12px;" on:submit=submit>
                    <label style="display: flex; flex-direction: column; gap: 4px; font-size: 0.85rem; color: #4a5568;">
                        "New password"
                        <input
                            type="password"
                            autocomplete="new-password"
                            style="padding: 8px 12px; border: 1px solid #cbd5e0; border-radius: 6px; font-size: 1rem;"
                            prop:value=move || new_password.get()
                            on:input=move |e| new_password.set(event_target_value(&e))
                        />
                    </label>
                    {move || {
                        message
                            .get()
                            .map(|text| view! { <div style="color: #2f855a; font-size: 0.85rem;">{text}</div> })
                    }}
                    {move || {
                        error
                            .get()
                            .map(|text| view! { <div style="color: #c53030; font-size: 0.85rem;">{text}</div> })
                    }}
                    <button
                        type="submit"
                        disabled=move || pending.get()
                        style="padding: 10px; border: none; border-radius: 6px; background: #3182ce; color: #ffffff; cursor: pointer;"
                    >
                        "Change password"
                    </button>
                </form>
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_passwords_are_refused_locally() {
        assert!(check_new_password("").is_err());
        assert!(check_new_password("  ab  ").is_err());
        assert_eq!(
            check_new_password("abc"),
            Err("Password must be at least 4 characters".to_string())
        );
        assert!(check_new_password("abcd").is_ok());
    }
}
