use leptos::prelude::*;
use wasm_bindgen_futures::spawn_local;

use bellwether_shared::format::format_number;
use bellwether_shared::{
    DocumentSync, PoliticalCategory, Route, StateDetail, StateRecord, StatesDetailDocument,
};

use crate::api;
use crate::app::{NavLink, Table, warn};
use crate::editor::SectionEditor;
use crate::session::use_session_check;

const BACK_LINK_STYLE: &str = "display: inline-block; color: #4a5568; text-decoration: none; margin-bottom: 16px;";

#[derive(Debug, Clone, PartialEq)]
enum LoadState {
    Loading,
    Ready(DocumentSync),
    /// The document could not be read. Default sections are shown read-only
    /// so a save can never replace the stored document with a partial one.
    Failed,
}

/// `/state/:name`. Unknown slugs get a not-found view.
#[component]
pub fn DetailPage(slug: String) -> impl IntoView {
    let Table(table) = expect_context();
    let record = Memo::new(move |_| table.with(|t| t.find_by_slug(&slug).cloned()));

    view! {
        {move || match record.get() {
            Some(record) => view! { <StateDetailView record=record /> }.into_any(),
            None => {
                view! {
                    <div style="padding: 48px; text-align: center;">
                        <h1 style="font-size: 1.5rem; margin-bottom: 12px;">"State not found"</h1>
                        <NavLink to=Route::Map style="color: #3182ce;">"\u{2190} Back to Map"</NavLink>
                    </div>
                }
                    .into_any()
            }
        }}
    }
}

/// Send `document`, then whatever edits queued up behind it, until the
/// working copy is stored or a write fails.
fn push_document(
    load: RwSignal<LoadState>,
    status: RwSignal<Option<&'static str>>,
    error: RwSignal<Option<String>>,
    document: StatesDetailDocument,
) {
    status.set(Some("Saving..."));
    error.set(None);
    spawn_local(async move {
        let mut outgoing = document;
        loop {
            let outcome = api::save_states_detail(&outgoing).await;
            let mut next = None;
            load.update(|state| {
                if let LoadState::Ready(sync) = state {
                    next = match &outcome {
                        Ok(()) => sync.write_succeeded(),
                        Err(_) => {
                            sync.write_failed();
                            None
                        }
                    };
                }
            });
            match (outcome, next) {
                (Ok(()), Some(document)) => outgoing = document,
                (Ok(()), None) => {
                    status.set(Some("Saved"));
                    return;
                }
                (Err(e), _) => {
                    warn(&format!("failed to save states detail: {e}"));
                    status.set(None);
                    error.set(Some(e.user_message()));
                    return;
                }
            }
        }
    });
}

#[component]
fn StateDetailView(record: StateRecord) -> impl IntoView {
    let name = StoredValue::new(record.name.clone());
    let load = RwSignal::new(LoadState::Loading);
    let error = RwSignal::new(None::<String>);
    let status = RwSignal::new(None::<&'static str>);
    let new_title = RwSignal::new(String::new());
    let can_edit = use_session_check();

    Effect::new(move || {
        spawn_local(async move {
            match api::fetch_states_detail().await {
                Ok(document) => load.set(LoadState::Ready(DocumentSync::new(document))),
                Err(e) => {
                    warn(&format!("failed to load states detail: {e}"));
                    error.set(Some(e.user_message()));
                    load.set(LoadState::Failed);
                }
            }
        });
    });

    let detail = Memo::new(move |_| {
        name.with_value(|name| {
            load.with(|state| match state {
                LoadState::Ready(sync) => sync.detail_for(name),
                _ => StateDetail::default_for(name),
            })
        })
    });
    let deletable = Memo::new(move |_| detail.with(StateDetail::can_delete));
    let loading = Memo::new(move |_| load.with(|state| matches!(state, LoadState::Loading)));
    let writable =
        Memo::new(move |_| can_edit.get() && load.with(|state| matches!(state, LoadState::Ready(_))));

    // Full-document replacement. Edits apply to the working copy at once and
    // reach the backend one write at a time.
    let commit = move |updated: StateDetail| {
        if !can_edit.get_untracked() {
            return;
        }
        let mut outgoing = None;
        load.update(|state| {
            if let LoadState::Ready(sync) = state {
                outgoing = sync.edit(&name.get_value(), updated, chrono::Utc::now());
            }
        });
        if let Some(document) = outgoing {
            push_document(load, status, error, document);
        }
    };

    let save_section = move |id: String, html: String| {
        let mut updated = detail.get_untracked();
        match updated.replace_content(&id, html) {
            Ok(()) => commit(updated),
            Err(e) => error.set(Some(e.to_string())),
        }
    };
    let delete_section = move |id: String| {
        let mut updated = detail.get_untracked();
        match updated.delete_section(&id) {
            Ok(_) => commit(updated),
            Err(e) => error.set(Some(e.to_string())),
        }
    };
    let add_section = move |e: web_sys::SubmitEvent| {
        e.prevent_default();
        let title = new_title.get_untracked();
        if title.trim().is_empty() {
            return;
        }
        let mut updated = detail.get_untracked();
        match updated.add_section(&title, js_sys::Date::now() as i64) {
            Ok(_) => {
                new_title.set(String::new());
                commit(updated);
            }
            Err(e) => error.set(Some(e.to_string())),
        }
    };

    let abbreviation = if record.abbreviation.is_empty() {
        "??".to_string()
    } else {
        record.abbreviation.clone()
    };
    let category_label = record
        .political_status
        .map(PoliticalCategory::label)
        .unwrap_or("Unclassified");
    let capital = record.capital.clone().unwrap_or_else(|| "\u{2014}".to_string());
    let population = record
        .population
        .map(format_number)
        .unwrap_or_else(|| "\u{2014}".to_string());

    view! {
        <div style="max-width: 1100px; width: 100%; margin: 0 auto; padding: 32px 20px; box-sizing: border-box;">
            <NavLink to=Route::Map style=BACK_LINK_STYLE>"\u{2190} Back to Map"</NavLink>

            <div style="background: #ffffff; border-radius: 8px; box-shadow: 0 2px 10px rgba(0,0,0,0.08); overflow: hidden; margin-bottom: 24px;">
                <div style="display: flex; align-items: center; gap: 24px; padding: 32px; background: linear-gradient(135deg, #334155, #1e293b);">
                    <div style="width: 88px; height: 88px; background: #ffffff; border-radius: 12px; display: flex; align-items: center; justify-content: center; font-size: 2rem; font-weight: 700; color: #334155;">
                        {abbreviation}
                    </div>
                    <div>
                        <h1 style="margin: 0 0 8px; font-size: 2.2rem; color: #ffffff;">{record.name.clone()}</h1>
                        <span style="display: inline-block; padding: 6px 14px; border-radius: 999px; background: rgba(255,255,255,0.12); color: #ffffff; font-size: 0.85rem; font-weight: 600;">
                            {category_label}
                        </span>
                    </div>
                </div>
                <div style="padding: 24px 32px;">
                    <h2 style="margin: 0 0 12px; font-size: 1.2rem;">"Basic Information"</h2>
                    <dl style="margin: 0; display: grid; grid-template-columns: repeat(2, minmax(0, 220px)); gap: 12px;">
                        <div style="background: #f7fafc; padding: 12px 16px; border-radius: 8px;">
                            <dt style="font-size: 0.8rem; color: #718096;">"Capital"</dt>
                            <dd style="margin: 4px 0 0; font-size: 1.1rem; font-weight: 600;">{capital}</dd>
                        </div>
                        <div style="background: #f7fafc; padding: 12px 16px; border-radius: 8px;">
                            <dt style="font-size: 0.8rem; color: #718096;">"Population"</dt>
                            <dd style="margin: 4px 0 0; font-size: 1.1rem; font-weight: 600;">{population}</dd>
                        </div>
                    </dl>
                </div>
            </div>

            {move || {
                error
                    .get()
                    .map(|message| {
                        view! {
                            <div style="margin-bottom: 16px; padding: 10px 14px; background: #fff5f5; color: #c53030; border: 1px solid #feb2b2; border-radius: 6px;">
                                {message}
                            </div>
                        }
                    })
            }}
            {move || {
                status
                    .get()
                    .map(|message| {
                        view! { <p style="margin: 0 0 12px; color: #2f855a; font-size: 0.85rem;">{message}</p> }
                    })
            }}
            {move || {
                (!can_edit.get())
                    .then(|| {
                        view! {
                            <p style="margin: 0 0 16px; font-size: 0.9rem; color: #4a5568;">
                                <NavLink to=Route::Login style="color: #3182ce;">"Log in to edit"</NavLink>
                            </p>
                        }
                    })
            }}

            {move || {
                if loading.get() {
                    return view! { <p style="color: #718096;">"Loading sections..."</p> }.into_any();
                }
                let editable = writable.get();
                view! {
                    <div style="display: flex; flex-direction: column; gap: 20px;">
                        <For
                            each=move || detail.get().sections
                            key=|section| section.id.clone()
                            let:section
                        >
                            {
                                let id = StoredValue::new(section.id.clone());
                                view! {
                                    <SectionEditor
                                        section=section
                                        editable=editable
                                        deletable=deletable
                                        on_save=Callback::new(move |html| save_section(id.get_value(), html))
                                        on_delete=Callback::new(move |_| delete_section(id.get_value()))
                                    />
                                }
                            }
                        </For>
                    </div>
                    {editable
                        .then(|| {
                            view! {
                                <form
                                    style="display: flex; gap: 8px; margin-top: 20px;"
                                    on:submit=add_section
                                >
                                    <input
                                        type="text"
                                        placeholder="New section title"
                                        style="flex: 1; padding: 8px 12px; border: 1px solid #cbd5e0; border-radius: 6px;"
                                        prop:value=move || new_title.get()
                                        on:input=move |e| new_title.set(event_target_value(&e))
                                    />
                                    <button
                                        type="submit"
                                        style="padding: 8px 16px; border: none; border-radius: 6px; background: #3182ce; color: #ffffff; cursor: pointer;"
                                    >
                                        "Add section"
                                    </button>
                                </form>
                            }
                        })}
                }
                    .into_any()
            }}
        </div>
    }
}

