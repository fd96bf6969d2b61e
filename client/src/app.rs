use leptos::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::spawn_local;

use std::cell::RefCell;

use bellwether_shared::{ClassificationTable, Route};

use crate::admin::AdminSettings;
use crate::api;
use crate::detail::DetailPage;
use crate::login::LoginPage;
use crate::map_view::MapPage;
use crate::session::AuthGuard;
use crate::storage::is_logged_in;

struct PopStateBinding {
    window: web_sys::Window,
    _handler: wasm_bindgen::closure::Closure<dyn Fn(web_sys::Event)>,
}

thread_local! {
    static POPSTATE_BINDING: RefCell<Option<PopStateBinding>> = const { RefCell::new(None) };
}

#[derive(Clone, Copy)]
pub(crate) struct CurrentRoute(pub RwSignal<Route>);
/// Builtin classification merged with `/data/states.json` once it arrives.
#[derive(Clone, Copy)]
pub(crate) struct Table(pub RwSignal<ClassificationTable>);
#[derive(Clone, Copy)]
pub(crate) struct SummaryError(pub RwSignal<Option<String>>);

pub(crate) fn warn(message: &str) {
    web_sys::console::warn_1(&JsValue::from_str(message));
}

fn current_route() -> Route {
    web_sys::window()
        .and_then(|w| w.location().pathname().ok())
        .map(|path| Route::parse(&path))
        .unwrap_or(Route::Map)
}

/// Full page navigation. Used after login and on session loss so every view
/// remounts with the new session state.
pub(crate) fn redirect(path: &str) {
    if let Some(window) = web_sys::window() {
        window.location().set_href(path).ok();
    }
}

pub(crate) fn reload() {
    if let Some(window) = web_sys::window() {
        window.location().reload().ok();
    }
}

/// In-app navigation through the history API.
pub(crate) fn navigate(current: RwSignal<Route>, route: Route) {
    if let Some(window) = web_sys::window()
        && let Ok(history) = window.history()
    {
        history
            .push_state_with_url(&JsValue::NULL, "", Some(&route.path()))
            .ok();
    }
    current.set(route);
}

/// Root application component. Resolves the route and provides the shared
/// classification table via context.
#[component]
pub fn App() -> impl IntoView {
    let route: RwSignal<Route> = RwSignal::new(current_route());
    let table: RwSignal<ClassificationTable> = RwSignal::new(ClassificationTable::builtin());
    let summary_error: RwSignal<Option<String>> = RwSignal::new(None);

    provide_context(CurrentRoute(route));
    provide_context(Table(table));
    provide_context(SummaryError(summary_error));

    // Richer per-state records. The builtin table stays in place on failure.
    Effect::new(move || {
        spawn_local(async move {
            match api::fetch_states_summary().await {
                Ok(summary) => {
                    let (merged, report) =
                        ClassificationTable::builtin().merged_with(&summary.states);
                    if !report.is_clean() {
                        warn(&format!(
                            "states summary merged with issues: duplicates={:?} rejected={:?} unnamed={}",
                            report.duplicates, report.rejected_categories, report.skipped_unnamed
                        ));
                    }
                    table.set(merged);
                }
                Err(e) => {
                    warn(&format!("failed to load states summary: {e}"));
                    summary_error.set(Some(e.user_message()));
                }
            }
        });
    });

    // Back/forward buttons
    Effect::new(move || {
        use wasm_bindgen::prelude::*;
        let Some(window) = web_sys::window() else {
            return;
        };

        POPSTATE_BINDING.with(|slot| {
            if let Some(old) = slot.borrow_mut().take() {
                let _ = old.window.remove_event_listener_with_callback(
                    "popstate",
                    old._handler.as_ref().unchecked_ref(),
                );
            }
        });

        let handler = Closure::<dyn Fn(web_sys::Event)>::new(move |_: web_sys::Event| {
            route.set(current_route());
        });
        if window
            .add_event_listener_with_callback("popstate", handler.as_ref().unchecked_ref())
            .is_ok()
        {
            POPSTATE_BINDING.with(|slot| {
                *slot.borrow_mut() = Some(PopStateBinding {
                    window: window.clone(),
                    _handler: handler,
                });
            });
        }
    });

    on_cleanup(|| {
        POPSTATE_BINDING.with(|slot| {
            if let Some(old) = slot.borrow_mut().take() {
                let _ = old.window.remove_event_listener_with_callback(
                    "popstate",
                    old._handler.as_ref().unchecked_ref(),
                );
            }
        });
    });

    view! {
        <div style="display: flex; flex-direction: column; width: 100%; min-height: 100%; background: #f7f8fa; font-family: 'Inter', system-ui, sans-serif; color: #1a202c;">
            <Header />
            <main style="flex: 1; display: flex; flex-direction: column;">
                {move || match route.get() {
                    Route::Map => view! { <MapPage /> }.into_any(),
                    Route::StateDetail { slug } => view! { <DetailPage slug=slug /> }.into_any(),
                    Route::Login => view! { <LoginPage /> }.into_any(),
                    Route::Admin => view! {
                        <AuthGuard>
                            <AdminSettings />
                        </AuthGuard>
                    }
                    .into_any(),
                    Route::NotFound => view! { <NotFound /> }.into_any(),
                }}
            </main>
        </div>
    }
}

/// Anchor that navigates in-app instead of reloading the page.
#[component]
pub(crate) fn NavLink(
    to: Route,
    #[prop(optional)] style: &'static str,
    children: Children,
) -> impl IntoView {
    let CurrentRoute(current) = expect_context();
    let href = to.path();
    view! {
        <a
            href=href
            style=style
            on:click=move |e: web_sys::MouseEvent| {
                if e.ctrl_key() || e.meta_key() || e.shift_key() {
                    return;
                }
                e.prevent_default();
                navigate(current, to.clone());
            }
        >
            {children()}
        </a>
    }
}

#[component]
fn Header() -> impl IntoView {
    let CurrentRoute(route) = expect_context();
    let logged_in = Memo::new(move |_| {
        route.track();
        is_logged_in()
    });
    let link_style = "color: #e2e8f0; text-decoration: none; font-size: 0.85rem; padding: 6px 10px; border: 1px solid #4a5568; border-radius: 6px;";

    view! {
        <header style="display: flex; align-items: center; justify-content: space-between; padding: 10px 20px; background: #1a202c; color: #f7fafc;">
            <NavLink to=Route::Map style="color: #f7fafc; text-decoration: none; font-size: 1.1rem; font-weight: 700;">
                "US Political Map"
            </NavLink>
            {move || {
                if logged_in.get() {
                    view! { <NavLink to=Route::Admin style=link_style>"Settings"</NavLink> }.into_any()
                } else {
                    view! { <NavLink to=Route::Login style=link_style>"Log in"</NavLink> }.into_any()
                }
            }}
        </header>
    }
}

#[component]
fn NotFound() -> impl IntoView {
    view! {
        <div style="padding: 48px; text-align: center;">
            <h1 style="font-size: 1.5rem; margin-bottom: 12px;">"Page not found"</h1>
            <NavLink to=Route::Map style="color: #3182ce;">"Back to Map"</NavLink>
        </div>
    }
}
