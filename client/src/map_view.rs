use leptos::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{MouseEvent, PointerEvent, WheelEvent};

use std::cell::RefCell;

use bellwether_shared::geo::{Equirectangular, FeatureCollection, USA_BOUNDS, svg_path};
use bellwether_shared::style::style_for_name;
use bellwether_shared::{Disposition, FeatureStyle, InteractionController, MapEvent};

use crate::api;
use crate::app::{Table, warn};
use crate::insets::StateInsets;
use crate::legend::MapLegend;
use crate::state_info::StateInfo;
use crate::viewport::Viewport;

/// Pointer travel (CSS px) after which a press becomes a pan instead of a click.
const DRAG_THRESHOLD: f64 = 5.0;
const INFO_PANEL_WIDTH: f64 = 320.0;

#[derive(Clone, Copy)]
pub(crate) struct Interaction(pub RwSignal<InteractionController>);
#[derive(Clone, Copy)]
pub(crate) struct Features(pub RwSignal<Option<FeatureCollection>>);
/// CSS pixel size of the map surface.
#[derive(Clone, Copy)]
pub(crate) struct SurfaceSize(pub RwSignal<(f64, f64)>);

/// Projected outline of one boundary feature, ready for an SVG `<path>`.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct FeaturePath {
    pub key: usize,
    pub name: Option<String>,
    pub d: String,
}

pub(crate) fn feature_paths(collection: &FeatureCollection) -> Vec<FeaturePath> {
    let projection = Equirectangular::usa();
    collection
        .features
        .iter()
        .enumerate()
        .filter_map(|(key, feature)| {
            let d = svg_path(feature.geometry.as_ref()?, &projection);
            (!d.is_empty()).then(|| FeaturePath {
                key,
                name: feature.name().map(str::to_string),
                d,
            })
        })
        .collect()
}

fn drag_exceeds_threshold(start: (f64, f64), current: (f64, f64)) -> bool {
    (current.0 - start.0).abs() >= DRAG_THRESHOLD || (current.1 - start.1).abs() >= DRAG_THRESHOLD
}

/// Name carried by the boundary element under the pointer, if any.
fn state_under_pointer(e: &MouseEvent) -> Option<String> {
    e.target()
        .and_then(|t| t.dyn_into::<web_sys::Element>().ok())
        .and_then(|el| el.get_attribute("data-state"))
}

fn local_position(e: &MouseEvent) -> (f64, f64) {
    e.current_target()
        .and_then(|t| t.dyn_into::<web_sys::Element>().ok())
        .map(|el| {
            let rect = el.get_bounding_client_rect();
            (
                e.client_x() as f64 - rect.left(),
                e.client_y() as f64 - rect.top(),
            )
        })
        .unwrap_or((e.offset_x() as f64, e.offset_y() as f64))
}

struct ResizeBinding {
    window: web_sys::Window,
    _handler: wasm_bindgen::closure::Closure<dyn Fn()>,
}

thread_local! {
    static RESIZE_BINDING: RefCell<Option<ResizeBinding>> = const { RefCell::new(None) };
}

fn release_resize_binding() {
    RESIZE_BINDING.with(|slot| {
        if let Some(old) = slot.borrow_mut().take() {
            let _ = old.window.remove_event_listener_with_callback(
                "resize",
                old._handler.as_ref().unchecked_ref(),
            );
        }
    });
}

/// The `/` route: map surface with its overlays and the side panel.
#[component]
pub fn MapPage() -> impl IntoView {
    let interaction: RwSignal<InteractionController> = RwSignal::new(InteractionController::new());
    let viewport: RwSignal<Viewport> = RwSignal::new(Viewport::default());
    let features: RwSignal<Option<FeatureCollection>> = RwSignal::new(None);
    let size: RwSignal<(f64, f64)> = RwSignal::new((0.0, 0.0));
    let features_error: RwSignal<Option<String>> = RwSignal::new(None);

    provide_context(Interaction(interaction));
    provide_context(viewport);
    provide_context(Features(features));
    provide_context(SurfaceSize(size));

    Effect::new(move || {
        spawn_local(async move {
            match api::fetch_features().await {
                Ok(collection) => features.set(Some(collection)),
                Err(e) => {
                    warn(&format!("failed to load state boundaries: {e}"));
                    features_error.set(Some("Map boundaries could not be loaded.".to_string()));
                }
            }
        });
    });

    view! {
        <div style="display: flex; flex: 1; min-height: 0; height: calc(100vh - 52px);">
            <div style="position: relative; flex: 1; min-width: 0; overflow: hidden; background: #e6edf3;">
                <MapView />
                <MapControls />
                <StateInsets />
                <MapLegend />
                {move || features_error.get().map(|message| view! {
                    <div style="position: absolute; top: 16px; left: 50%; transform: translateX(-50%); z-index: 20; background: #fff5f5; color: #c53030; border: 1px solid #feb2b2; border-radius: 6px; padding: 8px 14px; font-size: 0.85rem;">
                        {message}
                    </div>
                })}
            </div>
            <aside style={format!("width: {INFO_PANEL_WIDTH}px; flex-shrink: 0; border-left: 1px solid #e2e8f0; background: #ffffff; overflow-y: auto;")}>
                <StateInfo />
            </aside>
        </div>
    }
}

/// SVG rendering of every boundary feature. Hover is tracked per feature;
/// clicks are resolved once, on the surface, into a feature click or a
/// background click.
#[component]
fn MapView() -> impl IntoView {
    let Interaction(interaction) = expect_context();
    let Features(features) = expect_context();
    let SurfaceSize(size) = expect_context();
    let viewport: RwSignal<Viewport> = expect_context();

    let container_ref = NodeRef::<leptos::html::Div>::new();
    let paths = Memo::new(move |_| {
        features.with(|collection| collection.as_ref().map(feature_paths).unwrap_or_default())
    });

    let drag_start: StoredValue<Option<(f64, f64)>> = StoredValue::new(None);
    let last_pointer: StoredValue<(f64, f64)> = StoredValue::new((0.0, 0.0));
    let dragged: StoredValue<bool> = StoredValue::new(false);
    let fitted: StoredValue<bool> = StoredValue::new(false);

    let measure = move || {
        if let Some(el) = container_ref.get_untracked() {
            let rect = el.get_bounding_client_rect();
            size.set((rect.width(), rect.height()));
        }
    };

    // Track the surface size; the first real measurement frames the USA.
    Effect::new(move || {
        use wasm_bindgen::prelude::*;
        if container_ref.get().is_none() {
            return;
        }
        measure();

        let Some(window) = web_sys::window() else {
            return;
        };
        release_resize_binding();
        let handler = Closure::<dyn Fn()>::new(move || measure());
        if window
            .add_event_listener_with_callback("resize", handler.as_ref().unchecked_ref())
            .is_ok()
        {
            RESIZE_BINDING.with(|slot| {
                *slot.borrow_mut() = Some(ResizeBinding {
                    window: window.clone(),
                    _handler: handler,
                });
            });
        }
    });
    on_cleanup(release_resize_binding);

    Effect::new(move || {
        let (w, h) = size.get();
        if w <= 0.0 || h <= 0.0 || fitted.get_value() {
            return;
        }
        fitted.set_value(true);
        viewport.update(|vp| vp.fit_bounds(&USA_BOUNDS, w, h));
    });

    let on_wheel = move |e: WheelEvent| {
        e.prevent_default();
        let (x, y) = local_position(&e);
        let (w, h) = size.get_untracked();
        viewport.update(|vp| vp.zoom_at(e.delta_y(), x, y, w, h));
    };

    let on_pointer_down = move |e: PointerEvent| {
        if e.button() != 0 {
            return;
        }
        let point = (e.client_x() as f64, e.client_y() as f64);
        drag_start.set_value(Some(point));
        last_pointer.set_value(point);
        dragged.set_value(false);
    };

    let on_pointer_move = move |e: PointerEvent| {
        let Some(start) = drag_start.get_value() else {
            return;
        };
        let point = (e.client_x() as f64, e.client_y() as f64);
        if !dragged.get_value() {
            if !drag_exceeds_threshold(start, point) {
                return;
            }
            // Capture only once panning starts so plain clicks keep their target.
            dragged.set_value(true);
            if let Some(el) = e
                .current_target()
                .and_then(|t| t.dyn_into::<web_sys::Element>().ok())
            {
                el.set_pointer_capture(e.pointer_id()).ok();
            }
            interaction.update(|c| {
                if let Some(name) = c.hovered().map(str::to_string) {
                    c.handle(MapEvent::PointerLeave(name));
                }
            });
        }
        let (lx, ly) = last_pointer.get_value();
        last_pointer.set_value(point);
        viewport.update(|vp| vp.pan(point.0 - lx, point.1 - ly));
    };

    let on_pointer_up = move |_: PointerEvent| {
        drag_start.set_value(None);
    };

    let on_click = move |e: MouseEvent| {
        if dragged.get_value() {
            dragged.set_value(false);
            return;
        }
        let hit = state_under_pointer(&e);
        let disposition = interaction
            .try_update(|c| c.dispatch_click(hit.as_deref()))
            .unwrap_or(Disposition::Propagate);
        if disposition == Disposition::Consumed {
            e.stop_propagation();
        }
    };

    view! {
        <div
            node_ref=container_ref
            style="position: absolute; inset: 0;"
        >
            <svg
                style="width: 100%; height: 100%; display: block; touch-action: none; cursor: grab; user-select: none;"
                viewBox=move || {
                    let (w, h) = size.get();
                    viewport.get().view_box(w, h)
                }
                preserveAspectRatio="xMidYMid meet"
                on:wheel=on_wheel
                on:pointerdown=on_pointer_down
                on:pointermove=on_pointer_move
                on:pointerup=on_pointer_up
                on:pointercancel=move |_: PointerEvent| drag_start.set_value(None)
                on:click=on_click
            >
                <For
                    each=move || paths.get()
                    key=|path| path.key
                    let:path
                >
                    <FeatureShape path=path />
                </For>
            </svg>
        </div>
    }
}

#[component]
fn FeatureShape(path: FeaturePath) -> impl IntoView {
    let Interaction(interaction) = expect_context();
    let Table(table) = expect_context();

    let name = path.name.clone();
    let style = Memo::new(move |_| match name.as_deref() {
        Some(name) => interaction
            .with(|c| table.with(|t| style_for_name(name, c.selected(), c.hovered(), t))),
        None => FeatureStyle::NEUTRAL,
    });

    let enter_name = path.name.clone();
    let leave_name = path.name.clone();

    view! {
        <path
            d=path.d
            data-state=path.name
            fill=move || style.get().fill_color
            fill-opacity=move || style.get().fill_opacity.to_string()
            stroke=move || style.get().border_color
            stroke-width=move || style.get().border_weight.to_string()
            stroke-dasharray=move || style.get().border_dash.as_str()
            vector-effect="non-scaling-stroke"
            style="cursor: pointer; transition: fill-opacity 0.12s;"
            on:pointerenter=move |_: PointerEvent| {
                if let Some(name) = enter_name.clone() {
                    interaction.update(|c| {
                        c.handle(MapEvent::PointerEnter(name));
                    });
                }
            }
            on:pointerleave=move |_: PointerEvent| {
                if let Some(name) = leave_name.clone() {
                    interaction.update(|c| {
                        c.handle(MapEvent::PointerLeave(name));
                    });
                }
            }
        />
    }
}

/// Zoom in / zoom out / fit the contiguous states.
#[component]
fn MapControls() -> impl IntoView {
    let viewport: RwSignal<Viewport> = expect_context();
    let SurfaceSize(size) = expect_context();
    let button_style = "width: 34px; height: 34px; background: #ffffff; border: 1px solid #cbd5e0; border-radius: 6px; cursor: pointer; font-size: 1.05rem; color: #2d3748; display: flex; align-items: center; justify-content: center;";

    view! {
        <div style="position: absolute; top: 16px; left: 16px; z-index: 10; display: flex; flex-direction: column; gap: 6px;">
            <button title="Zoom in" style=button_style on:click=move |_| viewport.update(|vp| vp.zoom_in())>
                "+"
            </button>
            <button title="Zoom out" style=button_style on:click=move |_| viewport.update(|vp| vp.zoom_out())>
                "\u{2212}"
            </button>
            <button
                title="Fit USA"
                style=button_style
                on:click=move |_| {
                    let (w, h) = size.get_untracked();
                    viewport.update(|vp| vp.reset(w, h));
                }
            >
                "\u{2302}"
            </button>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collection(json: &str) -> FeatureCollection {
        serde_json::from_str(json).expect("valid feature collection")
    }

    #[test]
    fn paths_keep_unnamed_features_but_skip_missing_geometry() {
        let fc = collection(
            r#"{"type":"FeatureCollection","features":[
                {"type":"Feature","properties":{"name":"Colorado"},
                 "geometry":{"type":"Polygon","coordinates":[[[-109,41],[-102,41],[-102,37],[-109,37],[-109,41]]]}},
                {"type":"Feature","properties":{},
                 "geometry":{"type":"Polygon","coordinates":[[[-80,30],[-79,30],[-79,29],[-80,30]]]}},
                {"type":"Feature","properties":{"name":"Nowhere"},"geometry":null}
            ]}"#,
        );
        let paths = feature_paths(&fc);
        assert_eq!(paths.len(), 2);
        assert_eq!(paths[0].name.as_deref(), Some("Colorado"));
        assert!(paths[0].d.starts_with('M'));
        assert_eq!(paths[1].name, None);
        assert_eq!(paths[1].key, 1);
    }

    #[test]
    fn drag_threshold() {
        assert!(!drag_exceeds_threshold((10.0, 10.0), (14.0, 13.0)));
        assert!(drag_exceeds_threshold((10.0, 10.0), (15.0, 10.0)));
        assert!(drag_exceeds_threshold((10.0, 10.0), (10.0, 4.0)));
    }
}
