use leptos::prelude::*;

use bellwether_shared::geo::{Bounds, Equirectangular, FeatureCollection, svg_path};
use bellwether_shared::inset::{INSETS, InsetPanel, inset_caption};
use bellwether_shared::style::style_for_name;
use bellwether_shared::{ClassificationTable, show_insets};

use crate::app::Table;
use crate::map_view::{Features, Interaction};
use crate::viewport::Viewport;

const INSET_WIDTH: u32 = 150;
/// Half-extent, in degrees, framed around an inset's centre when its
/// boundary is unavailable.
const FALLBACK_SPAN: (f64, f64) = (6.0, 3.0);

/// Path data and `viewBox` for one inset, each inset using its own
/// projection centred on the territory.
fn inset_shape(panel: &InsetPanel, features: Option<&FeatureCollection>) -> (String, String) {
    let (lon, lat) = panel.center;
    let projection = Equirectangular::new(lat);
    let geometry = features
        .and_then(|fc| fc.find(panel.state))
        .and_then(|f| f.geometry.as_ref());

    let bounds = geometry
        .and_then(|g| g.bounds())
        .unwrap_or_else(|| {
            Bounds::point(lon - FALLBACK_SPAN.0, lat - FALLBACK_SPAN.1)
                .including(lon + FALLBACK_SPAN.0, lat + FALLBACK_SPAN.1)
        })
        .projected(&projection);
    let pad_x = bounds.width() * 0.05;
    let pad_y = bounds.height() * 0.05;
    let view_box = format!(
        "{:.4} {:.4} {:.4} {:.4}",
        bounds.min_x - pad_x,
        bounds.min_y - pad_y,
        bounds.width() + pad_x * 2.0,
        bounds.height() + pad_y * 2.0
    );
    let d = geometry
        .map(|g| svg_path(g, &projection))
        .unwrap_or_default();
    (d, view_box)
}

fn caption_for(panel: &InsetPanel, table: &ClassificationTable) -> String {
    match table.lookup(panel.state) {
        Ok(record) => inset_caption(&record.abbreviation, record.electoral_votes),
        Err(_) => panel.state.to_string(),
    }
}

/// Alaska, Hawaii and Puerto Rico panels, hidden once the map is zoomed past
/// the inset threshold.
#[component]
pub fn StateInsets() -> impl IntoView {
    let viewport: RwSignal<Viewport> = expect_context();
    let visible = Memo::new(move |_| show_insets(viewport.get().zoom_level()));

    view! {
        {move || {
            if visible.get() {
                view! {
                    <div style="position: absolute; left: 16px; bottom: 16px; z-index: 10; display: flex; gap: 10px; align-items: flex-end;">
                        {INSETS.iter().map(|panel| view! { <Inset panel=*panel /> }).collect_view()}
                    </div>
                }
                .into_any()
            } else {
                ().into_any()
            }
        }}
    }
}

#[component]
fn Inset(panel: InsetPanel) -> impl IntoView {
    let Interaction(interaction) = expect_context();
    let Features(features) = expect_context();
    let Table(table) = expect_context();

    let shape = Memo::new(move |_| features.with(|fc| inset_shape(&panel, fc.as_ref())));
    let style = Memo::new(move |_| {
        interaction.with(|c| {
            table.with(|t| style_for_name(panel.state, c.selected(), c.hovered(), t))
        })
    });
    let caption = Memo::new(move |_| table.with(|t| caption_for(&panel, t)));

    view! {
        <div
            title=panel.state
            style={format!(
                "width: {INSET_WIDTH}px; background: rgba(255,255,255,0.92); border: 1px solid #cbd5e0; border-radius: 6px; overflow: hidden; cursor: pointer; box-shadow: 0 2px 6px rgba(0,0,0,0.12);"
            )}
            on:click=move |_| interaction.update(|c| c.select(panel.state))
        >
            <svg
                style={format!("width: 100%; height: {}px; display: block;", panel.height)}
                viewBox=move || shape.get().1
                preserveAspectRatio="xMidYMid meet"
            >
                <path
                    d=move || shape.get().0
                    fill=move || style.get().fill_color
                    fill-opacity=move || style.get().fill_opacity.to_string()
                    stroke=move || style.get().border_color
                    stroke-width=move || style.get().border_weight.to_string()
                    stroke-dasharray=move || style.get().border_dash.as_str()
                    vector-effect="non-scaling-stroke"
                />
            </svg>
            <div style="font-size: 0.7rem; color: #4a5568; padding: 2px 6px; border-top: 1px solid #e2e8f0; text-align: center;">
                {move || caption.get()}
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn captions_use_abbreviation_and_votes() {
        let table = ClassificationTable::builtin();
        assert_eq!(caption_for(&INSETS[0], &table), "AK \u{2022} 3");
        assert_eq!(caption_for(&INSETS[1], &table), "HI \u{2022} 4");
        assert_eq!(caption_for(&INSETS[2], &table), "PR");
    }

    #[test]
    fn missing_boundary_frames_panel_center() {
        let (d, view_box) = inset_shape(&INSETS[1], None);
        assert!(d.is_empty());
        let parts: Vec<f64> = view_box
            .split(' ')
            .map(|p| p.parse().expect("number"))
            .collect();
        assert_eq!(parts.len(), 4);
        assert!(parts[2] > 0.0 && parts[3] > 0.0);
    }
}
