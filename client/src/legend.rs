use leptos::prelude::*;

use bellwether_shared::colors::legend_items;

/// Category swatches overlaid on the map corner.
#[component]
pub fn MapLegend() -> impl IntoView {
    view! {
        <div style="position: absolute; right: 16px; bottom: 16px; z-index: 10; background: rgba(255,255,255,0.95); border: 1px solid #e2e8f0; border-radius: 8px; padding: 10px 12px; box-shadow: 0 2px 8px rgba(0,0,0,0.12); font-size: 0.8rem;">
            <h4 style="margin: 0 0 6px; font-size: 0.85rem; font-weight: 600;">"Political Leaning Legend"</h4>
            {legend_items()
                .into_iter()
                .map(|item| {
                    view! {
                        <div
                            data-category=item.category.as_str()
                            style="display: flex; align-items: center; gap: 8px; margin-top: 4px;"
                        >
                            <span style=format!(
                                "width: 14px; height: 14px; border-radius: 3px; border: 1px solid rgba(0,0,0,0.15); background: {};",
                                item.color,
                            ) />
                            <span>{item.label}</span>
                        </div>
                    }
                })
                .collect_view()}
        </div>
    }
}
