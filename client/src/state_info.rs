use leptos::prelude::*;

use bellwether_shared::format::{
    flag_path, format_currency_compact, format_decimal, format_number, gdp_rank_suffix,
    governor_line,
};
use bellwether_shared::{
    ClassificationTable, InteractionController, PoliticalCategory, Route, StateRecord, color_of,
};

use crate::app::{NavLink, SummaryError, Table};
use crate::map_view::Interaction;

/// Labelled facts shown on the card. Fields the record lacks are left out.
pub(crate) fn info_rows(record: &StateRecord) -> Vec<(&'static str, String)> {
    let mut rows = Vec::new();
    if let Some(capital) = record.capital.as_deref().filter(|c| !c.is_empty()) {
        rows.push(("Capital", capital.to_string()));
    }
    if let Some(population) = record.population {
        rows.push(("Population", format_number(population)));
    }
    if let Some(area) = record.area {
        rows.push(("Area", format!("{} km\u{b2}", format_decimal(area))));
    }
    if let Some(gdp) = record.gdp {
        rows.push((
            "GDP",
            format!(
                "{}{}",
                format_currency_compact(gdp),
                gdp_rank_suffix(record.gdp_rank)
            ),
        ));
    }
    if let Some(per_capita) = record.gdp_per_capita {
        rows.push(("GDP per capita", format_currency_compact(per_capita)));
    }
    if let Some(governor) = governor_line(
        record.governor_name.as_deref(),
        record.governor_party.as_deref(),
    ) {
        rows.push(("Governor", governor));
    }
    if let Some(votes) = record.electoral_votes {
        rows.push(("Electoral votes", votes.to_string()));
    }
    rows
}

/// Record for the selected state. A selection the table does not know still
/// gets a card with just its name.
pub(crate) fn panel_record(
    controller: &InteractionController,
    table: &ClassificationTable,
) -> Option<StateRecord> {
    let name = controller.selected()?;
    Some(
        table
            .lookup(name)
            .cloned()
            .unwrap_or_else(|_| StateRecord::named(name)),
    )
}

fn badge_style(category: Option<PoliticalCategory>) -> String {
    let text = if category.is_some_and(PoliticalCategory::wants_light_text) {
        "#ffffff"
    } else {
        "#1a202c"
    };
    format!(
        "display: inline-block; padding: 3px 10px; border-radius: 999px; font-size: 0.75rem; font-weight: 600; background: {}; color: {text};",
        color_of(category)
    )
}

/// Side panel for the selected state.
#[component]
pub fn StateInfo() -> impl IntoView {
    let Interaction(interaction) = expect_context();
    let Table(table) = expect_context();
    let SummaryError(summary_error) = expect_context();

    let record = Memo::new(move |_| interaction.with(|c| table.with(|t| panel_record(c, t))));

    view! {
        <div style="display: flex; flex-direction: column; gap: 14px; padding: 16px;">
            <h2 style="font-size: 1.4rem; font-weight: 700; margin: 0;">"US States Info"</h2>
            {move || {
                summary_error
                    .get()
                    .map(|message| {
                        view! {
                            <p style="margin: 0; padding: 8px 10px; background: #fff5f5; color: #c53030; border: 1px solid #feb2b2; border-radius: 6px; font-size: 0.8rem;">
                                {message}
                            </p>
                        }
                    })
            }}
            {move || match record.get() {
                Some(record) => view! { <StateCard record=record /> }.into_any(),
                None => {
                    view! {
                        <p style="margin: 0; color: #718096;">"Select a state to view details"</p>
                    }
                        .into_any()
                }
            }}
        </div>
    }
}

#[component]
fn StateCard(record: StateRecord) -> impl IntoView {
    let flag_failed = RwSignal::new(false);
    let flag = flag_path(&record.name);
    let fallback = if record.abbreviation.is_empty() {
        "??".to_string()
    } else {
        record.abbreviation.clone()
    };
    let category = record.political_status;
    let rows = info_rows(&record);
    let detail_route = Route::for_state(&record.name);
    let alt = format!("Flag of {}", record.name);

    view! {
        <div style="border: 1px solid #e2e8f0; border-radius: 8px; overflow: hidden;">
            <div style="display: flex; align-items: center; gap: 14px; padding: 14px; background: linear-gradient(135deg, #334155, #1e293b); color: #f8fafc;">
                <div style="width: 72px; height: 52px; background: #ffffff; border-radius: 6px; display: flex; align-items: center; justify-content: center; overflow: hidden;">
                    {move || {
                        if flag_failed.get() {
                            view! {
                                <span style="font-size: 1.4rem; font-weight: 700; color: #334155;">
                                    {fallback.clone()}
                                </span>
                            }
                                .into_any()
                        } else {
                            view! {
                                <img
                                    src=flag.clone()
                                    alt=alt.clone()
                                    style="width: 100%; height: 100%; object-fit: contain;"
                                    on:error=move |_| flag_failed.set(true)
                                />
                            }
                                .into_any()
                        }
                    }}
                </div>
                <div>
                    <h3 style="margin: 0 0 6px; font-size: 1.2rem;">{record.name.clone()}</h3>
                    <span
                        data-category=category.map(PoliticalCategory::as_str).unwrap_or("unknown")
                        style=badge_style(category)
                    >
                        {category.map(PoliticalCategory::label).unwrap_or("Unclassified")}
                    </span>
                </div>
            </div>
            <dl style="margin: 0; padding: 12px 14px; display: grid; grid-template-columns: auto 1fr; gap: 6px 12px; font-size: 0.85rem;">
                {rows
                    .into_iter()
                    .map(|(label, value)| {
                        view! {
                            <dt style="color: #718096;">{label}</dt>
                            <dd style="margin: 0; font-weight: 600; text-align: right;">{value}</dd>
                        }
                    })
                    .collect_view()}
            </dl>
            <div style="padding: 0 14px 14px;">
                <NavLink
                    to=detail_route
                    style="display: block; text-align: center; padding: 8px; background: #2b6cb0; color: #ffffff; border-radius: 6px; text-decoration: none; font-weight: 600;"
                >
                    "View details \u{2192}"
                </NavLink>
            </div>
        </div>
    }
}
