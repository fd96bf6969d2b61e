use leptos::html;
use leptos::prelude::*;
use wasm_bindgen::JsCast;

use bellwether_shared::ContentSection;

/// Formatting commands offered while a section is being edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolbarAction {
    Bold,
    Italic,
    Heading1,
    Heading2,
    BulletList,
    OrderedList,
    AlignLeft,
    AlignCenter,
    AlignRight,
}

impl ToolbarAction {
    pub const ALL: [ToolbarAction; 9] = [
        ToolbarAction::Bold,
        ToolbarAction::Italic,
        ToolbarAction::Heading1,
        ToolbarAction::Heading2,
        ToolbarAction::BulletList,
        ToolbarAction::OrderedList,
        ToolbarAction::AlignLeft,
        ToolbarAction::AlignCenter,
        ToolbarAction::AlignRight,
    ];

    /// `document.execCommand` name.
    pub fn command(self) -> &'static str {
        match self {
            ToolbarAction::Bold => "bold",
            ToolbarAction::Italic => "italic",
            ToolbarAction::Heading1 | ToolbarAction::Heading2 => "formatBlock",
            ToolbarAction::BulletList => "insertUnorderedList",
            ToolbarAction::OrderedList => "insertOrderedList",
            ToolbarAction::AlignLeft => "justifyLeft",
            ToolbarAction::AlignCenter => "justifyCenter",
            ToolbarAction::AlignRight => "justifyRight",
        }
    }

    pub fn value(self) -> &'static str {
        match self {
            ToolbarAction::Heading1 => "H1",
            ToolbarAction::Heading2 => "H2",
            _ => "",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            ToolbarAction::Bold => "Bold",
            ToolbarAction::Italic => "Italic",
            ToolbarAction::Heading1 => "Heading 1",
            ToolbarAction::Heading2 => "Heading 2",
            ToolbarAction::BulletList => "Bullet List",
            ToolbarAction::OrderedList => "Numbered List",
            ToolbarAction::AlignLeft => "Align Left",
            ToolbarAction::AlignCenter => "Align Center",
            ToolbarAction::AlignRight => "Align Right",
        }
    }

    fn glyph(self) -> &'static str {
        match self {
            ToolbarAction::Bold => "B",
            ToolbarAction::Italic => "I",
            ToolbarAction::Heading1 => "H1",
            ToolbarAction::Heading2 => "H2",
            ToolbarAction::BulletList => "\u{2022}",
            ToolbarAction::OrderedList => "1.",
            ToolbarAction::AlignLeft => "\u{21e4}",
            ToolbarAction::AlignCenter => "\u{2194}",
            ToolbarAction::AlignRight => "\u{21e5}",
        }
    }

    /// Starts a toolbar group.
    fn opens_group(self) -> bool {
        matches!(
            self,
            ToolbarAction::Heading1 | ToolbarAction::BulletList | ToolbarAction::AlignLeft
        )
    }

    fn apply(self) {
        let Some(document) = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.dyn_into::<web_sys::HtmlDocument>().ok())
        else {
            return;
        };
        if document
            .exec_command_with_show_ui_and_value(self.command(), false, self.value())
            .is_err()
        {
            crate::app::warn(&format!("execCommand {} failed", self.command()));
        }
    }
}

const BUTTON_STYLE: &str = "padding: 4px 8px; border: 1px solid #e2e8f0; border-radius: 4px; background: #ffffff; cursor: pointer; font-size: 0.8rem; min-width: 30px;";

#[component]
fn Toolbar() -> impl IntoView {
    view! {
        <div style="display: flex; flex-wrap: wrap; gap: 4px; align-items: center;">
            {ToolbarAction::ALL
                .into_iter()
                .map(|action| {
                    let margin = if action.opens_group() { "margin-left: 10px;" } else { "" };
                    view! {
                        <button
                            type="button"
                            title=action.title()
                            style=format!("{BUTTON_STYLE} {margin}")
                            // mousedown keeps the selection inside the editable region
                            on:mousedown=move |e: web_sys::MouseEvent| {
                                e.prevent_default();
                                action.apply();
                            }
                        >
                            {action.glyph()}
                        </button>
                    }
                })
                .collect_view()}
        </div>
    }
}

/// One rich-text section. Read-only unless `editable`; saving hands the new
/// HTML to `on_save` and cancelling restores the last saved content. The
/// delete button shows only while `deletable` holds.
#[component]
pub fn SectionEditor(
    section: ContentSection,
    editable: bool,
    on_save: Callback<String>,
    #[prop(into)] deletable: Signal<bool>,
    on_delete: Callback<()>,
) -> impl IntoView {
    let editing = RwSignal::new(false);
    let saved = StoredValue::new(section.content.clone());
    let region: NodeRef<html::Div> = NodeRef::new();

    let start = move |_| editing.set(true);
    let cancel = move |_| {
        if let Some(el) = region.get_untracked() {
            el.set_inner_html(&saved.get_value());
        }
        editing.set(false);
    };
    let save = move |_| {
        let Some(el) = region.get_untracked() else {
            return;
        };
        let html = el.inner_html();
        saved.set_value(html.clone());
        editing.set(false);
        on_save.run(html);
    };

    view! {
        <section style="background: #ffffff; border: 1px solid #e2e8f0; border-radius: 8px; overflow: hidden;">
            <div style="display: flex; justify-content: space-between; align-items: center; gap: 12px; padding: 10px 14px; background: #f7fafc; border-bottom: 1px solid #e2e8f0;">
                <h2 style="margin: 0; font-size: 1.1rem;">{section.title.clone()}</h2>
                {move || {
                    if !editable {
                        ().into_any()
                    } else if editing.get() {
                        view! {
                            <div style="display: flex; gap: 8px; align-items: center; flex-wrap: wrap;">
                                <Toolbar />
                                <button type="button" style=BUTTON_STYLE on:click=cancel>"Cancel"</button>
                                <button
                                    type="button"
                                    style="padding: 4px 10px; border: none; border-radius: 4px; background: #3182ce; color: #ffffff; cursor: pointer;"
                                    on:click=save
                                >
                                    "Save"
                                </button>
                            </div>
                        }
                            .into_any()
                    } else {
                        view! {
                            <div style="display: flex; gap: 8px;">
                                <button type="button" style=BUTTON_STYLE on:click=start>"Edit"</button>
                                {move || {
                                    deletable
                                        .get()
                                        .then(|| {
                                            view! {
                                                <button
                                                    type="button"
                                                    style="padding: 4px 10px; border: 1px solid #feb2b2; border-radius: 4px; background: #fff5f5; color: #c53030; cursor: pointer;"
                                                    on:click=move |_| on_delete.run(())
                                                >
                                                    "Delete"
                                                </button>
                                            }
                                        })
                                }}
                            </div>
                        }
                            .into_any()
                    }
                }}
            </div>
            <div
                node_ref=region
                class="section-content"
                contenteditable=move || if editing.get() { "true" } else { "false" }
                style=move || {
                    if editing.get() {
                        "padding: 16px 20px; min-height: 120px; outline: 2px solid #bee3f8; outline-offset: -2px;"
                    } else {
                        "padding: 16px 20px; min-height: 40px;"
                    }
                }
                inner_html=section.content
            ></div>
        </section>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headings_use_format_block() {
        assert_eq!(ToolbarAction::Heading1.command(), "formatBlock");
        assert_eq!(ToolbarAction::Heading1.value(), "H1");
        assert_eq!(ToolbarAction::Heading2.value(), "H2");
        assert_eq!(ToolbarAction::Bold.value(), "");
    }

    #[test]
    fn every_action_has_a_distinct_command_or_value() {
        let mut seen: Vec<(&str, &str)> = ToolbarAction::ALL
            .iter()
            .map(|a| (a.command(), a.value()))
            .collect();
        seen.sort();
        seen.dedup();
        assert_eq!(seen.len(), ToolbarAction::ALL.len());
    }

    #[test]
    fn toolbar_has_three_groups_after_text_style() {
        let groups = ToolbarAction::ALL.iter().filter(|a| a.opens_group()).count();
        assert_eq!(groups, 3);
        assert!(!ToolbarAction::ALL[0].opens_group());
    }
}
