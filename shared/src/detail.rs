use std::collections::BTreeMap;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::error::SectionError;

const SECTION_ID_PREFIX: &str = "section-";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentSection {
    pub id: String,
    pub title: String,
    /// Rich-text HTML.
    pub content: String,
}

impl ContentSection {
    pub fn new(id: impl Into<String>, title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            content: content.into(),
        }
    }
}

/// Ordered editable sections of one state's detail page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateDetail {
    #[serde(default)]
    pub sections: Vec<ContentSection>,
}

impl StateDetail {
    /// History, Economy and Culture with placeholder text.
    pub fn default_for(state_name: &str) -> Self {
        Self {
            sections: vec![
                ContentSection::new(
                    "history",
                    "History",
                    format!(
                        "<h1>History of {state_name}</h1><p>Add historical information here...</p>"
                    ),
                ),
                ContentSection::new(
                    "economy",
                    "Economy",
                    format!(
                        "<h1>Economy of {state_name}</h1><p>Add economic information here...</p>"
                    ),
                ),
                ContentSection::new(
                    "culture",
                    "Culture",
                    format!(
                        "<h1>Culture of {state_name}</h1><p>Add cultural information here...</p>"
                    ),
                ),
            ],
        }
    }

    pub fn section(&self, id: &str) -> Option<&ContentSection> {
        self.sections.iter().find(|s| s.id == id)
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Deletion is offered only while more than one section remains.
    pub fn can_delete(&self) -> bool {
        self.sections.len() > 1
    }

    /// Time-based id (`section-<ms>`), bumped past any existing time-based id
    /// so ids stay unique and increasing within a session.
    pub fn next_section_id(&self, now_ms: i64) -> String {
        let newest = self
            .sections
            .iter()
            .filter_map(|s| s.id.strip_prefix(SECTION_ID_PREFIX))
            .filter_map(|n| n.parse::<i64>().ok())
            .max();
        let id = match newest {
            Some(newest) if newest >= now_ms => newest + 1,
            _ => now_ms,
        };
        format!("{SECTION_ID_PREFIX}{id}")
    }

    /// Append a section titled `title` with placeholder content.
    pub fn add_section(&mut self, title: &str, now_ms: i64) -> Result<&ContentSection, SectionError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(SectionError::EmptyTitle);
        }
        let id = self.next_section_id(now_ms);
        self.sections.push(ContentSection::new(
            id,
            title,
            format!("<h1>{title}</h1><p>Add content here...</p>"),
        ));
        let index = self.sections.len() - 1;
        Ok(&self.sections[index])
    }

    pub fn delete_section(&mut self, id: &str) -> Result<ContentSection, SectionError> {
        let index = self
            .sections
            .iter()
            .position(|s| s.id == id)
            .ok_or_else(|| SectionError::UnknownSection(id.to_string()))?;
        if !self.can_delete() {
            return Err(SectionError::LastSection);
        }
        Ok(self.sections.remove(index))
    }

    /// Replace a section's HTML wholesale.
    pub fn replace_content(&mut self, id: &str, html: impl Into<String>) -> Result<(), SectionError> {
        let section = self
            .sections
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| SectionError::UnknownSection(id.to_string()))?;
        section.content = html.into();
        Ok(())
    }

    pub fn validate(&self) -> Result<(), SectionError> {
        if self.sections.is_empty() {
            return Err(SectionError::NoSections);
        }
        if self.sections.iter().any(|s| s.title.trim().is_empty()) {
            return Err(SectionError::EmptyTitle);
        }
        Ok(())
    }
}

/// Body of `GET /api/states/statesDetail` and `POST /api/states/updateDetail`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatesDetailDocument {
    #[serde(rename = "lastUpdated", default)]
    pub last_updated: String,
    #[serde(default)]
    pub states: BTreeMap<String, StateDetail>,
}

impl StatesDetailDocument {
    /// Stored sections for a state, or the default set when it has none.
    pub fn detail_for(&self, state_name: &str) -> StateDetail {
        self.states
            .get(state_name)
            .filter(|d| !d.is_empty())
            .cloned()
            .unwrap_or_else(|| StateDetail::default_for(state_name))
    }

    /// Full-replacement document with one state's sections swapped in.
    pub fn with_state(mut self, state_name: &str, detail: StateDetail, now: DateTime<Utc>) -> Self {
        self.states.insert(state_name.to_string(), detail);
        self.last_updated = now.to_rfc3339_opts(SecondsFormat::Millis, true);
        self
    }

    /// First offending state, if any.
    pub fn validate(&self) -> Result<(), (String, SectionError)> {
        for (name, detail) in &self.states {
            detail.validate().map_err(|e| (name.clone(), e))?;
        }
        Ok(())
    }
}

/// Client-side owner of the detail document. Edits land on the working copy
/// at once, so each edit builds on the previous one whether or not it has been
/// saved. At most one write is in flight; edits made meanwhile are sent as one
/// follow-up write of the latest working copy once the current one settles.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentSync {
    working: StatesDetailDocument,
    in_flight: bool,
    queued: bool,
}

impl DocumentSync {
    pub fn new(document: StatesDetailDocument) -> Self {
        Self {
            working: document,
            in_flight: false,
            queued: false,
        }
    }

    pub fn working(&self) -> &StatesDetailDocument {
        &self.working
    }

    pub fn detail_for(&self, state_name: &str) -> StateDetail {
        self.working.detail_for(state_name)
    }

    pub fn is_saving(&self) -> bool {
        self.in_flight
    }

    /// Apply an edit. Returns the document to send now, or `None` when a
    /// write is already in flight and this edit has been queued behind it.
    pub fn edit(
        &mut self,
        state_name: &str,
        detail: StateDetail,
        now: DateTime<Utc>,
    ) -> Option<StatesDetailDocument> {
        self.working = std::mem::take(&mut self.working).with_state(state_name, detail, now);
        if self.in_flight {
            self.queued = true;
            return None;
        }
        self.in_flight = true;
        Some(self.working.clone())
    }

    /// The in-flight write was accepted. Returns the follow-up write carrying
    /// every edit queued since, if any.
    pub fn write_succeeded(&mut self) -> Option<StatesDetailDocument> {
        if std::mem::take(&mut self.queued) {
            return Some(self.working.clone());
        }
        self.in_flight = false;
        None
    }

    /// The in-flight write was rejected. The working copy keeps every edit and
    /// the next edit sends all of them again.
    pub fn write_failed(&mut self) {
        self.in_flight = false;
        self.queued = false;
    }
}
