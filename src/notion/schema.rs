//! Mapping between Notion page objects and dashboard tasks.
//!
//! Page shape is not guaranteed — the database schema may lack any of
//! the mapped properties — so every accessor degrades to a default
//! instead of failing. A page that cannot be classified into a section
//! is dropped during grouping, not reported as an error.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{AREA_PROPERTY, DUE_PROPERTY, STATUS_PROPERTY, TITLE_PROPERTY};

/// Title shown when a page has no readable Name property.
pub const UNTITLED: &str = "(Untitled)";

/// The three fixed dashboard sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionKey {
    Health,
    Work,
    Followups,
}

impl SectionKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Health => "health",
            Self::Work => "work",
            Self::Followups => "followups",
        }
    }
}

/// A dashboard task in render-ready form.
///
/// `done` is always false at fetch time because the query excludes
/// completed rows; the field exists so the rendering layer can flip it
/// optimistically on toggle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub title: String,
    pub done: bool,
}

/// Full parse of one page, before grouping drops the labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedTask {
    pub id: String,
    pub title: String,
    pub area: Option<String>,
    pub due: Option<String>,
    pub status: Option<String>,
    pub done: bool,
}

impl ParsedTask {
    pub fn into_task(self) -> Task {
        Task {
            id: self.id,
            title: self.title,
            done: self.done,
        }
    }
}

/// Tasks grouped by section. All three keys are always present, each
/// possibly empty — this is the unit of caching and rendering.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupedTasks {
    pub health: Vec<Task>,
    pub work: Vec<Task>,
    pub followups: Vec<Task>,
}

impl GroupedTasks {
    pub fn section(&self, key: SectionKey) -> &[Task] {
        match key {
            SectionKey::Health => &self.health,
            SectionKey::Work => &self.work,
            SectionKey::Followups => &self.followups,
        }
    }

    pub fn section_mut(&mut self, key: SectionKey) -> &mut Vec<Task> {
        match key {
            SectionKey::Health => &mut self.health,
            SectionKey::Work => &mut self.work,
            SectionKey::Followups => &mut self.followups,
        }
    }

    pub fn total(&self) -> usize {
        self.health.len() + self.work.len() + self.followups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

/// Map an Area select value to a section key.
///
/// Normalises casing and punctuation so "Follow-ups", "Follow ups",
/// and "followups" all match. Unrecognised values return None and the
/// record is dropped from grouping.
pub fn area_to_section_key(area: &str) -> Option<SectionKey> {
    let normalized: String = area
        .to_lowercase()
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-' && *c != '_')
        .collect();

    match normalized.as_str() {
        "health" => Some(SectionKey::Health),
        "work" => Some(SectionKey::Work),
        n if n.starts_with("follow") => Some(SectionKey::Followups),
        _ => None,
    }
}

/// Parse a Notion page object into a task record. Missing or oddly
/// shaped properties degrade to defaults; this never fails.
pub fn parse_page(page: &Value) -> ParsedTask {
    let props = page.get("properties");
    let prop = |name: &str| props.and_then(|p| p.get(name));

    ParsedTask {
        id: page
            .get("id")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        title: prop(TITLE_PROPERTY)
            .and_then(|v| v.get("title"))
            .and_then(|v| v.get(0))
            .and_then(|v| v.get("plain_text"))
            .and_then(Value::as_str)
            .unwrap_or(UNTITLED)
            .to_string(),
        area: select_name(prop(AREA_PROPERTY)),
        due: prop(DUE_PROPERTY)
            .and_then(|v| v.get("date"))
            .and_then(|v| v.get("start"))
            .and_then(Value::as_str)
            .map(str::to_string),
        status: select_name(prop(STATUS_PROPERTY)),
        // All fetched rows are open: the query excludes Status == "Done".
        done: false,
    }
}

fn select_name(prop: Option<&Value>) -> Option<String> {
    prop.and_then(|v| v.get("select"))
        .and_then(|v| v.get("name"))
        .and_then(Value::as_str)
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_area_normalisation_variants() {
        for label in ["Health", "health", " Health "] {
            assert_eq!(area_to_section_key(label), Some(SectionKey::Health), "{label:?}");
        }
        for label in ["Follow-ups", "Follow ups", "followups", "follow_ups", "Following"] {
            assert_eq!(
                area_to_section_key(label),
                Some(SectionKey::Followups),
                "{label:?}"
            );
        }
        assert_eq!(area_to_section_key("Work"), Some(SectionKey::Work));
        assert_eq!(area_to_section_key("WORK"), Some(SectionKey::Work));
    }

    #[test]
    fn test_unrecognised_area_is_dropped() {
        assert_eq!(area_to_section_key("Vacation"), None);
        assert_eq!(area_to_section_key(""), None);
        assert_eq!(area_to_section_key("healthy"), None);
    }

    #[test]
    fn test_parse_full_page() {
        let page = json!({
            "id": "page-1",
            "properties": {
                "Name": { "title": [{ "plain_text": "Morning run" }] },
                "Area": { "select": { "name": "Health" } },
                "Due": { "date": { "start": "2026-09-01" } },
                "Status": { "select": { "name": "Todo" } },
            }
        });

        let task = parse_page(&page);
        assert_eq!(task.id, "page-1");
        assert_eq!(task.title, "Morning run");
        assert_eq!(task.area.as_deref(), Some("Health"));
        assert_eq!(task.due.as_deref(), Some("2026-09-01"));
        assert_eq!(task.status.as_deref(), Some("Todo"));
        assert!(!task.done);
    }

    #[test]
    fn test_parse_degrades_to_defaults() {
        let task = parse_page(&json!({}));
        assert_eq!(task.id, "");
        assert_eq!(task.title, UNTITLED);
        assert_eq!(task.area, None);
        assert_eq!(task.due, None);
        assert_eq!(task.status, None);
        assert!(!task.done);
    }

    #[test]
    fn test_parse_empty_title_array() {
        let page = json!({
            "id": "page-2",
            "properties": {
                "Name": { "title": [] },
                "Area": { "select": { "name": "Work" } },
            }
        });

        let task = parse_page(&page);
        assert_eq!(task.title, UNTITLED);
        assert_eq!(task.area.as_deref(), Some("Work"));
    }

    #[test]
    fn test_grouped_tasks_always_has_three_keys() {
        let json = serde_json::to_value(GroupedTasks::default()).expect("serialize");
        let obj = json.as_object().expect("object");
        assert_eq!(obj.len(), 3);
        for key in ["health", "work", "followups"] {
            assert!(obj.get(key).expect(key).is_array());
        }
    }

    #[test]
    fn test_section_accessors() {
        let mut grouped = GroupedTasks::default();
        grouped.section_mut(SectionKey::Work).push(Task {
            id: "page-1".to_string(),
            title: "Ship release".to_string(),
            done: false,
        });

        assert_eq!(grouped.section(SectionKey::Work).len(), 1);
        assert!(grouped.section(SectionKey::Health).is_empty());
        assert_eq!(grouped.total(), 1);
        assert!(!grouped.is_empty());
    }
}
