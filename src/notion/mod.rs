//! Notion API integration layer.
//!
//! Property mapping targets the dashboard database schema:
//!   - `Name`   (title)  — task title
//!   - `Area`   (select) — section grouping; expected values
//!     "Health", "Work", "Follow-ups"
//!   - `Due`    (date)   — optional due date, parsed but not used for
//!     grouping
//!   - `Status` (select) — completion state; rows where Status ==
//!     "Done" are excluded at query time. If the Status property does
//!     not exist in the database, all rows are fetched (fallback mode).

pub mod gateway;
pub mod schema;
pub mod sync;

/// Notion REST endpoint root.
pub const NOTION_API_BASE: &str = "https://api.notion.com/v1";

/// Pinned `Notion-Version` header value.
pub const NOTION_VERSION: &str = "2022-06-28";

/// Title property holding the task name.
pub const TITLE_PROPERTY: &str = "Name";

/// Select property holding the section label.
pub const AREA_PROPERTY: &str = "Area";

/// Date property holding the optional due date.
pub const DUE_PROPERTY: &str = "Due";

/// Select property holding completion state.
pub const STATUS_PROPERTY: &str = "Status";

/// Status select value for a completed task.
pub const STATUS_DONE: &str = "Done";

/// Status select value for an open task.
pub const STATUS_TODO: &str = "Todo";
