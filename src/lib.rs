//! Task synchronization core for the Focus Dashboard new-tab page.
//!
//! Mirrors a Notion database into three fixed sections — health, work,
//! follow-ups — and writes completion state back. The rendering layer
//! consumes `SyncEngine` output and owns optimistic UI state; the
//! settings surface owns credential writes. This crate owns everything
//! between: the HTTP gateway, schema mapping, grouping, the
//! last-known-good cache, and the schema-fallback retry.

pub mod cache;
pub mod credentials;
pub mod error;
pub mod notion;
mod util;

pub use cache::{CacheEntry, FileTaskCache, MemoryTaskCache, TaskCache};
pub use credentials::{
    CredentialStore, FileCredentialStore, MemoryCredentialStore, NotionCredentials,
};
pub use error::SyncError;
pub use notion::gateway::{Envelope, HttpGateway, TaskGateway, TaskRequest};
pub use notion::schema::{GroupedTasks, SectionKey, Task};
pub use notion::sync::SyncEngine;
