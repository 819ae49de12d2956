//! Sync engine: credential check, query with schema fallback, parse,
//! group, cache.
//!
//! The fetch path holds the crate's only retry logic. A 400 on the
//! filtered query is read as "the Status property does not exist in
//! this database" — a structural mismatch, not a transient fault — so
//! the retry is a single sequential unfiltered query, never a backoff
//! loop. All other failures surface immediately.

use std::sync::Arc;

use serde_json::{json, Value};

use crate::cache::{CacheEntry, TaskCache};
use crate::credentials::CredentialStore;
use crate::error::SyncError;

use super::gateway::{Envelope, TaskGateway, TaskRequest};
use super::schema::{area_to_section_key, parse_page, GroupedTasks};
use super::{STATUS_DONE, STATUS_PROPERTY};

/// Orchestrates the fetch and update paths against injected seams, so
/// it is testable without a storage backend or a live endpoint.
///
/// No internal locking: at most one in-flight fetch is assumed, and
/// concurrent status updates are independent, last-write-wins per
/// task id.
pub struct SyncEngine {
    store: Arc<dyn CredentialStore>,
    gateway: Arc<dyn TaskGateway>,
    cache: Arc<dyn TaskCache>,
}

impl SyncEngine {
    pub fn new(
        store: Arc<dyn CredentialStore>,
        gateway: Arc<dyn TaskGateway>,
        cache: Arc<dyn TaskCache>,
    ) -> Self {
        Self {
            store,
            gateway,
            cache,
        }
    }

    /// Query body excluding completed rows.
    fn status_filter() -> Value {
        json!({
            "filter": {
                "property": STATUS_PROPERTY,
                "select": { "does_not_equal": STATUS_DONE },
            }
        })
    }

    /// Fetch open tasks grouped into the three dashboard sections.
    ///
    /// Credentials are checked locally first so the rendering layer
    /// can distinguish "not configured" from a remote rejection
    /// without a round trip. On success the grouped result is written
    /// to the cache before returning; cache failures never propagate.
    pub async fn fetch_tasks(&self) -> Result<GroupedTasks, SyncError> {
        if self.store.load().is_none() {
            return Err(SyncError::MissingCredentials);
        }

        let first = self
            .gateway
            .send(TaskRequest::Query {
                body: Self::status_filter(),
            })
            .await;

        let results = match first {
            Envelope::Success { results } => results,
            Envelope::Failure {
                error,
                status,
                detail,
            } => {
                if status != Some(400) {
                    return Err(SyncError::Api {
                        message: error,
                        status,
                        detail,
                    });
                }
                // Status property probably absent in this database —
                // retry once without the filter.
                log::warn!("Status filter rejected (400), retrying without filter (fallback mode)");
                match self
                    .gateway
                    .send(TaskRequest::Query { body: json!({}) })
                    .await
                {
                    Envelope::Success { results } => results,
                    Envelope::Failure {
                        error,
                        status,
                        detail,
                    } => {
                        return Err(SyncError::Api {
                            message: error,
                            status,
                            detail,
                        })
                    }
                }
            }
        };

        let mut grouped = GroupedTasks::default();
        let mut skipped = 0usize;
        for page in &results {
            let task = parse_page(page);
            match task.area.as_deref().and_then(area_to_section_key) {
                Some(key) => grouped.section_mut(key).push(task.into_task()),
                // No Area, or an unrecognised value: out of scope for
                // the dashboard.
                None => skipped += 1,
            }
        }
        log::info!(
            "fetched {} tasks into sections ({} skipped)",
            grouped.total(),
            skipped
        );

        self.cache.write(&grouped);
        Ok(grouped)
    }

    /// Write a task's completion state: true → "Done", false → "Todo".
    ///
    /// On success the cache is invalidated exactly once so the next
    /// paint cannot resurrect the stale row. Optimistic UI state and
    /// its rollback belong to the caller; this method only succeeds or
    /// fails with enough detail for user messaging.
    pub async fn update_task_status(&self, task_id: &str, done: bool) -> Result<(), SyncError> {
        let envelope = self
            .gateway
            .send(TaskRequest::UpdateStatus {
                task_id: task_id.to_string(),
                done,
            })
            .await;

        match envelope {
            Envelope::Success { .. } => {
                self.cache.invalidate();
                Ok(())
            }
            Envelope::Failure {
                error,
                status,
                detail,
            } => Err(SyncError::Api {
                message: error,
                status,
                detail,
            }),
        }
    }

    /// Last grouped snapshot for instant paint on load. A miss is a
    /// normal state.
    pub fn cached_tasks(&self) -> Option<CacheEntry> {
        self.cache.read()
    }
}
