//! Notify-me capture for future-service addresses.
//!
//! When an address is on the build-out plan but not yet lit, the checker
//! offers to record contact details so the applicant can be told when fiber
//! reaches their street. Requests accumulate in a single local log slot.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{FiberlineError, Result};
use crate::storage::{DraftStore, NOTIFY_SLOT};

/// One captured notify-me request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotifyRequest {
    pub address: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub requested_at: DateTime<Utc>,
}

/// Append-only log of notify-me requests backed by a draft-store slot.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct NotifyLog {
    requests: Vec<NotifyRequest>,
}

impl NotifyLog {
    /// Load the log from storage, starting empty if absent or unreadable.
    pub fn load(store: &dyn DraftStore) -> Self {
        match store.get(NOTIFY_SLOT) {
            Ok(Some(raw)) => serde_yaml::from_str(&raw).unwrap_or_default(),
            _ => Self::default(),
        }
    }

    /// Append a request and persist the log.
    pub fn append(&mut self, store: &mut dyn DraftStore, request: NotifyRequest) -> Result<()> {
        self.requests.push(request);
        let raw = serde_yaml::to_string(self).map_err(|e| FiberlineError::DraftWrite {
            slot: NOTIFY_SLOT.to_string(),
            message: e.to_string(),
        })?;
        store.set(NOTIFY_SLOT, &raw)
    }

    /// All captured requests, oldest first.
    pub fn requests(&self) -> &[NotifyRequest] {
        &self.requests
    }
}
