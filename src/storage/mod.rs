//! Draft persistence for the sign-up wizard.
//!
//! The wizard keeps its in-progress state in two string-keyed slots: one for
//! the serialized draft record and one for the step pointer. The storage
//! technology sits behind [`DraftStore`] so the file-backed store can be
//! swapped for [`MemoryDraftStore`] in tests.

pub mod applicant;
pub mod file;
pub mod memory;

pub use applicant::ApplicantId;
pub use file::FileDraftStore;
pub use memory::MemoryDraftStore;

use crate::error::Result;

/// Slot holding the serialized [`SignupDraft`](crate::wizard::SignupDraft).
pub const DRAFT_SLOT: &str = "draft";

/// Slot holding the serialized step pointer.
pub const STEP_SLOT: &str = "step";

/// Slot holding captured notify-me requests for future-service addresses.
pub const NOTIFY_SLOT: &str = "notify";

/// String-keyed slot storage for wizard drafts.
///
/// Writes are last-write-wins; all access is single-threaded relative to the
/// triggering user interaction, so no locking is needed.
pub trait DraftStore {
    /// Read a slot, `None` if it was never written.
    fn get(&self, slot: &str) -> Result<Option<String>>;

    /// Write a slot, replacing any previous value.
    fn set(&mut self, slot: &str, value: &str) -> Result<()>;

    /// Remove a slot. Removing an absent slot is a no-op.
    fn remove(&mut self, slot: &str) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_names_are_distinct() {
        assert_ne!(DRAFT_SLOT, STEP_SLOT);
        assert_ne!(DRAFT_SLOT, NOTIFY_SLOT);
    }
}
