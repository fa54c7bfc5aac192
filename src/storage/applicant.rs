//! Applicant identity for draft namespacing.

use sha2::{Digest, Sha256};

/// Identifies which saved draft a run operates on.
///
/// Derived from a stable contact key (normally the applicant's email) so two
/// people sharing a kiosk do not clobber each other's drafts. Runs that have
/// no contact data yet use the anonymous id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicantId {
    key: String,
    hash: String,
}

impl ApplicantId {
    /// Derive an id from a contact key such as an email address.
    ///
    /// The key is trimmed and lowercased before hashing, so
    /// `Kim@Example.com ` and `kim@example.com` resolve to the same draft.
    pub fn from_key(key: &str) -> Self {
        let normalized = key.trim().to_lowercase();
        let mut hasher = Sha256::new();
        hasher.update(normalized.as_bytes());
        let digest = hasher.finalize();
        Self {
            key: normalized,
            hash: hex::encode(&digest[..8]),
        }
    }

    /// The shared draft slot used before any contact data exists.
    pub fn anonymous() -> Self {
        Self::from_key("anonymous")
    }

    /// Normalized contact key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Short stable hash, safe for use as a directory name.
    pub fn hash(&self) -> &str {
        &self.hash
    }
}
