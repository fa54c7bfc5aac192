//! Identity provider boundary.
//!
//! The identity provider is an external collaborator. The wizard only needs
//! five capabilities from it: "is there an authenticated session", the
//! session's display name/email, bearer-token acquisition (optionally scoped
//! to a named template), and sign-out. [`AuthProvider`] models exactly that;
//! everything behind it is opaque.

pub mod mock;
pub mod token;

pub use mock::MockAuthProvider;
pub use token::{bearer_token, default_strategies, TokenStrategy};

/// An authenticated identity-provider session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Provider-assigned user id.
    pub user_id: String,
    /// Primary email address.
    pub email: String,
    /// Display name.
    pub display_name: String,
    /// Provider role (plain customer accounts are "customer").
    pub role: String,
}

/// Consumed identity-provider capabilities.
pub trait AuthProvider {
    /// The current authenticated session, if any.
    fn session(&self) -> Option<Session>;

    /// Acquire a bearer token, optionally scoped to a named template.
    ///
    /// `Ok(None)` means the provider is reachable but has no token to give
    /// (e.g. no session); `Err` means the acquisition attempt itself failed.
    fn acquire_token(&self, template: Option<&str>) -> anyhow::Result<Option<String>>;

    /// End the current session.
    fn sign_out(&mut self);
}

/// Auth provider backed by the identity provider's local agent state.
///
/// The provider's desktop agent exports the established session through
/// `FIBERLINE_SESSION_*` environment variables; this reads them. Absent
/// variables mean "not signed in".
#[derive(Debug, Default)]
pub struct EnvAuthProvider {
    signed_out: bool,
}

impl EnvAuthProvider {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AuthProvider for EnvAuthProvider {
    fn session(&self) -> Option<Session> {
        if self.signed_out {
            return None;
        }
        let email = std::env::var("FIBERLINE_SESSION_EMAIL").ok()?;
        let user_id = std::env::var("FIBERLINE_SESSION_USER_ID")
            .unwrap_or_else(|_| format!("user_{}", email.replace('@', "_at_")));
        let display_name =
            std::env::var("FIBERLINE_SESSION_NAME").unwrap_or_else(|_| email.clone());
        let role = std::env::var("FIBERLINE_SESSION_ROLE").unwrap_or_else(|_| "customer".into());
        Some(Session {
            user_id,
            email,
            display_name,
            role,
        })
    }

    fn acquire_token(&self, template: Option<&str>) -> anyhow::Result<Option<String>> {
        if self.signed_out {
            return Ok(None);
        }
        let var = match template {
            Some(name) => format!(
                "FIBERLINE_TOKEN_{}",
                name.to_uppercase().replace('-', "_")
            ),
            None => "FIBERLINE_SESSION_TOKEN".to_string(),
        };
        Ok(std::env::var(var).ok())
    }

    fn sign_out(&mut self) {
        self.signed_out = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signed_out_provider_has_no_session() {
        let mut provider = EnvAuthProvider::new();
        provider.sign_out();
        assert!(provider.session().is_none());
        assert!(provider.acquire_token(None).unwrap().is_none());
    }

    #[test]
    fn session_struct_holds_contact_fields() {
        let session = Session {
            user_id: "user_1".into(),
            email: "kim@example.com".into(),
            display_name: "Kim Doe".into(),
            role: "customer".into(),
        };
        assert_eq!(session.email, "kim@example.com");
        assert_eq!(session.role, "customer");
    }
}
