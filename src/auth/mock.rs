//! Mock identity provider for tests.

use anyhow::anyhow;
use std::collections::HashMap;

use super::{AuthProvider, Session};

/// Configurable [`AuthProvider`] used by unit and flow tests.
#[derive(Debug, Default)]
pub struct MockAuthProvider {
    session: Option<Session>,
    default_token: Option<String>,
    template_tokens: HashMap<String, String>,
    fail_template: bool,
    fail_default: bool,
}

impl MockAuthProvider {
    /// Provider with no session.
    pub fn signed_out() -> Self {
        Self::default()
    }

    /// Provider with an established session.
    pub fn signed_in(email: &str, display_name: &str) -> Self {
        Self {
            session: Some(Session {
                user_id: format!("user_{}", email.replace('@', "_at_")),
                email: email.to_string(),
                display_name: display_name.to_string(),
                role: "customer".to_string(),
            }),
            ..Default::default()
        }
    }

    /// Install a session after construction (simulates completing sign-in).
    pub fn set_session(&mut self, email: &str, display_name: &str) {
        self.session = Some(Session {
            user_id: format!("user_{}", email.replace('@', "_at_")),
            email: email.to_string(),
            display_name: display_name.to_string(),
            role: "customer".to_string(),
        });
    }

    /// Provide a default session token.
    pub fn set_default_token(&mut self, token: &str) {
        self.default_token = Some(token.to_string());
    }

    /// Provide a template-scoped token.
    pub fn set_template_token(&mut self, template: &str, token: &str) {
        self.template_tokens
            .insert(template.to_string(), token.to_string());
    }

    /// Make every template-scoped acquisition fail.
    pub fn fail_template_tokens(&mut self) {
        self.fail_template = true;
    }

    /// Make every default-token acquisition fail.
    pub fn fail_default_tokens(&mut self) {
        self.fail_default = true;
    }
}

impl AuthProvider for MockAuthProvider {
    fn session(&self) -> Option<Session> {
        self.session.clone()
    }

    fn acquire_token(&self, template: Option<&str>) -> anyhow::Result<Option<String>> {
        match template {
            Some(name) => {
                if self.fail_template {
                    return Err(anyhow!("template token endpoint unavailable"));
                }
                Ok(self.template_tokens.get(name).cloned())
            }
            None => {
                if self.fail_default {
                    return Err(anyhow!("token endpoint unavailable"));
                }
                Ok(self.default_token.clone())
            }
        }
    }

    fn sign_out(&mut self) {
        self.session = None;
        self.default_token = None;
        self.template_tokens.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signed_in_exposes_session() {
        let provider = MockAuthProvider::signed_in("kim@example.com", "Kim Doe");
        let session = provider.session().unwrap();
        assert_eq!(session.email, "kim@example.com");
        assert_eq!(session.display_name, "Kim Doe");
    }

    #[test]
    fn sign_out_clears_everything() {
        let mut provider = MockAuthProvider::signed_in("kim@example.com", "Kim Doe");
        provider.set_default_token("tok");
        provider.sign_out();

        assert!(provider.session().is_none());
        assert!(provider.acquire_token(None).unwrap().is_none());
    }

    #[test]
    fn failure_injection_returns_errors() {
        let mut provider = MockAuthProvider::signed_in("kim@example.com", "Kim Doe");
        provider.fail_default_tokens();
        assert!(provider.acquire_token(None).is_err());
    }
}
