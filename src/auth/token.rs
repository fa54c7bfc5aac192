//! Ranked token acquisition.
//!
//! The payment bridge attaches a bearer token on a best-effort basis: a
//! template-scoped token is preferred, a plain session token is the
//! fallback, and an unauthenticated request is always acceptable. Each
//! strategy is independently failable; a failure is logged and the next
//! strategy is tried. This never blocks the checkout.

use tracing::debug;

use super::AuthProvider;

/// One way of obtaining a bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenStrategy {
    /// Ask for a token scoped to a named template.
    Template(String),
    /// Ask for the provider's default session token.
    Default,
    /// Proceed without a token.
    Unauthenticated,
}

/// The standard strategy ranking for the payment bridge.
pub fn default_strategies(template: Option<&str>) -> Vec<TokenStrategy> {
    let mut strategies = Vec::new();
    if let Some(name) = template {
        strategies.push(TokenStrategy::Template(name.to_string()));
    }
    strategies.push(TokenStrategy::Default);
    strategies.push(TokenStrategy::Unauthenticated);
    strategies
}

/// Try each strategy in order and return the first token obtained.
///
/// Returns `None` when every strategy fell through, which callers treat as
/// "send the request unauthenticated".
pub fn bearer_token(provider: &dyn AuthProvider, strategies: &[TokenStrategy]) -> Option<String> {
    for strategy in strategies {
        match strategy {
            TokenStrategy::Template(name) => match provider.acquire_token(Some(name)) {
                Ok(Some(token)) => return Some(token),
                Ok(None) => debug!(template = %name, "no template-scoped token available"),
                Err(e) => debug!(template = %name, error = %e, "template token acquisition failed"),
            },
            TokenStrategy::Default => match provider.acquire_token(None) {
                Ok(Some(token)) => return Some(token),
                Ok(None) => debug!("no default session token available"),
                Err(e) => debug!(error = %e, "default token acquisition failed"),
            },
            TokenStrategy::Unauthenticated => return None,
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::MockAuthProvider;

    #[test]
    fn default_ranking_prefers_template() {
        let strategies = default_strategies(Some("fiberline-backend"));
        assert_eq!(
            strategies,
            vec![
                TokenStrategy::Template("fiberline-backend".to_string()),
                TokenStrategy::Default,
                TokenStrategy::Unauthenticated,
            ]
        );
    }

    #[test]
    fn ranking_without_template_skips_it() {
        let strategies = default_strategies(None);
        assert_eq!(
            strategies,
            vec![TokenStrategy::Default, TokenStrategy::Unauthenticated]
        );
    }

    #[test]
    fn template_token_wins_when_available() {
        let mut provider = MockAuthProvider::signed_in("kim@example.com", "Kim Doe");
        provider.set_template_token("fiberline-backend", "tpl-token");
        provider.set_default_token("plain-token");

        let token = bearer_token(&provider, &default_strategies(Some("fiberline-backend")));
        assert_eq!(token.as_deref(), Some("tpl-token"));
    }

    #[test]
    fn falls_through_to_default_token() {
        let mut provider = MockAuthProvider::signed_in("kim@example.com", "Kim Doe");
        provider.set_default_token("plain-token");

        let token = bearer_token(&provider, &default_strategies(Some("fiberline-backend")));
        assert_eq!(token.as_deref(), Some("plain-token"));
    }

    #[test]
    fn template_failure_does_not_block() {
        let mut provider = MockAuthProvider::signed_in("kim@example.com", "Kim Doe");
        provider.fail_template_tokens();
        provider.set_default_token("plain-token");

        let token = bearer_token(&provider, &default_strategies(Some("fiberline-backend")));
        assert_eq!(token.as_deref(), Some("plain-token"));
    }

    #[test]
    fn all_failures_yield_unauthenticated() {
        let mut provider = MockAuthProvider::signed_in("kim@example.com", "Kim Doe");
        provider.fail_template_tokens();
        provider.fail_default_tokens();

        let token = bearer_token(&provider, &default_strategies(Some("fiberline-backend")));
        assert!(token.is_none());
    }

    #[test]
    fn signed_out_provider_yields_unauthenticated() {
        let provider = MockAuthProvider::signed_out();
        let token = bearer_token(&provider, &default_strategies(Some("fiberline-backend")));
        assert!(token.is_none());
    }
}
