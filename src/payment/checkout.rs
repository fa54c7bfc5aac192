//! Wire client for the checkout backend.
//!
//! Two endpoints: one creates a hosted checkout session and returns its URL,
//! the other verifies a session after the provider redirects back. The two
//! endpoints fail differently on purpose: an unreachable verifier is
//! [`VerificationUnreachable`](crate::error::FiberlineError::VerificationUnreachable),
//! never a quiet pass.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::AppConfig;
use crate::error::{FiberlineError, Result};

/// One purchasable item in the checkout session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineItem {
    pub description: String,
    /// Amount in minor units (cents).
    pub unit_amount: u64,
    pub quantity: u32,
}

/// Order context carried through the checkout session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutMetadata {
    pub install_type: String,
    pub customer_name: String,
    pub service_address: String,
}

/// Provider-facing session options.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutOptions {
    pub success_url: String,
    pub cancel_url: String,
    pub billing_address_collection: String,
    pub metadata: CheckoutMetadata,
}

/// The purchasing user as the backend wants to see them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserData {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: String,
}

/// Request body for checkout-session creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutRequest {
    pub line_items: Vec<LineItem>,
    pub checkout_options: CheckoutOptions,
    pub user_data: UserData,
}

/// Response from checkout-session creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutResponse {
    /// Hosted checkout page to send the subscriber to.
    pub url: String,
}

/// Request body for payment verification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyRequest {
    #[serde(rename = "sessionId")]
    pub session_id: String,
}

/// Response from payment verification.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VerifyResponse {
    pub verified: bool,
    pub session_id: Option<String>,
    pub payment_status: Option<String>,
    /// Amount charged, in minor units.
    pub amount_total: Option<u64>,
    pub customer_id: Option<String>,
    pub metadata: Option<CheckoutMetadata>,
    pub line_items: Option<Vec<LineItem>>,
}

/// Error body both endpoints use.
#[derive(Debug, Clone, Deserialize)]
struct ApiError {
    error: String,
}

/// Blocking HTTP client for the two payment endpoints.
pub struct PaymentClient {
    client: reqwest::blocking::Client,
    checkout_url: String,
    verify_url: String,
}

impl PaymentClient {
    pub fn new(config: &AppConfig) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(config.http_timeout())
            .build()
            .expect("HTTP client construction only fails on invalid TLS setup");
        Self {
            client,
            checkout_url: config.checkout_url.clone(),
            verify_url: config.verify_url.clone(),
        }
    }

    /// Create a hosted checkout session, returning its URL.
    pub fn create_session(
        &self,
        request: &CheckoutRequest,
        bearer: Option<&str>,
    ) -> Result<CheckoutResponse> {
        debug!(url = %self.checkout_url, authenticated = bearer.is_some(), "creating checkout session");
        let mut req = self.client.post(&self.checkout_url).json(request);
        if let Some(token) = bearer {
            req = req.bearer_auth(token);
        }
        let response = req.send().map_err(|e| FiberlineError::CheckoutFailed {
            message: format!("checkout endpoint unreachable: {}", e),
        })?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ApiError>()
                .map(|e| e.error)
                .unwrap_or_else(|_| format!("checkout endpoint returned {}", status));
            return Err(FiberlineError::CheckoutFailed { message });
        }

        response
            .json::<CheckoutResponse>()
            .map_err(|e| FiberlineError::CheckoutFailed {
                message: format!("malformed checkout response: {}", e),
            })
    }

    /// Verify a checkout session after the provider redirected back.
    ///
    /// Transport failures and unparsable responses are
    /// `VerificationUnreachable`; a reachable verifier that says no is
    /// `VerificationFailed`.
    pub fn verify_session(
        &self,
        session_id: &str,
        bearer: Option<&str>,
    ) -> Result<VerifyResponse> {
        debug!(url = %self.verify_url, session_id, "verifying payment session");
        let mut req = self.client.post(&self.verify_url).json(&VerifyRequest {
            session_id: session_id.to_string(),
        });
        if let Some(token) = bearer {
            req = req.bearer_auth(token);
        }
        let response = req
            .send()
            .map_err(|e| FiberlineError::VerificationUnreachable {
                message: format!("verification endpoint unreachable: {}", e),
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ApiError>()
                .map(|e| e.error)
                .unwrap_or_else(|_| format!("verification endpoint returned {}", status));
            return Err(FiberlineError::VerificationFailed { message });
        }

        response
            .json::<VerifyResponse>()
            .map_err(|e| FiberlineError::VerificationUnreachable {
                message: format!("malformed verification response: {}", e),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn config_for(server: &MockServer) -> AppConfig {
        AppConfig {
            checkout_url: server.url("/create-checkout"),
            verify_url: server.url("/verify-payment"),
            http_timeout_secs: 5,
            ..AppConfig::default()
        }
    }

    fn request() -> CheckoutRequest {
        CheckoutRequest {
            line_items: vec![LineItem {
                description: "Fiberline activation".to_string(),
                unit_amount: 5500,
                quantity: 1,
            }],
            checkout_options: CheckoutOptions {
                success_url: "https://example.com/?success=true&session_id={CHECKOUT_SESSION_ID}"
                    .to_string(),
                cancel_url: "https://example.com/?canceled=true".to_string(),
                billing_address_collection: "required".to_string(),
                metadata: CheckoutMetadata {
                    install_type: "contract".to_string(),
                    customer_name: "Kim Doe".to_string(),
                    service_address: "123 Main Street, Orangeburg, SC 29115".to_string(),
                },
            },
            user_data: UserData {
                id: "user_1".to_string(),
                email: "kim@example.com".to_string(),
                name: "Kim Doe".to_string(),
                role: "customer".to_string(),
            },
        }
    }

    #[test]
    fn checkout_request_serializes_the_backend_key_names() {
        let json = serde_json::to_value(request()).unwrap();
        assert!(json.get("checkout_options").is_some());
        assert!(json.get("options").is_none());
        assert!(json.get("line_items").is_some());
        assert!(json.get("user_data").is_some());
    }

    #[test]
    fn verify_response_carries_metadata_and_line_items() {
        let response: VerifyResponse = serde_json::from_value(serde_json::json!({
            "verified": true,
            "amount_total": 5500,
            "metadata": {
                "install_type": "contract",
                "customer_name": "Kim Doe",
                "service_address": "123 Main Street, Orangeburg, SC 29115"
            },
            "line_items": [
                {"description": "Fiberline activation", "unit_amount": 5500, "quantity": 1}
            ]
        }))
        .unwrap();

        assert_eq!(
            response.metadata.unwrap().install_type,
            "contract"
        );
        assert_eq!(response.line_items.unwrap()[0].unit_amount, 5500);
    }

    #[test]
    fn create_session_returns_checkout_url() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/create-checkout")
                .header("authorization", "Bearer tok_123")
                .json_body_includes(r#"{"line_items": [{"unit_amount": 5500}]}"#);
            then.status(200)
                .json_body(serde_json::json!({"url": "https://pay.example.com/cs_test_1"}));
        });

        let client = PaymentClient::new(&config_for(&server));
        let response = client.create_session(&request(), Some("tok_123")).unwrap();

        mock.assert();
        assert_eq!(response.url, "https://pay.example.com/cs_test_1");
    }

    #[test]
    fn create_session_without_token_still_succeeds() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST).path("/create-checkout");
            then.status(200)
                .json_body(serde_json::json!({"url": "https://pay.example.com/cs_test_2"}));
        });

        let client = PaymentClient::new(&config_for(&server));
        let response = client.create_session(&request(), None).unwrap();

        mock.assert();
        assert_eq!(response.url, "https://pay.example.com/cs_test_2");
    }

    #[test]
    fn create_session_surfaces_backend_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/create-checkout");
            then.status(400)
                .json_body(serde_json::json!({"error": "line_items is required"}));
        });

        let client = PaymentClient::new(&config_for(&server));
        let err = client.create_session(&request(), None).unwrap_err();
        match err {
            FiberlineError::CheckoutFailed { message } => {
                assert_eq!(message, "line_items is required");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn verify_session_parses_full_response() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST)
                .path("/verify-payment")
                .json_body(serde_json::json!({"sessionId": "cs_test_1"}));
            then.status(200).json_body(serde_json::json!({
                "verified": true,
                "session_id": "cs_test_1",
                "payment_status": "paid",
                "amount_total": 5500,
                "customer_id": "cus_9"
            }));
        });

        let client = PaymentClient::new(&config_for(&server));
        let response = client.verify_session("cs_test_1", Some("tok")).unwrap();
        assert!(response.verified);
        assert_eq!(response.amount_total, Some(5500));
        assert_eq!(response.payment_status.as_deref(), Some("paid"));
    }

    #[test]
    fn verify_rejection_is_verification_failed() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/verify-payment");
            then.status(402)
                .json_body(serde_json::json!({"error": "payment not completed"}));
        });

        let client = PaymentClient::new(&config_for(&server));
        let err = client.verify_session("cs_test_1", None).unwrap_err();
        assert!(matches!(err, FiberlineError::VerificationFailed { .. }));
    }

    #[test]
    fn unreachable_verifier_is_a_hard_failure() {
        // Point at a server that is not listening.
        let config = AppConfig {
            checkout_url: "http://127.0.0.1:1/create-checkout".to_string(),
            verify_url: "http://127.0.0.1:1/verify-payment".to_string(),
            http_timeout_secs: 1,
            ..AppConfig::default()
        };
        let client = PaymentClient::new(&config);
        let err = client.verify_session("cs_test_1", None).unwrap_err();
        assert!(matches!(
            err,
            FiberlineError::VerificationUnreachable { .. }
        ));
    }

    #[test]
    fn garbled_verifier_response_is_unreachable() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/verify-payment");
            then.status(200).body("not json at all");
        });

        let client = PaymentClient::new(&config_for(&server));
        let err = client.verify_session("cs_test_1", None).unwrap_err();
        assert!(matches!(
            err,
            FiberlineError::VerificationUnreachable { .. }
        ));
    }
}
