//! The payment bridge.
//!
//! Payment happens off-premises: the wizard creates a hosted checkout
//! session, sends the subscriber to the provider's page, and picks the flow
//! back up when they return with outcome markers on the URL. The bridge
//! tracks where that round trip stands and owns the verification step.

pub mod checkout;
pub mod redirect;

pub use checkout::{
    CheckoutMetadata, CheckoutOptions, CheckoutRequest, CheckoutResponse, LineItem,
    PaymentClient, UserData, VerifyResponse,
};
pub use redirect::{parse_return, strip_return_params, ReturnParams};

use tracing::{debug, warn};

use crate::auth::{bearer_token, default_strategies, AuthProvider, TokenStrategy};
use crate::config::AppConfig;
use crate::error::{FiberlineError, Result};
use crate::wizard::{SignupDraft, WizardController};

/// Where the checkout round trip currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PaymentPhase {
    /// No checkout in flight.
    #[default]
    Idle,
    /// Session created; waiting for the subscriber to come back.
    AwaitingRedirect,
    /// Return received; asking the backend whether the payment is real.
    Verifying,
    /// Verified and recorded.
    Completed,
    /// Creation or verification failed; retry is allowed.
    Failed,
}

/// Outcome of handling a return URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReturnOutcome {
    /// Payment verified and recorded on the draft.
    Verified { session_id: String },
    /// Return arrived for a payment that was already recorded.
    AlreadyCompleted,
    /// Subscriber backed out of checkout.
    Canceled,
    /// Verification said no or could not run. The message is user-facing.
    Failed { message: String },
    /// The URL carried no outcome markers.
    NoParams,
}

/// Creates checkout sessions and settles their outcome on the controller.
pub struct PaymentBridge {
    client: PaymentClient,
    success_url: String,
    cancel_url: String,
    token_strategies: Vec<TokenStrategy>,
    phase: PaymentPhase,
}

impl PaymentBridge {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: PaymentClient::new(config),
            success_url: config.success_url.clone(),
            cancel_url: config.cancel_url.clone(),
            token_strategies: default_strategies(config.auth_token_template.as_deref()),
            phase: PaymentPhase::Idle,
        }
    }

    pub fn phase(&self) -> PaymentPhase {
        self.phase
    }

    /// Create a checkout session for the draft and return its hosted URL.
    ///
    /// Refuses while a session is already awaiting its redirect. A failure
    /// lands in [`PaymentPhase::Failed`], from which another attempt is
    /// allowed.
    pub fn begin_checkout(
        &mut self,
        draft: &SignupDraft,
        auth: &dyn AuthProvider,
    ) -> Result<String> {
        if self.phase == PaymentPhase::AwaitingRedirect {
            return Err(FiberlineError::CheckoutFailed {
                message: "a checkout session is already in progress".to_string(),
            });
        }

        let user_data = match auth.session() {
            Some(session) => UserData {
                id: session.user_id,
                email: session.email,
                name: session.display_name,
                role: session.role,
            },
            None => UserData {
                id: "guest".to_string(),
                email: draft.email.clone(),
                name: draft.name.clone(),
                role: "customer".to_string(),
            },
        };

        let request = CheckoutRequest {
            line_items: vec![LineItem {
                description: draft.install_type.description().to_string(),
                unit_amount: u64::from(draft.payment_amount) * 100,
                quantity: 1,
            }],
            checkout_options: CheckoutOptions {
                success_url: self.success_url.clone(),
                cancel_url: self.cancel_url.clone(),
                billing_address_collection: "required".to_string(),
                metadata: CheckoutMetadata {
                    install_type: draft.install_type.as_str().to_string(),
                    customer_name: draft.name.clone(),
                    service_address: draft.address.clone(),
                },
            },
            user_data,
        };

        let bearer = bearer_token(auth, &self.token_strategies);
        match self.client.create_session(&request, bearer.as_deref()) {
            Ok(response) => {
                debug!(url = %response.url, "checkout session created");
                self.phase = PaymentPhase::AwaitingRedirect;
                Ok(response.url)
            }
            Err(e) => {
                self.phase = PaymentPhase::Failed;
                Err(e)
            }
        }
    }

    /// Settle a return URL against the controller.
    ///
    /// Verification failures are reported in the outcome, not as `Err`: they
    /// are an expected end of the round trip and the controller has already
    /// been told. `Err` is reserved for persistence problems.
    pub fn handle_return(
        &mut self,
        raw_url: &str,
        controller: &mut WizardController,
        auth: &dyn AuthProvider,
    ) -> Result<ReturnOutcome> {
        match parse_return(raw_url) {
            ReturnParams::Absent => Ok(ReturnOutcome::NoParams),
            ReturnParams::Canceled => {
                self.phase = PaymentPhase::Idle;
                controller.record_payment_canceled()?;
                Ok(ReturnOutcome::Canceled)
            }
            ReturnParams::Success { session_id } => {
                if controller.draft().payment_completed {
                    debug!(session_id, "ignoring repeat success return");
                    return Ok(ReturnOutcome::AlreadyCompleted);
                }
                self.phase = PaymentPhase::Verifying;
                let bearer = bearer_token(auth, &self.token_strategies);
                match self.client.verify_session(&session_id, bearer.as_deref()) {
                    Ok(response) if response.verified => {
                        controller
                            .complete_verified_payment(&session_id, response.amount_total)?;
                        self.phase = PaymentPhase::Completed;
                        Ok(ReturnOutcome::Verified { session_id })
                    }
                    Ok(response) => {
                        let message = match response.payment_status.as_deref() {
                            Some(status) => {
                                format!("Payment was not completed (status: {}).", status)
                            }
                            None => "Payment could not be confirmed.".to_string(),
                        };
                        self.fail(controller, &message)
                    }
                    Err(FiberlineError::VerificationUnreachable { message }) => {
                        warn!(%message, "payment verifier unreachable");
                        self.fail(
                            controller,
                            "Payment could not be verified. If you were charged, it will \
                             be confirmed once our systems catch up. Please try again.",
                        )
                    }
                    Err(FiberlineError::VerificationFailed { message }) => {
                        self.fail(controller, &message)
                    }
                    Err(e) => Err(e),
                }
            }
        }
    }

    fn fail(
        &mut self,
        controller: &mut WizardController,
        message: &str,
    ) -> Result<ReturnOutcome> {
        self.phase = PaymentPhase::Failed;
        controller.record_payment_error(message)?;
        Ok(ReturnOutcome::Failed {
            message: message.to_string(),
        })
    }
}
