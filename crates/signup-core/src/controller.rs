//! Signup Flow Controller
//!
//! Drives the [`SignupState`] machine against the backend, the durable
//! store and the page navigator. One controller lives for one page load:
//! the redirect to the payment provider discards it, and the return trip
//! builds a fresh one that picks the attempt back up from the store.

use chrono::Utc;

use crate::api::{AccountRequest, AccountRole, SignupApi};
use crate::draft::{AccountCredentials, CheckoutSessionId, CompanyId, SignupDraft};
use crate::error::{Result, SignupError, VERIFICATION_MESSAGE};
use crate::flow::{SignupEvent, SignupState, TransitionError, transition};
use crate::navigation::{DASHBOARD_ROUTE, Navigator, PaymentReturn};
use crate::store::{DurableStore, SignupStash};
use crate::tier::Tier;

/// Signup/checkout flow controller
pub struct SignupController<A, S, N> {
    api: A,
    stash: SignupStash<S>,
    navigator: N,
    state: SignupState,
    verification_started: bool,
}

impl<A, S, N> SignupController<A, S, N>
where
    A: SignupApi,
    S: DurableStore,
    N: Navigator,
{
    pub fn new(api: A, store: S, navigator: N) -> Self {
        Self {
            api,
            stash: SignupStash::new(store),
            navigator,
            state: SignupState::default(),
            verification_started: false,
        }
    }

    pub const fn state(&self) -> &SignupState {
        &self.state
    }

    pub const fn api(&self) -> &A {
        &self.api
    }

    pub const fn stash(&self) -> &SignupStash<S> {
        &self.stash
    }

    /// Page-load entry point.
    ///
    /// With both return parameters present this goes straight to payment
    /// verification. Otherwise a draft left behind by a cancelled payment is
    /// restored, and an attempt past the abandonment window is discarded.
    pub async fn resume(&mut self, query: &str) -> Result<()> {
        if let Some(PaymentReturn {
            session_id,
            company_id,
        }) = PaymentReturn::from_query(query)
        {
            return self.verify_returned_payment(session_id, company_id).await;
        }

        match self.stash.attempt() {
            Ok(Some(attempt)) if attempt.is_abandoned(Utc::now()) => {
                tracing::info!(
                    started_at = %attempt.started_at,
                    "Discarding abandoned signup attempt"
                );
                self.stash.clear()?;
                return Ok(());
            }
            Ok(_) => {}
            Err(e) => {
                tracing::warn!(error = %e, "Signup attempt unreadable, starting over");
                self.stash.clear()?;
                return Ok(());
            }
        }

        match self.stash.draft() {
            Ok(Some(draft)) => {
                tracing::debug!(tier = %draft.tier, "Restoring signup draft");
                self.apply(SignupEvent::DraftRestored(draft))
            }
            Ok(None) => Ok(()),
            Err(e) => {
                tracing::warn!(error = %e, "Ignoring unreadable signup draft");
                Ok(())
            }
        }
    }

    /// Choose a tier. Changes nothing but the draft's tier.
    pub fn select_tier(&mut self, tier: Tier) -> Result<()> {
        self.apply(SignupEvent::TierSelected(tier))
    }

    /// Validate the company step, create a checkout session and hand the
    /// browser to the payment provider.
    ///
    /// The company id and draft are persisted before navigating away. On
    /// failure, including a refused redirect, the flow returns to plan
    /// selection and the error is returned for display.
    pub async fn submit_company_info(&mut self, draft: SignupDraft) -> Result<()> {
        self.apply(SignupEvent::CompanySubmitted(draft.clone()))?;

        let company = draft.company();
        let attempt = match self.stash.begin_attempt(&company, Utc::now()) {
            Ok(attempt) => attempt,
            Err(e) => return self.recover(SignupEvent::CheckoutFailed, e.into()),
        };

        let created = match self
            .api
            .create_checkout_session(&company, attempt.idempotency_key)
            .await
        {
            Ok(created) => created,
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    idempotency_key = %attempt.idempotency_key,
                    "Checkout session creation failed"
                );
                return self.recover(SignupEvent::CheckoutFailed, e);
            }
        };

        if let Err(e) = self.stash.save_checkout(created.company_id, &draft) {
            return self.recover(SignupEvent::CheckoutFailed, e.into());
        }

        tracing::info!(
            company_id = %created.company_id,
            tier = %company.tier,
            "Checkout session created, redirecting to payment"
        );

        if let Err(e) = self.navigator.navigate(&created.checkout_url) {
            tracing::error!(error = %e, "Could not redirect to payment page");
            return self.recover(SignupEvent::CheckoutFailed, e);
        }
        self.apply(SignupEvent::CheckoutCreated(created))
    }

    /// Confirm the returned checkout session was paid.
    ///
    /// Runs at most once per controller. Any failure is terminal: the user
    /// is told to contact support, since a blind retry cannot tell "not yet
    /// paid" from "failed".
    pub async fn verify_returned_payment(
        &mut self,
        session_id: CheckoutSessionId,
        company_id: CompanyId,
    ) -> Result<()> {
        if self.verification_started {
            return Err(TransitionError::InvalidTransition {
                state: self.state.name(),
                event: "payment_returned",
            }
            .into());
        }
        self.verification_started = true;

        self.apply(SignupEvent::PaymentReturned {
            session_id: session_id.clone(),
            company_id,
        })?;

        let detail = match self.api.verify_session(&session_id, company_id).await {
            Ok(true) => return self.on_payment_verified(company_id),
            Ok(false) => "checkout session not paid".to_string(),
            Err(e) => e.to_string(),
        };

        tracing::error!(
            session_id = %session_id,
            company_id = %company_id,
            detail = %detail,
            "Payment verification failed"
        );
        self.apply(SignupEvent::VerificationFailed {
            message: VERIFICATION_MESSAGE.into(),
        })?;
        Err(SignupError::PaymentVerification(detail))
    }

    /// Create the administrator account and move on to the dashboard.
    ///
    /// Persisted signup state is cleared before navigating. If clearing
    /// fails the account still exists, so the dashboard is reached anyway
    /// and the storage error is returned afterwards. If account creation
    /// fails the flow stays in account details.
    pub async fn submit_account(&mut self, credentials: AccountCredentials) -> Result<()> {
        self.apply(SignupEvent::AccountSubmitted(credentials))?;

        let request = match &self.state {
            SignupState::Submitting { company_id, draft } => AccountRequest {
                company_id: *company_id,
                email: draft.email.trim().to_string(),
                password: draft.password.clone(),
                name: draft.name.trim().to_string(),
                role: AccountRole::Admin,
            },
            other => {
                return Err(TransitionError::InvalidTransition {
                    state: other.name(),
                    event: "account_submitted",
                }
                .into());
            }
        };

        if let Err(e) = self.api.create_account(&request).await {
            tracing::warn!(company_id = %request.company_id, error = %e, "Account creation failed");
            return self.recover(SignupEvent::AccountFailed, e);
        }

        let cleared = self.stash.clear();
        if let Err(e) = &cleared {
            tracing::error!(error = %e, "Account created but signup state could not be cleared");
        }

        tracing::info!(company_id = %request.company_id, "Account created");
        self.apply(SignupEvent::AccountCreated)?;
        self.navigator.navigate(DASHBOARD_ROUTE)?;
        cleared.map_err(SignupError::from)
    }

    /// Drop the current attempt and start over
    pub fn abandon(&mut self) -> Result<()> {
        self.stash.clear()?;
        tracing::info!(state = self.state.name(), "Signup abandoned");
        self.apply(SignupEvent::Abandoned)
    }

    fn on_payment_verified(&mut self, company_id: CompanyId) -> Result<()> {
        let restored = match self.stash.company_id() {
            Ok(Some(stored)) if stored == company_id => self.stash.draft().unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Ignoring unreadable signup draft");
                None
            }),
            Ok(Some(stored)) => {
                tracing::warn!(
                    stored = %stored,
                    returned = %company_id,
                    "Persisted draft belongs to another company, not restoring"
                );
                None
            }
            Ok(None) => None,
            Err(e) => {
                tracing::warn!(error = %e, "Persisted company id unreadable");
                None
            }
        };

        if let Err(e) = self.stash.set_company_id(company_id) {
            tracing::warn!(error = %e, "Could not persist verified company id");
        }

        tracing::info!(company_id = %company_id, restored = restored.is_some(), "Payment verified");
        self.apply(SignupEvent::PaymentVerified { restored })
    }

    /// Step back out of an in-flight state and hand the error to the caller
    fn recover(&mut self, event: SignupEvent, err: SignupError) -> Result<()> {
        self.apply(event)?;
        Err(err)
    }

    fn apply(&mut self, event: SignupEvent) -> Result<()> {
        let event_name = event.name();
        let next = transition(&self.state, event)?;
        tracing::debug!(
            from = self.state.name(),
            to = next.name(),
            event = event_name,
            "Signup transition"
        );
        self.state = next;
        Ok(())
    }
}
