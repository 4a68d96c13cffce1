//! Signup State Machine
//!
//! ```text
//!  PlanSelection ──submit──▶ CreatingCheckout ──created──▶ AwaitingPayment
//!       ▲   ▲                      │ failed                  (external page)
//!       │   └──────────────────────┘                               │ return
//!       │                                                          ▼
//!       │        VerificationFailed ◀──failed── PaymentVerification
//!       │                                                          │ verified
//!       │                                                          ▼
//!       │        Dashboard ◀──created── Submitting ◀──submit── AccountDetails
//!       │                                    │ failed                ▲
//!       └─abandon                            └───────────────────────┘
//! ```
//!
//! [`transition`] is pure: it performs no I/O, and every event that is not
//! valid in the current state is rejected with a [`TransitionError`].

use thiserror::Error;

use crate::api::CheckoutCreated;
use crate::draft::{AccountCredentials, CheckoutSessionId, CompanyId, SignupDraft, ValidationError};
use crate::tier::Tier;

/// Where the user is in the signup flow
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SignupState {
    /// Choosing a tier and entering company details
    PlanSelection { draft: SignupDraft },

    /// Checkout-session request in flight
    CreatingCheckout { draft: SignupDraft },

    /// Browser handed off to the hosted payment page
    AwaitingPayment {
        company_id: CompanyId,
        checkout_url: String,
    },

    /// Returned from the payment page; verification request in flight
    PaymentVerification {
        session_id: CheckoutSessionId,
        company_id: CompanyId,
    },

    /// Verification failed. Terminal for this page load.
    VerificationFailed { message: String },

    /// Payment verified; collecting account credentials
    AccountDetails {
        company_id: CompanyId,
        draft: SignupDraft,
    },

    /// Account-creation request in flight
    Submitting {
        company_id: CompanyId,
        draft: SignupDraft,
    },

    /// Account created; user sent to the dashboard
    Dashboard,
}

impl Default for SignupState {
    fn default() -> Self {
        Self::PlanSelection {
            draft: SignupDraft::default(),
        }
    }
}

impl SignupState {
    pub const fn name(&self) -> &'static str {
        match self {
            Self::PlanSelection { .. } => "plan_selection",
            Self::CreatingCheckout { .. } => "creating_checkout",
            Self::AwaitingPayment { .. } => "awaiting_payment",
            Self::PaymentVerification { .. } => "payment_verification",
            Self::VerificationFailed { .. } => "verification_failed",
            Self::AccountDetails { .. } => "account_details",
            Self::Submitting { .. } => "submitting",
            Self::Dashboard => "dashboard",
        }
    }

    /// A request is outstanding; the triggering control must stay disabled
    pub const fn is_busy(&self) -> bool {
        matches!(
            self,
            Self::CreatingCheckout { .. } | Self::PaymentVerification { .. } | Self::Submitting { .. }
        )
    }

    /// The draft being edited, if the current state holds one
    pub const fn draft(&self) -> Option<&SignupDraft> {
        match self {
            Self::PlanSelection { draft }
            | Self::CreatingCheckout { draft }
            | Self::AccountDetails { draft, .. }
            | Self::Submitting { draft, .. } => Some(draft),
            _ => None,
        }
    }
}

/// Inputs to the state machine
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SignupEvent {
    TierSelected(Tier),

    /// Draft recovered from the durable store on page load
    DraftRestored(SignupDraft),

    CompanySubmitted(SignupDraft),
    CheckoutCreated(CheckoutCreated),
    CheckoutFailed,

    PaymentReturned {
        session_id: CheckoutSessionId,
        company_id: CompanyId,
    },
    PaymentVerified { restored: Option<SignupDraft> },
    VerificationFailed { message: String },

    AccountSubmitted(AccountCredentials),
    AccountCreated,
    AccountFailed,

    Abandoned,
}

impl SignupEvent {
    pub const fn name(&self) -> &'static str {
        match self {
            Self::TierSelected(_) => "tier_selected",
            Self::DraftRestored(_) => "draft_restored",
            Self::CompanySubmitted(_) => "company_submitted",
            Self::CheckoutCreated(_) => "checkout_created",
            Self::CheckoutFailed => "checkout_failed",
            Self::PaymentReturned { .. } => "payment_returned",
            Self::PaymentVerified { .. } => "payment_verified",
            Self::VerificationFailed { .. } => "verification_failed",
            Self::AccountSubmitted(_) => "account_submitted",
            Self::AccountCreated => "account_created",
            Self::AccountFailed => "account_failed",
            Self::Abandoned => "abandoned",
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransitionError {
    #[error("Invalid transition: {event} in state {state}")]
    InvalidTransition {
        state: &'static str,
        event: &'static str,
    },

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Compute the next state. Never performs I/O.
pub fn transition(
    state: &SignupState,
    event: SignupEvent,
) -> Result<SignupState, TransitionError> {
    use SignupEvent as E;
    use SignupState as S;

    let next = match (state, event) {
        (S::PlanSelection { draft }, E::TierSelected(tier)) => S::PlanSelection {
            draft: SignupDraft {
                tier,
                ..draft.clone()
            },
        },

        (S::PlanSelection { .. }, E::DraftRestored(draft)) => S::PlanSelection { draft },

        (S::PlanSelection { .. }, E::CompanySubmitted(draft)) => {
            draft.validate_company()?;
            S::CreatingCheckout { draft }
        }

        (S::CreatingCheckout { .. }, E::CheckoutCreated(created)) => S::AwaitingPayment {
            company_id: created.company_id,
            checkout_url: created.checkout_url,
        },

        (S::CreatingCheckout { draft }, E::CheckoutFailed) => S::PlanSelection {
            draft: draft.clone(),
        },

        (
            S::PlanSelection { .. } | S::AwaitingPayment { .. },
            E::PaymentReturned {
                session_id,
                company_id,
            },
        ) => S::PaymentVerification {
            session_id,
            company_id,
        },

        (S::PaymentVerification { company_id, .. }, E::PaymentVerified { restored }) => {
            S::AccountDetails {
                company_id: *company_id,
                draft: restored.unwrap_or_default(),
            }
        }

        (S::PaymentVerification { .. }, E::VerificationFailed { message }) => {
            S::VerificationFailed { message }
        }

        (S::AccountDetails { company_id, draft }, E::AccountSubmitted(credentials)) => {
            credentials.validate()?;
            let mut draft = draft.clone();
            draft.apply_credentials(&credentials);
            S::Submitting {
                company_id: *company_id,
                draft,
            }
        }

        (S::Submitting { .. }, E::AccountCreated) => S::Dashboard,

        (S::Submitting { company_id, draft }, E::AccountFailed) => S::AccountDetails {
            company_id: *company_id,
            draft: draft.clone(),
        },

        (s, E::Abandoned) if !s.is_busy() => S::default(),

        (s, e) => {
            return Err(TransitionError::InvalidTransition {
                state: s.name(),
                event: e.name(),
            });
        }
    };

    Ok(next)
}
