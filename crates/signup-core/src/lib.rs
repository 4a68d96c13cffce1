//! # signup-core
//!
//! Signup and checkout flow for CompCleared: plan selection, hand-off to a
//! hosted payment page, payment verification on return, and account
//! creation.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                     SignupController                         │
//! │  ┌──────────────┐  ┌──────────────┐  ┌────────────────────┐  │
//! │  │  transition  │  │ SignupStash  │  │ SignupApi          │  │
//! │  │  (pure FSM)  │──│ DurableStore │──│ Navigator          │  │
//! │  └──────────────┘  └──────────────┘  └────────────────────┘  │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! The controller owns no globals: the backend, the store that survives the
//! payment redirect, and page navigation are all injected, so the whole
//! flow runs under `#[tokio::test]` with in-memory fakes.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use signup_core::{MemoryStore, SignupController, Tier};
//!
//! let mut flow = SignupController::new(api, MemoryStore::new(), navigator);
//! flow.resume(&location_search).await?;
//! flow.select_tier(Tier::Professional)?;
//! flow.submit_company_info(draft).await?; // navigates to the payment page
//! ```

pub mod api;
pub mod controller;
pub mod draft;
pub mod error;
pub mod flow;
pub mod navigation;
pub mod store;
pub mod tier;

#[cfg(test)]
mod testing;

pub use api::{AccountRequest, AccountRole, CheckoutCreated, SignupApi};
pub use controller::SignupController;
pub use draft::{
    AccountCredentials, CheckoutSessionId, CompanyId, CompanyInfo, SignupDraft, ValidationError,
    parse_employee_count,
};
pub use error::{Result, SignupError, StoreError};
pub use flow::{SignupEvent, SignupState, TransitionError, transition};
pub use navigation::{DASHBOARD_ROUTE, Navigator, PaymentReturn, SIGNUP_ROUTE};
pub use store::{DurableStore, MemoryStore, SignupAttempt, SignupStash};
pub use tier::{Tier, TierPricing};
