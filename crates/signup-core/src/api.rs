//! Backend REST Boundary
//!
//! The signup flow talks to an external backend through this trait so the
//! controller can be driven by the HTTP client in production and by an
//! in-memory fake in tests.
//!
//! ```text
//! POST /api/create-checkout-session  {company_name, employee_count, tier}
//!      -> {success, company_id, checkout_url} | {success: false, error}
//! GET  /api/verify-session?session_id=&company_id=
//!      -> {success}
//! POST /api/signup  {company_id, email, password, name, role}
//!      -> {success} | {success: false, error}
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::draft::{CheckoutSessionId, CompanyId, CompanyInfo};
use crate::error::Result;

/// A created checkout session
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutCreated {
    /// Pending company record the payment is tied to
    pub company_id: CompanyId,

    /// Hosted payment page to send the browser to
    pub checkout_url: String,
}

/// Role granted to the account created at the end of signup
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountRole {
    #[default]
    Admin,
}

/// Body of `POST /api/signup`
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct AccountRequest {
    pub company_id: CompanyId,
    pub email: String,
    pub password: String,
    pub name: String,
    pub role: AccountRole,
}

impl std::fmt::Debug for AccountRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountRequest")
            .field("company_id", &self.company_id)
            .field("email", &self.email)
            .field("name", &self.name)
            .field("role", &self.role)
            .finish_non_exhaustive()
    }
}

/// Signup backend.
///
/// Errors follow the flow's taxonomy: `SignupError::Rejected` carries the
/// backend's `error` field verbatim, `SignupError::Network` covers transport
/// failures. Futures are not `Send`; the flow runs on a single-threaded
/// event loop (the browser's, in the web build).
#[async_trait(?Send)]
pub trait SignupApi {
    /// Create a checkout session and the pending company record behind it
    async fn create_checkout_session(
        &self,
        company: &CompanyInfo,
        idempotency_key: Uuid,
    ) -> Result<CheckoutCreated>;

    /// Ask whether the returned session has been paid
    async fn verify_session(
        &self,
        session_id: &CheckoutSessionId,
        company_id: CompanyId,
    ) -> Result<bool>;

    /// Create the administrator account for a verified company
    async fn create_account(&self, request: &AccountRequest) -> Result<()>;
}
