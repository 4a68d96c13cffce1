//! Page Navigation
//!
//! Full-page navigations and the payment provider's return-trip contract.

use std::rc::Rc;

use crate::draft::{CheckoutSessionId, CompanyId};
use crate::error::Result;

/// Route the payment provider redirects back to
pub const SIGNUP_ROUTE: &str = "/signup";

/// Route reached after the account is created
pub const DASHBOARD_ROUTE: &str = "/dashboard";

/// Performs full-page navigations (leaving the current document)
pub trait Navigator {
    fn navigate(&self, url: &str) -> Result<()>;
}

impl<T: Navigator + ?Sized> Navigator for Rc<T> {
    fn navigate(&self, url: &str) -> Result<()> {
        (**self).navigate(url)
    }
}

/// Query parameters the payment provider appends on return
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PaymentReturn {
    pub session_id: CheckoutSessionId,
    pub company_id: CompanyId,
}

impl PaymentReturn {
    /// Extract `session_id` and `company_id` from a query string (with or
    /// without the leading `?`). Both must be present and non-empty.
    pub fn from_query(query: &str) -> Option<Self> {
        let query = query.strip_prefix('?').unwrap_or(query);

        let mut session_id = None;
        let mut company_id = None;
        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            match key.as_ref() {
                "session_id" if !value.is_empty() => session_id = Some(value.into_owned()),
                "company_id" if !value.is_empty() => company_id = Some(value.into_owned()),
                _ => {}
            }
        }

        let (session_id, raw_company) = (session_id?, company_id?);
        match raw_company.parse::<CompanyId>() {
            Ok(company_id) => Some(Self {
                session_id: CheckoutSessionId::from_string(session_id),
                company_id,
            }),
            Err(e) => {
                tracing::warn!(company_id = %raw_company, error = %e, "Ignoring malformed return parameters");
                None
            }
        }
    }
}
