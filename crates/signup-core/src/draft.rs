//! Signup Draft and Identifiers
//!
//! The form data collected across both signup steps, the identifiers the
//! backend hands out, and the client-side validation rules.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::tier::Tier;

/// Minimum password length accepted at account creation
pub const MIN_PASSWORD_LEN: usize = 8;

/// Client-side validation failures. Raised before any request is sent.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Company name is required")]
    MissingCompanyName,

    #[error("Number of employees must be a positive whole number")]
    InvalidEmployeeCount,

    #[error("Unknown plan: {0}")]
    UnknownTier(String),

    #[error("Full name is required")]
    MissingName,

    #[error("A valid email address is required")]
    InvalidEmail,

    #[error("Password must be at least {} characters", MIN_PASSWORD_LEN)]
    PasswordTooShort,
}

/// Company handle issued by checkout-session creation
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompanyId(i64);

impl CompanyId {
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    pub const fn get(self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for CompanyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for CompanyId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

/// Payment provider checkout session identifier (`cs_...`)
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CheckoutSessionId(String);

impl CheckoutSessionId {
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CheckoutSessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Everything the user has typed so far.
///
/// The password is never serialized, so persisting a draft across the
/// payment redirect cannot leak it into browser storage.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignupDraft {
    pub company_name: String,
    pub employee_count: i64,
    pub tier: Tier,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password: String,
    pub name: String,
}

impl std::fmt::Debug for SignupDraft {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignupDraft")
            .field("company_name", &self.company_name)
            .field("employee_count", &self.employee_count)
            .field("tier", &self.tier)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("name", &self.name)
            .finish()
    }
}

impl SignupDraft {
    /// Check the company step fields
    pub fn validate_company(&self) -> Result<(), ValidationError> {
        if self.company_name.trim().is_empty() {
            return Err(ValidationError::MissingCompanyName);
        }
        if self.employee_count <= 0 {
            return Err(ValidationError::InvalidEmployeeCount);
        }
        Ok(())
    }

    /// Company fields as sent to checkout-session creation
    pub fn company(&self) -> CompanyInfo {
        CompanyInfo {
            company_name: self.company_name.trim().to_string(),
            employee_count: self.employee_count,
            tier: self.tier,
        }
    }

    /// Copy the account step fields into the draft
    pub fn apply_credentials(&mut self, credentials: &AccountCredentials) {
        self.name.clone_from(&credentials.name);
        self.email.clone_from(&credentials.email);
        self.password.clone_from(&credentials.password);
    }
}

/// Parse the raw employee-count form field
pub fn parse_employee_count(raw: &str) -> Result<i64, ValidationError> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| ValidationError::InvalidEmployeeCount)
}

/// Company step payload
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyInfo {
    pub company_name: String,
    pub employee_count: i64,
    pub tier: Tier,
}

/// Account step form fields
#[derive(Clone, Default, PartialEq, Eq)]
pub struct AccountCredentials {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for AccountCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountCredentials")
            .field("name", &self.name)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

impl AccountCredentials {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::MissingName);
        }
        let email = self.email.trim();
        if email.is_empty() || !email.contains('@') {
            return Err(ValidationError::InvalidEmail);
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(ValidationError::PasswordTooShort);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn company(name: &str, count: i64) -> SignupDraft {
        SignupDraft {
            company_name: name.into(),
            employee_count: count,
            ..Default::default()
        }
    }

    #[test]
    fn test_company_validation() {
        assert!(company("Acme Inc", 75).validate_company().is_ok());
        assert_eq!(
            company("   ", 75).validate_company(),
            Err(ValidationError::MissingCompanyName)
        );
        assert_eq!(
            company("Acme Inc", 0).validate_company(),
            Err(ValidationError::InvalidEmployeeCount)
        );
        assert_eq!(
            company("Acme Inc", -3).validate_company(),
            Err(ValidationError::InvalidEmployeeCount)
        );
    }

    #[test]
    fn test_employee_count_parsing() {
        assert_eq!(parse_employee_count(" 75 "), Ok(75));
        assert_eq!(
            parse_employee_count("seventy"),
            Err(ValidationError::InvalidEmployeeCount)
        );
        assert_eq!(
            parse_employee_count(""),
            Err(ValidationError::InvalidEmployeeCount)
        );
    }

    #[test]
    fn test_credentials_validation() {
        let mut creds = AccountCredentials {
            name: "Ada".into(),
            email: "a@acme.com".into(),
            password: "1234567".into(),
        };
        assert_eq!(creds.validate(), Err(ValidationError::PasswordTooShort));

        creds.password = "12345678".into();
        assert!(creds.validate().is_ok());

        creds.email = "not-an-email".into();
        assert_eq!(creds.validate(), Err(ValidationError::InvalidEmail));
    }

    #[test]
    fn test_password_never_serialized() {
        let draft = SignupDraft {
            company_name: "Acme Inc".into(),
            password: "hunter22hunter".into(),
            ..Default::default()
        };
        let json = serde_json::to_string(&draft).unwrap();
        assert!(!json.contains("hunter22hunter"));
        assert!(!format!("{draft:?}").contains("hunter22hunter"));

        let restored: SignupDraft = serde_json::from_str(&json).unwrap();
        assert!(restored.password.is_empty());
        assert_eq!(restored.company_name, "Acme Inc");
    }
}
