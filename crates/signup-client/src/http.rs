//! HTTP Signup Backend
//!
//! Implementation of `SignupApi` over the backend's JSON REST endpoints.

use async_trait::async_trait;
use reqwest::Response;
use serde::Deserialize;
use uuid::Uuid;

use signup_core::{
    AccountRequest, CheckoutCreated, CheckoutSessionId, CompanyId, CompanyInfo, Result, SignupApi,
    SignupError,
};

/// Backend base URL when nothing is configured
pub const DEFAULT_API_URL: &str = "http://localhost:5000";

/// Environment variable holding the backend base URL
pub const API_URL_ENV: &str = "COMPCLEARED_API_URL";

const CHECKOUT_FALLBACK: &str = "Failed to create checkout session";
const SIGNUP_FALLBACK: &str = "Failed to create account";
const VERIFY_FALLBACK: &str = "Failed to verify checkout session";

/// Backend client configuration
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiConfig {
    /// Base URL, e.g. `https://api.compcleared.com`
    pub base_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.into(),
        }
    }
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    /// Read `COMPCLEARED_API_URL`, falling back to localhost
    pub fn from_env() -> Self {
        Self::from_value(std::env::var(API_URL_ENV).ok().as_deref())
    }

    /// Build from an optional configured URL. Unset or blank means localhost.
    pub fn from_value(base_url: Option<&str>) -> Self {
        base_url
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .map_or_else(Self::default, Self::new)
    }

    /// Absolute URL for an API path
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

/// `{success, error?, company_id?, checkout_url?}`
#[derive(Debug, Default, Deserialize)]
struct Envelope {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    company_id: Option<CompanyId>,
    #[serde(default)]
    checkout_url: Option<String>,
}

impl Envelope {
    /// Turn a `success: false` body into the backend's message, verbatim
    fn into_result(self, fallback: &str) -> Result<Self> {
        if self.success {
            return Ok(self);
        }
        let message = self
            .error
            .filter(|e| !e.trim().is_empty())
            .unwrap_or_else(|| fallback.to_string());
        Err(SignupError::Rejected(message))
    }
}

/// Signup backend over HTTP
pub struct HttpSignupApi {
    client: reqwest::Client,
    config: ApiConfig,
}

impl HttpSignupApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::from_config(ApiConfig::new(base_url))
    }

    pub fn from_config(config: ApiConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    pub const fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Read the JSON envelope regardless of HTTP status.
    ///
    /// An unreadable body on an error status is a rejection with the
    /// fallback message; on a success status it counts as a transport
    /// failure since the request's outcome is unknown.
    async fn read_envelope(response: Response, fallback: &str) -> Result<Envelope> {
        let status = response.status();
        match response.json::<Envelope>().await {
            Ok(envelope) => Ok(envelope),
            Err(e) if status.is_success() => Err(SignupError::Network(format!(
                "unreadable {status} response: {e}"
            ))),
            Err(e) => {
                tracing::debug!(status = %status, error = %e, "Non-JSON error response");
                Err(SignupError::Rejected(fallback.to_string()))
            }
        }
    }
}

fn transport(err: &reqwest::Error) -> SignupError {
    SignupError::Network(err.to_string())
}

#[async_trait(?Send)]
impl SignupApi for HttpSignupApi {
    async fn create_checkout_session(
        &self,
        company: &CompanyInfo,
        idempotency_key: Uuid,
    ) -> Result<CheckoutCreated> {
        let url = self.config.endpoint("/api/create-checkout-session");
        tracing::debug!(url = %url, idempotency_key = %idempotency_key, "Creating checkout session");

        let response = self
            .client
            .post(&url)
            .header("Idempotency-Key", idempotency_key.to_string())
            .json(company)
            .send()
            .await
            .map_err(|e| transport(&e))?;

        let envelope = Self::read_envelope(response, CHECKOUT_FALLBACK)
            .await?
            .into_result(CHECKOUT_FALLBACK)?;

        match (envelope.company_id, envelope.checkout_url) {
            (Some(company_id), Some(checkout_url)) if !checkout_url.is_empty() => {
                Ok(CheckoutCreated {
                    company_id,
                    checkout_url,
                })
            }
            _ => {
                tracing::warn!("Checkout response missing company_id or checkout_url");
                Err(SignupError::Rejected(CHECKOUT_FALLBACK.into()))
            }
        }
    }

    async fn verify_session(
        &self,
        session_id: &CheckoutSessionId,
        company_id: CompanyId,
    ) -> Result<bool> {
        let url = self.config.endpoint("/api/verify-session");
        let company = company_id.to_string();

        let response = self
            .client
            .get(&url)
            .query(&[("session_id", session_id.as_str()), ("company_id", company.as_str())])
            .send()
            .await
            .map_err(|e| transport(&e))?;

        let status = response.status();
        let envelope = Self::read_envelope(response, VERIFY_FALLBACK).await?;
        if !envelope.success {
            tracing::warn!(
                status = %status,
                error = envelope.error.as_deref().unwrap_or(""),
                "Checkout session not verified"
            );
        }
        Ok(envelope.success)
    }

    async fn create_account(&self, request: &AccountRequest) -> Result<()> {
        let url = self.config.endpoint("/api/signup");

        let builder = self.client.post(&url).json(request);
        // Session cookie is set on this response; the browser must keep it.
        #[cfg(target_arch = "wasm32")]
        let builder = builder.fetch_credentials_include();

        let response = builder.send().await.map_err(|e| transport(&e))?;

        Self::read_envelope(response, SIGNUP_FALLBACK)
            .await?
            .into_result(SIGNUP_FALLBACK)?;
        Ok(())
    }
}
