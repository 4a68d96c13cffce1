//! # signup-client
//!
//! `reqwest` implementation of the signup backend boundary. Builds for
//! native targets and for `wasm32-unknown-unknown`, where requests go
//! through the browser's `fetch`.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use signup_client::{ApiConfig, HttpSignupApi};
//! use signup_core::{MemoryStore, SignupController};
//!
//! let api = HttpSignupApi::from_config(ApiConfig::from_env()); // COMPCLEARED_API_URL
//! let mut flow = SignupController::new(api, MemoryStore::new(), navigator);
//! ```

pub mod http;

pub use http::{API_URL_ENV, ApiConfig, DEFAULT_API_URL, HttpSignupApi};
