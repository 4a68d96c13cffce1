//! Build-time Configuration

use signup_client::ApiConfig;

/// Backend location, baked in at build time from `COMPCLEARED_API_URL`
pub fn api_config() -> ApiConfig {
    ApiConfig::from_value(option_env!("COMPCLEARED_API_URL"))
}
