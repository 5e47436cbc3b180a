//! Client config loaded from environment variables.
//!
//! # Environment variables
//!
//! - `PRODUCT_API_URL`          = service base URL (mandatory)
//! - `PRODUCT_API_TIMEOUT_SECS` = optional request timeout (u64, seconds)
//! - `PRODUCT_API_USER_AGENT`   = optional user agent override

use crate::{
    config::client_config::{ClientConfig, DEFAULT_USER_AGENT},
    error_handler::{Result, env_opt, env_opt_u64, must_env, validate_http_endpoint},
};

/// Env variable holding the service base URL.
pub const API_URL_VAR: &str = "PRODUCT_API_URL";

/// Resolves the full client config strictly from environment.
///
/// # Errors
///
/// - [`ConfigError::MissingVar`](crate::error_handler::ConfigError::MissingVar)
///   if `PRODUCT_API_URL` is missing
/// - [`ConfigError::InvalidFormat`](crate::error_handler::ConfigError::InvalidFormat)
///   if it is not an http(s) URL
/// - [`ConfigError::InvalidNumber`](crate::error_handler::ConfigError::InvalidNumber)
///   if `PRODUCT_API_TIMEOUT_SECS` is not a number
pub fn config_from_env() -> Result<ClientConfig> {
    let base_url = must_env(API_URL_VAR)?;
    config_with_base(base_url)
}

/// Same as [`config_from_env`] but with an explicit base URL, e.g. from a
/// command-line flag. The remaining knobs still come from the environment.
pub fn config_with_base(base_url: impl Into<String>) -> Result<ClientConfig> {
    let base_url = base_url.into();
    validate_http_endpoint(API_URL_VAR, &base_url)?;

    let timeout_secs = env_opt_u64("PRODUCT_API_TIMEOUT_SECS")?;
    let user_agent =
        env_opt("PRODUCT_API_USER_AGENT").unwrap_or_else(|| DEFAULT_USER_AGENT.to_string());

    Ok(ClientConfig {
        base_url: base_url.trim().to_string(),
        timeout_secs,
        user_agent,
    })
}
