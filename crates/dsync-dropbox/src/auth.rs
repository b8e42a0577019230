//! Access-token resolution
//!
//! Tokens come from an explicit CLI flag first, then the
//! `DSYNC_ACCESS_TOKEN` environment variable. There is no OAuth flow;
//! users create a long-lived token in the Dropbox app console.

use thiserror::Error;

/// Environment variable consulted when no explicit token is given
pub const TOKEN_ENV_VAR: &str = "DSYNC_ACCESS_TOKEN";

/// Token acquisition failures
#[derive(Debug, Error)]
pub enum AuthError {
    /// Neither the flag nor the environment provided a token
    #[error(
        "Access token must be specified (pass --access-token or set {TOKEN_ENV_VAR}; \
         see https://www.dropbox.com/developers/apps)"
    )]
    MissingToken,
}

/// Resolves the access token from the flag or the environment
pub fn resolve_token(explicit: Option<String>) -> Result<String, AuthError> {
    if let Some(token) = explicit.filter(|t| !t.is_empty()) {
        return Ok(token);
    }
    match std::env::var(TOKEN_ENV_VAR) {
        Ok(token) if !token.is_empty() => Ok(token),
        _ => Err(AuthError::MissingToken),
    }
}
