//! OAuth client-credentials authentication.

use std::fmt;

use serde_json::Value;

use crate::config::Credentials;

use super::ApiClient;

/// Token endpoint path.
pub const TOKEN_PATH: &str = "/oidc/v1/token";

/// Scope requested for the token; grants access to every API.
pub const TOKEN_SCOPE: &str = "all-apis";

/// Bearer token valid for the current run only.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    /// Wraps a raw token.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Raw token value for the `Authorization` header.
    #[must_use]
    pub fn secret(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(****)")
    }
}

/// Exchanges client credentials for an access token.
///
/// The status code is not checked: whatever the endpoint answers, the
/// body must be JSON carrying a string `access_token`, otherwise the run
/// cannot proceed.
pub async fn authenticate(
    client: &ApiClient,
    credentials: &Credentials,
) -> crate::CliResult<AccessToken> {
    let form = [
        ("grant_type", "client_credentials"),
        ("client_id", credentials.client_id()),
        ("client_secret", credentials.client_secret()),
        ("scope", TOKEN_SCOPE),
    ];

    let (status, body) = client.post_form(TOKEN_PATH, &form).await?;

    let token = serde_json::from_str::<Value>(&body)
        .ok()
        .and_then(|json| json.get("access_token").and_then(Value::as_str).map(str::to_string))
        .ok_or_else(|| {
            crate::CliError::Auth(format!(
                "token response has no access_token (status {}): {body}",
                status.as_u16()
            ))
        })?;

    tracing::debug!(client_id = credentials.client_id(), "obtained access token");
    Ok(AccessToken::new(token))
}
