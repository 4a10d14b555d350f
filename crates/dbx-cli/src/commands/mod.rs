//! Command implementations.

pub mod apps;
pub mod auth;
pub mod config;
pub mod permissions;
pub mod strip;

pub use apps::{list_apps, run_apps};
pub use auth::{authenticate, AccessToken};
pub use config::run_config;
pub use permissions::{fetch_permissions, run_permissions, write_permissions};
pub use strip::{rewrite_permissions, run_strip, AppOutcome, AppReport, RunSummary, StripOptions};

use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::config::Credentials;

/// API client for the workspace management API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Creates a new API client for the credentials' workspace.
    pub fn new(credentials: &Credentials, timeout: Option<Duration>) -> crate::CliResult<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            base_url: credentials.host().to_string(),
        })
    }

    /// Makes an authenticated GET request.
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        token: &AccessToken,
    ) -> crate::CliResult<T> {
        let url = self.url(path);
        tracing::debug!(method = "GET", %url, "sending request");
        let response = self
            .client
            .get(&url)
            .bearer_auth(token.secret())
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await?;
        handle_response(response).await
    }

    /// Makes an authenticated PUT request with a JSON body.
    pub async fn put<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        token: &AccessToken,
        body: &B,
    ) -> crate::CliResult<T> {
        let url = self.url(path);
        tracing::debug!(method = "PUT", %url, "sending request");
        let response = self
            .client
            .put(&url)
            .bearer_auth(token.secret())
            .json(body)
            .send()
            .await?;
        handle_response(response).await
    }

    /// Makes an unauthenticated form POST and returns status and raw body.
    pub async fn post_form<F: Serialize + ?Sized>(
        &self,
        path: &str,
        form: &F,
    ) -> crate::CliResult<(StatusCode, String)> {
        let url = self.url(path);
        tracing::debug!(method = "POST", %url, "sending request");
        let response = self.client.post(&url).form(form).send().await?;
        let status = response.status();
        let body = response.text().await?;
        tracing::debug!(%url, status = status.as_u16(), "received response");
        Ok((status, body))
    }

    /// Gets the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Handles a response with a JSON body.
///
/// Anything but 200 is an API error. A 200 body that is not JSON is a
/// decode error; JSON that does not fit `T` is a shape error. All three
/// keep the raw body for diagnostics.
async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> crate::CliResult<T> {
    let status = response.status();
    let url = response.url().to_string();
    let body = response.text().await?;
    tracing::debug!(%url, status = status.as_u16(), "received response");

    if status != StatusCode::OK {
        return Err(crate::CliError::Api {
            status: status.as_u16(),
            message: body,
        });
    }

    let json: Value = match serde_json::from_str(&body) {
        Ok(json) => json,
        Err(e) => {
            return Err(crate::CliError::Decode {
                status: status.as_u16(),
                reason: e.to_string(),
                body,
            })
        }
    };

    serde_json::from_value(json).map_err(|e| crate::CliError::Shape {
        status: status.as_u16(),
        reason: e.to_string(),
        body,
    })
}
