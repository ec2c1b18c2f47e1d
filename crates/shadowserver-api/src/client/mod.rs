// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Matter Labs

mod reports;

use crate::{
    config::{ApiCredentials, ClientConfig, DEFAULT_TIMEOUT_SECS},
    error::{check_response, Result},
    requests::{ApiRequest, KeyInfoRequest, PingRequest},
    signing::{SignedBody, SIGNATURE_HEADER},
    types::JsonObject,
};
use reqwest::{header::CONTENT_TYPE, Client};
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, trace};

/// Asynchronous client for the Shadowserver API.
///
/// Every call sends exactly one signed POST request. Nothing is retried or
/// cached, failures are returned to the caller as they happen.
///
/// # Examples
///
/// ```rust,no_run
/// use shadowserver_api::{ApiClient, ApiCredentials, DEFAULT_API_URL};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let credentials = ApiCredentials::new(DEFAULT_API_URL, "my-key", "my-secret")?;
///     let client = ApiClient::new(credentials)?;
///
///     let pong = client.ping().await?;
///     println!("{pong:?}");
///
///     Ok(())
/// }
/// ```
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    credentials: ApiCredentials,
}

impl ApiClient {
    /// Creates a new client with the default timeout of 45 seconds.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(credentials: ApiCredentials) -> Result<Self> {
        Self::new_with_timeout(credentials, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Creates a new client applying `timeout` to every request.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new_with_timeout(credentials: ApiCredentials, timeout: Duration) -> Result<Self> {
        Ok(ApiClient {
            client: Client::builder()
                .min_tls_version(reqwest::tls::Version::TLS_1_2)
                .timeout(timeout)
                .build()?,
            credentials,
        })
    }

    /// Creates a new client from a loaded [`ClientConfig`].
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        Self::new_with_timeout(config.credentials()?, config.timeout())
    }

    /// The credentials used to sign requests.
    pub fn credentials(&self) -> &ApiCredentials {
        &self.credentials
    }

    /// Calls `endpoint` with `payload` and returns the decoded JSON as is.
    ///
    /// The API key is added to `payload` as `apikey`, which must therefore
    /// serialize as a JSON object.
    ///
    /// # Errors
    ///
    /// * [`InvalidRequest`](crate::ShadowserverError::InvalidRequest) if the server answers with a non-200 status
    /// * [`InvalidResponse`](crate::ShadowserverError::InvalidResponse) if a 200 answer is not JSON
    /// * [`Http`](crate::ShadowserverError::Http) on transport failures and timeouts
    pub async fn call<P: Serialize + ?Sized>(&self, endpoint: &str, payload: &P) -> Result<Value> {
        let url = self.credentials.endpoint_url(endpoint)?;
        debug!(%url, "calling endpoint");
        trace!(payload = %serde_json::to_string(payload)?, "request payload");

        let body = SignedBody::new(
            payload,
            self.credentials.api_key(),
            self.credentials.secret(),
        )?;

        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .header(SIGNATURE_HEADER, body.signature)
            .body(body.bytes)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        debug!(endpoint, %status, "received response");

        check_response(status, text)
    }

    /// Sends a typed request and validates the shape of the answer.
    pub async fn send<R: ApiRequest>(&self, request: &R) -> Result<R::Output> {
        let value = self.call(R::ENDPOINT.path(), request).await?;
        R::parse_response(value)
    }

    /// `test/ping`: checks the connection to the API server.
    pub async fn ping(&self) -> Result<JsonObject> {
        self.send(&PingRequest {}).await
    }

    /// `key/info`: returns details about the API key.
    pub async fn key_info(&self) -> Result<JsonObject> {
        self.send(&KeyInfoRequest {}).await
    }
}
