// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Matter Labs

//! Blocking client
//!
//! The same operations as [`crate::ApiClient`], performed with blocking I/O.
//! Must not be used from within an async runtime.

mod query;

pub use query::ReportRows;

use crate::{
    config::{ApiCredentials, ClientConfig, DEFAULT_TIMEOUT_SECS},
    error::{check_response, Result},
    pagination::Pager,
    requests::{
        ApiRequest, DeviceInfoRequest, KeyInfoRequest, PingRequest, ReportQuery,
        ReportsDownloadRequest, ReportsListRequest, ReportsSchemaRequest, ReportsStatsRequest,
        ReportsSubscribedRequest, ReportsTypesRequest,
    },
    signing::{SignedBody, SIGNATURE_HEADER},
    types::JsonObject,
};
use reqwest::{blocking::Client, header::CONTENT_TYPE};
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, trace};

/// Blocking client for the Shadowserver API.
///
/// # Examples
///
/// ```rust,no_run
/// use shadowserver_api::{blocking::ApiClient, ApiCredentials, ReportQuery, DEFAULT_API_URL};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let credentials = ApiCredentials::new(DEFAULT_API_URL, "my-key", "my-secret")?;
/// let client = ApiClient::new(credentials)?;
///
/// for row in client.reports_query(ReportQuery::new([("asn", "64496")])) {
///     println!("{:?}", row?);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    credentials: ApiCredentials,
}

impl ApiClient {
    /// Creates a new client with the default timeout of 45 seconds.
    pub fn new(credentials: ApiCredentials) -> Result<Self> {
        Self::new_with_timeout(credentials, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Creates a new client applying `timeout` to every request.
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
    /// See [`crate::ApiClient::call`] for the error cases.
    pub fn call<P: Serialize + ?Sized>(&self, endpoint: &str, payload: &P) -> Result<Value> {
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
            .send()?;

        let status = response.status();
        let text = response.text()?;
        debug!(endpoint, %status, "received response");

        check_response(status, text)
    }

    /// Sends a typed request and validates the shape of the answer.
    pub fn send<R: ApiRequest>(&self, request: &R) -> Result<R::Output> {
        let value = self.call(R::ENDPOINT.path(), request)?;
        R::parse_response(value)
    }

    /// `test/ping`: checks the connection to the API server.
    pub fn ping(&self) -> Result<JsonObject> {
        self.send(&PingRequest {})
    }

    /// `key/info`: returns details about the API key.
    pub fn key_info(&self) -> Result<JsonObject> {
        self.send(&KeyInfoRequest {})
    }

    /// `reports/subscribed`: names of the reports the account is subscribed to.
    pub fn reports_subscribed(&self) -> Result<Vec<String>> {
        self.send(&ReportsSubscribedRequest {})
    }

    /// `reports/types`: all report types available to the subscriber.
    pub fn reports_types(&self) -> Result<Vec<String>> {
        self.send(&ReportsTypesRequest {})
    }

    /// `reports/list`: reports which could be downloaded.
    pub fn reports_list(&self, request: &ReportsListRequest) -> Result<Vec<JsonObject>> {
        self.send(request)
    }

    /// `reports/download`: the rows of a single report.
    pub fn reports_download(&self, request: &ReportsDownloadRequest) -> Result<Vec<JsonObject>> {
        self.send(request)
    }

    /// `reports/query`: lazily iterates the rows matching `query`.
    ///
    /// No request is sent before the first call to [`Iterator::next`].
    pub fn reports_query(&self, query: ReportQuery) -> ReportRows<'_> {
        ReportRows::new(self, Pager::new(query))
    }

    /// `reports/stats`: aggregate statistics as tuple-like rows.
    pub fn reports_stats(&self, request: &ReportsStatsRequest) -> Result<Vec<Value>> {
        self.send(request)
    }

    /// `reports/device-info`: device details for an IP, ASN or country.
    ///
    /// Only the keys `ip`, `asn` and `geo` are accepted, anything else fails
    /// before a request is sent.
    pub fn reports_device_info<K, V>(
        &self,
        query: impl IntoIterator<Item = (K, V)>,
    ) -> Result<JsonObject>
    where
        K: AsRef<str>,
        V: Into<String>,
    {
        let request = DeviceInfoRequest::new(query)?;
        self.send(&request)
    }

    /// `reports/schema`: the schema of a report type.
    pub fn reports_schema(&self, report_type: &str) -> Result<JsonObject> {
        self.send(&ReportsSchemaRequest {
            report_type: report_type.into(),
        })
    }
}
