// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Matter Labs

//! Shadowserver API Client
//!
//! This crate provides a client for the Shadowserver reports API.
//! The API follows the documentation found at [Shadowserver API Documentation](https://www.shadowserver.org/what-we-do/network-reporting/api-documentation/).
//!
//! Every request body carries the API key and is signed with HMAC-SHA256
//! using the API secret; the signature travels in the `HMAC2` header.
//!
//! Create an [`ApiClient`] (async) or a [`blocking::ApiClient`] to interface with the API.
//!
//! Example
//! ```rust,no_run
//! use futures::TryStreamExt;
//! use shadowserver_api::{ApiClient, ApiCredentials, DateRange, ReportQuery, DEFAULT_API_URL};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), shadowserver_api::ShadowserverError> {
//!     let credentials = ApiCredentials::new(DEFAULT_API_URL, "my-key", "my-secret")?;
//!     let client = ApiClient::new(credentials)?;
//!
//!     let query = ReportQuery::new([("asn", "64496")])
//!         .with_date(DateRange::between("2024-05-01", "now")?);
//!
//!     let rows: Vec<_> = client.reports_query(query).try_collect().await?;
//!     println!("{} rows", rows.len());
//!
//!     Ok(())
//! }
//! ```

#![deny(missing_docs)]
#![deny(clippy::all)]

pub mod blocking;
mod client;
mod config;
mod error;
mod pagination;
mod requests;
pub mod signing;
mod types;

// Re-export public items
pub use client::ApiClient;
pub use self::config::{
    ApiCredentials, ClientConfig, DEFAULT_API_URL, DEFAULT_TIMEOUT_SECS, ENV_PREFIX,
};
pub use error::{RejectionKind, Result, ShadowserverError};
pub use requests::{
    ApiRequest, DeviceInfoRequest, KeyInfoRequest, PingRequest, ReportQuery,
    ReportsDownloadRequest, ReportsListRequest, ReportsSchemaRequest, ReportsStatsRequest,
    ReportsSubscribedRequest, ReportsTypesRequest, DEFAULT_QUERY_LIMIT,
};
pub use types::{DateRange, DeviceInfoKey, Endpoint, JsonObject, Sort};
