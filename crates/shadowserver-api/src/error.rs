// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Matter Labs

use reqwest::StatusCode;
use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// Marker text the server puts into a rejection when the caller's query
/// matched none of the report filters configured for the account.
const NO_SUPPORTED_REPORT_FILTER: &str = "No supported report filters found";

/// Refines why the server rejected a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectionKind {
    /// Any rejection without a more specific classification.
    Generic,
    /// The query did not match any report filter configured for the account.
    NoSupportedReportFilter,
}

impl fmt::Display for RejectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectionKind::Generic => write!(f, "rejected"),
            RejectionKind::NoSupportedReportFilter => write!(f, "no supported report filter"),
        }
    }
}

/// Represents all possible errors that can occur when talking to the Shadowserver API.
#[derive(Error, Debug)]
pub enum ShadowserverError {
    /// A caller supplied value failed local validation. No request was sent.
    #[error("Invalid parameter value: {0}")]
    InvalidParameter(String),

    /// The server answered with JSON of a different shape than the endpoint promises.
    #[error("Unexpected response shape from '{endpoint}': expected {expected}")]
    UnexpectedShape {
        /// The endpoint which returned the value.
        endpoint: &'static str,
        /// Human readable description of the expected shape.
        expected: &'static str,
    },

    /// The server rejected the request with a non-200 status.
    #[error("Invalid request ({kind}): {message}")]
    InvalidRequest {
        /// Refinement of the rejection.
        kind: RejectionKind,
        /// The server provided reason, or the raw response text.
        message: String,
    },

    /// The server answered 200 with a body which is not JSON.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Wraps an underlying reqwest error, including timeouts.
    #[error("Reqwest error: {0}")]
    Http(#[from] reqwest::Error),

    /// Wraps a Serde JSON error.
    #[error("Serde JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Wraps a URL parsing error.
    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),

    /// Wraps a configuration loading error.
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

impl ShadowserverError {
    /// True for every server rejection, including the [`RejectionKind::NoSupportedReportFilter`] refinement.
    pub fn is_invalid_request(&self) -> bool {
        matches!(self, ShadowserverError::InvalidRequest { .. })
    }

    /// True only if the server reported that no report filter matched the query.
    pub fn is_no_supported_report_filter(&self) -> bool {
        matches!(
            self,
            ShadowserverError::InvalidRequest {
                kind: RejectionKind::NoSupportedReportFilter,
                ..
            }
        )
    }

    pub(crate) fn shape(endpoint: &'static str, expected: &'static str) -> Self {
        ShadowserverError::UnexpectedShape { endpoint, expected }
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ShadowserverError>;

/// Turns a status and the response text into the decoded JSON value or the matching error.
pub(crate) fn check_response(status: StatusCode, text: String) -> Result<Value> {
    if status != StatusCode::OK {
        return Err(rejection(text));
    }

    serde_json::from_str(&text).map_err(|_| ShadowserverError::InvalidResponse(text))
}

fn rejection(text: String) -> ShadowserverError {
    let reason = serde_json::from_str::<Value>(&text)
        .ok()
        .and_then(|value| value.get("error").cloned());

    if let Some(reason) = reason {
        let message = match reason {
            Value::String(s) => s,
            other => other.to_string(),
        };
        return ShadowserverError::InvalidRequest {
            kind: RejectionKind::Generic,
            message,
        };
    }

    let kind = if text.contains(NO_SUPPORTED_REPORT_FILTER) {
        RejectionKind::NoSupportedReportFilter
    } else {
        RejectionKind::Generic
    };

    ShadowserverError::InvalidRequest {
        kind,
        message: text,
    }
}
