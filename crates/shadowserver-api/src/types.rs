// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Matter Labs

use crate::error::ShadowserverError;
use regex::Regex;
use std::{fmt, str::FromStr, sync::OnceLock};

/// A JSON object as returned by the API.
pub type JsonObject = serde_json::Map<String, serde_json::Value>;

static DATE_RE: OnceLock<Regex> = OnceLock::new();

fn is_valid_date(value: &str) -> bool {
    DATE_RE
        .get_or_init(|| Regex::new(r"^(\d{4}-\d{2}-\d{2}|now)$").unwrap())
        .is_match(value)
}

/// The remote procedures offered by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    /// `test/ping`
    Ping,
    /// `key/info`
    KeyInfo,
    /// `reports/subscribed`
    ReportsSubscribed,
    /// `reports/types`
    ReportsTypes,
    /// `reports/list`
    ReportsList,
    /// `reports/download`
    ReportsDownload,
    /// `reports/query`
    ReportsQuery,
    /// `reports/stats`
    ReportsStats,
    /// `reports/device-info`
    ReportsDeviceInfo,
    /// `reports/schema`
    ReportsSchema,
}

impl Endpoint {
    /// Returns the path segment appended to the base URL.
    pub fn path(&self) -> &'static str {
        match self {
            Endpoint::Ping => "test/ping",
            Endpoint::KeyInfo => "key/info",
            Endpoint::ReportsSubscribed => "reports/subscribed",
            Endpoint::ReportsTypes => "reports/types",
            Endpoint::ReportsList => "reports/list",
            Endpoint::ReportsDownload => "reports/download",
            Endpoint::ReportsQuery => "reports/query",
            Endpoint::ReportsStats => "reports/stats",
            Endpoint::ReportsDeviceInfo => "reports/device-info",
            Endpoint::ReportsSchema => "reports/schema",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Sort order of a reports query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Sort {
    /// Oldest first.
    #[default]
    Ascending,
    /// Newest first.
    Descending,
}

impl fmt::Display for Sort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sort::Ascending => write!(f, "ascending"),
            Sort::Descending => write!(f, "descending"),
        }
    }
}

impl FromStr for Sort {
    type Err = ShadowserverError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ascending" => Ok(Sort::Ascending),
            "descending" => Ok(Sort::Descending),
            _ => Err(ShadowserverError::InvalidParameter(format!(
                "sort must be one of: \"ascending\", \"descending\", got {s:?}"
            ))),
        }
    }
}

/// A validated date range.
///
/// Each bound is either a `YYYY-MM-DD` date or the token `now`. The range is
/// sent as `start` alone or as `start:end`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateRange {
    start: String,
    end: Option<String>,
}

impl DateRange {
    /// Creates a range, validating both bounds.
    ///
    /// # Errors
    ///
    /// Returns [`ShadowserverError::InvalidParameter`] if a bound is neither
    /// a `YYYY-MM-DD` date nor `now`.
    pub fn new(start: impl Into<String>, end: Option<String>) -> Result<Self, ShadowserverError> {
        let start = start.into();
        if !is_valid_date(&start) {
            return Err(ShadowserverError::InvalidParameter(format!(
                "invalid start date {start:?}, expected YYYY-MM-DD or \"now\""
            )));
        }
        if let Some(end) = &end {
            if !is_valid_date(end) {
                return Err(ShadowserverError::InvalidParameter(format!(
                    "invalid end date {end:?}, expected YYYY-MM-DD or \"now\""
                )));
            }
        }
        Ok(Self { start, end })
    }

    /// A range starting at `start` without an explicit end.
    pub fn since(start: impl Into<String>) -> Result<Self, ShadowserverError> {
        Self::new(start, None)
    }

    /// A range from `start` to `end`.
    pub fn between(
        start: impl Into<String>,
        end: impl Into<String>,
    ) -> Result<Self, ShadowserverError> {
        Self::new(start, Some(end.into()))
    }

    /// The start bound.
    pub fn start(&self) -> &str {
        &self.start
    }

    /// The end bound, if any.
    pub fn end(&self) -> Option<&str> {
        self.end.as_deref()
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.end {
            Some(end) => write!(f, "{}:{}", self.start, end),
            None => f.write_str(&self.start),
        }
    }
}

impl FromStr for DateRange {
    type Err = ShadowserverError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once(':') {
            Some((start, end)) => Self::between(start, end),
            None => Self::since(s),
        }
    }
}

/// The criteria a device-info query may be keyed by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DeviceInfoKey {
    /// IP address.
    Ip,
    /// Autonomous system number.
    Asn,
    /// Country code.
    Geo,
}

impl fmt::Display for DeviceInfoKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceInfoKey::Ip => write!(f, "ip"),
            DeviceInfoKey::Asn => write!(f, "asn"),
            DeviceInfoKey::Geo => write!(f, "geo"),
        }
    }
}

impl FromStr for DeviceInfoKey {
    type Err = ShadowserverError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ip" => Ok(DeviceInfoKey::Ip),
            "asn" => Ok(DeviceInfoKey::Asn),
            "geo" => Ok(DeviceInfoKey::Geo),
            _ => Err(ShadowserverError::InvalidParameter(format!(
                "query parameter may only contain the keys \"ip\", \"asn\", \"geo\", got {s:?}"
            ))),
        }
    }
}
