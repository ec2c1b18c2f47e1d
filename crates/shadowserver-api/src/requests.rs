// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Matter Labs

//! Typed request bodies, one per endpoint

use crate::{
    error::{Result, ShadowserverError},
    types::{DateRange, DeviceInfoKey, Endpoint, JsonObject, Sort},
};
use serde::Serialize;
use serde_json::Value;
use serde_with::{serde_as, DisplayFromStr};
use std::collections::BTreeMap;

/// Page size used by [`ReportQuery`] unless overridden.
pub const DEFAULT_QUERY_LIMIT: u32 = 1000;

/// A request body bound to its endpoint and to the shape of its answer.
pub trait ApiRequest: Serialize {
    /// The endpoint the request is posted to.
    const ENDPOINT: Endpoint;
    /// The validated result.
    type Output;

    /// Checks the decoded JSON against the shape the endpoint promises.
    fn parse_response(value: Value) -> Result<Self::Output>;
}

fn expect_object(endpoint: Endpoint, value: Value) -> Result<JsonObject> {
    match value {
        Value::Object(object) => Ok(object),
        _ => Err(ShadowserverError::shape(endpoint.path(), "an object")),
    }
}

fn expect_array(endpoint: Endpoint, value: Value) -> Result<Vec<Value>> {
    match value {
        Value::Array(values) => Ok(values),
        _ => Err(ShadowserverError::shape(endpoint.path(), "an array")),
    }
}

fn expect_objects(endpoint: Endpoint, value: Value) -> Result<Vec<JsonObject>> {
    expect_array(endpoint, value)?
        .into_iter()
        .map(|value| match value {
            Value::Object(object) => Ok(object),
            _ => Err(ShadowserverError::shape(
                endpoint.path(),
                "an array of objects",
            )),
        })
        .collect()
}

fn expect_strings(endpoint: Endpoint, value: Value) -> Result<Vec<String>> {
    expect_array(endpoint, value)?
        .into_iter()
        .map(|value| match value {
            Value::String(s) => Ok(s),
            _ => Err(ShadowserverError::shape(
                endpoint.path(),
                "an array of strings",
            )),
        })
        .collect()
}

fn limit_unset(limit: &Option<u32>) -> bool {
    matches!(limit, None | Some(0))
}

/// Body of `test/ping`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PingRequest {}

impl ApiRequest for PingRequest {
    const ENDPOINT: Endpoint = Endpoint::Ping;
    type Output = JsonObject;

    fn parse_response(value: Value) -> Result<Self::Output> {
        expect_object(Self::ENDPOINT, value)
    }
}

/// Body of `key/info`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct KeyInfoRequest {}

impl ApiRequest for KeyInfoRequest {
    const ENDPOINT: Endpoint = Endpoint::KeyInfo;
    type Output = JsonObject;

    fn parse_response(value: Value) -> Result<Self::Output> {
        let mut values = expect_objects(Self::ENDPOINT, value)?;
        if values.len() != 1 {
            return Err(ShadowserverError::shape(
                Self::ENDPOINT.path(),
                "an array with exactly one object",
            ));
        }
        Ok(values.remove(0))
    }
}

/// Body of `reports/subscribed`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReportsSubscribedRequest {}

impl ApiRequest for ReportsSubscribedRequest {
    const ENDPOINT: Endpoint = Endpoint::ReportsSubscribed;
    type Output = Vec<String>;

    fn parse_response(value: Value) -> Result<Self::Output> {
        expect_strings(Self::ENDPOINT, value)
    }
}

/// Body of `reports/types`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReportsTypesRequest {}

impl ApiRequest for ReportsTypesRequest {
    const ENDPOINT: Endpoint = Endpoint::ReportsTypes;
    type Output = Vec<String>;

    fn parse_response(value: Value) -> Result<Self::Output> {
        expect_strings(Self::ENDPOINT, value)
    }
}

/// Body of `reports/list`, listing the reports available for download.
#[serde_as]
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReportsListRequest {
    /// Restrict to these report names.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub reports: Vec<String>,
    /// Maximum number of entries. `0` is treated as unset.
    #[serde(skip_serializing_if = "limit_unset")]
    pub limit: Option<u32>,
    /// Restrict to this date range.
    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<DateRange>,
    /// Restrict to this report type.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub report_type: Option<String>,
}

impl ReportsListRequest {
    /// Creates an unfiltered request.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a report name to filter by.
    pub fn with_report(mut self, report: impl Into<String>) -> Self {
        self.reports.push(report.into());
        self
    }

    /// Sets the date range.
    pub fn with_date(mut self, date: DateRange) -> Self {
        self.date = Some(date);
        self
    }

    /// Sets the report type.
    pub fn with_type(mut self, report_type: impl Into<String>) -> Self {
        self.report_type = Some(report_type.into());
        self
    }

    /// Sets the maximum number of entries.
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }
}

impl ApiRequest for ReportsListRequest {
    const ENDPOINT: Endpoint = Endpoint::ReportsList;
    type Output = Vec<JsonObject>;

    fn parse_response(value: Value) -> Result<Self::Output> {
        expect_objects(Self::ENDPOINT, value)
    }
}

/// Body of `reports/download`.
#[serde_as]
#[derive(Debug, Clone, Serialize)]
pub struct ReportsDownloadRequest {
    /// Report id as returned by `reports/list`.
    pub id: String,
    /// Report name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<String>,
    /// Maximum number of rows, sent as a string. `0` is treated as unset.
    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(skip_serializing_if = "limit_unset")]
    pub limit: Option<u32>,
}

impl ReportsDownloadRequest {
    /// Creates a request for the report `id`.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            report: None,
            limit: None,
        }
    }

    /// Sets the report name.
    pub fn with_report(mut self, report: impl Into<String>) -> Self {
        self.report = Some(report.into());
        self
    }

    /// Sets the maximum number of rows.
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }
}

impl ApiRequest for ReportsDownloadRequest {
    const ENDPOINT: Endpoint = Endpoint::ReportsDownload;
    type Output = Vec<JsonObject>;

    fn parse_response(value: Value) -> Result<Self::Output> {
        expect_objects(Self::ENDPOINT, value)
    }
}

/// A search over report rows, the body of `reports/query`.
///
/// The page cursor is managed by the client while paginating; every page is
/// requested with the same criteria.
#[serde_as]
#[derive(Debug, Clone, Serialize)]
pub struct ReportQuery {
    /// Search criteria. Must contain one attribute matching the account's report filters.
    pub query: BTreeMap<String, String>,
    /// Sort order of the rows.
    #[serde_as(as = "DisplayFromStr")]
    pub sort: Sort,
    #[serde_as(as = "DisplayFromStr")]
    pub(crate) page: u32,
    /// Restrict to this date range.
    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<DateRange>,
    /// Return value cardinalities of this field instead of rows.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facet: Option<String>,
    /// Number of rows per page, sent as a string. `0` leaves it to the server.
    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(skip_serializing_if = "limit_unset")]
    pub limit: Option<u32>,
    /// Fetch the following pages until an empty one is returned.
    #[serde(skip)]
    pub paginate: bool,
}

impl ReportQuery {
    /// Creates an ascending, paginated query with the default page size.
    pub fn new<K, V>(query: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            query: query
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            sort: Sort::default(),
            page: 1,
            date: None,
            facet: None,
            limit: Some(DEFAULT_QUERY_LIMIT),
            paginate: true,
        }
    }

    /// Sets the sort order.
    pub fn with_sort(mut self, sort: Sort) -> Self {
        self.sort = sort;
        self
    }

    /// Sets the date range.
    pub fn with_date(mut self, date: DateRange) -> Self {
        self.date = Some(date);
        self
    }

    /// Requests a facet instead of rows.
    pub fn with_facet(mut self, facet: impl Into<String>) -> Self {
        self.facet = Some(facet.into());
        self
    }

    /// Sets the page size. `None` leaves it to the server.
    pub fn with_limit(mut self, limit: Option<u32>) -> Self {
        self.limit = limit;
        self
    }

    /// Enables or disables automatic pagination.
    pub fn with_pagination(mut self, paginate: bool) -> Self {
        self.paginate = paginate;
        self
    }

    /// The page cursor of the next request.
    pub fn page(&self) -> u32 {
        self.page
    }
}

impl ApiRequest for ReportQuery {
    const ENDPOINT: Endpoint = Endpoint::ReportsQuery;
    type Output = Vec<JsonObject>;

    fn parse_response(value: Value) -> Result<Self::Output> {
        expect_objects(Self::ENDPOINT, value)
    }
}

/// Body of `reports/stats`.
#[serde_as]
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReportsStatsRequest {
    /// Restrict to these report names.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub report: Vec<String>,
    /// Restrict to this date range.
    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<DateRange>,
    /// Restrict to these report types.
    #[serde(rename = "type", skip_serializing_if = "Vec::is_empty")]
    pub report_type: Vec<String>,
}

impl ReportsStatsRequest {
    /// Creates an unfiltered request.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a report name to filter by.
    pub fn with_report(mut self, report: impl Into<String>) -> Self {
        self.report.push(report.into());
        self
    }

    /// Adds a report type to filter by.
    pub fn with_type(mut self, report_type: impl Into<String>) -> Self {
        self.report_type.push(report_type.into());
        self
    }

    /// Sets the date range.
    pub fn with_date(mut self, date: DateRange) -> Self {
        self.date = Some(date);
        self
    }
}

impl ApiRequest for ReportsStatsRequest {
    const ENDPOINT: Endpoint = Endpoint::ReportsStats;
    /// Rows are tuple-like `[date, report, count]` entries.
    type Output = Vec<Value>;

    fn parse_response(value: Value) -> Result<Self::Output> {
        expect_array(Self::ENDPOINT, value)
    }
}

/// Body of `reports/device-info`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DeviceInfoRequest {
    query: BTreeMap<String, String>,
}

impl DeviceInfoRequest {
    /// Builds a request from free-form criteria.
    ///
    /// # Errors
    ///
    /// Returns [`ShadowserverError::InvalidParameter`] if a key is not one of `ip`, `asn`, `geo`.
    pub fn new<K, V>(query: impl IntoIterator<Item = (K, V)>) -> Result<Self>
    where
        K: AsRef<str>,
        V: Into<String>,
    {
        query
            .into_iter()
            .try_fold(Self::default(), |request, (key, value)| {
                Ok(request.with(key.as_ref().parse::<DeviceInfoKey>()?, value))
            })
    }

    /// Adds a criterion.
    pub fn with(mut self, key: DeviceInfoKey, value: impl Into<String>) -> Self {
        self.query.insert(key.to_string(), value.into());
        self
    }
}

impl ApiRequest for DeviceInfoRequest {
    const ENDPOINT: Endpoint = Endpoint::ReportsDeviceInfo;
    type Output = JsonObject;

    fn parse_response(value: Value) -> Result<Self::Output> {
        expect_object(Self::ENDPOINT, value)
    }
}

/// Body of `reports/schema`.
#[derive(Debug, Clone, Serialize)]
pub struct ReportsSchemaRequest {
    /// Report type to describe.
    #[serde(rename = "type")]
    pub report_type: String,
}

impl ApiRequest for ReportsSchemaRequest {
    const ENDPOINT: Endpoint = Endpoint::ReportsSchema;
    type Output = JsonObject;

    fn parse_response(value: Value) -> Result<Self::Output> {
        expect_object(Self::ENDPOINT, value)
    }
}
