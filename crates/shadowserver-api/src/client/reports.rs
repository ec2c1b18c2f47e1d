// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Matter Labs

use super::ApiClient;
use crate::{
    error::{Result, ShadowserverError},
    pagination::Pager,
    requests::{
        DeviceInfoRequest, ReportQuery, ReportsDownloadRequest, ReportsListRequest,
        ReportsSchemaRequest, ReportsStatsRequest, ReportsSubscribedRequest, ReportsTypesRequest,
    },
    types::JsonObject,
};
use futures::{stream, Stream, TryStreamExt};
use serde_json::Value;
use tracing::debug;

impl ApiClient {
    /// `reports/subscribed`: names of the reports the account is subscribed to.
    pub async fn reports_subscribed(&self) -> Result<Vec<String>> {
        self.send(&ReportsSubscribedRequest {}).await
    }

    /// `reports/types`: all report types available to the subscriber.
    pub async fn reports_types(&self) -> Result<Vec<String>> {
        self.send(&ReportsTypesRequest {}).await
    }

    /// `reports/list`: reports which could be downloaded.
    pub async fn reports_list(&self, request: &ReportsListRequest) -> Result<Vec<JsonObject>> {
        self.send(request).await
    }

    /// `reports/download`: the rows of a single report.
    pub async fn reports_download(
        &self,
        request: &ReportsDownloadRequest,
    ) -> Result<Vec<JsonObject>> {
        self.send(request).await
    }

    /// `reports/query`: lazily streams the rows matching `query`.
    ///
    /// A page is only requested once all rows of the previous page were
    /// consumed. With pagination enabled, pages are fetched until the server
    /// returns an empty one. A failed fetch is yielded as the last item.
    pub fn reports_query(
        &self,
        query: ReportQuery,
    ) -> impl Stream<Item = Result<JsonObject>> + '_ {
        stream::try_unfold(Pager::new(query), move |mut pager| async move {
            let Some(request) = pager.next_request() else {
                return Ok(None);
            };
            let page = self.send(request).await?;
            debug!(page = pager.page(), rows = page.len(), "fetched query page");
            pager.advance(page.len());
            let rows = stream::iter(page.into_iter().map(Ok::<_, ShadowserverError>));
            Ok::<_, ShadowserverError>(Some((rows, pager)))
        })
        .try_flatten()
    }

    /// `reports/stats`: aggregate statistics as tuple-like rows.
    pub async fn reports_stats(&self, request: &ReportsStatsRequest) -> Result<Vec<Value>> {
        self.send(request).await
    }

    /// `reports/device-info`: device details for an IP, ASN or country.
    ///
    /// Only the keys `ip`, `asn` and `geo` are accepted, anything else fails
    /// before a request is sent.
    pub async fn reports_device_info<K, V>(
        &self,
        query: impl IntoIterator<Item = (K, V)>,
    ) -> Result<JsonObject>
    where
        K: AsRef<str>,
        V: Into<String>,
    {
        let request = DeviceInfoRequest::new(query)?;
        self.send(&request).await
    }

    /// `reports/schema`: the schema of a report type.
    pub async fn reports_schema(&self, report_type: &str) -> Result<JsonObject> {
        self.send(&ReportsSchemaRequest {
            report_type: report_type.into(),
        })
        .await
    }
}
