// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Matter Labs

use super::ApiClient;
use crate::{error::Result, pagination::Pager, types::JsonObject};
use std::{iter::FusedIterator, vec};
use tracing::debug;

/// Rows of a `reports/query`, fetched page by page as they are consumed.
///
/// Forward only; once exhausted or after the first error the iterator stays
/// exhausted.
#[derive(Debug)]
pub struct ReportRows<'a> {
    client: &'a ApiClient,
    pager: Pager,
    buffered: vec::IntoIter<JsonObject>,
}

impl<'a> ReportRows<'a> {
    pub(crate) fn new(client: &'a ApiClient, pager: Pager) -> Self {
        Self {
            client,
            pager,
            buffered: Vec::new().into_iter(),
        }
    }

    /// Returns the remaining rows of the current page, or fetches the next page.
    ///
    /// Yields `None` once the server returned an empty page, after the first
    /// page when pagination is disabled, or after an error.
    pub fn next_page(&mut self) -> Option<Result<Vec<JsonObject>>> {
        if !self.buffered.as_slice().is_empty() {
            return Some(Ok(self.buffered.by_ref().collect()));
        }
        self.fetch().map(|page| page.map(|rows| rows.collect()))
    }

    /// The page cursor of the next request.
    pub fn page(&self) -> u32 {
        self.pager.page()
    }

    fn fetch(&mut self) -> Option<Result<vec::IntoIter<JsonObject>>> {
        let request = self.pager.next_request()?;
        match self.client.send(request) {
            Ok(rows) => {
                debug!(page = self.pager.page(), rows = rows.len(), "fetched query page");
                self.pager.advance(rows.len());
                Some(Ok(rows.into_iter()))
            }
            Err(e) => {
                self.pager.finish();
                Some(Err(e))
            }
        }
    }
}

impl Iterator for ReportRows<'_> {
    type Item = Result<JsonObject>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(row) = self.buffered.next() {
                return Some(Ok(row));
            }
            match self.fetch()? {
                Ok(rows) => self.buffered = rows,
                Err(e) => return Some(Err(e)),
            }
        }
    }
}

impl FusedIterator for ReportRows<'_> {}
