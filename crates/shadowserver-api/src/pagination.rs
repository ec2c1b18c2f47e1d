// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Matter Labs

//! Page cursor for `reports/query`

use crate::requests::ReportQuery;

/// Explicit pagination state: the request template, its page cursor and
/// whether the sequence has ended.
///
/// The first request goes out with page `1`. A page is followed by the next
/// one only if pagination is enabled and the page was non-empty.
#[derive(Debug, Clone)]
pub(crate) struct Pager {
    request: ReportQuery,
    done: bool,
}

impl Pager {
    pub(crate) fn new(mut request: ReportQuery) -> Self {
        request.page = 1;
        Self {
            request,
            done: false,
        }
    }

    /// The request for the next page, or `None` once the sequence has ended.
    pub(crate) fn next_request(&self) -> Option<&ReportQuery> {
        (!self.done).then_some(&self.request)
    }

    /// Records the size of the page just fetched and moves the cursor.
    pub(crate) fn advance(&mut self, page_len: usize) {
        if !self.request.paginate || page_len == 0 {
            self.done = true;
        } else {
            self.request.page += 1;
        }
    }

    /// Ends the sequence, e.g. after a failed fetch.
    pub(crate) fn finish(&mut self) {
        self.done = true;
    }

    pub(crate) fn page(&self) -> u32 {
        self.request.page
    }
}
