//! Endpoint modules, one per remote operation.
//!
//! Each module exposes:
//! - `request(...)`: pure builder producing a [`RequestParts`](crate::RequestParts)
//! - `parse(...)`: finite status-code to outcome-variant mapping
//! - `call(...)` / `call_blocking(...)`: async and sync entry points over the
//!   two shared functions
//!
//! Response statuses outside an endpoint's contract map to the outcome's
//! `Unknown` variant rather than an error, so unexpected server behavior is
//! never silently swallowed.

pub mod artifact;
pub mod service;

use crate::request::RequestParts;

/// Common query parameters of the list endpoints.
#[derive(Debug, Clone, Default)]
pub struct ListQuery {
    /// Server-side filter expression
    pub filter: Option<String>,
    /// Field to order the result page by
    pub order_by: Option<String>,
    /// Maximum number of records per page
    pub limit: Option<u32>,
    /// Continuation token from a previous page's `links.next`
    pub page: Option<String>,
}

impl ListQuery {
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    pub fn with_order_by(mut self, order_by: impl Into<String>) -> Self {
        self.order_by = Some(order_by.into());
        self
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_page(mut self, page: impl Into<String>) -> Self {
        self.page = Some(page.into());
        self
    }

    fn apply(&self, parts: RequestParts) -> RequestParts {
        parts
            .query_opt("filter", self.filter.as_deref())
            .query_opt("order-by", self.order_by.as_deref())
            .query_opt("limit", self.limit)
            .query_opt("page", self.page.as_deref())
    }
}
