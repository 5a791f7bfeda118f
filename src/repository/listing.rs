//! Listing request construction and response interpretation.
//!
//! [`build_request`] turns a [`Filter`] into the path and query string the
//! listing endpoint expects; [`interpret_response`] turns whatever came back
//! into items plus pagination, folding every failure into [`FetchFailed`]
//! so callers can always render an empty state with a retry link.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Deserialize;
use thiserror::Error;

use crate::domain::filter::Filter;
use crate::domain::supplier::Supplier;
use crate::forms::filters;
use crate::pagination::PaginationMeta;

/// Path of the hosted listing endpoint.
pub const SUPPLIERS_PATH: &str = "/api/suppliers";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListingRequest {
    pub path: &'static str,
    pub query: String,
}

impl ListingRequest {
    /// `path?query`, relative to the backend base URL.
    pub fn to_relative_url(&self) -> String {
        format!("{}?{}", self.path, self.query)
    }
}

/// The listing could not be loaded; the caller should offer a retry.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("failed to load suppliers: {message}")]
pub struct FetchFailed {
    pub message: String,
}

#[derive(Debug)]
pub struct ListingOutcome {
    pub items: Vec<Supplier>,
    pub pagination: PaginationMeta,
    pub error: Option<FetchFailed>,
}

impl ListingOutcome {
    /// Empty result with zeroed pagination carrying the failure.
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            items: Vec::new(),
            pagination: PaginationMeta::empty(),
            error: Some(FetchFailed {
                message: message.into(),
            }),
        }
    }

    pub fn is_failed(&self) -> bool {
        self.error.is_some()
    }
}

/// Builds the request for a filter. `page` and `limit` are always present
/// because the listing endpoint always paginates.
pub fn build_request(filter: &Filter) -> ListingRequest {
    let filter = filter
        .clone()
        .page(filter.page_or_default())
        .limit(filter.limit_or_default());

    ListingRequest {
        path: SUPPLIERS_PATH,
        query: filters::encode(&filter),
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EnvelopePagination {
    page: usize,
    limit: usize,
    total: usize,
}

#[derive(Debug, Deserialize)]
struct ListingEnvelope {
    success: bool,
    #[serde(default)]
    data: Vec<Supplier>,
    pagination: Option<EnvelopePagination>,
    error: Option<String>,
}

/// Interprets the raw body returned by the listing endpoint.
///
/// Page counts and navigation flags are re-derived from `page`, `limit`
/// and `total` so they always agree with each other.
pub fn interpret_response(body: &str) -> ListingOutcome {
    let envelope = match serde_json::from_str::<ListingEnvelope>(body) {
        Ok(envelope) => envelope,
        Err(err) => return ListingOutcome::failed(format!("unreadable listing response: {err}")),
    };

    if !envelope.success {
        let message = envelope
            .error
            .unwrap_or_else(|| "listing endpoint reported failure".to_string());
        return ListingOutcome::failed(message);
    }

    let pagination = match envelope.pagination {
        Some(p) => PaginationMeta::new(p.page, p.limit, p.total),
        None => {
            let count = envelope.data.len();
            PaginationMeta::new(1, count.max(1), count)
        }
    };

    ListingOutcome {
        items: envelope.data,
        pagination,
        error: None,
    }
}

/// Ticket identifying one listing request in a sequence of them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

/// Discards listing responses that were overtaken by a newer request.
///
/// Every request takes a ticket from [`ListingSequencer::issue`]; when its
/// response arrives it is applied only if no newer ticket was issued in the
/// meantime.
#[derive(Debug, Default)]
pub struct ListingSequencer {
    latest: AtomicU64,
}

impl ListingSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&self) -> Ticket {
        Ticket(self.latest.fetch_add(1, Ordering::AcqRel) + 1)
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.latest.load(Ordering::Acquire) == ticket.0
    }

    /// Hands back `outcome` if `ticket` is still the latest, `None` otherwise.
    pub fn accept(&self, ticket: Ticket, outcome: ListingOutcome) -> Option<ListingOutcome> {
        if self.is_current(ticket) {
            Some(outcome)
        } else {
            log::debug!("Discarding stale listing response for request #{}", ticket.0);
            None
        }
    }
}
