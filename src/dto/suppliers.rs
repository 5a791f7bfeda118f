use serde::Serialize;

use crate::domain::filter::Filter;
use crate::domain::supplier::{Review, Supplier};
use crate::pagination::{Paginated, PaginationMeta};

/// One pager token with the query string it links to.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct PageLink {
    /// `None` renders as an ellipsis.
    pub page: Option<usize>,
    pub query: String,
    pub current: bool,
}

/// Data required to render the supplier listing template.
#[derive(Debug, Serialize)]
pub struct SuppliersPageData {
    /// Filter decoded from the request, echoed back into the form.
    pub filter: Filter,
    pub suppliers: Paginated<Supplier>,
    pub page_links: Vec<PageLink>,
    pub prev_query: Option<String>,
    pub next_query: Option<String>,
    /// Same request again, offered next to a load failure.
    pub retry_query: String,
    pub clear_query: String,
    pub active_filters: usize,
    pub error: Option<String>,
}

/// JSON body of `/api/suppliers`, shaped like the backend's envelope.
#[derive(Debug, Serialize)]
pub struct SuppliersApiResponse {
    pub success: bool,
    pub data: Vec<Supplier>,
    pub pagination: PaginationMeta,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Data required to render a supplier profile.
#[derive(Debug, Serialize)]
pub struct SupplierPageData {
    pub supplier: Supplier,
    /// Newest first; empty while reviews are switched off.
    pub reviews: Vec<Review>,
    pub related: Vec<Supplier>,
    pub reviews_enabled: bool,
    pub quotes_enabled: bool,
}

/// Suppliers stored in a favourites or compare list.
#[derive(Debug, Serialize)]
pub struct SelectionPageData {
    pub suppliers: Vec<Supplier>,
    pub capacity: Option<usize>,
    pub can_add: bool,
}
