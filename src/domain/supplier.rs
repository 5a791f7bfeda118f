use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::types::{CategoryId, Rating, SupplierId, SupplierSlug};

/// Moderation state of a supplier listing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SupplierStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
    Hidden,
}

/// Supplier as returned by the listing endpoint.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Supplier {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub category_id: Option<String>,
    pub short_summary: Option<String>,
    pub description: Option<String>,
    pub logo_url: Option<String>,
    pub website_url: Option<String>,
    pub location: Option<String>,
    pub rating_average: f64,
    pub rating_count: u32,
    pub featured: bool,
    pub has_discount: bool,
    pub discount_description: Option<String>,
    pub verified_business: bool,
    pub verified_insurance: bool,
    pub accepts_quotes: bool,
    pub tags: Vec<String>,
}

/// Published review shown on a supplier profile.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Review {
    pub id: String,
    pub rating: u8,
    pub title: Option<String>,
    pub content: String,
    pub company_name: Option<String>,
    pub verified: bool,
    pub created_at: Option<DateTime<Utc>>,
}

/// A supplier together with its published reviews.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct SupplierProfile {
    pub supplier: Supplier,
    pub reviews: Vec<Review>,
}

impl SupplierProfile {
    /// Orders reviews newest first; undated reviews go last.
    #[must_use]
    pub fn newest_reviews_first(mut self) -> Self {
        self.reviews
            .sort_by(|a, b| b.created_at.cmp(&a.created_at));
        self
    }
}

/// Validated supplier submission ready to be sent to the hosted backend.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NewSupplier {
    pub name: String,
    pub slug: SupplierSlug,
    pub category_id: CategoryId,
    pub description: String,
    pub short_summary: String,
    pub website_url: String,
    pub contact_email: String,
    pub contact_phone: Option<String>,
    pub location: Option<String>,
    pub service_areas: Vec<String>,
    pub founded_year: Option<i32>,
    pub employee_count: Option<String>,
    pub pricing_model: Option<String>,
    pub has_discount: bool,
    pub discount_description: Option<String>,
    pub discount_code: Option<String>,
    pub accepts_quotes: bool,
    pub tags: Vec<String>,
    /// Public submissions always start as pending.
    pub status: SupplierStatus,
}

impl NewSupplier {
    /// Replaces the slug, used while searching for a free one.
    #[must_use]
    pub fn with_slug(mut self, slug: SupplierSlug) -> Self {
        self.slug = slug;
        self
    }
}

/// Result of a successful submission as reported by the backend.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SubmittedSupplier {
    pub id: String,
    pub name: String,
    pub status: SupplierStatus,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NewReview {
    pub supplier_id: SupplierId,
    pub rating: Rating,
    pub title: Option<String>,
    pub content: String,
    pub company_name: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NewQuoteRequest {
    pub supplier_id: SupplierId,
    pub requester_name: String,
    pub requester_email: String,
    pub company_name: Option<String>,
    pub phone: Option<String>,
    pub service_type: Option<String>,
    pub budget_range: Option<String>,
    pub timeline: Option<String>,
    pub location: Option<String>,
    pub message: String,
    pub source: &'static str,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NewContactMessage {
    pub supplier_id: Option<SupplierId>,
    pub name: String,
    pub email: String,
    pub company: Option<String>,
    pub phone: Option<String>,
    pub subject: Option<String>,
    pub message: String,
    pub source: &'static str,
}
