//! Row shapes exchanged with the hosted backend's REST tables.

use serde::{Deserialize, Serialize};

use crate::domain::supplier::{
    NewSupplier as DomainNewSupplier, Review, Supplier, SupplierProfile, SupplierStatus,
};

#[derive(Debug, Serialize)]
/// Insert payload for the `suppliers` table. Tags live in `supplier_tags`.
pub struct NewSupplier<'a> {
    pub name: &'a str,
    pub slug: &'a str,
    pub category_id: String,
    pub description: &'a str,
    pub short_summary: &'a str,
    pub website_url: &'a str,
    pub contact_email: &'a str,
    pub contact_phone: Option<&'a str>,
    pub location: Option<&'a str>,
    pub service_areas: &'a [String],
    pub founded_year: Option<i32>,
    pub employee_count: Option<&'a str>,
    pub pricing_model: Option<&'a str>,
    pub has_discount: bool,
    pub discount_description: Option<&'a str>,
    pub discount_code: Option<&'a str>,
    pub accepts_quotes: bool,
    pub status: SupplierStatus,
    pub featured: bool,
    pub verified_business: bool,
    pub verified_insurance: bool,
}

impl<'a> From<&'a DomainNewSupplier> for NewSupplier<'a> {
    fn from(supplier: &'a DomainNewSupplier) -> Self {
        Self {
            name: &supplier.name,
            slug: supplier.slug.as_str(),
            category_id: supplier.category_id.to_string(),
            description: &supplier.description,
            short_summary: &supplier.short_summary,
            website_url: &supplier.website_url,
            contact_email: &supplier.contact_email,
            contact_phone: supplier.contact_phone.as_deref(),
            location: supplier.location.as_deref(),
            service_areas: &supplier.service_areas,
            founded_year: supplier.founded_year,
            employee_count: supplier.employee_count.as_deref(),
            pricing_model: supplier.pricing_model.as_deref(),
            has_discount: supplier.has_discount,
            discount_description: supplier.discount_description.as_deref(),
            discount_code: supplier.discount_code.as_deref(),
            accepts_quotes: supplier.accepts_quotes,
            status: supplier.status,
            featured: false,
            verified_business: false,
            verified_insurance: false,
        }
    }
}

/// `suppliers` row with its `supplier_tags` and `reviews` embeds.
#[derive(Debug, Deserialize)]
pub struct SupplierRow {
    #[serde(flatten)]
    pub supplier: Supplier,
    #[serde(default)]
    pub tags: Vec<TagRow>,
    #[serde(default)]
    pub reviews: Vec<Review>,
}

#[derive(Debug, Deserialize)]
pub struct TagRow {
    pub tag: String,
}

impl From<SupplierRow> for SupplierProfile {
    fn from(row: SupplierRow) -> Self {
        let mut supplier = row.supplier;
        supplier.tags = row.tags.into_iter().map(|row| row.tag).collect();
        Self {
            supplier,
            reviews: row.reviews,
        }
    }
}

impl From<SupplierRow> for Supplier {
    fn from(row: SupplierRow) -> Self {
        SupplierProfile::from(row).supplier
    }
}

#[derive(Debug, Serialize)]
pub struct SupplierTag<'a> {
    pub supplier_id: &'a str,
    pub tag: &'a str,
}

#[derive(Debug, Deserialize)]
/// Projection used when only existence matters.
pub struct IdOnly {
    pub id: String,
}

#[derive(Debug, Deserialize)]
pub struct FeatureFlagState {
    #[serde(default)]
    pub enabled: bool,
}
