use std::future::Future;

use crate::domain::feature_flag::FeatureFlag;
use crate::domain::supplier::{
    NewContactMessage, NewQuoteRequest, NewReview, NewSupplier, SubmittedSupplier, Supplier,
    SupplierProfile,
};
use crate::domain::types::{SupplierId, SupplierSlug};
use crate::repository::errors::RepositoryResult;
use crate::repository::listing::ListingRequest;

pub mod errors;
#[cfg(feature = "server")]
pub mod http;
pub mod listing;

pub trait SupplierReader {
    /// Performs one call against the listing endpoint and returns the raw
    /// body for [`listing::interpret_response`].
    fn fetch_listing(
        &self,
        request: &ListingRequest,
    ) -> impl Future<Output = RepositoryResult<String>>;
    fn get_supplier_by_slug(
        &self,
        slug: &str,
    ) -> impl Future<Output = RepositoryResult<Option<Supplier>>>;
    /// Same lookup as [`SupplierReader::get_supplier_by_slug`], with reviews.
    fn get_supplier_profile(
        &self,
        slug: &str,
    ) -> impl Future<Output = RepositoryResult<Option<SupplierProfile>>>;
    /// Approved suppliers among `ids`, in the order of `ids`.
    fn list_suppliers_by_ids(
        &self,
        ids: &[String],
    ) -> impl Future<Output = RepositoryResult<Vec<Supplier>>>;
    fn slug_exists(&self, slug: &SupplierSlug) -> impl Future<Output = RepositoryResult<bool>>;
}

pub trait SupplierWriter {
    fn create_supplier(
        &self,
        supplier: &NewSupplier,
    ) -> impl Future<Output = RepositoryResult<SubmittedSupplier>>;
    fn attach_tags(
        &self,
        supplier_id: &SupplierId,
        tags: &[String],
    ) -> impl Future<Output = RepositoryResult<()>>;
    fn create_review(&self, review: &NewReview) -> impl Future<Output = RepositoryResult<()>>;
    fn create_quote_request(
        &self,
        request: &NewQuoteRequest,
    ) -> impl Future<Output = RepositoryResult<()>>;
    fn create_contact_message(
        &self,
        message: &NewContactMessage,
    ) -> impl Future<Output = RepositoryResult<()>>;
}

pub trait FeatureFlagReader {
    fn fetch_feature_flag(&self, flag: FeatureFlag) -> impl Future<Output = RepositoryResult<bool>>;
}
