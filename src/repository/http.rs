//! Repository backed by the hosted backend's HTTP API.
//!
//! Listing and feature flags go through the backend's `/api/*` routes;
//! lookups and inserts use its REST table endpoints under `/rest/v1`.

use std::time::Duration;

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use reqwest::{Client, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::domain::feature_flag::FeatureFlag;
use crate::domain::supplier::{
    NewContactMessage, NewQuoteRequest, NewReview, NewSupplier, SubmittedSupplier, Supplier,
    SupplierProfile,
};
use crate::domain::types::{SupplierId, SupplierSlug};
use crate::models::config::ServerConfig;
use crate::models::supplier::{
    FeatureFlagState, IdOnly, NewSupplier as NewSupplierRow, SupplierRow, SupplierTag,
};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::listing::ListingRequest;
use crate::repository::{FeatureFlagReader, SupplierReader, SupplierWriter};

const REST_PREFIX: &str = "/rest/v1";
/// Supplier columns plus tag names.
const SUPPLIER_SELECT: &str = "*,tags:supplier_tags(*)";
/// Supplier columns plus tag names and reviews.
const PROFILE_SELECT: &str = "*,tags:supplier_tags(*),reviews:reviews(*)";

#[derive(Clone)]
pub struct HttpRepository {
    client: Client,
    base_url: String,
}

impl HttpRepository {
    pub fn new(config: &ServerConfig) -> RepositoryResult<Self> {
        let api_key = HeaderValue::from_str(&config.backend_api_key)
            .map_err(|e| RepositoryError::Unexpected(format!("Invalid backend api key: {e}")))?;
        let bearer = HeaderValue::from_str(&format!("Bearer {}", config.backend_api_key))
            .map_err(|e| RepositoryError::Unexpected(format!("Invalid backend api key: {e}")))?;

        let mut headers = HeaderMap::new();
        headers.insert("apikey", api_key);
        headers.insert(AUTHORIZATION, bearer);

        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.backend_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn table_url(&self, table: &str) -> String {
        self.url(&format!("{REST_PREFIX}/{table}"))
    }

    async fn select<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &[(&str, String)],
    ) -> RepositoryResult<Vec<T>> {
        let response = self
            .client
            .get(self.table_url(table))
            .query(query)
            .send()
            .await?;
        let body = ensure_success(response).await?.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn approved_by_slug(
        &self,
        slug: &str,
        select: &str,
    ) -> RepositoryResult<Option<SupplierRow>> {
        let rows: Vec<SupplierRow> = self
            .select(
                "suppliers",
                &[
                    ("select", select.to_string()),
                    ("slug", format!("eq.{slug}")),
                    ("status", "eq.approved".to_string()),
                    ("limit", "1".to_string()),
                ],
            )
            .await?;
        Ok(rows.into_iter().next())
    }

    async fn insert<T: Serialize + ?Sized>(&self, table: &str, rows: &T) -> RepositoryResult<()> {
        let response = self
            .client
            .post(self.table_url(table))
            .header("Prefer", "return=minimal")
            .json(rows)
            .send()
            .await?;
        ensure_success(response).await?;
        Ok(())
    }
}

async fn ensure_success(response: Response) -> RepositoryResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(RepositoryError::from_status(status.as_u16(), &body))
}

impl SupplierReader for HttpRepository {
    async fn fetch_listing(&self, request: &ListingRequest) -> RepositoryResult<String> {
        // Error statuses still carry the `{success: false}` envelope.
        let response = self
            .client
            .get(self.url(&request.to_relative_url()))
            .send()
            .await?;
        Ok(response.text().await?)
    }

    async fn get_supplier_by_slug(&self, slug: &str) -> RepositoryResult<Option<Supplier>> {
        let row = self.approved_by_slug(slug, SUPPLIER_SELECT).await?;
        Ok(row.map(Supplier::from))
    }

    async fn get_supplier_profile(&self, slug: &str) -> RepositoryResult<Option<SupplierProfile>> {
        let row = self.approved_by_slug(slug, PROFILE_SELECT).await?;
        Ok(row.map(SupplierProfile::from))
    }

    async fn list_suppliers_by_ids(&self, ids: &[String]) -> RepositoryResult<Vec<Supplier>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows: Vec<SupplierRow> = self
            .select(
                "suppliers",
                &[
                    ("select", SUPPLIER_SELECT.to_string()),
                    ("id", format!("in.({})", ids.join(","))),
                    ("status", "eq.approved".to_string()),
                ],
            )
            .await?;

        let mut suppliers: Vec<Supplier> = rows.into_iter().map(Supplier::from).collect();
        suppliers.sort_by_key(|supplier| ids.iter().position(|id| *id == supplier.id));
        Ok(suppliers)
    }

    async fn slug_exists(&self, slug: &SupplierSlug) -> RepositoryResult<bool> {
        let rows: Vec<IdOnly> = self
            .select(
                "suppliers",
                &[
                    ("select", "id".to_string()),
                    ("slug", format!("eq.{slug}")),
                    ("limit", "1".to_string()),
                ],
            )
            .await?;
        Ok(!rows.is_empty())
    }
}

impl SupplierWriter for HttpRepository {
    async fn create_supplier(&self, supplier: &NewSupplier) -> RepositoryResult<SubmittedSupplier> {
        let response = self
            .client
            .post(self.table_url("suppliers"))
            .header("Prefer", "return=representation")
            .json(&NewSupplierRow::from(supplier))
            .send()
            .await?;
        let body = ensure_success(response).await?.text().await?;

        let rows: Vec<SubmittedSupplier> = serde_json::from_str(&body)?;
        rows.into_iter().next().ok_or_else(|| {
            RepositoryError::Unexpected("Backend returned no row for the new supplier".to_string())
        })
    }

    async fn attach_tags(&self, supplier_id: &SupplierId, tags: &[String]) -> RepositoryResult<()> {
        if tags.is_empty() {
            return Ok(());
        }
        let rows: Vec<SupplierTag> = tags
            .iter()
            .map(|tag| SupplierTag {
                supplier_id: supplier_id.as_str(),
                tag,
            })
            .collect();
        self.insert("supplier_tags", &rows).await
    }

    async fn create_review(&self, review: &NewReview) -> RepositoryResult<()> {
        self.insert("reviews", review).await
    }

    async fn create_quote_request(&self, request: &NewQuoteRequest) -> RepositoryResult<()> {
        self.insert("quote_requests", request).await
    }

    async fn create_contact_message(&self, message: &NewContactMessage) -> RepositoryResult<()> {
        self.insert("contact_messages", message).await
    }
}

impl FeatureFlagReader for HttpRepository {
    async fn fetch_feature_flag(&self, flag: FeatureFlag) -> RepositoryResult<bool> {
        let response = self
            .client
            .get(self.url(&format!("/api/feature-flags/{flag}")))
            .send()
            .await?;
        let body = ensure_success(response).await?.text().await?;
        let state: FeatureFlagState = serde_json::from_str(&body)?;
        Ok(state.enabled)
    }
}
