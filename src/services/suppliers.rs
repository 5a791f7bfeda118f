use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use crate::domain::feature_flag::FeatureFlag;
use crate::domain::filter::Filter;
use crate::domain::supplier::Supplier;
use crate::dto::suppliers::{PageLink, SupplierPageData, SuppliersApiResponse, SuppliersPageData};
use crate::forms::filters;
use crate::pagination::Paginated;
use crate::repository::listing::{
    ListingOutcome, ListingSequencer, build_request, interpret_response,
};
use crate::repository::{FeatureFlagReader, SupplierReader};
use crate::services::feature_flags::FeatureFlagCache;
use crate::services::{ServiceError, ServiceResult};

/// Visitors tracked before the registry starts over.
const MAX_TRACKED_VISITORS: usize = 10_000;
/// Suppliers shown under "Related suppliers" on a profile.
pub const MAX_RELATED_SUPPLIERS: usize = 4;

/// Fetches and interprets one page of the listing. Transport failures are
/// folded into the outcome just like `success: false` responses.
pub async fn fetch_listing<R>(repo: &R, filter: &Filter) -> ListingOutcome
where
    R: SupplierReader + ?Sized,
{
    let request = build_request(filter);

    match repo.fetch_listing(&request).await {
        Ok(body) => {
            let outcome = interpret_response(&body);
            if let Some(err) = &outcome.error {
                log::error!("Listing request {} failed: {err}", request.query);
            }
            outcome
        }
        Err(err) => {
            log::error!("Failed to fetch suppliers: {err}");
            ListingOutcome::failed(err.to_string())
        }
    }
}

/// Loads the supplier listing page for a decoded filter.
pub async fn load_suppliers_page<R>(repo: &R, filter: Filter) -> SuppliersPageData
where
    R: SupplierReader + ?Sized,
{
    let outcome = fetch_listing(repo, &filter).await;
    page_data(filter, outcome)
}

fn page_data(filter: Filter, outcome: ListingOutcome) -> SuppliersPageData {
    let error = outcome.error.map(|err| err.message);
    let suppliers = Paginated::new(outcome.items, outcome.pagination);

    let page_links = suppliers
        .pages
        .iter()
        .map(|token| PageLink {
            page: *token,
            query: token
                .map(|page| filters::encode_page(&filter, page))
                .unwrap_or_default(),
            current: *token == Some(suppliers.page),
        })
        .collect();

    let meta = suppliers.pagination;
    let prev_query = (meta.has_prev && suppliers.page > 1)
        .then(|| filters::encode_page(&filter, suppliers.page - 1));
    let next_query = (meta.has_next && suppliers.page < meta.total_pages)
        .then(|| filters::encode_page(&filter, suppliers.page + 1));

    SuppliersPageData {
        retry_query: filters::encode(&filter),
        clear_query: filters::encode(&filter.cleared()),
        active_filters: filter.active_count(),
        filter,
        suppliers,
        page_links,
        prev_query,
        next_query,
        error,
    }
}

/// Per-visitor [`ListingSequencer`]s for the JSON listing endpoint.
///
/// A visitor firing several listing requests in a row only receives the
/// result of the most recent one; overtaken requests resolve to `None`.
#[derive(Debug, Default)]
pub struct ListingSequencers {
    by_visitor: RwLock<HashMap<String, Arc<ListingSequencer>>>,
}

impl ListingSequencers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn for_visitor(&self, visitor: &str) -> Arc<ListingSequencer> {
        if let Some(sequencer) = self
            .by_visitor
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(visitor)
        {
            return Arc::clone(sequencer);
        }

        let mut by_visitor = self
            .by_visitor
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        if by_visitor.len() >= MAX_TRACKED_VISITORS && !by_visitor.contains_key(visitor) {
            by_visitor.clear();
        }
        Arc::clone(by_visitor.entry(visitor.to_string()).or_default())
    }
}

/// Serves the JSON listing, discarding the result when a newer request
/// from the same visitor was issued while this one was in flight.
pub async fn load_suppliers_api<R>(
    repo: &R,
    sequencer: &ListingSequencer,
    filter: Filter,
) -> Option<SuppliersApiResponse>
where
    R: SupplierReader + ?Sized,
{
    let ticket = sequencer.issue();
    let outcome = fetch_listing(repo, &filter).await;
    let outcome = sequencer.accept(ticket, outcome)?;

    Some(SuppliersApiResponse {
        success: outcome.error.is_none(),
        data: outcome.items,
        pagination: outcome.pagination,
        error: outcome.error.map(|err| err.message),
    })
}

/// Looks up an approved supplier by slug.
pub async fn find_supplier<R>(repo: &R, slug: &str) -> ServiceResult<Supplier>
where
    R: SupplierReader + ?Sized,
{
    repo.get_supplier_by_slug(slug)
        .await
        .map_err(|err| {
            log::error!("Failed to load supplier {slug}: {err}");
            ServiceError::from(err)
        })?
        .ok_or(ServiceError::NotFound)
}

/// Other suppliers in the same category, excluding `supplier` itself.
///
/// Asks the listing for a couple of extra rows so that dropping the current
/// supplier still leaves a full row. A failed listing yields no suggestions.
pub async fn related_suppliers<R>(repo: &R, supplier: &Supplier) -> Vec<Supplier>
where
    R: SupplierReader + ?Sized,
{
    let Some(category) = supplier
        .category_id
        .as_deref()
        .filter(|category| !category.is_empty())
    else {
        return Vec::new();
    };

    let filter = Filter::new()
        .category(category)
        .limit(MAX_RELATED_SUPPLIERS + 2);

    fetch_listing(repo, &filter)
        .await
        .items
        .into_iter()
        .filter(|candidate| candidate.id != supplier.id)
        .take(MAX_RELATED_SUPPLIERS)
        .collect()
}

/// Loads a supplier profile together with its reviews, related suppliers
/// and the engagement features enabled for it.
pub async fn load_supplier_page<R>(
    repo: &R,
    flags: &FeatureFlagCache,
    slug: &str,
) -> ServiceResult<SupplierPageData>
where
    R: SupplierReader + FeatureFlagReader + ?Sized,
{
    let profile = repo
        .get_supplier_profile(slug)
        .await
        .map_err(|err| {
            log::error!("Failed to load supplier profile {slug}: {err}");
            ServiceError::from(err)
        })?
        .ok_or(ServiceError::NotFound)?
        .newest_reviews_first();

    let reviews_enabled = flags.is_enabled(repo, FeatureFlag::ReviewsSystem).await;
    let quotes_enabled = profile.supplier.accepts_quotes
        && flags.is_enabled(repo, FeatureFlag::QuoteRequests).await;
    let related = related_suppliers(repo, &profile.supplier).await;

    Ok(SupplierPageData {
        supplier: profile.supplier,
        reviews: if reviews_enabled { profile.reviews } else { Vec::new() },
        related,
        reviews_enabled,
        quotes_enabled,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::supplier::{Review, SupplierProfile};
    use crate::domain::types::{Rating, SupplierSlug};
    use crate::repository::errors::RepositoryResult;
    use crate::repository::listing::ListingRequest;
    use crate::repository::test::{TestRepository, supplier};

    const TWO_PAGES: &str = r#"{
        "success": true,
        "data": [{"id": "a", "name": "Acme", "slug": "acme"}],
        "pagination": {"page": 2, "limit": 12, "total": 30}
    }"#;

    #[actix_web::test]
    async fn listing_page_links_keep_filters() {
        let repo = TestRepository::new().with_listing(TWO_PAGES);
        let filter = Filter::new().search("CRM").page(2);

        let data = load_suppliers_page(&repo, filter).await;

        assert_eq!(
            repo.listing_requests.borrow()[0].query,
            "search=CRM&page=2&limit=12"
        );
        assert!(data.error.is_none());
        assert_eq!(data.suppliers.items.len(), 1);
        assert_eq!(data.suppliers.pagination.total_pages, 3);
        assert_eq!(data.prev_query.as_deref(), Some("search=CRM&page=1"));
        assert_eq!(data.next_query.as_deref(), Some("search=CRM&page=3"));
        assert_eq!(data.page_links.len(), 3);
        assert!(data.page_links[1].current);
        assert_eq!(data.active_filters, 1);
        assert_eq!(data.clear_query, "");
    }

    #[actix_web::test]
    async fn unreachable_backend_renders_empty_state() {
        let repo = TestRepository::new();
        let filter = Filter::new().rating(Rating::new(4).unwrap());

        let data = load_suppliers_page(&repo, filter).await;

        assert!(data.error.is_some());
        assert!(data.suppliers.items.is_empty());
        assert!(data.page_links.is_empty());
        assert_eq!(data.suppliers.pagination.total, 0);
        assert_eq!(data.retry_query, "rating=4");
        assert_eq!(repo.listing_requests.borrow().len(), 1);
    }

    #[actix_web::test]
    async fn failed_envelope_is_reported() {
        let repo = TestRepository::new().with_listing(r#"{"success": false, "error": "db down"}"#);

        let data = load_suppliers_page(&repo, Filter::default()).await;

        assert_eq!(data.error.as_deref(), Some("db down"));
        assert!(data.prev_query.is_none());
        assert!(data.next_query.is_none());
    }

    #[actix_web::test]
    async fn api_response_mirrors_envelope() {
        let repo = TestRepository::new().with_listing(TWO_PAGES);
        let sequencer = ListingSequencer::new();

        let response = load_suppliers_api(&repo, &sequencer, Filter::default())
            .await
            .unwrap();

        assert!(response.success);
        assert_eq!(response.pagination.page, 2);
        assert!(response.pagination.has_next);
    }

    /// Issues a newer ticket while its own listing call is in flight.
    struct OvertakingRepository<'a> {
        inner: TestRepository,
        sequencer: &'a ListingSequencer,
    }

    impl SupplierReader for OvertakingRepository<'_> {
        async fn fetch_listing(&self, request: &ListingRequest) -> RepositoryResult<String> {
            self.sequencer.issue();
            self.inner.fetch_listing(request).await
        }

        async fn get_supplier_by_slug(&self, slug: &str) -> RepositoryResult<Option<Supplier>> {
            self.inner.get_supplier_by_slug(slug).await
        }

        async fn get_supplier_profile(
            &self,
            slug: &str,
        ) -> RepositoryResult<Option<SupplierProfile>> {
            self.inner.get_supplier_profile(slug).await
        }

        async fn list_suppliers_by_ids(&self, ids: &[String]) -> RepositoryResult<Vec<Supplier>> {
            self.inner.list_suppliers_by_ids(ids).await
        }

        async fn slug_exists(&self, slug: &SupplierSlug) -> RepositoryResult<bool> {
            self.inner.slug_exists(slug).await
        }
    }

    #[actix_web::test]
    async fn api_drops_overtaken_request() {
        let sequencer = ListingSequencer::new();
        let repo = OvertakingRepository {
            inner: TestRepository::new().with_listing(TWO_PAGES),
            sequencer: &sequencer,
        };

        let response = load_suppliers_api(&repo, &sequencer, Filter::new().search("a")).await;

        assert!(response.is_none());
    }

    #[test]
    fn visitors_get_independent_sequencers() {
        let registry = ListingSequencers::new();

        let first = registry.for_visitor("v1");
        let again = registry.for_visitor("v1");
        let other = registry.for_visitor("v2");

        assert!(Arc::ptr_eq(&first, &again));
        assert!(!Arc::ptr_eq(&first, &other));
    }

    #[actix_web::test]
    async fn supplier_page_respects_flags() {
        let repo = TestRepository::new()
            .with_supplier(supplier("s-1", "acme"))
            .with_flag(FeatureFlag::ReviewsSystem, true)
            .with_flag(FeatureFlag::QuoteRequests, false);
        let flags = FeatureFlagCache::new();

        let data = load_supplier_page(&repo, &flags, "acme").await.unwrap();

        assert!(data.reviews_enabled);
        assert!(!data.quotes_enabled);
    }

    #[actix_web::test]
    async fn unknown_slug_is_not_found() {
        let repo = TestRepository::new();
        let flags = FeatureFlagCache::new();

        let result = load_supplier_page(&repo, &flags, "missing").await;

        assert!(matches!(result, Err(ServiceError::NotFound)));
    }

    const SAME_CATEGORY: &str = r#"{
        "success": true,
        "data": [
            {"id": "a", "name": "A", "slug": "a"},
            {"id": "s-1", "name": "Acme", "slug": "acme"},
            {"id": "b", "name": "B", "slug": "b"},
            {"id": "c", "name": "C", "slug": "c"},
            {"id": "d", "name": "D", "slug": "d"},
            {"id": "e", "name": "E", "slug": "e"}
        ],
        "pagination": {"page": 1, "limit": 6, "total": 6}
    }"#;

    fn categorised(id: &str, slug: &str) -> Supplier {
        Supplier {
            category_id: Some("cat-7".to_string()),
            ..supplier(id, slug)
        }
    }

    #[actix_web::test]
    async fn related_suppliers_share_category_and_skip_current() {
        let repo = TestRepository::new().with_listing(SAME_CATEGORY);

        let related = related_suppliers(&repo, &categorised("s-1", "acme")).await;

        let ids: Vec<_> = related.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c", "d"]);
        assert_eq!(
            repo.listing_requests.borrow()[0].query,
            "category=cat-7&page=1&limit=6"
        );
    }

    #[actix_web::test]
    async fn uncategorised_supplier_has_no_related() {
        let repo = TestRepository::new().with_listing(SAME_CATEGORY);

        let related = related_suppliers(&repo, &supplier("s-1", "acme")).await;

        assert!(related.is_empty());
        assert!(repo.listing_requests.borrow().is_empty());
    }

    #[actix_web::test]
    async fn related_lookup_failure_leaves_profile_intact() {
        let repo = TestRepository::new()
            .with_supplier(categorised("s-1", "acme"))
            .with_flag(FeatureFlag::ReviewsSystem, false)
            .with_flag(FeatureFlag::QuoteRequests, false);
        let flags = FeatureFlagCache::new();

        let data = load_supplier_page(&repo, &flags, "acme").await.unwrap();

        assert_eq!(data.supplier.id, "s-1");
        assert!(data.related.is_empty());
    }

    #[actix_web::test]
    async fn profile_shows_reviews_newest_first_when_enabled() {
        let review = |id: &str, day: u32| Review {
            id: id.to_string(),
            rating: 4,
            content: "Turned up on time.".to_string(),
            created_at: chrono::NaiveDate::from_ymd_opt(2024, 5, day)
                .and_then(|date| date.and_hms_opt(9, 0, 0))
                .map(|at| at.and_utc()),
            ..Review::default()
        };
        let repo = TestRepository::new()
            .with_supplier(supplier("s-1", "acme"))
            .with_review("s-1", review("older", 1))
            .with_review("s-1", review("newer", 20))
            .with_review("s-9", review("elsewhere", 10))
            .with_flag(FeatureFlag::ReviewsSystem, true)
            .with_flag(FeatureFlag::QuoteRequests, true);
        let flags = FeatureFlagCache::new();

        let data = load_supplier_page(&repo, &flags, "acme").await.unwrap();

        let ids: Vec<_> = data.reviews.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["newer", "older"]);
    }

    #[actix_web::test]
    async fn reviews_are_hidden_when_disabled() {
        let repo = TestRepository::new()
            .with_supplier(supplier("s-1", "acme"))
            .with_review("s-1", Review::default())
            .with_flag(FeatureFlag::ReviewsSystem, false)
            .with_flag(FeatureFlag::QuoteRequests, true);
        let flags = FeatureFlagCache::new();

        let data = load_supplier_page(&repo, &flags, "acme").await.unwrap();

        assert!(data.reviews.is_empty());
    }
}
