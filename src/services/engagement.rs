//! Reviews, quote requests and contact messages.

use crate::domain::feature_flag::FeatureFlag;
use crate::domain::supplier::Supplier;
use crate::domain::types::SupplierId;
use crate::forms::contact::ContactForm;
use crate::forms::quote::QuoteRequestForm;
use crate::forms::review::ReviewForm;
use crate::repository::{FeatureFlagReader, SupplierReader, SupplierWriter};
use crate::services::feature_flags::FeatureFlagCache;
use crate::services::suppliers::find_supplier;
use crate::services::{ServiceError, ServiceResult};

async fn require_flag<R>(repo: &R, flags: &FeatureFlagCache, flag: FeatureFlag) -> ServiceResult<()>
where
    R: FeatureFlagReader + ?Sized,
{
    if flags.is_enabled(repo, flag).await {
        Ok(())
    } else {
        Err(ServiceError::FeatureDisabled(flag))
    }
}

/// Stores a review for the supplier at `slug` and returns that supplier.
pub async fn leave_review<R>(
    repo: &R,
    flags: &FeatureFlagCache,
    slug: &str,
    form: ReviewForm,
) -> ServiceResult<Supplier>
where
    R: SupplierReader + SupplierWriter + FeatureFlagReader + ?Sized,
{
    require_flag(repo, flags, FeatureFlag::ReviewsSystem).await?;
    let supplier = find_supplier(repo, slug).await?;

    let review = form.into_review(SupplierId::new(supplier.id.clone())?)?;
    repo.create_review(&review).await.map_err(|err| {
        log::error!("Failed to store review for {slug}: {err}");
        err
    })?;

    Ok(supplier)
}

pub async fn request_quote<R>(
    repo: &R,
    flags: &FeatureFlagCache,
    slug: &str,
    form: QuoteRequestForm,
) -> ServiceResult<Supplier>
where
    R: SupplierReader + SupplierWriter + FeatureFlagReader + ?Sized,
{
    require_flag(repo, flags, FeatureFlag::QuoteRequests).await?;
    let supplier = find_supplier(repo, slug).await?;
    if !supplier.accepts_quotes {
        return Err(ServiceError::Conflict(format!(
            "{} does not accept quote requests",
            supplier.name
        )));
    }

    let request = form.into_quote_request(SupplierId::new(supplier.id.clone())?)?;
    repo.create_quote_request(&request).await.map_err(|err| {
        log::error!("Failed to store quote request for {slug}: {err}");
        err
    })?;

    Ok(supplier)
}

/// Sends a message to the supplier at `slug`, or to the directory team when
/// no slug is given.
pub async fn contact_supplier<R>(repo: &R, slug: Option<&str>, form: ContactForm) -> ServiceResult<()>
where
    R: SupplierReader + SupplierWriter + ?Sized,
{
    let supplier_id = match slug {
        Some(slug) => {
            let supplier = find_supplier(repo, slug).await?;
            Some(SupplierId::new(supplier.id)?)
        }
        None => None,
    };

    let message = form.into_message(supplier_id)?;
    repo.create_contact_message(&message).await.map_err(|err| {
        log::error!("Failed to store contact message: {err}");
        err
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::test::{TestRepository, supplier};

    fn review_form() -> ReviewForm {
        ReviewForm {
            rating: 5,
            title: Some("Great".to_string()),
            content: "Moved our office over a weekend.".to_string(),
            company_name: None,
        }
    }

    fn quote_form() -> QuoteRequestForm {
        QuoteRequestForm {
            requester_name: "Sam Patel".to_string(),
            requester_email: "sam@example.com".to_string(),
            company_name: None,
            phone: None,
            service_type: Some("Office move".to_string()),
            budget_range: None,
            timeline: None,
            location: Some("Leeds".to_string()),
            message: "Twenty desks, second floor, no lift.".to_string(),
        }
    }

    #[actix_web::test]
    async fn review_is_stored_when_enabled() {
        let repo = TestRepository::new()
            .with_supplier(supplier("s-1", "acme"))
            .with_flag(FeatureFlag::ReviewsSystem, true);
        let flags = FeatureFlagCache::new();

        let reviewed = leave_review(&repo, &flags, "acme", review_form())
            .await
            .unwrap();

        assert_eq!(reviewed.id, "s-1");
        let reviews = repo.reviews.borrow();
        assert_eq!(reviews[0].supplier_id.as_str(), "s-1");
        assert_eq!(reviews[0].rating.get(), 5);
    }

    #[actix_web::test]
    async fn reviews_are_gated_by_flag() {
        let repo = TestRepository::new()
            .with_supplier(supplier("s-1", "acme"))
            .with_flag(FeatureFlag::ReviewsSystem, false);
        let flags = FeatureFlagCache::new();

        let result = leave_review(&repo, &flags, "acme", review_form()).await;

        assert!(matches!(
            result,
            Err(ServiceError::FeatureDisabled(FeatureFlag::ReviewsSystem))
        ));
        assert!(repo.reviews.borrow().is_empty());
    }

    #[actix_web::test]
    async fn quote_requires_accepting_supplier() {
        let mut closed = supplier("s-2", "closed");
        closed.accepts_quotes = false;
        let repo = TestRepository::new()
            .with_supplier(supplier("s-1", "acme"))
            .with_supplier(closed)
            .with_flag(FeatureFlag::QuoteRequests, true);
        let flags = FeatureFlagCache::new();

        request_quote(&repo, &flags, "acme", quote_form())
            .await
            .unwrap();
        let refused = request_quote(&repo, &flags, "closed", quote_form()).await;

        assert!(matches!(refused, Err(ServiceError::Conflict(_))));
        let requests = repo.quote_requests.borrow();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].source, "directory");
    }

    #[actix_web::test]
    async fn invalid_quote_is_not_sent() {
        let repo = TestRepository::new()
            .with_supplier(supplier("s-1", "acme"))
            .with_flag(FeatureFlag::QuoteRequests, true);
        let flags = FeatureFlagCache::new();
        let mut form = quote_form();
        form.message = "short".to_string();

        let result = request_quote(&repo, &flags, "acme", form).await;

        assert!(matches!(result, Err(ServiceError::Form(_))));
        assert!(repo.quote_requests.borrow().is_empty());
    }

    #[actix_web::test]
    async fn contact_to_unknown_supplier_is_not_found() {
        let repo = TestRepository::new();
        let form = ContactForm {
            name: "Jo Bloggs".to_string(),
            email: "jo@example.com".to_string(),
            company: None,
            phone: None,
            subject: None,
            message: "Please call me back tomorrow.".to_string(),
        };

        let result = contact_supplier(&repo, Some("ghost"), form).await;

        assert!(matches!(result, Err(ServiceError::NotFound)));
        assert!(repo.contact_messages.borrow().is_empty());
    }
}
