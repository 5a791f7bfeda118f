use crate::domain::supplier::{NewSupplier, SubmittedSupplier};
use crate::domain::types::{SupplierId, SupplierSlug};
use crate::forms::supplier::SubmitSupplierForm;
use crate::repository::{SupplierReader, SupplierWriter};
use crate::services::{ServiceError, ServiceResult};

/// Numbered suffixes tried before a submission is refused.
const MAX_SLUG_SUFFIX: usize = 100;

/// Returns `base` or the first free `base-N`.
pub async fn unique_slug<R>(repo: &R, base: &SupplierSlug) -> ServiceResult<SupplierSlug>
where
    R: SupplierReader + ?Sized,
{
    if !repo.slug_exists(base).await? {
        return Ok(base.clone());
    }

    for n in 1..=MAX_SLUG_SUFFIX {
        let candidate = base.with_suffix(n);
        if !repo.slug_exists(&candidate).await? {
            return Ok(candidate);
        }
    }

    Err(ServiceError::Conflict(format!(
        "no free slug left for {base}"
    )))
}

/// Validates a public submission and stores it as a pending supplier.
///
/// Tags are attached afterwards; failing to store them does not undo the
/// submission.
pub async fn submit_supplier<R>(repo: &R, form: SubmitSupplierForm) -> ServiceResult<SubmittedSupplier>
where
    R: SupplierReader + SupplierWriter + ?Sized,
{
    let new_supplier = NewSupplier::try_from(form).map_err(|err| {
        log::warn!("Rejected supplier submission: {err}");
        err
    })?;

    let slug = unique_slug(repo, &new_supplier.slug).await.map_err(|err| {
        log::error!("Failed to reserve slug {}: {err}", new_supplier.slug);
        err
    })?;
    let new_supplier = new_supplier.with_slug(slug);

    let created = repo.create_supplier(&new_supplier).await.map_err(|err| {
        log::error!("Failed to create supplier {}: {err}", new_supplier.name);
        err
    })?;

    let supplier_id = SupplierId::new(created.id.clone())?;
    if let Err(err) = repo.attach_tags(&supplier_id, &new_supplier.tags).await {
        log::error!("Failed to attach tags to supplier {supplier_id}: {err}");
    }

    log::info!(
        "Supplier {} submitted as {}",
        created.name,
        new_supplier.slug
    );
    Ok(created)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::supplier::SupplierStatus;
    use crate::forms::supplier::tests::valid_form;
    use crate::repository::test::TestRepository;

    #[actix_web::test]
    async fn submission_is_pending_with_base_slug() {
        let repo = TestRepository::new();

        let created = submit_supplier(&repo, valid_form()).await.unwrap();

        assert_eq!(created.status, SupplierStatus::Pending);
        let stored = repo.created_suppliers.borrow();
        assert_eq!(stored[0].slug.as_str(), "acme-removals");
        assert_eq!(stored[0].status, SupplierStatus::Pending);
    }

    #[actix_web::test]
    async fn taken_slugs_get_numbered_suffix() {
        let repo = TestRepository::new()
            .with_taken_slug("acme-removals")
            .with_taken_slug("acme-removals-1");

        submit_supplier(&repo, valid_form()).await.unwrap();
        submit_supplier(&repo, valid_form()).await.unwrap();

        let slugs: Vec<_> = repo
            .created_suppliers
            .borrow()
            .iter()
            .map(|s| s.slug.as_str().to_string())
            .collect();
        assert_eq!(slugs, vec!["acme-removals-2", "acme-removals-3"]);
    }

    #[actix_web::test]
    async fn tags_are_attached_to_the_new_supplier() {
        let repo = TestRepository::new();
        let mut form = valid_form();
        form.tags = vec!["Removals".to_string(), "Storage".to_string()];

        let created = submit_supplier(&repo, form).await.unwrap();

        let attached = repo.attached_tags.borrow();
        assert_eq!(attached[0].0, created.id);
        assert_eq!(attached[0].1, vec!["Removals", "Storage"]);
    }

    #[actix_web::test]
    async fn tag_failure_keeps_submission() {
        let repo = TestRepository::new();
        repo.fail_tags.set(true);

        assert!(submit_supplier(&repo, valid_form()).await.is_ok());
        assert_eq!(repo.created_suppliers.borrow().len(), 1);
    }

    #[actix_web::test]
    async fn invalid_form_never_reaches_backend() {
        let repo = TestRepository::new();
        let mut form = valid_form();
        form.contact_email = "not-an-email".to_string();

        let result = submit_supplier(&repo, form).await;

        assert!(matches!(result, Err(ServiceError::Form(_))));
        assert!(repo.created_suppliers.borrow().is_empty());
    }
}
