use serde::Deserialize;
use validator::{Validate, ValidationError};

use crate::domain::supplier::{NewSupplier, SupplierStatus};
use crate::domain::types::{CategoryId, SupplierSlug};
use crate::forms::{
    FormError, optional_text, validate_founded_year, validate_phone, validate_uuid,
};

fn default_true() -> bool {
    true
}

fn validate_tags(tags: &Vec<String>) -> Result<(), ValidationError> {
    if tags.iter().any(|tag| tag.trim().chars().count() > 50) {
        return Err(ValidationError::new("tags").with_message("Tags must be at most 50 characters".into()));
    }
    Ok(())
}

#[derive(Debug, Deserialize, Validate)]
/// Public "list your business" submission.
pub struct SubmitSupplierForm {
    #[validate(length(
        min = 2,
        max = 200,
        message = "Company name must be between 2 and 200 characters"
    ))]
    pub name: String,
    #[validate(custom(function = "validate_uuid"))]
    pub category_id: String,
    #[validate(length(
        min = 50,
        max = 2000,
        message = "Description must be between 50 and 2000 characters"
    ))]
    pub description: String,
    #[validate(length(
        min = 10,
        max = 300,
        message = "Summary must be between 10 and 300 characters"
    ))]
    pub short_summary: String,
    #[validate(url(message = "Please enter a valid website URL"))]
    pub website_url: String,
    #[validate(email(message = "Please enter a valid email address"))]
    pub contact_email: String,
    #[validate(custom(function = "validate_phone"))]
    pub contact_phone: Option<String>,
    #[validate(length(max = 200, message = "Location too long"))]
    pub location: Option<String>,
    #[serde(default)]
    #[validate(length(max = 10, message = "Maximum 10 service areas allowed"))]
    pub service_areas: Vec<String>,
    #[validate(custom(function = "validate_founded_year"))]
    pub founded_year: Option<i32>,
    #[validate(length(max = 50))]
    pub employee_count: Option<String>,
    #[validate(length(max = 100))]
    pub pricing_model: Option<String>,
    #[serde(default)]
    pub has_discount: bool,
    #[validate(length(max = 500))]
    pub discount_description: Option<String>,
    #[validate(length(max = 50))]
    pub discount_code: Option<String>,
    #[serde(default = "default_true")]
    pub accepts_quotes: bool,
    #[serde(default)]
    #[validate(
        length(max = 10, message = "Maximum 10 tags allowed"),
        custom(function = "validate_tags")
    )]
    pub tags: Vec<String>,
}

impl TryFrom<SubmitSupplierForm> for NewSupplier {
    type Error = FormError;

    fn try_from(form: SubmitSupplierForm) -> Result<Self, Self::Error> {
        form.validate()?;

        let category_id =
            CategoryId::parse(&form.category_id).map_err(|_| FormError::InvalidCategory)?;
        let slug = SupplierSlug::from_name(&form.name).map_err(|_| FormError::InvalidName)?;

        let mut tags: Vec<String> = Vec::with_capacity(form.tags.len());
        for tag in form.tags.iter().map(|t| t.trim()).filter(|t| !t.is_empty()) {
            if !tags.iter().any(|existing| existing == tag) {
                tags.push(tag.to_string());
            }
        }

        let service_areas = form
            .service_areas
            .iter()
            .map(|area| area.trim().to_string())
            .filter(|area| !area.is_empty())
            .collect();

        let has_discount = form.has_discount;

        Ok(NewSupplier {
            name: form.name.trim().to_string(),
            slug,
            category_id,
            description: ammonia::clean(form.description.trim()),
            short_summary: form.short_summary.trim().to_string(),
            website_url: form.website_url.trim().to_string(),
            contact_email: form.contact_email.trim().to_lowercase(),
            contact_phone: optional_text(form.contact_phone),
            location: optional_text(form.location),
            service_areas,
            founded_year: form.founded_year,
            employee_count: optional_text(form.employee_count),
            pricing_model: optional_text(form.pricing_model),
            has_discount,
            discount_description: optional_text(form.discount_description)
                .filter(|_| has_discount),
            discount_code: optional_text(form.discount_code).filter(|_| has_discount),
            accepts_quotes: form.accepts_quotes,
            tags,
            status: SupplierStatus::Pending,
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn valid_form() -> SubmitSupplierForm {
        SubmitSupplierForm {
            name: "Acme Removals".to_string(),
            category_id: "2f1b7c3e-2b7a-4e39-9d8e-4d1c9a0b5e11".to_string(),
            description: "Family-run removals company covering the whole of Yorkshire since 1998."
                .to_string(),
            short_summary: "Removals across Yorkshire".to_string(),
            website_url: "https://acme-removals.example.com".to_string(),
            contact_email: "Hello@Acme-Removals.example.com".to_string(),
            contact_phone: Some("0113 496 0000".to_string()),
            location: Some("Leeds".to_string()),
            service_areas: vec!["Leeds".to_string(), " ".to_string()],
            founded_year: Some(1998),
            employee_count: Some("11-25".to_string()),
            pricing_model: None,
            has_discount: false,
            discount_description: Some("10% off".to_string()),
            discount_code: None,
            accepts_quotes: true,
            tags: vec![
                "Packing".to_string(),
                " Storage ".to_string(),
                "Packing".to_string(),
            ],
        }
    }

    #[test]
    fn valid_form_converts_to_pending_supplier() {
        let supplier = NewSupplier::try_from(valid_form()).expect("form should be valid");

        assert_eq!(supplier.slug.as_str(), "acme-removals");
        assert_eq!(supplier.status, SupplierStatus::Pending);
        assert_eq!(supplier.contact_email, "hello@acme-removals.example.com");
        assert_eq!(supplier.tags, vec!["Packing", "Storage"]);
        assert_eq!(supplier.service_areas, vec!["Leeds"]);
        // Discount details are dropped when no discount is offered.
        assert_eq!(supplier.discount_description, None);
    }

    #[test]
    fn short_description_is_reported_per_field() {
        let mut form = valid_form();
        form.description = "Too short".to_string();
        form.contact_email = "not-an-email".to_string();

        let err = NewSupplier::try_from(form).unwrap_err();
        let fields: Vec<String> = err.field_errors().into_iter().map(|(f, _)| f).collect();

        assert_eq!(fields, vec!["contact_email", "description"]);
    }

    #[test]
    fn category_must_be_a_uuid() {
        let mut form = valid_form();
        form.category_id = "removals".to_string();

        let err = NewSupplier::try_from(form).unwrap_err();
        assert!(matches!(err, FormError::Validation(_)));
        assert_eq!(err.field_errors()[0].1, "Please select a category");
    }

    #[test]
    fn too_many_tags_are_rejected() {
        let mut form = valid_form();
        form.tags = (0..11).map(|i| format!("tag-{i}")).collect();

        assert!(NewSupplier::try_from(form).is_err());
    }

    #[test]
    fn description_markup_is_sanitized() {
        let mut form = valid_form();
        form.description = format!(
            "{}<script>alert('x')</script>",
            "We move homes and offices across the north of England, quickly."
        );

        let supplier = NewSupplier::try_from(form).unwrap();
        assert!(!supplier.description.contains("<script>"));
    }

    #[test]
    fn founded_year_is_checked_only_when_given() {
        let mut ancient = valid_form();
        ancient.founded_year = Some(1700);
        let err = NewSupplier::try_from(ancient).unwrap_err();
        assert_eq!(err.field_errors()[0].0, "founded_year");

        let mut unknown = valid_form();
        unknown.founded_year = None;
        assert!(NewSupplier::try_from(unknown).is_ok());
    }

    #[test]
    fn submission_body_with_repeated_keys_parses() {
        let body = "name=Acme+Removals&category_id=2f1b7c3e-2b7a-4e39-9d8e-4d1c9a0b5e11\
            &description=Family-run+removals+company+covering+the+whole+of+Yorkshire+since+1998.\
            &short_summary=Removals+across+Yorkshire&website_url=https%3A%2F%2Facme.example.com\
            &contact_email=hello%40acme.example.com&contact_phone=&founded_year=1998\
            &tags=Packing&tags=Storage&service_areas=Leeds&service_areas=York&accepts_quotes=false";

        let form: SubmitSupplierForm = serde_html_form::from_str(body).unwrap();
        let supplier = NewSupplier::try_from(form).unwrap();

        assert_eq!(supplier.tags, vec!["Packing", "Storage"]);
        assert_eq!(supplier.service_areas, vec!["Leeds", "York"]);
        assert_eq!(supplier.founded_year, Some(1998));
        assert_eq!(supplier.contact_phone, None);
        assert!(!supplier.accepts_quotes);
    }
}
