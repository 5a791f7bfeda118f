use serde::Deserialize;
use validator::Validate;

use crate::domain::supplier::NewQuoteRequest;
use crate::domain::types::SupplierId;
use crate::forms::{FormError, optional_text, validate_phone};

/// Source tag recorded with requests coming through the directory.
pub const QUOTE_SOURCE: &str = "directory";

#[derive(Debug, Deserialize, Validate)]
/// Form data for requesting a quote from a supplier.
pub struct QuoteRequestForm {
    #[validate(length(
        min = 2,
        max = 100,
        message = "Name must be between 2 and 100 characters"
    ))]
    pub requester_name: String,
    #[validate(email(message = "Please enter a valid email address"))]
    pub requester_email: String,
    #[validate(length(max = 200))]
    pub company_name: Option<String>,
    #[validate(custom(function = "validate_phone"))]
    pub phone: Option<String>,
    #[validate(length(max = 100))]
    pub service_type: Option<String>,
    #[validate(length(max = 100))]
    pub budget_range: Option<String>,
    #[validate(length(max = 100))]
    pub timeline: Option<String>,
    #[validate(length(max = 200))]
    pub location: Option<String>,
    #[validate(length(
        min = 10,
        max = 2000,
        message = "Message must be between 10 and 2000 characters"
    ))]
    pub message: String,
}

impl QuoteRequestForm {
    pub fn into_quote_request(self, supplier_id: SupplierId) -> Result<NewQuoteRequest, FormError> {
        self.validate()?;

        Ok(NewQuoteRequest {
            supplier_id,
            requester_name: self.requester_name.trim().to_string(),
            requester_email: self.requester_email.trim().to_lowercase(),
            company_name: optional_text(self.company_name),
            phone: optional_text(self.phone),
            service_type: optional_text(self.service_type),
            budget_range: optional_text(self.budget_range),
            timeline: optional_text(self.timeline),
            location: optional_text(self.location),
            message: self.message.trim().to_string(),
            source: QUOTE_SOURCE,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> QuoteRequestForm {
        QuoteRequestForm {
            requester_name: "Jo Bloggs".to_string(),
            requester_email: "jo@example.com".to_string(),
            company_name: None,
            phone: Some("07700 900123".to_string()),
            service_type: Some("Office move".to_string()),
            budget_range: None,
            timeline: Some("".to_string()),
            location: None,
            message: "Moving a 20 desk office in March.".to_string(),
        }
    }

    #[test]
    fn valid_request_is_accepted() {
        let request = form()
            .into_quote_request(SupplierId::new("s-1").unwrap())
            .unwrap();

        assert_eq!(request.timeline, None);
        assert_eq!(request.source, QUOTE_SOURCE);
    }

    #[test]
    fn invalid_phone_and_email_are_reported() {
        let mut form = form();
        form.phone = Some("ring me".to_string());
        form.requester_email = "jo".to_string();

        let err = form
            .into_quote_request(SupplierId::new("s-1").unwrap())
            .unwrap_err();
        let fields: Vec<String> = err.field_errors().into_iter().map(|(f, _)| f).collect();

        assert_eq!(fields, vec!["phone", "requester_email"]);
    }
}
