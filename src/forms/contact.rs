use serde::Deserialize;
use validator::Validate;

use crate::domain::supplier::NewContactMessage;
use crate::domain::types::SupplierId;
use crate::forms::{FormError, optional_text, validate_phone};

#[derive(Debug, Deserialize, Validate)]
/// Form data for a message to a supplier or to the directory itself.
pub struct ContactForm {
    #[validate(length(
        min = 2,
        max = 200,
        message = "Name must be between 2 and 200 characters"
    ))]
    pub name: String,
    #[validate(email(message = "Please enter a valid email address"))]
    pub email: String,
    #[validate(length(max = 200))]
    pub company: Option<String>,
    #[validate(custom(function = "validate_phone"))]
    pub phone: Option<String>,
    #[validate(length(max = 200))]
    pub subject: Option<String>,
    #[validate(length(
        min = 10,
        max = 2000,
        message = "Message must be between 10 and 2000 characters"
    ))]
    pub message: String,
}

impl ContactForm {
    pub fn into_message(self, supplier_id: Option<SupplierId>) -> Result<NewContactMessage, FormError> {
        self.validate()?;

        let source = if supplier_id.is_some() {
            "supplier_page"
        } else {
            "contact_page"
        };

        Ok(NewContactMessage {
            supplier_id,
            name: self.name.trim().to_string(),
            email: self.email.trim().to_lowercase(),
            company: optional_text(self.company),
            phone: optional_text(self.phone),
            subject: optional_text(self.subject),
            message: self.message.trim().to_string(),
            source,
        })
    }
}
