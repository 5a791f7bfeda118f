use serde::Deserialize;
use validator::Validate;

use crate::domain::supplier::NewReview;
use crate::domain::types::{Rating, SupplierId};
use crate::forms::{FormError, optional_text};

#[derive(Debug, Deserialize, Validate)]
/// Form data for reviewing a supplier.
pub struct ReviewForm {
    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    pub rating: u8,
    #[validate(length(max = 100, message = "Title too long"))]
    pub title: Option<String>,
    #[validate(length(
        min = 10,
        max = 1000,
        message = "Review must be between 10 and 1000 characters"
    ))]
    pub content: String,
    #[validate(length(max = 200))]
    pub company_name: Option<String>,
}

impl ReviewForm {
    /// Validates the form and binds it to the reviewed supplier.
    pub fn into_review(self, supplier_id: SupplierId) -> Result<NewReview, FormError> {
        self.validate()?;

        let rating = Rating::new(self.rating).map_err(|_| FormError::InvalidRating)?;

        Ok(NewReview {
            supplier_id,
            rating,
            title: optional_text(self.title),
            content: self.content.trim().to_string(),
            company_name: optional_text(self.company_name),
        })
    }
}
