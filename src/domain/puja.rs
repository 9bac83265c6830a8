//! Puja definitions (edited through the multi-tab editor) and puja bookings.

use std::borrow::Cow;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::domain::types::{BookingId, PujaId};
use crate::status::PaymentStatus;

/// Rejects lists containing blank entries.
fn entries_not_blank(items: &[String]) -> Result<(), ValidationError> {
    if items.iter().any(|item| item.trim().is_empty()) {
        let mut err = ValidationError::new("blank_entry");
        err.message = Some(Cow::Borrowed("Entries cannot be empty"));
        return Err(err);
    }
    Ok(())
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, Validate, PartialEq)]
pub struct BasicInfo {
    #[validate(length(min = 3, max = 120, message = "Title must be 3 to 120 characters"))]
    pub title: String,
    #[validate(length(min = 1, message = "Temple is required"))]
    pub temple: String,
    #[validate(length(min = 1, message = "Location is required"))]
    pub location: String,
    pub date: Option<NaiveDate>,
    #[validate(url(message = "Image must be a valid URL"))]
    pub image_url: String,
    #[validate(length(min = 10, max = 300, message = "Summary must be 10 to 300 characters"))]
    pub short_description: String,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, Validate, PartialEq)]
pub struct Details {
    #[validate(length(min = 20, message = "Description must be at least 20 characters"))]
    pub description: String,
    #[validate(length(min = 1, message = "Significance is required"))]
    pub significance: String,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, Validate, PartialEq)]
pub struct Benefit {
    #[validate(length(min = 1, message = "Benefit title is required"))]
    pub title: String,
    #[validate(length(min = 1, message = "Benefit description is required"))]
    pub description: String,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, Validate, PartialEq)]
pub struct Benefits {
    #[validate(length(min = 1, message = "Add at least one benefit"), nested)]
    pub items: Vec<Benefit>,
}

/// Bullet list tab ("who should book", "why perform").
#[derive(Clone, Debug, Default, Serialize, Deserialize, Validate, PartialEq)]
pub struct BulletList {
    #[validate(
        length(min = 1, message = "Add at least one entry"),
        custom(function = "entries_not_blank")
    )]
    pub items: Vec<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, Validate, PartialEq)]
pub struct Package {
    #[validate(length(min = 1, message = "Package name is required"))]
    pub name: String,
    #[validate(range(min = 1, message = "Price must be positive"))]
    pub price: u32,
    #[validate(range(min = 1, max = 10, message = "Persons must be between 1 and 10"))]
    pub persons: u8,
    pub description: String,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, Validate, PartialEq)]
pub struct Packages {
    #[validate(length(min = 1, message = "Add at least one package"), nested)]
    pub items: Vec<Package>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, Validate, PartialEq)]
pub struct Testimonial {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "Testimonial text is required"))]
    pub text: String,
    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    pub rating: u8,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, Validate, PartialEq)]
pub struct Testimonials {
    #[validate(nested)]
    pub items: Vec<Testimonial>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, Validate, PartialEq)]
pub struct Faq {
    #[validate(length(min = 1, message = "Question is required"))]
    pub question: String,
    #[validate(length(min = 1, message = "Answer is required"))]
    pub answer: String,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, Validate, PartialEq)]
pub struct Faqs {
    #[validate(nested)]
    pub items: Vec<Faq>,
}

/// Full puja definition as assembled by the editor.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct PujaDraft {
    /// Present when editing an existing puja.
    pub id: Option<PujaId>,
    pub basic: BasicInfo,
    pub details: Details,
    pub benefits: Benefits,
    pub who_should_book: BulletList,
    pub why_perform: BulletList,
    pub packages: Packages,
    pub testimonials: Testimonials,
    pub faqs: Faqs,
}

impl PujaDraft {
    /// Returns a copy with rich text fields passed through the HTML sanitizer.
    pub fn sanitized(&self) -> Self {
        let mut draft = self.clone();
        draft.details.description = ammonia::clean(&draft.details.description);
        draft.details.significance = ammonia::clean(&draft.details.significance);
        for benefit in &mut draft.benefits.items {
            benefit.description = ammonia::clean(&benefit.description);
        }
        for faq in &mut draft.faqs.items {
            faq.answer = ammonia::clean(&faq.answer);
        }
        draft
    }
}

/// Person on whose behalf the ritual is performed.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct SankalpPerson {
    pub name: String,
    pub gotra: Option<String>,
    pub family_members: Vec<String>,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct DeliveryAddress {
    pub line: String,
    pub city: String,
    pub state: String,
    pub pincode: String,
    pub phone: Option<String>,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct BookedPuja {
    pub title: String,
    pub date: Option<NaiveDate>,
    pub package_name: Option<String>,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct BookingPayment {
    pub amount: f64,
    pub transaction_id: Option<String>,
}

/// A customer's booking of a puja.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct PujaBooking {
    pub id: BookingId,
    pub puja: BookedPuja,
    pub sankalp: SankalpPerson,
    pub delivery_address: Option<DeliveryAddress>,
    pub payment: BookingPayment,
    pub payment_status: PaymentStatus,
    pub created_at: NaiveDateTime,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bullet_list_rejects_blank_entries() {
        let list = BulletList {
            items: vec!["Students".to_string(), "  ".to_string()],
        };
        assert!(list.validate().is_err());

        let empty = BulletList::default();
        assert!(empty.validate().is_err());

        let ok = BulletList {
            items: vec!["Students".to_string()],
        };
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn sanitized_strips_scripts() {
        let mut draft = PujaDraft::default();
        draft.details.description = "<p>Peace</p><script>alert(1)</script>".to_string();

        let clean = draft.sanitized();

        assert_eq!(clean.details.description, "<p>Peace</p>");
    }
}
