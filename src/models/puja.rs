use serde::{Deserialize, Serialize};

use crate::domain::puja::{
    BasicInfo, Benefit, Benefits, BookedPuja, BookingPayment, BulletList, DeliveryAddress, Details,
    Faq, Faqs, Package, Packages, PujaBooking, PujaDraft, SankalpPerson, Testimonial,
    Testimonials,
};
use crate::domain::types::{BookingId, PujaId, TypeConstraintError};
use crate::models::{non_blank, parse_optional_date, parse_timestamp};

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct BenefitRecord {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct PackageRecord {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub price: u32,
    #[serde(default)]
    pub persons: u8,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct TestimonialRecord {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub rating: u8,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct FaqRecord {
    #[serde(default)]
    pub question: String,
    #[serde(default)]
    pub answer: String,
}

/// Puja definition as read from `get-puja/:id` and sent to `create_puja` /
/// `update-puja/:id`.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PujaRecord {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub temple_name: String,
    #[serde(default)]
    pub location: String,
    pub date: Option<String>,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub short_description: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub significance: String,
    #[serde(default)]
    pub benefits: Vec<BenefitRecord>,
    #[serde(default)]
    pub who_should_book: Vec<String>,
    #[serde(default)]
    pub why_perform: Vec<String>,
    #[serde(default)]
    pub packages: Vec<PackageRecord>,
    #[serde(default)]
    pub testimonials: Vec<TestimonialRecord>,
    #[serde(default)]
    pub faqs: Vec<FaqRecord>,
}

impl TryFrom<PujaRecord> for PujaDraft {
    type Error = TypeConstraintError;

    fn try_from(record: PujaRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            id: non_blank(record.id).map(PujaId::new).transpose()?,
            basic: BasicInfo {
                title: record.title,
                temple: record.temple_name,
                location: record.location,
                date: parse_optional_date(record.date.as_deref())?,
                image_url: record.image,
                short_description: record.short_description,
            },
            details: Details {
                description: record.description,
                significance: record.significance,
            },
            benefits: Benefits {
                items: record
                    .benefits
                    .into_iter()
                    .map(|b| Benefit {
                        title: b.title,
                        description: b.description,
                    })
                    .collect(),
            },
            who_should_book: BulletList {
                items: record.who_should_book,
            },
            why_perform: BulletList {
                items: record.why_perform,
            },
            packages: Packages {
                items: record
                    .packages
                    .into_iter()
                    .map(|p| Package {
                        name: p.name,
                        price: p.price,
                        persons: p.persons,
                        description: p.description,
                    })
                    .collect(),
            },
            testimonials: Testimonials {
                items: record
                    .testimonials
                    .into_iter()
                    .map(|t| Testimonial {
                        name: t.name,
                        text: t.text,
                        rating: t.rating,
                    })
                    .collect(),
            },
            faqs: Faqs {
                items: record
                    .faqs
                    .into_iter()
                    .map(|f| Faq {
                        question: f.question,
                        answer: f.answer,
                    })
                    .collect(),
            },
        })
    }
}

impl From<&PujaDraft> for PujaRecord {
    fn from(draft: &PujaDraft) -> Self {
        Self {
            id: None,
            title: draft.basic.title.trim().to_string(),
            temple_name: draft.basic.temple.trim().to_string(),
            location: draft.basic.location.trim().to_string(),
            date: draft.basic.date.map(|d| d.format("%Y-%m-%d").to_string()),
            image: draft.basic.image_url.trim().to_string(),
            short_description: draft.basic.short_description.trim().to_string(),
            description: draft.details.description.clone(),
            significance: draft.details.significance.clone(),
            benefits: draft
                .benefits
                .items
                .iter()
                .map(|b| BenefitRecord {
                    title: b.title.trim().to_string(),
                    description: b.description.clone(),
                })
                .collect(),
            who_should_book: trimmed(&draft.who_should_book.items),
            why_perform: trimmed(&draft.why_perform.items),
            packages: draft
                .packages
                .items
                .iter()
                .map(|p| PackageRecord {
                    name: p.name.trim().to_string(),
                    price: p.price,
                    persons: p.persons,
                    description: p.description.trim().to_string(),
                })
                .collect(),
            testimonials: draft
                .testimonials
                .items
                .iter()
                .map(|t| TestimonialRecord {
                    name: t.name.trim().to_string(),
                    text: t.text.trim().to_string(),
                    rating: t.rating,
                })
                .collect(),
            faqs: draft
                .faqs
                .items
                .iter()
                .map(|f| FaqRecord {
                    question: f.question.trim().to_string(),
                    answer: f.answer.clone(),
                })
                .collect(),
        }
    }
}

fn trimmed(items: &[String]) -> Vec<String> {
    items.iter().map(|s| s.trim().to_string()).collect()
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PujaDetailsRecord {
    #[serde(default)]
    pub title: String,
    pub date: Option<String>,
    pub package_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SankalpPersonRecord {
    #[serde(default)]
    pub name: String,
    pub gotra: Option<String>,
    #[serde(default)]
    pub family_members: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryAddressRecord {
    #[serde(default)]
    pub address_line: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub pincode: String,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentDetailsRecord {
    #[serde(default)]
    pub amount: f64,
    pub transaction_id: Option<String>,
    pub status: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Wire model for [`crate::domain::puja::PujaBooking`].
pub struct PujaBookingRecord {
    #[serde(rename = "_id")]
    pub id: String,
    pub puja_details: PujaDetailsRecord,
    pub sankalp_person: SankalpPersonRecord,
    pub delivery_address: Option<DeliveryAddressRecord>,
    pub payment_details: PaymentDetailsRecord,
    pub created_at: String,
}

impl TryFrom<PujaBookingRecord> for PujaBooking {
    type Error = TypeConstraintError;

    fn try_from(record: PujaBookingRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            id: BookingId::new(record.id)?,
            puja: BookedPuja {
                title: record.puja_details.title,
                date: parse_optional_date(record.puja_details.date.as_deref())?,
                package_name: non_blank(record.puja_details.package_name),
            },
            sankalp: SankalpPerson {
                name: record.sankalp_person.name.trim().to_string(),
                gotra: non_blank(record.sankalp_person.gotra),
                family_members: record
                    .sankalp_person
                    .family_members
                    .into_iter()
                    .filter(|m| !m.trim().is_empty())
                    .collect(),
            },
            delivery_address: record.delivery_address.map(|a| DeliveryAddress {
                line: a.address_line,
                city: a.city,
                state: a.state,
                pincode: a.pincode,
                phone: non_blank(a.phone),
            }),
            payment_status: record.payment_details.status.parse()?,
            payment: BookingPayment {
                amount: record.payment_details.amount,
                transaction_id: non_blank(record.payment_details.transaction_id),
            },
            created_at: parse_timestamp(&record.created_at)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::PaymentStatus;

    #[test]
    fn puja_record_round_trips_through_the_draft() {
        let record: PujaRecord = serde_json::from_str(
            r#"{
                "_id": "p1",
                "title": "Rudrabhishek",
                "templeName": "Kashi Vishwanath",
                "date": "2026-04-01",
                "benefits": [{"title": "Peace", "description": "Calm"}],
                "whoShouldBook": ["Families"],
                "packages": [{"name": "Solo", "price": 1100, "persons": 1}]
            }"#,
        )
        .unwrap();

        let draft = PujaDraft::try_from(record).unwrap();
        assert_eq!(draft.id.as_ref().unwrap().as_str(), "p1");
        assert_eq!(draft.basic.temple, "Kashi Vishwanath");
        assert!(draft.testimonials.items.is_empty());

        let outgoing = PujaRecord::from(&draft);
        let json = serde_json::to_value(&outgoing).unwrap();
        assert!(json.get("_id").is_none());
        assert_eq!(json["templeName"], "Kashi Vishwanath");
        assert_eq!(json["date"], "2026-04-01");
    }

    #[test]
    fn converts_booking() {
        let record: PujaBookingRecord = serde_json::from_str(
            r#"{
                "_id": "b1",
                "pujaDetails": {"title": "Rudrabhishek", "date": "2026-04-01T00:00:00.000Z"},
                "sankalpPerson": {"name": "Asha", "gotra": "", "familyMembers": ["Ravi", " "]},
                "paymentDetails": {"amount": 1100, "status": "Successful"},
                "createdAt": "2026-03-01T08:00:00Z"
            }"#,
        )
        .unwrap();

        let booking = PujaBooking::try_from(record).unwrap();

        assert_eq!(booking.payment_status, PaymentStatus::Successful);
        assert_eq!(booking.sankalp.gotra, None);
        assert_eq!(booking.sankalp.family_members, vec!["Ravi".to_string()]);
        assert!(booking.delivery_address.is_none());
    }
}
