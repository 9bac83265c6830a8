use std::collections::BTreeMap;

use serde::Serialize;

use crate::domain::types::{
    AadharNumber, AstrologerId, Email, IfscCode, PanNumber, PersonName, PhoneNumber, Url,
};

/// Base price of a consultation of the given length.
#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
pub struct ConsultationPrice {
    pub duration_minutes: u32,
    pub price: u32,
}

#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct BankDetails {
    pub account_holder: String,
    pub account_number: String,
    pub bank_name: String,
    pub ifsc: IfscCode,
}

/// Identity documents collected during onboarding.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct Kyc {
    pub pan: PanNumber,
    pub aadhar: AadharNumber,
}

/// Astrologer profile aggregate.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct Astrologer {
    pub id: AstrologerId,
    pub name: PersonName,
    pub email: Email,
    pub phone: Option<PhoneNumber>,
    pub experience_years: u32,
    pub languages: Vec<String>,
    pub bio: String,
    pub image_url: Option<Url>,
    pub skills: Vec<String>,
    pub expertise: Vec<String>,
    pub remedies: Vec<String>,
    pub bank: Option<BankDetails>,
    pub kyc: Option<Kyc>,
    pub prices: Vec<ConsultationPrice>,
    /// Special (promotional) prices keyed by duration minutes.
    pub special_prices: BTreeMap<u32, u32>,
    /// Astrologer-specific first-time-offer prices keyed by duration minutes.
    pub first_time_offer: BTreeMap<u32, u32>,
    pub active: bool,
}

impl Astrologer {
    pub fn base_price(&self, duration_minutes: u32) -> Option<u32> {
        self.prices
            .iter()
            .find(|p| p.duration_minutes == duration_minutes)
            .map(|p| p.price)
    }
}

/// Full profile replacement submitted from the edit screen.
#[derive(Clone, Debug, PartialEq)]
pub struct UpdateAstrologer {
    pub id: AstrologerId,
    pub name: PersonName,
    pub email: Email,
    pub phone: Option<PhoneNumber>,
    pub experience_years: u32,
    pub languages: Vec<String>,
    pub bio: String,
    pub skills: Vec<String>,
    pub expertise: Vec<String>,
    pub remedies: Vec<String>,
    pub bank: Option<BankDetails>,
    pub kyc: Option<Kyc>,
    pub prices: Vec<ConsultationPrice>,
    pub special_prices: BTreeMap<u32, u32>,
    pub first_time_offer: BTreeMap<u32, u32>,
    pub active: bool,
}
