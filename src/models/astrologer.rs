use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::astrologer::{
    Astrologer, BankDetails, ConsultationPrice, Kyc, UpdateAstrologer,
};
use crate::domain::types::{
    AadharNumber, AstrologerId, Email, IfscCode, PanNumber, PersonName, PhoneNumber,
    TypeConstraintError, Url,
};
use crate::models::non_blank;

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BankDetailsRecord {
    #[serde(default)]
    pub account_holder_name: String,
    #[serde(default)]
    pub account_number: String,
    #[serde(default)]
    pub bank_name: String,
    #[serde(default)]
    pub ifsc_code: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct KycRecord {
    #[serde(default)]
    pub pan_number: String,
    #[serde(default)]
    pub aadhar_number: String,
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq)]
pub struct PriceRecord {
    pub duration: u32,
    pub price: u32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Wire model for [`crate::domain::astrologer::Astrologer`].
pub struct AstrologerRecord {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    #[serde(default)]
    pub experience: u32,
    #[serde(default)]
    pub languages: Vec<String>,
    #[serde(default)]
    pub bio: String,
    pub profile_image: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub expertise: Vec<String>,
    #[serde(default)]
    pub remedies: Vec<String>,
    pub bank_details: Option<BankDetailsRecord>,
    pub kyc: Option<KycRecord>,
    #[serde(default)]
    pub consultation_prices: Vec<PriceRecord>,
    #[serde(default)]
    pub special_pricing: BTreeMap<u32, u32>,
    #[serde(default)]
    pub first_time_offer: BTreeMap<u32, u32>,
    #[serde(default)]
    pub is_active: bool,
}

fn bank_from_record(record: Option<BankDetailsRecord>) -> Result<Option<BankDetails>, TypeConstraintError> {
    match record {
        Some(bank) if !bank.account_number.trim().is_empty() => Ok(Some(BankDetails {
            account_holder: bank.account_holder_name.trim().to_string(),
            account_number: bank.account_number.trim().to_string(),
            bank_name: bank.bank_name.trim().to_string(),
            ifsc: IfscCode::new(bank.ifsc_code)?,
        })),
        _ => Ok(None),
    }
}

fn kyc_from_record(record: Option<KycRecord>) -> Result<Option<Kyc>, TypeConstraintError> {
    match record {
        Some(kyc) if !kyc.pan_number.trim().is_empty() => Ok(Some(Kyc {
            pan: PanNumber::new(kyc.pan_number)?,
            aadhar: AadharNumber::new(kyc.aadhar_number)?,
        })),
        _ => Ok(None),
    }
}

impl TryFrom<AstrologerRecord> for Astrologer {
    type Error = TypeConstraintError;

    fn try_from(record: AstrologerRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            id: AstrologerId::new(record.id)?,
            name: PersonName::new(record.name)?,
            email: Email::new(record.email)?,
            phone: non_blank(record.phone).map(PhoneNumber::new).transpose()?,
            experience_years: record.experience,
            languages: record.languages,
            bio: record.bio,
            image_url: non_blank(record.profile_image).map(Url::new).transpose()?,
            skills: record.skills,
            expertise: record.expertise,
            remedies: record.remedies,
            bank: bank_from_record(record.bank_details)?,
            kyc: kyc_from_record(record.kyc)?,
            prices: record
                .consultation_prices
                .into_iter()
                .map(|p| ConsultationPrice {
                    duration_minutes: p.duration,
                    price: p.price,
                })
                .collect(),
            special_prices: record.special_pricing,
            first_time_offer: record.first_time_offer,
            active: record.is_active,
        })
    }
}

/// Body of `POST /api/admin/update-astrologer`.
#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAstrologerPayload<'a> {
    pub astrologer_id: &'a str,
    pub name: &'a str,
    pub email: &'a str,
    pub phone: Option<&'a str>,
    pub experience: u32,
    pub languages: &'a [String],
    pub bio: &'a str,
    pub skills: &'a [String],
    pub expertise: &'a [String],
    pub remedies: &'a [String],
    pub bank_details: Option<BankDetailsRecord>,
    pub kyc: Option<KycRecord>,
    pub consultation_prices: Vec<PriceRecord>,
    pub special_pricing: &'a BTreeMap<u32, u32>,
    pub first_time_offer: &'a BTreeMap<u32, u32>,
    pub is_active: bool,
}

impl<'a> From<&'a UpdateAstrologer> for UpdateAstrologerPayload<'a> {
    fn from(update: &'a UpdateAstrologer) -> Self {
        Self {
            astrologer_id: update.id.as_str(),
            name: update.name.as_str(),
            email: update.email.as_str(),
            phone: update.phone.as_ref().map(PhoneNumber::as_str),
            experience: update.experience_years,
            languages: &update.languages,
            bio: &update.bio,
            skills: &update.skills,
            expertise: &update.expertise,
            remedies: &update.remedies,
            bank_details: update.bank.as_ref().map(|b| BankDetailsRecord {
                account_holder_name: b.account_holder.clone(),
                account_number: b.account_number.clone(),
                bank_name: b.bank_name.clone(),
                ifsc_code: b.ifsc.as_str().to_string(),
            }),
            kyc: update.kyc.as_ref().map(|k| KycRecord {
                pan_number: k.pan.as_str().to_string(),
                aadhar_number: k.aadhar.as_str().to_string(),
            }),
            consultation_prices: update
                .prices
                .iter()
                .map(|p| PriceRecord {
                    duration: p.duration_minutes,
                    price: p.price,
                })
                .collect(),
            special_pricing: &update.special_prices,
            first_time_offer: &update.first_time_offer,
            is_active: update.active,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> AstrologerRecord {
        serde_json::from_str(
            r#"{
                "_id": "a1",
                "name": "Pandit Sharma",
                "email": "Sharma@Example.com",
                "phone": "98765 43210",
                "experience": 12,
                "bankDetails": {"accountHolderName": "R Sharma", "accountNumber": "0011", "bankName": "SBI", "ifscCode": "sbin0001234"},
                "kyc": {"panNumber": "abcde1234f", "aadharNumber": "1234 5678 9012"},
                "consultationPrices": [{"duration": 15, "price": 300}],
                "specialPricing": {"15": 249},
                "isActive": true
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn converts_and_normalizes_documents() {
        let astrologer = Astrologer::try_from(record()).unwrap();

        assert_eq!(astrologer.email.as_str(), "sharma@example.com");
        assert_eq!(astrologer.phone.as_ref().unwrap().as_str(), "+919876543210");
        assert_eq!(astrologer.bank.as_ref().unwrap().ifsc.as_str(), "SBIN0001234");
        assert_eq!(astrologer.kyc.as_ref().unwrap().pan.as_str(), "ABCDE1234F");
        assert_eq!(astrologer.special_prices.get(&15), Some(&249));
        assert_eq!(astrologer.base_price(15), Some(300));
    }

    #[test]
    fn rejects_malformed_ifsc() {
        let mut record = record();
        if let Some(bank) = record.bank_details.as_mut() {
            bank.ifsc_code = "SBIN1001234".to_string();
        }
        assert_eq!(
            Astrologer::try_from(record).unwrap_err(),
            TypeConstraintError::InvalidDocument("IFSC")
        );
    }
}
