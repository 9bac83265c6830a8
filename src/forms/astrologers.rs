use std::collections::BTreeMap;

use serde::Deserialize;
use validator::Validate;

use crate::domain::astrologer::{BankDetails, ConsultationPrice, Kyc, UpdateAstrologer};
use crate::domain::types::{
    AadharNumber, AstrologerId, Email, IfscCode, PanNumber, PersonName, PhoneNumber,
};
use crate::forms::{FormError, optional_text};

#[derive(Deserialize, Validate)]
/// Astrologer profile editor. Price tables arrive as parallel
/// `*_duration` / `*_price` lists, one pair per row.
pub struct UpdateAstrologerForm {
    #[validate(length(min = 1, max = 120))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    pub phone: Option<String>,
    #[serde(default)]
    #[validate(range(max = 80))]
    pub experience_years: u32,
    /// Comma separated.
    #[serde(default)]
    pub languages: String,
    #[serde(default)]
    #[validate(length(max = 2000))]
    pub bio: String,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub expertise: Vec<String>,
    #[serde(default)]
    pub remedies: Vec<String>,
    #[serde(default)]
    pub account_holder: String,
    #[serde(default)]
    pub account_number: String,
    #[serde(default)]
    pub bank_name: String,
    #[serde(default)]
    pub ifsc: String,
    #[serde(default)]
    pub pan: String,
    #[serde(default)]
    pub aadhar: String,
    #[serde(default)]
    pub price_duration: Vec<String>,
    #[serde(default)]
    pub price_amount: Vec<String>,
    #[serde(default)]
    pub special_duration: Vec<String>,
    #[serde(default)]
    pub special_price: Vec<String>,
    #[serde(default)]
    pub offer_duration: Vec<String>,
    #[serde(default)]
    pub offer_price: Vec<String>,
    pub active: Option<String>,
}

fn clean_list(items: Vec<String>) -> Vec<String> {
    items
        .into_iter()
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
        .collect()
}

fn parse_amount(raw: &str, what: &str) -> Result<u32, FormError> {
    raw.trim()
        .parse()
        .map_err(|_| FormError::Invalid(format!("Invalid {what} `{}`", raw.trim())))
}

/// Zips parallel duration/price inputs, skipping rows left completely blank.
fn price_pairs(durations: &[String], prices: &[String]) -> Result<Vec<(u32, u32)>, FormError> {
    if durations.len() != prices.len() {
        return Err(FormError::Invalid("Price rows are incomplete".to_string()));
    }
    durations
        .iter()
        .zip(prices)
        .filter(|(d, p)| !(d.trim().is_empty() && p.trim().is_empty()))
        .map(|(d, p)| {
            let duration = parse_amount(d, "duration")?;
            if duration == 0 {
                return Err(FormError::Invalid("Duration must be positive".to_string()));
            }
            Ok((duration, parse_amount(p, "price")?))
        })
        .collect()
}

fn bank_details(form: &UpdateAstrologerForm) -> Result<Option<BankDetails>, FormError> {
    let fields = [
        &form.account_holder,
        &form.account_number,
        &form.bank_name,
        &form.ifsc,
    ];
    if fields.iter().all(|f| f.trim().is_empty()) {
        return Ok(None);
    }
    if fields.iter().any(|f| f.trim().is_empty()) {
        return Err(FormError::Invalid(
            "Bank details must be filled in completely".to_string(),
        ));
    }
    Ok(Some(BankDetails {
        account_holder: form.account_holder.trim().to_string(),
        account_number: form.account_number.trim().to_string(),
        bank_name: form.bank_name.trim().to_string(),
        ifsc: IfscCode::new(form.ifsc.as_str())?,
    }))
}

fn kyc(form: &UpdateAstrologerForm) -> Result<Option<Kyc>, FormError> {
    match (form.pan.trim().is_empty(), form.aadhar.trim().is_empty()) {
        (true, true) => Ok(None),
        (false, false) => Ok(Some(Kyc {
            pan: PanNumber::new(form.pan.as_str())?,
            aadhar: AadharNumber::new(form.aadhar.as_str())?,
        })),
        _ => Err(FormError::Invalid(
            "Both PAN and Aadhar are required for KYC".to_string(),
        )),
    }
}

impl UpdateAstrologerForm {
    pub fn into_update(self, id: AstrologerId) -> Result<UpdateAstrologer, FormError> {
        self.validate()?;

        let bank = bank_details(&self)?;
        let kyc = kyc(&self)?;
        let prices = price_pairs(&self.price_duration, &self.price_amount)?
            .into_iter()
            .map(|(duration_minutes, price)| ConsultationPrice {
                duration_minutes,
                price,
            })
            .collect::<Vec<_>>();
        if prices.is_empty() {
            return Err(FormError::Invalid(
                "At least one consultation price is required".to_string(),
            ));
        }
        let special_prices: BTreeMap<u32, u32> =
            price_pairs(&self.special_duration, &self.special_price)?
                .into_iter()
                .collect();
        let first_time_offer: BTreeMap<u32, u32> =
            price_pairs(&self.offer_duration, &self.offer_price)?
                .into_iter()
                .collect();

        Ok(UpdateAstrologer {
            id,
            name: PersonName::new(self.name)?,
            email: Email::new(self.email)?,
            phone: optional_text(self.phone.as_deref())
                .map(PhoneNumber::new)
                .transpose()?,
            experience_years: self.experience_years,
            languages: clean_list(self.languages.split(',').map(str::to_string).collect()),
            bio: ammonia::clean(self.bio.trim()),
            skills: clean_list(self.skills),
            expertise: clean_list(self.expertise),
            remedies: clean_list(self.remedies),
            bank,
            kyc,
            prices,
            special_prices,
            first_time_offer,
            active: self.active.is_some(),
        })
    }
}
