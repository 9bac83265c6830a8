use serde::Deserialize;

use crate::domain::consultation::{ConsultationLog, PaymentRecord as DomainPaymentRecord};
use crate::domain::types::{OrderId, TypeConstraintError};
use crate::models::{non_blank, parse_date, parse_timestamp};

fn default_currency() -> String {
    "INR".to_string()
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Wire model for [`crate::domain::consultation::PaymentRecord`].
pub struct PaymentRecord {
    #[serde(default)]
    pub amount: f64,
    #[serde(default = "default_currency")]
    pub currency: String,
    pub transaction_id: Option<String>,
    pub status: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Wire model for [`crate::domain::consultation::ConsultationLog`].
pub struct ConsultationLogRecord {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub customer_name: String,
    pub customer_phone: Option<String>,
    #[serde(default)]
    pub astrologer_name: String,
    #[serde(default)]
    pub consultation_type: String,
    pub date: String,
    pub time_slot: Option<String>,
    #[serde(default)]
    pub duration: u32,
    pub status: String,
    pub payment: Option<PaymentRecord>,
    pub created_at: String,
}

impl TryFrom<PaymentRecord> for DomainPaymentRecord {
    type Error = TypeConstraintError;

    fn try_from(record: PaymentRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            amount: record.amount,
            currency: record.currency,
            transaction_id: non_blank(record.transaction_id),
            status: record.status.parse()?,
        })
    }
}

impl TryFrom<ConsultationLogRecord> for ConsultationLog {
    type Error = TypeConstraintError;

    fn try_from(record: ConsultationLogRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            id: OrderId::new(record.id)?,
            customer_name: record.customer_name.trim().to_string(),
            customer_phone: non_blank(record.customer_phone),
            astrologer_name: record.astrologer_name.trim().to_string(),
            consultation_type: record.consultation_type,
            date: parse_date(&record.date)?,
            time_slot: non_blank(record.time_slot),
            duration_minutes: record.duration,
            status: record.status.parse()?,
            payment: record.payment.map(TryInto::try_into).transpose()?,
            created_at: parse_timestamp(&record.created_at)?,
        })
    }
}
