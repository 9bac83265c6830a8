use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::domain::types::OrderId;
use crate::status::{ConsultationStatus, PaymentStatus};

/// Payment captured for a consultation or report purchase.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct PaymentRecord {
    pub amount: f64,
    pub currency: String,
    pub transaction_id: Option<String>,
    pub status: PaymentStatus,
}

/// One row of the consultation log table.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct ConsultationLog {
    pub id: OrderId,
    pub customer_name: String,
    pub customer_phone: Option<String>,
    pub astrologer_name: String,
    /// Channel such as `chat`, `call` or `video`.
    pub consultation_type: String,
    pub date: NaiveDate,
    pub time_slot: Option<String>,
    pub duration_minutes: u32,
    pub status: ConsultationStatus,
    pub payment: Option<PaymentRecord>,
    pub created_at: NaiveDateTime,
}
