use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::domain::consultation::PaymentRecord;
use crate::domain::types::{OrderId, ReportPrefix, Url};
use crate::status::{DeliveryStatus, ReportStatus};

/// Delivery sub-record of a report order.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct ReportDelivery {
    pub status: DeliveryStatus,
    pub drive_url: Option<Url>,
    pub delivered_at: Option<NaiveDateTime>,
}

/// A purchased report (life-journey, career, ...).
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct ReportOrder {
    pub id: OrderId,
    /// Human facing number such as `#LJR-1042`.
    pub order_number: String,
    pub prefix: Option<ReportPrefix>,
    pub report_type: String,
    pub customer_name: String,
    pub customer_email: Option<String>,
    pub customer_phone: Option<String>,
    pub status: ReportStatus,
    pub delivery: ReportDelivery,
    pub payment: Option<PaymentRecord>,
    pub scheduled_date: Option<NaiveDate>,
    pub time_slot: Option<String>,
    pub astrologer_name: Option<String>,
    pub created_at: NaiveDateTime,
}

impl ReportOrder {
    pub fn is_delivered(&self) -> bool {
        self.delivery.status == DeliveryStatus::Delivered
    }

    /// Case-insensitive match on order number, customer and contacts.
    /// `term` is expected lower-cased.
    pub fn matches_search(&self, term: &str) -> bool {
        self.order_number.to_lowercase().contains(term)
            || self.customer_name.to_lowercase().contains(term)
            || self
                .customer_email
                .as_deref()
                .is_some_and(|email| email.to_lowercase().contains(term))
            || self
                .customer_phone
                .as_deref()
                .is_some_and(|phone| phone.contains(term))
    }
}

/// Manual correction applied from the report orders table.
#[derive(Clone, Debug, PartialEq)]
pub struct UpdateReportOrder {
    pub status: Option<ReportStatus>,
    pub delivery_status: Option<DeliveryStatus>,
    pub drive_url: Option<Url>,
}

impl UpdateReportOrder {
    pub fn is_empty(&self) -> bool {
        self.status.is_none() && self.delivery_status.is_none() && self.drive_url.is_none()
    }
}
