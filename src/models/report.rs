use serde::{Deserialize, Serialize};

use crate::domain::consultation::PaymentRecord as DomainPaymentRecord;
use crate::domain::report::{ReportDelivery, ReportOrder, UpdateReportOrder};
use crate::domain::types::{OrderId, ReportPrefix, TypeConstraintError, Url};
use crate::models::consultation::PaymentRecord;
use crate::models::{non_blank, parse_optional_date, parse_timestamp};
use crate::status::{DeliveryStatus, StatusKind};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryRecord {
    pub status: Option<String>,
    pub drive_url: Option<String>,
    pub delivered_at: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Wire model for [`crate::domain::report::ReportOrder`].
pub struct ReportOrderRecord {
    #[serde(rename = "_id")]
    pub id: String,
    pub order_number: String,
    #[serde(default)]
    pub report_type: String,
    #[serde(default)]
    pub customer_name: String,
    pub customer_email: Option<String>,
    pub customer_phone: Option<String>,
    pub status: String,
    #[serde(default)]
    pub delivery: DeliveryRecord,
    pub payment: Option<PaymentRecord>,
    pub scheduled_date: Option<String>,
    pub time_slot: Option<String>,
    pub astrologer_name: Option<String>,
    pub created_at: String,
}

impl TryFrom<ReportOrderRecord> for ReportOrder {
    type Error = TypeConstraintError;

    fn try_from(record: ReportOrderRecord) -> Result<Self, Self::Error> {
        let delivery_status = match non_blank(record.delivery.status) {
            Some(status) => status.parse()?,
            None => DeliveryStatus::Pending,
        };
        let drive_url = non_blank(record.delivery.drive_url)
            .map(Url::new)
            .transpose()?;
        let delivered_at = non_blank(record.delivery.delivered_at)
            .map(|raw| parse_timestamp(&raw))
            .transpose()?;

        Ok(Self {
            id: OrderId::new(record.id)?,
            prefix: ReportPrefix::from_order_number(&record.order_number),
            order_number: record.order_number,
            report_type: record.report_type,
            customer_name: record.customer_name.trim().to_string(),
            customer_email: non_blank(record.customer_email),
            customer_phone: non_blank(record.customer_phone),
            status: record.status.parse()?,
            delivery: ReportDelivery {
                status: delivery_status,
                drive_url,
                delivered_at,
            },
            payment: record
                .payment
                .map(DomainPaymentRecord::try_from)
                .transpose()?,
            scheduled_date: parse_optional_date(record.scheduled_date.as_deref())?,
            time_slot: non_blank(record.time_slot),
            astrologer_name: non_blank(record.astrologer_name),
            created_at: parse_timestamp(&record.created_at)?,
        })
    }
}

/// Body of `PATCH /api/admin/life-journey-orders/:id`.
#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UpdateReportOrderPayload<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_status: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub drive_url: Option<&'a str>,
}

impl<'a> From<&'a UpdateReportOrder> for UpdateReportOrderPayload<'a> {
    fn from(update: &'a UpdateReportOrder) -> Self {
        Self {
            status: update.status.map(StatusKind::as_str),
            delivery_status: update.delivery_status.map(StatusKind::as_str),
            drive_url: update.drive_url.as_ref().map(Url::as_str),
        }
    }
}

/// Body of `POST /api/life-journey-report/process-lcr-reports`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessReportsPayload<'a> {
    pub order_ids: Vec<&'a str>,
}

impl<'a> ProcessReportsPayload<'a> {
    pub fn new(ids: &'a [OrderId]) -> Self {
        Self {
            order_ids: ids.iter().map(OrderId::as_str).collect(),
        }
    }
}

/// Outcome reported by the report pipeline for a processing request.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProcessSummary {
    #[serde(default)]
    pub processed: usize,
    #[serde(default)]
    pub failed: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::ReportStatus;

    fn record(json: &str) -> ReportOrderRecord {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn converts_order_and_derives_prefix() {
        let order = ReportOrder::try_from(record(
            r##"{
                "_id": "o1",
                "orderNumber": "#LJR-1042",
                "reportType": "Life Journey",
                "customerName": "Ravi",
                "status": "paid",
                "delivery": {"status": "delivered", "driveUrl": "https://drive.example.com/f/1"},
                "scheduledDate": "2026-03-14",
                "createdAt": "2026-03-10T10:00:00Z"
            }"##,
        ))
        .unwrap();

        assert_eq!(order.prefix.as_ref().unwrap().as_str(), "#LJR-");
        assert!(order.is_delivered());
        assert_eq!(order.status, ReportStatus::Paid);
        assert!(order.delivery.drive_url.is_some());
    }

    #[test]
    fn missing_delivery_is_pending_and_bad_url_rejected() {
        let order = ReportOrder::try_from(record(
            r##"{"_id": "o2", "orderNumber": "#CR-7", "status": "pending", "createdAt": "2026-03-10T10:00:00Z"}"##,
        ))
        .unwrap();
        assert_eq!(order.delivery.status, DeliveryStatus::Pending);

        let err = ReportOrder::try_from(record(
            r##"{"_id": "o3", "orderNumber": "#CR-8", "status": "pending",
                "delivery": {"driveUrl": "not a url"}, "createdAt": "2026-03-10T10:00:00Z"}"##,
        ))
        .unwrap_err();
        assert_eq!(err, TypeConstraintError::InvalidUrl);
    }

    #[test]
    fn update_payload_skips_unset_fields() {
        let update = UpdateReportOrder {
            status: Some(ReportStatus::Delivered),
            delivery_status: None,
            drive_url: None,
        };
        let json = serde_json::to_value(UpdateReportOrderPayload::from(&update)).unwrap();
        assert_eq!(json, serde_json::json!({"status": "delivered"}));
    }
}
