use serde::Deserialize;

use crate::domain::report::UpdateReportOrder;
use crate::domain::types::{OrderId, Url};
use crate::forms::{FormError, optional_text};
use crate::status::{DeliveryStatus, ReportStatus};

#[derive(Deserialize)]
/// Inline edit of a report order row. Blank fields are left unchanged.
pub struct UpdateReportOrderForm {
    pub status: Option<String>,
    pub delivery_status: Option<String>,
    pub drive_url: Option<String>,
}

impl TryFrom<UpdateReportOrderForm> for UpdateReportOrder {
    type Error = FormError;

    fn try_from(form: UpdateReportOrderForm) -> Result<Self, Self::Error> {
        let update = UpdateReportOrder {
            status: optional_text(form.status.as_deref())
                .map(|raw| raw.parse::<ReportStatus>())
                .transpose()?,
            delivery_status: optional_text(form.delivery_status.as_deref())
                .map(|raw| raw.parse::<DeliveryStatus>())
                .transpose()?,
            drive_url: optional_text(form.drive_url.as_deref())
                .map(Url::new)
                .transpose()?,
        };
        if update.is_empty() {
            return Err(FormError::Invalid("Nothing to update".to_string()));
        }
        Ok(update)
    }
}

#[derive(Deserialize)]
/// Orders ticked on the automation page. Parsed with `serde_html_form` so the
/// repeated `order_id` keys collect into a list.
pub struct ProcessReportsForm {
    #[serde(default)]
    pub order_id: Vec<String>,
}

impl ProcessReportsForm {
    pub fn order_ids(self) -> Result<Vec<OrderId>, FormError> {
        let ids = self
            .order_id
            .into_iter()
            .map(|id| OrderId::new(id).map_err(|_| FormError::InvalidId))
            .collect::<Result<Vec<_>, _>>()?;
        if ids.is_empty() {
            return Err(FormError::Invalid("Select at least one order".to_string()));
        }
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_fields_are_ignored() {
        let form = UpdateReportOrderForm {
            status: Some("".to_string()),
            delivery_status: Some("delivered".to_string()),
            drive_url: Some("https://drive.example.com/r/1".to_string()),
        };

        let update = UpdateReportOrder::try_from(form).unwrap();

        assert_eq!(update.status, None);
        assert_eq!(update.delivery_status, Some(DeliveryStatus::Delivered));
        assert!(update.drive_url.is_some());
    }

    #[test]
    fn empty_update_is_rejected() {
        let form = UpdateReportOrderForm {
            status: None,
            delivery_status: Some(" ".to_string()),
            drive_url: None,
        };
        assert!(UpdateReportOrder::try_from(form).is_err());
    }

    #[test]
    fn repeated_order_ids_are_collected() {
        let form: ProcessReportsForm =
            serde_html_form::from_str("order_id=o1&order_id=o2").unwrap();
        let ids = form.order_ids().unwrap();
        assert_eq!(ids.len(), 2);

        let empty: ProcessReportsForm = serde_html_form::from_str("").unwrap();
        assert!(empty.order_ids().is_err());
    }
}
