//! CSV export of the consultation, booking and report tables.

use csv::{QuoteStyle, Terminator, WriterBuilder};
use thiserror::Error;

use crate::domain::consultation::ConsultationLog;
use crate::domain::puja::PujaBooking;
use crate::domain::report::ReportOrder;
use crate::status::StatusKind;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to flush csv output: {0}")]
    Flush(String),
    #[error("csv output is not valid utf-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
}

/// A value that can be written as one CSV record.
pub trait CsvRow {
    /// Column titles, in record order.
    const HEADERS: &'static [&'static str];

    fn record(&self) -> Vec<String>;
}

/// Serializes `rows` with a header line. Every field is quoted and embedded
/// quotes are doubled; lines end with CRLF.
pub fn to_csv<R: CsvRow>(rows: &[R]) -> Result<String, ExportError> {
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::CRLF)
        .from_writer(Vec::new());

    writer.write_record(R::HEADERS)?;
    for row in rows {
        writer.write_record(row.record())?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ExportError::Flush(e.to_string()))?;
    Ok(String::from_utf8(bytes)?)
}

/// Download name such as `consultations-2026-03-14.csv`.
pub fn export_filename(stem: &str, date: chrono::NaiveDate) -> String {
    format!("{stem}-{}.csv", date.format("%Y-%m-%d"))
}

fn opt(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

fn amount(value: f64) -> String {
    format!("{value:.2}")
}

impl CsvRow for ConsultationLog {
    const HEADERS: &'static [&'static str] = &[
        "Order ID",
        "Customer",
        "Phone",
        "Astrologer",
        "Type",
        "Date",
        "Time Slot",
        "Duration (min)",
        "Status",
        "Amount",
        "Currency",
        "Transaction ID",
        "Payment Status",
        "Created At",
    ];

    fn record(&self) -> Vec<String> {
        let payment = self.payment.as_ref();
        vec![
            self.id.to_string(),
            self.customer_name.clone(),
            opt(&self.customer_phone),
            self.astrologer_name.clone(),
            self.consultation_type.clone(),
            self.date.format("%Y-%m-%d").to_string(),
            opt(&self.time_slot),
            self.duration_minutes.to_string(),
            self.status.label().to_string(),
            payment.map(|p| amount(p.amount)).unwrap_or_default(),
            payment.map(|p| p.currency.clone()).unwrap_or_default(),
            payment
                .and_then(|p| p.transaction_id.clone())
                .unwrap_or_default(),
            payment
                .map(|p| p.status.label().to_string())
                .unwrap_or_default(),
            self.created_at.format("%Y-%m-%d %H:%M").to_string(),
        ]
    }
}

impl CsvRow for PujaBooking {
    const HEADERS: &'static [&'static str] = &[
        "Booking ID",
        "Puja",
        "Puja Date",
        "Package",
        "Devotee",
        "Gotra",
        "Family Members",
        "Address",
        "City",
        "State",
        "Pincode",
        "Phone",
        "Amount",
        "Transaction ID",
        "Payment Status",
        "Booked At",
    ];

    fn record(&self) -> Vec<String> {
        let address = self.delivery_address.as_ref();
        vec![
            self.id.to_string(),
            self.puja.title.clone(),
            self.puja
                .date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            opt(&self.puja.package_name),
            self.sankalp.name.clone(),
            opt(&self.sankalp.gotra),
            self.sankalp.family_members.join("; "),
            address.map(|a| a.line.clone()).unwrap_or_default(),
            address.map(|a| a.city.clone()).unwrap_or_default(),
            address.map(|a| a.state.clone()).unwrap_or_default(),
            address.map(|a| a.pincode.clone()).unwrap_or_default(),
            address.and_then(|a| a.phone.clone()).unwrap_or_default(),
            amount(self.payment.amount),
            opt(&self.payment.transaction_id),
            self.payment_status.label().to_string(),
            self.created_at.format("%Y-%m-%d %H:%M").to_string(),
        ]
    }
}

impl CsvRow for ReportOrder {
    const HEADERS: &'static [&'static str] = &[
        "Order Number",
        "Report",
        "Customer",
        "Email",
        "Phone",
        "Status",
        "Delivery Status",
        "Drive URL",
        "Scheduled Date",
        "Time Slot",
        "Astrologer",
        "Amount",
        "Created At",
    ];

    fn record(&self) -> Vec<String> {
        vec![
            self.order_number.clone(),
            self.report_type.clone(),
            self.customer_name.clone(),
            opt(&self.customer_email),
            opt(&self.customer_phone),
            self.status.label().to_string(),
            self.delivery.status.label().to_string(),
            self.delivery
                .drive_url
                .as_ref()
                .map(|u| u.to_string())
                .unwrap_or_default(),
            self.scheduled_date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            opt(&self.time_slot),
            opt(&self.astrologer_name),
            self.payment
                .as_ref()
                .map(|p| amount(p.amount))
                .unwrap_or_default(),
            self.created_at.format("%Y-%m-%d %H:%M").to_string(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selection::fixtures::report_order;
    use crate::status::DeliveryStatus;

    struct Pair(&'static str, &'static str);

    impl CsvRow for Pair {
        const HEADERS: &'static [&'static str] = &["Name", "Note"];

        fn record(&self) -> Vec<String> {
            vec![self.0.to_string(), self.1.to_string()]
        }
    }

    #[test]
    fn one_line_per_row_plus_header() {
        let rows = [Pair("Asha", "ok"), Pair("Ravi", "a, b"), Pair("Mira", "")];
        let csv = to_csv(&rows).unwrap();

        assert_eq!(csv.lines().count(), rows.len() + 1);
        assert!(csv.starts_with("\"Name\",\"Note\"\r\n"));
        assert!(csv.contains("\"Ravi\",\"a, b\"\r\n"));
    }

    #[test]
    fn embedded_quotes_are_doubled() {
        let csv = to_csv(&[Pair("Asha", "said \"hello\"")]).unwrap();
        assert!(csv.contains("\"said \"\"hello\"\"\""));
    }

    #[test]
    fn empty_export_has_only_headers() {
        let csv = to_csv::<Pair>(&[]).unwrap();
        assert_eq!(csv, "\"Name\",\"Note\"\r\n");
    }

    #[test]
    fn report_rows_match_header_width() {
        let orders = vec![
            report_order("1", "paid", DeliveryStatus::Pending),
            report_order("2", "in-progress", DeliveryStatus::Failed),
        ];
        for order in &orders {
            assert_eq!(order.record().len(), ReportOrder::HEADERS.len());
        }
        let csv = to_csv(&orders).unwrap();
        assert_eq!(csv.lines().count(), 3);
        assert!(csv.contains("\"#LJR-2\",\"Life Journey\",\"Customer 2\",\"\",\"\",\"Failed\""));
    }

    #[test]
    fn filename_carries_date() {
        let date = chrono::NaiveDate::from_ymd_opt(2026, 3, 14).unwrap();
        assert_eq!(export_filename("consultations", date), "consultations-2026-03-14.csv");
    }
}
