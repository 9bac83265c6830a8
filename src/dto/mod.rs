//! DTO modules that bridge services with templates and the JSON API.

use chrono::NaiveDate;
use serde::Deserialize;

use crate::date_range::{DateRange, DateRangePreset};
use crate::forms::{FormError, optional_text, parse_form_date};

pub mod admins;
pub mod astrologers;
pub mod consultations;
pub mod navigation;
pub mod pujas;
pub mod reports;
pub mod slots;

/// Toolbar query shared by the date-filtered tables.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct TableQuery {
    /// Date preset name such as `last_7_days`.
    pub range: Option<String>,
    /// Custom range bounds, used with the `custom` preset.
    pub from: Option<String>,
    pub to: Option<String>,
    pub status: Option<String>,
    pub search: Option<String>,
    pub page: Option<usize>,
}

impl TableQuery {
    /// Resolves the selected preset against `today`.
    pub fn date_range(&self, today: NaiveDate) -> Result<(DateRangePreset, DateRange), FormError> {
        let preset = DateRangePreset::parse(self.range.as_deref())?;
        let bound = |raw: &Option<String>| {
            optional_text(raw.as_deref())
                .map(|value| parse_form_date(&value))
                .transpose()
        };
        let range = preset.resolve(today, bound(&self.from)?, bound(&self.to)?)?;
        Ok((preset, range))
    }

    /// Trimmed, lower-cased search term.
    pub fn search_term(&self) -> Option<String> {
        optional_text(self.search.as_deref()).map(|term| term.to_lowercase())
    }

    pub fn page(&self) -> usize {
        self.page.unwrap_or(1).max(1)
    }
}

/// Filter state echoed back into the toolbar.
#[derive(Debug, Clone, serde::Serialize)]
pub struct TableFilters {
    pub preset: &'static str,
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub status: &'static str,
    pub search: Option<String>,
}

impl TableFilters {
    pub fn new(
        preset: DateRangePreset,
        range: DateRange,
        status: &'static str,
        search: Option<String>,
    ) -> Self {
        Self {
            preset: preset.as_str(),
            from: range.from,
            to: range.to,
            status,
            search,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, d).unwrap()
    }

    #[test]
    fn defaults_to_last_seven_days() {
        let (preset, range) = TableQuery::default().date_range(day(14)).unwrap();
        assert_eq!(preset, DateRangePreset::Last7Days);
        assert_eq!(range.from, day(8));
        assert_eq!(range.to, day(14));
    }

    #[test]
    fn custom_range_uses_bounds() {
        let query = TableQuery {
            range: Some("custom".to_string()),
            from: Some("2026-03-01".to_string()),
            to: Some("2026-03-05".to_string()),
            ..TableQuery::default()
        };
        let (_, range) = query.date_range(day(14)).unwrap();
        assert_eq!((range.from, range.to), (day(1), day(5)));

        let inverted = TableQuery {
            range: Some("custom".to_string()),
            from: Some("2026-03-05".to_string()),
            to: Some("2026-03-01".to_string()),
            ..TableQuery::default()
        };
        assert!(inverted.date_range(day(14)).is_err());
    }

    #[test]
    fn search_is_normalized() {
        let query = TableQuery {
            search: Some("  Ravi ".to_string()),
            ..TableQuery::default()
        };
        assert_eq!(query.search_term().as_deref(), Some("ravi"));
        assert_eq!(query.page(), 1);
    }
}
