//! Date range presets used by the log and booking filters.

use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;

use crate::domain::types::TypeConstraintError;

/// Inclusive calendar range sent to the backend as `startDate`/`endDate`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateRange {
    pub fn new(from: NaiveDate, to: NaiveDate) -> Result<Self, TypeConstraintError> {
        if from > to {
            return Err(TypeConstraintError::InvalidValue(
                "start date must not be after end date".to_string(),
            ));
        }
        Ok(Self { from, to })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from <= date && date <= self.to
    }

    /// Query parameters in the backend's `YYYY-MM-DD` format.
    pub fn query_params(&self) -> [(&'static str, String); 2] {
        [
            ("startDate", self.from.format("%Y-%m-%d").to_string()),
            ("endDate", self.to.format("%Y-%m-%d").to_string()),
        ]
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DateRangePreset {
    Today,
    Yesterday,
    #[default]
    Last7Days,
    Last30Days,
    ThisMonth,
    Custom,
}

impl DateRangePreset {
    pub const ALL: [DateRangePreset; 6] = [
        DateRangePreset::Today,
        DateRangePreset::Yesterday,
        DateRangePreset::Last7Days,
        DateRangePreset::Last30Days,
        DateRangePreset::ThisMonth,
        DateRangePreset::Custom,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            DateRangePreset::Today => "today",
            DateRangePreset::Yesterday => "yesterday",
            DateRangePreset::Last7Days => "last_7_days",
            DateRangePreset::Last30Days => "last_30_days",
            DateRangePreset::ThisMonth => "this_month",
            DateRangePreset::Custom => "custom",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DateRangePreset::Today => "Today",
            DateRangePreset::Yesterday => "Yesterday",
            DateRangePreset::Last7Days => "Last 7 days",
            DateRangePreset::Last30Days => "Last 30 days",
            DateRangePreset::ThisMonth => "This month",
            DateRangePreset::Custom => "Custom",
        }
    }

    /// Parses a query value; blank selects the default preset.
    pub fn parse(raw: Option<&str>) -> Result<Self, TypeConstraintError> {
        let raw = raw.map(str::trim).unwrap_or_default();
        if raw.is_empty() {
            return Ok(Self::default());
        }
        Self::ALL
            .into_iter()
            .find(|preset| preset.as_str() == raw)
            .ok_or_else(|| TypeConstraintError::InvalidValue(format!("unknown date preset `{raw}`")))
    }

    /// Resolves the preset against `today`. `Custom` needs both bounds.
    pub fn resolve(
        self,
        today: NaiveDate,
        custom_from: Option<NaiveDate>,
        custom_to: Option<NaiveDate>,
    ) -> Result<DateRange, TypeConstraintError> {
        match self {
            DateRangePreset::Today => DateRange::new(today, today),
            DateRangePreset::Yesterday => {
                let yesterday = today - Duration::days(1);
                DateRange::new(yesterday, yesterday)
            }
            DateRangePreset::Last7Days => DateRange::new(today - Duration::days(6), today),
            DateRangePreset::Last30Days => DateRange::new(today - Duration::days(29), today),
            DateRangePreset::ThisMonth => {
                let first = today.with_day(1).unwrap_or(today);
                DateRange::new(first, today)
            }
            DateRangePreset::Custom => match (custom_from, custom_to) {
                (Some(from), Some(to)) => DateRange::new(from, to),
                _ => Err(TypeConstraintError::InvalidValue(
                    "custom range needs both dates".to_string(),
                )),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn today_is_a_single_day() {
        for today in [day(2026, 1, 1), day(2024, 2, 29), day(2026, 12, 31)] {
            let range = DateRangePreset::Today.resolve(today, None, None).unwrap();
            assert_eq!(range.from, today);
            assert_eq!(range.to, today);
        }
    }

    #[test]
    fn last_seven_days_includes_today() {
        let range = DateRangePreset::Last7Days
            .resolve(day(2026, 3, 3), None, None)
            .unwrap();
        assert_eq!(range.from, day(2026, 2, 25));
        assert_eq!(range.to, day(2026, 3, 3));
        assert_eq!((range.to - range.from).num_days(), 6);
    }

    #[test]
    fn this_month_starts_on_the_first() {
        let range = DateRangePreset::ThisMonth
            .resolve(day(2026, 7, 19), None, None)
            .unwrap();
        assert_eq!(range.from, day(2026, 7, 1));
    }

    #[test]
    fn custom_requires_ordered_bounds() {
        let today = day(2026, 7, 19);
        assert!(
            DateRangePreset::Custom
                .resolve(today, Some(day(2026, 7, 20)), Some(day(2026, 7, 1)))
                .is_err()
        );
        assert!(
            DateRangePreset::Custom
                .resolve(today, Some(day(2026, 7, 1)), None)
                .is_err()
        );
        let range = DateRangePreset::Custom
            .resolve(today, Some(day(2026, 7, 1)), Some(day(2026, 7, 2)))
            .unwrap();
        assert!(range.contains(day(2026, 7, 2)));
        assert_eq!(range.query_params()[0], ("startDate", "2026-07-01".to_string()));
    }

    #[test]
    fn parse_defaults_and_rejects_unknown() {
        assert_eq!(DateRangePreset::parse(None).unwrap(), DateRangePreset::Last7Days);
        assert_eq!(
            DateRangePreset::parse(Some("today")).unwrap(),
            DateRangePreset::Today
        );
        assert!(DateRangePreset::parse(Some("fortnight")).is_err());
    }
}
