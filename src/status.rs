//! Order status vocabularies shared by the consultation, report and puja
//! screens, plus the per-status counters shown above every table.
//!
//! The backend occasionally reports `in-progress`; every vocabulary that has
//! a failure state folds it into `Failed` at parse time so that badges, filters
//! and counters always agree.

use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::types::TypeConstraintError;

/// Common behaviour of the status enums rendered as badges and filters.
pub trait StatusKind: Copy + Eq + Ord + 'static {
    /// Every variant in display order.
    const ALL: &'static [Self];

    /// Wire/filter value of the variant.
    fn as_str(self) -> &'static str;

    /// Human readable badge label.
    fn label(self) -> &'static str;
}

/// Raw backend value folded into `Failed`.
pub const IN_PROGRESS: &str = "in-progress";

fn normalize_status(raw: &str) -> String {
    raw.trim().to_lowercase().replace(' ', "_")
}

fn is_in_progress(normalized: &str) -> bool {
    matches!(normalized, "in-progress" | "in_progress" | "inprogress")
}

macro_rules! status_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $($variant:ident => ($wire:literal, $label:literal)),+ $(,)?
        }
        in_progress => $failed:ident
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub enum $name {
            $($variant),+
        }

        impl StatusKind for $name {
            const ALL: &'static [Self] = &[$(Self::$variant),+];

            fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $wire),+
                }
            }

            fn label(self) -> &'static str {
                match self {
                    $(Self::$variant => $label),+
                }
            }
        }

        impl FromStr for $name {
            type Err = TypeConstraintError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let normalized = normalize_status(s);
                if is_in_progress(&normalized) {
                    return Ok(Self::$failed);
                }
                match normalized.as_str() {
                    $($wire => Ok(Self::$variant),)+
                    _ => Err(TypeConstraintError::InvalidValue(format!(
                        "unknown {} `{s}`",
                        stringify!($name)
                    ))),
                }
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.label())
            }
        }

        impl TryFrom<String> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                value.parse()
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.as_str().to_string()
            }
        }
    };
}

status_enum! {
    /// Lifecycle of a live consultation order.
    ConsultationStatus {
        PendingPayment => ("pending_payment", "Pending payment"),
        Booked => ("booked", "Booked"),
        Completed => ("completed", "Completed"),
        Cancelled => ("cancelled", "Cancelled"),
        Failed => ("failed", "Failed"),
    }
    in_progress => Failed
}

status_enum! {
    /// Lifecycle of a report purchase.
    ReportStatus {
        Pending => ("pending", "Pending"),
        Paid => ("paid", "Paid"),
        Processing => ("processing", "Processing"),
        Delivered => ("delivered", "Delivered"),
        Failed => ("failed", "Failed"),
    }
    in_progress => Failed
}

status_enum! {
    /// Delivery progress of a generated report.
    DeliveryStatus {
        Pending => ("pending", "Pending"),
        Processing => ("processing", "Processing"),
        Delivered => ("delivered", "Delivered"),
        Failed => ("failed", "Failed"),
    }
    in_progress => Failed
}

status_enum! {
    /// Payment state of a puja booking.
    PaymentStatus {
        Successful => ("successful", "Successful"),
        Pending => ("pending", "Pending"),
        Failed => ("failed", "Failed"),
    }
    in_progress => Failed
}

/// Status filter selected in a table toolbar; `all` disables filtering.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusFilter<S> {
    All,
    Only(S),
}

impl<S> Default for StatusFilter<S> {
    fn default() -> Self {
        Self::All
    }
}

impl<S: StatusKind + FromStr> StatusFilter<S> {
    /// Parses the raw query value. Blank and `all` mean no filtering; unknown
    /// values are rejected.
    pub fn parse(raw: Option<&str>) -> Result<Self, S::Err> {
        match raw.map(str::trim) {
            None | Some("") => Ok(Self::All),
            Some(value) if value.eq_ignore_ascii_case("all") => Ok(Self::All),
            Some(value) => value.parse().map(Self::Only),
        }
    }

    pub fn matches(&self, status: S) -> bool {
        match self {
            Self::All => true,
            Self::Only(expected) => *expected == status,
        }
    }

    /// Query value echoed back into the filter form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Only(status) => status.as_str(),
        }
    }
}

/// Counts per status plus the grand total, keyed by the wire value.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub all: usize,
    pub by_status: BTreeMap<&'static str, usize>,
}

impl StatusCounts {
    /// Tallies statuses; every known status is present even when zero.
    pub fn tally<S, I>(statuses: I) -> Self
    where
        S: StatusKind,
        I: IntoIterator<Item = S>,
    {
        let mut by_status: BTreeMap<&'static str, usize> =
            S::ALL.iter().map(|status| (status.as_str(), 0)).collect();
        let mut all = 0;
        for status in statuses {
            all += 1;
            *by_status.entry(status.as_str()).or_default() += 1;
        }
        Self { all, by_status }
    }

    pub fn get<S: StatusKind>(&self, status: S) -> usize {
        self.by_status.get(status.as_str()).copied().unwrap_or(0)
    }
}
