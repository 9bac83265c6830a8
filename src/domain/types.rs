//! Strongly-typed value objects used by domain entities.
//!
//! These wrappers enforce basic invariants (e.g., non-empty backend
//! identifiers, normalized/validated email, KYC document formats) so that once
//! a value reaches the domain layer it can be treated as trusted.
use std::fmt::{Display, Formatter};
use std::ops::Deref;
use std::str::FromStr;
use std::sync::LazyLock;

use phonenumber::{Mode, country, parse};
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::{ValidateEmail, ValidateUrl};

/// Errors produced when attempting to construct a constrained value object.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeConstraintError {
    /// Provided email failed format validation.
    #[error("invalid email address")]
    InvalidEmail,
    /// Provided string contained no non-whitespace characters.
    #[error("value cannot be empty")]
    EmptyString,
    /// Provided value failed custom validation.
    #[error("invalid value: {0}")]
    InvalidValue(String),
    /// Phone number did not meet expected format.
    #[error("invalid phone number")]
    InvalidPhone,
    /// Provided url failed format validation.
    #[error("invalid url address")]
    InvalidUrl,
    /// Password shorter than the accepted minimum.
    #[error("password must be at least {MIN_PASSWORD_LENGTH} characters long")]
    PasswordTooShort,
    /// Time string is not in `H:MMAM`/`H:MMPM` form.
    #[error("invalid time of day: {0}")]
    InvalidTime(String),
    /// PAN, IFSC or Aadhar number failed its format check.
    #[error("invalid {0} number")]
    InvalidDocument(&'static str),
}

/// Minimum accepted password length for admin accounts.
pub const MIN_PASSWORD_LENGTH: usize = 6;

static PAN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z]{5}[0-9]{4}[A-Z]$").expect("valid PAN regex"));
static IFSC_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z]{4}0[A-Z0-9]{6}$").expect("valid IFSC regex"));
static AADHAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{12}$").expect("valid Aadhar regex"));

/// Normalizes and validates an email string.
fn normalize_email<S: Into<String>>(email: S) -> Result<String, TypeConstraintError> {
    let normalized = email.into().trim().to_lowercase();
    if normalized.validate_email() {
        Ok(normalized)
    } else {
        Err(TypeConstraintError::InvalidEmail)
    }
}

/// Macro to generate newtypes for opaque backend identifiers.
///
/// The platform backend hands out string identifiers; the only local invariant
/// is that they are trimmed and non-empty.
macro_rules! id_newtype {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Creates a new identifier ensuring it is not blank.
            pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
                let inner = NonEmptyString::new(value)?;
                Ok(Self(inner.into_inner()))
            }

            /// Borrow the raw identifier.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl TryFrom<String> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl TryFrom<&str> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: &str) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

id_newtype!(AdminId, "Unique identifier for an admin account.");
id_newtype!(AstrologerId, "Unique identifier for an astrologer.");
id_newtype!(OrderId, "Unique identifier for a consultation or report order.");
id_newtype!(PujaId, "Unique identifier for a puja definition.");
id_newtype!(BookingId, "Unique identifier for a puja booking.");
id_newtype!(RouteId, "Unique identifier for a sidebar route.");
id_newtype!(BlockedSlotId, "Unique identifier for a blocked time range.");

/// Lower-cased and validated email address.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    /// Validates and normalizes an email string.
    pub fn new<S: Into<String>>(email: S) -> Result<Self, TypeConstraintError> {
        let normalized = normalize_email(email)?;
        Ok(Self(normalized))
    }

    /// Borrow the email as a `&str`.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Email {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for Email {
    type Error = TypeConstraintError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Email> for String {
    fn from(value: Email) -> Self {
        value.0
    }
}

/// Wrapper for non-empty, trimmed strings.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct NonEmptyString(String);

impl NonEmptyString {
    /// Trims whitespace and rejects empty inputs.
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        let trimmed = value.into().trim().to_string();
        if trimmed.is_empty() {
            return Err(TypeConstraintError::EmptyString);
        }
        Ok(Self(trimmed))
    }

    /// Borrow the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the wrapper returning the owned string.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Display for NonEmptyString {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

macro_rules! non_empty_string_newtype {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Constructs a trimmed, non-empty value.
            pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
                let inner = NonEmptyString::new(value)?;
                Ok(Self(inner.into_inner()))
            }

            /// Borrow the value as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the wrapper and return the owned string.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl Deref for $name {
            type Target = str;

            fn deref(&self) -> &Self::Target {
                &self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl TryFrom<String> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl TryFrom<&str> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: &str) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

non_empty_string_newtype!(Username, "Admin login name enforcing non-empty values.");
non_empty_string_newtype!(PersonName, "Customer or astrologer display name.");
non_empty_string_newtype!(RouteName, "Sidebar entry label enforcing non-empty values.");

/// Report-type code such as `#LJR-` used to scope slot blocks and filters.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct ReportPrefix(String);

impl ReportPrefix {
    /// Trims and upper-cases the prefix, rejecting blanks and the `all` sentinel.
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        let inner = NonEmptyString::new(value)?.into_inner().to_uppercase();
        if inner == "ALL" {
            return Err(TypeConstraintError::InvalidValue(
                "`all` is not a report prefix".to_string(),
            ));
        }
        Ok(Self(inner))
    }

    /// Extracts the prefix from an order number such as `#LJR-1042`.
    pub fn from_order_number(order_number: &str) -> Option<Self> {
        let end = order_number.rfind('-')?;
        Self::new(&order_number[..=end]).ok()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ReportPrefix {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for ReportPrefix {
    type Error = TypeConstraintError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ReportPrefix> for String {
    fn from(value: ReportPrefix) -> Self {
        value.0
    }
}

/// Plain-text password accepted by the backend for admin accounts.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(String);

impl Password {
    /// Rejects passwords shorter than [`MIN_PASSWORD_LENGTH`] characters.
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        let value = value.into();
        if value.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(TypeConstraintError::PasswordTooShort);
        }
        Ok(Self(value))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for Password {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("Password(***)")
    }
}

/// Normalizes a phone number string to E.164 format, assuming India when no
/// country code is given.
pub fn normalize_phone_to_e164(value: &str) -> Result<String, TypeConstraintError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(TypeConstraintError::EmptyString);
    }
    let parsed =
        parse(Some(country::Id::IN), trimmed).map_err(|_| TypeConstraintError::InvalidPhone)?;
    Ok(parsed.format().mode(Mode::E164).to_string())
}

/// Normalized phone number wrapper (expected E.164).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Constructs a phone number ensuring it is valid and normalizes to E.164 format.
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        let normalized = normalize_phone_to_e164(&value.into())?;
        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for PhoneNumber {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for PhoneNumber {
    type Error = TypeConstraintError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PhoneNumber> for String {
    fn from(value: PhoneNumber) -> Self {
        value.0
    }
}

/// Non-empty, trimmed, syntactically valid URL (report drive links, images).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct Url(String);

impl Url {
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        let url = NonEmptyString::new(value)?;

        if !url.as_str().validate_url() {
            Err(TypeConstraintError::InvalidUrl)
        } else {
            Ok(Self(url.into_inner()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Url {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for Url {
    type Error = TypeConstraintError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Url> for String {
    fn from(value: Url) -> Self {
        value.0
    }
}

/// Generates an upper-cased document number newtype checked against a regex.
macro_rules! document_newtype {
    ($name:ident, $re:ident, $label:expr, $doc:expr) => {
        #[doc = $doc]
        #[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
                let normalized: String = value
                    .into()
                    .chars()
                    .filter(|c| !c.is_whitespace())
                    .collect::<String>()
                    .to_uppercase();
                if $re.is_match(&normalized) {
                    Ok(Self(normalized))
                } else {
                    Err(TypeConstraintError::InvalidDocument($label))
                }
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

document_newtype!(PanNumber, PAN_RE, "PAN", "Indian permanent account number.");
document_newtype!(IfscCode, IFSC_RE, "IFSC", "Indian bank branch code.");
document_newtype!(AadharNumber, AADHAR_RE, "Aadhar", "Twelve digit Aadhar number.");

/// Returns whether `value` is a well-formed PAN after normalization.
pub fn is_valid_pan(value: &str) -> bool {
    PanNumber::new(value).is_ok()
}

/// Returns whether `value` is a well-formed IFSC code after normalization.
pub fn is_valid_ifsc(value: &str) -> bool {
    IfscCode::new(value).is_ok()
}

/// Returns whether `value` is a well-formed Aadhar number after normalization.
pub fn is_valid_aadhar(value: &str) -> bool {
    AadharNumber::new(value).is_ok()
}

/// Wall-clock time expressed as minutes since midnight.
///
/// The wire format is the backend's 12-hour `H:MMAM`/`H:MMPM` string.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeOfDay(u16);

impl TimeOfDay {
    pub const MINUTES_PER_DAY: u16 = 24 * 60;

    /// Builds a time from minutes since midnight.
    pub fn from_minutes(minutes: u16) -> Result<Self, TypeConstraintError> {
        if minutes < Self::MINUTES_PER_DAY {
            Ok(Self(minutes))
        } else {
            Err(TypeConstraintError::InvalidTime(minutes.to_string()))
        }
    }

    /// Parses `H:MMAM`/`H:MMPM` (case-insensitive, optional space before the
    /// meridiem) into minutes since midnight.
    pub fn parse(value: &str) -> Result<Self, TypeConstraintError> {
        let invalid = || TypeConstraintError::InvalidTime(value.to_string());
        let upper = value.trim().to_uppercase();
        let (clock, pm) = if let Some(rest) = upper.strip_suffix("AM") {
            (rest.trim_end(), false)
        } else if let Some(rest) = upper.strip_suffix("PM") {
            (rest.trim_end(), true)
        } else {
            return Err(invalid());
        };

        let (hours, minutes) = clock.split_once(':').ok_or_else(invalid)?;
        if minutes.len() != 2 || hours.is_empty() || hours.len() > 2 {
            return Err(invalid());
        }
        let hours: u16 = hours.parse().map_err(|_| invalid())?;
        let minutes: u16 = minutes.parse().map_err(|_| invalid())?;
        if !(1..=12).contains(&hours) || minutes > 59 {
            return Err(invalid());
        }

        let hours = match (hours, pm) {
            (12, false) => 0,
            (12, true) => 12,
            (h, false) => h,
            (h, true) => h + 12,
        };
        Ok(Self(hours * 60 + minutes))
    }

    /// Minutes elapsed since midnight.
    pub const fn minutes(self) -> u16 {
        self.0
    }

    /// Returns the time shifted by `minutes`, or `None` past midnight.
    pub fn checked_add(self, minutes: u16) -> Option<Self> {
        Self::from_minutes(self.0.checked_add(minutes)?).ok()
    }
}

impl Display for TimeOfDay {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let hours = self.0 / 60;
        let minutes = self.0 % 60;
        let meridiem = if hours < 12 { "AM" } else { "PM" };
        let display_hours = match hours % 12 {
            0 => 12,
            h => h,
        };
        write!(f, "{display_hours}:{minutes:02}{meridiem}")
    }
}

impl FromStr for TimeOfDay {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for TimeOfDay {
    type Error = TypeConstraintError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<TimeOfDay> for String {
    fn from(value: TimeOfDay) -> Self {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_of_day_parses_twelve_hour_clock() {
        assert_eq!(TimeOfDay::parse("10:00AM").unwrap().minutes(), 600);
        assert_eq!(TimeOfDay::parse("7:00PM").unwrap().minutes(), 19 * 60);
        assert_eq!(TimeOfDay::parse("12:20AM").unwrap().minutes(), 20);
        assert_eq!(TimeOfDay::parse("12:40PM").unwrap().minutes(), 12 * 60 + 40);
        assert_eq!(TimeOfDay::parse(" 9:05 pm ").unwrap().minutes(), 21 * 60 + 5);
    }

    #[test]
    fn time_of_day_rejects_malformed_values() {
        for raw in ["", "10:00", "13:00PM", "0:30AM", "10:7AM", "ten:00AM", "10:60AM"] {
            assert!(TimeOfDay::parse(raw).is_err(), "{raw} should be rejected");
        }
    }

    #[test]
    fn time_of_day_displays_backend_format() {
        let time = TimeOfDay::from_minutes(13 * 60 + 5).unwrap();
        assert_eq!(time.to_string(), "1:05PM");
        assert_eq!(TimeOfDay::from_minutes(0).unwrap().to_string(), "12:00AM");
        assert_eq!(time.checked_add(20).unwrap().to_string(), "1:25PM");
    }

    #[test]
    fn kyc_documents_are_normalized() {
        assert_eq!(PanNumber::new("abcde 1234f").unwrap().as_str(), "ABCDE1234F");
        assert!(PanNumber::new("ABCD1234F").is_err());
        assert_eq!(IfscCode::new("sbin0001234").unwrap().as_str(), "SBIN0001234");
        assert!(!is_valid_ifsc("SBIN1001234"));
        assert!(is_valid_aadhar("1234 5678 9012"));
        assert!(!is_valid_aadhar("12345678901"));
        assert!(is_valid_pan("ABCDE1234F"));
    }

    #[test]
    fn password_enforces_minimum_length() {
        assert_eq!(
            Password::new("12345").unwrap_err(),
            TypeConstraintError::PasswordTooShort
        );
        assert!(Password::new("123456").is_ok());
    }

    #[test]
    fn report_prefix_from_order_number() {
        let prefix = ReportPrefix::from_order_number("#ljr-1042").unwrap();
        assert_eq!(prefix.as_str(), "#LJR-");
        assert!(ReportPrefix::from_order_number("1042").is_none());
        assert!(ReportPrefix::new("all").is_err());
    }

    #[test]
    fn email_is_lowercased() {
        let email = Email::new("  Admin@Example.COM ").unwrap();
        assert_eq!(email.as_str(), "admin@example.com");
        assert_eq!(Email::new("nope").unwrap_err(), TypeConstraintError::InvalidEmail);
    }

    #[test]
    fn ids_reject_blank_values() {
        assert!(AstrologerId::new("   ").is_err());
        assert_eq!(AstrologerId::new(" 64ab ").unwrap().as_str(), "64ab");
    }
}
