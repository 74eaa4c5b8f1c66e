//! Form State and Validation
//!
//! Each form is a plain struct of the raw strings the user typed. `validate`
//! reports field-level messages, and `to_payload` turns a valid form into the
//! body the backend expects (normalized phones, lowercased enums, derived
//! values). Pages bind inputs to these structs; the CLI fills them from flags.

pub mod assessment;
pub mod infirmary;
pub mod inventory;
pub mod nurse;
pub mod student;
pub mod upload;

use chrono::NaiveDate;
use regex::Regex;

pub use assessment::AssessmentForm;
pub use infirmary::InfirmaryForm;
pub use inventory::InventoryForm;
pub use nurse::NurseForm;
pub use student::StudentForm;

/// Country prefix added to stored phone numbers
pub const PHONE_PREFIX: &str = "+91";

/// Digits kept from a phone number
pub const PHONE_DIGITS: usize = 10;

/// Keep only ASCII digits
pub fn digits_only(value: &str) -> String {
    value.chars().filter(char::is_ascii_digit).collect()
}

/// What a mobile input accepts while typing: digits, at most ten
pub fn sanitize_mobile_input(value: &str) -> String {
    digits_only(value).chars().take(PHONE_DIGITS).collect()
}

/// `+91` followed by the first ten digits; empty input stays empty
pub fn normalize_phone(value: &str) -> String {
    let digits = sanitize_mobile_input(value);
    if digits.is_empty() {
        String::new()
    } else {
        format!("{}{}", PHONE_PREFIX, digits)
    }
}

/// Stored phone back to the ten digits shown in inputs
pub fn strip_phone(value: &str) -> String {
    digits_only(value.trim().trim_start_matches(PHONE_PREFIX))
}

pub fn is_ten_digit_phone(value: &str) -> bool {
    digits_only(value).len() == PHONE_DIGITS
}

pub fn is_valid_email(value: &str) -> bool {
    Regex::new(r"^\S+@\S+\.\S+$")
        .map(|re| re.is_match(value.trim()))
        .unwrap_or(false)
}

pub fn is_pin_code(value: &str) -> bool {
    let value = value.trim();
    value.len() == 6 && value.chars().all(|c| c.is_ascii_digit())
}

/// Parse a `YYYY-MM-DD` date, also accepting a full ISO timestamp
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    let date_part = value.get(..10).unwrap_or(value);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

/// Blank or a number; `Err(())` when something non-numeric was typed
pub(crate) fn parse_optional_number(value: &str) -> Result<Option<f64>, ()> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    value.parse::<f64>().map(Some).map_err(|_| ())
}

pub(crate) fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phone_normalization() {
        assert_eq!(normalize_phone("98765-43210"), "+919876543210");
        assert_eq!(normalize_phone("987654321099"), "+919876543210");
        assert_eq!(normalize_phone(""), "");
        assert_eq!(strip_phone("+919876543210"), "9876543210");
        assert_eq!(sanitize_mobile_input("98a76 5432109"), "9876543210");
    }

    #[test]
    fn test_email_and_pin() {
        assert!(is_valid_email("nurse@school.in"));
        assert!(!is_valid_email("nurse@school"));
        assert!(!is_valid_email("nurse school@x.in"));
        assert!(is_pin_code("560034"));
        assert!(!is_pin_code("56003"));
    }

    #[test]
    fn test_parse_date_accepts_timestamps() {
        assert_eq!(
            parse_date("2015-06-01T00:00:00.000Z"),
            NaiveDate::from_ymd_opt(2015, 6, 1)
        );
        assert!(parse_date("01/06/2015").is_none());
    }
}
