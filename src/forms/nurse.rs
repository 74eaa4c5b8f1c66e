//! Nurse profile form

use chrono::SecondsFormat;

use super::{is_ten_digit_phone, is_valid_email, non_empty, normalize_phone, parse_date, strip_phone};
use crate::error::{ClientResult, ValidationErrors};
use crate::model::{Nurse, NursePayload};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NurseForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub dob: String,
    pub gender: String,
    pub profile_pic: String,
    /// Comma separated
    pub languages: String,
    pub introduction: String,
}

impl NurseForm {
    pub fn from_nurse(nurse: &Nurse) -> Self {
        Self {
            name: nurse.name.clone(),
            email: nurse.email.clone().unwrap_or_default(),
            phone: nurse.phone.as_deref().map(strip_phone).unwrap_or_default(),
            dob: nurse
                .dob
                .as_deref()
                .and_then(parse_date)
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            gender: nurse.gender.clone().unwrap_or_default(),
            profile_pic: nurse.profile_pic.clone().unwrap_or_default(),
            languages: nurse.languages_spoken.join(", "),
            introduction: nurse.introduction.clone().unwrap_or_default(),
        }
    }

    pub fn languages_spoken(&self) -> Vec<String> {
        self.languages
            .split(',')
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(String::from)
            .collect()
    }

    pub fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        if self.name.trim().is_empty() {
            errors.add("name", "Name is required");
        }
        if !self.email.trim().is_empty() && !is_valid_email(&self.email) {
            errors.add("email", "Please enter a valid email address");
        }
        if !is_ten_digit_phone(&self.phone) {
            errors.add("phone", "Please enter a valid 10-digit mobile number");
        }
        if parse_date(&self.dob).is_none() {
            errors.add("dob", "Please enter a valid date of birth");
        }
        if self.gender.trim().is_empty() {
            errors.add("gender", "Gender is required");
        }
        errors
    }

    /// Body for create; updates ignore `email` and `schoolId` server-side
    pub fn to_payload(&self, school_id: Option<&str>) -> ClientResult<NursePayload> {
        self.validate().into_result(())?;

        let dob = parse_date(&self.dob)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|dt| dt.and_utc().to_rfc3339_opts(SecondsFormat::Millis, true))
            .unwrap_or_default();

        Ok(NursePayload {
            name: self.name.trim().to_string(),
            email: non_empty(&self.email.to_lowercase()),
            phone: normalize_phone(&self.phone),
            dob,
            gender: self.gender.trim().to_lowercase(),
            profile_pic: non_empty(&self.profile_pic),
            school_id: school_id.and_then(non_empty),
            languages_spoken: self.languages_spoken(),
            introduction: non_empty(&self.introduction),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_formatting() {
        let form = NurseForm {
            name: "Priya".into(),
            email: "Priya@School.IN".into(),
            phone: "9876543210".into(),
            dob: "1990-04-02".into(),
            gender: "Female".into(),
            languages: "English, Kannada, ,Hindi".into(),
            introduction: "  Ten years in paediatrics.  ".into(),
            ..NurseForm::default()
        };

        let payload = form.to_payload(Some("sch1")).unwrap();
        assert_eq!(payload.email.as_deref(), Some("priya@school.in"));
        assert_eq!(payload.gender, "female");
        assert_eq!(payload.dob, "1990-04-02T00:00:00.000Z");
        assert_eq!(payload.languages_spoken, vec!["English", "Kannada", "Hindi"]);
        assert_eq!(payload.introduction.as_deref(), Some("Ten years in paediatrics."));
        assert_eq!(payload.phone, "+919876543210");
    }
}
