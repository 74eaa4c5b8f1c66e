//! Health assessment form

use chrono::Local;

use super::{non_empty, parse_date, parse_optional_number};
use crate::client::{ApiClient, Transport};
use crate::error::{ClientResult, ValidationErrors};
use crate::model::{Assessment, AssessmentPayload};
use crate::services::assessments;
use crate::session::SessionStore;

pub const ORAL_HEALTH_OPTIONS: [&str; 3] = ["good", "fair", "poor"];

/// Numeric vitals that must be present, with their display labels
const REQUIRED_VITALS: [(&str, &str); 5] = [
    ("height", "Height"),
    ("weight", "Weight"),
    ("temperature", "Temperature"),
    ("pulseRate", "Pulse rate"),
    ("spO2", "SpO2"),
];

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssessmentForm {
    pub date: String,
    pub parent_name: String,
    /// Centimetres
    pub height: String,
    /// Kilograms
    pub weight: String,
    pub bmi: String,
    /// Fahrenheit
    pub temperature: String,
    pub pulse_rate: String,
    pub sp_o2: String,
    pub bp: String,
    pub oral_health: String,
    pub dental_issues: String,
    pub left_eye: String,
    pub right_eye: String,
    pub hearing_comments: String,
    pub additional_comments: String,
    pub doctor_signature: String,
}

/// BMI from centimetres and kilograms, one decimal place
pub fn compute_bmi(height_cm: f64, weight_kg: f64) -> Option<f64> {
    if height_cm <= 0.0 || weight_kg <= 0.0 {
        return None;
    }
    let metres = height_cm / 100.0;
    Some((weight_kg / (metres * metres) * 10.0).round() / 10.0)
}

impl AssessmentForm {
    pub fn today() -> Self {
        Self {
            date: Local::now().format("%Y-%m-%d").to_string(),
            ..Self::default()
        }
    }

    pub fn from_assessment(assessment: &Assessment) -> Self {
        let num = |v: Option<f64>| v.map(|n| n.to_string()).unwrap_or_default();
        let text = |v: &Option<String>| v.clone().unwrap_or_default();
        Self {
            date: assessment
                .date
                .as_deref()
                .and_then(parse_date)
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            parent_name: text(&assessment.parent_name),
            height: num(assessment.height),
            weight: num(assessment.weight),
            bmi: num(assessment.bmi),
            temperature: num(assessment.temperature),
            pulse_rate: num(assessment.pulse_rate),
            sp_o2: num(assessment.sp_o2),
            bp: text(&assessment.bp),
            oral_health: text(&assessment.oral_health),
            dental_issues: text(&assessment.dental_issues),
            left_eye: text(&assessment.left_eye),
            right_eye: text(&assessment.right_eye),
            hearing_comments: text(&assessment.hearing_comments),
            additional_comments: text(&assessment.additional_comments),
            doctor_signature: text(&assessment.doctor_signature),
        }
    }

    fn vital(&self, field: &str) -> &str {
        match field {
            "height" => &self.height,
            "weight" => &self.weight,
            "temperature" => &self.temperature,
            "pulseRate" => &self.pulse_rate,
            "spO2" => &self.sp_o2,
            _ => "",
        }
    }

    /// BMI as typed, or derived from height and weight when blank
    pub fn effective_bmi(&self) -> Option<f64> {
        match parse_optional_number(&self.bmi) {
            Ok(Some(bmi)) => Some(bmi),
            _ => {
                let height = parse_optional_number(&self.height).ok().flatten()?;
                let weight = parse_optional_number(&self.weight).ok().flatten()?;
                compute_bmi(height, weight)
            }
        }
    }

    pub fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();

        if parse_date(&self.date).is_none() {
            errors.add("date", "Please enter a valid date");
        }

        for (field, label) in REQUIRED_VITALS {
            match parse_optional_number(self.vital(field)) {
                Ok(Some(v)) if v > 0.0 => {}
                Ok(None) => errors.add(field, format!("{} is required", label)),
                _ => errors.add(field, format!("{} must be a positive number", label)),
            }
        }

        if parse_optional_number(&self.bmi).is_err() {
            errors.add("bmi", "BMI must be a number");
        }

        let bp = self.bp.trim();
        if bp.is_empty() {
            errors.add("bp", "Blood pressure is required");
        } else if !is_blood_pressure(bp) {
            errors.add("bp", "Blood pressure must look like 120/80");
        }

        if !ORAL_HEALTH_OPTIONS.contains(&self.oral_health.trim().to_lowercase().as_str()) {
            errors.add("oralHealth", "Please select oral health status");
        }

        errors
    }

    pub fn to_payload(
        &self,
        student_id: &str,
        school_id: Option<&str>,
    ) -> ClientResult<AssessmentPayload> {
        self.validate().into_result(())?;
        let number = |v: &str| parse_optional_number(v).ok().flatten().unwrap_or_default();

        Ok(AssessmentPayload {
            student_id: student_id.to_string(),
            school_id: school_id.and_then(non_empty),
            date: self.date.trim().to_string(),
            parent_name: non_empty(&self.parent_name),
            height: number(&self.height),
            weight: number(&self.weight),
            bmi: self.effective_bmi().unwrap_or_default(),
            temperature: number(&self.temperature),
            pulse_rate: number(&self.pulse_rate),
            sp_o2: number(&self.sp_o2),
            bp: self.bp.trim().to_string(),
            oral_health: self.oral_health.trim().to_lowercase(),
            dental_issues: non_empty(&self.dental_issues),
            left_eye: self.left_eye.trim().to_string(),
            right_eye: self.right_eye.trim().to_string(),
            hearing_comments: non_empty(&self.hearing_comments),
            additional_comments: non_empty(&self.additional_comments),
            doctor_signature: non_empty(&self.doctor_signature),
        })
    }
}

fn is_blood_pressure(value: &str) -> bool {
    regex::Regex::new(r"^\d{2,3}\s*/\s*\d{2,3}$")
        .map(|re| re.is_match(value))
        .unwrap_or(false)
}

/// Validate and save: create when `editing` is `None`, otherwise update
pub async fn save<T: Transport, S: SessionStore>(
    client: &ApiClient<T, S>,
    form: &AssessmentForm,
    student_id: &str,
    school_id: Option<&str>,
    editing: Option<&str>,
) -> ClientResult<Assessment> {
    let payload = form.to_payload(student_id, school_id)?;
    match editing {
        Some(id) => assessments::update(client, id, &payload).await,
        None => assessments::create(client, &payload).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> AssessmentForm {
        AssessmentForm {
            date: "2024-08-12".into(),
            height: "140".into(),
            weight: "35".into(),
            temperature: "98.4".into(),
            pulse_rate: "82".into(),
            sp_o2: "98".into(),
            bp: "110/70".into(),
            oral_health: "Good".into(),
            left_eye: "6/6".into(),
            right_eye: "6/9".into(),
            ..AssessmentForm::default()
        }
    }

    #[test]
    fn test_bmi_derived_when_blank() {
        assert_eq!(compute_bmi(140.0, 35.0), Some(17.9));
        assert_eq!(compute_bmi(0.0, 35.0), None);

        let payload = filled().to_payload("stu1", Some("sch1")).unwrap();
        assert_eq!(payload.bmi, 17.9);
        assert_eq!(payload.oral_health, "good");

        let mut typed = filled();
        typed.bmi = "18.2".into();
        assert_eq!(typed.effective_bmi(), Some(18.2));
    }

    #[test]
    fn test_vitals_must_parse() {
        let mut form = filled();
        form.pulse_rate = "fast".into();
        form.sp_o2.clear();
        form.bp = "high".into();

        let errors = form.validate();
        assert_eq!(errors.get("pulseRate"), Some("Pulse rate must be a positive number"));
        assert_eq!(errors.get("spO2"), Some("SpO2 is required"));
        assert_eq!(errors.get("bp"), Some("Blood pressure must look like 120/80"));
        assert!(form.to_payload("stu1", None).is_err());
    }

    #[test]
    fn test_prefill_from_record() {
        let record: Assessment = serde_json::from_value(serde_json::json!({
            "_id": "a1",
            "studentId": "stu1",
            "date": "2024-08-12T00:00:00.000Z",
            "height": 140,
            "oralHealth": "fair"
        }))
        .unwrap();
        let form = AssessmentForm::from_assessment(&record);
        assert_eq!(form.date, "2024-08-12");
        assert_eq!(form.height, "140");
        assert_eq!(form.oral_health, "fair");
    }
}
