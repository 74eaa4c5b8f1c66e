//! Health assessments

use serde::{Deserialize, Deserializer, Serialize};

use super::common::RecordRef;
use super::member::push_opt;

/// A recorded health check for a student
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Assessment {
    #[serde(rename = "_id")]
    pub id: String,
    pub student_id: RecordRef,
    #[serde(default)]
    pub school_id: Option<RecordRef>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub parent_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub height: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub weight: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub bmi: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub temperature: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub pulse_rate: Option<f64>,
    #[serde(default, rename = "spO2", deserialize_with = "lenient_f64")]
    pub sp_o2: Option<f64>,
    #[serde(default)]
    pub bp: Option<String>,
    #[serde(default)]
    pub oral_health: Option<String>,
    #[serde(default)]
    pub dental_issues: Option<String>,
    #[serde(default)]
    pub left_eye: Option<String>,
    #[serde(default)]
    pub right_eye: Option<String>,
    #[serde(default)]
    pub hearing_comments: Option<String>,
    #[serde(default)]
    pub additional_comments: Option<String>,
    #[serde(default)]
    pub doctor_signature: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Create/update payload for an assessment
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentPayload {
    pub student_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub school_id: Option<String>,
    pub date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_name: Option<String>,
    pub height: f64,
    pub weight: f64,
    pub bmi: f64,
    pub temperature: f64,
    pub pulse_rate: f64,
    #[serde(rename = "spO2")]
    pub sp_o2: f64,
    pub bp: String,
    pub oral_health: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dental_issues: Option<String>,
    pub left_eye: String,
    pub right_eye: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hearing_comments: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_comments: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doctor_signature: Option<String>,
}

/// Query parameters for `GET /api/v1/assessments`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssessmentQuery {
    pub student_id: Option<String>,
    pub school_id: Option<String>,
    pub search: Option<String>,
    pub grade: Option<String>,
    pub section: Option<String>,
    pub from_date: Option<String>,
    pub to_date: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl AssessmentQuery {
    pub fn for_student(student_id: &str) -> Self {
        Self {
            student_id: Some(student_id.to_string()),
            ..Self::default()
        }
    }

    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        push_opt(&mut pairs, "studentId", self.student_id.clone());
        push_opt(&mut pairs, "schoolId", self.school_id.clone());
        push_opt(&mut pairs, "search", self.search.clone());
        push_opt(&mut pairs, "grade", self.grade.clone());
        push_opt(&mut pairs, "section", self.section.clone());
        push_opt(&mut pairs, "fromDate", self.from_date.clone());
        push_opt(&mut pairs, "toDate", self.to_date.clone());
        push_opt(&mut pairs, "page", self.page.map(|p| p.to_string()));
        push_opt(&mut pairs, "limit", self.limit.map(|l| l.to_string()));
        pairs
    }
}

/// Numbers sometimes arrive as strings ("98.6") from older records
pub(crate) fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumOrText {
        Num(f64),
        Text(String),
        Null(()),
    }

    Ok(match NumOrText::deserialize(deserializer)? {
        NumOrText::Num(n) => Some(n),
        NumOrText::Text(s) => s.trim().parse().ok(),
        NumOrText::Null(()) => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_assessment_lenient_numbers() {
        let a: Assessment = serde_json::from_value(json!({
            "_id": "a1",
            "studentId": {"_id": "s1", "name": "Asha"},
            "height": "132.5",
            "weight": 30,
            "spO2": null,
            "bp": "110/70"
        }))
        .unwrap();

        assert_eq!(a.height, Some(132.5));
        assert_eq!(a.weight, Some(30.0));
        assert_eq!(a.sp_o2, None);
        assert_eq!(a.student_id.name(), Some("Asha"));
    }
}
