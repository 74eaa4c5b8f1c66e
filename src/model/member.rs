//! Members (students)

use serde::{Deserialize, Serialize};

use super::common::one_or_many;

/// Valid blood groups offered by the student form
pub const BLOOD_GROUPS: [&str; 8] = ["A+", "A-", "B+", "B-", "AB+", "AB-", "O+", "O-"];

/// Guardian relations offered by the student form
pub const GUARDIAN_RELATIONS: [&str; 3] = ["father", "mother", "guardian"];

/// A member record as served by `/api/v1/members`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub member_id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub alternate_phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub dob: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub blood_group: Option<String>,
    #[serde(default)]
    pub height_in_ft: Option<f64>,
    #[serde(default)]
    pub weight_in_kg: Option<f64>,
    #[serde(default)]
    pub profile_pic: Option<String>,
    #[serde(default)]
    pub is_student: Option<bool>,
    #[serde(default)]
    pub student_details: Option<StudentDetails>,
    #[serde(default)]
    pub emergency_contact: Option<EmergencyContact>,
    #[serde(default, deserialize_with = "one_or_many")]
    pub address: Vec<Address>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Member {
    pub fn grade(&self) -> Option<&str> {
        self.student_details.as_ref().map(|d| d.grade.as_str())
    }

    pub fn section(&self) -> Option<&str> {
        self.student_details.as_ref().map(|d| d.section.as_str())
    }

    /// First address on file
    pub fn primary_address(&self) -> Option<&Address> {
        self.address.first()
    }

    /// Member id shown in tables, falling back to the document id
    pub fn display_id(&self) -> &str {
        self.member_id.as_deref().unwrap_or(&self.id)
    }
}

/// School placement for a student
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StudentDetails {
    #[serde(default)]
    pub school_id: Option<String>,
    #[serde(default)]
    pub grade: String,
    #[serde(default)]
    pub section: String,
}

/// Guardian / emergency contact
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct EmergencyContact {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub relation: String,
    #[serde(default)]
    pub phone: String,
}

/// Postal address
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub pin_code: String,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub landmark: String,
    #[serde(default)]
    pub state: String,
    #[serde(default = "default_country")]
    pub country: String,
    #[serde(default)]
    pub location: GeoLocation,
}

fn default_country() -> String {
    "India".to_string()
}

impl Default for Address {
    fn default() -> Self {
        Self {
            description: String::new(),
            pin_code: String::new(),
            region: String::new(),
            landmark: String::new(),
            state: String::new(),
            country: default_country(),
            location: GeoLocation::default(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct GeoLocation {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// Create/update payload for a student
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MemberPayload {
    pub is_student: bool,
    pub name: String,
    pub phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alternate_phone: Option<String>,
    pub email: String,
    pub dob: String,
    pub gender: String,
    pub blood_group: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height_in_ft: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight_in_kg: Option<f64>,
    pub employment_status: String,
    pub student_details: StudentDetails,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emergency_contact: Option<EmergencyContact>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_pic: Option<String>,
}

/// Query parameters for `GET /api/v1/members`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemberQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub search: Option<String>,
    pub school_id: Option<String>,
    pub is_student: Option<bool>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
    pub grade: Option<String>,
    pub section: Option<String>,
}

impl MemberQuery {
    /// Students of a school, page by page, oldest first
    pub fn students(school_id: &str, page: u32, limit: u32) -> Self {
        Self {
            page: Some(page),
            limit: Some(limit),
            school_id: Some(school_id.to_string()),
            is_student: Some(true),
            sort_by: Some("createdAt".to_string()),
            sort_order: Some("asc".to_string()),
            ..Self::default()
        }
    }

    /// Query string pairs; empty values are omitted
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        push_opt(&mut pairs, "page", self.page.map(|p| p.to_string()));
        push_opt(&mut pairs, "limit", self.limit.map(|l| l.to_string()));
        push_opt(&mut pairs, "search", self.search.clone());
        push_opt(&mut pairs, "schoolId", self.school_id.clone());
        push_opt(
            &mut pairs,
            "isStudent",
            self.is_student.filter(|s| *s).map(|s| s.to_string()),
        );
        push_opt(&mut pairs, "sortBy", self.sort_by.clone());
        push_opt(&mut pairs, "sortOrder", self.sort_order.clone());
        push_opt(&mut pairs, "grade", self.grade.clone());
        push_opt(&mut pairs, "section", self.section.clone());
        pairs
    }
}

pub(crate) fn push_opt(pairs: &mut Vec<(String, String)>, key: &str, value: Option<String>) {
    if let Some(v) = value {
        if !v.trim().is_empty() {
            pairs.push((key.to_string(), v));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_member_address_object_or_array() {
        let as_object: Member = serde_json::from_value(json!({
            "_id": "m1",
            "name": "Asha",
            "address": {"region": "Koramangala", "pinCode": "560034"}
        }))
        .unwrap();
        assert_eq!(as_object.primary_address().unwrap().region, "Koramangala");
        assert_eq!(as_object.primary_address().unwrap().country, "India");

        let as_array: Member = serde_json::from_value(json!({
            "_id": "m2",
            "name": "Ravi",
            "address": [{"region": "Ejipura"}]
        }))
        .unwrap();
        assert_eq!(as_array.primary_address().unwrap().region, "Ejipura");

        let missing: Member = serde_json::from_value(json!({"_id": "m3", "name": "Meera"})).unwrap();
        assert!(missing.primary_address().is_none());
        assert_eq!(missing.display_id(), "m3");
    }

    #[test]
    fn test_member_decodes_when_backend_echoes_id_twice() {
        let member: Member = serde_json::from_value(json!({
            "_id": "m1",
            "id": "m1",
            "name": "Asha"
        }))
        .unwrap();
        assert_eq!(member.id, "m1");
        assert_eq!(member.name, "Asha");
    }

    #[test]
    fn test_member_query_skips_empty_values() {
        let mut query = MemberQuery::students("school-1", 2, 10);
        query.search = Some(String::new());
        query.grade = Some("5".to_string());

        let pairs = query.to_pairs();
        let keys: Vec<&str> = pairs.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(
            keys,
            vec!["page", "limit", "schoolId", "isStudent", "sortBy", "sortOrder", "grade"]
        );
    }
}
