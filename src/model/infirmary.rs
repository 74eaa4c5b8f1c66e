//! Infirmary visit records

use serde::{Deserialize, Serialize};

use super::common::RecordRef;
use super::member::push_opt;

/// A logged infirmary visit
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InfirmaryRecord {
    #[serde(rename = "_id")]
    pub id: String,
    pub student_id: RecordRef,
    #[serde(default)]
    pub school_id: Option<RecordRef>,
    #[serde(default)]
    pub nurse_id: Option<RecordRef>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub consent_from: Option<String>,
    #[serde(default)]
    pub complaints: Option<String>,
    #[serde(default)]
    pub details: Option<String>,
    #[serde(default, alias = "treatment")]
    pub treatment_given: Option<String>,
    #[serde(default)]
    pub medicine_provided: Option<MedicineProvided>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Medicine dispensed during a visit
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MedicineProvided {
    pub inventory_id: RecordRef,
    pub quantity: u32,
}

/// Create/update payload for an infirmary record
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InfirmaryPayload {
    pub student_id: String,
    pub school_id: String,
    pub nurse_id: String,
    pub date: String,
    pub time: String,
    pub consent_from: String,
    pub complaints: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub details: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub treatment_given: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub medicine_provided: Option<MedicineRequest>,
}

impl InfirmaryPayload {
    /// Names of required fields that are blank, in canonical order
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("studentId", &self.student_id),
            ("schoolId", &self.school_id),
            ("nurseId", &self.nurse_id),
            ("date", &self.date),
            ("time", &self.time),
            ("consentFrom", &self.consent_from),
        ]
        .into_iter()
        .filter(|(_, v)| v.trim().is_empty())
        .map(|(k, _)| k)
        .collect()
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MedicineRequest {
    pub inventory_id: String,
    pub quantity: u32,
}

/// Query parameters for `GET /api/v1/infirmary`
#[derive(Debug, Clone, PartialEq)]
pub struct InfirmaryQuery {
    pub student_id: Option<String>,
    pub school_id: Option<String>,
    pub search: Option<String>,
    pub class: Option<String>,
    pub section: Option<String>,
    pub member_id: Option<String>,
    pub name: Option<String>,
    pub from_date: Option<String>,
    pub to_date: Option<String>,
    pub page: u32,
    pub limit: u32,
    pub sort_by: String,
    pub sort_order: String,
}

impl Default for InfirmaryQuery {
    fn default() -> Self {
        Self {
            student_id: None,
            school_id: None,
            search: None,
            class: None,
            section: None,
            member_id: None,
            name: None,
            from_date: None,
            to_date: None,
            page: 1,
            limit: 10,
            sort_by: "createdAt".to_string(),
            sort_order: "desc".to_string(),
        }
    }
}

impl InfirmaryQuery {
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        push_opt(&mut pairs, "studentId", self.student_id.clone());
        push_opt(&mut pairs, "schoolId", self.school_id.clone());
        push_opt(&mut pairs, "search", self.search.clone());
        push_opt(&mut pairs, "class", self.class.clone());
        push_opt(&mut pairs, "section", self.section.clone());
        // Reports filter by the human-facing member id under this key
        if self.student_id.is_none() {
            push_opt(&mut pairs, "studentId", self.member_id.clone());
        }
        push_opt(&mut pairs, "name", self.name.clone());
        push_opt(&mut pairs, "fromDate", self.from_date.clone());
        push_opt(&mut pairs, "toDate", self.to_date.clone());
        pairs.push(("page".to_string(), self.page.max(1).to_string()));
        pairs.push(("limit".to_string(), self.limit.max(1).to_string()));
        pairs.push(("sortBy".to_string(), self.sort_by.clone()));
        pairs.push(("sortOrder".to_string(), self.sort_order.clone()));
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_query_pairs() {
        let pairs = InfirmaryQuery::default().to_pairs();
        assert_eq!(
            pairs,
            vec![
                ("page".to_string(), "1".to_string()),
                ("limit".to_string(), "10".to_string()),
                ("sortBy".to_string(), "createdAt".to_string()),
                ("sortOrder".to_string(), "desc".to_string()),
            ]
        );
    }

    #[test]
    fn test_missing_fields_in_order() {
        let payload = InfirmaryPayload {
            student_id: "s1".into(),
            consent_from: "parent".into(),
            ..InfirmaryPayload::default()
        };
        assert_eq!(payload.missing_fields(), vec!["schoolId", "nurseId", "date", "time"]);
    }
}
