//! Nurses and dashboard stats

use serde::{Deserialize, Serialize};

use super::common::RecordRef;
use super::member::push_opt;

/// A nurse profile
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Nurse {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub dob: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub profile_pic: Option<String>,
    #[serde(default)]
    pub school_id: Option<RecordRef>,
    #[serde(default)]
    pub languages_spoken: Vec<String>,
    #[serde(default)]
    pub introduction: Option<String>,
}

impl Nurse {
    pub fn school_id(&self) -> Option<&str> {
        self.school_id.as_ref().map(RecordRef::id)
    }

    pub fn school_name(&self) -> Option<&str> {
        self.school_id.as_ref().and_then(RecordRef::name)
    }
}

/// Create/update payload for a nurse
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NursePayload {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub phone: String,
    pub dob: String,
    pub gender: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_pic: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub school_id: Option<String>,
    pub languages_spoken: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub introduction: Option<String>,
}

/// Dashboard counters from `/api/v1/nurses/stats`
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct NurseStats {
    #[serde(default)]
    pub students: u64,
    #[serde(default)]
    pub assessments: u64,
    #[serde(default)]
    pub infirmaries: u64,
}

/// Query parameters for `GET /api/v1/nurses`
#[derive(Debug, Clone, PartialEq)]
pub struct NurseQuery {
    pub page: u32,
    pub limit: u32,
    pub search: Option<String>,
}

impl Default for NurseQuery {
    fn default() -> Self {
        Self {
            page: 1,
            limit: 10,
            search: None,
        }
    }
}

impl NurseQuery {
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![
            ("page".to_string(), self.page.to_string()),
            ("limit".to_string(), self.limit.to_string()),
        ];
        push_opt(&mut pairs, "search", self.search.clone());
        pairs
    }
}
