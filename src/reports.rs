//! Infirmary reports
//!
//! Reports are infirmary visits flattened into display rows, filtered on the
//! server by class, section, student, name and date range, and exportable
//! as CSV.

use std::io::Write;

use serde::Serialize;
use tracing::debug;

use crate::client::{ApiClient, Transport};
use crate::error::{ClientError, ClientResult};
use crate::model::{InfirmaryQuery, InfirmaryRecord};
use crate::services::infirmary;
use crate::session::SessionStore;

/// Placeholder for fields the record does not carry
pub const NOT_AVAILABLE: &str = "N/A";

/// Report filters as edited in the filter panel
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportFilters {
    pub class: String,
    pub section: String,
    /// Human-facing member id, not the record id
    pub student_id: String,
    pub name: String,
    pub from_date: String,
    pub to_date: String,
}

impl ReportFilters {
    /// Non-empty filters as `(label, value)` chips
    pub fn active(&self) -> Vec<(&'static str, &str)> {
        [
            ("class", self.class.as_str()),
            ("section", self.section.as_str()),
            ("studentId", self.student_id.as_str()),
            ("name", self.name.as_str()),
            ("fromDate", self.from_date.as_str()),
            ("toDate", self.to_date.as_str()),
        ]
        .into_iter()
        .filter(|(_, v)| !v.trim().is_empty())
        .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.active().is_empty()
    }

    /// Clear one filter by its chip label
    pub fn clear(&mut self, key: &str) {
        match key {
            "class" => self.class.clear(),
            "section" => self.section.clear(),
            "studentId" => self.student_id.clear(),
            "name" => self.name.clear(),
            "fromDate" => self.from_date.clear(),
            "toDate" => self.to_date.clear(),
            _ => {}
        }
    }

    /// Backend query for these filters
    pub fn to_query(&self, school_id: Option<&str>, search: &str) -> InfirmaryQuery {
        InfirmaryQuery {
            school_id: school_id.map(str::to_string),
            search: non_blank(search),
            class: non_blank(&self.class),
            section: non_blank(&self.section),
            member_id: non_blank(&self.student_id),
            name: non_blank(&self.name),
            from_date: non_blank(&self.from_date),
            to_date: non_blank(&self.to_date),
            ..InfirmaryQuery::default()
        }
    }
}

fn non_blank(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

/// One flattened report line
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRow {
    #[serde(rename = "Record ID")]
    pub id: String,
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "Type")]
    pub kind: &'static str,
    #[serde(rename = "Student Name")]
    pub name: String,
    #[serde(rename = "Student ID")]
    pub student_id: String,
    #[serde(rename = "School")]
    pub school: String,
    #[serde(rename = "Complaints")]
    pub complaints: String,
    #[serde(rename = "Details")]
    pub details: String,
    #[serde(rename = "Consent From")]
    pub consent_from: String,
    #[serde(rename = "Treatment")]
    pub treatment: String,
}

impl From<&InfirmaryRecord> for ReportRow {
    fn from(record: &InfirmaryRecord) -> Self {
        let or_na = |v: Option<&str>| {
            v.filter(|s| !s.trim().is_empty())
                .unwrap_or(NOT_AVAILABLE)
                .to_string()
        };

        Self {
            id: record.id.clone(),
            date: or_na(record.date.as_deref().map(|d| d.get(..10).unwrap_or(d))),
            kind: "Infirmary",
            name: or_na(record.student_id.name()),
            student_id: or_na(record.student_id.member_id()),
            school: or_na(record.school_id.as_ref().and_then(|s| s.name())),
            complaints: or_na(record.complaints.as_deref()),
            details: or_na(record.details.as_deref()),
            consent_from: or_na(record.consent_from.as_deref()),
            treatment: or_na(record.treatment_given.as_deref()),
        }
    }
}

/// Fetch report rows for the active filters
pub async fn fetch<T: Transport, S: SessionStore>(
    client: &ApiClient<T, S>,
    filters: &ReportFilters,
    school_id: Option<&str>,
    search: &str,
) -> ClientResult<Vec<ReportRow>> {
    let query = filters.to_query(school_id, search);
    let records = infirmary::list(client, &query).await?;
    debug!(count = records.len(), "Fetched report records");
    Ok(records.iter().map(ReportRow::from).collect())
}

/// Write rows as CSV with a header line
pub fn write_csv<W: Write>(rows: &[ReportRow], writer: W) -> ClientResult<()> {
    let mut csv = csv::Writer::from_writer(writer);
    if rows.is_empty() {
        csv.write_record(HEADERS)
            .map_err(|e| ClientError::Export(e.to_string()))?;
    }
    for row in rows {
        csv.serialize(row)
            .map_err(|e| ClientError::Export(e.to_string()))?;
    }
    csv.flush().map_err(|e| ClientError::Export(e.to_string()))
}

/// CSV text for a set of rows
pub fn to_csv(rows: &[ReportRow]) -> ClientResult<String> {
    let mut buffer = Vec::new();
    write_csv(rows, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| ClientError::Export(e.to_string()))
}

/// Column headers, in export order
pub const HEADERS: [&str; 10] = [
    "Record ID",
    "Date",
    "Type",
    "Student Name",
    "Student ID",
    "School",
    "Complaints",
    "Details",
    "Consent From",
    "Treatment",
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::testing::MockTransport;
    use crate::session::MemorySessionStore;
    use serde_json::json;

    fn record() -> InfirmaryRecord {
        serde_json::from_value(json!({
            "_id": "r1",
            "studentId": {"_id": "s1", "name": "Asha Rao", "memberId": "STU-7"},
            "schoolId": {"_id": "sch1", "name": "Green Valley"},
            "date": "2024-03-05T00:00:00.000Z",
            "complaints": "Fever",
            "consentFrom": "Parent",
            "treatmentGiven": "Paracetamol"
        }))
        .unwrap()
    }

    #[test]
    fn test_row_defaults_missing_fields() {
        let row = ReportRow::from(&record());
        assert_eq!(row.date, "2024-03-05");
        assert_eq!(row.name, "Asha Rao");
        assert_eq!(row.student_id, "STU-7");
        assert_eq!(row.school, "Green Valley");
        assert_eq!(row.details, NOT_AVAILABLE);

        let bare: InfirmaryRecord =
            serde_json::from_value(json!({"_id": "r2", "studentId": "s2"})).unwrap();
        let row = ReportRow::from(&bare);
        assert_eq!(row.name, NOT_AVAILABLE);
        assert_eq!(row.school, NOT_AVAILABLE);
    }

    #[test]
    fn test_csv_header() {
        let text = to_csv(&[ReportRow::from(&record())]).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some(HEADERS.join(",").as_str()));
        assert!(lines.next().unwrap().starts_with("r1,2024-03-05,Infirmary,Asha Rao,STU-7"));

        let empty = to_csv(&[]).unwrap();
        assert_eq!(empty.trim_end(), HEADERS.join(","));
    }

    #[test]
    fn test_filter_chips_and_query() {
        let mut filters = ReportFilters {
            class: "5".into(),
            student_id: "STU-7".into(),
            from_date: "2024-03-01".into(),
            ..ReportFilters::default()
        };
        assert_eq!(filters.active().len(), 3);

        let pairs = filters.to_query(Some("sch1"), " ").to_pairs();
        assert!(pairs.contains(&("studentId".to_string(), "STU-7".to_string())));
        assert!(pairs.contains(&("class".to_string(), "5".to_string())));
        assert!(!pairs.iter().any(|(k, _)| k == "search"));

        filters.clear("class");
        assert_eq!(filters.active().len(), 2);
    }

    #[tokio::test]
    async fn test_fetch_maps_rows() {
        let client = ApiClient::new("https://b.test", MockTransport::new(), MemorySessionStore::new());
        client.transport().respond(
            200,
            json!({"status": "success", "data": [serde_json::to_value(record()).unwrap()]}),
        );

        let rows = fetch(&client, &ReportFilters::default(), Some("sch1"), "")
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert!(client.transport().requests()[0].url.contains("schoolId=sch1"));
    }
}
