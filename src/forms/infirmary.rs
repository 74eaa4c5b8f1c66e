//! Infirmary visit form

use chrono::Local;

use super::parse_date;
use crate::client::{ApiClient, Transport};
use crate::error::{ClientError, ClientResult};
use crate::model::{InfirmaryPayload, InfirmaryRecord, InventoryItem, MedicineRequest};
use crate::services::infirmary;
use crate::session::{NurseSession, SessionStore};

pub const CONSENT_OPTIONS: [&str; 4] = ["Parent", "Guardian", "Teacher", "School Authority"];

pub const COMPLAINT_OPTIONS: [&str; 5] = ["Fever", "Headache", "Stomach Pain", "Nausea", "Others"];

/// Complaint choice that switches to the free-text field
pub const OTHER_COMPLAINT: &str = "Others";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct InfirmaryForm {
    pub consent_from: String,
    pub consent_date: String,
    pub consent_time: String,
    pub complaints: String,
    pub other_complaint: String,
    pub details: String,
    pub treatment: String,
    /// Selected inventory item id
    pub tablet: Option<String>,
    pub quantity: String,
}

impl InfirmaryForm {
    /// Blank form stamped with the current local date and time
    pub fn now() -> Self {
        let now = Local::now();
        Self {
            consent_date: now.format("%Y-%m-%d").to_string(),
            consent_time: now.format("%H:%M").to_string(),
            ..Self::default()
        }
    }

    /// Complaint text that will be stored
    pub fn complaint(&self) -> String {
        if self.complaints == OTHER_COMPLAINT {
            self.other_complaint.trim().to_string()
        } else {
            self.complaints.trim().to_string()
        }
    }

    /// First problem found, in the order the form reads
    pub fn validate(&self) -> ClientResult<()> {
        if self.consent_from.trim().is_empty() {
            return Err(ClientError::invalid(
                "consentFrom",
                "Please select who provided consent",
            ));
        }
        if self.complaint().is_empty() {
            return Err(ClientError::invalid("complaints", "Please specify the complaints"));
        }

        let tablet = self.tablet.as_deref().filter(|t| !t.is_empty());
        let quantity = self.quantity.trim();
        if tablet.is_some() && quantity.is_empty() {
            return Err(ClientError::invalid(
                "quantity",
                "Please specify the quantity of tablets",
            ));
        }
        if !quantity.is_empty() && tablet.is_none() {
            return Err(ClientError::invalid("tablet", "Please select a tablet"));
        }
        if !quantity.is_empty() && self.parsed_quantity().is_none() {
            return Err(ClientError::invalid("quantity", "Please enter a valid quantity"));
        }
        if parse_date(&self.consent_date).is_none() {
            return Err(ClientError::invalid("date", "Please enter a valid date"));
        }
        Ok(())
    }

    fn parsed_quantity(&self) -> Option<u32> {
        self.quantity.trim().parse::<u32>().ok().filter(|q| *q > 0)
    }

    fn medicine(&self) -> Option<MedicineRequest> {
        let inventory_id = self.tablet.clone().filter(|t| !t.is_empty())?;
        let quantity = self.parsed_quantity()?;
        Some(MedicineRequest {
            inventory_id,
            quantity,
        })
    }

    /// Build the record body; school and nurse come from the signed-in nurse
    pub fn to_payload(
        &self,
        student_id: &str,
        nurse: &NurseSession,
    ) -> ClientResult<InfirmaryPayload> {
        self.validate()?;
        let date = parse_date(&self.consent_date)
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default();

        Ok(InfirmaryPayload {
            student_id: student_id.to_string(),
            school_id: nurse.school_id().unwrap_or_default().to_string(),
            nurse_id: nurse.nurse_id().to_string(),
            date,
            time: self.consent_time.trim().to_string(),
            consent_from: self.consent_from.trim().to_lowercase(),
            complaints: self.complaint(),
            details: self.details.trim().to_string(),
            treatment_given: self.treatment.trim().to_string(),
            medicine_provided: self.medicine(),
        })
    }
}

/// Items offered in the tablet picker: only those with stock left
pub fn tablet_options(items: &[InventoryItem]) -> Vec<&InventoryItem> {
    items.iter().filter(|i| i.current_stock > 0).collect()
}

/// Validate, check stock against the backend, then create the record
pub async fn submit<T: Transport, S: SessionStore>(
    client: &ApiClient<T, S>,
    form: &InfirmaryForm,
    student_id: &str,
    nurse: &NurseSession,
) -> ClientResult<InfirmaryRecord> {
    let payload = form.to_payload(student_id, nurse)?;
    if let Some(medicine) = &payload.medicine_provided {
        infirmary::validate_medicine_quantity(client, &medicine.inventory_id, medicine.quantity)
            .await?;
    }
    infirmary::create(client, &payload).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::testing::MockTransport;
    use crate::client::RequestBody;
    use crate::model::{AuthUser, Nurse, RecordRef};
    use crate::session::MemorySessionStore;
    use serde_json::json;

    fn nurse() -> NurseSession {
        NurseSession::new(
            AuthUser::default(),
            Nurse {
                id: "nurse-7".into(),
                school_id: Some(RecordRef::from("sch1")),
                ..Nurse::default()
            },
        )
    }

    fn filled() -> InfirmaryForm {
        InfirmaryForm {
            consent_from: "Parent".into(),
            consent_date: "2024-07-01".into(),
            consent_time: "10:30".into(),
            complaints: "Fever".into(),
            ..InfirmaryForm::default()
        }
    }

    #[test]
    fn test_validation_order() {
        let form = InfirmaryForm::default();
        assert_eq!(form.validate().unwrap_err().message(), "Please select who provided consent");

        let mut form = filled();
        form.complaints = OTHER_COMPLAINT.into();
        assert_eq!(form.validate().unwrap_err().message(), "Please specify the complaints");
        form.other_complaint = "Sprained ankle".into();
        assert!(form.validate().is_ok());

        let mut form = filled();
        form.tablet = Some("inv1".into());
        assert_eq!(
            form.validate().unwrap_err().message(),
            "Please specify the quantity of tablets"
        );

        let mut form = filled();
        form.quantity = "2".into();
        assert_eq!(form.validate().unwrap_err().message(), "Please select a tablet");
    }

    #[test]
    fn test_payload_uses_nurse_context() {
        let mut form = filled();
        form.complaints = OTHER_COMPLAINT.into();
        form.other_complaint = "Rash".into();
        form.tablet = Some("inv1".into());
        form.quantity = "2".into();

        let payload = form.to_payload("stu1", &nurse()).unwrap();
        assert_eq!(payload.nurse_id, "nurse-7");
        assert_eq!(payload.school_id, "sch1");
        assert_eq!(payload.consent_from, "parent");
        assert_eq!(payload.complaints, "Rash");
        assert_eq!(payload.medicine_provided.as_ref().unwrap().quantity, 2);
        assert!(payload.missing_fields().is_empty());
    }

    #[test]
    fn test_tablet_options_skip_empty_stock() {
        let items: Vec<InventoryItem> = serde_json::from_value(json!([
            {"_id": "a", "item_name": "ORS", "current_stock": 0},
            {"_id": "b", "item_name": "Paracetamol", "current_stock": 4}
        ]))
        .unwrap();
        let options = tablet_options(&items);
        assert_eq!(options.len(), 1);
        assert_eq!(options[0].id, "b");
    }

    #[tokio::test]
    async fn test_submit_checks_stock_first() {
        let client = ApiClient::new("https://b.test", MockTransport::new(), MemorySessionStore::new());
        client.transport().respond(
            200,
            json!({"status": "success", "data": {"_id": "inv1", "item_name": "ORS", "current_stock": 1}}),
        );

        let mut form = filled();
        form.tablet = Some("inv1".into());
        form.quantity = "3".into();

        let err = submit(&client, &form, "stu1", &nurse()).await.unwrap_err();
        assert_eq!(err.message(), "Insufficient stock. Available: 1");
        assert_eq!(client.transport().request_count(), 1);
    }

    #[tokio::test]
    async fn test_submit_creates_record() {
        let client = ApiClient::new("https://b.test", MockTransport::new(), MemorySessionStore::new());
        client.transport().respond(
            201,
            json!({"status": "success", "data": {"_id": "rec1", "studentId": "stu1"}}),
        );

        let record = submit(&client, &filled(), "stu1", &nurse()).await.unwrap();
        assert_eq!(record.id, "rec1");

        let sent = client.transport().requests();
        let RequestBody::Json(body) = &sent[0].body else {
            panic!("expected JSON body");
        };
        assert_eq!(body["date"], "2024-07-01");
        assert_eq!(body["nurseId"], "nurse-7");
        assert!(body.get("medicineProvided").is_none());
    }
}
