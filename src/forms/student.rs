//! Add / edit student form

use tracing::info;

use super::{
    is_pin_code, is_ten_digit_phone, is_valid_email, non_empty, normalize_phone,
    parse_date, parse_optional_number, strip_phone,
};
use crate::client::{ApiClient, Transport};
use crate::error::{ClientResult, ValidationErrors};
use crate::model::member::{BLOOD_GROUPS, GUARDIAN_RELATIONS};
use crate::model::{
    Address, EmergencyContact, GeoLocation, Member, MemberPayload, PincodeLookup, StudentDetails,
};
use crate::services::members;
use crate::session::SessionStore;

/// Address block of the student form
#[derive(Debug, Clone, PartialEq)]
pub struct AddressForm {
    pub description: String,
    pub pin_code: String,
    pub region: String,
    pub landmark: String,
    pub state: String,
    pub country: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl Default for AddressForm {
    fn default() -> Self {
        Self {
            description: String::new(),
            pin_code: String::new(),
            region: String::new(),
            landmark: String::new(),
            state: String::new(),
            country: "India".to_string(),
            latitude: None,
            longitude: None,
        }
    }
}

impl AddressForm {
    fn is_filled(&self) -> bool {
        [
            &self.description,
            &self.pin_code,
            &self.region,
            &self.landmark,
            &self.state,
        ]
        .iter()
        .any(|v| !v.trim().is_empty())
    }

    fn to_address(&self) -> Address {
        Address {
            description: self.description.trim().to_string(),
            pin_code: self.pin_code.trim().to_string(),
            region: self.region.trim().to_string(),
            landmark: self.landmark.trim().to_string(),
            state: self.state.trim().to_string(),
            country: self.country.clone(),
            location: GeoLocation {
                latitude: self.latitude,
                longitude: self.longitude,
            },
        }
    }
}

/// Raw student form input
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StudentForm {
    pub name: String,
    pub date_of_birth: String,
    pub gender: String,
    pub mobile: String,
    pub alternate_mobile: String,
    pub email: String,
    pub class: String,
    pub section: String,
    pub guardian_name: String,
    pub guardian_mobile: String,
    pub guardian_relation: String,
    pub blood_group: String,
    pub height_in_ft: String,
    pub weight_in_kg: String,
    pub profile_pic: String,
    pub address: AddressForm,
}

impl StudentForm {
    /// Pre-fill from an existing member for editing
    pub fn from_member(member: &Member) -> Self {
        let address = member
            .primary_address()
            .map(|a| AddressForm {
                description: a.description.clone(),
                pin_code: a.pin_code.clone(),
                region: a.region.clone(),
                landmark: a.landmark.clone(),
                state: a.state.clone(),
                country: if a.country.is_empty() {
                    "India".to_string()
                } else {
                    a.country.clone()
                },
                latitude: a.location.latitude,
                longitude: a.location.longitude,
            })
            .unwrap_or_default();
        let contact = member.emergency_contact.clone().unwrap_or_default();

        Self {
            name: member.name.clone(),
            date_of_birth: member
                .dob
                .as_deref()
                .and_then(parse_date)
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            gender: member.gender.clone().unwrap_or_default(),
            mobile: member.phone.as_deref().map(strip_phone).unwrap_or_default(),
            alternate_mobile: member
                .alternate_phone
                .as_deref()
                .map(strip_phone)
                .unwrap_or_default(),
            email: member.email.clone().unwrap_or_default(),
            class: member.grade().unwrap_or_default().to_string(),
            section: member.section().unwrap_or_default().to_string(),
            guardian_name: contact.name,
            guardian_mobile: strip_phone(&contact.phone),
            guardian_relation: contact.relation.to_lowercase(),
            blood_group: member.blood_group.clone().unwrap_or_default(),
            height_in_ft: member.height_in_ft.map(|h| h.to_string()).unwrap_or_default(),
            weight_in_kg: member.weight_in_kg.map(|w| w.to_string()).unwrap_or_default(),
            profile_pic: member.profile_pic.clone().unwrap_or_default(),
            address,
        }
    }

    /// Fill state and, when unambiguous, the region from a PIN lookup
    pub fn apply_pincode(&mut self, lookup: &PincodeLookup) {
        if let Some(state) = &lookup.state {
            self.address.state = state.clone();
        }
        match lookup.regions.as_slice() {
            [only] => self.address.region = only.name.clone(),
            regions if !regions.iter().any(|r| r.name == self.address.region) => {
                self.address.region.clear()
            }
            _ => {}
        }
    }

    pub fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();

        if self.name.trim().is_empty() {
            errors.add("name", "Name is required");
        }

        if self.date_of_birth.trim().is_empty() {
            errors.add("dateOfBirth", "Date of birth is required");
        } else if parse_date(&self.date_of_birth).is_none() {
            errors.add("dateOfBirth", "Please enter a valid date of birth");
        }

        if self.gender.trim().is_empty() {
            errors.add("gender", "Gender is required");
        }

        if self.mobile.trim().is_empty() {
            errors.add("mobile", "Mobile number is required");
        } else if !is_ten_digit_phone(&self.mobile) {
            errors.add("mobile", "Please enter a valid 10-digit mobile number");
        }

        if !self.alternate_mobile.trim().is_empty() && !is_ten_digit_phone(&self.alternate_mobile)
        {
            errors.add("alternateMobile", "Please enter a valid 10-digit mobile number");
        }

        if self.email.trim().is_empty() {
            errors.add("email", "Email is required");
        } else if !is_valid_email(&self.email) {
            errors.add("email", "Please enter a valid email address");
        }

        if self.class.trim().is_empty() {
            errors.add("class", "Class is required");
        }
        if self.section.trim().is_empty() {
            errors.add("section", "Section is required");
        }

        if self.blood_group.trim().is_empty() {
            errors.add("bloodGroup", "Blood group is required");
        } else if !BLOOD_GROUPS.contains(&self.blood_group.trim()) {
            errors.add("bloodGroup", "Please select a valid blood group");
        }

        if !self.guardian_mobile.trim().is_empty() && !is_ten_digit_phone(&self.guardian_mobile) {
            errors.add("guardianMobile", "Please enter a valid 10-digit mobile number");
        }

        let relation = self.guardian_relation.trim().to_lowercase();
        if !relation.is_empty() && !GUARDIAN_RELATIONS.contains(&relation.as_str()) {
            errors.add("guardianRelation", "Please select a valid relation");
        }

        if !self.address.pin_code.trim().is_empty() && !is_pin_code(&self.address.pin_code) {
            errors.add("pinCode", "Please enter a valid 6-digit PIN code");
        }

        match parse_optional_number(&self.height_in_ft) {
            Ok(Some(h)) if h > 0.0 => {}
            Ok(None) => {}
            _ => errors.add("heightInFt", "Please enter a valid height"),
        }
        match parse_optional_number(&self.weight_in_kg) {
            Ok(Some(w)) if w > 0.0 => {}
            Ok(None) => {}
            _ => errors.add("weightInKg", "Please enter a valid weight"),
        }

        errors
    }

    /// Validate and build the create/update body
    pub fn to_payload(&self, school_id: &str) -> ClientResult<MemberPayload> {
        self.validate().into_result(())?;

        let guardian_filled = [
            &self.guardian_name,
            &self.guardian_mobile,
            &self.guardian_relation,
        ]
        .iter()
        .any(|v| !v.trim().is_empty());

        Ok(MemberPayload {
            is_student: true,
            name: self.name.trim().to_string(),
            phone: normalize_phone(&self.mobile),
            alternate_phone: non_empty(&normalize_phone(&self.alternate_mobile)),
            email: self.email.trim().to_string(),
            dob: self.date_of_birth.trim().to_string(),
            gender: self.gender.trim().to_lowercase(),
            blood_group: self.blood_group.trim().to_string(),
            height_in_ft: parse_optional_number(&self.height_in_ft).ok().flatten(),
            weight_in_kg: parse_optional_number(&self.weight_in_kg).ok().flatten(),
            employment_status: "student".to_string(),
            student_details: StudentDetails {
                school_id: non_empty(school_id),
                grade: self.class.trim().to_string(),
                section: self.section.trim().to_string(),
            },
            address: self.address.is_filled().then(|| self.address.to_address()),
            emergency_contact: guardian_filled.then(|| EmergencyContact {
                name: self.guardian_name.trim().to_string(),
                relation: self.guardian_relation.trim().to_lowercase(),
                phone: normalize_phone(&self.guardian_mobile),
            }),
            profile_pic: non_empty(&self.profile_pic),
        })
    }
}

/// Validate and save: create when `editing` is `None`, otherwise update
pub async fn save<T: Transport, S: SessionStore>(
    client: &ApiClient<T, S>,
    form: &StudentForm,
    school_id: &str,
    editing: Option<&str>,
) -> ClientResult<Member> {
    let payload = form.to_payload(school_id)?;
    match editing {
        Some(id) => members::update(client, id, &payload).await,
        None => {
            let member = members::create(client, &payload).await?;
            info!(name = %payload.name, "Student added");
            Ok(member)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::testing::MockTransport;
    use crate::client::{Method, RequestBody};
    use crate::model::PostOffice;
    use crate::session::MemorySessionStore;
    use serde_json::json;

    fn filled() -> StudentForm {
        StudentForm {
            name: "Asha Rao".into(),
            date_of_birth: "2014-03-09".into(),
            gender: "Female".into(),
            mobile: "98765 43210".into(),
            email: "asha@example.com".into(),
            class: "5".into(),
            section: "A".into(),
            blood_group: "O+".into(),
            ..StudentForm::default()
        }
    }

    #[test]
    fn test_empty_form_reports_required_fields() {
        let errors = StudentForm::default().validate();
        for field in [
            "name",
            "dateOfBirth",
            "gender",
            "mobile",
            "email",
            "class",
            "section",
            "bloodGroup",
        ] {
            assert!(errors.contains(field), "missing error for {}", field);
        }
        assert_eq!(errors.get("mobile"), Some("Mobile number is required"));
        assert!(!errors.contains("pinCode"));
    }

    #[test]
    fn test_optional_fields_checked_when_present() {
        let mut form = filled();
        form.guardian_mobile = "12345".into();
        form.address.pin_code = "5600".into();
        form.height_in_ft = "-4".into();
        form.weight_in_kg = "abc".into();
        form.blood_group = "C+".into();

        let errors = form.validate();
        assert_eq!(errors.get("guardianMobile"), Some("Please enter a valid 10-digit mobile number"));
        assert_eq!(errors.get("pinCode"), Some("Please enter a valid 6-digit PIN code"));
        assert_eq!(errors.get("heightInFt"), Some("Please enter a valid height"));
        assert_eq!(errors.get("weightInKg"), Some("Please enter a valid weight"));
        assert_eq!(errors.get("bloodGroup"), Some("Please select a valid blood group"));
    }

    #[test]
    fn test_payload_normalizes_and_omits_empty_blocks() {
        let payload = filled().to_payload("sch1").unwrap();
        assert!(payload.is_student);
        assert_eq!(payload.employment_status, "student");
        assert_eq!(payload.phone, "+919876543210");
        assert_eq!(payload.gender, "female");
        assert!(payload.address.is_none());
        assert!(payload.emergency_contact.is_none());
        assert!(payload.alternate_phone.is_none());

        let mut form = filled();
        form.guardian_relation = "Mother".into();
        form.guardian_mobile = "9123456780".into();
        form.address.landmark = "Near park".into();
        let payload = form.to_payload("sch1").unwrap();
        let contact = payload.emergency_contact.unwrap();
        assert_eq!(contact.relation, "mother");
        assert_eq!(contact.phone, "+919123456780");
        assert_eq!(payload.address.unwrap().country, "India");
    }

    #[test]
    fn test_prefill_strips_prefix() {
        let member: Member = serde_json::from_value(json!({
            "_id": "m1",
            "name": "Asha",
            "phone": "+919876543210",
            "dob": "2014-03-09T00:00:00.000Z",
            "emergencyContact": {"name": "Lata", "relation": "Mother", "phone": "+91 91234 56780"},
            "studentDetails": {"grade": "5", "section": "B"},
            "address": [{"pinCode": "560034", "region": "Koramangala"}]
        }))
        .unwrap();

        let form = StudentForm::from_member(&member);
        assert_eq!(form.mobile, "9876543210");
        assert_eq!(form.guardian_mobile, "9123456780");
        assert_eq!(form.guardian_relation, "mother");
        assert_eq!(form.date_of_birth, "2014-03-09");
        assert_eq!(form.section, "B");
        assert_eq!(form.address.pin_code, "560034");
    }

    #[test]
    fn test_apply_pincode() {
        let mut form = filled();
        form.address.region = "Elsewhere".into();
        let office = |name: &str| PostOffice {
            name: name.into(),
            district: "Bangalore".into(),
            state: "Karnataka".into(),
        };

        form.apply_pincode(&PincodeLookup {
            regions: vec![office("Koramangala"), office("Ejipura")],
            state: Some("Karnataka".into()),
        });
        assert_eq!(form.address.state, "Karnataka");
        assert!(form.address.region.is_empty());

        form.apply_pincode(&PincodeLookup {
            regions: vec![office("Ejipura")],
            state: Some("Karnataka".into()),
        });
        assert_eq!(form.address.region, "Ejipura");
    }

    #[tokio::test]
    async fn test_save_issues_exactly_one_create() {
        let client = ApiClient::new("https://b.test", MockTransport::new(), MemorySessionStore::new());
        client
            .transport()
            .respond(201, json!({"status": "success", "data": {"_id": "m9", "name": "Asha Rao"}}));

        let mut form = filled();
        form.alternate_mobile = "9000000001".into();
        let member = save(&client, &form, "sch1", None).await.unwrap();
        assert_eq!(member.id, "m9");

        let sent = client.transport().requests();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].method, Method::Post);
        assert!(sent[0].url.ends_with("/api/v1/members"));
        let RequestBody::Json(body) = &sent[0].body else {
            panic!("expected JSON body");
        };
        assert_eq!(body["phone"], "+919876543210");
        assert_eq!(body["alternatePhone"], "+919000000001");
        assert_eq!(body["studentDetails"]["schoolId"], "sch1");
    }

    #[tokio::test]
    async fn test_save_invalid_sends_nothing() {
        let client = ApiClient::new("https://b.test", MockTransport::new(), MemorySessionStore::new());
        let err = save(&client, &StudentForm::default(), "sch1", None).await.unwrap_err();
        assert!(err.is_validation());
        assert_eq!(client.transport().request_count(), 0);
    }

    #[tokio::test]
    async fn test_save_with_id_updates() {
        let client = ApiClient::new("https://b.test", MockTransport::new(), MemorySessionStore::new());
        client
            .transport()
            .respond(200, json!({"status": "success", "data": {"_id": "m1", "name": "Asha Rao"}}));

        save(&client, &filled(), "sch1", Some("m1")).await.unwrap();
        let sent = client.transport().requests();
        assert_eq!(sent[0].method, Method::Put);
        assert!(sent[0].url.ends_with("/api/v1/members/m1"));
    }
}
