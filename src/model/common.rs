//! Shared record shapes
//!
//! References that the backend serves either as a bare id or as a populated
//! document, plus the small non-entity payloads (pincode lookup, uploads).

use serde::{Deserialize, Deserializer, Serialize};

/// A reference to another document: bare id or populated object
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum RecordRef {
    Id(String),
    Populated(PopulatedRef),
}

/// The fields pages read from a populated reference
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PopulatedRef {
    #[serde(rename = "_id", default)]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub member_id: Option<String>,
    #[serde(default)]
    pub item_name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

impl RecordRef {
    pub fn id(&self) -> &str {
        match self {
            RecordRef::Id(id) => id,
            RecordRef::Populated(p) => &p.id,
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            RecordRef::Id(_) => None,
            RecordRef::Populated(p) => p.name.as_deref().or(p.item_name.as_deref()),
        }
    }

    pub fn member_id(&self) -> Option<&str> {
        match self {
            RecordRef::Id(_) => None,
            RecordRef::Populated(p) => p.member_id.as_deref(),
        }
    }

    pub fn phone(&self) -> Option<&str> {
        match self {
            RecordRef::Id(_) => None,
            RecordRef::Populated(p) => p.phone.as_deref(),
        }
    }
}

impl From<&str> for RecordRef {
    fn from(id: &str) -> Self {
        RecordRef::Id(id.to_string())
    }
}

impl From<String> for RecordRef {
    fn from(id: String) -> Self {
        RecordRef::Id(id)
    }
}

/// Accept either `T` or `[T]` and always yield a list
pub(crate) fn one_or_many<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany<T> {
        Many(Vec<T>),
        One(T),
        Null(()),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::Many(items) => items,
        OneOrMany::One(item) => vec![item],
        OneOrMany::Null(()) => Vec::new(),
    })
}

/// Post office entry from the pincode lookup
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PostOffice {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "District", default)]
    pub district: String,
    #[serde(rename = "State", default)]
    pub state: String,
}

/// One block of the raw pincode response
#[derive(Debug, Clone, Deserialize)]
pub struct PincodeBlock {
    #[serde(rename = "Status", default)]
    pub status: String,
    #[serde(rename = "PostOffice", default)]
    pub post_office: Option<Vec<PostOffice>>,
}

/// Region choices and the state to prefill for a PIN code
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PincodeLookup {
    pub regions: Vec<PostOffice>,
    pub state: Option<String>,
}

impl PincodeLookup {
    /// Interpret the raw `[{Status, PostOffice}]` body
    pub fn from_blocks(blocks: Vec<PincodeBlock>) -> Self {
        let offices = blocks
            .into_iter()
            .next()
            .filter(|b| b.status == "Success")
            .and_then(|b| b.post_office)
            .unwrap_or_default();

        let state = offices.first().map(|o| o.state.clone());
        Self {
            regions: offices,
            state,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}

/// A successfully uploaded file
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UploadedMedia {
    pub url: String,
    #[serde(default)]
    pub metadata: Option<serde_json::Value>,
}

impl UploadedMedia {
    /// Normalize the upload endpoint's response shapes
    ///
    /// Seen in the wild: `{success, imageUrl, metadata}`, `{data: {imageUrl}}`,
    /// `{data: {url}}`, and a bare URL string.
    pub fn from_response(value: &serde_json::Value) -> Option<Self> {
        use serde_json::Value;

        if let Value::String(s) = value {
            return s.starts_with("http").then(|| Self {
                url: s.clone(),
                metadata: None,
            });
        }

        let top_level_ok = value.get("success").and_then(Value::as_bool) == Some(true);
        if top_level_ok {
            if let Some(url) = value.get("imageUrl").and_then(Value::as_str) {
                return Some(Self {
                    url: url.to_string(),
                    metadata: value.get("metadata").cloned(),
                });
            }
        }

        let data = value.get("data")?;
        let url = data
            .get("imageUrl")
            .or_else(|| data.get("url"))
            .and_then(Value::as_str)?;

        Some(Self {
            url: url.to_string(),
            metadata: data.get("metadata").cloned(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_record_ref_accepts_both_shapes() {
        let bare: RecordRef = serde_json::from_value(json!("abc")).unwrap();
        assert_eq!(bare.id(), "abc");
        assert_eq!(bare.name(), None);

        let populated: RecordRef =
            serde_json::from_value(json!({"_id": "s1", "name": "Asha", "memberId": "M-01"}))
                .unwrap();
        assert_eq!(populated.id(), "s1");
        assert_eq!(populated.name(), Some("Asha"));
        assert_eq!(populated.member_id(), Some("M-01"));
        assert_eq!(populated.phone(), None);

        let with_phone: RecordRef =
            serde_json::from_value(json!({"_id": "s2", "name": "Ravi", "phone": "+919876543210"}))
                .unwrap();
        assert_eq!(with_phone.phone(), Some("+919876543210"));
    }

    #[test]
    fn test_pincode_lookup() {
        let blocks: Vec<PincodeBlock> = serde_json::from_value(json!([{
            "Status": "Success",
            "PostOffice": [
                {"Name": "Koramangala", "District": "Bangalore", "State": "Karnataka"},
                {"Name": "Ejipura", "District": "Bangalore", "State": "Karnataka"}
            ]
        }]))
        .unwrap();

        let lookup = PincodeLookup::from_blocks(blocks);
        assert_eq!(lookup.regions.len(), 2);
        assert_eq!(lookup.state.as_deref(), Some("Karnataka"));

        let failed: Vec<PincodeBlock> =
            serde_json::from_value(json!([{"Status": "Error", "PostOffice": null}])).unwrap();
        assert!(PincodeLookup::from_blocks(failed).is_empty());
    }

    #[test]
    fn test_upload_response_shapes() {
        let a = UploadedMedia::from_response(&json!({"success": true, "imageUrl": "https://x/a.png"}));
        let b = UploadedMedia::from_response(&json!({"data": {"imageUrl": "https://x/b.png"}}));
        let c = UploadedMedia::from_response(&json!({"data": {"url": "https://x/c.png"}}));
        let d = UploadedMedia::from_response(&json!("https://x/d.png"));
        let e = UploadedMedia::from_response(&json!({"status": "success"}));

        assert_eq!(a.unwrap().url, "https://x/a.png");
        assert_eq!(b.unwrap().url, "https://x/b.png");
        assert_eq!(c.unwrap().url, "https://x/c.png");
        assert_eq!(d.unwrap().url, "https://x/d.png");
        assert!(e.is_none());
    }
}
