//! `/common`: lookups outside the envelope

use tracing::debug;

use crate::client::{ApiClient, ApiRequest, Transport};
use crate::error::{ClientError, ClientResult};
use crate::model::common::PincodeBlock;
use crate::model::PincodeLookup;
use crate::session::SessionStore;

/// Regions and state for a 6-digit Indian PIN code
pub async fn pincode<T: Transport, S: SessionStore>(
    client: &ApiClient<T, S>,
    pin: &str,
) -> ClientResult<PincodeLookup> {
    let pin = pin.trim();
    if pin.len() != 6 || !pin.chars().all(|c| c.is_ascii_digit()) {
        return Err(ClientError::invalid("pinCode", "PIN code must be 6 digits"));
    }

    let blocks: Vec<PincodeBlock> = client
        .execute_raw(ApiRequest::get(format!("/common/pincode/{}", pin)))
        .await?;
    let lookup = PincodeLookup::from_blocks(blocks);
    debug!(pin, regions = lookup.regions.len(), "Pincode lookup");
    Ok(lookup)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::testing::MockTransport;
    use crate::session::MemorySessionStore;
    use serde_json::json;

    #[tokio::test]
    async fn test_pincode_raw_body() {
        let client = ApiClient::new("https://b.test", MockTransport::new(), MemorySessionStore::new());
        client.transport().respond(
            200,
            json!([{"Status": "Success", "PostOffice": [
                {"Name": "Indiranagar", "District": "Bangalore", "State": "Karnataka"}
            ]}]),
        );

        let lookup = pincode(&client, "560038").await.unwrap();
        assert_eq!(lookup.regions[0].name, "Indiranagar");
        assert_eq!(lookup.state.as_deref(), Some("Karnataka"));
    }

    #[tokio::test]
    async fn test_short_pin_is_rejected_locally() {
        let client = ApiClient::new("https://b.test", MockTransport::new(), MemorySessionStore::new());
        assert!(pincode(&client, "5600").await.unwrap_err().is_validation());
        assert_eq!(client.transport().request_count(), 0);
    }
}
