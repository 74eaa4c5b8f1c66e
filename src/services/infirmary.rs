//! `/infirmary`: visit log

use tracing::info;

use crate::client::{ApiClient, Transport};
use crate::error::{ClientError, ClientResult};
use crate::model::{InfirmaryPayload, InfirmaryQuery, InfirmaryRecord};
use crate::session::SessionStore;

use super::inventory;

pub async fn list<T: Transport, S: SessionStore>(
    client: &ApiClient<T, S>,
    query: &InfirmaryQuery,
) -> ClientResult<Vec<InfirmaryRecord>> {
    client.get("/infirmary", query.to_pairs()).await
}

pub async fn get<T: Transport, S: SessionStore>(
    client: &ApiClient<T, S>,
    id: &str,
) -> ClientResult<InfirmaryRecord> {
    client.get(&format!("/infirmary/{}", id), Vec::new()).await
}

/// Rejects payloads missing a required field before any request is sent
pub async fn create<T: Transport, S: SessionStore>(
    client: &ApiClient<T, S>,
    payload: &InfirmaryPayload,
) -> ClientResult<InfirmaryRecord> {
    check_required(payload)?;
    let record: InfirmaryRecord = client.post("/infirmary", payload).await?;
    info!(id = %record.id, student = %payload.student_id, "Created infirmary record");
    Ok(record)
}

pub async fn update<T: Transport, S: SessionStore>(
    client: &ApiClient<T, S>,
    id: &str,
    payload: &InfirmaryPayload,
) -> ClientResult<InfirmaryRecord> {
    client.put(&format!("/infirmary/{}", id), payload).await
}

pub async fn delete<T: Transport, S: SessionStore>(
    client: &ApiClient<T, S>,
    id: &str,
) -> ClientResult<Option<String>> {
    let message = client.delete(&format!("/infirmary/{}", id)).await?;
    info!(id = %id, "Deleted infirmary record");
    Ok(message)
}

/// Fail when `requested` exceeds the item's current stock
pub async fn validate_medicine_quantity<T: Transport, S: SessionStore>(
    client: &ApiClient<T, S>,
    inventory_id: &str,
    requested: u32,
) -> ClientResult<()> {
    let item = inventory::get(client, inventory_id).await?;
    check_stock(item.current_stock, requested)
}

pub fn check_stock(available: i64, requested: u32) -> ClientResult<()> {
    let available = available.max(0);
    if i64::from(requested) > available {
        return Err(ClientError::invalid(
            "quantity",
            format!("Insufficient stock. Available: {}", available),
        ));
    }
    Ok(())
}

fn check_required(payload: &InfirmaryPayload) -> ClientResult<()> {
    let missing = payload.missing_fields();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(ClientError::invalid(
            "form",
            format!("Missing required fields: {}", missing.join(", ")),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::testing::MockTransport;
    use crate::session::MemorySessionStore;
    use serde_json::json;

    fn client() -> ApiClient<MockTransport, MemorySessionStore> {
        ApiClient::new("https://b.test", MockTransport::new(), MemorySessionStore::new())
    }

    #[tokio::test]
    async fn test_create_rejects_missing_fields_without_request() {
        let client = client();
        let payload = InfirmaryPayload {
            student_id: "s1".into(),
            ..InfirmaryPayload::default()
        };

        let err = create(&client, &payload).await.unwrap_err();
        assert_eq!(
            err.message(),
            "Missing required fields: schoolId, nurseId, date, time, consentFrom"
        );
        assert_eq!(client.transport().request_count(), 0);
    }

    #[tokio::test]
    async fn test_quantity_over_stock() {
        let client = client();
        client.transport().respond(
            200,
            json!({"status": "success", "data": {"_id": "i1", "item_name": "ORS", "current_stock": 3}}),
        );

        let err = validate_medicine_quantity(&client, "i1", 5).await.unwrap_err();
        assert_eq!(err.message(), "Insufficient stock. Available: 3");
        assert!(client.transport().requests()[0].url.ends_with("/api/v1/inventory/i1"));
    }

    #[test]
    fn test_check_stock_boundary() {
        assert!(check_stock(5, 5).is_ok());
        assert!(check_stock(0, 0).is_ok());
        assert!(check_stock(-1, 1).is_err());
    }
}
