//! `/inventory`: medicine stock

use tracing::info;

use crate::client::{ApiClient, Transport};
use crate::error::ClientResult;
use crate::model::{InventoryItem, InventoryPayload, InventoryQuery};
use crate::session::SessionStore;

pub async fn list<T: Transport, S: SessionStore>(
    client: &ApiClient<T, S>,
    query: &InventoryQuery,
) -> ClientResult<Vec<InventoryItem>> {
    client.get("/inventory", query.to_pairs()).await
}

pub async fn get<T: Transport, S: SessionStore>(
    client: &ApiClient<T, S>,
    id: &str,
) -> ClientResult<InventoryItem> {
    client.get(&format!("/inventory/{}", id), Vec::new()).await
}

pub async fn create<T: Transport, S: SessionStore>(
    client: &ApiClient<T, S>,
    payload: &InventoryPayload,
) -> ClientResult<InventoryItem> {
    let item: InventoryItem = client.post("/inventory", payload).await?;
    info!(id = %item.id, name = %item.item_name, "Created inventory item");
    Ok(item)
}

pub async fn update<T: Transport, S: SessionStore>(
    client: &ApiClient<T, S>,
    id: &str,
    payload: &InventoryPayload,
) -> ClientResult<InventoryItem> {
    client.put(&format!("/inventory/{}", id), payload).await
}

pub async fn delete<T: Transport, S: SessionStore>(
    client: &ApiClient<T, S>,
    id: &str,
) -> ClientResult<Option<String>> {
    let message = client.delete(&format!("/inventory/{}", id)).await?;
    info!(id = %id, "Deleted inventory item");
    Ok(message)
}
