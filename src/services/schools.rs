//! `/schools`

use crate::client::{ApiClient, Transport};
use crate::error::ClientResult;
use crate::model::School;
use crate::session::SessionStore;

pub async fn get<T: Transport, S: SessionStore>(
    client: &ApiClient<T, S>,
    id: &str,
) -> ClientResult<School> {
    client.get(&format!("/schools/{}", id), Vec::new()).await
}
