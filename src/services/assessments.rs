//! `/assessments`: health checks

use tracing::info;

use crate::client::{ApiClient, Transport};
use crate::error::ClientResult;
use crate::model::{Assessment, AssessmentPayload, AssessmentQuery};
use crate::session::SessionStore;

pub async fn list<T: Transport, S: SessionStore>(
    client: &ApiClient<T, S>,
    query: &AssessmentQuery,
) -> ClientResult<Vec<Assessment>> {
    client.get("/assessments", query.to_pairs()).await
}

pub async fn get<T: Transport, S: SessionStore>(
    client: &ApiClient<T, S>,
    id: &str,
) -> ClientResult<Assessment> {
    client.get(&format!("/assessments/{}", id), Vec::new()).await
}

pub async fn create<T: Transport, S: SessionStore>(
    client: &ApiClient<T, S>,
    payload: &AssessmentPayload,
) -> ClientResult<Assessment> {
    let assessment: Assessment = client.post("/assessments", payload).await?;
    info!(id = %assessment.id, student = %payload.student_id, "Created assessment");
    Ok(assessment)
}

pub async fn update<T: Transport, S: SessionStore>(
    client: &ApiClient<T, S>,
    id: &str,
    payload: &AssessmentPayload,
) -> ClientResult<Assessment> {
    client.put(&format!("/assessments/{}", id), payload).await
}

pub async fn delete<T: Transport, S: SessionStore>(
    client: &ApiClient<T, S>,
    id: &str,
) -> ClientResult<Option<String>> {
    let message = client.delete(&format!("/assessments/{}", id)).await?;
    info!(id = %id, "Deleted assessment");
    Ok(message)
}
