//! `/nurses`: nurse profiles and dashboard stats

use tracing::{debug, info, warn};

use crate::client::{ApiClient, Transport};
use crate::error::{ClientError, ClientResult};
use crate::model::{Nurse, NursePayload, NurseQuery, NurseStats};
use crate::session::{NurseSession, SessionStore};

pub async fn list<T: Transport, S: SessionStore>(
    client: &ApiClient<T, S>,
    query: &NurseQuery,
) -> ClientResult<Vec<Nurse>> {
    client.get("/nurses", query.to_pairs()).await
}

pub async fn get<T: Transport, S: SessionStore>(
    client: &ApiClient<T, S>,
    id: &str,
) -> ClientResult<Nurse> {
    client.get(&format!("/nurses/{}", id), Vec::new()).await
}

/// Nurse profile for a login user id; the backend resolves either id here
pub async fn get_by_user_id<T: Transport, S: SessionStore>(
    client: &ApiClient<T, S>,
    user_id: &str,
) -> ClientResult<Nurse> {
    get(client, user_id).await
}

/// Create a nurse, translating auth and validation failures
pub async fn create<T: Transport, S: SessionStore>(
    client: &ApiClient<T, S>,
    payload: &NursePayload,
) -> ClientResult<Nurse> {
    match client.post::<_, Nurse>("/nurses", payload).await {
        Ok(nurse) => {
            info!(id = %nurse.id, "Created nurse");
            Ok(nurse)
        }
        Err(e) => Err(map_create_error(e)),
    }
}

pub async fn update<T: Transport, S: SessionStore>(
    client: &ApiClient<T, S>,
    id: &str,
    payload: &NursePayload,
) -> ClientResult<Nurse> {
    client.put(&format!("/nurses/{}", id), payload).await
}

pub async fn delete<T: Transport, S: SessionStore>(
    client: &ApiClient<T, S>,
    id: &str,
) -> ClientResult<Option<String>> {
    client.delete(&format!("/nurses/{}", id)).await
}

/// `GET /nurses/stats`
pub async fn stats<T: Transport, S: SessionStore>(
    client: &ApiClient<T, S>,
) -> ClientResult<NurseStats> {
    let stats: NurseStats = client.get("/nurses/stats", Vec::new()).await?;
    debug!(?stats, "Fetched stats");
    Ok(stats)
}

/// Resolve the signed-in nurse; `None` when nobody is signed in
pub async fn current_session<T: Transport, S: SessionStore>(
    client: &ApiClient<T, S>,
) -> ClientResult<Option<NurseSession>> {
    let session = client.session();
    if !session.is_authenticated() {
        return Ok(None);
    }
    let Some(user) = session.user().filter(|u| !u.user_id.is_empty()) else {
        warn!("Authenticated session has no stored user id");
        return Ok(None);
    };

    let nurse = get_by_user_id(client, &user.user_id).await?;
    Ok(Some(NurseSession::new(user, nurse)))
}

fn map_create_error(error: ClientError) -> ClientError {
    match error.status() {
        Some(400) => {
            let message = match &error {
                ClientError::Http { message, .. } if !message.starts_with("Request failed") => {
                    message.clone()
                }
                _ => "Invalid nurse data".to_string(),
            };
            ClientError::invalid("form", message)
        }
        Some(401) => ClientError::Unauthorized {
            message: "Unauthorized. Please log in again.".to_string(),
        },
        Some(403) => ClientError::Http {
            status: 403,
            message: "You do not have permission to create nurses.".to_string(),
        },
        _ => error,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::testing::MockTransport;
    use crate::session::{keys, MemorySessionStore};
    use serde_json::json;

    fn payload() -> NursePayload {
        NursePayload {
            name: "Priya".into(),
            email: Some("priya@school.in".into()),
            phone: "+919876543210".into(),
            dob: "1990-04-02T00:00:00.000Z".into(),
            gender: "female".into(),
            profile_pic: None,
            school_id: Some("sch1".into()),
            languages_spoken: vec!["English".into()],
            introduction: None,
        }
    }

    #[tokio::test]
    async fn test_create_error_mapping() {
        let client = ApiClient::new("https://b.test", MockTransport::new(), MemorySessionStore::new());
        client
            .transport()
            .respond(400, json!({"status": "error", "message": "Phone already registered"}));
        client.transport().respond(401, json!({"status": "error"}));
        client.transport().respond(403, json!({"status": "error", "message": "Forbidden"}));

        let bad = create(&client, &payload()).await.unwrap_err();
        assert!(bad.is_validation());
        assert_eq!(bad.message(), "Phone already registered");

        let unauth = create(&client, &payload()).await.unwrap_err();
        assert_eq!(unauth.message(), "Unauthorized. Please log in again.");

        let forbidden = create(&client, &payload()).await.unwrap_err();
        assert_eq!(forbidden.message(), "You do not have permission to create nurses.");
    }

    #[tokio::test]
    async fn test_current_session_uses_user_id() {
        let client = ApiClient::new("https://b.test", MockTransport::new(), MemorySessionStore::new());
        let store = client.session().store();
        store.set(keys::IS_AUTHENTICATED, "true").unwrap();
        store
            .set(keys::USER, r#"{"id":"u1","userId":"usr-9","email":"n@s.in"}"#)
            .unwrap();
        client.transport().respond(
            200,
            json!({"status": "success", "data": {
                "_id": "n1", "name": "Priya",
                "schoolId": {"_id": "sch1", "name": "Green Valley"}
            }}),
        );

        let nurse = current_session(&client).await.unwrap().unwrap();
        assert_eq!(nurse.nurse_id(), "n1");
        assert_eq!(nurse.school_id(), Some("sch1"));
        assert!(client.transport().requests()[0].url.ends_with("/nurses/usr-9"));
    }

    #[tokio::test]
    async fn test_current_session_signed_out() {
        let client = ApiClient::new("https://b.test", MockTransport::new(), MemorySessionStore::new());
        assert!(current_session(&client).await.unwrap().is_none());
        assert_eq!(client.transport().request_count(), 0);
    }
}
