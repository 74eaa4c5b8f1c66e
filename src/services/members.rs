//! `/members`: student roster

use tracing::{debug, info};

use crate::client::{ApiClient, Transport};
use crate::error::ClientResult;
use crate::model::{
    Assessment, AssessmentQuery, InfirmaryQuery, InfirmaryRecord, Member, MemberPayload,
    MemberQuery,
};
use crate::session::SessionStore;

use super::{assessments, infirmary};

/// Assessments and infirmary visits recorded for one student
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StudentHistory {
    pub assessments: Vec<Assessment>,
    pub visits: Vec<InfirmaryRecord>,
}

pub async fn list<T: Transport, S: SessionStore>(
    client: &ApiClient<T, S>,
    query: &MemberQuery,
) -> ClientResult<Vec<Member>> {
    let members: Vec<Member> = client.get("/members", query.to_pairs()).await?;
    debug!(count = members.len(), page = ?query.page, "Fetched members");
    Ok(members)
}

pub async fn get<T: Transport, S: SessionStore>(
    client: &ApiClient<T, S>,
    id: &str,
) -> ClientResult<Member> {
    client.get(&format!("/members/{}", id), Vec::new()).await
}

pub async fn create<T: Transport, S: SessionStore>(
    client: &ApiClient<T, S>,
    payload: &MemberPayload,
) -> ClientResult<Member> {
    let member: Member = client.post("/members", payload).await?;
    info!(id = %member.id, "Created member");
    Ok(member)
}

pub async fn update<T: Transport, S: SessionStore>(
    client: &ApiClient<T, S>,
    id: &str,
    payload: &MemberPayload,
) -> ClientResult<Member> {
    let member: Member = client.put(&format!("/members/{}", id), payload).await?;
    info!(id = %id, "Updated member");
    Ok(member)
}

/// Either fetch failing fails the whole history
pub async fn history<T: Transport, S: SessionStore>(
    client: &ApiClient<T, S>,
    student_id: &str,
) -> ClientResult<StudentHistory> {
    let assessments = assessments::list(client, &AssessmentQuery::for_student(student_id)).await?;
    let visits_query = InfirmaryQuery {
        student_id: Some(student_id.to_string()),
        ..InfirmaryQuery::default()
    };
    let visits = infirmary::list(client, &visits_query).await?;
    debug!(
        student = %student_id,
        assessments = assessments.len(),
        visits = visits.len(),
        "Fetched student history"
    );
    Ok(StudentHistory { assessments, visits })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::testing::MockTransport;
    use crate::client::Method;
    use crate::session::MemorySessionStore;
    use serde_json::json;

    #[tokio::test]
    async fn test_list_sends_student_query() {
        let client = ApiClient::new("https://b.test", MockTransport::new(), MemorySessionStore::new());
        client.transport().respond(
            200,
            json!({"status": "success", "data": [
                {"_id": "m1", "name": "Asha", "memberId": "STU-1"},
                {"_id": "m2", "name": "Ravi"}
            ]}),
        );

        let members = list(&client, &MemberQuery::students("sch1", 1, 10)).await.unwrap();
        assert_eq!(members.len(), 2);
        assert_eq!(members[0].display_id(), "STU-1");

        let sent = client.transport().requests();
        assert_eq!(sent[0].method, Method::Get);
        assert!(sent[0].url.contains("schoolId=sch1"));
        assert!(sent[0].url.contains("isStudent=true"));
        assert!(sent[0].url.contains("sortOrder=asc"));
    }

    #[tokio::test]
    async fn test_history_collects_both_lists() {
        let client = ApiClient::new("https://b.test", MockTransport::new(), MemorySessionStore::new());
        client.transport().respond(
            200,
            json!({"status": "success", "data": [{"_id": "a1", "studentId": "s1"}]}),
        );
        client.transport().respond(
            200,
            json!({"status": "success", "data": [{"_id": "v1", "studentId": "s1"}]}),
        );

        let history = history(&client, "s1").await.unwrap();
        assert_eq!(history.assessments.len(), 1);
        assert_eq!(history.visits.len(), 1);

        let sent = client.transport().requests();
        assert!(sent[0].url.contains("/assessments"));
        assert!(sent[1].url.contains("/infirmary"));
        assert!(sent[1].url.contains("studentId=s1"));
    }

    #[tokio::test]
    async fn test_history_surfaces_backend_failure() {
        let client = ApiClient::new("https://b.test", MockTransport::new(), MemorySessionStore::new());
        client.transport().respond(
            200,
            json!({"status": "success", "data": []}),
        );
        client
            .transport()
            .respond(500, json!({"status": "error", "message": "Database unavailable"}));

        let err = history(&client, "s1").await.unwrap_err();
        assert_eq!(err.message(), "Database unavailable");
    }
}
