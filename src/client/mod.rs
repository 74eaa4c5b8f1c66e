//! Shared REST client
//!
//! [`ApiClient`] owns everything every backend call has in common: the base
//! URL, the bearer token read from the session, envelope unwrapping, the
//! 401 handler and error-message normalization. The actual bytes move through
//! a [`Transport`]: `reqwest` on native targets, `gloo-net` in the browser.

#[cfg(test)]
pub(crate) mod testing;
#[cfg(feature = "native")]
pub mod transport;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::envelope::{self, Envelope};
use crate::error::{ClientError, ClientResult};
use crate::session::{Session, SessionStore};

#[cfg(feature = "native")]
pub use transport::ReqwestTransport;

/// Default backend location
pub const DEFAULT_BASE_URL: &str = "https://api.assisthealth.cloud";

/// Prefix shared by every REST path
pub const API_PREFIX: &str = "/api/v1";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

/// A file sent as one multipart field
#[derive(Debug, Clone, PartialEq)]
pub struct FilePart {
    pub field: String,
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Empty,
    Json(serde_json::Value),
    Multipart(FilePart),
}

/// A fully resolved request handed to a [`Transport`]
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub bearer: Option<String>,
    pub body: RequestBody,
}

/// Status and body as received
#[derive(Debug, Clone, PartialEq)]
pub struct RawResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Moves requests over the wire
#[async_trait(?Send)]
pub trait Transport {
    async fn send(&self, request: HttpRequest) -> ClientResult<RawResponse>;
}

/// A request relative to [`API_PREFIX`]
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: RequestBody,
    /// Overrides the session token for this request only
    pub bearer: Option<String>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: RequestBody::Empty,
            bearer: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::Post, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::Put, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::Delete, path)
    }

    pub fn query(mut self, pairs: Vec<(String, String)>) -> Self {
        self.query = pairs;
        self
    }

    pub fn json<B: Serialize>(mut self, body: &B) -> ClientResult<Self> {
        let value = serde_json::to_value(body).map_err(|e| ClientError::Decode(e.to_string()))?;
        self.body = RequestBody::Json(value);
        Ok(self)
    }

    pub fn file(mut self, part: FilePart) -> Self {
        self.body = RequestBody::Multipart(part);
        self
    }

    pub fn bearer(mut self, token: impl Into<String>) -> Self {
        self.bearer = Some(token.into());
        self
    }

    /// Absolute URL with the query string encoded
    pub fn url(&self, base_url: &str) -> String {
        let mut url = format!(
            "{}{}{}",
            base_url.trim_end_matches('/'),
            API_PREFIX,
            self.path
        );
        if !self.query.is_empty() {
            let query: Vec<String> = self
                .query
                .iter()
                .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
                .collect();
            url.push('?');
            url.push_str(&query.join("&"));
        }
        url
    }
}

/// REST client bound to a transport and a session store
pub struct ApiClient<T, S> {
    base_url: String,
    transport: T,
    session: Session<S>,
}

impl<T: Transport, S: SessionStore> ApiClient<T, S> {
    pub fn new(base_url: impl Into<String>, transport: T, store: S) -> Self {
        Self {
            base_url: base_url.into(),
            transport,
            session: Session::new(store),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &Session<S> {
        &self.session
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Send and unwrap the envelope's `data`
    pub async fn execute<R: DeserializeOwned>(&self, request: ApiRequest) -> ClientResult<R> {
        let raw = self.dispatch(request).await?;
        envelope::decode::<R>(&raw.body)?.into_data()
    }

    /// Send and keep the server's `message` alongside the data
    pub async fn execute_with_message<R: DeserializeOwned>(
        &self,
        request: ApiRequest,
    ) -> ClientResult<(R, Option<String>)> {
        let raw = self.dispatch(request).await?;
        envelope::decode::<R>(&raw.body)?.into_parts()
    }

    /// Send where only a success `status` matters (deletes, password calls)
    pub async fn execute_ack(&self, request: ApiRequest) -> ClientResult<Option<String>> {
        let raw = self.dispatch(request).await?;
        let env: Envelope<serde_json::Value> = envelope::decode(&raw.body)?;
        if env.is_success() {
            Ok(env.message)
        } else {
            Err(ClientError::Envelope {
                message: env
                    .message
                    .unwrap_or_else(|| "Invalid response format from API".to_string()),
            })
        }
    }

    /// Send and decode the body as-is, for endpoints outside the envelope
    pub async fn execute_raw<R: DeserializeOwned>(&self, request: ApiRequest) -> ClientResult<R> {
        let raw = self.dispatch(request).await?;
        serde_json::from_slice(&raw.body).map_err(|e| ClientError::Decode(e.to_string()))
    }

    pub async fn get<R: DeserializeOwned>(
        &self,
        path: &str,
        query: Vec<(String, String)>,
    ) -> ClientResult<R> {
        self.execute(ApiRequest::get(path).query(query)).await
    }

    pub async fn post<B: Serialize, R: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<R> {
        self.execute(ApiRequest::post(path).json(body)?).await
    }

    pub async fn put<B: Serialize, R: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<R> {
        self.execute(ApiRequest::put(path).json(body)?).await
    }

    pub async fn delete(&self, path: &str) -> ClientResult<Option<String>> {
        self.execute_ack(ApiRequest::delete(path)).await
    }

    /// Resolve, authenticate, send and map HTTP failures
    async fn dispatch(&self, request: ApiRequest) -> ClientResult<RawResponse> {
        let url = request.url(&self.base_url);
        let bearer = request.bearer.clone().or_else(|| self.session.access_token());
        let method = request.method;

        debug!(method = method.as_str(), url = %url, "API request");

        let response = self
            .transport
            .send(HttpRequest {
                method,
                url: url.clone(),
                bearer,
                body: request.body,
            })
            .await?;

        if response.is_success() {
            return Ok(response);
        }

        let message = envelope::error_message(&response.body).unwrap_or_else(|| {
            format!("Request failed with status code {}", response.status)
        });
        warn!(
            method = method.as_str(),
            url = %url,
            status = response.status,
            "API request failed: {}",
            message
        );

        if response.status == 401 {
            if let Err(e) = self.session.clear_auth() {
                warn!("Failed to clear session after 401: {}", e);
            }
            return Err(ClientError::Unauthorized { message });
        }

        Err(ClientError::Http {
            status: response.status,
            message,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::testing::MockTransport;
    use super::*;
    use crate::session::{keys, MemorySessionStore};
    use serde_json::json;
    use std::sync::Arc;

    fn client(mock: MockTransport) -> (ApiClient<MockTransport, Arc<MemorySessionStore>>, Arc<MemorySessionStore>) {
        let store = Arc::new(MemorySessionStore::new());
        (ApiClient::new("https://backend.test/", mock, store.clone()), store)
    }

    #[test]
    fn test_url_encodes_query() {
        let request = ApiRequest::get("/members").query(vec![
            ("search".to_string(), "asha k".to_string()),
            ("page".to_string(), "1".to_string()),
        ]);
        assert_eq!(
            request.url("https://backend.test/"),
            "https://backend.test/api/v1/members?search=asha%20k&page=1"
        );
    }

    #[tokio::test]
    async fn test_bearer_comes_from_session() {
        let mock = MockTransport::new();
        mock.respond(200, json!({"status": "success", "data": {"students": 3}}));
        let (client, store) = client(mock);
        store.set(keys::ACCESS_TOKEN, "tok").unwrap();

        let data: serde_json::Value = client.get("/nurses/stats", Vec::new()).await.unwrap();
        assert_eq!(data["students"], 3);

        let sent = client.transport().requests();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].bearer.as_deref(), Some("tok"));
        assert_eq!(sent[0].url, "https://backend.test/api/v1/nurses/stats");
    }

    #[tokio::test]
    async fn test_unauthorized_clears_session() {
        let mock = MockTransport::new();
        mock.respond(401, json!({"status": "error", "message": "Token expired"}));
        let (client, store) = client(mock);
        store.set(keys::ACCESS_TOKEN, "tok").unwrap();
        store.set(keys::REFRESH_TOKEN, "ref").unwrap();
        store.set(keys::USER, "{}").unwrap();
        store.set(keys::IS_AUTHENTICATED, "true").unwrap();

        let err = client
            .get::<serde_json::Value>("/members", Vec::new())
            .await
            .unwrap_err();

        assert_eq!(err, ClientError::Unauthorized { message: "Token expired".into() });
        assert!(store.snapshot().is_empty());
    }

    #[tokio::test]
    async fn test_error_message_fallbacks() {
        let mock = MockTransport::new();
        mock.respond(404, json!({"status": "error", "message": "Member not found"}));
        mock.respond_text(502, "<html>bad gateway</html>");
        let (client, _) = client(mock);

        let first = client.get::<serde_json::Value>("/members/x", Vec::new()).await.unwrap_err();
        assert_eq!(first.message(), "Member not found");
        assert_eq!(first.status(), Some(404));

        let second = client.get::<serde_json::Value>("/members/y", Vec::new()).await.unwrap_err();
        assert_eq!(second.message(), "Request failed with status code 502");
    }

    #[tokio::test]
    async fn test_non_success_envelope_rejected() {
        let mock = MockTransport::new();
        mock.respond(200, json!({"status": "fail", "message": "Duplicate phone"}));
        let (client, _) = client(mock);

        let err = client
            .post::<_, serde_json::Value>("/members", &json!({"name": "A"}))
            .await
            .unwrap_err();
        assert_eq!(err, ClientError::Envelope { message: "Duplicate phone".into() });
    }
}
