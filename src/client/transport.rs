//! Native transport over `reqwest`

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;

use super::{HttpRequest, Method, RawResponse, RequestBody, Transport};
use crate::error::{ClientError, ClientResult};

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// `reqwest`-backed [`Transport`]
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::Transport(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self { client })
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait(?Send)]
impl Transport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> ClientResult<RawResponse> {
        let mut builder = match request.method {
            Method::Get => self.client.get(&request.url),
            Method::Post => self.client.post(&request.url),
            Method::Put => self.client.put(&request.url),
            Method::Delete => self.client.delete(&request.url),
        };

        if let Some(token) = &request.bearer {
            builder = builder.bearer_auth(token);
        }

        builder = match request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(&value),
            RequestBody::Multipart(file) => {
                let part = Part::bytes(file.bytes)
                    .file_name(file.file_name)
                    .mime_str(&file.content_type)
                    .map_err(|e| ClientError::Transport(e.to_string()))?;
                builder.multipart(Form::new().part(file.field, part))
            }
        };

        let response = builder.send().await.map_err(map_send_error)?;
        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?;

        Ok(RawResponse {
            status,
            body: body.to_vec(),
        })
    }
}

fn map_send_error(e: reqwest::Error) -> ClientError {
    if e.is_timeout() {
        ClientError::Transport("Request timed out".to_string())
    } else if e.is_connect() {
        ClientError::Transport(format!("Network error: {}", e))
    } else {
        ClientError::Transport(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::FilePart;
    use axum::{
        extract::Multipart,
        http::HeaderMap,
        routing::{get, post},
        Json, Router,
    };
    use serde_json::{json, Value};

    async fn spawn_backend() -> String {
        async fn whoami(headers: HeaderMap) -> Json<Value> {
            let auth = headers
                .get("authorization")
                .and_then(|v| v.to_str().ok())
                .unwrap_or("")
                .to_string();
            Json(json!({"status": "success", "data": {"auth": auth}}))
        }

        async fn upload(mut multipart: Multipart) -> Json<Value> {
            let mut name = String::new();
            let mut size = 0;
            while let Ok(Some(field)) = multipart.next_field().await {
                name = field.name().unwrap_or_default().to_string();
                size = field.bytes().await.map(|b| b.len()).unwrap_or(0);
            }
            Json(json!({"status": "success", "data": {"field": name, "size": size}}))
        }

        let app = Router::new()
            .route("/api/v1/whoami", get(whoami))
            .route("/api/v1/media/upload", post(upload));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn test_sends_bearer_and_reads_body() {
        let base = spawn_backend().await;
        let transport = ReqwestTransport::new(Duration::from_secs(5)).unwrap();

        let response = transport
            .send(HttpRequest {
                method: Method::Get,
                url: format!("{}/api/v1/whoami", base),
                bearer: Some("tok".to_string()),
                body: RequestBody::Empty,
            })
            .await
            .unwrap();

        assert_eq!(response.status, 200);
        let body: Value = serde_json::from_slice(&response.body).unwrap();
        assert_eq!(body["data"]["auth"], "Bearer tok");
    }

    #[tokio::test]
    async fn test_multipart_field() {
        let base = spawn_backend().await;
        let transport = ReqwestTransport::new(Duration::from_secs(5)).unwrap();

        let response = transport
            .send(HttpRequest {
                method: Method::Post,
                url: format!("{}/api/v1/media/upload", base),
                bearer: None,
                body: RequestBody::Multipart(FilePart {
                    field: "file".to_string(),
                    file_name: "pic.png".to_string(),
                    content_type: "image/png".to_string(),
                    bytes: vec![0u8; 64],
                }),
            })
            .await
            .unwrap();

        let body: Value = serde_json::from_slice(&response.body).unwrap();
        assert_eq!(body["data"]["field"], "file");
        assert_eq!(body["data"]["size"], 64);
    }

    #[tokio::test]
    async fn test_connection_refused_is_transport_error() {
        let transport = ReqwestTransport::new(Duration::from_secs(2)).unwrap();
        let err = transport
            .send(HttpRequest {
                method: Method::Get,
                url: "http://127.0.0.1:9/api/v1/members".to_string(),
                bearer: None,
                body: RequestBody::Empty,
            })
            .await
            .unwrap_err();

        assert!(matches!(err, ClientError::Transport(_)));
    }
}
