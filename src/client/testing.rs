//! Recording transport for tests

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use super::{HttpRequest, RawResponse, Transport};
use crate::error::{ClientError, ClientResult};

/// Replays queued responses in order and records every request
#[derive(Debug, Default)]
pub struct MockTransport {
    responses: Mutex<VecDeque<ClientResult<RawResponse>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, status: u16, body: serde_json::Value) {
        self.push(Ok(RawResponse {
            status,
            body: body.to_string().into_bytes(),
        }));
    }

    pub fn respond_text(&self, status: u16, body: &str) {
        self.push(Ok(RawResponse {
            status,
            body: body.as_bytes().to_vec(),
        }));
    }

    pub fn fail(&self, message: &str) {
        self.push(Err(ClientError::Transport(message.to_string())));
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    fn push(&self, response: ClientResult<RawResponse>) {
        self.responses.lock().unwrap().push_back(response);
    }
}

#[async_trait(?Send)]
impl Transport for MockTransport {
    async fn send(&self, request: HttpRequest) -> ClientResult<RawResponse> {
        self.requests.lock().unwrap().push(request);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ClientError::Transport("no response queued".to_string())))
    }
}
