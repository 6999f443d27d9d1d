//! In-memory transport for tests
//!
//! Records every dispatched request and replays a queue of canned
//! responses, so tests can assert on exactly what would have gone over the
//! wire without any network.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use reqwest::Method;
use serde_json::{Value, json};

use crate::error::{GraphError, Result};
use crate::transport::{Params, Transport};

/// One request as the transport saw it.
#[derive(Debug, Clone)]
pub(crate) struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub params: Params,
    pub token: String,
}

#[derive(Default)]
struct MockInner {
    responses: Mutex<VecDeque<std::result::Result<Value, GraphError>>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

/// Canned-response transport. Clones share the same queue and request log.
#[derive(Clone, Default)]
pub(crate) struct MockTransport {
    inner: Arc<MockInner>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful JSON response.
    pub fn push_ok(&self, value: Value) {
        self.inner.responses.lock().unwrap().push_back(Ok(value));
    }

    /// Queue a failure.
    pub fn push_err(&self, err: GraphError) {
        self.inner.responses.lock().unwrap().push_back(Err(err));
    }

    /// Everything dispatched so far, oldest first.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.inner.requests.lock().unwrap().clone()
    }

    /// Forget recorded requests (keeps queued responses).
    pub fn clear_requests(&self) {
        self.inner.requests.lock().unwrap().clear();
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(
        &self,
        method: Method,
        path: &str,
        params: &Params,
        token: &str,
    ) -> Result<Value> {
        self.inner.requests.lock().unwrap().push(RecordedRequest {
            method,
            path: path.to_string(),
            params: params.clone(),
            token: token.to_string(),
        });

        self.inner
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(json!({})))
    }
}
