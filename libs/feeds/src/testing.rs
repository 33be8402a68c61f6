//! Scripted transport for network-free tests

use crate::error::{FeedError, Result};
use crate::transport::HttpTransport;
use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::HashMap;

/// Canned answer for one URL
#[derive(Debug, Clone)]
pub enum Reply {
    Json(Value),
    Status(u16),
    Fail(String),
    /// Body that is not valid JSON
    Malformed,
}

/// Answers requests from a URL table and records every call in order
///
/// Unscripted URLs fail with a transport error, which is what an
/// unreachable upstream looks like to the cascade.
#[derive(Default)]
pub struct ScriptedTransport {
    routes: Mutex<HashMap<String, Reply>>,
    calls: Mutex<Vec<String>>,
    posts: Mutex<Vec<(String, Value)>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`ScriptedTransport::set`]
    pub fn on(self, url: impl Into<String>, reply: Reply) -> Self {
        self.set(url, reply);
        self
    }

    /// Script (or re-script) the answer for `url`
    pub fn set(&self, url: impl Into<String>, reply: Reply) {
        self.routes.lock().insert(url.into(), reply);
    }

    /// Forget every scripted answer, so all further calls fail
    pub fn clear(&self) {
        self.routes.lock().clear();
    }

    /// Requests seen so far, `POST ` prefixed for posts
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    /// Bodies of POST requests, with their URLs, in order
    pub fn posts(&self) -> Vec<(String, Value)> {
        self.posts.lock().clone()
    }

    fn answer(&self, url: &str) -> Result<Value> {
        let reply = self.routes.lock().get(url).cloned();
        match reply {
            Some(Reply::Json(value)) => Ok(value),
            Some(Reply::Status(status)) => Err(FeedError::Status {
                status,
                url: url.to_string(),
            }),
            Some(Reply::Fail(msg)) => Err(FeedError::Transport(msg)),
            Some(Reply::Malformed) => Err(FeedError::Decode("expected value at line 1 column 1".to_string())),
            None => Err(FeedError::Transport(format!("no route to {}", url))),
        }
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn get_json(&self, url: &str) -> Result<Value> {
        self.calls.lock().push(url.to_string());
        self.answer(url)
    }

    async fn post_json(&self, url: &str, body: &Value) -> Result<Value> {
        self.calls.lock().push(format!("POST {}", url));
        self.posts.lock().push((url.to_string(), body.clone()));
        self.answer(url)
    }
}
