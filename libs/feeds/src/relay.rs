//! CORS relay failover
//!
//! Upstreams that refuse direct calls are reached through public relays. A
//! relay takes the target URL as a query parameter and forwards the request.
//! Relays are tried once each, in order, and the first one returning a JSON
//! body wins. Whether that body is useful is for the caller to decide.

use crate::error::{FeedError, Result};
use crate::transport::HttpTransport;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

pub const CORSPROXY_ENDPOINT: &str = "https://corsproxy.io/?";
pub const ALLORIGINS_ENDPOINT: &str = "https://api.allorigins.win/get?url=";

/// How a relay packages the upstream payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Envelope {
    /// Body is the upstream payload itself
    Direct,
    /// Payload is a JSON-encoded string in the `contents` field
    Contents,
}

/// One relay transport
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelayEndpoint {
    pub name: String,
    /// Prefix the percent-encoded target URL is appended to
    pub endpoint: String,
    pub envelope: Envelope,
}

impl RelayEndpoint {
    pub fn new(name: impl Into<String>, endpoint: impl Into<String>, envelope: Envelope) -> Self {
        Self {
            name: name.into(),
            endpoint: endpoint.into(),
            envelope,
        }
    }

    pub fn corsproxy() -> Self {
        Self::new("corsproxy", CORSPROXY_ENDPOINT, Envelope::Direct)
    }

    pub fn allorigins() -> Self {
        Self::new("allorigins", ALLORIGINS_ENDPOINT, Envelope::Contents)
    }

    /// Relay URL that forwards to `target`
    pub fn wrap(&self, target: &str) -> String {
        let encoded: String = url::form_urlencoded::byte_serialize(target.as_bytes()).collect();
        format!("{}{}", self.endpoint, encoded)
    }

    /// Strip this relay's envelope from a response body
    ///
    /// A `contents` envelope without a `contents` field is passed through
    /// untouched; a `contents` string that is not JSON is a malformed body.
    pub fn unwrap_body(&self, body: Value) -> Result<Value> {
        match self.envelope {
            Envelope::Direct => Ok(body),
            Envelope::Contents => match body.get("contents") {
                Some(Value::String(raw)) => serde_json::from_str(raw)
                    .map_err(|e| FeedError::Decode(format!("{} contents: {}", self.name, e))),
                Some(Value::Null) | None => Ok(body),
                Some(other) => Ok(other.clone()),
            },
        }
    }
}

/// Relays in their default priority order
pub fn default_relays() -> Vec<RelayEndpoint> {
    vec![RelayEndpoint::corsproxy(), RelayEndpoint::allorigins()]
}

/// Ordered relay failover over a shared transport
#[derive(Clone)]
pub struct ProxyRelay {
    transport: Arc<dyn HttpTransport>,
    relays: Vec<RelayEndpoint>,
}

impl ProxyRelay {
    pub fn new(transport: Arc<dyn HttpTransport>, relays: Vec<RelayEndpoint>) -> Self {
        Self { transport, relays }
    }

    pub fn relays(&self) -> &[RelayEndpoint] {
        &self.relays
    }

    /// GET `url` through the first relay that answers with JSON
    pub async fn relay(&self, url: &str) -> Result<Value> {
        let mut last = String::from("no relays configured");

        for relay in &self.relays {
            let relay_url = relay.wrap(url);
            debug!("[relay] {} -> {}", relay.name, url);

            let outcome = match self.transport.get_json(&relay_url).await {
                Ok(body) => relay.unwrap_body(body),
                Err(e) => Err(e),
            };

            match outcome {
                Ok(payload) => return Ok(payload),
                Err(e) => {
                    warn!("[relay] {} failed for {}: {}", relay.name, url, e);
                    last = e.to_string();
                }
            }
        }

        Err(FeedError::RelayExhausted {
            attempts: self.relays.len(),
            last,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Reply, ScriptedTransport};
    use serde_json::json;

    const TARGET: &str = "https://api.alternative.me/fng/?limit=1";

    fn relay_over(transport: Arc<ScriptedTransport>) -> ProxyRelay {
        ProxyRelay::new(transport, default_relays())
    }

    #[test]
    fn test_wrap_percent_encodes_target() {
        let wrapped = RelayEndpoint::corsproxy().wrap(TARGET);
        assert_eq!(
            wrapped,
            "https://corsproxy.io/?https%3A%2F%2Fapi.alternative.me%2Ffng%2F%3Flimit%3D1"
        );

        let wrapped = RelayEndpoint::allorigins().wrap("https://api.llama.fi/charts");
        assert_eq!(
            wrapped,
            "https://api.allorigins.win/get?url=https%3A%2F%2Fapi.llama.fi%2Fcharts"
        );
    }

    #[test]
    fn test_contents_envelope_is_unwrapped() {
        let relay = RelayEndpoint::allorigins();
        let body = json!({ "contents": "{\"data\":[1,2]}", "status": { "http_code": 200 } });
        assert_eq!(relay.unwrap_body(body).unwrap(), json!({ "data": [1, 2] }));
    }

    #[test]
    fn test_contents_envelope_without_contents_passes_through() {
        let relay = RelayEndpoint::allorigins();
        let body = json!({ "status": { "http_code": 500 } });
        assert_eq!(relay.unwrap_body(body.clone()).unwrap(), body);
    }

    #[test]
    fn test_contents_that_is_not_json_is_malformed() {
        let relay = RelayEndpoint::allorigins();
        let err = relay.unwrap_body(json!({ "contents": "<html>" })).unwrap_err();
        assert!(matches!(err, FeedError::Decode(_)));
    }

    #[test]
    fn test_direct_envelope_keeps_contents_field() {
        let relay = RelayEndpoint::corsproxy();
        let body = json!({ "contents": "{}" });
        assert_eq!(relay.unwrap_body(body.clone()).unwrap(), body);
    }

    #[tokio::test]
    async fn test_first_relay_wins() {
        let transport = Arc::new(
            ScriptedTransport::new()
                .on(RelayEndpoint::corsproxy().wrap(TARGET), Reply::Json(json!({ "from": "corsproxy" })))
                .on(RelayEndpoint::allorigins().wrap(TARGET), Reply::Json(json!({ "contents": "{}" }))),
        );

        let value = relay_over(transport.clone()).relay(TARGET).await.unwrap();

        assert_eq!(value, json!({ "from": "corsproxy" }));
        assert_eq!(transport.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_failover_to_second_relay() {
        let transport = Arc::new(
            ScriptedTransport::new()
                .on(RelayEndpoint::corsproxy().wrap(TARGET), Reply::Status(429))
                .on(
                    RelayEndpoint::allorigins().wrap(TARGET),
                    Reply::Json(json!({ "contents": "{\"from\":\"allorigins\"}" })),
                ),
        );

        let value = relay_over(transport.clone()).relay(TARGET).await.unwrap();

        assert_eq!(value, json!({ "from": "allorigins" }));
        assert_eq!(
            transport.calls(),
            vec![
                RelayEndpoint::corsproxy().wrap(TARGET),
                RelayEndpoint::allorigins().wrap(TARGET),
            ]
        );
    }

    #[tokio::test]
    async fn test_malformed_body_moves_to_next_relay() {
        let transport = Arc::new(
            ScriptedTransport::new()
                .on(RelayEndpoint::corsproxy().wrap(TARGET), Reply::Malformed)
                .on(
                    RelayEndpoint::allorigins().wrap(TARGET),
                    Reply::Json(json!({ "contents": "[]" })),
                ),
        );

        let value = relay_over(transport).relay(TARGET).await.unwrap();
        assert_eq!(value, json!([]));
    }

    #[tokio::test]
    async fn test_semantically_useless_body_still_wins() {
        let transport = Arc::new(
            ScriptedTransport::new()
                .on(RelayEndpoint::corsproxy().wrap(TARGET), Reply::Json(json!({ "error": "rate limited" }))),
        );

        let value = relay_over(transport.clone()).relay(TARGET).await.unwrap();

        assert_eq!(value, json!({ "error": "rate limited" }));
        assert_eq!(transport.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_every_relay_tried_once_then_exhausted() {
        let transport = Arc::new(ScriptedTransport::new());
        let relay = relay_over(transport.clone());

        let err = relay.relay(TARGET).await.unwrap_err();

        assert!(matches!(err, FeedError::RelayExhausted { attempts: 2, .. }));
        let expected: Vec<String> = relay.relays().iter().map(|r| r.wrap(TARGET)).collect();
        assert_eq!(transport.calls(), expected);
    }
}
