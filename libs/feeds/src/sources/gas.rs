//! Ethereum gas price over JSON-RPC (`eth_gasPrice`), called directly

use super::SourceClient;
use crate::cache::SharedSnapshotCache;
use crate::cascade::{Cascade, Fetched, Fetcher, Stage};
use crate::error::{FeedError, Result};
use async_trait::async_trait;
use pulse_types::DataKind;
use serde_json::{json, Value};
use std::sync::Arc;

const WEI_PER_GWEI: f64 = 1_000_000_000.0;

pub fn gas_price_request() -> Value {
    json!({ "jsonrpc": "2.0", "method": "eth_gasPrice", "params": [], "id": 1 })
}

/// `0x`-prefixed wei amount → gwei, rounded to nearest
pub fn hex_wei_to_gwei(hex: &str) -> Result<u64> {
    let digits = hex
        .strip_prefix("0x")
        .or_else(|| hex.strip_prefix("0X"))
        .ok_or_else(|| FeedError::shape(format!("not a hex quantity: {}", hex)))?;

    let wei = u128::from_str_radix(digits, 16)
        .map_err(|e| FeedError::shape(format!("bad hex quantity {}: {}", hex, e)))?;

    if wei == 0 {
        return Err(FeedError::shape("gas price of zero wei"));
    }

    Ok((wei as f64 / WEI_PER_GWEI).round() as u64)
}

fn parse_gas_price(body: &Value) -> Result<u64> {
    if let Some(error) = body.get("error") {
        return Err(FeedError::shape(format!("rpc error: {}", error)));
    }

    let result = body
        .get("result")
        .and_then(Value::as_str)
        .ok_or_else(|| FeedError::shape("missing result"))?;

    hex_wei_to_gwei(result)
}

pub struct GasClient {
    cascade: Cascade<u64>,
    fetcher: Arc<Fetcher>,
    cache: SharedSnapshotCache,
}

impl GasClient {
    /// One direct stage per RPC endpoint, in the given order
    pub fn new(fetcher: Arc<Fetcher>, cache: SharedSnapshotCache, rpc_endpoints: &[String]) -> Self {
        let cascade = rpc_endpoints.iter().fold(Cascade::new(DataKind::Gas), |cascade, endpoint| {
            cascade.then(Stage::direct_post(
                endpoint.as_str(),
                endpoint.as_str(),
                gas_price_request(),
                parse_gas_price,
            ))
        });

        Self { cascade, fetcher, cache }
    }
}

#[async_trait]
impl SourceClient for GasClient {
    type Output = u64;

    fn kind(&self) -> DataKind {
        DataKind::Gas
    }

    async fn fetch(&self) -> Fetched<u64> {
        match self.cascade.resolve(&self.fetcher).await {
            Some(resolved) => {
                self.cache.store_gas(resolved.value);
                Fetched::fresh(resolved.value, resolved.stage)
            }
            None => Fetched::cached(self.cache.gas()),
        }
    }
}
