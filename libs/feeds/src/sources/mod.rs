//! Source clients, one per data kind
//!
//! A client owns its cascade and its cache slot. `fetch` never fails: it
//! returns the first valid upstream value (after storing it) or, when every
//! stage fails, whatever the slot already holds.

pub mod crypto;
pub mod fiat;
pub mod gas;
pub mod metals;
pub mod news;
pub mod sentiment;
pub mod tvl;

pub use crypto::CryptoClient;
pub use fiat::FiatClient;
pub use gas::GasClient;
pub use metals::MetalsClient;
pub use news::NewsClient;
pub use sentiment::SentimentClient;
pub use tvl::TvlClient;

use crate::cascade::Fetched;
use async_trait::async_trait;
use pulse_types::DataKind;
use serde_json::Value;

#[async_trait]
pub trait SourceClient: Send + Sync {
    type Output: Send;

    fn kind(&self) -> DataKind;

    async fn fetch(&self) -> Fetched<Self::Output>;
}

/// Read a number that upstreams sometimes send as a string
pub(crate) fn lenient_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

pub(crate) fn positive_finite(value: f64) -> Option<f64> {
    (value.is_finite() && value > 0.0).then_some(value)
}


#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_lenient_f64() {
        assert_eq!(lenient_f64(&json!(1.5)), Some(1.5));
        assert_eq!(lenient_f64(&json!(" 42 ")), Some(42.0));
        assert_eq!(lenient_f64(&json!("n/a")), None);
        assert_eq!(lenient_f64(&json!(null)), None);
    }

    #[test]
    fn test_positive_finite() {
        assert_eq!(positive_finite(3.0), Some(3.0));
        assert_eq!(positive_finite(0.0), None);
        assert_eq!(positive_finite(f64::NAN), None);
    }
}
