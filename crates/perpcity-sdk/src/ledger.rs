//! Ledger client interface
//!
//! The SDK never talks to a chain directly. Everything remote goes through a
//! [`LedgerClient`]: view calls return decoded JSON values and mutating calls
//! return a [`Receipt`]. ABI encoding, signing and transport live behind the
//! trait. Integers wider than 53 bits travel as decimal strings.

use async_trait::async_trait;
use perpcity_core::U256;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{SdkError, SdkResult};

/// A read-only contract call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallRequest {
    pub contract: String,
    pub function: String,
    pub args: Vec<Value>,
}

impl CallRequest {
    pub fn new(contract: impl Into<String>, function: impl Into<String>, args: Vec<Value>) -> Self {
        Self {
            contract: contract.into(),
            function: function.into(),
            args,
        }
    }
}

/// A state-changing contract call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmitRequest {
    pub contract: String,
    pub function: String,
    pub args: Vec<Value>,
    /// Gas hint; the client estimates when absent
    pub gas: Option<u64>,
}

/// Outcome of a submitted transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Receipt {
    pub success: bool,
    pub tx_id: String,
    #[serde(default)]
    pub logs: Vec<Value>,
}

/// Remote collaborator that executes contract calls
#[async_trait]
pub trait LedgerClient: Send + Sync {
    /// Execute a view function and return its decoded result
    async fn call(&self, request: CallRequest) -> SdkResult<Value>;

    /// Sign and submit a mutating function, waiting for its receipt
    async fn submit(&self, request: SubmitRequest) -> SdkResult<Receipt>;

    /// Chain id reported by the endpoint
    async fn chain_id(&self) -> SdkResult<u64>;
}

// ============================================================================
// Argument encoding
// ============================================================================

/// Encode an unsigned integer argument
pub fn encode_uint(value: impl Into<U256>) -> Value {
    Value::String(value.into().to_string())
}

/// Encode a signed integer argument
pub fn encode_int(value: i128) -> Value {
    Value::String(value.to_string())
}

// ============================================================================
// Result decoding
// ============================================================================

/// Element `index` of a tuple result
pub fn tuple_field<'a>(value: &'a Value, index: usize, field: &str) -> SdkResult<&'a Value> {
    value
        .as_array()
        .and_then(|items| items.get(index))
        .ok_or_else(|| SdkError::Decode(format!("missing tuple element {} ({})", index, field)))
}

/// Unsigned 256-bit integer from a decimal string, hex string or JSON number
pub fn decode_u256(value: &Value, field: &str) -> SdkResult<U256> {
    match value {
        Value::Number(number) => number
            .as_u64()
            .map(U256::from)
            .ok_or_else(|| SdkError::Decode(format!("{} is not an unsigned integer: {}", field, number))),
        Value::String(text) => {
            let parsed = match text.strip_prefix("0x") {
                Some(hex) => U256::from_str_radix(hex, 16).ok(),
                None => U256::from_dec_str(text).ok(),
            };
            parsed.ok_or_else(|| SdkError::Decode(format!("{} is not an unsigned integer: {}", field, text)))
        }
        other => Err(SdkError::Decode(format!("{} has unexpected type: {}", field, other))),
    }
}

/// Signed integer that fits 128 bits
pub fn decode_i128(value: &Value, field: &str) -> SdkResult<i128> {
    let parsed = match value {
        Value::Number(number) => number.as_i64().map(i128::from),
        Value::String(text) => text.parse::<i128>().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| SdkError::Decode(format!("{} is not a signed integer: {}", field, value)))
}

/// Unsigned integer that fits 64 bits
pub fn decode_u64(value: &Value, field: &str) -> SdkResult<u64> {
    let wide = decode_u256(value, field)?;
    if wide.bits() > 64 {
        return Err(SdkError::Decode(format!("{} exceeds 64 bits: {}", field, wide)));
    }
    Ok(wide.low_u64())
}

/// Signed integer that fits 32 bits
pub fn decode_i32(value: &Value, field: &str) -> SdkResult<i32> {
    let wide = decode_i128(value, field)?;
    i32::try_from(wide).map_err(|_| SdkError::Decode(format!("{} exceeds 32 bits: {}", field, wide)))
}

pub fn decode_bool(value: &Value, field: &str) -> SdkResult<bool> {
    value
        .as_bool()
        .ok_or_else(|| SdkError::Decode(format!("{} is not a boolean: {}", field, value)))
}

pub fn decode_string(value: &Value, field: &str) -> SdkResult<String> {
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| SdkError::Decode(format!("{} is not a string: {}", field, value)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_u256_formats() {
        assert_eq!(decode_u256(&json!(42), "n").unwrap(), U256::from(42u8));
        assert_eq!(
            decode_u256(&json!("79228162514264337593543950336"), "n").unwrap(),
            U256::one() << 96
        );
        assert_eq!(decode_u256(&json!("0xff"), "n").unwrap(), U256::from(255u8));
        assert!(decode_u256(&json!(-1), "n").is_err());
        assert!(decode_u256(&json!("abc"), "n").is_err());
        assert!(decode_u256(&json!(true), "n").is_err());
    }

    #[test]
    fn test_decode_signed() {
        assert_eq!(decode_i128(&json!(-5), "n").unwrap(), -5);
        assert_eq!(decode_i128(&json!("-100000000"), "n").unwrap(), -100_000_000);
        assert_eq!(decode_i32(&json!(60), "n").unwrap(), 60);
        assert!(decode_i32(&json!("99999999999"), "n").is_err());
    }

    #[test]
    fn test_decode_u64_bounds() {
        assert_eq!(decode_u64(&json!("500000"), "n").unwrap(), 500_000);
        assert!(decode_u64(&json!("18446744073709551616"), "n").is_err());
    }

    #[test]
    fn test_tuple_field() {
        let value = json!(["a", 1]);
        assert_eq!(tuple_field(&value, 1, "second").unwrap(), &json!(1));
        let err = tuple_field(&value, 5, "sixth").unwrap_err();
        assert!(err.to_string().contains("sixth"));
    }

    #[test]
    fn test_encoding() {
        assert_eq!(encode_uint(7u64), json!("7"));
        assert_eq!(encode_int(-7), json!("-7"));
    }
}
