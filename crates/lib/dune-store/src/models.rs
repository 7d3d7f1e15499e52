use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// One page of records returned by a paged Sim endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub records: Vec<T>,
    /// Opaque cursor for the next page. Empty when there is no more data.
    pub next_offset: String,
}

impl<T> Page<T> {
    pub fn new(records: Vec<T>, next_offset: impl Into<String>) -> Self {
        Self {
            records,
            next_offset: next_offset.into(),
        }
    }

    /// Returns the cursor for the following page, if any.
    pub fn next_cursor(&self) -> Option<&str> {
        if self.next_offset.is_empty() {
            None
        } else {
            Some(self.next_offset.as_str())
        }
    }
}

/// Log entry emitted while executing a transaction.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TransactionLog {
    #[serde(default, deserialize_with = "null_as_default")]
    pub address: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub data: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub topics: Vec<String>,
}

/// Transaction returned by `/v1/evm/transactions/{address}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    pub address: String,
    pub block_hash: String,
    pub block_number: u64,
    pub block_time: String,
    pub chain: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chain_id: Option<u64>,
    pub from: String,
    pub hash: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub data: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub gas_price: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<u64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub nonce: String,
    /// Empty for contract creation.
    #[serde(default, deserialize_with = "null_as_default")]
    pub to: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub transaction_type: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub value: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub logs: Vec<TransactionLog>,
    /// Decoded call payload, passed through untouched.
    #[serde(default = "empty_object", deserialize_with = "null_as_empty_object")]
    pub decoded: Value,
}

/// Token metadata attached to an activity entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TokenMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decimals: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_usd: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pool_size: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub standard: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
}

/// Decoded function call for `call` activity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FunctionCall {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default = "empty_array", deserialize_with = "null_as_empty_array")]
    pub inputs: Value,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ContractMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Activity entry returned by `/v1/evm/activity/{address}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Activity {
    pub chain_id: u64,
    pub block_number: u64,
    pub block_time: String,
    pub tx_hash: String,
    /// `call`, `approve`, `send`, `receive`, `mint`, `burn`, `swap`, ...
    #[serde(rename = "type")]
    pub activity_type: String,
    /// Empty for native transfers and plain calls.
    #[serde(default, deserialize_with = "null_as_default")]
    pub asset_type: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub token_address: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub from: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub to: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub spender: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_usd: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_metadata: Option<TokenMetadata>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub function: Option<FunctionCall>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contract_metadata: Option<ContractMetadata>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_token_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_token_value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_token_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_token_value: Option<String>,
}

/// Null counts as absent.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn empty_object() -> Value {
    Value::Object(Map::new())
}

fn empty_array() -> Value {
    Value::Array(Vec::new())
}

fn null_as_empty_object<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Value, D::Error> {
    Ok(Option::<Value>::deserialize(deserializer)?.unwrap_or_else(empty_object))
}

fn null_as_empty_array<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Value, D::Error> {
    Ok(Option::<Value>::deserialize(deserializer)?.unwrap_or_else(empty_array))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn nulls_fall_back_to_defaults() {
        let tx: Transaction = serde_json::from_value(json!({
            "address": "0xabc",
            "block_hash": "0xblock",
            "block_number": 7,
            "block_time": "2025-01-01T00:00:00+00:00",
            "chain": "ethereum",
            "from": "0xabc",
            "hash": "0xhash",
            "to": null,
            "value": null,
            "logs": null,
            "decoded": null
        }))
        .expect("nulls are allowed");

        assert_eq!(tx.to, "");
        assert_eq!(tx.value, "");
        assert!(tx.logs.is_empty());
        assert_eq!(tx.decoded, json!({}));
        assert_eq!(tx.chain_id, None);
    }

    #[test]
    fn activity_type_uses_wire_name() {
        let entry: Activity = serde_json::from_value(json!({
            "chain_id": 1,
            "block_number": 3,
            "block_time": "t",
            "tx_hash": "0xhash",
            "type": "call",
            "function": { "name": "mint", "inputs": null }
        }))
        .expect("valid entry");

        assert_eq!(entry.activity_type, "call");
        assert_eq!(entry.asset_type, "");
        let function = entry.function.as_ref().expect("function");
        assert_eq!(function.inputs, json!([]));

        let encoded = serde_json::to_value(&entry).expect("encode");
        assert_eq!(encoded["type"], "call");
        assert!(encoded.get("value_usd").is_none());
    }
}
