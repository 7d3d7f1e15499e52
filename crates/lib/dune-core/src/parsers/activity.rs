//! Validation for `/v1/evm/activity/{address}` pages.

use dune_store::models::{Activity, Page};
use dune_store::schema::FIELD_ACTIVITY;

use super::{SchemaError, parse_page};
use crate::client::PageBody;

/// Validates an activity page.
///
/// # Errors
/// Returns `SchemaError` if the body is not a JSON object or an entry is
/// missing a required field or carries a mistyped one.
pub fn parse_activity_page(body: &PageBody) -> Result<Page<Activity>, SchemaError> {
    parse_page(body, FIELD_ACTIVITY)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dune_store::models::ContractMetadata;
    use serde_json::json;

    #[test]
    fn transfer_with_metadata_parses() {
        let body = PageBody::Json(json!({
            "next_offset": "abc",
            "activity": [{
                "chain_id": 8453,
                "block_number": 200,
                "block_time": "2025-01-01T00:00:00+00:00",
                "tx_hash": "0xhash",
                "type": "receive",
                "asset_type": "erc20",
                "token_address": "0xtoken",
                "from": "0xfrom",
                "value": "1000000",
                "value_usd": 1.25,
                "token_metadata": {
                    "symbol": "USDC",
                    "decimals": 6,
                    "price_usd": 1.0,
                    "standard": "erc20"
                }
            }]
        }));
        let page = parse_activity_page(&body).expect("valid page");
        let entry = &page.records[0];

        assert_eq!(page.next_cursor(), Some("abc"));
        assert_eq!(entry.activity_type, "receive");
        assert_eq!(entry.to, "");
        assert_eq!(entry.spender, "");
        assert_eq!(entry.value_usd, Some(1.25));
        let metadata = entry.token_metadata.as_ref().expect("metadata");
        assert_eq!(metadata.symbol.as_deref(), Some("USDC"));
        assert_eq!(metadata.decimals, Some(6));
        assert!(entry.function.is_none());
    }

    #[test]
    fn call_with_function_keeps_inputs_verbatim() {
        let body = PageBody::Json(json!({
            "activity": [{
                "chain_id": 1,
                "block_number": 10,
                "block_time": "t",
                "tx_hash": "0xhash",
                "type": "call",
                "function": {
                    "signature": "transfer(address,uint256)",
                    "name": "transfer",
                    "inputs": [{ "name": "to", "type": "address", "value": "0x1" }]
                },
                "contract_metadata": { "name": "Token" }
            }]
        }));
        let page = parse_activity_page(&body).expect("valid page");
        let entry = &page.records[0];
        let function = entry.function.as_ref().expect("function");

        assert_eq!(entry.asset_type, "");
        assert_eq!(function.name.as_deref(), Some("transfer"));
        assert_eq!(
            function.inputs,
            json!([{ "name": "to", "type": "address", "value": "0x1" }])
        );
        assert_eq!(
            entry.contract_metadata,
            Some(ContractMetadata {
                name: Some("Token".to_string())
            })
        );
    }

    #[test]
    fn type_is_required() {
        let body = PageBody::Json(json!({
            "activity": [{
                "chain_id": 1,
                "block_number": 10,
                "block_time": "t",
                "tx_hash": "0xhash"
            }]
        }));
        let err = parse_activity_page(&body).expect_err("type is required");
        assert_eq!(err.path(), "activity[0]");
        assert_eq!(err.reason(), "missing field `type`");
    }

    #[test]
    fn mistyped_metadata_is_rejected() {
        let body = PageBody::Json(json!({
            "activity": [{
                "chain_id": 1,
                "block_number": 10,
                "block_time": "t",
                "tx_hash": "0xhash",
                "type": "send",
                "token_metadata": { "decimals": "six" }
            }]
        }));
        let err = parse_activity_page(&body).expect_err("decimals must be numeric");
        assert_eq!(err.path(), "activity[0]");
        assert!(err.reason().contains("\"six\""));
    }
}
