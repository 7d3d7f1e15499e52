//! Validation for `/v1/evm/transactions/{address}` pages.

use dune_store::models::{Page, Transaction};
use dune_store::schema::FIELD_TRANSACTIONS;

use super::{SchemaError, parse_page};
use crate::client::PageBody;

/// Validates a transactions page.
///
/// # Errors
/// Returns `SchemaError` if the body is not a JSON object or a transaction is
/// missing a required field or carries a mistyped one.
pub fn parse_transactions_page(body: &PageBody) -> Result<Page<Transaction>, SchemaError> {
    parse_page(body, FIELD_TRANSACTIONS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dune_store::models::TransactionLog;
    use serde_json::{Value, json};

    fn minimal_transaction(block_number: u64) -> Value {
        json!({
            "address": "0xabc",
            "block_hash": "0xblock",
            "block_number": block_number,
            "block_time": "2025-01-01T00:00:00+00:00",
            "chain": "ethereum",
            "from": "0xabc",
            "hash": "0xhash"
        })
    }

    #[test]
    fn defaults_are_filled() {
        let body = PageBody::Json(json!({ "transactions": [minimal_transaction(10)] }));
        let page = parse_transactions_page(&body).expect("valid page");

        assert_eq!(page.next_offset, "");
        assert!(page.next_cursor().is_none());
        let tx = &page.records[0];
        assert_eq!(tx.block_number, 10);
        assert_eq!(tx.to, "");
        assert_eq!(tx.value, "");
        assert_eq!(tx.data, "");
        assert!(tx.logs.is_empty());
        assert_eq!(tx.decoded, json!({}));
        assert_eq!(tx.success, None);
    }

    #[test]
    fn contract_creation_has_null_to() {
        let mut tx = minimal_transaction(5);
        tx["to"] = Value::Null;
        tx["value"] = Value::Null;
        let body = PageBody::Json(json!({ "next_offset": "n1", "transactions": [tx] }));
        let page = parse_transactions_page(&body).expect("null to is allowed");

        assert_eq!(page.records[0].to, "");
        assert_eq!(page.next_cursor(), Some("n1"));
    }

    #[test]
    fn optional_fields_are_kept() {
        let mut tx = minimal_transaction(5);
        tx["success"] = json!(true);
        tx["chain_id"] = json!(8453);
        tx["logs"] = json!([{ "address": "0xlog", "topics": ["0xt0", "0xt1"] }]);
        tx["decoded"] = json!({ "name": "transfer", "inputs": [1, 2] });
        let body = PageBody::Json(json!({ "transactions": [tx] }));
        let page = parse_transactions_page(&body).expect("valid page");
        let tx = &page.records[0];

        assert_eq!(tx.success, Some(true));
        assert_eq!(tx.chain_id, Some(8453));
        assert_eq!(
            tx.logs,
            vec![TransactionLog {
                address: "0xlog".to_string(),
                data: String::new(),
                topics: vec!["0xt0".to_string(), "0xt1".to_string()],
            }]
        );
        assert_eq!(tx.decoded, json!({ "name": "transfer", "inputs": [1, 2] }));
    }

    #[test]
    fn missing_required_field_names_the_path() {
        let mut broken = minimal_transaction(5);
        broken
            .as_object_mut()
            .expect("object")
            .remove("hash");
        let body = PageBody::Json(json!({
            "transactions": [minimal_transaction(6), broken]
        }));
        let err = parse_transactions_page(&body).expect_err("hash is required");

        assert_eq!(err.path(), "transactions[1]");
        assert_eq!(err.reason(), "missing field `hash`");
    }

    #[test]
    fn mistyped_block_number_is_rejected() {
        let mut tx = minimal_transaction(5);
        tx["block_number"] = json!("five");
        let body = PageBody::Json(json!({ "transactions": [tx] }));
        let err = parse_transactions_page(&body).expect_err("block number must be numeric");

        assert_eq!(err.path(), "transactions[0]");
        assert!(err.reason().starts_with("invalid type: string"));
    }

    #[test]
    fn empty_body_is_a_terminal_page() {
        let page = parse_transactions_page(&PageBody::Json(json!({}))).expect("defaults");
        assert!(page.records.is_empty());
        assert!(page.next_cursor().is_none());
    }

    #[test]
    fn mistyped_cursor_is_rejected() {
        let body = PageBody::Json(json!({ "next_offset": 12, "transactions": [] }));
        let err = parse_transactions_page(&body).expect_err("cursor must be a string");
        assert_eq!(err.path(), "next_offset");
    }
}
