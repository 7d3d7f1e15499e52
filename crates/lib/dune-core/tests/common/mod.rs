#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;

use dune_core::client::{ClientError, PageBody, PageRequest, SimTransport};
use serde_json::{Value, json};

/// Transport that replays a fixed script of responses and records requests.
pub struct ScriptedTransport {
    responses: Mutex<VecDeque<Result<PageBody, ClientError>>>,
    requests: Mutex<Vec<PageRequest>>,
}

impl ScriptedTransport {
    pub fn new(responses: Vec<Result<PageBody, ClientError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn pages(pages: Vec<Value>) -> Self {
        Self::new(pages.into_iter().map(|page| Ok(PageBody::Json(page))).collect())
    }

    pub fn requests(&self) -> Vec<PageRequest> {
        self.requests.lock().expect("requests lock").clone()
    }

    pub fn fetch_count(&self) -> usize {
        self.requests.lock().expect("requests lock").len()
    }

    fn next_response(&self, request: &PageRequest) -> Result<PageBody, ClientError> {
        self.requests
            .lock()
            .expect("requests lock")
            .push(request.clone());
        self.responses
            .lock()
            .expect("responses lock")
            .pop_front()
            .unwrap_or_else(|| {
                Err(ClientError::Status {
                    status: 599,
                    body: "script exhausted".to_string(),
                })
            })
    }
}

impl SimTransport for ScriptedTransport {
    async fn fetch_page(&self, request: &PageRequest) -> Result<PageBody, ClientError> {
        self.next_response(request)
    }
}

pub fn transaction(block_number: u64, from: &str, to: &str) -> Value {
    json!({
        "address": "0xabc",
        "block_hash": format!("0xblock{block_number}"),
        "block_number": block_number,
        "block_time": "2025-01-01T00:00:00+00:00",
        "chain": "ethereum",
        "chain_id": 1,
        "from": from,
        "to": to,
        "hash": format!("0xtx{block_number}"),
        "success": true,
        "value": "0x0"
    })
}

pub fn activity(block_number: u64, activity_type: &str, asset_type: &str) -> Value {
    json!({
        "chain_id": 1,
        "block_number": block_number,
        "block_time": "2025-01-01T00:00:00+00:00",
        "tx_hash": format!("0xtx{block_number}{activity_type}"),
        "type": activity_type,
        "asset_type": asset_type,
        "token_address": if asset_type.is_empty() { "" } else { "0xtoken" },
        "from": "0xabc",
        "to": "0xdef",
        "value": "1000"
    })
}

pub fn transactions_page(transactions: Vec<Value>, next_offset: Option<&str>) -> Value {
    let mut page = json!({ "transactions": transactions });
    if let Some(next_offset) = next_offset {
        page["next_offset"] = json!(next_offset);
    }
    page
}

pub fn activity_page(activity: Vec<Value>, next_offset: Option<&str>) -> Value {
    let mut page = json!({ "activity": activity });
    if let Some(next_offset) = next_offset {
        page["next_offset"] = json!(next_offset);
    }
    page
}
