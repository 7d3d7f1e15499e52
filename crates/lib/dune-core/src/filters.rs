//! Per-page result filters.
//!
//! Records arrive newest first. A record older than the requested lower
//! bound is dropped and flags the page as having reached the limit, which
//! tells the paginator not to fetch further pages. The rest of the page is
//! still scanned, so an unordered page only loses the records that are
//! actually below the bound.

use dune_store::models::{Activity, Transaction};
use dune_store::schema::{
    ACTIVITY_TYPE_APPROVE,
    ACTIVITY_TYPE_CALL,
    ASSET_TYPE_ERC721,
    ASSET_TYPE_ERC1155,
};

use crate::query::RoleFilter;

/// Records that survived a filter pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Filtered<T> {
    pub records: Vec<T>,
    /// At least one record was below the lower bound.
    pub reached_limit: bool,
}

/// Filters a transactions page by lower bound and the caller's role flags.
pub fn filter_transactions(
    records: Vec<Transaction>,
    roles: RoleFilter,
    address: &str,
    lower_bound: u64,
) -> Filtered<Transaction> {
    filter_page(records, lower_bound, |tx| tx.block_number, |tx| {
        matches_role(tx, roles, address)
    })
}

/// Filters an activity page down to fungible token movements.
pub fn filter_activity(records: Vec<Activity>, lower_bound: u64) -> Filtered<Activity> {
    filter_page(records, lower_bound, |entry| entry.block_number, is_token_movement)
}

fn filter_page<T>(
    records: Vec<T>,
    lower_bound: u64,
    block_number: impl Fn(&T) -> u64,
    keep: impl Fn(&T) -> bool,
) -> Filtered<T> {
    let mut reached_limit = false;
    let records = records
        .into_iter()
        .filter(|record| {
            if block_number(record) < lower_bound {
                reached_limit = true;
                return false;
            }
            keep(record)
        })
        .collect();
    Filtered {
        records,
        reached_limit,
    }
}

/// With neither flag set this falls through to the receiver check.
fn matches_role(tx: &Transaction, roles: RoleFilter, address: &str) -> bool {
    if roles.is_sender && roles.is_receiver {
        return true;
    }
    if roles.is_sender {
        tx.from.eq_ignore_ascii_case(address)
    } else {
        tx.to.eq_ignore_ascii_case(address)
    }
}

fn is_token_movement(entry: &Activity) -> bool {
    let tokenless_call = entry.activity_type == ACTIVITY_TYPE_CALL
        && entry.asset_type.is_empty()
        && entry.token_address.is_empty();
    let non_fungible =
        entry.asset_type == ASSET_TYPE_ERC1155 || entry.asset_type == ASSET_TYPE_ERC721;
    let approval = entry.activity_type == ACTIVITY_TYPE_APPROVE;

    !(tokenless_call || non_fungible || approval)
}
