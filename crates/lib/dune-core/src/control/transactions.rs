use dune_store::models::Transaction;
use dune_store::schema::PARAM_CHAIN_IDS;
use tracing::info;

use crate::client::{Endpoint, SimTransport};
use crate::filters::filter_transactions;
use crate::pagination::{PageObserver, PageQuery, collect_filtered, pages};
use crate::parsers::parse_transactions_page;
use crate::query::TransactionQuery;

use super::{ControlError, DuneControlPlane};

impl<T: SimTransport> DuneControlPlane<T> {
    /// Fetches transactions for an address, newest first, down to the
    /// query's lower-bound block.
    ///
    /// # Errors
    /// Returns `ControlError` if no API key is configured, a request fails,
    /// or a page does not match the expected schema.
    pub async fn get_transactions_by_address(
        &self,
        query: &TransactionQuery,
    ) -> Result<Vec<Transaction>, ControlError> {
        self.get_transactions_by_address_observed(query, &()).await
    }

    /// Same as `get_transactions_by_address`, reporting each page to
    /// `observer` as it is processed.
    ///
    /// # Errors
    /// See `get_transactions_by_address`.
    pub async fn get_transactions_by_address_observed<O: PageObserver>(
        &self,
        query: &TransactionQuery,
        observer: &O,
    ) -> Result<Vec<Transaction>, ControlError> {
        let api_key = self.api_key()?;
        info!(
            address = %query.address,
            chain_ids = %query.chain_ids,
            block_number = query.block_number,
            is_sender = query.roles.is_sender,
            is_receiver = query.roles.is_receiver,
            "fetching transactions"
        );

        let page_query = PageQuery::new(Endpoint::Transactions, &query.address, api_key)
            .with_param(PARAM_CHAIN_IDS, &query.chain_ids);
        let stream = pages(self.transport(), page_query, parse_transactions_page);
        let transactions = collect_filtered(stream, Endpoint::Transactions, observer, |records| {
            filter_transactions(records, query.roles, &query.address, query.block_number)
        })
        .await?;

        info!(count = transactions.len(), "transactions fetched");
        Ok(transactions)
    }
}
