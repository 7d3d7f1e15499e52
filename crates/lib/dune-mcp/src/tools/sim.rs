use dune_core::client::SimTransport;
use dune_core::pagination::PageObserver;
use dune_core::query::{ActivityQuery, TransactionQuery};
use rmcp::{
    ErrorData,
    Peer,
    RoleServer,
    handler::server::wrapper::Parameters,
    model::CallToolResult,
    schemars,
    tool,
    tool_router,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::DuneMcp;
use crate::helpers;
use crate::tools::args::ToolArgs;

/// Parameters for fetching transactions by address.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct TransactionsParams {
    /// EVM address to look up.
    pub address: String,
    /// Comma separated chain ids, e.g. `1,8453`. Empty queries all chains.
    pub chain_ids: Option<String>,
    /// Oldest block to include. Pagination stops once older records appear.
    pub block_number: u64,
    /// Include transactions sent by the address. Defaults to true.
    pub is_sender: Option<bool>,
    /// Include transactions received by the address. Defaults to true.
    pub is_receiver: Option<bool>,
}

/// Parameters for fetching token activity by address.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct ActivityParams {
    /// EVM address to look up.
    pub address: String,
    /// Comma separated chain ids, e.g. `1,8453`. Empty queries all chains.
    pub chain_ids: Option<String>,
    /// Oldest block to include. Pagination stops once older records appear.
    pub block_number: u64,
}

#[tool_router(router = tool_router_sim, vis = "pub")]
impl<T: SimTransport> DuneMcp<T> {
    #[tool(description = "Fetch transactions for an EVM address, newest first, down to a block number. Optionally restrict to chains and to the sending or receiving side.")]
    async fn get_transactions_by_address(
        &self,
        peer: Peer<RoleServer>,
        Parameters(args): Parameters<ToolArgs<TransactionsParams>>,
    ) -> Result<CallToolResult, ErrorData> {
        self.fetch_transactions(&args, &self.client_log(peer)).await
    }

    #[tool(description = "Fetch fungible token activity for an EVM address, newest first, down to a block number. Approvals, NFT transfers, and token-less contract calls are excluded.")]
    async fn get_activity_by_address(
        &self,
        peer: Peer<RoleServer>,
        Parameters(args): Parameters<ToolArgs<ActivityParams>>,
    ) -> Result<CallToolResult, ErrorData> {
        self.fetch_activity(&args, &self.client_log(peer)).await
    }
}

impl<T: SimTransport> DuneMcp<T> {
    async fn fetch_transactions<O: PageObserver>(
        &self,
        args: &ToolArgs<TransactionsParams>,
        observer: &O,
    ) -> Result<CallToolResult, ErrorData> {
        self.control().ensure_configured().map_err(helpers::map_err)?;
        let query = TransactionQuery::from_args(Some(args.object()))
            .map_err(|err| helpers::map_err(err.into()))?;
        info!(tool = "get_transactions_by_address", address = %query.address, "tool call");

        let transactions = self
            .control()
            .get_transactions_by_address_observed(&query, observer)
            .await
            .map_err(helpers::map_err)?;
        helpers::json_result(&transactions)
    }

    async fn fetch_activity<O: PageObserver>(
        &self,
        args: &ToolArgs<ActivityParams>,
        observer: &O,
    ) -> Result<CallToolResult, ErrorData> {
        self.control().ensure_configured().map_err(helpers::map_err)?;
        let query = ActivityQuery::from_args(Some(args.object()))
            .map_err(|err| helpers::map_err(err.into()))?;
        info!(tool = "get_activity_by_address", address = %query.address, "tool call");

        let activity = self
            .control()
            .get_activity_by_address_observed(&query, observer)
            .await
            .map_err(helpers::map_err)?;
        helpers::json_result(&activity)
    }
}
