//! MCP server implementation for dune-mcp.
//!
//! This crate wires the Dune Sim control plane into rmcp tool handlers and
//! exposes the MCP-facing query surface.

mod helpers;
mod notify;
mod tools;
pub mod server;

use dune_core::client::SimTransport;
use dune_core::control::DuneControlPlane;
use rmcp::{
    ErrorData,
    Peer,
    RoleServer,
    ServerHandler,
    handler::server::tool::ToolRouter,
    service::RequestContext,
    tool,
    tool_handler,
    tool_router,
};
use rmcp::model::{
    CallToolResult,
    Content,
    ServerCapabilities,
    ServerInfo,
    SetLevelRequestParams,
};
use tracing::debug;

use crate::notify::{ClientLog, LogLevel};

pub use tools::sim::{ActivityParams, TransactionsParams};

const SERVER_INSTRUCTIONS: &str = r"dune-mcp answers read-only questions about EVM addresses using the Dune Sim API.

Tools:
- `get_transactions_by_address`: transactions for `address` down to block `block_number`, newest first.
  Optional `chain_ids` (comma separated, e.g. `1,8453`; empty means all chains),
  `is_sender` and `is_receiver` (both default true) restrict which side of the
  transaction the address must be on.
- `get_activity_by_address`: fungible token movements for `address` down to block
  `block_number`. Approvals, NFT transfers (erc721/erc1155), and plain contract calls
  without a token are left out.

Notes:
- Results are returned as a pretty-printed JSON array.
- Failures are reported with an `Invalid input:` prefix.
- Each fetched page is reported as an `info` log message (endpoint, offset, record counts).
- `health` returns `ok`.";

/// MCP server wrapper around the control plane and tool routers.
pub struct DuneMcp<T: SimTransport> {
    tool_router: ToolRouter<Self>,
    control: DuneControlPlane<T>,
    log_level: LogLevel,
}

impl<T: SimTransport> Clone for DuneMcp<T> {
    fn clone(&self) -> Self {
        Self {
            tool_router: self.tool_router.clone(),
            control: self.control.clone(),
            log_level: self.log_level.clone(),
        }
    }
}

impl<T: SimTransport> DuneMcp<T> {
    /// Creates a new server over a control plane.
    #[must_use]
    pub fn new(control: DuneControlPlane<T>) -> Self {
        let tool_router = Self::tool_router_core() + Self::tool_router_sim();
        Self {
            tool_router,
            control,
            log_level: LogLevel::default(),
        }
    }

    pub(crate) const fn control(&self) -> &DuneControlPlane<T> {
        &self.control
    }

    /// Page observer reporting to the calling client.
    pub(crate) fn client_log(&self, peer: Peer<RoleServer>) -> ClientLog {
        ClientLog::new(peer, self.log_level.clone())
    }
}

#[tool_router(router = tool_router_core, vis = "pub")]
impl<T: SimTransport> DuneMcp<T> {
    #[tool(description = "Health check. Returns 'ok'.")]
    async fn health(&self) -> Result<CallToolResult, ErrorData> {
        Ok(CallToolResult::success(vec![Content::text("ok")]))
    }
}

#[tool_handler]
impl<T: SimTransport> ServerHandler for DuneMcp<T> {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(SERVER_INSTRUCTIONS.to_string()),
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_logging()
                .build(),
            ..Default::default()
        }
    }

    async fn set_level(
        &self,
        request: SetLevelRequestParams,
        _context: RequestContext<RoleServer>,
    ) -> Result<(), ErrorData> {
        debug!(level = ?request.level, "client log level set");
        self.log_level.set(request.level).await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use dune_core::client::{ClientError, PageBody, PageRequest};
    use rmcp::model::LoggingLevel;

    use super::*;

    struct NoTransport;

    impl SimTransport for NoTransport {
        async fn fetch_page(&self, _request: &PageRequest) -> Result<PageBody, ClientError> {
            Ok(PageBody::Text(String::new()))
        }
    }

    fn server() -> DuneMcp<NoTransport> {
        DuneMcp::new(DuneControlPlane::new(NoTransport, None))
    }

    #[test]
    fn advertises_tools_and_logging() {
        let info = server().get_info();

        assert!(info.capabilities.tools.is_some());
        assert!(info.capabilities.logging.is_some());
    }

    #[tokio::test]
    async fn clones_share_the_client_log_level() {
        let mcp = server();
        let session = mcp.clone();

        session.log_level.set(LoggingLevel::Error).await;

        assert!(!mcp.log_level.allows(LoggingLevel::Info).await);
    }
}
