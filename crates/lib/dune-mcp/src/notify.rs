//! Page progress forwarded to the MCP client as `notifications/message`.

use std::sync::Arc;

use dune_core::pagination::{PageEvent, PageObserver};
use rmcp::model::{LoggingLevel, LoggingMessageNotificationParam};
use rmcp::{Peer, RoleServer};
use serde_json::json;
use tokio::sync::RwLock;
use tracing::warn;

pub const LOGGER_NAME: &str = "dune-mcp";

/// Level page progress is reported at.
const PAGE_LEVEL: LoggingLevel = LoggingLevel::Info;

/// Minimum level set by the client through `logging/setLevel`.
#[derive(Debug, Clone)]
pub struct LogLevel(Arc<RwLock<LoggingLevel>>);

impl Default for LogLevel {
    fn default() -> Self {
        Self(Arc::new(RwLock::new(LoggingLevel::Debug)))
    }
}

impl LogLevel {
    pub async fn set(&self, level: LoggingLevel) {
        *self.0.write().await = level;
    }

    pub async fn allows(&self, level: LoggingLevel) -> bool {
        severity(level) >= severity(*self.0.read().await)
    }
}

const fn severity(level: LoggingLevel) -> u8 {
    match level {
        LoggingLevel::Debug => 0,
        LoggingLevel::Info => 1,
        LoggingLevel::Notice => 2,
        LoggingLevel::Warning => 3,
        LoggingLevel::Error => 4,
        LoggingLevel::Critical => 5,
        LoggingLevel::Alert => 6,
        LoggingLevel::Emergency => 7,
    }
}

#[must_use]
pub fn page_message(event: &PageEvent) -> LoggingMessageNotificationParam {
    let offset = if event.offset.is_empty() {
        "start"
    } else {
        event.offset.as_str()
    };
    LoggingMessageNotificationParam {
        level: PAGE_LEVEL,
        logger: Some(LOGGER_NAME.to_string()),
        data: json!({
            "message": format!(
                "fetched {} page at offset {offset}: {} records, {} kept",
                event.endpoint, event.records, event.kept
            ),
            "endpoint": event.endpoint,
            "offset": event.offset,
            "records": event.records,
            "kept": event.kept,
            "reached_limit": event.reached_limit,
        }),
    }
}

/// Sends page events to the client session that issued the tool call.
pub struct ClientLog {
    peer: Peer<RoleServer>,
    level: LogLevel,
}

impl ClientLog {
    #[must_use]
    pub const fn new(peer: Peer<RoleServer>, level: LogLevel) -> Self {
        Self { peer, level }
    }
}

impl PageObserver for ClientLog {
    async fn page_fetched(&self, event: PageEvent) {
        if !self.level.allows(PAGE_LEVEL).await {
            return;
        }
        if let Err(err) = self.peer.notify_logging_message(page_message(&event)).await {
            warn!(error = %err, endpoint = event.endpoint, "client log notification failed");
        }
    }
}
