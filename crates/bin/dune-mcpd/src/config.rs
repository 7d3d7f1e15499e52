use clap::{Parser, builder::BoolishValueParser};
use dune_store::schema::DEFAULT_SIM_BASE_URL;
use std::error::Error;
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

const DEFAULT_MCP_HTTP_ADDR: &str = "127.0.0.1:4020";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
const DEFAULT_TRANSPORT: &str = "stdio";

#[derive(Parser, Debug)]
#[command(name = "dune-mcpd", version, about = "Dune Sim MCP daemon.")]
struct CliArgs {
    #[arg(long, env = "DUNE_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    #[arg(long, env = "DUNE_SIM_BASE_URL", default_value = DEFAULT_SIM_BASE_URL)]
    sim_base_url: String,

    #[arg(
        long,
        env = "DUNE_REQUEST_TIMEOUT_SECS",
        default_value_t = DEFAULT_REQUEST_TIMEOUT_SECS
    )]
    request_timeout_secs: u64,

    #[arg(long, env = "DUNE_MCP_TRANSPORT", default_value = DEFAULT_TRANSPORT)]
    transport: String,

    #[arg(long, env = "DUNE_MCP_HTTP_ADDR", default_value = DEFAULT_MCP_HTTP_ADDR)]
    mcp_http_addr: SocketAddr,

    #[arg(
        long,
        env = "DUNE_MCP_STATEFUL",
        default_value_t = true,
        value_parser = BoolishValueParser::new()
    )]
    stateful: bool,
}

/// How the MCP server talks to its client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum McpTransport {
    Stdio,
    Http,
}

impl FromStr for McpTransport {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "stdio" => Ok(Self::Stdio),
            "http" => Ok(Self::Http),
            _ => Err(ConfigError::InvalidSetting {
                name: "DUNE_MCP_TRANSPORT",
                value: value.to_string(),
            }),
        }
    }
}

/// Runtime configuration loaded from CLI arguments and environment variables.
#[derive(Clone)]
pub struct DuneConfig {
    pub api_key: Option<String>,
    pub sim_base_url: String,
    pub request_timeout: Duration,
    pub transport: McpTransport,
    pub mcp_http_addr: SocketAddr,
    pub stateful: bool,
}

impl fmt::Debug for DuneConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DuneConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("sim_base_url", &self.sim_base_url)
            .field("request_timeout", &self.request_timeout)
            .field("transport", &self.transport)
            .field("mcp_http_addr", &self.mcp_http_addr)
            .field("stateful", &self.stateful)
            .finish()
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidSetting { name: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidSetting { name, value } => {
                write!(f, "invalid {name} value: {value}")
            }
        }
    }
}

impl Error for ConfigError {}

impl DuneConfig {
    pub fn from_args() -> Result<Self, ConfigError> {
        let args = CliArgs::parse();
        Self::try_from(args)
    }
}

impl TryFrom<CliArgs> for DuneConfig {
    type Error = ConfigError;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        let api_key = args.api_key.filter(|value| !value.trim().is_empty());

        if args.request_timeout_secs == 0 {
            return Err(ConfigError::InvalidSetting {
                name: "DUNE_REQUEST_TIMEOUT_SECS",
                value: args.request_timeout_secs.to_string(),
            });
        }

        let sim_base_url = args.sim_base_url.trim().to_string();
        if !(sim_base_url.starts_with("http://") || sim_base_url.starts_with("https://")) {
            return Err(ConfigError::InvalidSetting {
                name: "DUNE_SIM_BASE_URL",
                value: args.sim_base_url,
            });
        }

        Ok(Self {
            api_key,
            sim_base_url,
            request_timeout: Duration::from_secs(args.request_timeout_secs),
            transport: args.transport.parse()?,
            mcp_http_addr: args.mcp_http_addr,
            stateful: args.stateful,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_args() -> CliArgs {
        CliArgs {
            api_key: Some("key".to_string()),
            sim_base_url: DEFAULT_SIM_BASE_URL.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            transport: DEFAULT_TRANSPORT.to_string(),
            mcp_http_addr: DEFAULT_MCP_HTTP_ADDR.parse().expect("valid MCP addr"),
            stateful: true,
        }
    }

    #[test]
    fn defaults_parse() {
        let config = DuneConfig::try_from(base_args()).expect("config should parse");

        assert_eq!(config.api_key.as_deref(), Some("key"));
        assert_eq!(config.sim_base_url, "https://api.sim.dune.com");
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.transport, McpTransport::Stdio);
    }

    #[test]
    fn blank_api_key_is_missing() {
        let mut args = base_args();
        args.api_key = Some("  ".to_string());

        let config = DuneConfig::try_from(args).expect("config should parse");

        assert!(config.api_key.is_none());
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let mut args = base_args();
        args.request_timeout_secs = 0;

        let err = DuneConfig::try_from(args).expect_err("zero timeout");

        assert_eq!(err.to_string(), "invalid DUNE_REQUEST_TIMEOUT_SECS value: 0");
    }

    #[test]
    fn transport_is_case_insensitive() {
        let mut args = base_args();
        args.transport = "HTTP".to_string();

        let config = DuneConfig::try_from(args).expect("config should parse");

        assert_eq!(config.transport, McpTransport::Http);
    }

    #[test]
    fn unknown_transport_is_rejected() {
        let mut args = base_args();
        args.transport = "sse".to_string();

        assert!(DuneConfig::try_from(args).is_err());
    }

    #[test]
    fn base_url_must_be_http() {
        let mut args = base_args();
        args.sim_base_url = "api.sim.dune.com".to_string();

        assert!(DuneConfig::try_from(args).is_err());
    }

    #[test]
    fn debug_redacts_api_key() {
        let config = DuneConfig::try_from(base_args()).expect("config should parse");

        let rendered = format!("{config:?}");

        assert!(rendered.contains("<redacted>"));
        assert!(!rendered.contains("\"key\""));
    }
}
