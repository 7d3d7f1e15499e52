use std::{error::Error, fmt, sync::Arc};

use crate::client::{ClientError, SimTransport};
use crate::pagination::PageError;
use crate::parsers::SchemaError;
use crate::query::ValidationError;

pub mod activity;
pub mod transactions;

/// Name of the environment variable holding the Sim API key.
pub const API_KEY_ENV: &str = "DUNE_API_KEY";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    MissingApiKey,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingApiKey => write!(f, "{API_KEY_ENV} is not set"),
        }
    }
}

impl Error for ConfigError {}

#[derive(Debug)]
pub enum ControlError {
    Config(ConfigError),
    Validation(ValidationError),
    Schema(SchemaError),
    Network(ClientError),
}

impl fmt::Display for ControlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(err) => write!(f, "{err}"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::Schema(err) => write!(f, "{err}"),
            Self::Network(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ControlError {}

impl From<ConfigError> for ControlError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

impl From<ValidationError> for ControlError {
    fn from(err: ValidationError) -> Self {
        Self::Validation(err)
    }
}

impl From<SchemaError> for ControlError {
    fn from(err: SchemaError) -> Self {
        Self::Schema(err)
    }
}

impl From<ClientError> for ControlError {
    fn from(err: ClientError) -> Self {
        Self::Network(err)
    }
}

impl From<PageError> for ControlError {
    fn from(err: PageError) -> Self {
        match err {
            PageError::Network(err) => Self::Network(err),
            PageError::Schema(err) => Self::Schema(err),
        }
    }
}

/// Runs the per-tool fetch-and-filter pipelines against a Sim transport.
pub struct DuneControlPlane<T: SimTransport> {
    transport: Arc<T>,
    api_key: Option<String>,
}

impl<T: SimTransport> Clone for DuneControlPlane<T> {
    fn clone(&self) -> Self {
        Self {
            transport: self.transport.clone(),
            api_key: self.api_key.clone(),
        }
    }
}

impl<T: SimTransport> DuneControlPlane<T> {
    /// Creates a control plane. A blank key is treated as missing.
    pub fn new(transport: T, api_key: Option<String>) -> Self {
        Self::from_arc(Arc::new(transport), api_key)
    }

    pub fn from_arc(transport: Arc<T>, api_key: Option<String>) -> Self {
        let api_key = api_key.filter(|key| !key.trim().is_empty());
        Self { transport, api_key }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub const fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Fails fast when no API key is configured.
    ///
    /// # Errors
    /// Returns `ControlError::Config` if the key is missing.
    pub fn ensure_configured(&self) -> Result<(), ControlError> {
        self.api_key().map(|_| ())
    }

    fn api_key(&self) -> Result<&str, ControlError> {
        self.api_key
            .as_deref()
            .ok_or(ControlError::Config(ConfigError::MissingApiKey))
    }
}
