//! Transport seam for the Sim API.
//!
//! The paginator only talks to a `SimTransport`. `HttpSimClient` is the
//! production implementation; tests substitute scripted transports.

pub mod http;

use std::future::Future;
use std::{error::Error, fmt};

use dune_store::schema::{PARAM_OFFSET, PATH_ACTIVITY, PATH_TRANSACTIONS};
use reqwest::Url;
use serde_json::Value;

pub use http::{HttpClientConfig, HttpSimClient};

/// Paged Sim endpoints keyed by address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Transactions,
    Activity,
}

impl Endpoint {
    pub const fn path(self) -> &'static str {
        match self {
            Self::Transactions => PATH_TRANSACTIONS,
            Self::Activity => PATH_ACTIVITY,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Transactions => "transactions",
            Self::Activity => "activity",
        }
    }
}

/// A single page request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub endpoint: Endpoint,
    pub address: String,
    pub api_key: String,
    /// Query parameters, already stripped of empty values.
    pub query: Vec<(&'static str, String)>,
}

impl PageRequest {
    /// Builds a request from base parameters and an optional cursor.
    ///
    /// Parameters with empty values are dropped, as is an empty cursor.
    pub fn new(
        endpoint: Endpoint,
        address: impl Into<String>,
        api_key: impl Into<String>,
        params: &[(&'static str, String)],
        offset: Option<&str>,
    ) -> Self {
        let offset = offset.map(|offset| (PARAM_OFFSET, offset.to_string()));
        let query = params
            .iter()
            .cloned()
            .chain(offset)
            .filter(|(_, value)| !value.is_empty())
            .collect();
        Self {
            endpoint,
            address: address.into(),
            api_key: api_key.into(),
            query,
        }
    }

    /// Joins base URL, endpoint path, and address. The address is pushed as
    /// a single encoded path segment, so `/`, `?`, and `#` cannot escape it.
    ///
    /// # Errors
    /// Returns `ClientError::InvalidUrl` if the base URL cannot carry a path.
    pub fn url(&self, base_url: &str) -> Result<Url, ClientError> {
        let invalid = || ClientError::InvalidUrl(base_url.to_string());
        let mut url = Url::parse(base_url).map_err(|_| invalid())?;
        let endpoint = self.endpoint.path().split('/').filter(|segment| !segment.is_empty());
        url.path_segments_mut()
            .map_err(|()| invalid())?
            .pop_if_empty()
            .extend(endpoint)
            .push(&self.address);
        Ok(url)
    }

    /// Value of a query parameter, if present.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(name, _)| *name == key)
            .map(|(_, value)| value.as_str())
    }
}

/// Response body as read off the wire.
#[derive(Debug, Clone, PartialEq)]
pub enum PageBody {
    /// Body served with a JSON content type that parsed as JSON.
    Json(Value),
    /// Anything else, kept verbatim.
    Text(String),
}

#[derive(Debug)]
pub enum ClientError {
    Http(Box<reqwest::Error>),
    Status { status: u16, body: String },
    InvalidUrl(String),
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Http(err) if err.is_timeout() => write!(f, "Sim API request timed out: {err}"),
            Self::Http(err) => write!(f, "Sim API request failed: {err}"),
            Self::Status { status, body } => {
                write!(f, "Sim API returned HTTP {status}: {body}")
            }
            Self::InvalidUrl(base_url) => write!(f, "invalid Sim API base URL: {base_url}"),
        }
    }
}

impl Error for ClientError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Http(err) => Some(err.as_ref()),
            Self::Status { .. } | Self::InvalidUrl(_) => None,
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        Self::Http(Box::new(err))
    }
}

/// Fetches raw pages from the Sim API.
pub trait SimTransport: Send + Sync + 'static {
    /// Issues one page request and returns the body.
    ///
    /// # Errors
    /// Returns `ClientError` on transport failure or a non-success status.
    fn fetch_page(
        &self,
        request: &PageRequest,
    ) -> impl Future<Output = Result<PageBody, ClientError>> + Send;
}
