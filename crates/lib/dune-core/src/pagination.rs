//! Cursor-following page loop.
//!
//! `pages` yields validated pages lazily: nothing is fetched until the
//! consumer polls, so dropping the stream after a page stops pagination
//! without an extra request. Requests are strictly sequential and separated
//! by `PAGE_DELAY`.

use std::future::Future;
use std::pin::pin;
use std::time::Duration;
use std::{error::Error, fmt, mem};

use dune_store::models::Page;
use futures::{Stream, TryStreamExt, stream};
use tracing::{debug, warn};

use crate::client::{ClientError, Endpoint, PageBody, PageRequest, SimTransport};
use crate::filters::Filtered;
use crate::parsers::SchemaError;

/// Pause before every page request, to stay under the upstream rate limit.
pub const PAGE_DELAY: Duration = Duration::from_millis(100);

pub type PageParser<R> = fn(&PageBody) -> Result<Page<R>, SchemaError>;

#[derive(Debug)]
pub enum PageError {
    Network(ClientError),
    Schema(SchemaError),
}

impl fmt::Display for PageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Network(err) => write!(f, "{err}"),
            Self::Schema(err) => write!(f, "{err}"),
        }
    }
}

impl Error for PageError {}

impl From<ClientError> for PageError {
    fn from(err: ClientError) -> Self {
        Self::Network(err)
    }
}

impl From<SchemaError> for PageError {
    fn from(err: SchemaError) -> Self {
        Self::Schema(err)
    }
}

/// Fixed parts of a paged query.
#[derive(Debug, Clone)]
pub struct PageQuery {
    pub endpoint: Endpoint,
    pub address: String,
    pub api_key: String,
    pub params: Vec<(&'static str, String)>,
}

impl PageQuery {
    pub fn new(endpoint: Endpoint, address: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            endpoint,
            address: address.into(),
            api_key: api_key.into(),
            params: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_param(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.params.push((key, value.into()));
        self
    }

    fn request(&self, offset: Option<&str>) -> PageRequest {
        PageRequest::new(
            self.endpoint,
            self.address.clone(),
            self.api_key.clone(),
            &self.params,
            offset,
        )
    }
}

/// Progress report for one fetched and filtered page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageEvent {
    pub endpoint: &'static str,
    /// Cursor the page was requested with; empty for the first page.
    pub offset: String,
    /// Records on the page before filtering.
    pub records: usize,
    /// Records that passed the filter.
    pub kept: usize,
    pub reached_limit: bool,
}

/// Receives a `PageEvent` after every page, before the next request.
pub trait PageObserver: Send + Sync {
    fn page_fetched(&self, event: PageEvent) -> impl Future<Output = ()> + Send;
}

/// Ignores every event.
impl PageObserver for () {
    async fn page_fetched(&self, _event: PageEvent) {}
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Cursor {
    First,
    Next(String),
    Done,
}

/// Streams validated pages, following `next_offset` until it is empty.
pub fn pages<'a, T, R>(
    transport: &'a T,
    query: PageQuery,
    parse: PageParser<R>,
) -> impl Stream<Item = Result<Page<R>, PageError>> + Send + 'a
where
    T: SimTransport,
    R: Send + 'a,
{
    stream::try_unfold((Cursor::First, query), move |(cursor, query)| {
        next_page(transport, cursor, query, parse)
    })
}

async fn next_page<T, R>(
    transport: &T,
    cursor: Cursor,
    query: PageQuery,
    parse: PageParser<R>,
) -> Result<Option<(Page<R>, (Cursor, PageQuery))>, PageError>
where
    T: SimTransport,
{
    let offset = match cursor {
        Cursor::Done => return Ok(None),
        Cursor::First => None,
        Cursor::Next(offset) => Some(offset),
    };

    tokio::time::sleep(PAGE_DELAY).await;

    let request = query.request(offset.as_deref());
    let body = transport.fetch_page(&request).await?;
    let page = parse(&body).inspect_err(|err| {
        warn!(endpoint = query.endpoint.name(), error = %err, "rejecting Sim page");
    })?;

    debug!(
        endpoint = query.endpoint.name(),
        offset = offset.as_deref().unwrap_or(""),
        records = page.records.len(),
        has_next = page.next_cursor().is_some(),
        "fetched Sim page"
    );

    let next = page
        .next_cursor()
        .map_or(Cursor::Done, |offset| Cursor::Next(offset.to_string()));
    Ok(Some((page, (next, query))))
}

/// Drains `pages` through `filter`, stopping after the first page whose
/// filter reports the lower bound was reached. `observer` hears about every
/// page in order.
///
/// # Errors
/// Returns the first `PageError`; records accumulated so far are discarded.
pub async fn collect_filtered<R, S, O, F>(
    pages: S,
    endpoint: Endpoint,
    observer: &O,
    mut filter: F,
) -> Result<Vec<R>, PageError>
where
    S: Stream<Item = Result<Page<R>, PageError>>,
    O: PageObserver,
    F: FnMut(Vec<R>) -> Filtered<R>,
{
    let mut pages = pin!(pages);
    let mut results = Vec::new();
    let mut offset = String::new();

    while let Some(page) = pages.try_next().await? {
        let requested_with = mem::replace(&mut offset, page.next_offset);
        let fetched = page.records.len();
        let Filtered {
            records,
            reached_limit,
        } = filter(page.records);
        debug!(kept = records.len(), reached_limit, "filtered Sim page");

        observer
            .page_fetched(PageEvent {
                endpoint: endpoint.name(),
                offset: requested_with,
                records: fetched,
                kept: records.len(),
                reached_limit,
            })
            .await;

        results.extend(records);
        if reached_limit {
            break;
        }
    }

    Ok(results)
}
