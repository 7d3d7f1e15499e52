use dune_store::models::Activity;
use dune_store::schema::{ACTIVITY_PAGE_LIMIT, PARAM_CHAIN_IDS, PARAM_LIMIT};
use tracing::info;

use crate::client::{Endpoint, SimTransport};
use crate::filters::filter_activity;
use crate::pagination::{PageObserver, PageQuery, collect_filtered, pages};
use crate::parsers::parse_activity_page;
use crate::query::ActivityQuery;

use super::{ControlError, DuneControlPlane};

impl<T: SimTransport> DuneControlPlane<T> {
    /// Fetches fungible token activity for an address, newest first, down to
    /// the query's lower-bound block.
    ///
    /// # Errors
    /// Returns `ControlError` if no API key is configured, a request fails,
    /// or a page does not match the expected schema.
    pub async fn get_activity_by_address(
        &self,
        query: &ActivityQuery,
    ) -> Result<Vec<Activity>, ControlError> {
        self.get_activity_by_address_observed(query, &()).await
    }

    /// Same as `get_activity_by_address`, reporting each page to `observer`
    /// as it is processed.
    ///
    /// # Errors
    /// See `get_activity_by_address`.
    pub async fn get_activity_by_address_observed<O: PageObserver>(
        &self,
        query: &ActivityQuery,
        observer: &O,
    ) -> Result<Vec<Activity>, ControlError> {
        let api_key = self.api_key()?;
        info!(
            address = %query.address,
            chain_ids = %query.chain_ids,
            block_number = query.block_number,
            "fetching token activity"
        );

        let page_query = PageQuery::new(Endpoint::Activity, &query.address, api_key)
            .with_param(PARAM_CHAIN_IDS, &query.chain_ids)
            .with_param(PARAM_LIMIT, ACTIVITY_PAGE_LIMIT.to_string());
        let stream = pages(self.transport(), page_query, parse_activity_page);
        let activity = collect_filtered(stream, Endpoint::Activity, observer, |records| {
            filter_activity(records, query.block_number)
        })
        .await?;

        info!(count = activity.len(), "token activity fetched");
        Ok(activity)
    }
}
