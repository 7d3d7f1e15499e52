use dune_core::client::{ClientError, HttpClientConfig, HttpSimClient};
use dune_core::control::DuneControlPlane;
use tracing::warn;

use crate::config::DuneConfig;

pub fn build_control_plane(
    config: &DuneConfig,
) -> Result<DuneControlPlane<HttpSimClient>, ClientError> {
    let client_config = HttpClientConfig::new(config.sim_base_url.clone())
        .with_request_timeout(config.request_timeout);
    let client = HttpSimClient::new(&client_config)?;

    let control = DuneControlPlane::new(client, config.api_key.clone());
    if !control.has_api_key() {
        warn!("DUNE_API_KEY is not set; every tool call will fail until it is");
    }
    Ok(control)
}
