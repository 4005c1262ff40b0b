//! Outbound HTTP shared by the provider adapters.

use std::time::Duration;

use moviesearch_core::SourceApi;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::MetadataError;

pub const USER_AGENT: &str = "MovieSearchApp/1.0";

/// Status reported for failures that never produced an HTTP response.
const TRANSPORT_FAILURE_STATUS: u16 = 500;

/// Build the client shared by every adapter.
pub fn build_client(timeout: Duration) -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .build()
}

/// GET `url` with query `params` and decode the JSON body.
///
/// Non-2xx statuses, transport errors and undecodable bodies all surface as
/// `ServiceUnavailable` for `service`. Error text never includes the query
/// string, which carries the API key.
pub async fn get_json<T: DeserializeOwned>(
    client: &reqwest::Client,
    service: SourceApi,
    url: &str,
    params: &[(&str, &str)],
) -> Result<T, MetadataError> {
    debug!(service = %service, url = %url, "provider request");

    let resp = client
        .get(url)
        .query(params)
        .send()
        .await
        .map_err(|e| transport_error(service, e))?;

    let status = resp.status();
    if !status.is_success() {
        return Err(MetadataError::unavailable(
            service,
            status.as_u16(),
            format!("{service} returned {status}"),
        ));
    }

    resp.json()
        .await
        .map_err(|e| transport_error(service, e))
}

fn transport_error(service: SourceApi, err: reqwest::Error) -> MetadataError {
    let status = err
        .status()
        .map(|s| s.as_u16())
        .unwrap_or(TRANSPORT_FAILURE_STATUS);
    let detail = if err.is_timeout() {
        format!("request timed out: {}", err.without_url())
    } else if err.is_decode() {
        format!("parse JSON: {}", err.without_url())
    } else {
        err.without_url().to_string()
    };
    MetadataError::unavailable(service, status, detail)
}
