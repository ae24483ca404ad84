pub mod bcb_client;
pub mod sheets_client;

#[cfg(test)]
pub(crate) mod test_server;

pub use bcb_client::fetch_rate_or_backup;
pub use sheets_client::fetch_donation_figures_or_backup;

use reqwest::{Client, Response};

use crate::error::FetchError;

/// GET a URL and turn non-2xx answers into `FetchError::Status`.
async fn get_ok(client: &Client, url: String) -> Result<Response, FetchError> {
    tracing::debug!(%url, "GET");
    let response = client.get(&url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status { url, status });
    }
    Ok(response)
}
