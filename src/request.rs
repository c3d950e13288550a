use std::time::Duration;

use reqwest::Client;
use tracing::debug;

use crate::Result;

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Anything that can turn a URL into page HTML.
///
/// Non-2xx responses and network failures come back as errors; the caller
/// decides whether a failed page is worth more than a log line.
#[allow(async_fn_in_trait)]
pub trait Fetch {
    async fn fetch(&self, url: &str) -> Result<String>;
}

impl Fetch for Client {
    async fn fetch(&self, url: &str) -> Result<String> {
        request_page_html(self, url).await
    }
}

pub fn build_client() -> Result<Client> {
    let client = Client::builder()
        .user_agent(USER_AGENT)
        .timeout(REQUEST_TIMEOUT)
        .build()?;
    Ok(client)
}

/// Requests a page and returns a `Result<String>` containing the HTML.
async fn request_page_html(client: &Client, url: &str) -> Result<String> {
    debug!(url, "Requesting page");
    let res = client.get(url).send().await?.error_for_status()?;
    let html = res.text().await?;
    Ok(html)
}
