use async_trait::async_trait;

use crate::error::AvengerImageError;
use crate::fetcher::ImageFetcher;

/// Fetches http(s) urls with a blocking reqwest client
#[derive(Debug, Clone, Default)]
pub struct ReqwestImageFetcher {
    client: reqwest::blocking::Client,
}

impl ReqwestImageFetcher {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ImageFetcher for ReqwestImageFetcher {
    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, AvengerImageError> {
        tracing::debug!("fetching image {url}");
        let response = self.client.get(url).send()?.error_for_status()?;
        Ok(response.bytes()?.to_vec())
    }
}
