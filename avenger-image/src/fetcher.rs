use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;

#[cfg(all(feature = "reqwest", not(target_arch = "wasm32")))]
use crate::reqwest_fetcher::ReqwestImageFetcher;

use crate::error::AvengerImageError;

/// Source of raw image bytes for an already sanitized url
#[async_trait]
pub trait ImageFetcher: Send + Sync {
    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, AvengerImageError>;
}

/// Reads `file://` urls and bare paths from the local file system
#[derive(Debug, Clone, Default)]
pub struct FileImageFetcher {
    pub root: Option<PathBuf>,
}

impl FileImageFetcher {
    pub fn new(root: Option<PathBuf>) -> Self {
        Self { root }
    }

    fn resolve(&self, url: &str) -> Result<PathBuf, AvengerImageError> {
        if url.contains("://") && !url.starts_with("file://") {
            return Err(AvengerImageError::NoImageFetcherConfigured(format!(
                "cannot fetch {url} from the file system"
            )));
        }
        let path = PathBuf::from(url.strip_prefix("file://").unwrap_or(url));
        Ok(match &self.root {
            Some(root) if path.is_relative() => root.join(path),
            _ => path,
        })
    }
}

#[async_trait]
impl ImageFetcher for FileImageFetcher {
    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, AvengerImageError> {
        let path = self.resolve(url)?;
        Ok(std::fs::read(path)?)
    }
}

/// Dispatches http(s) urls to the network fetcher and everything else to
/// the file system
pub struct DefaultImageFetcher {
    files: FileImageFetcher,
    remote: Option<Arc<dyn ImageFetcher>>,
}

#[async_trait]
impl ImageFetcher for DefaultImageFetcher {
    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, AvengerImageError> {
        if url.starts_with("http://") || url.starts_with("https://") {
            match &self.remote {
                Some(remote) => remote.fetch_bytes(url).await,
                None => Err(AvengerImageError::NoImageFetcherConfigured(
                    "Image fetching requires the image-request feature flag".to_string(),
                )),
            }
        } else {
            self.files.fetch_bytes(url).await
        }
    }
}

pub fn make_image_fetcher() -> Arc<dyn ImageFetcher> {
    cfg_if::cfg_if! {
        if #[cfg(all(feature = "reqwest", not(target_arch = "wasm32")))] {
            let remote: Option<Arc<dyn ImageFetcher>> = Some(Arc::new(ReqwestImageFetcher::new()));
        } else {
            let remote: Option<Arc<dyn ImageFetcher>> = None;
        }
    }
    Arc::new(DefaultImageFetcher {
        files: FileImageFetcher::default(),
        remote,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;

    #[test]
    fn test_file_fetcher_reads_relative_to_root() {
        let dir = std::env::temp_dir().join("avenger-image-fetcher-test");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("bytes.bin"), [1u8, 2, 3]).unwrap();

        let fetcher = FileImageFetcher::new(Some(dir.clone()));
        let bytes = block_on(fetcher.fetch_bytes("bytes.bin")).unwrap();
        assert_eq!(bytes, vec![1, 2, 3]);

        let url = format!("file://{}", dir.join("bytes.bin").display());
        assert_eq!(block_on(fetcher.fetch_bytes(&url)).unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn test_file_fetcher_rejects_remote() {
        let fetcher = FileImageFetcher::default();
        assert!(block_on(fetcher.fetch_bytes("ftp://example.com/a.png")).is_err());
    }
}
