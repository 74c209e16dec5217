//! Asynchronous image and link resolution with an in-flight request count.

use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};

use futures::channel::oneshot;
use serde::{Deserialize, Serialize};

use crate::error::AvengerImageError;
use crate::fetcher::{make_image_fetcher, ImageFetcher};
use crate::store::ImageStore;
use crate::{ImageHandle, RgbaImage};

/// A url that passed sanitization, ready to be fetched or linked to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SanitizedUrl {
    pub href: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rel: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
}

#[derive(Default)]
struct PendingState {
    count: usize,
    waiters: Vec<oneshot::Sender<()>>,
}

/// Decrements the pending count when the request finishes or is dropped
struct PendingGuard {
    state: Arc<Mutex<PendingState>>,
}

impl PendingGuard {
    fn acquire(state: &Arc<Mutex<PendingState>>) -> Self {
        state.lock().unwrap_or_else(PoisonError::into_inner).count += 1;
        Self {
            state: state.clone(),
        }
    }
}

impl Drop for PendingGuard {
    fn drop(&mut self) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.count = state.count.saturating_sub(1);
        if state.count == 0 {
            for waiter in state.waiters.drain(..) {
                let _ = waiter.send(());
            }
        }
    }
}

/// Loads images and sanitizes link targets for renderers and event handlers.
///
/// Failures never surface as errors: a failed image load resolves to an
/// unloaded handle and a rejected url resolves to `None`.
#[derive(Clone)]
pub struct ResourceLoader {
    base_url: Option<String>,
    link_target: Option<String>,
    fetcher: Arc<dyn ImageFetcher>,
    store: Arc<ImageStore>,
    state: Arc<Mutex<PendingState>>,
}

impl Default for ResourceLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ResourceLoader {
    pub fn new() -> Self {
        Self {
            base_url: None,
            link_target: None,
            fetcher: make_image_fetcher(),
            store: Arc::new(ImageStore::new()),
            state: Default::default(),
        }
    }

    /// Prefix for relative urls
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Browsing context for sanitized links, e.g. `_blank`
    pub fn with_link_target(mut self, target: impl Into<String>) -> Self {
        self.link_target = Some(target.into());
        self
    }

    pub fn with_fetcher(mut self, fetcher: Arc<dyn ImageFetcher>) -> Self {
        self.fetcher = fetcher;
        self
    }

    pub fn store(&self) -> &ImageStore {
        &self.store
    }

    /// Number of requests issued and not yet completed
    pub fn pending(&self) -> usize {
        self.state.lock().unwrap_or_else(PoisonError::into_inner).count
    }

    /// Validate `uri` and resolve it against the base url
    pub fn sanitize(&self, uri: &str) -> Result<SanitizedUrl, AvengerImageError> {
        let uri = uri.trim();
        if uri.is_empty() {
            return Err(AvengerImageError::InvalidUrl(uri.to_string()));
        }

        let href = match scheme(uri) {
            Some(scheme) => {
                let scheme = scheme.to_ascii_lowercase();
                if !matches!(scheme.as_str(), "http" | "https" | "file" | "data") {
                    return Err(AvengerImageError::InvalidUrl(uri.to_string()));
                }
                uri.to_string()
            }
            None if uri.starts_with("//") => format!("https:{uri}"),
            None => match &self.base_url {
                Some(base) if !base.is_empty() => {
                    format!("{}/{}", base.trim_end_matches('/'), uri.trim_start_matches('/'))
                }
                _ => uri.to_string(),
            },
        };

        Ok(SanitizedUrl {
            href,
            rel: self.link_target.as_ref().map(|_| "noopener".to_string()),
            target: self.link_target.clone(),
        })
    }

    /// Sanitize a link url, counted as a pending request until it resolves
    pub fn sanitize_url(&self, uri: &str) -> impl Future<Output = Option<SanitizedUrl>> + 'static {
        let guard = PendingGuard::acquire(&self.state);
        let result = self.sanitize(uri);
        async move {
            let _guard = guard;
            match result {
                Ok(url) => Some(url),
                Err(err) => {
                    tracing::warn!("{err}");
                    None
                }
            }
        }
    }

    /// Load the image at `uri`. The pending count increments immediately and
    /// decrements when the returned future completes or is dropped.
    pub fn load_image(&self, uri: &str) -> impl Future<Output = ImageHandle> + 'static {
        let guard = PendingGuard::acquire(&self.state);
        let uri = uri.to_string();
        let loader = self.clone();
        async move {
            let _guard = guard;
            if let Some(handle) = loader.store.get(&uri) {
                return handle;
            }
            let handle = match loader.fetch_image(&uri).await {
                Ok(image) => ImageHandle::loaded(uri.clone(), image),
                Err(err) => {
                    tracing::warn!("failed to load image {uri}: {err}");
                    ImageHandle::unloaded(Some(uri.clone()))
                }
            };
            loader.store.insert(&uri, handle.clone());
            handle
        }
    }

    async fn fetch_image(&self, uri: &str) -> Result<RgbaImage, AvengerImageError> {
        if uri.starts_with("data:") {
            return RgbaImage::from_data_url(uri);
        }
        let url = self.sanitize(uri)?;
        let bytes = self.fetcher.fetch_bytes(&url.href).await?;
        RgbaImage::from_bytes(&bytes)
    }

    /// Resolves once no requests are pending: `false` immediately when nothing
    /// was in flight at call time, `true` after waiting for in-flight requests.
    pub fn ready(&self) -> impl Future<Output = bool> + 'static {
        let receiver = {
            let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
            if state.count == 0 {
                None
            } else {
                let (sender, receiver) = oneshot::channel();
                state.waiters.push(sender);
                Some(receiver)
            }
        };
        async move {
            match receiver {
                None => false,
                Some(receiver) => {
                    let _ = receiver.await;
                    true
                }
            }
        }
    }
}

/// The scheme of an absolute url
fn scheme(uri: &str) -> Option<&str> {
    let (head, _) = uri.split_once(':')?;
    let mut chars = head.chars();
    let first = chars.next()?;
    (first.is_ascii_alphabetic()
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.')))
    .then_some(head)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::red_png_data_url;
    use async_trait::async_trait;
    use futures::executor::block_on;
    use futures::FutureExt;
    use rstest::rstest;

    struct FailingFetcher;

    #[async_trait]
    impl ImageFetcher for FailingFetcher {
        async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, AvengerImageError> {
            Err(AvengerImageError::InternalError(format!("no such image {url}")))
        }
    }

    #[rstest(
        uri,
        expected,
        case("https://vega.github.io/logo.png", Some("https://vega.github.io/logo.png")),
        case("//cdn.example.com/a.png", Some("https://cdn.example.com/a.png")),
        case("data/cars.png", Some("http://host/base/data/cars.png")),
        case("javascript:alert(1)", None),
        case("JavaScript:alert(1)", None),
        case("   ", None)
    )]
    fn test_sanitize(uri: &str, expected: Option<&str>) {
        let loader = ResourceLoader::new().with_base_url("http://host/base/");
        let result = loader.sanitize(uri).ok().map(|url| url.href);
        assert_eq!(result.as_deref(), expected);
    }

    #[test]
    fn test_sanitize_url_failure_is_none() {
        let loader = ResourceLoader::new();
        assert_eq!(block_on(loader.sanitize_url("javascript:void(0)")), None);
        assert_eq!(loader.pending(), 0);
    }

    #[test]
    fn test_link_target() {
        let loader = ResourceLoader::new().with_link_target("_blank");
        let url = loader.sanitize("https://example.com").unwrap();
        assert_eq!(url.target.as_deref(), Some("_blank"));
        assert_eq!(url.rel.as_deref(), Some("noopener"));
    }

    #[test]
    fn test_ready_when_idle() {
        let loader = ResourceLoader::new();
        assert!(!block_on(loader.ready()));
    }

    #[test]
    fn test_pending_counts_requests() {
        let loader = ResourceLoader::new();
        let request = loader.load_image(&red_png_data_url());
        assert_eq!(loader.pending(), 1);

        let ready = loader.ready();
        let handle = block_on(request);
        assert!(handle.is_loaded());
        assert_eq!((handle.width(), handle.height()), (2.0, 3.0));
        assert_eq!(loader.pending(), 0);
        assert!(block_on(ready));
    }

    #[test]
    fn test_dropped_request_releases_pending() {
        let loader = ResourceLoader::new();
        let request = loader.load_image("missing.png");
        assert_eq!(loader.pending(), 1);
        drop(request);
        assert_eq!(loader.pending(), 0);
        assert_eq!(loader.ready().now_or_never(), Some(false));
    }

    #[test]
    fn test_failed_load_is_unloaded_placeholder() {
        let loader = ResourceLoader::new().with_fetcher(Arc::new(FailingFetcher));
        let handle = block_on(loader.load_image("https://example.com/a.png"));
        assert!(!handle.is_loaded());
        assert_eq!(handle.width(), 0.0);
        assert_eq!(loader.pending(), 0);
    }

    #[test]
    fn test_loaded_images_are_cached() {
        let loader = ResourceLoader::new();
        let url = red_png_data_url();
        let first = block_on(loader.load_image(&url));
        let second = block_on(loader.load_image(&url));
        assert_eq!(loader.store().len(), 1);
        assert!(Arc::ptr_eq(
            first.image.as_ref().unwrap(),
            second.image.as_ref().unwrap()
        ));
    }
}
