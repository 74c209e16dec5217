use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use crate::ImageHandle;

/// Loaded images keyed by the url they were requested with
#[derive(Debug, Default)]
pub struct ImageStore {
    images: Mutex<HashMap<String, ImageHandle>>,
}

impl ImageStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, url: &str) -> Option<ImageHandle> {
        self.images
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(url)
            .cloned()
    }

    pub fn insert(&self, url: &str, handle: ImageHandle) {
        self.images
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(url.to_string(), handle);
    }

    pub fn len(&self) -> usize {
        self.images.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.images
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}
