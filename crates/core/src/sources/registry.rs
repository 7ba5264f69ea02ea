use std::sync::Arc;

use super::traits::AssetSource;

/// Ordered list of asset sources; earlier entries take precedence.
#[derive(Clone, Default)]
pub struct AssetSourceRegistry {
    sources: Vec<Arc<dyn AssetSource>>,
}

impl AssetSourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a source at the lowest priority.
    pub fn register(&mut self, source: Arc<dyn AssetSource>) {
        self.sources.push(source);
    }

    /// Sources that can serve requests right now, in priority order.
    pub fn available(&self) -> Vec<Arc<dyn AssetSource>> {
        self.sources
            .iter()
            .filter(|s| s.is_available())
            .cloned()
            .collect()
    }

    /// First available source that accepts writes.
    pub fn writable(&self) -> Option<Arc<dyn AssetSource>> {
        self.sources
            .iter()
            .find(|s| s.is_available() && s.supports_write())
            .cloned()
    }

    pub fn names(&self) -> Vec<String> {
        self.sources.iter().map(|s| s.name().to_string()).collect()
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}
