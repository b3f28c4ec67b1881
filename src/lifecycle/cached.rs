//! Lifecycle source backed by the SQLite cycle cache

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, error, info};

use crate::lifecycle::cache::CycleStorer;
use crate::lifecycle::error::LifecycleError;
use crate::lifecycle::source::LifecycleSource;
use crate::lifecycle::types::LifecycleCycle;

/// Serves cycles from the cache when fresh and refreshes them from `inner` otherwise
///
/// Cache failures are logged and never hide the inner source.
pub struct CachedLifecycleSource<S: CycleStorer> {
    storer: Arc<S>,
    inner: Arc<dyn LifecycleSource>,
}

impl<S: CycleStorer> CachedLifecycleSource<S> {
    pub fn new(storer: Arc<S>, inner: Arc<dyn LifecycleSource>) -> Self {
        Self { storer, inner }
    }
}

#[async_trait]
impl<S: CycleStorer> LifecycleSource for CachedLifecycleSource<S> {
    async fn fetch_cycles(&self, product: &str) -> Result<Vec<LifecycleCycle>, LifecycleError> {
        let known_missing = self
            .storer
            .is_known_not_found(product)
            .inspect_err(|e| error!("Failed to read cache for {}: {}", product, e))
            .unwrap_or(false);
        if known_missing {
            debug!("Skipping {}: recently reported as not found", product);
            return Err(LifecycleError::NotFound(product.to_string()));
        }

        let cached = self
            .storer
            .get_fresh_cycles(product)
            .inspect_err(|e| error!("Failed to read cache for {}: {}", product, e))
            .unwrap_or(None);
        if let Some(cycles) = cached {
            debug!("Cache hit for {} ({} cycles)", product, cycles.len());
            return Ok(cycles);
        }

        match self.inner.fetch_cycles(product).await {
            Ok(cycles) => {
                let _ = self
                    .storer
                    .replace_cycles(product, &cycles)
                    .inspect_err(|e| error!("Failed to cache cycles for {}: {}", product, e));
                Ok(cycles)
            }
            Err(LifecycleError::NotFound(name)) => {
                info!(
                    "Product not found: {}. Marking as not found to skip future fetches.",
                    name
                );
                let _ = self
                    .storer
                    .mark_not_found(product)
                    .inspect_err(|e| error!("Failed to mark {} as not found: {}", product, e));
                Err(LifecycleError::NotFound(name))
            }
            Err(e) => Err(e),
        }
    }
}
