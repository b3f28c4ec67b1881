//! Lifecycle source trait for fetching release cycles

#[cfg(test)]
use mockall::automock;

use crate::lifecycle::error::LifecycleError;
use crate::lifecycle::types::LifecycleCycle;

/// Trait for fetching the release cycles of a product
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait LifecycleSource: Send + Sync {
    /// Fetches all cycles for a product, in the order the source publishes them
    ///
    /// # Arguments
    /// * `product` - Product name as known to the source (e.g., "spring-framework")
    async fn fetch_cycles(&self, product: &str) -> Result<Vec<LifecycleCycle>, LifecycleError>;
}
