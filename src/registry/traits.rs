//! Release registry trait for optional report enrichment

#[cfg(test)]
use mockall::automock;

use chrono::NaiveDate;

use crate::registry::error::ReleaseError;

/// A published version and the day it was released
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Release {
    pub version: String,
    pub date: Option<NaiveDate>,
}

/// Trait for looking up published releases of a library
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait ReleaseRegistry: Send + Sync {
    /// Latest published release of `group:artifact`
    ///
    /// # Returns
    /// * `Ok(None)` - The registry does not know the library
    async fn latest_release(
        &self,
        group: &str,
        artifact: &str,
    ) -> Result<Option<Release>, ReleaseError>;

    /// Release date of a specific version
    async fn release_date(
        &self,
        group: &str,
        artifact: &str,
        version: &str,
    ) -> Result<Option<NaiveDate>, ReleaseError>;
}
