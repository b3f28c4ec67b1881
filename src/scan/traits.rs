use indexmap::IndexMap;

use crate::scan::error::ScanError;
use crate::scan::types::ManifestFile;

/// Supplies manifest files grouped by repository, in discovery order
#[async_trait::async_trait]
pub trait ManifestSource: Send + Sync {
    async fn collect(&self) -> Result<IndexMap<String, Vec<ManifestFile>>, ScanError>;
}
