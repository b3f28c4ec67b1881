//! Manifest discovery in a local checkout

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use tracing::{debug, info};
use walkdir::{DirEntry, WalkDir};

use crate::parser::types::detect_dialect;
use crate::scan::error::ScanError;
use crate::scan::traits::ManifestSource;
use crate::scan::types::{ManifestFile, SKIPPED_DIRS};

/// Walks a directory tree; the whole tree counts as one repository
pub struct LocalScanner {
    root: PathBuf,
}

impl LocalScanner {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn repository_name(&self) -> String {
        self.root
            .canonicalize()
            .ok()
            .as_deref()
            .and_then(Path::file_name)
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.root.display().to_string())
    }

    fn relative_path(&self, path: &Path) -> String {
        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/")
    }
}

fn is_skipped_dir(entry: &DirEntry) -> bool {
    if entry.depth() == 0 || !entry.file_type().is_dir() {
        return false;
    }

    let name = entry.file_name().to_string_lossy();
    SKIPPED_DIRS.contains(&&*name)
}

#[async_trait::async_trait]
impl ManifestSource for LocalScanner {
    async fn collect(&self) -> Result<IndexMap<String, Vec<ManifestFile>>, ScanError> {
        let repository = self.repository_name();
        info!("Scanning {:?} for Gradle manifests", self.root);

        let mut files = Vec::new();
        for entry in WalkDir::new(&self.root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| !is_skipped_dir(e))
        {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }

            let path = self.relative_path(entry.path());
            let Some(dialect) = detect_dialect(&path) else {
                continue;
            };

            debug!("Found manifest: {}", path);
            let content = tokio::fs::read_to_string(entry.path()).await?;
            files.push(ManifestFile {
                repository: repository.clone(),
                path,
                dialect,
                content,
            });
        }

        let mut repositories = IndexMap::new();
        if files.is_empty() {
            info!("No Gradle manifests found in {:?}", self.root);
        } else {
            repositories.insert(repository, files);
        }
        Ok(repositories)
    }
}
