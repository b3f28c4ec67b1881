//! Scan → parse → evaluate → enrich, one manifest at a time

use std::sync::Arc;

use anyhow::Context;
use chrono::NaiveDate;
use indexmap::IndexMap;
use tracing::{debug, info, warn};

use crate::check::engine::EolEngine;
use crate::check::verdict::EolStatus;
use crate::config::{AppConfig, db_path};
use crate::lifecycle::cache::Cache;
use crate::lifecycle::cached::CachedLifecycleSource;
use crate::lifecycle::endoflife::EndOfLifeClient;
use crate::lifecycle::mapping::MappingTable;
use crate::lifecycle::source::LifecycleSource;
use crate::parser::gradle::GradleParser;
use crate::parser::traits::ManifestParser;
use crate::parser::variables::VariableTable;
use crate::registry::maven::MavenCentral;
use crate::registry::traits::ReleaseRegistry;
use crate::registry::release_info;
use crate::report::ReportRow;
use crate::retry::RetryConfig;
use crate::scan::traits::ManifestSource;
use crate::scan::types::ManifestFile;

pub struct Pipeline {
    parser: Box<dyn ManifestParser>,
    engine: EolEngine,
    releases: Option<Arc<dyn ReleaseRegistry>>,
}

impl Pipeline {
    pub fn new(
        parser: Box<dyn ManifestParser>,
        engine: EolEngine,
        releases: Option<Arc<dyn ReleaseRegistry>>,
    ) -> Self {
        Self {
            parser,
            engine,
            releases,
        }
    }

    /// Wire the production collaborators described by `config`
    pub fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        let retry = RetryConfig::from(&config.retry);

        let client = EndOfLifeClient::new(&config.end_of_life.base_url).with_retry(retry);
        let source: Arc<dyn LifecycleSource> = if config.cache.enabled {
            let path = db_path();
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create data directory {:?}", parent))?;
            }
            let cache = Cache::new(&path, config.cache.refresh_interval)
                .context("Failed to open lifecycle cache")?;
            Arc::new(CachedLifecycleSource::new(Arc::new(cache), Arc::new(client)))
        } else {
            Arc::new(client)
        };

        let mapping = Arc::new(MappingTable::from_file(&config.mapping_file));
        let engine = EolEngine::new(source, mapping);

        let releases: Option<Arc<dyn ReleaseRegistry>> = config
            .maven
            .enabled
            .then(|| Arc::new(MavenCentral::new(&config.maven.base_url)) as Arc<dyn ReleaseRegistry>);

        Ok(Self::new(Box::new(GradleParser::new()), engine, releases))
    }

    /// Collect manifests from `source` and check all of them
    pub async fn run(
        &self,
        source: &dyn ManifestSource,
        today: NaiveDate,
    ) -> anyhow::Result<Vec<ReportRow>> {
        let repositories = source
            .collect()
            .await
            .context("Failed to collect manifests")?;

        if repositories.is_empty() {
            warn!("No Gradle files found in the repositories.");
        }

        Ok(self.check_repositories(&repositories, today).await)
    }

    pub async fn check_repositories(
        &self,
        repositories: &IndexMap<String, Vec<ManifestFile>>,
        today: NaiveDate,
    ) -> Vec<ReportRow> {
        let mut rows = Vec::new();
        for (repository, files) in repositories {
            info!("Checking {} ({} manifests)", repository, files.len());
            for file in files {
                rows.extend(self.check_file(file, today).await);
            }
        }

        let end_of_life = rows
            .iter()
            .filter(|row| row.status == EolStatus::EndOfLife)
            .count();
        info!(
            "Checked {} dependencies, {} past end of life",
            rows.len(),
            end_of_life
        );
        rows
    }

    /// Check one manifest with its own variable table
    pub async fn check_file(&self, file: &ManifestFile, today: NaiveDate) -> Vec<ReportRow> {
        if !self.parser.can_parse(&file.path) {
            debug!("Skipping {}/{}: not a Gradle manifest", file.repository, file.path);
            return Vec::new();
        }

        debug!(
            "Parsing {}/{} ({})",
            file.repository,
            file.path,
            file.dialect.as_str()
        );

        let mut variables = VariableTable::new();
        let parsed = self.parser.parse(&file.content, &mut variables);
        for diagnostic in &parsed.diagnostics {
            warn!("{}/{}: {}", file.repository, file.path, diagnostic);
        }

        let dependencies: Vec<_> = parsed
            .dependencies
            .into_iter()
            .map(|declared| declared.dependency)
            .collect();

        let verdicts = self.engine.evaluate(&dependencies, &variables, today).await;

        let mut rows = Vec::with_capacity(verdicts.len());
        for verdict in verdicts {
            let release = match &self.releases {
                Some(registry) if verdict.status != EolStatus::Unknown => {
                    Some(release_info(registry.as_ref(), &verdict.dependency).await)
                }
                _ => None,
            };
            rows.push(ReportRow::new(&file.repository, &file.path, verdict, release));
        }
        rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle::mapping::MockProductMapping;
    use crate::lifecycle::source::MockLifecycleSource;
    use crate::lifecycle::types::LifecycleCycle;
    use crate::parser::types::ManifestDialect;
    use crate::registry::traits::{MockReleaseRegistry, Release};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    fn manifest(repository: &str, path: &str, content: &str) -> ManifestFile {
        ManifestFile {
            repository: repository.to_string(),
            path: path.to_string(),
            dialect: ManifestDialect::Declarations,
            content: content.to_string(),
        }
    }

    fn engine() -> EolEngine {
        let mut source = MockLifecycleSource::new();
        source
            .expect_fetch_cycles()
            .returning(|_| Ok(vec![LifecycleCycle::new("30", None), LifecycleCycle::new("5", None)]));
        let mut mapping = MockProductMapping::new();
        mapping.expect_lookup().returning(|_| None);
        EolEngine::new(Arc::new(source), Arc::new(mapping))
    }

    #[tokio::test]
    async fn check_repositories_scopes_variables_per_file() {
        let pipeline = Pipeline::new(Box::new(GradleParser::new()), engine(), None);

        let mut repositories = IndexMap::new();
        repositories.insert(
            "shop".to_string(),
            vec![
                manifest("shop", "build.gradle", "ext.guavaVersion = '30.1'\n"),
                manifest(
                    "shop",
                    "gradle/libraries.gradle",
                    "guava: 'com.google.guava:guava:${guavaVersion}@jar'\n",
                ),
            ],
        );

        let rows = pipeline.check_repositories(&repositories, today()).await;

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].version, "${guavaVersion}");
        assert_eq!(rows[0].status, EolStatus::Unknown);
    }

    #[tokio::test]
    async fn check_repositories_preserves_discovery_order() {
        let pipeline = Pipeline::new(Box::new(GradleParser::new()), engine(), None);

        let mut repositories = IndexMap::new();
        repositories.insert(
            "zeta".to_string(),
            vec![manifest("zeta", "build.gradle", "implementation 'a:z:5.0'\n")],
        );
        repositories.insert(
            "alpha".to_string(),
            vec![manifest("alpha", "build.gradle", "implementation 'a:a:5.0'\n")],
        );

        let rows = pipeline.check_repositories(&repositories, today()).await;

        let repos: Vec<_> = rows.iter().map(|r| r.repository.as_str()).collect();
        assert_eq!(repos, vec!["zeta", "alpha"]);
        assert!(rows.iter().all(|r| r.status == EolStatus::Supported));
    }

    #[tokio::test]
    async fn check_file_enriches_resolved_dependencies() {
        let mut registry = MockReleaseRegistry::new();
        registry.expect_latest_release().times(1).returning(|_, _| {
            Ok(Some(Release {
                version: "6.1.14".to_string(),
                date: None,
            }))
        });
        registry
            .expect_release_date()
            .times(1)
            .returning(|_, _, _| Ok(None));

        let pipeline = Pipeline::new(
            Box::new(GradleParser::new()),
            engine(),
            Some(Arc::new(registry)),
        );
        let file = manifest(
            "shop",
            "build.gradle",
            "implementation 'org.springframework:spring-core:5.3.9'\nimplementation \"com.example:lib:${missing}\"\n",
        );

        let rows = pipeline.check_file(&file, today()).await;

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].latest_version.as_deref(), Some("6.1.14"));
        assert_eq!(rows[0].cycle.as_deref(), Some("5"));
        assert_eq!(rows[1].status, EolStatus::Unknown);
        assert_eq!(rows[1].latest_version, None);
    }
}
