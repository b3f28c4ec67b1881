//! Release registry layer
//! - traits.rs: ReleaseRegistry trait definition
//! - maven.rs: Maven Central search client
//! - semver.rs: declared vs latest version comparison
//! - error.rs: ReleaseError

pub mod error;
pub mod maven;
pub mod semver;
pub mod traits;

use chrono::NaiveDate;
use tracing::warn;

use crate::parser::types::Dependency;

pub use error::ReleaseError;
pub use maven::MavenCentral;
pub use semver::{CompareResult, compare_versions};
pub use traits::{Release, ReleaseRegistry};

/// Release details attached to a report row
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReleaseInfo {
    pub latest_version: Option<String>,
    pub release_date: Option<NaiveDate>,
    pub latest_release_date: Option<NaiveDate>,
    pub comparison: Option<CompareResult>,
}

/// Look up release details for a dependency; failures leave fields empty
pub async fn release_info(registry: &dyn ReleaseRegistry, dependency: &Dependency) -> ReleaseInfo {
    let mut info = ReleaseInfo::default();

    match registry
        .latest_release(&dependency.group, &dependency.artifact)
        .await
    {
        Ok(Some(latest)) => {
            info.comparison = Some(compare_versions(&dependency.version, &latest.version));
            info.latest_release_date = latest.date;
            info.latest_version = Some(latest.version);
        }
        Ok(None) => {}
        Err(e) => warn!("Failed to fetch latest release of {}: {}", dependency, e),
    }

    match registry
        .release_date(&dependency.group, &dependency.artifact, &dependency.version)
        .await
    {
        Ok(date) => info.release_date = date,
        Err(e) => warn!("Failed to fetch release date of {}: {}", dependency, e),
    }

    info
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::traits::MockReleaseRegistry;

    #[tokio::test]
    async fn release_info_combines_latest_and_declared() {
        let mut registry = MockReleaseRegistry::new();
        registry.expect_latest_release().returning(|_, _| {
            Ok(Some(Release {
                version: "33.3.1-jre".to_string(),
                date: NaiveDate::from_ymd_opt(2024, 9, 16),
            }))
        });
        registry
            .expect_release_date()
            .withf(|_, _, version| version == "30.1-jre")
            .returning(|_, _, _| Ok(NaiveDate::from_ymd_opt(2021, 1, 26)));

        let dependency = Dependency::new("com.google.guava", "guava", "30.1-jre");
        let info = release_info(&registry, &dependency).await;

        assert_eq!(
            info,
            ReleaseInfo {
                latest_version: Some("33.3.1-jre".to_string()),
                release_date: NaiveDate::from_ymd_opt(2021, 1, 26),
                latest_release_date: NaiveDate::from_ymd_opt(2024, 9, 16),
                comparison: Some(CompareResult::Outdated),
            }
        );
    }

    #[tokio::test]
    async fn release_info_leaves_fields_empty_on_failure() {
        let mut registry = MockReleaseRegistry::new();
        registry
            .expect_latest_release()
            .returning(|_, _| Err(ReleaseError::InvalidResponse("boom".to_string())));
        registry
            .expect_release_date()
            .returning(|_, _, _| Err(ReleaseError::InvalidResponse("boom".to_string())));

        let dependency = Dependency::new("com.example", "lib", "1.0");
        let info = release_info(&registry, &dependency).await;

        assert_eq!(info, ReleaseInfo::default());
    }
}
