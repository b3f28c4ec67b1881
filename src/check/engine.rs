//! Per-dependency end-of-life evaluation

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::check::verdict::{EolStatus, Verdict};
use crate::lifecycle::mapping::{ProductMapping, product_for};
use crate::lifecycle::matcher::CycleMatcher;
use crate::lifecycle::resolver::VersionResolver;
use crate::lifecycle::source::LifecycleSource;
use crate::parser::types::Dependency;
use crate::parser::variables::VariableTable;

/// Resolves, looks up and matches dependencies one at a time
///
/// A failure for one dependency only affects its own verdict.
pub struct EolEngine {
    source: Arc<dyn LifecycleSource>,
    mapping: Arc<dyn ProductMapping>,
    resolver: VersionResolver,
    matcher: CycleMatcher,
}

impl EolEngine {
    pub fn new(source: Arc<dyn LifecycleSource>, mapping: Arc<dyn ProductMapping>) -> Self {
        Self {
            source,
            mapping,
            resolver: VersionResolver::new(),
            matcher: CycleMatcher,
        }
    }

    /// Evaluate dependencies in order, returning one verdict each
    pub async fn evaluate(
        &self,
        dependencies: &[Dependency],
        variables: &VariableTable,
        today: NaiveDate,
    ) -> Vec<Verdict> {
        let mut verdicts = Vec::with_capacity(dependencies.len());
        for dependency in dependencies {
            verdicts.push(self.evaluate_one(dependency, variables, today).await);
        }
        verdicts
    }

    pub async fn evaluate_one(
        &self,
        dependency: &Dependency,
        variables: &VariableTable,
        today: NaiveDate,
    ) -> Verdict {
        let version = self.resolver.resolve(&dependency.version, variables);
        let resolved = dependency.with_version(version);

        if self.resolver.has_placeholder(&resolved.version) {
            warn!(
                "Unresolved variable(s) {:?} in {}; skipping lifecycle lookup",
                self.resolver.unresolved(&resolved.version),
                resolved
            );
            return Verdict::unknown(resolved);
        }

        let product = product_for(self.mapping.as_ref(), &resolved.group);

        let cycles = match self.source.fetch_cycles(&product).await {
            Ok(cycles) => cycles,
            Err(e) => {
                warn!("Failed to fetch lifecycle data for {}: {}", product, e);
                return Verdict::api_error(resolved, product);
            }
        };

        let Some(cycle) = self.matcher.find_cycle(&resolved.version, &cycles) else {
            warn!(
                "No matching cycle for {} (key {}) in {} ({} cycles)",
                resolved,
                self.matcher.comparison_key(&resolved.version, &cycles),
                product,
                cycles.len()
            );
            return Verdict::no_matching_cycle(resolved, product);
        };

        let status = EolStatus::from_eol_date(cycle.eol_date, today);
        debug!(
            "{} matched cycle {} of {}: {}",
            resolved, cycle.label, product, status
        );

        Verdict {
            dependency: resolved,
            product: Some(product),
            cycle: Some(cycle.label.clone()),
            eol_date: cycle.eol_date,
            status,
        }
    }
}
