//! Shared test doubles for integration tests

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::NaiveDate;
use tempfile::TempDir;

use eol_checker::lifecycle::cache::Cache;
use eol_checker::lifecycle::error::LifecycleError;
use eol_checker::lifecycle::source::LifecycleSource;
use eol_checker::lifecycle::types::LifecycleCycle;

/// Lifecycle source serving canned cycle lists
#[derive(Default)]
pub struct StubSource {
    cycles: HashMap<String, Vec<LifecycleCycle>>,
    calls: AtomicUsize,
}

impl StubSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cycles(mut self, product: &str, cycles: &[(&str, Option<NaiveDate>)]) -> Self {
        self.cycles.insert(
            product.to_string(),
            cycles
                .iter()
                .map(|(label, eol)| LifecycleCycle::new(*label, *eol))
                .collect(),
        );
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LifecycleSource for StubSource {
    async fn fetch_cycles(&self, product: &str) -> Result<Vec<LifecycleCycle>, LifecycleError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.cycles.get(product) {
            Some(cycles) => Ok(cycles.clone()),
            None => Err(LifecycleError::NotFound(product.to_string())),
        }
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Create an empty cache in a temporary directory
pub fn create_test_cache() -> (TempDir, Arc<Cache>) {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("test.db");
    let cache = Cache::new(&db_path, 86400000).unwrap();
    (temp_dir, Arc::new(cache))
}
