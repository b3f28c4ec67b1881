//! Lifecycle layer: where a dependency stands in its product's support window
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  EndOfLife  │────▶│    Cache    │────▶│   Matcher   │
//! │  (fetch)    │     │  (storage)  │     │ (cycle pick)│
//! └─────────────┘     └─────────────┘     └─────────────┘
//!                                                ▲
//! ┌─────────────┐     ┌─────────────┐            │
//! │   Mapping   │     │  Resolver   │────────────┘
//! │(group→prod.)│     │ (${name})   │
//! └─────────────┘     └─────────────┘
//! ```
//!
//! # Modules
//!
//! - [`source`]: `LifecycleSource` capability trait
//! - [`endoflife`]: endoflife.date HTTP client
//! - [`cache`]: SQLite cycle cache with refresh logic
//! - [`cached`]: `LifecycleSource` decorator backed by the cache
//! - [`mapping`]: group to product name mapping
//! - [`resolver`]: `${name}` placeholder substitution
//! - [`matcher`]: cycle selection for a resolved version
//! - [`types`]: `LifecycleCycle` and the raw API records
//! - [`error`]: error types for cache and source operations

pub mod cache;
pub mod cached;
pub mod endoflife;
pub mod error;
pub mod mapping;
pub mod matcher;
pub mod resolver;
pub mod source;
pub mod types;

pub use cache::{Cache, CycleStorer};
pub use cached::CachedLifecycleSource;
pub use endoflife::EndOfLifeClient;
pub use error::{CacheError, LifecycleError};
pub use mapping::{MappingTable, ProductMapping, product_for};
pub use matcher::CycleMatcher;
pub use resolver::VersionResolver;
pub use source::LifecycleSource;
pub use types::LifecycleCycle;
