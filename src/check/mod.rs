//! End-of-life checking
//! - verdict.rs: EolStatus and Verdict
//! - engine.rs: per-dependency resolution, lookup and cycle matching
//! - pipeline.rs: manifests in, report rows out

pub mod engine;
pub mod pipeline;
pub mod verdict;

pub use engine::EolEngine;
pub use pipeline::Pipeline;
pub use verdict::{EolStatus, Verdict};
