//! Manifest discovery layer
//! - traits.rs: ManifestSource trait definition
//! - types.rs: ManifestFile and the directories never scanned
//! - local.rs: local directory walker
//! - github.rs: GitHub repository/organization scanner
//! - error.rs: ScanError

pub mod error;
pub mod github;
pub mod local;
pub mod traits;
pub mod types;

pub use error::ScanError;
pub use github::{GitHubScanner, GitHubTarget};
pub use local::LocalScanner;
pub use traits::ManifestSource;
pub use types::ManifestFile;
