//! Parser layer
//! - traits.rs: ManifestParser trait definition
//! - types.rs: Common types (Dependency, ManifestDialect, ParseDiagnostic)
//! - variables.rs: Per-file `ext.<name>` variable table
//! - gradle.rs: Gradle build/library manifest parser

pub mod gradle;
pub mod traits;
pub mod types;
pub mod variables;

pub use gradle::GradleParser;
pub use traits::ManifestParser;
pub use types::{
    DeclaredDependency, Dependency, ManifestDialect, ParseDiagnostic, ParsedManifest,
    detect_dialect,
};
pub use variables::VariableTable;
