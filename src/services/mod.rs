//! Service layer for codeir

pub mod config;
pub mod missing_types;
pub mod parser;
pub mod project;
pub mod response;

pub use config::{ConfigService, DefaultConfigService};
pub use missing_types::{
    FileMissingTypes, MissingType, files_missing_types_in_project, functions_missing_types_in_file,
};
pub use parser::DeclarationParser;
pub use project::{DefaultProjectService, ProjectService};
pub use response::{Reconciler, Reconciliation, reconcile_response};
