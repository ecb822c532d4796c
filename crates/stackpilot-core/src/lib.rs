//! stackpilot core model
//!
//! Holds the deployment option catalog, the validated deployment
//! configuration, the Terraform manifest renderer and the validation
//! report written at the end of a successful run.

pub mod catalog;
pub mod config;
pub mod error;
pub mod report;
pub mod template;

// Re-exports
pub use catalog::{ImageOption, OptionCatalog};
pub use config::DeploymentConfig;
pub use error::{CoreError, Result};
pub use report::ValidationReport;
pub use template::render_manifest;
