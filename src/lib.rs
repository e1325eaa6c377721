//! Generation of GitHub Actions workflows and README status headers for Swift
//! packages.
//!
//! A repository's settings are a set of enabled identifiers drawn from an
//! option [`Catalog`] (compilers, platforms, build configurations and general
//! toggles). The [`Generator`] resolves them against the catalog, folds
//! platforms into jobs and renders a deterministic workflow document together
//! with a Markdown badge header. Helpers in [`export_output`] and
//! [`update_readme`] persist the results into a local checkout.

mod application;
mod catalog;
mod config;
mod error;
mod export;
mod generator;
mod header;
mod job;
mod policy;
mod readme;
mod selection;
mod settings;
mod template;
mod workflow;

pub use application::ApplicationInfo;
pub use catalog::{
    Catalog, CatalogItem, CatalogOption, Compiler, NativeBuild, NativeToolchain, Platform, toggles
};
pub use config::{DEFAULT_WORKFLOW, RepositoryEntry, SettingsConfig};
pub use error::{Error, export_error, io_error, output_error};
pub use export::{ExportReport, export_output, workflow_path, write_workflow};
pub use generator::{GeneratedOutput, Generator};
pub use header::{GithubLinks, HEADER_DELIMITER, LinkBuilder, render_header};
pub use job::{Job, Runner, UMBRELLA_JOB_ID, UMBRELLA_JOB_NAME, fold_jobs};
pub use policy::CompilerPolicy;
pub use readme::{README_FILE, apply_header, update_readme};
pub use selection::{
    GeneralToggles, OptionSet, from_toggle_vector, resolve_enabled, to_toggle_vector
};
pub use settings::{
    RepositoryRef, RepositorySettings, SettingsDocument, load_settings, parse_settings
};
pub use template::WorkflowTemplate;
pub use workflow::{WorkflowInput, render_workflow};
