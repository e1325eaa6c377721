//! Configuration document types describing repositories to generate for.
//!
//! The types in this module mirror the YAML documents consumed by the CLI.
//! Optional values stay flexible so users only spell out overrides; helper
//! methods derive the defaults that the settings normalizer relies on.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::{
    application::ApplicationInfo,
    catalog::{Catalog, toggles},
    template::WorkflowTemplate
};

/// Workflow name used when an entry does not provide one.
pub const DEFAULT_WORKFLOW: &str = "Tests";

/// Root configuration document.
///
/// # Examples
///
/// ```
/// use asgen::SettingsConfig;
///
/// let yaml = r#"
/// repositories:
///   - owner: elegantchaos
///     repo: Logger
///     options: [swift-53, linux, build]
/// "#;
/// let config: SettingsConfig = serde_yaml::from_str(yaml).expect("valid configuration");
/// assert_eq!(config.repositories.len(), 1);
/// assert!(config.catalog.is_none());
/// ```
#[derive(Debug, Deserialize, Serialize, Default)]
pub struct SettingsConfig {
    /// Metadata stamped into generated files.
    #[serde(default)]
    pub application:  Option<ApplicationInfo>,
    /// Template overrides.
    #[serde(default)]
    pub template:     Option<WorkflowTemplate>,
    /// Replacement for the standard catalog.
    #[serde(default)]
    pub catalog:      Option<Catalog>,
    /// Repositories to generate workflows for.
    #[serde(default)]
    pub repositories: Vec<RepositoryEntry>
}

/// Raw configuration entry describing one repository before normalization.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct RepositoryEntry {
    /// GitHub account owning the repository.
    #[serde(alias = "user")]
    pub owner:    String,

    /// Repository name, also used as the Xcode scheme.
    #[serde(alias = "repo", alias = "repository")]
    pub name:     String,

    /// Workflow name; the file is written as `<workflow>.yml`.
    #[serde(
        default,
        alias = "workflow_name",
        alias = "workflow-name",
        alias = "workflowName"
    )]
    pub workflow: Option<String>,

    /// Enabled catalog identifiers across every table.
    #[serde(default)]
    pub options:  Vec<String>,

    /// Explicit README header switch.
    #[serde(default)]
    pub header:   Option<bool>,

    /// Local checkout the generated files are written into.
    #[serde(default, alias = "checkout")]
    pub path:     Option<PathBuf>
}

impl RepositoryEntry {
    /// Workflow name with surrounding whitespace trimmed, falling back to
    /// [`DEFAULT_WORKFLOW`].
    pub fn resolved_workflow(&self) -> String {
        self.workflow
            .as_deref()
            .map(str::trim)
            .unwrap_or(DEFAULT_WORKFLOW)
            .to_owned()
    }

    /// Whether the README header is wanted.
    ///
    /// An explicit `header` value wins; otherwise the `header` toggle in
    /// `options` decides.
    pub fn resolved_header(&self) -> bool {
        self.header
            .unwrap_or_else(|| self.options.iter().any(|id| id == toggles::HEADER))
    }
}

#[cfg(test)]
mod tests {
    use super::{RepositoryEntry, SettingsConfig};

    fn entry() -> RepositoryEntry {
        RepositoryEntry {
            owner:    "elegantchaos".to_owned(),
            name:     "Logger".to_owned(),
            workflow: None,
            options:  Vec::new(),
            header:   None,
            path:     None
        }
    }

    #[test]
    fn resolved_workflow_defaults_to_tests() {
        assert_eq!(entry().resolved_workflow(), "Tests");
    }

    #[test]
    fn resolved_workflow_trims_override() {
        let entry = RepositoryEntry {
            workflow: Some("  Build  ".to_owned()),
            ..entry()
        };
        assert_eq!(entry.resolved_workflow(), "Build");
    }

    #[test]
    fn resolved_header_follows_header_toggle() {
        let entry = RepositoryEntry {
            options: vec!["linux".to_owned(), "header".to_owned()],
            ..entry()
        };
        assert!(entry.resolved_header());
    }

    #[test]
    fn explicit_header_overrides_toggle() {
        let entry = RepositoryEntry {
            options: vec!["header".to_owned()],
            header: Some(false),
            ..entry()
        };
        assert!(!entry.resolved_header());
    }

    #[test]
    fn entry_accepts_aliases() {
        let yaml = r#"
            user: octocat
            repository: hello
            workflowName: CI
            checkout: ../hello
        "#;

        let entry: RepositoryEntry =
            serde_yaml::from_str(yaml).expect("expected entry to deserialize");
        assert_eq!(entry.owner, "octocat");
        assert_eq!(entry.name, "hello");
        assert_eq!(entry.workflow.as_deref(), Some("CI"));
        assert_eq!(entry.path.as_deref(), Some(std::path::Path::new("../hello")));
    }

    #[test]
    fn document_sections_are_optional() {
        let config: SettingsConfig =
            serde_yaml::from_str("repositories: []").expect("expected config to deserialize");
        assert!(config.application.is_none());
        assert!(config.template.is_none());
        assert!(config.repositories.is_empty());
    }

    #[test]
    fn document_accepts_template_and_application_sections() {
        let yaml = r#"
application:
  version: "2.0"
  build: "7"
template:
  linux_runner: ubuntu-20.04
repositories:
  - owner: octocat
    name: hello
"#;

        let config: SettingsConfig =
            serde_yaml::from_str(yaml).expect("expected config to deserialize");
        let application = config.application.expect("application section");
        assert_eq!(application.full_version_string(), "2.0 (7)");
        let template = config.template.expect("template section");
        assert_eq!(template.linux_runner, "ubuntu-20.04");
    }
}
