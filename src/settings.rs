// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Transformation of raw configuration entries into repository settings.
//!
//! Normalization trims and validates identifiers, applies defaults and
//! rejects duplicate repositories so that every [`RepositorySettings`] handed
//! to the generator is a consistent snapshot.

use std::{
    collections::HashSet,
    fmt, fs,
    path::{Path, PathBuf}
};

use regex::Regex;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::{
    application::ApplicationInfo,
    catalog::Catalog,
    config::{RepositoryEntry, SettingsConfig},
    error::{self, Error},
    generator::Generator,
    selection::OptionSet,
    template::WorkflowTemplate
};

const IDENTIFIER_PATTERN: &str = r"^[A-Za-z0-9_.-]+$";

/// `owner/name` reference to a GitHub repository.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct RepositoryRef {
    /// Account owning the repository.
    pub owner: String,
    /// Repository name.
    pub name:  String
}

impl RepositoryRef {
    /// Creates a reference from its parts.
    pub fn new(owner: &str, name: &str) -> Self {
        Self {
            owner: owner.to_owned(),
            name:  name.to_owned()
        }
    }

    /// Parses an `owner/name` string.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] unless the value has exactly two
    /// non-empty segments.
    ///
    /// # Examples
    ///
    /// ```
    /// use asgen::RepositoryRef;
    ///
    /// let reference = RepositoryRef::parse("elegantchaos/Logger").expect("valid reference");
    /// assert_eq!(reference.to_string(), "elegantchaos/Logger");
    /// assert!(RepositoryRef::parse("Logger").is_err());
    /// ```
    pub fn parse(value: &str) -> Result<Self, Error> {
        let mut segments = value.trim().split('/');
        match (segments.next(), segments.next(), segments.next()) {
            (Some(owner), Some(name), None) if !owner.is_empty() && !name.is_empty() => {
                Ok(Self::new(owner, name))
            }
            _ => Err(Error::validation(format!(
                "repository reference '{value}' must have the form owner/name"
            )))
        }
    }
}

impl fmt::Display for RepositoryRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Snapshot of one repository's generation settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepositorySettings {
    /// Repository the workflow belongs to.
    pub repository: RepositoryRef,
    /// Workflow name and file stem.
    pub workflow:   String,
    /// Enabled catalog identifiers.
    pub options:    OptionSet,
    /// Whether a README header is generated.
    pub header:     bool,
    /// Local checkout generated files are written into.
    pub path:       Option<PathBuf>
}

impl RepositorySettings {
    /// Creates settings with the default workflow name and no checkout path.
    pub fn new(repository: RepositoryRef, options: OptionSet, header: bool) -> Self {
        Self {
            repository,
            workflow: crate::config::DEFAULT_WORKFLOW.to_owned(),
            options,
            header,
            path: None
        }
    }
}

/// Normalized settings document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsDocument {
    /// Application metadata.
    pub application:  ApplicationInfo,
    /// Workflow template.
    pub template:     WorkflowTemplate,
    /// Option catalog.
    pub catalog:      Catalog,
    /// Repositories in document order.
    pub repositories: Vec<RepositorySettings>
}

impl SettingsDocument {
    /// Looks a repository up by reference.
    pub fn find(&self, reference: &RepositoryRef) -> Option<&RepositorySettings> {
        self.repositories
            .iter()
            .find(|settings| &settings.repository == reference)
    }

    /// Builds a generator borrowing this document's catalog, template and
    /// application metadata.
    pub fn generator(&self) -> Generator<'_> {
        Generator::new(&self.catalog, &self.template, &self.application)
    }
}

/// Loads settings from the YAML document at `path`.
///
/// # Errors
///
/// Returns an [`Error`] when the file cannot be read, the YAML cannot be
/// deserialized, or the document violates invariants during normalization.
pub fn load_settings(path: &Path) -> Result<SettingsDocument, Error> {
    info!("Reading settings from {}", path.display());
    let contents = fs::read_to_string(path).map_err(|source| error::io_error(path, source))?;
    parse_settings(&contents)
}

/// Parses settings from a YAML document string.
///
/// # Errors
///
/// Propagates [`Error::Parse`] when the YAML cannot be decoded and
/// [`Error::Validation`] when entries are missing, malformed or duplicated.
pub fn parse_settings(contents: &str) -> Result<SettingsDocument, Error> {
    let config: SettingsConfig = serde_yaml::from_str(contents)?;
    if config.repositories.is_empty() {
        return Err(Error::validation(
            "configuration must include at least one repository"
        ));
    }

    let catalog = config.catalog.unwrap_or_default();
    catalog.validate()?;
    let template = config.template.unwrap_or_default();
    template.validate()?;

    let repositories = normalize_repositories(&config.repositories, &catalog)?;
    debug!("Normalized {} repositories", repositories.len());

    Ok(SettingsDocument {
        application: config.application.unwrap_or_default(),
        template,
        catalog,
        repositories
    })
}

fn normalize_repositories(
    entries: &[RepositoryEntry],
    catalog: &Catalog
) -> Result<Vec<RepositorySettings>, Error> {
    let identifier = Regex::new(IDENTIFIER_PATTERN)
        .map_err(|e| Error::validation(format!("invalid identifier pattern: {e}")))?;

    let mut normalized = Vec::with_capacity(entries.len());
    let mut seen = HashSet::with_capacity(entries.len());

    for entry in entries {
        let settings = normalize_entry(entry, catalog, &identifier)?;
        if !seen.insert(settings.repository.clone()) {
            return Err(Error::validation(format!(
                "duplicate repository '{}'",
                settings.repository
            )));
        }
        normalized.push(settings);
    }

    Ok(normalized)
}

fn normalize_entry(
    entry: &RepositoryEntry,
    catalog: &Catalog,
    identifier: &Regex
) -> Result<RepositorySettings, Error> {
    let owner = normalize_identifier(&entry.owner, "owner", identifier)?;
    let name = normalize_identifier(&entry.name, "name", identifier)?;
    let repository = RepositoryRef {
        owner,
        name
    };
    let workflow = normalize_workflow(&entry.resolved_workflow())?;

    let mut options = OptionSet::new();
    for id in &entry.options {
        let id = id.trim();
        if id.is_empty() {
            continue;
        }
        if !catalog.contains(id) {
            warn!("Ignoring unknown option '{}' for {}", id, repository);
        }
        options.insert(id);
    }

    Ok(RepositorySettings {
        header: entry.resolved_header(),
        repository,
        workflow,
        options,
        path: entry.path.clone()
    })
}

/// Validates owner and repository names.
///
/// # Errors
///
/// Returns [`Error::Validation`] when the value is empty or contains
/// characters GitHub does not allow in account and repository names.
fn normalize_identifier(input: &str, field: &str, pattern: &Regex) -> Result<String, Error> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(Error::validation(format!("{field} cannot be empty")));
    }
    if !pattern.is_match(trimmed) {
        return Err(Error::validation(format!(
            "{field} '{trimmed}' may only contain letters, digits, '-', '_' and '.'"
        )));
    }
    Ok(trimmed.to_owned())
}

/// Validates the workflow name, which doubles as a file stem.
fn normalize_workflow(input: &str) -> Result<String, Error> {
    if input.is_empty() {
        return Err(Error::validation("workflow cannot be empty"));
    }
    if input.chars().any(|c| c.is_control() || c == '/' || c == '\\') {
        return Err(Error::validation(format!(
            "workflow '{}' cannot contain path separators or control characters",
            input.escape_debug()
        )));
    }
    Ok(input.to_owned())
}
