// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Registries of selectable workflow options.
//!
//! A [`Catalog`] groups four ordered tables: compilers, platforms, build
//! configurations and general toggles. Identifiers are globally unique across
//! all tables, which is what allows a repository to persist its choices as a
//! single flat set of ids. Catalog order is significant: it defines the order
//! of emitted steps and the "oldest"/"newest" compiler.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::{error::Error, job::UMBRELLA_JOB_ID};

/// Identifiers of the general toggles understood by the generator.
pub mod toggles {
    /// Emit build steps.
    pub const BUILD: &str = "build";
    /// Emit test steps.
    pub const TEST: &str = "test";
    /// Restrict compilers to the oldest and newest enabled entries.
    pub const FIRST_LAST: &str = "firstlast";
    /// Post a chat notification at the end of every job.
    pub const NOTIFY: &str = "notify";
    /// Upload the logs directory as an artifact.
    pub const UPLOAD: &str = "upload";
    /// Add a status header to README.md.
    pub const HEADER: &str = "header";
}

/// Common view over catalog entries used by the selection helpers.
pub trait CatalogItem {
    /// Stable identifier persisted in repository settings.
    fn id(&self) -> &str;

    /// Human readable label.
    fn name(&self) -> &str;
}

/// Plain selectable option with an identifier and a label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogOption {
    /// Stable identifier.
    pub id:   String,
    /// Display name.
    pub name: String
}

impl CatalogOption {
    /// Creates an option from borrowed strings.
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            id:   id.to_owned(),
            name: name.to_owned()
        }
    }
}

impl CatalogItem for CatalogOption {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Toolchain used when a compiler runs on the macOS runner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NativeToolchain {
    /// A released Xcode installed on the runner image.
    Xcode {
        /// Xcode version as it appears in the application bundle name.
        version: String
    },
    /// A swift.org snapshot installed on top of an Xcode.
    Toolchain {
        /// Xcode version the snapshot is installed on top of.
        version: String,
        /// swift.org branch the snapshot is downloaded from.
        branch:  String
    }
}

impl NativeToolchain {
    /// Xcode version selected on the runner for this toolchain.
    pub fn xcode_version(&self) -> &str {
        match self {
            Self::Xcode {
                version
            }
            | Self::Toolchain {
                version, ..
            } => version
        }
    }
}

/// Compiler version offered in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Compiler {
    /// Stable identifier.
    pub id:          String,
    /// Display name.
    pub name:        String,
    /// Short label used in badges.
    pub short:       String,
    /// Container image used by Linux jobs.
    pub linux_image: String,
    /// Toolchain used by the macOS umbrella job.
    pub native:      NativeToolchain
}

impl Compiler {
    fn xcode(id: &str, name: &str, short: &str, linux_image: &str, xcode: &str) -> Self {
        Self {
            id:          id.to_owned(),
            name:        name.to_owned(),
            short:       short.to_owned(),
            linux_image: linux_image.to_owned(),
            native:      NativeToolchain::Xcode {
                version: xcode.to_owned()
            }
        }
    }

    fn snapshot(
        id: &str,
        name: &str,
        short: &str,
        linux_image: &str,
        xcode: &str,
        branch: &str
    ) -> Self {
        Self {
            id:          id.to_owned(),
            name:        name.to_owned(),
            short:       short.to_owned(),
            linux_image: linux_image.to_owned(),
            native:      NativeToolchain::Toolchain {
                version: xcode.to_owned(),
                branch:  branch.to_owned()
            }
        }
    }
}

impl CatalogItem for Compiler {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// How a platform is built inside the macOS umbrella job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NativeBuild {
    /// Built and tested with `swift build` / `swift test` on the host.
    SwiftPm,
    /// Built and tested with `xcodebuild`, optionally on a named destination.
    Xcode {
        /// Value passed to `-destination`, omitted when absent.
        #[serde(default)]
        destination: Option<String>
    }
}

/// Target platform offered in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Platform {
    /// Stable identifier.
    pub id:     String,
    /// Display name.
    pub name:   String,
    /// Native build flavour; `None` means the platform gets its own
    /// container job.
    #[serde(default)]
    pub native: Option<NativeBuild>
}

impl Platform {
    fn standalone(id: &str, name: &str) -> Self {
        Self {
            id:     id.to_owned(),
            name:   name.to_owned(),
            native: None
        }
    }

    fn swift_pm(id: &str, name: &str) -> Self {
        Self {
            id:     id.to_owned(),
            name:   name.to_owned(),
            native: Some(NativeBuild::SwiftPm)
        }
    }

    fn xcode(id: &str, name: &str, destination: Option<&str>) -> Self {
        Self {
            id:     id.to_owned(),
            name:   name.to_owned(),
            native: Some(NativeBuild::Xcode {
                destination: destination.map(str::to_owned)
            })
        }
    }

    /// Returns `true` when the platform is folded into the umbrella job.
    pub fn is_native(&self) -> bool {
        self.native.is_some()
    }
}

impl CatalogItem for Platform {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// The four option tables consulted during generation.
///
/// # Examples
///
/// ```
/// use asgen::Catalog;
///
/// let catalog = Catalog::standard();
/// assert_eq!(catalog.compilers.first().map(|c| c.id.as_str()), Some("swift-50"));
/// assert!(catalog.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    /// Compilers, oldest first.
    pub compilers:      Vec<Compiler>,
    /// Target platforms.
    pub platforms:      Vec<Platform>,
    /// Build configurations, debug before release.
    pub configurations: Vec<CatalogOption>,
    /// General behaviour toggles.
    pub general:        Vec<CatalogOption>
}

impl Catalog {
    /// Builds the catalog shipped with the application.
    pub fn standard() -> Self {
        Self {
            compilers:      vec![
                Compiler::xcode("swift-50", "Swift 5.0", "5.0", "swift:5.0", "11.2.1"),
                Compiler::xcode("swift-51", "Swift 5.1", "5.1", "swift:5.1", "11.3.1"),
                Compiler::xcode("swift-52", "Swift 5.2", "5.2", "swift:5.2.3-bionic", "11.4"),
                Compiler::xcode("swift-53", "Swift 5.3", "5.3", "swift:5.3.3-bionic", "12.3"),
                Compiler::snapshot(
                    "swift-54",
                    "Swift 5.4 Nightly",
                    "5.4",
                    "swiftlang/swift:nightly-5.4-bionic",
                    "12_beta",
                    "swift-5.4-branch"
                ),
                Compiler::snapshot(
                    "swift-nightly",
                    "Swift Development Nightly",
                    "dev",
                    "swiftlang/swift:nightly",
                    "12_beta",
                    "development"
                ),
            ],
            platforms:      vec![
                Platform::swift_pm("macOS", "macOS"),
                Platform::xcode("macOS-xcode", "macOS", None),
                Platform::xcode("iOS", "iOS", Some("name=iPhone 11")),
                Platform::xcode("tvOS", "tvOS", Some("name=Apple TV")),
                Platform::xcode("watchOS", "watchOS", Some("name=Apple Watch Series 5 - 44mm")),
                Platform::standalone("linux", "Linux"),
            ],
            configurations: vec![
                CatalogOption::new("debug", "Debug"),
                CatalogOption::new("release", "Release"),
            ],
            general:        vec![
                CatalogOption::new(toggles::BUILD, "Perform Build"),
                CatalogOption::new(toggles::TEST, "Run Tests"),
                CatalogOption::new(toggles::FIRST_LAST, "Use Oldest and Newest Swift Only"),
                CatalogOption::new(toggles::NOTIFY, "Post Notifications"),
                CatalogOption::new(toggles::UPLOAD, "Upload Logs"),
                CatalogOption::new(toggles::HEADER, "Add a header to README.md"),
            ]
        }
    }

    /// Iterates over every identifier in catalog order, group by group.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.compilers
            .iter()
            .map(CatalogItem::id)
            .chain(self.platforms.iter().map(CatalogItem::id))
            .chain(self.configurations.iter().map(CatalogItem::id))
            .chain(self.general.iter().map(CatalogItem::id))
    }

    /// Returns `true` when any table defines `id`.
    pub fn contains(&self, id: &str) -> bool {
        self.ids().any(|candidate| candidate == id)
    }

    /// Checks the invariants the generator relies on.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] when an identifier is blank, contains
    /// whitespace or appears more than once across the tables, when a
    /// standalone platform would share the umbrella job's id, or when a
    /// compiler lacks a container image.
    pub fn validate(&self) -> Result<(), Error> {
        let mut seen = HashSet::new();
        for id in self.ids() {
            if id.is_empty() {
                return Err(Error::validation("catalog identifiers cannot be empty"));
            }
            if id.chars().any(char::is_whitespace) {
                return Err(Error::validation(format!(
                    "catalog identifier '{id}' cannot contain whitespace"
                )));
            }
            if !seen.insert(id) {
                return Err(Error::validation(format!("duplicate catalog identifier '{id}'")));
            }
        }

        if let Some(platform) = self
            .platforms
            .iter()
            .find(|platform| !platform.is_native() && platform.id == UMBRELLA_JOB_ID)
        {
            return Err(Error::validation(format!(
                "standalone platform '{}' clashes with the '{UMBRELLA_JOB_ID}' job",
                platform.id
            )));
        }

        if let Some(compiler) = self
            .compilers
            .iter()
            .find(|compiler| compiler.linux_image.trim().is_empty())
        {
            return Err(Error::validation(format!(
                "compiler '{}' has no container image",
                compiler.id
            )));
        }

        Ok(())
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::standard()
    }
}
