// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Folding of enabled platforms into workflow jobs.

use crate::catalog::{CatalogItem, NativeBuild, Platform};

/// Identifier of the job that aggregates every native platform.
pub const UMBRELLA_JOB_ID: &str = "xcode";
/// Display name of the umbrella job.
pub const UMBRELLA_JOB_NAME: &str = "Xcode";

/// Kind of runner a job is scheduled on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Runner {
    /// macOS runner with Xcode installed.
    Mac,
    /// Linux runner executing inside a compiler container image.
    LinuxContainer
}

/// One job of the generated workflow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Job<'a> {
    /// A platform with its own container job.
    Standalone(&'a Platform),
    /// The macOS job building every native platform.
    Umbrella {
        /// Native platforms in catalog order.
        platforms: Vec<&'a Platform>
    }
}

impl Job<'_> {
    /// Job key emitted under `jobs:`.
    pub fn id(&self) -> &str {
        match self {
            Self::Standalone(platform) => platform.id(),
            Self::Umbrella {
                ..
            } => UMBRELLA_JOB_ID
        }
    }

    /// Display name of the job.
    pub fn name(&self) -> &str {
        match self {
            Self::Standalone(platform) => platform.name(),
            Self::Umbrella {
                ..
            } => UMBRELLA_JOB_NAME
        }
    }

    /// Runner the job needs.
    pub fn runner(&self) -> Runner {
        match self {
            Self::Standalone(_) => Runner::LinuxContainer,
            Self::Umbrella {
                ..
            } => Runner::Mac
        }
    }

    /// Platforms built by this job.
    pub fn platforms(&self) -> &[&Platform] {
        match self {
            Self::Standalone(platform) => std::slice::from_ref(platform),
            Self::Umbrella {
                platforms
            } => platforms
        }
    }

    /// Returns `true` when any platform of the job is built with `xcodebuild`.
    pub fn uses_xcodebuild(&self) -> bool {
        self.platforms()
            .iter()
            .any(|platform| matches!(platform.native, Some(NativeBuild::Xcode { .. })))
    }
}

/// Folds the enabled platforms into jobs.
///
/// Platforms without a native build get one job each, in the order given.
/// Every native platform is gathered into a single umbrella job appended
/// after all standalone jobs.
///
/// # Examples
///
/// ```
/// use asgen::{Catalog, fold_jobs};
///
/// let catalog = Catalog::standard();
/// let platforms: Vec<_> = catalog.platforms.iter().collect();
/// let jobs = fold_jobs(&platforms);
/// let ids: Vec<&str> = jobs.iter().map(|job| job.id()).collect();
/// assert_eq!(ids, ["linux", "xcode"]);
/// ```
pub fn fold_jobs<'a>(platforms: &[&'a Platform]) -> Vec<Job<'a>> {
    let (native, standalone): (Vec<&'a Platform>, Vec<&'a Platform>) = platforms
        .iter()
        .copied()
        .partition(|platform| platform.is_native());

    let mut jobs: Vec<Job<'a>> = standalone.into_iter().map(Job::Standalone).collect();
    if !native.is_empty() {
        jobs.push(Job::Umbrella {
            platforms: native
        });
    }
    jobs
}
