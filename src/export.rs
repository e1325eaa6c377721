// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Persistence of generated workflows into a repository checkout.

use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf}
};

use serde::Serialize;
use tracing::info;

use crate::{
    error::{self, Error},
    generator::GeneratedOutput,
    readme::{README_FILE, update_readme},
    settings::RepositoryRef
};

const WORKFLOWS_DIRECTORY: &str = ".github/workflows";

/// Files written for one repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportReport {
    /// Repository the files belong to.
    pub repository: RepositoryRef,
    /// Location of the workflow file.
    pub workflow:   PathBuf,
    /// Location of the README when its header changed.
    pub readme:     Option<PathBuf>
}

/// Location of the workflow file for `workflow` inside `root`.
///
/// # Examples
///
/// ```
/// use std::path::Path;
///
/// use asgen::workflow_path;
///
/// assert_eq!(
///     workflow_path(Path::new("repo"), "Tests"),
///     Path::new("repo/.github/workflows/Tests.yml")
/// );
/// ```
pub fn workflow_path(root: &Path, workflow: &str) -> PathBuf {
    root.join(WORKFLOWS_DIRECTORY).join(format!("{workflow}.yml"))
}

/// Writes the workflow bytes into `root`, creating the workflows directory.
///
/// # Errors
///
/// Returns [`Error::Export`] when the directory or the file cannot be
/// written.
pub fn write_workflow(root: &Path, output: &GeneratedOutput) -> Result<PathBuf, Error> {
    let path = workflow_path(root, &output.workflow);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| error::export_error(parent, source))?;
    }

    let file = File::create(&path).map_err(|source| error::export_error(&path, source))?;
    let mut writer = BufWriter::new(file);
    writer
        .write_all(&output.data)
        .map_err(|source| error::export_error(&path, source))?;
    writer
        .flush()
        .map_err(|source| error::export_error(&path, source))?;

    info!("Wrote workflow {}", path.display());
    Ok(path)
}

/// Writes the workflow and refreshes the README header inside `root`.
///
/// # Errors
///
/// Propagates failures from [`write_workflow`] and [`update_readme`].
pub fn export_output(root: &Path, output: &GeneratedOutput) -> Result<ExportReport, Error> {
    let workflow = write_workflow(root, output)?;
    let readme = update_readme(root, output)?.then(|| root.join(README_FILE));

    Ok(ExportReport {
        repository: output.repository.clone(),
        workflow,
        readme
    })
}
