// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

/// Keeps the generated status header at the top of README.md.
///
/// A previously generated header is everything up to and including the
/// delimiter. It is replaced in place; a README without one gets the header
/// prepended.
use std::{fs, io::ErrorKind, path::Path};

use tracing::{debug, info};

use crate::{
    error::{self, Error},
    generator::GeneratedOutput
};

/// File name the header is written into.
pub const README_FILE: &str = "README.md";

/// Returns `existing` with its generated header replaced by `header`.
///
/// # Examples
///
/// ```
/// use asgen::{HEADER_DELIMITER, apply_header};
///
/// let header = format!("badges\n{HEADER_DELIMITER}");
/// let readme = apply_header("# Project\n", &header, HEADER_DELIMITER);
/// assert_eq!(readme, format!("{header}# Project\n"));
///
/// let refreshed = format!("new badges\n{HEADER_DELIMITER}");
/// let again = apply_header(&readme, &refreshed, HEADER_DELIMITER);
/// assert_eq!(again, format!("{refreshed}# Project\n"));
/// ```
pub fn apply_header(existing: &str, header: &str, delimiter: &str) -> String {
    let body = match existing.find(delimiter) {
        Some(index) => &existing[index + delimiter.len()..],
        None => existing
    };

    let mut result = String::with_capacity(header.len() + body.len());
    result.push_str(header);
    result.push_str(body);
    result
}

/// Writes the generated header into the README inside `root`.
///
/// Returns `true` when the file changed. An empty header leaves the README
/// untouched and a missing README is created.
///
/// # Errors
///
/// Returns [`Error::Io`] when the README exists but cannot be read and
/// [`Error::Export`] when the updated text cannot be written.
pub fn update_readme(root: &Path, output: &GeneratedOutput) -> Result<bool, Error> {
    if output.header.is_empty() {
        debug!("Header disabled for {}", output.repository);
        return Ok(false);
    }

    let readme_path = root.join(README_FILE);
    info!("Reading README from {}", readme_path.display());
    let content = match fs::read_to_string(&readme_path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!("No README at {}, creating one", readme_path.display());
            String::new()
        }
        Err(e) => return Err(error::io_error(&readme_path, e))
    };

    let updated = apply_header(&content, &output.header, output.delimiter);
    if updated == content {
        info!("No changes to README");
        return Ok(false);
    }

    info!("Writing updated README to {}", readme_path.display());
    fs::write(&readme_path, updated).map_err(|e| error::export_error(&readme_path, e))?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;
    use crate::{header::HEADER_DELIMITER, settings::RepositoryRef};

    fn output(header: &str) -> GeneratedOutput {
        GeneratedOutput {
            repository: RepositoryRef::new("octocat", "hello"),
            workflow:   "Tests".to_owned(),
            source:     String::new(),
            data:       Vec::new(),
            header:     header.to_owned(),
            delimiter:  HEADER_DELIMITER
        }
    }

    fn header(text: &str) -> String {
        format!("{text}\n{HEADER_DELIMITER}")
    }

    #[test]
    fn apply_header_prepends_when_delimiter_missing() {
        let result = apply_header("# Title\n\nBody\n", &header("badges"), HEADER_DELIMITER);
        assert_eq!(result, format!("badges\n{HEADER_DELIMITER}# Title\n\nBody\n"));
    }

    #[test]
    fn apply_header_replaces_previous_header_only() {
        let existing = format!("old badges\n{HEADER_DELIMITER}# Title\n");
        let result = apply_header(&existing, &header("new badges"), HEADER_DELIMITER);
        assert_eq!(result, format!("new badges\n{HEADER_DELIMITER}# Title\n"));
    }

    #[test]
    fn apply_header_is_idempotent() {
        let first = apply_header("# Title\n", &header("badges"), HEADER_DELIMITER);
        let second = apply_header(&first, &header("badges"), HEADER_DELIMITER);
        assert_eq!(first, second);
    }

    #[test]
    fn update_readme_skips_empty_header() {
        let dir = tempdir().expect("failed to create temp dir");
        let changed = update_readme(dir.path(), &output("")).expect("update succeeds");
        assert!(!changed);
        assert!(!dir.path().join(README_FILE).exists());
    }

    #[test]
    fn update_readme_creates_missing_file() {
        let dir = tempdir().expect("failed to create temp dir");
        let changed =
            update_readme(dir.path(), &output(&header("badges"))).expect("update succeeds");
        assert!(changed);

        let written = fs::read_to_string(dir.path().join(README_FILE)).expect("README exists");
        assert_eq!(written, header("badges"));
    }

    #[test]
    fn update_readme_writes_only_on_change() {
        let dir = tempdir().expect("failed to create temp dir");
        let readme_path = dir.path().join(README_FILE);
        fs::write(&readme_path, "# Hello\n").expect("failed to seed README");

        let generated = output(&header("badges"));
        assert!(update_readme(dir.path(), &generated).expect("first update succeeds"));
        assert!(!update_readme(dir.path(), &generated).expect("second update succeeds"));

        let updated = fs::read_to_string(&readme_path).expect("failed to read updated README");
        assert_eq!(updated, format!("badges\n{HEADER_DELIMITER}# Hello\n"));
    }
}
