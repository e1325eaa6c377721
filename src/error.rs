#![allow(non_shorthand_field_patterns)]
#![doc = "Error handling primitives shared across the generator crate."]
// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! The derive emitted by [`masterror::Error`] expands pattern matches that
//! trigger the `non_shorthand_field_patterns` lint. The lint is disabled for
//! the module to keep the generated implementations warning-free.

use std::path::{Path, PathBuf};

/// Unified error type returned by the generator, the settings loader and the
/// CLI.
///
/// Unknown option identifiers are never reported through this type; they are
/// ignored during selection so settings written by a newer catalog keep
/// working.
#[derive(Debug, masterror::Error)]
pub enum Error {
    /// Wraps I/O errors that occur while reading settings or README files.
    #[error("failed to read {path:?}: {source}")]
    Io {
        /// Location of the file being read.
        path:   PathBuf,
        /// Underlying I/O error.
        source: std::io::Error
    },
    /// Wraps YAML decoding errors.
    #[error("failed to parse configuration: {source}")]
    Parse {
        /// Source decoding error from serde_yaml.
        source: serde_yaml::Error
    },
    /// Returned when the configuration violates invariants.
    #[error("invalid configuration: {message}")]
    Validation {
        /// Human readable message describing the validation problem.
        message: String
    },
    /// Wraps serialization errors when writing JSON output.
    #[error("failed to serialize output: {source}")]
    Serialize {
        /// Underlying serialization error.
        source: serde_json::Error
    },
    /// A toggle vector does not line up with the catalog it belongs to.
    #[error("toggle vector has {actual} entries but the catalog has {expected}")]
    LengthMismatch {
        /// Number of entries in the catalog.
        expected: usize,
        /// Number of toggles supplied by the caller.
        actual:   usize
    },
    /// The emitted workflow text failed the structural check.
    #[error("generated workflow is malformed: {message}")]
    MalformedWorkflow {
        /// Description of the structural problem.
        message: String
    },
    /// Wraps I/O errors that occur while writing to standard output.
    #[error("failed to write output: {source}")]
    Output {
        /// Underlying I/O error, e.g. a closed pipe.
        source: std::io::Error
    },
    /// Wraps I/O errors that occur while persisting generated files.
    #[error("failed to write generated file at {path:?}: {source}")]
    Export {
        /// Location of the file being produced.
        path:   PathBuf,
        /// Underlying I/O error reported by the operating system.
        source: std::io::Error
    }
}

impl Error {
    /// Constructs a validation error from the provided displayable value.
    ///
    /// # Parameters
    ///
    /// * `message` - Human-readable description of the validation failure.
    pub fn validation<M>(message: M) -> Self
    where
        M: Into<String>
    {
        Self::Validation {
            message: message.into()
        }
    }

    /// Constructs a malformed workflow error.
    pub fn malformed<M>(message: M) -> Self
    where
        M: Into<String>
    {
        Self::MalformedWorkflow {
            message: message.into()
        }
    }

    /// Formats the error for diagnostics without the variant name.
    ///
    /// The returned string matches the [`std::fmt::Display`] implementation.
    pub fn to_display_string(&self) -> String {
        format!("{self}")
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(source: serde_yaml::Error) -> Self {
        Self::Parse {
            source
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(source: serde_json::Error) -> Self {
        if source.is_io() {
            return output_error(source.into());
        }
        Self::Serialize {
            source
        }
    }
}

/// Creates an [`Error::Output`] variant for a failed write to the output
/// stream.
pub fn output_error(source: std::io::Error) -> Error {
    Error::Output {
        source
    }
}

/// Creates an [`Error::Io`] variant capturing the failing path and source.
///
/// # Parameters
///
/// * `path` - Location of the file that triggered the error.
/// * `source` - I/O error reported by the operating system.
pub fn io_error(path: &Path, source: std::io::Error) -> Error {
    Error::Io {
        path: path.to_path_buf(),
        source
    }
}

/// Creates an [`Error::Export`] variant capturing the failing path and source.
///
/// # Parameters
///
/// * `path` - Location of the generated file that triggered the error.
/// * `source` - I/O error reported by the operating system.
pub fn export_error(path: &Path, source: std::io::Error) -> Error {
    Error::Export {
        path: path.to_path_buf(),
        source
    }
}
