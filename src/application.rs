// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Metadata of the application stamped into generated files.

use serde::{Deserialize, Serialize};

/// Name, version and build number of the generating application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplicationInfo {
    /// Product name written into the workflow banner.
    pub name:    String,
    /// Marketing version, e.g. `1.2.0`.
    pub version: String,
    /// Build number.
    pub build:   String
}

impl ApplicationInfo {
    /// Version and build combined, e.g. `1.2.0 (42)`.
    pub fn full_version_string(&self) -> String {
        format!("{} ({})", self.version, self.build)
    }
}

impl Default for ApplicationInfo {
    fn default() -> Self {
        Self {
            name:    "Action Status".to_owned(),
            version: env!("CARGO_PKG_VERSION").to_owned(),
            build:   "1".to_owned()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ApplicationInfo;

    #[test]
    fn full_version_string_combines_version_and_build() {
        let info = ApplicationInfo {
            name:    "Action Status".to_owned(),
            version: "1.2.0".to_owned(),
            build:   "42".to_owned()
        };
        assert_eq!(info.full_version_string(), "1.2.0 (42)");
    }

    #[test]
    fn partial_documents_fall_back_to_defaults() {
        let info: ApplicationInfo =
            serde_yaml::from_str("build: \"7\"").expect("expected metadata to deserialize");
        assert_eq!(info.name, "Action Status");
        assert_eq!(info.version, env!("CARGO_PKG_VERSION"));
        assert_eq!(info.build, "7");
    }
}
