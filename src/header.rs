// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! README status header generation.
//!
//! The header is a Markdown block of shield badges followed by
//! reference-style link definitions. It always ends with
//! [`HEADER_DELIMITER`], which callers use to find and replace a previously
//! generated header while keeping the rest of the README intact.

use std::fmt::Write as _;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

use crate::{
    application::ApplicationInfo,
    catalog::{CatalogItem, Compiler, Platform}
};

/// Sentinel terminating every generated header.
pub const HEADER_DELIMITER: &str = "[comment]: <> (End of ActionStatus Header)\n\n";

const SWIFT_HOME: &str = "https://swift.org";
const SHIELDS_ROOT: &str = "https://img.shields.io";
const GITHUB_ROOT: &str = "https://github.com";

/// Everything outside the URL unreserved set.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Builds the fully-qualified URLs referenced by the header.
pub trait LinkBuilder {
    /// Image URL of the latest-release shield.
    fn release_shield(&self) -> String;

    /// Image URL of the shield advertising `compiler`.
    fn compiler_shield(&self, compiler: &Compiler) -> String;

    /// Image URL of the shield listing the supported platforms.
    fn platforms_shield(&self, names: &[&str]) -> String;

    /// Image URL of the workflow status badge, optionally for one branch.
    fn workflow_badge(&self, branch: &str) -> String;

    /// Page listing the repository's releases.
    fn releases(&self) -> String;

    /// Page listing the workflow's runs.
    fn actions(&self) -> String;
}

/// [`LinkBuilder`] pointing at github.com and shields.io.
///
/// # Examples
///
/// ```
/// use asgen::{GithubLinks, LinkBuilder};
///
/// let links = GithubLinks::new("elegantchaos", "Logger", "Tests");
/// assert_eq!(links.releases(), "https://github.com/elegantchaos/Logger/releases");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GithubLinks {
    owner:    String,
    name:     String,
    workflow: String
}

impl GithubLinks {
    /// Creates link builders for `owner/name` and its workflow.
    pub fn new(owner: &str, name: &str, workflow: &str) -> Self {
        Self {
            owner:    owner.to_owned(),
            name:     name.to_owned(),
            workflow: workflow.to_owned()
        }
    }

    fn repository_url(&self) -> String {
        format!("{GITHUB_ROOT}/{}/{}", self.owner, self.name)
    }
}

impl LinkBuilder for GithubLinks {
    fn release_shield(&self) -> String {
        format!(
            "{SHIELDS_ROOT}/github/v/release/{}/{}",
            self.owner, self.name
        )
    }

    fn compiler_shield(&self, compiler: &Compiler) -> String {
        format!(
            "{SHIELDS_ROOT}/badge/swift-{}-F05138.svg",
            shield_segment(&compiler.short)
        )
    }

    fn platforms_shield(&self, names: &[&str]) -> String {
        format!(
            "{SHIELDS_ROOT}/badge/platforms-{}-lightgrey.svg?style=flat",
            shield_segment(&names.join(", "))
        )
    }

    fn workflow_badge(&self, branch: &str) -> String {
        let mut url = format!(
            "{}/workflows/{}/badge.svg",
            self.repository_url(),
            encode_path(&self.workflow)
        );
        if !branch.is_empty() {
            let _ = write!(url, "?branch={}", encode_path(branch));
        }
        url
    }

    fn releases(&self) -> String {
        format!("{}/releases", self.repository_url())
    }

    fn actions(&self) -> String {
        format!(
            "{}/actions?query=workflow%3A{}",
            self.repository_url(),
            encode_path(&self.workflow)
        )
    }
}

/// Renders the README header, or an empty string when `enabled` is false.
///
/// Platform names are listed once each, in catalog order. The compiler badge
/// group is left out when no compiler is enabled.
pub fn render_header(
    enabled: bool,
    platforms: &[&Platform],
    compilers: &[&Compiler],
    application: &ApplicationInfo,
    links: &dyn LinkBuilder
) -> String {
    if !enabled {
        return String::new();
    }

    let mut names: Vec<&str> = Vec::with_capacity(platforms.len());
    for platform in platforms {
        if !names.contains(&platform.name()) {
            names.push(platform.name());
        }
    }
    let platform_list = names.join(", ");

    let mut header = String::with_capacity(1024);
    let _ = writeln!(
        header,
        "[comment]: <> (Header Generated by ActionStatus {} - {})\n",
        application.version, application.build
    );

    header.push_str(
        "[![Test results][tests shield]][actions] [![Latest release][release shield]][releases]"
    );
    if !compilers.is_empty() {
        let badges: Vec<String> = compilers
            .iter()
            .map(|compiler| format!("![swift {} shield]", compiler.short))
            .collect();
        let _ = write!(header, " [{}][swift]", badges.join(" "));
    }
    let _ = writeln!(header, " ![Platforms: {platform_list}][platforms shield]\n");

    let _ = writeln!(header, "[release shield]: {}", links.release_shield());
    let _ = writeln!(
        header,
        "[platforms shield]: {} \"{platform_list}\"",
        links.platforms_shield(&names)
    );
    let _ = writeln!(header, "[tests shield]: {}", links.workflow_badge(""));
    for compiler in compilers {
        let _ = writeln!(
            header,
            "[swift {short} shield]: {} \"Swift {short}\"",
            links.compiler_shield(compiler),
            short = compiler.short
        );
    }

    let _ = writeln!(header, "\n[swift]: {SWIFT_HOME}");
    let _ = writeln!(header, "[releases]: {}", links.releases());
    let _ = writeln!(header, "[actions]: {}\n", links.actions());
    header.push_str(HEADER_DELIMITER);

    header
}

/// Escapes a shields.io static badge segment.
fn shield_segment(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for character in value.chars() {
        match character {
            '-' => escaped.push_str("--"),
            '_' => escaped.push_str("__"),
            other => escaped.push(other)
        }
    }
    encode_path(&escaped)
}

fn encode_path(value: &str) -> String {
    utf8_percent_encode(value, PATH_SEGMENT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        catalog::Catalog,
        selection::{OptionSet, resolve_enabled}
    };

    fn application() -> ApplicationInfo {
        ApplicationInfo {
            name:    "Action Status".to_owned(),
            version: "1.0".to_owned(),
            build:   "100".to_owned()
        }
    }

    fn render(ids: &[&str], enabled: bool) -> String {
        let catalog = Catalog::standard();
        let options: OptionSet = ids.iter().copied().collect();
        let platforms = resolve_enabled(&catalog.platforms, &options);
        let compilers = resolve_enabled(&catalog.compilers, &options);
        let links = GithubLinks::new("elegantchaos", "Logger", "Tests");
        render_header(enabled, &platforms, &compilers, &application(), &links)
    }

    #[test]
    fn disabled_header_is_empty() {
        assert_eq!(render(&["swift-52", "linux"], false), "");
    }

    #[test]
    fn header_renders_badges_and_link_definitions() {
        let header = render(&["swift-52", "swift-53", "macOS", "linux"], true);
        let expected = "[comment]: <> (Header Generated by ActionStatus 1.0 - 100)

[![Test results][tests shield]][actions] [![Latest release][release shield]][releases] [![swift 5.2 shield] ![swift 5.3 shield]][swift] ![Platforms: macOS, Linux][platforms shield]

[release shield]: https://img.shields.io/github/v/release/elegantchaos/Logger
[platforms shield]: https://img.shields.io/badge/platforms-macOS%2C%20Linux-lightgrey.svg?style=flat \"macOS, Linux\"
[tests shield]: https://github.com/elegantchaos/Logger/workflows/Tests/badge.svg
[swift 5.2 shield]: https://img.shields.io/badge/swift-5.2-F05138.svg \"Swift 5.2\"
[swift 5.3 shield]: https://img.shields.io/badge/swift-5.3-F05138.svg \"Swift 5.3\"

[swift]: https://swift.org
[releases]: https://github.com/elegantchaos/Logger/releases
[actions]: https://github.com/elegantchaos/Logger/actions?query=workflow%3ATests

[comment]: <> (End of ActionStatus Header)

";
        assert_eq!(header, expected);
    }

    #[test]
    fn header_always_ends_with_delimiter() {
        let header = render(&[], true);
        assert!(header.ends_with(HEADER_DELIMITER));
        assert!(!header.contains("][swift]"));
    }

    #[test]
    fn duplicate_platform_names_are_listed_once() {
        let header = render(&["macOS", "macOS-xcode", "iOS"], true);
        assert!(header.contains("![Platforms: macOS, iOS][platforms shield]"));
    }

    #[test]
    fn workflow_badge_encodes_names_and_branch() {
        let links = GithubLinks::new("octocat", "hello", "Build and Test");
        assert_eq!(
            links.workflow_badge("main"),
            "https://github.com/octocat/hello/workflows/Build%20and%20Test/badge.svg?branch=main"
        );
        assert_eq!(
            links.actions(),
            "https://github.com/octocat/hello/actions?query=workflow%3ABuild%20and%20Test"
        );
    }

    #[test]
    fn shield_segment_escapes_dashes_and_underscores() {
        assert_eq!(shield_segment("nightly-5.4_beta"), "nightly--5.4__beta");
    }

    #[test]
    fn encode_path_keeps_unreserved_characters() {
        assert_eq!(encode_path("a-Z_0.~"), "a-Z_0.~");
        assert_eq!(encode_path("a/b c"), "a%2Fb%20c");
        assert_eq!(encode_path("Build #2"), "Build%20%232");
        assert_eq!(encode_path("CI: main"), "CI%3A%20main");
        assert_eq!(encode_path("café"), "caf%C3%A9");
    }
}
