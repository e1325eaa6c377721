// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Workflow template values that are configuration rather than catalog data.
//!
//! Runner labels, action references and fallback toolchains change more
//! often than the catalog does, so they live here and can be overridden from
//! the settings document without touching the emitter.

use serde::{Deserialize, Serialize};

use crate::error::Error;

const DEFAULT_LINUX_RUNNER: &str = "ubuntu-latest";
const DEFAULT_MAC_RUNNER: &str = "macOS-latest";
const DEFAULT_FALLBACK_IMAGE: &str = "swift:5.1";
const DEFAULT_FALLBACK_XCODE: &str = "11.3.1";
const DEFAULT_CHECKOUT_ACTION: &str = "actions/checkout@v1";
const DEFAULT_UPLOAD_ACTION: &str = "actions/upload-artifact@v1";
const DEFAULT_NOTIFY_ACTION: &str = "elegantchaos/slatify@master";
const DEFAULT_NOTIFY_SECRET: &str = "SLACK_WEBHOOK";

/// Template values consumed by the workflow emitter.
///
/// Every field has a default, so a document only needs to list overrides.
///
/// # Examples
///
/// ```
/// use asgen::WorkflowTemplate;
///
/// let template: WorkflowTemplate =
///     serde_yaml::from_str("linux_runner: ubuntu-20.04").expect("valid template");
/// assert_eq!(template.linux_runner, "ubuntu-20.04");
/// assert_eq!(template.mac_runner, "macOS-latest");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WorkflowTemplate {
    /// Runner label used by container jobs.
    #[serde(alias = "linux-runner", alias = "linuxRunner")]
    pub linux_runner:    String,
    /// Runner label used by the umbrella job.
    #[serde(alias = "mac-runner", alias = "macRunner")]
    pub mac_runner:      String,
    /// Container image used when no compiler is enabled.
    pub fallback_image:  String,
    /// Xcode version selected when no compiler is enabled.
    pub fallback_xcode:  String,
    /// Action used to check out the repository.
    pub checkout_action: String,
    /// Action used to upload the logs directory.
    pub upload_action:   String,
    /// Action used to post notifications.
    pub notify_action:   String,
    /// Name of the secret holding the notification webhook.
    pub notify_secret:   String
}

impl Default for WorkflowTemplate {
    fn default() -> Self {
        Self {
            linux_runner:    DEFAULT_LINUX_RUNNER.to_owned(),
            mac_runner:      DEFAULT_MAC_RUNNER.to_owned(),
            fallback_image:  DEFAULT_FALLBACK_IMAGE.to_owned(),
            fallback_xcode:  DEFAULT_FALLBACK_XCODE.to_owned(),
            checkout_action: DEFAULT_CHECKOUT_ACTION.to_owned(),
            upload_action:   DEFAULT_UPLOAD_ACTION.to_owned(),
            notify_action:   DEFAULT_NOTIFY_ACTION.to_owned(),
            notify_secret:   DEFAULT_NOTIFY_SECRET.to_owned()
        }
    }
}

impl WorkflowTemplate {
    /// Rejects blank or multi-line values, which would corrupt the output.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] naming the offending field.
    pub fn validate(&self) -> Result<(), Error> {
        let fields = [
            ("linux_runner", &self.linux_runner),
            ("mac_runner", &self.mac_runner),
            ("fallback_image", &self.fallback_image),
            ("fallback_xcode", &self.fallback_xcode),
            ("checkout_action", &self.checkout_action),
            ("upload_action", &self.upload_action),
            ("notify_action", &self.notify_action),
            ("notify_secret", &self.notify_secret)
        ];

        for (field, value) in fields {
            if value.trim().is_empty() {
                return Err(Error::validation(format!("template.{field} cannot be empty")));
            }
            if value.chars().any(char::is_control) {
                return Err(Error::validation(format!(
                    "template.{field} cannot contain control characters"
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::WorkflowTemplate;

    #[test]
    fn default_template_uses_corrected_linux_runner() {
        let template = WorkflowTemplate::default();
        assert_eq!(template.linux_runner, "ubuntu-latest");
        assert_eq!(template.fallback_image, "swift:5.1");
        assert!(template.validate().is_ok());
    }

    #[test]
    fn template_accepts_aliases_and_partial_overrides() {
        let yaml = r#"
            mac-runner: macos-11
            notify_secret: CHAT_HOOK
        "#;

        let template: WorkflowTemplate =
            serde_yaml::from_str(yaml).expect("expected template to deserialize");
        assert_eq!(template.mac_runner, "macos-11");
        assert_eq!(template.notify_secret, "CHAT_HOOK");
        assert_eq!(template.checkout_action, "actions/checkout@v1");
    }

    #[test]
    fn template_rejects_unknown_fields() {
        let error = serde_yaml::from_str::<WorkflowTemplate>("windows_runner: windows-latest")
            .unwrap_err();
        assert!(error.to_string().contains("unknown field"));
    }

    #[test]
    fn validate_rejects_blank_values() {
        let template = WorkflowTemplate {
            linux_runner: "  ".to_owned(),
            ..WorkflowTemplate::default()
        };
        let error = template.validate().expect_err("blank runner must fail");
        assert!(error.to_string().contains("template.linux_runner cannot be empty"));
    }

    #[test]
    fn validate_rejects_multiline_values() {
        let template = WorkflowTemplate {
            upload_action: "actions/upload-artifact@v1\nrun: rm -rf /".to_owned(),
            ..WorkflowTemplate::default()
        };
        let error = template.validate().expect_err("newline must fail");
        assert!(error.to_string().contains("control characters"));
    }
}
