// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Rendering of GitHub Actions workflow text.
//!
//! The emitter writes YAML by hand so the layout (indentation, blank lines,
//! step order) is stable and byte-identical for identical inputs. Ordering
//! comes only from the job list and from catalog order of the configurations.

use std::{borrow::Cow, fmt::Write as _};

use crate::{
    application::ApplicationInfo,
    catalog::{CatalogItem, CatalogOption, Compiler, NativeBuild, NativeToolchain, Platform},
    job::{Job, Runner},
    selection::GeneralToggles,
    template::WorkflowTemplate
};

const BANNER_RULE: &str =
    "# --------------------------------------------------------------------------------";
const RELEASE_CONFIGURATION: &str = "release";
const LOGS_DIRECTORY: &str = "logs";

/// Everything the emitter needs to render one workflow.
#[derive(Debug, Clone, Copy)]
pub struct WorkflowInput<'a> {
    /// Value of the top-level `name:` field.
    pub workflow:       &'a str,
    /// Scheme passed to `xcodebuild`, usually the package name.
    pub scheme:         &'a str,
    /// Application stamped into the banner.
    pub application:    &'a ApplicationInfo,
    /// Folded jobs in emission order.
    pub jobs:           &'a [Job<'a>],
    /// Enabled compilers after the compiler policy ran, oldest first.
    pub compilers:      &'a [&'a Compiler],
    /// Enabled build configurations in catalog order.
    pub configurations: &'a [&'a CatalogOption],
    /// General toggles.
    pub toggles:        GeneralToggles,
    /// Runner labels, actions and fallbacks.
    pub template:       &'a WorkflowTemplate
}

impl<'a> WorkflowInput<'a> {
    fn newest_compiler(&self) -> Option<&'a Compiler> {
        self.compilers.last().copied()
    }

    fn container_image(&self) -> &'a str {
        self.newest_compiler()
            .map_or(self.template.fallback_image.as_str(), |compiler| {
                compiler.linux_image.as_str()
            })
    }

    fn native_toolchain(&self) -> NativeToolchain {
        self.newest_compiler().map_or_else(
            || NativeToolchain::Xcode {
                version: self.template.fallback_xcode.clone()
            },
            |compiler| compiler.native.clone()
        )
    }
}

/// Renders the complete workflow document.
///
/// # Examples
///
/// ```
/// use asgen::{ApplicationInfo, GeneralToggles, WorkflowInput, WorkflowTemplate, render_workflow};
///
/// let application = ApplicationInfo::default();
/// let template = WorkflowTemplate::default();
/// let input = WorkflowInput {
///     workflow:       "Tests",
///     scheme:         "Example",
///     application:    &application,
///     jobs:           &[],
///     compilers:      &[],
///     configurations: &[],
///     toggles:        GeneralToggles::default(),
///     template:       &template
/// };
/// let source = render_workflow(&input);
/// assert!(source.contains("name: Tests\n"));
/// assert!(source.contains("on: [push, pull_request]\n"));
/// ```
pub fn render_workflow(input: &WorkflowInput<'_>) -> String {
    let mut source = String::with_capacity(1024 + input.jobs.len() * 2048);

    let _ = writeln!(source, "{BANNER_RULE}");
    let _ = writeln!(
        source,
        "# This workflow was automatically generated by {} {}.",
        input.application.name,
        input.application.full_version_string()
    );
    source.push_str("# (see https://actionstatus.elegantchaos.com for more details)\n");
    let _ = writeln!(source, "{BANNER_RULE}");
    let _ = write!(
        source,
        "\nname: {}\n\non: [push, pull_request]\n\njobs:\n\n",
        yaml_scalar(input.workflow)
    );

    for job in input.jobs {
        render_job(&mut source, job, input);
    }

    source
}

fn render_job(out: &mut String, job: &Job<'_>, input: &WorkflowInput<'_>) {
    let _ = writeln!(out, "    {}:", job.id());
    let _ = writeln!(out, "        name: {}", yaml_scalar(job.name()));

    match job.runner() {
        Runner::LinuxContainer => {
            let _ = writeln!(out, "        runs-on: {}", input.template.linux_runner);
            let _ = writeln!(out, "        container: {}", input.container_image());
        }
        Runner::Mac => {
            let _ = writeln!(out, "        runs-on: {}", input.template.mac_runner);
        }
    }

    out.push_str("        steps:\n");
    step_uses(out, "Checkout", &input.template.checkout_action);

    match job.runner() {
        Runner::LinuxContainer => step_run(out, "Swift Version", "swift --version"),
        Runner::Mac => render_native_setup(out, job, input)
    }
    step_run(out, "Make Logs Directory", &format!("mkdir {LOGS_DIRECTORY}"));

    let swift_pm = match job {
        Job::Standalone(_) => true,
        Job::Umbrella {
            platforms
        } => platforms
            .iter()
            .any(|platform| platform.native == Some(NativeBuild::SwiftPm))
    };
    if swift_pm {
        render_swift_steps(out, input);
    }

    for platform in job.platforms() {
        if let Some(NativeBuild::Xcode {
            destination
        }) = &platform.native
        {
            render_xcode_steps(out, platform, destination.as_deref(), input);
        }
    }

    if input.toggles.upload {
        out.push_str("        - name: Upload Logs\n");
        let _ = writeln!(out, "          uses: {}", input.template.upload_action);
        out.push_str("          with:\n");
        let _ = writeln!(out, "            name: {LOGS_DIRECTORY}");
        let _ = writeln!(out, "            path: {LOGS_DIRECTORY}");
    }

    if input.toggles.notify {
        out.push_str("        - name: Slack Notification\n");
        let _ = writeln!(out, "          uses: {}", input.template.notify_action);
        out.push_str("          if: always()\n");
        out.push_str("          with:\n");
        out.push_str("            type: ${{ job.status }}\n");
        let _ = writeln!(out, "            job_name: '{}'", quote_single(job.name()));
        out.push_str("            mention_if: 'failure'\n");
        let _ = writeln!(
            out,
            "            url: ${{{{ secrets.{} }}}}",
            input.template.notify_secret
        );
    }

    out.push('\n');
}

fn render_native_setup(out: &mut String, job: &Job<'_>, input: &WorkflowInput<'_>) {
    let toolchain = input.native_toolchain();

    if let NativeToolchain::Toolchain {
        branch, ..
    } = &toolchain
    {
        let script = format!(
            "branch=\"{branch}\"\n\
             wget --quiet https://swift.org/builds/$branch/xcode/latest-build.yml\n\
             grep \"download:\" < latest-build.yml > filtered.yml\n\
             sed -e 's/-osx.pkg//g' filtered.yml > stripped.yml\n\
             sed -e 's/:[^:\\/\\/]/YML=\"/g;s/$/\"/g;s/ *=/=/g' stripped.yml > snapshot.sh\n\
             source snapshot.sh\n\
             echo \"Installing Toolchain: $YML\"\n\
             curl -s -L https://swift.org/builds/$branch/xcode/$YML/$YML-osx.pkg -o toolchain.pkg\n\
             sudo installer -pkg toolchain.pkg -target /\n\
             echo \"TOOLCHAINS=swift\" >> $GITHUB_ENV"
        );
        step_script(out, "Install Toolchain", &script);
    }

    let script = format!(
        "ls -d /Applications/Xcode*\n\
         sudo xcode-select -s /Applications/Xcode_{}.app\n\
         xcodebuild -version\n\
         swift --version",
        toolchain.xcode_version()
    );
    step_script(out, "Xcode Version", &script);

    if job.uses_xcodebuild() {
        step_run(out, "XC Pretty", "sudo gem install xcpretty-travis-formatter");
    }
}

fn render_swift_steps(out: &mut String, input: &WorkflowInput<'_>) {
    if input.toggles.build {
        for configuration in input.configurations {
            step_run(
                out,
                &format!("Build ({})", configuration.name()),
                &format!("swift build -v -c {}", configuration.id())
            );
        }
    }

    if input.toggles.test {
        for configuration in input.configurations {
            let mut command = format!("swift test -v -c {}", configuration.id());
            if configuration.id() == RELEASE_CONFIGURATION {
                command.push_str(" -Xswiftc -enable-testing");
            }
            step_run(out, &format!("Test ({})", configuration.name()), &command);
        }
    }
}

fn render_xcode_steps(
    out: &mut String,
    platform: &Platform,
    destination: Option<&str>,
    input: &WorkflowInput<'_>
) {
    let destination = destination
        .map(|value| format!(" -destination \"{value}\""))
        .unwrap_or_default();

    if input.toggles.build {
        for configuration in input.configurations {
            let command = format!(
                "xcodebuild clean build -workspace . -scheme {scheme}{destination} -configuration {config} CODE_SIGN_IDENTITY=\"\" CODE_SIGNING_REQUIRED=NO | tee {log} | xcpretty",
                scheme = input.scheme,
                config = configuration.name(),
                log = xcode_log(platform, "build", configuration)
            );
            step_run(
                out,
                &format!("Build ({}/{})", platform.name(), configuration.name()),
                &command
            );
        }
    }

    if input.toggles.test {
        for configuration in input.configurations {
            let testability = if configuration.id() == RELEASE_CONFIGURATION {
                " ENABLE_TESTABILITY=YES"
            } else {
                ""
            };
            let command = format!(
                "xcodebuild test -workspace . -scheme {scheme}{destination} -configuration {config} CODE_SIGN_IDENTITY=\"\" CODE_SIGNING_REQUIRED=NO{testability} | tee {log} | xcpretty",
                scheme = input.scheme,
                config = configuration.name(),
                log = xcode_log(platform, "test", configuration)
            );
            step_run(
                out,
                &format!("Test ({}/{})", platform.name(), configuration.name()),
                &command
            );
        }
    }
}

fn xcode_log(platform: &Platform, action: &str, configuration: &CatalogOption) -> String {
    format!(
        "{LOGS_DIRECTORY}/xcodebuild-{}-{action}-{}.log",
        platform.id(),
        configuration.id()
    )
}

fn step_uses(out: &mut String, name: &str, action: &str) {
    let _ = writeln!(out, "        - name: {}", yaml_scalar(name));
    let _ = writeln!(out, "          uses: {action}");
}

fn step_run(out: &mut String, name: &str, command: &str) {
    let _ = writeln!(out, "        - name: {}", yaml_scalar(name));
    let _ = writeln!(out, "          run: {command}");
}

fn step_script(out: &mut String, name: &str, script: &str) {
    let _ = writeln!(out, "        - name: {}", yaml_scalar(name));
    out.push_str("          run: |\n");
    for line in script.lines() {
        let _ = writeln!(out, "            {line}");
    }
}

/// Writes `value` as a plain scalar when YAML reads it back unchanged as a
/// string, otherwise single-quoted.
fn yaml_scalar(value: &str) -> Cow<'_, str> {
    if needs_quotes(value) {
        Cow::Owned(format!("'{}'", quote_single(value)))
    } else {
        Cow::Borrowed(value)
    }
}

fn needs_quotes(value: &str) -> bool {
    const INDICATORS: &[char] = &[
        '-', '?', ':', ',', '[', ']', '{', '}', '#', '&', '*', '!', '|', '>', '\'', '"', '%',
        '@', '`'
    ];
    const RESERVED: &[&str] = &[
        "~", "null", "true", "false", "yes", "no", "y", "n", "on", "off", ".inf", ".nan"
    ];

    let Some(first) = value.chars().next() else {
        return true;
    };
    let lowered = value.to_ascii_lowercase();

    INDICATORS.contains(&first)
        || value.starts_with(char::is_whitespace)
        || value.ends_with(char::is_whitespace)
        || value.ends_with(':')
        || value.contains(": ")
        || value.contains(" #")
        || value.contains(|c: char| c.is_control())
        || RESERVED.contains(&lowered.as_str())
        || lowered.starts_with("0x")
        || lowered.starts_with("0o")
        || value.parse::<f64>().is_ok()
}

fn quote_single(value: &str) -> String {
    value.replace('\'', "''")
}
