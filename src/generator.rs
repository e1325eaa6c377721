// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Generation pipeline turning repository settings into workflow text and a
//! README header.
//!
//! The pipeline resolves enabled catalog entries, narrows compilers with the
//! [`CompilerPolicy`], folds platforms into jobs and renders both outputs.
//! The rendered workflow is parsed back before it is returned, so callers
//! either receive a well-formed document or an error and nothing else.

use serde::Serialize;
use serde_yaml::Value;
use tracing::{debug, debug_span};

use crate::{
    application::ApplicationInfo,
    catalog::Catalog,
    error::Error,
    header::{HEADER_DELIMITER, LinkBuilder, render_header},
    job::{Job, fold_jobs},
    policy::CompilerPolicy,
    selection::{GeneralToggles, resolve_enabled},
    settings::{RepositoryRef, RepositorySettings},
    template::WorkflowTemplate,
    workflow::{WorkflowInput, render_workflow}
};

/// Result of one generation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedOutput {
    /// Repository the output was generated for.
    pub repository: RepositoryRef,
    /// Workflow name, also the file stem.
    pub workflow:   String,
    /// Workflow document text.
    pub source:     String,
    /// UTF-8 bytes of [`GeneratedOutput::source`].
    #[serde(skip)]
    pub data:       Vec<u8>,
    /// README header, empty when the header is disabled.
    pub header:     String,
    /// Sentinel terminating [`GeneratedOutput::header`].
    pub delimiter:  &'static str
}

/// Workflow generator bound to a catalog, template and application metadata.
#[derive(Debug, Clone, Copy)]
pub struct Generator<'a> {
    catalog:     &'a Catalog,
    template:    &'a WorkflowTemplate,
    application: &'a ApplicationInfo
}

impl<'a> Generator<'a> {
    /// Creates a generator over borrowed configuration.
    pub fn new(
        catalog: &'a Catalog,
        template: &'a WorkflowTemplate,
        application: &'a ApplicationInfo
    ) -> Self {
        Self {
            catalog,
            template,
            application
        }
    }

    /// Generates the workflow and header for one repository.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedWorkflow`] when the rendered text does not
    /// parse as YAML, its `name` does not read back as the configured
    /// workflow name, or it does not contain the expected jobs.
    ///
    /// # Examples
    ///
    /// ```
    /// use asgen::{
    ///     ApplicationInfo, Catalog, Generator, GithubLinks, OptionSet, RepositoryRef,
    ///     RepositorySettings, WorkflowTemplate
    /// };
    ///
    /// let catalog = Catalog::standard();
    /// let template = WorkflowTemplate::default();
    /// let application = ApplicationInfo::default();
    /// let generator = Generator::new(&catalog, &template, &application);
    ///
    /// let options: OptionSet = ["swift-53", "linux", "build"].into_iter().collect();
    /// let settings = RepositorySettings::new(RepositoryRef::new("octocat", "hello"), options, false);
    /// let links = GithubLinks::new("octocat", "hello", &settings.workflow);
    ///
    /// let output = generator.generate(&settings, &links).expect("generation succeeds");
    /// assert!(output.source.contains("    linux:\n"));
    /// assert!(output.header.is_empty());
    /// ```
    pub fn generate(
        &self,
        settings: &RepositorySettings,
        links: &dyn LinkBuilder
    ) -> Result<GeneratedOutput, Error> {
        let span = debug_span!("generate", repository = %settings.repository);
        let _guard = span.enter();

        let options = &settings.options;
        let policy = CompilerPolicy::from_options(options);
        let compilers = policy.apply(resolve_enabled(&self.catalog.compilers, options));
        let platforms = resolve_enabled(&self.catalog.platforms, options);
        let configurations = resolve_enabled(&self.catalog.configurations, options);
        let jobs = fold_jobs(&platforms);
        debug!(
            compilers = compilers.len(),
            platforms = platforms.len(),
            jobs = jobs.len(),
            "Resolved selection"
        );

        let source = render_workflow(&WorkflowInput {
            workflow:       &settings.workflow,
            scheme:         &settings.repository.name,
            application:    self.application,
            jobs:           &jobs,
            compilers:      &compilers,
            configurations: &configurations,
            toggles:        GeneralToggles::from_options(options),
            template:       self.template
        });
        verify_workflow(&source, &settings.workflow, &jobs)?;

        let header = render_header(
            settings.header,
            &platforms,
            &compilers,
            self.application,
            links
        );

        Ok(GeneratedOutput {
            repository: settings.repository.clone(),
            workflow: settings.workflow.clone(),
            data: source.as_bytes().to_vec(),
            source,
            header,
            delimiter: HEADER_DELIMITER
        })
    }
}

/// Parses the rendered workflow and checks that the name and every job made
/// it through.
fn verify_workflow(source: &str, workflow: &str, jobs: &[Job<'_>]) -> Result<(), Error> {
    let document: Value = serde_yaml::from_str(source)
        .map_err(|e| Error::malformed(format!("not valid YAML: {e}")))?;

    match document.get("name").and_then(Value::as_str) {
        Some(name) if name == workflow => {}
        other => {
            return Err(Error::malformed(format!(
                "name reads back as {other:?} instead of {workflow:?}"
            )));
        }
    }

    let parsed_jobs = match document.get("jobs") {
        Some(Value::Mapping(mapping)) => Some(mapping),
        Some(Value::Null) => None,
        Some(_) => return Err(Error::malformed("'jobs' is not a mapping")),
        None => return Err(Error::malformed("missing 'jobs' section"))
    };

    let count = parsed_jobs.map_or(0, |mapping| mapping.len());
    if count != jobs.len() {
        return Err(Error::malformed(format!(
            "expected {} jobs but parsed {count}",
            jobs.len()
        )));
    }

    for job in jobs {
        let steps = parsed_jobs
            .and_then(|mapping| mapping.get(job.id()))
            .and_then(|definition| definition.get("steps"));
        if !matches!(steps, Some(Value::Sequence(_))) {
            return Err(Error::malformed(format!(
                "job '{}' has no steps sequence",
                job.id()
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::{header::GithubLinks, selection::OptionSet};

    struct Fixture {
        catalog:     Catalog,
        template:    WorkflowTemplate,
        application: ApplicationInfo
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                catalog:     Catalog::standard(),
                template:    WorkflowTemplate::default(),
                application: ApplicationInfo {
                    name:    "Action Status".to_owned(),
                    version: "1.0".to_owned(),
                    build:   "100".to_owned()
                }
            }
        }

        fn generate(&self, settings: &RepositorySettings) -> Result<GeneratedOutput, Error> {
            let generator = Generator::new(&self.catalog, &self.template, &self.application);
            let links = GithubLinks::new(
                &settings.repository.owner,
                &settings.repository.name,
                &settings.workflow
            );
            generator.generate(settings, &links)
        }
    }

    fn settings(ids: &[&str], header: bool) -> RepositorySettings {
        let options: OptionSet = ids.iter().copied().collect();
        RepositorySettings::new(RepositoryRef::new("elegantchaos", "Example"), options, header)
    }

    fn job_ids(source: &str) -> Vec<String> {
        let document: Value = serde_yaml::from_str(source).expect("generated YAML parses");
        match document.get("jobs") {
            Some(Value::Mapping(mapping)) => mapping
                .keys()
                .filter_map(|key| key.as_str().map(str::to_owned))
                .collect(),
            _ => Vec::new()
        }
    }

    #[test]
    fn linux_only_selection_produces_single_container_job() {
        let output = Fixture::new()
            .generate(&settings(
                &["swift-53", "linux", "debug", "release", "build", "test"],
                false
            ))
            .expect("generation succeeds");

        assert_eq!(job_ids(&output.source), ["linux"]);
        assert_eq!(output.source.matches("run: swift build").count(), 2);
        assert_eq!(output.source.matches("run: swift test").count(), 2);
        assert!(output.source.contains("swift test -v -c release -Xswiftc -enable-testing"));
        assert!(!output.source.contains("Upload Logs"));
        assert!(!output.source.contains("Slack Notification"));
        assert!(!output.source.contains("xcodebuild"));
        assert_eq!(output.header, "");
        assert_eq!(output.data, output.source.as_bytes());
        assert_eq!(output.delimiter, HEADER_DELIMITER);
    }

    #[test]
    fn native_platforms_fold_into_one_umbrella_job() {
        let output = Fixture::new()
            .generate(&settings(&["macOS", "iOS", "swift-52"], false))
            .expect("generation succeeds");

        assert_eq!(job_ids(&output.source), ["xcode"]);
        assert!(output.source.contains("        name: Xcode\n"));
        assert!(!output.source.contains("run: swift build"));
        assert!(!output.source.contains("run: swift test"));
        assert!(!output.source.contains("Build (iOS"));
    }

    #[test]
    fn first_last_keeps_oldest_and_newest_compilers_in_header() {
        let output = Fixture::new()
            .generate(&settings(
                &["swift-51", "swift-52", "swift-53", "linux", "firstlast"],
                true
            ))
            .expect("generation succeeds");

        assert!(output.header.contains("[swift 5.1 shield]:"));
        assert!(output.header.contains("[swift 5.3 shield]:"));
        assert!(!output.header.contains("swift 5.2"));
        assert!(output.source.contains("container: swift:5.3.3-bionic"));
    }

    #[test]
    fn header_is_generated_when_enabled() {
        let output = Fixture::new()
            .generate(&settings(&["swift-53", "linux"], true))
            .expect("generation succeeds");
        assert!(output.header.starts_with("[comment]: <> (Header Generated by ActionStatus"));
        assert!(output.header.ends_with(HEADER_DELIMITER));
    }

    #[test]
    fn empty_selection_still_renders_valid_document() {
        let output = Fixture::new()
            .generate(&settings(&[], false))
            .expect("generation succeeds");
        assert!(job_ids(&output.source).is_empty());
        assert!(output.source.ends_with("jobs:\n\n"));
    }

    #[test]
    fn workflow_names_with_yaml_syntax_are_kept_verbatim() {
        let fixture = Fixture::new();
        for workflow in ["Build #2", "CI: main", "yes"] {
            let mut repository = settings(&["linux"], true);
            repository.workflow = workflow.to_owned();

            let output = fixture.generate(&repository).expect("generation succeeds");
            let document: Value =
                serde_yaml::from_str(&output.source).expect("generated YAML parses");
            assert_eq!(document.get("name").and_then(Value::as_str), Some(workflow));
            assert_eq!(job_ids(&output.source), ["linux"]);
        }
    }

    #[test]
    fn verify_rejects_truncated_name() {
        let error = verify_workflow("name: Build #2\njobs:\n", "Build #2", &[])
            .expect_err("expected name mismatch");
        assert!(matches!(error, Error::MalformedWorkflow { .. }));
        assert!(error.to_string().contains("\"Build\""));
    }

    #[test]
    fn verify_rejects_missing_jobs() {
        let catalog = Catalog::standard();
        let platforms: Vec<_> = catalog.platforms.iter().collect();
        let jobs = fold_jobs(&platforms);
        let error = verify_workflow("name: Tests\njobs:\n", "Tests", &jobs)
            .expect_err("expected mismatch");
        assert!(error.to_string().contains("expected"));
    }

    proptest! {
        #[test]
        fn generation_is_deterministic(mask in proptest::collection::vec(any::<bool>(), 20)) {
            let fixture = Fixture::new();
            let ids: Vec<&str> = fixture
                .catalog
                .ids()
                .zip(&mask)
                .filter(|(_, enabled)| **enabled)
                .map(|(id, _)| id)
                .collect();
            let repository = settings(&ids, true);

            let first = fixture.generate(&repository).expect("generation succeeds");
            let second = fixture.generate(&repository).expect("generation succeeds");
            prop_assert_eq!(&first, &second);

            let jobs = job_ids(&first.source);
            let expected_linux = ids.contains(&"linux");
            prop_assert_eq!(jobs.iter().any(|id| id == "linux"), expected_linux);
        }
    }
}
