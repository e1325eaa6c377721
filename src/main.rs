//! Command-line interface for the asgen binary.
//!
//! The CLI loads a settings document, generates workflows and README headers
//! for the configured repositories and writes them into local checkouts. It
//! also exposes the option catalog and per-repository toggle vectors as JSON.

use std::{
    io::{self, Write},
    path::{Path, PathBuf},
    process
};

use asgen::{
    Catalog, CatalogItem, Error, ExportReport, GeneratedOutput, GithubLinks, OptionSet,
    RepositoryRef, RepositorySettings, SettingsDocument, export_output, load_settings,
    output_error, to_toggle_vector
};
use clap::{ArgAction, Args, Parser, Subcommand};
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const LOG_ENV: &str = "ASGEN_LOG";
const DEFAULT_LOG_FILTER: &str = "warn";

/// Command line interface for generating Swift package workflows.
#[derive(Debug, Parser)]
#[command(
    name = "asgen",
    version,
    about = "Generate GitHub Actions workflows and README headers"
)]
struct Cli {
    #[command(subcommand)]
    command: Command
}

/// Supported commands exposed by the CLI.
#[derive(Debug, Subcommand)]
enum Command {
    /// Generate workflows and README headers for configured repositories.
    Generate(GenerateArgs),
    /// Print the option catalog as JSON.
    Catalog(CatalogArgs),
    /// Print the toggle vectors of one repository as JSON.
    Toggles(TogglesArgs)
}

#[derive(Debug, Args)]
struct GenerateArgs {
    /// Path to the YAML settings document.
    #[arg(long = "config", value_name = "PATH", env = "ASGEN_CONFIG")]
    config: PathBuf,

    /// Only generate for this `owner/name` repository.
    #[arg(long = "repository", value_name = "OWNER/NAME")]
    repository: Option<String>,

    /// Checkout to write into, overriding the configured path.
    #[arg(long = "root", value_name = "DIR")]
    root: Option<PathBuf>,

    /// Print the generated workflows instead of writing them.
    #[arg(long = "print", action = ArgAction::SetTrue)]
    print: bool
}

#[derive(Debug, Args)]
struct CatalogArgs {
    /// Settings document whose catalog should be printed.
    #[arg(long = "config", value_name = "PATH", env = "ASGEN_CONFIG")]
    config: Option<PathBuf>,

    /// Output formatted JSON for easier inspection.
    #[arg(long = "pretty", action = ArgAction::SetTrue)]
    pretty: bool
}

#[derive(Debug, Args)]
struct TogglesArgs {
    /// Path to the YAML settings document.
    #[arg(long = "config", value_name = "PATH", env = "ASGEN_CONFIG")]
    config: PathBuf,

    /// Repository whose options are converted.
    #[arg(long = "repository", value_name = "OWNER/NAME")]
    repository: String,

    /// Output formatted JSON for easier inspection.
    #[arg(long = "pretty", action = ArgAction::SetTrue)]
    pretty: bool
}

#[derive(Debug, Serialize)]
struct ToggleEntry<'a> {
    id:      &'a str,
    name:    &'a str,
    enabled: bool
}

#[derive(Debug, Serialize)]
struct ToggleReport<'a> {
    repository:     &'a RepositoryRef,
    compilers:      Vec<ToggleEntry<'a>>,
    platforms:      Vec<ToggleEntry<'a>>,
    configurations: Vec<ToggleEntry<'a>>,
    general:        Vec<ToggleEntry<'a>>
}

/// Entry point that reports errors and sets the appropriate exit status.
fn main() {
    init_tracing();
    if let Err(error) = run(Cli::parse()) {
        eprintln!("{}", error.to_display_string());
        process::exit(1);
    }
}

/// Installs the stderr subscriber filtered by `ASGEN_LOG`.
fn init_tracing() {
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(io::stderr))
        .try_init()
        .ok();
}

/// Executes the CLI using parsed arguments.
///
/// # Errors
///
/// Propagates errors from settings loading, generation and export.
fn run(cli: Cli) -> Result<(), Error> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();

    match cli.command {
        Command::Generate(args) => run_generate(&args, &mut handle),
        Command::Catalog(args) => run_catalog(&args, &mut handle),
        Command::Toggles(args) => run_toggles(&args, &mut handle)
    }
}

fn run_generate<W: Write>(args: &GenerateArgs, writer: &mut W) -> Result<(), Error> {
    let document = load_settings(&args.config)?;
    let selected = select_repositories(&document, args.repository.as_deref())?;
    if args.root.is_some() && selected.len() > 1 {
        return Err(Error::validation(
            "--root requires --repository when several repositories are configured"
        ));
    }

    let generator = document.generator();
    info!("Generating {} workflows", selected.len());

    if args.print {
        let outputs = selected
            .par_iter()
            .map(|settings| generator.generate(settings, &links_for(settings)))
            .collect::<Result<Vec<GeneratedOutput>, Error>>()?;
        return write_sources(writer, &outputs);
    }

    let reports = selected
        .par_iter()
        .map(|settings| {
            let root = checkout_root(settings, args.root.as_deref())?;
            let output = generator.generate(settings, &links_for(settings))?;
            export_output(root, &output)
        })
        .collect::<Result<Vec<ExportReport>, Error>>()?;

    serde_json::to_writer_pretty(&mut *writer, &reports)?;
    writeln!(writer).map_err(output_error)?;
    Ok(())
}

fn run_catalog<W: Write>(args: &CatalogArgs, writer: &mut W) -> Result<(), Error> {
    let catalog = match &args.config {
        Some(path) => load_settings(path)?.catalog,
        None => Catalog::standard()
    };
    write_json(writer, &catalog, args.pretty)
}

fn run_toggles<W: Write>(args: &TogglesArgs, writer: &mut W) -> Result<(), Error> {
    let document = load_settings(&args.config)?;
    let settings = select_repositories(&document, Some(&args.repository))?
        .into_iter()
        .next()
        .ok_or_else(|| Error::validation("no repository selected"))?;

    let catalog = &document.catalog;
    let options = &settings.options;
    let report = ToggleReport {
        repository:     &settings.repository,
        compilers:      toggle_entries(&catalog.compilers, options),
        platforms:      toggle_entries(&catalog.platforms, options),
        configurations: toggle_entries(&catalog.configurations, options),
        general:        toggle_entries(&catalog.general, options)
    };
    write_json(writer, &report, args.pretty)
}

fn select_repositories<'a>(
    document: &'a SettingsDocument,
    filter: Option<&str>
) -> Result<Vec<&'a RepositorySettings>, Error> {
    let Some(filter) = filter else {
        return Ok(document.repositories.iter().collect());
    };

    let reference = RepositoryRef::parse(filter)?;
    document
        .find(&reference)
        .map(|settings| vec![settings])
        .ok_or_else(|| Error::validation(format!("repository '{reference}' was not found")))
}

fn checkout_root<'a>(
    settings: &'a RepositorySettings,
    root: Option<&'a Path>
) -> Result<&'a Path, Error> {
    root.or(settings.path.as_deref()).ok_or_else(|| {
        Error::validation(format!(
            "no checkout path for '{}'; set `path` or pass --root",
            settings.repository
        ))
    })
}

fn links_for(settings: &RepositorySettings) -> GithubLinks {
    GithubLinks::new(
        &settings.repository.owner,
        &settings.repository.name,
        &settings.workflow
    )
}

fn toggle_entries<'a, T: CatalogItem>(
    catalog: &'a [T],
    options: &OptionSet
) -> Vec<ToggleEntry<'a>> {
    catalog
        .iter()
        .zip(to_toggle_vector(catalog, options))
        .map(|(item, enabled)| ToggleEntry {
            id: item.id(),
            name: item.name(),
            enabled
        })
        .collect()
}

fn write_sources<W: Write>(writer: &mut W, outputs: &[GeneratedOutput]) -> Result<(), Error> {
    for output in outputs {
        debug!("Printing workflow for {}", output.repository);
        writer
            .write_all(&output.data)
            .map_err(output_error)?;
    }
    Ok(())
}

fn write_json<W: Write, T: Serialize>(writer: &mut W, value: &T, pretty: bool) -> Result<(), Error> {
    if pretty {
        serde_json::to_writer_pretty(writer, value)?;
    } else {
        serde_json::to_writer(writer, value)?;
    }

    Ok(())
}
