use anyhow::{bail, Context, Result};
use clap::Arg;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

use scrapedef::config::{ReaderKind, ScraperSettings};
use scrapedef::services::{input, presenter_for, reader_for, Pipeline, PipelineOutput, Presenter};
use scrapedef::{validation, DefinitionParser};

fn cli() -> clap::Command {
    clap::Command::new("scrapedef")
        .about("Extract repeated records from web pages using definition files")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("CONFIG")
                .help("Path to a YAML settings file (defaults to scraper.yml when present)"),
        )
        .arg(
            Arg::new("definition")
                .short('d')
                .long("definition")
                .value_name("DEFINITION")
                .help("Path to the definition file to apply"),
        )
        .arg(
            Arg::new("reader")
                .short('r')
                .long("reader")
                .value_name("READER")
                .value_parser(["http", "cache", "file"])
                .help("How to retrieve pages"),
        )
        .arg(
            Arg::new("format")
                .short('f')
                .long("format")
                .value_name("FORMAT")
                .value_parser(["text", "json"])
                .help("Output format"),
        )
        .arg(
            Arg::new("log_level")
                .long("log-level")
                .value_name("LEVEL")
                .default_value("warn")
                .help("Log level (trace, debug, info, warn, error); RUST_LOG overrides it"),
        )
        .arg(
            Arg::new("locations")
                .value_name("LOCATIONS")
                .num_args(0..)
                .help("URLs (or files with --reader file) to scrape; prompts on stdin when omitted"),
        )
}

#[tokio::main]
async fn main() -> Result<()> {
    let matches = cli().get_matches();

    let log_level = matches
        .get_one::<String>("log_level")
        .map(String::as_str)
        .unwrap_or("warn");
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let mut settings = ScraperSettings::load(matches.get_one::<String>("config").map(String::as_str))?;
    if let Some(definition) = matches.get_one::<String>("definition") {
        settings.definition = Some(definition.clone());
    }
    if let Some(reader) = matches.get_one::<String>("reader") {
        settings.reader = reader.parse()?;
    }
    if let Some(format) = matches.get_one::<String>("format") {
        settings.format = format.parse()?;
    }

    let definition_path = settings
        .definition
        .clone()
        .context("No definition file given; pass --definition or set `definition` in the config")?;
    let definition = DefinitionParser::from_file(&definition_path)
        .with_context(|| format!("failed to read definition {}", definition_path))?;
    tracing::info!(definition = %definition_path, reader = ?settings.reader, "scrapedef starting");

    let reader = reader_for(&settings)?;
    let pipeline = Pipeline::new(reader, Arc::new(definition), &settings);
    let presenter = presenter_for(settings.format);

    let locations: Vec<String> = matches
        .get_many::<String>("locations")
        .map(|values| values.cloned().collect())
        .unwrap_or_default();

    if locations.is_empty() {
        run_interactive(&pipeline, presenter.as_ref(), settings.reader).await
    } else {
        run_batch(&pipeline, presenter.as_ref(), settings.reader, locations).await
    }
}

/// Scrape every location given on the command line, printing results as
/// they complete
async fn run_batch(
    pipeline: &Pipeline,
    presenter: &dyn Presenter,
    reader: ReaderKind,
    locations: Vec<String>,
) -> Result<()> {
    let mut failures = 0;
    let accepted: Vec<String> = locations
        .into_iter()
        .filter(|location| match check_location(reader, location) {
            Ok(()) => true,
            Err(e) => {
                tracing::error!("{:#}", e);
                failures += 1;
                false
            }
        })
        .collect();

    let (tx, rx) = mpsc::channel(accepted.len().max(1));
    for location in accepted {
        tx.send(location).await?;
    }
    drop(tx);

    let mut outputs = pipeline.run(rx);
    while let Some(output) = outputs.recv().await {
        if !print_output(presenter, &output)? {
            failures += 1;
        }
    }

    if failures > 0 {
        bail!("{} location(s) could not be scraped", failures);
    }
    Ok(())
}

/// Ask for one location at a time, waiting for its results before asking
/// again
async fn run_interactive(pipeline: &Pipeline, presenter: &dyn Presenter, reader: ReaderKind) -> Result<()> {
    loop {
        let next = tokio::task::spawn_blocking(|| {
            let mut stdin = std::io::stdin().lock();
            let mut stdout = std::io::stdout();
            input::read_location(&mut stdin, &mut stdout)
        })
        .await??;

        let Some(location) = next else { break };
        if let Err(e) = check_location(reader, &location) {
            tracing::error!("{:#}", e);
            continue;
        }

        for output in pipeline.collect(vec![location]).await {
            print_output(presenter, &output)?;
        }
    }
    Ok(())
}

fn check_location(reader: ReaderKind, location: &str) -> Result<()> {
    if reader == ReaderKind::Http {
        validation::validate_url(location)?;
    }
    Ok(())
}

// Returns false for a failed location
fn print_output(presenter: &dyn Presenter, output: &PipelineOutput) -> Result<bool> {
    match output {
        PipelineOutput::Parsed(parsed) => {
            tracing::info!(
                location = %parsed.location,
                records = parsed.records.len(),
                size = parsed.size,
                "scraped"
            );
            print!("{}", presenter.present(parsed)?);
            Ok(true)
        }
        PipelineOutput::Failed { location, error } => {
            tracing::error!(%location, "{}", error);
            Ok(false)
        }
    }
}
