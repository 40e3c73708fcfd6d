mod configuration;
mod feed_reader;

use anyhow::{Context, Result};
use clap::Parser;
use configuration::{Args, Configuration};
use gtfs_validator_core::{FeedLoader, HhMmSsCodec, ValidationReport};
use log::info;

fn validate(configuration: &Configuration) -> Result<ValidationReport> {
    let feed = feed_reader::read_feed(&configuration.input)?;
    let mut loader = FeedLoader::new(configuration.validation.clone(), &HhMmSsCodec)
        .exclude(&feed.invalid_files);
    for (file, rows) in &feed.files {
        loader.load_file(*file, rows)?;
    }
    Ok(loader.finish().report())
}

fn main() -> Result<()> {
    env_logger::init();

    let configuration = Configuration::from_args(Args::parse())?;
    let report = validate(&configuration)?;
    info!(
        "{} errors, {} warnings, {} infos",
        report.error_count, report.warning_count, report.info_count
    );

    let json = serde_json::to_string_pretty(&report)?;
    match &configuration.output {
        Some(path) => std::fs::write(path, json)
            .with_context(|| format!("cannot write the report to {}", path.display()))?,
        None => println!("{}", json),
    }
    Ok(())
}
