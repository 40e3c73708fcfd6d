use anyhow::{Context, Result};
use clap::Parser;
use gtfs_validator_core::{DependencyTree, ValidationConfig};
use std::path::PathBuf;

/// Validates a GTFS feed and writes the notices as JSON
#[derive(Debug, Parser)]
#[command(name = "gtfs-validator")]
#[command(version)]
pub struct Args {
    /// Directory or zip archive holding the feed
    #[arg(long)]
    pub input: PathBuf,

    /// Where to write the report. Standard output if not given
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// JSON description of the dependencies between files, replacing the GTFS one
    #[arg(long, value_name = "FILE")]
    pub dependencies: Option<PathBuf>,

    /// Only check overlaps of trips of a block sharing the same service_id
    #[arg(long)]
    pub no_calendar_overlap: bool,
}

pub struct Configuration {
    pub input: PathBuf,
    pub output: Option<PathBuf>,
    pub validation: ValidationConfig,
}

impl Configuration {
    pub fn from_args(args: Args) -> Result<Self> {
        let mut validation =
            ValidationConfig::default().calendar_aware_block_overlap(!args.no_calendar_overlap);
        if let Some(path) = &args.dependencies {
            let tree = DependencyTree::from_path(path)
                .with_context(|| format!("invalid dependency description {}", path.display()))?;
            validation = validation.dependency_tree(tree);
        }
        Ok(Configuration {
            input: args.input,
            output: args.output,
            validation,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arguments() {
        let args = Args::parse_from(["gtfs-validator", "--input", "feed.zip", "--no-calendar-overlap"]);
        let configuration = Configuration::from_args(args).unwrap();
        assert_eq!(PathBuf::from("feed.zip"), configuration.input);
        assert!(configuration.output.is_none());
        assert!(!configuration.validation.calendar_aware_block_overlap);
        assert!(configuration.validation.dependency_tree.is_none());
    }

    #[test]
    fn missing_dependency_description() {
        let args = Args::parse_from([
            "gtfs-validator",
            "--input",
            "feed",
            "--dependencies",
            "does/not/exist.json",
        ]);
        assert!(Configuration::from_args(args).is_err());
    }
}
