//! Command-line parsing for the roster tool.
//!
//! Argument validation happens here, before any settings are loaded or any
//! request is made; clap reports usage errors with exit code 2.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::Chamber;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "roster", version, about = "Parliament member roster and contact scraper")]
pub struct Cli {
    /// Directory for snapshot and output files (overrides MEMBERS_DATA_DIR).
    #[arg(long, global = true, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Attempts per API call before giving up on it.
    #[arg(long, global = true, default_value_t = 3, value_parser = clap::value_parser!(u32).range(1..))]
    pub max_attempts: u32,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Page through the member search and cache every current member.
    Fetch(FetchArgs),
    /// Look up contact details for cached members and append them to the output CSV.
    ///
    /// Resume an interrupted run by passing the number of rows already written
    /// as START_INDEX.
    Enrich(EnrichArgs),
}

#[derive(Debug, Args)]
pub struct FetchArgs {
    /// Which house to cache.
    #[arg(value_enum)]
    pub chamber: Chamber,

    /// Results requested per search page.
    #[arg(long, default_value_t = 20, value_parser = clap::value_parser!(u16).range(1..))]
    pub page_size: u16,

    /// Keep members whose membership is inactive or has ended.
    #[arg(long)]
    pub include_inactive: bool,
}

#[derive(Debug, Args)]
pub struct EnrichArgs {
    /// Which house's cached roster to enrich.
    #[arg(value_enum)]
    pub chamber: Chamber,

    /// Index of the first cached member to process.
    #[arg(default_value_t = 0)]
    pub start_index: usize,

    /// How many members to process; -1 (or omitted) means all remaining.
    #[arg(allow_negative_numbers = true, value_parser = parse_max_count)]
    pub max_count: Option<MaxCount>,
}

impl EnrichArgs {
    /// Record limit for this run, `None` meaning unbounded.
    pub fn limit(&self) -> Option<usize> {
        match self.max_count {
            Some(MaxCount::Limit(n)) => Some(n),
            Some(MaxCount::Unbounded) | None => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaxCount {
    Unbounded,
    Limit(usize),
}

fn parse_max_count(raw: &str) -> Result<MaxCount, String> {
    let n: i64 = raw
        .trim()
        .parse()
        .map_err(|_| format!("'{raw}' is not a number; use a positive count or -1 for all"))?;
    match n {
        // Zero has always meant "no limit" for this command.
        -1 | 0 => Ok(MaxCount::Unbounded),
        n if n > 0 => usize::try_from(n)
            .map(MaxCount::Limit)
            .map_err(|_| format!("'{raw}' is too large")),
        _ => Err(format!("'{raw}' is negative; use -1 to process all remaining members")),
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    fn enrich_args(argv: &[&str]) -> EnrichArgs {
        match Cli::try_parse_from(argv).unwrap().command {
            Command::Enrich(args) => args,
            other => panic!("expected enrich, got {other:?}"),
        }
    }

    #[test]
    fn enrich_defaults_to_everything_from_zero() {
        let args = enrich_args(&["roster", "enrich", "lords"]);
        assert_eq!(args.chamber, Chamber::Lords);
        assert_eq!(args.start_index, 0);
        assert_eq!(args.limit(), None);
    }

    #[test]
    fn minus_one_means_unbounded() {
        let args = enrich_args(&["roster", "enrich", "commons", "40", "-1"]);
        assert_eq!(args.start_index, 40);
        assert_eq!(args.limit(), None);

        let args = enrich_args(&["roster", "enrich", "commons", "40", "25"]);
        assert_eq!(args.limit(), Some(25));
    }

    #[test]
    fn non_numeric_arguments_are_usage_errors() {
        for argv in [
            &["roster", "enrich", "commons", "ten"][..],
            &["roster", "enrich", "commons", "0", "many"][..],
            &["roster", "enrich", "commons", "0", "-5"][..],
            &["roster", "enrich", "senate"][..],
        ] {
            let err = Cli::try_parse_from(argv).unwrap_err();
            assert_eq!(err.exit_code(), 2, "{argv:?}");
        }
    }

    #[test]
    fn fetch_accepts_global_overrides() {
        let cli = Cli::try_parse_from([
            "roster", "fetch", "commons", "--page-size", "50", "--data-dir", "cache", "--max-attempts", "5",
        ])
        .unwrap();
        assert_eq!(cli.max_attempts, 5);
        assert_eq!(cli.data_dir, Some(PathBuf::from("cache")));
        match cli.command {
            Command::Fetch(args) => {
                assert_eq!(args.chamber, Chamber::Commons);
                assert_eq!(args.page_size, 50);
                assert!(!args.include_inactive);
            }
            other => panic!("expected fetch, got {other:?}"),
        }
    }
}
