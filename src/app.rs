//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - installs the log subscriber
//! - loads settings and builds the shared fetch client
//! - runs the roster fetch or the contact enrichment

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command, EnrichArgs, FetchArgs};
use crate::config::Settings;
use crate::data::{FetchClient, HttpTransport, RetryPolicy, SystemClock};
use crate::error::AppError;

pub mod enrich;
pub mod roster;

/// Entry point for the `roster` binary.
pub fn run() -> Result<(), AppError> {
    // Usage errors exit here, before any network activity.
    let cli = Cli::parse();
    init_logging();

    let mut settings = Settings::from_env()?;
    if let Some(dir) = &cli.data_dir {
        settings = settings.with_data_dir(dir);
    }

    let transport = HttpTransport::new(&settings)?;
    let policy = RetryPolicy::default().with_max_attempts(cli.max_attempts);
    let client = FetchClient::new(transport, SystemClock, settings.api_base_url.clone(), policy);

    match cli.command {
        Command::Fetch(args) => handle_fetch(&client, &settings, &args),
        Command::Enrich(args) => handle_enrich(&client, &settings, &args),
    }
}

/// Log to stderr, `RUST_LOG` overriding the default `info` level.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn handle_fetch(
    client: &FetchClient<HttpTransport, SystemClock>,
    settings: &Settings,
    args: &FetchArgs,
) -> Result<(), AppError> {
    let profile = args.chamber.profile();
    let options = roster::RosterOptions {
        active_only: !args.include_inactive,
        page_size: usize::from(args.page_size),
        ..roster::RosterOptions::for_chamber(args.chamber)
    };

    let records = roster::fetch_roster(client, args.chamber, &options, &settings.snapshot_path(profile))?;

    println!(
        "Cached {} {}s to {}",
        records.len(),
        profile.member_noun,
        settings.snapshot_path(profile).display()
    );
    println!("\n{}", format_roster_preview(&records, 10));
    Ok(())
}

fn handle_enrich(
    client: &FetchClient<HttpTransport, SystemClock>,
    settings: &Settings,
    args: &EnrichArgs,
) -> Result<(), AppError> {
    let options = enrich::EnrichOptions {
        start_index: args.start_index,
        max_count: args.limit(),
        ..enrich::EnrichOptions::default()
    };
    let noun = args.chamber.profile().member_noun;
    match options.max_count {
        Some(n) => println!("Starting from {noun} index {}, processing {n} {noun}s", options.start_index),
        None => println!("Starting from {noun} index {}, processing all remaining {noun}s", options.start_index),
    }

    let stop = install_interrupt_flag()?;
    let summary = enrich::enrich(client, settings, args.chamber, &options, &stop)?;

    println!("{}", format_enrich_summary(&summary));
    Ok(())
}

/// Ctrl-C raises the returned flag; the enrich loop stops before the next record.
fn install_interrupt_flag() -> Result<Arc<AtomicBool>, AppError> {
    let stop = Arc::new(AtomicBool::new(false));
    let handler_flag = Arc::clone(&stop);
    ctrlc::set_handler(move || handler_flag.store(true, Ordering::SeqCst))
        .map_err(|e| AppError::runtime(format!("Failed to install interrupt handler: {e}")))?;
    Ok(stop)
}

/// Closing line of an enrich run.
pub fn format_enrich_summary(summary: &enrich::EnrichSummary) -> String {
    if summary.interrupted {
        format!(
            "Interrupted after {} rows. Check {} for partial results.",
            summary.written,
            summary.output_path.display()
        )
    } else {
        format!(
            "All done! {} rows written to {}",
            summary.written,
            summary.output_path.display()
        )
    }
}

/// One line per record: `first last (party) - seat [ID: id]`.
pub fn format_roster_preview(records: &[crate::domain::RosterRecord], limit: usize) -> String {
    let mut out = String::from("First few records:");
    for (i, r) in records.iter().take(limit).enumerate() {
        out.push_str(&format!(
            "\n{}. {} {} ({}) - {} [ID: {}]",
            i + 1,
            r.first_name,
            r.last_name,
            r.party,
            r.seat,
            r.member_id
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RosterRecord;

    #[test]
    fn preview_lists_at_most_limit_records() {
        let records: Vec<RosterRecord> = (1..=12)
            .map(|i| RosterRecord {
                member_id: i.to_string(),
                first_name: "Ann".into(),
                last_name: "Lee".into(),
                party: "Green".into(),
                seat: "Leeds".into(),
                ..RosterRecord::default()
            })
            .collect();

        let preview = format_roster_preview(&records, 10);
        assert_eq!(preview.lines().count(), 11);
        assert!(preview.contains("\n1. Ann Lee (Green) - Leeds [ID: 1]"));
        assert!(!preview.contains("[ID: 11]"));
    }

    #[test]
    fn interrupted_summary_points_at_partial_results() {
        let summary = enrich::EnrichSummary {
            output_path: "out/uk_mps_complete.csv".into(),
            selected: 5,
            written: 2,
            interrupted: true,
        };
        assert_eq!(
            format_enrich_summary(&summary),
            "Interrupted after 2 rows. Check out/uk_mps_complete.csv for partial results."
        );

        let done = enrich::EnrichSummary {
            written: 5,
            interrupted: false,
            ..summary
        };
        assert_eq!(
            format_enrich_summary(&done),
            "All done! 5 rows written to out/uk_mps_complete.csv"
        );
    }

    #[test]
    fn interrupt_flag_starts_lowered() {
        // Only one handler may be registered per process.
        let stop = install_interrupt_flag().unwrap();
        assert!(!stop.load(Ordering::SeqCst));
    }
}
