//! Contact enrichment: turn a cached roster into the enriched output file.
//!
//! Runs are resumable. Starting at index 0 recreates the output with a header;
//! any later start index appends, so a partial run is continued by passing the
//! number of rows it already wrote.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::config::Settings;
use crate::data::members::{contacts, extract_contact_info, extract_member_details, member};
use crate::data::{Clock, FetchClient, Transport};
use crate::domain::{Chamber, MemberDetails, OutputRow, RosterRecord};
use crate::error::AppError;
use crate::io::{OutputFile, read_snapshot};

/// Shared mailbox address given to members without a personal one.
const GENERIC_EMAIL: &str = "contactholmember@parliament.uk";

#[derive(Debug, Clone)]
pub struct EnrichOptions {
    pub start_index: usize,
    /// `None` processes everything from `start_index` to the end.
    pub max_count: Option<usize>,
    /// Pause between consecutive records.
    pub record_delay: Duration,
}

impl Default for EnrichOptions {
    fn default() -> Self {
        Self {
            start_index: 0,
            max_count: None,
            record_delay: Duration::from_secs(1),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichSummary {
    pub output_path: PathBuf,
    /// Records selected for this run.
    pub selected: usize,
    pub written: usize,
    /// The stop flag was raised before every selected record was processed.
    pub interrupted: bool,
}

/// The `[start, start + max)` window of `roster`, clamped to its length.
pub fn select_window(roster: &[RosterRecord], start_index: usize, max_count: Option<usize>) -> &[RosterRecord] {
    let start = start_index.min(roster.len());
    let end = match max_count {
        Some(max) => start.saturating_add(max).min(roster.len()),
        None => roster.len(),
    };
    &roster[start..end]
}

/// Enrich the cached roster for `chamber`.
///
/// `stop` is checked before each record; once raised, the run ends after the
/// record in flight and every row already written stays in place.
pub fn enrich<T: Transport, C: Clock>(
    client: &FetchClient<T, C>,
    settings: &Settings,
    chamber: Chamber,
    options: &EnrichOptions,
    stop: &AtomicBool,
) -> Result<EnrichSummary, AppError> {
    let profile = chamber.profile();
    let roster = read_snapshot(&settings.snapshot_path(profile), profile)?;
    info!(count = roster.len(), "Loaded {}s from cache", profile.member_noun);

    let selected = select_window(&roster, options.start_index, options.max_count);
    info!(
        selected = selected.len(),
        start_index = options.start_index,
        "Scraping contact details"
    );

    let output = OutputFile::new(settings.output_path(profile), profile);
    if options.start_index == 0 {
        output.start_fresh()?;
    } else {
        output.resume()?;
    }

    let mut summary = EnrichSummary {
        output_path: output.path().to_path_buf(),
        selected: selected.len(),
        written: 0,
        interrupted: false,
    };

    for (offset, record) in selected.iter().enumerate() {
        if stop.load(Ordering::SeqCst) {
            summary.interrupted = true;
            break;
        }

        let position = options.start_index + offset + 1;
        info!(
            position,
            member_id = %record.member_id,
            name = %record.full_name,
            "Processing {}",
            profile.member_noun
        );

        let row = enrich_record(client, settings, chamber, record);
        output.append(&row)?;
        summary.written += 1;
        debug!(position, path = %output.path().display(), "Row written");

        if offset + 1 < selected.len() {
            client.pause(options.record_delay);
        }
    }

    if summary.interrupted {
        warn!(
            written = summary.written,
            path = %summary.output_path.display(),
            "Interrupted; partial results kept"
        );
    }
    Ok(summary)
}

/// Fetch and merge everything known about one roster record.
pub fn enrich_record<T: Transport, C: Clock>(
    client: &FetchClient<T, C>,
    settings: &Settings,
    chamber: Chamber,
    record: &RosterRecord,
) -> OutputRow {
    let profile = chamber.profile();

    let contact_response = contacts(client, &record.member_id);
    if contact_response.is_none() {
        warn!(member_id = %record.member_id, "No contact data returned");
    }
    let contact = extract_contact_info(contact_response.as_ref());

    let details = if profile.fetch_details {
        extract_member_details(member(client, &record.member_id).as_ref())
    } else {
        MemberDetails::default()
    };

    if contact.parliament_email.is_empty() || contact.parliament_email == GENERIC_EMAIL {
        debug!(member_id = %record.member_id, "Generic email or none");
    } else {
        debug!(member_id = %record.member_id, email = %contact.parliament_email, "Personal email");
    }

    OutputRow::compose(
        profile,
        record,
        &details,
        &contact,
        &settings.contact_url(&record.member_id),
    )
}
