//! Roster fetch: page through the member search and cache current members.

use std::path::Path;
use std::time::Duration;

use tracing::{info, warn};

use crate::data::members::{is_current, page_members, roster_record, search_page};
use crate::data::{Clock, FetchClient, Transport};
use crate::domain::{Chamber, RosterRecord};
use crate::error::AppError;
use crate::io::write_snapshot;

#[derive(Debug, Clone)]
pub struct RosterOptions {
    /// Drop members whose latest membership is inactive or has ended.
    pub active_only: bool,
    pub page_size: usize,
    /// Runaway-pagination guard; paging stops once this many members were kept.
    pub hard_cap: usize,
    /// Pause after each page.
    pub page_delay: Duration,
}

impl RosterOptions {
    pub fn for_chamber(chamber: Chamber) -> Self {
        Self {
            active_only: true,
            page_size: 20,
            hard_cap: chamber.profile().hard_cap,
            page_delay: Duration::from_millis(500),
        }
    }
}

/// Collect the roster for `chamber` without persisting it.
///
/// Paging ends on an empty page, an unusable response, or when more than
/// `hard_cap` members have been collected.
pub fn collect_roster<T: Transport, C: Clock>(
    client: &FetchClient<T, C>,
    chamber: Chamber,
    options: &RosterOptions,
) -> Vec<RosterRecord> {
    let noun = chamber.profile().member_noun;
    let page_size = options.page_size.max(1);
    let mut records: Vec<RosterRecord> = Vec::new();
    let mut skip = 0usize;

    loop {
        let Some(page) = search_page(client, chamber, skip, page_size) else {
            break;
        };
        let Some(members) = page_members(&page) else {
            break;
        };
        if members.is_empty() {
            break;
        }

        let before = records.len();
        records.extend(
            members
                .into_iter()
                .filter(|m| !options.active_only || is_current(m))
                .filter_map(|m| roster_record(m, chamber)),
        );
        info!(
            skip,
            kept = records.len() - before,
            total = records.len(),
            "Retrieved current {noun}s"
        );

        skip += page_size;
        client.pause(options.page_delay);

        if records.len() > options.hard_cap {
            warn!(
                total = records.len(),
                hard_cap = options.hard_cap,
                "Retrieved more {noun}s than expected, stopping"
            );
            break;
        }
    }

    records
}

/// Collect the roster and replace the snapshot at `snapshot_path`.
pub fn fetch_roster<T: Transport, C: Clock>(
    client: &FetchClient<T, C>,
    chamber: Chamber,
    options: &RosterOptions,
    snapshot_path: &Path,
) -> Result<Vec<RosterRecord>, AppError> {
    info!(house = %chamber, "Caching roster from API");
    let records = collect_roster(client, chamber, options);
    write_snapshot(snapshot_path, chamber.profile(), &records)?;
    info!(count = records.len(), path = %snapshot_path.display(), "Roster snapshot written");
    Ok(records)
}
