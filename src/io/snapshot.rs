//! Roster snapshot persistence.
//!
//! The snapshot is written to a temporary file next to the target and renamed
//! into place, so readers only ever see a complete roster.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use csv::StringRecord;

use crate::domain::{ChamberProfile, RosterRecord};
use crate::error::AppError;

/// Replace the snapshot at `path` with `records`.
pub fn write_snapshot(
    path: &Path,
    profile: &ChamberProfile,
    records: &[RosterRecord],
) -> Result<(), AppError> {
    let tmp = temp_path(path);

    let result = write_rows(&tmp, profile, records).and_then(|()| {
        fs::rename(&tmp, path).map_err(|e| {
            AppError::io(format!("Failed to move snapshot into '{}': {e}", path.display()))
        })
    });

    if result.is_err() {
        let _ = fs::remove_file(&tmp);
    }
    result
}

fn write_rows(tmp: &Path, profile: &ChamberProfile, records: &[RosterRecord]) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_path(tmp)
        .map_err(|e| AppError::io(format!("Failed to create snapshot '{}': {e}", tmp.display())))?;

    writer
        .write_record(profile.snapshot_header())
        .map_err(|e| AppError::io(format!("Failed to write snapshot header: {e}")))?;

    for record in records {
        let row = profile
            .snapshot_columns
            .iter()
            .map(|column| record.snapshot_value(*column).unwrap_or_default());
        writer
            .write_record(row)
            .map_err(|e| AppError::io(format!("Failed to write snapshot row: {e}")))?;
    }

    writer
        .flush()
        .map_err(|e| AppError::io(format!("Failed to flush snapshot: {e}")))
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Load a snapshot written by [`write_snapshot`].
///
/// A missing file is reported as missing input with a hint to run the fetch.
pub fn read_snapshot(path: &Path, profile: &ChamberProfile) -> Result<Vec<RosterRecord>, AppError> {
    if !path.exists() {
        return Err(AppError::missing_input(format!(
            "Roster snapshot '{}' not found. Run `roster fetch {}` first.",
            path.display(),
            profile.chamber.to_string().to_lowercase()
        )));
    }

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| {
            AppError::missing_input(format!("Failed to open snapshot '{}': {e}", path.display()))
        })?;

    let headers = reader
        .headers()
        .map_err(|e| AppError::missing_input(format!("Failed to read snapshot header: {e}")))?
        .clone();
    let header_map = build_header_map(&headers);

    let mut columns = Vec::with_capacity(profile.snapshot_columns.len());
    for column in profile.snapshot_columns {
        let idx = header_map.get(column.header()).copied().ok_or_else(|| {
            AppError::missing_input(format!(
                "Snapshot '{}' has no '{}' column; re-run the roster fetch.",
                path.display(),
                column.header()
            ))
        })?;
        columns.push((*column, idx));
    }

    let mut records = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        // +2: header line plus 1-based numbering.
        let line = idx + 2;
        let row = result.map_err(|e| {
            AppError::missing_input(format!("Snapshot parse error on line {line}: {e}"))
        })?;

        let mut record = RosterRecord::default();
        for (column, col_idx) in &columns {
            let value = row.get(*col_idx).unwrap_or_default().to_string();
            record.set_snapshot_value(*column, value);
        }
        if record.member_id.is_empty() {
            return Err(AppError::missing_input(format!(
                "Snapshot line {line} has an empty member_id."
            )));
        }
        records.push(record);
    }

    Ok(records)
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        // Spreadsheet tools sometimes add a BOM to the first header.
        .map(|(idx, name)| (name.trim().trim_start_matches('\u{feff}').to_string(), idx))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Chamber;
    use crate::error::EXIT_MISSING_INPUT;

    fn record(id: &str, name: &str) -> RosterRecord {
        RosterRecord {
            member_id: id.into(),
            full_name: name.into(),
            first_name: name.split(' ').next().unwrap_or_default().into(),
            last_name: "Smith, Jr".into(),
            party: "Labour".into(),
            seat: "Bristol \"West\"".into(),
            membership_from: "Hereditary".into(),
        }
    }

    #[test]
    fn snapshot_round_trips_and_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lords_cache.csv");
        let profile = Chamber::Lords.profile();

        write_snapshot(&path, profile, &[record("1", "Ann Smith"), record("2", "Bob Smith")]).unwrap();
        write_snapshot(&path, profile, &[record("3", "Cat Smith")]).unwrap();

        let loaded = read_snapshot(&path, profile).unwrap();
        assert_eq!(loaded, vec![record("3", "Cat Smith")]);
        assert!(!temp_path(&path).exists());

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            text,
            "member_id,full_name,first_name,last_name,membership_type,membership_from,party\n\
             3,Cat Smith,Cat,\"Smith, Jr\",\"Bristol \"\"West\"\"\",Hereditary,Labour\n"
        );
    }

    #[test]
    fn commons_snapshot_drops_membership_from() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mps_cache.csv");
        let profile = Chamber::Commons.profile();

        write_snapshot(&path, profile, &[record("10", "Ann Smith")]).unwrap();
        let loaded = read_snapshot(&path, profile).unwrap();
        assert_eq!(loaded[0].seat, "Bristol \"West\"");
        assert_eq!(loaded[0].membership_from, "");
    }

    #[test]
    fn missing_snapshot_is_reported_with_a_hint() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_snapshot(&dir.path().join("mps_cache.csv"), Chamber::Commons.profile())
            .unwrap_err();
        assert_eq!(err.exit_code(), EXIT_MISSING_INPUT);
        assert!(err.message().contains("roster fetch commons"));
    }

    #[test]
    fn snapshot_with_foreign_header_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lords_cache.csv");
        std::fs::write(&path, "id,name\n1,Ann\n").unwrap();
        let err = read_snapshot(&path, Chamber::Lords.profile()).unwrap_err();
        assert!(err.message().contains("member_id"));
    }

    #[test]
    fn bom_prefixed_header_is_accepted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mps_cache.csv");
        std::fs::write(
            &path,
            "\u{feff}member_id,full_name,first_name,last_name,constituency_name,party\n7,Ann Lee,Ann,Lee,Leeds,Green\n",
        )
        .unwrap();
        let loaded = read_snapshot(&path, Chamber::Commons.profile()).unwrap();
        assert_eq!(loaded[0].member_id, "7");
        assert_eq!(loaded[0].seat, "Leeds");
    }
}
