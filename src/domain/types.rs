//! Shared domain types.
//!
//! The two chambers share one pipeline. Everything that differs between them
//! (search filter, runaway-pagination cap, file names, column sets, whether the
//! detail endpoint is called) lives in a static `ChamberProfile`.

use clap::ValueEnum;

/// Which house's roster to work on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum Chamber {
    Commons,
    Lords,
}

impl Chamber {
    pub const ALL: [Chamber; 2] = [Chamber::Commons, Chamber::Lords];

    pub fn profile(self) -> &'static ChamberProfile {
        match self {
            Chamber::Commons => &COMMONS,
            Chamber::Lords => &LORDS,
        }
    }
}

impl std::fmt::Display for Chamber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.profile().house_filter)
    }
}

/// Static configuration for one chamber.
#[derive(Debug)]
pub struct ChamberProfile {
    pub chamber: Chamber,
    /// Value of the `House` search filter.
    pub house_filter: &'static str,
    /// Singular noun used in progress messages.
    pub member_noun: &'static str,
    /// Stop paging once more than this many current members were collected.
    pub hard_cap: usize,
    pub snapshot_file: &'static str,
    pub output_file: &'static str,
    pub snapshot_columns: &'static [Column],
    pub output_columns: &'static [Column],
    /// Whether enrichment also calls the per-member detail endpoint.
    pub fetch_details: bool,
}

impl ChamberProfile {
    /// Header names of the snapshot file, in column order.
    pub fn snapshot_header(&self) -> Vec<&'static str> {
        self.snapshot_columns.iter().map(|c| c.header()).collect()
    }

    /// Header names of the output file, in column order.
    pub fn output_header(&self) -> Vec<&'static str> {
        self.output_columns.iter().map(|c| c.header()).collect()
    }
}

pub static COMMONS: ChamberProfile = ChamberProfile {
    chamber: Chamber::Commons,
    house_filter: "Commons",
    member_noun: "MP",
    hard_cap: 680,
    snapshot_file: "mps_cache.csv",
    output_file: "uk_mps_complete.csv",
    snapshot_columns: &[
        Column::MemberId,
        Column::FullName,
        Column::FirstName,
        Column::LastName,
        Column::ConstituencyName,
        Column::Party,
    ],
    output_columns: &[
        Column::MemberId,
        Column::ContactUrl,
        Column::FirstName,
        Column::LastName,
        Column::ConstituencyName,
        Column::Party,
        Column::ParliamentEmail,
        Column::Phone,
        Column::ConstituencyEmail,
        Column::Website,
        Column::Facebook,
        Column::Twitter,
    ],
    fetch_details: false,
};

pub static LORDS: ChamberProfile = ChamberProfile {
    chamber: Chamber::Lords,
    house_filter: "Lords",
    member_noun: "Lord",
    hard_cap: 850,
    snapshot_file: "lords_cache.csv",
    output_file: "uk_lords_complete.csv",
    snapshot_columns: &[
        Column::MemberId,
        Column::FullName,
        Column::FirstName,
        Column::LastName,
        Column::MembershipType,
        Column::MembershipFrom,
        Column::Party,
    ],
    output_columns: &[
        Column::MemberId,
        Column::ContactUrl,
        Column::FullName,
        Column::FullTitle,
        Column::FirstName,
        Column::LastName,
        Column::MembershipType,
        Column::MembershipFrom,
        Column::MembershipStartDate,
        Column::Party,
        Column::Gender,
        Column::ParliamentEmail,
        Column::Phone,
        Column::Fax,
        Column::AddressLine1,
        Column::AddressLine2,
        Column::Postcode,
        Column::Website,
        Column::Facebook,
        Column::Twitter,
        Column::IsActive,
    ],
    fetch_details: true,
};

/// Every column that can appear in a snapshot or output file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    MemberId,
    ContactUrl,
    FullName,
    FullTitle,
    FirstName,
    LastName,
    ConstituencyName,
    MembershipType,
    MembershipFrom,
    MembershipStartDate,
    Party,
    Gender,
    ParliamentEmail,
    Phone,
    Fax,
    AddressLine1,
    AddressLine2,
    Postcode,
    ConstituencyEmail,
    Website,
    Facebook,
    Twitter,
    IsActive,
}

impl Column {
    pub fn header(self) -> &'static str {
        match self {
            Column::MemberId => "member_id",
            Column::ContactUrl => "contact_url",
            Column::FullName => "full_name",
            Column::FullTitle => "full_title",
            Column::FirstName => "first_name",
            Column::LastName => "last_name",
            Column::ConstituencyName => "constituency_name",
            Column::MembershipType => "membership_type",
            Column::MembershipFrom => "membership_from",
            Column::MembershipStartDate => "membership_start_date",
            Column::Party => "party",
            Column::Gender => "gender",
            Column::ParliamentEmail => "parliament_email",
            Column::Phone => "phone",
            Column::Fax => "fax",
            Column::AddressLine1 => "address_line1",
            Column::AddressLine2 => "address_line2",
            Column::Postcode => "postcode",
            Column::ConstituencyEmail => "constituency_email",
            Column::Website => "website",
            Column::Facebook => "facebook",
            Column::Twitter => "twitter",
            Column::IsActive => "is_active",
        }
    }
}

/// One cached roster entry.
///
/// `seat` holds the constituency name for the Commons and the membership
/// descriptor for the Lords; `membership_from` is only populated for the Lords.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RosterRecord {
    pub member_id: String,
    pub full_name: String,
    pub first_name: String,
    pub last_name: String,
    pub party: String,
    pub seat: String,
    pub membership_from: String,
}

impl RosterRecord {
    /// Value persisted in the snapshot for `column`.
    ///
    /// Returns `None` for columns that are not part of any snapshot.
    pub fn snapshot_value(&self, column: Column) -> Option<&str> {
        let value = match column {
            Column::MemberId => &self.member_id,
            Column::FullName => &self.full_name,
            Column::FirstName => &self.first_name,
            Column::LastName => &self.last_name,
            Column::Party => &self.party,
            Column::ConstituencyName | Column::MembershipType => &self.seat,
            Column::MembershipFrom => &self.membership_from,
            _ => return None,
        };
        Some(value)
    }

    /// Inverse of [`RosterRecord::snapshot_value`], used when loading a snapshot.
    pub fn set_snapshot_value(&mut self, column: Column, value: String) {
        match column {
            Column::MemberId => self.member_id = value,
            Column::FullName => self.full_name = value,
            Column::FirstName => self.first_name = value,
            Column::LastName => self.last_name = value,
            Column::Party => self.party = value,
            Column::ConstituencyName | Column::MembershipType => self.seat = value,
            Column::MembershipFrom => self.membership_from = value,
            _ => {}
        }
    }
}

/// Contact channels extracted from one contact-list response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactInfo {
    pub parliament_email: String,
    pub phone: String,
    pub fax: String,
    pub address_line1: String,
    pub address_line2: String,
    pub postcode: String,
    pub constituency_email: String,
    pub website: String,
    pub facebook: String,
    pub twitter: String,
}

/// Descriptive fields from the per-member detail endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberDetails {
    pub full_title: String,
    pub gender: String,
    pub membership_type: String,
    pub membership_start_date: String,
    pub is_active: bool,
}

impl Default for MemberDetails {
    fn default() -> Self {
        Self {
            full_title: String::new(),
            gender: String::new(),
            membership_type: String::new(),
            membership_start_date: String::new(),
            is_active: true,
        }
    }
}

/// One flattened output line, values aligned with the profile's output columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputRow {
    pub values: Vec<String>,
}

impl OutputRow {
    pub fn compose(
        profile: &ChamberProfile,
        record: &RosterRecord,
        details: &MemberDetails,
        contact: &ContactInfo,
        contact_url: &str,
    ) -> Self {
        let values = profile
            .output_columns
            .iter()
            .map(|column| {
                let value: &str = match column {
                    Column::MemberId => &record.member_id,
                    Column::ContactUrl => contact_url,
                    Column::FullName => &record.full_name,
                    Column::FullTitle => &details.full_title,
                    Column::FirstName => &record.first_name,
                    Column::LastName => &record.last_name,
                    Column::ConstituencyName => &record.seat,
                    Column::MembershipType if details.membership_type.is_empty() => &record.seat,
                    Column::MembershipType => &details.membership_type,
                    Column::MembershipFrom => &record.membership_from,
                    Column::MembershipStartDate => &details.membership_start_date,
                    Column::Party => &record.party,
                    Column::Gender => &details.gender,
                    Column::ParliamentEmail => &contact.parliament_email,
                    Column::Phone => &contact.phone,
                    Column::Fax => &contact.fax,
                    Column::AddressLine1 => &contact.address_line1,
                    Column::AddressLine2 => &contact.address_line2,
                    Column::Postcode => &contact.postcode,
                    Column::ConstituencyEmail => &contact.constituency_email,
                    Column::Website => &contact.website,
                    Column::Facebook => &contact.facebook,
                    Column::Twitter => &contact.twitter,
                    // Capitalised, as earlier exports of this file spelled it.
                    Column::IsActive => {
                        if details.is_active {
                            "True"
                        } else {
                            "False"
                        }
                    }
                };
                value.to_string()
            })
            .collect();

        Self { values }
    }

    /// Value in the named output column, if the row has that column.
    pub fn get(&self, profile: &ChamberProfile, column: Column) -> Option<&str> {
        let idx = profile.output_columns.iter().position(|c| *c == column)?;
        self.values.get(idx).map(String::as_str)
    }
}
