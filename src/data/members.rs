//! Members API endpoints and response extraction.
//!
//! The upstream schema is treated as opaque JSON. Every lookup goes through
//! the small path helpers below, so a missing or mistyped field degrades to an
//! empty string instead of an error.

use serde_json::Value;

use crate::data::client::{Clock, FetchClient, Transport};
use crate::domain::{Chamber, ContactInfo, MemberDetails, RosterRecord, split_name};

const SEARCH_ENDPOINT: &str = "Members/Search";

/// One page of the member search.
pub fn search_page<T: Transport, C: Clock>(
    client: &FetchClient<T, C>,
    chamber: Chamber,
    skip: usize,
    take: usize,
) -> Option<Value> {
    client.fetch(
        SEARCH_ENDPOINT,
        &[
            ("House", chamber.profile().house_filter.to_string()),
            ("IsEligible", "true".to_string()),
            ("skip", skip.to_string()),
            ("take", take.to_string()),
        ],
    )
}

/// Contact list for one member.
pub fn contacts<T: Transport, C: Clock>(client: &FetchClient<T, C>, member_id: &str) -> Option<Value> {
    client.fetch(&format!("Members/{member_id}/Contact"), &[])
}

/// Full detail record for one member.
pub fn member<T: Transport, C: Clock>(client: &FetchClient<T, C>, member_id: &str) -> Option<Value> {
    client.fetch(&format!("Members/{member_id}"), &[])
}

/// Member objects on a search page, or `None` when the page is unusable.
pub fn page_members(page: &Value) -> Option<Vec<&Value>> {
    let items = page.get("items")?.as_array()?;
    Some(items.iter().filter_map(|item| item.get("value")).collect())
}

/// A member is current when the latest membership is flagged active and has no end date.
pub fn is_current(member: &Value) -> bool {
    let membership = &member["latestHouseMembership"];
    let active = membership["membershipStatus"]["statusIsActive"].as_bool() == Some(true);
    let ended = !membership["membershipEndDate"].is_null();
    active && !ended
}

/// Build a roster entry from a search result. Members without an id are skipped.
pub fn roster_record(member: &Value, chamber: Chamber) -> Option<RosterRecord> {
    let member_id = scalar(&member["id"]).filter(|id| !id.is_empty())?;
    let full_name = text(&member["nameDisplayAs"]);
    let (first_name, last_name) = split_name(&full_name);
    let membership = &member["latestHouseMembership"];

    // Commons members sit for a constituency; peers carry a descriptor plus
    // the route they came in by.
    let (seat, membership_from) = match chamber {
        Chamber::Commons => (text(&membership["membershipFrom"]), String::new()),
        Chamber::Lords => (
            text(&membership["membershipFromDescription"]),
            text(&membership["membershipFrom"]),
        ),
    };

    Some(RosterRecord {
        member_id,
        full_name,
        first_name,
        last_name,
        party: text(&member["latestParty"]["name"]),
        seat,
        membership_from,
    })
}

/// Classify a contact-list response into named channels.
///
/// Entries are matched on a lower-cased `type` label. Within one category a
/// later entry overwrites an earlier one field by field, but an empty value
/// never clears a field. Unknown types are skipped.
pub fn extract_contact_info(response: Option<&Value>) -> ContactInfo {
    let mut info = ContactInfo::default();

    let Some(entries) = response.and_then(|r| r.get("value")).and_then(Value::as_array) else {
        return info;
    };

    for entry in entries.iter().filter(|e| e.is_object()) {
        let kind = text(&entry["type"]).to_lowercase();

        if kind.contains("parliamentary office") {
            assign(&mut info.parliament_email, entry, "email");
            assign(&mut info.phone, entry, "phone");
            assign(&mut info.fax, entry, "fax");
            assign(&mut info.address_line1, entry, "line1");
            assign(&mut info.address_line2, entry, "line2");
            assign(&mut info.postcode, entry, "postcode");
        } else if kind.contains("constituency office") {
            assign(&mut info.constituency_email, entry, "email");
        } else if kind.contains("website") {
            assign(&mut info.website, entry, "line1");
        } else if kind.contains("facebook") {
            assign(&mut info.facebook, entry, "line1");
        } else if kind.contains("twitter") {
            // Also covers "X (formerly Twitter)".
            assign(&mut info.twitter, entry, "line1");
        }
    }

    info
}

/// Descriptive fields from a member detail response.
///
/// A missing response keeps the defaults (active). A membership block without
/// a status is reported inactive.
pub fn extract_member_details(response: Option<&Value>) -> MemberDetails {
    let mut details = MemberDetails::default();

    let Some(value) = response.and_then(|r| r.get("value")) else {
        return details;
    };

    details.full_title = text(&value["nameFullTitle"]);
    details.gender = text(&value["gender"]);

    let membership = &value["latestHouseMembership"];
    if membership.as_object().is_some_and(|m| !m.is_empty()) {
        details.membership_type = text(&membership["membershipFrom"]);
        details.membership_start_date = text(&membership["membershipStartDate"]);
        details.is_active = membership["membershipStatus"]["statusIsActive"]
            .as_bool()
            .unwrap_or(false);
    }

    details
}

fn assign(slot: &mut String, entry: &Value, key: &str) {
    let value = text(&entry[key]);
    if !value.is_empty() {
        *slot = value;
    }
}

/// String content of a JSON value, or empty when absent or not a string.
fn text(value: &Value) -> String {
    value.as_str().map(str::to_string).unwrap_or_default()
}

/// Strings and numbers as text; ids arrive as integers.
fn scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
