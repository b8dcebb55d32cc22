//! Display-name splitting.

/// Honorifics and styles stripped from the front of a display name.
///
/// Order matters: a prefix that contains another one (e.g. "The Rt Hon " and
/// "Rt Hon ", "Viscountess " and "Viscount ") must be listed such that the
/// first match is the one we want. Only the first match is ever stripped.
const TITLES: &[&str] = &[
    "The Rt Hon ",
    "Rt Hon ",
    "Sir ",
    "Dame ",
    "Dr ",
    "Mr ",
    "Ms ",
    "Mrs ",
    "Miss ",
    "Lord ",
    "Lady ",
    "Baroness ",
    "Baron ",
    "Earl ",
    "Countess ",
    "Viscount ",
    "Viscountess ",
    "Duke ",
    "Duchess ",
    "Marquess ",
    "Marchioness ",
    "Rev ",
    "Revd ",
    "Father ",
    "Mother ",
    "Professor ",
    "Prof ",
    "Colonel ",
    "Major ",
    "Captain ",
    "Lieutenant ",
    "Admiral ",
    "General ",
    "Air Marshal ",
    "Group Captain ",
    "Wing Commander ",
    "Squadron Leader ",
];

/// Split a display name into `(first, last)` after removing one known title.
///
/// The remainder is split on its first space; everything after it is the last
/// name. A single-token name yields an empty last name. Never fails.
pub fn split_name(full_name: &str) -> (String, String) {
    let mut name = full_name.trim();
    if let Some(rest) = TITLES.iter().find_map(|title| name.strip_prefix(title)) {
        name = rest.trim();
    }

    match name.split_once(' ') {
        Some((first, last)) => (first.trim().to_string(), last.trim().to_string()),
        None => (name.to_string(), String::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn split(s: &str) -> (String, String) {
        split_name(s)
    }

    #[test]
    fn strips_the_most_specific_title() {
        assert_eq!(split("The Rt Hon Jane Ann Smith"), ("Jane".into(), "Ann Smith".into()));
        assert_eq!(split("Rt Hon Jane Smith"), ("Jane".into(), "Smith".into()));
    }

    #[test]
    fn single_token_has_empty_last_name() {
        assert_eq!(split("Smith"), ("Smith".into(), String::new()));
        assert_eq!(split("Sir Smith"), ("Smith".into(), String::new()));
    }

    #[test]
    fn already_normalized_names_are_unchanged() {
        let (first, last) = split("Jane Smith");
        assert_eq!((first.as_str(), last.as_str()), ("Jane", "Smith"));
        let joined = format!("{first} {last}");
        assert_eq!(split(&joined), (first, last));
    }

    #[test]
    fn only_one_title_is_stripped() {
        // "Sir " is removed; "Dr " then remains part of the name.
        assert_eq!(split("Sir Dr John Smith"), ("Dr".into(), "John Smith".into()));
    }

    #[test]
    fn titles_must_match_case_and_trailing_space() {
        assert_eq!(split("Lordship Smith"), ("Lordship".into(), "Smith".into()));
        assert_eq!(split("sir John Smith"), ("sir".into(), "John Smith".into()));
    }

    #[test]
    fn viscountess_is_not_mistaken_for_viscount() {
        // "Viscount " does not match "Viscountess Jones" because of the space.
        assert_eq!(split("Viscountess Jones"), ("Jones".into(), String::new()));
    }

    #[test]
    fn blank_input_yields_empty_parts() {
        assert_eq!(split(""), (String::new(), String::new()));
        assert_eq!(split("   \t "), (String::new(), String::new()));
    }

    #[test]
    fn surrounding_whitespace_is_ignored() {
        assert_eq!(split("  Baroness Ann   Jones  "), ("Ann".into(), "Jones".into()));
    }
}
