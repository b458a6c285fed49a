//! Name filter for the active view.

use crate::models::{PlayerRecord, RecordId};

/// Identifiers of records whose display name contains `text`, ignoring case.
///
/// Empty text keeps every record. Input order is preserved.
pub fn filter_records(records: &[PlayerRecord], text: &str) -> Vec<RecordId> {
    let needle = text.to_lowercase();
    records
        .iter()
        .filter(|record| matches_name(record, &needle))
        .map(|record| record.id)
        .collect()
}

/// Whether the record's name contains an already lowercased needle.
pub fn matches_name(record: &PlayerRecord, needle: &str) -> bool {
    needle.is_empty() || record.display_name.to_lowercase().contains(needle)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records(names: &[&str]) -> Vec<PlayerRecord> {
        names
            .iter()
            .enumerate()
            .map(|(index, name)| PlayerRecord {
                id: RecordId(index),
                display_name: name.to_string(),
                discord_id: None,
                last_connection: String::new(),
            })
            .collect()
    }

    fn names(all: &[PlayerRecord], ids: &[RecordId]) -> Vec<String> {
        ids.iter()
            .map(|id| all[id.0].display_name.clone())
            .collect()
    }

    #[test]
    fn substring_match_ignores_case() {
        let all = records(&["Alice", "Bob", "Malik"]);
        let ids = filter_records(&all, "al");
        assert_eq!(names(&all, &ids), vec!["Alice", "Malik"]);

        let ids = filter_records(&all, "BO");
        assert_eq!(names(&all, &ids), vec!["Bob"]);
    }

    #[test]
    fn empty_text_keeps_everything() {
        let all = records(&["Bob", "Alice"]);
        assert_eq!(filter_records(&all, ""), vec![RecordId(0), RecordId(1)]);
    }

    #[test]
    fn no_match_is_empty() {
        let all = records(&["Alice"]);
        assert!(filter_records(&all, "zed").is_empty());
    }
}
