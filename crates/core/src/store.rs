//! Full in-memory collection of loaded records.

use crate::models::{PlayerRecord, RecordId};

/// All records from the most recent successful load, in file order.
#[derive(Debug, Clone, Default)]
pub struct PlayerStore {
    records: Vec<PlayerRecord>,
}

impl PlayerStore {
    /// Build a store from freshly loaded records.
    pub fn new(records: Vec<PlayerRecord>) -> Self {
        let mut store = Self::default();
        store.replace(records);
        store
    }

    /// Discard the current contents and take ownership of `records`.
    ///
    /// Identifiers are reassigned in file order so they stay unique.
    pub fn replace(&mut self, records: Vec<PlayerRecord>) {
        self.records = records
            .into_iter()
            .enumerate()
            .map(|(index, record)| PlayerRecord {
                id: RecordId(index),
                ..record
            })
            .collect();
    }

    /// Records in file order.
    pub fn records(&self) -> &[PlayerRecord] {
        &self.records
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Look up a record by identifier.
    pub fn get(&self, id: RecordId) -> Option<&PlayerRecord> {
        // Identifiers equal positions after `replace`.
        self.records.get(id.0).filter(|record| record.id == id)
    }

    /// Mutable lookup by identifier.
    pub fn get_mut(&mut self, id: RecordId) -> Option<&mut PlayerRecord> {
        self.records.get_mut(id.0).filter(|record| record.id == id)
    }

    /// First record whose display name equals `name`.
    pub fn find_by_name_mut(&mut self, name: &str) -> Option<&mut PlayerRecord> {
        self.records
            .iter_mut()
            .find(|record| record.display_name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str) -> PlayerRecord {
        PlayerRecord {
            id: RecordId(99),
            display_name: name.to_string(),
            discord_id: None,
            last_connection: String::new(),
        }
    }

    #[test]
    fn replace_renumbers_and_discards_previous() {
        let mut store = PlayerStore::new(vec![record("Old")]);
        store.replace(vec![record("Alice"), record("Bob")]);

        assert_eq!(store.len(), 2);
        assert_eq!(store.get(RecordId(1)).map(|r| r.display_name.as_str()), Some("Bob"));
        assert!(store.get(RecordId(2)).is_none());
        assert!(store.records().iter().all(|r| r.display_name != "Old"));
    }

    #[test]
    fn finds_first_record_by_name() {
        let mut store = PlayerStore::new(vec![record("Twin"), record("Twin")]);
        let found = store.find_by_name_mut("Twin").map(|r| r.id);
        assert_eq!(found, Some(RecordId(0)));
        assert!(store.find_by_name_mut("Nobody").is_none());
    }
}
