//! View-model tying the store, filter, sort, edit, and export together.
//!
//! [`Roster`] owns the full [`PlayerStore`] and the active view. The view
//! is a list of record ids into the store, so it can only ever differ from
//! the store in membership and order, never in content. Every mutation of
//! the store or of the filter text re-derives the view.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::{
    config::{AppConfig, EditMatch, SortBehavior},
    editor::{EditDraft, EditOutcome},
    error::{ExportError, LoadError},
    export::{self, ExportOutcome},
    filter::filter_records,
    loader,
    models::{Column, PlayerRecord, RecordId},
    store::PlayerStore,
};

/// Direction of the active sort.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    /// A to Z.
    Ascending,
    /// Z to A.
    Descending,
}

impl SortDirection {
    /// The opposite direction.
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    /// Marker shown next to the sorted heading.
    pub fn marker(self) -> &'static str {
        match self {
            SortDirection::Ascending => "▲",
            SortDirection::Descending => "▼",
        }
    }
}

/// Column and direction of the active sort.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortState {
    /// Sorted column.
    pub column: Column,
    /// Sort direction.
    pub direction: SortDirection,
}

/// Loaded players plus the filtered and sorted view shown in the table.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    store: PlayerStore,
    view: Vec<RecordId>,
    filter: String,
    sort: Option<SortState>,
    sort_behavior: SortBehavior,
    edit_match: EditMatch,
    source: Option<PathBuf>,
}

impl Roster {
    /// Empty roster using the rules from `config`.
    pub fn new(config: &AppConfig) -> Self {
        Self::with_rules(config.sort_behavior, config.edit_match)
    }

    /// Empty roster with explicit sort and edit rules.
    pub fn with_rules(sort_behavior: SortBehavior, edit_match: EditMatch) -> Self {
        Self {
            sort_behavior,
            edit_match,
            ..Self::default()
        }
    }

    /// Load a player export from disk, replacing the store on success.
    ///
    /// On failure the current records are left exactly as they were.
    pub fn load_file(&mut self, path: impl AsRef<Path>) -> Result<usize, LoadError> {
        let path = path.as_ref();
        let records = loader::load_players(path)?;
        self.replace_records(records, Some(path.to_path_buf()));
        Ok(self.store.len())
    }

    /// Replace every record, clear the sort, and re-apply the current filter.
    pub fn replace_records(&mut self, records: Vec<PlayerRecord>, source: Option<PathBuf>) {
        self.store.replace(records);
        self.source = source;
        self.sort = None;
        self.refresh();
        info!(
            total = self.store.len(),
            visible = self.view.len(),
            "Store replaced"
        );
    }

    /// File the current records came from.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// The full store.
    pub fn store(&self) -> &PlayerStore {
        &self.store
    }

    /// Current filter text.
    pub fn filter_text(&self) -> &str {
        &self.filter
    }

    /// Change the filter text and re-derive the view.
    pub fn set_filter(&mut self, text: impl Into<String>) {
        self.filter = text.into();
        self.refresh();
        debug!(filter = %self.filter, visible = self.view.len(), "Filter applied");
    }

    /// Active sort, if any.
    pub fn sort(&self) -> Option<SortState> {
        self.sort
    }

    /// Number of rows in the active view.
    pub fn len(&self) -> usize {
        self.view.len()
    }

    /// Whether the active view is empty.
    pub fn is_empty(&self) -> bool {
        self.view.is_empty()
    }

    /// Record shown at `row` in the active view.
    pub fn row(&self, row: usize) -> Option<&PlayerRecord> {
        self.view.get(row).and_then(|id| self.store.get(*id))
    }

    /// Records of the active view in display order.
    pub fn rows(&self) -> impl Iterator<Item = &PlayerRecord> + '_ {
        self.view.iter().filter_map(|id| self.store.get(*id))
    }

    /// Row index of a record in the active view.
    pub fn position(&self, id: RecordId) -> Option<usize> {
        self.view.iter().position(|candidate| *candidate == id)
    }

    /// Sort the view by the rendered text of `column`.
    ///
    /// With [`SortBehavior::Toggle`] a repeat on the sorted column flips the
    /// direction; otherwise every call sorts ascending.
    pub fn sort_by(&mut self, column: Column) -> SortState {
        let direction = match (self.sort_behavior, self.sort) {
            (SortBehavior::Toggle, Some(current)) if current.column == column => {
                current.direction.flipped()
            }
            _ => SortDirection::Ascending,
        };
        let state = SortState { column, direction };
        self.sort = Some(state);
        self.apply_sort();
        debug!(?column, ?direction, "View sorted");
        state
    }

    /// Snapshot the record at `row` for editing.
    pub fn begin_edit(&self, row: usize) -> Option<EditDraft> {
        self.row(row).map(EditDraft::from_record)
    }

    /// Write an edit back to the store and refresh the view.
    pub fn commit_edit(&mut self, draft: &EditDraft) -> EditOutcome {
        let outcome = draft.apply(&mut self.store, self.edit_match);
        if let EditOutcome::Updated(_) = outcome {
            self.refresh();
        }
        outcome
    }

    /// Export the active view in display order.
    pub fn export_csv(&self, path: impl AsRef<Path>) -> Result<ExportOutcome, ExportError> {
        export::write_csv(path, self.rows())
    }

    fn refresh(&mut self) {
        self.view = filter_records(self.store.records(), &self.filter);
        self.apply_sort();
    }

    fn apply_sort(&mut self) {
        let Some(SortState { column, direction }) = self.sort else {
            return;
        };
        let store = &self.store;
        let key = |id: &RecordId| store.get(*id).map(|record| record.cell(column)).unwrap_or("");
        self.view.sort_by(|a, b| {
            let ordering = key(a).cmp(key(b));
            match direction {
                SortDirection::Ascending => ordering,
                SortDirection::Descending => ordering.reverse(),
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;
    use tempfile::tempdir;

    fn record(name: &str, discord: Option<&str>, last: &str) -> PlayerRecord {
        PlayerRecord {
            id: RecordId(0),
            display_name: name.to_string(),
            discord_id: discord.map(str::to_string),
            last_connection: last.to_string(),
        }
    }

    fn roster(names: &[&str]) -> Roster {
        let mut roster = Roster::default();
        roster.replace_records(
            names
                .iter()
                .map(|name| record(name, None, "1970-01-01 00:00:00"))
                .collect(),
            None,
        );
        roster
    }

    fn names(roster: &Roster) -> Vec<&str> {
        roster.rows().map(|r| r.display_name.as_str()).collect()
    }

    #[test]
    fn filter_is_live_and_preserves_order() {
        let mut roster = roster(&["Alice", "Bob", "Malik"]);
        roster.set_filter("al");
        assert_eq!(names(&roster), vec!["Alice", "Malik"]);
        assert_eq!(roster.store().len(), 3);

        roster.set_filter("");
        assert_eq!(names(&roster), vec!["Alice", "Bob", "Malik"]);
    }

    #[test]
    fn sort_reorders_without_touching_store() {
        let mut roster = roster(&["Bob", "Alice"]);
        let state = roster.sort_by(Column::Name);
        assert_eq!(state.direction, SortDirection::Ascending);
        assert_eq!(names(&roster), vec!["Alice", "Bob"]);

        let stored: Vec<&str> = roster
            .store()
            .records()
            .iter()
            .map(|r| r.display_name.as_str())
            .collect();
        assert_eq!(stored, vec!["Bob", "Alice"]);
    }

    #[test]
    fn toggle_flips_on_repeat() {
        let mut roster = roster(&["Bob", "Alice", "Carol"]);
        roster.sort_by(Column::Name);
        let state = roster.sort_by(Column::Name);
        assert_eq!(state.direction, SortDirection::Descending);
        assert_eq!(names(&roster), vec!["Carol", "Bob", "Alice"]);

        let state = roster.sort_by(Column::DiscordId);
        assert_eq!(state.direction, SortDirection::Ascending);
    }

    #[test]
    fn always_ascending_never_flips() {
        let mut roster = Roster::with_rules(SortBehavior::AlwaysAscending, EditMatch::RecordId);
        roster.replace_records(
            vec![record("Bob", None, ""), record("Alice", None, "")],
            None,
        );
        roster.sort_by(Column::Name);
        let state = roster.sort_by(Column::Name);
        assert_eq!(state.direction, SortDirection::Ascending);
        assert_eq!(names(&roster), vec!["Alice", "Bob"]);
    }

    #[test]
    fn dates_sort_as_text() {
        let mut roster = Roster::default();
        roster.replace_records(
            vec![
                record("a", None, "2024-10-01 00:00:00"),
                record("b", None, "02/01/2024"),
                record("c", None, "2024-09-01 00:00:00"),
            ],
            None,
        );
        roster.sort_by(Column::LastConnection);
        assert_eq!(names(&roster), vec!["b", "c", "a"]);
    }

    #[test]
    fn filter_keeps_active_sort() {
        let mut roster = roster(&["Malik", "Bob", "Alice"]);
        roster.sort_by(Column::Name);
        roster.set_filter("AL");
        assert_eq!(names(&roster), vec!["Alice", "Malik"]);
    }

    #[test]
    fn edit_updates_store_and_view() {
        let mut roster = roster(&["Alice", "Bob"]);
        let mut draft = roster.begin_edit(1).expect("row 1 exists");
        draft.set_value(Column::DiscordId, "987654");

        assert_eq!(roster.commit_edit(&draft), EditOutcome::Updated(RecordId(1)));
        assert_eq!(
            roster.store().records()[1].discord_id.as_deref(),
            Some("987654")
        );
        assert_eq!(roster.row(1).map(|r| r.cell(Column::DiscordId)), Some("987654"));
    }

    #[test]
    fn edit_reapplies_active_sort() {
        let mut roster = roster(&["Bob", "Alice", "Carol"]);
        roster.sort_by(Column::Name);
        assert_eq!(names(&roster), vec!["Alice", "Bob", "Carol"]);

        let mut draft = roster.begin_edit(0).expect("row 0 exists");
        draft.set_value(Column::Name, "Dave");
        assert_eq!(roster.commit_edit(&draft), EditOutcome::Updated(RecordId(1)));

        assert_eq!(names(&roster), vec!["Bob", "Carol", "Dave"]);
        assert_eq!(roster.position(RecordId(1)), Some(2));
    }

    #[test]
    fn edit_of_renamed_record_is_ignored() {
        let mut roster = roster(&["Alice", "Bob"]);
        let stale = roster.begin_edit(0).expect("row 0 exists");

        let mut rename = stale.clone();
        rename.set_value(Column::Name, "Alicia");
        roster.commit_edit(&rename);

        let mut late = stale;
        late.set_value(Column::DiscordId, "1");
        let before = roster.store().records().to_vec();
        assert_eq!(roster.commit_edit(&late), EditOutcome::NoMatch);
        assert_eq!(roster.store().records(), before.as_slice());
    }

    #[test]
    fn edit_can_drop_row_from_filtered_view() {
        let mut roster = roster(&["Alice", "Bob"]);
        roster.set_filter("ali");
        let mut draft = roster.begin_edit(0).expect("row 0 exists");
        draft.set_value(Column::Name, "Zed");
        roster.commit_edit(&draft);
        assert!(roster.is_empty());
        assert_eq!(roster.store().records()[0].display_name, "Zed");
    }

    #[test]
    fn failed_load_keeps_previous_store() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let bad = dir.path().join("bad.json");
        fs::write(&bad, "{ not json")?;

        let mut roster = roster(&["Alice"]);
        assert!(roster.load_file(&bad).is_err());
        assert_eq!(names(&roster), vec!["Alice"]);
        assert_eq!(roster.source(), None);
        Ok(())
    }

    #[test]
    fn load_reapplies_filter_and_clears_sort() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("players.json");
        fs::write(
            &path,
            json!({ "players": [
                { "displayName": "Zoe" },
                { "displayName": "Alan" },
                { "displayName": "Bob" }
            ]})
            .to_string(),
        )?;

        let mut roster = roster(&["Old"]);
        roster.sort_by(Column::Name);
        roster.set_filter("o");

        assert_eq!(roster.load_file(&path)?, 3);
        assert_eq!(roster.sort(), None);
        assert_eq!(roster.filter_text(), "o");
        assert_eq!(names(&roster), vec!["Zoe", "Bob"]);
        assert_eq!(roster.source(), Some(path.as_path()));
        Ok(())
    }

    #[test]
    fn load_then_export_round_trips() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let input = dir.path().join("players.json");
        fs::write(
            &input,
            json!({ "players": [
                { "displayName": "Bob", "tsLastConnection": 0, "ids": ["discord:2"] },
                { "displayName": "Alice", "ids": ["steam:1"] },
                { "tsLastConnection": 60 }
            ]})
            .to_string(),
        )?;

        let mut roster = Roster::default();
        roster.load_file(&input)?;
        let output = dir.path().join("players.csv");
        let outcome = roster.export_csv(&output)?;
        assert!(matches!(outcome, ExportOutcome::Written { rows: 3, .. }));

        let content = fs::read_to_string(&output)?;
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(
            lines,
            vec![
                "playername,discordID,lastConnectionDate",
                "Bob,2,1970-01-01 00:00:00",
                "Alice,,1970-01-01 00:00:00",
                "N/A,,1970-01-01 00:01:00",
            ]
        );
        Ok(())
    }

    #[test]
    fn export_follows_display_order_and_filter() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let mut roster = roster(&["Malik", "Bob", "Alice"]);
        roster.set_filter("al");
        roster.sort_by(Column::Name);

        let output = dir.path().join("filtered.csv");
        roster.export_csv(&output)?;
        let content = fs::read_to_string(&output)?;
        assert_eq!(content.lines().count(), 3);
        assert!(content.lines().nth(1).unwrap_or_default().starts_with("Alice,"));

        roster.set_filter("nobody");
        let empty = dir.path().join("empty.csv");
        assert_eq!(roster.export_csv(&empty)?, ExportOutcome::NothingToExport);
        assert!(!empty.exists());
        Ok(())
    }
}
