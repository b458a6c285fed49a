//! Row editing.
//!
//! An [`EditDraft`] snapshots one row when the edit form opens. Saving
//! writes all three texts back into the store. The target is found either
//! by record id or by the display name captured at open time.

use tracing::{debug, info};

use crate::{
    config::EditMatch,
    models::{Column, PlayerRecord, RecordId},
    store::PlayerStore,
};

/// Pending edit of a single record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditDraft {
    target: RecordId,
    original_name: String,
    values: [String; 3],
}

/// Result of saving a draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    /// The record with this id was overwritten.
    Updated(RecordId),
    /// No record matched; nothing changed.
    NoMatch,
}

impl EditDraft {
    /// Capture the record's current cell texts.
    pub fn from_record(record: &PlayerRecord) -> Self {
        Self {
            target: record.id,
            original_name: record.display_name.clone(),
            values: record.cells().map(str::to_string),
        }
    }

    /// Record the draft was opened for.
    pub fn target(&self) -> RecordId {
        self.target
    }

    /// Display name at the time the draft was opened.
    pub fn original_name(&self) -> &str {
        &self.original_name
    }

    /// Current text of a field.
    pub fn value(&self, field: Column) -> &str {
        &self.values[field.index()]
    }

    /// Replace the text of a field.
    pub fn set_value(&mut self, field: Column, value: impl Into<String>) {
        self.values[field.index()] = value.into();
    }

    /// Write the draft into `store` using the given matching rule.
    pub fn apply(&self, store: &mut PlayerStore, rule: EditMatch) -> EditOutcome {
        let record = match rule {
            EditMatch::RecordId => store
                .get_mut(self.target)
                .filter(|record| record.display_name == self.original_name),
            EditMatch::DisplayName => store.find_by_name_mut(&self.original_name),
        };
        let Some(record) = record else {
            debug!(record = %self.target, name = %self.original_name, "edit target not found");
            return EditOutcome::NoMatch;
        };

        let discord = self.value(Column::DiscordId);
        record.display_name = self.value(Column::Name).to_string();
        record.discord_id = if discord.is_empty() {
            None
        } else {
            Some(discord.to_string())
        };
        record.last_connection = self.value(Column::LastConnection).to_string();
        info!(id = %record.id, name = %record.display_name, "record updated");
        EditOutcome::Updated(record.id)
    }
}
