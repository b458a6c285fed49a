//! Shared domain models.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable identifier assigned to each record when a file is loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RecordId(pub usize);

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One player's normalized entry from the export file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerRecord {
    /// Identifier used to match edits back to the store.
    pub id: RecordId,
    /// Human-readable player name.
    pub display_name: String,
    /// Discord identifier extracted from the player's id list, if any.
    pub discord_id: Option<String>,
    /// Last connection as a formatted string. Freely editable after load.
    pub last_connection: String,
}

impl PlayerRecord {
    /// Text shown for the given column.
    pub fn cell(&self, column: Column) -> &str {
        match column {
            Column::Name => &self.display_name,
            Column::DiscordId => self.discord_id.as_deref().unwrap_or(""),
            Column::LastConnection => &self.last_connection,
        }
    }

    /// The three cells in column order.
    pub fn cells(&self) -> [&str; 3] {
        Column::ALL.map(|column| self.cell(column))
    }
}

/// Columns of the player table, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Column {
    /// Player display name.
    Name,
    /// Discord identifier.
    DiscordId,
    /// Last connection date.
    LastConnection,
}

impl Column {
    /// Every column in the fixed display order.
    pub const ALL: [Column; 3] = [Column::Name, Column::DiscordId, Column::LastConnection];

    /// Heading shown above the table column.
    pub fn heading(self) -> &'static str {
        match self {
            Column::Name => "Player Name",
            Column::DiscordId => "Discord ID",
            Column::LastConnection => "Last Connection Date",
        }
    }

    /// Header written to the CSV export.
    pub fn csv_header(self) -> &'static str {
        match self {
            Column::Name => "playername",
            Column::DiscordId => "discordID",
            Column::LastConnection => "lastConnectionDate",
        }
    }

    /// Position of the column in the table, starting at zero.
    pub fn index(self) -> usize {
        match self {
            Column::Name => 0,
            Column::DiscordId => 1,
            Column::LastConnection => 2,
        }
    }

    /// Column at the given position, if any.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_discord_id_renders_empty() {
        let record = PlayerRecord {
            id: RecordId(0),
            display_name: "Alice".to_string(),
            discord_id: None,
            last_connection: "1970-01-01 00:00:00".to_string(),
        };
        assert_eq!(record.cells(), ["Alice", "", "1970-01-01 00:00:00"]);
    }

    #[test]
    fn column_lookup_by_index() {
        assert_eq!(Column::from_index(1), Some(Column::DiscordId));
        assert_eq!(Column::from_index(3), None);
        assert!(Column::ALL
            .iter()
            .all(|column| Column::from_index(column.index()) == Some(*column)));
    }
}
