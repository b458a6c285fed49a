//! Player export parsing.

use std::{fs, path::Path};

use chrono::DateTime;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::{
    error::LoadError,
    models::{PlayerRecord, RecordId},
};

/// Name used when a player entry has no `displayName`.
pub const PLACEHOLDER_NAME: &str = "N/A";
/// Prefix marking the Discord entry in a player's `ids` list.
pub const DISCORD_PREFIX: &str = "discord:";
/// Format applied to `tsLastConnection`.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Read and parse a player export from disk.
pub fn load_players(path: impl AsRef<Path>) -> Result<Vec<PlayerRecord>, LoadError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let records = parse_players(&content)?;
    info!(path = %path.display(), count = records.len(), "Player export parsed");
    Ok(records)
}

/// Parse the JSON text of a player export.
///
/// A document without a `players` key is treated as an empty export.
pub fn parse_players(content: &str) -> Result<Vec<PlayerRecord>, LoadError> {
    let document: Value = serde_json::from_str(content)?;
    if !document.is_object() {
        return Err(LoadError::NotAnObject);
    }
    let raw: RawExport = serde_json::from_value(document)?;
    let players = raw.players.unwrap_or_default();
    if players.is_empty() {
        debug!("export contains no players");
    }

    players
        .into_iter()
        .enumerate()
        .map(|(index, player)| player.normalize(RecordId(index)))
        .collect()
}

/// Format Unix seconds (UTC) as `YYYY-MM-DD HH:MM:SS`.
pub fn format_timestamp(secs: i64) -> Result<String, LoadError> {
    let stamp = DateTime::from_timestamp(secs, 0).ok_or(LoadError::Timestamp(secs))?;
    Ok(stamp.format(TIMESTAMP_FORMAT).to_string())
}

/// Return the Discord id from the first `discord:` entry, if any.
pub fn extract_discord_id<S: AsRef<str>>(ids: &[S]) -> Option<String> {
    ids.iter()
        .find_map(|entry| entry.as_ref().strip_prefix(DISCORD_PREFIX))
        .map(str::to_string)
}

#[derive(Debug, Deserialize)]
struct RawExport {
    #[serde(default)]
    players: Option<Vec<RawPlayer>>,
}

#[derive(Debug, Deserialize)]
struct RawPlayer {
    #[serde(rename = "displayName", default)]
    display_name: Option<String>,
    #[serde(rename = "tsLastConnection", default)]
    ts_last_connection: Option<f64>,
    #[serde(default)]
    ids: Option<Vec<String>>,
}

impl RawPlayer {
    fn normalize(self, id: RecordId) -> Result<PlayerRecord, LoadError> {
        // Fractional seconds are dropped.
        let secs = self.ts_last_connection.unwrap_or(0.0).trunc() as i64;
        Ok(PlayerRecord {
            id,
            display_name: self
                .display_name
                .unwrap_or_else(|| PLACEHOLDER_NAME.to_string()),
            discord_id: extract_discord_id(&self.ids.unwrap_or_default()),
            last_connection: format_timestamp(secs)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    #[test]
    fn maps_every_player_with_defaults() -> anyhow::Result<()> {
        let document = json!({
            "players": [
                {
                    "displayName": "Alice",
                    "tsLastConnection": 86400,
                    "ids": ["license:abc", "discord:111"]
                },
                { "ids": ["steam:123"] },
                { "displayName": "Carol", "tsLastConnection": 1.9 }
            ]
        });

        let records = parse_players(&document.to_string())?;
        assert_eq!(records.len(), 3);

        assert_eq!(records[0].display_name, "Alice");
        assert_eq!(records[0].discord_id.as_deref(), Some("111"));
        assert_eq!(records[0].last_connection, "1970-01-02 00:00:00");

        assert_eq!(records[1].display_name, PLACEHOLDER_NAME);
        assert_eq!(records[1].discord_id, None);
        assert_eq!(records[1].last_connection, "1970-01-01 00:00:00");

        assert_eq!(records[2].last_connection, "1970-01-01 00:00:01");
        assert_eq!(
            records.iter().map(|r| r.id).collect::<Vec<_>>(),
            vec![RecordId(0), RecordId(1), RecordId(2)]
        );
        Ok(())
    }

    #[test]
    fn missing_players_key_is_empty() -> anyhow::Result<()> {
        assert!(parse_players("{}")?.is_empty());
        assert!(parse_players(r#"{"players": null, "version": 2}"#)?.is_empty());
        Ok(())
    }

    #[test]
    fn discord_id_uses_first_prefixed_entry() {
        assert_eq!(
            extract_discord_id(&["steam:123", "discord:987654"]).as_deref(),
            Some("987654")
        );
        assert_eq!(
            extract_discord_id(&["discord:1", "discord:2"]).as_deref(),
            Some("1")
        );
        assert_eq!(extract_discord_id(&["steam:123", "xbl:5"]), None);
        assert_eq!(extract_discord_id::<&str>(&[]), None);
    }

    #[test]
    fn zero_timestamp_is_epoch() -> anyhow::Result<()> {
        assert_eq!(format_timestamp(0)?, "1970-01-01 00:00:00");
        assert_eq!(format_timestamp(1_700_000_000)?, "2023-11-14 22:13:20");
        Ok(())
    }

    #[test]
    fn out_of_range_timestamp_fails() {
        let err = format_timestamp(i64::MAX).unwrap_err();
        assert!(matches!(err, LoadError::Timestamp(_)));
    }

    #[test]
    fn rejects_malformed_documents() {
        assert!(matches!(parse_players("{ players: "), Err(LoadError::Json(_))));
        assert!(matches!(parse_players("[1, 2]"), Err(LoadError::NotAnObject)));
        assert!(matches!(
            parse_players(r#"{"players": "nope"}"#),
            Err(LoadError::Json(_))
        ));
    }

    #[test]
    fn load_reads_file_and_reports_missing_file() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("players.json");
        fs::write(
            &path,
            json!({ "players": [{ "displayName": "Bob" }] }).to_string(),
        )?;

        let records = load_players(&path)?;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].display_name, "Bob");

        let err = load_players(dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
        Ok(())
    }
}
