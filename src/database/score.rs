use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Offset, TimeZone, Utc};
use rocket::serde::{Deserialize, Serialize};

// Column types used in the `scores` table:
// id        INTEGER (i64)
// playerName TEXT   (String)
// numDisks  INTEGER (i64)
// moves     INTEGER (i64)
// clearTime REAL    (f64)
// timestamp TEXT    (RFC 3339)

pub type ScoreId = i64;

/// Offset applied to timestamps the store fills in itself (UTC+9).
pub const STORE_UTC_OFFSET_SECS: i32 = 9 * 3600;

/// A finished game as submitted by a client.
#[derive(Clone, Serialize, Deserialize, PartialEq, Debug)]
#[serde(crate = "rocket::serde", rename_all = "camelCase")]
pub struct ScoreSubmission {
    pub player_name: String,
    pub num_disks: i64,
    pub moves: i64,
    pub clear_time: f64,
    pub timestamp: String,
}

/// A score as it lives in the store.
#[derive(Clone, PartialEq, Debug)]
pub struct ScoreRecord {
    pub id: ScoreId,
    pub player_name: String,
    pub num_disks: i64,
    pub moves: i64,
    pub clear_time: f64,
    pub timestamp: DateTime<FixedOffset>,
}

/// A score as it is sent back over the wire.
#[derive(Clone, Serialize, Deserialize, PartialEq, Debug)]
#[serde(crate = "rocket::serde", rename_all = "camelCase")]
pub struct ScoreView {
    pub id: ScoreId,
    pub player_name: String,
    pub num_disks: i64,
    pub moves: i64,
    pub clear_time: f64,
    pub timestamp: String,
}

impl From<ScoreRecord> for ScoreView {
    fn from(record: ScoreRecord) -> Self {
        Self {
            id: record.id,
            timestamp: render_timestamp(&record.timestamp),
            player_name: record.player_name,
            num_disks: record.num_disks,
            moves: record.moves,
            clear_time: record.clear_time,
        }
    }
}

pub fn store_offset() -> FixedOffset {
    FixedOffset::east_opt(STORE_UTC_OFFSET_SECS).unwrap_or_else(|| Utc.fix())
}

/// Current time in the store's offset.
pub fn store_now() -> DateTime<FixedOffset> {
    Utc::now().with_timezone(&store_offset())
}

/// ISO-8601 rendering, seconds precision unless the value carries fractions.
pub fn render_timestamp(timestamp: &DateTime<FixedOffset>) -> String {
    timestamp.to_rfc3339()
}

/// Parses a client supplied timestamp.
///
/// Returns `Ok(None)` for a blank string, which leaves the choice of time to
/// the store. A trailing `Z` is read as `+00:00`. Values without an offset are
/// taken to be in the store's offset, and a bare date means midnight.
pub fn parse_timestamp(
    value: &str,
) -> Result<Option<DateTime<FixedOffset>>, chrono::ParseError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }

    let normalized = match value.strip_suffix('Z').or_else(|| value.strip_suffix('z')) {
        Some(stripped) => format!("{}+00:00", stripped),
        None => value.to_owned(),
    };

    let error = match DateTime::parse_from_rfc3339(&normalized) {
        Ok(timestamp) => return Ok(Some(timestamp)),
        Err(error) => error,
    };

    for format in &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(&normalized, format) {
            return Ok(in_store_offset(naive));
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(&normalized, "%Y-%m-%d") {
        if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
            return Ok(in_store_offset(midnight));
        }
    }

    Err(error)
}

fn in_store_offset(naive: NaiveDateTime) -> Option<DateTime<FixedOffset>> {
    store_offset().from_local_datetime(&naive).single()
}
