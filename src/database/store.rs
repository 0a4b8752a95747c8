use std::path::Path;
use std::str::FromStr;

use log::{debug, info};
use rocket::{
    http::Status,
    request::{FromRequest, Outcome},
    Request, State,
};
use sqlx::{
    pool::PoolConnection,
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteRow},
    Row, Sqlite,
};
use thiserror::Error;

use super::score::{self, ScoreId, ScoreRecord, ScoreSubmission};
use crate::config::Config;

pub type DatabasePool = sqlx::SqlitePool;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Database(#[from] sqlx::Error),
    #[error("invalid isoformat string: '{value}' ({source})")]
    Timestamp {
        value: String,
        source: chrono::ParseError,
    },
    #[error("failed to create database directory {path}: {source}")]
    Directory {
        path: String,
        source: std::io::Error,
    },
    #[error("stored score {id} has no timestamp")]
    MissingTimestamp { id: ScoreId },
    #[error("the score store is not attached to this server")]
    Unavailable,
}

pub type StoreResult<T> = Result<T, StoreError>;

const CREATE_SCORES_TABLE: &str = "CREATE TABLE IF NOT EXISTS scores (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    playerName TEXT NOT NULL,
    numDisks INTEGER NOT NULL,
    moves INTEGER NOT NULL,
    clearTime REAL NOT NULL,
    timestamp TEXT NOT NULL
)";

const CREATE_PLAYER_NAME_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS ix_scores_playerName ON scores (playerName)";

const SCORE_COLUMNS: &str = "id, playerName, numDisks, moves, clearTime, timestamp";

/// Handle to the score database, managed by Rocket for the server's lifetime.
pub struct Store {
    pool: DatabasePool,
}

impl Store {
    /// Opens (creating if needed) the database described by `config`
    /// and makes sure the `scores` table exists.
    pub async fn connect(config: &Config) -> StoreResult<Self> {
        let options = SqliteConnectOptions::from_str(&config.database_url)?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal);

        let filename = options.clone().get_filename();
        if let Some(parent) = filename.parent().filter(|p| !p.as_os_str().is_empty()) {
            create_parent_dir(parent).await?;
        }

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .connect_with(options)
            .await?;

        sqlx::query(CREATE_SCORES_TABLE).execute(&pool).await?;
        sqlx::query(CREATE_PLAYER_NAME_INDEX).execute(&pool).await?;

        info!("score store ready at {}", config.database_url);
        Ok(Self { pool })
    }

    /// Checks out a connection for the duration of one request.
    pub async fn session(&self) -> StoreResult<StoreSession> {
        let connection = self.pool.acquire().await?;
        Ok(StoreSession { connection })
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

async fn create_parent_dir(parent: &Path) -> StoreResult<()> {
    tokio::fs::create_dir_all(parent)
        .await
        .map_err(|source| StoreError::Directory {
            path: parent.display().to_string(),
            source,
        })
}

/// One pooled connection, held for a single request.
/// Dropping the session hands the connection back to the pool.
pub struct StoreSession {
    connection: PoolConnection<Sqlite>,
}

impl StoreSession {
    /// Persists a new score and returns it with its assigned id.
    pub async fn insert(&mut self, candidate: ScoreSubmission) -> StoreResult<ScoreRecord> {
        let timestamp = match score::parse_timestamp(&candidate.timestamp) {
            Ok(Some(timestamp)) => timestamp,
            Ok(None) => score::store_now(),
            Err(source) => {
                return Err(StoreError::Timestamp {
                    value: candidate.timestamp,
                    source,
                })
            }
        };

        let result = sqlx::query(
            "INSERT INTO scores (playerName, numDisks, moves, clearTime, timestamp) \
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&candidate.player_name)
        .bind(candidate.num_disks)
        .bind(candidate.moves)
        .bind(candidate.clear_time)
        .bind(score::render_timestamp(&timestamp))
        .execute(&mut *self.connection)
        .await?;

        let id = result.last_insert_rowid();
        debug!("inserted score {} for {}", id, candidate.player_name);

        Ok(ScoreRecord {
            id,
            player_name: candidate.player_name,
            num_disks: candidate.num_disks,
            moves: candidate.moves,
            clear_time: candidate.clear_time,
            timestamp,
        })
    }

    /// Every stored score, oldest first.
    pub async fn list_all(&mut self) -> StoreResult<Vec<ScoreRecord>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM scores ORDER BY id ASC",
            SCORE_COLUMNS
        ))
        .fetch_all(&mut *self.connection)
        .await?;

        rows.iter().map(read_record).collect()
    }

    pub async fn find(&mut self, id: ScoreId) -> StoreResult<Option<ScoreRecord>> {
        let row = sqlx::query(&format!("SELECT {} FROM scores WHERE id = ?", SCORE_COLUMNS))
            .bind(id)
            .fetch_optional(&mut *self.connection)
            .await?;

        row.as_ref().map(read_record).transpose()
    }
}

fn read_record(row: &SqliteRow) -> StoreResult<ScoreRecord> {
    let id: ScoreId = row.try_get("id")?;
    let timestamp: String = row.try_get("timestamp")?;
    let timestamp = match score::parse_timestamp(&timestamp) {
        Ok(Some(parsed)) => parsed,
        // Stored rows always carry a time; a blank one is corrupt.
        Ok(None) => return Err(StoreError::MissingTimestamp { id }),
        Err(source) => {
            return Err(StoreError::Timestamp {
                value: timestamp,
                source,
            })
        }
    };

    Ok(ScoreRecord {
        id,
        player_name: row.try_get("playerName")?,
        num_disks: row.try_get("numDisks")?,
        moves: row.try_get("moves")?,
        clear_time: row.try_get("clearTime")?,
        timestamp,
    })
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for StoreSession {
    type Error = StoreError;

    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        let store = match request.guard::<&State<Store>>().await {
            Outcome::Success(store) => store,
            _ => return Outcome::Error((Status::InternalServerError, StoreError::Unavailable)),
        };

        match store.session().await {
            Ok(session) => Outcome::Success(session),
            Err(error) => Outcome::Error((Status::InternalServerError, error)),
        }
    }
}
