//! SQLite persistence for the local backend
//!
//! Three tables: `users`, `predictions` and `training_data` (feedback
//! collected for retraining). One connection behind a mutex; every
//! statement is short.

use chrono::Utc;
use rusqlite::{params, Connection, ErrorCode, OptionalExtension};
use sha2::{Digest, Sha256};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use thiserror::Error;

use crate::model::{BloodGroup, HistoryEntry, Profile, User, UserId};

/// Most recent predictions returned by [`Database::history`]
pub const HISTORY_LIMIT: usize = 10;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Email already exists")]
    DuplicateEmail,

    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Database lock poisoned")]
    Lock,

    #[error("Corrupt row: {0}")]
    Corrupt(String),
}

pub type DbResult<T> = Result<T, DbError>;

/// A user row as stored
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredUser {
    pub user: User,
    pub member_since: String,
}

pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Create or open the database file
    pub fn open(path: &Path) -> DbResult<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|e| DbError::Corrupt(format!("{}: {}", parent.display(), e)))?;
        }

        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode = WAL;")?;
        Self::init(conn)
    }

    pub fn in_memory() -> DbResult<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> DbResult<Self> {
        conn.execute_batch(
            "
            PRAGMA foreign_keys = ON;

            CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                email TEXT UNIQUE NOT NULL,
                password TEXT NOT NULL,
                member_since TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS predictions (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL,
                image_path TEXT,
                predicted_blood_group TEXT NOT NULL,
                confidence REAL NOT NULL,
                actual_blood_group TEXT,
                prediction_date TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_predictions_user
                ON predictions(user_id, prediction_date);

            CREATE TABLE IF NOT EXISTS training_data (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                prediction_id INTEGER NOT NULL,
                image_path TEXT,
                actual_blood_group TEXT NOT NULL,
                added_date TEXT NOT NULL
            );
            ",
        )?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> DbResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| DbError::Lock)
    }

    pub fn create_user(&self, name: &str, email: &str, password: &str) -> DbResult<StoredUser> {
        let member_since = Utc::now().to_rfc3339();
        let conn = self.conn()?;

        let inserted = conn.execute(
            "INSERT INTO users (name, email, password, member_since) VALUES (?, ?, ?, ?)",
            params![name, email, hash_password(password), member_since],
        );

        match inserted {
            Ok(_) => Ok(StoredUser {
                user: User::new(conn.last_insert_rowid(), name, email),
                member_since,
            }),
            Err(rusqlite::Error::SqliteFailure(e, _)) if e.code == ErrorCode::ConstraintViolation => {
                Err(DbError::DuplicateEmail)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// The user with these credentials, if any
    pub fn authenticate(&self, email: &str, password: &str) -> DbResult<Option<StoredUser>> {
        let conn = self.conn()?;
        let row = conn
            .query_row(
                "SELECT id, name, email, password, member_since FROM users WHERE email = ?",
                params![email],
                |row| {
                    Ok((
                        StoredUser {
                            user: User::new(
                                row.get(0)?,
                                row.get::<_, String>(1)?,
                                row.get::<_, String>(2)?,
                            ),
                            member_since: row.get(4)?,
                        },
                        row.get::<_, String>(3)?,
                    ))
                },
            )
            .optional()?;

        Ok(row.and_then(|(user, stored)| verify_password(password, &stored).then_some(user)))
    }

    pub fn profile(&self, user_id: UserId) -> DbResult<Option<Profile>> {
        let conn = self.conn()?;
        let profile = conn
            .query_row(
                "SELECT name, email, member_since FROM users WHERE id = ?",
                params![user_id],
                |row| {
                    Ok(Profile {
                        name: row.get(0)?,
                        email: row.get(1)?,
                        member_since: row.get(2)?,
                    })
                },
            )
            .optional()?;

        Ok(profile)
    }

    /// Store a prediction and return its id
    pub fn insert_prediction(
        &self,
        user_id: UserId,
        image_path: &str,
        group: BloodGroup,
        confidence: f64,
    ) -> DbResult<i64> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO predictions (user_id, image_path, predicted_blood_group, confidence, prediction_date)
             VALUES (?, ?, ?, ?, ?)",
            params![
                user_id,
                image_path,
                group.as_str(),
                confidence,
                Utc::now().to_rfc3339()
            ],
        )?;

        Ok(conn.last_insert_rowid())
    }

    /// Newest predictions of a user, at most [`HISTORY_LIMIT`]
    pub fn history(&self, user_id: UserId) -> DbResult<Vec<HistoryEntry>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare_cached(
            "SELECT id, predicted_blood_group, confidence, prediction_date
             FROM predictions
             WHERE user_id = ?
             ORDER BY prediction_date DESC, id DESC
             LIMIT ?",
        )?;

        let rows = stmt.query_map(params![user_id, HISTORY_LIMIT as i64], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, f64>(2)?,
                row.get::<_, String>(3)?,
            ))
        })?;

        let entries = rows
            .map(|row| -> DbResult<HistoryEntry> {
                let (id, group, confidence, date) = row?;
                let result = group
                    .parse::<BloodGroup>()
                    .map_err(|e| DbError::Corrupt(e.to_string()))?;
                Ok(HistoryEntry {
                    id: Some(id),
                    result,
                    confidence,
                    date,
                })
            })
            .collect::<DbResult<Vec<_>>>()?;

        Ok(entries)
    }

    /// Record the actual group of a prediction and queue it for training
    ///
    /// Returns `false` when the prediction does not exist.
    pub fn record_feedback(&self, prediction_id: i64, actual: BloodGroup) -> DbResult<bool> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;

        let image_path: Option<Option<String>> = tx
            .query_row(
                "SELECT image_path FROM predictions WHERE id = ?",
                params![prediction_id],
                |row| row.get(0),
            )
            .optional()?;

        let Some(image_path) = image_path else {
            return Ok(false);
        };

        tx.execute(
            "UPDATE predictions SET actual_blood_group = ? WHERE id = ?",
            params![actual.as_str(), prediction_id],
        )?;
        tx.execute(
            "INSERT INTO training_data (prediction_id, image_path, actual_blood_group, added_date)
             VALUES (?, ?, ?, ?)",
            params![
                prediction_id,
                image_path,
                actual.as_str(),
                Utc::now().to_rfc3339()
            ],
        )?;
        tx.commit()?;

        tracing::info!(prediction_id, actual = %actual, "Queued training sample");
        Ok(true)
    }

    /// Rows waiting in the training queue
    pub fn training_queue_len(&self) -> DbResult<usize> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM training_data", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Cheap liveness query
    pub fn ping(&self) -> bool {
        self.conn()
            .and_then(|conn| Ok(conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))?))
            .is_ok()
    }
}

/// `salt$hex(sha256(salt || password))`
fn hash_password(password: &str) -> String {
    let salt = uuid::Uuid::new_v4().simple().to_string();
    format!("{}${}", salt, digest(&salt, password))
}

fn verify_password(password: &str, stored: &str) -> bool {
    match stored.split_once('$') {
        Some((salt, expected)) => digest(salt, password) == expected,
        None => false,
    }
}

fn digest(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signup_and_login() {
        let db = Database::in_memory().unwrap();
        let created = db.create_user("Ada", "ada@example.com", "secret").unwrap();
        assert_eq!(created.user.name, "Ada");

        let found = db.authenticate("ada@example.com", "secret").unwrap().unwrap();
        assert_eq!(found.user, created.user);
        assert!(db.authenticate("ada@example.com", "wrong").unwrap().is_none());
        assert!(db.authenticate("nobody@example.com", "secret").unwrap().is_none());
    }

    #[test]
    fn test_duplicate_email() {
        let db = Database::in_memory().unwrap();
        db.create_user("Ada", "ada@example.com", "a").unwrap();
        let err = db.create_user("Other", "ada@example.com", "b").unwrap_err();
        assert!(matches!(err, DbError::DuplicateEmail));
    }

    #[test]
    fn test_passwords_are_salted() {
        let a = hash_password("same");
        let b = hash_password("same");
        assert_ne!(a, b);
        assert!(verify_password("same", &a));
        assert!(!verify_password("same", "no-separator"));
    }

    #[test]
    fn test_history_newest_first_and_limited() {
        let db = Database::in_memory().unwrap();
        for _ in 0..12 {
            db.insert_prediction(3, "uploads/x.png", BloodGroup::BPositive, 1.0)
                .unwrap();
        }
        let last = db
            .insert_prediction(3, "uploads/y.png", BloodGroup::ONegative, 0.67)
            .unwrap();
        db.insert_prediction(4, "uploads/z.png", BloodGroup::APositive, 1.0)
            .unwrap();

        let history = db.history(3).unwrap();
        assert_eq!(history.len(), HISTORY_LIMIT);
        assert_eq!(history[0].id, Some(last));
        assert_eq!(history[0].result, BloodGroup::ONegative);
        assert!(db.history(99).unwrap().is_empty());
    }

    #[test]
    fn test_feedback_queues_training_data() {
        let db = Database::in_memory().unwrap();
        let id = db
            .insert_prediction(1, "uploads/x.png", BloodGroup::APositive, 1.0)
            .unwrap();

        assert!(db.record_feedback(id, BloodGroup::ABNegative).unwrap());
        assert!(!db.record_feedback(id + 100, BloodGroup::ABNegative).unwrap());
        assert_eq!(db.training_queue_len().unwrap(), 1);
    }

    #[test]
    fn test_open_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("bloodgroup.db");
        {
            let db = Database::open(&path).unwrap();
            db.create_user("Ada", "ada@example.com", "pw").unwrap();
        }
        let db = Database::open(&path).unwrap();
        assert_eq!(db.profile(1).unwrap().unwrap().email, "ada@example.com");
        assert!(db.ping());
    }
}
