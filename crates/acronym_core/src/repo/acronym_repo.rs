//! Acronym store contract and SQLite implementations.
//!
//! # Responsibility
//! - Provide insert/lookup/update/delete over the `acronyms` table.
//! - Normalize terms identically on write and read paths.
//!
//! # Invariants
//! - Lookups are exact matches on the normalized term, ordered by ascending id.
//! - `update_expansion` and `delete` on a missing id affect zero rows and succeed.
//! - Read paths reject rows that violate the model instead of masking them.

use crate::db::DbError;
use crate::model::acronym::{
    normalize_expansion, normalize_term, AcronymId, AcronymRecord, NewAcronym,
};
use log::debug;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::{Mutex, MutexGuard};

const RECORD_SELECT_SQL: &str = "SELECT id, term, expansion, created_at FROM acronyms";

pub type RepoResult<T> = Result<T, RepoError>;

/// Store error for acronym persistence and queries.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted acronym data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Store contract for acronym definitions.
pub trait AcronymRepository {
    /// Inserts a definition; `None` means the input was blank and skipped.
    fn insert(&self, term: &str, expansion: &str) -> RepoResult<Option<AcronymId>>;
    fn lookup(&self, term: &str) -> RepoResult<Vec<String>>;
    fn lookup_with_ids(&self, term: &str) -> RepoResult<Vec<(AcronymId, String)>>;
    /// Returns whether a row changed. Blank replacements never touch the row.
    fn update_expansion(&self, id: AcronymId, new_expansion: &str) -> RepoResult<bool>;
    /// Returns whether a row was removed.
    fn delete(&self, id: AcronymId) -> RepoResult<bool>;
    fn fetch_expansion(&self, id: AcronymId) -> RepoResult<Option<String>>;
    fn get(&self, id: AcronymId) -> RepoResult<Option<AcronymRecord>>;
    fn count(&self) -> RepoResult<u64>;
}

/// SQLite-backed store borrowing one connection.
pub struct SqliteAcronymRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteAcronymRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl AcronymRepository for SqliteAcronymRepository<'_> {
    fn insert(&self, term: &str, expansion: &str) -> RepoResult<Option<AcronymId>> {
        let Some(input) = NewAcronym::parse(term, expansion) else {
            debug!("event=acronym_insert module=repo status=skipped reason=blank_input");
            return Ok(None);
        };

        self.conn.execute(
            "INSERT INTO acronyms (term, expansion) VALUES (?1, ?2);",
            params![input.term(), input.expansion()],
        )?;
        Ok(Some(self.conn.last_insert_rowid()))
    }

    fn lookup(&self, term: &str) -> RepoResult<Vec<String>> {
        Ok(self
            .lookup_with_ids(term)?
            .into_iter()
            .map(|(_, expansion)| expansion)
            .collect())
    }

    fn lookup_with_ids(&self, term: &str) -> RepoResult<Vec<(AcronymId, String)>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, expansion FROM acronyms
             WHERE term = ?1
             ORDER BY id ASC;",
        )?;
        let rows = stmt.query_map([normalize_term(term)], |row| {
            Ok((row.get::<_, AcronymId>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut matches = Vec::new();
        for row in rows {
            matches.push(row?);
        }
        Ok(matches)
    }

    fn update_expansion(&self, id: AcronymId, new_expansion: &str) -> RepoResult<bool> {
        let expansion = normalize_expansion(new_expansion);
        if expansion.is_empty() {
            debug!(
                "event=acronym_update module=repo status=skipped reason=blank_input id={}",
                id
            );
            return Ok(false);
        }

        let changed = self.conn.execute(
            "UPDATE acronyms SET expansion = ?1 WHERE id = ?2;",
            params![expansion, id],
        )?;
        Ok(changed > 0)
    }

    fn delete(&self, id: AcronymId) -> RepoResult<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM acronyms WHERE id = ?1;", [id])?;
        Ok(changed > 0)
    }

    fn fetch_expansion(&self, id: AcronymId) -> RepoResult<Option<String>> {
        let expansion = self
            .conn
            .query_row(
                "SELECT expansion FROM acronyms WHERE id = ?1;",
                [id],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(expansion)
    }

    fn get(&self, id: AcronymId) -> RepoResult<Option<AcronymRecord>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{RECORD_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_record_row(row)?));
        }
        Ok(None)
    }

    fn count(&self) -> RepoResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM acronyms;", [], |row| row.get(0))?;
        u64::try_from(count)
            .map_err(|_| RepoError::InvalidData(format!("negative row count `{count}`")))
    }
}

/// Process-wide store owning the connection.
///
/// Request threads share one handle; each call holds the lock for a single
/// statement, which serializes row writes.
pub struct SharedAcronymStore {
    conn: Mutex<Connection>,
}

impl SharedAcronymStore {
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    /// Releases the connection, surfacing close errors.
    pub fn close(self) -> RepoResult<()> {
        let conn = self
            .conn
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        conn.close().map_err(|(_, err)| RepoError::from(err))
    }

    fn with_repo<T>(
        &self,
        op: impl FnOnce(&SqliteAcronymRepository<'_>) -> RepoResult<T>,
    ) -> RepoResult<T> {
        let guard = self.lock();
        let repo = SqliteAcronymRepository::new(&guard);
        op(&repo)
    }

    fn lock(&self) -> MutexGuard<'_, Connection> {
        // A panic mid-statement leaves SQLite consistent, so a poisoned lock
        // still guards a usable connection.
        self.conn
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl AcronymRepository for SharedAcronymStore {
    fn insert(&self, term: &str, expansion: &str) -> RepoResult<Option<AcronymId>> {
        self.with_repo(|repo| repo.insert(term, expansion))
    }

    fn lookup(&self, term: &str) -> RepoResult<Vec<String>> {
        self.with_repo(|repo| repo.lookup(term))
    }

    fn lookup_with_ids(&self, term: &str) -> RepoResult<Vec<(AcronymId, String)>> {
        self.with_repo(|repo| repo.lookup_with_ids(term))
    }

    fn update_expansion(&self, id: AcronymId, new_expansion: &str) -> RepoResult<bool> {
        self.with_repo(|repo| repo.update_expansion(id, new_expansion))
    }

    fn delete(&self, id: AcronymId) -> RepoResult<bool> {
        self.with_repo(|repo| repo.delete(id))
    }

    fn fetch_expansion(&self, id: AcronymId) -> RepoResult<Option<String>> {
        self.with_repo(|repo| repo.fetch_expansion(id))
    }

    fn get(&self, id: AcronymId) -> RepoResult<Option<AcronymRecord>> {
        self.with_repo(|repo| repo.get(id))
    }

    fn count(&self) -> RepoResult<u64> {
        self.with_repo(|repo| repo.count())
    }
}

fn parse_record_row(row: &Row<'_>) -> RepoResult<AcronymRecord> {
    let id: AcronymId = row.get("id")?;
    let term: String = row.get("term")?;
    if term.is_empty() || term != normalize_term(&term) {
        return Err(RepoError::InvalidData(format!(
            "term `{term}` of acronym {id} is not normalized"
        )));
    }

    let expansion: String = row.get("expansion")?;
    if expansion.trim().is_empty() {
        return Err(RepoError::InvalidData(format!(
            "acronym {id} has a blank expansion"
        )));
    }

    Ok(AcronymRecord {
        id,
        term,
        expansion,
        created_at: row.get("created_at")?,
    })
}
