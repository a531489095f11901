use crate::error::{GboardError, Result};
use crate::model::{CommitDetail, SCHEMA_VERSION};
use crate::util::RepoSlug;
use chrono::{TimeZone, Utc};
use directories::ProjectDirs;
use rusqlite::{params, Connection};
use std::path::{Path, PathBuf};

/// Per-user cache directory, or `.gboard` under the working directory when the
/// platform has no home directory.
pub fn default_cache_dir() -> Result<PathBuf> {
    match ProjectDirs::from("", "", "gboard") {
        Some(dirs) => Ok(dirs.cache_dir().to_path_buf()),
        None => Ok(std::env::current_dir()?.join(".gboard")),
    }
}

/// Commit details keyed by repository and sha. A sha's diff stat never
/// changes, so entries are never invalidated.
pub struct Cache {
    conn: Connection,
}

impl Cache {
    pub fn new<CP: AsRef<Path>>(cache_path: Option<CP>) -> Result<Self> {
        let cache_dir = match cache_path {
            Some(path) => path.as_ref().to_path_buf(),
            None => default_cache_dir()?,
        };
        std::fs::create_dir_all(&cache_dir)?;
        let db_path = cache_dir.join("cache.db");
        let conn = Connection::open(&db_path)?;
        let mut cache = Self { conn };
        cache.initialize()?;
        Ok(cache)
    }

    pub fn in_memory() -> Result<Self> {
        let mut cache = Self {
            conn: Connection::open_in_memory()?,
        };
        cache.initialize()?;
        Ok(cache)
    }

    fn initialize(&mut self) -> Result<()> {
        self.conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS commit_details (
                repo TEXT NOT NULL,
                sha TEXT NOT NULL,
                additions INTEGER,
                deletions INTEGER,
                authored_at INTEGER,
                PRIMARY KEY (repo, sha)
            );
            ",
        )?;
        self.check_schema_version()?;
        Ok(())
    }

    fn check_schema_version(&mut self) -> Result<()> {
        let user_version: i64 = self
            .conn
            .query_row("PRAGMA user_version;", [], |row| row.get(0))?;

        if user_version == 0 {
            let set_stmt = format!("PRAGMA user_version = {SCHEMA_VERSION};");
            self.conn.execute_batch(&set_stmt)?;
        } else if user_version != SCHEMA_VERSION as i64 {
            return Err(GboardError::Cache(format!(
                "Schema version mismatch: expected {}, found {}",
                SCHEMA_VERSION, user_version
            )));
        }

        Ok(())
    }

    pub fn get_commit_detail(&self, repo: &RepoSlug, sha: &str) -> Result<Option<CommitDetail>> {
        let result = self.conn.query_row(
            "SELECT sha, additions, deletions, authored_at FROM commit_details WHERE repo = ? AND sha = ?",
            params![repo.to_string(), sha],
            |row| {
                let ts: Option<i64> = row.get(3)?;
                let authored_at = match ts {
                    Some(ts) => Some(Utc.timestamp_opt(ts, 0).single().ok_or_else(|| {
                        rusqlite::Error::InvalidColumnType(
                            3,
                            "authored_at".to_string(),
                            rusqlite::types::Type::Integer,
                        )
                    })?),
                    None => None,
                };
                Ok(CommitDetail {
                    sha: row.get(0)?,
                    additions: row.get(1)?,
                    deletions: row.get(2)?,
                    authored_at,
                })
            },
        );
        match result {
            Ok(detail) => Ok(Some(detail)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn store_commit_detail(&self, repo: &RepoSlug, detail: &CommitDetail) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO commit_details (repo, sha, additions, deletions, authored_at)
             VALUES (?, ?, ?, ?, ?)",
            params![
                repo.to_string(),
                detail.sha,
                detail.additions,
                detail.deletions,
                detail.authored_at.map(|dt| dt.timestamp()),
            ],
        )?;
        Ok(())
    }

    pub fn count_commit_details(&self, repo: &RepoSlug) -> Result<u64> {
        let n: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM commit_details WHERE repo = ?",
            params![repo.to_string()],
            |row| row.get(0),
        )?;
        Ok(n.max(0) as u64)
    }
}
