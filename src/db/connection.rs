use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use directories::BaseDirs;
use rusqlite::Connection;
use tracing::{debug, info};

use crate::clock::{Clock, SystemClock};
use crate::error::{Result, StorageContext, VocabError};

/// Folder name used beneath the user's home directory for application data.
const DATA_DIR_NAME: &str = ".vocab-deck";
/// SQLite file name stored inside the application data directory.
const DB_FILE_NAME: &str = "vocabulary.sqlite";

/// Columns added after the first release, in the order they shipped. Each is
/// applied only when the column is missing, so reruns are no-ops.
const MIGRATIONS: &[(&str, &str)] = &[(
    "in_done_list",
    "ALTER TABLE vocabulary ADD COLUMN in_done_list INTEGER DEFAULT 0",
)];

/// Owned handle to the vocabulary database. Construct one per database (or
/// per test with [`VocabularyStore::open_in_memory`]), call
/// [`initialize`](Self::initialize), and [`close`](Self::close) when done.
pub struct VocabularyStore {
    pub(crate) conn: Connection,
    pub(crate) clock: Arc<dyn Clock>,
}

impl fmt::Debug for VocabularyStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VocabularyStore")
            .field("path", &self.conn.path())
            .finish_non_exhaustive()
    }
}

impl VocabularyStore {
    /// Open (creating if needed) the database file at `path`. The parent
    /// directory is created on demand.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| VocabError::DataDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let conn = Connection::open(path).storage("failed to open SQLite database")?;
        debug!(path = %path.display(), "opened vocabulary database");
        Ok(Self::from_connection(conn))
    }

    /// Open the database in the user's home directory.
    pub fn open_default() -> Result<Self> {
        Self::open(default_db_path()?)
    }

    /// Private in-memory database; nothing is shared between instances.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().storage("failed to open in-memory database")?;
        Ok(Self::from_connection(conn))
    }

    fn from_connection(conn: Connection) -> Self {
        Self {
            conn,
            clock: Arc::new(SystemClock),
        }
    }

    /// Replace the time source used for timestamps and current-date defaults.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Create the table if absent and apply pending column migrations. Safe to
    /// call on every startup.
    pub fn initialize(&self) -> Result<()> {
        self.conn
            .execute(
                "CREATE TABLE IF NOT EXISTS vocabulary (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    name TEXT NOT NULL,
                    meaning TEXT NOT NULL,
                    sort_type TEXT NOT NULL,
                    month INTEGER NOT NULL,
                    year INTEGER NOT NULL,
                    in_done_list INTEGER DEFAULT 0,
                    created_at INTEGER DEFAULT (strftime('%s', 'now')),
                    updated_at INTEGER DEFAULT (strftime('%s', 'now'))
                )",
                [],
            )
            .storage("failed to create vocabulary table")?;

        for (column, statement) in MIGRATIONS {
            if self.has_column("vocabulary", column)? {
                continue;
            }
            self.conn
                .execute(statement, [])
                .storage("failed to apply vocabulary migration")?;
            info!(column, "added missing vocabulary column");
        }

        info!("vocabulary database initialized");
        Ok(())
    }

    fn has_column(&self, table: &str, column: &str) -> Result<bool> {
        let mut stmt = self
            .conn
            .prepare("SELECT 1 FROM pragma_table_info(?1) WHERE name = ?2")
            .storage("failed to prepare table info query")?;
        stmt.exists([table, column]).storage("failed to inspect table columns")
    }

    /// Flush and close the underlying connection.
    pub fn close(self) -> Result<()> {
        self.conn
            .close()
            .map_err(|(_, source)| VocabError::Storage {
                context: "failed to close SQLite database",
                source,
            })
    }

    /// The time source this store stamps rows with, so callers computing their
    /// own date defaults agree with the store on what "today" is.
    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }
}

/// Resolve the absolute path to the SQLite database inside the user's home.
pub fn default_db_path() -> Result<PathBuf> {
    let base_dirs = BaseDirs::new().ok_or(VocabError::HomeDirUnavailable)?;
    Ok(base_dirs.home_dir().join(DATA_DIR_NAME).join(DB_FILE_NAME))
}
