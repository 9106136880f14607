//! Store connection management.
//!
//! This module provides the reservation store handle with proper
//! initialization and PRAGMA settings for the underlying `SQLite` file.

use rusqlite::{Connection, OpenFlags};

use crate::error::{Error, Result};

use super::config::StoreConfig;

/// A handle to the reservation store.
///
/// The handle owns a `SQLite` connection together with its open/closed
/// state: [`Store::open`] produces an open handle, [`Store::close`] releases
/// the connection, and every operation guards on that state as its first
/// precondition.
///
/// # Examples
///
/// ```no_run
/// use aero::{Store, StoreConfig};
///
/// let config = StoreConfig::new("/tmp/aero.db");
/// let mut store = Store::open(config).unwrap();
/// store.close().unwrap();
/// ```
#[derive(Debug)]
pub struct Store {
    conn: Option<Connection>,
    config: StoreConfig,
}

impl Store {
    /// Opens a reservation store with the given configuration.
    ///
    /// This function will:
    /// - Create the parent directory if `auto_create` is enabled
    /// - Open the store file with appropriate flags
    /// - Set WAL mode for concurrent access
    /// - Enable foreign-key enforcement and configure the busy timeout
    /// - Initialize or verify the store schema
    ///
    /// # Errors
    ///
    /// Returns [`Error::Connection`] if the store file cannot be opened,
    /// [`Error::Io`] if the parent directory cannot be created, and
    /// [`Error::Database`] or [`Error::Format`] if PRAGMA setup or schema
    /// verification fails.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use aero::{Store, StoreConfig};
    ///
    /// let config = StoreConfig::new("/tmp/aero.db");
    /// let store = Store::open(config).unwrap();
    /// ```
    pub fn open(config: StoreConfig) -> Result<Self> {
        // Ensure parent directory exists if auto-creating
        if config.auto_create && !config.path.exists() {
            if let Some(parent) = config.path.parent() {
                std::fs::create_dir_all(parent)?;
            }
        }

        // Determine open flags based on configuration
        let flags = if config.read_only {
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX
        } else if config.auto_create {
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_CREATE
                | OpenFlags::SQLITE_OPEN_NO_MUTEX
        } else {
            OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_NO_MUTEX
        };

        // Open the connection
        let conn =
            Connection::open_with_flags(&config.path, flags).map_err(|source| Error::Connection {
                path: config.path.clone(),
                source,
            })?;

        // Set pragmas for optimal operation
        // Note: PRAGMA journal_mode returns a result, so we use query_row
        let _: String = conn.query_row("PRAGMA journal_mode = WAL", [], |row| row.get(0))?;
        conn.execute_batch("PRAGMA synchronous = NORMAL")?;
        conn.execute_batch("PRAGMA foreign_keys = ON")?;
        conn.execute_batch(&format!(
            "PRAGMA busy_timeout = {}",
            config.busy_timeout.as_millis()
        ))?;

        // Check and initialize the schema
        super::migrations::check_schema_compatibility(&conn)?;

        Ok(Self {
            conn: Some(conn),
            config,
        })
    }

    /// Closes the store, releasing the underlying connection.
    ///
    /// After closing, every other operation on this handle fails with
    /// [`Error::NotOpen`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotOpen`] if the store was already closed, or
    /// [`Error::Database`] if the connection cannot be cleanly released.
    /// The handle counts as closed either way.
    pub fn close(&mut self) -> Result<()> {
        match self.conn.take() {
            Some(conn) => conn.close().map_err(|(_, err)| Error::Database(err)),
            None => Err(Error::NotOpen),
        }
    }

    /// Returns `true` if the store handle is open.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.conn.is_some()
    }

    /// Returns the configuration this store was opened with.
    #[must_use]
    pub const fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Returns a reference to the underlying `SQLite` connection.
    ///
    /// This provides access to the raw connection for advanced operations.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotOpen`] if the store has been closed.
    pub fn connection(&self) -> Result<&Connection> {
        self.conn.as_ref().ok_or(Error::NotOpen)
    }

    /// Returns a mutable reference to the underlying `SQLite` connection.
    ///
    /// This provides mutable access to the raw connection for operations
    /// that require mutability, such as transactions.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotOpen`] if the store has been closed.
    pub fn connection_mut(&mut self) -> Result<&mut Connection> {
        self.conn.as_mut().ok_or(Error::NotOpen)
    }
}
