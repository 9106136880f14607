//! Store configuration and connection parameters.
//!
//! This module provides configuration types for store connections, including
//! path resolution and connection parameters.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{Error, Result};

/// Configuration for store connections.
///
/// This struct contains all parameters needed to open and configure a store,
/// including the file path, timeout settings, and access modes.
///
/// # Examples
///
/// ```
/// use aero::StoreConfig;
/// use std::time::Duration;
///
/// // Create a configuration with default settings
/// let config = StoreConfig::new("/tmp/aero.db");
///
/// // Customize the configuration
/// let config = StoreConfig::new("/tmp/aero.db")
///     .with_busy_timeout(Duration::from_millis(10000));
/// ```
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Path to the store file.
    pub path: PathBuf,
    /// Busy timeout for lock contention.
    pub busy_timeout: Duration,
    /// Whether to automatically create the store if it doesn't exist.
    pub auto_create: bool,
    /// Whether to open the store in read-only mode.
    pub read_only: bool,
}

impl StoreConfig {
    /// Creates a new store configuration with default settings.
    ///
    /// Default settings:
    /// - `busy_timeout`: 5000ms
    /// - `auto_create`: true
    /// - `read_only`: false
    ///
    /// # Examples
    ///
    /// ```
    /// use aero::StoreConfig;
    ///
    /// let config = StoreConfig::new("/tmp/aero.db");
    /// assert_eq!(config.path.to_str().unwrap(), "/tmp/aero.db");
    /// ```
    #[must_use]
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            busy_timeout: Duration::from_millis(5000),
            auto_create: true,
            read_only: false,
        }
    }

    /// Sets the busy timeout duration.
    ///
    /// The busy timeout determines how long the connection will wait when
    /// encountering a locked store before returning an error.
    #[must_use]
    pub const fn with_busy_timeout(mut self, timeout: Duration) -> Self {
        self.busy_timeout = timeout;
        self
    }

    /// Configures the store to be opened in read-only mode.
    ///
    /// When read-only is enabled, `auto_create` is automatically disabled.
    ///
    /// # Examples
    ///
    /// ```
    /// use aero::StoreConfig;
    ///
    /// let config = StoreConfig::new("/tmp/aero.db").read_only();
    /// assert!(config.read_only);
    /// assert!(!config.auto_create);
    /// ```
    #[must_use]
    pub const fn read_only(mut self) -> Self {
        self.read_only = true;
        self.auto_create = false;
        self
    }
}

/// Returns the default data directory for aero.
///
/// The default directory is `~/.aero` on Unix-like systems and
/// `%USERPROFILE%\.aero` on Windows.
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined.
pub fn default_data_dir() -> Result<PathBuf> {
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .map_err(|_| {
            Error::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "cannot determine home directory",
            ))
        })?;
    Ok(PathBuf::from(home).join(".aero"))
}

/// Resolves the store path using environment variables or defaults.
///
/// The resolution order is:
/// 1. `$AERO_DATA_DIR/aero.db` if the `AERO_DATA_DIR` environment variable is set
/// 2. `~/.aero/aero.db` otherwise
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined and
/// `AERO_DATA_DIR` is not set.
pub fn resolve_store_path() -> Result<PathBuf> {
    if let Ok(data_dir) = std::env::var("AERO_DATA_DIR") {
        Ok(PathBuf::from(data_dir).join("aero.db"))
    } else {
        Ok(default_data_dir()?.join("aero.db"))
    }
}
