//! Error types for the aero library.
//!
//! This module provides the error hierarchy for all reservation-store
//! operations, using `thiserror` for ergonomic error handling. It also owns
//! the translation from backing-store failures to domain errors, so no other
//! module inspects `rusqlite` error internals directly.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::TripId;

/// Result type alias for operations that may fail with an aero error.
///
/// # Examples
///
/// ```
/// use aero::{Error, Result};
///
/// fn example_operation() -> Result<u16> {
///     Ok(10)
/// }
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for the aero library.
///
/// This enum encompasses all error conditions that can occur while managing
/// companies, planes, trips, passengers, and seat assignments.
#[derive(Debug, Error)]
pub enum Error {
    /// The store handle has not been opened or was already closed.
    #[error("store is not open")]
    NotOpen,

    /// The store file could not be opened.
    #[error("cannot open store at {}: {source}", path.display())]
    Connection {
        /// The path that could not be opened.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: rusqlite::Error,
    },

    /// An entity with the same unique name already exists.
    #[error("{entity} '{name}' already exists")]
    Duplicate {
        /// The kind of entity ("company", "plane", "passenger").
        entity: &'static str,
        /// The colliding name.
        name: String,
    },

    /// A referenced entity does not exist.
    #[error("{entity} '{key}' not found")]
    NotFound {
        /// The kind of entity that was looked up.
        entity: &'static str,
        /// The name or identifier that did not resolve.
        key: String,
    },

    /// A query legitimately returned nothing where the caller expects a
    /// distinguishable empty case.
    #[error("empty result")]
    Empty,

    /// A seat count or seat number outside the valid range.
    #[error("invalid seat number {value}: {reason}")]
    SeatRange {
        /// The invalid seat count or seat number.
        value: u16,
        /// The reason the value is invalid.
        reason: String,
    },

    /// The seat is already assigned on this trip.
    #[error("seat {seat} on trip {trip} is already taken")]
    SeatTaken {
        /// The trip holding the conflicting assignment.
        trip: TripId,
        /// The seat number that is already assigned.
        seat: u16,
    },

    /// A trip's departure does not strictly precede its arrival.
    #[error("departure {departure} must precede arrival {arrival}")]
    IncorrectTime {
        /// The planned departure time.
        departure: DateTime<Utc>,
        /// The planned arrival time.
        arrival: DateTime<Utc>,
    },

    /// The store file does not have a compatible format or schema version.
    #[error("incorrect store format: {details}")]
    Format {
        /// Details about the incompatibility.
        details: String,
    },

    /// An unexpected backing-store error occurred.
    #[error("store error: {0}")]
    Database(#[from] rusqlite::Error),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<crate::seat::InvalidSeatCountError> for Error {
    fn from(err: crate::seat::InvalidSeatCountError) -> Self {
        Self::SeatRange {
            value: err.value,
            reason: err.reason,
        }
    }
}

/// Returns `true` if the backing-store error is a uniqueness violation.
///
/// Uniqueness violations surface as constraint failures with the UNIQUE or
/// PRIMARY KEY extended result code.
fn is_unique_violation(err: &rusqlite::Error) -> bool {
    match err {
        rusqlite::Error::SqliteFailure(e, _) => {
            e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
                || e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY
        }
        _ => false,
    }
}

impl Error {
    /// Translates the outcome of an insert against a unique name column.
    ///
    /// A uniqueness violation becomes [`Error::Duplicate`] for the given
    /// entity kind and name; any other failure is passed through as
    /// [`Error::Database`].
    pub(crate) fn on_unique_insert(entity: &'static str, name: &str, err: rusqlite::Error) -> Self {
        if is_unique_violation(&err) {
            Self::Duplicate {
                entity,
                name: name.to_string(),
            }
        } else {
            Self::Database(err)
        }
    }

    /// Builds a [`Error::NotFound`] for the given entity kind and lookup key.
    pub(crate) fn not_found(entity: &'static str, key: impl ToString) -> Self {
        Self::NotFound {
            entity,
            key: key.to_string(),
        }
    }

    /// Check if the error indicates a missing entity.
    ///
    /// # Examples
    ///
    /// ```
    /// use aero::Error;
    ///
    /// let err = Error::NotFound { entity: "company", key: "Ghost".into() };
    /// assert!(err.is_not_found());
    /// ```
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if the error indicates a unique-name collision.
    ///
    /// # Examples
    ///
    /// ```
    /// use aero::Error;
    ///
    /// let err = Error::Duplicate { entity: "passenger", name: "Mark".into() };
    /// assert!(err.is_duplicate());
    /// ```
    #[must_use]
    pub fn is_duplicate(&self) -> bool {
        matches!(self, Self::Duplicate { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_open_error() {
        let err = Error::NotOpen;
        assert_eq!(format!("{err}"), "store is not open");
    }

    #[test]
    fn test_duplicate_error() {
        let err = Error::Duplicate {
            entity: "company",
            name: "S7".to_string(),
        };
        let display = format!("{err}");
        assert!(display.contains("company"));
        assert!(display.contains("S7"));
        assert!(display.contains("already exists"));
        assert!(err.is_duplicate());
    }

    #[test]
    fn test_not_found_error() {
        let err = Error::not_found("plane", "AirBus A310");
        let display = format!("{err}");
        assert!(display.contains("plane"));
        assert!(display.contains("AirBus A310"));
        assert!(display.contains("not found"));
        assert!(err.is_not_found());
    }

    #[test]
    fn test_seat_range_error() {
        let err = Error::SeatRange {
            value: 200,
            reason: "plane has 180 seats".to_string(),
        };
        let display = format!("{err}");
        assert!(display.contains("200"));
        assert!(display.contains("180"));
    }

    #[test]
    fn test_seat_taken_error() {
        let err = Error::SeatTaken {
            trip: TripId::from(4),
            seat: 10,
        };
        let display = format!("{err}");
        assert!(display.contains("seat 10"));
        assert!(display.contains("trip 4"));
    }

    #[test]
    fn test_incorrect_time_error() {
        let departure = DateTime::from_timestamp(1_707_661_680, 0).unwrap();
        let arrival = DateTime::from_timestamp(1_707_642_000, 0).unwrap();
        let err = Error::IncorrectTime { departure, arrival };
        let display = format!("{err}");
        assert!(display.contains("must precede"));
    }

    #[test]
    fn test_seat_count_conversion() {
        let err: Error = crate::seat::InvalidSeatCountError {
            value: 0,
            reason: "a plane must have at least one seat".to_string(),
        }
        .into();
        match err {
            Error::SeatRange { value, .. } => assert_eq!(value, 0),
            other => panic!("expected SeatRange, got {other:?}"),
        }
    }

    #[test]
    fn test_unique_violation_maps_to_duplicate() {
        // Provoke a real UNIQUE failure so the translation sees a genuine
        // extended result code rather than a hand-built one.
        let conn = rusqlite::Connection::open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE t (name TEXT NOT NULL UNIQUE)")
            .unwrap();
        conn.execute("INSERT INTO t (name) VALUES ('x')", [])
            .unwrap();
        let err = conn
            .execute("INSERT INTO t (name) VALUES ('x')", [])
            .unwrap_err();

        let translated = Error::on_unique_insert("company", "x", err);
        assert!(translated.is_duplicate());
    }

    #[test]
    fn test_non_constraint_failure_maps_to_database() {
        let conn = rusqlite::Connection::open_in_memory().unwrap();
        let err = conn.execute("INSERT INTO missing VALUES (1)", []).unwrap_err();

        let translated = Error::on_unique_insert("company", "x", err);
        assert!(matches!(translated, Error::Database(_)));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        let display = format!("{err}");
        assert!(display.contains("I/O error"));
    }

    #[test]
    fn test_result_type_alias() {
        fn returns_result() -> Result<u16> {
            Err(Error::NotOpen)
        }

        assert!(returns_result().is_err());
    }
}
