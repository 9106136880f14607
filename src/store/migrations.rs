//! Store schema management and migrations.
//!
//! This module handles schema initialization, version checking, and
//! migrations.

use rusqlite::Connection;

use crate::error::{Error, Result};

use super::schema::{
    CREATE_COMPANY_TABLE, CREATE_METADATA_TABLE, CREATE_PASSENGER_TABLE,
    CREATE_PLANE_COMPANY_INDEX, CREATE_PLANE_TABLE, CREATE_SEAT_ASSIGNMENT_TABLE,
    CREATE_TRIP_COMPANY_INDEX, CREATE_TRIP_PLANE_INDEX, CREATE_TRIP_ROUTE_INDEX,
    CREATE_TRIP_TABLE, CURRENT_SCHEMA_VERSION, INSERT_SCHEMA_VERSION, SELECT_SCHEMA_VERSION,
};

/// Initializes the store schema.
///
/// This function creates all tables, indices, and metadata for a fresh store.
/// It should only be called on a store that has not been initialized yet.
///
/// # Errors
///
/// Returns an error if any SQL statement fails to execute.
///
/// # Examples
///
/// ```no_run
/// use rusqlite::Connection;
/// use aero::store::migrations::initialize_schema;
///
/// let conn = Connection::open_in_memory().unwrap();
/// initialize_schema(&conn).unwrap();
/// ```
pub fn initialize_schema(conn: &Connection) -> Result<()> {
    // Create metadata table
    conn.execute(CREATE_METADATA_TABLE, [])?;

    // Create entity tables; referenced tables first so the declared foreign
    // keys always resolve
    conn.execute(CREATE_COMPANY_TABLE, [])?;
    conn.execute(CREATE_PLANE_TABLE, [])?;
    conn.execute(CREATE_TRIP_TABLE, [])?;
    conn.execute(CREATE_PASSENGER_TABLE, [])?;
    conn.execute(CREATE_SEAT_ASSIGNMENT_TABLE, [])?;

    // Create indices
    conn.execute(CREATE_PLANE_COMPANY_INDEX, [])?;
    conn.execute(CREATE_TRIP_COMPANY_INDEX, [])?;
    conn.execute(CREATE_TRIP_PLANE_INDEX, [])?;
    conn.execute(CREATE_TRIP_ROUTE_INDEX, [])?;

    // Set initial schema version
    conn.execute(INSERT_SCHEMA_VERSION, [CURRENT_SCHEMA_VERSION])?;

    Ok(())
}

/// Gets the current schema version from the store.
///
/// # Errors
///
/// Returns an error if the query fails for reasons other than
/// "no rows returned" (which indicates version 0).
///
/// # Returns
///
/// - `Ok(0)` if the metadata table doesn't exist or has no version
/// - `Ok(version)` if a version is found
/// - `Err(_)` if a store error occurs
pub fn get_schema_version(conn: &Connection) -> Result<i32> {
    match conn.query_row(SELECT_SCHEMA_VERSION, [], |row| {
        let value: String = row.get(0)?;
        value
            .parse::<i32>()
            .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))
    }) {
        Ok(version) => Ok(version),
        Err(rusqlite::Error::QueryReturnedNoRows) => {
            // Store exists but no schema - needs initialization
            Ok(0)
        }
        Err(e) => {
            // Check if it's a "no such table" error
            if let rusqlite::Error::SqliteFailure(ref sqlite_err, _) = e {
                if sqlite_err.code == rusqlite::ErrorCode::Unknown {
                    // Table doesn't exist yet
                    return Ok(0);
                }
            }
            Err(e.into())
        }
    }
}

/// Checks schema compatibility and initializes if needed.
///
/// This function:
/// 1. Checks the current schema version
/// 2. If version is 0, initializes the schema
/// 3. If version is older than current, returns an error (migrations needed)
/// 4. If version is newer than current, returns an error (client too old)
/// 5. If version matches, returns success
///
/// # Errors
///
/// Returns an error if:
/// - Schema version is incompatible (too old or too new)
/// - Schema initialization fails
/// - Store queries fail
pub fn check_schema_compatibility(conn: &Connection) -> Result<()> {
    let version = get_schema_version(conn)?;

    if version == 0 {
        // Fresh store, initialize it
        initialize_schema(conn)?;
    } else if version < CURRENT_SCHEMA_VERSION {
        return Err(Error::Format {
            details: format!(
                "schema version {version} is older than client version {CURRENT_SCHEMA_VERSION}; migration not yet implemented"
            ),
        });
    } else if version > CURRENT_SCHEMA_VERSION {
        return Err(Error::Format {
            details: format!(
                "schema version {version} is newer than client version {CURRENT_SCHEMA_VERSION}; please upgrade aero"
            ),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_connection() -> Connection {
        Connection::open_in_memory().unwrap()
    }

    #[test]
    fn test_initialize_schema() {
        let conn = create_test_connection();
        initialize_schema(&conn).unwrap();

        // Verify metadata table exists and has version
        let version = get_schema_version(&conn).unwrap();
        assert_eq!(version, CURRENT_SCHEMA_VERSION);

        // Verify the entity tables exist and start empty
        for table in ["company", "plane", "trip", "passenger", "seat_assignment"] {
            let count: i32 = conn
                .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| {
                    row.get(0)
                })
                .unwrap();
            assert_eq!(count, 0, "table {table} should start empty");
        }
    }

    #[test]
    fn test_get_schema_version_uninitialized() {
        let conn = create_test_connection();
        let version = get_schema_version(&conn).unwrap();
        assert_eq!(version, 0);
    }

    #[test]
    fn test_get_schema_version_initialized() {
        let conn = create_test_connection();
        initialize_schema(&conn).unwrap();

        let version = get_schema_version(&conn).unwrap();
        assert_eq!(version, CURRENT_SCHEMA_VERSION);
    }

    #[test]
    fn test_check_schema_compatibility_fresh_store() {
        let conn = create_test_connection();

        // Should initialize the schema
        check_schema_compatibility(&conn).unwrap();

        // Verify it was initialized
        let version = get_schema_version(&conn).unwrap();
        assert_eq!(version, CURRENT_SCHEMA_VERSION);
    }

    #[test]
    fn test_check_schema_compatibility_current_version() {
        let conn = create_test_connection();
        initialize_schema(&conn).unwrap();

        // Should succeed with current version
        check_schema_compatibility(&conn).unwrap();
    }

    #[test]
    fn test_check_schema_compatibility_newer_version() {
        let conn = create_test_connection();
        initialize_schema(&conn).unwrap();

        // Manually set a newer version
        conn.execute(
            "UPDATE metadata SET value = '999' WHERE key = 'schema_version'",
            [],
        )
        .unwrap();

        // Should fail with version too new
        let result = check_schema_compatibility(&conn);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(err.to_string().contains("newer than client"));
    }

    #[test]
    fn test_schema_creates_all_indices() {
        let conn = create_test_connection();
        initialize_schema(&conn).unwrap();

        // Query for index existence
        let index_count: i32 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'index' AND name LIKE 'idx_%'",
                [],
                |row| row.get(0),
            )
            .unwrap();

        // plane_company, trip_company, trip_plane, trip_route
        assert_eq!(index_count, 4);
    }

    #[test]
    fn test_seat_assignment_unique_per_trip_and_seat() {
        let conn = create_test_connection();
        initialize_schema(&conn).unwrap();

        conn.execute("INSERT INTO company (name) VALUES ('S7')", [])
            .unwrap();
        conn.execute(
            "INSERT INTO plane (name, company_id, seats) VALUES ('A320', 1, 180)",
            [],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO trip (company_id, plane_id, departs_at, arrives_at, origin, destination)
             VALUES (1, 1, 0, 1, 'Moscow', 'Tokyo')",
            [],
        )
        .unwrap();
        conn.execute("INSERT INTO passenger (name) VALUES ('Mark')", [])
            .unwrap();

        conn.execute(
            "INSERT INTO seat_assignment (trip_id, passenger_id, seat) VALUES (1, 1, 10)",
            [],
        )
        .unwrap();
        let result = conn.execute(
            "INSERT INTO seat_assignment (trip_id, passenger_id, seat) VALUES (1, 1, 10)",
            [],
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_plane_capacity_check_constraint() {
        let conn = create_test_connection();
        initialize_schema(&conn).unwrap();

        conn.execute("INSERT INTO company (name) VALUES ('S7')", [])
            .unwrap();
        let result = conn.execute(
            "INSERT INTO plane (name, company_id, seats) VALUES ('Paper Plane', 1, 0)",
            [],
        );
        assert!(result.is_err());
    }
}
