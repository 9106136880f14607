//! Store schema definitions and SQL constants.
//!
//! This module contains all table definitions, indices, and constants
//! related to the relational layout of the reservation ledger.

/// Current schema version for the store.
///
/// This version is stored in the metadata table and is used to ensure
/// compatibility between the store file and the library.
pub const CURRENT_SCHEMA_VERSION: i32 = 1;

/// SQL statement to create the metadata table.
///
/// The metadata table stores key-value pairs for store configuration and
/// versioning information.
pub const CREATE_METADATA_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS metadata (
        key TEXT PRIMARY KEY NOT NULL,
        value TEXT NOT NULL
    )";

/// SQL statement to create the company table.
pub const CREATE_COMPANY_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS company (
        id INTEGER PRIMARY KEY,
        name TEXT NOT NULL UNIQUE
    )";

/// SQL statement to create the plane table.
///
/// Plane names are unique store-wide. The seat capacity is backed by a CHECK
/// constraint so a zero-capacity plane can never be persisted.
pub const CREATE_PLANE_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS plane (
        id INTEGER PRIMARY KEY,
        name TEXT NOT NULL UNIQUE,
        company_id INTEGER NOT NULL REFERENCES company(id),
        seats INTEGER NOT NULL CHECK (seats > 0)
    )";

/// SQL statement to create the trip table.
///
/// Times are stored as unix-epoch seconds. AUTOINCREMENT keeps ended trip
/// ids retired instead of letting the store hand them out again.
pub const CREATE_TRIP_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS trip (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        company_id INTEGER NOT NULL REFERENCES company(id),
        plane_id INTEGER NOT NULL REFERENCES plane(id),
        departs_at INTEGER NOT NULL,
        arrives_at INTEGER NOT NULL,
        origin TEXT NOT NULL,
        destination TEXT NOT NULL
    )";

/// SQL statement to create the passenger table.
pub const CREATE_PASSENGER_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS passenger (
        id INTEGER PRIMARY KEY,
        name TEXT NOT NULL UNIQUE
    )";

/// SQL statement to create the seat assignment table.
///
/// The composite primary key enforces at most one assignment per
/// `(trip, seat)` pair.
pub const CREATE_SEAT_ASSIGNMENT_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS seat_assignment (
        trip_id INTEGER NOT NULL REFERENCES trip(id),
        passenger_id INTEGER NOT NULL REFERENCES passenger(id),
        seat INTEGER NOT NULL,
        PRIMARY KEY (trip_id, seat)
    )";

/// SQL statement to create an index on the plane's owning company.
///
/// This index speeds up the re-pointing step of a company merge.
pub const CREATE_PLANE_COMPANY_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_plane_company ON plane(company_id)";

/// SQL statement to create an index on the trip's operating company.
pub const CREATE_TRIP_COMPANY_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_trip_company ON trip(company_id)";

/// SQL statement to create an index on the trip's plane.
///
/// This index speeds up the cascading trip scan when a plane is deleted.
pub const CREATE_TRIP_PLANE_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_trip_plane ON trip(plane_id)";

/// SQL statement to create an index on the trip route.
pub const CREATE_TRIP_ROUTE_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_trip_route ON trip(origin, destination)";

/// SQL statement to select the schema version from the metadata table.
pub const SELECT_SCHEMA_VERSION: &str = "SELECT value FROM metadata WHERE key = 'schema_version'";

/// SQL statement to insert or update the schema version in the metadata table.
pub const INSERT_SCHEMA_VERSION: &str =
    "INSERT OR REPLACE INTO metadata (key, value) VALUES ('schema_version', ?)";
