//! Entity and booking operations for the reservation store.
//!
//! This module implements the single-statement operations and queries:
//! registering companies, planes, and passengers, planning trips, taking
//! seats, and the free-seat computation. The multi-statement cascading
//! operations live in the transaction module.

use std::collections::HashSet;

use rusqlite::{params, Connection};

use crate::error::{Error, Result};
use crate::model::{
    Company, CompanyId, Passenger, PassengerId, Plane, PlaneId, SeatAssignment, Trip, TripId,
    TripPlan,
};
use crate::seat::SeatCount;

use super::connection::Store;

// SQL statements for entity creation
const INSERT_COMPANY: &str = "INSERT INTO company (name) VALUES (?)";
const INSERT_PASSENGER: &str = "INSERT INTO passenger (name) VALUES (?)";
const INSERT_PLANE: &str = "INSERT INTO plane (name, company_id, seats) VALUES (?, ?, ?)";

const INSERT_TRIP: &str = r"
    INSERT INTO trip (company_id, plane_id, departs_at, arrives_at, origin, destination)
    VALUES (?, ?, ?, ?, ?, ?)
";

const INSERT_SEAT_ASSIGNMENT: &str = r"
    INSERT INTO seat_assignment (trip_id, passenger_id, seat)
    VALUES (?, ?, ?)
";

// SQL statements for lookups and queries
const SELECT_COMPANY_ID: &str = "SELECT id FROM company WHERE name = ?";
const SELECT_PLANE_ID: &str = "SELECT id FROM plane WHERE name = ?";
const SELECT_PASSENGER_ID: &str = "SELECT id FROM passenger WHERE name = ?";
const SELECT_TRIP_PLANE: &str = "SELECT plane_id FROM trip WHERE id = ?";
const SELECT_PLANE_SEATS: &str = "SELECT seats FROM plane WHERE id = ?";

const SELECT_TAKEN_SEATS: &str = "SELECT seat FROM seat_assignment WHERE trip_id = ?";
const CHECK_SEAT_TAKEN: &str =
    "SELECT COUNT(*) FROM seat_assignment WHERE trip_id = ? AND seat = ?";

const SELECT_TRIP: &str = r"
    SELECT id, company_id, plane_id, departs_at, arrives_at, origin, destination
    FROM trip
    WHERE id = ?
";

const LIST_TRIPS: &str = r"
    SELECT id, company_id, plane_id, departs_at, arrives_at, origin, destination
    FROM trip
    ORDER BY id
";

const LIST_TRIPS_BY_ROUTE: &str = r"
    SELECT id, company_id, plane_id, departs_at, arrives_at, origin, destination
    FROM trip
    WHERE origin = ? AND destination = ?
    ORDER BY id
";

const LIST_COMPANIES: &str = "SELECT id, name FROM company ORDER BY name";
const LIST_PLANES: &str = "SELECT id, name, company_id, seats FROM plane ORDER BY name";
const LIST_PASSENGERS: &str = "SELECT id, name FROM passenger ORDER BY name";

const LIST_SEAT_ASSIGNMENTS: &str = r"
    SELECT trip_id, passenger_id, seat
    FROM seat_assignment
    WHERE trip_id = ?
    ORDER BY seat
";

/// Decodes a unix-epoch seconds column into a timestamp.
fn decode_time(column: usize, secs: i64) -> rusqlite::Result<chrono::DateTime<chrono::Utc>> {
    chrono::DateTime::from_timestamp(secs, 0)
        .ok_or(rusqlite::Error::IntegralValueOutOfRange(column, secs))
}

/// Helper function to deserialize a trip from a store row.
///
/// Expects row fields in this order: id, `company_id`, `plane_id`,
/// `departs_at`, `arrives_at`, origin, destination.
fn row_to_trip(row: &rusqlite::Row<'_>) -> rusqlite::Result<Trip> {
    let id: i64 = row.get(0)?;
    let company: i64 = row.get(1)?;
    let plane: i64 = row.get(2)?;
    let departs_secs: i64 = row.get(3)?;
    let arrives_secs: i64 = row.get(4)?;
    let origin: String = row.get(5)?;
    let destination: String = row.get(6)?;

    Ok(Trip {
        id: TripId::from(id),
        company: CompanyId::from(company),
        plane: PlaneId::from(plane),
        departs_at: decode_time(3, departs_secs)?,
        arrives_at: decode_time(4, arrives_secs)?,
        origin,
        destination,
    })
}

fn row_to_company(row: &rusqlite::Row<'_>) -> rusqlite::Result<Company> {
    Ok(Company {
        id: CompanyId::from(row.get::<_, i64>(0)?),
        name: row.get(1)?,
    })
}

fn row_to_plane(row: &rusqlite::Row<'_>) -> rusqlite::Result<Plane> {
    let seats: u16 = row.get(3)?;
    let seats = SeatCount::try_from(seats)
        .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;

    Ok(Plane {
        id: PlaneId::from(row.get::<_, i64>(0)?),
        name: row.get(1)?,
        company: CompanyId::from(row.get::<_, i64>(2)?),
        seats,
    })
}

fn row_to_passenger(row: &rusqlite::Row<'_>) -> rusqlite::Result<Passenger> {
    Ok(Passenger {
        id: PassengerId::from(row.get::<_, i64>(0)?),
        name: row.get(1)?,
    })
}

fn row_to_assignment(row: &rusqlite::Row<'_>) -> rusqlite::Result<SeatAssignment> {
    Ok(SeatAssignment {
        trip: TripId::from(row.get::<_, i64>(0)?),
        passenger: PassengerId::from(row.get::<_, i64>(1)?),
        seat: row.get(2)?,
    })
}

/// Resolves a company name to its id.
pub(super) fn lookup_company(conn: &Connection, name: &str) -> Result<CompanyId> {
    match conn.query_row(SELECT_COMPANY_ID, params![name], |row| row.get::<_, i64>(0)) {
        Ok(id) => Ok(CompanyId::from(id)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Err(Error::not_found("company", name)),
        Err(e) => Err(e.into()),
    }
}

/// Resolves a plane name to its id.
pub(super) fn lookup_plane(conn: &Connection, name: &str) -> Result<PlaneId> {
    match conn.query_row(SELECT_PLANE_ID, params![name], |row| row.get::<_, i64>(0)) {
        Ok(id) => Ok(PlaneId::from(id)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Err(Error::not_found("plane", name)),
        Err(e) => Err(e.into()),
    }
}

/// Resolves a passenger name to its id.
pub(super) fn lookup_passenger(conn: &Connection, name: &str) -> Result<PassengerId> {
    match conn.query_row(SELECT_PASSENGER_ID, params![name], |row| row.get::<_, i64>(0)) {
        Ok(id) => Ok(PassengerId::from(id)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Err(Error::not_found("passenger", name)),
        Err(e) => Err(e.into()),
    }
}

/// Resolves a trip id to the id of the plane flying it.
pub(super) fn trip_plane(conn: &Connection, trip: TripId) -> Result<PlaneId> {
    match conn.query_row(SELECT_TRIP_PLANE, params![trip.value()], |row| {
        row.get::<_, i64>(0)
    }) {
        Ok(id) => Ok(PlaneId::from(id)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Err(Error::not_found("trip", trip)),
        Err(e) => Err(e.into()),
    }
}

/// Resolves a plane id to its seat capacity.
pub(super) fn plane_seat_count(conn: &Connection, plane: PlaneId) -> Result<SeatCount> {
    match conn.query_row(SELECT_PLANE_SEATS, params![plane.value()], |row| {
        let seats: u16 = row.get(0)?;
        SeatCount::try_from(seats).map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))
    }) {
        Ok(seats) => Ok(seats),
        Err(rusqlite::Error::QueryReturnedNoRows) => Err(Error::not_found("plane", plane)),
        Err(e) => Err(e.into()),
    }
}

impl Store {
    /// Registers a new passenger.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotOpen`] if the store is closed, [`Error::Duplicate`]
    /// if a passenger with that name already exists, and [`Error::Database`]
    /// on any other backing-store failure.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use aero::{Store, StoreConfig};
    ///
    /// let store = Store::open(StoreConfig::new("/tmp/aero.db")).unwrap();
    /// store.add_passenger("Mark").unwrap();
    /// ```
    pub fn add_passenger(&self, name: &str) -> Result<()> {
        let conn = self.connection()?;
        conn.execute(INSERT_PASSENGER, params![name])
            .map_err(|e| Error::on_unique_insert("passenger", name, e))?;
        Ok(())
    }

    /// Registers a new company.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotOpen`] if the store is closed, [`Error::Duplicate`]
    /// if a company with that name already exists, and [`Error::Database`]
    /// on any other backing-store failure.
    pub fn add_company(&self, name: &str) -> Result<()> {
        let conn = self.connection()?;
        conn.execute(INSERT_COMPANY, params![name])
            .map_err(|e| Error::on_unique_insert("company", name, e))?;
        Ok(())
    }

    /// Registers a new plane under an existing company.
    ///
    /// # Errors
    ///
    /// Returns, in precedence order: [`Error::NotOpen`] if the store is
    /// closed; [`Error::SeatRange`] if `seats` is zero; [`Error::NotFound`]
    /// if `company_name` does not resolve; [`Error::Duplicate`] if a plane
    /// with `name` already exists; [`Error::Database`] otherwise.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use aero::{Store, StoreConfig};
    ///
    /// let store = Store::open(StoreConfig::new("/tmp/aero.db")).unwrap();
    /// store.add_company("S7").unwrap();
    /// store.add_plane("A320", "S7", 180).unwrap();
    /// ```
    pub fn add_plane(&self, name: &str, company_name: &str, seats: u16) -> Result<()> {
        let conn = self.connection()?;
        let seats = SeatCount::try_from(seats)?;
        let company = lookup_company(conn, company_name)?;

        conn.execute(
            INSERT_PLANE,
            params![name, company.value(), seats.value()],
        )
        .map_err(|e| Error::on_unique_insert("plane", name, e))?;
        Ok(())
    }

    /// Schedules a new trip and returns its store-assigned id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotOpen`] if the store is closed,
    /// [`Error::IncorrectTime`] unless the departure strictly precedes the
    /// arrival (nothing is inserted in that case), and [`Error::Database`]
    /// if the insertion fails, including when the referenced company or
    /// plane does not exist, which the declared foreign keys reject.
    pub fn plan_trip(&self, plan: &TripPlan) -> Result<TripId> {
        let conn = self.connection()?;

        if !plan.times_ordered() {
            return Err(Error::IncorrectTime {
                departure: plan.departs_at,
                arrival: plan.arrives_at,
            });
        }

        conn.execute(
            INSERT_TRIP,
            params![
                plan.company.value(),
                plan.plane.value(),
                plan.departs_at.timestamp(),
                plan.arrives_at.timestamp(),
                plan.origin,
                plan.destination,
            ],
        )?;

        let id = TripId::from(conn.last_insert_rowid());
        log::debug!("planned trip {id}: {} -> {}", plan.origin, plan.destination);
        Ok(id)
    }

    /// Assigns a seat on a trip to a passenger.
    ///
    /// Validation happens in a fixed order, which determines the reported
    /// error when several preconditions are violated at once: the passenger
    /// is resolved first, then the trip's plane, then the
    /// existing-assignment check, then the range check.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotOpen`] if the store is closed; [`Error::NotFound`]
    /// if the passenger, the trip, or its plane cannot be resolved;
    /// [`Error::SeatTaken`] if the seat is already assigned on this trip;
    /// [`Error::SeatRange`] if the seat number does not exist on the plane;
    /// [`Error::Database`] otherwise.
    pub fn take_seat(&self, trip: TripId, passenger_name: &str, seat: u16) -> Result<()> {
        let conn = self.connection()?;

        let passenger = lookup_passenger(conn, passenger_name)?;
        let plane = trip_plane(conn, trip)?;
        let capacity = plane_seat_count(conn, plane)?;

        let taken: i64 = conn.query_row(CHECK_SEAT_TAKEN, params![trip.value(), seat], |row| {
            row.get(0)
        })?;
        if taken > 0 {
            return Err(Error::SeatTaken { trip, seat });
        }

        if !capacity.contains(seat) {
            return Err(Error::SeatRange {
                value: seat,
                reason: format!("plane has {capacity} seats"),
            });
        }

        conn.execute(
            INSERT_SEAT_ASSIGNMENT,
            params![trip.value(), passenger.value(), seat],
        )?;
        log::debug!("passenger '{passenger_name}' took seat {seat} on trip {trip}");
        Ok(())
    }

    /// Computes the free seats on a trip, in ascending order.
    ///
    /// The full seat range of the trip's plane is constructed and every
    /// assigned seat is removed from it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotOpen`] if the store is closed, [`Error::NotFound`]
    /// if the trip or its plane cannot be resolved, and [`Error::Database`]
    /// on a query failure while enumerating assignments.
    pub fn free_seats(&self, trip: TripId) -> Result<Vec<u16>> {
        let conn = self.connection()?;

        let plane = trip_plane(conn, trip)?;
        let capacity = plane_seat_count(conn, plane)?;

        let mut stmt = conn.prepare(SELECT_TAKEN_SEATS)?;
        let taken = stmt
            .query_map(params![trip.value()], |row| row.get::<_, u16>(0))?
            .collect::<std::result::Result<HashSet<u16>, rusqlite::Error>>()?;

        Ok(capacity
            .numbers()
            .filter(|seat| !taken.contains(seat))
            .collect())
    }

    /// Retrieves a trip by id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotOpen`] if the store is closed and
    /// [`Error::Database`] if the query fails (other than "not found").
    ///
    /// # Returns
    ///
    /// - `Ok(Some(trip))` if the trip exists
    /// - `Ok(None)` if it doesn't
    pub fn trip(&self, id: TripId) -> Result<Option<Trip>> {
        let conn = self.connection()?;

        match conn.query_row(SELECT_TRIP, params![id.value()], row_to_trip) {
            Ok(trip) => Ok(Some(trip)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Lists every trip in the store, ordered by id.
    ///
    /// Returns an empty vector (not an error) if no trips exist.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotOpen`] if the store is closed and
    /// [`Error::Database`] if the query fails or a trip cannot be
    /// deserialized.
    pub fn all_trips(&self) -> Result<Vec<Trip>> {
        let conn = self.connection()?;
        let mut stmt = conn.prepare(LIST_TRIPS)?;

        let trips = stmt
            .query_map([], row_to_trip)?
            .collect::<std::result::Result<Vec<_>, rusqlite::Error>>()?;

        Ok(trips)
    }

    /// Lists the trips between two towns, matched exactly, ordered by id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotOpen`] if the store is closed and
    /// [`Error::Database`] if the query fails or a trip cannot be
    /// deserialized.
    pub fn trips_between(&self, origin: &str, destination: &str) -> Result<Vec<Trip>> {
        let conn = self.connection()?;
        let mut stmt = conn.prepare(LIST_TRIPS_BY_ROUTE)?;

        let trips = stmt
            .query_map(params![origin, destination], row_to_trip)?
            .collect::<std::result::Result<Vec<_>, rusqlite::Error>>()?;

        Ok(trips)
    }

    /// Lists every company, ordered by name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotOpen`] if the store is closed and
    /// [`Error::Database`] if the query fails.
    pub fn companies(&self) -> Result<Vec<Company>> {
        let conn = self.connection()?;
        let mut stmt = conn.prepare(LIST_COMPANIES)?;

        let companies = stmt
            .query_map([], row_to_company)?
            .collect::<std::result::Result<Vec<_>, rusqlite::Error>>()?;

        Ok(companies)
    }

    /// Lists every plane, ordered by name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotOpen`] if the store is closed and
    /// [`Error::Database`] if the query fails.
    pub fn planes(&self) -> Result<Vec<Plane>> {
        let conn = self.connection()?;
        let mut stmt = conn.prepare(LIST_PLANES)?;

        let planes = stmt
            .query_map([], row_to_plane)?
            .collect::<std::result::Result<Vec<_>, rusqlite::Error>>()?;

        Ok(planes)
    }

    /// Lists every passenger, ordered by name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotOpen`] if the store is closed and
    /// [`Error::Database`] if the query fails.
    pub fn passengers(&self) -> Result<Vec<Passenger>> {
        let conn = self.connection()?;
        let mut stmt = conn.prepare(LIST_PASSENGERS)?;

        let passengers = stmt
            .query_map([], row_to_passenger)?
            .collect::<std::result::Result<Vec<_>, rusqlite::Error>>()?;

        Ok(passengers)
    }

    /// Lists the seat assignments on a trip, ordered by seat number.
    ///
    /// Returns an empty vector for a trip with no assignments, including a
    /// trip id that does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotOpen`] if the store is closed and
    /// [`Error::Database`] if the query fails.
    pub fn seat_assignments(&self, trip: TripId) -> Result<Vec<SeatAssignment>> {
        let conn = self.connection()?;
        let mut stmt = conn.prepare(LIST_SEAT_ASSIGNMENTS)?;

        let assignments = stmt
            .query_map(params![trip.value()], row_to_assignment)?
            .collect::<std::result::Result<Vec<_>, rusqlite::Error>>()?;

        Ok(assignments)
    }
}
