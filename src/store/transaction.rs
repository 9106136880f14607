//! Multi-statement operations with transactional guarantees.
//!
//! This module implements the operations that touch several rows as one
//! unit: merging a company into an heir, deleting a plane together with the
//! trips that reference it, and ending a trip together with its seat
//! assignments. Each runs inside an immediate transaction that is committed
//! only if every sub-step succeeds; any failure or early return rolls the
//! whole operation back.

use rusqlite::{params, Connection, TransactionBehavior};

use crate::error::{Error, Result};
use crate::model::TripId;

use super::connection::Store;
use super::operations::{lookup_company, lookup_plane};

const REASSIGN_PLANES: &str = "UPDATE plane SET company_id = ?1 WHERE company_id = ?2";
const REASSIGN_TRIPS: &str = "UPDATE trip SET company_id = ?1 WHERE company_id = ?2";
const DELETE_COMPANY: &str = "DELETE FROM company WHERE id = ?";

const SELECT_TRIPS_BY_PLANE: &str = "SELECT id FROM trip WHERE plane_id = ?";
const DELETE_PLANE: &str = "DELETE FROM plane WHERE id = ?";

const SELECT_TRIP_EXISTS: &str = "SELECT id FROM trip WHERE id = ?";
const DELETE_TRIP_ASSIGNMENTS: &str = "DELETE FROM seat_assignment WHERE trip_id = ?";
const DELETE_TRIP: &str = "DELETE FROM trip WHERE id = ?";

/// Removes a trip row together with its seat assignments.
///
/// Callers are responsible for running this inside a transaction.
fn end_trip_in(conn: &Connection, trip: TripId) -> Result<()> {
    conn.execute(DELETE_TRIP_ASSIGNMENTS, params![trip.value()])?;
    conn.execute(DELETE_TRIP, params![trip.value()])?;
    Ok(())
}

impl Store {
    /// Deletes a company, merging its planes and trips onto an heir company.
    ///
    /// This is a merge, not a cascading delete: every plane and trip owned
    /// by the removed company survives under the heir. The re-pointing of
    /// planes, the re-pointing of trips, and the removal of the company row
    /// happen atomically; on any failure the store is left unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotOpen`] if the store is closed, [`Error::NotFound`]
    /// if either `name` or `heir_name` does not resolve to an existing
    /// company, and [`Error::Database`] on any other backing-store failure.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use aero::{Store, StoreConfig};
    ///
    /// let mut store = Store::open(StoreConfig::new("/tmp/aero.db")).unwrap();
    /// store.delete_company("S7", "Red Wings").unwrap();
    /// ```
    pub fn delete_company(&mut self, name: &str, heir_name: &str) -> Result<()> {
        let conn = self.connection_mut()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let doomed = lookup_company(&tx, name)?;
        let heir = lookup_company(&tx, heir_name)?;

        tx.execute(REASSIGN_PLANES, params![heir.value(), doomed.value()])?;
        tx.execute(REASSIGN_TRIPS, params![heir.value(), doomed.value()])?;
        tx.execute(DELETE_COMPANY, params![doomed.value()])?;

        tx.commit()?;
        log::info!("merged company '{name}' into '{heir_name}'");
        Ok(())
    }

    /// Deletes a plane, ending every trip that references it first.
    ///
    /// Each referenced trip is ended the same way [`Store::end_trip`] ends
    /// one (assignments removed, then the trip row), followed by the removal
    /// of the plane row itself. The whole cascade is atomic; on any failure
    /// the store is left unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotOpen`] if the store is closed, [`Error::NotFound`]
    /// if no plane has that name, and [`Error::Database`] on any other
    /// backing-store failure.
    pub fn delete_plane(&mut self, name: &str) -> Result<()> {
        let conn = self.connection_mut()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let plane = lookup_plane(&tx, name)?;

        let trips = {
            let mut stmt = tx.prepare(SELECT_TRIPS_BY_PLANE)?;
            let rows = stmt.query_map(params![plane.value()], |row| {
                row.get::<_, i64>(0).map(TripId::from)
            })?;
            rows.collect::<std::result::Result<Vec<_>, rusqlite::Error>>()?
        };

        log::debug!("ending {} trip(s) before deleting plane '{name}'", trips.len());
        for trip in &trips {
            end_trip_in(&tx, *trip)?;
        }

        tx.execute(DELETE_PLANE, params![plane.value()])?;

        tx.commit()?;
        log::info!("deleted plane '{name}'");
        Ok(())
    }

    /// Ends a trip, removing its seat assignments and then the trip itself.
    ///
    /// Ending is terminal: the trip id is never reused, and no operation
    /// reopens an ended trip. Both deletions happen atomically.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotOpen`] if the store is closed, [`Error::NotFound`]
    /// if no such trip exists, and [`Error::Database`] on any other
    /// backing-store failure.
    pub fn end_trip(&mut self, trip: TripId) -> Result<()> {
        let conn = self.connection_mut()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        match tx.query_row(SELECT_TRIP_EXISTS, params![trip.value()], |row| {
            row.get::<_, i64>(0)
        }) {
            Ok(_) => {}
            Err(rusqlite::Error::QueryReturnedNoRows) => {
                return Err(Error::not_found("trip", trip))
            }
            Err(e) => return Err(e.into()),
        }

        end_trip_in(&tx, trip)?;

        tx.commit()?;
        Ok(())
    }
}
