//! Shared test utilities for store unit tests.
//!
//! This module provides helper functions used across multiple store test
//! modules.

use chrono::{DateTime, Utc};
use tempfile::tempdir;

use crate::model::{CompanyId, PlaneId, TripPlan};
use crate::store::{Store, StoreConfig};

/// Creates a temporary test store that will be cleaned up automatically.
///
/// # Panics
///
/// Panics if the temporary directory or store cannot be created.
/// This is acceptable in test code where we want to fail fast.
#[must_use]
pub fn create_test_store() -> Store {
    let dir = tempdir().unwrap();
    let path = dir.path().join("test.db");
    let config = StoreConfig::new(path);
    let store = Store::open(config).unwrap();

    // Prevent the TempDir from being dropped immediately
    std::mem::forget(dir);

    store
}

/// Returns a valid pair of departure and arrival times.
#[must_use]
pub fn sample_times() -> (DateTime<Utc>, DateTime<Utc>) {
    let departs = DateTime::from_timestamp(1_707_642_000, 0).unwrap();
    let arrives = DateTime::from_timestamp(1_707_661_680, 0).unwrap();
    (departs, arrives)
}

/// Seeds the store with company "S7" and its plane "A320" (180 seats),
/// returning their ids.
///
/// # Panics
///
/// Panics if the entities cannot be created or resolved.
pub fn seed_airline(store: &Store) -> (CompanyId, PlaneId) {
    store.add_company("S7").unwrap();
    store.add_plane("A320", "S7", 180).unwrap();

    let company = store
        .companies()
        .unwrap()
        .into_iter()
        .find(|c| c.name == "S7")
        .unwrap()
        .id;
    let plane = store
        .planes()
        .unwrap()
        .into_iter()
        .find(|p| p.name == "A320")
        .unwrap()
        .id;
    (company, plane)
}

/// Builds a trip plan with valid times between the given towns.
#[must_use]
pub fn sample_plan(
    company: CompanyId,
    plane: PlaneId,
    origin: &str,
    destination: &str,
) -> TripPlan {
    let (departs, arrives) = sample_times();
    TripPlan::new(company, plane, departs, arrives, origin, destination)
}
