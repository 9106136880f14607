//! Integration tests for the reservation store.
//!
//! These tests exercise the full stack including auto-initialization,
//! persistence across reopen, booking flows, and the cascading and merging
//! behavior of the delete operations.

use chrono::DateTime;
use tempfile::tempdir;

use aero::{Error, Store, StoreConfig, TripId, TripPlan};

fn sample_times() -> (chrono::DateTime<chrono::Utc>, chrono::DateTime<chrono::Utc>) {
    let departs = DateTime::from_timestamp(1_707_642_000, 0).unwrap();
    let arrives = DateTime::from_timestamp(1_707_661_680, 0).unwrap();
    (departs, arrives)
}

fn plan_between(store: &Store, company_name: &str, plane_name: &str, origin: &str, destination: &str) -> TripId {
    let company = store
        .companies()
        .unwrap()
        .into_iter()
        .find(|c| c.name == company_name)
        .unwrap()
        .id;
    let plane = store
        .planes()
        .unwrap()
        .into_iter()
        .find(|p| p.name == plane_name)
        .unwrap()
        .id;
    let (departs, arrives) = sample_times();
    store
        .plan_trip(&TripPlan::new(
            company, plane, departs, arrives, origin, destination,
        ))
        .unwrap()
}

#[test]
fn test_booking_walkthrough() {
    let dir = tempdir().unwrap();
    let store = Store::open(StoreConfig::new(dir.path().join("aero.db"))).unwrap();

    store.add_company("S7").unwrap();
    store.add_plane("A320", "S7", 180).unwrap();
    store.add_passenger("Mark").unwrap();
    let trip = plan_between(&store, "S7", "A320", "Moscow", "Tokyo");

    // A fresh trip offers the full seat range
    let free = store.free_seats(trip).unwrap();
    assert_eq!(free, (1..=180).collect::<Vec<u16>>());

    // Taking a seat removes exactly that seat
    store.take_seat(trip, "Mark", 10).unwrap();
    let free = store.free_seats(trip).unwrap();
    assert_eq!(free, (1..=180).filter(|&s| s != 10).collect::<Vec<u16>>());

    // Taking the same seat again fails
    let err = store.take_seat(trip, "Mark", 10).unwrap_err();
    assert!(matches!(err, Error::SeatTaken { seat: 10, .. }));
}

#[test]
fn test_reservations_survive_reopen() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("aero.db");

    let trip = {
        let mut store = Store::open(StoreConfig::new(&path)).unwrap();
        store.add_company("S7").unwrap();
        store.add_plane("A320", "S7", 180).unwrap();
        store.add_passenger("Mark").unwrap();
        let trip = plan_between(&store, "S7", "A320", "Moscow", "Tokyo");
        store.take_seat(trip, "Mark", 42).unwrap();
        store.close().unwrap();
        trip
    };

    let store = Store::open(StoreConfig::new(&path)).unwrap();
    let reopened = store.trip(trip).unwrap().unwrap();
    assert_eq!(reopened.origin, "Moscow");
    assert_eq!(reopened.destination, "Tokyo");

    let free = store.free_seats(trip).unwrap();
    assert!(!free.contains(&42));
    assert_eq!(free.len(), 179);
}

#[test]
fn test_closed_store_rejects_everything() {
    let dir = tempdir().unwrap();
    let mut store = Store::open(StoreConfig::new(dir.path().join("aero.db"))).unwrap();
    store.add_company("S7").unwrap();
    store.close().unwrap();

    assert!(matches!(store.add_company("Volga"), Err(Error::NotOpen)));
    assert!(matches!(store.all_trips(), Err(Error::NotOpen)));
    assert!(matches!(
        store.delete_company("S7", "Volga"),
        Err(Error::NotOpen)
    ));
    assert!(matches!(store.close(), Err(Error::NotOpen)));
}

#[test]
fn test_company_merge_keeps_bookings_usable() {
    let dir = tempdir().unwrap();
    let mut store = Store::open(StoreConfig::new(dir.path().join("aero.db"))).unwrap();

    store.add_company("S7").unwrap();
    store.add_company("Red Wings").unwrap();
    store.add_plane("A320", "S7", 180).unwrap();
    store.add_passenger("Mark").unwrap();
    let trip = plan_between(&store, "S7", "A320", "Moscow", "Tokyo");
    store.take_seat(trip, "Mark", 10).unwrap();

    store.delete_company("S7", "Red Wings").unwrap();

    // The trip and its assignment survived the merge, so booking continues
    store.take_seat(trip, "Mark", 11).unwrap();
    assert_eq!(store.seat_assignments(trip).unwrap().len(), 2);

    let heir = store
        .companies()
        .unwrap()
        .into_iter()
        .find(|c| c.name == "Red Wings")
        .unwrap()
        .id;
    assert_eq!(store.trip(trip).unwrap().unwrap().company, heir);
}

#[test]
fn test_plane_delete_ends_only_its_trips() {
    let dir = tempdir().unwrap();
    let mut store = Store::open(StoreConfig::new(dir.path().join("aero.db"))).unwrap();

    store.add_company("S7").unwrap();
    store.add_plane("A320", "S7", 180).unwrap();
    store.add_plane("B737", "S7", 150).unwrap();
    store.add_passenger("Mark").unwrap();

    let doomed = plan_between(&store, "S7", "A320", "Moscow", "Tokyo");
    let survivor = plan_between(&store, "S7", "B737", "Moscow", "Paris");
    store.take_seat(doomed, "Mark", 1).unwrap();
    store.take_seat(survivor, "Mark", 1).unwrap();

    store.delete_plane("A320").unwrap();

    assert!(store.trip(doomed).unwrap().is_none());
    assert!(store.seat_assignments(doomed).unwrap().is_empty());
    assert!(store.trip(survivor).unwrap().is_some());
    assert_eq!(store.seat_assignments(survivor).unwrap().len(), 1);

    // Ended trip ids stay retired
    let err = store.free_seats(doomed).unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn test_route_queries_across_airlines() {
    let dir = tempdir().unwrap();
    let store = Store::open(StoreConfig::new(dir.path().join("aero.db"))).unwrap();

    store.add_company("S7").unwrap();
    store.add_company("Red Wings").unwrap();
    store.add_plane("A320", "S7", 180).unwrap();
    store.add_plane("SSJ-100", "Red Wings", 98).unwrap();

    plan_between(&store, "S7", "A320", "Moscow", "New-york");
    plan_between(&store, "Red Wings", "SSJ-100", "Moscow", "New-york");
    plan_between(&store, "S7", "A320", "Moscow", "Tokyo");

    let trips = store.trips_between("Moscow", "New-york").unwrap();
    assert_eq!(trips.len(), 2);
    // Ordered by id, both matching the exact route
    assert!(trips.windows(2).all(|w| w[0].id < w[1].id));
    assert!(trips
        .iter()
        .all(|t| t.origin == "Moscow" && t.destination == "New-york"));

    assert_eq!(store.all_trips().unwrap().len(), 3);
    assert!(store.trips_between("Tokyo", "Moscow").unwrap().is_empty());
}
