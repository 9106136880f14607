//! Property-based tests for the free-seat computation.
//!
//! These tests verify that the free-seat set is always the exact complement
//! of the taken seats within the plane's capacity.

use std::collections::HashSet;

use proptest::prelude::*;

use crate::model::TripPlan;
use crate::store::test_util::{create_test_store, sample_times};
use crate::store::Store;
use crate::TripId;

// Strategy producing a capacity together with an arbitrary subset of its
// seat numbers to take.
fn capacity_and_taken() -> impl Strategy<Value = (u16, HashSet<u16>)> {
    (1u16..=48).prop_flat_map(|capacity| {
        let subset = prop::collection::hash_set(1..=capacity, 0..=usize::from(capacity));
        (Just(capacity), subset)
    })
}

// Seeds a store with a single trip on a plane of the given capacity.
fn trip_with_capacity(store: &Store, capacity: u16) -> TripId {
    store.add_company("S7").unwrap();
    store.add_plane("A320", "S7", capacity).unwrap();
    store.add_passenger("Mark").unwrap();

    let company = store.companies().unwrap()[0].id;
    let plane = store.planes().unwrap()[0].id;
    let (departs, arrives) = sample_times();
    store
        .plan_trip(&TripPlan::new(
            company, plane, departs, arrives, "Moscow", "Tokyo",
        ))
        .unwrap()
}

proptest! {
    // Each case opens a real store file, so keep the case count modest.
    #![proptest_config(ProptestConfig {
        cases: 24,
        .. ProptestConfig::default()
    })]

    // The free seats are exactly the complement of the taken seats,
    // ascending and duplicate-free.
    #[test]
    fn free_seats_complement_taken((capacity, taken) in capacity_and_taken()) {
        let store = create_test_store();
        let trip = trip_with_capacity(&store, capacity);

        for &seat in &taken {
            store.take_seat(trip, "Mark", seat).unwrap();
        }

        let free = store.free_seats(trip).unwrap();

        prop_assert!(free.windows(2).all(|w| w[0] < w[1]));
        prop_assert_eq!(free.len() + taken.len(), usize::from(capacity));
        for seat in 1..=capacity {
            let is_free = free.binary_search(&seat).is_ok();
            prop_assert_eq!(is_free, !taken.contains(&seat));
        }
    }

    // Taking any free seat removes exactly that seat from the free set.
    #[test]
    fn taking_a_seat_removes_exactly_that_seat(
        (capacity, taken) in capacity_and_taken(),
        pick in any::<prop::sample::Index>(),
    ) {
        let store = create_test_store();
        let trip = trip_with_capacity(&store, capacity);

        for &seat in &taken {
            store.take_seat(trip, "Mark", seat).unwrap();
        }

        let free_before = store.free_seats(trip).unwrap();
        prop_assume!(!free_before.is_empty());

        let seat = free_before[pick.index(free_before.len())];
        store.take_seat(trip, "Mark", seat).unwrap();

        let free_after = store.free_seats(trip).unwrap();
        let expected: Vec<u16> = free_before.into_iter().filter(|&s| s != seat).collect();
        prop_assert_eq!(free_after, expected);
    }
}
