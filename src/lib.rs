#![deny(missing_docs, unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! # aero
//!
//! A library for managing airline trip and seat reservations.
//!
//! This library provides core types and functionality for tracking companies,
//! planes, scheduled trips, passengers, and seat assignments on top of a
//! persistent `SQLite` store, enforcing capacity and referential invariants.
//!
//! ## Core Types
//!
//! - [`Store`] and [`StoreConfig`]: the reservation store and its connection
//!   settings
//! - [`Trip`] and [`TripPlan`]: scheduled trips and the shape used to plan one
//! - [`SeatCount`]: validated plane capacity
//! - [`Error`] and [`Result`]: error handling types
//!
//! ## Examples
//!
//! ```no_run
//! use aero::{Store, StoreConfig};
//!
//! let mut store = Store::open(StoreConfig::new("/tmp/aero.db")).unwrap();
//! store.add_company("S7").unwrap();
//! store.add_plane("A320", "S7", 180).unwrap();
//! store.close().unwrap();
//! ```

pub mod error;
pub mod model;
pub mod seat;
pub mod store;

// Re-export key types at crate root for convenience
pub use error::{Error, Result};
pub use model::{
    Company, CompanyId, Passenger, PassengerId, Plane, PlaneId, SeatAssignment, Trip, TripId,
    TripPlan,
};
pub use seat::SeatCount;
pub use store::{Store, StoreConfig};
