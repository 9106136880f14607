//! Entity records and typed identifiers for the reservation ledger.
//!
//! Every entity is identified by an opaque integer assigned by the store on
//! creation. The newtypes here keep the different id spaces from being mixed
//! up at compile time.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::SeatCount;

/// Identifier of a [`Company`] row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompanyId(i64);

impl CompanyId {
    /// Returns the underlying integer identifier.
    #[must_use]
    pub const fn value(self) -> i64 {
        self.0
    }
}

impl From<i64> for CompanyId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl fmt::Display for CompanyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a [`Plane`] row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlaneId(i64);

impl PlaneId {
    /// Returns the underlying integer identifier.
    #[must_use]
    pub const fn value(self) -> i64 {
        self.0
    }
}

impl From<i64> for PlaneId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl fmt::Display for PlaneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a [`Trip`] row.
///
/// Trip ids are never reused: once a trip is ended its id stays retired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TripId(i64);

impl TripId {
    /// Returns the underlying integer identifier.
    #[must_use]
    pub const fn value(self) -> i64 {
        self.0
    }
}

impl From<i64> for TripId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl fmt::Display for TripId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a [`Passenger`] row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PassengerId(i64);

impl PassengerId {
    /// Returns the underlying integer identifier.
    #[must_use]
    pub const fn value(self) -> i64 {
        self.0
    }
}

impl From<i64> for PassengerId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl fmt::Display for PassengerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An airline company.
///
/// Companies own planes and operate trips. Company names are unique across
/// the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    /// Store-assigned identifier.
    pub id: CompanyId,
    /// Unique company name.
    pub name: String,
}

/// A plane belonging to exactly one company.
///
/// Plane names are unique across the store, not per company.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plane {
    /// Store-assigned identifier.
    pub id: PlaneId,
    /// Unique plane name.
    pub name: String,
    /// The owning company.
    pub company: CompanyId,
    /// Seat capacity; seats are numbered `1..=seats`.
    pub seats: SeatCount,
}

/// A passenger, independent of any trip until assigned a seat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Passenger {
    /// Store-assigned identifier.
    pub id: PassengerId,
    /// Unique passenger name.
    pub name: String,
}

/// A seat held by a passenger on a trip.
///
/// At most one assignment exists per `(trip, seat)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatAssignment {
    /// The trip the seat belongs to.
    pub trip: TripId,
    /// The passenger holding the seat.
    pub passenger: PassengerId,
    /// The assigned seat number.
    pub seat: u16,
}

/// A scheduled trip between two towns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trip {
    /// Store-assigned identifier.
    pub id: TripId,
    /// The operating company.
    pub company: CompanyId,
    /// The plane flying the trip.
    pub plane: PlaneId,
    /// Departure time.
    pub departs_at: DateTime<Utc>,
    /// Arrival time; always after the departure.
    pub arrives_at: DateTime<Utc>,
    /// Town of departure.
    pub origin: String,
    /// Town of arrival.
    pub destination: String,
}

/// The insert-shape of a trip: everything except the store-assigned id.
///
/// # Examples
///
/// ```
/// use aero::{CompanyId, PlaneId, TripPlan};
/// use chrono::DateTime;
///
/// let departs = DateTime::from_timestamp(1_707_642_000, 0).unwrap();
/// let arrives = DateTime::from_timestamp(1_707_661_680, 0).unwrap();
/// let plan = TripPlan::new(
///     CompanyId::from(1),
///     PlaneId::from(3),
///     departs,
///     arrives,
///     "Moscow",
///     "Tokyo",
/// );
/// assert!(plan.times_ordered());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripPlan {
    /// The operating company.
    pub company: CompanyId,
    /// The plane flying the trip.
    pub plane: PlaneId,
    /// Departure time.
    pub departs_at: DateTime<Utc>,
    /// Arrival time.
    pub arrives_at: DateTime<Utc>,
    /// Town of departure.
    pub origin: String,
    /// Town of arrival.
    pub destination: String,
}

impl TripPlan {
    /// Creates a new trip plan.
    #[must_use]
    pub fn new(
        company: CompanyId,
        plane: PlaneId,
        departs_at: DateTime<Utc>,
        arrives_at: DateTime<Utc>,
        origin: impl Into<String>,
        destination: impl Into<String>,
    ) -> Self {
        Self {
            company,
            plane,
            departs_at,
            arrives_at,
            origin: origin.into(),
            destination: destination.into(),
        }
    }

    /// Returns `true` if the departure strictly precedes the arrival.
    #[must_use]
    pub fn times_ordered(&self) -> bool {
        self.departs_at < self.arrives_at
    }
}
