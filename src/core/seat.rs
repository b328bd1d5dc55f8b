//! Seat identification, per-seat storage and turn order.
//!
//! ## SeatId
//!
//! Type-safe identifier for one of the four seats at the table.
//!
//! ## SeatMap
//!
//! Per-seat data storage backed by `Vec` for O(1) access by `SeatId`.
//!
//! ## TurnOrder
//!
//! A cyclic permutation of the four seats, fixed when the session is created.
//! Respond windows and turn hand-offs are all derived from it.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::ops::{Index, IndexMut};

use super::error::{CommandError, ConfigError};

/// Number of seats at a table.
pub const SEAT_COUNT: usize = 4;

/// Seat identifier.
///
/// Seat indices are 0-based: the first seat is `SeatId(0)`. The 1-based
/// [`display_number`](SeatId::display_number) is what players see and does not
/// depend on turn order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct SeatId(pub u8);

impl SeatId {
    /// Create a new seat ID.
    #[must_use]
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    /// Get the raw seat index (0-based).
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Whether this names one of the four seats.
    #[must_use]
    pub const fn is_valid(self) -> bool {
        (self.0 as usize) < SEAT_COUNT
    }

    /// Label shown to players (1-based).
    #[must_use]
    pub const fn display_number(self) -> u8 {
        self.0 + 1
    }

    /// Iterate over all four seats in index order.
    ///
    /// ```
    /// use kabo_engine::core::SeatId;
    ///
    /// let seats: Vec<_> = SeatId::all().collect();
    /// assert_eq!(seats.len(), 4);
    /// assert_eq!(seats[3], SeatId::new(3));
    /// ```
    pub fn all() -> impl Iterator<Item = SeatId> {
        (0..SEAT_COUNT as u8).map(SeatId)
    }
}

impl TryFrom<u8> for SeatId {
    type Error = CommandError;

    fn try_from(id: u8) -> Result<Self, Self::Error> {
        let seat = SeatId(id);
        if seat.is_valid() {
            Ok(seat)
        } else {
            Err(CommandError::UnknownSeat(id))
        }
    }
}

impl From<SeatId> for u8 {
    fn from(seat: SeatId) -> u8 {
        seat.0
    }
}

impl std::fmt::Display for SeatId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Seat {}", self.display_number())
    }
}

/// Per-seat data storage with O(1) access.
///
/// ## Example
///
/// ```
/// use kabo_engine::core::{SeatId, SeatMap};
///
/// let mut scores: SeatMap<u32> = SeatMap::with_value(0);
/// scores[SeatId::new(2)] = 7;
/// assert_eq!(scores[SeatId::new(2)], 7);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SeatMap<T> {
    data: Vec<T>,
}

impl<T> SeatMap<T> {
    /// Create a new SeatMap with values from a factory function.
    pub fn new(factory: impl Fn(SeatId) -> T) -> Self {
        Self {
            data: SeatId::all().map(factory).collect(),
        }
    }

    /// Create a new SeatMap with all entries set to the same value.
    pub fn with_value(value: T) -> Self
    where
        T: Clone,
    {
        Self::new(|_| value.clone())
    }

    /// Create a new SeatMap with default values.
    pub fn with_default() -> Self
    where
        T: Default,
    {
        Self::new(|_| T::default())
    }

    #[must_use]
    pub fn get(&self, seat: SeatId) -> &T {
        &self.data[seat.index()]
    }

    pub fn get_mut(&mut self, seat: SeatId) -> &mut T {
        &mut self.data[seat.index()]
    }

    /// Iterate over (SeatId, &T) pairs in seat index order.
    pub fn iter(&self) -> impl Iterator<Item = (SeatId, &T)> {
        self.data
            .iter()
            .enumerate()
            .map(|(i, v)| (SeatId(i as u8), v))
    }
}

impl<T> Index<SeatId> for SeatMap<T> {
    type Output = T;

    fn index(&self, seat: SeatId) -> &Self::Output {
        self.get(seat)
    }
}

impl<T> IndexMut<SeatId> for SeatMap<T> {
    fn index_mut(&mut self, seat: SeatId) -> &mut Self::Output {
        self.get_mut(seat)
    }
}

/// Sequence of seats visited by a respond window, starting at one seat.
pub type SeatOrder = SmallVec<[SeatId; SEAT_COUNT]>;

/// Cyclic turn order over all four seats.
///
/// ```
/// use kabo_engine::core::{SeatId, TurnOrder};
///
/// let order = TurnOrder::default();
/// assert_eq!(order.first(), SeatId::new(0));
/// assert_eq!(order.next_after(SeatId::new(3)), SeatId::new(0));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "[SeatId; SEAT_COUNT]", into = "[SeatId; SEAT_COUNT]")]
pub struct TurnOrder([SeatId; SEAT_COUNT]);

impl TurnOrder {
    /// Build a turn order. Every seat must appear exactly once.
    pub fn new(seats: [SeatId; SEAT_COUNT]) -> Result<Self, ConfigError> {
        let mut seen = [false; SEAT_COUNT];
        for seat in seats {
            let slot = seen
                .get_mut(seat.index())
                .ok_or(ConfigError::InvalidTurnOrder(seats))?;
            if *slot {
                return Err(ConfigError::InvalidTurnOrder(seats));
            }
            *slot = true;
        }
        Ok(Self(seats))
    }

    /// The seat that takes the opening turn.
    #[must_use]
    pub fn first(&self) -> SeatId {
        self.0[0]
    }

    /// Seats in turn order.
    #[must_use]
    pub fn seats(&self) -> &[SeatId] {
        &self.0
    }

    #[must_use]
    pub fn position_of(&self, seat: SeatId) -> Option<usize> {
        self.0.iter().position(|&s| s == seat)
    }

    /// Seat that follows `seat` in turn order, wrapping around.
    #[must_use]
    pub fn next_after(&self, seat: SeatId) -> SeatId {
        match self.position_of(seat) {
            Some(pos) => self.0[(pos + 1) % SEAT_COUNT],
            None => self.first(),
        }
    }

    /// Turn order rotated so that `seat` comes first.
    #[must_use]
    pub fn rotated_from(&self, seat: SeatId) -> SeatOrder {
        let start = self.position_of(seat).unwrap_or(0);
        self.0[start..].iter().chain(&self.0[..start]).copied().collect()
    }
}

impl Default for TurnOrder {
    fn default() -> Self {
        Self([SeatId(0), SeatId(1), SeatId(2), SeatId(3)])
    }
}

impl TryFrom<[SeatId; SEAT_COUNT]> for TurnOrder {
    type Error = ConfigError;

    fn try_from(seats: [SeatId; SEAT_COUNT]) -> Result<Self, Self::Error> {
        Self::new(seats)
    }
}

impl From<TurnOrder> for [SeatId; SEAT_COUNT] {
    fn from(order: TurnOrder) -> Self {
        order.0
    }
}
