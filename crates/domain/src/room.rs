//! Rooms — the fixed set of physical rooms the controller knows about.
//!
//! Every service resolves room numbers through [`RoomId::parse`] so the
//! validation rule lives in exactly one place. Unknown numbers are never
//! coerced into a room.

use std::fmt;

use crate::error::ValidationError;

/// Number of rooms in the house.
pub const ROOM_COUNT: usize = 5;

/// One of the five rooms, numbered 1 through 5 on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RoomId {
    LivingRoom,
    MasterBedroom,
    KidsBedroom,
    Kitchen,
    Garage,
}

/// Lookup table indexed by [`RoomId::slot`].
const ROOMS: [(RoomId, u8, &str); ROOM_COUNT] = [
    (RoomId::LivingRoom, 1, "Living Room"),
    (RoomId::MasterBedroom, 2, "Master Bedroom"),
    (RoomId::KidsBedroom, 3, "Kids Bedroom"),
    (RoomId::Kitchen, 4, "Kitchen"),
    (RoomId::Garage, 5, "Garage"),
];

impl RoomId {
    /// All rooms in wire order.
    #[must_use]
    pub fn all() -> [RoomId; ROOM_COUNT] {
        ROOMS.map(|(room, _, _)| room)
    }

    /// Resolve a wire room number such as `"3"`.
    ///
    /// Only the canonical digits `"1"` to `"5"` are accepted: padded,
    /// signed or zero-prefixed forms are rejected, not normalised.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidRoom`] for anything else.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        match raw.as_bytes() {
            [digit @ b'0'..=b'9'] => Self::from_number(digit - b'0'),
            _ => None,
        }
        .ok_or_else(|| ValidationError::InvalidRoom(raw.to_string()))
    }

    /// Resolve a numeric room id, `None` if out of range.
    #[must_use]
    pub fn from_number(number: u8) -> Option<Self> {
        ROOMS
            .iter()
            .find(|(_, n, _)| *n == number)
            .map(|(room, _, _)| *room)
    }

    /// Wire number of this room (1-based).
    #[must_use]
    pub fn number(self) -> u8 {
        ROOMS[self.slot()].1
    }

    /// Human-readable room name.
    #[must_use]
    pub fn name(self) -> &'static str {
        ROOMS[self.slot()].2
    }

    /// Zero-based index into per-room storage.
    #[must_use]
    pub fn slot(self) -> usize {
        self as usize
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
