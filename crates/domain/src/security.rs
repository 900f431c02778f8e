//! Security — room locks and the actions that drive them.

use std::fmt;

use crate::error::ValidationError;

/// Lock command carried by a security action stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecurityAction {
    LockOn,
    LockOff,
}

impl SecurityAction {
    /// Resolve a protobuf-style enum value: either its exact name or its number.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidSecurityAction`] for anything else.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        match raw {
            "LOCK_ON" | "0" => Ok(Self::LockOn),
            "LOCK_OFF" | "1" => Ok(Self::LockOff),
            _ => Err(ValidationError::InvalidSecurityAction(raw.to_string())),
        }
    }
}

impl fmt::Display for SecurityAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LockOn => f.write_str("LOCK_ON"),
            Self::LockOff => f.write_str("LOCK_OFF"),
        }
    }
}

/// Whether a room is locked. Rooms start unlocked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LockState {
    Locked,
    #[default]
    Unlocked,
}

impl LockState {
    #[must_use]
    pub fn is_locked(self) -> bool {
        matches!(self, Self::Locked)
    }
}

impl From<bool> for LockState {
    fn from(locked: bool) -> Self {
        if locked { Self::Locked } else { Self::Unlocked }
    }
}

impl fmt::Display for LockState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Locked => f.write_str("on"),
            Self::Unlocked => f.write_str("off"),
        }
    }
}
