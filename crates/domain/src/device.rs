//! Devices — smart appliances that can be switched on in a room.

use std::borrow::Borrow;
use std::fmt;

use crate::error::ValidationError;

/// Free-form device kind such as `"TV"` or `"Smart Speaker"`.
///
/// The registry holds at most one entry per device type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeviceType(String);

impl DeviceType {
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyDeviceType`] for blank names.
    pub fn new(name: impl Into<String>) -> Result<Self, ValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ValidationError::EmptyDeviceType);
        }
        Ok(Self(name))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for DeviceType {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Power command for a device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceAction {
    On,
    Off,
}

impl DeviceAction {
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidDeviceAction`] unless `raw` is
    /// exactly `on` or `off`.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        match raw {
            "on" => Ok(Self::On),
            "off" => Ok(Self::Off),
            _ => Err(ValidationError::InvalidDeviceAction(raw.to_string())),
        }
    }
}

impl fmt::Display for DeviceAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::On => f.write_str("on"),
            Self::Off => f.write_str("off"),
        }
    }
}
