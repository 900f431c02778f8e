//! Temperature — a room reading in degrees Celsius.

use std::fmt;

/// A room temperature in °C.
///
/// `0.0` is the "not set" sentinel every room starts with.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct Temperature(f64);

impl Temperature {
    /// The unset sentinel.
    pub const UNSET: Self = Self(0.0);

    #[must_use]
    pub fn new(celsius: f64) -> Self {
        Self(celsius)
    }

    #[must_use]
    pub fn celsius(self) -> f64 {
        self.0
    }

    /// Whether a value other than the sentinel has been recorded.
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn is_set(self) -> bool {
        self.0 != 0.0
    }
}

impl fmt::Display for Temperature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_set() {
            write!(f, "{}\u{b0}C", self.0)
        } else {
            f.write_str("Temperature is not set.")
        }
    }
}
