//! Application services — use-case implementations.
//!
//! Each service struct accepts a [`HomeStateStore`](crate::ports::HomeStateStore)
//! implementation via a generic parameter (constructor injection), so the
//! same store instance is shared by reference rather than through globals.

pub mod device_service;
pub mod security_service;
pub mod thermostat_service;
