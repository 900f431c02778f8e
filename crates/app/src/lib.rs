//! # hearth-app
//!
//! Application layer — use-cases, **port definitions** (traits) and the
//! shared state store.
//!
//! ## Responsibilities
//! - Define the `HomeStateStore` port: atomic reads and writes of room
//!   temperatures, room locks, and the online device registry
//! - Provide an in-process implementation of that port (`InMemoryStateStore`)
//! - Implement the three RPC use-cases as services:
//!   - `ThermostatService` — set/get temperature, periodic temperature stream
//!   - `SecurityService` — lock/unlock, client-streamed security actions
//!   - `DeviceService` — bidirectional device control stream
//! - Drive every streaming call through the domain stream lifecycle, using
//!   channels for inbound and outbound messages
//!
//! ## Dependency rule
//! Depends on `hearth-domain` only (plus `tokio::sync`/`tokio::time`).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod ports;
pub mod services;
pub mod state_store;
pub mod stream;
