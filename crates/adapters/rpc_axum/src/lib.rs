//! # hearth-adapter-rpc-axum
//!
//! RPC listener built on [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Host the thermostat, security, and device services on **one endpoint**,
//!   routing each call by `/<package>.<Service>/<Method>`
//! - Carry each call mode over a matching HTTP mechanism:
//!   - unary — `POST` with a JSON body, JSON reply
//!   - server-streaming — `POST` with a JSON body, Server-Sent Events reply
//!   - client- and bidirectional streaming — WebSocket with JSON frames
//! - Map wire messages into application service calls (driving adapter)
//! - Map application errors into RPC status codes
//! - Optionally serve the controller's static web page
//!
//! ## Dependency rule
//! Depends on `hearth-app` (for the store port and services) and
//! `hearth-domain` (for domain types used in request/response mapping).
//! Never leaks axum types into the domain.

pub mod error;
pub mod frame;
pub mod router;
pub mod rpc;
pub mod state;
pub mod wire;
