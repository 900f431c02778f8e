//! # hearth-domain
//!
//! Pure domain model for the hearth smart-home controller.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers, error conventions
//! - Define **Rooms** (the fixed 1–5 lookup table shared by every service)
//! - Define **Temperatures**, **Lock states** and **Security actions**
//! - Define **Device types** and **Device actions**
//! - Define the **stream lifecycle** every streaming call goes through
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.

pub mod error;
pub mod id;

pub mod device;
pub mod room;
pub mod security;
pub mod stream;
pub mod temperature;
