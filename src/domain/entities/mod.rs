//! Core domain entities.
//!
//! Entities are plain data structures without business logic.
//!
//! - [`Link`] - A shortened URL mapping
//! - [`Click`] - A persisted redirect event
//!
//! Creation goes through the separate `NewLink` / `NewClick` input structs;
//! the store assigns identifiers.

pub mod click;
pub mod link;

pub use click::{Click, NewClick};
pub use link::{Link, NewLink};
