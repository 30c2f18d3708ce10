//! Livix notification domain.
//!
//! Pure types and decision logic shared by the database adapter, the
//! delivery crate, and the HTTP server:
//!
//! - [`notification`] -- the closed set of notification kinds and their
//!   typed payloads.
//! - [`ports`] -- the store traits the domain reads from and writes to.
//! - [`authorization`] -- who may address a notification to whom.
//! - [`error`] -- the domain error taxonomy.

pub mod authorization;
pub mod error;
pub mod notification;
pub mod ports;
pub mod roles;
pub mod text;
pub mod types;
