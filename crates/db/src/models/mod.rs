//! Row models for the tables touched by the gateway.

pub mod notification;
pub mod profile;
pub mod relationship;
