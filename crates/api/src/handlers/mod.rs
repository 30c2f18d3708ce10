//! Request handlers.
//!
//! Handlers delegate to the [`Authorizer`](livix_core::authorization::Authorizer)
//! and [`Dispatcher`](livix_events::Dispatcher) held in state and map errors
//! via [`AppError`](crate::error::AppError).

pub mod health;
pub mod notification;
