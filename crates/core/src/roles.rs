//! Well-known role name constants.
//!
//! These must match the values stored in `user_roles.role`.

pub const ROLE_ADMIN: &str = "admin";
