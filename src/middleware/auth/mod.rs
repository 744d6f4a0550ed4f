//! Bearer-token middleware.
//!
//! - `access::apply`: verify the token, put the derived `AuthContext` into request extensions
//! - `role::require_role`: same verification, then an exact role match (no hierarchy)
pub mod access;
pub mod role;
