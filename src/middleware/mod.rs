//! Request middleware.
//!
//! - [`auth`]: bearer-token validation and the [`auth::AuthUser`] extractor
//! - [`role`]: role-gating layers and helpers
//!
//! # Authentication flow
//!
//! 1. Client sends `Authorization: Bearer <token>`
//! 2. [`auth::AuthUser`] validates the JWT and exposes the claims
//! 3. Role layers reject requests whose role is not allowed
//! 4. Services perform per-row ownership checks (course instructor,
//!    enrollment) on top of the role gate

pub mod auth;
pub mod role;
