//! Shared utilities.
//!
//! - [`errors`]: Application error type and HTTP status mapping
//! - [`jwt`]: JWT token creation and verification
//! - [`net`]: Client address extraction for audit rows

pub mod errors;
pub mod jwt;
pub mod net;
