//! Configuration modules.
//!
//! Each submodule handles one aspect of configuration, loaded from
//! environment variables with sensible development defaults.
//!
//! - [`cors`]: allowed origins
//! - [`database`]: PostgreSQL connection pool
//! - [`jwt`]: token secret and expiry
//! - [`upload`]: evidence upload directory and size cap

pub mod cors;
pub mod database;
pub mod jwt;
pub mod upload;
