//! # Rollcall API
//!
//! A classroom attendance management REST API built with Rust, Axum, and
//! PostgreSQL.
//!
//! ## Overview
//!
//! Rollcall covers the full attendance workflow of a teaching institution:
//!
//! - **Authentication**: JWT bearer tokens with role claims
//! - **Administration**: departments, semesters, courses, and user accounts
//! - **Session planning**: weekly schedules, holiday-aware batch generation,
//!   auth-code and roll-call sessions
//! - **Check-in**: electronic, code-based and roll-call attendance with
//!   lateness detection and absence warnings
//! - **Review**: excuse requests with evidence uploads, appeals resolved via
//!   attendance corrections, and no-class/makeup votes
//! - **Reporting**: per-week attendance rates, excuse approval rates, and
//!   absence/lateness risk lists
//!
//! ## Architecture
//!
//! The codebase follows a modular architecture:
//!
//! ```text
//! src/
//! ├── config/           # Configuration (database, JWT, CORS, uploads)
//! ├── middleware/       # Auth extractor and role gates
//! ├── modules/          # Feature modules
//! └── utils/            # Shared utilities (errors, JWT, client ip)
//! ```
//!
//! Each feature module follows a consistent structure:
//!
//! - `mod.rs`: Module exports
//! - `controller.rs`: HTTP handlers (routes)
//! - `service.rs`: Business logic
//! - `model.rs`: Data models, DTOs, database structs
//! - `router.rs`: Axum router configuration
//!
//! ## API Documentation
//!
//! When the server is running, API documentation is available at:
//!
//! - Swagger UI: `http://localhost:3000/swagger-ui`
//! - Scalar: `http://localhost:3000/scalar`

pub mod config;
pub mod docs;
pub mod logging;
pub mod middleware;
pub mod modules;
pub mod router;
pub mod state;
pub mod utils;
pub mod validator;
