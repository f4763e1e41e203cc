pub mod controller;
pub mod model;
pub mod planner;
pub mod router;
pub mod service;
