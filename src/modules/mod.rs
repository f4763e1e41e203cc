pub mod appeals;
pub mod attendance;
pub mod audit;
pub mod auth;
pub mod calendar;
pub mod courses;
pub mod dashboard;
pub mod departments;
pub mod excuses;
pub mod files;
pub mod messages;
pub mod notifications;
pub mod reports;
pub mod semesters;
pub mod sessions;
pub mod users;
pub mod votes;
