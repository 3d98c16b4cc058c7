pub mod auth;
pub mod employees;
pub mod public;
pub mod schedule;
pub mod superadmin;
