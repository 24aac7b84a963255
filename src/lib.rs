//! Library exports for gatekeep, shared between the binary and tests.

pub mod config;
pub mod executors;
pub mod forms;
pub mod guard;
pub mod metrics;
pub mod models;
pub mod routes;
pub mod session;
pub mod startup;
pub mod state;
pub mod utils;
pub mod views;
