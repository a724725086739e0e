//! Library exports for the metrics adapter, shared between the binary and tests.

pub mod collector;
pub mod config;
pub mod relay;
pub mod routes;
pub mod startup;
pub mod state;
pub mod utils;
