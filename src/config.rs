//! Monitor configuration.

pub mod monitor;
