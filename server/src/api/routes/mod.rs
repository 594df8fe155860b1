//! API route handlers

pub mod health;
pub mod incidents;
pub mod metrics;
