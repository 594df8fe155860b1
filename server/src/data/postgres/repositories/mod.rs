//! PostgreSQL repository functions

pub mod incidents;
