//! Check that a database is reachable with one or more connection strings
//!
//! Each probe connects with a bounded wait, runs `SELECT version()`, prints
//! the outcome with credentials masked and closes the connection.

pub mod cli;
pub mod descriptor;
pub mod envs;
pub mod error;
pub mod probe;
pub mod queries;
pub mod report;
pub mod tls;
