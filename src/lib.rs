//! GraphDB client session layer
//!
//! This crate provides the client side of a graph database session: statement
//! execution over an established connection, host value conversion, retry of
//! transient failures and reconnect through the owning connection or session pool.

pub mod config;
pub mod core;
pub mod pool;
pub mod session;
pub mod transport;
pub mod utils;

pub use crate::config::ClientConfig;
pub use crate::core::{ClientError, ClientResult, ResultSet};
pub use crate::pool::Owner;
pub use crate::session::Session;
