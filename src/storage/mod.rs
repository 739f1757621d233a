//! SQLite storage for the sandbox database
//!
//! Each dataset becomes one standalone table; there are no relationships
//! between tables and no schema beyond what the data frame implies.

pub mod schema;
pub mod store;

pub use store::SandboxStore;
