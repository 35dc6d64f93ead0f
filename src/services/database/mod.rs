// Database service module
// SQLite connection and schema management for events and categories

mod connection;
pub mod migrations;
mod schema;

pub use connection::Database;
