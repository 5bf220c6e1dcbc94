//! Infrastructure: SQLite store handle and schema.

pub mod db;

pub(crate) use db::get_connection;
pub use db::{ensure_schema, Store};
