//! SQLite backend for the formation engine.
mod sqlite_impl;

pub mod db;
pub use sqlite_impl::SqliteDatabase;
