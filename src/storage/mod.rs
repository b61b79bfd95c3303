//! Storage Layer - SQLite-backed persistence
//!
//! System of record is SQLite with tables:
//! - clients(id, name, contact, email)
//! - policies(id, client_id -> clients.id, policy_type, company, policy_number,
//!   investment_amount, start_date, end_date)

pub mod schema;
pub mod sqlite;

pub use sqlite::{DbStats, SqliteStore};
