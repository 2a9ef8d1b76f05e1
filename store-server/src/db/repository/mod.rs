//! Record repositories
//!
//! Free functions over [`crate::db::Storage`], one module per record
//! collection.

pub mod order;
pub mod user;
