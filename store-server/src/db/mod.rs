//! Storage layer
//!
//! redb-backed record store plus the user and order repositories.

pub mod repository;
pub mod storage;

pub use storage::{Storage, StorageError, StorageResult};
