//! Persistence module split across logical submodules: the store handle and
//! its schema, the predicate builder, and the row-level primitives.

mod connection;
pub mod filter;
pub mod records;

pub use connection::{default_db_path, VocabularyStore};
pub use filter::{Clause, Predicate};
