//! Core library surface for the vocabulary flashcard deck.
//!
//! The store owns a single SQLite table of word/meaning pairs. The record
//! primitives live in [`db`], the operations the application calls live on
//! [`VocabularyStore`] (see [`query`], [`import`], and [`seed`]).
pub mod clock;
pub mod db;
pub mod error;
pub mod import;
pub mod models;
pub mod query;
pub mod refresh;
pub mod seed;
pub mod validate;

/// The store handle and its default location.
pub use db::{default_db_path, VocabularyStore};

pub use error::{Result, VocabError};
pub use import::{ImportFailure, ImportItem, ImportOptions, ImportReport};
pub use models::{
    DeletedCount, EntryChanges, ListFilters, ListStatus, NewEntry, Page, PageMeta, SortOrder,
    StatusFilter, VocabularyEntry,
};
pub use refresh::{RequestSequencer, RequestTicket};
