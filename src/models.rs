//! Domain models that mirror the `vocabulary` table and the request/response
//! shapes of the query engine. The types stay plain data holders; the rules
//! for normalizing them live in `validate` and the SQL lives in `db`.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Default page size when a caller does not pick one.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Which of the two lists an entry currently belongs to. Stored as the
/// `in_done_list` integer flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ListStatus {
    /// Eligible for flashcard study. Every new entry starts here.
    #[default]
    Practice,
    /// Excluded from study until returned to practice.
    Done,
}

impl ListStatus {
    /// Read the stored flag. NULL (rows that predate the column) counts as
    /// practice.
    pub fn from_flag(flag: Option<bool>) -> Self {
        match flag {
            Some(true) => ListStatus::Done,
            Some(false) | None => ListStatus::Practice,
        }
    }

    pub fn as_flag(self) -> bool {
        matches!(self, ListStatus::Done)
    }
}

/// One persisted word/meaning pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VocabularyEntry {
    pub id: i64,
    pub name: String,
    pub meaning: String,
    /// Single uppercase letter bucket used for alphabetic filtering.
    pub sort_type: char,
    pub month: u32,
    pub year: i32,
    pub status: ListStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl VocabularyEntry {
    pub fn in_done_list(&self) -> bool {
        self.status.as_flag()
    }
}

impl fmt::Display for VocabularyEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.name, self.meaning)
    }
}

/// Input for the create command. Month and year fall back to the current
/// date; the sort type falls back to the first letter of the name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewEntry {
    pub name: String,
    pub meaning: String,
    pub sort_type: Option<String>,
    pub month: Option<u32>,
    pub year: Option<i32>,
}

impl NewEntry {
    pub fn new(name: impl Into<String>, meaning: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            meaning: meaning.into(),
            ..Self::default()
        }
    }

    pub fn sort_type(mut self, sort_type: impl Into<String>) -> Self {
        self.sort_type = Some(sort_type.into());
        self
    }

    pub fn month(mut self, month: u32) -> Self {
        self.month = Some(month);
        self
    }

    pub fn year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }
}

/// Partial update: only the supplied fields are overwritten.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryChanges {
    pub name: Option<String>,
    pub meaning: Option<String>,
    pub sort_type: Option<String>,
    pub month: Option<u32>,
    pub year: Option<i32>,
}

impl EntryChanges {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn meaning(mut self, meaning: impl Into<String>) -> Self {
        self.meaning = Some(meaning.into());
        self
    }

    pub fn sort_type(mut self, sort_type: impl Into<String>) -> Self {
        self.sort_type = Some(sort_type.into());
        self
    }

    pub fn month(mut self, month: u32) -> Self {
        self.month = Some(month);
        self
    }

    pub fn year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }
}

/// Which partition a list query looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StatusFilter {
    PracticeOnly,
    DoneOnly,
    #[default]
    All,
}

impl StatusFilter {
    pub(crate) fn status(self) -> Option<ListStatus> {
        match self {
            StatusFilter::PracticeOnly => Some(ListStatus::Practice),
            StatusFilter::DoneOnly => Some(ListStatus::Done),
            StatusFilter::All => None,
        }
    }
}

/// Direction of the ordering by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

impl SortOrder {
    pub(crate) fn sql(self) -> &'static str {
        match self {
            SortOrder::Ascending => "ASC",
            SortOrder::Descending => "DESC",
        }
    }
}

/// Filters and pagination for a list query. Every filter is optional and they
/// combine with AND.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListFilters {
    /// Comma-separated letters such as `"A,B"`.
    pub sort_type: Option<String>,
    pub month: Option<u32>,
    pub year: Option<i32>,
    /// Substring of the name, matched ASCII case-insensitively.
    pub search: Option<String>,
    pub status: StatusFilter,
    pub sort_order: SortOrder,
    /// 1-based page number.
    pub page: u32,
    pub limit: u32,
}

impl Default for ListFilters {
    fn default() -> Self {
        Self {
            sort_type: None,
            month: None,
            year: None,
            search: None,
            status: StatusFilter::All,
            sort_order: SortOrder::Ascending,
            page: 1,
            limit: DEFAULT_PAGE_SIZE,
        }
    }
}

impl ListFilters {
    pub fn sort_type(mut self, letters: impl Into<String>) -> Self {
        self.sort_type = Some(letters.into());
        self
    }

    pub fn month(mut self, month: u32) -> Self {
        self.month = Some(month);
        self
    }

    pub fn year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn status(mut self, status: StatusFilter) -> Self {
        self.status = status;
        self
    }

    pub fn sort_order(mut self, sort_order: SortOrder) -> Self {
        self.sort_order = sort_order;
        self
    }

    pub fn page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }
}

/// Pagination bookkeeping returned next to every page of results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    /// Rows matching the filters, ignoring pagination.
    pub total_items: u64,
    /// Rows in the whole table, ignoring every filter.
    pub grand_total: u64,
    pub total_pages: u64,
    pub current_page: u32,
    pub limit: u32,
}

/// Result envelope of a list query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub data: Vec<VocabularyEntry>,
    pub meta: PageMeta,
}

/// Outcome of the bulk delete commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletedCount {
    pub deleted_count: u64,
}
