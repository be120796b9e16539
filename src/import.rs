//! Bulk import of `{ name, meaning, sortType?, month?, year? }` objects. Each
//! item goes through the regular create path; bad items are counted and
//! described instead of aborting the batch. The batch shares one transaction,
//! so nobody else ever sees half of it.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use tracing::{info, warn};

use crate::db::VocabularyStore;
use crate::error::{Result, StorageContext, VocabError};
use crate::models::NewEntry;
use crate::query::{create_in, name_exists_in};

/// How many failures are described individually in a report.
pub const MAX_REPORTED_FAILURES: usize = 5;

/// One object of the import payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportItem {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub meaning: Option<String>,
    #[serde(default)]
    pub sort_type: Option<String>,
    #[serde(default)]
    pub month: Option<u32>,
    #[serde(default)]
    pub year: Option<i32>,
}

impl ImportItem {
    pub fn new(name: impl Into<String>, meaning: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            meaning: Some(meaning.into()),
            ..Self::default()
        }
    }

    fn into_new_entry(self) -> std::result::Result<NewEntry, String> {
        let name = self
            .name
            .filter(|name| !name.trim().is_empty())
            .ok_or_else(|| "missing name".to_string())?;
        let meaning = self
            .meaning
            .filter(|meaning| !meaning.trim().is_empty())
            .ok_or_else(|| "missing meaning".to_string())?;

        Ok(NewEntry {
            name,
            meaning,
            sort_type: self.sort_type,
            month: self.month,
            year: self.year,
        })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportOptions {
    /// Leave items out when an entry with the same name already exists.
    pub skip_duplicates: bool,
}

/// Why one item of the batch was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportFailure {
    /// Zero-based position in the payload.
    pub index: usize,
    pub name: Option<String>,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportReport {
    pub inserted: usize,
    pub skipped: usize,
    pub failed: usize,
    /// The first [`MAX_REPORTED_FAILURES`] failures.
    pub failures: Vec<ImportFailure>,
}

impl ImportReport {
    fn record_failure(&mut self, index: usize, name: Option<String>, reason: String) {
        warn!(index, reason = %reason, "skipping import item");
        self.failed += 1;
        if self.failures.len() < MAX_REPORTED_FAILURES {
            self.failures.push(ImportFailure {
                index,
                name,
                reason,
            });
        }
    }
}

impl VocabularyStore {
    /// Parse a JSON array and import each element. A payload that is not an
    /// array at all is a validation error; malformed elements are per-item
    /// failures.
    pub fn import_json(&mut self, json: &str, options: ImportOptions) -> Result<ImportReport> {
        let values: Vec<JsonValue> = serde_json::from_str(json)
            .map_err(|err| VocabError::validation(format!("Invalid import file: {err}")))?;

        let items = values
            .into_iter()
            .map(|value| {
                serde_json::from_value::<ImportItem>(value)
                    .map_err(|err| format!("invalid item: {err}"))
            })
            .collect::<Vec<_>>();

        self.import_parsed(items, options)
    }

    /// Import already-typed items.
    pub fn import_items(
        &mut self,
        items: Vec<ImportItem>,
        options: ImportOptions,
    ) -> Result<ImportReport> {
        self.import_parsed(items.into_iter().map(Ok).collect(), options)
    }

    fn import_parsed(
        &mut self,
        items: Vec<std::result::Result<ImportItem, String>>,
        options: ImportOptions,
    ) -> Result<ImportReport> {
        let clock = self.clock.as_ref();
        let tx = self
            .conn
            .transaction()
            .storage("failed to start import transaction")?;
        let mut report = ImportReport::default();

        for (index, parsed) in items.into_iter().enumerate() {
            let item = match parsed {
                Ok(item) => item,
                Err(reason) => {
                    report.record_failure(index, None, reason);
                    continue;
                }
            };
            let name = item.name.clone();
            let entry = match item.into_new_entry() {
                Ok(entry) => entry,
                Err(reason) => {
                    report.record_failure(index, name, reason);
                    continue;
                }
            };

            if options.skip_duplicates && name_exists_in(&tx, &entry.name)? {
                report.skipped += 1;
                continue;
            }

            match create_in(&tx, clock, &entry) {
                Ok(_) => report.inserted += 1,
                Err(VocabError::Validation(reason)) => report.record_failure(index, name, reason),
                Err(err) => return Err(err),
            }
        }

        tx.commit().storage("failed to commit import")?;
        info!(
            inserted = report.inserted,
            skipped = report.skipped,
            failed = report.failed,
            "bulk import finished"
        );
        Ok(report)
    }
}
