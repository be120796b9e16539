//! Row-level primitives over the `vocabulary` table. These take a plain
//! `&Connection` so they run the same inside or outside a transaction, and
//! they know nothing about list semantics.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};

use crate::error::{Result, StorageContext, VocabError};
use crate::models::{ListStatus, SortOrder, VocabularyEntry};
use crate::validate::{CleanChanges, CleanEntry, FALLBACK_SORT_TYPE};

use super::filter::Predicate;

const ENTRY_COLUMNS: &str =
    "id, name, meaning, sort_type, month, year, in_done_list, created_at, updated_at";

/// Insert a checked row, stamping both timestamps with `now`. Returns the new
/// id.
pub fn insert(conn: &Connection, entry: &CleanEntry, now: DateTime<Utc>) -> Result<i64> {
    let stamp = now.timestamp();
    conn.execute(
        "INSERT INTO vocabulary
            (name, meaning, sort_type, month, year, in_done_list, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, 0, ?6, ?7)",
        params![
            entry.name,
            entry.meaning,
            entry.sort_type.to_string(),
            entry.month,
            entry.year,
            stamp,
            stamp
        ],
    )
    .storage("failed to insert vocabulary entry")?;

    Ok(conn.last_insert_rowid())
}

/// Load one row by primary key. Every write helper re-reads through this so
/// callers get the stored values, timestamps included.
pub fn get_by_id(conn: &Connection, id: i64) -> Result<Option<VocabularyEntry>> {
    conn.query_row(
        &format!("SELECT {ENTRY_COLUMNS} FROM vocabulary WHERE id = ?1"),
        [id],
        map_entry,
    )
    .optional()
    .storage("failed to load vocabulary entry")
}

/// Overwrite the supplied fields and refresh `updated_at`. Fails with
/// `NotFound` when no row has this id.
pub fn update_by_id(
    conn: &Connection,
    id: i64,
    changes: &CleanChanges,
    now: DateTime<Utc>,
) -> Result<VocabularyEntry> {
    let mut assignments: Vec<(&str, Value)> = Vec::new();
    if let Some(name) = &changes.name {
        assignments.push(("name", Value::Text(name.clone())));
    }
    if let Some(meaning) = &changes.meaning {
        assignments.push(("meaning", Value::Text(meaning.clone())));
    }
    if let Some(sort_type) = changes.sort_type {
        assignments.push(("sort_type", Value::Text(sort_type.to_string())));
    }
    if let Some(month) = changes.month {
        assignments.push(("month", Value::Integer(i64::from(month))));
    }
    if let Some(year) = changes.year {
        assignments.push(("year", Value::Integer(i64::from(year))));
    }
    assignments.push(("updated_at", Value::Integer(now.timestamp())));

    let set_clause = assignments
        .iter()
        .enumerate()
        .map(|(index, (column, _))| format!("{column} = ?{}", index + 1))
        .collect::<Vec<_>>()
        .join(", ");
    let mut values: Vec<Value> = assignments.into_iter().map(|(_, value)| value).collect();
    values.push(Value::Integer(id));

    let updated = conn
        .execute(
            &format!("UPDATE vocabulary SET {set_clause} WHERE id = ?{}", values.len()),
            params_from_iter(values),
        )
        .storage("failed to update vocabulary entry")?;

    if updated == 0 {
        return Err(VocabError::NotFound(id));
    }
    get_by_id(conn, id)?.ok_or(VocabError::NotFound(id))
}

/// Set the status flag unless the row already has it. Returns whether a row
/// was written; zero rows can mean "already there" or "no such id".
pub fn set_status(
    conn: &Connection,
    id: i64,
    status: ListStatus,
    now: DateTime<Utc>,
) -> Result<bool> {
    let updated = conn
        .execute(
            "UPDATE vocabulary SET in_done_list = ?1, updated_at = ?2
             WHERE id = ?3 AND COALESCE(in_done_list, 0) <> ?1",
            params![status.as_flag(), now.timestamp(), id],
        )
        .storage("failed to update vocabulary status")?;
    Ok(updated > 0)
}

/// Physically remove one row. Zero affected rows surfaces as `NotFound` so a
/// stale id is reported instead of silently ignored.
pub fn delete_by_id(conn: &Connection, id: i64) -> Result<()> {
    let deleted = conn
        .execute("DELETE FROM vocabulary WHERE id = ?1", [id])
        .storage("failed to delete vocabulary entry")?;

    if deleted == 0 {
        Err(VocabError::NotFound(id))
    } else {
        Ok(())
    }
}

/// Remove every row matching the predicate. Returns how many went.
pub fn delete_where(conn: &Connection, predicate: &Predicate) -> Result<u64> {
    let (where_clause, values) = predicate.to_sql();
    let deleted = conn
        .execute(
            &format!("DELETE FROM vocabulary{where_clause}"),
            params_from_iter(values),
        )
        .storage("failed to delete vocabulary entries")?;
    Ok(deleted as u64)
}

/// Remove every row; the count feeds the "deleted N entries" message.
pub fn delete_all(conn: &Connection) -> Result<u64> {
    delete_where(conn, &Predicate::all())
}

/// Fetch matching rows ordered by name (case-insensitive, ties by id).
pub fn select_where(
    conn: &Connection,
    predicate: &Predicate,
    order: SortOrder,
    limit: u32,
    offset: u64,
) -> Result<Vec<VocabularyEntry>> {
    let (where_clause, mut values) = predicate.to_sql();
    let direction = order.sql();
    values.push(Value::Integer(i64::from(limit)));
    let limit_slot = values.len();
    values.push(Value::Integer(i64::try_from(offset).unwrap_or(i64::MAX)));
    let offset_slot = values.len();

    let mut stmt = conn
        .prepare(&format!(
            "SELECT {ENTRY_COLUMNS} FROM vocabulary{where_clause}
             ORDER BY name COLLATE NOCASE {direction}, id {direction}
             LIMIT ?{limit_slot} OFFSET ?{offset_slot}"
        ))
        .storage("failed to prepare vocabulary query")?;

    let entries = stmt
        .query_map(params_from_iter(values), map_entry)
        .storage("failed to load vocabulary")?
        .collect::<rusqlite::Result<Vec<_>>>()
        .storage("failed to collect vocabulary")?;

    Ok(entries)
}

/// Number of rows matching the predicate. The list query calls it twice: once
/// with its filters for paging and once unfiltered for the grand total.
pub fn count(conn: &Connection, predicate: &Predicate) -> Result<u64> {
    let (where_clause, values) = predicate.to_sql();
    let total: i64 = conn
        .query_row(
            &format!("SELECT COUNT(*) FROM vocabulary{where_clause}"),
            params_from_iter(values),
            |row| row.get(0),
        )
        .storage("failed to count vocabulary")?;
    Ok(total.max(0) as u64)
}

/// Every distinct year present in the table.
pub fn distinct_years(conn: &Connection) -> Result<BTreeSet<i32>> {
    let mut stmt = conn
        .prepare("SELECT DISTINCT year FROM vocabulary")
        .storage("failed to prepare year query")?;

    let years = stmt
        .query_map([], |row| row.get(0))
        .storage("failed to load years")?
        .collect::<rusqlite::Result<BTreeSet<i32>>>()
        .storage("failed to collect years")?;

    Ok(years)
}

fn map_entry(row: &Row<'_>) -> rusqlite::Result<VocabularyEntry> {
    let sort_type: String = row.get(3)?;
    Ok(VocabularyEntry {
        id: row.get(0)?,
        name: row.get(1)?,
        meaning: row.get(2)?,
        sort_type: sort_type.chars().next().unwrap_or(FALLBACK_SORT_TYPE),
        month: row.get(4)?,
        year: row.get(5)?,
        status: ListStatus::from_flag(row.get(6)?),
        created_at: timestamp_at(row, 7)?,
        updated_at: timestamp_at(row, 8)?,
    })
}

fn timestamp_at(row: &Row<'_>, index: usize) -> rusqlite::Result<DateTime<Utc>> {
    let seconds: i64 = row.get(index)?;
    DateTime::from_timestamp(seconds, 0)
        .ok_or(rusqlite::Error::IntegralValueOutOfRange(index, seconds))
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::db::filter::Clause;
    use crate::db::VocabularyStore;

    fn store() -> VocabularyStore {
        let store = VocabularyStore::open_in_memory().unwrap();
        store.initialize().unwrap();
        store
    }

    fn row(name: &str, sort_type: char) -> CleanEntry {
        CleanEntry {
            name: name.to_string(),
            meaning: format!("meaning of {name}"),
            sort_type,
            month: 6,
            year: 2024,
        }
    }

    #[test]
    fn insert_assigns_ids_and_timestamps() {
        let store = store();
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();

        let first = insert(&store.conn, &row("Apple", 'A'), now).unwrap();
        let second = insert(&store.conn, &row("Berry", 'B'), now).unwrap();
        assert_ne!(first, second);

        let entry = get_by_id(&store.conn, first).unwrap().unwrap();
        assert_eq!(entry.name, "Apple");
        assert_eq!(entry.status, ListStatus::Practice);
        assert_eq!(entry.created_at, now);
        assert_eq!(entry.updated_at, now);
        assert!(get_by_id(&store.conn, 9_999).unwrap().is_none());
    }

    #[test]
    fn update_touches_only_supplied_fields() {
        let store = store();
        let created = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let later = Utc.with_ymd_and_hms(2024, 6, 2, 12, 0, 0).unwrap();
        let id = insert(&store.conn, &row("Apple", 'A'), created).unwrap();

        let changes = CleanChanges {
            meaning: Some("a fruit".into()),
            ..CleanChanges::default()
        };
        let updated = update_by_id(&store.conn, id, &changes, later).unwrap();

        assert_eq!(updated.name, "Apple");
        assert_eq!(updated.meaning, "a fruit");
        assert_eq!(updated.created_at, created);
        assert_eq!(updated.updated_at, later);

        let missing = update_by_id(&store.conn, id + 1, &changes, later).unwrap_err();
        assert!(missing.is_not_found());
    }

    #[test]
    fn set_status_skips_rows_already_in_place() {
        let store = store();
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let id = insert(&store.conn, &row("Apple", 'A'), now).unwrap();

        assert!(set_status(&store.conn, id, ListStatus::Done, now).unwrap());
        assert!(!set_status(&store.conn, id, ListStatus::Done, now).unwrap());
        assert!(!set_status(&store.conn, id + 100, ListStatus::Done, now).unwrap());
    }

    #[test]
    fn select_count_and_delete_share_the_predicate() {
        let store = store();
        let now = Utc::now();
        for (name, letter) in [("apple", 'A'), ("Avocado", 'A'), ("banana", 'B')] {
            insert(&store.conn, &row(name, letter), now).unwrap();
        }
        let only_a = Predicate::all().and(Clause::SortTypeIn(vec!['A']));

        assert_eq!(count(&store.conn, &only_a).unwrap(), 2);
        let names: Vec<String> = select_where(&store.conn, &only_a, SortOrder::Descending, 10, 0)
            .unwrap()
            .into_iter()
            .map(|entry| entry.name)
            .collect();
        assert_eq!(names, vec!["Avocado", "apple"]);

        assert_eq!(delete_where(&store.conn, &only_a).unwrap(), 2);
        assert_eq!(count(&store.conn, &Predicate::all()).unwrap(), 1);
        assert_eq!(delete_all(&store.conn).unwrap(), 1);
        assert!(delete_by_id(&store.conn, 1).unwrap_err().is_not_found());
    }

    #[test]
    fn distinct_years_are_sorted() {
        let store = store();
        let now = Utc::now();
        for year in [2022, 2019, 2022] {
            let entry = CleanEntry { year, ..row("word", 'W') };
            insert(&store.conn, &entry, now).unwrap();
        }
        let years: Vec<i32> = distinct_years(&store.conn).unwrap().into_iter().collect();
        assert_eq!(years, vec![2019, 2022]);
    }
}
