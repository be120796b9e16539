//! The operations the application calls directly. Each one validates its
//! input, turns filters into a [`Predicate`], and delegates to the row
//! primitives in [`crate::db::records`]. Every call reads storage afresh.

use std::collections::BTreeSet;

use chrono::Datelike;
use rusqlite::Connection;
use tracing::{debug, info};

use crate::clock::Clock;
use crate::db::{records, Clause, Predicate, VocabularyStore};
use crate::error::{Result, VocabError};
use crate::models::{
    DeletedCount, EntryChanges, ListFilters, ListStatus, NewEntry, Page, PageMeta, StatusFilter,
    VocabularyEntry,
};
use crate::validate::{self, check_filters, clean_changes, parse_sort_type_list};

/// Upper bound on the rows returned by [`VocabularyStore::done_list`].
pub const DONE_LIST_LIMIT: u32 = 1000;

impl VocabularyStore {
    /// Normalize and persist a new entry. It always starts in the practice
    /// list. Duplicate names are allowed.
    pub fn create(&mut self, input: &NewEntry) -> Result<VocabularyEntry> {
        create_in(&self.conn, self.clock.as_ref(), input)
    }

    /// Look up a single entry, e.g. to refresh an edit form. `None` when the
    /// id is unknown.
    pub fn get(&self, id: i64) -> Result<Option<VocabularyEntry>> {
        records::get_by_id(&self.conn, id)
    }

    /// Filtered, paginated listing plus the counts the UI shows next to it.
    pub fn list(&self, filters: &ListFilters) -> Result<Page> {
        check_filters(filters)?;
        let predicate = build_predicate(filters);

        let total_items = records::count(&self.conn, &predicate)?;
        let grand_total = records::count(&self.conn, &Predicate::all())?;
        let offset = u64::from(filters.page - 1) * u64::from(filters.limit);
        let data = records::select_where(
            &self.conn,
            &predicate,
            filters.sort_order,
            filters.limit,
            offset,
        )?;

        debug!(
            total_items,
            grand_total,
            page = filters.page,
            returned = data.len(),
            "listed vocabulary"
        );

        Ok(Page {
            data,
            meta: PageMeta {
                total_items,
                grand_total,
                total_pages: total_pages(total_items, filters.limit),
                current_page: filters.page,
                limit: filters.limit,
            },
        })
    }

    /// The study deck: same as [`list`](Self::list) but never includes done
    /// entries, whatever status the caller asked for.
    pub fn list_flashcards(&self, filters: &ListFilters) -> Result<Page> {
        let practice_only = ListFilters {
            status: StatusFilter::PracticeOnly,
            ..filters.clone()
        };
        self.list(&practice_only)
    }

    /// Everything in the done list, by name.
    pub fn done_list(&self) -> Result<Vec<VocabularyEntry>> {
        let filters = ListFilters::default()
            .status(StatusFilter::DoneOnly)
            .limit(DONE_LIST_LIMIT);
        Ok(self.list(&filters)?.data)
    }

    /// Overwrite the supplied fields of an entry.
    pub fn update(&mut self, id: i64, changes: &EntryChanges) -> Result<VocabularyEntry> {
        let changes = clean_changes(changes)?;
        records::update_by_id(&self.conn, id, &changes, self.clock.now())
    }

    /// Permanently remove one entry. Deleting an unknown id is `NotFound`
    /// so the caller can tell the user nothing was removed.
    pub fn delete(&mut self, id: i64) -> Result<()> {
        records::delete_by_id(&self.conn, id)
    }

    /// Wipe the whole table, reporting how many entries went so the UI can
    /// confirm the reset.
    pub fn delete_all(&mut self) -> Result<DeletedCount> {
        let deleted_count = records::delete_all(&self.conn)?;
        info!(deleted_count, "deleted all vocabulary");
        Ok(DeletedCount { deleted_count })
    }

    /// Mark an entry as done. Already-done entries are returned untouched.
    pub fn move_to_done(&mut self, id: i64) -> Result<VocabularyEntry> {
        self.transition(id, ListStatus::Done)
    }

    /// Return an entry to practice. Already-practicing entries are returned
    /// untouched.
    pub fn move_to_practice(&mut self, id: i64) -> Result<VocabularyEntry> {
        self.transition(id, ListStatus::Practice)
    }

    fn transition(&mut self, id: i64, target: ListStatus) -> Result<VocabularyEntry> {
        let changed = records::set_status(&self.conn, id, target, self.clock.now())?;
        let entry = records::get_by_id(&self.conn, id)?.ok_or(VocabError::NotFound(id))?;
        if changed {
            debug!(id, status = ?target, "moved vocabulary entry");
        }
        Ok(entry)
    }

    /// Delete every done entry; practice entries stay.
    pub fn clear_done(&mut self) -> Result<DeletedCount> {
        let done = Predicate::all().and(Clause::Status(ListStatus::Done));
        let deleted_count = records::delete_where(&self.conn, &done)?;
        info!(deleted_count, "cleared done list");
        Ok(DeletedCount { deleted_count })
    }

    /// Years present in the store, newest first, always including the
    /// current year.
    pub fn distinct_years(&self) -> Result<Vec<i32>> {
        let mut years: BTreeSet<i32> = records::distinct_years(&self.conn)?;
        years.insert(self.clock.today().year());
        Ok(years.into_iter().rev().collect())
    }

    /// Whether any entry already uses this exact (trimmed) name.
    pub fn name_exists(&self, name: &str) -> Result<bool> {
        name_exists_in(&self.conn, name)
    }
}

/// `ceil(total / limit)`, never below one page.
pub fn total_pages(total_items: u64, limit: u32) -> u64 {
    let limit = u64::from(limit.max(1));
    total_items.div_ceil(limit).max(1)
}

/// Translate list filters into a predicate. Absent filters add nothing.
pub fn build_predicate(filters: &ListFilters) -> Predicate {
    let search = filters
        .search
        .as_deref()
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(|text| Clause::NameContains(text.to_string()));

    Predicate::all()
        .and_maybe(
            filters
                .sort_type
                .as_deref()
                .map(|letters| Clause::SortTypeIn(parse_sort_type_list(letters))),
        )
        .and_maybe(filters.month.map(Clause::Month))
        .and_maybe(filters.year.map(Clause::Year))
        .and_maybe(search)
        .and_maybe(filters.status.status().map(Clause::Status))
}

/// Create on any connection, including an open transaction.
pub(crate) fn create_in(
    conn: &Connection,
    clock: &dyn Clock,
    input: &NewEntry,
) -> Result<VocabularyEntry> {
    let now = clock.now();
    let today = clock.today();
    let clean = validate::clean_new_entry(
        &input.name,
        &input.meaning,
        input.sort_type.as_deref(),
        input.month,
        input.year,
        (today.month(), today.year()),
    )?;
    let id = records::insert(conn, &clean, now)?;
    records::get_by_id(conn, id)?.ok_or(VocabError::NotFound(id))
}

pub(crate) fn name_exists_in(conn: &Connection, name: &str) -> Result<bool> {
    let predicate = Predicate::all().and(Clause::NameIs(name.trim().to_string()));
    Ok(records::count(conn, &predicate)? > 0)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{Duration, FixedOffset, TimeZone, Utc};

    use super::*;
    use crate::clock::ManualClock;

    fn store_at(clock: Arc<ManualClock>) -> VocabularyStore {
        let store = VocabularyStore::open_in_memory().unwrap().with_clock(clock);
        store.initialize().unwrap();
        store
    }

    fn store() -> VocabularyStore {
        let start = Utc.with_ymd_and_hms(2025, 3, 14, 9, 0, 0).unwrap();
        store_at(Arc::new(ManualClock::new(start)))
    }

    #[test]
    fn total_pages_rounds_up_with_a_floor_of_one() {
        assert_eq!(total_pages(0, 5), 1);
        assert_eq!(total_pages(1, 5), 1);
        assert_eq!(total_pages(5, 5), 1);
        assert_eq!(total_pages(6, 5), 2);
        assert_eq!(total_pages(1000, 1), 1000);
    }

    #[test]
    fn create_defaults_to_the_current_month_and_year() {
        let mut store = store();
        let entry = store.create(&NewEntry::new("apple", "fruit")).unwrap();

        assert_eq!(entry.sort_type, 'A');
        assert_eq!((entry.month, entry.year), (3, 2025));
        assert_eq!(entry.status, ListStatus::Practice);
        assert_eq!(store.get(entry.id).unwrap(), Some(entry));
    }

    #[test]
    fn self_transition_keeps_updated_at() {
        let start = Utc.with_ymd_and_hms(2025, 3, 14, 9, 0, 0).unwrap();
        let clock = Arc::new(ManualClock::new(start));
        let mut store = store_at(clock.clone());
        let id = store.create(&NewEntry::new("Keen", "sharp")).unwrap().id;

        clock.advance(Duration::seconds(30));
        let done = store.move_to_done(id).unwrap();
        assert_eq!(done.status, ListStatus::Done);
        assert_eq!(done.updated_at, start + Duration::seconds(30));

        clock.advance(Duration::seconds(30));
        let again = store.move_to_done(id).unwrap();
        assert_eq!(again, done);

        let back = store.move_to_practice(id).unwrap();
        assert_eq!(back.status, ListStatus::Practice);
        assert_eq!(back.updated_at, start + Duration::seconds(60));
        assert_eq!(back.created_at, start);
    }

    #[test]
    fn transitions_on_missing_ids_fail() {
        let mut store = store();
        assert!(store.move_to_done(42).unwrap_err().is_not_found());
        assert!(store.move_to_practice(42).unwrap_err().is_not_found());
    }

    #[test]
    fn distinct_years_include_the_current_year() {
        let mut store = store();
        assert_eq!(store.distinct_years().unwrap(), vec![2025]);

        store.create(&NewEntry::new("Old", "x").year(1999)).unwrap();
        store.create(&NewEntry::new("Future", "x").year(2030)).unwrap();
        assert_eq!(store.distinct_years().unwrap(), vec![2030, 2025, 1999]);
    }

    #[test]
    fn calendar_defaults_use_the_local_date() {
        // 19:30 on New Year's Eve in UTC-5 is already the next year in UTC.
        let instant = Utc.with_ymd_and_hms(2027, 1, 1, 0, 30, 0).unwrap();
        let offset = FixedOffset::west_opt(5 * 3600).unwrap();
        let mut store = store_at(Arc::new(ManualClock::new(instant).with_offset(offset)));

        assert_eq!(store.distinct_years().unwrap(), vec![2026]);

        let entry = store.create(&NewEntry::new("Eve", "last night")).unwrap();
        assert_eq!((entry.month, entry.year), (12, 2026));
        assert_eq!(entry.created_at, instant);
    }

    #[test]
    fn predicate_ignores_blank_filters() {
        let filters = ListFilters::default().search("   ").sort_type(" , ");
        let predicate = build_predicate(&filters);
        let (sql, _) = predicate.to_sql();
        assert!(sql.is_empty());
    }

    #[test]
    fn invalid_filters_fail_before_reading() {
        let store = store();
        let err = store.list(&ListFilters::default().page(0)).unwrap_err();
        assert!(err.is_validation());
    }
}
