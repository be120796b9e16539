use rusqlite::Connection;
use tempfile::TempDir;
use vocab_deck::{ListFilters, ListStatus, NewEntry, StatusFilter, VocabularyStore};

#[test]
fn entries_survive_reopening() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("vocabulary.sqlite");

    let mut store = VocabularyStore::open(&path).unwrap();
    store.initialize().unwrap();
    let id = store.create(&NewEntry::new("Harmony", "concord")).unwrap().id;
    store.move_to_done(id).unwrap();
    store.close().unwrap();

    let store = VocabularyStore::open(&path).unwrap();
    store.initialize().unwrap();
    let entry = store.get(id).unwrap().unwrap();
    assert_eq!(entry.name, "Harmony");
    assert_eq!(entry.status, ListStatus::Done);
}

#[test]
fn legacy_tables_gain_the_status_column() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("legacy.sqlite");

    let legacy = Connection::open(&path).unwrap();
    legacy
        .execute_batch(
            "CREATE TABLE vocabulary (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                meaning TEXT NOT NULL,
                sort_type TEXT NOT NULL,
                month INTEGER NOT NULL,
                year INTEGER NOT NULL,
                created_at INTEGER DEFAULT (strftime('%s', 'now')),
                updated_at INTEGER DEFAULT (strftime('%s', 'now'))
            );
            INSERT INTO vocabulary (name, meaning, sort_type, month, year)
            VALUES ('Keen', 'sharp', 'K', 5, 2020);",
        )
        .unwrap();
    legacy.close().unwrap();

    let mut store = VocabularyStore::open(&path).unwrap();
    store.initialize().unwrap();
    store.initialize().unwrap();

    let deck = store.list_flashcards(&ListFilters::default()).unwrap();
    assert_eq!(deck.data.len(), 1);
    assert_eq!(deck.data[0].status, ListStatus::Practice);

    let id = deck.data[0].id;
    store.move_to_done(id).unwrap();
    let done = store
        .list(&ListFilters::default().status(StatusFilter::DoneOnly))
        .unwrap();
    assert_eq!(done.data[0].id, id);
}

#[test]
fn null_status_rows_count_as_practice() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nulls.sqlite");

    let store = VocabularyStore::open(&path).unwrap();
    store.initialize().unwrap();
    store.close().unwrap();

    let raw = Connection::open(&path).unwrap();
    raw.execute(
        "INSERT INTO vocabulary (name, meaning, sort_type, month, year, in_done_list)
         VALUES ('Tenacious', 'persistent', 'T', 1, 2021, NULL)",
        [],
    )
    .unwrap();
    raw.close().unwrap();

    let mut store = VocabularyStore::open(&path).unwrap();
    let practice = store
        .list(&ListFilters::default().status(StatusFilter::PracticeOnly))
        .unwrap();
    assert_eq!(practice.meta.total_items, 1);

    let id = practice.data[0].id;
    let moved = store.move_to_done(id).unwrap();
    assert_eq!(moved.status, ListStatus::Done);
}
