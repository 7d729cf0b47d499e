use chessgpt::store::{FileStore, GameRecord, GameStore, MemoryStore, StoreError};
use pretty_assertions::assert_eq;

fn record(moves: &str) -> GameRecord {
    GameRecord {
        moves: moves.to_string(),
        assistant_color: "black".to_string(),
        elo: Some("1500".to_string()),
        created: Some("1700000000".to_string()),
        updated: Some("1700000100".to_string()),
    }
}

fn exercise(store: &dyn GameStore) {
    assert_eq!(store.get("abc").unwrap(), None);
    store.put("abc", &record("e4")).unwrap();
    assert_eq!(store.get("abc").unwrap(), Some(record("e4")));
    store.put("abc", &record("e4,e5")).unwrap();
    assert_eq!(store.get("abc").unwrap().unwrap().moves, "e4,e5");
    assert_eq!(store.get("other").unwrap(), None);
}

#[test]
fn memory_store_round_trip() {
    let store = MemoryStore::new();
    assert!(store.is_empty());
    exercise(&store);
    assert_eq!(store.len(), 1);
}

#[test]
fn file_store_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::open(dir.path().join("games")).unwrap();
    exercise(&store);
    assert!(dir.path().join("games/abc.json").exists());

    // a second handle on the same directory sees the record
    let again = FileStore::open(store.dir()).unwrap();
    assert_eq!(again.get("abc").unwrap().unwrap().moves, "e4,e5");
}

#[test]
fn file_store_rejects_path_like_keys() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::open(dir.path()).unwrap();
    assert!(matches!(store.put("../escape", &record("")), Err(StoreError::InvalidKey(_))));
    assert!(matches!(store.get(""), Err(StoreError::InvalidKey(_))));
}

#[test]
fn missing_fields_read_as_absent() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("old.json"), r#"{"moves": "d4", "assistant_color": "white"}"#).unwrap();
    let store = FileStore::open(dir.path()).unwrap();
    let rec = store.get("old").unwrap().unwrap();
    assert_eq!(rec.elo, None);
    assert_eq!(rec.created, None);

    std::fs::write(dir.path().join("bad.json"), "not json").unwrap();
    assert!(matches!(store.get("bad"), Err(StoreError::Json(_))));
}
