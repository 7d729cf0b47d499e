use std::sync::Arc;

use chessgpt::error::Error;
use chessgpt::normalize::MoveError;
use chessgpt::session::{Elo, Session, SessionId, SessionManager, Side};
use chessgpt::store::{GameRecord, GameStore, MemoryStore, StoreError};
use pretty_assertions::assert_eq;

fn manager() -> (SessionManager, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    (SessionManager::new(store.clone()), store)
}

fn id(name: &str) -> SessionId { SessionId::from_conversation(name) }

#[test]
fn create_then_move() {
    let (sessions, _) = manager();
    let game = sessions.create(&id("c1"), "white", "1500").unwrap();
    assert_eq!(game.assistant(), Side::White);
    assert_eq!(game.elo().get(), 1500);
    assert_eq!(game.turn(), Side::White);
    assert!(game.moves().is_empty());

    let next = sessions.apply_move(&game, "e4").unwrap();
    assert_eq!(next.moves(), ["e4".to_string()]);
    assert_eq!(next.turn(), Side::Black);
    // the original value is untouched
    assert!(game.moves().is_empty());

    let loaded = sessions.load(&id("c1"), None).unwrap();
    assert_eq!(loaded.moves(), next.moves());
    assert_eq!(loaded.position().fen(), next.position().fen());
}

#[test]
fn turn_follows_history_parity() {
    let (sessions, _) = manager();
    let mut game = sessions.create(&id("parity"), "black", "2000").unwrap();
    for (n, mv) in ["d4", "d5", "c4", "e6", "Nc3"].into_iter().enumerate() {
        let expected = if n % 2 == 0 { Side::White } else { Side::Black };
        assert_eq!(game.turn(), expected);
        assert_eq!(game.turn().color(), game.position().side_to_move());
        game = sessions.apply_move(&game, mv).unwrap();
    }
    assert_eq!(game.turn(), Side::Black);
}

#[test]
fn move_history_is_paired() {
    let (sessions, _) = manager();
    let game = sessions.create(&id("pairs"), "black", "1350").unwrap();
    let game = sessions.apply_move(&game, "e4").unwrap();
    let game = sessions.apply_move(&game, "e5").unwrap();
    assert_eq!(game.formatted_history(), vec!["1. e4 e5"]);
    let game = sessions.apply_move(&game, "g1f3").unwrap();
    assert_eq!(game.formatted_history(), vec!["1. e4 e5", "2. Nf3"]);
}

#[test]
fn elo_is_clamped_on_create() {
    let (sessions, store) = manager();
    assert_eq!(sessions.create(&id("low"), "white", "800").unwrap().elo(), Elo::MIN);
    assert_eq!(sessions.create(&id("high"), "white", "3500").unwrap().elo(), Elo::MAX);
    assert_eq!(sessions.create(&id("float"), "white", "1725.9").unwrap().elo().get(), 1725);
    let stored = store.get(id("high").as_str()).unwrap().unwrap();
    assert_eq!(stored.elo.as_deref(), Some("2850"));
}

#[test]
fn create_validates_input() {
    let (sessions, store) = manager();
    match sessions.create(&id("v"), "red", "1500") {
        Err(Error::Validation(m)) => assert!(m.contains("assistant_color"), "{m}"),
        other => panic!("expected validation error, got {:?}", other.map(|s| s.ply())),
    }
    match sessions.create(&id("v"), "white", "strong") {
        Err(Error::Validation(m)) => assert!(m.contains("elo"), "{m}"),
        other => panic!("expected validation error, got {:?}", other.map(|s| s.ply())),
    }
    assert!(store.is_empty());
}

#[test]
fn failed_moves_change_nothing() {
    let (sessions, store) = manager();
    let game = sessions.create(&id("idem"), "white", "1500").unwrap();
    let game = sessions.apply_move(&game, "e4").unwrap();
    let before = store.get(id("idem").as_str()).unwrap();
    let fen = game.position().fen();

    let err = sessions.apply_move(&game, "e4").unwrap_err();
    assert!(matches!(err, Error::Move(MoveError::Illegal { .. })));
    let err = sessions.apply_move(&game, "hello").unwrap_err();
    assert!(matches!(err, Error::Move(MoveError::InvalidFormat(_))));

    assert_eq!(game.moves(), ["e4".to_string()]);
    assert_eq!(game.position().fen(), fen);
    assert_eq!(store.get(id("idem").as_str()).unwrap(), before);
}

#[test]
fn load_missing_and_truncated() {
    let (sessions, _) = manager();
    assert!(matches!(sessions.load(&id("nobody"), None), Err(Error::NotFound)));

    let mut game = sessions.create(&id("cut"), "white", "1500").unwrap();
    for mv in ["e4", "c5", "Nf3"] {
        game = sessions.apply_move(&game, mv).unwrap();
    }
    let early = sessions.load(&id("cut"), Some(1)).unwrap();
    assert_eq!(early.moves(), ["e4".to_string()]);
    assert_eq!(early.turn(), Side::Black);
    assert_eq!(sessions.load(&id("cut"), Some(10)).unwrap().ply(), 3);
}

#[test]
fn records_from_older_writers() {
    let store = Arc::new(MemoryStore::new());
    let key = id("legacy");
    store
        .put(key.as_str(), &GameRecord { moves: "e4,e5".into(), assistant_color: "black".into(), ..Default::default() })
        .unwrap();
    let game = SessionManager::new(store.clone()).load(&key, None).unwrap();
    assert_eq!(game.elo(), Elo::DEFAULT);
    assert!(game.created() > 0);

    let loud = GameRecord { elo: Some("9999".into()), ..store.get(key.as_str()).unwrap().unwrap() };
    let game = Session::from_record(key.clone(), &loud, None, 0).unwrap();
    assert_eq!(game.elo(), Elo::MAX);
}

#[test]
fn corrupt_history_is_an_error() {
    let store = Arc::new(MemoryStore::new());
    let key = id("broken");
    store.put(key.as_str(), &GameRecord { moves: "e4,e4".into(), assistant_color: "white".into(), ..Default::default() }).unwrap();
    let err = SessionManager::new(store).load(&key, None).unwrap_err();
    assert!(matches!(err, Error::Store(StoreError::Corrupt { .. })));
}

#[test]
fn setup_sessions_cannot_be_stored() {
    let (sessions, store) = manager();
    let game = Session::from_fen(id("fen"), "4k3/8/8/8/8/8/4P3/4K3 b - - 0 1", Side::White, Elo::DEFAULT, 0).unwrap();
    assert_eq!(game.turn(), Side::Black);
    assert!(matches!(sessions.apply_move(&game, "Kd7"), Err(Error::Validation(_))));
    assert!(store.is_empty());
}
