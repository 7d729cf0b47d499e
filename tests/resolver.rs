mod common;

use std::sync::Arc;

use chessgpt::board::Termination;
use chessgpt::codec;
use chessgpt::error::Error;
use chessgpt::resolver::{Resolver, TurnState};
use chessgpt::session::{Elo, Session, SessionId, Side};
use common::{memory_sessions, ScriptedEngine};
use cozy_chess::Color;
use pretty_assertions::assert_eq;

const BASE: &str = "https://chess.test";

fn resolver(engine: &Arc<ScriptedEngine>) -> Resolver { Resolver::new(engine.clone()) }

#[test]
fn assistant_to_move_gets_one_engine_move() {
    let engine = Arc::new(ScriptedEngine::new("e2e4", &[]));
    let sessions = memory_sessions();
    let game = sessions.create(&SessionId::from_conversation("a"), "white", "1500").unwrap();

    let r = resolver(&engine);
    assert_eq!(r.state(&game), TurnState::AwaitingAssistantMove);
    let state = r.resolve(&game, BASE).unwrap();
    assert!(!state.game_over);
    assert_eq!(state.best_moves, "e4");
    assert_eq!(
        state.instructions,
        "It's the assistant's turn. The assistant is playing white. Pick a move from the following best moves for white: e4. Use the make move API to make the move for the assistant and then show the board to the user using the markdown from the display field."
    );
    let token = codec::encode_board(game.position().board());
    assert_eq!(state.display, format!("![Board]({BASE}/board.svg?b={token})"));
    assert_eq!(engine.configured()[0].0.get(), 1500);
}

#[test]
fn user_to_move_gets_full_strength_hints() {
    let engine = Arc::new(ScriptedEngine::new("e7e5", &["e7e5", "c7c5", "e7e6", "c7c6", "d7d5", "g8f6"]));
    let sessions = memory_sessions();
    let game = sessions.create(&SessionId::from_conversation("u"), "white", "1350").unwrap();
    let game = sessions.apply_move(&game, "e4").unwrap();

    let state = resolver(&engine).resolve(&game, BASE).unwrap();
    assert_eq!(state.best_moves, "e5, c5, e6, c6, d5");
    assert!(state.instructions.starts_with("It's the user's turn to move. The user is playing black."));
    let (elo, fen) = engine.configured().remove(0);
    assert_eq!(elo, Elo::MAX);
    assert_eq!(fen, game.position().fen());
}

#[test]
fn engine_moves_that_do_not_fit_are_dropped() {
    let engine = Arc::new(ScriptedEngine::new("e2e5", &["e7e5", "a1a8", "zzzz", "g8f6"]));
    let sessions = memory_sessions();
    let game = sessions.create(&SessionId::from_conversation("drop"), "white", "2000").unwrap();
    let game = sessions.apply_move(&game, "d4").unwrap();
    let state = resolver(&engine).resolve(&game, BASE).unwrap();
    assert_eq!(state.best_moves, "e5, Nf6");

    let white = sessions.create(&SessionId::from_conversation("drop2"), "white", "2000").unwrap();
    let state = resolver(&engine).resolve(&white, BASE).unwrap();
    assert_eq!(state.best_moves, "");
}

#[test]
fn checkmate_from_a_position() {
    let engine = Arc::new(ScriptedEngine::new("e2e4", &[]));
    let id = SessionId::from_conversation("mate");
    let assistant_white = Session::from_fen(id.clone(), "7k/5KQ1/8/8/8/8/8/8 b - - 0 1", Side::White, Elo::DEFAULT, 0).unwrap();

    let r = resolver(&engine);
    assert_eq!(r.state(&assistant_white), TurnState::GameOver(Termination::Checkmate { loser: Color::Black }));
    let state = r.resolve(&assistant_white, BASE).unwrap();
    assert!(state.game_over);
    assert_eq!(state.best_moves, "");
    assert_eq!(state.instructions, "Game over! The assistant won by Checkmate!");

    let assistant_black = Session::from_fen(id, "7k/5KQ1/8/8/8/8/8/8 b - - 0 1", Side::Black, Elo::DEFAULT, 0).unwrap();
    let state = r.resolve(&assistant_black, BASE).unwrap();
    assert_eq!(state.instructions, "Game over! The user won by Checkmate!");
    assert!(engine.configured().is_empty());
}

#[test]
fn draws_by_repetition_depend_on_claims() {
    let engine = Arc::new(ScriptedEngine::new("g1f3", &["g1f3"]));
    let sessions = memory_sessions();
    let mut game = sessions.create(&SessionId::from_conversation("rep"), "white", "2000").unwrap();
    for mv in ["Nf3", "Nf6", "Ng1", "Ng8", "Nf3", "Nf6", "Ng1", "Ng8"] {
        game = sessions.apply_move(&game, mv).unwrap();
    }
    assert_eq!(resolver(&engine).state(&game), TurnState::AwaitingAssistantMove);
    let claiming = Resolver::new(engine.clone()).with_claim_draws(true);
    let state = claiming.resolve(&game, BASE).unwrap();
    assert_eq!(state.instructions, "Game over! Game ended in a threefold repetition!");
}

#[test]
fn stalemate_and_bare_kings() {
    let engine = Arc::new(ScriptedEngine::default());
    let r = resolver(&engine);
    let id = SessionId::from_conversation("draw");
    let stale = Session::from_fen(id.clone(), "7k/5Q2/6K1/8/8/8/8/8 b - - 0 1", Side::Black, Elo::DEFAULT, 0).unwrap();
    assert_eq!(r.resolve(&stale, BASE).unwrap().instructions, "Game over! Game ended in a stalemate!");
    let bare = Session::from_fen(id, "4k3/8/8/8/8/8/8/4K3 w - - 0 1", Side::Black, Elo::DEFAULT, 0).unwrap();
    assert_eq!(
        r.resolve(&bare, BASE).unwrap().instructions,
        "Game over! Game ended in insufficient material (K vs. K, K vs. KB, or K vs. KN)"
    );
}

#[test]
fn engine_failures_surface() {
    let engine = Arc::new(ScriptedEngine::broken());
    let sessions = memory_sessions();
    let game = sessions.create(&SessionId::from_conversation("down"), "white", "2000").unwrap();
    let err = resolver(&engine).resolve(&game, BASE).unwrap_err();
    assert!(err.is_retryable());
    assert!(matches!(err, Error::Engine(_)));
}

#[test]
fn payload_field_names() {
    let engine = Arc::new(ScriptedEngine::new("e2e4", &[]));
    let game = memory_sessions().create(&SessionId::from_conversation("json"), "white", "2000").unwrap();
    let state = resolver(&engine).resolve(&game, BASE).unwrap();
    let value = serde_json::to_value(&state).unwrap();
    assert!(value.get("EXTRA_INFORMATION_TO_ASSISTANT").is_some());
    assert!(value.get("error_message").is_none());
    assert_eq!(value["game_over"], false);
}
