//! Turns a session into the payload the assistant acts on: whose move it is,
//! engine suggestions, and a board image link.

use std::sync::Arc;

use log::{debug, error, warn};
use serde::Serialize;

use crate::board::{Position, Termination};
use crate::codec::{self, DecodeError, Placement};
use crate::engine::{Engine, HINT_COUNT};
use crate::error::Result;
use crate::session::{Elo, Session, Side};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TurnState {
    GameOver(Termination),
    AwaitingAssistantMove,
    AwaitingUserMove,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct BoardState {
    pub game_over: bool,
    pub display: String,
    pub best_moves: String,
    #[serde(rename = "EXTRA_INFORMATION_TO_ASSISTANT")]
    pub instructions: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

pub struct Resolver {
    engine: Arc<dyn Engine>,
    claim_draws: bool,
}

impl Resolver {
    pub fn new(engine: Arc<dyn Engine>) -> Self { Self { engine, claim_draws: false } }

    pub fn with_claim_draws(mut self, claim_draws: bool) -> Self {
        self.claim_draws = claim_draws;
        self
    }

    pub fn state(&self, session: &Session) -> TurnState {
        if let Some(t) = session.position().outcome(self.claim_draws) {
            return TurnState::GameOver(t);
        }
        if session.turn() == session.assistant() {
            TurnState::AwaitingAssistantMove
        } else {
            TurnState::AwaitingUserMove
        }
    }

    /// Builds the payload for `session`. `base_url` has no trailing slash.
    pub fn resolve(&self, session: &Session, base_url: &str) -> Result<BoardState> {
        let display = board_link(session, base_url);
        let turn = session.turn();
        let state = match self.state(session) {
            TurnState::GameOver(t) => BoardState {
                game_over: true,
                display,
                best_moves: String::new(),
                instructions: format!("Game over! {}", game_over_reason(t, session.assistant())),
                error_message: None,
            },
            TurnState::AwaitingAssistantMove => {
                let mut handle = self.engine.configure(session.elo(), &session.position().fen())?;
                let best: Vec<String> = handle.best_move()?.into_iter().collect();
                let moves = to_san(session.position(), &best).join(", ");
                debug!("assistant candidates for {}: {moves}", session.id());
                BoardState {
                    game_over: false,
                    display,
                    instructions: format!(
                        "It's the assistant's turn. The assistant is playing {turn}. Pick a move from the following best moves for {turn}: {moves}. Use the make move API to make the move for the assistant and then show the board to the user using the markdown from the display field."
                    ),
                    best_moves: moves,
                    error_message: None,
                }
            }
            TurnState::AwaitingUserMove => {
                // hints always come from full strength
                let mut handle = self.engine.configure(Elo::MAX, &session.position().fen())?;
                let top = handle.top_moves(HINT_COUNT)?;
                BoardState {
                    game_over: false,
                    display,
                    best_moves: to_san(session.position(), &top).join(", "),
                    instructions: format!(
                        "It's the user's turn to move. The user is playing {turn}. Show the board to the user using the markdown from the display field. Prompt the user to make their move using SAN notation (e.g. e4, Nf3, etc). Use the make move API to make the move for the user."
                    ),
                    error_message: None,
                }
            }
        };
        Ok(state)
    }
}

pub fn game_over_reason(termination: Termination, assistant: Side) -> &'static str {
    match termination {
        Termination::Checkmate { loser } if loser == assistant.color() => "The user won by Checkmate!",
        Termination::Checkmate { .. } => "The assistant won by Checkmate!",
        Termination::Stalemate => "Game ended in a stalemate!",
        Termination::ThreefoldRepetition => "Game ended in a threefold repetition!",
        Termination::FivefoldRepetition => "Game ended in a fivefold repetition!",
        Termination::InsufficientMaterial => "Game ended in insufficient material (K vs. K, K vs. KB, or K vs. KN)",
        Termination::SeventyFiveMoves | Termination::FiftyMoves => "Game ended in an unspecified way!",
    }
}

/// Markdown image for the session's board, by token when the token survives
/// its own decode, otherwise by session id and ply.
pub fn board_link(session: &Session, base_url: &str) -> String {
    let placement = Placement::from_board(session.position().board());
    let checked = codec::checked_token(&placement).map_err(|e| {
        error!("board token for {placement:?} failed its self-check: {e}");
        e
    });
    link_for(checked, session, base_url)
}

fn link_for(checked: Result<String, DecodeError>, session: &Session, base_url: &str) -> String {
    match checked {
        Ok(token) => format!("![Board]({base_url}/board.svg?b={token})"),
        Err(_) => format!("![Board]({base_url}/board.svg?cid={}&m={})", session.id(), session.ply()),
    }
}

/// Engine moves in SAN; moves this position rejects are dropped.
fn to_san(position: &Position, uci_moves: &[String]) -> Vec<String> {
    uci_moves
        .iter()
        .filter_map(|m| match position.uci_to_san(m) {
            Some(san) => Some(san),
            None => {
                warn!("engine suggested {m}, which is not legal in {}", position.fen());
                None
            }
        })
        .collect()
}
