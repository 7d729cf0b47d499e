//! Per-conversation game sessions.

pub mod id;
pub mod manager;

pub use id::SessionId;
pub use manager::SessionManager;

use std::fmt;
use std::str::FromStr;

use cozy_chess::Color;
use serde::{Deserialize, Serialize};

use crate::board::Position;
use crate::normalize::Normalized;
use crate::store::{GameRecord, StoreError};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    White,
    Black,
}

impl Side {
    pub fn color(self) -> Color {
        match self {
            Side::White => Color::White,
            Side::Black => Color::Black,
        }
    }

    pub fn from_color(color: Color) -> Self {
        match color {
            Color::White => Side::White,
            Color::Black => Side::Black,
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Side::White => Side::Black,
            Side::Black => Side::White,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Side::White => "white",
            Side::Black => "black",
        }
    }
}

impl FromStr for Side {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "white" => Ok(Side::White),
            "black" => Ok(Side::Black),
            _ => Err(()),
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

/// Playing strength, always inside `[MIN, MAX]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Elo(u32);

impl Elo {
    pub const MIN: Elo = Elo(1350);
    pub const MAX: Elo = Elo(2850);
    pub const DEFAULT: Elo = Elo(2000);

    pub fn clamped(raw: i64) -> Self {
        Elo(raw.clamp(Self::MIN.0 as i64, Self::MAX.0 as i64) as u32)
    }

    pub fn get(self) -> u32 { self.0 }
}

impl Default for Elo {
    fn default() -> Self { Self::DEFAULT }
}

impl fmt::Display for Elo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.0) }
}

/// One game. Values are never mutated in place; moving returns a new session.
#[derive(Clone, Debug)]
pub struct Session {
    id: SessionId,
    position: Position,
    moves: Vec<String>,
    assistant: Side,
    elo: Elo,
    created: i64,
    updated: i64,
    /// Set up from a FEN instead of a move history; such a session cannot be
    /// stored since its board is not the replay of `moves`.
    from_setup: bool,
}

impl Session {
    pub fn new(id: SessionId, assistant: Side, elo: Elo, now: i64) -> Self {
        Self {
            id,
            position: Position::startpos(),
            moves: Vec::new(),
            assistant,
            elo,
            created: now,
            updated: now,
            from_setup: false,
        }
    }

    /// Session over an arbitrary position with no history. Used for analysis
    /// and tests; turn ownership follows the position's side to move.
    pub fn from_fen(id: SessionId, fen: &str, assistant: Side, elo: Elo, now: i64) -> crate::Result<Self> {
        let position = Position::from_fen(fen)?;
        Ok(Self { position, from_setup: true, ..Self::new(id, assistant, elo, now) })
    }

    pub fn id(&self) -> &SessionId { &self.id }
    pub fn position(&self) -> &Position { &self.position }
    pub fn moves(&self) -> &[String] { &self.moves }
    pub fn assistant(&self) -> Side { self.assistant }
    pub fn user(&self) -> Side { self.assistant.opposite() }
    pub fn elo(&self) -> Elo { self.elo }
    pub fn created(&self) -> i64 { self.created }
    pub fn updated(&self) -> i64 { self.updated }
    pub fn is_from_setup(&self) -> bool { self.from_setup }

    pub fn ply(&self) -> usize { self.moves.len() }

    /// Side to move. For replayed games this is the history parity (even is white).
    pub fn turn(&self) -> Side {
        if self.from_setup {
            return Side::from_color(self.position.side_to_move());
        }
        if self.moves.len() % 2 == 0 { Side::White } else { Side::Black }
    }

    /// Move pairs as `"1. e4 e5"`, `"2. Nf3"`.
    pub fn formatted_history(&self) -> Vec<String> {
        self.moves
            .chunks(2)
            .enumerate()
            .map(|(i, pair)| format!("{}. {}", i + 1, pair.join(" ")))
            .collect()
    }

    /// The session one ply later.
    pub(crate) fn with_move(&self, normalized: &Normalized, now: i64) -> crate::Result<Self> {
        let mut next = self.clone();
        next.position.play(normalized.mv)?;
        next.moves.push(normalized.san.clone());
        next.updated = now;
        Ok(next)
    }

    pub fn to_record(&self) -> GameRecord {
        GameRecord {
            moves: self.moves.join(","),
            assistant_color: self.assistant.as_str().to_string(),
            elo: Some(self.elo.to_string()),
            created: Some(self.created.to_string()),
            updated: Some(self.updated.to_string()),
        }
    }

    /// Rebuilds a session by replaying the stored history, optionally cut at
    /// `max_ply` moves.
    pub fn from_record(id: SessionId, record: &GameRecord, max_ply: Option<usize>, now: i64) -> Result<Self, StoreError> {
        let corrupt = |reason: String| StoreError::Corrupt { key: id.to_string(), reason };

        let assistant: Side = record
            .assistant_color
            .parse()
            .map_err(|_| corrupt(format!("bad assistant_color {:?}", record.assistant_color)))?;
        let elo = match record.elo.as_deref() {
            None => Elo::DEFAULT,
            Some(text) => Elo::clamped(parse_rating(text).ok_or_else(|| corrupt(format!("bad elo {text:?}")))?),
        };
        let stamp = |field: &Option<String>, name: &str| -> Result<i64, StoreError> {
            match field.as_deref() {
                None => Ok(now),
                Some(t) => t.trim().parse().map_err(|_| corrupt(format!("bad {name} {t:?}"))),
            }
        };
        let created = stamp(&record.created, "created")?;
        let updated = stamp(&record.updated, "updated")?;

        let mut moves: Vec<String> = record
            .moves
            .split(',')
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .map(str::to_string)
            .collect();
        if let Some(limit) = max_ply {
            moves.truncate(limit);
        }
        let position = Position::from_san_history(&moves).map_err(|e| corrupt(e.to_string()))?;

        Ok(Self { id, position, moves, assistant, elo, created, updated, from_setup: false })
    }
}

/// Integer rating text; a decimal is truncated toward zero.
pub(crate) fn parse_rating(text: &str) -> Option<i64> {
    let text = text.trim();
    if let Ok(v) = text.parse::<i64>() {
        return Some(v);
    }
    let v: f64 = text.parse().ok()?;
    v.is_finite().then(|| v.trunc() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rating_text() {
        assert_eq!(parse_rating("1500"), Some(1500));
        assert_eq!(parse_rating(" 1999.7 "), Some(1999));
        assert_eq!(parse_rating("strong"), None);
        assert_eq!(parse_rating("inf"), None);
    }

    #[test]
    fn elo_clamps() {
        assert_eq!(Elo::clamped(100), Elo::MIN);
        assert_eq!(Elo::clamped(9000), Elo::MAX);
        assert_eq!(Elo::clamped(1600).get(), 1600);
    }
}
