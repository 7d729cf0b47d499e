//! Reconciles free-form move text with the legal moves of a position.

use cozy_chess::Move;
use thiserror::Error;

use crate::board::cozy::parse_coordinate;
use crate::board::san::looks_like_san;
use crate::board::Position;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoveError {
    /// Neither SAN nor coordinate notation.
    #[error("Invalid move format {0:?} - use SAN (e.g. e4, Nf3)")]
    InvalidFormat(String),
    #[error("Illegal move {text:?} - {reason}")]
    Illegal { text: String, reason: String },
}

/// A legal move and its canonical SAN.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Normalized {
    pub mv: Move,
    pub san: String,
}

pub fn normalize(position: &Position, text: &str) -> Result<Normalized, MoveError> {
    let text = text.trim();
    let legal = position.legal_sans();
    if let Some((mv, san)) = legal.iter().find(|(_, san)| san == text) {
        return Ok(Normalized { mv: *mv, san: san.clone() });
    }

    if let Some((from, to, promotion)) = parse_coordinate(text) {
        let wanted = position.coordinate_move(from, to, promotion);
        if let Some((mv, san)) = legal.iter().find(|(mv, _)| *mv == wanted) {
            return Ok(Normalized { mv: *mv, san: san.clone() });
        }
        let needs_piece = promotion.is_none()
            && legal.iter().any(|(mv, _)| mv.from == wanted.from && mv.to == wanted.to && mv.promotion.is_some());
        let reason = if needs_piece {
            "name the promotion piece, e.g. e7e8q".to_string()
        } else {
            "not legal in this position".to_string()
        };
        return Err(MoveError::Illegal { text: text.to_string(), reason });
    }

    if looks_like_san(text) {
        return Err(MoveError::Illegal { text: text.to_string(), reason: "make sure you use SAN".to_string() });
    }
    Err(MoveError::InvalidFormat(text.to_string()))
}
