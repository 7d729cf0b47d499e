use cozy_chess::{BitBoard, Board, Color, Piece};

use super::Position;

/// Why a game ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Termination {
    Checkmate { loser: Color },
    Stalemate,
    InsufficientMaterial,
    SeventyFiveMoves,
    FivefoldRepetition,
    FiftyMoves,
    ThreefoldRepetition,
}

impl Position {
    /// Terminal state of the position, if any. Automatic endings always count;
    /// with `claim_draws` the claimable draws (threefold, fifty-move) end the
    /// game as well.
    pub fn outcome(&self, claim_draws: bool) -> Option<Termination> {
        let board = self.board();
        let has_moves = self.has_legal_moves();
        let in_check = !board.checkers().is_empty();
        if in_check && !has_moves {
            return Some(Termination::Checkmate { loser: board.side_to_move() });
        }
        if is_insufficient_material(board) { return Some(Termination::InsufficientMaterial); }
        if !has_moves { return Some(Termination::Stalemate); }
        if self.halfmove_clock() >= 150 { return Some(Termination::SeventyFiveMoves); }
        let reps = self.repetitions();
        if reps >= 5 { return Some(Termination::FivefoldRepetition); }
        if claim_draws {
            if self.halfmove_clock() >= 100 { return Some(Termination::FiftyMoves); }
            if reps >= 3 { return Some(Termination::ThreefoldRepetition); }
        }
        None
    }
}

/// Neither side can possibly deliver mate.
pub fn is_insufficient_material(board: &Board) -> bool {
    Color::ALL.into_iter().all(|c| side_cannot_mate(board, c))
}

fn side_cannot_mate(board: &Board, color: Color) -> bool {
    let ours = board.colors(color);
    let heavy = board.pieces(Piece::Pawn) | board.pieces(Piece::Rook) | board.pieces(Piece::Queen);
    if !(ours & heavy).is_empty() { return false; }

    if !(ours & board.pieces(Piece::Knight)).is_empty() {
        // a lone knight mates only with enemy blockers other than the queen
        let their_blockers = board.colors(!color) & !board.pieces(Piece::King) & !board.pieces(Piece::Queen);
        return ours.len() <= 2 && their_blockers.is_empty();
    }

    let bishops = board.pieces(Piece::Bishop);
    if !(ours & bishops).is_empty() {
        let one_shade = (bishops & dark_squares()).is_empty() || (bishops & !dark_squares()).is_empty();
        return one_shade && board.pieces(Piece::Pawn).is_empty() && board.pieces(Piece::Knight).is_empty();
    }
    true
}

fn dark_squares() -> BitBoard {
    // a1 is dark
    BitBoard(0xAA55_AA55_AA55_AA55)
}
