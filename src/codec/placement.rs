use std::fmt;

use cozy_chess::{Board, Color, File, Piece, Rank, Square};

use crate::board::san::piece_letter;

/// What stands on one square.
pub type Cell = Option<(Piece, Color)>;

/// Bare 64-square piece placement: no side to move, castling rights,
/// en-passant square or move counters.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    cells: [Cell; Square::NUM],
}

impl Placement {
    pub fn empty() -> Self { Self { cells: [None; Square::NUM] } }

    pub fn from_board(board: &Board) -> Self {
        let mut out = Self::empty();
        for sq in board.occupied() {
            out.cells[sq as usize] = board.piece_on(sq).zip(board.color_on(sq));
        }
        out
    }

    pub fn get(&self, sq: Square) -> Cell { self.cells[sq as usize] }

    pub fn set(&mut self, sq: Square, cell: Cell) { self.cells[sq as usize] = cell; }

    /// Squares in printed order: rank 8 to rank 1, file a to h.
    pub fn printed_order() -> impl Iterator<Item = Square> {
        (0..8).rev().flat_map(|r| (0..8).map(move |f| Square::new(File::index(f), Rank::index(r))))
    }

    /// Piece-placement field of a FEN string.
    pub fn fen_field(&self) -> String {
        let mut out = String::with_capacity(64);
        for r in (0..8).rev() {
            let mut gap = 0;
            for f in 0..8 {
                match self.get(Square::new(File::index(f), Rank::index(r))) {
                    None => gap += 1,
                    Some(cell) => {
                        if gap > 0 { out.push_str(&gap.to_string()); gap = 0; }
                        out.push(symbol(Some(cell)));
                    }
                }
            }
            if gap > 0 { out.push_str(&gap.to_string()); }
            if r > 0 { out.push('/'); }
        }
        out
    }
}

impl Default for Placement {
    fn default() -> Self { Self::empty() }
}

/// `.` for an empty square, otherwise the piece letter, upper case for white.
pub fn symbol(cell: Cell) -> char {
    match cell {
        None => '.',
        Some((piece, Color::White)) => piece_letter(piece),
        Some((piece, Color::Black)) => piece_letter(piece).to_ascii_lowercase(),
    }
}

impl fmt::Display for Placement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, sq) in Self::printed_order().enumerate() {
            let sep = if i % 8 == 7 { if i == 63 { "" } else { "\n" } } else { " " };
            write!(f, "{}{}", symbol(self.get(sq)), sep)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Placement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Placement({})", self.fen_field())
    }
}
