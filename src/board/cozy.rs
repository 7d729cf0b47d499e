use cozy_chess::{Board as CozyBoard, Color, File, Move, Piece, Rank, Square};

use super::{san, BoardError};

/// A cozy-chess board plus every earlier position since it was set up, kept
/// for repetition counting.
#[derive(Clone, Debug)]
pub struct Position {
    board: CozyBoard,
    history: Vec<CozyBoard>,
    /// Plies since the last capture or pawn move. cozy-chess stops counting at
    /// 100, which is too early for the seventy-five-move rule.
    halfmoves: u32,
}

impl Position {
    pub fn startpos() -> Self { Self::wrap(CozyBoard::default()) }

    pub fn from_fen(fen: &str) -> Result<Self, BoardError> {
        let invalid = |reason: String| BoardError::Fen { fen: fen.to_string(), reason };
        let mut fields: Vec<&str> = fen.split_whitespace().collect();
        let halfmoves = match fields.get(4) {
            None => 0,
            Some(f) => f.parse::<u32>().map_err(|_| invalid(format!("bad halfmove clock {f:?}")))?,
        };
        if halfmoves > 100 {
            fields[4] = "100";
        }
        let board = CozyBoard::from_fen(&fields.join(" "), false).map_err(|e| invalid(format!("{e:?}")))?;
        Ok(Self { halfmoves, ..Self::wrap(board) })
    }

    fn wrap(board: CozyBoard) -> Self {
        let halfmoves = board.halfmove_clock() as u32;
        Self { board, history: Vec::new(), halfmoves }
    }

    /// Replays a SAN history from the initial position.
    pub fn from_san_history<S: AsRef<str>>(moves: &[S]) -> Result<Self, BoardError> {
        let mut pos = Self::startpos();
        for (ply, m) in moves.iter().enumerate() {
            let san = m.as_ref();
            if pos.play_san(san).is_none() {
                return Err(BoardError::Replay { ply, san: san.to_string() });
            }
        }
        Ok(pos)
    }

    pub fn board(&self) -> &CozyBoard { &self.board }

    pub fn fen(&self) -> String {
        let fen = self.board.to_string();
        if self.halfmoves <= 100 {
            return fen;
        }
        let mut fields: Vec<String> = fen.split_whitespace().map(str::to_string).collect();
        if let Some(clock) = fields.get_mut(4) {
            *clock = self.halfmoves.to_string();
        }
        fields.join(" ")
    }

    pub fn halfmove_clock(&self) -> u32 { self.halfmoves }

    pub fn side_to_move(&self) -> Color { self.board.side_to_move() }

    pub fn legal_moves(&self) -> Vec<Move> {
        let mut out = Vec::new();
        self.board.generate_moves(|moves| { out.extend(moves); false });
        out
    }

    pub fn has_legal_moves(&self) -> bool {
        let mut any = false;
        self.board.generate_moves(|moves| { any = !moves.is_empty(); any });
        any
    }

    /// Every legal move paired with its SAN.
    pub fn legal_sans(&self) -> Vec<(Move, String)> {
        self.legal_moves().into_iter().map(|m| (m, san::render(&self.board, m))).collect()
    }

    pub fn san(&self, mv: Move) -> String { san::render(&self.board, mv) }

    pub fn play(&mut self, mv: Move) -> Result<(), BoardError> {
        if !self.board.is_legal(mv) {
            return Err(BoardError::Illegal { uci: self.uci(mv) });
        }
        let stm = self.board.side_to_move();
        let resets = self.board.piece_on(mv.from) == Some(Piece::Pawn) || self.board.color_on(mv.to) == Some(!stm);
        self.history.push(self.board.clone());
        self.board.play_unchecked(mv);
        self.halfmoves = if resets { 0 } else { self.halfmoves + 1 };
        Ok(())
    }

    /// Plays the legal move whose SAN is exactly `text`.
    pub fn play_san(&mut self, text: &str) -> Option<Move> {
        let mv = self.legal_sans().into_iter().find(|(_, s)| s == text).map(|(m, _)| m)?;
        self.play(mv).ok()?;
        Some(mv)
    }

    /// Builds the cozy move for a coordinate triple. A king stepping two files
    /// along its back rank becomes king-takes-rook, which is how cozy-chess
    /// encodes castling. Legality is not checked.
    pub fn coordinate_move(&self, from: Square, to: Square, promotion: Option<Piece>) -> Move {
        let stm = self.board.side_to_move();
        let mut to = to;
        let is_own_king = self.board.piece_on(from) == Some(Piece::King) && self.board.color_on(from) == Some(stm);
        let files_apart = (from.file() as i32 - to.file() as i32).abs();
        if is_own_king && from.rank() == to.rank() && files_apart == 2 {
            let rights = self.board.castle_rights(stm);
            let rook = if (to.file() as usize) > (from.file() as usize) { rights.short } else { rights.long };
            if let Some(file) = rook { to = Square::new(file, from.rank()); }
        }
        Move { from, to, promotion }
    }

    /// Standard coordinate notation, with castling written as the king's two-square move.
    pub fn uci(&self, mv: Move) -> String {
        let stm = self.board.side_to_move();
        let castles = self.board.piece_on(mv.from) == Some(Piece::King) && self.board.color_on(mv.to) == Some(stm);
        let to = if castles {
            let file = if (mv.to.file() as usize) > (mv.from.file() as usize) { File::G } else { File::C };
            Square::new(file, mv.from.rank())
        } else {
            mv.to
        };
        let mut s = format!("{}{}", mv.from, to);
        if let Some(p) = mv.promotion { s.push(promotion_char(p)); }
        s
    }

    /// Translates an engine's coordinate move into SAN, or `None` if it is not
    /// a legal move here.
    pub fn uci_to_san(&self, text: &str) -> Option<String> {
        let (from, to, promotion) = parse_coordinate(text)?;
        let mv = self.coordinate_move(from, to, promotion);
        if self.board.is_legal(mv) { Some(self.san(mv)) } else { None }
    }

    /// How many times the current position has occurred, itself included.
    /// En passant only distinguishes positions when the capture is legal.
    pub fn repetitions(&self) -> usize {
        // nothing before the last capture or pawn move can match
        let reversible = self.halfmoves as usize;
        1 + self.history.iter().rev().take(reversible).filter(|b| b.same_position(&self.board)).count()
    }
}

impl Default for Position {
    fn default() -> Self { Self::startpos() }
}

/// Parses `e2e4` / `e7e8q` style text into its squares and promotion piece.
pub fn parse_coordinate(text: &str) -> Option<(Square, Square, Option<Piece>)> {
    let b = text.as_bytes();
    if b.len() != 4 && b.len() != 5 { return None; }
    let from = square_from_bytes(b[0], b[1])?;
    let to = square_from_bytes(b[2], b[3])?;
    let promotion = match b.get(4) {
        None => None,
        Some(c) => Some(promotion_piece(c.to_ascii_lowercase())?),
    };
    Some((from, to, promotion))
}

fn square_from_bytes(f: u8, r: u8) -> Option<Square> {
    if !(b'a'..=b'h').contains(&f) || !(b'1'..=b'8').contains(&r) { return None; }
    Some(Square::new(File::index((f - b'a') as usize), Rank::index((r - b'1') as usize)))
}

fn promotion_piece(c: u8) -> Option<Piece> {
    match c {
        b'q' => Some(Piece::Queen),
        b'r' => Some(Piece::Rook),
        b'b' => Some(Piece::Bishop),
        b'n' => Some(Piece::Knight),
        _ => None,
    }
}

fn promotion_char(p: Piece) -> char {
    match p {
        Piece::Queen => 'q',
        Piece::Rook => 'r',
        Piece::Bishop => 'b',
        Piece::Knight => 'n',
        Piece::Pawn => 'p',
        Piece::King => 'k',
    }
}
