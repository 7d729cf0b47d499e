//! Board tokens: the piece placement packed with a fixed prefix-free code and
//! written as unpadded URL-safe base64.
//!
//! ```text
//! . = 1
//! P = 010    p = 001
//! N = 00000  n = 00001
//! B = 00010  b = 00011
//! R = 01110  r = 01101
//! Q = 011001 q = 011000
//! K = 011110 k = 011111
//! ```
//!
//! Squares are written rank 8 to rank 1, file a to h. A token is a rendering
//! key only: positions that differ just in castling rights, en passant or side
//! to move share a token.

pub mod bits;
pub mod placement;

use std::sync::OnceLock;

use base64::engine::general_purpose::{URL_SAFE, URL_SAFE_NO_PAD};
use base64::Engine as _;
use cozy_chess::{Board, Color, Piece};
use thiserror::Error;

pub use bits::{BitReader, BitWriter};
pub use placement::{Cell, Placement};

const MAX_CODE_LEN: u8 = 6;

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("token is not url-safe base64: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("bits {bits} at square {square} match no piece code")]
    UnknownCode { square: usize, bits: String },
    #[error("token ends after {squares} of 64 squares")]
    Truncated { squares: usize },
    #[error("token decodes to a different placement at square {square}")]
    Mismatch { square: usize },
}

/// Code word and its length in bits.
fn code(cell: Cell) -> (u8, u8) {
    use Color::{Black, White};
    use Piece::*;
    match cell {
        None => (0b1, 1),
        Some((Pawn, White)) => (0b010, 3),
        Some((Pawn, Black)) => (0b001, 3),
        Some((Knight, White)) => (0b00000, 5),
        Some((Knight, Black)) => (0b00001, 5),
        Some((Bishop, White)) => (0b00010, 5),
        Some((Bishop, Black)) => (0b00011, 5),
        Some((Rook, White)) => (0b01110, 5),
        Some((Rook, Black)) => (0b01101, 5),
        Some((Queen, White)) => (0b011001, 6),
        Some((Queen, Black)) => (0b011000, 6),
        Some((King, White)) => (0b011110, 6),
        Some((King, Black)) => (0b011111, 6),
    }
}

type DecodeTable = [[Option<Cell>; 1usize << MAX_CODE_LEN]; MAX_CODE_LEN as usize + 1];

static DECODE: OnceLock<DecodeTable> = OnceLock::new();

/// Indexed by code length, then code value.
fn decode_table() -> &'static DecodeTable {
    DECODE.get_or_init(|| {
        let mut table: DecodeTable = [[None; 1usize << MAX_CODE_LEN]; MAX_CODE_LEN as usize + 1];
        let pieces = Color::ALL.into_iter().flat_map(|c| Piece::ALL.into_iter().map(move |p| Some((p, c))));
        for cell in std::iter::once(None).chain(pieces) {
            let (bits, len) = code(cell);
            table[len as usize][bits as usize] = Some(cell);
        }
        table
    })
}

pub fn encode(placement: &Placement) -> String {
    let mut writer = BitWriter::with_capacity(48);
    for sq in Placement::printed_order() {
        let (bits, len) = code(placement.get(sq));
        writer.write(bits as u32, len);
    }
    URL_SAFE_NO_PAD.encode(writer.finish())
}

pub fn encode_board(board: &Board) -> String { encode(&Placement::from_board(board)) }

pub fn decode(token: &str) -> Result<Placement, DecodeError> {
    let mut padded = String::with_capacity(token.len() + 3);
    padded.push_str(token);
    while padded.len() % 4 != 0 { padded.push('='); }
    let bytes = URL_SAFE.decode(padded.as_bytes())?;

    let table = decode_table();
    let mut reader = BitReader::new(&bytes);
    let mut out = Placement::empty();
    for (index, sq) in Placement::printed_order().enumerate() {
        let (mut acc, mut len) = (0u8, 0u8);
        let cell = loop {
            let bit = reader.read_bit().ok_or(DecodeError::Truncated { squares: index })?;
            acc = (acc << 1) | bit as u8;
            len += 1;
            if let Some(cell) = table[len as usize][acc as usize] { break cell; }
            if len == MAX_CODE_LEN {
                return Err(DecodeError::UnknownCode { square: index, bits: format!("{acc:06b}") });
            }
        };
        out.set(sq, cell);
    }
    Ok(out)
}

/// Encodes and immediately decodes, failing unless the token reproduces the
/// placement exactly.
pub fn checked_token(placement: &Placement) -> Result<String, DecodeError> {
    let token = encode(placement);
    let back = decode(&token)?;
    if back != *placement {
        return Err(DecodeError::Mismatch { square: first_mismatch(placement, &back) });
    }
    Ok(token)
}

fn first_mismatch(a: &Placement, b: &Placement) -> usize {
    Placement::printed_order().position(|sq| a.get(sq) != b.get(sq)).unwrap_or(0)
}
