//! SVG board image.

use std::fmt::Write as _;

use cozy_chess::{Color, File, Piece, Rank, Square};

use crate::codec::Placement;

pub const SIZE: u32 = 400;
const MARGIN: u32 = 20;
const LIGHT: &str = "#f0d9b5";
const DARK: &str = "#b58863";

fn glyph(piece: Piece, color: Color) -> char {
    match (color, piece) {
        (Color::White, Piece::King) => '\u{2654}',
        (Color::White, Piece::Queen) => '\u{2655}',
        (Color::White, Piece::Rook) => '\u{2656}',
        (Color::White, Piece::Bishop) => '\u{2657}',
        (Color::White, Piece::Knight) => '\u{2658}',
        (Color::White, Piece::Pawn) => '\u{2659}',
        (Color::Black, Piece::King) => '\u{265A}',
        (Color::Black, Piece::Queen) => '\u{265B}',
        (Color::Black, Piece::Rook) => '\u{265C}',
        (Color::Black, Piece::Bishop) => '\u{265D}',
        (Color::Black, Piece::Knight) => '\u{265E}',
        (Color::Black, Piece::Pawn) => '\u{265F}',
    }
}

/// Renders the placement from white's side, with file and rank labels in the margin.
pub fn svg(placement: &Placement) -> String {
    let square = (SIZE - 2 * MARGIN) / 8;
    let mut out = String::with_capacity(16 * 1024);
    let _ = write!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" version="1.1" width="{SIZE}" height="{SIZE}" viewBox="0 0 {SIZE} {SIZE}">"#
    );
    let _ = write!(out, r##"<rect x="0" y="0" width="{SIZE}" height="{SIZE}" fill="#212121"/>"##);

    for row in 0..8u32 {
        let rank = Rank::index(7 - row as usize);
        for col in 0..8u32 {
            let file = File::index(col as usize);
            let x = MARGIN + col * square;
            let y = MARGIN + row * square;
            // a1 is dark
            let fill = if (col + row) % 2 == 0 { LIGHT } else { DARK };
            let _ = write!(out, r#"<rect x="{x}" y="{y}" width="{square}" height="{square}" fill="{fill}"/>"#);
            if let Some((piece, color)) = placement.get(Square::new(file, rank)) {
                let _ = write!(
                    out,
                    r#"<text x="{}" y="{}" font-size="{}" text-anchor="middle" dominant-baseline="central">{}</text>"#,
                    x + square / 2,
                    y + square / 2,
                    square * 4 / 5,
                    glyph(piece, color)
                );
            }
        }
    }

    for i in 0..8u32 {
        let centre = MARGIN + i * square + square / 2;
        let file = (b'a' + i as u8) as char;
        let rank = 8 - i;
        let _ = write!(
            out,
            r##"<text x="{centre}" y="{}" font-size="12" fill="#e5e5e5" text-anchor="middle">{file}</text>"##,
            SIZE - 6
        );
        let _ = write!(
            out,
            r##"<text x="{}" y="{centre}" font-size="12" fill="#e5e5e5" text-anchor="middle" dominant-baseline="central">{rank}</text>"##,
            MARGIN / 2
        );
    }
    out.push_str("</svg>");
    out
}
