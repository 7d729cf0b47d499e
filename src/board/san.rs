use cozy_chess::{Board, Move, Piece, Square};

/// Standard Algebraic Notation for a legal move on `board`.
pub fn render(board: &Board, mv: Move) -> String {
    let stm = board.side_to_move();
    let piece = board.piece_on(mv.from).unwrap_or(Piece::Pawn);
    let mut out = String::with_capacity(8);

    // cozy-chess castles by moving the king onto its own rook
    if piece == Piece::King && board.color_on(mv.to) == Some(stm) {
        let short = (mv.to.file() as usize) > (mv.from.file() as usize);
        out.push_str(if short { "O-O" } else { "O-O-O" });
    } else if piece == Piece::Pawn {
        // a pawn changing file always captures, en passant included
        if mv.from.file() != mv.to.file() {
            out.push(file_char(mv.from));
            out.push('x');
        }
        push_square(&mut out, mv.to);
        if let Some(p) = mv.promotion {
            out.push('=');
            out.push(piece_letter(p));
        }
    } else {
        out.push(piece_letter(piece));
        out.push_str(&disambiguation(board, mv, piece));
        if board.color_on(mv.to) == Some(!stm) { out.push('x'); }
        push_square(&mut out, mv.to);
    }

    let mut child = board.clone();
    child.play_unchecked(mv);
    if !child.checkers().is_empty() {
        let mut has_reply = false;
        child.generate_moves(|moves| { has_reply = !moves.is_empty(); has_reply });
        out.push(if has_reply { '+' } else { '#' });
    }
    out
}

fn disambiguation(board: &Board, mv: Move, piece: Piece) -> String {
    let mut rivals: Vec<Square> = Vec::new();
    board.generate_moves(|moves| {
        if moves.piece == piece {
            for m in moves {
                if m.to == mv.to && m.from != mv.from { rivals.push(m.from); }
            }
        }
        false
    });
    if rivals.is_empty() { return String::new(); }
    let shares_file = rivals.iter().any(|s| s.file() == mv.from.file());
    let shares_rank = rivals.iter().any(|s| s.rank() == mv.from.rank());
    let mut out = String::with_capacity(2);
    if !shares_file {
        out.push(file_char(mv.from));
    } else if !shares_rank {
        out.push(rank_char(mv.from));
    } else {
        out.push(file_char(mv.from));
        out.push(rank_char(mv.from));
    }
    out
}

pub fn piece_letter(piece: Piece) -> char {
    match piece {
        Piece::Pawn => 'P',
        Piece::Knight => 'N',
        Piece::Bishop => 'B',
        Piece::Rook => 'R',
        Piece::Queen => 'Q',
        Piece::King => 'K',
    }
}

fn file_char(sq: Square) -> char { (b'a' + sq.file() as u8) as char }

fn rank_char(sq: Square) -> char { (b'1' + sq.rank() as u8) as char }

fn push_square(out: &mut String, sq: Square) {
    out.push(file_char(sq));
    out.push(rank_char(sq));
}

/// Whether `text` is shaped like a SAN move, legal or not.
pub fn looks_like_san(text: &str) -> bool {
    let body = text.trim_end_matches(['+', '#']);
    if body == "O-O" || body == "O-O-O" { return true; }
    let b = body.as_bytes();
    if b.is_empty() { return false; }
    let is_file = |c: u8| (b'a'..=b'h').contains(&c);
    let is_rank = |c: u8| (b'1'..=b'8').contains(&c);
    match b[0] {
        b'N' | b'B' | b'R' | b'Q' | b'K' => {
            // piece letter, optional file/rank hint, optional capture, destination
            let rest = &b[1..];
            if rest.len() < 2 || !is_file(rest[rest.len() - 2]) || !is_rank(rest[rest.len() - 1]) { return false; }
            let mut hint = &rest[..rest.len() - 2];
            if hint.last() == Some(&b'x') { hint = &hint[..hint.len() - 1]; }
            match hint {
                [] => true,
                [c] => is_file(*c) || is_rank(*c),
                [f, r] => is_file(*f) && is_rank(*r),
                _ => false,
            }
        }
        c if is_file(c) => {
            let (main, promo) = match body.find('=') {
                Some(i) => (&b[..i], Some(&b[i + 1..])),
                None => (b, None),
            };
            let square_ok = match main {
                [f, r] => is_file(*f) && is_rank(*r),
                [_, b'x', f, r] => is_file(*f) && is_rank(*r),
                _ => false,
            };
            let promo_ok = match promo {
                None => true,
                Some([p]) => matches!(*p, b'N' | b'B' | b'R' | b'Q'),
                Some(_) => false,
            };
            square_ok && promo_ok
        }
        _ => false,
    }
}
