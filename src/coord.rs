//! Coordinate codec.
//!
//! Three coordinate spaces are in use:
//! - board points: zero-based `(x, y)` with `y` counted from the bottom
//! - SGF letter pairs: `a`-`z` then `A`-`Z`, with the row counted from the top
//! - display vertices: column letter skipping `I`, 1-based row from the bottom
//!   (`D4`, `Q16`, `pass`)
//!
//! Decoding never fails loudly: malformed or off-board input yields `None`
//! and the caller drops the move.

use crate::board::{Color, Point};
use crate::constants::{
    LEGACY_PASS, LEGACY_PASS_MAX_SIZE, MAX_DISPLAY_SIZE, MAX_SGF_SIZE, PASS_TOKEN,
};

/// A move: a stone placement or a pass.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Move {
    Pass,
    Place(Point),
}

impl Move {
    pub fn point(self) -> Option<Point> {
        match self {
            Move::Place(pt) => Some(pt),
            Move::Pass => None,
        }
    }
}

/// A move together with the color that made it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Play {
    pub color: Color,
    pub mv: Move,
}

impl Play {
    pub fn new(color: Color, mv: Move) -> Self {
        Play { color, mv }
    }

    /// Build a play from a display vertex such as `Q16` or `pass`.
    pub fn from_vertex(color: Color, vertex: &str, size: usize) -> Option<Play> {
        parse_vertex(vertex, size).map(|mv| Play { color, mv })
    }
}

// =============================================================================
// SGF letter pairs
// =============================================================================

fn sgf_letter(i: usize) -> Option<char> {
    match i {
        0..=25 => Some((b'a' + i as u8) as char),
        26..=51 => Some((b'A' + (i - 26) as u8) as char),
        _ => None,
    }
}

fn sgf_index(b: u8) -> Option<usize> {
    match b {
        b'a'..=b'z' => Some((b - b'a') as usize),
        b'A'..=b'Z' => Some((b - b'A') as usize + 26),
        _ => None,
    }
}

/// Encode a board point as an SGF letter pair.
pub fn str_sgf(pt: Point, size: usize) -> Option<String> {
    let (x, y) = pt;
    if size > MAX_SGF_SIZE || x >= size || y >= size {
        return None;
    }
    let col = sgf_letter(x)?;
    let row = sgf_letter(size - 1 - y)?;
    Some(format!("{col}{row}"))
}

/// Decode an SGF letter pair into a board point. Pass tokens are not points.
pub fn parse_sgf_point(token: &str, size: usize) -> Option<Point> {
    let bytes = token.trim().as_bytes();
    if bytes.len() != 2 || size > MAX_SGF_SIZE {
        return None;
    }
    let x = sgf_index(bytes[0])?;
    let row = sgf_index(bytes[1])?;
    if x >= size || row >= size {
        return None;
    }
    Some((x, size - 1 - row))
}

/// Decode an SGF move value. Empty brackets are a pass, and so is `tt` on
/// boards up to 19x19.
pub fn parse_sgf_move(token: &str, size: usize) -> Option<Move> {
    let token = token.trim();
    if token.is_empty() || (token == LEGACY_PASS && size <= LEGACY_PASS_MAX_SIZE) {
        return Some(Move::Pass);
    }
    parse_sgf_point(token, size).map(Move::Place)
}

/// Encode a move as an SGF value (without brackets).
pub fn str_sgf_move(mv: Move, size: usize, legacy_pass: bool) -> Option<String> {
    match mv {
        Move::Pass if legacy_pass && size <= LEGACY_PASS_MAX_SIZE => Some(LEGACY_PASS.into()),
        Move::Pass => Some(String::new()),
        Move::Place(pt) => str_sgf(pt, size),
    }
}

/// Expand a setup value: a single point, or a compressed `aa:cc` rectangle.
pub fn expand_point_list(token: &str, size: usize) -> Vec<Point> {
    let Some((from, to)) = token.split_once(':') else {
        return parse_sgf_point(token, size).into_iter().collect();
    };
    let (Some(a), Some(b)) = (parse_sgf_point(from, size), parse_sgf_point(to, size)) else {
        return Vec::new();
    };
    let mut points = Vec::new();
    // Top row first, matching the order the letters run in.
    for y in (a.1.min(b.1)..=a.1.max(b.1)).rev() {
        for x in a.0.min(b.0)..=a.0.max(b.0) {
            points.push((x, y));
        }
    }
    points
}

// =============================================================================
// Display vertices
// =============================================================================

/// Column letter for a zero-based column, skipping `I`.
pub fn column_letter(x: usize) -> Option<char> {
    match x {
        0..=7 => Some((b'A' + x as u8) as char),
        8..=24 => Some((b'A' + x as u8 + 1) as char),
        _ => None,
    }
}

fn column_index(c: u8) -> Option<usize> {
    match c.to_ascii_uppercase() {
        b'I' => None,
        c @ b'A'..=b'H' => Some((c - b'A') as usize),
        c @ b'J'..=b'Z' => Some((c - b'A') as usize - 1),
        _ => None,
    }
}

/// Convert a board point to display notation (e.g. `D4`).
pub fn str_vertex(pt: Point, size: usize) -> Option<String> {
    let (x, y) = pt;
    if size > MAX_DISPLAY_SIZE || x >= size || y >= size {
        return None;
    }
    let col = column_letter(x)?;
    Some(format!("{col}{}", y + 1))
}

/// Convert a move to display notation; a pass is `pass`.
pub fn str_vertex_move(mv: Move, size: usize) -> Option<String> {
    match mv {
        Move::Pass => Some(PASS_TOKEN.into()),
        Move::Place(pt) => str_vertex(pt, size),
    }
}

/// Label a move for printing: display notation where the board allows it,
/// the SGF letter pair on boards too wide for it.
pub fn move_label(mv: Move, size: usize) -> String {
    str_vertex_move(mv, size)
        .or_else(|| str_sgf_move(mv, size, false))
        .unwrap_or_else(|| "?".to_string())
}

/// Parse a display vertex (`D4`, `q16`, `pass`) into a move.
pub fn parse_vertex(s: &str, size: usize) -> Option<Move> {
    let s = s.trim();
    if s.eq_ignore_ascii_case(PASS_TOKEN) {
        return Some(Move::Pass);
    }
    let bytes = s.as_bytes();
    if bytes.len() < 2 || size > MAX_DISPLAY_SIZE {
        return None;
    }
    let x = column_index(bytes[0])?;
    let digits = &s[1..];
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let row: usize = digits.parse().ok()?;
    if x >= size || row == 0 || row > size {
        return None;
    }
    Some(Move::Place((x, row - 1)))
}
