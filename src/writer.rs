//! SGF serializer.
//!
//! Writes a single-variation record: one root node with metadata and
//! optional handicap setup, followed by one node per move.
//!
//! # Handicap promotion
//!
//! With `HA[N]`, `N > 0`, the first `N` plays are written as root `AB`
//! stones when all of them are black placements on the board. The root then
//! gets `PL[W]` and those plays are not counted as moves. A shorter run, or
//! one broken by a white play or a pass, is written as ordinary move nodes.

use log::debug;

use crate::board::Color;
use crate::constants::*;
use crate::coord::{self, Move, Play};
use crate::tree::GameInfo;

/// Output of the writer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Serialized {
    pub sgf: String,
    /// Move nodes written, not counting promoted handicap stones
    pub move_count: usize,
}

/// Escape free text for a bracketed value.
pub fn escape_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if c == '\\' || c == ']' {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Turn `(color, vertex)` entries into plays. An entry whose vertex does not
/// decode is dropped whole, so colors never drift from their moves.
pub fn plays_from_vertices(entries: &[(Color, &str)], size: usize) -> Vec<Play> {
    entries
        .iter()
        .filter_map(|&(color, vertex)| {
            let play = Play::from_vertex(color, vertex, size);
            if play.is_none() {
                debug!("dropping undecodable vertex {vertex:?}");
            }
            play
        })
        .collect()
}

pub struct SgfWriter<'a> {
    info: &'a GameInfo,
    legacy_pass: bool,
}

impl<'a> SgfWriter<'a> {
    pub fn new(info: &'a GameInfo) -> Self {
        SgfWriter {
            info,
            legacy_pass: false,
        }
    }

    /// Write passes as `tt` (only on boards up to 19x19).
    pub fn legacy_pass(mut self, on: bool) -> Self {
        self.legacy_pass = on;
        self
    }

    fn promoted_handicap(&self, plays: &[Play]) -> usize {
        let n = self.info.handicap;
        if n == 0 || plays.len() < n {
            return 0;
        }
        let size = self.info.size;
        let all_black_stones = plays[..n].iter().all(|p| {
            p.color == Color::Black
                && matches!(p.mv, Move::Place((x, y)) if x < size && y < size)
        });
        if all_black_stones { n } else { 0 }
    }

    pub fn write(&self, plays: &[Play]) -> Serialized {
        let info = self.info;
        let size = info.size;
        let promoted = self.promoted_handicap(plays);

        let mut sgf = String::from("(;GM[1]FF[4]CA[UTF-8]");
        sgf.push_str(&format!("AP[tsumego-sgf:{}]", env!("CARGO_PKG_VERSION")));
        sgf.push_str(&format!("{PROP_SIZE}[{size}]"));
        if let Some(komi) = info.komi {
            sgf.push_str(&format!("{PROP_KOMI}[{komi}]"));
        }
        if info.handicap > 0 {
            sgf.push_str(&format!("{PROP_HANDICAP}[{}]", info.handicap));
        }
        let texts = [
            (PROP_RULES, &info.rules),
            (PROP_BLACK_NAME, &info.black_player),
            (PROP_WHITE_NAME, &info.white_player),
            (PROP_COMMENT, &info.comment),
        ];
        for (ident, value) in texts {
            if let Some(v) = value {
                sgf.push_str(&format!("{ident}[{}]", escape_text(v)));
            }
        }
        if promoted > 0 {
            sgf.push_str(PROP_ADD_BLACK);
            for play in &plays[..promoted] {
                if let Some(v) = coord::str_sgf_move(play.mv, size, false) {
                    sgf.push_str(&format!("[{v}]"));
                }
            }
            sgf.push_str(&format!("{PROP_PLAYER}[W]"));
        }

        let mut move_count = 0;
        for play in &plays[promoted..] {
            match coord::str_sgf_move(play.mv, size, self.legacy_pass) {
                Some(v) => {
                    sgf.push_str(&format!(";{}[{v}]", play.color.sgf_code()));
                    move_count += 1;
                }
                None => debug!("dropping off-board {:?} on {size}x{size}", play),
            }
        }
        sgf.push(')');

        Serialized { sgf, move_count }
    }
}

/// Serialize with default options.
pub fn serialize(plays: &[Play], info: &GameInfo) -> Serialized {
    SgfWriter::new(info).write(plays)
}
