//! SGF tokenizer and tree parser.
//!
//! ```text
//! GameTree = "(" Sequence { GameTree } ")"
//! Sequence = Node { Node }
//! Node     = ";" { Property }
//! Property = Ident { "[" Value "]" }
//! ```
//!
//! The scanner walks the input byte by byte through three states:
//! between trees (`InVariation`), inside a node reading identifiers
//! (`InNode`) and inside brackets (`InPropertyValue`). A backslash inside
//! brackets escapes the next byte; an escaped line break is dropped.
//!
//! Two modes share the scanner. [`Mode::FullTree`] keeps every branch.
//! [`Mode::MainLine`] keeps only the first non-empty variation at each
//! branch point and discards siblings while still checking their syntax.
//!
//! Only the first game tree of a collection is kept. Later trees must still
//! be well formed; any other text after the root's `)` is an error.

use log::debug;

use crate::error::ParseError;
use crate::tree::{GameTree, NodeId, ROOT};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    FullTree,
    MainLine,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    InVariation,
    InNode,
    InPropertyValue,
}

/// An open `(`.
struct Frame {
    /// Offset of the `(`
    open: usize,
    /// Node the variation hangs from (`None` for the root tree)
    parent: Option<NodeId>,
    /// Nodes read inside this variation are thrown away
    skip: bool,
    /// A `;` has been seen directly in this variation
    has_nodes: bool,
}

/// Parse SGF text into a full game tree.
pub fn parse(text: &str) -> Result<GameTree, ParseError> {
    Scanner::new(text, Mode::FullTree).run()
}

/// Parse SGF text keeping only the main line.
///
/// The result is a tree where every node has at most one child.
pub fn parse_main_line(text: &str) -> Result<GameTree, ParseError> {
    Scanner::new(text, Mode::MainLine).run()
}

struct Scanner<'a> {
    text: &'a str,
    bytes: &'a [u8],
    mode: Mode,
    tree: Option<GameTree>,
    stack: Vec<Frame>,
    /// Last node of the sequence being read
    current: Option<NodeId>,
    /// Node receiving properties (`None` while skipping)
    target: Option<NodeId>,
    ident: String,
    last_ident: Option<String>,
    value: Vec<u8>,
    value_start: usize,
}

impl<'a> Scanner<'a> {
    fn new(text: &'a str, mode: Mode) -> Self {
        Self {
            text,
            bytes: text.as_bytes(),
            mode,
            tree: None,
            stack: Vec::new(),
            current: None,
            target: None,
            ident: String::new(),
            last_ident: None,
            value: Vec::new(),
            value_start: 0,
        }
    }

    fn run(mut self) -> Result<GameTree, ParseError> {
        let mut pos = self.skip_leading();
        if self.bytes.get(pos) != Some(&b'(') {
            return Err(ParseError::MissingRoot { offset: pos });
        }
        pos = self.scan_tree(pos, false)?;

        // Further trees of a collection are checked, then dropped.
        let mut extra = 0;
        loop {
            match self.bytes.get(pos) {
                None => break,
                Some(b) if b.is_ascii_whitespace() => pos += 1,
                Some(b'(') => {
                    pos = self.scan_tree(pos, true)?;
                    extra += 1;
                }
                Some(_) => return Err(self.unexpected(pos)),
            }
        }
        if extra > 0 {
            debug!("ignoring {extra} further game trees in the collection");
        }

        let mut tree = self
            .tree
            .take()
            .ok_or(ParseError::EmptyTree { offset: 0 })?;
        tree.decode_moves();
        debug!("parsed {} nodes ({:?})", tree.len(), self.mode);
        Ok(tree)
    }

    /// Scan one game tree starting at the `(` at `open`. Returns the offset
    /// just past its closing `)`.
    fn scan_tree(&mut self, open: usize, discard: bool) -> Result<usize, ParseError> {
        self.stack.push(Frame {
            open,
            parent: None,
            skip: discard,
            has_nodes: false,
        });
        let mut pos = open + 1;

        let mut state = State::InVariation;
        let end = loop {
            let Some(&b) = self.bytes.get(pos) else {
                return Err(self.eof_error(state));
            };
            match state {
                State::InPropertyValue => match b {
                    b'\\' => {
                        pos += 1;
                        match self.bytes.get(pos) {
                            Some(b'\n') => {}
                            Some(b'\r') => {
                                if self.bytes.get(pos + 1) == Some(&b'\n') {
                                    pos += 1;
                                }
                            }
                            Some(&c) => self.value.push(c),
                            None => return Err(self.eof_error(state)),
                        }
                    }
                    b']' => {
                        self.finish_value();
                        state = State::InNode;
                    }
                    _ => self.value.push(b),
                },
                State::InVariation | State::InNode => {
                    if b.is_ascii_whitespace() {
                        pos += 1;
                        continue;
                    }
                    match b {
                        b';' => {
                            // Only directly after `(` or inside a sequence.
                            if state == State::InVariation && self.top().has_nodes {
                                return Err(self.unexpected(pos));
                            }
                            self.start_node();
                            state = State::InNode;
                        }
                        b'(' => {
                            if !self.top().has_nodes {
                                return Err(self.unexpected(pos));
                            }
                            self.open_variation(pos);
                            state = State::InVariation;
                        }
                        b')' => {
                            if self.close_variation()? {
                                break pos + 1;
                            }
                            state = State::InVariation;
                        }
                        b'A'..=b'Z' if state == State::InNode => {
                            self.ident.push(b as char);
                        }
                        // Long FF[3] identifiers such as `AddBlack` keep only their capitals.
                        b'a'..=b'z' if state == State::InNode => {}
                        b'[' if state == State::InNode => {
                            if !self.ident.is_empty() {
                                self.last_ident = Some(std::mem::take(&mut self.ident));
                            } else if self.last_ident.is_none() {
                                return Err(ParseError::MissingIdentifier { offset: pos });
                            }
                            self.value.clear();
                            self.value_start = pos;
                            state = State::InPropertyValue;
                        }
                        _ => return Err(self.unexpected(pos)),
                    }
                }
            }
            pos += 1;
        };
        Ok(end)
    }

    fn skip_leading(&self) -> usize {
        let trimmed = self.text.trim_start_matches(|c: char| c.is_whitespace() || c == '\u{feff}');
        self.text.len() - trimmed.len()
    }

    fn top(&self) -> &Frame {
        // The root frame is only popped when scanning ends.
        &self.stack[self.stack.len() - 1]
    }

    fn unexpected(&self, pos: usize) -> ParseError {
        ParseError::Unexpected {
            offset: pos,
            found: self.text[pos..].chars().next().unwrap_or('\u{fffd}'),
        }
    }

    fn eof_error(&self, state: State) -> ParseError {
        if state == State::InPropertyValue {
            return ParseError::UnterminatedValue {
                offset: self.value_start,
            };
        }
        ParseError::UnclosedTree {
            offset: self.stack.last().map_or(0, |f| f.open),
        }
    }

    fn start_node(&mut self) {
        self.ident.clear();
        self.last_ident = None;
        let skip = self.top().skip;
        let last = self.stack.len() - 1;
        self.stack[last].has_nodes = true;
        if skip {
            self.target = None;
            return;
        }
        let tree = self.tree.get_or_insert_with(GameTree::with_root);
        let id = match self.current {
            Some(parent) => tree.add_child(parent),
            None => ROOT,
        };
        self.current = Some(id);
        self.target = Some(id);
    }

    fn open_variation(&mut self, pos: usize) {
        self.ident.clear();
        let parent_skip = self.top().skip;
        let branch_taken = match (self.mode, self.tree.as_ref(), self.current) {
            (Mode::MainLine, Some(tree), Some(node)) => !tree.children(node).is_empty(),
            _ => false,
        };
        if branch_taken && !parent_skip {
            debug!("skipping variation at offset {pos}");
        }
        self.stack.push(Frame {
            open: pos,
            parent: self.current,
            skip: parent_skip || branch_taken,
            has_nodes: false,
        });
    }

    /// Pop the innermost variation. Returns true when the root tree closed.
    fn close_variation(&mut self) -> Result<bool, ParseError> {
        self.ident.clear();
        let frame = self.stack.pop().ok_or(ParseError::EmptyTree { offset: 0 })?;
        if self.stack.is_empty() {
            if !frame.has_nodes {
                return Err(ParseError::EmptyTree { offset: frame.open });
            }
            return Ok(true);
        }
        self.current = frame.parent;
        self.target = None;
        Ok(false)
    }

    fn finish_value(&mut self) {
        let raw = std::mem::take(&mut self.value);
        let (Some(id), Some(ident), Some(tree)) =
            (self.target, self.last_ident.as_deref(), self.tree.as_mut())
        else {
            return;
        };
        tree.node_mut(id)
            .push_value(ident, String::from_utf8_lossy(&raw).into_owned());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Color;
    use crate::coord::{Move, Play};
    use crate::tree::flatten_main_line;

    #[test]
    fn test_single_node() {
        let tree = parse("(;GM[1]FF[4]SZ[9])").unwrap();
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.root().first("SZ"), Some("9"));
    }

    #[test]
    fn test_repeated_values_in_order() {
        let tree = parse("(;AB[aa][bb]\n  [cc]AW[dd])").unwrap();
        let ab = tree.root().get("AB").unwrap();
        assert_eq!(ab, ["aa", "bb", "cc"]);
    }

    #[test]
    fn test_repeated_identifier_merges() {
        let tree = parse("(;AB[aa]AW[cc]AB[bb])").unwrap();
        assert_eq!(tree.root().get("AB").unwrap(), ["aa", "bb"]);
    }

    #[test]
    fn test_escapes() {
        let tree = parse(r"(;C[a \] b \\ c [d\]])").unwrap();
        assert_eq!(tree.root().comment(), Some(r"a ] b \ c [d]"));
    }

    #[test]
    fn test_soft_line_break() {
        let tree = parse("(;C[one \\\ntwo])").unwrap();
        assert_eq!(tree.root().comment(), Some("one two"));
    }

    #[test]
    fn test_bracket_chars_inside_value_do_not_nest() {
        let tree = parse("(;C[a(b;c)d];B[bb])").unwrap();
        assert_eq!(tree.len(), 2);
        assert_eq!(tree.root().comment(), Some("a(b;c)d"));
    }

    #[test]
    fn test_long_identifiers() {
        let tree = parse("(;AddBlack[aa]Comment[x])").unwrap();
        assert_eq!(tree.root().get("AB").unwrap(), ["aa"]);
        assert_eq!(tree.root().comment(), Some("x"));
    }

    #[test]
    fn test_variations_full_tree() {
        let tree = parse("(;SZ[9];B[aa](;W[bb];B[cc])(;W[dd]))").unwrap();
        assert_eq!(tree.len(), 5);
        let first = tree.children(ROOT)[0];
        assert_eq!(tree.children(first).len(), 2);
    }

    #[test]
    fn test_moves_decoded() {
        let tree = parse("(;SZ[9];B[ei];W[];B[tt])").unwrap();
        let line = flatten_main_line(&tree);
        assert_eq!(
            line.plays,
            vec![
                Play::new(Color::Black, Move::Place((4, 0))),
                Play::new(Color::White, Move::Pass),
                Play::new(Color::Black, Move::Pass),
            ]
        );
    }

    #[test]
    fn test_undecodable_move_dropped() {
        let tree = parse("(;SZ[9];B[zz];W[aa])").unwrap();
        let line = flatten_main_line(&tree);
        assert_eq!(line.plays, vec![Play::new(Color::White, Move::Place((0, 8)))]);
    }

    #[test]
    fn test_main_line_mode_prunes() {
        let text = "(;SZ[9];B[aa](;W[bb](;B[cc])(;B[dd]))(;W[ee]))";
        let tree = parse_main_line(text).unwrap();
        assert_eq!(tree.len(), 4);
        for id in 0..tree.len() {
            assert!(tree.children(id).len() <= 1);
        }
    }

    #[test]
    fn test_main_line_skips_empty_variation() {
        let tree = parse_main_line("(;SZ[9];B[aa]()(;W[bb])(;W[cc]))").unwrap();
        let line = flatten_main_line(&tree);
        assert_eq!(line.plays.len(), 2);
        assert_eq!(line.plays[1], Play::new(Color::White, Move::Place((1, 7))));
    }

    #[test]
    fn test_trailing_collection_ignored() {
        let tree = parse("(;SZ[9];B[aa])\n(;SZ[13](;B[bb])(;B[cc]))\n").unwrap();
        assert_eq!(tree.size(), 9);
        assert_eq!(tree.len(), 2);
    }

    #[test]
    fn test_error_after_root_closes() {
        let err = parse("(;SZ[9];B[aa]))").unwrap_err();
        assert_eq!(err, ParseError::Unexpected { offset: 14, found: ')' });
        let err = parse("(;SZ[9];B[aa])(;B[bb]").unwrap_err();
        assert_eq!(err, ParseError::UnclosedTree { offset: 14 });
        let err = parse("(;SZ[9];B[aa])]]xyz[").unwrap_err();
        assert_eq!(err, ParseError::Unexpected { offset: 14, found: ']' });
        let err = parse("(;SZ[9]) ()").unwrap_err();
        assert_eq!(err, ParseError::EmptyTree { offset: 9 });
    }

    #[test]
    fn test_leading_whitespace_and_bom() {
        let tree = parse("\u{feff}  \n(;SZ[9])").unwrap();
        assert_eq!(tree.size(), 9);
    }

    #[test]
    fn test_error_missing_root() {
        let err = parse("  ;B[aa])").unwrap_err();
        assert_eq!(err, ParseError::MissingRoot { offset: 2 });
        assert!(parse("").is_err());
    }

    #[test]
    fn test_error_unterminated_value() {
        let err = parse("(;C[abc").unwrap_err();
        assert_eq!(err, ParseError::UnterminatedValue { offset: 3 });
        let err = parse(r"(;C[abc\]").unwrap_err();
        assert_eq!(err.offset(), 3);
    }

    #[test]
    fn test_error_unclosed_tree() {
        let err = parse("(;B[aa](;W[bb])").unwrap_err();
        assert_eq!(err, ParseError::UnclosedTree { offset: 0 });
        let err = parse("(;B[aa](;W[bb]").unwrap_err();
        assert_eq!(err, ParseError::UnclosedTree { offset: 7 });
    }

    #[test]
    fn test_error_unexpected() {
        let err = parse("(;B[aa]!)").unwrap_err();
        assert_eq!(err, ParseError::Unexpected { offset: 7, found: '!' });
        // A node cannot follow a closed variation.
        let err = parse("(;B[aa](;W[bb]);B[cc])").unwrap_err();
        assert_eq!(err.offset(), 15);
    }

    #[test]
    fn test_error_empty_root() {
        assert_eq!(parse("()").unwrap_err(), ParseError::EmptyTree { offset: 0 });
    }

    #[test]
    fn test_error_missing_identifier() {
        let err = parse("(;[aa])").unwrap_err();
        assert_eq!(err, ParseError::MissingIdentifier { offset: 2 });
    }
}
