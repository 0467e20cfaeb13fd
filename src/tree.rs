//! Game tree arena.
//!
//! Nodes live in one `Vec` and refer to each other by index. The parent
//! index is a lookup aid only; ownership runs from the arena. Child 0 of any
//! node is its main-line continuation.

use log::warn;

use crate::board::{Color, Point};
use crate::constants::*;
use crate::coord::{self, Move, Play};

/// Index of a node in its [`GameTree`].
pub type NodeId = usize;

/// The root node is always the first node of the arena.
pub const ROOT: NodeId = 0;

/// One SGF property: an identifier and its bracketed values, unescaped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    pub ident: String,
    pub values: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct Node {
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    /// Properties in the order they first appeared.
    pub properties: Vec<Property>,
    /// The decoded `B`/`W` move, if the node has a valid one.
    pub play: Option<Play>,
}

impl Node {
    pub fn get(&self, ident: &str) -> Option<&[String]> {
        self.properties
            .iter()
            .find(|p| p.ident == ident)
            .map(|p| p.values.as_slice())
    }

    /// First value of a property.
    pub fn first(&self, ident: &str) -> Option<&str> {
        self.get(ident)
            .and_then(|v| v.first())
            .map(String::as_str)
    }

    pub fn has(&self, ident: &str) -> bool {
        self.properties.iter().any(|p| p.ident == ident)
    }

    pub fn comment(&self) -> Option<&str> {
        self.first(PROP_COMMENT)
    }

    /// Append a value, merging repeated identifiers into one list.
    pub(crate) fn push_value(&mut self, ident: &str, value: String) {
        match self.properties.iter_mut().find(|p| p.ident == ident) {
            Some(p) => p.values.push(value),
            None => self.properties.push(Property {
                ident: ident.to_string(),
                values: vec![value],
            }),
        }
    }

    fn text(&self, ident: &str) -> Option<String> {
        self.first(ident)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    }
}

/// Record-level metadata, read from and written to the root node.
#[derive(Debug, Clone, PartialEq)]
pub struct GameInfo {
    pub size: usize,
    pub komi: Option<f32>,
    pub handicap: usize,
    pub rules: Option<String>,
    pub black_player: Option<String>,
    pub white_player: Option<String>,
    pub comment: Option<String>,
}

impl Default for GameInfo {
    fn default() -> Self {
        GameInfo {
            size: DEFAULT_SIZE,
            komi: None,
            handicap: 0,
            rules: None,
            black_player: None,
            white_player: None,
            comment: None,
        }
    }
}

/// Setup stones of the root node.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Setup {
    pub black: Vec<Point>,
    pub white: Vec<Point>,
}

#[derive(Debug, Clone)]
pub struct GameTree {
    nodes: Vec<Node>,
}

impl GameTree {
    pub(crate) fn with_root() -> Self {
        GameTree {
            nodes: vec![Node::default()],
        }
    }

    pub(crate) fn add_child(&mut self, parent: NodeId) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(Node {
            parent: Some(parent),
            ..Node::default()
        });
        self.nodes[parent].children.push(id);
        id
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id]
    }

    /// Decode every `B`/`W` property against the root board size.
    pub(crate) fn decode_moves(&mut self) {
        let size = self.size();
        for (id, node) in self.nodes.iter_mut().enumerate() {
            let (color, raw) = if let Some(v) = node.first(PROP_BLACK) {
                (Color::Black, v.to_string())
            } else if let Some(v) = node.first(PROP_WHITE) {
                (Color::White, v.to_string())
            } else {
                continue;
            };
            match coord::parse_sgf_move(&raw, size) {
                Some(mv) => node.play = Some(Play::new(color, mv)),
                None => warn!("node {id}: dropping undecodable {color} move [{raw}]"),
            }
        }
    }

    pub fn root(&self) -> &Node {
        &self.nodes[ROOT]
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id].children
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id].parent
    }

    /// The child of `id` that plays exactly `play`.
    pub fn find_child(&self, id: NodeId, play: Play) -> Option<NodeId> {
        self.children(id)
            .iter()
            .copied()
            .find(|&c| self.nodes[c].play == Some(play))
    }

    /// Board size from `SZ` (`19` or `19:19`), defaulting to 19.
    pub fn size(&self) -> usize {
        let Some(raw) = self.root().first(PROP_SIZE) else {
            return DEFAULT_SIZE;
        };
        let width = raw.split(':').next().unwrap_or("").trim();
        match width.parse::<usize>() {
            Ok(n) if (1..=MAX_SGF_SIZE).contains(&n) => n,
            _ => {
                warn!("unusable board size SZ[{raw}], using {DEFAULT_SIZE}");
                DEFAULT_SIZE
            }
        }
    }

    pub fn info(&self) -> GameInfo {
        let root = self.root();
        GameInfo {
            size: self.size(),
            komi: root
                .first(PROP_KOMI)
                .and_then(|k| k.trim().parse::<f32>().ok()),
            handicap: root
                .first(PROP_HANDICAP)
                .and_then(|h| h.trim().parse::<usize>().ok())
                .unwrap_or(0),
            rules: root.text(PROP_RULES),
            black_player: root.text(PROP_BLACK_NAME),
            white_player: root.text(PROP_WHITE_NAME),
            comment: root.text(PROP_COMMENT),
        }
    }

    /// Root setup stones. `AE` clears points listed by `AB`/`AW`.
    pub fn setup(&self) -> Setup {
        let size = self.size();
        let root = self.root();
        let points = |ident: &str| -> Vec<Point> {
            root.get(ident)
                .unwrap_or(&[])
                .iter()
                .flat_map(|v| coord::expand_point_list(v, size))
                .collect()
        };
        let empty = points(PROP_ADD_EMPTY);
        let mut setup = Setup {
            black: points(PROP_ADD_BLACK),
            white: points(PROP_ADD_WHITE),
        };
        setup.black.retain(|p| !empty.contains(p));
        setup.white.retain(|p| !empty.contains(p));
        setup
    }

    /// Who moves first from the root position.
    ///
    /// An explicit `PL` wins. Otherwise black-only setup is a handicap and
    /// white moves; mixed setup gives the move to white when black has more
    /// stones. Black by default.
    pub fn next_player(&self) -> Color {
        if let Some(color) = self.root().first(PROP_PLAYER).and_then(Color::parse) {
            return color;
        }
        let setup = self.setup();
        if !setup.black.is_empty() && setup.white.is_empty() {
            return Color::White;
        }
        if setup.black.len() > setup.white.len() {
            Color::White
        } else {
            Color::Black
        }
    }

    /// Node ids from the root along child 0 to the end of the main line.
    pub fn main_line(&self) -> Vec<NodeId> {
        let mut line = vec![ROOT];
        let mut id = ROOT;
        while let Some(&next) = self.nodes[id].children.first() {
            line.push(next);
            id = next;
        }
        line
    }
}

/// A record flattened to a single sequence of plays.
#[derive(Debug, Clone, PartialEq)]
pub struct MainLine {
    pub info: GameInfo,
    pub plays: Vec<Play>,
}

/// Follow child 0 from the root and collect the moves played.
///
/// When `HA[N]` is set and the root carries exactly `N` black setup stones
/// and no white ones, those stones lead the list as black plays, which is
/// the inverse of the writer's handicap promotion.
pub fn flatten_main_line(tree: &GameTree) -> MainLine {
    let info = tree.info();
    let setup = tree.setup();
    let mut plays = Vec::new();
    if info.handicap > 0 && setup.black.len() == info.handicap && setup.white.is_empty() {
        plays.extend(
            setup
                .black
                .iter()
                .map(|&pt| Play::new(Color::Black, Move::Place(pt))),
        );
    }
    plays.extend(tree.main_line().into_iter().filter_map(|id| tree.node(id).play));
    MainLine { info, plays }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sgf::parse;

    #[test]
    fn test_info_defaults() {
        let tree = parse("(;GM[1])").unwrap();
        let info = tree.info();
        assert_eq!(info.size, 19);
        assert_eq!(info.komi, None);
        assert_eq!(info.handicap, 0);
    }

    #[test]
    fn test_info_fields() {
        let tree = parse("(;SZ[13:13]KM[6.5]HA[2]RU[Japanese]PB[ Lee ]PW[Cho]C[hi])").unwrap();
        let info = tree.info();
        assert_eq!(info.size, 13);
        assert_eq!(info.komi, Some(6.5));
        assert_eq!(info.handicap, 2);
        assert_eq!(info.rules.as_deref(), Some("Japanese"));
        assert_eq!(info.black_player.as_deref(), Some("Lee"));
        assert_eq!(info.white_player.as_deref(), Some("Cho"));
        assert_eq!(info.comment.as_deref(), Some("hi"));
    }

    #[test]
    fn test_next_player_explicit() {
        let tree = parse("(;AB[aa][bb]PL[B])").unwrap();
        assert_eq!(tree.next_player(), Color::Black);
    }

    #[test]
    fn test_next_player_black_only_setup() {
        let tree = parse("(;AB[aa][bb])").unwrap();
        assert_eq!(tree.next_player(), Color::White);
    }

    #[test]
    fn test_next_player_counts() {
        let tree = parse("(;AB[aa][bb][cc]AW[dd])").unwrap();
        assert_eq!(tree.next_player(), Color::White);
        let tree = parse("(;AB[aa]AW[dd][ee])").unwrap();
        assert_eq!(tree.next_player(), Color::Black);
        let tree = parse("(;GM[1])").unwrap();
        assert_eq!(tree.next_player(), Color::Black);
    }

    #[test]
    fn test_setup_add_empty() {
        let tree = parse("(;SZ[9]AB[aa:bb]AE[ab])").unwrap();
        let setup = tree.setup();
        assert_eq!(setup.black, vec![(0, 8), (1, 8), (1, 7)]);
    }

    #[test]
    fn test_parent_links() {
        let tree = parse("(;SZ[9];B[aa](;W[bb])(;W[cc]))").unwrap();
        let first = tree.children(ROOT)[0];
        assert_eq!(tree.parent(first), Some(ROOT));
        for &c in tree.children(first) {
            assert_eq!(tree.parent(c), Some(first));
        }
        assert_eq!(tree.parent(ROOT), None);
        assert_eq!(tree.main_line().len(), 3);
    }

    #[test]
    fn test_flatten_restores_handicap() {
        let tree = parse("(;SZ[19]HA[2]AB[dp][pd];W[dd])").unwrap();
        let line = flatten_main_line(&tree);
        assert_eq!(line.plays.len(), 3);
        assert_eq!(line.plays[0], Play::new(Color::Black, Move::Place((3, 3))));
        assert_eq!(line.plays[2].color, Color::White);
    }

    #[test]
    fn test_flatten_ignores_problem_setup() {
        let tree = parse("(;SZ[9]AB[aa]AW[bb];B[cc])").unwrap();
        let line = flatten_main_line(&tree);
        assert_eq!(line.plays, vec![Play::new(Color::Black, Move::Place((2, 6)))]);
    }
}
