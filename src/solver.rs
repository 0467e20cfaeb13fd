//! Puzzle solving state machine.
//!
//! A [`Session`] owns a problem tree and the board derived from it. The
//! learner places stones; each placement is looked up among the children of
//! the current node. A matching, acceptable move advances the pointer and
//! the scripted answer (child 0 of the matched node) is played right away.
//! Pacing that answer for display is left to the caller.
//!
//! Try mode snapshots the whole session and then accepts any legal
//! placement without consulting the tree. Leaving try mode restores the
//! snapshot.

use std::time::{Duration, Instant};

use log::{debug, warn};

use crate::board::{Board, Color, Point};
use crate::config::Config;
use crate::coord::{Move, Play};
use crate::tree::{GameTree, NodeId, ROOT};
use crate::verdict::{self, Verdict};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveState {
    AwaitingMove,
    Solved,
    Failed,
    TryMode,
}

impl std::fmt::Display for SolveState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SolveState::AwaitingMove => "awaiting",
            SolveState::Solved => "solved",
            SolveState::Failed => "failed",
            SolveState::TryMode => "try",
        };
        write!(f, "{s}")
    }
}

/// One move on the session's history.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Step {
    play: Play,
    captured: Vec<Point>,
    /// Current node before the move was made
    node_before: NodeId,
    /// Played from the tree rather than by the learner
    scripted: bool,
}

#[derive(Debug, Clone)]
struct Snapshot {
    board: Board,
    last_move: Option<Point>,
    current: NodeId,
    to_play: Color,
    history: Vec<Step>,
    failed: bool,
    solved: bool,
}

/// The scripted answer to a learner move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub play: Play,
    pub captured: Vec<Point>,
}

/// What a successful [`Session::place_stone`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    pub play: Play,
    pub captured: Vec<Point>,
    pub reply: Option<Reply>,
    pub state: SolveState,
}

pub struct Session {
    tree: GameTree,
    config: Config,
    initial: Board,
    board: Board,
    learner: Color,
    to_play: Color,
    current: NodeId,
    last_move: Option<Point>,
    history: Vec<Step>,
    solved: bool,
    failed: bool,
    snapshot: Option<Snapshot>,
    started: Instant,
}

impl Session {
    pub fn new(tree: GameTree) -> Self {
        Self::with_config(tree, Config::default())
    }

    pub fn with_config(tree: GameTree, config: Config) -> Self {
        let setup = tree.setup();
        let initial = Board::with_setup(tree.size(), &setup.black, &setup.white);
        // The first scripted move decides who the learner is.
        let learner = tree
            .children(ROOT)
            .first()
            .and_then(|&c| tree.node(c).play)
            .map_or_else(|| tree.next_player(), |p| p.color);
        debug!("new session: {}x{} board, learner {learner}", initial.size, initial.size);
        Session {
            board: initial.clone(),
            initial,
            tree,
            config,
            learner,
            to_play: learner,
            current: ROOT,
            last_move: None,
            history: Vec::new(),
            solved: false,
            failed: false,
            snapshot: None,
            started: Instant::now(),
        }
    }

    pub fn state(&self) -> SolveState {
        if self.snapshot.is_some() {
            SolveState::TryMode
        } else if self.solved {
            SolveState::Solved
        } else if self.failed {
            SolveState::Failed
        } else {
            SolveState::AwaitingMove
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn tree(&self) -> &GameTree {
        &self.tree
    }

    pub fn current_node(&self) -> NodeId {
        self.current
    }

    pub fn learner(&self) -> Color {
        self.learner
    }

    pub fn to_play(&self) -> Color {
        self.to_play
    }

    pub fn last_move(&self) -> Option<Point> {
        self.last_move
    }

    /// Every move on the board since the start, oldest first.
    pub fn moves(&self) -> Vec<Play> {
        self.history.iter().map(|s| s.play).collect()
    }

    /// Time since the session was created or last reset.
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Place a stone for the side to move.
    ///
    /// Returns `None` without touching anything when the point is off the
    /// board, occupied, suicide, or the problem is already over.
    pub fn place_stone(&mut self, pt: Point) -> Option<Placement> {
        if self.snapshot.is_some() {
            return self.place_free(pt);
        }
        if self.solved || self.failed {
            return None;
        }
        let play = Play::new(self.to_play, Move::Place(pt));
        let matched = self.tree.find_child(self.current, play);
        let captured = self.apply(play, false)?;

        let Some(node) = matched else {
            debug!("{play:?} is not in the tree");
            self.failed = true;
            return Some(self.placement(play, captured, None));
        };
        self.current = node;
        if let Some(state) = self.outcome_at(node) {
            self.finish(state);
            return Some(self.placement(play, captured, None));
        }

        let reply = self.play_reply(node);
        if let Some(r) = &reply {
            if let Some(state) = self.outcome_at(self.current) {
                self.finish(state);
            }
            debug!("scripted reply {:?}", r.play);
        }
        self.to_play = self.learner;
        Some(self.placement(play, captured, reply))
    }

    /// Take back the last learner move and its scripted reply.
    ///
    /// In try mode only moves made after entering it are taken back.
    /// Returns the points that were emptied, or `None` when nothing was undone.
    pub fn undo(&mut self) -> Option<Vec<Point>> {
        if let Some(boundary) = self.snapshot.as_ref().map(|s| s.history.len()) {
            if self.history.len() <= boundary {
                return None;
            }
            let step = self.history.pop()?;
            self.revert(&step);
            self.to_play = step.play.color;
            self.last_move = self.history.last().and_then(|s| s.play.mv.point());
            return Some(step.play.mv.point().into_iter().collect());
        }
        if self.solved {
            return None;
        }
        let mut step = self.history.pop()?;
        let mut removed: Vec<Point> = step.play.mv.point().into_iter().collect();
        self.revert(&step);
        if step.scripted {
            if let Some(prev) = self.history.pop() {
                self.revert(&prev);
                removed.extend(prev.play.mv.point());
                step = prev;
            }
        }
        self.current = step.node_before;
        self.to_play = step.play.color;
        self.failed = false;
        self.last_move = self.history.last().and_then(|s| s.play.mv.point());
        debug!("undo back to node {}", self.current);
        Some(removed)
    }

    /// Start over from the problem's initial position.
    pub fn reset(&mut self) {
        self.board = self.initial.clone();
        self.current = ROOT;
        self.to_play = self.learner;
        self.last_move = None;
        self.history.clear();
        self.solved = false;
        self.failed = false;
        self.snapshot = None;
        self.started = Instant::now();
    }

    /// Enter try mode. Returns false if already in it.
    pub fn enter_try_mode(&mut self) -> bool {
        if self.snapshot.is_some() {
            return false;
        }
        self.snapshot = Some(Snapshot {
            board: self.board.clone(),
            last_move: self.last_move,
            current: self.current,
            to_play: self.to_play,
            history: self.history.clone(),
            failed: self.failed,
            solved: self.solved,
        });
        true
    }

    /// Leave try mode, discarding everything played in it.
    /// Returns how many moves were discarded, or `None` outside try mode.
    pub fn exit_try_mode(&mut self) -> Option<usize> {
        let snapshot = self.snapshot.take()?;
        let discarded = self.history.len() - snapshot.history.len();
        self.board = snapshot.board;
        self.last_move = snapshot.last_move;
        self.current = snapshot.current;
        self.to_play = snapshot.to_play;
        self.history = snapshot.history;
        self.failed = snapshot.failed;
        self.solved = snapshot.solved;
        Some(discarded)
    }

    /// The suggested next move: a child marked as preferred, else child 0.
    pub fn current_hint(&self) -> Option<Move> {
        if self.state() != SolveState::AwaitingMove {
            return None;
        }
        let children = self.tree.children(self.current);
        let preferred = children
            .iter()
            .copied()
            .find(|&c| verdict::is_preferred(self.tree.node(c)));
        let hint = preferred.or_else(|| children.first().copied())?;
        self.tree
            .node(hint)
            .play
            .filter(|p| p.color == self.to_play)
            .map(|p| p.mv)
    }

    fn place_free(&mut self, pt: Point) -> Option<Placement> {
        let play = Play::new(self.to_play, Move::Place(pt));
        let captured = self.apply(play, false)?;
        self.to_play = self.to_play.opponent();
        Some(self.placement(play, captured, None))
    }

    /// Put a move on the board and record it. `None` if the board refuses it.
    fn apply(&mut self, play: Play, scripted: bool) -> Option<Vec<Point>> {
        let captured = match play.mv {
            Move::Place(pt) => {
                let result = self.board.play(pt, play.color);
                if !result.legal {
                    return None;
                }
                self.last_move = Some(pt);
                result.captured
            }
            Move::Pass => Vec::new(),
        };
        self.history.push(Step {
            play,
            captured: captured.clone(),
            node_before: self.current,
            scripted,
        });
        Some(captured)
    }

    fn revert(&mut self, step: &Step) {
        if let Some(pt) = step.play.mv.point() {
            self.board.set(pt, None);
        }
        let owner = step.play.color.opponent();
        for &pt in &step.captured {
            self.board.set(pt, Some(owner));
        }
    }

    /// Play child 0 of `node` if it is an opponent move. A reply the board
    /// refuses ends the session as failed.
    fn play_reply(&mut self, node: NodeId) -> Option<Reply> {
        let &child = self.tree.children(node).first()?;
        let play = self.tree.node(child).play?;
        if play.color == self.learner {
            return None;
        }
        let Some(captured) = self.apply(play, true) else {
            warn!("scripted reply {play:?} at node {child} is not playable");
            self.finish(SolveState::Failed);
            return None;
        };
        self.current = child;
        Some(Reply { play, captured })
    }

    /// Terminal state reached at `node`, if any.
    fn outcome_at(&self, node: NodeId) -> Option<SolveState> {
        let n = self.tree.node(node);
        match verdict::classify(n, &self.config) {
            Verdict::Wrong => Some(SolveState::Failed),
            Verdict::Right => Some(SolveState::Solved),
            Verdict::Neutral if n.children.is_empty() => Some(SolveState::Solved),
            Verdict::Neutral => None,
        }
    }

    fn finish(&mut self, state: SolveState) {
        match state {
            SolveState::Solved => self.solved = true,
            SolveState::Failed => self.failed = true,
            _ => {}
        }
        debug!("problem {state} at node {}", self.current);
    }

    fn placement(&self, play: Play, captured: Vec<Point>, reply: Option<Reply>) -> Placement {
        Placement {
            play,
            captured,
            reply,
            state: self.state(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coord::parse_vertex;
    use crate::sgf::parse;

    // Black C1 is answered by white B3, then black A2 solves.
    // Black A2 first is marked as a bad move.
    const PROBLEM: &str = "(;SZ[9]AB[ch][dh][di]AW[ai][bi][bh]
        (;B[ci];W[bg](;B[ah]C[Correct]))
        (;B[ah]BM[1]C[Too slow];W[ci]))";

    fn vertex(s: &str) -> Point {
        parse_vertex(s, 9).and_then(Move::point).unwrap()
    }

    fn session() -> Session {
        Session::new(parse(PROBLEM).unwrap())
    }

    #[test]
    fn test_learner_from_first_move() {
        let s = session();
        assert_eq!(s.learner(), Color::Black);
        assert_eq!(s.state(), SolveState::AwaitingMove);
        assert_eq!(s.board().stone_count(Color::White), 3);
    }

    #[test]
    fn test_correct_line_solves() {
        let mut s = session();
        let first = s.place_stone(vertex("C1")).unwrap();
        assert_eq!(first.state, SolveState::AwaitingMove);
        let reply = first.reply.unwrap();
        assert_eq!(reply.play, Play::new(Color::White, Move::Place(vertex("B3"))));
        let last = s.place_stone(vertex("A2")).unwrap();
        assert_eq!(last.state, SolveState::Solved);
        assert_eq!(s.place_stone(vertex("E5")), None);
    }

    #[test]
    fn test_move_outside_tree_fails() {
        let mut s = session();
        let p = s.place_stone(vertex("E5")).unwrap();
        assert_eq!(p.state, SolveState::Failed);
        assert_eq!(s.board().at(vertex("E5")), Some(Color::Black));
        assert_eq!(s.current_node(), ROOT);
    }

    #[test]
    fn test_bad_move_marker_fails() {
        let mut s = session();
        let p = s.place_stone(vertex("A2")).unwrap();
        assert_eq!(p.state, SolveState::Failed);
        assert!(p.reply.is_none());
    }

    #[test]
    fn test_occupied_is_noop() {
        let mut s = session();
        assert_eq!(s.place_stone(vertex("C2")), None);
        assert!(s.moves().is_empty());
    }

    #[test]
    fn test_undo_pairs_reply() {
        let mut s = session();
        s.place_stone(vertex("C1")).unwrap();
        assert_eq!(s.moves().len(), 2);
        let removed = s.undo().unwrap();
        assert_eq!(removed.len(), 2);
        assert_eq!(s.current_node(), ROOT);
        assert!(s.moves().is_empty());
        assert_eq!(s.undo(), None);
    }

    #[test]
    fn test_undo_after_failure_allows_retry() {
        let mut s = session();
        s.place_stone(vertex("E5")).unwrap();
        s.undo().unwrap();
        assert_eq!(s.state(), SolveState::AwaitingMove);
        assert_eq!(s.board().at(vertex("E5")), None);
        assert!(s.place_stone(vertex("C1")).is_some());
    }

    #[test]
    fn test_undo_noop_when_solved() {
        let mut s = session();
        s.place_stone(vertex("C1")).unwrap();
        s.place_stone(vertex("A2")).unwrap();
        assert_eq!(s.undo(), None);
        assert_eq!(s.state(), SolveState::Solved);
    }

    #[test]
    fn test_hint() {
        let mut s = session();
        assert_eq!(s.current_hint(), Some(Move::Place(vertex("C1"))));
        s.place_stone(vertex("C1")).unwrap();
        assert_eq!(s.current_hint(), Some(Move::Place(vertex("A2"))));
        s.enter_try_mode();
        assert_eq!(s.current_hint(), None);
    }

    #[test]
    fn test_hint_prefers_marked_child() {
        let tree = parse("(;SZ[9](;B[aa])(;B[bb]TE[1]))").unwrap();
        let s = Session::new(tree);
        assert_eq!(s.current_hint(), Some(Move::Place((1, 7))));
    }

    #[test]
    fn test_try_mode_isolation() {
        let mut s = session();
        s.place_stone(vertex("C1")).unwrap();
        let board = s.board().clone();
        let node = s.current_node();
        let moves = s.moves();

        assert!(s.enter_try_mode());
        assert!(!s.enter_try_mode());
        for v in ["E5", "F5", "E6"] {
            let p = s.place_stone(vertex(v)).unwrap();
            assert_eq!(p.state, SolveState::TryMode);
        }
        assert_eq!(s.board().at(vertex("F5")), Some(Color::White));
        assert_eq!(s.exit_try_mode(), Some(3));

        assert_eq!(s.board(), &board);
        assert_eq!(s.current_node(), node);
        assert_eq!(s.moves(), moves);
        assert_eq!(s.state(), SolveState::AwaitingMove);
        assert_eq!(s.exit_try_mode(), None);
    }

    #[test]
    fn test_try_mode_undo_stops_at_boundary() {
        let mut s = session();
        s.place_stone(vertex("C1")).unwrap();
        s.enter_try_mode();
        s.place_stone(vertex("E5")).unwrap();
        assert_eq!(s.undo(), Some(vec![vertex("E5")]));
        assert_eq!(s.undo(), None);
        assert_eq!(s.moves().len(), 2);
        assert_eq!(s.to_play(), Color::Black);
    }

    #[test]
    fn test_try_mode_captures() {
        let mut s = session();
        s.enter_try_mode();
        // White A1 B1 B2 have liberties at A2, B3 and C1.
        s.place_stone(vertex("A2")).unwrap();
        s.place_stone(vertex("J1")).unwrap();
        s.place_stone(vertex("B3")).unwrap();
        s.place_stone(vertex("J2")).unwrap();
        let p = s.place_stone(vertex("C1")).unwrap();
        assert_eq!(p.captured.len(), 3);
    }

    #[test]
    fn test_unplayable_reply_fails() {
        // White's scripted answer lands on a black stone.
        let tree = parse("(;SZ[9]AB[aa];B[bb];W[aa])").unwrap();
        let mut s = Session::new(tree);
        let p = s.place_stone(vertex("B8")).unwrap();
        assert!(p.reply.is_none());
        assert_eq!(p.state, SolveState::Failed);
        assert!(s.place_stone(vertex("E5")).is_none());

        assert_eq!(s.undo().unwrap(), vec![vertex("B8")]);
        assert_eq!(s.state(), SolveState::AwaitingMove);
    }

    #[test]
    fn test_reset() {
        let mut s = session();
        s.place_stone(vertex("E5")).unwrap();
        s.enter_try_mode();
        s.reset();
        assert_eq!(s.state(), SolveState::AwaitingMove);
        assert!(s.moves().is_empty());
        assert_eq!(s.board().at(vertex("E5")), None);
    }
}
