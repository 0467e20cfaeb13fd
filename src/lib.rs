//! Tsumego-SGF: a game-record engine for Go problems.
//!
//! This crate reads and writes SGF records, resolves captures on a Go board,
//! and checks a learner's moves against a problem's solution tree.
//!
//! ## Modules
//!
//! - [`coord`] - Conversions between board points, SGF letters and display vertices
//! - [`sgf`] - SGF scanner producing a [`tree::GameTree`]
//! - [`tree`] - Node arena, metadata, setup stones and main-line flattening
//! - [`writer`] - SGF serializer with handicap promotion
//! - [`board`] - Board grid, groups, liberties and captures
//! - [`verdict`] - Right/wrong classification of problem nodes
//! - [`solver`] - Problem solving session with undo and try mode
//! - [`progress`] - The persisted per-problem progress record
//! - [`playout`] - Random legal game generation
//! - [`shell`] - Text command loop around a solving session
//! - [`config`], [`constants`], [`error`] - Settings, fixed values and errors
//!
//! ## Example
//!
//! ```
//! use tsumego_sgf::coord::parse_vertex;
//! use tsumego_sgf::sgf::parse;
//! use tsumego_sgf::solver::{Session, SolveState};
//!
//! let tree = parse("(;SZ[9]AB[ch][dh]AW[ai][bh];B[bi]C[Correct])").unwrap();
//! let mut session = Session::new(tree);
//!
//! let pt = parse_vertex("B1", 9).and_then(|m| m.point()).unwrap();
//! let placement = session.place_stone(pt).unwrap();
//! assert_eq!(placement.state, SolveState::Solved);
//! ```

pub mod board;
pub mod config;
pub mod constants;
pub mod coord;
pub mod error;
pub mod playout;
pub mod progress;
pub mod sgf;
pub mod shell;
pub mod solver;
pub mod tree;
pub mod verdict;
pub mod writer;
