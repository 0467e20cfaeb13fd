//! Random legal games.
//!
//! Plays uniformly random legal moves, never filling a point surrounded by
//! the mover's own stones, until two consecutive passes or the requested
//! length. Used by the `random` command and by round-trip tests.

use fastrand::Rng;

use crate::board::{Board, Color, Point};
use crate::coord::{Move, Play};

/// Generate a game of up to `moves` plays after `handicap` black stones.
///
/// Handicap stones come first as black plays; white then moves. Without a
/// handicap black starts.
pub fn random_game(rng: &mut Rng, size: usize, moves: usize, handicap: usize) -> Vec<Play> {
    let mut board = Board::new(size);
    let mut plays = Vec::with_capacity(handicap + moves);

    for _ in 0..handicap {
        match choose_random_move(&board, Color::Black, rng) {
            Some(pt) => {
                board.play(pt, Color::Black);
                plays.push(Play::new(Color::Black, Move::Place(pt)));
            }
            None => break,
        }
    }

    let mut color = if handicap > 0 { Color::White } else { Color::Black };
    let mut passes = 0;
    for _ in 0..moves {
        if passes >= 2 {
            break;
        }
        match choose_random_move(&board, color, rng) {
            Some(pt) => {
                board.play(pt, color);
                plays.push(Play::new(color, Move::Place(pt)));
                passes = 0;
            }
            None => {
                plays.push(Play::new(color, Move::Pass));
                passes += 1;
            }
        }
        color = color.opponent();
    }
    plays
}

/// A point whose on-board neighbors all hold `color`.
fn is_own_eyeish(board: &Board, (x, y): Point, color: Color) -> bool {
    let s = board.size;
    let mut neighbors = Vec::with_capacity(4);
    if x > 0 {
        neighbors.push((x - 1, y));
    }
    if x + 1 < s {
        neighbors.push((x + 1, y));
    }
    if y > 0 {
        neighbors.push((x, y - 1));
    }
    if y + 1 < s {
        neighbors.push((x, y + 1));
    }
    neighbors.iter().all(|&n| board.at(n) == Some(color))
}

/// Choose a random legal move that does not fill an own eye.
fn choose_random_move(board: &Board, color: Color, rng: &mut Rng) -> Option<Point> {
    let mut candidates: Vec<Point> = (0..board.size)
        .flat_map(|y| (0..board.size).map(move |x| (x, y)))
        .filter(|&pt| board.at(pt).is_none() && !is_own_eyeish(board, pt, color))
        .collect();

    // Partial Fisher-Yates: stop at the first candidate the board accepts.
    let n = candidates.len();
    for i in 0..n {
        let j = rng.usize(i..n);
        candidates.swap(i, j);
        let pt = candidates[i];
        let mut test = board.clone();
        if test.play(pt, color).legal {
            return Some(pt);
        }
    }
    None
}
