//! Go board and capture rules.
//!
//! A plain `size * size` grid of optional stones, addressed by zero-based
//! `(x, y)` with `y` counted from the bottom edge. The board carries no
//! history: ko is not tracked, and positions are rebuilt by replaying moves.

use std::fmt;

use crate::coord;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Color {
    Black,
    White,
}

impl Color {
    pub fn opponent(self) -> Color {
        match self {
            Color::Black => Color::White,
            Color::White => Color::Black,
        }
    }

    /// SGF property code for a move of this color.
    pub fn sgf_code(self) -> &'static str {
        match self {
            Color::Black => "B",
            Color::White => "W",
        }
    }

    /// Parse `B`/`W` (or `black`/`white`), ignoring case.
    pub fn parse(s: &str) -> Option<Color> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("b") || s.eq_ignore_ascii_case("black") {
            Some(Color::Black)
        } else if s.eq_ignore_ascii_case("w") || s.eq_ignore_ascii_case("white") {
            Some(Color::White)
        } else {
            None
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Black => write!(f, "black"),
            Color::White => write!(f, "white"),
        }
    }
}

pub type Point = (usize, usize);

/// A maximal 4-connected set of same-colored stones.
///
/// Computed on demand by [`Board::group`]; never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub color: Color,
    pub stones: Vec<Point>,
    pub liberties: usize,
}

#[derive(Clone, PartialEq, Eq)]
pub struct Board {
    pub size: usize,
    cells: Vec<Option<Color>>,
}

impl Board {
    pub fn new(size: usize) -> Self {
        Self {
            size,
            cells: vec![None; size * size],
        }
    }

    /// Board with setup stones placed directly, without capture resolution.
    /// Points outside the board are ignored.
    pub fn with_setup(size: usize, black: &[Point], white: &[Point]) -> Self {
        let mut board = Board::new(size);
        for &pt in black {
            board.set(pt, Some(Color::Black));
        }
        for &pt in white {
            board.set(pt, Some(Color::White));
        }
        board
    }

    fn idx(&self, x: usize, y: usize) -> usize {
        y * self.size + x
    }

    pub fn contains(&self, (x, y): Point) -> bool {
        x < self.size && y < self.size
    }

    pub fn get(&self, x: usize, y: usize) -> Option<Color> {
        if x >= self.size || y >= self.size {
            return None;
        }
        self.cells[self.idx(x, y)]
    }

    pub fn at(&self, pt: Point) -> Option<Color> {
        self.get(pt.0, pt.1)
    }

    /// Overwrite a cell. Out-of-range points are ignored.
    pub fn set(&mut self, (x, y): Point, stone: Option<Color>) {
        if x < self.size && y < self.size {
            let i = self.idx(x, y);
            self.cells[i] = stone;
        }
    }

    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(Option::is_none)
    }

    pub fn stone_count(&self, color: Color) -> usize {
        self.stones().filter(|&(_, c)| c == color).count()
    }

    /// Every stone on the board, bottom row first.
    pub fn stones(&self) -> impl Iterator<Item = (Point, Color)> + '_ {
        self.cells.iter().enumerate().filter_map(move |(i, c)| {
            c.map(|color| ((i % self.size, i / self.size), color))
        })
    }

    fn neighbors(&self, x: usize, y: usize) -> impl Iterator<Item = Point> + '_ {
        let s = self.size;
        let mut v = Vec::with_capacity(4);
        if x > 0 {
            v.push((x - 1, y));
        }
        if x + 1 < s {
            v.push((x + 1, y));
        }
        if y > 0 {
            v.push((x, y - 1));
        }
        if y + 1 < s {
            v.push((x, y + 1));
        }
        v.into_iter()
    }

    /// Place a stone and resolve the consequences.
    ///
    /// Rejects occupied and off-board points. After the opponent's dead
    /// groups are removed, a stone whose own group has no liberty left is
    /// suicide: the placement is undone and reported as illegal. This is the
    /// only placement path the solver uses, so the policy holds everywhere.
    pub fn play(&mut self, (x, y): Point, color: Color) -> MoveResult {
        if !self.contains((x, y)) || self.get(x, y).is_some() {
            return MoveResult::illegal();
        }
        let idx = self.idx(x, y);
        self.cells[idx] = Some(color);

        let captured = self.resolve_captures((x, y));

        if captured.is_empty() && self.group_liberties(x, y) == 0 {
            self.cells[idx] = None;
            return MoveResult {
                legal: false,
                captured,
                suicide: true,
            };
        }
        MoveResult {
            legal: true,
            captured,
            suicide: false,
        }
    }

    /// Remove every opponent group adjacent to `last` that has no liberty.
    ///
    /// The opponent is whoever does not own the stone at `last`; an empty
    /// `last` resolves nothing. Returns the removed points in discovery
    /// order. Own-group liberties are not examined here.
    pub fn resolve_captures(&mut self, last: Point) -> Vec<Point> {
        let Some(color) = self.at(last) else {
            return Vec::new();
        };
        let opp = color.opponent();
        let mut visited = vec![false; self.size * self.size];
        let mut to_remove: Vec<Point> = Vec::new();
        for (nx, ny) in self.neighbors(last.0, last.1) {
            if visited[self.idx(nx, ny)] || self.get(nx, ny) != Some(opp) {
                continue;
            }
            let mut group = Vec::new();
            self.collect_group(nx, ny, &mut group);
            for &(gx, gy) in &group {
                visited[self.idx(gx, gy)] = true;
            }
            if self.group_liberties(nx, ny) == 0 {
                to_remove.extend(group);
            }
        }
        for &pt in &to_remove {
            self.set(pt, None);
        }
        to_remove
    }

    /// The group containing `pt`, or `None` for an empty point.
    pub fn group(&self, pt: Point) -> Option<Group> {
        let color = self.at(pt)?;
        let mut stones = Vec::new();
        self.collect_group(pt.0, pt.1, &mut stones);
        Some(Group {
            color,
            stones,
            liberties: self.group_liberties(pt.0, pt.1),
        })
    }

    fn collect_group(&self, x: usize, y: usize, out: &mut Vec<Point>) -> usize {
        let Some(color) = self.get(x, y) else {
            return 0;
        };
        let mut stack = vec![(x, y)];
        let mut visited = vec![false; self.size * self.size];
        let mut count = 0;
        while let Some((cx, cy)) = stack.pop() {
            let i = self.idx(cx, cy);
            if visited[i] {
                continue;
            }
            visited[i] = true;
            if self.get(cx, cy) == Some(color) {
                out.push((cx, cy));
                count += 1;
                for (nx, ny) in self.neighbors(cx, cy) {
                    let ni = self.idx(nx, ny);
                    if !visited[ni] && self.get(nx, ny) == Some(color) {
                        stack.push((nx, ny));
                    }
                }
            }
        }
        count
    }

    /// Count the distinct empty points adjacent to the group at `(x, y)`.
    fn group_liberties(&self, x: usize, y: usize) -> usize {
        let Some(color) = self.get(x, y) else {
            return 0;
        };
        let mut stack = vec![(x, y)];
        let mut visited = vec![false; self.size * self.size];
        let mut liberty_seen = vec![false; self.size * self.size];
        let mut liberties = 0;
        while let Some((cx, cy)) = stack.pop() {
            let i = self.idx(cx, cy);
            if visited[i] {
                continue;
            }
            visited[i] = true;
            for (nx, ny) in self.neighbors(cx, cy) {
                let ni = self.idx(nx, ny);
                match self.get(nx, ny) {
                    None => {
                        if !liberty_seen[ni] {
                            liberty_seen[ni] = true;
                            liberties += 1;
                        }
                    }
                    Some(c) if c == color && !visited[ni] => stack.push((nx, ny)),
                    _ => {}
                }
            }
        }
        liberties
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveResult {
    pub legal: bool,
    pub captured: Vec<Point>,
    pub suicide: bool,
}

impl MoveResult {
    fn illegal() -> Self {
        MoveResult {
            legal: false,
            captured: Vec::new(),
            suicide: false,
        }
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Board({})\n{self}", self.size)
    }
}

/// Top row first, with display-notation labels on both axes.
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in (0..self.size).rev() {
            write!(f, "{:>2} ", y + 1)?;
            for x in 0..self.size {
                let ch = match self.get(x, y) {
                    Some(Color::Black) => 'X',
                    Some(Color::White) => 'O',
                    None => '.',
                };
                write!(f, "{ch} ")?;
            }
            writeln!(f)?;
        }
        write!(f, "   ")?;
        for x in 0..self.size {
            match coord::column_letter(x) {
                Some(c) => write!(f, "{c} ")?,
                None => write!(f, "? ")?,
            }
        }
        writeln!(f)
    }
}
