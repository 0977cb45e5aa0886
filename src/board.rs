//! Core board types for the 3x3 grid game.

use serde::{Serialize, Serializer};

/// Mark placed on the board by one of the two players.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Mark {
    /// First-joined player's mark (moves first).
    X,
    /// Second-joined player's mark.
    O,
}

impl Mark {
    /// Returns the opposing mark.
    pub fn opponent(self) -> Self {
        match self {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
        }
    }
}

/// A square on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Square {
    /// Empty square.
    Empty,
    /// Square occupied by a mark.
    Occupied(Mark),
}

// Squares serialize as `null` or the mark, so a board renders as
// e.g. ["X", null, "O", ...] on the wire.
impl Serialize for Square {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Square::Empty => serializer.serialize_none(),
            Square::Occupied(mark) => mark.serialize(serializer),
        }
    }
}

/// The 8 winning lines: 3 rows, 3 columns, 2 diagonals.
const LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

/// 3x3 board in row-major order.
///
/// Invariant: exactly `move_count` squares are occupied, and marks are only
/// ever placed on previously-empty squares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    squares: [Square; 9],
    move_count: u32,
}

impl Board {
    /// Creates a new empty board.
    pub fn new() -> Self {
        Self {
            squares: [Square::Empty; 9],
            move_count: 0,
        }
    }

    /// Places a mark at the given position (0-8).
    ///
    /// Returns `false` without mutating anything when the position is out of
    /// range or the square is already occupied.
    pub fn place(&mut self, position: usize, mark: Mark) -> bool {
        if position >= 9 || self.squares[position] != Square::Empty {
            return false;
        }
        self.squares[position] = Square::Occupied(mark);
        self.move_count += 1;
        true
    }

    /// Gets the square at the given position, or `None` when out of range.
    pub fn get(&self, position: usize) -> Option<Square> {
        self.squares.get(position).copied()
    }

    /// Checks if a square is empty. Out-of-range positions are not empty.
    pub fn is_empty(&self, position: usize) -> bool {
        matches!(self.get(position), Some(Square::Empty))
    }

    /// Checks if all 9 squares are occupied.
    pub fn is_full(&self) -> bool {
        self.move_count == 9
    }

    /// Checks whether any winning line is fully occupied by `mark`.
    pub fn has_win(&self, mark: Mark) -> bool {
        let occupied = Square::Occupied(mark);
        LINES
            .iter()
            .any(|line| line.iter().all(|&pos| self.squares[pos] == occupied))
    }

    /// Returns the number of marks placed so far.
    pub fn move_count(&self) -> u32 {
        self.move_count
    }

    /// Returns all squares as a slice.
    pub fn squares(&self) -> &[Square; 9] {
        &self.squares
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Serialize for Board {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.squares.serialize(serializer)
    }
}
