use std::fmt;

use super::Position;

/// Unit action an agent can take in one time step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Action {
    Up,
    Down,
    Left,
    Right,
    Wait,
}

impl Action {
    /// Candidate order used by successor generation, fixed for reproducible search.
    pub const ALL: [Action; 5] = [
        Action::Up,
        Action::Down,
        Action::Left,
        Action::Right,
        Action::Wait,
    ];

    pub fn delta(self) -> (isize, isize) {
        match self {
            Action::Up => (-1, 0),
            Action::Down => (1, 0),
            Action::Left => (0, -1),
            Action::Right => (0, 1),
            Action::Wait => (0, 0),
        }
    }

    /// Returns `None` when the move would leave the non-negative quadrant.
    /// Upper bounds are the map's business.
    pub fn apply(self, (row, col): Position) -> Option<Position> {
        let (dr, dc) = self.delta();
        Some((row.checked_add_signed(dr)?, col.checked_add_signed(dc)?))
    }

    pub fn symbol(self) -> char {
        match self {
            Action::Up => '↑',
            Action::Down => '↓',
            Action::Left => '←',
            Action::Right => '→',
            Action::Wait => 'W',
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}
