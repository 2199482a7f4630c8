use crate::common::{Action, Position};
use crate::scenario::ScenarioError;

/// Cell separator inside a grid row.
pub const CELL_DELIMITER: char = ';';
pub const BLOCKED_TOKEN: &str = "G";
pub const FORCED_MOVEMENT_TOKEN: &str = "A";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellKind {
    Free,
    Blocked,
    /// Apron cell: an agent standing here may not wait.
    ForcedMovement,
}

impl CellKind {
    pub fn from_token(token: &str) -> Self {
        match token.trim() {
            BLOCKED_TOKEN => CellKind::Blocked,
            FORCED_MOVEMENT_TOKEN => CellKind::ForcedMovement,
            _ => CellKind::Free,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Tile {
    kind: CellKind,
    pub moves: Vec<(Action, Position)>, // Legal single-agent moves out of this cell
}

impl Tile {
    pub fn kind(&self) -> CellKind {
        self.kind
    }

    pub fn is_passable(&self) -> bool {
        self.kind != CellKind::Blocked
    }
}

#[derive(Debug, Clone)]
pub struct Map {
    pub height: usize,
    pub width: usize,
    pub grid: Vec<Vec<Tile>>,
}

impl Map {
    /// Builds the grid from `;`-separated rows. All rows must have the same
    /// number of cells.
    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> Result<Self, ScenarioError> {
        let mut grid: Vec<Vec<Tile>> = Vec::with_capacity(rows.len());
        for (row, line) in rows.iter().enumerate() {
            let tiles_row: Vec<Tile> = line
                .as_ref()
                .trim()
                .split(CELL_DELIMITER)
                .map(|token| Tile {
                    kind: CellKind::from_token(token),
                    moves: Vec::new(),
                })
                .collect();

            if let Some(first) = grid.first() {
                if tiles_row.len() != first.len() {
                    return Err(ScenarioError::RaggedRow {
                        row,
                        expected: first.len(),
                        found: tiles_row.len(),
                    });
                }
            }
            grid.push(tiles_row);
        }

        if grid.is_empty() {
            return Err(ScenarioError::EmptyGrid);
        }

        let mut map = Map {
            height: grid.len(),
            width: grid[0].len(),
            grid,
        };
        map.initialize_moves();
        Ok(map)
    }

    fn initialize_moves(&mut self) {
        for x in 0..self.height {
            for y in 0..self.width {
                if self.grid[x][y].is_passable() {
                    self.grid[x][y].moves = self.get_moves(x, y);
                }
            }
        }
    }

    /// Single-agent candidate moves out of `(x, y)`: the target must be
    /// traversable, and waiting is dropped on forced-movement cells.
    pub fn get_moves(&self, x: usize, y: usize) -> Vec<(Action, Position)> {
        let forced = self.kind_at(x, y) == Some(CellKind::ForcedMovement);

        Action::ALL
            .iter()
            .filter(|&&action| !(forced && action == Action::Wait))
            .filter_map(|&action| {
                let target = action.apply((x, y))?;
                self.is_traversable(target.0, target.1)
                    .then_some((action, target))
            })
            .collect()
    }

    /// Precomputed candidate moves; empty for blocked or out-of-bounds cells.
    pub fn moves(&self, x: usize, y: usize) -> &[(Action, Position)] {
        self.grid
            .get(x)
            .and_then(|row| row.get(y))
            .map_or(&[], |tile| tile.moves.as_slice())
    }

    pub fn in_bounds(&self, x: usize, y: usize) -> bool {
        x < self.height && y < self.width
    }

    pub fn is_traversable(&self, x: usize, y: usize) -> bool {
        self.in_bounds(x, y) && self.grid[x][y].is_passable()
    }

    pub fn kind_at(&self, x: usize, y: usize) -> Option<CellKind> {
        self.grid.get(x)?.get(y).map(Tile::kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_map() {
        let map = Map::from_rows(&["B;G;A", "Y;B;B", " G ; B;B "]).unwrap();

        assert_eq!(map.height, 3);
        assert_eq!(map.width, 3);

        assert!(map.is_traversable(0, 0));
        assert!(!map.is_traversable(0, 1));
        assert!(map.is_traversable(0, 2));
        assert!(!map.is_traversable(2, 0));
        assert!(!map.is_traversable(3, 0));
        assert!(!map.is_traversable(0, 3));

        assert_eq!(map.kind_at(0, 2), Some(CellKind::ForcedMovement));
        assert_eq!(map.kind_at(1, 0), Some(CellKind::Free));
        assert_eq!(map.kind_at(2, 0), Some(CellKind::Blocked));
        assert_eq!(map.kind_at(5, 5), None);
    }

    #[test]
    fn test_moves() {
        let map = Map::from_rows(&["B;G;A", "B;B;B", "G;B;B"]).unwrap();

        let moves = map.moves(1, 1);
        assert_eq!(moves.len(), 4);
        assert!(!moves.contains(&(Action::Up, (0, 1))));
        assert!(moves.contains(&(Action::Wait, (1, 1))));

        // Forced-movement corner: no wait, only down.
        assert_eq!(map.moves(0, 2), &[(Action::Down, (1, 2))]);

        // Corner at the grid origin.
        let moves = map.moves(0, 0);
        assert_eq!(moves, &[(Action::Down, (1, 0)), (Action::Wait, (0, 0))]);

        assert!(map.moves(0, 1).is_empty());
        assert!(map.moves(9, 9).is_empty());
    }

    #[test]
    fn test_ragged_rows() {
        let err = Map::from_rows(&["B;B;B", "B;B"]).unwrap_err();
        assert!(matches!(
            err,
            ScenarioError::RaggedRow {
                row: 1,
                expected: 3,
                found: 2
            }
        ));
    }

    #[test]
    fn test_empty_grid() {
        let rows: [&str; 0] = [];
        assert!(matches!(Map::from_rows(&rows), Err(ScenarioError::EmptyGrid)));
    }
}
