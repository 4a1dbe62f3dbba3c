use crate::entity::Position;
use crate::grid::{CellState, Grid};

/// The walk patrollers (and an idle player) move along: every border or
/// claimed cell with open water or trail among its eight neighbours.
///
/// Built once per round and then refreshed only around cells a commit changed,
/// so it follows the claimed outline as it grows holes and bays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Boundary {
    width: i32,
    height: i32,
    mask: Vec<bool>,
    len: usize,
}

impl Boundary {
    pub fn new(grid: &Grid) -> Self {
        let mut boundary = Self {
            width: grid.width(),
            height: grid.height(),
            mask: vec![false; grid.len()],
            len: 0,
        };
        boundary.rebuild(grid);
        boundary
    }

    pub fn rebuild(&mut self, grid: &Grid) {
        self.width = grid.width();
        self.height = grid.height();
        self.mask = vec![false; grid.len()];
        self.len = 0;
        for index in 0..grid.len() {
            let pos = grid.position(index);
            self.refresh_cell(grid, pos);
        }
    }

    /// Re-evaluates `changed` cells and their eight neighbours.
    pub fn refresh_around(&mut self, grid: &Grid, changed: &[Position]) {
        for &pos in changed {
            self.refresh_cell(grid, pos);
            for neighbour in grid.neighbors8(pos) {
                self.refresh_cell(grid, neighbour);
            }
        }
    }

    fn refresh_cell(&mut self, grid: &Grid, pos: Position) {
        let Some(index) = grid.index(pos) else {
            return;
        };
        let on_edge = grid.classify(pos).is_land()
            && grid
                .neighbors8(pos)
                .any(|n| matches!(grid.classify(n), CellState::Open | CellState::Trail));

        match (self.mask[index], on_edge) {
            (false, true) => self.len += 1,
            (true, false) => self.len -= 1,
            _ => {}
        }
        self.mask[index] = on_edge;
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.x >= 0
            && pos.y >= 0
            && pos.x < self.width
            && pos.y < self.height
            && self.mask[(pos.y * self.width + pos.x) as usize]
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = Position> + '_ {
        let width = self.width;
        self.mask
            .iter()
            .enumerate()
            .filter(|(_, &on)| on)
            .map(move |(index, _)| Position::new(index as i32 % width, index as i32 / width))
    }

    /// Closest boundary cell by manhattan distance.
    pub fn nearest(&self, from: Position) -> Option<Position> {
        self.iter().min_by_key(|pos| pos.manhattan(from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_boundary_is_the_border_ring() {
        let grid = Grid::new(7, 5);
        let boundary = Boundary::new(&grid);

        assert_eq!(boundary.len(), 2 * 7 + 2 * 5 - 4);
        assert!(boundary.contains(Position::new(0, 0)));
        assert!(boundary.contains(Position::new(6, 4)));
        assert!(!boundary.contains(Position::new(2, 2)));
        assert!(!boundary.contains(Position::new(-1, 0)));
    }

    #[test]
    fn test_refresh_follows_claimed_outline() {
        let mut grid = Grid::new(10, 10);
        let mut boundary = Boundary::new(&grid);

        // claim the left three interior columns
        let mut changed = Vec::new();
        for y in 1..9 {
            for x in 1..4 {
                let pos = Position::new(x, y);
                grid.set_cell(pos, CellState::Claimed).unwrap();
                changed.push(pos);
            }
        }
        boundary.refresh_around(&grid, &changed);

        // the left border is now buried behind land
        assert!(!boundary.contains(Position::new(0, 5)));
        assert!(!boundary.contains(Position::new(1, 5)));
        assert!(boundary.contains(Position::new(3, 5)));
        assert!(boundary.contains(Position::new(9, 5)));

        // incremental refresh agrees with a full rebuild
        assert_eq!(boundary, Boundary::new(&grid));
    }

    #[test]
    fn test_nearest_snaps_onto_the_walk() {
        let grid = Grid::new(9, 9);
        let boundary = Boundary::new(&grid);

        assert_eq!(boundary.nearest(Position::new(4, 7)), Some(Position::new(4, 8)));
        assert!(boundary.iter().all(|pos| grid.classify(pos).is_land()));
    }

    #[test]
    fn test_fully_claimed_field_has_no_walk() {
        let mut grid = Grid::new(5, 5);
        for y in 1..4 {
            for x in 1..4 {
                grid.set_cell(Position::new(x, y), CellState::Claimed).unwrap();
            }
        }
        let boundary = Boundary::new(&grid);

        assert!(boundary.is_empty());
        assert_eq!(boundary.nearest(Position::new(2, 2)), None);
    }
}
