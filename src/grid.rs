use crate::entity::Position;
use crate::error::{InvalidMutation, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellState {
    Open,
    Claimed,
    Border,
    Trail,
}

impl CellState {
    /// Border and claimed land: what the player walks on and patrollers follow.
    pub const fn is_land(self) -> bool {
        matches!(self, CellState::Border | CellState::Claimed)
    }
}

const ORTHOGONAL: [(i32, i32); 4] = [(0, -1), (0, 1), (-1, 0), (1, 0)];

const SURROUNDING: [(i32, i32); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Row-major cell arena with running open/claimed/trail counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Grid {
    width: i32,
    height: i32,
    cells: Vec<CellState>,
    open: usize,
    claimed: usize,
    trail: usize,
}

impl Grid {
    /// Builds an all-open field ringed by border. Callers validate the size
    /// first; anything below 3x3 is widened to 3x3.
    pub fn new(width: i32, height: i32) -> Self {
        let width = width.max(3);
        let height = height.max(3);
        let mut cells = vec![CellState::Open; (width * height) as usize];

        for y in 0..height {
            for x in 0..width {
                if x == 0 || y == 0 || x == width - 1 || y == height - 1 {
                    cells[(y * width + x) as usize] = CellState::Border;
                }
            }
        }

        let interior = ((width - 2) * (height - 2)) as usize;
        Self {
            width,
            height,
            cells,
            open: interior,
            claimed: 0,
            trail: 0,
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.y >= 0 && pos.x < self.width && pos.y < self.height
    }

    pub fn index(&self, pos: Position) -> Option<usize> {
        self.in_bounds(pos).then(|| (pos.y * self.width + pos.x) as usize)
    }

    pub fn position(&self, index: usize) -> Position {
        let index = index as i32;
        Position::new(index % self.width, index / self.width)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Anything outside the field reads as border.
    pub fn classify(&self, pos: Position) -> CellState {
        self.index(pos).map_or(CellState::Border, |index| self.cells[index])
    }

    /// Reclassifies one cell, returning its previous state.
    pub fn set_cell(&mut self, pos: Position, state: CellState) -> Result<CellState> {
        use CellState::*;

        let index = self.index(pos).ok_or(InvalidMutation::OutOfBounds(pos))?;
        let from = self.cells[index];

        if from == Border {
            return Err(InvalidMutation::BorderCell(pos));
        }
        if from == state {
            return Ok(from);
        }
        match (from, state) {
            (Open, Trail) | (Open, Claimed) | (Trail, Open) | (Trail, Claimed) => {}
            _ => {
                return Err(InvalidMutation::IllegalTransition {
                    at: pos,
                    from,
                    to: state,
                })
            }
        }

        self.cells[index] = state;
        self.adjust(from, -1);
        self.adjust(state, 1);
        Ok(from)
    }

    fn adjust(&mut self, state: CellState, delta: isize) {
        let counter = match state {
            CellState::Open => &mut self.open,
            CellState::Claimed => &mut self.claimed,
            CellState::Trail => &mut self.trail,
            CellState::Border => return,
        };
        *counter = counter.saturating_add_signed(delta);
    }

    pub fn interior_cells(&self) -> usize {
        ((self.width - 2) * (self.height - 2)) as usize
    }

    pub fn open_cells(&self) -> usize {
        self.open
    }

    pub fn claimed_cells(&self) -> usize {
        self.claimed
    }

    pub fn trail_cells(&self) -> usize {
        self.trail
    }

    pub fn area_claimed_fraction(&self) -> f64 {
        self.claimed as f64 / self.interior_cells() as f64
    }

    /// Up/down/left/right neighbours that lie inside the field.
    pub fn neighbors4(&self, pos: Position) -> impl Iterator<Item = Position> + '_ {
        self.offsets(pos, &ORTHOGONAL)
    }

    pub fn neighbors8(&self, pos: Position) -> impl Iterator<Item = Position> + '_ {
        self.offsets(pos, &SURROUNDING)
    }

    fn offsets<'a>(
        &'a self,
        pos: Position,
        deltas: &'static [(i32, i32)],
    ) -> impl Iterator<Item = Position> + 'a {
        deltas
            .iter()
            .map(move |&(dx, dy)| Position::new(pos.x + dx, pos.y + dy))
            .filter(|&p| self.in_bounds(p))
    }

    /// Closest cell (manhattan) whose state satisfies `accept`. Ties go to the
    /// first cell in row-major order.
    pub fn nearest_where(
        &self,
        from: Position,
        accept: impl Fn(CellState) -> bool,
    ) -> Option<Position> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, &state)| accept(state))
            .map(|(index, _)| self.position(index))
            .min_by_key(|pos| pos.manhattan(from))
    }

    pub fn rows(&self) -> impl Iterator<Item = &[CellState]> {
        self.cells.chunks(self.width as usize)
    }
}
