use crate::entity::Position;
use crate::error::{InvalidMutation, Result};
use crate::grid::{CellState, Grid};
use serde::Serialize;

/// The line being drawn: an anchor on land followed by the trail cells in the
/// order they were entered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Trail {
    anchor: Position,
    points: Vec<Position>,
    end: Option<Position>,
}

impl Trail {
    fn new(anchor: Position) -> Self {
        Self {
            anchor,
            points: Vec::new(),
            end: None,
        }
    }

    pub fn anchor(&self) -> Position {
        self.anchor
    }

    /// Land cell the trail closed on, once committed.
    pub fn end(&self) -> Option<Position> {
        self.end
    }

    pub fn points(&self) -> &[Position] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Head of the line; the anchor while no cell has been entered yet.
    pub fn head(&self) -> Position {
        self.points.last().copied().unwrap_or(self.anchor)
    }

    fn before_head(&self) -> Option<Position> {
        self.points.iter().rev().nth(1).copied()
    }

    /// Turns every cell still marked as trail back into open water.
    pub fn revert(&self, grid: &mut Grid) {
        for &pos in &self.points {
            if grid.classify(pos) == CellState::Trail {
                if let Err(err) = grid.set_cell(pos, CellState::Open) {
                    log::debug!("could not revert trail cell: {err}");
                }
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn from_parts(anchor: Position, points: Vec<Position>, end: Position) -> Self {
        Self {
            anchor,
            points,
            end: Some(end),
        }
    }
}

/// Idle, or drawing with at least one trail cell. Commit and abort are not
/// resting states: both hand the trail back and leave the controller idle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
enum TrailState {
    #[default]
    Idle,
    Drawing(Trail),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrailStep {
    /// The head moved into a freshly marked trail cell.
    Extended(Position),
    /// The move was refused without penalty.
    Blocked,
    /// The head ran into its own line; the trail has already been reverted.
    SelfCrossing { at: Position, reverted: Trail },
    /// The head reached land. Trail cells stay marked until partitioned.
    Closed(Trail),
}

#[derive(Debug, Clone, Default)]
pub struct TrailController {
    state: TrailState,
}

impl TrailController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_drawing(&self) -> bool {
        matches!(self.state, TrailState::Drawing(_))
    }

    pub fn trail(&self) -> Option<&Trail> {
        match &self.state {
            TrailState::Drawing(trail) => Some(trail),
            TrailState::Idle => None,
        }
    }

    /// Leaves land at `anchor` and enters the open cell `first`.
    pub fn begin(&mut self, grid: &mut Grid, anchor: Position, first: Position) -> Result<()> {
        if self.is_drawing() {
            return Err(InvalidMutation::AlreadyDrawing);
        }
        if !grid.in_bounds(first) {
            return Err(InvalidMutation::OutOfBounds(first));
        }
        if !grid.classify(anchor).is_land() || !grid.in_bounds(anchor) {
            return Err(InvalidMutation::InvalidAnchor(anchor));
        }
        if !anchor.is_adjacent(first) {
            return Err(InvalidMutation::NotAdjacent {
                from: anchor,
                to: first,
            });
        }
        if grid.classify(first) != CellState::Open {
            return Err(InvalidMutation::IllegalTransition {
                at: first,
                from: grid.classify(first),
                to: CellState::Trail,
            });
        }

        grid.set_cell(first, CellState::Trail)?;
        let mut trail = Trail::new(anchor);
        trail.points.push(first);
        self.state = TrailState::Drawing(trail);
        Ok(())
    }

    /// Advances the head one orthogonal step to `target`. Entering open water
    /// needs `draw` held; without it the head stays put.
    pub fn extend(&mut self, grid: &mut Grid, target: Position, draw: bool) -> Result<TrailStep> {
        let TrailState::Drawing(trail) = &mut self.state else {
            return Err(InvalidMutation::NotDrawing);
        };

        if !grid.in_bounds(target) {
            return Err(InvalidMutation::OutOfBounds(target));
        }
        let head = trail.head();
        if !head.is_adjacent(target) {
            return Err(InvalidMutation::NotAdjacent {
                from: head,
                to: target,
            });
        }

        match grid.classify(target) {
            CellState::Open if draw => {
                grid.set_cell(target, CellState::Trail)?;
                trail.points.push(target);
                Ok(TrailStep::Extended(target))
            }
            CellState::Open => Ok(TrailStep::Blocked),
            CellState::Trail if trail.before_head() == Some(target) => Ok(TrailStep::Blocked),
            CellState::Trail => {
                let reverted = self.abort(grid).unwrap_or_else(|| Trail::new(head));
                Ok(TrailStep::SelfCrossing {
                    at: target,
                    reverted,
                })
            }
            CellState::Border | CellState::Claimed => {
                let TrailState::Drawing(mut trail) = std::mem::take(&mut self.state) else {
                    return Err(InvalidMutation::NotDrawing);
                };
                trail.end = Some(target);
                Ok(TrailStep::Closed(trail))
            }
        }
    }

    /// Drops the current trail, restoring its cells to open water.
    pub fn abort(&mut self, grid: &mut Grid) -> Option<Trail> {
        match std::mem::take(&mut self.state) {
            TrailState::Drawing(trail) => {
                trail.revert(grid);
                Some(trail)
            }
            TrailState::Idle => None,
        }
    }
}
