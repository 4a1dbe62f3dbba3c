use crate::boundary::Boundary;
use crate::entity::{Direction, Hazard, HazardKind, Position, Spin, StepTimer};
use crate::grid::{CellState, Grid};
use rand::seq::SliceRandom;
use rand::Rng;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoamerStep {
    /// Timer has not fired this tick.
    Waiting,
    Moved(Position),
    /// Boxed in with nowhere open to go.
    Stuck,
    /// Tried to enter a trail cell; it stays where it is.
    Struck(Position),
}

/// Free-roaming hazard confined to open water.
#[derive(Debug, Clone)]
pub struct Roamer {
    pub position: Position,
    pub heading: Direction,
    previous: Position,
    strike: Option<Position>,
    spawn: Position,
    timer: StepTimer,
}

impl Roamer {
    pub fn new(spawn: Position, heading: Direction, step_ticks: u32) -> Self {
        Self {
            position: spawn,
            heading,
            previous: spawn,
            strike: None,
            spawn,
            timer: StepTimer::new(step_ticks),
        }
    }

    pub fn spawn(&self) -> Position {
        self.spawn
    }

    /// Starts a tick: remembers where it stood, then steps if its timer fires.
    pub fn advance<R: Rng + ?Sized>(
        &mut self,
        grid: &Grid,
        rng: &mut R,
        turn_chance: f64,
    ) -> RoamerStep {
        self.previous = self.position;
        self.strike = None;
        if !self.timer.ready() {
            return RoamerStep::Waiting;
        }
        self.step(grid, rng, turn_chance)
    }

    /// Keeps its heading until blocked, with an occasional random turn.
    pub fn step<R: Rng + ?Sized>(
        &mut self,
        grid: &Grid,
        rng: &mut R,
        turn_chance: f64,
    ) -> RoamerStep {
        if rng.gen_bool(turn_chance) {
            if let Some(&heading) = Direction::ALL.choose(rng) {
                self.heading = heading;
            }
        }

        let ahead = self.position.moved(self.heading);
        match grid.classify(ahead) {
            CellState::Open => return self.move_to(ahead),
            CellState::Trail => return self.strike_at(ahead),
            CellState::Border | CellState::Claimed => {}
        }

        // Bounce: pick any other way out, trail cells included.
        let exits: Vec<Direction> = Direction::ALL
            .into_iter()
            .filter(|&d| {
                matches!(
                    grid.classify(self.position.moved(d)),
                    CellState::Open | CellState::Trail
                )
            })
            .collect();
        let Some(&heading) = exits.choose(rng) else {
            return RoamerStep::Stuck;
        };
        self.heading = heading;
        let target = self.position.moved(heading);
        if grid.classify(target) == CellState::Trail {
            self.strike_at(target)
        } else {
            self.move_to(target)
        }
    }

    fn move_to(&mut self, target: Position) -> RoamerStep {
        self.position = target;
        RoamerStep::Moved(target)
    }

    fn strike_at(&mut self, target: Position) -> RoamerStep {
        self.strike = Some(target);
        RoamerStep::Struck(target)
    }

    /// Moves to the nearest open cell if the current one is no longer open.
    pub fn relocate(&mut self, grid: &Grid) -> bool {
        if grid.classify(self.position) == CellState::Open {
            return false;
        }
        match grid.nearest_where(self.position, |state| state == CellState::Open) {
            Some(open) => {
                log::debug!("roamer relocated from {} to {}", self.position, open);
                self.position = open;
                self.previous = open;
                true
            }
            None => false,
        }
    }

    pub fn respawn(&mut self, grid: &Grid) {
        self.position = self.spawn;
        self.relocate(grid);
        self.previous = self.position;
        self.strike = None;
        self.timer.reset();
    }
}

impl Hazard for Roamer {
    fn kind(&self) -> HazardKind {
        HazardKind::Roamer
    }

    fn position(&self) -> Position {
        self.position
    }

    fn previous(&self) -> Position {
        self.previous
    }

    fn strike(&self) -> Option<Position> {
        self.strike
    }
}

/// Hazard that walks the boundary, never leaving land.
#[derive(Debug, Clone)]
pub struct Patroller {
    pub position: Position,
    pub heading: Direction,
    pub spin: Spin,
    previous: Position,
    spawn: Position,
    spawn_spin: Spin,
    steps: u32,
    timer: StepTimer,
}

impl Patroller {
    pub fn new(spawn: Position, spin: Spin, step_ticks: u32) -> Self {
        let heading = match spin {
            Spin::Clockwise => Direction::Right,
            Spin::CounterClockwise => Direction::Left,
        };
        Self {
            position: spawn,
            heading,
            spin,
            previous: spawn,
            spawn,
            spawn_spin: spin,
            steps: 0,
            timer: StepTimer::new(step_ticks),
        }
    }

    pub fn advance(&mut self, boundary: &Boundary, reverse_every: u32) -> bool {
        self.previous = self.position;
        if !self.timer.ready() {
            return false;
        }
        self.step(boundary, reverse_every)
    }

    /// Straight on if the walk allows, else turn with the spin, else against
    /// it; doubling back is the last resort.
    pub fn step(&mut self, boundary: &Boundary, reverse_every: u32) -> bool {
        if boundary.is_empty() {
            return false;
        }
        if !boundary.contains(self.position) {
            self.remap(boundary);
        }

        self.steps = self.steps.wrapping_add(1);
        if reverse_every > 0 && self.steps % reverse_every == 0 {
            self.reverse();
        }

        let options = [
            self.heading,
            self.spin.turn(self.heading),
            self.spin.flipped().turn(self.heading),
            self.heading.opposite(),
        ];
        for heading in options {
            let target = self.position.moved(heading);
            if boundary.contains(target) {
                self.heading = heading;
                self.position = target;
                return true;
            }
        }
        false
    }

    pub fn reverse(&mut self) {
        self.heading = self.heading.opposite();
        self.spin = self.spin.flipped();
    }

    /// Snaps back onto the walk after the boundary moved underneath it.
    pub fn remap(&mut self, boundary: &Boundary) {
        if boundary.contains(self.position) {
            return;
        }
        if let Some(nearest) = boundary.nearest(self.position) {
            log::debug!("patroller remapped from {} to {}", self.position, nearest);
            self.position = nearest;
            self.previous = nearest;
        }
    }

    pub fn respawn(&mut self, boundary: &Boundary) {
        *self = Self::new(self.spawn, self.spawn_spin, self.timer.every());
        self.remap(boundary);
    }
}

impl Hazard for Patroller {
    fn kind(&self) -> HazardKind {
        HazardKind::Patroller
    }

    fn position(&self) -> Position {
        self.position
    }

    fn previous(&self) -> Position {
        self.previous
    }
}
