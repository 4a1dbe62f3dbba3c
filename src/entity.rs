use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn moved(&self, direction: Direction) -> Self {
        match direction {
            Direction::Up => Position::new(self.x, self.y - 1),
            Direction::Down => Position::new(self.x, self.y + 1),
            Direction::Left => Position::new(self.x - 1, self.y),
            Direction::Right => Position::new(self.x + 1, self.y),
        }
    }

    pub fn manhattan(&self, other: Position) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }

    /// True when `other` is one orthogonal step away.
    pub fn is_adjacent(&self, other: Position) -> bool {
        self.manhattan(other) == 1
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    pub fn opposite(&self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// Quarter turn clockwise as seen on screen (y grows downwards).
    pub fn turn_right(&self) -> Direction {
        match self {
            Direction::Up => Direction::Right,
            Direction::Right => Direction::Down,
            Direction::Down => Direction::Left,
            Direction::Left => Direction::Up,
        }
    }

    pub fn turn_left(&self) -> Direction {
        self.turn_right().opposite()
    }
}

/// Rotational sense a patroller prefers when the boundary bends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Spin {
    Clockwise,
    CounterClockwise,
}

impl Spin {
    pub fn turn(&self, heading: Direction) -> Direction {
        match self {
            Spin::Clockwise => heading.turn_right(),
            Spin::CounterClockwise => heading.turn_left(),
        }
    }

    pub fn flipped(&self) -> Spin {
        match self {
            Spin::Clockwise => Spin::CounterClockwise,
            Spin::CounterClockwise => Spin::Clockwise,
        }
    }
}

/// Fires once every `every` ticks; entities only move when their timer fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepTimer {
    every: u32,
    elapsed: u32,
}

impl StepTimer {
    pub fn new(every: u32) -> Self {
        Self {
            every: every.max(1),
            elapsed: 0,
        }
    }

    pub fn ready(&mut self) -> bool {
        self.elapsed += 1;
        if self.elapsed >= self.every {
            self.elapsed = 0;
            true
        } else {
            false
        }
    }

    pub fn every(&self) -> u32 {
        self.every
    }

    pub fn reset(&mut self) {
        self.elapsed = 0;
    }
}

#[derive(Debug, Clone)]
pub struct Player {
    pub position: Position,
    pub facing: Direction,
    spawn: Position,
    timer: StepTimer,
}

impl Player {
    pub fn new(spawn: Position, step_ticks: u32) -> Self {
        Self {
            position: spawn,
            facing: Direction::Up,
            spawn,
            timer: StepTimer::new(step_ticks),
        }
    }

    pub fn spawn(&self) -> Position {
        self.spawn
    }

    pub fn respawn_at(&mut self, position: Position) {
        self.position = position;
        self.facing = Direction::Up;
        self.timer.reset();
    }

    pub(crate) fn step_ready(&mut self) -> bool {
        self.timer.ready()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HazardKind {
    Roamer,
    Patroller,
}

/// What the contact detector needs to know about any hazard.
pub trait Hazard {
    fn kind(&self) -> HazardKind;

    fn position(&self) -> Position;

    /// Cell occupied at the start of the current tick.
    fn previous(&self) -> Position;

    /// Trail cell the hazard tried to step into this tick, if any.
    fn strike(&self) -> Option<Position> {
        None
    }
}
