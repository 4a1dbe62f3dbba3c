use crate::config::Difficulty;
use crate::entity::Direction;
use crate::session::SessionSnapshot;
use std::io;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    Direction(Direction),
    /// Stop moving but keep the draw toggle as it is.
    Stop,
    ToggleDraw,
    /// Menu choice; starts a round at this difficulty.
    Select(Difficulty),
    Restart,
    Quit,
}

/// Trait that abstracts rendering implementation.
/// The session never calls into it; the driving loop hands it snapshots.
pub trait Renderer {
    /// Initialize the renderer
    fn init(&mut self) -> io::Result<()>;

    /// Render the state after the latest tick
    fn render(&mut self, snapshot: &SessionSnapshot<'_>) -> io::Result<()>;

    /// Clean up and restore terminal/display state
    fn cleanup(&mut self) -> io::Result<()>;

    /// Poll for input from the user
    fn poll_input(&mut self) -> io::Result<Option<Input>>;
}
