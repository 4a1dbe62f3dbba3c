pub mod boundary;
pub mod cli_renderer;
pub mod config;
pub mod contact;
pub mod entity;
pub mod error;
pub mod grid;
pub mod hazard;
pub mod partition;
pub mod renderer;
pub mod session;
pub mod trail;

pub use boundary::Boundary;
pub use cli_renderer::CliRenderer;
pub use config::{Difficulty, SessionConfig};
pub use contact::Contact;
pub use entity::{Direction, Hazard, HazardKind, Player, Position};
pub use error::{ConfigError, InvalidMutation};
pub use grid::{CellState, Grid};
pub use hazard::{Patroller, Roamer};
pub use partition::Claim;
pub use renderer::{Input, Renderer};
pub use session::{InputState, LifeLossCause, Phase, Session, SessionEvent, SessionSnapshot};
pub use trail::{Trail, TrailController, TrailStep};
