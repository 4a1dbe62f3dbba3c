use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const MIN_SIDE: i32 = 5;
pub const MAX_SIDE: i32 = 512;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Normal,
    Hard,
}

impl Difficulty {
    pub const fn roamers(self) -> usize {
        match self {
            Difficulty::Normal => 1,
            Difficulty::Hard => 2,
        }
    }

    pub const fn patrollers(self) -> usize {
        match self {
            Difficulty::Normal => 2,
            Difficulty::Hard => 3,
        }
    }

    pub const fn lives(self) -> u32 {
        9
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Difficulty::Normal => f.write_str("normal"),
            Difficulty::Hard => f.write_str("hard"),
        }
    }
}

impl FromStr for Difficulty {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "normal" => Ok(Difficulty::Normal),
            "hard" => Ok(Difficulty::Hard),
            _ => Err(ConfigError::UnknownDifficulty(s.to_owned())),
        }
    }
}

/// Knobs read once when a session is created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub width: i32,
    pub height: i32,
    pub difficulty: Difficulty,
    pub win_threshold: f64,
    pub player_step_ticks: u32,
    pub roamer_step_ticks: u32,
    pub patroller_step_ticks: u32,
    /// Chance per roamer step of picking a fresh random heading.
    pub roamer_turn_chance: f64,
    /// Patrollers reverse after this many steps; 0 never reverses.
    pub patroller_reverse_steps: u32,
    pub transition_ticks: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            width: 80,
            height: 60,
            difficulty: Difficulty::Normal,
            win_threshold: 0.75,
            player_step_ticks: 3,
            roamer_step_ticks: 4,
            patroller_step_ticks: 5,
            roamer_turn_chance: 0.02,
            patroller_reverse_steps: 240,
            transition_ticks: 30,
        }
    }
}

impl SessionConfig {
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: SessionConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let side = MIN_SIDE..=MAX_SIDE;
        if !side.contains(&self.width) || !side.contains(&self.height) {
            return Err(ConfigError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        if !(self.win_threshold > 0.0 && self.win_threshold <= 1.0) {
            return Err(ConfigError::InvalidThreshold(self.win_threshold));
        }
        if !(0.0..=1.0).contains(&self.roamer_turn_chance) {
            return Err(ConfigError::InvalidProbability {
                name: "roamer_turn_chance",
                value: self.roamer_turn_chance,
            });
        }
        Ok(())
    }
}
