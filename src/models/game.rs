//! GameType, GameLength and the session's GameConfig.

use crate::models::player::PlayerId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Singles (1v1) or doubles (2v2). Decides how many positions a court has.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameType {
    Singles,
    #[default]
    Doubles,
}

impl GameType {
    /// Number of positions on one court.
    pub fn positions_per_court(self) -> u32 {
        match self {
            GameType::Singles => 2,
            GameType::Doubles => 4,
        }
    }
}

impl fmt::Display for GameType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameType::Singles => write!(f, "singles"),
            GameType::Doubles => write!(f, "doubles"),
        }
    }
}

/// Length of one game on the countdown timer.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub struct GameLength {
    pub minutes: u32,
    pub seconds: u32,
}

impl GameLength {
    pub const fn new(minutes: u32, seconds: u32) -> Self {
        Self { minutes, seconds }
    }

    pub fn from_total_seconds(total: u32) -> Self {
        Self {
            minutes: total / 60,
            seconds: total % 60,
        }
    }

    pub fn total_seconds(&self) -> u32 {
        self.minutes.saturating_mul(60).saturating_add(self.seconds)
    }

    /// Check the bounds a game length must respect: minutes up to 23, seconds up
    /// to 59. `0:00` is bumped to one second.
    pub fn validated(self) -> Result<Self, ConfigError> {
        if self.minutes > MAX_GAME_MINUTES || self.seconds > 59 {
            return Err(ConfigError::InvalidGameLength(self));
        }
        if self.minutes == 0 && self.seconds == 0 {
            return Ok(Self::new(0, 1));
        }
        Ok(self)
    }

    /// Parse `M:SS` / `MM:SS` (1-2 digits each side). Minutes go up to 23, seconds
    /// up to 59. `0:00` is bumped to one second.
    pub fn parse(text: &str) -> Option<Self> {
        let (m, s) = text.trim().split_once(':')?;
        let valid = |part: &str| {
            (1..=2).contains(&part.len()) && part.bytes().all(|b| b.is_ascii_digit())
        };
        if !valid(m) || !valid(s) {
            return None;
        }
        let minutes: u32 = m.parse().ok()?;
        let seconds: u32 = s.parse().ok()?;
        Self::new(minutes, seconds).validated().ok()
    }
}

impl fmt::Display for GameLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total = self.total_seconds();
        write!(f, "{:02}:{:02}", total / 60, total % 60)
    }
}

/// Errors when replacing the game configuration.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ConfigError {
    /// Court count must be at least 1.
    NoCourts,
    /// Minutes above 23 or seconds above 59.
    InvalidGameLength(GameLength),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::NoCourts => write!(f, "At least one court is required"),
            ConfigError::InvalidGameLength(length) => write!(
                f,
                "Invalid game length {}:{:02} (at most {}:59)",
                length.minutes, length.seconds, MAX_GAME_MINUTES
            ),
        }
    }
}

impl std::error::Error for ConfigError {}

pub const DEFAULT_COURT_COUNT: u32 = 2;
pub const MAX_GAME_MINUTES: u32 = 23;
pub const DEFAULT_GAME_LENGTH: GameLength = GameLength::new(15, 0);

/// Settings for the current session.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    pub court_count: u32,
    pub game_type: GameType,
    /// None leaves the timer without a length.
    #[serde(default)]
    pub game_length: Option<GameLength>,
    /// When non-empty, only these players are eligible for assignment.
    #[serde(default)]
    pub session_players: Vec<PlayerId>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            court_count: DEFAULT_COURT_COUNT,
            game_type: GameType::Doubles,
            game_length: Some(DEFAULT_GAME_LENGTH),
            session_players: Vec::new(),
        }
    }
}

impl GameConfig {
    pub fn new(court_count: u32, game_type: GameType) -> Self {
        Self {
            court_count,
            game_type,
            ..Self::default()
        }
    }

    pub fn positions_per_court(&self) -> u32 {
        self.game_type.positions_per_court()
    }

    pub fn is_valid_court(&self, court_id: u32) -> bool {
        (1..=self.court_count).contains(&court_id)
    }

    pub fn is_valid_position(&self, position: u32) -> bool {
        position < self.positions_per_court()
    }

    /// Reject impossible settings. A `0:00` game length is bumped to `0:01`.
    pub fn validate(&mut self) -> Result<(), ConfigError> {
        if self.court_count == 0 {
            return Err(ConfigError::NoCourts);
        }
        if let Some(length) = self.game_length {
            self.game_length = Some(length.validated()?);
        }
        Ok(())
    }
}
