//! Data structures for pickleball sessions: players, game configuration, court assignments.

mod assignment;
mod game;
mod player;

pub use assignment::{AssignmentError, CourtAssignments, CourtId, PositionAssignment};
pub use game::{
    ConfigError, GameConfig, GameLength, GameType, DEFAULT_COURT_COUNT, DEFAULT_GAME_LENGTH,
    MAX_GAME_MINUTES,
};
pub use player::{
    ImportSummary, Player, PlayerId, Roster, RosterError, StoredPlayer, DEFAULT_PLAYER_NAMES,
};
