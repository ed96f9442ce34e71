//! Pickleball court organizer: library with models, assignment engine and persistence.

pub mod config;
pub mod engine;
pub mod logic;
pub mod models;
pub mod session;
pub mod store;

pub use engine::AssignmentEngine;
pub use logic::{
    calculate_court_capacity, capacity_per_court, check_assignment, randomize_assignments,
    shuffle, shuffled, validate_assignment, CountdownTimer, TimerAction, TimerError, TimerState,
};
pub use models::{
    AssignmentError, ConfigError, CourtAssignments, CourtId, GameConfig, GameLength, GameType,
    ImportSummary, Player, PlayerId, PositionAssignment, Roster, RosterError,
};
pub use session::{Session, SessionError, SessionId, SessionSnapshot, TimerView};
pub use store::{JsonFileStore, KeyValueStore, MemoryStore, SharedStore, StoreError};
