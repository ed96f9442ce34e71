//! Checks that an assignment mapping has no duplicate players or slots.

use crate::models::{AssignmentError, CourtAssignments, GameConfig};
use std::collections::HashSet;

/// True iff no player appears twice and no (court, position) slot appears twice.
pub fn validate_assignment(assignments: &CourtAssignments) -> bool {
    let mut players = HashSet::new();
    let mut slots = HashSet::new();
    let mut total = 0;
    for a in assignments.iter() {
        players.insert(a.player_id);
        slots.insert((a.court_id, a.position));
        total += 1;
    }
    players.len() == total && slots.len() == total
}

/// Full check of a mapping against a configuration: every court and position in
/// range, each stored under its own court, no duplicate players or slots.
/// Returns the first problem found.
pub fn check_assignment(
    assignments: &CourtAssignments,
    config: &GameConfig,
) -> Result<(), AssignmentError> {
    let mut players = HashSet::new();
    let mut slots = HashSet::new();
    for (key, a) in assignments.keyed() {
        if key != a.court_id || !config.is_valid_court(a.court_id) {
            return Err(AssignmentError::InvalidCourt {
                court_id: a.court_id,
                court_count: config.court_count,
            });
        }
        if !config.is_valid_position(a.position) {
            return Err(AssignmentError::InvalidPosition {
                position: a.position,
                game_type: config.game_type,
            });
        }
        if !players.insert(a.player_id) {
            return Err(AssignmentError::DuplicatePlayer(a.player_id));
        }
        if !slots.insert((a.court_id, a.position)) {
            return Err(AssignmentError::DuplicatePosition {
                court_id: a.court_id,
                position: a.position,
            });
        }
    }
    Ok(())
}
