//! The assignment engine: owns the court assignments and the game configuration,
//! and keeps the assignment invariants after every mutation.
//!
//! Invariants:
//! - at most one player per (court, position);
//! - at most one position per player;
//! - every court id in `1..=court_count`, every position valid for the game type.
//!
//! Every successful mutation is mirrored into the store. Persistence failures are
//! logged by [`store::save`] and do not undo the in-memory change.

use crate::logic::{check_assignment, randomize_assignments, validate_assignment};
use crate::models::{
    AssignmentError, ConfigError, CourtAssignments, CourtId, GameConfig, PlayerId,
    PositionAssignment,
};
use crate::store::{self, SharedStore, ASSIGNMENTS_KEY, CONFIG_KEY};
use rand::Rng;
use std::collections::{BTreeMap, HashSet};

pub struct AssignmentEngine {
    config: GameConfig,
    assignments: CourtAssignments,
    store: SharedStore,
}

impl AssignmentEngine {
    /// Fresh engine with no assignments. Nothing is written until the first mutation.
    pub fn new(config: GameConfig, store: SharedStore) -> Self {
        Self {
            config,
            assignments: CourtAssignments::new(),
            store,
        }
    }

    /// Restore config and assignments from the store. A missing or invalid config
    /// falls back to the default; assignments that break the invariants for the
    /// restored config are discarded.
    pub fn load(store: SharedStore) -> Self {
        let mut config: GameConfig = store::load(&*store, CONFIG_KEY, GameConfig::default());
        if let Err(e) = config.validate() {
            log::warn!("Stored config rejected ({}), using default", e);
            config = GameConfig::default();
        }
        let assignments: CourtAssignments =
            store::load(&*store, ASSIGNMENTS_KEY, CourtAssignments::new());
        let assignments = match check_assignment(&assignments, &config) {
            Ok(()) => assignments,
            Err(e) => {
                log::warn!("Stored assignments rejected ({}), starting empty", e);
                CourtAssignments::new()
            }
        };
        Self {
            config,
            assignments,
            store,
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn assignments(&self) -> &CourtAssignments {
        &self.assignments
    }

    /// Replace the configuration.
    ///
    /// The game length is checked and `0:00` becomes `0:01`.
    /// A different game type clears every assignment, since positions mean different
    /// things in singles and doubles. Fewer courts drop the assignments on the removed courts.
    pub fn update_config(
        &mut self,
        mut new_config: GameConfig,
    ) -> Result<&GameConfig, ConfigError> {
        new_config.validate()?;
        let mut assignments_changed = false;
        if new_config.game_type != self.config.game_type {
            if !self.assignments.is_empty() {
                log::info!(
                    "Game type changed {} -> {}, clearing {} assignment(s)",
                    self.config.game_type,
                    new_config.game_type,
                    self.assignments.len()
                );
                self.assignments.clear();
                assignments_changed = true;
            }
        } else if new_config.court_count < self.config.court_count {
            let court_count = new_config.court_count;
            let dropped = self.assignments.retain(|a| a.court_id <= court_count);
            if dropped > 0 {
                log::info!("Courts reduced to {}, dropped {} assignment(s)", court_count, dropped);
                assignments_changed = true;
            }
        }
        self.config = new_config;
        self.persist_config();
        if assignments_changed {
            self.persist_assignments();
        }
        Ok(&self.config)
    }

    /// Put `player` at `position` on `court_id`.
    ///
    /// Checked in order: court in range, position in range, player not already on a
    /// court, slot free. A player already on a court is rejected, not moved.
    pub fn assign_player_to_court(
        &mut self,
        court_id: CourtId,
        player: PlayerId,
        position: u32,
    ) -> Result<(), AssignmentError> {
        if !self.config.is_valid_court(court_id) {
            return Err(AssignmentError::InvalidCourt {
                court_id,
                court_count: self.config.court_count,
            });
        }
        if !self.config.is_valid_position(position) {
            return Err(AssignmentError::InvalidPosition {
                position,
                game_type: self.config.game_type,
            });
        }
        if self.assignments.is_assigned(player) {
            return Err(AssignmentError::PlayerAlreadyAssigned(player));
        }
        if self.assignments.occupant(court_id, position).is_some() {
            return Err(AssignmentError::PositionOccupied { court_id, position });
        }
        self.assignments
            .insert(PositionAssignment::new(court_id, position, player));
        log::debug!("Assigned player {} to court {} position {}", player, court_id, position);
        self.persist_assignments();
        Ok(())
    }

    /// Empty a slot. Emptying an empty slot does nothing.
    pub fn remove_player_from_court(
        &mut self,
        court_id: CourtId,
        position: u32,
    ) -> Option<PositionAssignment> {
        let removed = self.assignments.remove(court_id, position)?;
        log::debug!(
            "Removed player {} from court {} position {}",
            removed.player_id,
            court_id,
            position
        );
        self.persist_assignments();
        Some(removed)
    }

    pub fn clear_all_assignments(&mut self) {
        self.assignments.clear();
        self.persist_assignments();
    }

    /// Remove every assignment held by `player` (at most one while the invariants hold).
    pub fn clear_player_assignments(&mut self, player: PlayerId) {
        if self.assignments.retain(|a| a.player_id != player) > 0 {
            log::debug!("Cleared assignments of player {}", player);
            self.persist_assignments();
        }
    }

    /// `all_players` minus everyone on a court, in input order.
    pub fn unassigned_players(&self, all_players: &[PlayerId]) -> Vec<PlayerId> {
        let assigned: HashSet<PlayerId> = self.assignments.iter().map(|a| a.player_id).collect();
        all_players
            .iter()
            .copied()
            .filter(|p| !assigned.contains(p))
            .collect()
    }

    pub fn player_assignments(&self, player: PlayerId) -> Vec<PositionAssignment> {
        self.assignments
            .iter()
            .filter(|a| a.player_id == player)
            .copied()
            .collect()
    }

    pub fn occupancy(&self) -> BTreeMap<CourtId, usize> {
        self.assignments.occupancy()
    }

    /// Replace all assignments with a random placement of `players`.
    /// Repeated ids are only placed once.
    pub fn randomize<R: Rng + ?Sized>(
        &mut self,
        players: &[PlayerId],
        rng: &mut R,
    ) -> &CourtAssignments {
        let mut seen = HashSet::new();
        let unique: Vec<PlayerId> = players.iter().copied().filter(|p| seen.insert(*p)).collect();
        let assignments =
            randomize_assignments(&unique, self.config.court_count, self.config.game_type, rng);
        if !validate_assignment(&assignments) {
            log::warn!("Random assignment produced duplicates, keeping previous assignments");
            return &self.assignments;
        }
        log::info!(
            "Randomized {} of {} player(s) onto {} court(s)",
            assignments.len(),
            unique.len(),
            self.config.court_count
        );
        self.assignments = assignments;
        self.persist_assignments();
        &self.assignments
    }

    fn persist_assignments(&self) {
        let _ = store::save(&*self.store, ASSIGNMENTS_KEY, &self.assignments);
    }

    fn persist_config(&self) {
        let _ = store::save(&*self.store, CONFIG_KEY, &self.config);
    }
}
