//! PositionAssignment, CourtAssignments and AssignmentError.

use crate::models::game::GameType;
use crate::models::player::PlayerId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Court number, starting at 1.
pub type CourtId = u32;

/// Errors that can occur when placing players on courts.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum AssignmentError {
    /// Court id is outside `1..=court_count`.
    InvalidCourt { court_id: CourtId, court_count: u32 },
    /// Position is outside the range for the current game type.
    InvalidPosition { position: u32, game_type: GameType },
    /// Player already holds a position somewhere.
    PlayerAlreadyAssigned(PlayerId),
    /// Target slot is taken.
    PositionOccupied { court_id: CourtId, position: u32 },
    /// A player appears more than once in a mapping.
    DuplicatePlayer(PlayerId),
    /// A (court, position) slot appears more than once in a mapping.
    DuplicatePosition { court_id: CourtId, position: u32 },
}

impl std::fmt::Display for AssignmentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssignmentError::InvalidCourt { court_id, court_count } => {
                write!(f, "Court {} does not exist (courts 1-{})", court_id, court_count)
            }
            AssignmentError::InvalidPosition { position, game_type } => write!(
                f,
                "Position {} is not valid for {} (0-{})",
                position,
                game_type,
                game_type.positions_per_court() - 1
            ),
            AssignmentError::PlayerAlreadyAssigned(_) => {
                write!(f, "Player is already assigned to a court")
            }
            AssignmentError::PositionOccupied { court_id, position } => {
                write!(f, "Position {} on court {} is already taken", position, court_id)
            }
            AssignmentError::DuplicatePlayer(id) => {
                write!(f, "Player {} is assigned more than once", id)
            }
            AssignmentError::DuplicatePosition { court_id, position } => {
                write!(f, "Position {} on court {} is assigned more than once", position, court_id)
            }
        }
    }
}

impl std::error::Error for AssignmentError {}

/// A player standing at one position of one court.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub struct PositionAssignment {
    pub court_id: CourtId,
    pub position: u32,
    pub player_id: PlayerId,
}

impl PositionAssignment {
    pub fn new(court_id: CourtId, position: u32, player_id: PlayerId) -> Self {
        Self {
            court_id,
            position,
            player_id,
        }
    }
}

/// Assignments per court. Courts with nobody on them are left out.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CourtAssignments {
    courts: BTreeMap<CourtId, Vec<PositionAssignment>>,
}

impl CourtAssignments {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assignments on one court, sorted by position. Empty for an unused court.
    pub fn court(&self, court_id: CourtId) -> &[PositionAssignment] {
        self.courts.get(&court_id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Ids of courts with at least one assignment, ascending.
    pub fn court_ids(&self) -> impl Iterator<Item = CourtId> + '_ {
        self.courts.keys().copied()
    }

    /// Every assignment, court by court.
    pub fn iter(&self) -> impl Iterator<Item = &PositionAssignment> {
        self.courts.values().flatten()
    }

    /// Every assignment together with the court key it is stored under.
    pub(crate) fn keyed(&self) -> impl Iterator<Item = (CourtId, &PositionAssignment)> {
        self.courts
            .iter()
            .flat_map(|(&id, v)| v.iter().map(move |a| (id, a)))
    }

    pub fn len(&self) -> usize {
        self.courts.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.courts.values().all(Vec::is_empty)
    }

    pub fn occupant(&self, court_id: CourtId, position: u32) -> Option<PlayerId> {
        self.court(court_id)
            .iter()
            .find(|a| a.position == position)
            .map(|a| a.player_id)
    }

    pub fn is_assigned(&self, player_id: PlayerId) -> bool {
        self.iter().any(|a| a.player_id == player_id)
    }

    /// Number of filled positions per court.
    pub fn occupancy(&self) -> BTreeMap<CourtId, usize> {
        self.courts
            .iter()
            .filter(|(_, v)| !v.is_empty())
            .map(|(&id, v)| (id, v.len()))
            .collect()
    }

    /// Add an assignment without any checks, keeping the court ordered by position.
    pub(crate) fn insert(&mut self, assignment: PositionAssignment) {
        let court = self.courts.entry(assignment.court_id).or_default();
        let idx = court.partition_point(|a| a.position < assignment.position);
        court.insert(idx, assignment);
    }

    /// Drop the assignment at a slot, and the court entry if it becomes empty.
    pub(crate) fn remove(&mut self, court_id: CourtId, position: u32) -> Option<PositionAssignment> {
        let court = self.courts.get_mut(&court_id)?;
        let idx = court.iter().position(|a| a.position == position)?;
        let removed = court.remove(idx);
        if court.is_empty() {
            self.courts.remove(&court_id);
        }
        Some(removed)
    }

    /// Keep only assignments matching `keep`; returns how many were dropped.
    pub(crate) fn retain(&mut self, mut keep: impl FnMut(&PositionAssignment) -> bool) -> usize {
        let before = self.len();
        for court in self.courts.values_mut() {
            court.retain(|a| keep(a));
        }
        self.courts.retain(|_, v| !v.is_empty());
        before - self.len()
    }

    pub(crate) fn clear(&mut self) {
        self.courts.clear();
    }
}

impl FromIterator<PositionAssignment> for CourtAssignments {
    /// Collects without checks; duplicates are kept so validation can see them.
    fn from_iter<I: IntoIterator<Item = PositionAssignment>>(iter: I) -> Self {
        let mut out = Self::new();
        for a in iter {
            out.insert(a);
        }
        out
    }
}
