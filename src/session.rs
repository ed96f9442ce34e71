//! One court-organizing session: roster, assignment engine and game timer over one store.

use crate::engine::AssignmentEngine;
use crate::logic::{
    calculate_court_capacity, CountdownTimer, TimerAction, TimerError, TimerState,
};
use crate::models::{
    AssignmentError, ConfigError, CourtAssignments, CourtId, GameConfig, ImportSummary, Player,
    PlayerId, PositionAssignment, Roster, RosterError, StoredPlayer,
};
use crate::store::{self, SharedStore, OPENED_AT_KEY, PLAYERS_KEY};
use chrono::{DateTime, Utc};
use rand::Rng;
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use std::io::Read;
use uuid::Uuid;

/// Unique identifier for a session.
pub type SessionId = Uuid;

/// Anything a session operation can reject.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SessionError {
    Roster(RosterError),
    Assignment(AssignmentError),
    Config(ConfigError),
    Timer(TimerError),
}

impl std::fmt::Display for SessionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionError::Roster(e) => write!(f, "{}", e),
            SessionError::Assignment(e) => write!(f, "{}", e),
            SessionError::Config(e) => write!(f, "{}", e),
            SessionError::Timer(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for SessionError {}

impl From<RosterError> for SessionError {
    fn from(e: RosterError) -> Self {
        SessionError::Roster(e)
    }
}

impl From<AssignmentError> for SessionError {
    fn from(e: AssignmentError) -> Self {
        SessionError::Assignment(e)
    }
}

impl From<ConfigError> for SessionError {
    fn from(e: ConfigError) -> Self {
        SessionError::Config(e)
    }
}

impl From<TimerError> for SessionError {
    fn from(e: TimerError) -> Self {
        SessionError::Timer(e)
    }
}

/// Timer as shown to clients.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct TimerView {
    pub state: TimerState,
    /// `MM:SS`.
    pub remaining: String,
    pub remaining_seconds: u32,
    pub critical: bool,
}

impl TimerView {
    pub fn from_timer(t: &CountdownTimer) -> Self {
        let remaining = t.remaining();
        Self {
            state: t.state(),
            remaining: remaining.to_string(),
            remaining_seconds: remaining.total_seconds(),
            critical: t.is_critical(),
        }
    }
}

/// Read-only view of a session (for API responses).
#[derive(Debug, Serialize)]
pub struct SessionSnapshot<'a> {
    pub id: SessionId,
    pub opened_at: DateTime<Utc>,
    pub players: &'a [Player],
    pub config: &'a GameConfig,
    pub assignments: &'a CourtAssignments,
    /// Eligible players not on any court.
    pub unassigned: Vec<PlayerId>,
    pub occupancy: BTreeMap<CourtId, usize>,
    /// Total positions across all courts.
    pub capacity: usize,
    pub timer: TimerView,
}

pub struct Session {
    id: SessionId,
    opened_at: DateTime<Utc>,
    roster: Roster,
    engine: AssignmentEngine,
    timer: CountdownTimer,
    store: SharedStore,
}

impl Session {
    /// Open a session over `store`, restoring whatever it holds. An empty store
    /// gives the default roster and configuration.
    pub fn open(id: SessionId, store: SharedStore) -> Self {
        let roster = match store::try_load::<Vec<StoredPlayer>>(&*store, PLAYERS_KEY) {
            Ok(Some(entries)) => Roster::from_stored(entries),
            Ok(None) => Roster::with_defaults(),
            Err(e) => {
                log::warn!("Stored roster unreadable ({}), using default players", e);
                Roster::with_defaults()
            }
        };
        let opened_at = match store::try_load::<DateTime<Utc>>(&*store, OPENED_AT_KEY) {
            Ok(Some(at)) => at,
            other => {
                if let Err(e) = other {
                    log::warn!("Stored open time unreadable ({}), resetting", e);
                }
                let now = Utc::now();
                let _ = store::save(&*store, OPENED_AT_KEY, &now);
                now
            }
        };
        let engine = AssignmentEngine::load(store.clone());
        let timer = CountdownTimer::new(engine.config().game_length);
        log::info!(
            "Opened session {} with {} player(s), {} assignment(s)",
            id,
            roster.len(),
            engine.assignments().len()
        );
        Self {
            id,
            opened_at,
            roster,
            engine,
            timer,
            store,
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    /// First time this session was opened; kept across reloads.
    pub fn opened_at(&self) -> DateTime<Utc> {
        self.opened_at
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn engine(&self) -> &AssignmentEngine {
        &self.engine
    }

    pub fn config(&self) -> &GameConfig {
        self.engine.config()
    }

    pub fn assignments(&self) -> &CourtAssignments {
        self.engine.assignments()
    }

    pub fn timer(&self) -> &CountdownTimer {
        &self.timer
    }

    pub fn add_player(&mut self, name: &str) -> Result<Player, SessionError> {
        let player = self.roster.add_player(name)?.clone();
        log::debug!("Added player {} ({})", player.name, player.id);
        self.persist_roster();
        Ok(player)
    }

    pub fn rename_player(&mut self, id: PlayerId, name: &str) -> Result<Player, SessionError> {
        let player = self.roster.rename_player(id, name)?.clone();
        self.persist_roster();
        Ok(player)
    }

    /// Remove a player from the roster, their court position and the session players.
    pub fn remove_player(&mut self, id: PlayerId) -> Result<Player, SessionError> {
        let player = self.roster.remove_player(id)?;
        self.engine.clear_player_assignments(id);
        if self.config().session_players.contains(&id) {
            let mut config = self.config().clone();
            config.session_players.retain(|p| *p != id);
            self.engine.update_config(config)?;
        }
        log::debug!("Removed player {} ({})", player.name, player.id);
        self.persist_roster();
        Ok(player)
    }

    pub fn import_players<R: Read>(&mut self, reader: R) -> Result<ImportSummary, SessionError> {
        let summary = self.roster.import_csv(reader)?;
        if summary.added > 0 {
            self.persist_roster();
        }
        log::info!("Imported {} player(s), skipped {}", summary.added, summary.skipped);
        Ok(summary)
    }

    pub fn export_players(&self) -> Result<String, SessionError> {
        Ok(self.roster.to_csv()?)
    }

    /// Replace the configuration. Session players not on the roster are dropped;
    /// a new game length resets the timer.
    pub fn update_config(&mut self, mut config: GameConfig) -> Result<&GameConfig, SessionError> {
        config.session_players = self.known_unique(&config.session_players);
        let previous_length = self.config().game_length;
        self.engine.update_config(config)?;
        if self.engine.config().game_length != previous_length {
            self.timer.set_length(self.engine.config().game_length);
        }
        Ok(self.engine.config())
    }

    /// Restrict assignment to these players. An empty list means everyone.
    pub fn set_session_players(&mut self, ids: &[PlayerId]) -> Result<&GameConfig, SessionError> {
        let mut config = self.config().clone();
        config.session_players = ids.to_vec();
        self.update_config(config)
    }

    /// Session players if any are selected, otherwise the whole roster.
    pub fn eligible_players(&self) -> Vec<PlayerId> {
        let session = &self.config().session_players;
        if session.is_empty() {
            self.roster.ids()
        } else {
            self.roster
                .ids()
                .into_iter()
                .filter(|id| session.contains(id))
                .collect()
        }
    }

    pub fn unassigned_players(&self) -> Vec<PlayerId> {
        self.engine.unassigned_players(&self.eligible_players())
    }

    pub fn assign_player_to_court(
        &mut self,
        court_id: CourtId,
        player: PlayerId,
        position: u32,
    ) -> Result<(), SessionError> {
        if !self.roster.contains(player) {
            return Err(RosterError::PlayerNotFound(player).into());
        }
        Ok(self.engine.assign_player_to_court(court_id, player, position)?)
    }

    pub fn remove_player_from_court(
        &mut self,
        court_id: CourtId,
        position: u32,
    ) -> Option<PositionAssignment> {
        self.engine.remove_player_from_court(court_id, position)
    }

    pub fn clear_all_assignments(&mut self) {
        self.engine.clear_all_assignments();
    }

    pub fn player_assignments(&self, player: PlayerId) -> Vec<PositionAssignment> {
        self.engine.player_assignments(player)
    }

    /// Randomly place the eligible players on courts.
    pub fn randomize_assignments<R: Rng + ?Sized>(&mut self, rng: &mut R) -> &CourtAssignments {
        let players = self.eligible_players();
        self.engine.randomize(&players, rng)
    }

    pub fn timer_action(&mut self, action: TimerAction) -> Result<&CountdownTimer, SessionError> {
        self.timer.apply(action)?;
        Ok(&self.timer)
    }

    /// Advance a running timer by one second. True when the game just ended.
    pub fn tick_timer(&mut self) -> bool {
        let completed = self.timer.tick();
        if completed {
            log::info!("Session {}: game timer completed", self.id);
        }
        completed
    }

    pub fn snapshot(&self) -> SessionSnapshot<'_> {
        let config = self.config();
        SessionSnapshot {
            id: self.id,
            opened_at: self.opened_at,
            players: self.roster.players(),
            config,
            assignments: self.assignments(),
            unassigned: self.unassigned_players(),
            occupancy: self.engine.occupancy(),
            capacity: calculate_court_capacity(config.court_count, config.game_type),
            timer: TimerView::from_timer(&self.timer),
        }
    }

    /// Roster ids from `ids`, first occurrence only.
    fn known_unique(&self, ids: &[PlayerId]) -> Vec<PlayerId> {
        let mut seen = HashSet::new();
        ids.iter()
            .copied()
            .filter(|id| self.roster.contains(*id) && seen.insert(*id))
            .collect()
    }

    fn persist_roster(&self) {
        let _ = store::save(&*self.store, PLAYERS_KEY, &self.roster);
    }
}
