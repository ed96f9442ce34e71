//! Player and Roster data structures.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::io::Read;

/// Unique identifier for a player (used in assignments and lookups).
pub type PlayerId = u32;

/// Names every fresh session starts with.
pub const DEFAULT_PLAYER_NAMES: [&str; 4] = ["Alice", "Bob", "Charlie", "Diana"];

/// Errors that can occur while editing the roster.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum RosterError {
    /// Name is empty after trimming.
    EmptyName,
    /// A player with this name already exists (names are unique, case-insensitive).
    DuplicatePlayerName,
    /// No player with this id in the roster.
    PlayerNotFound(PlayerId),
    /// CSV could not be read or written.
    Csv(String),
}

impl std::fmt::Display for RosterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RosterError::EmptyName => write!(f, "Player name cannot be empty"),
            RosterError::DuplicatePlayerName => write!(f, "A player with that name already exists"),
            RosterError::PlayerNotFound(id) => write!(f, "Player {} not found", id),
            RosterError::Csv(msg) => write!(f, "CSV error: {}", msg),
        }
    }
}

impl std::error::Error for RosterError {}

impl From<csv::Error> for RosterError {
    fn from(e: csv::Error) -> Self {
        RosterError::Csv(e.to_string())
    }
}

/// A player on the roster.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
}

impl Player {
    pub fn new(id: PlayerId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// One entry of a stored roster. Older saves hold bare names, newer ones `{id, name}`.
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub enum StoredPlayer {
    Name(String),
    Full {
        #[serde(default)]
        id: Option<PlayerId>,
        name: String,
    },
}

/// Outcome of a CSV import.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct ImportSummary {
    pub added: usize,
    /// Rows whose name was already on the roster.
    pub skipped: usize,
}

/// All known players, in insertion order.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Roster {
    players: Vec<Player>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// The roster a new session starts with.
    pub fn with_defaults() -> Self {
        let players = DEFAULT_PLAYER_NAMES
            .iter()
            .zip(1..)
            .map(|(name, id)| Player::new(id, *name))
            .collect();
        Self { players }
    }

    /// Build a roster from stored entries, handing out fresh ids to entries
    /// whose id is missing, zero or already taken. Order is preserved. Entries
    /// with a blank name or a name already seen (ignoring case) are dropped.
    pub fn from_stored(entries: Vec<StoredPlayer>) -> Self {
        let mut names = HashSet::new();
        let entries: Vec<(Option<PlayerId>, String)> = entries
            .into_iter()
            .map(|entry| match entry {
                StoredPlayer::Name(name) => (None, name),
                StoredPlayer::Full { id, name } => (id, name),
            })
            .filter_map(|(id, name)| {
                let name = name.trim().to_string();
                if name.is_empty() {
                    log::warn!("Dropping stored player {:?} with a blank name", id);
                    return None;
                }
                if !names.insert(name.to_ascii_lowercase()) {
                    log::warn!("Dropping stored player {:?}: duplicate name {:?}", id, name);
                    return None;
                }
                Some((id, name))
            })
            .collect();

        let mut used: HashSet<PlayerId> = entries
            .iter()
            .filter_map(|(id, _)| id.filter(|id| *id > 0))
            .collect();
        let mut seen = HashSet::new();
        let mut players = Vec::with_capacity(entries.len());
        for (id, name) in entries {
            let id = match id {
                Some(id) if id > 0 && seen.insert(id) => id,
                _ => {
                    let fresh = used.iter().max().map_or(1, |m| m + 1);
                    used.insert(fresh);
                    seen.insert(fresh);
                    fresh
                }
            };
            players.push(Player::new(id, name));
        }
        Self { players }
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn ids(&self) -> Vec<PlayerId> {
        self.players.iter().map(|p| p.id).collect()
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn contains(&self, id: PlayerId) -> bool {
        self.players.iter().any(|p| p.id == id)
    }

    pub fn get(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    /// Case-insensitive lookup by name.
    pub fn find_by_name(&self, name: &str) -> Option<&Player> {
        let name = name.trim();
        self.players.iter().find(|p| p.name.eq_ignore_ascii_case(name))
    }

    fn next_id(&self) -> PlayerId {
        self.players.iter().map(|p| p.id).max().map_or(1, |m| m + 1)
    }

    fn check_name(&self, name: &str, except: Option<PlayerId>) -> Result<(), RosterError> {
        if name.is_empty() {
            return Err(RosterError::EmptyName);
        }
        let is_duplicate = self
            .players
            .iter()
            .any(|p| Some(p.id) != except && p.name.eq_ignore_ascii_case(name));
        if is_duplicate {
            return Err(RosterError::DuplicatePlayerName);
        }
        Ok(())
    }

    /// Add a player. Names are trimmed and must be unique (case-insensitive).
    pub fn add_player(&mut self, name: &str) -> Result<&Player, RosterError> {
        let name = name.trim();
        self.check_name(name, None)?;
        let id = self.next_id();
        self.players.push(Player::new(id, name));
        Ok(&self.players[self.players.len() - 1])
    }

    /// Remove a player by id, returning it.
    pub fn remove_player(&mut self, id: PlayerId) -> Result<Player, RosterError> {
        let idx = self
            .players
            .iter()
            .position(|p| p.id == id)
            .ok_or(RosterError::PlayerNotFound(id))?;
        Ok(self.players.remove(idx))
    }

    /// Rename a player. A player may change the case of its own name.
    pub fn rename_player(&mut self, id: PlayerId, name: &str) -> Result<&Player, RosterError> {
        let name = name.trim();
        if !self.contains(id) {
            return Err(RosterError::PlayerNotFound(id));
        }
        self.check_name(name, Some(id))?;
        let p = self
            .players
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(RosterError::PlayerNotFound(id))?;
        p.name = name.to_string();
        Ok(p)
    }

    /// Import names from CSV. A first row with a `name` cell is a header and picks
    /// the column to read (so exported `id,name` files import back); otherwise the
    /// first column is used. Blank rows and names already on the roster are skipped.
    pub fn import_csv<R: Read>(&mut self, reader: R) -> Result<ImportSummary, RosterError> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut summary = ImportSummary::default();
        let mut name_column = 0;
        for (row, record) in rdr.records().enumerate() {
            let record = record?;
            if row == 0 {
                if let Some(col) = record.iter().position(|c| c.eq_ignore_ascii_case("name")) {
                    name_column = col;
                    continue;
                }
            }
            let name = record.get(name_column).unwrap_or("").trim();
            if name.is_empty() {
                continue;
            }
            match self.add_player(name) {
                Ok(_) => summary.added += 1,
                Err(RosterError::DuplicatePlayerName) => summary.skipped += 1,
                Err(e) => return Err(e),
            }
        }
        Ok(summary)
    }

    /// Export as CSV with an `id,name` header.
    pub fn to_csv(&self) -> Result<String, RosterError> {
        let mut wtr = csv::Writer::from_writer(Vec::new());
        wtr.write_record(["id", "name"])?;
        for p in &self.players {
            wtr.write_record([p.id.to_string(), p.name.clone()])?;
        }
        let bytes = wtr
            .into_inner()
            .map_err(|e| RosterError::Csv(e.to_string()))?;
        String::from_utf8(bytes).map_err(|e| RosterError::Csv(e.to_string()))
    }
}
