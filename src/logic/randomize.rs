//! Random court assignment: shuffle players, then fill courts in order.

use crate::models::{CourtAssignments, GameType, PlayerId, PositionAssignment};
use rand::seq::SliceRandom;
use rand::Rng;

/// Shuffle in place (Fisher-Yates, every order equally likely).
pub fn shuffle<T, R: Rng + ?Sized>(items: &mut [T], rng: &mut R) {
    items.shuffle(rng);
}

/// Shuffled copy of `items`.
pub fn shuffled<T: Clone, R: Rng + ?Sized>(items: &[T], rng: &mut R) -> Vec<T> {
    let mut out = items.to_vec();
    shuffle(&mut out, rng);
    out
}

/// Positions on one court for the game type.
pub fn capacity_per_court(game_type: GameType) -> u32 {
    game_type.positions_per_court()
}

/// Total positions across all courts.
pub fn calculate_court_capacity(court_count: u32, game_type: GameType) -> usize {
    court_count as usize * capacity_per_court(game_type) as usize
}

/// Randomly place `players` on courts.
///
/// 1. Shuffle the players.
/// 2. Fill court 1 positions 0.., then court 2, and so on.
/// 3. Stop when players run out; players beyond capacity stay unassigned.
///
/// Each player and each slot is used at most once, so the result always validates
/// as long as `players` holds no duplicate ids.
pub fn randomize_assignments<R: Rng + ?Sized>(
    players: &[PlayerId],
    court_count: u32,
    game_type: GameType,
    rng: &mut R,
) -> CourtAssignments {
    let shuffled = shuffled(players, rng);
    let per_court = capacity_per_court(game_type);

    let slots = (1..=court_count)
        .flat_map(|court_id| (0..per_court).map(move |position| (court_id, position)));

    shuffled
        .into_iter()
        .zip(slots)
        .map(|(player_id, (court_id, position))| {
            PositionAssignment::new(court_id, position, player_id)
        })
        .collect()
}
