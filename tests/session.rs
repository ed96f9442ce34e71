//! Integration tests for sessions: roster cascade, session players, persistence round-trip.

use pickleball_courts::store::PLAYERS_KEY;
use pickleball_courts::{
    validate_assignment, AssignmentError, ConfigError, GameConfig, GameLength, GameType,
    JsonFileStore, KeyValueStore, MemoryStore, RosterError, Session, SessionError, SharedStore,
    TimerAction, TimerState,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;
use uuid::Uuid;

fn session() -> Session {
    Session::open(Uuid::new_v4(), MemoryStore::shared())
}

#[test]
fn new_session_has_defaults() {
    let s = session();
    assert_eq!(s.roster().len(), 4);
    assert_eq!(s.config(), &GameConfig::default());
    assert!(s.assignments().is_empty());
    assert_eq!(s.unassigned_players(), vec![1, 2, 3, 4]);
    assert_eq!(s.timer().remaining(), GameLength::new(15, 0));
}

#[test]
fn removing_a_player_clears_their_assignment() {
    let mut s = session();
    s.assign_player_to_court(1, 2, 0).unwrap();
    s.assign_player_to_court(1, 3, 1).unwrap();
    s.remove_player(2).unwrap();
    assert!(s.player_assignments(2).is_empty());
    assert_eq!(s.assignments().len(), 1);
    assert!(!s.roster().contains(2));
}

#[test]
fn removing_a_player_drops_them_from_session_players() {
    let mut s = session();
    s.set_session_players(&[1, 2]).unwrap();
    s.remove_player(2).unwrap();
    assert_eq!(s.config().session_players, vec![1]);
    assert_eq!(s.eligible_players(), vec![1]);
}

#[test]
fn cannot_assign_player_not_on_roster() {
    let mut s = session();
    assert_eq!(
        s.assign_player_to_court(1, 42, 0),
        Err(SessionError::Roster(RosterError::PlayerNotFound(42)))
    );
}

#[test]
fn engine_errors_pass_through() {
    let mut s = session();
    s.assign_player_to_court(1, 1, 0).unwrap();
    assert_eq!(
        s.assign_player_to_court(1, 2, 0),
        Err(SessionError::Assignment(AssignmentError::PositionOccupied {
            court_id: 1,
            position: 0
        }))
    );
    assert_eq!(
        s.assign_player_to_court(1, 2, 0).unwrap_err().to_string(),
        "Position 0 on court 1 is already taken"
    );
}

#[test]
fn session_players_are_filtered_to_roster_and_deduplicated() {
    let mut s = session();
    s.set_session_players(&[3, 99, 1, 3]).unwrap();
    assert_eq!(s.config().session_players, vec![3, 1]);
    // Eligible players follow roster order.
    assert_eq!(s.eligible_players(), vec![1, 3]);
}

#[test]
fn randomize_uses_session_players_when_selected() {
    let mut s = session();
    s.add_player("Eve").unwrap();
    s.set_session_players(&[2, 5]).unwrap();
    let mut rng = StdRng::seed_from_u64(17);
    let a = s.randomize_assignments(&mut rng).clone();
    assert_eq!(a.len(), 2);
    assert!(a.is_assigned(2) && a.is_assigned(5));
    assert!(s.unassigned_players().is_empty());
}

#[test]
fn randomize_uses_whole_roster_otherwise() {
    let mut s = session();
    s.update_config(GameConfig::new(2, GameType::Singles)).unwrap();
    let mut rng = StdRng::seed_from_u64(23);
    let a = s.randomize_assignments(&mut rng).clone();
    assert_eq!(a.len(), 4);
    assert!(validate_assignment(&a));
    for court in [1, 2] {
        let positions: Vec<u32> = a.court(court).iter().map(|p| p.position).collect();
        assert_eq!(positions, vec![0, 1]);
    }
}

#[test]
fn game_type_switch_clears_courts_through_session() {
    let mut s = session();
    s.assign_player_to_court(1, 1, 3).unwrap();
    let mut config = s.config().clone();
    config.game_type = GameType::Singles;
    s.update_config(config).unwrap();
    assert!(s.assignments().is_empty());
}

#[test]
fn new_game_length_resets_timer() {
    let mut s = session();
    s.timer_action(TimerAction::Start).unwrap();
    s.tick_timer();
    let mut config = s.config().clone();
    config.game_length = Some(GameLength::new(0, 2));
    s.update_config(config).unwrap();
    assert_eq!(s.timer().state(), TimerState::Idle);

    s.timer_action(TimerAction::Start).unwrap();
    assert!(!s.tick_timer());
    assert!(s.tick_timer());
    assert_eq!(s.snapshot().timer.state, TimerState::Completed);
}

#[test]
fn invalid_game_length_leaves_session_untouched() {
    let mut s = session();
    s.timer_action(TimerAction::Start).unwrap();
    let mut config = s.config().clone();
    config.game_length = Some(GameLength::new(u32::MAX, 0));
    assert_eq!(
        s.update_config(config).err(),
        Some(SessionError::Config(ConfigError::InvalidGameLength(
            GameLength::new(u32::MAX, 0)
        )))
    );
    assert_eq!(s.config().game_length, Some(GameLength::new(15, 0)));
    assert_eq!(s.timer().state(), TimerState::Running);
}

#[test]
fn zero_game_length_runs_for_one_second() {
    let mut s = session();
    let mut config = s.config().clone();
    config.game_length = Some(GameLength::new(0, 0));
    s.update_config(config).unwrap();
    assert_eq!(s.snapshot().timer.remaining, "00:01");

    s.timer_action(TimerAction::Start).unwrap();
    assert!(s.tick_timer());
    assert_eq!(s.timer().state(), TimerState::Completed);
}

#[test]
fn unchanged_game_length_keeps_timer_running() {
    let mut s = session();
    s.timer_action(TimerAction::Start).unwrap();
    let mut config = s.config().clone();
    config.court_count = 5;
    s.update_config(config).unwrap();
    assert_eq!(s.timer().state(), TimerState::Running);
}

#[test]
fn snapshot_reports_derived_views() {
    let mut s = session();
    s.assign_player_to_court(2, 4, 1).unwrap();
    let snap = s.snapshot();
    assert_eq!(snap.capacity, 8);
    assert_eq!(snap.unassigned, vec![1, 2, 3]);
    assert_eq!(snap.occupancy.get(&2), Some(&1));
    assert_eq!(snap.timer.remaining, "15:00");

    let json = serde_json::to_value(&snap).unwrap();
    assert_eq!(json["config"]["game_type"], "doubles");
    assert_eq!(json["assignments"]["2"][0]["player_id"], 4);
    assert_eq!(json["timer"]["state"], "idle");
}

#[test]
fn state_survives_reopening_from_disk() {
    let dir = std::env::temp_dir().join(format!("pickleball-session-{}", Uuid::new_v4()));
    let id = Uuid::new_v4();
    let opened_at;
    {
        let store: SharedStore = Arc::new(JsonFileStore::open(&dir).unwrap());
        let mut s = Session::open(id, store);
        opened_at = s.opened_at();
        s.add_player("Eve").unwrap();
        s.update_config(GameConfig::new(3, GameType::Singles)).unwrap();
        s.assign_player_to_court(3, 5, 1).unwrap();
        s.remove_player(1).unwrap();
    }
    let store: SharedStore = Arc::new(JsonFileStore::open(&dir).unwrap());
    let s = Session::open(id, store);
    assert_eq!(s.roster().ids(), vec![2, 3, 4, 5]);
    assert_eq!(s.config().court_count, 3);
    assert_eq!(s.config().game_type, GameType::Singles);
    assert_eq!(s.assignments().occupant(3, 1), Some(5));
    assert_eq!(s.opened_at(), opened_at);

    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn legacy_name_list_roster_is_upgraded() {
    let store = Arc::new(MemoryStore::new());
    store.set(PLAYERS_KEY, r#"["Zed", "Yolanda"]"#).unwrap();
    let s = Session::open(Uuid::new_v4(), store);
    assert_eq!(s.roster().ids(), vec![1, 2]);
    assert_eq!(s.roster().get(2).map(|p| p.name.as_str()), Some("Yolanda"));
}

#[test]
fn corrupt_roster_falls_back_to_defaults() {
    let store = Arc::new(MemoryStore::new());
    store.set(PLAYERS_KEY, "{\"oops\": true}").unwrap();
    let s = Session::open(Uuid::new_v4(), store);
    assert_eq!(s.roster().len(), 4);
}

#[test]
fn csv_import_and_export_through_session() {
    let mut s = session();
    let summary = s.import_players("Eve\nBob\n".as_bytes()).unwrap();
    assert_eq!((summary.added, summary.skipped), (1, 1));
    let csv = s.export_players().unwrap();
    assert!(csv.starts_with("id,name\n1,Alice\n"));
    assert!(csv.ends_with("5,Eve\n"));
}
