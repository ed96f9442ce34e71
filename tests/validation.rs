//! Integration tests for assignment validation.

use pickleball_courts::{
    check_assignment, validate_assignment, AssignmentError, CourtAssignments, GameConfig,
    GameType, PositionAssignment,
};

fn mapping(entries: &[(u32, u32, u32)]) -> CourtAssignments {
    entries
        .iter()
        .map(|&(court, position, player)| PositionAssignment::new(court, position, player))
        .collect()
}

#[test]
fn empty_mapping_is_valid() {
    assert!(validate_assignment(&CourtAssignments::new()));
    assert!(check_assignment(&CourtAssignments::new(), &GameConfig::default()).is_ok());
}

#[test]
fn distinct_players_and_slots_are_valid() {
    let a = mapping(&[(1, 0, 1), (1, 1, 2), (2, 0, 3), (2, 1, 4)]);
    assert!(validate_assignment(&a));
    let config = GameConfig::new(2, GameType::Singles);
    assert_eq!(check_assignment(&a, &config), Ok(()));
}

#[test]
fn same_player_twice_is_invalid() {
    let a = mapping(&[(1, 0, 1), (1, 1, 2), (2, 0, 1), (2, 1, 3)]);
    assert!(!validate_assignment(&a));
    let config = GameConfig::new(2, GameType::Singles);
    assert_eq!(check_assignment(&a, &config), Err(AssignmentError::DuplicatePlayer(1)));
}

#[test]
fn same_slot_twice_is_invalid() {
    let a = mapping(&[(1, 0, 1), (1, 0, 2)]);
    assert!(!validate_assignment(&a));
    let config = GameConfig::new(1, GameType::Singles);
    assert_eq!(
        check_assignment(&a, &config),
        Err(AssignmentError::DuplicatePosition {
            court_id: 1,
            position: 0
        })
    );
}

#[test]
fn out_of_range_court_or_position_fails_check() {
    let config = GameConfig::new(2, GameType::Singles);

    let a = mapping(&[(3, 0, 1)]);
    assert!(validate_assignment(&a));
    assert!(matches!(
        check_assignment(&a, &config),
        Err(AssignmentError::InvalidCourt { court_id: 3, .. })
    ));

    let a = mapping(&[(1, 2, 1)]);
    assert!(matches!(
        check_assignment(&a, &config),
        Err(AssignmentError::InvalidPosition { position: 2, .. })
    ));
}

#[test]
fn court_stored_under_wrong_key_fails_check() {
    let a: CourtAssignments =
        serde_json::from_str(r#"{"1":[{"court_id":2,"position":0,"player_id":1}]}"#).unwrap();
    let config = GameConfig::new(2, GameType::Doubles);
    assert!(matches!(
        check_assignment(&a, &config),
        Err(AssignmentError::InvalidCourt { court_id: 2, .. })
    ));
}
