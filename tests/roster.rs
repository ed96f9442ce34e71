//! Integration tests for the roster: unique names, ids, stored formats and CSV.

use pickleball_courts::models::StoredPlayer;
use pickleball_courts::{Player, Roster, RosterError};

#[test]
fn default_roster_has_four_players() {
    let r = Roster::with_defaults();
    let names: Vec<&str> = r.players().iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Alice", "Bob", "Charlie", "Diana"]);
    assert_eq!(r.ids(), vec![1, 2, 3, 4]);
}

#[test]
fn add_trims_and_assigns_next_id() {
    let mut r = Roster::with_defaults();
    let p = r.add_player("  Eve ").unwrap().clone();
    assert_eq!(p, Player::new(5, "Eve"));
    assert_eq!(r.len(), 5);
}

#[test]
fn add_rejects_empty_and_duplicate_names() {
    let mut r = Roster::with_defaults();
    assert_eq!(r.add_player("   ").err(), Some(RosterError::EmptyName));
    assert_eq!(r.add_player("alice").err(), Some(RosterError::DuplicatePlayerName));
    assert_eq!(r.add_player(" BOB ").err(), Some(RosterError::DuplicatePlayerName));
    assert_eq!(r.len(), 4);
}

#[test]
fn remove_returns_player_and_ids_are_not_reused_below_max() {
    let mut r = Roster::with_defaults();
    let removed = r.remove_player(2).unwrap();
    assert_eq!(removed.name, "Bob");
    assert!(!r.contains(2));
    assert_eq!(r.remove_player(2).err(), Some(RosterError::PlayerNotFound(2)));
    assert_eq!(r.add_player("Frank").unwrap().id, 5);
}

#[test]
fn empty_roster_starts_ids_at_one() {
    let mut r = Roster::new();
    assert!(r.is_empty());
    assert_eq!(r.add_player("Zoe").unwrap().id, 1);
}

#[test]
fn find_by_name_ignores_case() {
    let r = Roster::with_defaults();
    assert_eq!(r.find_by_name("CHARLIE").map(|p| p.id), Some(3));
    assert!(r.find_by_name("Zed").is_none());
}

#[test]
fn rename_checks_uniqueness_but_allows_own_case_change() {
    let mut r = Roster::with_defaults();
    assert_eq!(r.rename_player(1, "ALICE").unwrap().name, "ALICE");
    assert_eq!(r.rename_player(1, "bob").err(), Some(RosterError::DuplicatePlayerName));
    assert_eq!(r.rename_player(1, "").err(), Some(RosterError::EmptyName));
    assert_eq!(r.rename_player(42, "X").err(), Some(RosterError::PlayerNotFound(42)));
    assert_eq!(r.get(1).unwrap().name, "ALICE");
}

#[test]
fn stored_names_without_ids_get_fresh_ids() {
    let entries: Vec<StoredPlayer> =
        serde_json::from_str(r#"["Alice", {"id": 7, "name": "Bob"}, {"name": "Cat"}]"#).unwrap();
    let r = Roster::from_stored(entries);
    let got: Vec<(u32, &str)> = r.players().iter().map(|p| (p.id, p.name.as_str())).collect();
    assert_eq!(got, vec![(8, "Alice"), (7, "Bob"), (9, "Cat")]);
}

#[test]
fn stored_zero_and_duplicate_ids_are_repaired() {
    let entries: Vec<StoredPlayer> = serde_json::from_str(
        r#"[{"id": 0, "name": "A"}, {"id": 2, "name": "B"}, {"id": 2, "name": "C"}]"#,
    )
    .unwrap();
    let r = Roster::from_stored(entries);
    assert_eq!(r.ids(), vec![3, 2, 4]);
}

#[test]
fn roster_serializes_as_plain_list() {
    let r = Roster::with_defaults();
    let json = serde_json::to_value(&r).unwrap();
    assert_eq!(json[0]["id"], 1);
    assert_eq!(json[0]["name"], "Alice");
    assert_eq!(json.as_array().map(Vec::len), Some(4));
}

#[test]
fn import_csv_adds_new_names_and_skips_duplicates() {
    let mut r = Roster::with_defaults();
    let csv = "name\nEve\n\nalice\n  Frank , extra\nEve\n";
    let summary = r.import_csv(csv.as_bytes()).unwrap();
    assert_eq!(summary.added, 2);
    assert_eq!(summary.skipped, 2);
    assert!(r.find_by_name("Frank").is_some());
    assert_eq!(r.len(), 6);
}

#[test]
fn import_csv_without_header() {
    let mut r = Roster::new();
    let summary = r.import_csv("Gina\nHal\n".as_bytes()).unwrap();
    assert_eq!(summary.added, 2);
    assert_eq!(r.ids(), vec![1, 2]);
}

#[test]
fn export_csv_lists_ids_and_names() {
    let mut r = Roster::new();
    r.add_player("Ann").unwrap();
    r.add_player("Smith, Jo").unwrap();
    assert_eq!(r.to_csv().unwrap(), "id,name\n1,Ann\n2,\"Smith, Jo\"\n");
}

#[test]
fn exported_csv_imports_back() {
    let mut source = Roster::with_defaults();
    source.add_player("Smith, Jo").unwrap();
    let csv = source.to_csv().unwrap();

    let mut r = Roster::new();
    let summary = r.import_csv(csv.as_bytes()).unwrap();
    assert_eq!((summary.added, summary.skipped), (5, 0));
    let names: Vec<&str> = r.players().iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Alice", "Bob", "Charlie", "Diana", "Smith, Jo"]);

    let again = r.import_csv(csv.as_bytes()).unwrap();
    assert_eq!((again.added, again.skipped), (0, 5));
}

#[test]
fn stored_blank_and_duplicate_names_are_dropped() {
    let entries: Vec<StoredPlayer> = serde_json::from_str(
        r#"[{"id": 1, "name": " Ann "}, {"id": 2, "name": "   "}, {"id": 3, "name": "ANN"}, "Bo", "bo"]"#,
    )
    .unwrap();
    let r = Roster::from_stored(entries);
    let got: Vec<(u32, &str)> = r.players().iter().map(|p| (p.id, p.name.as_str())).collect();
    assert_eq!(got, vec![(1, "Ann"), (2, "Bo")]);
}
