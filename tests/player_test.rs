//! Tests for the player registry and aggregate statistics.

use gridmatch::{GameError, GameOutcome, PlayerRegistry};

#[test]
fn test_create_and_get() {
    let registry = PlayerRegistry::new();
    let alice = registry
        .create("Alice".into(), "alice@test.com".into())
        .unwrap();
    let fetched = registry.get(alice.id()).expect("player should exist");
    assert_eq!(fetched.name(), "Alice");
    assert_eq!(fetched.email(), "alice@test.com");
    assert_eq!(fetched.stats().games_played(), 0);
}

#[test]
fn test_duplicate_email_rejected() {
    let registry = PlayerRegistry::new();
    registry
        .create("Alice".into(), "alice@test.com".into())
        .unwrap();
    let err = registry
        .create("Other Alice".into(), "alice@test.com".into())
        .unwrap_err();
    assert!(matches!(err, GameError::Validation(_)));
    assert_eq!(registry.count(), 1);
}

#[test]
fn test_update_player() {
    let registry = PlayerRegistry::new();
    let alice = registry
        .create("Alice".into(), "alice@test.com".into())
        .unwrap();
    let updated = registry
        .update(alice.id(), "Alicia".into(), "alicia@test.com".into())
        .unwrap();
    assert_eq!(updated.name(), "Alicia");
    assert_eq!(updated.email(), "alicia@test.com");
}

#[test]
fn test_update_unknown_player() {
    let registry = PlayerRegistry::new();
    let err = registry
        .update("nope", "X".into(), "x@test.com".into())
        .unwrap_err();
    assert!(matches!(err, GameError::PlayerNotFound(_)));
}

#[test]
fn test_update_to_taken_email_rejected() {
    let registry = PlayerRegistry::new();
    let alice = registry
        .create("Alice".into(), "alice@test.com".into())
        .unwrap();
    registry.create("Bob".into(), "bob@test.com".into()).unwrap();
    let err = registry
        .update(alice.id(), "Alice".into(), "bob@test.com".into())
        .unwrap_err();
    assert!(matches!(err, GameError::Validation(_)));
}

#[test]
fn test_update_keeping_own_email_allowed() {
    let registry = PlayerRegistry::new();
    let alice = registry
        .create("Alice".into(), "alice@test.com".into())
        .unwrap();
    let updated = registry
        .update(alice.id(), "Alicia".into(), "alice@test.com".into())
        .unwrap();
    assert_eq!(updated.name(), "Alicia");
}

#[test]
fn test_delete() {
    let registry = PlayerRegistry::new();
    let alice = registry
        .create("Alice".into(), "alice@test.com".into())
        .unwrap();
    assert!(registry.delete(alice.id()));
    assert!(!registry.delete(alice.id()));
    assert!(registry.get(alice.id()).is_none());
}

#[test]
fn test_search_by_name() {
    let registry = PlayerRegistry::new();
    registry
        .create("Alice".into(), "alice@test.com".into())
        .unwrap();
    registry
        .create("Alicia".into(), "alicia@test.com".into())
        .unwrap();
    registry.create("Bob".into(), "bob@test.com".into()).unwrap();

    assert_eq!(registry.search_by_name("ali").len(), 2);
    assert_eq!(registry.search_by_name("BOB").len(), 1);
    // Blank query returns everyone.
    assert_eq!(registry.search_by_name("  ").len(), 3);
}

#[test]
fn test_record_result_updates_counters() {
    let registry = PlayerRegistry::new();
    let alice = registry
        .create("Alice".into(), "alice@test.com".into())
        .unwrap();

    registry.record_result(alice.id(), GameOutcome::Won);
    registry.record_result(alice.id(), GameOutcome::Lost);
    registry.record_result(alice.id(), GameOutcome::Drawn);
    registry.add_move(alice.id());
    registry.add_move(alice.id());

    let stats = *registry.get(alice.id()).unwrap().stats();
    assert_eq!(stats.games_played(), 3);
    assert_eq!(stats.games_won(), 1);
    assert_eq!(stats.games_lost(), 1);
    assert_eq!(stats.games_drawn(), 1);
    assert_eq!(stats.total_moves(), 2);
}

#[test]
fn test_win_rate() {
    let registry = PlayerRegistry::new();
    let alice = registry
        .create("Alice".into(), "alice@test.com".into())
        .unwrap();
    assert_eq!(registry.get(alice.id()).unwrap().stats().win_rate(), 0.0);

    registry.record_result(alice.id(), GameOutcome::Won);
    registry.record_result(alice.id(), GameOutcome::Lost);
    assert_eq!(registry.get(alice.id()).unwrap().stats().win_rate(), 0.5);
}

#[test]
fn test_efficiency_is_infinite_without_wins() {
    let registry = PlayerRegistry::new();
    let alice = registry
        .create("Alice".into(), "alice@test.com".into())
        .unwrap();
    registry.add_move(alice.id());
    let stats = *registry.get(alice.id()).unwrap().stats();
    assert!(stats.efficiency().is_infinite());
}

#[test]
fn test_leaderboard_orders_by_win_rate_and_skips_unplayed() {
    let registry = PlayerRegistry::new();
    let alice = registry
        .create("Alice".into(), "alice@test.com".into())
        .unwrap();
    let bob = registry.create("Bob".into(), "bob@test.com".into()).unwrap();
    registry
        .create("Idle".into(), "idle@test.com".into())
        .unwrap();

    // Alice 1/2, Bob 1/1.
    registry.record_result(alice.id(), GameOutcome::Won);
    registry.record_result(alice.id(), GameOutcome::Lost);
    registry.record_result(bob.id(), GameOutcome::Won);

    let board = registry.leaderboard(10);
    assert_eq!(board.len(), 2);
    assert_eq!(board[0].id(), bob.id());
    assert_eq!(board[1].id(), alice.id());

    assert_eq!(registry.leaderboard(1).len(), 1);
}

#[test]
fn test_most_active_ordering() {
    let registry = PlayerRegistry::new();
    let alice = registry
        .create("Alice".into(), "alice@test.com".into())
        .unwrap();
    let bob = registry.create("Bob".into(), "bob@test.com".into()).unwrap();
    registry.record_result(bob.id(), GameOutcome::Drawn);
    registry.record_result(bob.id(), GameOutcome::Drawn);
    registry.record_result(alice.id(), GameOutcome::Drawn);

    let active = registry.most_active(10);
    assert_eq!(active[0].id(), bob.id());
}

#[test]
fn test_most_efficient_prefers_fewer_moves_per_win() {
    let registry = PlayerRegistry::new();
    let swift = registry
        .create("Swift".into(), "swift@test.com".into())
        .unwrap();
    let slow = registry
        .create("Slow".into(), "slow@test.com".into())
        .unwrap();
    let winless = registry
        .create("Winless".into(), "winless@test.com".into())
        .unwrap();

    registry.record_result(swift.id(), GameOutcome::Won);
    for _ in 0..3 {
        registry.add_move(swift.id());
    }
    registry.record_result(slow.id(), GameOutcome::Won);
    for _ in 0..9 {
        registry.add_move(slow.id());
    }
    registry.record_result(winless.id(), GameOutcome::Lost);
    registry.add_move(winless.id());

    let efficient = registry.most_efficient(10);
    assert_eq!(efficient.len(), 2);
    assert_eq!(efficient[0].id(), swift.id());
    assert_eq!(efficient[1].id(), slow.id());
}
