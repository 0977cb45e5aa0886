//! Tests for the game service facade and its statistics side effects.

use std::sync::Arc;

use gridmatch::{GameError, GameService, GameStatus, PlayerRegistry};

fn service() -> GameService {
    GameService::new(Arc::new(PlayerRegistry::new()))
}

fn two_players(service: &GameService) -> (String, String) {
    let alice = service
        .players()
        .create("Alice".into(), "alice@test.com".into())
        .unwrap();
    let bob = service
        .players()
        .create("Bob".into(), "bob@test.com".into())
        .unwrap();
    (alice.id().to_string(), bob.id().to_string())
}

#[test]
fn test_create_and_find_game() {
    let service = service();
    let game = service.create_game("Lunch break".into());
    let found = service.find_game(game.id()).expect("game should exist");
    assert_eq!(found.name(), "Lunch break");
    assert_eq!(found.status(), GameStatus::Waiting);
}

#[test]
fn test_join_unknown_game() {
    let service = service();
    let (alice, _) = two_players(&service);
    let err = service.join_game("nope", &alice).unwrap_err();
    assert!(matches!(err, GameError::GameNotFound(_)));
}

#[test]
fn test_join_unknown_player() {
    let service = service();
    let game = service.create_game("g".into());
    let err = service.join_game(game.id(), "nope").unwrap_err();
    assert!(matches!(err, GameError::PlayerNotFound(_)));
}

#[test]
fn test_join_flow_activates_game() {
    let service = service();
    let (alice, bob) = two_players(&service);
    let game = service.create_game("g".into());

    let after_first = service.join_game(game.id(), &alice).unwrap();
    assert_eq!(after_first.status(), GameStatus::Waiting);

    let after_second = service.join_game(game.id(), &bob).unwrap();
    assert_eq!(after_second.status(), GameStatus::Active);
    assert_eq!(after_second.current_player(), Some(alice.as_str()));
}

#[test]
fn test_move_by_unknown_player() {
    let service = service();
    let game = service.create_game("g".into());
    let err = service.make_move(game.id(), "nope", 0, 0).unwrap_err();
    assert!(matches!(err, GameError::PlayerNotFound(_)));
}

#[test]
fn test_win_records_stats_for_both_players() {
    let service = service();
    let (alice, bob) = two_players(&service);
    let game = service.create_game("g".into());
    service.join_game(game.id(), &alice).unwrap();
    service.join_game(game.id(), &bob).unwrap();

    // Alice takes the top row; Bob answers in the middle and bottom.
    service.make_move(game.id(), &alice, 0, 0).unwrap();
    service.make_move(game.id(), &bob, 1, 1).unwrap();
    service.make_move(game.id(), &alice, 0, 1).unwrap();
    service.make_move(game.id(), &bob, 2, 2).unwrap();
    let finished = service.make_move(game.id(), &alice, 0, 2).unwrap();

    assert_eq!(finished.status(), GameStatus::Completed);
    assert_eq!(finished.winner(), Some(alice.as_str()));

    let alice_stats = *service.players().get(&alice).unwrap().stats();
    assert_eq!(alice_stats.games_played(), 1);
    assert_eq!(alice_stats.games_won(), 1);
    assert_eq!(alice_stats.total_moves(), 3);

    let bob_stats = *service.players().get(&bob).unwrap().stats();
    assert_eq!(bob_stats.games_played(), 1);
    assert_eq!(bob_stats.games_lost(), 1);
    assert_eq!(bob_stats.total_moves(), 2);
}

#[test]
fn test_draw_records_stats_for_both_players() {
    let service = service();
    let (alice, bob) = two_players(&service);
    let game = service.create_game("g".into());
    service.join_game(game.id(), &alice).unwrap();
    service.join_game(game.id(), &bob).unwrap();

    for (player, row, col) in [
        (&alice, 0, 0),
        (&bob, 0, 1),
        (&alice, 0, 2),
        (&bob, 1, 1),
        (&alice, 1, 0),
        (&bob, 1, 2),
        (&alice, 2, 1),
        (&bob, 2, 0),
    ] {
        service.make_move(game.id(), player, row, col).unwrap();
    }
    let finished = service.make_move(game.id(), &alice, 2, 2).unwrap();

    assert_eq!(finished.status(), GameStatus::Draw);
    assert_eq!(finished.winner(), None);
    for id in [&alice, &bob] {
        let stats = *service.players().get(id).unwrap().stats();
        assert_eq!(stats.games_played(), 1);
        assert_eq!(stats.games_drawn(), 1);
    }
}

#[test]
fn test_rejected_move_does_not_touch_stats() {
    let service = service();
    let (alice, bob) = two_players(&service);
    let game = service.create_game("g".into());
    service.join_game(game.id(), &alice).unwrap();
    service.join_game(game.id(), &bob).unwrap();

    // Bob moves out of turn.
    let err = service.make_move(game.id(), &bob, 0, 0).unwrap_err();
    assert!(matches!(err, GameError::InvalidMove(_)));
    let bob_stats = *service.players().get(&bob).unwrap().stats();
    assert_eq!(bob_stats.total_moves(), 0);
}

#[test]
fn test_games_by_status_and_stats() {
    let service = service();
    let (alice, bob) = two_players(&service);
    service.create_game("waiting".into());
    let active = service.create_game("active".into());
    service.join_game(active.id(), &alice).unwrap();
    service.join_game(active.id(), &bob).unwrap();

    assert_eq!(service.games_by_status(GameStatus::Waiting).len(), 1);
    assert_eq!(service.games_by_status(GameStatus::Active).len(), 1);

    let stats = service.game_stats();
    assert_eq!(stats.total, 2);
    assert_eq!(stats.waiting, 1);
    assert_eq!(stats.active, 1);
}

#[test]
fn test_delete_game() {
    let service = service();
    let game = service.create_game("gone".into());
    assert!(service.delete_game(game.id()));
    assert!(!service.delete_game(game.id()));
    assert!(service.find_game(game.id()).is_none());
}
