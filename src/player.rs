//! Player records, aggregate statistics, and the concurrent player registry.
//!
//! The game engine consumes players read-only through their ids and mutates
//! their statistics as a side effect of terminal game transitions. Everything
//! else here (CRUD, search, rankings) is a read-mostly projection over the
//! same registry.

use std::collections::HashMap;
use std::sync::RwLock;

use chrono::{DateTime, Utc};
use derive_getters::Getters;
use serde::Serialize;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::error::GameError;
use crate::session::PlayerId;

/// Aggregate per-player statistics, updated by the engine on terminal
/// transitions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PlayerStats {
    games_played: u32,
    games_won: u32,
    games_lost: u32,
    games_drawn: u32,
    total_moves: u32,
}

impl PlayerStats {
    /// Games played.
    pub fn games_played(&self) -> u32 {
        self.games_played
    }

    /// Games won.
    pub fn games_won(&self) -> u32 {
        self.games_won
    }

    /// Games lost.
    pub fn games_lost(&self) -> u32 {
        self.games_lost
    }

    /// Games drawn.
    pub fn games_drawn(&self) -> u32 {
        self.games_drawn
    }

    /// Total accepted moves across all games.
    pub fn total_moves(&self) -> u32 {
        self.total_moves
    }

    /// Fraction of played games won; 0.0 before any game is played.
    pub fn win_rate(&self) -> f64 {
        if self.games_played == 0 {
            0.0
        } else {
            f64::from(self.games_won) / f64::from(self.games_played)
        }
    }

    /// Average moves per won game; infinite for winless players so they
    /// always rank last in most-efficient orderings.
    pub fn efficiency(&self) -> f64 {
        if self.games_won == 0 {
            f64::INFINITY
        } else {
            f64::from(self.total_moves) / f64::from(self.games_won)
        }
    }
}

/// Outcome of a finished game from one player's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameOutcome {
    /// The player won.
    Won,
    /// The player lost.
    Lost,
    /// The game was drawn.
    Drawn,
}

/// A registered player.
#[derive(Debug, Clone, Getters, Serialize)]
pub struct Player {
    id: PlayerId,
    name: String,
    email: String,
    stats: PlayerStats,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Player {
    /// Creates a new player with a fresh id and zeroed statistics.
    #[instrument]
    pub fn new(name: String, email: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            email,
            stats: PlayerStats::default(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Concurrent registry of all players, keyed by id.
#[derive(Debug, Default)]
pub struct PlayerRegistry {
    players: RwLock<HashMap<PlayerId, Player>>,
}

impl PlayerRegistry {
    /// Creates an empty registry.
    #[instrument]
    pub fn new() -> Self {
        info!("Creating player registry");
        Self {
            players: RwLock::new(HashMap::new()),
        }
    }

    /// Creates a new player.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::Validation`] when the email is already taken.
    #[instrument(skip(self))]
    pub fn create(&self, name: String, email: String) -> Result<Player, GameError> {
        let mut players = self.players.write().unwrap();
        if players.values().any(|p| p.email == email) {
            warn!(email = %email, "Create rejected: email already registered");
            return Err(GameError::Validation(
                "Player with this email already exists".into(),
            ));
        }
        let player = Player::new(name, email);
        info!(player_id = %player.id, "Player created");
        players.insert(player.id.clone(), player.clone());
        Ok(player)
    }

    /// Gets a player by id.
    #[instrument(skip(self))]
    pub fn get(&self, id: &str) -> Option<Player> {
        let players = self.players.read().unwrap();
        let player = players.get(id).cloned();
        if player.is_none() {
            debug!(player_id = id, "Player not found");
        }
        player
    }

    /// Whether a player with the given id exists.
    pub fn contains(&self, id: &str) -> bool {
        self.players.read().unwrap().contains_key(id)
    }

    /// Lists all players.
    #[instrument(skip(self))]
    pub fn list(&self) -> Vec<Player> {
        self.players.read().unwrap().values().cloned().collect()
    }

    /// Number of registered players.
    pub fn count(&self) -> usize {
        self.players.read().unwrap().len()
    }

    /// Updates a player's name and email.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::PlayerNotFound`] for an unknown id and
    /// [`GameError::Validation`] when the new email belongs to another player.
    #[instrument(skip(self))]
    pub fn update(&self, id: &str, name: String, email: String) -> Result<Player, GameError> {
        let mut players = self.players.write().unwrap();
        if players
            .values()
            .any(|p| p.email == email && p.id != id)
        {
            warn!(email = %email, "Update rejected: email in use by another player");
            return Err(GameError::Validation(
                "Email already in use by another player".into(),
            ));
        }
        let player = players
            .get_mut(id)
            .ok_or_else(|| GameError::PlayerNotFound("Player not found".into()))?;
        player.name = name;
        player.email = email;
        player.updated_at = Utc::now();
        info!(player_id = id, "Player updated");
        Ok(player.clone())
    }

    /// Removes a player; returns whether anything was removed.
    #[instrument(skip(self))]
    pub fn delete(&self, id: &str) -> bool {
        let removed = self.players.write().unwrap().remove(id).is_some();
        info!(player_id = id, removed, "Player delete");
        removed
    }

    /// Case-insensitive substring search over player names. A blank query
    /// returns everyone.
    #[instrument(skip(self))]
    pub fn search_by_name(&self, query: &str) -> Vec<Player> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return self.list();
        }
        self.players
            .read()
            .unwrap()
            .values()
            .filter(|p| p.name.to_lowercase().contains(&query))
            .cloned()
            .collect()
    }

    /// Top players by win rate; players with no finished games are excluded.
    #[instrument(skip(self))]
    pub fn leaderboard(&self, limit: usize) -> Vec<Player> {
        let mut players: Vec<Player> = self
            .players
            .read()
            .unwrap()
            .values()
            .filter(|p| p.stats.games_played() > 0)
            .cloned()
            .collect();
        players.sort_by(|a, b| b.stats.win_rate().total_cmp(&a.stats.win_rate()));
        players.truncate(limit);
        players
    }

    /// Players ordered by games played, most active first.
    #[instrument(skip(self))]
    pub fn most_active(&self, limit: usize) -> Vec<Player> {
        let mut players = self.list();
        players.sort_by(|a, b| b.stats.games_played().cmp(&a.stats.games_played()));
        players.truncate(limit);
        players
    }

    /// Winners ordered by moves per win, fewest first. Winless players never
    /// appear (their efficiency is infinite).
    #[instrument(skip(self))]
    pub fn most_efficient(&self, limit: usize) -> Vec<Player> {
        let mut players: Vec<Player> = self
            .players
            .read()
            .unwrap()
            .values()
            .filter(|p| p.stats.games_won() > 0)
            .cloned()
            .collect();
        players.sort_by(|a, b| a.stats.efficiency().total_cmp(&b.stats.efficiency()));
        players.truncate(limit);
        players
    }

    /// Credits one accepted move to the player's cumulative move counter.
    #[instrument(skip(self))]
    pub fn add_move(&self, id: &str) {
        let mut players = self.players.write().unwrap();
        if let Some(player) = players.get_mut(id) {
            player.stats.total_moves += 1;
            player.updated_at = Utc::now();
        }
    }

    /// Records a finished game against the player's aggregate counters.
    #[instrument(skip(self))]
    pub fn record_result(&self, id: &str, outcome: GameOutcome) {
        let mut players = self.players.write().unwrap();
        let Some(player) = players.get_mut(id) else {
            // Deleted mid-game: the result has nowhere to land.
            debug!(player_id = id, "Result dropped, player no longer registered");
            return;
        };
        player.stats.games_played += 1;
        match outcome {
            GameOutcome::Won => player.stats.games_won += 1,
            GameOutcome::Lost => player.stats.games_lost += 1,
            GameOutcome::Drawn => player.stats.games_drawn += 1,
        }
        player.updated_at = Utc::now();
        info!(player_id = id, ?outcome, "Game result recorded");
    }
}
