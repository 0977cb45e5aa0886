//! Game service facade tying the session store and player registry together.
//!
//! Callers resolve sessions and players by id; the service runs the session
//! operation under the session's own lock and applies statistics side effects
//! to the registry afterwards. Sessions hold player ids only, never player
//! records.

use std::sync::Arc;

use tracing::{info, instrument};

use crate::error::GameError;
use crate::player::{GameOutcome, PlayerRegistry};
use crate::session::{GameSession, GameStatus, MoveOutcome};
use crate::store::{SessionStore, SessionStats};

/// Service layer for game operations.
#[derive(Debug, Clone)]
pub struct GameService {
    store: SessionStore,
    players: Arc<PlayerRegistry>,
}

impl GameService {
    /// Creates a service over a fresh store and the given player registry.
    #[instrument(skip(players))]
    pub fn new(players: Arc<PlayerRegistry>) -> Self {
        info!("Creating game service");
        Self {
            store: SessionStore::new(),
            players,
        }
    }

    /// Returns the player registry this service records statistics into.
    pub fn players(&self) -> &Arc<PlayerRegistry> {
        &self.players
    }

    /// Creates a new waiting game.
    #[instrument(skip(self))]
    pub fn create_game(&self, name: String) -> GameSession {
        self.store.create(name)
    }

    /// Looks up a game by id.
    #[instrument(skip(self))]
    pub fn find_game(&self, id: &str) -> Option<GameSession> {
        self.store.get(id)
    }

    /// Snapshots all games.
    #[instrument(skip(self))]
    pub fn list_games(&self) -> Vec<GameSession> {
        self.store.list()
    }

    /// Snapshots the games currently in the given status.
    #[instrument(skip(self))]
    pub fn games_by_status(&self, status: GameStatus) -> Vec<GameSession> {
        self.store.list_by_status(status)
    }

    /// Seats a player in a game.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::GameNotFound`] or [`GameError::PlayerNotFound`]
    /// for unresolved ids, and [`GameError::InvalidState`] when the game
    /// cannot accept the join.
    #[instrument(skip(self))]
    pub fn join_game(&self, game_id: &str, player_id: &str) -> Result<GameSession, GameError> {
        if !self.players.contains(player_id) {
            return Err(GameError::PlayerNotFound("Player not found".into()));
        }
        let (session, ()) = self
            .store
            .with_session(game_id, |session| session.join(player_id.to_string()))?;
        Ok(session)
    }

    /// Makes a move at `(row, col)` for the given player.
    ///
    /// Every accepted move credits the mover's cumulative move counter; a
    /// terminal move additionally records win/loss or draw results for both
    /// players.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::GameNotFound`] or [`GameError::PlayerNotFound`]
    /// for unresolved ids, [`GameError::InvalidState`] when the game is not
    /// active, and [`GameError::InvalidMove`] for an out-of-turn or illegal
    /// placement.
    #[instrument(skip(self))]
    pub fn make_move(
        &self,
        game_id: &str,
        player_id: &str,
        row: usize,
        col: usize,
    ) -> Result<GameSession, GameError> {
        if !self.players.contains(player_id) {
            return Err(GameError::PlayerNotFound("Player not found".into()));
        }
        let position = row * 3 + col;
        let (session, outcome) = self
            .store
            .with_session(game_id, |session| session.make_move(player_id, position))?;

        self.players.add_move(player_id);
        match outcome {
            MoveOutcome::Continue => {}
            MoveOutcome::Won { winner, loser } => {
                self.players.record_result(&winner, GameOutcome::Won);
                self.players.record_result(&loser, GameOutcome::Lost);
            }
            MoveOutcome::Draw { players } => {
                for id in &players {
                    self.players.record_result(id, GameOutcome::Drawn);
                }
            }
        }
        Ok(session)
    }

    /// Deletes a game; returns whether anything was removed.
    #[instrument(skip(self))]
    pub fn delete_game(&self, id: &str) -> bool {
        self.store.delete(id)
    }

    /// Aggregate session counts by status.
    #[instrument(skip(self))]
    pub fn game_stats(&self) -> SessionStats {
        self.store.stats()
    }
}
