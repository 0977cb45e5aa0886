//! Game session state machine.
//!
//! A [`GameSession`] owns one game's mutable state (board, seats, turn,
//! status) and enforces every legal-move and turn-order invariant. All
//! mutation goes through [`GameSession::join`] and [`GameSession::make_move`];
//! a rejected operation leaves the session untouched.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::board::{Board, Mark};
use crate::error::GameError;

/// Unique identifier for a game session.
pub type SessionId = String;

/// Unique identifier for a player.
pub type PlayerId = String;

/// Lifecycle status of a session.
///
/// `Completed` and `Draw` are terminal: a session never accepts another join
/// or move after reaching either.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, strum::Display, strum::EnumString,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum GameStatus {
    /// Fewer than two players have joined.
    Waiting,
    /// Both seats are filled and the game is in progress.
    Active,
    /// The game ended with a winner.
    Completed,
    /// The game ended with a full board and no winner.
    Draw,
}

impl GameStatus {
    /// Whether this status accepts no further mutation.
    pub fn is_terminal(self) -> bool {
        matches!(self, GameStatus::Completed | GameStatus::Draw)
    }
}

/// Result of an accepted move, carrying what the caller needs to apply
/// statistics side effects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Game continues; the turn passed to the other player.
    Continue,
    /// The move completed a winning line.
    Won {
        /// The player who made the winning move.
        winner: PlayerId,
        /// The other joined player.
        loser: PlayerId,
    },
    /// The move filled the board with no winning line.
    Draw {
        /// Both joined players, in turn order.
        players: [PlayerId; 2],
    },
}

/// One game instance: board, seats, turn pointer, and status.
#[derive(Debug, Clone, Serialize)]
pub struct GameSession {
    id: SessionId,
    name: String,
    status: GameStatus,
    board: Board,
    players: Vec<PlayerId>,
    current_player: Option<PlayerId>,
    winner: Option<PlayerId>,
    move_count: u32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl GameSession {
    /// Creates a new session in `Waiting` status with an empty board.
    #[instrument(skip(id, name), fields(session_id = %id))]
    pub fn new(id: SessionId, name: String) -> Self {
        let now = Utc::now();
        info!(name = %name, "Creating game session");
        Self {
            id,
            name,
            status: GameStatus::Waiting,
            board: Board::new(),
            players: Vec::new(),
            current_player: None,
            winner: None,
            move_count: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Seats a player in the session.
    ///
    /// The second join transitions `Waiting` to `Active` and gives the turn
    /// to the first-joined player, who plays X.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::InvalidState`] when the session is terminal, both
    /// seats are taken, or the player already joined.
    #[instrument(skip(self), fields(session_id = %self.id))]
    pub fn join(&mut self, player_id: PlayerId) -> Result<(), GameError> {
        if self.status.is_terminal() {
            warn!(player_id = %player_id, status = %self.status, "Join rejected: game over");
            return Err(GameError::InvalidState("Game is over".into()));
        }
        if self.players.len() >= 2 {
            warn!(player_id = %player_id, "Join rejected: game is full");
            return Err(GameError::InvalidState("Game is full".into()));
        }
        if self.players.contains(&player_id) {
            warn!(player_id = %player_id, "Join rejected: already in game");
            return Err(GameError::InvalidState("Already in game".into()));
        }

        self.players.push(player_id.clone());
        if self.players.len() == 2 {
            self.status = GameStatus::Active;
            self.current_player = Some(self.players[0].clone());
            info!("Both seats filled, game is active");
        }
        self.updated_at = Utc::now();
        info!(player_id = %player_id, seats = self.players.len(), "Player joined");
        Ok(())
    }

    /// Places the mover's mark at `position` (0-8) and advances the state
    /// machine.
    ///
    /// Termination is evaluated win-first: a full board whose final move
    /// completes a line is a win, not a draw. On a non-terminal move the turn
    /// passes to the other player.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::InvalidState`] when the session is not active,
    /// and [`GameError::InvalidMove`] when it is not the mover's turn or the
    /// target square is out of range or occupied. Failures never mutate the
    /// session.
    #[instrument(skip(self), fields(session_id = %self.id))]
    pub fn make_move(
        &mut self,
        player_id: &str,
        position: usize,
    ) -> Result<MoveOutcome, GameError> {
        if self.status != GameStatus::Active {
            warn!(player_id, status = %self.status, "Move rejected: game not active");
            return Err(GameError::InvalidState("Game not active".into()));
        }
        if self.current_player.as_deref() != Some(player_id) {
            warn!(player_id, "Move rejected: not this player's turn");
            return Err(GameError::InvalidMove("Not your turn".into()));
        }
        if position >= 9 {
            warn!(player_id, position, "Move rejected: position out of range");
            return Err(GameError::InvalidMove("Invalid position".into()));
        }
        if !self.board.is_empty(position) {
            warn!(player_id, position, "Move rejected: square occupied");
            return Err(GameError::InvalidMove("Square occupied".into()));
        }

        // A current player is always seated while active.
        let mark = self
            .mark_of(player_id)
            .ok_or_else(|| GameError::InvalidMove("Not your turn".into()))?;
        self.board.place(position, mark);
        self.move_count += 1;
        self.updated_at = Utc::now();

        let outcome = if self.board.has_win(mark) {
            self.status = GameStatus::Completed;
            self.winner = Some(player_id.to_string());
            let loser = self.other_player(player_id);
            info!(winner = %player_id, position, "Game completed with a winner");
            MoveOutcome::Won {
                winner: player_id.to_string(),
                loser,
            }
        } else if self.board.is_full() {
            self.status = GameStatus::Draw;
            info!(position, "Game ended in a draw");
            MoveOutcome::Draw {
                players: [self.players[0].clone(), self.players[1].clone()],
            }
        } else {
            let next = self.other_player(player_id);
            self.current_player = Some(next);
            MoveOutcome::Continue
        };

        Ok(outcome)
    }

    /// Returns the mark a seated player uses: first joiner plays X.
    pub fn mark_of(&self, player_id: &str) -> Option<Mark> {
        match self.players.iter().position(|p| p == player_id) {
            Some(0) => Some(Mark::X),
            Some(_) => Some(Mark::O),
            None => None,
        }
    }

    fn other_player(&self, player_id: &str) -> PlayerId {
        self.players
            .iter()
            .find(|p| p.as_str() != player_id)
            .cloned()
            .unwrap_or_else(|| player_id.to_string())
    }

    /// Returns the session id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the current status.
    pub fn status(&self) -> GameStatus {
        self.status
    }

    /// Returns the board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Returns the seated players in turn order.
    pub fn players(&self) -> &[PlayerId] {
        &self.players
    }

    /// Returns the player whose turn it is, while the game is active.
    pub fn current_player(&self) -> Option<&str> {
        self.current_player.as_deref()
    }

    /// Returns the winner, once the game is completed.
    pub fn winner(&self) -> Option<&str> {
        self.winner.as_deref()
    }

    /// Returns the number of accepted moves.
    pub fn move_count(&self) -> u32 {
        self.move_count
    }

    /// Returns the creation timestamp.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the last-mutation timestamp.
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}
