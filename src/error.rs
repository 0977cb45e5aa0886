//! Error taxonomy for game operations.

use derive_more::Display;

/// Error returned by game operations.
///
/// Callers match on the variant to choose a response; the message is advisory
/// only and never part of the contract.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum GameError {
    /// No game exists with the given id.
    #[display("Game not found: {_0}")]
    GameNotFound(String),

    /// No player exists with the given id.
    #[display("Player not found: {_0}")]
    PlayerNotFound(String),

    /// The operation is not legal in the game's current status.
    #[display("Invalid game state: {_0}")]
    InvalidState(String),

    /// The game is in a legal state but the action itself is illegal
    /// (wrong turn, out-of-range or occupied square).
    #[display("Invalid move: {_0}")]
    InvalidMove(String),

    /// The supplied input failed validation (bad name, duplicate email).
    #[display("Validation failed: {_0}")]
    Validation(String),
}

impl std::error::Error for GameError {}
