//! Gridmatch - in-memory turn-based game session engine and HTTP server.
//!
//! # Architecture
//!
//! - **Board**: pure 3x3 value type with win/draw detection
//! - **Session**: the game state machine enforcing seat, turn, and
//!   termination invariants
//! - **Store**: concurrent session registry with one lock per session
//! - **Players**: registry of player records and aggregate statistics
//! - **Service**: facade wiring the store and registry together
//! - **Http**: axum boundary layer with admission control
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use gridmatch::{GameService, GameStatus, PlayerRegistry};
//!
//! let players = Arc::new(PlayerRegistry::new());
//! let service = GameService::new(players.clone());
//!
//! let alice = players.create("Alice".into(), "alice@example.com".into()).unwrap();
//! let bob = players.create("Bob".into(), "bob@example.com".into()).unwrap();
//!
//! let game = service.create_game("Friday match".into());
//! service.join_game(game.id(), alice.id()).unwrap();
//! let game = service.join_game(game.id(), bob.id()).unwrap();
//! assert_eq!(game.status(), GameStatus::Active);
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod board;
mod error;
mod session;
mod store;

// Public module declarations (boundary + wiring)
pub mod cli;
pub mod http;
pub mod player;
pub mod rate_limit;
pub mod service;

// Crate-level exports - Board types
pub use board::{Board, Mark, Square};

// Crate-level exports - Errors
pub use error::GameError;

// Crate-level exports - Session state machine
pub use session::{GameSession, GameStatus, MoveOutcome, PlayerId, SessionId};

// Crate-level exports - Session store
pub use store::{SessionStats, SessionStore};

// Crate-level exports - Players
pub use player::{GameOutcome, Player, PlayerRegistry, PlayerStats};

// Crate-level exports - Service facade
pub use service::GameService;
