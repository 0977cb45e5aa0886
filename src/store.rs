//! Concurrent registry of game sessions.
//!
//! The map lock is held only for insert/lookup/remove and snapshotting; each
//! session carries its own mutex, so operations on different sessions never
//! contend and mutations of one session are linearized.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};

use serde::Serialize;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::error::GameError;
use crate::session::{GameSession, GameStatus, SessionId};

/// Counts of sessions by status over a single consistent snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SessionStats {
    /// All sessions.
    pub total: usize,
    /// Sessions waiting for a second player.
    pub waiting: usize,
    /// Sessions in progress.
    pub active: usize,
    /// Sessions completed with a winner.
    pub completed: usize,
    /// Sessions ended in a draw.
    pub draw: usize,
}

/// Concurrent id-to-session registry.
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<SessionId, Arc<Mutex<GameSession>>>>>,
}

impl SessionStore {
    /// Creates an empty store.
    #[instrument]
    pub fn new() -> Self {
        info!("Creating session store");
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Creates a new waiting session with a fresh unique id and returns a
    /// snapshot of it.
    #[instrument(skip(self))]
    pub fn create(&self, name: String) -> GameSession {
        let id = Uuid::new_v4().to_string();
        let session = GameSession::new(id.clone(), name);
        let snapshot = session.clone();
        self.sessions
            .write()
            .unwrap()
            .insert(id.clone(), Arc::new(Mutex::new(session)));
        info!(session_id = %id, "Session created");
        snapshot
    }

    /// Returns a snapshot of the session with the given id.
    #[instrument(skip(self))]
    pub fn get(&self, id: &str) -> Option<GameSession> {
        let handle = self.handle(id)?;
        let session = handle.lock().unwrap().clone();
        Some(session)
    }

    /// Runs `f` against the session under its own lock and returns `f`'s
    /// result together with a post-mutation snapshot.
    ///
    /// Concurrent calls against the same id are serialized here; calls
    /// against different ids proceed independently.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::GameNotFound`] for an unknown id, or whatever
    /// `f` fails with (the session is left untouched in that case).
    pub fn with_session<T>(
        &self,
        id: &str,
        f: impl FnOnce(&mut GameSession) -> Result<T, GameError>,
    ) -> Result<(GameSession, T), GameError> {
        let handle = self
            .handle(id)
            .ok_or_else(|| GameError::GameNotFound("Game not found".into()))?;
        let mut session = handle.lock().unwrap();
        let value = f(&mut session)?;
        Ok((session.clone(), value))
    }

    /// Snapshots all sessions.
    #[instrument(skip(self))]
    pub fn list(&self) -> Vec<GameSession> {
        let handles: Vec<_> = self.sessions.read().unwrap().values().cloned().collect();
        handles
            .iter()
            .map(|h| h.lock().unwrap().clone())
            .collect()
    }

    /// Snapshots the sessions currently in the given status.
    #[instrument(skip(self))]
    pub fn list_by_status(&self, status: GameStatus) -> Vec<GameSession> {
        self.list()
            .into_iter()
            .filter(|s| s.status() == status)
            .collect()
    }

    /// Removes a session; returns whether anything was removed.
    #[instrument(skip(self))]
    pub fn delete(&self, id: &str) -> bool {
        let removed = self.sessions.write().unwrap().remove(id).is_some();
        info!(session_id = id, removed, "Session delete");
        removed
    }

    /// Counts sessions by status over one snapshot, so the per-status counts
    /// always sum to the total.
    #[instrument(skip(self))]
    pub fn stats(&self) -> SessionStats {
        let mut stats = SessionStats::default();
        for session in self.list() {
            stats.total += 1;
            match session.status() {
                GameStatus::Waiting => stats.waiting += 1,
                GameStatus::Active => stats.active += 1,
                GameStatus::Completed => stats.completed += 1,
                GameStatus::Draw => stats.draw += 1,
            }
        }
        debug!(total = stats.total, "Computed session stats");
        stats
    }

    fn handle(&self, id: &str) -> Option<Arc<Mutex<GameSession>>> {
        self.sessions.read().unwrap().get(id).cloned()
    }
}
