//! Per-visitor chat sessions.
//!
//! Sessions are created explicitly at session start and discarded at
//! session end. Each session carries its own lock: the store lock is held
//! only for map operations, and a turn locks just its own session, so one
//! visitor's slow turn never stalls another visitor's session or the
//! create/end paths.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;
use uuid::Uuid;

use portfolio_core::models::chat::ChatSession;

#[derive(Default)]
pub struct SessionStore {
    sessions: Mutex<HashMap<Uuid, Arc<Mutex<ChatSession>>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a fresh session and return its id.
    pub async fn create(&self) -> Uuid {
        let session = ChatSession::new();
        let id = session.id;
        self.sessions
            .lock()
            .await
            .insert(id, Arc::new(Mutex::new(session)));
        id
    }

    /// Discard a session. Returns whether it existed.
    pub async fn end(&self, id: Uuid) -> bool {
        self.sessions.lock().await.remove(&id).is_some()
    }

    /// Handle to one session, lockable independently of the store.
    pub async fn get(&self, id: Uuid) -> Option<Arc<Mutex<ChatSession>>> {
        self.sessions.lock().await.get(&id).cloned()
    }
}
