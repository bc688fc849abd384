//! Interactive browser sessions
//!
//! A long-lived page a caller drives across several calls. Sessions live in a
//! `SessionRegistry` owned by the caller and are addressed by an opaque
//! `SessionId`; there is no process-wide registry.

pub mod chromium;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, warn};
use uuid::Uuid;

pub use chromium::ChromiumSession;

use crate::render::RenderError;

/// Opaque session handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(Uuid);

impl SessionId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[async_trait]
pub trait InteractiveSession: Send {
    /// Navigate and return a short preview of the page text
    async fn navigate(&mut self, url: &str) -> Result<String, RenderError>;

    /// Readable text of the current page
    async fn get_text(&mut self) -> Result<String, RenderError>;

    /// Release the browser. Later calls fail.
    async fn close(&mut self) -> Result<(), RenderError>;
}

pub type SharedSession = Arc<Mutex<Box<dyn InteractiveSession>>>;

/// Sessions keyed by id, owned by whoever created the registry
#[derive(Default)]
pub struct SessionRegistry {
    sessions: Mutex<HashMap<SessionId, SharedSession>>,
}

impl SessionRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `session` under a fresh id
    pub async fn open(&self, session: Box<dyn InteractiveSession>) -> SessionId {
        let id = SessionId::new();
        self.sessions
            .lock()
            .await
            .insert(id, Arc::new(Mutex::new(session)));
        debug!("Opened session {}", id);
        id
    }

    pub async fn get(&self, id: SessionId) -> Option<SharedSession> {
        self.sessions.lock().await.get(&id).cloned()
    }

    /// Close and forget one session; `false` if the id is unknown
    pub async fn close(&self, id: SessionId) -> bool {
        let Some(session) = self.sessions.lock().await.remove(&id) else {
            return false;
        };
        if let Err(e) = session.lock().await.close().await {
            warn!("Failed to close session {}: {}", id, e);
        }
        true
    }

    /// Close every session
    pub async fn close_all(&self) {
        let drained: Vec<_> = self.sessions.lock().await.drain().collect();
        for (id, session) in drained {
            if let Err(e) = session.lock().await.close().await {
                warn!("Failed to close session {}: {}", id, e);
            }
        }
    }

    pub async fn len(&self) -> usize {
        self.sessions.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
