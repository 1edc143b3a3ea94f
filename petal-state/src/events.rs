//! State event definitions for UI forwarding
//!
//! Containers publish events on a broadcast channel; the embedding UI
//! subscribes and decides presentation. User-visible success/failure
//! notices for discrete actions travel the same channel.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Severity of a user-visible notice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoticeLevel {
    Success,
    Error,
}

/// One-shot user-visible notification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    pub message: String,
}

impl Notice {
    pub fn success(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            title: title.into(),
            message: message.into(),
        }
    }

    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            title: title.into(),
            message: message.into(),
        }
    }
}

/// Events published by the state containers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StateEvent {
    /// Cart lines changed; re-read the container's derived state
    CartUpdated,
    /// Wishlist entries changed
    WishlistUpdated,
    /// One-shot user-visible notice
    Notice(Notice),
}

/// Broadcast channel handle shared by the containers
#[derive(Debug, Clone)]
pub struct StateEvents {
    tx: broadcast::Sender<StateEvent>,
}

impl StateEvents {
    /// Create a channel with the given buffer capacity
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Subscribe to state events
    pub fn subscribe(&self) -> broadcast::Receiver<StateEvent> {
        self.tx.subscribe()
    }

    /// Publish an event; having no subscribers is not an error
    pub fn emit(&self, event: StateEvent) {
        let _ = self.tx.send(event);
    }

    /// Publish a user-visible notice
    pub fn notify(&self, notice: Notice) {
        self.emit(StateEvent::Notice(notice));
    }
}

impl Default for StateEvents {
    fn default() -> Self {
        Self::new(64)
    }
}
