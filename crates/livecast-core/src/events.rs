use std::sync::Arc;

use crate::layout::TilePlacement;
use crate::role::ClientRole;
use crate::tiles::TileInfo;

/// Events emitted by the core to native UI listeners.
#[derive(Debug, Clone)]
pub enum CastEvent {
    ConnectionStateChanged(ConnectionState),
    LocalJoined { uid: u32 },
    RemoteJoined { uid: u32 },
    RemoteLeft { uid: u32 },
    TileAdded(TileInfo),
    TileRemoved { uid: u32 },
    /// Fresh grid placements, recomputed whenever the tile set changes.
    LayoutChanged(Vec<TilePlacement>),
    MicrophoneChanged { enabled: bool },
    CameraChanged { enabled: bool },
    BeautifyChanged { enabled: bool },
    RoleChangePending { requested: ClientRole },
    RoleChanged { role: ClientRole },
    TokenWillExpire,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Joining,
    InChannel,
    Lost,
}

/// Trait for receiving events from the core.
/// Implementations must be Send + Sync (called from tokio tasks).
pub trait CastEventListener: Send + Sync {
    fn on_event(&self, event: CastEvent);
}

/// Internal event emitter that dispatches to registered listeners.
#[derive(Clone)]
pub struct EventEmitter {
    listeners: Arc<std::sync::RwLock<Vec<Arc<dyn CastEventListener>>>>,
}

impl EventEmitter {
    pub fn new() -> Self {
        Self {
            listeners: Arc::new(std::sync::RwLock::new(Vec::new())),
        }
    }

    pub fn add_listener(&self, listener: Arc<dyn CastEventListener>) {
        self.listeners.write().unwrap().push(listener);
    }

    pub fn emit(&self, event: CastEvent) {
        let listeners = self.listeners.read().unwrap();
        for listener in listeners.iter() {
            listener.on_event(event.clone());
        }
    }
}

impl Default for EventEmitter {
    fn default() -> Self {
        Self::new()
    }
}
