use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tokio::sync::mpsc::UnboundedReceiver;

use crate::controls::LocalControls;
use crate::engine::{EngineEvent, PermissionChecker, RtcEngine};
use crate::errors::CastError;
use crate::events::{CastEvent, CastEventListener, ConnectionState, EventEmitter};
use crate::layout::{self, TilePlacement, Viewport};
use crate::role::{ClientRole, RoleSwitcher};
use crate::settings::Settings;
use crate::tiles::{TileInfo, TileRegistry};

/// Parameters for joining a channel. Tokens are issued out of band and
/// handed in here; renewal goes through [`ChannelSession::renew_token`].
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ChannelConfig {
    pub channel_name: String,
    #[serde(default)]
    pub token: Option<String>,
    /// 0 lets the engine assign a uid; the chosen value arrives with
    /// `EngineEvent::JoinedChannel`.
    #[serde(default)]
    pub uid: u32,
}

/// Manages the lifecycle of one channel: join/leave, the engine event
/// loop, the tile set, and the grid layout derived from it.
///
/// The grid is recomputed synchronously on every tile-set change and
/// published as `CastEvent::LayoutChanged`; the rendering layer only
/// ever consumes rectangles.
pub struct ChannelSession {
    engine: Arc<dyn RtcEngine>,
    emitter: EventEmitter,
    tiles: Arc<Mutex<TileRegistry>>,
    viewport: Arc<Mutex<Option<Viewport>>>,
    connection_state: Arc<Mutex<ConnectionState>>,
    controls: LocalControls,
    roles: RoleSwitcher,
}

impl ChannelSession {
    pub fn new(
        engine: Arc<dyn RtcEngine>,
        permissions: Arc<dyn PermissionChecker>,
        settings: &Settings,
    ) -> Self {
        let emitter = EventEmitter::new();
        let controls = LocalControls::new(engine.clone(), emitter.clone(), settings);
        // Users enter hosting with live video; the toggle drops them
        // to the audience.
        let roles = RoleSwitcher::new(
            engine.clone(),
            permissions,
            emitter.clone(),
            ClientRole::Broadcaster,
        );
        Self {
            engine,
            emitter,
            tiles: Arc::new(Mutex::new(TileRegistry::new())),
            viewport: Arc::new(Mutex::new(None)),
            connection_state: Arc::new(Mutex::new(ConnectionState::Disconnected)),
            controls,
            roles,
        }
    }

    /// Register a listener for session events.
    pub fn add_listener(&self, listener: Arc<dyn CastEventListener>) {
        self.emitter.add_listener(listener);
    }

    /// Local media controls bound to this session.
    pub fn controls(&self) -> LocalControls {
        self.controls.clone()
    }

    /// Broadcaster/audience switching bound to this session.
    pub fn roles(&self) -> RoleSwitcher {
        self.roles.clone()
    }

    pub async fn connection_state(&self) -> ConnectionState {
        self.connection_state.lock().await.clone()
    }

    /// Snapshot of the current tiles, in display order.
    pub async fn tiles(&self) -> Vec<TileInfo> {
        self.tiles.lock().await.tiles().to_vec()
    }

    /// Tell the session how much screen space the tiles have.
    ///
    /// Recomputes the grid right away and emits `LayoutChanged`, so a
    /// rotation or window resize reflows without waiting for membership
    /// to change.
    pub async fn set_viewport(&self, viewport: Viewport) {
        *self.viewport.lock().await = Some(viewport);
        let tiles = self.tiles.lock().await;
        self.emitter
            .emit(CastEvent::LayoutChanged(layout::layout(tiles.tiles(), viewport)));
    }

    /// Current grid placements; empty until a viewport has been set.
    pub async fn current_layout(&self) -> Vec<TilePlacement> {
        let viewport = *self.viewport.lock().await;
        match viewport {
            Some(vp) => layout::layout(self.tiles.lock().await.tiles(), vp),
            None => Vec::new(),
        }
    }

    /// Join a channel: enable video, bind the local preview, hand the
    /// engine the channel credentials, and start consuming its events.
    ///
    /// The local tile appears once the engine confirms the join and
    /// assigns a uid.
    pub async fn join(&self, config: ChannelConfig) -> Result<(), CastError> {
        // Check and transition under one guard so concurrent joins
        // cannot both slip past the check.
        {
            let mut state = self.connection_state.lock().await;
            if *state != ConnectionState::Disconnected && *state != ConnectionState::Lost {
                return Err(CastError::Channel("already in a channel".into()));
            }
            *state = ConnectionState::Joining;
        }
        self.emitter.emit(CastEvent::ConnectionStateChanged(ConnectionState::Joining));

        let events = match self.prepare_and_join(&config).await {
            Ok(events) => events,
            Err(e) => {
                // Release the session so the join can be retried.
                self.set_connection_state(ConnectionState::Disconnected).await;
                return Err(e);
            }
        };

        tracing::info!("joining channel {}", config.channel_name);

        let emitter = self.emitter.clone();
        let tiles = self.tiles.clone();
        let viewport = self.viewport.clone();
        let connection_state = self.connection_state.clone();
        let roles = self.roles.clone();

        tokio::spawn(async move {
            Self::event_loop(events, emitter, tiles, viewport, connection_state, roles).await;
        });

        Ok(())
    }

    /// Engine-facing half of `join`. Toggle state is pushed before
    /// `join_channel` so a failure anywhere in here leaves the engine
    /// outside any channel.
    async fn prepare_and_join(
        &self,
        config: &ChannelConfig,
    ) -> Result<UnboundedReceiver<EngineEvent>, CastError> {
        self.engine.enable_video()?;
        self.engine.setup_local_video(config.uid)?;
        self.controls.apply_join_defaults().await?;
        self.engine
            .join_channel(&config.channel_name, config.token.as_deref(), config.uid)
    }

    /// Leave the channel and reset local state.
    pub async fn leave(&self) -> Result<(), CastError> {
        self.engine.clear_local_video()?;
        self.engine.leave_channel()?;
        if self.roles.role().await == ClientRole::Broadcaster {
            self.engine.stop_preview()?;
        }
        self.tiles.lock().await.clear();
        self.set_connection_state(ConnectionState::Disconnected).await;
        tracing::info!("left channel");
        Ok(())
    }

    /// Hand the engine a refreshed token before the current one expires.
    pub async fn renew_token(&self, token: &str) -> Result<(), CastError> {
        self.engine.renew_token(token)
    }

    async fn set_connection_state(&self, state: ConnectionState) {
        *self.connection_state.lock().await = state.clone();
        self.emitter.emit(CastEvent::ConnectionStateChanged(state));
    }

    /// Recompute and publish the grid. No-op until a viewport is known.
    async fn publish_layout(
        tiles: &Arc<Mutex<TileRegistry>>,
        viewport: &Arc<Mutex<Option<Viewport>>>,
        emitter: &EventEmitter,
    ) {
        if let Some(vp) = *viewport.lock().await {
            let tiles = tiles.lock().await;
            emitter.emit(CastEvent::LayoutChanged(layout::layout(tiles.tiles(), vp)));
        }
    }

    async fn event_loop(
        mut events: UnboundedReceiver<EngineEvent>,
        emitter: EventEmitter,
        tiles: Arc<Mutex<TileRegistry>>,
        viewport: Arc<Mutex<Option<Viewport>>>,
        connection_state: Arc<Mutex<ConnectionState>>,
        roles: RoleSwitcher,
    ) {
        while let Some(event) = events.recv().await {
            match event {
                EngineEvent::JoinedChannel { uid } => {
                    tracing::info!("joined channel as uid {uid}");
                    *connection_state.lock().await = ConnectionState::InChannel;
                    emitter.emit(CastEvent::ConnectionStateChanged(ConnectionState::InChannel));
                    emitter.emit(CastEvent::LocalJoined { uid });

                    let tile = TileInfo { uid, is_local: true };
                    let added = tiles.lock().await.add_tile(tile.clone());
                    if added {
                        emitter.emit(CastEvent::TileAdded(tile));
                        Self::publish_layout(&tiles, &viewport, &emitter).await;
                    }
                }

                EngineEvent::RemoteUserJoined { uid } => {
                    // No tile yet: it appears with the first decoded frame.
                    emitter.emit(CastEvent::RemoteJoined { uid });
                }

                EngineEvent::RemoteUserLeft { uid } => {
                    let removed = tiles.lock().await.remove_tile(uid);
                    if removed {
                        emitter.emit(CastEvent::TileRemoved { uid });
                        Self::publish_layout(&tiles, &viewport, &emitter).await;
                    }
                    emitter.emit(CastEvent::RemoteLeft { uid });
                }

                EngineEvent::RemoteVideoStarted { uid } => {
                    let tile = TileInfo { uid, is_local: false };
                    let added = tiles.lock().await.add_tile(tile.clone());
                    if added {
                        emitter.emit(CastEvent::TileAdded(tile));
                        Self::publish_layout(&tiles, &viewport, &emitter).await;
                    }
                }

                EngineEvent::RemoteVideoStopped { uid } => {
                    let removed = tiles.lock().await.remove_tile(uid);
                    if removed {
                        emitter.emit(CastEvent::TileRemoved { uid });
                        Self::publish_layout(&tiles, &viewport, &emitter).await;
                    }
                }

                EngineEvent::ClientRoleChanged { role } => {
                    roles.confirm(role).await;
                }

                EngineEvent::TokenWillExpire => {
                    tracing::warn!("channel token expires soon");
                    emitter.emit(CastEvent::TokenWillExpire);
                }

                EngineEvent::ConnectionLost => {
                    tracing::warn!("connection to channel lost");
                    *connection_state.lock().await = ConnectionState::Lost;
                    emitter.emit(CastEvent::ConnectionStateChanged(ConnectionState::Lost));
                }
            }
        }

        tracing::info!("channel event loop ended");
    }
}
