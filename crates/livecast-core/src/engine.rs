use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::UnboundedReceiver;

use crate::errors::CastError;
use crate::role::ClientRole;

/// Beauty filter parameters forwarded verbatim to the engine.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct BeautyOptions {
    pub lightening: f32,
    pub smoothness: f32,
    pub redness: f32,
}

impl Default for BeautyOptions {
    fn default() -> Self {
        Self {
            lightening: 0.7,
            smoothness: 0.5,
            redness: 0.1,
        }
    }
}

/// Callbacks surfaced by the RTC engine adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// Local join succeeded; `uid` is the engine-assigned id.
    JoinedChannel { uid: u32 },
    RemoteUserJoined { uid: u32 },
    RemoteUserLeft { uid: u32 },
    /// First decoded video frame for a remote user.
    RemoteVideoStarted { uid: u32 },
    RemoteVideoStopped { uid: u32 },
    ClientRoleChanged { role: ClientRole },
    TokenWillExpire,
    ConnectionLost,
}

/// Seam over the real-time media SDK.
///
/// Native shells implement this against the vendor SDK; the core never
/// links the SDK directly. Calls return immediately, results that
/// depend on the network come back as [`EngineEvent`]s on the receiver
/// handed out by [`join_channel`](RtcEngine::join_channel).
pub trait RtcEngine: Send + Sync {
    fn enable_video(&self) -> Result<(), CastError>;
    fn enable_local_video(&self, enabled: bool) -> Result<(), CastError>;
    fn mute_local_audio(&self, muted: bool) -> Result<(), CastError>;
    fn set_voice_beautifier(&self, enabled: bool) -> Result<(), CastError>;
    fn set_beauty_effect(&self, enabled: bool, options: &BeautyOptions) -> Result<(), CastError>;
    fn switch_camera(&self) -> Result<(), CastError>;
    fn set_client_role(&self, role: ClientRole) -> Result<(), CastError>;
    /// Bind the local preview surface for `uid` (0 before the engine
    /// assigns one).
    fn setup_local_video(&self, uid: u32) -> Result<(), CastError>;
    fn clear_local_video(&self) -> Result<(), CastError>;
    fn join_channel(
        &self,
        channel: &str,
        token: Option<&str>,
        uid: u32,
    ) -> Result<UnboundedReceiver<EngineEvent>, CastError>;
    fn leave_channel(&self) -> Result<(), CastError>;
    fn stop_preview(&self) -> Result<(), CastError>;
    fn renew_token(&self, token: &str) -> Result<(), CastError>;
}

/// Reports whether the app currently holds device media permissions.
/// The dialogs themselves are the host shell's business.
pub trait PermissionChecker: Send + Sync {
    fn has_av_permissions(&self) -> bool;
}
