use std::sync::Arc;
use tokio::sync::Mutex;

use crate::engine::{PermissionChecker, RtcEngine};
use crate::errors::CastError;
use crate::events::{CastEvent, EventEmitter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientRole {
    Broadcaster,
    Audience,
}

impl ClientRole {
    pub fn other(self) -> Self {
        match self {
            ClientRole::Broadcaster => ClientRole::Audience,
            ClientRole::Audience => ClientRole::Broadcaster,
        }
    }
}

/// Switches the local user between broadcasting and watching.
///
/// A switch needs mic + camera access and is asynchronous on the engine
/// side: `toggle` requests it, and the engine confirms through
/// `EngineEvent::ClientRoleChanged` routed here by the channel event
/// loop. While a switch is in flight further toggles are refused, the
/// moral equivalent of the host button staying disabled until the
/// engine reports back.
#[derive(Clone)]
pub struct RoleSwitcher {
    engine: Arc<dyn RtcEngine>,
    permissions: Arc<dyn PermissionChecker>,
    emitter: EventEmitter,
    role: Arc<Mutex<ClientRole>>,
    pending: Arc<Mutex<Option<ClientRole>>>,
}

impl RoleSwitcher {
    pub fn new(
        engine: Arc<dyn RtcEngine>,
        permissions: Arc<dyn PermissionChecker>,
        emitter: EventEmitter,
        initial: ClientRole,
    ) -> Self {
        Self {
            engine,
            permissions,
            emitter,
            role: Arc::new(Mutex::new(initial)),
            pending: Arc::new(Mutex::new(None)),
        }
    }

    pub async fn role(&self) -> ClientRole {
        *self.role.lock().await
    }

    pub async fn is_switch_pending(&self) -> bool {
        self.pending.lock().await.is_some()
    }

    /// Request a switch to the opposite role.
    ///
    /// Returns the requested role; the switch only takes effect once
    /// the engine confirms it.
    pub async fn toggle(&self) -> Result<ClientRole, CastError> {
        if !self.permissions.has_av_permissions() {
            return Err(CastError::Permission(
                "microphone and camera access required to broadcast".into(),
            ));
        }

        let mut pending = self.pending.lock().await;
        if pending.is_some() {
            return Err(CastError::RoleSwitchPending);
        }

        let target = self.role.lock().await.other();
        self.engine.set_client_role(target)?;
        *pending = Some(target);

        tracing::info!("role switch requested: {target:?}");
        self.emitter.emit(CastEvent::RoleChangePending { requested: target });
        Ok(target)
    }

    /// Engine confirmation, routed in by the channel event loop.
    pub(crate) async fn confirm(&self, role: ClientRole) {
        *self.role.lock().await = role;
        *self.pending.lock().await = None;
        tracing::info!("role change confirmed: {role:?}");
        self.emitter.emit(CastEvent::RoleChanged { role });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::test_support::{DeniedPermissions, GrantedPermissions, MockEngine};

    fn switcher(engine: Arc<MockEngine>, granted: bool) -> RoleSwitcher {
        let permissions: Arc<dyn PermissionChecker> = if granted {
            Arc::new(GrantedPermissions)
        } else {
            Arc::new(DeniedPermissions)
        };
        RoleSwitcher::new(engine, permissions, EventEmitter::new(), ClientRole::Broadcaster)
    }

    #[tokio::test]
    async fn toggle_requests_opposite_role() {
        let engine = Arc::new(MockEngine::new());
        let roles = switcher(engine.clone(), true);

        let requested = roles.toggle().await.unwrap();
        assert_eq!(requested, ClientRole::Audience);
        assert!(roles.is_switch_pending().await);
        // Not applied until the engine confirms.
        assert_eq!(roles.role().await, ClientRole::Broadcaster);
        assert_eq!(engine.calls(), vec!["set_client_role(Audience)".to_string()]);
    }

    #[tokio::test]
    async fn confirm_applies_role_and_clears_pending() {
        let engine = Arc::new(MockEngine::new());
        let roles = switcher(engine, true);

        roles.toggle().await.unwrap();
        roles.confirm(ClientRole::Audience).await;

        assert_eq!(roles.role().await, ClientRole::Audience);
        assert!(!roles.is_switch_pending().await);
    }

    #[tokio::test]
    async fn second_toggle_refused_while_pending() {
        let engine = Arc::new(MockEngine::new());
        let roles = switcher(engine, true);

        roles.toggle().await.unwrap();
        let err = roles.toggle().await.unwrap_err();
        assert!(matches!(err, CastError::RoleSwitchPending));
    }

    #[tokio::test]
    async fn toggle_again_after_confirmation() {
        let engine = Arc::new(MockEngine::new());
        let roles = switcher(engine, true);

        roles.toggle().await.unwrap();
        roles.confirm(ClientRole::Audience).await;
        let requested = roles.toggle().await.unwrap();
        assert_eq!(requested, ClientRole::Broadcaster);
    }

    #[tokio::test]
    async fn toggle_denied_without_permissions() {
        let engine = Arc::new(MockEngine::new());
        let roles = switcher(engine.clone(), false);

        let err = roles.toggle().await.unwrap_err();
        assert!(matches!(err, CastError::Permission(_)));
        assert!(!roles.is_switch_pending().await);
        assert!(engine.calls().is_empty());
    }
}
