use std::sync::Arc;
use tokio::sync::Mutex;

use crate::engine::{BeautyOptions, RtcEngine};
use crate::errors::CastError;
use crate::events::{CastEvent, EventEmitter};
use crate::settings::Settings;

/// Controls for local media (microphone, camera, beautify filter).
///
/// Toggling updates local state, issues the matching engine call, and
/// emits an event so every listening surface stays in sync. Initial
/// state comes from [`Settings`] and is pushed to the engine when the
/// channel is joined.
#[derive(Clone)]
pub struct LocalControls {
    engine: Arc<dyn RtcEngine>,
    emitter: EventEmitter,
    mic_enabled: Arc<Mutex<bool>>,
    camera_enabled: Arc<Mutex<bool>>,
    beautify_enabled: Arc<Mutex<bool>>,
    beauty_options: Arc<Mutex<BeautyOptions>>,
}

impl LocalControls {
    pub fn new(engine: Arc<dyn RtcEngine>, emitter: EventEmitter, settings: &Settings) -> Self {
        Self {
            engine,
            emitter,
            mic_enabled: Arc::new(Mutex::new(settings.mic_enabled_on_join)),
            camera_enabled: Arc::new(Mutex::new(settings.camera_enabled_on_join)),
            beautify_enabled: Arc::new(Mutex::new(settings.beautify_on_join)),
            beauty_options: Arc::new(Mutex::new(settings.beauty_options)),
        }
    }

    /// Mute or unmute the local audio stream.
    pub async fn set_microphone_enabled(&self, enabled: bool) -> Result<(), CastError> {
        self.engine.mute_local_audio(!enabled)?;
        *self.mic_enabled.lock().await = enabled;
        tracing::info!("microphone enabled: {enabled}");
        self.emitter.emit(CastEvent::MicrophoneChanged { enabled });
        Ok(())
    }

    pub async fn toggle_microphone(&self) -> Result<bool, CastError> {
        let enabled = !self.is_microphone_enabled().await;
        self.set_microphone_enabled(enabled).await?;
        Ok(enabled)
    }

    /// Enable or disable local video capture.
    pub async fn set_camera_enabled(&self, enabled: bool) -> Result<(), CastError> {
        self.engine.enable_local_video(enabled)?;
        *self.camera_enabled.lock().await = enabled;
        tracing::info!("camera enabled: {enabled}");
        self.emitter.emit(CastEvent::CameraChanged { enabled });
        Ok(())
    }

    pub async fn toggle_camera(&self) -> Result<bool, CastError> {
        let enabled = !self.is_camera_enabled().await;
        self.set_camera_enabled(enabled).await?;
        Ok(enabled)
    }

    /// Turn the beautify effect on or off.
    ///
    /// Voice beautifier and face filter switch together; the UI
    /// exposes them as a single toggle.
    pub async fn set_beautify_enabled(&self, enabled: bool) -> Result<(), CastError> {
        let options = *self.beauty_options.lock().await;
        self.engine.set_voice_beautifier(enabled)?;
        self.engine.set_beauty_effect(enabled, &options)?;
        *self.beautify_enabled.lock().await = enabled;
        tracing::info!("beautify enabled: {enabled}");
        self.emitter.emit(CastEvent::BeautifyChanged { enabled });
        Ok(())
    }

    pub async fn toggle_beautify(&self) -> Result<bool, CastError> {
        let enabled = !self.is_beautify_enabled().await;
        self.set_beautify_enabled(enabled).await?;
        Ok(enabled)
    }

    /// Switch between front and back camera.
    pub async fn flip_camera(&self) -> Result<(), CastError> {
        self.engine.switch_camera()
    }

    pub async fn set_beauty_options(&self, options: BeautyOptions) -> Result<(), CastError> {
        *self.beauty_options.lock().await = options;
        // Re-apply immediately if the filter is live.
        if *self.beautify_enabled.lock().await {
            self.engine.set_beauty_effect(true, &options)?;
        }
        Ok(())
    }

    pub async fn is_microphone_enabled(&self) -> bool {
        *self.mic_enabled.lock().await
    }

    pub async fn is_camera_enabled(&self) -> bool {
        *self.camera_enabled.lock().await
    }

    pub async fn is_beautify_enabled(&self) -> bool {
        *self.beautify_enabled.lock().await
    }

    /// Push the current toggle state to the engine. Called once per
    /// join, after the engine accepts the channel.
    pub(crate) async fn apply_join_defaults(&self) -> Result<(), CastError> {
        self.engine.mute_local_audio(!*self.mic_enabled.lock().await)?;
        self.engine.enable_local_video(*self.camera_enabled.lock().await)?;
        if *self.beautify_enabled.lock().await {
            let options = *self.beauty_options.lock().await;
            self.engine.set_voice_beautifier(true)?;
            self.engine.set_beauty_effect(true, &options)?;
        }
        Ok(())
    }
}
