use std::sync::Arc;

use crate::devices::{AudioDeviceLists, AudioRoute, DeviceKind};
use crate::errors::BridgeError;
use crate::events::{BridgeEvent, DeviceChange, EventEmitter};
use crate::manager::{BridgeState, SharedState};
use crate::sdk::{AudioRouter, FocusOutcome, SdkError};

fn sdk_failure(operation: &'static str) -> impl FnOnce(SdkError) -> BridgeError {
    move |e| {
        tracing::warn!("{operation} failed: {e}");
        BridgeError::Sdk {
            operation,
            reason: e.0,
        }
    }
}

/// Audio commands for the active meeting plus OS-level audio routing.
///
/// Session-scoped commands check the session first, then call the
/// collaborator, then commit. A failed collaborator call commits nothing.
pub struct AudioControls {
    state: SharedState,
    emitter: EventEmitter,
    router: Arc<dyn AudioRouter>,
}

impl AudioControls {
    pub(crate) fn new(
        state: SharedState,
        emitter: EventEmitter,
        router: Arc<dyn AudioRouter>,
    ) -> Self {
        Self {
            state,
            emitter,
            router,
        }
    }

    pub async fn mute(&self) -> Result<bool, BridgeError> {
        self.set_muted(true).await
    }

    pub async fn unmute(&self) -> Result<bool, BridgeError> {
        self.set_muted(false).await
    }

    async fn set_muted(&self, muted: bool) -> Result<bool, BridgeError> {
        let mut state = self.state.lock().await;
        let facade = state.session.require_active()?.handle().facade.clone();

        if muted {
            facade.realtime_local_mute().map_err(sdk_failure("mute"))?;
        } else {
            facade.realtime_local_unmute().map_err(sdk_failure("unmute"))?;
        }
        state.session.set_muted(muted)?;

        tracing::info!("microphone muted: {muted}");
        self.emitter.emit(BridgeEvent::AudioStatusChanged { muted });
        Ok(true)
    }

    pub async fn is_muted(&self) -> Result<bool, BridgeError> {
        self.state.lock().await.session.current_mute()
    }

    /// Enumerate audio devices and replace the registry snapshot.
    pub async fn list_audio_devices(&self) -> Result<AudioDeviceLists, BridgeError> {
        let mut state = self.state.lock().await;
        let facade = state.session.require_active()?.handle().facade.clone();

        let devices = facade
            .list_audio_devices()
            .map_err(sdk_failure("list audio devices"))?;
        let BridgeState { session, devices: registry } = &mut *state;
        let lists = registry.refresh_from_media(devices);
        session.forget_unlisted_input(registry);

        tracing::debug!(
            "audio devices: {} input, {} output",
            lists.input_devices.len(),
            lists.output_devices.len()
        );
        Ok(lists)
    }

    /// Choose an input device from the last enumeration.
    pub async fn select_input_device(&self, device_id: &str) -> Result<bool, BridgeError> {
        let mut state = self.state.lock().await;
        let BridgeState { session, devices } = &mut *state;
        let facade = session.require_active()?.handle().facade.clone();

        let device = devices
            .find_by_id(device_id, DeviceKind::Input)
            .ok_or_else(|| BridgeError::DeviceNotFound(device_id.to_string()))
            .inspect_err(|e| tracing::warn!("{e}"))?;
        facade
            .choose_audio_device(device.media_device())
            .map_err(sdk_failure("choose audio device"))?;
        session.set_input_device(device_id.to_string())?;

        tracing::info!("audio input device: {device_id}");
        self.emitter
            .emit(BridgeEvent::DeviceChanged(DeviceChange::Input(device_id.to_string())));
        Ok(true)
    }

    /// Route output through the OS audio subsystem.
    pub async fn select_output_device(&self, route_name: &str) -> Result<bool, BridgeError> {
        let mut state = self.state.lock().await;
        state.session.require_active()?;

        let route: AudioRoute = route_name
            .parse()
            .inspect_err(|e| tracing::warn!("{e}"))?;
        self.router.set_route(route).map_err(|e| {
            tracing::warn!("audio route {route} failed: {e}");
            BridgeError::AudioRoute(e.0)
        })?;
        state.session.set_output_route(route)?;

        tracing::info!("audio output route: {route}");
        self.emitter
            .emit(BridgeEvent::DeviceChanged(DeviceChange::Output(route)));
        Ok(true)
    }

    /// Switch the OS into voice-communication mode. Works without a meeting.
    pub async fn start_audio_session(&self) -> Result<bool, BridgeError> {
        self.router
            .set_communication_mode(true)
            .map_err(|e| BridgeError::AudioSession(format!("failed to start audio session: {e}")))?;
        tracing::info!("audio session started");
        Ok(true)
    }

    pub async fn stop_audio_session(&self) -> Result<bool, BridgeError> {
        self.router
            .set_communication_mode(false)
            .map_err(|e| BridgeError::AudioSession(format!("failed to stop audio session: {e}")))?;
        tracing::info!("audio session stopped");
        Ok(true)
    }

    /// Ask the OS for voice-call audio focus. Not retried.
    pub async fn request_audio_focus(&self) -> Result<FocusOutcome, BridgeError> {
        let outcome = self
            .router
            .request_audio_focus()
            .map_err(|e| BridgeError::AudioFocus(e.0))?;
        tracing::info!("audio focus: {outcome:?}");
        Ok(outcome)
    }
}
