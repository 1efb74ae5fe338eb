//! Capability surface of the external collaborators.
//!
//! The conferencing SDK and the OS audio subsystem are native components.
//! The core only talks to them through these traits, so platform shells plug
//! in real implementations and tests plug in fakes.

use std::sync::Arc;

use thiserror::Error;

use crate::devices::AudioRoute;
use crate::meeting::MeetingSessionConfiguration;

/// Failure reported by a native collaborator, carrying its message verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct SdkError(pub String);

impl SdkError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self(reason.into())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaDeviceType {
    AudioInput,
    AudioOutput,
    Video,
    Other,
}

/// A device as enumerated by the SDK. The label doubles as its identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaDevice {
    pub label: String,
    pub device_type: MediaDeviceType,
}

impl MediaDevice {
    pub fn new(label: impl Into<String>, device_type: MediaDeviceType) -> Self {
        Self {
            label: label.into(),
            device_type,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteAttendee {
    pub attendee_id: String,
    pub external_user_id: Option<String>,
}

/// Why the SDK stopped the audio session on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStopReason {
    Ended,
    Disconnected,
    JoinedFromAnotherDevice,
    Failed,
}

/// Callbacks the SDK delivers on its own thread while a session is live.
pub trait SdkObserver: Send + Sync {
    fn on_audio_session_started(&self, reconnecting: bool);
    fn on_audio_session_stopped(&self, reason: SessionStopReason);
    fn on_attendee_joined(&self, attendee: RemoteAttendee);
    fn on_attendee_left(&self, attendee: RemoteAttendee);
    fn on_audio_devices_changed(&self, devices: Vec<MediaDevice>);
    fn on_error(&self, error: SdkError, recoverable: bool);
}

/// The SDK's live audio/video session object.
pub trait AudioVideoFacade: Send + Sync {
    fn add_observer(&self, observer: Arc<dyn SdkObserver>);
    fn start(&self) -> Result<(), SdkError>;
    fn stop(&self);
    fn realtime_local_mute(&self) -> Result<(), SdkError>;
    fn realtime_local_unmute(&self) -> Result<(), SdkError>;
    fn list_audio_devices(&self) -> Result<Vec<MediaDevice>, SdkError>;
    fn choose_audio_device(&self, device: &MediaDevice) -> Result<(), SdkError>;
}

/// Builds a session facade from a complete session configuration.
pub trait ConferencingSdk: Send + Sync {
    fn create_session(
        &self,
        configuration: &MeetingSessionConfiguration,
    ) -> Result<Arc<dyn AudioVideoFacade>, SdkError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusOutcome {
    Granted,
    Denied,
}

/// OS-level audio routing, independent of the conferencing SDK.
pub trait AudioRouter: Send + Sync {
    fn set_route(&self, route: AudioRoute) -> Result<(), SdkError>;
    /// `true` switches to voice-communication mode, `false` back to normal.
    fn set_communication_mode(&self, enabled: bool) -> Result<(), SdkError>;
    fn request_audio_focus(&self) -> Result<FocusOutcome, SdkError>;
}
