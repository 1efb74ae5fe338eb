//! SDK callback ingestion.
//!
//! The SDK calls its observers synchronously from its own thread. Each
//! session registers one [`SessionObserver`] that forwards callbacks into a
//! channel drained by that session's event loop, where they are applied
//! under the shared state lock.

use tokio::sync::mpsc;
use uuid::Uuid;

use crate::devices::DeviceRegistry;
use crate::events::{BridgeEvent, DeviceChange};
use crate::sdk::{MediaDevice, RemoteAttendee, SdkError, SdkObserver, SessionStopReason};

/// Error code carried by `onError` events raised from SDK callbacks.
pub const SDK_ERROR_CODE: &str = "SDK_ERROR";

#[derive(Debug, Clone, PartialEq)]
pub enum SdkCallback {
    SessionStarted { reconnecting: bool },
    SessionStopped(SessionStopReason),
    AttendeeJoined(RemoteAttendee),
    AttendeeLeft(RemoteAttendee),
    DevicesChanged(Vec<MediaDevice>),
    Error { error: SdkError, recoverable: bool },
}

/// What applying a callback does to the active session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Teardown {
    None,
    /// The SDK already stopped; drop our references.
    Release,
    /// Unrecoverable failure; stop the facade, then drop it.
    StopAndRelease,
}

/// Map one callback to at most one outbound event.
///
/// Device inventory changes refresh `devices` before the event is built so
/// the event carries the new snapshot.
pub fn translate(
    callback: SdkCallback,
    meeting_id: &str,
    devices: &mut DeviceRegistry,
) -> (Option<BridgeEvent>, Teardown) {
    match callback {
        // join already announced the meeting
        SdkCallback::SessionStarted { .. } => (None, Teardown::None),
        SdkCallback::SessionStopped(_) => (
            Some(BridgeEvent::MeetingEnd {
                meeting_id: meeting_id.to_string(),
            }),
            Teardown::Release,
        ),
        SdkCallback::AttendeeJoined(a) => (Some(BridgeEvent::AttendeeJoin(a)), Teardown::None),
        SdkCallback::AttendeeLeft(a) => (Some(BridgeEvent::AttendeeLeave(a)), Teardown::None),
        SdkCallback::DevicesChanged(list) => {
            let lists = devices.refresh_from_media(list);
            (
                Some(BridgeEvent::DeviceChanged(DeviceChange::Available(lists))),
                Teardown::None,
            )
        }
        SdkCallback::Error { error, recoverable } => (
            Some(BridgeEvent::Error {
                code: SDK_ERROR_CODE.to_string(),
                message: error.0,
                fatal: !recoverable,
            }),
            if recoverable {
                Teardown::None
            } else {
                Teardown::StopAndRelease
            },
        ),
    }
}

/// Observer registered with one session's facade.
pub struct SessionObserver {
    session_id: Uuid,
    tx: mpsc::UnboundedSender<SdkCallback>,
}

impl SessionObserver {
    pub fn new(session_id: Uuid) -> (Self, mpsc::UnboundedReceiver<SdkCallback>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { session_id, tx }, rx)
    }

    fn forward(&self, callback: SdkCallback) {
        if self.tx.send(callback).is_err() {
            tracing::debug!(
                "dropping sdk callback for session {} after teardown",
                self.session_id
            );
        }
    }
}

impl SdkObserver for SessionObserver {
    fn on_audio_session_started(&self, reconnecting: bool) {
        self.forward(SdkCallback::SessionStarted { reconnecting });
    }

    fn on_audio_session_stopped(&self, reason: SessionStopReason) {
        self.forward(SdkCallback::SessionStopped(reason));
    }

    fn on_attendee_joined(&self, attendee: RemoteAttendee) {
        self.forward(SdkCallback::AttendeeJoined(attendee));
    }

    fn on_attendee_left(&self, attendee: RemoteAttendee) {
        self.forward(SdkCallback::AttendeeLeft(attendee));
    }

    fn on_audio_devices_changed(&self, devices: Vec<MediaDevice>) {
        self.forward(SdkCallback::DevicesChanged(devices));
    }

    fn on_error(&self, error: SdkError, recoverable: bool) {
        self.forward(SdkCallback::Error { error, recoverable });
    }
}
