//! Call-session control core.
//!
//! Tracks meeting lifecycle, mute state and the audio device inventory on top
//! of a native conferencing SDK, and bridges SDK callbacks into one outbound
//! event stream. Pure Rust crate with no platform dependencies; consumed by
//! native UI shells via UniFFI bindings.

pub mod controls;
pub mod devices;
pub mod errors;
pub mod events;
pub mod manager;
pub mod meeting;
pub mod observer;
pub mod sdk;
pub mod session;
pub mod settings;

#[cfg(test)]
mod test_support;

pub use controls::AudioControls;
pub use devices::{
    AudioDevice, AudioDeviceLists, AudioRoute, DeviceDescriptor, DeviceKind, DeviceRegistry,
};
pub use errors::BridgeError;
pub use events::{BridgeEvent, BridgeEventListener, DeviceChange, EventEmitter, ListenerId};
pub use manager::MeetingManager;
pub use meeting::{
    AttendeeInfo, MediaPlacement, MeetingInfo, MeetingProvisioner, MeetingSessionConfiguration,
    MeetingSessionCredentials, PlaceholderProvisioner,
};
pub use sdk::{
    AudioRouter, AudioVideoFacade, ConferencingSdk, FocusOutcome, MediaDevice, MediaDeviceType,
    RemoteAttendee, SdkError, SdkObserver, SessionStopReason,
};
pub use session::SessionSnapshot;
pub use settings::{Settings, SettingsStore};
