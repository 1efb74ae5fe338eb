//! UniFFI bindings for callbridge-core.
//!
//! Exposes a `CallBridgeClient` object wrapping `MeetingManager` and
//! `AudioControls`. The host platform supplies the conferencing SDK and the
//! OS audio system as callback interfaces, and feeds SDK callbacks back in
//! through `dispatch_sdk_event`.

use std::sync::{Arc, Mutex as StdMutex};

use callbridge_core::{
    AttendeeInfo as CoreAttendeeInfo, AudioControls, AudioDevice as CoreAudioDevice,
    AudioDeviceLists as CoreAudioDeviceLists, AudioRoute as CoreAudioRoute, AudioRouter,
    AudioVideoFacade, BridgeError, BridgeEvent, BridgeEventListener, ConferencingSdk,
    DeviceChange, FocusOutcome, MediaDevice, MediaDeviceType as CoreMediaDeviceType,
    MediaPlacement as CoreMediaPlacement, MeetingInfo as CoreMeetingInfo, MeetingManager,
    MeetingProvisioner, MeetingSessionConfiguration, PlaceholderProvisioner,
    RemoteAttendee as CoreRemoteAttendee, SdkError, SdkObserver,
    SessionSnapshot as CoreSessionSnapshot, SessionStopReason as CoreSessionStopReason,
    Settings as CoreSettings, SettingsStore,
};

uniffi::include_scaffolding!("callbridge");

const DEFAULT_LOG_FILTER: &str = "callbridge_core=debug,callbridge_ffi=debug";

// ── Namespace functions ──────────────────────────────────────────────

/// Initialize tracing. `RUST_LOG` wins over `filter`, which wins over the
/// built-in default. Only the first call has any effect.
fn init_logging(filter: Option<String>) {
    use std::sync::Once;
    use tracing_subscriber::EnvFilter;

    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let env_filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(filter.as_deref().unwrap_or(DEFAULT_LOG_FILTER)))
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
        // another subscriber may already be installed by the host
        let _ = tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_ansi(false)
            .try_init();
    });
}

// ── FFI-safe type conversions ──────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioRoute {
    Speaker,
    Earpiece,
    Bluetooth,
    Wired,
}

impl From<CoreAudioRoute> for AudioRoute {
    fn from(r: CoreAudioRoute) -> Self {
        match r {
            CoreAudioRoute::Speaker => Self::Speaker,
            CoreAudioRoute::Earpiece => Self::Earpiece,
            CoreAudioRoute::Bluetooth => Self::Bluetooth,
            CoreAudioRoute::Wired => Self::Wired,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaDeviceType {
    AudioInput,
    AudioOutput,
    Video,
    Other,
}

impl From<MediaDeviceType> for CoreMediaDeviceType {
    fn from(t: MediaDeviceType) -> Self {
        match t {
            MediaDeviceType::AudioInput => Self::AudioInput,
            MediaDeviceType::AudioOutput => Self::AudioOutput,
            MediaDeviceType::Video => Self::Video,
            MediaDeviceType::Other => Self::Other,
        }
    }
}

impl From<CoreMediaDeviceType> for MediaDeviceType {
    fn from(t: CoreMediaDeviceType) -> Self {
        match t {
            CoreMediaDeviceType::AudioInput => Self::AudioInput,
            CoreMediaDeviceType::AudioOutput => Self::AudioOutput,
            CoreMediaDeviceType::Video => Self::Video,
            CoreMediaDeviceType::Other => Self::Other,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStopReason {
    Ended,
    Disconnected,
    JoinedFromAnotherDevice,
    Failed,
}

impl From<SessionStopReason> for CoreSessionStopReason {
    fn from(r: SessionStopReason) -> Self {
        match r {
            SessionStopReason::Ended => Self::Ended,
            SessionStopReason::Disconnected => Self::Disconnected,
            SessionStopReason::JoinedFromAnotherDevice => Self::JoinedFromAnotherDevice,
            SessionStopReason::Failed => Self::Failed,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaPlacement {
    pub audio_host_url: String,
    pub signaling_url: String,
    pub turn_control_url: String,
}

impl From<CoreMediaPlacement> for MediaPlacement {
    fn from(p: CoreMediaPlacement) -> Self {
        Self {
            audio_host_url: p.audio_host_url,
            signaling_url: p.signaling_url,
            turn_control_url: p.turn_control_url,
        }
    }
}

impl From<MediaPlacement> for CoreMediaPlacement {
    fn from(p: MediaPlacement) -> Self {
        Self {
            audio_host_url: p.audio_host_url,
            signaling_url: p.signaling_url,
            turn_control_url: p.turn_control_url,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeetingInfo {
    pub meeting_id: Option<String>,
    pub media_region: Option<String>,
    pub media_placement: Option<MediaPlacement>,
}

impl From<CoreMeetingInfo> for MeetingInfo {
    fn from(m: CoreMeetingInfo) -> Self {
        Self {
            meeting_id: m.meeting_id,
            media_region: m.media_region,
            media_placement: m.media_placement.map(MediaPlacement::from),
        }
    }
}

impl From<MeetingInfo> for CoreMeetingInfo {
    fn from(m: MeetingInfo) -> Self {
        Self {
            meeting_id: m.meeting_id,
            media_region: m.media_region,
            media_placement: m.media_placement.map(CoreMediaPlacement::from),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttendeeInfo {
    pub attendee_id: Option<String>,
    pub join_token: Option<String>,
    pub external_user_id: Option<String>,
}

impl From<AttendeeInfo> for CoreAttendeeInfo {
    fn from(a: AttendeeInfo) -> Self {
        Self {
            attendee_id: a.attendee_id,
            join_token: a.join_token,
            external_user_id: a.external_user_id,
        }
    }
}

/// Flattened session configuration handed to the native SDK.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfiguration {
    pub meeting_id: String,
    pub media_region: String,
    pub media_placement: MediaPlacement,
    pub attendee_id: String,
    pub external_user_id: Option<String>,
    pub join_token: String,
}

impl From<&MeetingSessionConfiguration> for SessionConfiguration {
    fn from(c: &MeetingSessionConfiguration) -> Self {
        Self {
            meeting_id: c.meeting_id.clone(),
            media_region: c.media_region.clone(),
            media_placement: c.media_placement.clone().into(),
            attendee_id: c.credentials.attendee_id.clone(),
            external_user_id: c.credentials.external_user_id.clone(),
            join_token: c.credentials.join_token.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioDevice {
    pub device_id: String,
    pub label: String,
}

impl From<CoreAudioDevice> for AudioDevice {
    fn from(d: CoreAudioDevice) -> Self {
        Self {
            device_id: d.device_id,
            label: d.label,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioDeviceLists {
    pub input_devices: Vec<AudioDevice>,
    pub output_devices: Vec<AudioDevice>,
}

impl From<CoreAudioDeviceLists> for AudioDeviceLists {
    fn from(l: CoreAudioDeviceLists) -> Self {
        Self {
            input_devices: l.input_devices.into_iter().map(AudioDevice::from).collect(),
            output_devices: l.output_devices.into_iter().map(AudioDevice::from).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeMediaDevice {
    pub label: String,
    pub device_type: MediaDeviceType,
}

impl From<NativeMediaDevice> for MediaDevice {
    fn from(d: NativeMediaDevice) -> Self {
        MediaDevice::new(d.label, d.device_type.into())
    }
}

impl From<&MediaDevice> for NativeMediaDevice {
    fn from(d: &MediaDevice) -> Self {
        Self {
            label: d.label.clone(),
            device_type: d.device_type.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteAttendee {
    pub attendee_id: String,
    pub external_user_id: Option<String>,
}

impl From<CoreRemoteAttendee> for RemoteAttendee {
    fn from(a: CoreRemoteAttendee) -> Self {
        Self {
            attendee_id: a.attendee_id,
            external_user_id: a.external_user_id,
        }
    }
}

impl From<RemoteAttendee> for CoreRemoteAttendee {
    fn from(a: RemoteAttendee) -> Self {
        Self {
            attendee_id: a.attendee_id,
            external_user_id: a.external_user_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub active: bool,
    pub meeting_id: Option<String>,
    pub attendee_id: Option<String>,
    pub muted: bool,
    pub input_device: Option<String>,
    pub output_route: Option<AudioRoute>,
}

impl From<CoreSessionSnapshot> for SessionSnapshot {
    fn from(s: CoreSessionSnapshot) -> Self {
        Self {
            active: s.active,
            meeting_id: s.meeting_id,
            attendee_id: s.attendee_id,
            muted: s.muted,
            input_device: s.input_device,
            output_route: s.output_route.map(AudioRoute::from),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub media_region: String,
    pub manage_audio_session: bool,
    pub log_filter: Option<String>,
}

impl From<CoreSettings> for Settings {
    fn from(s: CoreSettings) -> Self {
        Self {
            media_region: s.media_region,
            manage_audio_session: s.manage_audio_session,
            log_filter: s.log_filter,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CallEvent {
    MeetingStart { meeting_id: String },
    MeetingEnd { meeting_id: String },
    AttendeeJoin { attendee: RemoteAttendee },
    AttendeeLeave { attendee: RemoteAttendee },
    AudioStatusChanged { muted: bool },
    InputDeviceChanged { device_id: String },
    OutputDeviceChanged { route: AudioRoute },
    DevicesAvailable { devices: AudioDeviceLists },
    ErrorOccurred { code: String, message: String, fatal: bool },
}

impl From<BridgeEvent> for CallEvent {
    fn from(e: BridgeEvent) -> Self {
        match e {
            BridgeEvent::MeetingStart { meeting_id } => Self::MeetingStart { meeting_id },
            BridgeEvent::MeetingEnd { meeting_id } => Self::MeetingEnd { meeting_id },
            BridgeEvent::AttendeeJoin(a) => Self::AttendeeJoin { attendee: a.into() },
            BridgeEvent::AttendeeLeave(a) => Self::AttendeeLeave { attendee: a.into() },
            BridgeEvent::AudioStatusChanged { muted } => Self::AudioStatusChanged { muted },
            BridgeEvent::DeviceChanged(DeviceChange::Input(device_id)) => {
                Self::InputDeviceChanged { device_id }
            }
            BridgeEvent::DeviceChanged(DeviceChange::Output(route)) => {
                Self::OutputDeviceChanged { route: route.into() }
            }
            BridgeEvent::DeviceChanged(DeviceChange::Available(lists)) => {
                Self::DevicesAvailable { devices: lists.into() }
            }
            BridgeEvent::Error {
                code,
                message,
                fatal,
            } => Self::ErrorOccurred {
                code,
                message,
                fatal,
            },
        }
    }
}

/// SDK callbacks as reported by the host's native SDK delegate.
#[derive(Debug, Clone, PartialEq)]
pub enum NativeSdkEvent {
    AudioSessionStarted { reconnecting: bool },
    AudioSessionStopped { reason: SessionStopReason },
    AttendeeJoined { attendee: RemoteAttendee },
    AttendeeLeft { attendee: RemoteAttendee },
    AudioDevicesChanged { devices: Vec<NativeMediaDevice> },
    Failure { message: String, recoverable: bool },
}

// ── Errors ───────────────────────────────────────────────────────────

/// Rejection returned to the UI: a stable code plus a readable message.
#[derive(Debug, thiserror::Error)]
pub enum CallBridgeError {
    #[error("{code}: {message}")]
    Rejected { code: String, message: String },
}

impl From<BridgeError> for CallBridgeError {
    fn from(e: BridgeError) -> Self {
        tracing::error!("BridgeError: {e}");
        Self::Rejected {
            code: e.code().to_string(),
            message: e.to_string(),
        }
    }
}

/// Failure raised by a host-implemented callback interface.
#[derive(Debug, thiserror::Error)]
pub enum NativeError {
    #[error("{reason}")]
    Failed { reason: String },
}

impl From<uniffi::UnexpectedUniFFICallbackError> for NativeError {
    fn from(e: uniffi::UnexpectedUniFFICallbackError) -> Self {
        Self::Failed { reason: e.reason }
    }
}

impl From<NativeError> for SdkError {
    fn from(e: NativeError) -> Self {
        match e {
            NativeError::Failed { reason } => SdkError(reason),
        }
    }
}

// ── Callback interfaces (implemented by the host) ────────────────────

pub trait CallEventListener: Send + Sync {
    fn on_event(&self, event: CallEvent);
}

/// The platform conferencing SDK. One session exists at a time.
pub trait NativeMeetingSdk: Send + Sync {
    fn create_session(&self, configuration: SessionConfiguration) -> Result<(), NativeError>;
    fn start(&self) -> Result<(), NativeError>;
    fn stop(&self);
    fn set_local_mute(&self, muted: bool) -> Result<(), NativeError>;
    fn list_audio_devices(&self) -> Result<Vec<NativeMediaDevice>, NativeError>;
    fn choose_audio_device(&self, device: NativeMediaDevice) -> Result<(), NativeError>;
}

pub trait NativeAudioSystem: Send + Sync {
    fn set_route(&self, route: AudioRoute) -> Result<(), NativeError>;
    fn set_communication_mode(&self, enabled: bool) -> Result<(), NativeError>;
    /// `true` when focus was granted.
    fn request_audio_focus(&self) -> Result<bool, NativeError>;
}

// ── Adapters: host callbacks → core traits ──────────────────────────

type ObserverSlots = Arc<StdMutex<Vec<Arc<dyn SdkObserver>>>>;

struct NativeSdkAdapter {
    native: Arc<dyn NativeMeetingSdk>,
    observers: ObserverSlots,
}

impl ConferencingSdk for NativeSdkAdapter {
    fn create_session(
        &self,
        configuration: &MeetingSessionConfiguration,
    ) -> Result<Arc<dyn AudioVideoFacade>, SdkError> {
        self.native.create_session(configuration.into())?;
        self.observers
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clear();
        Ok(Arc::new(NativeFacade {
            native: self.native.clone(),
            observers: self.observers.clone(),
        }))
    }
}

struct NativeFacade {
    native: Arc<dyn NativeMeetingSdk>,
    observers: ObserverSlots,
}

impl AudioVideoFacade for NativeFacade {
    fn add_observer(&self, observer: Arc<dyn SdkObserver>) {
        self.observers
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(observer);
    }

    fn start(&self) -> Result<(), SdkError> {
        Ok(self.native.start()?)
    }

    fn stop(&self) {
        self.native.stop();
    }

    fn realtime_local_mute(&self) -> Result<(), SdkError> {
        Ok(self.native.set_local_mute(true)?)
    }

    fn realtime_local_unmute(&self) -> Result<(), SdkError> {
        Ok(self.native.set_local_mute(false)?)
    }

    fn list_audio_devices(&self) -> Result<Vec<MediaDevice>, SdkError> {
        Ok(self
            .native
            .list_audio_devices()?
            .into_iter()
            .map(MediaDevice::from)
            .collect())
    }

    fn choose_audio_device(&self, device: &MediaDevice) -> Result<(), SdkError> {
        Ok(self.native.choose_audio_device(device.into())?)
    }
}

struct NativeAudioRouter {
    native: Box<dyn NativeAudioSystem>,
}

impl AudioRouter for NativeAudioRouter {
    fn set_route(&self, route: CoreAudioRoute) -> Result<(), SdkError> {
        Ok(self.native.set_route(route.into())?)
    }

    fn set_communication_mode(&self, enabled: bool) -> Result<(), SdkError> {
        Ok(self.native.set_communication_mode(enabled)?)
    }

    fn request_audio_focus(&self) -> Result<FocusOutcome, SdkError> {
        if self.native.request_audio_focus()? {
            Ok(FocusOutcome::Granted)
        } else {
            Ok(FocusOutcome::Denied)
        }
    }
}

/// Reads the media region at call time so settings changes apply to the
/// next `create_meeting`.
struct SettingsProvisioner {
    settings: Arc<SettingsStore>,
}

impl MeetingProvisioner for SettingsProvisioner {
    fn create_meeting(&self, meeting_id: &str) -> Result<CoreMeetingInfo, BridgeError> {
        PlaceholderProvisioner::new(self.settings.get().media_region).create_meeting(meeting_id)
    }
}

/// Adapter: wraps an FFI CallEventListener into a core BridgeEventListener.
struct BridgeListener {
    ffi_listener: Arc<dyn CallEventListener>,
}

impl BridgeEventListener for BridgeListener {
    fn on_event(&self, event: BridgeEvent) {
        self.ffi_listener.on_event(event.into());
    }
}

// ── CallBridgeClient: main FFI object ────────────────────────────────

pub struct CallBridgeClient {
    manager: MeetingManager,
    controls: AudioControls,
    settings: Arc<SettingsStore>,
    observers: ObserverSlots,
    rt: tokio::runtime::Runtime,
}

impl CallBridgeClient {
    pub fn new(
        data_dir: String,
        sdk: Box<dyn NativeMeetingSdk>,
        audio: Box<dyn NativeAudioSystem>,
    ) -> Self {
        let settings = Arc::new(SettingsStore::new(&data_dir));
        init_logging(settings.get().log_filter);

        let rt = tokio::runtime::Runtime::new().expect("failed to create tokio runtime");

        let observers: ObserverSlots = Arc::new(StdMutex::new(Vec::new()));
        let sdk = Arc::new(NativeSdkAdapter {
            native: Arc::from(sdk),
            observers: observers.clone(),
        });
        let router = Arc::new(NativeAudioRouter { native: audio });
        let manager = MeetingManager::new(sdk, router).with_provisioner(Arc::new(
            SettingsProvisioner {
                settings: settings.clone(),
            },
        ));
        let controls = manager.controls();

        tracing::info!("call bridge client created, data dir {data_dir}");
        Self {
            manager,
            controls,
            settings,
            observers,
            rt,
        }
    }

    pub fn create_meeting(&self, meeting_id: String) -> Result<MeetingInfo, CallBridgeError> {
        Ok(self.manager.create_meeting(&meeting_id)?.into())
    }

    pub fn join_meeting(
        &self,
        meeting: MeetingInfo,
        attendee: AttendeeInfo,
    ) -> Result<bool, CallBridgeError> {
        let meeting = CoreMeetingInfo::from(meeting);
        let attendee = CoreAttendeeInfo::from(attendee);
        Ok(self.join_guarded(&meeting, &attendee)?)
    }

    /// Join with panics caught, so they never unwind across the FFI boundary.
    fn join_guarded(
        &self,
        meeting: &CoreMeetingInfo,
        attendee: &CoreAttendeeInfo,
    ) -> Result<bool, BridgeError> {
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            self.rt.block_on(self.manager.join(meeting, attendee))
        }));

        match result {
            Ok(res) => res,
            Err(panic_info) => {
                let msg = if let Some(s) = panic_info.downcast_ref::<&str>() {
                    s.to_string()
                } else if let Some(s) = panic_info.downcast_ref::<String>() {
                    s.clone()
                } else {
                    "unknown panic".to_string()
                };
                tracing::error!("join_meeting panicked: {msg}");
                Err(BridgeError::JoinFailed(format!("panic in join: {msg}")))
            }
        }
    }

    pub fn leave_meeting(&self) -> bool {
        self.rt.block_on(self.manager.leave())
    }

    /// Join with the OS audio session managed around the meeting when
    /// `manage_audio_session` is set.
    ///
    /// Credentials and the session slot are checked before the OS audio mode
    /// is touched. The mode is only switched back off when the SDK itself
    /// failed to join.
    pub fn connect(
        &self,
        meeting: MeetingInfo,
        attendee: AttendeeInfo,
    ) -> Result<bool, CallBridgeError> {
        let meeting = CoreMeetingInfo::from(meeting);
        let attendee = CoreAttendeeInfo::from(attendee);
        MeetingSessionConfiguration::from_join_info(&meeting, &attendee)
            .inspect_err(|e| tracing::warn!("connect rejected: {e}"))?;
        if self.is_in_meeting() {
            tracing::warn!("connect rejected: a meeting is already active");
            return Err(BridgeError::AlreadyActive.into());
        }

        let manage = self.settings.get().manage_audio_session;
        if manage {
            self.rt.block_on(self.controls.start_audio_session())?;
        }

        match self.join_guarded(&meeting, &attendee) {
            Ok(joined) => Ok(joined),
            Err(e @ BridgeError::JoinFailed(_)) => {
                if manage {
                    if let Err(stop_err) = self.rt.block_on(self.controls.stop_audio_session()) {
                        tracing::warn!("audio session rollback failed: {stop_err}");
                    }
                }
                Err(e.into())
            }
            Err(e) => Err(e.into()),
        }
    }

    pub fn disconnect(&self) -> Result<bool, CallBridgeError> {
        let left = self.leave_meeting();
        if self.settings.get().manage_audio_session {
            self.rt.block_on(self.controls.stop_audio_session())?;
        }
        Ok(left)
    }

    pub fn session(&self) -> SessionSnapshot {
        self.rt.block_on(self.manager.session()).into()
    }

    pub fn is_in_meeting(&self) -> bool {
        self.rt.block_on(self.manager.is_active())
    }

    pub fn mute(&self) -> Result<bool, CallBridgeError> {
        Ok(self.rt.block_on(self.controls.mute())?)
    }

    pub fn unmute(&self) -> Result<bool, CallBridgeError> {
        Ok(self.rt.block_on(self.controls.unmute())?)
    }

    pub fn is_muted(&self) -> Result<bool, CallBridgeError> {
        Ok(self.rt.block_on(self.controls.is_muted())?)
    }

    pub fn get_audio_devices(&self) -> Result<AudioDeviceLists, CallBridgeError> {
        Ok(self.rt.block_on(self.controls.list_audio_devices())?.into())
    }

    pub fn set_audio_input_device(&self, device_id: String) -> Result<bool, CallBridgeError> {
        Ok(self.rt.block_on(self.controls.select_input_device(&device_id))?)
    }

    /// `device_id` is a route name: speaker, earpiece, receiver, bluetooth
    /// or wired.
    pub fn set_audio_output_device(&self, device_id: String) -> Result<bool, CallBridgeError> {
        Ok(self.rt.block_on(self.controls.select_output_device(&device_id))?)
    }

    pub fn start_audio_session(&self) -> Result<bool, CallBridgeError> {
        Ok(self.rt.block_on(self.controls.start_audio_session())?)
    }

    pub fn stop_audio_session(&self) -> Result<bool, CallBridgeError> {
        Ok(self.rt.block_on(self.controls.stop_audio_session())?)
    }

    pub fn request_audio_focus(&self) -> Result<bool, CallBridgeError> {
        match self.rt.block_on(self.controls.request_audio_focus())? {
            FocusOutcome::Granted => Ok(true),
            FocusOutcome::Denied => Err(BridgeError::AudioFocusDenied.into()),
        }
    }

    pub fn unlock_audio_focus(&self) -> Result<bool, CallBridgeError> {
        self.request_audio_focus()
    }

    /// Returns an id for `remove_listener`.
    pub fn add_listener(&self, listener: Box<dyn CallEventListener>) -> u64 {
        self.manager.add_listener(Arc::new(BridgeListener {
            ffi_listener: Arc::from(listener),
        }))
    }

    pub fn remove_listener(&self, listener_id: u64) -> bool {
        self.manager.remove_listener(listener_id)
    }

    pub fn remove_all_listeners(&self) {
        self.manager.remove_all_listeners();
    }

    /// Forward a callback from the native SDK delegate to the live session.
    pub fn dispatch_sdk_event(&self, event: NativeSdkEvent) {
        let observers = self
            .observers
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone();
        if observers.is_empty() {
            tracing::debug!("no session observer for sdk event {event:?}");
            return;
        }

        for observer in observers {
            match event.clone() {
                NativeSdkEvent::AudioSessionStarted { reconnecting } => {
                    observer.on_audio_session_started(reconnecting)
                }
                NativeSdkEvent::AudioSessionStopped { reason } => {
                    observer.on_audio_session_stopped(reason.into())
                }
                NativeSdkEvent::AttendeeJoined { attendee } => {
                    observer.on_attendee_joined(attendee.into())
                }
                NativeSdkEvent::AttendeeLeft { attendee } => {
                    observer.on_attendee_left(attendee.into())
                }
                NativeSdkEvent::AudioDevicesChanged { devices } => observer
                    .on_audio_devices_changed(devices.into_iter().map(MediaDevice::from).collect()),
                NativeSdkEvent::Failure {
                    message,
                    recoverable,
                } => observer.on_error(SdkError(message), recoverable),
            }
        }
    }

    pub fn get_settings(&self) -> Settings {
        self.settings.get().into()
    }

    pub fn set_media_region(&self, region: String) {
        self.settings.set_media_region(region);
    }

    pub fn set_manage_audio_session(&self, enabled: bool) {
        self.settings.set_manage_audio_session(enabled);
    }

    /// Persisted for the next process start; the active subscriber keeps
    /// its filter.
    pub fn set_log_filter(&self, filter: Option<String>) {
        self.settings.set_log_filter(filter);
    }
}
