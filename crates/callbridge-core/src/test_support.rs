//! Scriptable fakes for the SDK and the OS audio router.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::mpsc;

use crate::devices::AudioRoute;
use crate::events::{BridgeEvent, BridgeEventListener};
use crate::manager::MeetingManager;
use crate::meeting::{
    AttendeeInfo, MeetingInfo, MeetingProvisioner, MeetingSessionConfiguration,
    PlaceholderProvisioner,
};
use crate::sdk::{
    AudioRouter, AudioVideoFacade, ConferencingSdk, FocusOutcome, MediaDevice, SdkError,
    SdkObserver,
};

pub struct FakeFacade {
    observers: Mutex<Vec<Arc<dyn SdkObserver>>>,
    devices: Vec<MediaDevice>,
    fail_start: Option<String>,
    fail_mute: Mutex<Option<String>>,
    pub started: AtomicBool,
    pub stop_calls: AtomicUsize,
    pub muted: AtomicBool,
    pub chosen: Mutex<Vec<MediaDevice>>,
}

impl FakeFacade {
    fn new(devices: Vec<MediaDevice>, fail_start: Option<String>) -> Self {
        Self {
            observers: Mutex::new(Vec::new()),
            devices,
            fail_start,
            fail_mute: Mutex::new(None),
            started: AtomicBool::new(false),
            stop_calls: AtomicUsize::new(0),
            muted: AtomicBool::new(false),
            chosen: Mutex::new(Vec::new()),
        }
    }

    /// The observer the bridge registered, for injecting callbacks.
    pub fn observer(&self) -> Arc<dyn SdkObserver> {
        self.observers
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("no observer registered")
    }

    pub fn observer_count(&self) -> usize {
        self.observers.lock().unwrap().len()
    }

    pub fn is_live(&self) -> bool {
        self.started.load(Ordering::SeqCst) && self.stop_calls.load(Ordering::SeqCst) == 0
    }

    pub fn fail_mute_with(&self, reason: &str) {
        *self.fail_mute.lock().unwrap() = Some(reason.to_string());
    }

    fn check_mute(&self) -> Result<(), SdkError> {
        match self.fail_mute.lock().unwrap().clone() {
            Some(reason) => Err(SdkError(reason)),
            None => Ok(()),
        }
    }
}

impl AudioVideoFacade for FakeFacade {
    fn add_observer(&self, observer: Arc<dyn SdkObserver>) {
        self.observers.lock().unwrap().push(observer);
    }

    fn start(&self) -> Result<(), SdkError> {
        if let Some(reason) = &self.fail_start {
            return Err(SdkError(reason.clone()));
        }
        self.started.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn stop(&self) {
        self.stop_calls.fetch_add(1, Ordering::SeqCst);
    }

    fn realtime_local_mute(&self) -> Result<(), SdkError> {
        self.check_mute()?;
        self.muted.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn realtime_local_unmute(&self) -> Result<(), SdkError> {
        self.check_mute()?;
        self.muted.store(false, Ordering::SeqCst);
        Ok(())
    }

    fn list_audio_devices(&self) -> Result<Vec<MediaDevice>, SdkError> {
        Ok(self.devices.clone())
    }

    fn choose_audio_device(&self, device: &MediaDevice) -> Result<(), SdkError> {
        self.chosen.lock().unwrap().push(device.clone());
        Ok(())
    }
}

#[derive(Default)]
pub struct FakeSdk {
    facades: Mutex<Vec<Arc<FakeFacade>>>,
    devices: Mutex<Vec<MediaDevice>>,
    fail_create: Mutex<Option<String>>,
    fail_start: Mutex<Option<String>>,
    pub configurations: Mutex<Vec<MeetingSessionConfiguration>>,
}

impl FakeSdk {
    /// Devices reported by facades created from now on.
    pub fn set_devices(&self, devices: Vec<MediaDevice>) {
        *self.devices.lock().unwrap() = devices;
    }

    pub fn fail_create_with(&self, reason: &str) {
        *self.fail_create.lock().unwrap() = Some(reason.to_string());
    }

    pub fn fail_start_with(&self, reason: &str) {
        *self.fail_start.lock().unwrap() = Some(reason.to_string());
    }

    pub fn last_facade(&self) -> Arc<FakeFacade> {
        self.facades
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("no session created")
    }

    pub fn sessions_created(&self) -> usize {
        self.facades.lock().unwrap().len()
    }

    pub fn live_sessions(&self) -> usize {
        self.facades.lock().unwrap().iter().filter(|f| f.is_live()).count()
    }
}

impl ConferencingSdk for FakeSdk {
    fn create_session(
        &self,
        configuration: &MeetingSessionConfiguration,
    ) -> Result<Arc<dyn AudioVideoFacade>, SdkError> {
        if let Some(reason) = self.fail_create.lock().unwrap().clone() {
            return Err(SdkError(reason));
        }
        self.configurations.lock().unwrap().push(configuration.clone());
        let facade = Arc::new(FakeFacade::new(
            self.devices.lock().unwrap().clone(),
            self.fail_start.lock().unwrap().clone(),
        ));
        self.facades.lock().unwrap().push(facade.clone());
        let facade: Arc<dyn AudioVideoFacade> = facade;
        Ok(facade)
    }
}

pub struct FakeRouter {
    pub routes: Mutex<Vec<AudioRoute>>,
    pub modes: Mutex<Vec<bool>>,
    fail_route: Mutex<Option<String>>,
    fail_mode: Mutex<Option<String>>,
    focus: Mutex<Result<FocusOutcome, SdkError>>,
}

impl Default for FakeRouter {
    fn default() -> Self {
        Self {
            routes: Mutex::new(Vec::new()),
            modes: Mutex::new(Vec::new()),
            fail_route: Mutex::new(None),
            fail_mode: Mutex::new(None),
            focus: Mutex::new(Ok(FocusOutcome::Granted)),
        }
    }
}

impl FakeRouter {
    pub fn fail_route_with(&self, reason: &str) {
        *self.fail_route.lock().unwrap() = Some(reason.to_string());
    }

    pub fn fail_mode_with(&self, reason: &str) {
        *self.fail_mode.lock().unwrap() = Some(reason.to_string());
    }

    pub fn set_focus(&self, outcome: Result<FocusOutcome, SdkError>) {
        *self.focus.lock().unwrap() = outcome;
    }
}

impl AudioRouter for FakeRouter {
    fn set_route(&self, route: AudioRoute) -> Result<(), SdkError> {
        if let Some(reason) = self.fail_route.lock().unwrap().clone() {
            return Err(SdkError(reason));
        }
        self.routes.lock().unwrap().push(route);
        Ok(())
    }

    fn set_communication_mode(&self, enabled: bool) -> Result<(), SdkError> {
        if let Some(reason) = self.fail_mode.lock().unwrap().clone() {
            return Err(SdkError(reason));
        }
        self.modes.lock().unwrap().push(enabled);
        Ok(())
    }

    fn request_audio_focus(&self) -> Result<FocusOutcome, SdkError> {
        self.focus.lock().unwrap().clone()
    }
}

/// Listener that forwards every event into a channel the test reads.
pub struct EventRecorder {
    tx: mpsc::UnboundedSender<BridgeEvent>,
}

impl EventRecorder {
    pub fn new(tx: mpsc::UnboundedSender<BridgeEvent>) -> Self {
        Self { tx }
    }
}

impl BridgeEventListener for EventRecorder {
    fn on_event(&self, event: BridgeEvent) {
        let _ = self.tx.send(event);
    }
}

pub async fn next_event(rx: &mut mpsc::UnboundedReceiver<BridgeEvent>) -> BridgeEvent {
    tokio::time::timeout(Duration::from_secs(1), rx.recv())
        .await
        .expect("timed out waiting for event")
        .expect("event channel closed")
}

pub fn drain(rx: &mut mpsc::UnboundedReceiver<BridgeEvent>) -> Vec<BridgeEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

pub fn meeting(id: &str) -> MeetingInfo {
    PlaceholderProvisioner::default()
        .create_meeting(id)
        .expect("placeholder meeting")
}

pub fn attendee(id: &str) -> AttendeeInfo {
    AttendeeInfo {
        attendee_id: Some(id.to_string()),
        join_token: Some(format!("token-{id}")),
        external_user_id: None,
    }
}

pub type Fakes = (
    MeetingManager,
    Arc<FakeSdk>,
    Arc<FakeRouter>,
    mpsc::UnboundedReceiver<BridgeEvent>,
);

pub fn manager_with_fakes() -> Fakes {
    let sdk = Arc::new(FakeSdk::default());
    let router = Arc::new(FakeRouter::default());
    let manager = MeetingManager::new(sdk.clone(), router.clone());
    let (tx, rx) = mpsc::unbounded_channel();
    manager.add_listener(Arc::new(EventRecorder { tx }));
    (manager, sdk, router, rx)
}

pub async fn joined_manager() -> Fakes {
    let fakes = manager_with_fakes();
    fakes
        .0
        .join(&meeting("m-1"), &attendee("a-1"))
        .await
        .expect("join");
    fakes
}
