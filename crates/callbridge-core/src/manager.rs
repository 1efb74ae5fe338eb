use std::sync::Arc;

use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::controls::AudioControls;
use crate::devices::DeviceRegistry;
use crate::errors::BridgeError;
use crate::events::{BridgeEvent, BridgeEventListener, DeviceChange, EventEmitter, ListenerId};
use crate::meeting::{
    AttendeeInfo, MeetingInfo, MeetingProvisioner, MeetingSessionConfiguration,
    PlaceholderProvisioner,
};
use crate::observer::{self, SdkCallback, SessionObserver, Teardown};
use crate::sdk::{AudioRouter, AudioVideoFacade, ConferencingSdk};
use crate::session::{SessionSnapshot, SessionState};

/// The SDK objects owned by the active session slot.
pub(crate) struct SessionHandle {
    pub(crate) session_id: Uuid,
    pub(crate) facade: Arc<dyn AudioVideoFacade>,
    event_task: Option<JoinHandle<()>>,
}

impl SessionHandle {
    /// Consumes the handle, so each session is released at most once.
    fn release(mut self, stop_facade: bool) {
        if stop_facade {
            self.facade.stop();
        }
        if let Some(task) = self.event_task.take() {
            task.abort();
        }
    }
}

/// Session slot and device snapshot, guarded together by one lock.
#[derive(Default)]
pub(crate) struct BridgeState {
    pub(crate) session: SessionState<SessionHandle>,
    pub(crate) devices: DeviceRegistry,
}

pub(crate) type SharedState = Arc<Mutex<BridgeState>>;

/// Owns the meeting lifecycle: create, join, leave, and the SDK callback loop.
pub struct MeetingManager {
    state: SharedState,
    emitter: EventEmitter,
    sdk: Arc<dyn ConferencingSdk>,
    router: Arc<dyn AudioRouter>,
    provisioner: Arc<dyn MeetingProvisioner>,
}

impl MeetingManager {
    pub fn new(sdk: Arc<dyn ConferencingSdk>, router: Arc<dyn AudioRouter>) -> Self {
        Self {
            state: Arc::new(Mutex::new(BridgeState::default())),
            emitter: EventEmitter::new(),
            sdk,
            router,
            provisioner: Arc::new(PlaceholderProvisioner::default()),
        }
    }

    pub fn with_provisioner(mut self, provisioner: Arc<dyn MeetingProvisioner>) -> Self {
        self.provisioner = provisioner;
        self
    }

    /// Register a listener for outbound events.
    pub fn add_listener(&self, listener: Arc<dyn BridgeEventListener>) -> ListenerId {
        let id = self.emitter.add_listener(listener);
        tracing::debug!("listener {id} attached");
        id
    }

    pub fn remove_listener(&self, id: ListenerId) -> bool {
        let removed = self.emitter.remove_listener(id);
        tracing::debug!(
            "listener {id} detached: {removed}, {} remaining",
            self.emitter.listener_count()
        );
        removed
    }

    pub fn remove_all_listeners(&self) {
        self.emitter.remove_all_listeners();
        tracing::debug!("all listeners detached");
    }

    /// Create AudioControls bound to this manager's session.
    pub fn controls(&self) -> AudioControls {
        AudioControls::new(self.state.clone(), self.emitter.clone(), self.router.clone())
    }

    pub fn create_meeting(&self, meeting_id: &str) -> Result<MeetingInfo, BridgeError> {
        self.provisioner.create_meeting(meeting_id)
    }

    pub async fn is_active(&self) -> bool {
        self.state.lock().await.session.is_active()
    }

    pub async fn session(&self) -> SessionSnapshot {
        self.state.lock().await.session.snapshot()
    }

    /// Join a meeting.
    ///
    /// Credentials are checked before the state or the SDK is touched. The
    /// session only becomes active once the SDK facade has started.
    pub async fn join(
        &self,
        meeting: &MeetingInfo,
        attendee: &AttendeeInfo,
    ) -> Result<bool, BridgeError> {
        let configuration = MeetingSessionConfiguration::from_join_info(meeting, attendee)
            .inspect_err(|e| tracing::warn!("join rejected: {e}"))?;

        let mut state = self.state.lock().await;
        if state.session.is_active() {
            tracing::warn!(
                "join rejected: meeting {} already active",
                state.session.snapshot().meeting_id.unwrap_or_default()
            );
            return Err(BridgeError::AlreadyActive);
        }

        let facade = self
            .sdk
            .create_session(&configuration)
            .map_err(|e| BridgeError::JoinFailed(e.to_string()))?;

        let session_id = Uuid::new_v4();
        let (observer, callbacks) = SessionObserver::new(session_id);
        facade.add_observer(Arc::new(observer));

        if let Err(e) = facade.start() {
            tracing::warn!("sdk start failed for meeting {}: {e}", configuration.meeting_id);
            facade.stop();
            return Err(BridgeError::JoinFailed(e.to_string()));
        }

        let event_task = tokio::spawn(Self::event_loop(
            callbacks,
            session_id,
            self.state.clone(),
            self.emitter.clone(),
        ));

        let meeting_id = configuration.meeting_id;
        // still under the lock taken before the is_active check
        state.session.begin_session(
            meeting_id.clone(),
            configuration.credentials.attendee_id,
            SessionHandle {
                session_id,
                facade,
                event_task: Some(event_task),
            },
        )?;
        state.devices.clear();

        tracing::info!("joined meeting {meeting_id} (session {session_id})");
        self.emitter.emit(BridgeEvent::MeetingStart { meeting_id });
        Ok(true)
    }

    /// Leave the current meeting. Returns `false` when nothing was active.
    pub async fn leave(&self) -> bool {
        let mut state = self.state.lock().await;
        let Some(session) = state.session.end_session() else {
            tracing::info!("leave: no active meeting");
            return false;
        };
        state.devices.clear();

        let meeting_id = session.meeting_id.clone();
        session.into_handle().release(true);

        tracing::info!("left meeting {meeting_id}");
        self.emitter.emit(BridgeEvent::MeetingEnd { meeting_id });
        true
    }

    async fn event_loop(
        mut callbacks: mpsc::UnboundedReceiver<SdkCallback>,
        session_id: Uuid,
        state: SharedState,
        emitter: EventEmitter,
    ) {
        while let Some(callback) = callbacks.recv().await {
            if Self::apply_callback(&state, &emitter, session_id, callback).await {
                break;
            }
        }
        tracing::info!("sdk callback loop ended for session {session_id}");
    }

    /// Apply one SDK callback. Returns `true` once the session is gone.
    async fn apply_callback(
        state: &SharedState,
        emitter: &EventEmitter,
        session_id: Uuid,
        callback: SdkCallback,
    ) -> bool {
        let mut guard = state.lock().await;
        let BridgeState { session, devices } = &mut *guard;

        let meeting_id = match session.active() {
            Some(active) if active.handle().session_id == session_id => active.meeting_id.clone(),
            _ => {
                tracing::debug!("ignoring callback for stale session {session_id}: {callback:?}");
                return true;
            }
        };

        let (event, teardown) = observer::translate(callback, &meeting_id, devices);
        if let Some(BridgeEvent::DeviceChanged(DeviceChange::Available(_))) = &event {
            session.forget_unlisted_input(devices);
        }
        if teardown != Teardown::None {
            if let Some(ended) = session.end_session() {
                devices.clear();
                let mut handle = ended.into_handle();
                // this loop is the task being released
                handle.event_task = None;
                handle.release(teardown == Teardown::StopAndRelease);
                tracing::warn!("meeting {meeting_id} torn down by sdk ({teardown:?})");
            }
        }

        if let Some(event) = event {
            emitter.emit(event);
        }
        teardown != Teardown::None
    }
}
