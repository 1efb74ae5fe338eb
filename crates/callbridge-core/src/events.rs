use std::sync::{Arc, RwLock};

use serde_json::{Value, json};

use crate::devices::{AudioDeviceLists, AudioRoute};
use crate::sdk::RemoteAttendee;

/// Events emitted by the core to the UI layer.
///
/// Delivery is at-most-once with no replay: a listener registered late
/// misses everything emitted before it.
#[derive(Debug, Clone, PartialEq)]
pub enum BridgeEvent {
    MeetingStart { meeting_id: String },
    MeetingEnd { meeting_id: String },
    AttendeeJoin(RemoteAttendee),
    AttendeeLeave(RemoteAttendee),
    AudioStatusChanged { muted: bool },
    DeviceChanged(DeviceChange),
    Error { code: String, message: String, fatal: bool },
}

#[derive(Debug, Clone, PartialEq)]
pub enum DeviceChange {
    Input(String),
    Output(AudioRoute),
    /// The SDK reported a new device inventory.
    Available(AudioDeviceLists),
}

impl BridgeEvent {
    /// Event name on the UI event channel.
    pub fn name(&self) -> &'static str {
        match self {
            Self::MeetingStart { .. } => "onMeetingStart",
            Self::MeetingEnd { .. } => "onMeetingEnd",
            Self::AttendeeJoin(_) => "onAttendeeJoin",
            Self::AttendeeLeave(_) => "onAttendeeLeave",
            Self::AudioStatusChanged { .. } => "onAudioStatusChanged",
            Self::DeviceChanged(_) => "onDeviceChanged",
            Self::Error { .. } => "onError",
        }
    }

    /// Event body with the field names the UI layer reads.
    pub fn payload(&self) -> Value {
        match self {
            Self::MeetingStart { meeting_id } | Self::MeetingEnd { meeting_id } => {
                json!({ "meetingId": meeting_id })
            }
            Self::AttendeeJoin(a) | Self::AttendeeLeave(a) => match &a.external_user_id {
                Some(ext) => json!({ "attendeeId": a.attendee_id, "externalUserId": ext }),
                None => json!({ "attendeeId": a.attendee_id }),
            },
            Self::AudioStatusChanged { muted } => json!({ "muted": muted }),
            Self::DeviceChanged(DeviceChange::Input(id)) => json!({ "inputDevice": id }),
            Self::DeviceChanged(DeviceChange::Output(route)) => {
                json!({ "outputDevice": route.as_str() })
            }
            Self::DeviceChanged(DeviceChange::Available(lists)) => {
                serde_json::to_value(lists).unwrap_or(Value::Null)
            }
            Self::Error {
                code,
                message,
                fatal,
            } => json!({ "errorCode": code, "errorMessage": message, "fatal": fatal }),
        }
    }
}

/// Trait for receiving events from the core.
/// Implementations must be Send + Sync (called from tokio tasks) and must not
/// call back into the bridge from `on_event`.
pub trait BridgeEventListener: Send + Sync {
    fn on_event(&self, event: BridgeEvent);
}

/// Handle returned by [`EventEmitter::add_listener`], used to detach it again.
pub type ListenerId = u64;

/// Dispatches each event to every registered listener.
#[derive(Clone, Default)]
pub struct EventEmitter {
    listeners: Arc<RwLock<Listeners>>,
}

#[derive(Default)]
struct Listeners {
    next_id: ListenerId,
    entries: Vec<(ListenerId, Arc<dyn BridgeEventListener>)>,
}

impl EventEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_listener(&self, listener: Arc<dyn BridgeEventListener>) -> ListenerId {
        let mut listeners = self.listeners.write().unwrap_or_else(|e| e.into_inner());
        let id = listeners.next_id;
        listeners.next_id += 1;
        listeners.entries.push((id, listener));
        id
    }

    /// Detach one listener. Returns `false` if the id is unknown.
    pub fn remove_listener(&self, id: ListenerId) -> bool {
        let mut listeners = self.listeners.write().unwrap_or_else(|e| e.into_inner());
        let before = listeners.entries.len();
        listeners.entries.retain(|(entry_id, _)| *entry_id != id);
        before != listeners.entries.len()
    }

    pub fn remove_all_listeners(&self) {
        self.listeners
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .entries
            .clear();
    }

    pub fn listener_count(&self) -> usize {
        self.listeners
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .entries
            .len()
    }

    pub fn emit(&self, event: BridgeEvent) {
        tracing::debug!("emitting {}", event.name());
        let listeners = self.listeners.read().unwrap_or_else(|e| e.into_inner());
        for (_, listener) in listeners.entries.iter() {
            listener.on_event(event.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingListener {
        count: Arc<AtomicUsize>,
    }

    impl BridgeEventListener for CountingListener {
        fn on_event(&self, _event: BridgeEvent) {
            self.count.fetch_add(1, Ordering::SeqCst);
        }
    }

    struct EventCapture {
        events: Arc<Mutex<Vec<BridgeEvent>>>,
    }

    impl BridgeEventListener for EventCapture {
        fn on_event(&self, event: BridgeEvent) {
            self.events.lock().unwrap().push(event);
        }
    }

    #[test]
    fn emitter_dispatches_to_multiple_listeners() {
        let emitter = EventEmitter::new();
        let count1 = Arc::new(AtomicUsize::new(0));
        let count2 = Arc::new(AtomicUsize::new(0));

        emitter.add_listener(Arc::new(CountingListener { count: count1.clone() }));
        emitter.add_listener(Arc::new(CountingListener { count: count2.clone() }));
        emitter.emit(BridgeEvent::AudioStatusChanged { muted: true });

        assert_eq!(count1.load(Ordering::SeqCst), 1);
        assert_eq!(count2.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn removed_listener_stops_receiving() {
        let emitter = EventEmitter::new();
        let kept = Arc::new(AtomicUsize::new(0));
        let dropped = Arc::new(AtomicUsize::new(0));

        emitter.add_listener(Arc::new(CountingListener { count: kept.clone() }));
        let id = emitter.add_listener(Arc::new(CountingListener { count: dropped.clone() }));
        assert!(emitter.remove_listener(id));
        assert!(!emitter.remove_listener(id));
        emitter.emit(BridgeEvent::AudioStatusChanged { muted: false });

        assert_eq!(kept.load(Ordering::SeqCst), 1);
        assert_eq!(dropped.load(Ordering::SeqCst), 0);
        assert_eq!(emitter.listener_count(), 1);
    }

    #[test]
    fn remounting_does_not_accumulate_listeners() {
        let emitter = EventEmitter::new();
        let count = Arc::new(AtomicUsize::new(0));
        for _ in 0..3 {
            emitter.remove_all_listeners();
            emitter.add_listener(Arc::new(CountingListener { count: count.clone() }));
        }
        assert_eq!(emitter.listener_count(), 1);

        emitter.emit(BridgeEvent::MeetingStart { meeting_id: "m-1".into() });
        assert_eq!(count.load(Ordering::SeqCst), 1);

        emitter.remove_all_listeners();
        emitter.emit(BridgeEvent::MeetingEnd { meeting_id: "m-1".into() });
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn late_listener_misses_earlier_events() {
        let emitter = EventEmitter::new();
        emitter.emit(BridgeEvent::MeetingStart { meeting_id: "m-1".into() });

        let events = Arc::new(Mutex::new(Vec::new()));
        emitter.add_listener(Arc::new(EventCapture { events: events.clone() }));
        emitter.emit(BridgeEvent::MeetingEnd { meeting_id: "m-1".into() });

        let captured = events.lock().unwrap();
        assert_eq!(captured.len(), 1);
        assert_eq!(captured[0].name(), "onMeetingEnd");
    }

    #[test]
    fn payloads_use_ui_field_names() {
        let start = BridgeEvent::MeetingStart { meeting_id: "m-1".into() };
        assert_eq!(start.payload(), json!({ "meetingId": "m-1" }));

        let output = BridgeEvent::DeviceChanged(DeviceChange::Output(AudioRoute::Bluetooth));
        assert_eq!(output.payload(), json!({ "outputDevice": "bluetooth" }));

        let join = BridgeEvent::AttendeeJoin(RemoteAttendee {
            attendee_id: "a-2".into(),
            external_user_id: Some("agent-7".into()),
        });
        assert_eq!(join.name(), "onAttendeeJoin");
        assert_eq!(join.payload()["externalUserId"], "agent-7");

        let err = BridgeEvent::Error {
            code: "SDK_ERROR".into(),
            message: "media lost".into(),
            fatal: true,
        };
        assert_eq!(err.payload()["errorCode"], "SDK_ERROR");
        assert_eq!(err.payload()["fatal"], true);
    }
}
