use crate::devices::{AudioRoute, DeviceKind, DeviceRegistry};
use crate::errors::BridgeError;

/// The one live conferencing engagement and the handle bound to it.
#[derive(Debug)]
pub struct ActiveSession<H> {
    pub meeting_id: String,
    pub attendee_id: String,
    pub muted: bool,
    pub input_device: Option<String>,
    pub output_route: Option<AudioRoute>,
    handle: H,
}

impl<H> ActiveSession<H> {
    pub fn handle(&self) -> &H {
        &self.handle
    }

    pub fn into_handle(self) -> H {
        self.handle
    }
}

/// Read-only copy of the session slot for callers outside the lock.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub active: bool,
    pub meeting_id: Option<String>,
    pub attendee_id: Option<String>,
    pub muted: bool,
    pub input_device: Option<String>,
    pub output_route: Option<AudioRoute>,
}

/// Single-slot holder for "no session" vs "active session".
///
/// The handle lives inside the active slot, so the flag and the existence of
/// a handle cannot disagree.
#[derive(Debug)]
pub struct SessionState<H> {
    active: Option<ActiveSession<H>>,
}

impl<H> Default for SessionState<H> {
    fn default() -> Self {
        Self { active: None }
    }
}

impl<H> SessionState<H> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin_session(
        &mut self,
        meeting_id: String,
        attendee_id: String,
        handle: H,
    ) -> Result<(), BridgeError> {
        if self.active.is_some() {
            return Err(BridgeError::AlreadyActive);
        }
        self.active = Some(ActiveSession {
            meeting_id,
            attendee_id,
            muted: false,
            input_device: None,
            output_route: None,
            handle,
        });
        Ok(())
    }

    /// Take the session out of the slot. `None` means nothing was active.
    pub fn end_session(&mut self) -> Option<ActiveSession<H>> {
        self.active.take()
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn active(&self) -> Option<&ActiveSession<H>> {
        self.active.as_ref()
    }

    pub fn require_active(&self) -> Result<&ActiveSession<H>, BridgeError> {
        self.active.as_ref().ok_or(BridgeError::NoActiveSession)
    }

    fn require_active_mut(&mut self) -> Result<&mut ActiveSession<H>, BridgeError> {
        self.active.as_mut().ok_or(BridgeError::NoActiveSession)
    }

    pub fn set_muted(&mut self, muted: bool) -> Result<(), BridgeError> {
        self.require_active_mut()?.muted = muted;
        Ok(())
    }

    pub fn current_mute(&self) -> Result<bool, BridgeError> {
        Ok(self.require_active()?.muted)
    }

    pub fn set_input_device(&mut self, id: String) -> Result<(), BridgeError> {
        self.require_active_mut()?.input_device = Some(id);
        Ok(())
    }

    pub fn set_output_route(&mut self, route: AudioRoute) -> Result<(), BridgeError> {
        self.require_active_mut()?.output_route = Some(route);
        Ok(())
    }

    /// Drop the selected input when the current enumeration no longer has it.
    pub fn forget_unlisted_input(&mut self, devices: &DeviceRegistry) {
        let Some(active) = self.active.as_mut() else {
            return;
        };
        let unlisted = active
            .input_device
            .as_deref()
            .is_some_and(|id| devices.find_by_id(id, DeviceKind::Input).is_none());
        if unlisted {
            tracing::info!(
                "selected input {} no longer available",
                active.input_device.as_deref().unwrap_or_default()
            );
            active.input_device = None;
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        match &self.active {
            Some(s) => SessionSnapshot {
                active: true,
                meeting_id: Some(s.meeting_id.clone()),
                attendee_id: Some(s.attendee_id.clone()),
                muted: s.muted,
                input_device: s.input_device.clone(),
                output_route: s.output_route,
            },
            None => SessionSnapshot::default(),
        }
    }
}
