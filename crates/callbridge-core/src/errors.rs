use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BridgeError {
    #[error("invalid meeting or attendee info: {0}")]
    InvalidParams(String),
    #[error("failed to join meeting: {0}")]
    JoinFailed(String),
    #[error("a meeting session is already active")]
    AlreadyActive,
    #[error("no active meeting session")]
    NoActiveSession,
    #[error("audio device not found: {0}")]
    DeviceNotFound(String),
    #[error("unknown audio output device: {0}")]
    InvalidDevice(String),
    #[error("failed to set audio route: {0}")]
    AudioRoute(String),
    #[error("audio session error: {0}")]
    AudioSession(String),
    #[error("failed to get audio focus")]
    AudioFocusDenied,
    #[error("error requesting audio focus: {0}")]
    AudioFocus(String),
    #[error("{operation} failed: {reason}")]
    Sdk {
        operation: &'static str,
        reason: String,
    },
}

impl BridgeError {
    /// Stable identifier reported to the UI layer alongside the message.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidParams(_) => "INVALID_PARAMS",
            Self::JoinFailed(_) | Self::AlreadyActive => "JOIN_MEETING_FAILED",
            Self::NoActiveSession => "NO_ACTIVE_SESSION",
            Self::DeviceNotFound(_) => "DEVICE_NOT_FOUND",
            Self::InvalidDevice(_) => "INVALID_DEVICE",
            Self::AudioRoute(_) => "AUDIO_ROUTE_ERROR",
            Self::AudioSession(_) => "AUDIO_SESSION_ERROR",
            Self::AudioFocusDenied => "AUDIO_FOCUS_DENIED",
            Self::AudioFocus(_) => "AUDIO_FOCUS_ERROR",
            Self::Sdk { .. } => "SDK_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn double_join_reports_join_failure_code() {
        assert_eq!(BridgeError::AlreadyActive.code(), "JOIN_MEETING_FAILED");
        assert_eq!(
            BridgeError::JoinFailed("boom".into()).to_string(),
            "failed to join meeting: boom"
        );
    }

    #[test]
    fn sdk_error_message_names_operation() {
        let err = BridgeError::Sdk {
            operation: "mute",
            reason: "engine stopped".into(),
        };
        assert_eq!(err.code(), "SDK_ERROR");
        assert_eq!(err.to_string(), "mute failed: engine stopped");
    }
}
