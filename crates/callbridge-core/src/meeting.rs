use serde::{Deserialize, Serialize};

use crate::errors::BridgeError;

pub const DEFAULT_MEDIA_REGION: &str = "us-east-1";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MediaPlacement {
    #[serde(default)]
    pub audio_host_url: String,
    #[serde(default)]
    pub signaling_url: String,
    #[serde(default)]
    pub turn_control_url: String,
}

/// Meeting description as produced by the meeting service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MeetingInfo {
    #[serde(default)]
    pub meeting_id: Option<String>,
    #[serde(default)]
    pub media_region: Option<String>,
    #[serde(default)]
    pub media_placement: Option<MediaPlacement>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AttendeeInfo {
    #[serde(default)]
    pub attendee_id: Option<String>,
    #[serde(default)]
    pub join_token: Option<String>,
    #[serde(default)]
    pub external_user_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeetingSessionCredentials {
    pub attendee_id: String,
    pub external_user_id: Option<String>,
    pub join_token: String,
}

/// Everything the SDK needs to build a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeetingSessionConfiguration {
    pub meeting_id: String,
    pub media_region: String,
    pub media_placement: MediaPlacement,
    pub credentials: MeetingSessionCredentials,
}

fn required(value: &Option<String>, field: &str) -> Result<String, BridgeError> {
    match value.as_deref() {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(BridgeError::InvalidParams(format!("missing {field}"))),
    }
}

impl MeetingSessionConfiguration {
    /// Validate join input and assemble the SDK configuration.
    ///
    /// `MeetingId`, `AttendeeId` and `JoinToken` must be present and
    /// non-empty. Region and media placement fall back to defaults.
    pub fn from_join_info(
        meeting: &MeetingInfo,
        attendee: &AttendeeInfo,
    ) -> Result<Self, BridgeError> {
        let meeting_id = required(&meeting.meeting_id, "MeetingId")?;
        let attendee_id = required(&attendee.attendee_id, "AttendeeId")?;
        let join_token = required(&attendee.join_token, "JoinToken")?;

        Ok(Self {
            meeting_id,
            media_region: meeting
                .media_region
                .clone()
                .filter(|r| !r.is_empty())
                .unwrap_or_else(|| DEFAULT_MEDIA_REGION.to_string()),
            media_placement: meeting.media_placement.clone().unwrap_or_default(),
            credentials: MeetingSessionCredentials {
                attendee_id,
                external_user_id: attendee.external_user_id.clone(),
                join_token,
            },
        })
    }
}

/// Source of meeting descriptions for `createMeeting`.
pub trait MeetingProvisioner: Send + Sync {
    fn create_meeting(&self, meeting_id: &str) -> Result<MeetingInfo, BridgeError>;
}

/// Stand-in for the meeting service: echoes the id with placeholder media
/// placement. No backend is contacted.
#[derive(Debug, Clone)]
pub struct PlaceholderProvisioner {
    media_region: String,
}

impl PlaceholderProvisioner {
    pub fn new(media_region: impl Into<String>) -> Self {
        Self {
            media_region: media_region.into(),
        }
    }
}

impl Default for PlaceholderProvisioner {
    fn default() -> Self {
        Self::new(DEFAULT_MEDIA_REGION)
    }
}

impl MeetingProvisioner for PlaceholderProvisioner {
    fn create_meeting(&self, meeting_id: &str) -> Result<MeetingInfo, BridgeError> {
        if meeting_id.is_empty() {
            return Err(BridgeError::InvalidParams("missing MeetingId".into()));
        }
        Ok(MeetingInfo {
            meeting_id: Some(meeting_id.to_string()),
            media_region: Some(self.media_region.clone()),
            media_placement: Some(MediaPlacement {
                audio_host_url: "placeholder-audio-host-url".into(),
                signaling_url: "placeholder-signaling-url".into(),
                turn_control_url: "placeholder-turn-control-url".into(),
            }),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attendee(id: Option<&str>, token: Option<&str>) -> AttendeeInfo {
        AttendeeInfo {
            attendee_id: id.map(String::from),
            join_token: token.map(String::from),
            external_user_id: None,
        }
    }

    #[test]
    fn configuration_from_complete_info() {
        let meeting = PlaceholderProvisioner::new("eu-west-1")
            .create_meeting("m-1")
            .unwrap();
        let config =
            MeetingSessionConfiguration::from_join_info(&meeting, &attendee(Some("a-1"), Some("t")))
                .unwrap();
        assert_eq!(config.meeting_id, "m-1");
        assert_eq!(config.media_region, "eu-west-1");
        assert_eq!(config.credentials.attendee_id, "a-1");
        assert_eq!(config.media_placement.signaling_url, "placeholder-signaling-url");
    }

    #[test]
    fn missing_fields_are_invalid_params() {
        let meeting = MeetingInfo {
            meeting_id: Some("m-1".into()),
            ..Default::default()
        };
        let incomplete = [
            attendee(None, Some("t")),
            attendee(Some("a"), None),
            attendee(Some(""), Some("t")),
        ];
        for info in incomplete {
            let err = MeetingSessionConfiguration::from_join_info(&meeting, &info).unwrap_err();
            assert_eq!(err.code(), "INVALID_PARAMS");
        }
        let err = MeetingSessionConfiguration::from_join_info(
            &MeetingInfo::default(),
            &attendee(Some("a"), Some("t")),
        )
        .unwrap_err();
        assert_eq!(err, BridgeError::InvalidParams("missing MeetingId".into()));
    }

    #[test]
    fn region_defaults_when_absent() {
        let meeting = MeetingInfo {
            meeting_id: Some("m-1".into()),
            ..Default::default()
        };
        let config =
            MeetingSessionConfiguration::from_join_info(&meeting, &attendee(Some("a"), Some("t")))
                .unwrap();
        assert_eq!(config.media_region, DEFAULT_MEDIA_REGION);
        assert_eq!(config.media_placement, MediaPlacement::default());
    }

    #[test]
    fn parses_service_json_shape() {
        let meeting: MeetingInfo = serde_json::from_str(
            r#"{"MeetingId":"m-9","MediaRegion":"us-west-2",
                "MediaPlacement":{"AudioHostUrl":"a","SignalingUrl":"s","TurnControlUrl":"t"}}"#,
        )
        .unwrap();
        assert_eq!(meeting.meeting_id.as_deref(), Some("m-9"));
        assert_eq!(meeting.media_placement.unwrap().turn_control_url, "t");

        let attendee: AttendeeInfo =
            serde_json::from_str(r#"{"AttendeeId":"a-9","JoinToken":"tok"}"#).unwrap();
        assert_eq!(attendee.join_token.as_deref(), Some("tok"));
        assert!(attendee.external_user_id.is_none());
    }

    #[test]
    fn placeholder_rejects_empty_id() {
        let err = PlaceholderProvisioner::default().create_meeting("").unwrap_err();
        assert_eq!(err.code(), "INVALID_PARAMS");
    }
}
