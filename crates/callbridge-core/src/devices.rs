use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::errors::BridgeError;
use crate::sdk::{MediaDevice, MediaDeviceType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceKind {
    Input,
    Output,
}

impl DeviceKind {
    /// Audio devices only; video and unknown devices have no kind.
    pub fn of(device_type: MediaDeviceType) -> Option<Self> {
        match device_type {
            MediaDeviceType::AudioInput => Some(Self::Input),
            MediaDeviceType::AudioOutput => Some(Self::Output),
            MediaDeviceType::Video | MediaDeviceType::Other => None,
        }
    }
}

/// OS-level audio output path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AudioRoute {
    Speaker,
    Earpiece,
    Bluetooth,
    Wired,
}

impl AudioRoute {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Speaker => "speaker",
            Self::Earpiece => "earpiece",
            Self::Bluetooth => "bluetooth",
            Self::Wired => "wired",
        }
    }
}

impl fmt::Display for AudioRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AudioRoute {
    type Err = BridgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "speaker" => Ok(Self::Speaker),
            // iOS calls the earpiece the receiver
            "earpiece" | "receiver" => Ok(Self::Earpiece),
            "bluetooth" => Ok(Self::Bluetooth),
            "wired" => Ok(Self::Wired),
            other => Err(BridgeError::InvalidDevice(other.to_string())),
        }
    }
}

/// An enumerated audio endpoint, resolved from the SDK's device list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceDescriptor {
    pub id: String,
    pub label: String,
    pub kind: DeviceKind,
    device: MediaDevice,
}

impl DeviceDescriptor {
    pub fn from_media(device: MediaDevice) -> Option<Self> {
        let kind = DeviceKind::of(device.device_type)?;
        Some(Self {
            id: device.label.clone(),
            label: device.label.clone(),
            kind,
            device,
        })
    }

    /// The SDK handle to pass back when choosing this device.
    pub fn media_device(&self) -> &MediaDevice {
        &self.device
    }
}

/// Boundary shape of a device: `{deviceId, label}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioDevice {
    pub device_id: String,
    pub label: String,
}

impl From<&DeviceDescriptor> for AudioDevice {
    fn from(d: &DeviceDescriptor) -> Self {
        Self {
            device_id: d.id.clone(),
            label: d.label.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioDeviceLists {
    pub input_devices: Vec<AudioDevice>,
    pub output_devices: Vec<AudioDevice>,
}

/// Holds the most recent device enumeration.
///
/// Snapshots are replaced wholesale, never merged. Lookups are scoped to a
/// kind so an id present in both lists resolves unambiguously.
#[derive(Debug, Clone, Default)]
pub struct DeviceRegistry {
    devices: Vec<DeviceDescriptor>,
}

impl DeviceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn refresh(&mut self, devices: Vec<DeviceDescriptor>) {
        self.devices = devices;
    }

    /// Replace the snapshot from a raw SDK list, dropping non-audio devices.
    pub fn refresh_from_media(&mut self, devices: Vec<MediaDevice>) -> AudioDeviceLists {
        self.refresh(
            devices
                .into_iter()
                .filter_map(DeviceDescriptor::from_media)
                .collect(),
        );
        self.lists()
    }

    pub fn find_by_id(&self, id: &str, kind: DeviceKind) -> Option<&DeviceDescriptor> {
        self.devices.iter().find(|d| d.kind == kind && d.id == id)
    }

    pub fn lists(&self) -> AudioDeviceLists {
        let mut lists = AudioDeviceLists::default();
        for device in &self.devices {
            match device.kind {
                DeviceKind::Input => lists.input_devices.push(device.into()),
                DeviceKind::Output => lists.output_devices.push(device.into()),
            }
        }
        lists
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.devices.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    pub fn clear(&mut self) {
        self.devices.clear();
    }
}
