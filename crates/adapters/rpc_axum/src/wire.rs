//! Request and response messages as they appear on the wire.
//!
//! Field names follow the camelCase of the service definitions
//! (`currentTemp`, `deviceType`).

use serde::{Deserialize, Serialize};

use hearth_app::services::device_service::{DeviceAck, DeviceCommand, OnlineDevice};
use hearth_app::services::security_service::{SecurityActionRequest, SecurityBatch};
use hearth_app::services::thermostat_service::TemperatureSnapshot;

/// A scalar sent either as a JSON number or a JSON string.
///
/// Rooms travel as `"1"` from the menu client but as `1` from typed
/// clients; enum values may arrive by name or by number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Number(i64),
    Text(String),
}

impl Scalar {
    /// The value as text, as handed to domain parsers.
    #[must_use]
    pub fn into_text(self) -> String {
        match self {
            Self::Number(n) => n.to_string(),
            Self::Text(s) => s,
        }
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Self::Number(value)
    }
}

// ---------------------------------------------------------------------------
// Thermostat
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetTemperatureRequest {
    pub room: Scalar,
    pub temperature: f64,
}

/// Request for calls that only name a room.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomRequest {
    pub room: Scalar,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemperatureResponse {
    pub success: bool,
    pub current_temp: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StreamTemperaturesRequest {
    #[serde(default)]
    pub rooms: Vec<Scalar>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemperaturesMessage {
    pub temperatures: Vec<f64>,
}

impl From<TemperatureSnapshot> for TemperaturesMessage {
    fn from(snapshot: TemperatureSnapshot) -> Self {
        Self {
            temperatures: snapshot
                .temperatures
                .into_iter()
                .map(|t| t.celsius())
                .collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Security
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LockRequest {
    pub room: Scalar,
    #[serde(default)]
    pub on: bool,
}

/// `{success}` acknowledgment shared by several calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuccessResponse {
    pub success: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockStateResponse {
    pub success: bool,
    pub locked: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityActionMessage {
    pub action: Scalar,
    pub room: Scalar,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SecurityActionsRequest {
    #[serde(default)]
    pub actions: Vec<SecurityActionMessage>,
}

impl From<SecurityActionsRequest> for SecurityBatch {
    fn from(request: SecurityActionsRequest) -> Self {
        Self {
            actions: request
                .actions
                .into_iter()
                .map(|message| SecurityActionRequest {
                    action: message.action.into_text(),
                    room: message.room.into_text(),
                })
                .collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Device
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceControlRequest {
    pub room: Scalar,
    pub device_type: String,
    pub action: String,
}

impl From<DeviceControlRequest> for DeviceCommand {
    fn from(request: DeviceControlRequest) -> Self {
        Self {
            room: request.room.into_text(),
            device_type: request.device_type,
            action: request.action,
        }
    }
}

impl From<DeviceAck> for SuccessResponse {
    fn from(ack: DeviceAck) -> Self {
        Self {
            success: ack.success,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnlineDeviceMessage {
    pub device_type: String,
    pub room: u8,
    pub room_name: String,
}

impl From<OnlineDevice> for OnlineDeviceMessage {
    fn from(device: OnlineDevice) -> Self {
        Self {
            device_type: device.device_type.to_string(),
            room: device.room.number(),
            room_name: device.room.name().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OnlineDevicesResponse {
    pub devices: Vec<OnlineDeviceMessage>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use hearth_domain::temperature::Temperature;

    #[test]
    fn should_accept_room_as_string_or_number() {
        let text: RoomRequest = serde_json::from_str(r#"{"room":"3"}"#).unwrap();
        let number: RoomRequest = serde_json::from_str(r#"{"room":3}"#).unwrap();
        assert_eq!(text.room.into_text(), "3");
        assert_eq!(number.room.into_text(), "3");
    }

    #[test]
    fn should_serialize_temperature_response_in_camel_case() {
        let json = serde_json::to_value(TemperatureResponse {
            success: true,
            current_temp: 21.5,
        })
        .unwrap();
        assert_eq!(json, serde_json::json!({"success": true, "currentTemp": 21.5}));
    }

    #[test]
    fn should_default_lock_flag_to_off() {
        let request: LockRequest = serde_json::from_str(r#"{"room":"1"}"#).unwrap();
        assert!(!request.on);
    }

    #[test]
    fn should_convert_security_actions_by_name_or_number() {
        let request: SecurityActionsRequest = serde_json::from_str(
            r#"{"actions":[{"action":"LOCK_ON","room":"1"},{"action":1,"room":2}]}"#,
        )
        .unwrap();
        let batch = SecurityBatch::from(request);
        assert_eq!(batch.actions[0].action, "LOCK_ON");
        assert_eq!(batch.actions[1].action, "1");
        assert_eq!(batch.actions[1].room, "2");
    }

    #[test]
    fn should_read_device_type_in_camel_case() {
        let request: DeviceControlRequest =
            serde_json::from_str(r#"{"room":"1","deviceType":"TV","action":"on"}"#).unwrap();
        let command = DeviceCommand::from(request);
        assert_eq!(command.device_type, "TV");
        assert_eq!(command.room, "1");
    }

    #[test]
    fn should_flatten_snapshot_into_plain_numbers() {
        let message = TemperaturesMessage::from(TemperatureSnapshot {
            temperatures: vec![Temperature::new(22.0), Temperature::UNSET],
        });
        assert_eq!(message.temperatures, vec![22.0, 0.0]);
    }
}
