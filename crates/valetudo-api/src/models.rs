// Raw wire types for the Valetudo API
//
// These mirror the JSON shapes the firmware sends and accepts. Numeric codes
// stay numeric here; `valetudo-core` converts them into closed enums.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// `GET /api/current_status`
///
/// Only the fields the engine reasons about are typed. Everything else the
/// firmware reports (clean area, error code, DND flag, ...) is kept verbatim
/// in `extra`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub state: u8,
    pub battery: u8,
    #[serde(default)]
    pub fan_power: u16,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// `GET /api/get_sound_volume`
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct VolumeResponse {
    pub volume: u8,
}

/// `GET /api/get_fw_version`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FirmwareResponse {
    pub version: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// `PUT /api/fanspeed`
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FanSpeedRequest {
    pub speed: u16,
}

/// `PUT /api/go_to`
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct GoToRequest {
    pub x: i64,
    pub y: i64,
}

/// `PUT /api/set_sound_volume`
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct VolumeRequest {
    pub volume: u8,
}
