// ── Wire-to-domain conversion ──
//
// Raw API responses become domain types here and nowhere else.

use serde_json::Value;
use valetudo_api::models::{FirmwareResponse, StatusResponse, VolumeResponse};

use crate::error::CoreError;
use crate::model::{DeviceState, Status};

impl From<StatusResponse> for Status {
    fn from(raw: StatusResponse) -> Self {
        Self {
            state: DeviceState::from(raw.state),
            battery: raw.battery.min(100),
            fan_power: raw.fan_power,
            extra: raw.extra,
        }
    }
}

/// Parse a `current_status` body into a `Status`.
pub(crate) fn parse_status(value: Value) -> Result<Status, CoreError> {
    serde_json::from_value::<StatusResponse>(value)
        .map(Status::from)
        .map_err(|e| CoreError::Parse {
            message: format!("invalid status payload: {e}"),
        })
}

pub(crate) fn parse_volume(value: Value) -> Result<u8, CoreError> {
    serde_json::from_value::<VolumeResponse>(value)
        .map(|v| v.volume)
        .map_err(|e| CoreError::Parse {
            message: format!("invalid volume payload: {e}"),
        })
}

pub(crate) fn parse_firmware(value: Value) -> Result<String, CoreError> {
    serde_json::from_value::<FirmwareResponse>(value)
        .map(|fw| fw.version)
        .map_err(|e| CoreError::Parse {
            message: format!("invalid firmware payload: {e}"),
        })
}
