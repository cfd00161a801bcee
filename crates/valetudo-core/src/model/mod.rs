// ── Domain model ──
//
// Canonical types the engine and its consumers reason about. Everything
// here is produced from wire types in `valetudo_api::models` by `convert`.

pub mod fan;
pub mod status;

pub use fan::FanPreset;
pub use status::{ChargingState, DeviceState, LOW_BATTERY_THRESHOLD, Status};

/// Volume level below which the speaker counts as muted.
pub const MUTE_THRESHOLD: u8 = 10;

/// Named coordinates for spot cleaning.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Spot {
    pub name: String,
    pub x: i64,
    pub y: i64,
}
