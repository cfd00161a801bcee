// ── Vacuum status snapshot ──

use std::fmt;

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use super::fan::FanPreset;

/// Battery percentage below which the battery is reported as low.
pub const LOW_BATTERY_THRESHOLD: u8 = 20;

/// Operating state reported by the firmware.
///
/// Codes outside the known range are kept as `Unknown` so a firmware update
/// never breaks status parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceState {
    Starting,
    ChargerDisconnected,
    Idle,
    RemoteActive,
    Cleaning,
    ReturningHome,
    ManualMode,
    Charging,
    ChargingProblem,
    Paused,
    SpotCleaning,
    Error,
    ShuttingDown,
    Updating,
    Docking,
    GoingToTarget,
    ZoneCleaning,
    Unknown(u8),
}

impl DeviceState {
    pub fn code(self) -> u8 {
        match self {
            Self::Starting => 1,
            Self::ChargerDisconnected => 2,
            Self::Idle => 3,
            Self::RemoteActive => 4,
            Self::Cleaning => 5,
            Self::ReturningHome => 6,
            Self::ManualMode => 7,
            Self::Charging => 8,
            Self::ChargingProblem => 9,
            Self::Paused => 10,
            Self::SpotCleaning => 11,
            Self::Error => 12,
            Self::ShuttingDown => 13,
            Self::Updating => 14,
            Self::Docking => 15,
            Self::GoingToTarget => 16,
            Self::ZoneCleaning => 17,
            Self::Unknown(code) => code,
        }
    }

    /// Kebab-case name used in logs, errors, and CLI output.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Starting => "starting",
            Self::ChargerDisconnected => "charger-disconnected",
            Self::Idle => "idle",
            Self::RemoteActive => "remote-active",
            Self::Cleaning => "cleaning",
            Self::ReturningHome => "returning-home",
            Self::ManualMode => "manual-mode",
            Self::Charging => "charging",
            Self::ChargingProblem => "charging-problem",
            Self::Paused => "paused",
            Self::SpotCleaning => "spot-cleaning",
            Self::Error => "error",
            Self::ShuttingDown => "shutting-down",
            Self::Updating => "updating",
            Self::Docking => "docking",
            Self::GoingToTarget => "going-to-target",
            Self::ZoneCleaning => "zone-cleaning",
            Self::Unknown(_) => "unknown",
        }
    }

    /// Docked and not working: the long refresh budget applies.
    pub fn is_resting(self) -> bool {
        matches!(self, Self::Idle | Self::Charging)
    }
}

impl From<u8> for DeviceState {
    fn from(code: u8) -> Self {
        match code {
            1 => Self::Starting,
            2 => Self::ChargerDisconnected,
            3 => Self::Idle,
            4 => Self::RemoteActive,
            5 => Self::Cleaning,
            6 => Self::ReturningHome,
            7 => Self::ManualMode,
            8 => Self::Charging,
            9 => Self::ChargingProblem,
            10 => Self::Paused,
            11 => Self::SpotCleaning,
            12 => Self::Error,
            13 => Self::ShuttingDown,
            14 => Self::Updating,
            15 => Self::Docking,
            16 => Self::GoingToTarget,
            17 => Self::ZoneCleaning,
            other => Self::Unknown(other),
        }
    }
}

impl fmt::Display for DeviceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown(code) => write!(f, "unknown ({code})"),
            other => f.write_str(other.as_str()),
        }
    }
}

impl Serialize for DeviceState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Charging classification derived from the device state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum::Display)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum ChargingState {
    Charging,
    NotCharging,
    /// Off the dock with a charger problem or no charger at all.
    NotChargeable,
}

/// Immutable status snapshot from `GET /api/current_status`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Status {
    pub state: DeviceState,
    pub battery: u8,
    pub fan_power: u16,
    /// Every other field the firmware reported, untouched.
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub extra: Map<String, Value>,
}

impl Status {
    pub fn is_cleaning(&self) -> bool {
        self.state == DeviceState::Cleaning
    }

    pub fn is_going_home(&self) -> bool {
        self.state == DeviceState::ReturningHome
    }

    pub fn is_spot_cleaning(&self) -> bool {
        self.state == DeviceState::SpotCleaning
    }

    pub fn is_battery_low(&self) -> bool {
        self.battery < LOW_BATTERY_THRESHOLD
    }

    pub fn charging(&self) -> ChargingState {
        match self.state {
            DeviceState::Charging => ChargingState::Charging,
            DeviceState::ChargerDisconnected | DeviceState::ChargingProblem => {
                ChargingState::NotChargeable
            }
            _ => ChargingState::NotCharging,
        }
    }

    /// The preset matching the reported fan power, if it is one.
    pub fn fan_preset(&self) -> Option<FanPreset> {
        FanPreset::from_code(self.fan_power)
    }
}
