// Valetudo endpoint table
//
// Every request the engine makes goes to one of these fixed paths. The
// method is part of the endpoint, so callers cannot pair a path with the
// wrong verb.

use std::fmt;

use reqwest::Method;

/// A fixed Valetudo API endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    CurrentStatus,
    StartCleaning,
    StopCleaning,
    DriveHome,
    FanSpeed,
    GoTo,
    SetSoundVolume,
    GetSoundVolume,
    TestSoundVolume,
    FindRobot,
    GetConfig,
    GetFirmwareVersion,
}

impl Endpoint {
    /// Absolute request path, e.g. `/api/current_status`.
    pub fn path(self) -> &'static str {
        match self {
            Self::CurrentStatus => "/api/current_status",
            Self::StartCleaning => "/api/start_cleaning",
            Self::StopCleaning => "/api/stop_cleaning",
            Self::DriveHome => "/api/drive_home",
            Self::FanSpeed => "/api/fanspeed",
            Self::GoTo => "/api/go_to",
            Self::SetSoundVolume => "/api/set_sound_volume",
            Self::GetSoundVolume => "/api/get_sound_volume",
            Self::TestSoundVolume => "/api/test_sound_volume",
            Self::FindRobot => "/api/find_robot",
            Self::GetConfig => "/api/get_config",
            Self::GetFirmwareVersion => "/api/get_fw_version",
        }
    }

    /// HTTP method the device expects for this endpoint.
    pub fn method(self) -> Method {
        match self {
            Self::CurrentStatus
            | Self::GetSoundVolume
            | Self::GetConfig
            | Self::GetFirmwareVersion => Method::GET,
            Self::StartCleaning
            | Self::StopCleaning
            | Self::DriveHome
            | Self::FanSpeed
            | Self::GoTo
            | Self::SetSoundVolume
            | Self::TestSoundVolume
            | Self::FindRobot => Method::PUT,
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method(), self.path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_are_get_and_commands_are_put() {
        assert_eq!(Endpoint::CurrentStatus.method(), Method::GET);
        assert_eq!(Endpoint::GetFirmwareVersion.method(), Method::GET);
        assert_eq!(Endpoint::FanSpeed.method(), Method::PUT);
        assert_eq!(Endpoint::FindRobot.method(), Method::PUT);
    }

    #[test]
    fn display_includes_method_and_path() {
        assert_eq!(Endpoint::GoTo.to_string(), "PUT /api/go_to");
    }
}
