// ── Command API ──
//
// All state-changing operations flow through a unified `Command` enum.
// The controller routes each variant either through the shared
// check → send → settle → refresh pipeline or, for commands that do not
// change the reported status (volume, locate), straight to the transport.

use serde_json::Value;
use valetudo_api::Endpoint;

use crate::model::{DeviceState, FanPreset, Status};

/// All write operations against a Valetudo vacuum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    // ── Cleaning ─────────────────────────────────────────────────────
    StartCleaning,
    StopCleaning,
    /// Switch-style toggle: `on = false` only stops an active clean.
    SetCleaning {
        on: bool,
    },
    GoHome,
    SpotClean {
        name: String,
    },

    // ── Fan power ────────────────────────────────────────────────────
    SetFanSpeed {
        preset: FanPreset,
    },
    SetHighSpeed {
        on: bool,
    },
    SetMop {
        on: bool,
    },

    // ── Sound ────────────────────────────────────────────────────────
    SetVolume {
        level: u8,
    },
    SetMute {
        muted: bool,
    },
    TestVolume,

    // ── Misc ─────────────────────────────────────────────────────────
    Locate,
}

/// Result of a command execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandResult {
    /// The device acknowledged the command.
    Accepted,
    /// The request failed; the follow-up refresh shows what really happened.
    Unconfirmed { reason: String },
    /// The device was already in the requested mode; nothing was sent.
    Unchanged,
}

impl CommandResult {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted)
    }
}

/// One trip through the command pipeline.
pub(crate) struct PipelineStep {
    pub operation: &'static str,
    pub endpoint: Endpoint,
    pub body: Option<Value>,
    /// Checked against a non-forced read before anything is sent.
    pub allowed: Option<fn(&Status) -> bool>,
}

impl PipelineStep {
    pub fn new(operation: &'static str, endpoint: Endpoint) -> Self {
        Self {
            operation,
            endpoint,
            body: None,
            allowed: None,
        }
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn when(mut self, allowed: fn(&Status) -> bool) -> Self {
        self.allowed = Some(allowed);
        self
    }
}

/// Stopping is refused in states where there is no clean to stop.
pub(crate) fn can_stop_cleaning(status: &Status) -> bool {
    !matches!(
        status.state,
        DeviceState::Idle
            | DeviceState::ReturningHome
            | DeviceState::Charging
            | DeviceState::Paused
            | DeviceState::SpotCleaning
            | DeviceState::Docking
            | DeviceState::GoingToTarget
    )
}

#[cfg(test)]
mod tests {
    use serde_json::Map;

    use super::*;

    fn status(state: DeviceState) -> Status {
        Status {
            state,
            battery: 50,
            fan_power: 101,
            extra: Map::new(),
        }
    }

    #[test]
    fn stop_is_refused_when_nothing_is_running() {
        for state in [
            DeviceState::Idle,
            DeviceState::ReturningHome,
            DeviceState::Charging,
            DeviceState::Paused,
            DeviceState::SpotCleaning,
            DeviceState::Docking,
            DeviceState::GoingToTarget,
        ] {
            assert!(!can_stop_cleaning(&status(state)), "{state} should refuse");
        }
    }

    #[test]
    fn stop_is_allowed_while_cleaning() {
        assert!(can_stop_cleaning(&status(DeviceState::Cleaning)));
        assert!(can_stop_cleaning(&status(DeviceState::ZoneCleaning)));
    }
}
