// ── Adaptive refresh interval ──
//
// One staleness budget drives both cache freshness and the background
// timer delay, so the two can never disagree.

use std::time::Duration;

use crate::model::Status;

pub const DEFAULT_ACTIVE_INTERVAL: Duration = Duration::from_secs(10);
pub const DEFAULT_IDLE_INTERVAL: Duration = Duration::from_secs(120);

/// Refresh budgets keyed on the last known device state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshPolicy {
    /// Budget while the vacuum is doing anything, or nothing is known yet.
    pub active: Duration,
    /// Budget while idle or charging on the dock.
    pub idle: Duration,
}

impl Default for RefreshPolicy {
    fn default() -> Self {
        Self {
            active: DEFAULT_ACTIVE_INTERVAL,
            idle: DEFAULT_IDLE_INTERVAL,
        }
    }
}

impl RefreshPolicy {
    /// Staleness budget for the given (possibly absent) status.
    pub fn interval_for(&self, status: Option<&Status>) -> Duration {
        match status {
            Some(status) if status.state.is_resting() => self.idle,
            _ => self.active,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::Map;

    use super::*;
    use crate::model::DeviceState;

    fn status(state: DeviceState) -> Status {
        Status {
            state,
            battery: 80,
            fan_power: 101,
            extra: Map::new(),
        }
    }

    #[test]
    fn docked_states_get_the_long_budget() {
        let policy = RefreshPolicy::default();
        assert_eq!(policy.interval_for(Some(&status(DeviceState::Idle))), DEFAULT_IDLE_INTERVAL);
        assert_eq!(
            policy.interval_for(Some(&status(DeviceState::Charging))),
            DEFAULT_IDLE_INTERVAL
        );
    }

    #[test]
    fn everything_else_gets_the_short_budget() {
        let policy = RefreshPolicy::default();
        for state in [
            DeviceState::Cleaning,
            DeviceState::ReturningHome,
            DeviceState::Paused,
            DeviceState::Error,
            DeviceState::Unknown(0),
        ] {
            assert_eq!(policy.interval_for(Some(&status(state))), DEFAULT_ACTIVE_INTERVAL);
        }
        assert_eq!(policy.interval_for(None), DEFAULT_ACTIVE_INTERVAL);
    }
}
