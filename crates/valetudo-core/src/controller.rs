// ── Controller ──
//
// Owns the status engine for one vacuum: the single-flight cache, the
// adaptive background refresh, the command pipeline, and the watch channel
// that publishes every freshly fetched status.
//
// All mutable engine state lives behind one `std::sync::Mutex` that is never
// held across an `.await`. Fetches and timers run as spawned tasks, so a
// caller that stops waiting never strands the callers queued behind it.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde_json::Value;
use tokio::sync::watch;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};
use valetudo_api::models::{FanSpeedRequest, GoToRequest, VolumeRequest};
use valetudo_api::{Endpoint, Transport, ValetudoClient};

use crate::command::{Command, CommandResult, PipelineStep, can_stop_cleaning};
use crate::config::{PowerControl, VacuumConfig};
use crate::convert;
use crate::error::CoreError;
use crate::model::{ChargingState, FanPreset, MUTE_THRESHOLD, Status};
use crate::store::{ReadDecision, RefreshTimer, StatusCache, StatusResult};
use crate::stream::StatusStream;

const MUTED_VOLUME: u8 = 1;
const UNMUTED_VOLUME: u8 = 100;

// ── Controller ───────────────────────────────────────────────────

/// The main entry point for consumers.
///
/// Cheaply cloneable via `Arc<ControllerInner>`; every clone shares one
/// cache, one timer, and one subscriber channel.
#[derive(Clone)]
pub struct Controller {
    inner: Arc<ControllerInner>,
}

struct ControllerInner {
    config: VacuumConfig,
    transport: Arc<dyn Transport>,
    state: Mutex<EngineState>,
    status_tx: watch::Sender<Option<Arc<Status>>>,
    last_refresh: watch::Sender<Option<DateTime<Utc>>>,
    cancel: CancellationToken,
}

struct EngineState {
    cache: StatusCache,
    timer: RefreshTimer,
}

impl Controller {
    /// Create a controller talking HTTP to `config.url`.
    ///
    /// Nothing is fetched until the first read.
    pub fn new(config: VacuumConfig) -> Result<Self, CoreError> {
        let client = ValetudoClient::new(config.url.clone(), &config.transport())?;
        Ok(Self::with_transport(config, Arc::new(client)))
    }

    /// Create a controller over any `Transport` implementation.
    pub fn with_transport(config: VacuumConfig, transport: Arc<dyn Transport>) -> Self {
        let (status_tx, _) = watch::channel(None);
        let (last_refresh, _) = watch::channel(None);

        info!(
            name = %config.name,
            url = %config.url,
            background_refresh = config.background_refresh,
            "vacuum controller created"
        );

        Self {
            inner: Arc::new(ControllerInner {
                config,
                transport,
                state: Mutex::new(EngineState {
                    cache: StatusCache::new(),
                    timer: RefreshTimer::new(),
                }),
                status_tx,
                last_refresh,
                cancel: CancellationToken::new(),
            }),
        }
    }

    /// Access the controller configuration.
    pub fn config(&self) -> &VacuumConfig {
        &self.inner.config
    }

    // ── Status reads ─────────────────────────────────────────────

    /// Read the vacuum status.
    ///
    /// Joins the fetch in flight if there is one. Otherwise serves the cached
    /// status while it is within the refresh budget, unless `forced`. A
    /// fetch started here clears the pending background timer.
    pub async fn status(&self, forced: bool) -> Result<Arc<Status>, CoreError> {
        let decision = {
            let mut state = self.inner.lock_state();
            let decision =
                state
                    .cache
                    .begin_read(forced, Instant::now(), &self.inner.config.policy);
            if matches!(decision, ReadDecision::Fetch(_)) {
                if state.timer.clear() {
                    debug!("background refresh preempted by read");
                }
                tokio::spawn(fetch_task(Arc::clone(&self.inner)));
            }
            decision
        };

        match decision {
            ReadDecision::Cached(status) => Ok(status),
            ReadDecision::Join(rx) | ReadDecision::Fetch(rx) => rx
                .await
                .map_err(|_| CoreError::Internal("status fetch was abandoned".into()))?,
        }
    }

    /// The last fetched status, without touching the network.
    pub fn cached_status(&self) -> Option<Arc<Status>> {
        self.inner.lock_state().cache.current()
    }

    pub async fn battery(&self) -> Result<u8, CoreError> {
        Ok(self.status(false).await?.battery)
    }

    pub async fn charging(&self) -> Result<ChargingState, CoreError> {
        Ok(self.status(false).await?.charging())
    }

    pub async fn is_battery_low(&self) -> Result<bool, CoreError> {
        Ok(self.status(false).await?.is_battery_low())
    }

    pub async fn is_cleaning(&self) -> Result<bool, CoreError> {
        Ok(self.status(false).await?.is_cleaning())
    }

    pub async fn is_going_home(&self) -> Result<bool, CoreError> {
        Ok(self.status(false).await?.is_going_home())
    }

    pub async fn is_spot_cleaning(&self) -> Result<bool, CoreError> {
        Ok(self.status(false).await?.is_spot_cleaning())
    }

    /// Whether the fan runs at the configured high-speed preset.
    pub async fn high_speed_mode(&self) -> Result<bool, CoreError> {
        let power = self.power_control("high-speed mode")?;
        Ok(self.status(false).await?.fan_power == power.high_speed.code())
    }

    /// Whether the fan runs at the mop preset.
    pub async fn mop_mode(&self) -> Result<bool, CoreError> {
        self.mop_control()?;
        Ok(self.status(false).await?.fan_power == FanPreset::Mop.code())
    }

    // ── Direct device queries ────────────────────────────────────
    //
    // These are not part of the status snapshot and always hit the device.

    pub async fn volume(&self) -> Result<u8, CoreError> {
        let value = self.request(Endpoint::GetSoundVolume, None).await?;
        convert::parse_volume(value)
    }

    pub async fn is_muted(&self) -> Result<bool, CoreError> {
        Ok(self.volume().await? < MUTE_THRESHOLD)
    }

    pub async fn firmware_version(&self) -> Result<String, CoreError> {
        let value = self.request(Endpoint::GetFirmwareVersion, None).await?;
        convert::parse_firmware(value)
    }

    /// Raw device configuration as reported by `/api/get_config`.
    pub async fn device_config(&self) -> Result<Value, CoreError> {
        self.request(Endpoint::GetConfig, None).await
    }

    // ── Command execution ────────────────────────────────────────

    /// Execute a command against the vacuum.
    pub async fn execute(&self, cmd: Command) -> Result<CommandResult, CoreError> {
        debug!(?cmd, "executing command");
        match cmd {
            Command::StartCleaning | Command::SetCleaning { on: true } => {
                self.run_pipeline(PipelineStep::new("start cleaning", Endpoint::StartCleaning))
                    .await
            }
            Command::StopCleaning => self.stop_cleaning().await,
            Command::SetCleaning { on: false } => {
                if self.status(true).await?.is_cleaning() {
                    self.stop_cleaning().await
                } else {
                    Ok(CommandResult::Unchanged)
                }
            }
            Command::GoHome => {
                self.run_pipeline(PipelineStep::new("go home", Endpoint::DriveHome))
                    .await
            }
            Command::SpotClean { name } => {
                let spot = self
                    .inner
                    .config
                    .spot(&name)
                    .ok_or_else(|| CoreError::NotFound {
                        entity_type: "spot".into(),
                        identifier: name.clone(),
                    })?;
                info!(spot = %spot.name, x = spot.x, y = spot.y, "spot cleaning");
                let body = to_body(&GoToRequest {
                    x: spot.x,
                    y: spot.y,
                })?;
                self.run_pipeline(PipelineStep::new("spot clean", Endpoint::GoTo).with_body(body))
                    .await
            }
            Command::SetFanSpeed { preset } => self.set_fan_speed(preset).await,
            Command::SetHighSpeed { on } => {
                let power = self.power_control("high-speed mode")?;
                let current = self.status(false).await?.fan_power == power.high_speed.code();
                self.toggle_preset(on, current, power.high_speed, power.default_speed)
                    .await
            }
            Command::SetMop { on } => {
                let power = self.mop_control()?;
                let current = self.status(false).await?.fan_power == FanPreset::Mop.code();
                self.toggle_preset(on, current, FanPreset::Mop, power.default_speed)
                    .await
            }
            Command::SetVolume { level } => self.set_volume(level).await,
            Command::SetMute { muted } => {
                let level = if muted { MUTED_VOLUME } else { UNMUTED_VOLUME };
                self.set_volume(level).await
            }
            Command::TestVolume => Ok(self.fire("test volume", Endpoint::TestSoundVolume, None).await),
            Command::Locate => Ok(self.fire("locate", Endpoint::FindRobot, None).await),
        }
    }

    /// Check → send → settle → refresh.
    ///
    /// A refused precondition returns `CoreError::Precondition` without any
    /// request. A failed send is logged and reported as `Unconfirmed`; the
    /// settle delay and forced refresh happen either way, and a failed
    /// refresh is only logged.
    pub(crate) async fn run_pipeline(&self, step: PipelineStep) -> Result<CommandResult, CoreError> {
        if let Some(allowed) = step.allowed {
            let status = self.status(false).await?;
            if !allowed(&status) {
                debug!(operation = step.operation, state = %status.state, "precondition refused");
                return Err(CoreError::Precondition {
                    operation: step.operation.into(),
                    state: status.state.to_string(),
                });
            }
        }

        let result = self.fire(step.operation, step.endpoint, step.body).await;

        tokio::time::sleep(self.inner.config.settle_delay).await;
        if let Err(e) = self.status(true).await {
            warn!(operation = step.operation, error = %e, "refresh after command failed");
        }

        Ok(result)
    }

    async fn stop_cleaning(&self) -> Result<CommandResult, CoreError> {
        self.run_pipeline(
            PipelineStep::new("stop cleaning", Endpoint::StopCleaning).when(can_stop_cleaning),
        )
        .await
    }

    async fn set_fan_speed(&self, preset: FanPreset) -> Result<CommandResult, CoreError> {
        let body = to_body(&FanSpeedRequest {
            speed: preset.code(),
        })?;
        self.run_pipeline(PipelineStep::new("set fan speed", Endpoint::FanSpeed).with_body(body))
            .await
    }

    async fn toggle_preset(
        &self,
        on: bool,
        current: bool,
        target: FanPreset,
        fallback: FanPreset,
    ) -> Result<CommandResult, CoreError> {
        if on == current {
            debug!(on, %target, "fan preset already in requested mode");
            return Ok(CommandResult::Unchanged);
        }
        self.set_fan_speed(if on { target } else { fallback }).await
    }

    async fn set_volume(&self, level: u8) -> Result<CommandResult, CoreError> {
        let volume = level.max(1);
        debug!(volume, "setting volume");
        let body = to_body(&VolumeRequest { volume })?;
        let result = self
            .fire("set volume", Endpoint::SetSoundVolume, Some(body))
            .await;
        if result.is_accepted() {
            // Plays a sample at the new level.
            self.fire("test volume", Endpoint::TestSoundVolume, None)
                .await;
        }
        Ok(result)
    }

    /// Send one command request; failures are logged, never returned.
    async fn fire(&self, operation: &str, endpoint: Endpoint, body: Option<Value>) -> CommandResult {
        info!(operation, %endpoint, "sending command");
        match self.request(endpoint, body).await {
            Ok(_) => CommandResult::Accepted,
            Err(e) => {
                warn!(operation, error = %e, "command failed");
                CommandResult::Unconfirmed {
                    reason: e.to_string(),
                }
            }
        }
    }

    async fn request(&self, endpoint: Endpoint, body: Option<Value>) -> Result<Value, CoreError> {
        self.inner
            .transport
            .request(endpoint, body)
            .await
            .map_err(|e| self.inner.translate(e))
    }

    fn power_control(&self, operation: &str) -> Result<PowerControl, CoreError> {
        self.inner
            .config
            .power
            .ok_or_else(|| CoreError::Unsupported {
                operation: operation.into(),
                required: "power-control configuration".into(),
            })
    }

    fn mop_control(&self) -> Result<PowerControl, CoreError> {
        match self.inner.config.power {
            Some(power) if power.mop_enabled => Ok(power),
            _ => Err(CoreError::Unsupported {
                operation: "mop mode".into(),
                required: "power-control with mop-enabled".into(),
            }),
        }
    }

    // ── State observation ────────────────────────────────────────

    /// Subscribe to freshly fetched statuses.
    pub fn subscribe(&self) -> StatusStream {
        StatusStream::new(self.inner.status_tx.subscribe())
    }

    /// Wall-clock time of the last successful fetch.
    pub fn last_refresh(&self) -> Option<DateTime<Utc>> {
        *self.inner.last_refresh.borrow()
    }

    /// Time until the armed background refresh fires, if one is armed.
    pub fn next_refresh(&self) -> Option<Duration> {
        self.inner
            .lock_state()
            .timer
            .deadline()
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
    }

    pub fn is_refresh_armed(&self) -> bool {
        self.inner.lock_state().timer.is_armed()
    }

    /// Stop background refresh. Reads and commands keep working.
    pub fn shutdown(&self) {
        self.inner.cancel.cancel();
        if self.inner.lock_state().timer.clear() {
            debug!("background refresh cleared");
        }
        info!("vacuum controller shut down");
    }
}

// ── Inner helpers ────────────────────────────────────────────────

impl ControllerInner {
    fn lock_state(&self) -> MutexGuard<'_, EngineState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn translate(&self, err: valetudo_api::Error) -> CoreError {
        match CoreError::from(err) {
            CoreError::Timeout { .. } => CoreError::Timeout {
                timeout_secs: self.config.timeout.as_secs(),
            },
            other => other,
        }
    }

    async fn fetch_status(&self) -> StatusResult {
        let value = self
            .transport
            .request(Endpoint::CurrentStatus, None)
            .await
            .map_err(|e| self.translate(e))?;
        convert::parse_status(value).map(Arc::new)
    }
}

fn to_body<T: serde::Serialize>(body: &T) -> Result<Value, CoreError> {
    serde_json::to_value(body).map_err(|e| CoreError::Internal(format!("encode request: {e}")))
}

// ── Background tasks ─────────────────────────────────────────────

/// Perform the one in-flight fetch and release everybody waiting on it.
///
/// The request itself runs in a nested task: if it panics, the waiters still
/// get an error and the timer is still re-armed.
async fn fetch_task(inner: Arc<ControllerInner>) {
    let request = tokio::spawn({
        let inner = Arc::clone(&inner);
        async move { inner.fetch_status().await }
    });
    let result = request.await.unwrap_or_else(|e| {
        error!(error = %e, "status fetch task failed");
        Err(CoreError::Internal(format!("status fetch task failed: {e}")))
    });

    let waiters = {
        let mut state = inner.lock_state();
        let waiters = state.cache.complete(&result, Instant::now());
        schedule_refresh(&inner, &mut state);
        waiters
    };

    match &result {
        Ok(status) => {
            debug!(state = %status.state, battery = status.battery, "status updated");
            inner.status_tx.send_replace(Some(Arc::clone(status)));
            inner.last_refresh.send_replace(Some(Utc::now()));
        }
        Err(e) if e.is_transient() => info!(error = %e, "status fetch failed, device unreachable"),
        Err(e) => warn!(error = %e, "status fetch failed"),
    }

    debug!(waiters = waiters.len(), "releasing status waiters");
    for waiter in waiters {
        // A waiter that stopped listening is not an error.
        let _ = waiter.send(result.clone());
    }
}

/// Re-arm the background timer with the budget of whatever is cached.
fn schedule_refresh(inner: &Arc<ControllerInner>, state: &mut EngineState) {
    if !inner.config.background_refresh || inner.cancel.is_cancelled() {
        return;
    }

    let current = state.cache.current();
    let delay = inner.config.policy.interval_for(current.as_deref());
    let deadline = Instant::now() + delay;
    let weak = Arc::downgrade(inner);
    let cancel = inner.cancel.clone();

    let generation = state.timer.arm(deadline, |generation| {
        tokio::spawn(refresh_task(weak, cancel, deadline, generation)).abort_handle()
    });
    debug!(generation, delay_secs = delay.as_secs(), "background refresh armed");
}

/// Sleep until `deadline`, then force a read if this timer is still current.
async fn refresh_task(
    weak: Weak<ControllerInner>,
    cancel: CancellationToken,
    deadline: Instant,
    generation: u64,
) {
    tokio::select! {
        biased;
        () = cancel.cancelled() => return,
        () = tokio::time::sleep_until(deadline) => {}
    }

    let Some(inner) = weak.upgrade() else {
        return;
    };
    let current = inner.lock_state().timer.disarm_if_current(generation);
    if !current {
        return;
    }

    debug!(generation, "background refresh firing");
    let controller = Controller { inner };
    if let Err(e) = controller.status(true).await {
        warn!(error = %e, "background refresh failed");
    }
}
