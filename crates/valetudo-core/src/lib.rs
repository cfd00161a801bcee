//! Status synchronization engine between `valetudo-api` and its consumers.
//!
//! This crate owns the domain model, the status cache, and the command
//! pipeline for a single Valetudo vacuum:
//!
//! - **[`Controller`]**: central facade. [`status()`](Controller::status)
//!   serves reads from a single-flight cache: concurrent callers share one
//!   in-flight fetch, fresh results are served without network access, and
//!   forced reads bypass freshness but still coalesce. Every completed fetch
//!   re-arms one background refresh timer.
//!
//! - **[`RefreshPolicy`]**: maps the last known device state to a staleness
//!   budget (short while the vacuum is active, long while it is docked).
//!   The same budget sizes the cache window and the timer delay.
//!
//! - **[`Command`]**: typed mutations routed through
//!   [`execute()`](Controller::execute). State-changing commands run
//!   check → send → settle → forced refresh.
//!
//! - **[`StatusStream`]**: subscription handle for every freshly fetched
//!   status, backed by a `tokio::sync::watch` channel.

pub mod command;
pub mod config;
pub mod controller;
pub mod convert;
pub mod error;
pub mod model;
pub mod store;
pub mod stream;

// ── Primary re-exports ──────────────────────────────────────────────
pub use command::{Command, CommandResult};
pub use config::{PowerControl, VacuumConfig};
pub use controller::Controller;
pub use error::CoreError;
pub use store::{RefreshPolicy, RefreshTimer, StatusCache};
pub use stream::{StatusStream, StatusWatchStream};

pub use model::{ChargingState, DeviceState, FanPreset, Spot, Status};
