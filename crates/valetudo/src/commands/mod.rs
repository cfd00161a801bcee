//! Command dispatch: bridges CLI args -> engine calls -> output formatting.

pub mod clean;
pub mod config_cmd;
pub mod info;
pub mod sound;
pub mod status;
pub mod watch;

use serde::Serialize;
use valetudo_core::{CommandResult, Controller};

use crate::cli::{Command, GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::output;

/// Dispatch a vacuum-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    controller: &Controller,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Status(args) => status::status(controller, &args, global).await,
        Command::Battery => status::battery(controller, global).await,
        Command::Clean(args) => clean::clean(controller, args, global).await,
        Command::Home => clean::home(controller, global).await,
        Command::Spot(args) => clean::spot(controller, args, global).await,
        Command::Fan(args) => clean::fan(controller, &args, global).await,
        Command::HighSpeed(args) => clean::high_speed(controller, &args, global).await,
        Command::Mop(args) => clean::mop(controller, &args, global).await,
        Command::Locate => clean::locate(controller, global).await,
        Command::Volume(args) => sound::volume(controller, args, global).await,
        Command::Mute(args) => sound::mute(controller, &args, global).await,
        Command::Firmware => info::firmware(controller, global).await,
        Command::DeviceConfig => info::device_config(controller, global).await,
        Command::Watch(args) => watch::handle(controller, &args, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}

// ── Shared command reporting ─────────────────────────────────────────

#[derive(Debug, Serialize)]
struct Outcome<'a> {
    action: &'a str,
    result: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<&'a str>,
    /// State after the follow-up refresh, when one ran.
    #[serde(skip_serializing_if = "Option::is_none")]
    state: Option<String>,
}

/// Print what happened to a write command.
///
/// `Unconfirmed` is not an error: the device may still have acted, and the
/// refreshed state is shown either way.
pub(crate) fn report(
    controller: &Controller,
    action: &str,
    result: &CommandResult,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let (label, reason) = match result {
        CommandResult::Accepted => ("accepted", None),
        CommandResult::Unconfirmed { reason } => ("unconfirmed", Some(reason.as_str())),
        CommandResult::Unchanged => ("unchanged", None),
    };
    let outcome = Outcome {
        action,
        result: label,
        reason,
        state: controller.cached_status().map(|s| s.state.to_string()),
    };

    let color = output::should_color(global.color);
    let out = output::render_single(
        global.output,
        &outcome,
        |o| {
            let mut line = match result {
                CommandResult::Accepted => format!("{}: done", o.action),
                CommandResult::Unchanged => format!("{}: already set", o.action),
                CommandResult::Unconfirmed { reason } => {
                    format!("{}: not confirmed by the vacuum ({reason})", o.action)
                }
            };
            if let Some(status) = controller.cached_status() {
                line.push_str(&format!(
                    " [{}, {}]",
                    output::paint_state(status.state, color),
                    output::paint_battery(&status, color)
                ));
            }
            line
        },
        |o| o.result.to_owned(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}

/// Render an `on`/`off` flag.
pub(crate) fn report_flag(name: &str, on: bool, global: &GlobalOpts) -> Result<(), CliError> {
    let word = if on { "on" } else { "off" };
    let mut body = serde_json::Map::new();
    body.insert(name.to_owned(), on.into());

    let out = match global.output {
        OutputFormat::Table => format!("{name}: {word}"),
        _ => output::render_single(
            global.output,
            &body,
            |_| String::new(),
            |_| word.to_owned(),
        )?,
    };
    output::print_output(&out, global.quiet);
    Ok(())
}
