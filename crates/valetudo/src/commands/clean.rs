//! Cleaning, docking, spot, and fan power handlers.

use tabled::Tabled;
use valetudo_core::{Command as CoreCommand, Controller, FanPreset, Spot};

use crate::cli::{CleanArgs, CleanCommand, FanArg, FanArgs, GlobalOpts, SpotArgs, SpotCommand};
use crate::cli::{ToggleArgs, ToggleCommand};
use crate::error::CliError;
use crate::output;

use super::{report, report_flag};

pub async fn clean(
    controller: &Controller,
    args: CleanArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let (action, cmd) = match args.command {
        CleanCommand::Start => ("start cleaning", CoreCommand::StartCleaning),
        CleanCommand::Stop => ("stop cleaning", CoreCommand::StopCleaning),
        CleanCommand::On => ("cleaning on", CoreCommand::SetCleaning { on: true }),
        CleanCommand::Off => ("cleaning off", CoreCommand::SetCleaning { on: false }),
    };
    let result = controller.execute(cmd).await?;
    report(controller, action, &result, global)
}

pub async fn home(controller: &Controller, global: &GlobalOpts) -> Result<(), CliError> {
    let result = controller.execute(CoreCommand::GoHome).await?;
    report(controller, "go home", &result, global)
}

pub async fn locate(controller: &Controller, global: &GlobalOpts) -> Result<(), CliError> {
    let result = controller.execute(CoreCommand::Locate).await?;
    report(controller, "locate", &result, global)
}

// ── Spots ────────────────────────────────────────────────────────────

#[derive(Tabled)]
struct SpotRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "X")]
    x: i64,
    #[tabled(rename = "Y")]
    y: i64,
}

impl From<&Spot> for SpotRow {
    fn from(s: &Spot) -> Self {
        Self {
            name: s.name.clone(),
            x: s.x,
            y: s.y,
        }
    }
}

pub async fn spot(
    controller: &Controller,
    args: SpotArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match (args.command, args.name) {
        (Some(SpotCommand::List), _) => {
            let out = output::render_list(
                global.output,
                controller.config().spots.as_slice(),
                |s| SpotRow::from(s),
                |s| s.name.clone(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }
        (None, Some(name)) => {
            let result = controller
                .execute(CoreCommand::SpotClean { name: name.clone() })
                .await?;
            report(controller, &format!("spot clean {name}"), &result, global)
        }
        (None, None) => Err(CliError::Validation {
            field: "spot".into(),
            reason: "expected a spot name or `list`".into(),
        }),
    }
}

// ── Fan power ────────────────────────────────────────────────────────

impl From<FanArg> for FanPreset {
    fn from(arg: FanArg) -> Self {
        match arg {
            FanArg::Quiet => Self::Quiet,
            FanArg::Balanced => Self::Balanced,
            FanArg::Turbo => Self::Turbo,
            FanArg::Max => Self::Max,
            FanArg::Mop => Self::Mop,
        }
    }
}

pub async fn fan(controller: &Controller, args: &FanArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let preset = FanPreset::from(args.preset);
    let result = controller
        .execute(CoreCommand::SetFanSpeed { preset })
        .await?;
    report(controller, &format!("fan {preset}"), &result, global)
}

pub async fn high_speed(
    controller: &Controller,
    args: &ToggleArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        ToggleCommand::Get => report_flag("high_speed", controller.high_speed_mode().await?, global),
        ToggleCommand::On | ToggleCommand::Off => {
            let on = matches!(args.command, ToggleCommand::On);
            let result = controller.execute(CoreCommand::SetHighSpeed { on }).await?;
            report(controller, if on { "high speed on" } else { "high speed off" }, &result, global)
        }
    }
}

pub async fn mop(controller: &Controller, args: &ToggleArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ToggleCommand::Get => report_flag("mop", controller.mop_mode().await?, global),
        ToggleCommand::On | ToggleCommand::Off => {
            let on = matches!(args.command, ToggleCommand::On);
            let result = controller.execute(CoreCommand::SetMop { on }).await?;
            report(controller, if on { "mop on" } else { "mop off" }, &result, global)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_fan_arg_maps_to_its_preset_code() {
        let codes: Vec<u16> = [
            FanArg::Quiet,
            FanArg::Balanced,
            FanArg::Turbo,
            FanArg::Max,
            FanArg::Mop,
        ]
        .into_iter()
        .map(|a| FanPreset::from(a).code())
        .collect();
        assert_eq!(codes, vec![101, 102, 103, 104, 105]);
    }
}
