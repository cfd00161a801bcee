//! Speaker volume and mute handlers.

use serde::Serialize;
use valetudo_core::{Command as CoreCommand, Controller};

use crate::cli::{GlobalOpts, ToggleArgs, ToggleCommand, VolumeArgs, VolumeCommand};
use crate::error::CliError;
use crate::output;

use super::{report, report_flag};

#[derive(Debug, Serialize)]
struct VolumeView {
    volume: u8,
    muted: bool,
}

pub async fn volume(
    controller: &Controller,
    args: VolumeArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        VolumeCommand::Get => {
            let volume = controller.volume().await?;
            let view = VolumeView {
                volume,
                muted: volume < valetudo_core::model::MUTE_THRESHOLD,
            };
            let out = output::render_single(
                global.output,
                &view,
                |v| {
                    if v.muted {
                        format!("volume: {}% (muted)", v.volume)
                    } else {
                        format!("volume: {}%", v.volume)
                    }
                },
                |v| v.volume.to_string(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }
        VolumeCommand::Set { level } => {
            let result = controller.execute(CoreCommand::SetVolume { level }).await?;
            report(controller, &format!("volume {level}"), &result, global)
        }
        VolumeCommand::Test => {
            let result = controller.execute(CoreCommand::TestVolume).await?;
            report(controller, "test volume", &result, global)
        }
    }
}

pub async fn mute(controller: &Controller, args: &ToggleArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ToggleCommand::Get => report_flag("muted", controller.is_muted().await?, global),
        ToggleCommand::On => {
            let result = controller.execute(CoreCommand::SetMute { muted: true }).await?;
            report(controller, "mute", &result, global)
        }
        ToggleCommand::Off => {
            let result = controller.execute(CoreCommand::SetMute { muted: false }).await?;
            report(controller, "unmute", &result, global)
        }
    }
}
