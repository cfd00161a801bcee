//! Status and battery views.

use serde::Serialize;
use serde_json::Map;
use valetudo_core::{ChargingState, Controller, Status};

use crate::cli::{GlobalOpts, StatusArgs};
use crate::error::CliError;
use crate::output;

pub async fn status(
    controller: &Controller,
    args: &StatusArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let mut snapshot = Status::clone(&*controller.status(false).await?);
    if !args.all {
        snapshot.extra = Map::new();
    }

    let color = output::should_color(global.color);
    let name = controller.config().name.clone();
    let out = output::render_single(
        global.output,
        &snapshot,
        |s| output::render_pairs(&detail_pairs(&name, s, color)),
        |s| s.state.as_str().to_owned(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}

fn detail_pairs(name: &str, s: &Status, color: bool) -> Vec<(&'static str, String)> {
    let fan = s
        .fan_preset()
        .map_or_else(|| s.fan_power.to_string(), |p| format!("{p} ({})", s.fan_power));

    let mut pairs = vec![
        ("Name", name.to_owned()),
        ("State", output::paint_state(s.state, color)),
        ("Battery", output::paint_battery(s, color)),
        ("Charging", s.charging().to_string()),
        ("Fan", fan),
    ];
    for (key, value) in &s.extra {
        pairs.push(("Extra", format!("{key} = {value}")));
    }
    pairs
}

// ── Battery ──────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct BatteryView {
    battery: u8,
    charging: ChargingState,
    low: bool,
}

pub async fn battery(controller: &Controller, global: &GlobalOpts) -> Result<(), CliError> {
    let status = controller.status(false).await?;
    let view = BatteryView {
        battery: status.battery,
        charging: status.charging(),
        low: status.is_battery_low(),
    };

    let color = output::should_color(global.color);
    let out = output::render_single(
        global.output,
        &view,
        |v| format!("{} ({})", output::paint_battery(&status, color), v.charging),
        |v| v.battery.to_string(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}
