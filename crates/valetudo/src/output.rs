//! Output formatting: table, JSON, YAML, plain.
//!
//! Renders data in the format selected by `--output`. Tables use `tabled`,
//! structured formats use serde, plain emits one value per line.

use std::io::{self, IsTerminal, Write};

use owo_colors::OwoColorize;
use tabled::{Table, Tabled, settings::Style};

use valetudo_core::{DeviceState, Status};

use crate::cli::{ColorMode, OutputFormat};
use crate::error::CliError;

// ── Color helpers ────────────────────────────────────────────────────

/// Determine whether color output should be enabled.
pub fn should_color(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none(),
    }
}

/// Device state colored by what the vacuum is doing.
pub fn paint_state(state: DeviceState, color: bool) -> String {
    let label = state.to_string();
    if !color {
        return label;
    }
    match state {
        DeviceState::Cleaning
        | DeviceState::SpotCleaning
        | DeviceState::ZoneCleaning
        | DeviceState::GoingToTarget => label.green().to_string(),
        DeviceState::ReturningHome | DeviceState::Docking | DeviceState::Paused => {
            label.yellow().to_string()
        }
        DeviceState::Error | DeviceState::ChargingProblem | DeviceState::Unknown(_) => {
            label.red().to_string()
        }
        _ => label.cyan().to_string(),
    }
}

/// Battery percentage, red when low.
pub fn paint_battery(status: &Status, color: bool) -> String {
    let label = format!("{}%", status.battery);
    if color && status.is_battery_low() {
        label.red().bold().to_string()
    } else {
        label
    }
}

// ── Render dispatchers ───────────────────────────────────────────────

/// Render a list of serializable items in the chosen format.
pub fn render_list<T, R>(
    format: OutputFormat,
    data: &[T],
    to_row: impl Fn(&T) -> R,
    id_fn: impl Fn(&T) -> String,
) -> Result<String, CliError>
where
    T: serde::Serialize,
    R: Tabled,
{
    match format {
        OutputFormat::Table => {
            let rows: Vec<R> = data.iter().map(to_row).collect();
            Ok(render_table(&rows))
        }
        OutputFormat::Json => render_json(data, false),
        OutputFormat::JsonCompact => render_json(data, true),
        OutputFormat::Yaml => render_yaml(data),
        OutputFormat::Plain => Ok(data.iter().map(&id_fn).collect::<Vec<_>>().join("\n")),
    }
}

/// Render a single serializable item in the chosen format.
///
/// Table rendering uses `detail_fn`, since single-item views are key/value
/// panels rather than `Tabled` rows.
pub fn render_single<T>(
    format: OutputFormat,
    data: &T,
    detail_fn: impl Fn(&T) -> String,
    plain_fn: impl Fn(&T) -> String,
) -> Result<String, CliError>
where
    T: serde::Serialize + ?Sized,
{
    match format {
        OutputFormat::Table => Ok(detail_fn(data)),
        OutputFormat::Json => render_json(data, false),
        OutputFormat::JsonCompact => render_json(data, true),
        OutputFormat::Yaml => render_yaml(data),
        OutputFormat::Plain => Ok(plain_fn(data)),
    }
}

/// Print the rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

/// Two-column key/value panel for detail views.
pub fn render_pairs(pairs: &[(&str, String)]) -> String {
    #[derive(Tabled)]
    struct Pair {
        #[tabled(rename = "Field")]
        key: String,
        #[tabled(rename = "Value")]
        value: String,
    }

    let rows: Vec<Pair> = pairs
        .iter()
        .map(|(key, value)| Pair {
            key: (*key).to_owned(),
            value: value.clone(),
        })
        .collect();
    render_table(&rows)
}

// ── Format-specific renderers ────────────────────────────────────────

fn render_table<R: Tabled>(rows: &[R]) -> String {
    Table::new(rows).with(Style::rounded()).to_string()
}

fn render_json<T: serde::Serialize + ?Sized>(data: &T, compact: bool) -> Result<String, CliError> {
    let rendered = if compact {
        serde_json::to_string(data)
    } else {
        serde_json::to_string_pretty(data)
    };
    rendered.map_err(|e| CliError::Render(e.to_string()))
}

fn render_yaml<T: serde::Serialize + ?Sized>(data: &T) -> Result<String, CliError> {
    serde_yaml::to_string(data).map_err(|e| CliError::Render(e.to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::Map;

    use super::*;

    fn status(state: DeviceState, battery: u8) -> Status {
        Status {
            state,
            battery,
            fan_power: 102,
            extra: Map::new(),
        }
    }

    #[test]
    fn plain_and_json_use_the_same_data() {
        let s = status(DeviceState::Charging, 87);
        let plain = render_single(OutputFormat::Plain, &s, |_| String::new(), |s| {
            s.state.to_string()
        })
        .unwrap();
        assert_eq!(plain, "charging");

        let json = render_single(OutputFormat::JsonCompact, &s, |_| String::new(), |_| {
            String::new()
        })
        .unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["battery"], 87);
    }

    #[test]
    fn uncolored_output_is_bare() {
        assert_eq!(paint_state(DeviceState::Cleaning, false), "cleaning");
        assert_eq!(paint_battery(&status(DeviceState::Idle, 9), false), "9%");
    }

    #[test]
    fn pairs_render_as_table() {
        let out = render_pairs(&[("State", "idle".into()), ("Battery", "50%".into())]);
        assert!(out.contains("State"));
        assert!(out.contains("50%"));
        assert!(out.contains('╭'));
    }
}
