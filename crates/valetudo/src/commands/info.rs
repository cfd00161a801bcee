//! Firmware and raw device configuration.

use valetudo_core::Controller;

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

pub async fn firmware(controller: &Controller, global: &GlobalOpts) -> Result<(), CliError> {
    let version = controller.firmware_version().await?;
    let mut body = serde_json::Map::new();
    body.insert("version".into(), version.clone().into());

    let out = output::render_single(
        global.output,
        &body,
        |_| format!("firmware: {version}"),
        |_| version.clone(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}

/// The device config has no fixed shape, so table output falls back to
/// pretty JSON.
pub async fn device_config(controller: &Controller, global: &GlobalOpts) -> Result<(), CliError> {
    let config = controller.device_config().await?;
    let out = output::render_single(
        global.output,
        &config,
        |c| serde_json::to_string_pretty(c).unwrap_or_default(),
        |c| c.to_string(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}
