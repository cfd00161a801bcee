//! Follow the vacuum as the background refresh polls it.

use futures_util::StreamExt;
use valetudo_core::{Controller, Status};

use crate::cli::{GlobalOpts, OutputFormat, WatchArgs};
use crate::error::CliError;
use crate::output;

/// Print the current status, then every status the refresh timer fetches,
/// until Ctrl-C or `--count` updates.
pub async fn handle(
    controller: &Controller,
    args: &WatchArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let color = output::should_color(global.color);
    let limit = args.count.unwrap_or(usize::MAX);
    if limit == 0 {
        return Ok(());
    }

    // The first read arms the refresh timer.
    let first = controller.status(false).await?;
    print_update(controller, &first, global, color)?;
    let mut seen = 1;

    let mut updates = controller.subscribe().into_stream();
    while seen < limit {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("watch interrupted");
                break;
            }
            next = updates.next() => {
                let Some(status) = next else { break };
                print_update(controller, &status, global, color)?;
                seen += 1;
            }
        }
    }
    Ok(())
}

fn print_update(
    controller: &Controller,
    status: &Status,
    global: &GlobalOpts,
    color: bool,
) -> Result<(), CliError> {
    let out = match global.output {
        OutputFormat::Table => {
            let at = controller
                .last_refresh()
                .unwrap_or_else(chrono::Utc::now)
                .with_timezone(&chrono::Local)
                .format("%H:%M:%S");
            let next = controller
                .next_refresh()
                .map(|d| format!("  next in {}s", d.as_secs()))
                .unwrap_or_default();
            format!(
                "{at}  {}  {}{next}",
                output::paint_state(status.state, color),
                output::paint_battery(status, color),
            )
        }
        // One document per line so the stream stays parseable.
        OutputFormat::Json | OutputFormat::JsonCompact => {
            output::render_single(OutputFormat::JsonCompact, status, |_| String::new(), |_| String::new())?
        }
        OutputFormat::Yaml => format!(
            "---\n{}",
            output::render_single(OutputFormat::Yaml, status, |_| String::new(), |_| String::new())?
                .trim_end()
        ),
        OutputFormat::Plain => status.state.as_str().to_owned(),
    };
    output::print_output(&out, global.quiet);
    Ok(())
}
