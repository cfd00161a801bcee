//! Clap derive structures for the `valetudo` CLI.
//!
//! Defines the command tree, global flags, and shared value enums. Kept free
//! of workspace types so `build.rs` can include it for man page generation.

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

// ── Top-Level CLI ────────────────────────────────────────────────────

/// valetudo -- drive a Valetudo robot vacuum from the command line
#[derive(Debug, Parser)]
#[command(
    name = "valetudo",
    version,
    about = "Control a Valetudo robot vacuum from the command line",
    long_about = "Reads status, runs cleaning commands, and watches a vacuum \
        running the Valetudo firmware over its local HTTP API.\n\n\
        Status reads are cached: a docked vacuum is re-read at most every \
        two minutes, an active one every ten seconds.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Vacuum profile to use
    #[arg(long, short = 'p', env = "VALETUDO_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Vacuum host, host:port, or URL (overrides profile)
    #[arg(long, short = 'a', env = "VALETUDO_ADDRESS", global = true)]
    pub address: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "VALETUDO_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "VALETUDO_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "VALETUDO_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

/// Fan power presets accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FanArg {
    Quiet,
    Balanced,
    Turbo,
    Max,
    Mop,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show the current vacuum status
    #[command(alias = "st")]
    Status(StatusArgs),

    /// Show battery level and charging state
    #[command(alias = "bat")]
    Battery,

    /// Start or stop cleaning
    #[command(alias = "c")]
    Clean(CleanArgs),

    /// Send the vacuum back to its dock
    Home,

    /// Clean a configured spot, or list spots
    Spot(SpotArgs),

    /// Set the fan power preset
    Fan(FanArgs),

    /// Toggle the high-speed fan preset
    HighSpeed(ToggleArgs),

    /// Toggle the mop preset
    Mop(ToggleArgs),

    /// Read, set, or test the speaker volume
    #[command(alias = "vol")]
    Volume(VolumeArgs),

    /// Mute or unmute the speaker
    Mute(ToggleArgs),

    /// Make the vacuum announce its location
    Locate,

    /// Show the firmware version
    Firmware,

    /// Dump the raw device configuration
    DeviceConfig,

    /// Stream status updates as the vacuum is polled
    Watch(WatchArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Status ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct StatusArgs {
    /// Include every field the firmware reports
    #[arg(long)]
    pub all: bool,
}

// ── Cleaning ─────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CleanArgs {
    #[command(subcommand)]
    pub command: CleanCommand,
}

#[derive(Debug, Subcommand)]
pub enum CleanCommand {
    /// Start a full clean
    Start,
    /// Stop the running clean
    Stop,
    /// Switch-style on: start cleaning
    On,
    /// Switch-style off: stop only if a clean is running
    Off,
}

#[derive(Debug, Args)]
#[command(args_conflicts_with_subcommands = true, arg_required_else_help = true)]
pub struct SpotArgs {
    /// Spot name from the active profile
    pub name: Option<String>,

    #[command(subcommand)]
    pub command: Option<SpotCommand>,
}

#[derive(Debug, Subcommand)]
pub enum SpotCommand {
    /// List configured spots
    #[command(alias = "ls")]
    List,
}

// ── Fan power ────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct FanArgs {
    /// Preset to apply
    #[arg(value_enum)]
    pub preset: FanArg,
}

/// Shared `on|off|get` shape for switch-like settings.
#[derive(Debug, Args)]
pub struct ToggleArgs {
    #[command(subcommand)]
    pub command: ToggleCommand,
}

#[derive(Debug, Clone, Copy, Subcommand)]
pub enum ToggleCommand {
    /// Turn the setting on
    On,
    /// Turn the setting off
    Off,
    /// Show the current setting
    Get,
}

// ── Sound ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct VolumeArgs {
    #[command(subcommand)]
    pub command: VolumeCommand,
}

#[derive(Debug, Subcommand)]
pub enum VolumeCommand {
    /// Show the current volume
    Get,
    /// Set the volume (0-100, 0 is raised to 1)
    Set {
        #[arg(value_parser = clap::value_parser!(u8).range(0..=100))]
        level: u8,
    },
    /// Play the volume test sound
    Test,
}

// ── Watch ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct WatchArgs {
    /// Exit after this many updates
    #[arg(long, short = 'n')]
    pub count: Option<usize>,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the config file path
    Path,
    /// Show the effective configuration
    Show,
    /// Write the active profile (--profile, or the default one)
    Init(ConfigInitArgs),
}

#[derive(Debug, Args)]
pub struct ConfigInitArgs {
    /// Vacuum host, host:port, or URL
    pub host: String,

    /// Display name for the vacuum
    #[arg(long, default_value = "Vacuum")]
    pub name: String,

    /// Overwrite an existing profile
    #[arg(long)]
    pub force: bool,
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}
