//! Config subcommand handlers.

use valetudo_config::Profile;

use crate::cli::{ConfigArgs, ConfigCommand, ConfigInitArgs, GlobalOpts, OutputFormat};
use crate::config;
use crate::error::CliError;
use crate::output;

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Path => {
            output::print_output(&config::config_path().display().to_string(), global.quiet);
            Ok(())
        }
        ConfigCommand::Show => show(global),
        ConfigCommand::Init(init_args) => init(&init_args, global),
    }
}

/// Effective configuration: file merged with `VALETUDO_*` overrides.
fn show(global: &GlobalOpts) -> Result<(), CliError> {
    let cfg = config::load_config()?;
    let out = match global.output {
        OutputFormat::Table | OutputFormat::Plain => toml::to_string_pretty(&cfg)?,
        format => output::render_single(format, &cfg, |_| String::new(), |_| String::new())?,
    };
    output::print_output(out.trim_end(), global.quiet);
    Ok(())
}

fn init(args: &ConfigInitArgs, global: &GlobalOpts) -> Result<(), CliError> {
    // A malformed file is reported rather than silently replaced.
    let mut cfg = config::load_config()?;
    let name = config::active_profile_name(global, &cfg);

    if cfg.profiles.contains_key(&name) && !args.force {
        return Err(CliError::ProfileExists { name });
    }

    // Validate the address up front so a typo never reaches the file.
    valetudo_core::config::parse_address(&args.host)?;

    let profile = Profile::new(args.name.clone(), args.host.clone());
    cfg.profiles.insert(name.clone(), profile);
    if cfg.default_profile.is_none() {
        cfg.default_profile = Some(name.clone());
    }

    let path = config::save_config(&cfg)?;
    tracing::info!(profile = %name, path = %path.display(), "profile saved");
    output::print_output(
        &format!("Saved profile '{name}' to {}", path.display()),
        global.quiet,
    );
    Ok(())
}
