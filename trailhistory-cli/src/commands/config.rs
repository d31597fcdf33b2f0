//! `config` subcommands: inspect and edit `config.ini`.

use clap::Subcommand;
use trailhistory::config::{config_file_path, ConfigKey, TrailConfig};

use crate::error::CliError;

const NOT_SET: &str = "(not set)";

#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print one setting, e.g. `feed.url`
    Get { key: String },

    /// Change one setting and save the file (an empty value clears optional keys)
    Set { key: String, value: String },

    /// Print every setting grouped by section
    List,

    /// Print where config.ini lives
    Path,
}

pub fn run(command: ConfigCommands) -> Result<(), CliError> {
    match command {
        ConfigCommands::Get { key } => {
            let key = lookup(&key)?;
            let config = TrailConfig::load()?;
            println!("{}", display_value(key.get(&config)));
        }
        ConfigCommands::Set { key, value } => {
            let key = lookup(&key)?;
            let mut config = TrailConfig::load()?;
            key.set(&mut config, &value)?;
            config.save()?;
            println!("{} = {}", key.name(), display_value(key.get(&config)));
        }
        ConfigCommands::List => {
            let config = TrailConfig::load()?;
            print!("{}", render_settings(&config));
        }
        ConfigCommands::Path => println!("{}", config_file_path().display()),
    }
    Ok(())
}

fn lookup(key: &str) -> Result<ConfigKey, CliError> {
    key.parse::<ConfigKey>().map_err(|_| {
        let known: Vec<String> = ConfigKey::all().iter().map(ConfigKey::name).collect();
        CliError::Config(format!("unknown key '{}' (expected one of: {})", key, known.join(", ")))
    })
}

fn display_value(value: String) -> String {
    if value.is_empty() {
        NOT_SET.to_string()
    } else {
        value
    }
}

/// INI-style listing, one block per section.
fn render_settings(config: &TrailConfig) -> String {
    let mut out = String::new();
    let mut section = None;

    for key in ConfigKey::all() {
        if section != Some(key.section()) {
            if section.is_some() {
                out.push('\n');
            }
            out.push_str(&format!("[{}]\n", key.section()));
            section = Some(key.section());
        }
        out.push_str(&format!("{} = {}\n", key.key_name(), display_value(key.get(config))));
    }

    out
}
