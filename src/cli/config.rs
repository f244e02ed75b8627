//! Config command handler
//!
//! View and modify configuration settings.

use crate::config::Config;
use crate::error::{Error, Result};
use clap::Args;

/// Config command arguments
#[derive(Args)]
pub struct ConfigArgs {
    /// Configuration key (e.g., "search.default_radius_km")
    pub key: Option<String>,

    /// Value to set (if not provided, shows current value)
    pub value: Option<String>,

    /// Show config file path
    #[arg(long, conflicts_with_all = ["reset", "keys"])]
    pub path: bool,

    /// Reset config to defaults
    #[arg(long, conflicts_with = "keys")]
    pub reset: bool,

    /// List the settable keys
    #[arg(long)]
    pub keys: bool,
}

/// What a `config` invocation asks for
enum Action<'a> {
    Path,
    Reset,
    Keys,
    ShowAll,
    Show(&'a str),
    Set(&'a str, &'a str),
}

impl ConfigArgs {
    fn action(&self) -> Result<Action<'_>> {
        if self.path {
            return Ok(Action::Path);
        }
        if self.reset {
            return Ok(Action::Reset);
        }
        if self.keys {
            return Ok(Action::Keys);
        }

        match (self.key.as_deref(), self.value.as_deref()) {
            (None, None) => Ok(Action::ShowAll),
            (Some(key), None) => Ok(Action::Show(key)),
            (Some(key), Some(value)) => Ok(Action::Set(key, value)),
            (None, Some(_)) => Err(Error::Config("Must specify a key to set a value".to_string())),
        }
    }
}

/// Run the config command
pub fn run(args: ConfigArgs) -> Result<()> {
    match args.action()? {
        Action::Path => println!("{}", Config::config_path()?.display()),
        Action::Reset => {
            Config::default().save()?;
            println!("Configuration reset to defaults");
        }
        Action::Keys => {
            for key in Config::available_keys() {
                println!("{}", key);
            }
        }
        Action::ShowAll => show_all_config(&Config::load()?),
        Action::Show(key) => {
            let config = Config::load()?;
            let value = config.get(key).ok_or_else(|| unknown_key(key))?;
            println!("{}", value);
        }
        Action::Set(key, value) => {
            let mut config = Config::load()?;
            config.set(key, value)?;
            config.save()?;
            println!("{} = {}", key, value);
        }
    }

    Ok(())
}

fn unknown_key(key: &str) -> Error {
    Error::Config(format!(
        "Unknown config key: {} (available: {})",
        key,
        Config::available_keys().join(", ")
    ))
}

/// Display all configuration values grouped by section
fn show_all_config(config: &Config) {
    let mut section = "";
    for key in Config::available_keys() {
        let (prefix, name) = key.split_once('.').unwrap_or(("", key));
        if prefix != section {
            if !section.is_empty() {
                println!();
            }
            println!("[{}]", prefix);
            section = prefix;
        }
        if let Some(value) = config.get(key) {
            println!("{} = {}", name, value);
        }
    }

    println!();
    println!("[[zones.zone]] ({} entries)", config.zones.specs.len());
    for spec in &config.zones.specs {
        match &spec.place {
            Some(place) => println!("  {} {} -> {}", spec.name, spec.color, place),
            None => println!("  {} {}", spec.name, spec.color),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(key: Option<&str>, value: Option<&str>) -> ConfigArgs {
        ConfigArgs {
            key: key.map(str::to_string),
            value: value.map(str::to_string),
            path: false,
            reset: false,
            keys: false,
        }
    }

    #[test]
    fn test_action_resolution() {
        assert!(matches!(args(None, None).action(), Ok(Action::ShowAll)));
        assert!(matches!(
            args(Some("server.port"), None).action(),
            Ok(Action::Show("server.port"))
        ));
        assert!(matches!(
            args(Some("server.port"), Some("9000")).action(),
            Ok(Action::Set("server.port", "9000"))
        ));
        assert!(matches!(args(None, Some("9000")).action(), Err(Error::Config(_))));
    }

    #[test]
    fn test_flags_take_precedence() {
        let mut a = args(Some("server.port"), None);
        a.keys = true;
        assert!(matches!(a.action(), Ok(Action::Keys)));
        a.path = true;
        assert!(matches!(a.action(), Ok(Action::Path)));
    }

    #[test]
    fn test_unknown_key_lists_available() {
        let err = unknown_key("nope").to_string();
        assert!(err.contains("nope"));
        assert!(err.contains("search.max_limit"));
    }
}
