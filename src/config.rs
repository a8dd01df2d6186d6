//! Config file loading for the binary.
//!
//! The [`Config`] shape and validation live in `loopcast-core`; this
//! module only finds and parses the TOML file.

use anyhow::{Context, Result};
use std::path::Path;

use loopcast_core::config::Config;

/// Load configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    let problems = config.validate();
    if !problems.is_empty() {
        anyhow::bail!("Invalid config {:?}: {}", path, problems.join("; "));
    }

    Ok(config)
}

/// Load config from default locations or return the default config.
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    let default_paths = [
        "./loopcast.toml",
        "~/.config/loopcast/config.toml",
        "/etc/loopcast/config.toml",
    ];

    for path_str in default_paths {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            return load_config(path);
        }
    }

    Ok(Config::default())
}
