/*
[INPUT]:  YAML configuration file
[OUTPUT]: Validated session configuration
[POS]:    Configuration layer - CLI startup
[UPDATE]: When adding configuration options
*/

use std::path::Path;

use anyhow::{Context, Result};
use launchpad_session::SessionConfig;

/// Load and validate configuration from a YAML file
pub fn load_config(path: &Path) -> Result<SessionConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("read config {}", path.display()))?;
    let config: SessionConfig = serde_yaml::from_str(&content).context("parse config yaml")?;
    config.validate().context("validate config")?;
    Ok(config)
}
