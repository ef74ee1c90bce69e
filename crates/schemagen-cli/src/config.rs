use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use schemagen_graphql::GeneratorSettings;
use serde::Deserialize;

/// Layout of the CLI configuration file.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    #[serde(default)]
    pub schema: GeneratorSettings,
}

/// Loads generator settings, falling back to defaults when no file is given.
pub fn load_settings(path: Option<&Path>) -> Result<GeneratorSettings> {
    let Some(path) = path else {
        return Ok(GeneratorSettings::default());
    };
    let content = fs::read_to_string(path)
        .with_context(|| format!("Cannot read config file {}", path.display()))?;
    let settings = parse_settings(&content)
        .with_context(|| format!("Invalid config file {}", path.display()))?;
    tracing::debug!(path = %path.display(), "Loaded schema settings");
    Ok(settings)
}

pub fn parse_settings(content: &str) -> Result<GeneratorSettings> {
    let file: ConfigFile = toml::from_str(content)?;
    file.schema
        .validate()
        .map_err(|e| anyhow::anyhow!(e))?;
    Ok(file.schema)
}
