//! Simulation file configuration.
//!
//! Loads templates and matcher settings from YAML or JSON and checks that
//! every pattern can be compiled before the simulation is used.

use crate::error::MatchError;
use crate::matcher::CompiledTemplate;
use crate::models::{RequestTemplateResponsePair, ResponseDetails, Simulation};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration: a simulation plus matcher settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct SimulationConfig {
    /// Templates in precedence order
    #[serde(default)]
    pub templates: Vec<RequestTemplateResponsePair>,

    /// Global settings
    #[serde(default)]
    pub settings: MatcherSettings,
}

impl SimulationConfig {
    /// Load configuration from a YAML or JSON file (chosen by extension).
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", path.display(), e))?;

        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let config = if is_json {
            Self::from_json(&content)?
        } else {
            Self::from_yaml(&content)?
        };

        config.validate()?;
        Ok(config)
    }

    /// Parse a YAML document.
    pub fn from_yaml(yaml: &str) -> anyhow::Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Parse a JSON document.
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> anyhow::Result<()> {
        for (i, pair) in self.templates.iter().enumerate() {
            validate_pair(pair).map_err(|e| anyhow::anyhow!("Template {}: {}", i, e))?;
        }
        Ok(())
    }

    /// Split into the compiled simulation and the settings.
    pub fn into_parts(self) -> Result<(Simulation, MatcherSettings), MatchError> {
        Ok((Simulation::with_templates(self.templates)?, self.settings))
    }

    pub fn into_simulation(self) -> Result<Simulation, MatchError> {
        Ok(self.into_parts()?.0)
    }
}

fn validate_pair(pair: &RequestTemplateResponsePair) -> anyhow::Result<()> {
    CompiledTemplate::new(&pair.request)?;
    validate_response(&pair.response)
}

fn validate_response(response: &ResponseDetails) -> anyhow::Result<()> {
    if response.status < 100 || response.status > 599 {
        anyhow::bail!("Invalid status code: {}", response.status);
    }
    if response.encoded_body {
        response.body_bytes()?;
    }
    Ok(())
}

/// Matcher settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MatcherSettings {
    /// Log matched lookups
    #[serde(default = "default_true")]
    pub log_matches: bool,

    /// Log lookups that matched no template
    #[serde(default = "default_true")]
    pub log_unmatched: bool,
}

fn default_true() -> bool {
    true
}

impl Default for MatcherSettings {
    fn default() -> Self {
        Self {
            log_matches: true,
            log_unmatched: true,
        }
    }
}
