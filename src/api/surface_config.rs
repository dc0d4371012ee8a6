use serde::{Deserialize, Serialize};

use crate::core::Viewport;
use crate::error::{ConfigError, ConfigResult};
use crate::interaction::{InteractionConfig, InteractionHandler, InteractionKind};

use super::ChartSurface;

/// Declarative surface setup, loadable from JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurfaceConfig {
    pub viewport: Viewport,
    #[serde(default)]
    pub interactions: Vec<InteractionSpec>,
}

/// One interaction to register, in order, when the surface is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionSpec {
    pub id: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    pub config: InteractionConfig,
}

fn default_enabled() -> bool {
    true
}

impl InteractionSpec {
    #[must_use]
    pub fn new(id: impl Into<String>, config: InteractionConfig) -> Self {
        Self {
            id: id.into(),
            enabled: true,
            config,
        }
    }

    #[must_use]
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    #[must_use]
    pub fn kind(&self) -> InteractionKind {
        self.config.kind()
    }
}

impl SurfaceConfig {
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            interactions: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_interaction(mut self, id: impl Into<String>, config: InteractionConfig) -> Self {
        self.interactions.push(InteractionSpec::new(id, config));
        self
    }

    #[must_use]
    pub fn with_interaction_spec(mut self, spec: InteractionSpec) -> Self {
        self.interactions.push(spec);
        self
    }

    /// Parses a config document. Handler configs are validated later, when
    /// the surface is built.
    pub fn from_json_str(input: &str) -> ConfigResult<Self> {
        serde_json::from_str(input)
            .map_err(|e| ConfigError::Parse(format!("failed to parse surface config json: {e}")))
    }

    pub fn to_json_pretty(&self) -> ConfigResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| {
            ConfigError::Parse(format!("failed to serialize surface config json: {e}"))
        })
    }
}

impl ChartSurface {
    /// Current viewport and handler configs, in registration order.
    ///
    /// Tooltip formatters are not serializable and are left out.
    #[must_use]
    pub fn surface_config(&self) -> SurfaceConfig {
        SurfaceConfig {
            viewport: self.viewport,
            interactions: self
                .registry
                .iter()
                .map(|interaction| InteractionSpec {
                    id: interaction.id().to_owned(),
                    enabled: interaction.enabled(),
                    config: interaction.config(),
                })
                .collect(),
        }
    }
}
