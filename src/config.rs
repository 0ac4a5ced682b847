//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/syndoc/syndoc.toml`
//! 3. Local config: `<document_dir>/.syndoc.toml` (next to the rule document)
//! 4. Environment variables: `SYNDOC_*` prefix

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::ApplicationError;
use crate::domain::diagram::DEFAULT_ANCHOR_PREFIX;

/// Rule listing layout.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ListingConfig {
    /// Placed before `::=` and before each `  |` continuation line
    pub prefix: String,
    /// Placed between the alternatives of one rule
    pub separator: String,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            prefix: "    ".into(),
            separator: "\n".into(),
        }
    }
}

/// Diagram model output.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DiagramConfig {
    /// Rule references link to `#<anchor_prefix><name>`
    pub anchor_prefix: String,
    /// Pretty-print the JSON model
    pub pretty: bool,
}

impl Default for DiagramConfig {
    fn default() -> Self {
        Self {
            anchor_prefix: DEFAULT_ANCHOR_PREFIX.into(),
            pretty: true,
        }
    }
}

/// Raw listing config for intermediate parsing (`None` means "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawListingConfig {
    pub prefix: Option<String>,
    pub separator: Option<String>,
}

/// Raw diagram config for intermediate parsing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawDiagramConfig {
    pub anchor_prefix: Option<String>,
    pub pretty: Option<bool>,
}

/// Raw settings for intermediate parsing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub listing: RawListingConfig,
    pub diagram: RawDiagramConfig,
}

/// Unified configuration for syndoc.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    pub listing: ListingConfig,
    pub diagram: DiagramConfig,
}

/// Get the XDG config directory for syndoc.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "syndoc").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("syndoc.toml"))
}

/// Get the path to the local config file next to a rule document.
pub fn local_config_path(document_dir: &Path) -> PathBuf {
    document_dir.join(".syndoc.toml")
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    /// Overlay wins field by field where it specifies a value.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            listing: ListingConfig {
                prefix: overlay
                    .listing
                    .prefix
                    .clone()
                    .unwrap_or_else(|| self.listing.prefix.clone()),
                separator: overlay
                    .listing
                    .separator
                    .clone()
                    .unwrap_or_else(|| self.listing.separator.clone()),
            },
            diagram: DiagramConfig {
                anchor_prefix: overlay
                    .diagram
                    .anchor_prefix
                    .clone()
                    .unwrap_or_else(|| self.diagram.anchor_prefix.clone()),
                pretty: overlay.diagram.pretty.unwrap_or(self.diagram.pretty),
            },
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `document_dir` - Directory of the rule document, for the local config
    pub fn load(document_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        Self::load_from(global_config_path().as_deref(), document_dir, None)
    }

    /// Load settings from explicit locations.
    ///
    /// `env` replaces the process environment as the source of `SYNDOC_*`
    /// variables when given.
    pub fn load_from(
        global_path: Option<&Path>,
        document_dir: Option<&Path>,
        env: Option<HashMap<String, String>>,
    ) -> Result<Self, ApplicationError> {
        // 1. Start with defaults
        let mut current = Self::default();

        // 2. Global config
        if let Some(global_path) = global_path {
            if global_path.exists() {
                debug!("load: global config {}", global_path.display());
                let raw = load_raw_settings(global_path)?;
                current = current.merge_with(&raw);
            }
        }

        // 3. Local config next to the document
        if let Some(dir) = document_dir {
            let local_path = local_config_path(dir);
            if local_path.exists() {
                debug!("load: local config {}", local_path.display());
                let raw = load_raw_settings(&local_path)?;
                current = current.merge_with(&raw);
            }
        }

        // 4. Environment variables
        Self::apply_env_overrides(current, env)
    }

    /// Apply SYNDOC_* environment variables as explicit overrides.
    fn apply_env_overrides(
        mut settings: Self,
        env: Option<HashMap<String, String>>,
    ) -> Result<Self, ApplicationError> {
        let builder = Config::builder().add_source(
            Environment::with_prefix("SYNDOC")
                .prefix_separator("_")
                .separator("__")
                .source(env),
        );

        let config = builder.build().map_err(config_err)?;

        if let Ok(val) = config.get_string("listing.prefix") {
            settings.listing.prefix = val;
        }
        if let Ok(val) = config.get_string("listing.separator") {
            settings.listing.separator = val;
        }
        if let Ok(val) = config.get_string("diagram.anchor_prefix") {
            settings.diagram.anchor_prefix = val;
        }
        if let Ok(val) = config.get_bool("diagram.pretty") {
            settings.diagram.pretty = val;
        }

        Ok(settings)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r##"# syndoc configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/syndoc/syndoc.toml
#   Local:  .syndoc.toml next to the rule document
#   Env:    SYNDOC_* environment variables, e.g. SYNDOC_LISTING__PREFIX

[listing]
# Placed before "::=" and before every "  |" continuation line
# prefix = "    "

# Placed between the alternatives of one rule
# separator = "\n"

[diagram]
# Rule references link to "#<anchor_prefix><rule name>"
# anchor_prefix = "rule-"

# Pretty-print the JSON diagram model
# pretty = true
"##
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
