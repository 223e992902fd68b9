//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/modtree/modtree.toml`
//! 3. Environment variables: `MODTREE_*` prefix

use config::{Config, ConfigError, Environment, File};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::tree::OrderBy;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Default ordering field for new trees: "name", "priority" or "cost"
    pub default_order: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_order: "name".into(),
        }
    }
}

impl Settings {
    pub fn load() -> Result<Self, ConfigError> {
        let mut builder = Config::builder().set_default("default_order", "name")?;

        if let Some(dirs) = ProjectDirs::from("", "", "modtree") {
            let global = dirs.config_dir().join("modtree.toml");
            builder = builder.add_source(File::from(global).required(false));
        }

        builder = builder.add_source(Environment::with_prefix("MODTREE"));
        builder.build()?.try_deserialize()
    }

    /// Parsed ordering field; unknown values fall back to name ordering.
    pub fn order(&self) -> OrderBy {
        self.default_order.parse().unwrap_or(OrderBy::Name)
    }
}
