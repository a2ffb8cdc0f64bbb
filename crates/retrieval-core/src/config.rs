//! Configuration loader and typed settings.
//!
//! Uses Figment to merge built-in defaults + `config.toml` +
//! `config.<env>.toml` + `APP_*` env vars (`__` separates nested keys, e.g.
//! `APP_HYDRATION__STRICT=true`).
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::env;
use std::path::Path;

use crate::error::{Error, Result};
use crate::types::FieldType;

pub struct Config {
    figment: Figment,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());
        Self::load_for_env(&env_name)
    }

    pub fn load_for_env(env_name: &str) -> anyhow::Result<Self> {
        Self::load_from(Path::new("."), env_name)
    }

    /// Same layering as `load_for_env`, reading the TOML files from `dir`.
    pub fn load_from(dir: &Path, env_name: &str) -> anyhow::Result<Self> {
        let mut figment = Self::defaults().merge(Toml::file(dir.join("config.toml")));
        match env_name {
            "dev" | "development" => figment = figment.merge(Toml::file(dir.join("config.dev.toml"))),
            "prod" | "production" => figment = figment.merge(Toml::file(dir.join("config.prod.toml"))),
            "test" | "testing" => figment = figment.merge(Toml::file(dir.join("config.test.toml"))),
            _ => {}
        }
        figment = figment.merge(Env::prefixed("APP_").split("__"));

        let config = Self { figment };
        config.settings()?;
        Ok(config)
    }

    /// Defaults overlaid with an inline TOML document.
    pub fn from_toml_str(toml: &str) -> anyhow::Result<Self> {
        let config = Self { figment: Self::defaults().merge(Toml::string(toml)) };
        config.settings()?;
        Ok(config)
    }

    pub fn get<T>(&self, key: &str) -> anyhow::Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        self.figment
            .extract_inner(key)
            .map_err(|e| anyhow::anyhow!("Failed to get '{}': {}", key, e))
    }

    pub fn settings(&self) -> anyhow::Result<Settings> {
        let settings: Settings = self
            .figment
            .extract()
            .map_err(|e| anyhow::anyhow!("Failed to read settings: {}", e))?;
        settings.validate()?;
        Ok(settings)
    }

    fn defaults() -> Figment { Figment::from(Serialized::defaults(Settings::default())) }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Wire suffix -> field type. Merged over the built-in `s/i/f/d/b` table.
    pub field_types: BTreeMap<String, FieldType>,
    pub pagination: PaginationSettings,
    pub facets: FacetOptions,
    pub hydration: HydrationSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            field_types: FieldType::default_suffixes(),
            pagination: PaginationSettings::default(),
            facets: FacetOptions::default(),
            hydration: HydrationSettings::default(),
        }
    }
}

impl Settings {
    pub fn validate(&self) -> Result<()> {
        if self.field_types.is_empty() {
            return Err(Error::InvalidConfig("field_types must not be empty".to_string()));
        }
        for suffix in self.field_types.keys() {
            if suffix.is_empty() || suffix.contains(['_', ':']) {
                return Err(Error::InvalidConfig(format!("invalid field type suffix '{}'", suffix)));
            }
        }
        if self.pagination.default_per_page == 0 {
            return Err(Error::InvalidConfig("pagination.default_per_page must be positive".to_string()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationSettings {
    /// When off, paged queries still come back as plain sequences.
    pub enabled: bool,
    pub default_per_page: u64,
}

impl Default for PaginationSettings {
    fn default() -> Self { Self { enabled: true, default_per_page: 30 } }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetOptions {
    /// Drop rows whose value fails to coerce instead of keeping the error on the row.
    pub skip_invalid_rows: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HydrationSettings {
    /// Raise `MissingEntity` for dangling references instead of yielding `None`.
    pub strict: bool,
}
