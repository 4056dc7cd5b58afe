use anyhow::{Context, Result};
use figment::{
    Figment,
    providers::{Env, Format, Json, Toml, Yaml},
};
use std::path::Path;

use super::Settings;

// Embed the default config at compile time
const DEFAULT_CONFIG: &str = include_str!("../../default-config.toml");

pub struct IonToolsConfig {
    figment: Figment,
}

impl IonToolsConfig {
    /// Only the embedded defaults, with no files or environment applied
    pub fn defaults() -> Self {
        IonToolsConfig {
            figment: Figment::new().merge(Toml::string(DEFAULT_CONFIG)),
        }
    }

    pub fn load(custom_config: Option<&str>) -> Result<Self> {
        let mut figment = Figment::new().merge(Toml::string(DEFAULT_CONFIG));

        // If custom config is specified, use only that + defaults + env vars
        if let Some(custom_path) = custom_config {
            if !Path::new(custom_path).is_file() {
                anyhow::bail!("Configuration file not found: {custom_path}");
            }
            figment = match Path::new(custom_path).extension().and_then(|e| e.to_str()) {
                Some("json") => figment.merge(Json::file(custom_path)),
                Some("yaml" | "yml") => figment.merge(Yaml::file(custom_path)),
                _ => figment.merge(Toml::file(custom_path)),
            };
        } else {
            let user = Self::user_config_path();
            figment = figment
                // User config - support multiple formats
                .merge(Toml::file(&user))
                .merge(Json::file(user.replace(".toml", ".json")))
                .merge(Yaml::file(user.replace(".toml", ".yaml")))
                .merge(Yaml::file(user.replace(".toml", ".yml")))
                // Repository config - support multiple formats
                .merge(Toml::file("iontools.toml"))
                .merge(Json::file("iontools.json"))
                .merge(Yaml::file("iontools.yaml"))
                .merge(Yaml::file("iontools.yml"));
        }

        // Environment variables always have highest priority
        figment = figment.merge(Env::prefixed("IONTOOLS_").split("__"));

        Ok(IonToolsConfig { figment })
    }

    /// Extract the typed settings
    pub fn settings(&self) -> Result<Settings> {
        self.figment
            .extract()
            .context("Failed to parse iontools configuration")
    }

    /// The embedded default configuration, as written by `config init`
    pub fn default_toml() -> &'static str {
        DEFAULT_CONFIG
    }

    fn user_config_path() -> String {
        match std::env::var("HOME") {
            Ok(home) => format!("{home}/.config/iontools/config.toml"),
            Err(_) => "~/.config/iontools/config.toml".to_string(),
        }
    }
}
