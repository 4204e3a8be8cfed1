//! Configuration management for the tudu application.
//!
//! Settings are stored as JSON in the platform-specific application data
//! directory and can be created either programmatically, through the
//! interactive `tudu init` wizard, or overridden via environment variables:
//!
//! - `TUDU_DATASTORE_URL` / `TUDU_DATASTORE_KEY`: hosted datastore credentials
//! - `TUDU_PUBLIC_URL`: public base URL used for self-referential API calls
//! - `TUDU_HOST` / `TUDU_PORT`: server bind address
//!
//! Each module of the configuration is optional so the application keeps
//! working with a partial setup (e.g. the in-memory datastore backend
//! requires no credentials at all).

use super::data_storage::DataStorage;
use crate::datastore::DatastoreConfig;
use crate::libs::messages::Message;
use crate::msg_print;
use anyhow::Result;
use dialoguer::{theme::ColorfulTheme, Input, MultiSelect};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs::{self, File};

/// Configuration file name used for storing application settings.
pub const CONFIG_FILE_NAME: &str = "config.json";

/// Represents a configurable module in the application.
///
/// Used during interactive setup to display available modules and let the
/// user pick which ones to configure.
#[derive(Debug, Clone)]
pub struct ConfigModule {
    /// Unique identifier for the module used in configuration routing
    pub key: String,
    /// Display name shown to users during interactive setup
    pub name: String,
}

/// Web server configuration.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ServerConfig {
    /// Host address the server binds to.
    pub host: String,
    /// Port the server binds to.
    pub port: u16,
    /// Public base URL of this application.
    ///
    /// Server-rendered pages and the terminal client issue their API calls
    /// against this URL, mirroring how the browser client would.
    pub public_url: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 3000,
            public_url: "http://localhost:3000".to_string(),
        }
    }
}

/// Main configuration container for the entire application.
///
/// All modules are optional; unconfigured modules are omitted from the
/// JSON output to keep the file clean.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct Config {
    /// Hosted datastore credentials and backend selection.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub datastore: Option<DatastoreConfig>,

    /// Web server bind address and public URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server: Option<ServerConfig>,
}

impl Config {
    /// Reads configuration from the filesystem and applies environment
    /// variable overrides.
    ///
    /// A missing configuration file is not an error; the default (empty)
    /// configuration is returned so env-only setups keep working.
    pub fn read() -> Result<Config> {
        let config_file_path = DataStorage::new().get_path(CONFIG_FILE_NAME)?;

        let mut config = if config_file_path.exists() {
            let config_str = fs::read_to_string(config_file_path)?;
            serde_json::from_str(&config_str)?
        } else {
            Config::default()
        };
        config.apply_env();
        Ok(config)
    }

    /// Saves the current configuration to the filesystem as pretty JSON.
    pub fn save(&self) -> Result<()> {
        let config_file_path = DataStorage::new().get_path(CONFIG_FILE_NAME)?;

        let config_file = File::create(config_file_path)?;
        serde_json::to_writer_pretty(&config_file, &self)?;
        Ok(())
    }

    /// Overrides configuration values from the environment.
    fn apply_env(&mut self) {
        if let Ok(url) = env::var("TUDU_DATASTORE_URL") {
            let datastore = self.datastore.get_or_insert_with(DatastoreConfig::default);
            datastore.api_url = url;
        }
        if let Ok(key) = env::var("TUDU_DATASTORE_KEY") {
            let datastore = self.datastore.get_or_insert_with(DatastoreConfig::default);
            datastore.api_key = key;
        }

        if let Ok(host) = env::var("TUDU_HOST") {
            self.server.get_or_insert_with(ServerConfig::default).host = host;
        }
        if let Ok(Ok(port)) = env::var("TUDU_PORT").map(|p| p.parse()) {
            self.server.get_or_insert_with(ServerConfig::default).port = port;
        }
        if let Ok(url) = env::var("TUDU_PUBLIC_URL") {
            self.server.get_or_insert_with(ServerConfig::default).public_url = url;
        }
    }

    /// Returns the effective server configuration, falling back to defaults.
    pub fn server_or_default(&self) -> ServerConfig {
        self.server.clone().unwrap_or_default()
    }

    /// Runs an interactive configuration setup wizard.
    ///
    /// Presents the available modules, collects their parameters with the
    /// existing values pre-filled as defaults and returns the updated
    /// configuration for saving.
    pub fn init() -> Result<Self> {
        let mut config = match Self::read() {
            Ok(config) => config,
            Err(_) => Config::default(),
        };

        let node_descriptions = vec![
            DatastoreConfig::module(),
            ConfigModule {
                key: "server".to_string(),
                name: "Server".to_string(),
            },
        ];

        let selected_nodes = MultiSelect::with_theme(&ColorfulTheme::default())
            .with_prompt(Message::PromptSelectModules.to_string())
            .items(&node_descriptions.iter().map(|module| &module.name).collect::<Vec<_>>())
            .interact()?;

        for &selection in &selected_nodes {
            match node_descriptions[selection].key.as_str() {
                "datastore" => config.datastore = Some(DatastoreConfig::init(&config.datastore)?),
                "server" => {
                    let default = config.server.clone().unwrap_or_default();
                    msg_print!(Message::ConfigModuleServer);
                    config.server = Some(ServerConfig {
                        host: Input::with_theme(&ColorfulTheme::default())
                            .with_prompt(Message::PromptHost.to_string())
                            .default(default.host)
                            .interact_text()?,
                        port: Input::with_theme(&ColorfulTheme::default())
                            .with_prompt(Message::PromptPort.to_string())
                            .default(default.port)
                            .interact_text()?,
                        public_url: Input::with_theme(&ColorfulTheme::default())
                            .with_prompt(Message::PromptPublicUrl.to_string())
                            .default(default.public_url)
                            .interact_text()?,
                    });
                }
                _ => {}
            }
        }

        Ok(config)
    }
}
