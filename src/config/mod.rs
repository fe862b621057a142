use std::path::PathBuf;

use anyhow::Result;
use dotenvy::dotenv;
use serde::Deserialize;

fn default_api_url() -> String {
    "https://agenda-digital-api.onrender.com/api".to_string()
}

fn default_cnpj_lookup_url() -> String {
    "https://brasilapi.com.br/api/cnpj/v1".to_string()
}

fn default_cep_lookup_url() -> String {
    "https://viacep.com.br/ws".to_string()
}

/// Configuration for the application
#[derive(Debug, Deserialize)]
pub struct Config {
    /// Base URL of the Agenda Digital REST API
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Company-registry lookup service (keyed by CNPJ)
    #[serde(default = "default_cnpj_lookup_url")]
    pub cnpj_lookup_url: String,
    /// Postal-code lookup service (keyed by CEP)
    #[serde(default = "default_cep_lookup_url")]
    pub cep_lookup_url: String,
    /// Where the session token is persisted; defaults to the user config dir
    #[serde(default)]
    pub session_file: Option<PathBuf>,
    /// When set, tracing output is appended to this file
    #[serde(default)]
    pub log_file: Option<PathBuf>,
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// This function will:
    /// 1. Load variables from .env file if it exists
    /// 2. Deserialize environment variables into Config struct
    pub fn load() -> Result<Self> {
        // Load .env file if it exists
        dotenv().ok();

        // Parse environment variables into Config struct
        let config = envy::from_env::<Config>()?;

        Ok(config)
    }
}

/// Initialize environment variables and load configuration
pub fn init() -> Result<Config> {
    // Ensure .env file is loaded
    dotenv().ok();

    // Load the configuration
    let config = Config::load()?;

    Ok(config)
}
