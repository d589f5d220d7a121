//! Configuration Module
//!
//! This module defines all configuration structures for the batch executor.
//! Configuration is loaded from TOML files and parsed using serde.

use ethers::types::Address;
use serde::Deserialize;
use std::fs;

/// Main configuration structure
///
/// # Example TOML
/// ```toml
/// [api]
/// host = "127.0.0.1"
/// port = 8650
///
/// [chain]
/// chain_id = 1
/// rpc_url = "https://eth.llamarpc.com"
/// safe_address = "0x..."
/// safe_version = "1.3.0"
/// multisend_address = "0x40A2aCCbd92BCA938b02010E17A5b8929b49130D"
/// signer_key_env = "BATCH_EXECUTOR_PRIVATE_KEY"
///
/// [gateway]
/// url = "https://safe-client.safe.global"
///
/// [simulation]
/// url = "https://api.tenderly.co/api/v1/account/me/project/batch/simulate"
///
/// [relay]
/// url = "https://safe-client.safe.global"
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub api: ApiConfig,
    pub chain: ChainConfig,
    pub gateway: GatewayConfig,
    pub simulation: SimulationConfig,
    #[serde(default)]
    pub relay: RelayConfig,
}

/// API server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,
}

/// Chain and account settings
///
/// # Fields
/// - `safe_address`: Multi-sig account whose queue is batched
/// - `safe_version`: Contract version of the Safe, forwarded to the relay
/// - `multisend_address`: Multi-send (call only) contract executing the batch
/// - `signer_key_env`: Environment variable holding the executor private key
#[derive(Debug, Clone, Deserialize)]
pub struct ChainConfig {
    pub chain_id: u64,
    pub rpc_url: String,
    pub safe_address: Address,
    pub safe_version: String,
    pub multisend_address: Address,
    pub signer_key_env: String,
}

/// Transaction service gateway settings
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayConfig {
    pub url: String,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

/// Simulation service settings
#[derive(Debug, Clone, Deserialize)]
pub struct SimulationConfig {
    pub url: String,
    pub access_key: Option<String>,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default = "default_gas_limit")]
    pub gas_limit: u64,
}

/// Fee sponsoring relay settings; no `url` disables relaying
#[derive(Debug, Clone, Deserialize)]
pub struct RelayConfig {
    pub url: Option<String>,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            url: None,
            timeout_ms: default_timeout_ms(),
        }
    }
}

fn default_timeout_ms() -> u64 {
    10_000
}

fn default_gas_limit() -> u64 {
    30_000_000
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Returns
    /// * `Ok(Config)` if the file was successfully loaded and parsed
    /// * `Err` if the file couldn't be read or the TOML is invalid
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> anyhow::Result<Self> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }
}
