use crate::domain::address::Address;
use crate::domain::chain::{ChainSpec, STUDIONET_RPC_URL};
use crate::domain::error::{AppError, Result};
use crate::infrastructure::genlayer::ConsensusConfig;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub const DEFAULT_CONFIG_FILE: &str = "verdict-registry.toml";
pub const ENV_PREFIX: &str = "VERDICT_";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    pub host: String,
    pub port: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3001,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub contract_address: Option<String>,
    pub rpc_url: String,
    #[serde(default)]
    pub wallet_url: Option<String>,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub chain: ChainSpec,
    #[serde(default)]
    pub consensus: ConsensusConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            contract_address: None,
            rpc_url: STUDIONET_RPC_URL.to_string(),
            wallet_url: None,
            http: HttpConfig::default(),
            chain: ChainSpec::studionet(),
            consensus: ConsensusConfig::default(),
        }
    }
}

pub struct ConfigService {
    config: AppConfig,
}

impl ConfigService {
    /// Defaults, then the TOML file, then `VERDICT_*` environment variables.
    pub fn load() -> Result<Self> {
        let _ = dotenvy::dotenv();
        let path = std::env::var("VERDICT_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_FILE));
        Self::from_figment(Self::figment(&path))
    }

    pub fn figment(path: &Path) -> Figment {
        Figment::from(Serialized::defaults(AppConfig::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    pub fn from_figment(figment: Figment) -> Result<Self> {
        let mut config: AppConfig = figment.extract()?;

        config.contract_address = config
            .contract_address
            .map(|addr| addr.trim().to_string())
            .filter(|addr| !addr.is_empty());
        config.wallet_url = config
            .wallet_url
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty());

        url::Url::parse(&config.rpc_url).map_err(|e| {
            AppError::ConfigError(format!("Invalid rpc_url {:?}: {}", config.rpc_url, e))
        })?;
        if let Some(wallet_url) = &config.wallet_url {
            url::Url::parse(wallet_url).map_err(|e| {
                AppError::ConfigError(format!("Invalid wallet_url {:?}: {}", wallet_url, e))
            })?;
        }
        if let Some(address) = &config.contract_address {
            Address::parse(address).map_err(|_| {
                AppError::ConfigError(format!("Invalid contract_address {:?}", address))
            })?;
        }

        // The wallet should be pointed at the same node the reads go to.
        if config.chain.rpc_urls.is_empty() {
            config.chain.rpc_urls = vec![config.rpc_url.clone()];
        }

        if config.consensus.initial_validators == 0 {
            return Err(AppError::ConfigError(
                "consensus.initial_validators must be at least 1".to_string(),
            ));
        }

        if config.contract_address.is_none() {
            warn!("VERDICT_CONTRACT_ADDRESS is not set; contract calls will fail");
        }
        info!(
            rpc_url = %config.rpc_url,
            wallet_url = config.wallet_url.as_deref().unwrap_or("<none>"),
            chain_id = %config.chain.chain_id_hex(),
            "Configuration loaded"
        );

        Ok(Self { config })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn contract_address(&self) -> Option<Address> {
        self.config
            .contract_address
            .as_deref()
            .and_then(|raw| Address::parse(raw).ok())
    }
}
