use alloy_primitives::{Address, address};
use anyhow::{Context, Result};
use std::str::FromStr;
use std::time::Duration;

/// Demeter farm factory on Arbitrum One.
pub const DEFAULT_FACTORY_ADDRESS: Address = address!("C4fb09E0CD212367642974F6bA81D8e23780A659");

/// First block searched for ownership transfers.
pub const DEFAULT_START_BLOCK: u64 = 27_001_371;

pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Clone)]
pub struct Config {
    pub json_rpc_url: String,
    pub factory_address: Address,
    pub start_block: u64,
    pub request_timeout: Duration,
}

/// Command-line values that take precedence over the environment.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub rpc_url: Option<String>,
    pub factory: Option<String>,
    pub start_block: Option<u64>,
}

impl Config {
    pub fn from_env(overrides: ConfigOverrides) -> Result<Self> {
        dotenv::dotenv().ok();

        Self::from_lookup(|key| std::env::var(key).ok(), overrides)
    }

    pub fn from_lookup<F>(lookup: F, overrides: ConfigOverrides) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let json_rpc_url = match overrides.rpc_url {
            Some(url) => url,
            None => lookup("JSON_RPC_URL")
                .context("JSON_RPC_URL must be set in .env or passed with --rpc-url")?,
        };

        let factory_address = match overrides.factory {
            Some(value) => Address::from_str(value.trim())
                .context("Invalid --factory address format")?,
            None => match lookup("FARM_FACTORY_ADDRESS") {
                Some(value) => Address::from_str(value.trim())
                    .context("Invalid FARM_FACTORY_ADDRESS format")?,
                None => DEFAULT_FACTORY_ADDRESS,
            },
        };

        let start_block = match (overrides.start_block, lookup("START_BLOCK")) {
            (Some(block), _) => block,
            (None, Some(value)) => value
                .trim()
                .parse()
                .context("START_BLOCK must be a block number")?,
            (None, None) => DEFAULT_START_BLOCK,
        };

        let timeout_secs = match lookup("REQUEST_TIMEOUT_SECS") {
            Some(value) => value
                .trim()
                .parse()
                .context("REQUEST_TIMEOUT_SECS must be a number of seconds")?,
            None => DEFAULT_REQUEST_TIMEOUT_SECS,
        };

        Ok(Config {
            json_rpc_url,
            factory_address,
            start_block,
            request_timeout: Duration::from_secs(timeout_secs),
        })
    }
}
