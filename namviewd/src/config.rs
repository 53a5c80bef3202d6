//! Reviewer config.
use std::{collections::HashSet, path::Path};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use namview_common::{default_tokens, BufferConfig, DisplayConfig, Network, TokenConfig};
use namview_parser::{tokens::parse_token_address, TokenRegistry};

use crate::error::ReviewerError;

/// Reviewer configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ReviewerConfig {
    /// Network, selects address prefixes.
    pub network: Network,
    /// Display settings.
    pub display: DisplayConfig,
    /// Accumulation buffer capacities.
    pub buffer: BufferConfig,
    /// Known tokens.
    pub tokens: Vec<TokenConfig>,
}

impl Default for ReviewerConfig {
    fn default() -> Self {
        Self {
            network: Network::default(),
            display: DisplayConfig::default(),
            buffer: BufferConfig::default(),
            tokens: default_tokens(),
        }
    }
}

impl ReviewerConfig {
    /// Performs checks on config data.
    pub fn check_config(&self) -> Result<(), ReviewerError> {
        if self.display.value_width == 0 {
            return Err(ReviewerError::ConfigError(
                "display.value_width must be greater than zero.".to_string(),
            ));
        }
        if self.buffer.ram_capacity == 0 || self.buffer.flash_capacity == 0 {
            return Err(ReviewerError::ConfigError(
                "buffer capacities must be greater than zero.".to_string(),
            ));
        }

        let mut symbols = HashSet::new();
        for token in &self.tokens {
            if let Err(e) = parse_token_address(&token.address, self.network) {
                return Err(ReviewerError::ConfigError(format!(
                    "token {} has an invalid address {:?}: {}",
                    token.symbol, token.address, e
                )));
            }
            if !symbols.insert(token.symbol.as_str()) {
                return Err(ReviewerError::ConfigError(format!(
                    "token symbol {} is configured more than once.",
                    token.symbol
                )));
            }
        }
        Ok(())
    }

    /// Token registry built from the configured tokens.
    pub fn registry(&self) -> Result<TokenRegistry, ReviewerError> {
        Ok(TokenRegistry::from_config(&self.tokens, self.network)?)
    }
}

/// Loads the reviewer config.
///
/// Configuration sources are layered: Env > TOML > Defaults. A missing TOML file
/// leaves the defaults in place. The result undergoes [`ReviewerConfig::check_config`].
pub fn load_config(file_path: Option<&Path>) -> Result<ReviewerConfig, ReviewerError> {
    let mut figment = Figment::new().merge(Serialized::defaults(ReviewerConfig::default()));
    if let Some(path) = file_path {
        figment = figment.merge(Toml::file(path));
    }
    let figment = figment.merge(Env::prefixed("NAMVIEW_").split("__"));

    let source = file_path
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "<none>".to_string());
    match figment.extract::<ReviewerConfig>() {
        Ok(config) => {
            config.check_config()?;
            info!(
                network = %config.network,
                tokens = config.tokens.len(),
                "Successfully loaded and validated config. Base TOML file checked: '{}'",
                source
            );
            Ok(config)
        }
        Err(figment_error) => {
            error!("Failed to extract configuration using figment: {}", figment_error);
            Err(ReviewerError::ConfigError(format!(
                "Namview configuration loading failed during figment extract '{}' (could be TOML file or environment variables). Details: {}",
                source, figment_error
            )))
        }
    }
}
