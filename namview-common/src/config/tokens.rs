//! Known token table configuration.

use serde::{Deserialize, Serialize};

/// One entry of the known token table.
///
/// `address` is either the bech32m rendering for the configured network or the raw
/// 21 address bytes in hex.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TokenConfig {
    /// Token address.
    pub address: String,
    /// Ticker shown in front of amounts.
    pub symbol: String,
}

impl TokenConfig {
    /// Creates a token entry.
    pub fn new(address: impl Into<String>, symbol: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            symbol: symbol.into(),
        }
    }
}

/// Raw bytes of the native token address, hex encoded.
pub const NATIVE_TOKEN_ADDRESS_HEX: &str = "00a3c6e1d89b04f5572e6d1c2b8f90e4a7d35b16c8";

/// Native token ticker.
pub const NATIVE_TOKEN_SYMBOL: &str = "NAM";

/// Token table used when no configuration overrides it.
pub fn default_tokens() -> Vec<TokenConfig> {
    vec![TokenConfig::new(NATIVE_TOKEN_ADDRESS_HEX, NATIVE_TOKEN_SYMBOL)]
}
