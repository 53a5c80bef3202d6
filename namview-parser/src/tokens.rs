//! Known token table used to resolve ticker symbols.

use namview_common::{default_tokens, Network, TokenConfig};

use crate::{
    error::ParserError,
    types::{Address, ADDRESS_LEN},
};

/// Maps token addresses to ticker symbols.
#[derive(Debug, Clone)]
pub struct TokenRegistry {
    network: Network,
    entries: Vec<(Address, String)>,
}

impl TokenRegistry {
    /// Builds a registry from configured entries.
    ///
    /// Each address is accepted either as bech32m for `network` or as raw hex.
    pub fn from_config(tokens: &[TokenConfig], network: Network) -> Result<Self, ParserError> {
        let entries = tokens
            .iter()
            .map(|token| Ok((parse_token_address(&token.address, network)?, token.symbol.clone())))
            .collect::<Result<Vec<_>, ParserError>>()?;
        Ok(Self { network, entries })
    }

    /// Empty registry: every token is unresolved.
    pub fn empty(network: Network) -> Self {
        Self {
            network,
            entries: Vec::new(),
        }
    }

    /// Adds or replaces a token.
    pub fn insert(&mut self, address: Address, symbol: impl Into<String>) {
        let symbol = symbol.into();
        match self.entries.iter_mut().find(|(known, _)| *known == address) {
            Some(entry) => entry.1 = symbol,
            None => self.entries.push((address, symbol)),
        }
    }

    /// Symbol of `address`, if known.
    pub fn symbol(&self, address: &Address) -> Option<&str> {
        self.entries
            .iter()
            .find(|(known, _)| known == address)
            .map(|(_, symbol)| symbol.as_str())
    }

    /// Network used to render addresses.
    pub fn network(&self) -> Network {
        self.network
    }

    /// Number of known tokens.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no token is known.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for TokenRegistry {
    fn default() -> Self {
        // The built-in table is hex encoded and always parses.
        Self::from_config(&default_tokens(), Network::default())
            .unwrap_or_else(|_| Self::empty(Network::default()))
    }
}

/// Parses a configured token address, bech32m first, then raw hex.
pub fn parse_token_address(s: &str, network: Network) -> Result<Address, ParserError> {
    if let Ok(address) = Address::from_bech32m(s, network) {
        return Ok(address);
    }
    let raw = hex::decode(s).map_err(|_| ParserError::UnexpectedCharacters("TokenConfig::address"))?;
    let bytes: [u8; ADDRESS_LEN] = raw
        .try_into()
        .map_err(|_| ParserError::ValueOutOfRange("TokenConfig::address"))?;
    Address::from_bytes(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use namview_common::{NATIVE_TOKEN_ADDRESS_HEX, NATIVE_TOKEN_SYMBOL};

    #[test]
    fn default_registry_knows_native_token() {
        let registry = TokenRegistry::default();
        let native = parse_token_address(NATIVE_TOKEN_ADDRESS_HEX, Network::Testnet).unwrap();
        assert_eq!(registry.symbol(&native), Some(NATIVE_TOKEN_SYMBOL));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn bech32m_and_hex_addresses_are_equivalent() {
        let mut bytes = [0x11u8; ADDRESS_LEN];
        bytes[0] = 0;
        let address = Address::from_bytes(bytes).unwrap();
        let tokens = vec![
            TokenConfig::new(address.encode(Network::Mainnet), "AAA"),
            TokenConfig::new(hex::encode(bytes), "BBB"),
        ];
        let registry = TokenRegistry::from_config(&tokens, Network::Mainnet).unwrap();
        // First match wins.
        assert_eq!(registry.symbol(&address), Some("AAA"));
    }

    #[test]
    fn malformed_address_is_rejected() {
        let tokens = vec![TokenConfig::new("not-an-address", "XXX")];
        assert_eq!(
            TokenRegistry::from_config(&tokens, Network::Testnet).unwrap_err(),
            ParserError::UnexpectedCharacters("TokenConfig::address")
        );
        let short = vec![TokenConfig::new("0011", "XXX")];
        assert_eq!(
            TokenRegistry::from_config(&short, Network::Testnet).unwrap_err(),
            ParserError::ValueOutOfRange("TokenConfig::address")
        );
    }

    #[test]
    fn insert_replaces_existing_symbol() {
        let address = Address::from_bytes([1u8; ADDRESS_LEN]).unwrap();
        let mut registry = TokenRegistry::empty(Network::Testnet);
        assert!(registry.symbol(&address).is_none());
        registry.insert(address, "OLD");
        registry.insert(address, "NEW");
        assert_eq!(registry.symbol(&address), Some("NEW"));
        assert_eq!(registry.len(), 1);
    }
}
