//! Network type for Namview configuration.

use serde::{Deserialize, Serialize};

/// Network whose address prefixes are used when rendering values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
pub enum Network {
    /// Mainnet network
    Mainnet,
    /// Testnet network
    #[default]
    Testnet,
}

impl Network {
    /// Human readable part of transparent addresses.
    pub fn address_hrp(&self) -> &'static str {
        match self {
            Network::Mainnet => "nam",
            Network::Testnet => "tnam",
        }
    }

    /// Human readable part of public keys.
    pub fn public_key_hrp(&self) -> &'static str {
        match self {
            Network::Mainnet => "pknam",
            Network::Testnet => "tpknam",
        }
    }

    /// Human readable part of extended full viewing keys.
    pub fn viewing_key_hrp(&self) -> &'static str {
        match self {
            Network::Mainnet => "zvknam",
            Network::Testnet => "zvktnam",
        }
    }

    /// Human readable part of shielded payment addresses.
    pub fn payment_address_hrp(&self) -> &'static str {
        match self {
            Network::Mainnet => "znam",
            Network::Testnet => "ztnam",
        }
    }
}

impl std::fmt::Display for Network {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Network::Mainnet => write!(f, "Mainnet"),
            Network::Testnet => write!(f, "Testnet"),
        }
    }
}
