//! Primitive Namada wire types.

use bech32::{Bech32m, Hrp};
use namview_common::Network;
use primitive_types::U256;

use crate::{cursor::ParserContext, error::ParserError};

/// Raw 32 byte hash.
pub type Hash = [u8; 32];

/// Length of an encoded [`Address`].
pub const ADDRESS_LEN: usize = 21;

/// Length of an Ed25519 public key.
pub const ED25519_PUBKEY_LEN: usize = 32;

/// Length of a compressed Secp256k1 public key.
pub const SECP256K1_PUBKEY_LEN: usize = 33;

/// Decimal places carried by a [`Dec`].
pub const POS_DECIMAL_PRECISION: u8 = 12;

/// Denomination of the native token used by proof-of-stake amounts.
pub const NATIVE_DENOM: u8 = 6;

/// Largest denomination a 256 bit amount can carry.
pub const MAX_DENOM: u8 = 77;

/// Last second with a four digit year, 9999-12-31T23:59:59Z.
pub const MAX_TIMESTAMP_SECS: u64 = 253_402_300_799;

/// Trait for types decoded straight off a [`ParserContext`].
pub trait Decode: Sized {
    /// Decodes `Self`, advancing the cursor past the encoded value.
    fn decode(ctx: &mut ParserContext<'_>) -> Result<Self, ParserError>;
}

/// Reads a 32 byte hash.
pub fn read_hash(ctx: &mut ParserContext<'_>, field: &'static str) -> Result<Hash, ParserError> {
    ctx.read_array::<32>(field)
}

/// Namada account address.
///
/// Size\[bytes\]: 21 (discriminant + 20 byte hash)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Address([u8; ADDRESS_LEN]);

impl Address {
    /// Wraps raw address bytes, checking the discriminant.
    pub fn from_bytes(bytes: [u8; ADDRESS_LEN]) -> Result<Self, ParserError> {
        match bytes[0] {
            0..=2 => Ok(Address(bytes)),
            other => Err(ParserError::UnexpectedValue {
                field: "Address::discriminant",
                value: u64::from(other),
            }),
        }
    }

    /// Raw address bytes.
    pub fn as_bytes(&self) -> &[u8; ADDRESS_LEN] {
        &self.0
    }

    /// Bech32m rendering for `network`.
    pub fn encode(&self, network: Network) -> String {
        encode_bech32m(network.address_hrp(), &self.0)
    }

    /// Parses a bech32m address string with the prefix of `network`.
    pub fn from_bech32m(s: &str, network: Network) -> Result<Self, ParserError> {
        let (hrp, data) =
            bech32::decode(s).map_err(|_| ParserError::UnexpectedCharacters("Address"))?;
        if hrp.as_str() != network.address_hrp() {
            return Err(ParserError::UnexpectedCharacters("Address::hrp"));
        }
        let bytes: [u8; ADDRESS_LEN] = data
            .try_into()
            .map_err(|_| ParserError::ValueOutOfRange("Address::len"))?;
        Address::from_bytes(bytes)
    }
}

impl Decode for Address {
    fn decode(ctx: &mut ParserContext<'_>) -> Result<Self, ParserError> {
        let bytes = ctx.read_array::<ADDRESS_LEN>("Address")?;
        Address::from_bytes(bytes)
    }
}

/// Public key of an account or validator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublicKey {
    /// Ed25519 key.
    Ed25519([u8; ED25519_PUBKEY_LEN]),
    /// Compressed Secp256k1 key.
    Secp256k1([u8; SECP256K1_PUBKEY_LEN]),
}

impl PublicKey {
    /// Returns `true` for Secp256k1 keys.
    pub fn is_secp256k1(&self) -> bool {
        matches!(self, PublicKey::Secp256k1(_))
    }

    /// Tag byte followed by key bytes, as on the wire.
    pub fn to_wire_bytes(&self) -> Vec<u8> {
        match self {
            PublicKey::Ed25519(key) => [&[0u8][..], key].concat(),
            PublicKey::Secp256k1(key) => [&[1u8][..], key].concat(),
        }
    }

    /// Bech32m rendering for `network`.
    pub fn encode(&self, network: Network) -> String {
        encode_bech32m(network.public_key_hrp(), &self.to_wire_bytes())
    }
}

impl Decode for PublicKey {
    fn decode(ctx: &mut ParserContext<'_>) -> Result<Self, ParserError> {
        match ctx.read_u8("PublicKey::tag")? {
            0 => Ok(PublicKey::Ed25519(ctx.read_array("PublicKey::ed25519")?)),
            1 => Ok(PublicKey::Secp256k1(ctx.read_array("PublicKey::secp256k1")?)),
            tag => Err(ParserError::UnexpectedValue {
                field: "PublicKey::tag",
                value: u64::from(tag),
            }),
        }
    }
}

/// Unsigned 256 bit token amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Amount(pub U256);

impl Decode for Amount {
    fn decode(ctx: &mut ParserContext<'_>) -> Result<Self, ParserError> {
        let bytes = ctx.read_array::<32>("Amount")?;
        Ok(Amount(U256::from_little_endian(&bytes)))
    }
}

/// Amount paired with the number of decimal places it carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DenominatedAmount {
    /// Raw integer amount.
    pub amount: Amount,
    /// Decimal places.
    pub denom: u8,
}

impl DenominatedAmount {
    /// Amount in the native denomination.
    pub fn native(amount: Amount) -> Self {
        Self {
            amount,
            denom: NATIVE_DENOM,
        }
    }
}

impl Decode for DenominatedAmount {
    fn decode(ctx: &mut ParserContext<'_>) -> Result<Self, ParserError> {
        let amount = Amount::decode(ctx)?;
        let denom = ctx.read_u8("DenominatedAmount::denom")?;
        if denom > MAX_DENOM {
            return Err(ParserError::ValueOutOfRange("DenominatedAmount::denom"));
        }
        Ok(Self { amount, denom })
    }
}

/// Non-negative fixed point decimal with [`POS_DECIMAL_PRECISION`] places.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Dec(pub U256);

impl Dec {
    /// Views the decimal as a denominated amount for formatting.
    pub fn as_denominated(&self) -> DenominatedAmount {
        DenominatedAmount {
            amount: Amount(self.0),
            denom: POS_DECIMAL_PRECISION,
        }
    }
}

impl Decode for Dec {
    fn decode(ctx: &mut ParserContext<'_>) -> Result<Self, ParserError> {
        let bytes = ctx.read_array::<32>("Dec")?;
        if bytes[31] & 0x80 != 0 {
            return Err(ParserError::ValueOutOfRange("Dec"));
        }
        Ok(Dec(U256::from_little_endian(&bytes)))
    }
}

/// Encodes `data` as bech32m under `hrp`.
///
/// Prefixes come from [`Network`] and are always valid, so the fallback to hex is only
/// reachable with malformed network tables.
pub fn encode_bech32m(hrp: &str, data: &[u8]) -> String {
    Hrp::parse(hrp)
        .ok()
        .and_then(|hrp| bech32::encode::<Bech32m>(hrp, data).ok())
        .unwrap_or_else(|| hex::encode(data))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn address_bytes(tag: u8, fill: u8) -> [u8; ADDRESS_LEN] {
        let mut bytes = [fill; ADDRESS_LEN];
        bytes[0] = tag;
        bytes
    }

    #[test]
    fn address_round_trips_through_bech32m() {
        let address = Address::from_bytes(address_bytes(0, 7)).unwrap();
        let encoded = address.encode(Network::Testnet);
        assert!(encoded.starts_with("tnam1"));
        assert_eq!(
            Address::from_bech32m(&encoded, Network::Testnet).unwrap(),
            address
        );
        assert!(Address::from_bech32m(&encoded, Network::Mainnet).is_err());
    }

    #[test]
    fn address_discriminant_is_checked() {
        let data = address_bytes(9, 0);
        let mut ctx = ParserContext::new(&data);
        assert_eq!(
            Address::decode(&mut ctx).unwrap_err(),
            ParserError::UnexpectedValue {
                field: "Address::discriminant",
                value: 9
            }
        );
    }

    #[test]
    fn public_key_variants() {
        let mut data = vec![1u8];
        data.extend_from_slice(&[2u8; 33]);
        data.push(0);
        data.extend_from_slice(&[3u8; 32]);
        let mut ctx = ParserContext::new(&data);
        let secp = PublicKey::decode(&mut ctx).unwrap();
        let ed = PublicKey::decode(&mut ctx).unwrap();
        assert!(secp.is_secp256k1());
        assert!(!ed.is_secp256k1());
        assert_eq!(ed.to_wire_bytes().len(), 33);
        assert!(ed.encode(Network::Mainnet).starts_with("pknam1"));
    }

    #[test]
    fn negative_dec_is_rejected() {
        let mut data = [0u8; 32];
        data[31] = 0x80;
        let mut ctx = ParserContext::new(&data);
        assert_eq!(
            Dec::decode(&mut ctx).unwrap_err(),
            ParserError::ValueOutOfRange("Dec")
        );
    }

    #[test]
    fn amount_is_little_endian() {
        let mut data = [0u8; 33];
        data[0] = 0x10;
        data[1] = 0x27;
        data[32] = 6;
        let mut ctx = ParserContext::new(&data);
        let amount = DenominatedAmount::decode(&mut ctx).unwrap();
        assert_eq!(amount.amount.0, U256::from(10_000u64));
        assert_eq!(amount.denom, 6);
    }
}
