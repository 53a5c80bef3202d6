//! Ready-made registries, addresses and transactions.

use namview_common::NATIVE_TOKEN_ADDRESS_HEX;
use namview_parser::TokenRegistry;

use crate::builder::{AssetEntry, MaspBundle, OutputEntry, RawAddress, SpendEntry, TxBuilder};

/// Registry holding the default token list on testnet.
pub fn registry() -> TokenRegistry {
    TokenRegistry::default()
}

/// Native token address bytes.
pub fn native_token() -> RawAddress {
    let mut out = [0u8; 21];
    hex::decode_to_slice(NATIVE_TOKEN_ADDRESS_HEX, &mut out).expect("native token hex is valid");
    out
}

/// Established address filled with `fill`.
pub fn address(fill: u8) -> RawAddress {
    let mut out = [fill; 21];
    out[0] = 0;
    out
}

/// Bond of 1 NAM to `address(1)`, optionally from `address(2)`.
pub fn bond(with_source: bool) -> TxBuilder {
    TxBuilder::bond(address(1), 1_000_000, with_source.then(|| address(2)))
}

/// Shielded transfer with one spend and one output of the native token, plus one spend
/// of an asset missing from the table.
pub fn masp_transfer() -> TxBuilder {
    let nam = AssetEntry::new(native_token());
    let unknown = AssetEntry::new(address(0x55)).nonce(1);
    let bundle = MaspBundle::default()
        .asset(nam.clone())
        .spend(SpendEntry::new(nam.identifier(), 2_000_000))
        .spend(SpendEntry::new(unknown.identifier(), 9))
        .output(OutputEntry::new(nam.identifier(), 1_500_000));
    TxBuilder::transfer().masp(bundle)
}

/// Vote `vote` (0 yay, 1 nay, 2 abstain) on proposal `id`.
pub fn vote(id: u64, vote: u8) -> TxBuilder {
    let mut payload = id.to_le_bytes().to_vec();
    payload.push(vote);
    payload.extend_from_slice(&address(3));
    TxBuilder::new("tx_vote_proposal.wasm", payload)
}
