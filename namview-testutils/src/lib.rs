//! Namview testing utilities.
//!
//! Writers for the transaction wire format, a [`TxBuilder`], common fixtures and one
//! builder per transaction kind.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod builder;
pub mod encoding;
pub mod fixtures;
pub mod kinds;

pub use builder::{
    bond_payload, commitment_hash, AccountLeg, AssetEntry, MaspBundle, Memo, OutputEntry,
    RawAddress, RawHash, SpendEntry, TxBuilder,
};
