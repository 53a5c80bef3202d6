//! Namada transaction decoder.
//!
//! Decodes an untrusted transaction buffer into a [`Transaction`]:
//! - [`cursor`]: bounds-checked field readers.
//! - [`records`]: forward-only scanning of MASP spend and output records.
//! - [`assets`]: MASP asset table resolution.
//! - [`sections`], [`payload`], [`transaction`]: the transaction structure itself.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod assets;
pub mod cursor;
pub mod error;
pub mod hash;
pub mod payload;
pub mod records;
pub mod sections;
pub mod tokens;
pub mod transaction;
pub mod types;

pub use assets::{find_asset_data, AssetData};
pub use cursor::{ByteRange, ParserContext};
pub use error::{ErrorKind, ParserError};
pub use hash::{Blake2bHasher, DomainHash};
pub use payload::TxKind;
pub use records::{OutputRecord, OutputRecords, SpendRecord, SpendRecords};
pub use sections::{Commitment, MaspBuilder, Sections};
pub use tokens::TokenRegistry;
pub use transaction::{parse_transaction, Header, Transaction};
