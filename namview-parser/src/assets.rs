//! MASP asset table decoding and identifier resolution.

use tracing::trace;

use crate::{
    cursor::ParserContext,
    error::ParserError,
    hash::{DomainHash, ASSET_PERSONALIZATION},
    records::ASSET_ID_LEN,
    sections::MaspBuilder,
    tokens::TokenRegistry,
    types::{Address, Decode, MAX_DENOM},
};

/// Highest valid [`AssetData::position`].
pub const MAX_ASSET_POSITION: u8 = 3;

/// One entry of the asset table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetData {
    /// Token the asset denotes.
    pub token: Address,
    /// Token denomination.
    pub denom: u8,
    /// Which 64 bit limb of the amount the asset carries.
    pub position: u8,
    /// Epoch the asset type is bound to.
    pub epoch: Option<u64>,
    /// Nonce fed to the identifier derivation.
    pub nonce: u8,
    /// Ticker of `token`, `None` when the token is unknown.
    pub symbol: Option<String>,
}

impl AssetData {
    /// Decodes one entry and returns it with its identifier.
    ///
    /// The identifier covers the entry bytes up to the nonce, then the nonce.
    pub fn decode_with_id<H: DomainHash>(
        ctx: &mut ParserContext<'_>,
        hasher: &H,
        registry: &TokenRegistry,
    ) -> Result<(Self, [u8; ASSET_ID_LEN]), ParserError> {
        let (entry, preimage) = read_entry(ctx)?;
        let identifier = derive_identifier(hasher, preimage, entry.nonce)?;
        let symbol = registry.symbol(&entry.token).map(str::to_owned);
        Ok((AssetData { symbol, ..entry }, identifier))
    }
}

/// Reads one entry without resolving it; returns it with the bytes preceding the nonce.
fn read_entry<'a>(ctx: &mut ParserContext<'a>) -> Result<(AssetData, &'a [u8]), ParserError> {
    let mut replay = ctx.clone();
    let start = ctx.offset();
    let token = Address::decode(ctx)?;
    let denom = ctx.read_u8("AssetData::denom")?;
    if denom > MAX_DENOM {
        return Err(ParserError::ValueOutOfRange("AssetData::denom"));
    }
    let position = ctx.read_u8("AssetData::position")?;
    if position > MAX_ASSET_POSITION {
        return Err(ParserError::ValueOutOfRange("AssetData::position"));
    }
    let epoch = ctx.read_option("AssetData::epoch", |c| c.read_u64("AssetData::epoch"))?;
    let preimage = replay.read_bytes(ctx.offset() - start, "AssetData")?;
    let nonce = ctx.read_u8("AssetData::nonce")?;
    Ok((
        AssetData {
            token,
            denom,
            position,
            epoch,
            nonce,
            symbol: None,
        },
        preimage,
    ))
}

/// Skips one entry, validating its fields.
pub fn skip_asset_data(ctx: &mut ParserContext<'_>) -> Result<(), ParserError> {
    read_entry(ctx).map(|_| ())
}

/// Derives the asset identifier of an entry.
pub fn derive_identifier<H: DomainHash>(
    hasher: &H,
    preimage: &[u8],
    nonce: u8,
) -> Result<[u8; ASSET_ID_LEN], ParserError> {
    hasher.hash32(ASSET_PERSONALIZATION, &[preimage, &[nonce]])
}

/// Finds the first asset table entry whose identifier equals `target`.
///
/// Entries after the match are neither decoded nor hashed. `Ok(None)` means no entry
/// matched.
pub fn find_asset_data<H: DomainHash>(
    hasher: &H,
    builder: &MaspBuilder,
    buffer: &[u8],
    registry: &TokenRegistry,
    target: &[u8],
) -> Result<Option<AssetData>, ParserError> {
    let mut ctx = ParserContext::for_range(buffer, builder.asset_data)?;
    for index in 0..builder.n_asset_type {
        let (entry, identifier) = AssetData::decode_with_id(&mut ctx, hasher, registry)?;
        if identifier.as_slice() == target {
            trace!(index, "asset type resolved");
            return Ok(Some(entry));
        }
    }
    Ok(None)
}
