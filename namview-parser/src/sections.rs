//! Transaction sections.
//!
//! Sections are referenced by their commitment hash: the header names the memo section,
//! some payloads name code sections. Variable-length regions are kept as [`ByteRange`]s
//! into the transaction buffer.

use tracing::debug;

use crate::{
    assets::skip_asset_data,
    cursor::{ByteRange, ParserContext},
    error::ParserError,
    hash::{DomainHash, COMMITMENT_PERSONALIZATION},
    records::{advance_output_record, advance_spend_record},
    types::{read_hash, Hash},
};

/// Salt prefixed to data, extra data and code sections.
pub const SALT_LEN: usize = 8;

/// Wire tag of each section kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum SectionTag {
    /// Transaction payload.
    Data = 0,
    /// Auxiliary data referenced by hash.
    ExtraData = 1,
    /// Code to execute.
    Code = 2,
    /// Signature over other sections.
    Signature = 3,
    /// Serialized shielded transaction.
    MaspTx = 4,
    /// Metadata describing the shielded transaction.
    MaspBuilder = 5,
}

impl TryFrom<u8> for SectionTag {
    type Error = ParserError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(SectionTag::Data),
            1 => Ok(SectionTag::ExtraData),
            2 => Ok(SectionTag::Code),
            3 => Ok(SectionTag::Signature),
            4 => Ok(SectionTag::MaspTx),
            5 => Ok(SectionTag::MaspBuilder),
            other => Err(ParserError::UnexpectedValue {
                field: "Section::tag",
                value: u64::from(other),
            }),
        }
    }
}

/// Content commitment of a code or extra data section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commitment {
    /// Content stored elsewhere, referenced by hash.
    Hash(Hash),
    /// Content stored inline.
    Id(ByteRange),
}

impl Commitment {
    fn decode<H: DomainHash>(ctx: &mut ParserContext<'_>, hasher: &H) -> Result<(Self, Hash), ParserError> {
        match ctx.read_u8("Commitment::tag")? {
            0 => {
                let hash = read_hash(ctx, "Commitment::hash")?;
                Ok((Commitment::Hash(hash), hash))
            }
            1 => {
                let bytes = ctx.read_length_prefixed("Commitment::id")?;
                let hash = hasher.hash32(COMMITMENT_PERSONALIZATION, &[bytes])?;
                // The range excludes the varint length.
                let range = ByteRange::new(ctx.absolute_offset() - bytes.len(), bytes.len());
                Ok((Commitment::Id(range), hash))
            }
            tag => Err(ParserError::UnexpectedValue {
                field: "Commitment::tag",
                value: u64::from(tag),
            }),
        }
    }

    /// Wire discriminant: 0 for hash, 1 for inline bytes.
    pub fn discriminant(&self) -> u8 {
        match self {
            Commitment::Hash(_) => 0,
            Commitment::Id(_) => 1,
        }
    }

    /// Inline byte length, zero for hash commitments.
    pub fn inline_len(&self) -> usize {
        match self {
            Commitment::Hash(_) => 0,
            Commitment::Id(range) => range.len,
        }
    }
}

/// The single data section carrying the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataSection {
    /// Section salt.
    pub salt: [u8; SALT_LEN],
    /// Payload bytes.
    pub payload: ByteRange,
}

/// Code or extra data section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitmentSection {
    /// Section salt.
    pub salt: [u8; SALT_LEN],
    /// Content commitment.
    pub commitment: Commitment,
    /// Hash identifying the section content.
    pub commitment_hash: Hash,
    /// Optional name, e.g. the code file name.
    pub tag: Option<String>,
}

impl CommitmentSection {
    fn decode<H: DomainHash>(ctx: &mut ParserContext<'_>, hasher: &H) -> Result<Self, ParserError> {
        let salt = ctx.read_array("Section::salt")?;
        let (commitment, commitment_hash) = Commitment::decode(ctx, hasher)?;
        let tag = ctx.read_option("Section::tag", |c| c.read_string("Section::tag"))?;
        Ok(Self {
            salt,
            commitment,
            commitment_hash,
            tag,
        })
    }
}

/// Shielded transaction metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MaspBuilder {
    /// Hash of the shielded transaction this builder describes.
    pub target: Hash,
    /// Asset table bytes.
    pub asset_data: ByteRange,
    /// Number of asset table entries.
    pub n_asset_type: usize,
    /// Spend record bytes.
    pub spends: ByteRange,
    /// Number of spend records.
    pub n_spends: usize,
    /// Output record bytes.
    pub outputs: ByteRange,
    /// Number of output records.
    pub n_outputs: usize,
    /// Spends whose asset has no known symbol.
    pub no_symbol_spends: usize,
    /// Outputs whose asset has no known symbol.
    pub no_symbol_outputs: usize,
}

impl MaspBuilder {
    fn decode(ctx: &mut ParserContext<'_>) -> Result<Self, ParserError> {
        let target = read_hash(ctx, "MaspBuilder::target")?;

        let n_asset_type = ctx.read_count("MaspBuilder::n_asset_type")?;
        let start = ctx.absolute_offset();
        for _ in 0..n_asset_type {
            skip_asset_data(ctx)?;
        }
        let asset_data = ctx.range_since(start);

        let n_spends = ctx.read_count("MaspBuilder::n_spends")?;
        let start = ctx.absolute_offset();
        for _ in 0..n_spends {
            advance_spend_record(ctx)?;
        }
        let spends = ctx.range_since(start);

        let n_outputs = ctx.read_count("MaspBuilder::n_outputs")?;
        let start = ctx.absolute_offset();
        for _ in 0..n_outputs {
            advance_output_record(ctx)?;
        }
        let outputs = ctx.range_since(start);

        Ok(Self {
            target,
            asset_data,
            n_asset_type,
            spends,
            n_spends,
            outputs,
            n_outputs,
            no_symbol_spends: 0,
            no_symbol_outputs: 0,
        })
    }
}

/// All sections of a transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sections {
    /// Payload section.
    pub data: DataSection,
    /// Code section selecting the payload decoder.
    pub code: CommitmentSection,
    /// Extra data sections in wire order.
    pub extra_data: Vec<CommitmentSection>,
    /// Opaque signature sections.
    pub signatures: Vec<ByteRange>,
    /// Serialized shielded transaction.
    pub masp_tx: Option<ByteRange>,
    /// Shielded transaction metadata.
    pub masp_builder: Option<MaspBuilder>,
}

impl Sections {
    /// Reads a u32 section count followed by the sections.
    pub fn decode<H: DomainHash>(ctx: &mut ParserContext<'_>, hasher: &H) -> Result<Self, ParserError> {
        let count = ctx.read_count("Sections::count")?;
        let mut data = None;
        let mut code = None;
        let mut extra_data = Vec::new();
        let mut signatures = Vec::new();
        let mut masp_tx = None;
        let mut masp_builder = None;

        for index in 0..count {
            let tag = SectionTag::try_from(ctx.read_u8("Section::tag")?)?;
            debug!(index, ?tag, offset = ctx.absolute_offset(), "decoding section");
            match tag {
                SectionTag::Data => {
                    let salt = ctx.read_array("Data::salt")?;
                    let payload = read_range(ctx, "Data::payload")?;
                    set_once(&mut data, DataSection { salt, payload }, "Data")?;
                }
                SectionTag::ExtraData => extra_data.push(CommitmentSection::decode(ctx, hasher)?),
                SectionTag::Code => set_once(&mut code, CommitmentSection::decode(ctx, hasher)?, "Code")?,
                SectionTag::Signature => signatures.push(read_range(ctx, "Signature")?),
                SectionTag::MaspTx => set_once(&mut masp_tx, read_range(ctx, "MaspTx")?, "MaspTx")?,
                SectionTag::MaspBuilder => {
                    set_once(&mut masp_builder, MaspBuilder::decode(ctx)?, "MaspBuilder")?
                }
            }
        }

        Ok(Self {
            data: data.ok_or(ParserError::MissingField("Data"))?,
            code: code.ok_or(ParserError::MissingField("Code"))?,
            extra_data,
            signatures,
            masp_tx,
            masp_builder,
        })
    }

    /// Extra data section whose commitment hash is `hash`.
    pub fn find_extra_data(&self, hash: &Hash) -> Option<&CommitmentSection> {
        self.extra_data.iter().find(|s| &s.commitment_hash == hash)
    }
}

fn read_range(ctx: &mut ParserContext<'_>, field: &'static str) -> Result<ByteRange, ParserError> {
    let bytes = ctx.read_length_prefixed(field)?;
    Ok(ByteRange::new(ctx.absolute_offset() - bytes.len(), bytes.len()))
}

fn set_once<T>(slot: &mut Option<T>, value: T, field: &'static str) -> Result<(), ParserError> {
    if slot.is_some() {
        return Err(ParserError::DuplicatedField(field));
    }
    *slot = Some(value);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::ErrorKind, hash::Blake2bHasher};

    fn data_section(payload: &[u8]) -> Vec<u8> {
        let mut out = vec![0u8];
        out.extend_from_slice(&[1u8; SALT_LEN]);
        out.push(payload.len() as u8);
        out.extend_from_slice(payload);
        out
    }

    fn code_section(tag: &str) -> Vec<u8> {
        let mut out = vec![2u8];
        out.extend_from_slice(&[2u8; SALT_LEN]);
        out.push(0);
        out.extend_from_slice(&[0xcc; 32]);
        out.push(1);
        out.extend_from_slice(&(tag.len() as u32).to_le_bytes());
        out.extend_from_slice(tag.as_bytes());
        out
    }

    fn extra_inline(bytes: &[u8]) -> Vec<u8> {
        let mut out = vec![1u8];
        out.extend_from_slice(&[3u8; SALT_LEN]);
        out.push(1);
        out.push(bytes.len() as u8);
        out.extend_from_slice(bytes);
        out.push(0);
        out
    }

    fn with_count(count: u32, parts: &[Vec<u8>]) -> Vec<u8> {
        let mut out = count.to_le_bytes().to_vec();
        for part in parts {
            out.extend_from_slice(part);
        }
        out
    }

    #[test]
    fn decodes_data_code_and_extra_data() {
        let buf = with_count(
            3,
            &[data_section(b"abc"), code_section("tx_bond.wasm"), extra_inline(b"memo")],
        );
        let mut ctx = ParserContext::new(&buf);
        let sections = Sections::decode(&mut ctx, &Blake2bHasher).unwrap();
        ctx.expect_exhausted().unwrap();

        assert_eq!(sections.data.payload.slice(&buf).unwrap(), b"abc");
        assert_eq!(sections.code.tag.as_deref(), Some("tx_bond.wasm"));
        assert_eq!(sections.code.commitment, Commitment::Hash([0xcc; 32]));

        let memo_hash = Blake2bHasher.hash32(COMMITMENT_PERSONALIZATION, &[b"memo"]).unwrap();
        let memo = sections.find_extra_data(&memo_hash).unwrap();
        assert_eq!(memo.commitment.discriminant(), 1);
        assert_eq!(memo.commitment.inline_len(), 4);
        match memo.commitment {
            Commitment::Id(range) => assert_eq!(range.slice(&buf).unwrap(), b"memo"),
            Commitment::Hash(_) => panic!("expected inline commitment"),
        }
    }

    #[test]
    fn data_and_code_are_required_once() {
        let missing_code = with_count(1, &[data_section(b"")]);
        assert_eq!(
            Sections::decode(&mut ParserContext::new(&missing_code), &Blake2bHasher).unwrap_err(),
            ParserError::MissingField("Code")
        );

        let twice = with_count(
            3,
            &[data_section(b""), data_section(b""), code_section("x")],
        );
        assert_eq!(
            Sections::decode(&mut ParserContext::new(&twice), &Blake2bHasher).unwrap_err(),
            ParserError::DuplicatedField("Data")
        );
    }

    #[test]
    fn unknown_section_tag_is_rejected() {
        let buf = with_count(1, &[vec![9u8]]);
        assert_eq!(
            Sections::decode(&mut ParserContext::new(&buf), &Blake2bHasher).unwrap_err(),
            ParserError::UnexpectedValue {
                field: "Section::tag",
                value: 9
            }
        );
    }

    #[test]
    fn empty_masp_builder_decodes() {
        let mut body = vec![5u8];
        body.extend_from_slice(&[7u8; 32]);
        body.extend_from_slice(&[0u8; 12]);
        let buf = with_count(3, &[data_section(b""), code_section("x"), body]);
        let mut ctx = ParserContext::new(&buf);
        let sections = Sections::decode(&mut ctx, &Blake2bHasher).unwrap();
        let builder = sections.masp_builder.unwrap();
        assert_eq!(builder.target, [7u8; 32]);
        assert_eq!((builder.n_asset_type, builder.n_spends, builder.n_outputs), (0, 0, 0));
        assert!(builder.spends.is_empty());
    }

    #[test]
    fn truncated_section_reports_buffer_end() {
        let mut buf = with_count(2, &[data_section(b"abcdef"), code_section("x")]);
        buf.truncate(buf.len() - 3);
        let err = Sections::decode(&mut ParserContext::new(&buf), &Blake2bHasher).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BufferExhausted);
    }
}
