//! Top level transaction decoding.

use primitive_types::U256;
use tracing::{debug, info};

use crate::{
    assets::find_asset_data,
    cursor::ParserContext,
    error::ParserError,
    hash::{DomainHash, MASP_TX_PERSONALIZATION},
    payload::{Account, ProposalType, TxKind},
    records::{OutputRecords, SpendRecords},
    sections::{CommitmentSection, MaspBuilder, Sections},
    tokens::TokenRegistry,
    types::{read_hash, Address, Decode, DenominatedAmount, Hash, PublicKey, MAX_TIMESTAMP_SECS},
};

/// Fee paid for the transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fee {
    /// Amount charged per gas unit.
    pub amount_per_gas_unit: DenominatedAmount,
    /// Token the fee is paid in.
    pub token: Address,
    /// Ticker of `token`; `None` when the token is unknown.
    pub symbol: Option<String>,
}

/// Transaction header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    /// Chain the transaction is bound to.
    pub chain_id: String,
    /// Expiration as unix seconds.
    pub expiration: Option<u64>,
    /// Creation time as unix seconds.
    pub timestamp: u64,
    /// Commitment hash of the memo extra data section.
    pub memo_hash: Option<Hash>,
    /// Fee.
    pub fee: Fee,
    /// Key paying the fee.
    pub fee_payer: PublicKey,
    /// Gas limit.
    pub gas_limit: u64,
}

impl Decode for Header {
    fn decode(ctx: &mut ParserContext<'_>) -> Result<Self, ParserError> {
        Ok(Self {
            chain_id: ctx.read_string("Header::chain_id")?,
            expiration: ctx.read_option("Header::expiration", |c| c.read_u64("Header::expiration"))?,
            timestamp: ctx.read_u64("Header::timestamp")?,
            memo_hash: ctx.read_option("Header::memo_hash", |c| read_hash(c, "Header::memo_hash"))?,
            fee: Fee {
                amount_per_gas_unit: DenominatedAmount::decode(ctx)?,
                token: Address::decode(ctx)?,
                symbol: None,
            },
            fee_payer: PublicKey::decode(ctx)?,
            gas_limit: ctx.read_u64("Header::gas_limit")?,
        })
    }
}

/// Fully decoded transaction.
///
/// Byte ranges inside refer to the buffer the transaction was decoded from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    /// Header.
    pub header: Header,
    /// Sections.
    pub sections: Sections,
    /// Decoded payload.
    pub kind: TxKind,
}

impl Transaction {
    /// Returns `true` when the payload has a shielded part.
    pub fn is_masp(&self) -> bool {
        self.kind.is_masp()
    }

    /// Shielded metadata, for MASP transactions.
    pub fn masp_builder(&self) -> Option<&MaspBuilder> {
        self.sections.masp_builder.as_ref()
    }

    /// Extra data section the header memo hash points at.
    pub fn memo_section(&self) -> Option<&CommitmentSection> {
        self.header
            .memo_hash
            .as_ref()
            .and_then(|hash| self.sections.find_extra_data(hash))
    }

    /// Returns `true` when the memo is shown.
    ///
    /// Inline memos are shown only when non-empty; hash commitments are always shown.
    pub fn has_memo_to_print(&self) -> bool {
        match self.memo_section() {
            Some(section) => {
                (section.commitment.discriminant() != 0 && section.commitment.inline_len() != 0)
                    || section.commitment.discriminant() == 0
            }
            None => false,
        }
    }
}

/// Decodes and validates a complete transaction.
///
/// The whole buffer must be consumed. Symbols are resolved through `registry` once the
/// structure is validated.
pub fn parse_transaction<H: DomainHash>(
    buffer: &[u8],
    hasher: &H,
    registry: &TokenRegistry,
) -> Result<Transaction, ParserError> {
    if buffer.is_empty() {
        return Err(ParserError::NoData);
    }
    let mut ctx = ParserContext::new(buffer);

    let header = Header::decode(&mut ctx)?;
    debug!(chain_id = %header.chain_id, offset = ctx.offset(), "decoded header");

    let sections = Sections::decode(&mut ctx, hasher)?;
    debug!(
        extra_data = sections.extra_data.len(),
        signatures = sections.signatures.len(),
        masp = sections.masp_builder.is_some(),
        "decoded sections"
    );

    let mut payload_ctx = ParserContext::for_range(buffer, sections.data.payload)?;
    let kind = TxKind::decode(sections.code.tag.as_deref(), &mut payload_ctx)?;
    debug!(kind = kind.name(), "decoded payload");

    let mut tx = Transaction {
        header,
        sections,
        kind,
    };

    validate_transaction_params(&tx)?;
    verify_shielded_hash(&tx, buffer, hasher)?;
    ctx.expect_exhausted()?;

    resolve_symbols(&mut tx, buffer, hasher, registry)?;
    info!(kind = tx.kind.name(), masp = tx.is_masp(), len = buffer.len(), "transaction parsed");
    Ok(tx)
}

/// Cross-field checks that need the whole transaction.
pub fn validate_transaction_params(tx: &Transaction) -> Result<(), ParserError> {
    let sections = &tx.sections;
    let resolves = |hash: &Hash| sections.find_extra_data(hash).is_some();

    if let Some(memo_hash) = &tx.header.memo_hash {
        if !resolves(memo_hash) {
            return Err(ParserError::MissingField("Header::memo"));
        }
    }
    if tx.header.gas_limit == 0 {
        return Err(ParserError::ValueOutOfRange("Header::gas_limit"));
    }
    if tx.header.timestamp > MAX_TIMESTAMP_SECS {
        return Err(ParserError::ValueOutOfRange("Header::timestamp"));
    }
    if tx.header.expiration.is_some_and(|secs| secs > MAX_TIMESTAMP_SECS) {
        return Err(ParserError::ValueOutOfRange("Header::expiration"));
    }
    // The displayed fee is the product, so it has to fit.
    tx.header
        .fee
        .amount_per_gas_unit
        .amount
        .0
        .checked_mul(U256::from(tx.header.gas_limit))
        .ok_or(ParserError::DecimalTooBig)?;

    match &tx.kind {
        TxKind::InitAccount(init) => {
            check_threshold(init.threshold, init.public_keys.len(), "InitAccount::threshold")?;
            if !resolves(&init.vp_code_hash) {
                return Err(ParserError::MissingField("InitAccount::vp_code"));
            }
        }
        TxKind::UpdateVp(update) => {
            if let (Some(threshold), false) = (update.threshold, update.public_keys.is_empty()) {
                check_threshold(threshold, update.public_keys.len(), "UpdateVp::threshold")?;
            }
            if let Some(hash) = &update.vp_code_hash {
                if !resolves(hash) {
                    return Err(ParserError::MissingField("UpdateVp::vp_code"));
                }
            }
        }
        TxKind::InitProposal(proposal) => {
            if let ProposalType::DefaultWithWasm(hash) = &proposal.proposal_type {
                if !resolves(hash) {
                    return Err(ParserError::MissingField("InitProposal::wasm_code"));
                }
            }
        }
        TxKind::BecomeValidator(validator) => {
            for (key, field) in [
                (&validator.eth_cold_key, "BecomeValidator::eth_cold_key"),
                (&validator.eth_hot_key, "BecomeValidator::eth_hot_key"),
            ] {
                if !key.is_secp256k1() {
                    return Err(ParserError::UnexpectedValue { field, value: 0 });
                }
            }
        }
        TxKind::Transfer(transfer) => {
            if transfer.sources.is_empty() && transfer.targets.is_empty() && !transfer.is_masp() {
                return Err(ParserError::MissingField("Transfer"));
            }
        }
        _ => {}
    }
    Ok(())
}

fn check_threshold(threshold: u8, keys: usize, field: &'static str) -> Result<(), ParserError> {
    if threshold == 0 || usize::from(threshold) > keys {
        return Err(ParserError::ValueOutOfRange(field));
    }
    Ok(())
}

/// Binds the shielded sections to the hash embedded in the payload.
///
/// Shielded sections in a transaction without a shielded part are rejected.
pub fn verify_shielded_hash<H: DomainHash>(
    tx: &Transaction,
    buffer: &[u8],
    hasher: &H,
) -> Result<(), ParserError> {
    let Some(expected) = tx.kind.shielded_section_hash() else {
        if tx.sections.masp_tx.is_some() {
            return Err(ParserError::UnexpectedField("MaspTx"));
        }
        if tx.sections.masp_builder.is_some() {
            return Err(ParserError::UnexpectedField("MaspBuilder"));
        }
        return Ok(());
    };

    let masp_tx = tx.sections.masp_tx.ok_or(ParserError::MissingField("MaspTx"))?;
    let builder = tx
        .sections
        .masp_builder
        .as_ref()
        .ok_or(ParserError::MissingField("MaspBuilder"))?;

    let digest = hasher.hash32(MASP_TX_PERSONALIZATION, &[masp_tx.slice(buffer)?])?;
    if &digest != expected || &builder.target != expected {
        return Err(ParserError::InvalidMaspCommitment);
    }
    Ok(())
}

/// Fills in ticker symbols and the unresolved-symbol counters.
fn resolve_symbols<H: DomainHash>(
    tx: &mut Transaction,
    buffer: &[u8],
    hasher: &H,
    registry: &TokenRegistry,
) -> Result<(), ParserError> {
    let fee = &mut tx.header.fee;
    fee.symbol = registry.symbol(&fee.token).map(str::to_owned);

    if let Some(transfer) = tx.kind.transfer_mut() {
        let resolve = |accounts: &mut [Account]| {
            accounts
                .iter_mut()
                .map(|account| {
                    account.symbol = registry.symbol(&account.token).map(str::to_owned);
                    usize::from(account.symbol.is_none())
                })
                .sum::<usize>()
        };
        transfer.no_symbol_sources = resolve(&mut transfer.sources[..]);
        transfer.no_symbol_targets = resolve(&mut transfer.targets[..]);
    }

    if !tx.is_masp() {
        return Ok(());
    }
    let Some(builder) = tx.sections.masp_builder.as_mut() else {
        return Ok(());
    };

    let mut no_symbol_spends = 0;
    for spend in SpendRecords::new(buffer, builder.spends, builder.n_spends)? {
        let spend = spend?;
        if !has_symbol(hasher, builder, buffer, registry, spend.asset_type())? {
            no_symbol_spends += 1;
        }
    }
    let mut no_symbol_outputs = 0;
    for output in OutputRecords::new(buffer, builder.outputs, builder.n_outputs)? {
        let output = output?;
        if !has_symbol(hasher, builder, buffer, registry, output.asset_type())? {
            no_symbol_outputs += 1;
        }
    }
    builder.no_symbol_spends = no_symbol_spends;
    builder.no_symbol_outputs = no_symbol_outputs;
    debug!(no_symbol_spends, no_symbol_outputs, "resolved MASP asset symbols");
    Ok(())
}

fn has_symbol<H: DomainHash>(
    hasher: &H,
    builder: &MaspBuilder,
    buffer: &[u8],
    registry: &TokenRegistry,
    asset_type: &[u8],
) -> Result<bool, ParserError> {
    Ok(find_asset_data(hasher, builder, buffer, registry, asset_type)?
        .is_some_and(|asset| asset.symbol.is_some()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        hash::{Blake2bHasher, COMMITMENT_PERSONALIZATION},
        sections::SALT_LEN,
        types::ADDRESS_LEN,
    };
    use namview_common::Network;

    fn push_string(out: &mut Vec<u8>, s: &str) {
        out.extend_from_slice(&(s.len() as u32).to_le_bytes());
        out.extend_from_slice(s.as_bytes());
    }

    fn address(fill: u8) -> Vec<u8> {
        let mut out = vec![0u8];
        out.extend_from_slice(&[fill; ADDRESS_LEN - 1]);
        out
    }

    /// Builds a minimal transaction with the given code tag, payload and memo.
    fn create_minimal_transaction(code_tag: &str, payload: &[u8], memo: Option<&[u8]>, gas_limit: u64) -> Vec<u8> {
        let mut out = Vec::new();
        push_string(&mut out, "namada-test.0");
        out.push(0);
        out.extend_from_slice(&1_700_000_000u64.to_le_bytes());
        match memo {
            Some(m) => {
                out.push(1);
                out.extend_from_slice(&Blake2bHasher.hash32(COMMITMENT_PERSONALIZATION, &[m]).unwrap());
            }
            None => out.push(0),
        }
        let mut fee = 10u64.to_le_bytes().to_vec();
        fee.resize(32, 0);
        out.extend_from_slice(&fee);
        out.push(6);
        out.extend(address(0xaa));
        out.push(0);
        out.extend_from_slice(&[4u8; 32]);
        out.extend_from_slice(&gas_limit.to_le_bytes());

        let sections = if memo.is_some() { 3u32 } else { 2 };
        out.extend_from_slice(&sections.to_le_bytes());
        out.push(0);
        out.extend_from_slice(&[0u8; SALT_LEN]);
        out.push(payload.len() as u8);
        out.extend_from_slice(payload);
        out.push(2);
        out.extend_from_slice(&[0u8; SALT_LEN]);
        out.push(0);
        out.extend_from_slice(&[0xcc; 32]);
        out.push(1);
        push_string(&mut out, code_tag);
        if let Some(m) = memo {
            out.push(1);
            out.extend_from_slice(&[0u8; SALT_LEN]);
            out.push(1);
            out.push(m.len() as u8);
            out.extend_from_slice(m);
            out.push(0);
        }
        out
    }

    fn bond_payload() -> Vec<u8> {
        let mut payload = address(1);
        let mut amount = 1_000_000u64.to_le_bytes().to_vec();
        amount.resize(32, 0);
        payload.extend(amount);
        payload.push(0);
        payload
    }

    #[test]
    fn parses_bond_with_memo() {
        let buf = create_minimal_transaction("tx_bond.wasm", &bond_payload(), Some(b"hello"), 5);
        let tx = parse_transaction(&buf, &Blake2bHasher, &TokenRegistry::empty(Network::Testnet)).unwrap();
        assert!(matches!(tx.kind, TxKind::Bond(_)));
        assert_eq!(tx.header.chain_id, "namada-test.0");
        assert!(tx.has_memo_to_print());
        assert!(tx.header.fee.symbol.is_none());
    }

    #[test]
    fn empty_inline_memo_is_not_printed() {
        let buf = create_minimal_transaction("tx_bond.wasm", &bond_payload(), Some(b""), 5);
        let tx = parse_transaction(&buf, &Blake2bHasher, &TokenRegistry::empty(Network::Testnet)).unwrap();
        assert!(tx.memo_section().is_some());
        assert!(!tx.has_memo_to_print());
    }

    #[test]
    fn fee_symbol_is_resolved() {
        let buf = create_minimal_transaction("tx_bond.wasm", &bond_payload(), None, 5);
        let mut registry = TokenRegistry::empty(Network::Testnet);
        let token: [u8; ADDRESS_LEN] = address(0xaa).try_into().unwrap();
        registry.insert(Address::from_bytes(token).unwrap(), "NAM");
        let tx = parse_transaction(&buf, &Blake2bHasher, &registry).unwrap();
        assert_eq!(tx.header.fee.symbol.as_deref(), Some("NAM"));
    }

    #[test]
    fn trailing_bytes_are_rejected() {
        let mut buf = create_minimal_transaction("tx_bond.wasm", &bond_payload(), None, 5);
        buf.push(0);
        assert_eq!(
            parse_transaction(&buf, &Blake2bHasher, &TokenRegistry::default()).unwrap_err(),
            ParserError::UnexpectedUnparsedBytes(1)
        );
    }

    #[test]
    fn zero_gas_limit_is_rejected() {
        let buf = create_minimal_transaction("tx_bond.wasm", &bond_payload(), None, 0);
        assert_eq!(
            parse_transaction(&buf, &Blake2bHasher, &TokenRegistry::default()).unwrap_err(),
            ParserError::ValueOutOfRange("Header::gas_limit")
        );
    }

    /// Offset of the timestamp in a memo-less minimal transaction.
    const TIMESTAMP_AT: usize = 4 + 13 + 1;
    /// Offset of the per gas fee amount in a memo-less minimal transaction.
    const FEE_AT: usize = TIMESTAMP_AT + 8 + 1;

    #[test]
    fn timestamp_past_year_9999_is_rejected() {
        let mut buf = create_minimal_transaction("tx_bond.wasm", &bond_payload(), None, 5);
        buf[TIMESTAMP_AT..TIMESTAMP_AT + 8].copy_from_slice(&(MAX_TIMESTAMP_SECS + 1).to_le_bytes());
        assert_eq!(
            parse_transaction(&buf, &Blake2bHasher, &TokenRegistry::default()).unwrap_err(),
            ParserError::ValueOutOfRange("Header::timestamp")
        );

        buf[TIMESTAMP_AT..TIMESTAMP_AT + 8].copy_from_slice(&MAX_TIMESTAMP_SECS.to_le_bytes());
        assert!(parse_transaction(&buf, &Blake2bHasher, &TokenRegistry::default()).is_ok());
    }

    #[test]
    fn fee_product_overflow_is_rejected() {
        let mut buf = create_minimal_transaction("tx_bond.wasm", &bond_payload(), None, 2);
        buf[FEE_AT..FEE_AT + 32].copy_from_slice(&[0u8; 32]);
        buf[FEE_AT + 31] = 0x80;
        assert_eq!(
            parse_transaction(&buf, &Blake2bHasher, &TokenRegistry::default()).unwrap_err(),
            ParserError::DecimalTooBig
        );
    }

    #[test]
    fn init_account_threshold_is_bounded() {
        let mut payload = 1u32.to_le_bytes().to_vec();
        payload.push(0);
        payload.extend_from_slice(&[1u8; 32]);
        payload.extend_from_slice(&[0xcc; 32]);
        payload.push(2);
        let buf = create_minimal_transaction("tx_init_account.wasm", &payload, None, 5);
        assert_eq!(
            parse_transaction(&buf, &Blake2bHasher, &TokenRegistry::default()).unwrap_err(),
            ParserError::ValueOutOfRange("InitAccount::threshold")
        );
    }

    #[test]
    fn empty_transfer_is_rejected() {
        let mut payload = 0u32.to_le_bytes().to_vec();
        payload.extend_from_slice(&0u32.to_le_bytes());
        payload.push(0);
        let buf = create_minimal_transaction("tx_transfer.wasm", &payload, None, 5);
        assert_eq!(
            parse_transaction(&buf, &Blake2bHasher, &TokenRegistry::default()).unwrap_err(),
            ParserError::MissingField("Transfer")
        );
    }

    #[test]
    fn shielded_transfer_without_sections_is_rejected() {
        let mut payload = 0u32.to_le_bytes().to_vec();
        payload.extend_from_slice(&0u32.to_le_bytes());
        payload.push(1);
        payload.extend_from_slice(&[3u8; 32]);
        let buf = create_minimal_transaction("tx_transfer.wasm", &payload, None, 5);
        assert_eq!(
            parse_transaction(&buf, &Blake2bHasher, &TokenRegistry::default()).unwrap_err(),
            ParserError::MissingField("MaspTx")
        );
    }

    #[test]
    fn empty_buffer_is_no_data() {
        assert_eq!(
            parse_transaction(&[], &Blake2bHasher, &TokenRegistry::default()).unwrap_err(),
            ParserError::NoData
        );
    }
}
