//! Display item count and lookup.

use namview_common::DisplayMode;
use namview_parser::{
    find_asset_data,
    records::{OutputRecord, SpendRecord},
    types::encode_bech32m,
    DomainHash, OutputRecords, ParserError, SpendRecords, TokenRegistry, Transaction,
};

use crate::{
    format::{
        format_amount, format_masp_amount, format_timestamp, format_timestamp_nanos,
        format_token_amount, paginate, total_fee, with_symbol,
    },
    layout::{memo_bytes, Layout, Slot, Value},
    params::base_item_count,
};

/// Everything needed to render items besides the transaction.
#[derive(Debug, Clone, Copy)]
pub struct ItemContext<'a, H> {
    /// Buffer the transaction was decoded from.
    pub buffer: &'a [u8],
    /// Hash primitive used to resolve MASP assets.
    pub hasher: &'a H,
    /// Known tokens; must be the registry the transaction was decoded with.
    pub registry: &'a TokenRegistry,
    /// Display mode.
    pub mode: DisplayMode,
    /// Characters per page.
    pub value_width: usize,
}

/// One page of one display item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayItem {
    /// Item label.
    pub key: String,
    /// Requested page of the value.
    pub value: String,
    /// Pages the full value spans.
    pub page_count: usize,
}

/// Number of items `tx` shows.
pub fn count_items<H: DomainHash>(tx: &Transaction, ctx: &ItemContext<'_, H>) -> Result<usize, ParserError> {
    let count = Layout::build(tx, ctx.mode).item_count();
    debug_assert!(count >= base_item_count(&tx.kind, ctx.mode));
    check_item_count(count)
}

/// Rejects a transaction that shows nothing.
pub fn check_item_count(count: usize) -> Result<usize, ParserError> {
    match count {
        0 => Err(ParserError::UnexpectedNumberOfItems),
        n => Ok(n),
    }
}

/// Page `page_idx` of item `display_idx`.
pub fn get_item<H: DomainHash>(
    tx: &Transaction,
    ctx: &ItemContext<'_, H>,
    display_idx: usize,
    page_idx: usize,
) -> Result<DisplayItem, ParserError> {
    let layout = Layout::build(tx, ctx.mode);
    let count = check_item_count(layout.item_count())?;
    let (slot, sub_index) = layout
        .locate(display_idx)
        .ok_or(ParserError::DisplayIdxOutOfRange {
            index: display_idx,
            count,
        })?;
    let (key, value) = render_slot(tx, ctx, slot, sub_index)?;
    let (value, page_count) = paginate(&value, ctx.value_width, page_idx)?;
    Ok(DisplayItem {
        key: key.to_string(),
        value,
        page_count,
    })
}

fn render_slot<H: DomainHash>(
    tx: &Transaction,
    ctx: &ItemContext<'_, H>,
    slot: &Slot<'_>,
    sub_index: usize,
) -> Result<(&'static str, String), ParserError> {
    let network = ctx.registry.network();
    match slot {
        Slot::Single { key, value } => Ok((*key, render_value(value, ctx)?)),
        Slot::Accounts { leg, accounts, .. } => {
            let (owner_key, token_key, amount_key) = leg.keys();
            let mut rest = sub_index;
            for account in accounts.iter() {
                let symbol = account.symbol.as_deref();
                let items = if symbol.is_some() { 2 } else { 3 };
                if rest >= items {
                    rest -= items;
                    continue;
                }
                return match (rest, symbol) {
                    (0, _) => Ok((owner_key, account.owner.encode(network))),
                    (1, None) => Ok((token_key, account.token.encode(network))),
                    _ => Ok((amount_key, format_token_amount(&account.amount, symbol)?)),
                };
            }
            Err(ParserError::UnexpectedNumberOfItems)
        }
        Slot::Spends(builder) => {
            let records = SpendRecords::new(ctx.buffer, builder.spends, builder.n_spends)?;
            let mut rest = sub_index;
            for record in records {
                let record = record?;
                let shielded = resolve(ctx, tx, record.asset_type())?;
                if rest >= shielded.items() {
                    rest -= shielded.items();
                    continue;
                }
                return shielded.render(rest, ShieldedRecord::Spend(record), network);
            }
            Err(ParserError::UnexpectedNumberOfItems)
        }
        Slot::Outputs(builder) => {
            let records = OutputRecords::new(ctx.buffer, builder.outputs, builder.n_outputs)?;
            let mut rest = sub_index;
            for record in records {
                let record = record?;
                let shielded = resolve(ctx, tx, record.asset_type())?;
                if rest >= shielded.items() {
                    rest -= shielded.items();
                    continue;
                }
                return shielded.render(rest, ShieldedRecord::Output(record), network);
            }
            Err(ParserError::UnexpectedNumberOfItems)
        }
    }
}

enum ShieldedRecord<'a> {
    Spend(SpendRecord<'a>),
    Output(OutputRecord<'a>),
}

/// Asset resolution of one MASP record.
struct Shielded<'a> {
    asset_type: &'a [u8],
    resolved: Option<(String, u8, u8)>,
}

impl Shielded<'_> {
    fn items(&self) -> usize {
        if self.resolved.is_some() {
            2
        } else {
            3
        }
    }

    fn render(
        &self,
        index: usize,
        record: ShieldedRecord<'_>,
        network: namview_common::Network,
    ) -> Result<(&'static str, String), ParserError> {
        let (owner_key, token_key, amount_key, owner, value) = match &record {
            ShieldedRecord::Spend(spend) => (
                "Sender",
                "Sending Token",
                "Sending Amount",
                encode_bech32m(network.viewing_key_hrp(), spend.extended_fvk()),
                spend.value(),
            ),
            ShieldedRecord::Output(output) => (
                "Destination",
                "Receiving Token",
                "Receiving Amount",
                encode_bech32m(network.payment_address_hrp(), output.payment_address()),
                output.value(),
            ),
        };
        match (index, &self.resolved) {
            (0, _) => Ok((owner_key, owner)),
            (1, None) => Ok((token_key, hex::encode(self.asset_type))),
            (_, Some((symbol, position, denom))) => Ok((
                amount_key,
                with_symbol(Some(symbol.as_str()), format_masp_amount(value, *position, *denom)?),
            )),
            (_, None) => Ok((amount_key, value.to_string())),
        }
    }
}

fn resolve<'a, H: DomainHash>(
    ctx: &ItemContext<'_, H>,
    tx: &Transaction,
    asset_type: &'a [u8],
) -> Result<Shielded<'a>, ParserError> {
    let builder = tx
        .masp_builder()
        .ok_or(ParserError::MissingField("MaspBuilder"))?;
    let resolved = find_asset_data(ctx.hasher, builder, ctx.buffer, ctx.registry, asset_type)?
        .and_then(|asset| asset.symbol.map(|symbol| (symbol, asset.position, asset.denom)));
    Ok(Shielded {
        asset_type,
        resolved,
    })
}

fn render_value<H>(value: &Value<'_>, ctx: &ItemContext<'_, H>) -> Result<String, ParserError> {
    let network = ctx.registry.network();
    Ok(match value {
        Value::Text(text) => text.to_string(),
        Value::Static(text) => text.to_string(),
        Value::Address(address) => address.encode(network),
        Value::PublicKey(key) => key.encode(network),
        Value::Hex(bytes) => hex::encode(bytes),
        Value::EthAddress(bytes) => format!("0x{}", hex::encode(bytes)),
        Value::Amount(amount, symbol) => format_token_amount(amount, *symbol)?,
        Value::Dec(dec) => {
            let dec = dec.as_denominated();
            format_amount(dec.amount.0, dec.denom)?
        }
        Value::Number(n) => n.to_string(),
        Value::Timestamp(secs) => format_timestamp(*secs)?,
        Value::TimestampNanos(nanos) => format_timestamp_nanos(*nanos)?,
        Value::Expiration(None) => "No expiration".to_string(),
        Value::Expiration(Some(secs)) => format_timestamp(*secs)?,
        Value::Memo(memo) => {
            let bytes = memo_bytes(memo, ctx.buffer).ok_or(ParserError::MissingField("Memo"))?;
            match (memo.commitment.discriminant(), std::str::from_utf8(bytes)) {
                (1, Ok(text)) => text.to_string(),
                _ => hex::encode(bytes),
            }
        }
        Value::Fee(per_gas, gas_limit, symbol) => {
            format_token_amount(&total_fee(per_gas, *gas_limit)?, *symbol)?
        }
    })
}
