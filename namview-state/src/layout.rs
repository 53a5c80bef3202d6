//! Ordered display slots of a transaction.
//!
//! Counting and lookup both walk the same [`Layout`], so the item at index `i` is
//! always within the count.

use namview_common::{DisplayMode, NATIVE_TOKEN_SYMBOL};
use namview_parser::{
    payload::{Account, BridgeTokenKind, PgfTarget, ProposalType, Transfer, TxKind},
    sections::{Commitment, CommitmentSection, MaspBuilder},
    types::{Address, Amount, Dec, DenominatedAmount, Hash, PublicKey},
    Transaction,
};

/// Deferred rendering of one display value.
#[derive(Debug, Clone)]
pub enum Value<'t> {
    /// Borrowed text.
    Text(&'t str),
    /// Static text.
    Static(&'static str),
    /// Account address.
    Address(&'t Address),
    /// Public key.
    PublicKey(&'t PublicKey),
    /// Hash or other raw bytes shown as hex.
    Hex(&'t [u8]),
    /// Ethereum address.
    EthAddress(&'t [u8]),
    /// Amount with optional ticker.
    Amount(DenominatedAmount, Option<&'t str>),
    /// Fixed point decimal.
    Dec(&'t Dec),
    /// Plain integer.
    Number(u64),
    /// Unix seconds.
    Timestamp(u64),
    /// Unix nanoseconds.
    TimestampNanos(u64),
    /// Optional expiration in unix seconds.
    Expiration(Option<u64>),
    /// Memo extra data section.
    Memo(&'t CommitmentSection),
    /// Total fee with optional ticker.
    Fee(&'t DenominatedAmount, u64, Option<&'t str>),
}

/// Which transparent leg an [`Slot::Accounts`] slot shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Leg {
    /// Transfer sources.
    Source,
    /// Transfer targets.
    Target,
}

impl Leg {
    /// Keys of the owner, token and amount items.
    pub fn keys(&self) -> (&'static str, &'static str, &'static str) {
        match self {
            Leg::Source => ("Sender", "Sending Token", "Sending Amount"),
            Leg::Target => ("Destination", "Receiving Token", "Receiving Amount"),
        }
    }
}

/// A run of display items.
#[derive(Debug, Clone)]
pub enum Slot<'t> {
    /// One item.
    Single {
        /// Item key.
        key: &'static str,
        /// Item value.
        value: Value<'t>,
    },
    /// Transparent transfer legs: owner, token when unresolved, amount.
    Accounts {
        /// Leg shown.
        leg: Leg,
        /// Legs in wire order.
        accounts: &'t [Account],
        /// Legs whose token is unresolved.
        no_symbol: usize,
    },
    /// MASP spends: spender key, token when unresolved, amount.
    Spends(&'t MaspBuilder),
    /// MASP outputs: payment address, token when unresolved, amount.
    Outputs(&'t MaspBuilder),
}

impl<'t> Slot<'t> {
    /// Number of items in the slot.
    pub fn len(&self) -> usize {
        match self {
            Slot::Single { .. } => 1,
            Slot::Accounts {
                accounts, no_symbol, ..
            } => 2 * accounts.len() + no_symbol,
            Slot::Spends(builder) => 2 * builder.n_spends + builder.no_symbol_spends,
            Slot::Outputs(builder) => 2 * builder.n_outputs + builder.no_symbol_outputs,
        }
    }

    /// Returns `true` if the slot shows nothing.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Ordered slots for one transaction in one display mode.
#[derive(Debug, Clone)]
pub struct Layout<'t> {
    slots: Vec<Slot<'t>>,
}

impl<'t> Layout<'t> {
    /// Builds the layout of `tx` in `mode`.
    pub fn build(tx: &'t Transaction, mode: DisplayMode) -> Self {
        let mut layout = LayoutBuilder {
            slots: Vec::new(),
            expert: mode.is_expert(),
        };
        layout.single("Type", Value::Static(tx.kind.name()));
        layout.kind(tx);
        layout.common(tx);
        Layout {
            slots: layout.slots,
        }
    }

    /// Slots in display order.
    pub fn slots(&self) -> &[Slot<'t>] {
        &self.slots
    }

    /// Total number of items.
    pub fn item_count(&self) -> usize {
        self.slots.iter().map(Slot::len).sum()
    }

    /// Slot containing item `index` and the index within that slot.
    pub fn locate(&self, index: usize) -> Option<(&Slot<'t>, usize)> {
        let mut rest = index;
        for slot in &self.slots {
            let len = slot.len();
            if rest < len {
                return Some((slot, rest));
            }
            rest -= len;
        }
        None
    }
}

struct LayoutBuilder<'t> {
    slots: Vec<Slot<'t>>,
    expert: bool,
}

impl<'t> LayoutBuilder<'t> {
    fn single(&mut self, key: &'static str, value: Value<'t>) {
        self.slots.push(Slot::Single { key, value });
    }

    fn optional<T>(&mut self, key: &'static str, value: Option<T>, f: impl FnOnce(T) -> Value<'t>) {
        if let Some(value) = value {
            self.single(key, f(value));
        }
    }

    fn expert_single(&mut self, key: &'static str, value: Value<'t>) {
        if self.expert {
            self.single(key, value);
        }
    }

    fn native_amount(&mut self, key: &'static str, amount: &'t Amount) {
        self.single(
            key,
            Value::Amount(DenominatedAmount::native(*amount), Some(NATIVE_TOKEN_SYMBOL)),
        );
    }

    fn public_keys(&mut self, keys: &'t [PublicKey]) {
        for key in keys {
            self.single("Public key", Value::PublicKey(key));
        }
    }

    fn transfer(&mut self, tx: &'t Transaction, transfer: &'t Transfer) {
        self.slots.push(Slot::Accounts {
            leg: Leg::Source,
            accounts: &transfer.sources,
            no_symbol: transfer.no_symbol_sources,
        });
        self.slots.push(Slot::Accounts {
            leg: Leg::Target,
            accounts: &transfer.targets,
            no_symbol: transfer.no_symbol_targets,
        });
        if let (Some(hash), Some(builder)) = (&transfer.shielded_section_hash, tx.masp_builder()) {
            self.slots.push(Slot::Spends(builder));
            self.slots.push(Slot::Outputs(builder));
            self.expert_single("Shielded hash", Value::Hex(hash));
        }
    }

    fn kind(&mut self, tx: &'t Transaction) {
        match &tx.kind {
            TxKind::Transfer(transfer) => self.transfer(tx, transfer),
            TxKind::Ibc(ibc) => {
                self.single("Source port", Value::Text(&ibc.port));
                self.single("Source channel", Value::Text(&ibc.channel));
                self.single("Token", Value::Amount(ibc.amount, Some(ibc.token.as_str())));
                self.single("Sender", Value::Text(&ibc.sender));
                self.single("Receiver", Value::Text(&ibc.receiver));
                self.single("Timeout height", Value::Number(ibc.timeout_height));
                self.single("Timeout timestamp", Value::TimestampNanos(ibc.timeout_timestamp));
                if let Some(nft) = &ibc.nft {
                    for id in &nft.token_ids {
                        self.single("NFT token", Value::Text(id));
                    }
                }
                if !ibc.memo.is_empty() {
                    self.expert_single("IBC memo", Value::Text(&ibc.memo));
                }
                if let Some(transfer) = &ibc.transfer {
                    self.transfer(tx, transfer);
                }
            }
            TxKind::Bond(bond) | TxKind::Unbond(bond) => {
                self.optional("Source", bond.source.as_ref(), Value::Address);
                self.single("Validator", Value::Address(&bond.validator));
                self.native_amount("Amount", &bond.amount);
            }
            TxKind::Custom => {
                self.single("Code hash", Value::Hex(&tx.sections.code.commitment_hash));
            }
            TxKind::InitAccount(init) => {
                self.public_keys(&init.public_keys);
                self.single("VP type", Value::Hex(&init.vp_code_hash));
                self.single("Threshold", Value::Number(u64::from(init.threshold)));
            }
            TxKind::InitProposal(proposal) => {
                let label = match &proposal.proposal_type {
                    ProposalType::Default => "Default",
                    ProposalType::DefaultWithWasm(_) => "Default with Wasm",
                    ProposalType::PgfSteward(_) => "PGF Steward",
                    ProposalType::PgfPayment(_) => "PGF Payment",
                };
                self.single("Proposal type", Value::Static(label));
                match &proposal.proposal_type {
                    ProposalType::Default => {}
                    ProposalType::DefaultWithWasm(hash) => {
                        self.single("Proposal code", Value::Hex(hash))
                    }
                    ProposalType::PgfSteward(actions) => {
                        for action in actions {
                            let key = if action.add { "Add" } else { "Remove" };
                            self.single(key, Value::Address(&action.steward));
                        }
                    }
                    ProposalType::PgfPayment(actions) => {
                        for action in actions {
                            let kind = if action.continuous { "Continuous" } else { "Retro" };
                            self.single("Payment type", Value::Static(kind));
                            match &action.target {
                                PgfTarget::Internal { target, amount } => {
                                    self.single("Target", Value::Address(target));
                                    self.native_amount("Amount", amount);
                                }
                                PgfTarget::Ibc {
                                    target,
                                    amount,
                                    port,
                                    channel,
                                } => {
                                    self.single("Target", Value::Text(target));
                                    self.native_amount("Amount", amount);
                                    self.single("Port", Value::Text(port));
                                    self.single("Channel", Value::Text(channel));
                                }
                            }
                        }
                    }
                }
                self.single("Author", Value::Address(&proposal.author));
                self.single("Voting start epoch", Value::Number(proposal.voting_start));
                self.single("Voting end epoch", Value::Number(proposal.voting_end));
                self.single("Activation epoch", Value::Number(proposal.activation));
                self.single("Content", Value::Hex(&proposal.content));
            }
            TxKind::VoteProposal(vote) => {
                self.single("ID", Value::Number(vote.id));
                self.single("Vote", Value::Static(vote.vote.as_str()));
                self.single("Voter", Value::Address(&vote.voter));
            }
            TxKind::RevealPubkey(key) => self.single("Public key", Value::PublicKey(key)),
            TxKind::Withdraw(withdraw) | TxKind::ClaimRewards(withdraw) => {
                self.optional("Source", withdraw.source.as_ref(), Value::Address);
                self.single("Validator", Value::Address(&withdraw.validator));
            }
            TxKind::CommissionChange(change) => {
                self.single("New rate", Value::Dec(&change.new_rate));
                self.single("Validator", Value::Address(&change.validator));
            }
            TxKind::BecomeValidator(validator) => {
                self.single("Address", Value::Address(&validator.address));
                self.single("Consensus key", Value::PublicKey(&validator.consensus_key));
                self.single("Ethereum cold key", Value::PublicKey(&validator.eth_cold_key));
                self.single("Ethereum hot key", Value::PublicKey(&validator.eth_hot_key));
                self.single("Protocol key", Value::PublicKey(&validator.protocol_key));
                self.single("Commission rate", Value::Dec(&validator.commission_rate));
                self.single(
                    "Maximum commission rate change",
                    Value::Dec(&validator.max_commission_rate_change),
                );
                self.single("Email", Value::Text(&validator.email));
                self.optional("Description", validator.description.as_deref(), Value::Text);
                self.optional("Website", validator.website.as_deref(), Value::Text);
                self.optional("Discord handle", validator.discord_handle.as_deref(), Value::Text);
                self.optional("Avatar", validator.avatar.as_deref(), Value::Text);
                self.optional("Name", validator.name.as_deref(), Value::Text);
            }
            TxKind::UpdateVp(update) => {
                self.single("Address", Value::Address(&update.address));
                self.public_keys(&update.public_keys);
                self.optional("Threshold", update.threshold, |t| Value::Number(u64::from(t)));
                self.optional("VP type", update.vp_code_hash.as_ref(), |h: &'t Hash| Value::Hex(h));
            }
            TxKind::ReactivateValidator(action)
            | TxKind::DeactivateValidator(action)
            | TxKind::UnjailValidator(action) => {
                self.single("Validator", Value::Address(&action.validator));
            }
            TxKind::Redelegate(redelegate) => {
                self.single("Source Validator", Value::Address(&redelegate.src_validator));
                self.single("Destination Validator", Value::Address(&redelegate.dest_validator));
                self.single("Owner", Value::Address(&redelegate.owner));
                self.native_amount("Amount", &redelegate.amount);
            }
            TxKind::ResignSteward(steward) => self.single("Steward", Value::Address(steward)),
            TxKind::ChangeConsensusKey(change) => {
                self.single("New consensus key", Value::PublicKey(&change.consensus_key));
                self.single("Validator", Value::Address(&change.validator));
            }
            TxKind::UpdateStewardCommission(update) => {
                self.single("Steward", Value::Address(&update.steward));
                for (address, rate) in &update.commission {
                    self.single("Validator", Value::Address(address));
                    self.single("Commission Rate", Value::Dec(rate));
                }
            }
            TxKind::ChangeValidatorMetadata(change) => {
                self.single("Validator", Value::Address(&change.validator));
                self.optional("Email", change.email.as_deref(), Value::Text);
                self.optional("Description", change.description.as_deref(), Value::Text);
                self.optional("Website", change.website.as_deref(), Value::Text);
                self.optional("Discord handle", change.discord_handle.as_deref(), Value::Text);
                self.optional("Avatar", change.avatar.as_deref(), Value::Text);
                self.optional("Name", change.name.as_deref(), Value::Text);
                self.optional("Commission rate", change.commission_rate.as_ref(), Value::Dec);
            }
            TxKind::BridgePoolTransfer(transfer) => {
                let kind = match transfer.kind {
                    BridgeTokenKind::Erc20 => "ERC20",
                    BridgeTokenKind::Nut => "NUT",
                };
                self.single("Transfer kind", Value::Static(kind));
                self.single("Sender", Value::Address(&transfer.sender));
                self.single("Recipient", Value::EthAddress(&transfer.recipient));
                self.single("Asset", Value::EthAddress(&transfer.asset));
                self.single(
                    "Amount",
                    Value::Amount(
                        DenominatedAmount {
                            amount: transfer.amount,
                            denom: 0,
                        },
                        None,
                    ),
                );
                self.single("Gas payer", Value::Address(&transfer.gas_payer));
                self.single("Gas token", Value::Address(&transfer.gas_token));
                self.single(
                    "Gas amount",
                    Value::Amount(DenominatedAmount::native(transfer.gas_amount), None),
                );
            }
        }
    }

    fn common(&mut self, tx: &'t Transaction) {
        let header = &tx.header;
        if tx.has_memo_to_print() {
            if let Some(memo) = tx.memo_section() {
                self.single("Memo", Value::Memo(memo));
            }
        }
        self.expert_single("Chain ID", Value::Text(&header.chain_id));
        self.expert_single("Expiration", Value::Expiration(header.expiration));
        self.expert_single("Timestamp", Value::Timestamp(header.timestamp));
        let symbol = header.fee.symbol.as_deref();
        if symbol.is_none() {
            self.single("Fee token", Value::Address(&header.fee.token));
        }
        self.single(
            "Fee",
            Value::Fee(&header.fee.amount_per_gas_unit, header.gas_limit, symbol),
        );
        self.expert_single("Gas limit", Value::Number(header.gas_limit));
        self.expert_single("Fee payer", Value::PublicKey(&header.fee_payer));
    }
}

/// Inline memo bytes, or the referenced hash for hash commitments.
pub fn memo_bytes<'a>(memo: &'a CommitmentSection, buffer: &'a [u8]) -> Option<&'a [u8]> {
    match &memo.commitment {
        Commitment::Hash(hash) => Some(hash.as_slice()),
        Commitment::Id(range) => range.slice(buffer).ok(),
    }
}
