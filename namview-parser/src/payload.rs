//! Per-kind payload decoding.
//!
//! The code section tag selects which decoder consumes the data section. Unknown tags
//! fall back to [`TxKind::Custom`], whose payload is left opaque.

use crate::{
    cursor::ParserContext,
    error::ParserError,
    types::{read_hash, Address, Amount, Dec, Decode, DenominatedAmount, Hash, PublicKey},
};

/// Ethereum address length used by bridge pool transfers.
pub const ETH_ADDRESS_LEN: usize = 20;

/// One transparent transfer leg.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    /// Account sending or receiving.
    pub owner: Address,
    /// Token moved.
    pub token: Address,
    /// Amount moved.
    pub amount: DenominatedAmount,
    /// Ticker of `token`, filled in after decoding; `None` when unknown.
    pub symbol: Option<String>,
}

impl Decode for Account {
    fn decode(ctx: &mut ParserContext<'_>) -> Result<Self, ParserError> {
        Ok(Self {
            owner: Address::decode(ctx)?,
            token: Address::decode(ctx)?,
            amount: DenominatedAmount::decode(ctx)?,
            symbol: None,
        })
    }
}

/// Token transfer, transparent and/or shielded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transfer {
    /// Transparent sources.
    pub sources: Vec<Account>,
    /// Transparent targets.
    pub targets: Vec<Account>,
    /// Hash of the shielded section, when the transfer has a shielded part.
    pub shielded_section_hash: Option<Hash>,
    /// Sources whose token has no known symbol.
    pub no_symbol_sources: usize,
    /// Targets whose token has no known symbol.
    pub no_symbol_targets: usize,
}

impl Transfer {
    /// Returns `true` when the transfer has a shielded part.
    pub fn is_masp(&self) -> bool {
        self.shielded_section_hash.is_some()
    }
}

impl Decode for Transfer {
    fn decode(ctx: &mut ParserContext<'_>) -> Result<Self, ParserError> {
        Ok(Self {
            sources: ctx.read_vec("Transfer::sources", Account::decode)?,
            targets: ctx.read_vec("Transfer::targets", Account::decode)?,
            shielded_section_hash: ctx.read_option("Transfer::shielded_section_hash", |c| {
                read_hash(c, "Transfer::shielded_section_hash")
            })?,
            no_symbol_sources: 0,
            no_symbol_targets: 0,
        })
    }
}

/// NFT part of an IBC message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IbcNft {
    /// NFT class.
    pub class_id: String,
    /// Token ids moved.
    pub token_ids: Vec<String>,
}

/// IBC transfer message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ibc {
    /// Source port.
    pub port: String,
    /// Source channel.
    pub channel: String,
    /// Denomination trace of the moved token.
    pub token: String,
    /// Amount moved.
    pub amount: DenominatedAmount,
    /// Sender on this chain.
    pub sender: String,
    /// Receiver on the counterparty chain.
    pub receiver: String,
    /// Timeout block height.
    pub timeout_height: u64,
    /// Timeout as unix nanoseconds.
    pub timeout_timestamp: u64,
    /// Free form memo.
    pub memo: String,
    /// NFT transfer details.
    pub nft: Option<IbcNft>,
    /// Attached transfer, possibly shielded.
    pub transfer: Option<Transfer>,
}

impl Decode for Ibc {
    fn decode(ctx: &mut ParserContext<'_>) -> Result<Self, ParserError> {
        Ok(Self {
            port: ctx.read_string("Ibc::port")?,
            channel: ctx.read_string("Ibc::channel")?,
            token: ctx.read_string("Ibc::token")?,
            amount: DenominatedAmount::decode(ctx)?,
            sender: ctx.read_string("Ibc::sender")?,
            receiver: ctx.read_string("Ibc::receiver")?,
            timeout_height: ctx.read_u64("Ibc::timeout_height")?,
            timeout_timestamp: ctx.read_u64("Ibc::timeout_timestamp")?,
            memo: ctx.read_string("Ibc::memo")?,
            nft: ctx.read_option("Ibc::nft", |c| {
                Ok(IbcNft {
                    class_id: c.read_string("Ibc::nft_class")?,
                    token_ids: c.read_vec("Ibc::nft_ids", |c| c.read_string("Ibc::nft_id"))?,
                })
            })?,
            transfer: ctx.read_option("Ibc::transfer", Transfer::decode)?,
        })
    }
}

/// Bond or unbond.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bond {
    /// Validator bonded to.
    pub validator: Address,
    /// Amount in the native denomination.
    pub amount: Amount,
    /// Delegator, when not the validator itself.
    pub source: Option<Address>,
}

impl Decode for Bond {
    fn decode(ctx: &mut ParserContext<'_>) -> Result<Self, ParserError> {
        Ok(Self {
            validator: Address::decode(ctx)?,
            amount: Amount::decode(ctx)?,
            source: ctx.read_option("Bond::source", Address::decode)?,
        })
    }
}

/// New established account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitAccount {
    /// Keys controlling the account.
    pub public_keys: Vec<PublicKey>,
    /// Hash of the validity predicate code section.
    pub vp_code_hash: Hash,
    /// Signatures required.
    pub threshold: u8,
}

impl Decode for InitAccount {
    fn decode(ctx: &mut ParserContext<'_>) -> Result<Self, ParserError> {
        Ok(Self {
            public_keys: ctx.read_vec("InitAccount::public_keys", PublicKey::decode)?,
            vp_code_hash: read_hash(ctx, "InitAccount::vp_code_hash")?,
            threshold: ctx.read_u8("InitAccount::threshold")?,
        })
    }
}

/// Steward set change proposed by a PGF steward proposal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StewardAction {
    /// `true` to add, `false` to remove.
    pub add: bool,
    /// Steward address.
    pub steward: Address,
}

/// Recipient of a PGF payment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PgfTarget {
    /// Account on this chain.
    Internal {
        /// Receiving address.
        target: Address,
        /// Amount paid.
        amount: Amount,
    },
    /// Account reached over IBC.
    Ibc {
        /// Receiving address on the counterparty.
        target: String,
        /// Amount paid.
        amount: Amount,
        /// Port used.
        port: String,
        /// Channel used.
        channel: String,
    },
}

/// One PGF payment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PgfAction {
    /// `true` for a continuous payment, `false` for a retroactive one.
    pub continuous: bool,
    /// Who gets paid.
    pub target: PgfTarget,
}

impl Decode for PgfAction {
    fn decode(ctx: &mut ParserContext<'_>) -> Result<Self, ParserError> {
        let continuous = match ctx.read_u8("PgfAction::kind")? {
            0 => true,
            1 => false,
            other => {
                return Err(ParserError::UnexpectedValue {
                    field: "PgfAction::kind",
                    value: u64::from(other),
                })
            }
        };
        let target = match ctx.read_u8("PgfAction::target")? {
            0 => PgfTarget::Internal {
                target: Address::decode(ctx)?,
                amount: Amount::decode(ctx)?,
            },
            1 => PgfTarget::Ibc {
                target: ctx.read_string("PgfAction::ibc_target")?,
                amount: Amount::decode(ctx)?,
                port: ctx.read_string("PgfAction::port")?,
                channel: ctx.read_string("PgfAction::channel")?,
            },
            other => {
                return Err(ParserError::UnexpectedValue {
                    field: "PgfAction::target",
                    value: u64::from(other),
                })
            }
        };
        Ok(Self { continuous, target })
    }
}

/// Governance proposal type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProposalType {
    /// Plain proposal.
    Default,
    /// Proposal executing code on acceptance.
    DefaultWithWasm(Hash),
    /// Steward set changes.
    PgfSteward(Vec<StewardAction>),
    /// Funding payments.
    PgfPayment(Vec<PgfAction>),
}

impl Decode for ProposalType {
    fn decode(ctx: &mut ParserContext<'_>) -> Result<Self, ParserError> {
        match ctx.read_u8("ProposalType::tag")? {
            0 => Ok(ProposalType::Default),
            1 => Ok(ProposalType::DefaultWithWasm(read_hash(ctx, "ProposalType::code")?)),
            2 => Ok(ProposalType::PgfSteward(ctx.read_vec("ProposalType::stewards", |c| {
                let add = match c.read_u8("StewardAction::tag")? {
                    0 => true,
                    1 => false,
                    other => {
                        return Err(ParserError::UnexpectedValue {
                            field: "StewardAction::tag",
                            value: u64::from(other),
                        })
                    }
                };
                Ok(StewardAction {
                    add,
                    steward: Address::decode(c)?,
                })
            })?)),
            3 => Ok(ProposalType::PgfPayment(
                ctx.read_vec("ProposalType::payments", PgfAction::decode)?,
            )),
            other => Err(ParserError::UnexpectedValue {
                field: "ProposalType::tag",
                value: u64::from(other),
            }),
        }
    }
}

/// Governance proposal submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitProposal {
    /// Hash of the proposal content.
    pub content: Hash,
    /// Proposal author.
    pub author: Address,
    /// Proposal type.
    pub proposal_type: ProposalType,
    /// First voting epoch.
    pub voting_start: u64,
    /// Last voting epoch.
    pub voting_end: u64,
    /// Activation epoch.
    pub activation: u64,
}

impl Decode for InitProposal {
    fn decode(ctx: &mut ParserContext<'_>) -> Result<Self, ParserError> {
        Ok(Self {
            content: read_hash(ctx, "InitProposal::content")?,
            author: Address::decode(ctx)?,
            proposal_type: ProposalType::decode(ctx)?,
            voting_start: ctx.read_u64("InitProposal::voting_start")?,
            voting_end: ctx.read_u64("InitProposal::voting_end")?,
            activation: ctx.read_u64("InitProposal::activation")?,
        })
    }
}

/// Governance vote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Vote {
    /// In favour.
    Yay,
    /// Against.
    Nay,
    /// Abstain.
    Abstain,
}

impl Vote {
    /// Lowercase label of the vote.
    pub fn as_str(&self) -> &'static str {
        match self {
            Vote::Yay => "yay",
            Vote::Nay => "nay",
            Vote::Abstain => "abstain",
        }
    }
}

/// Governance vote on a proposal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoteProposal {
    /// Proposal id.
    pub id: u64,
    /// Vote cast.
    pub vote: Vote,
    /// Voting account.
    pub voter: Address,
}

impl Decode for VoteProposal {
    fn decode(ctx: &mut ParserContext<'_>) -> Result<Self, ParserError> {
        let id = ctx.read_u64("VoteProposal::id")?;
        let vote = match ctx.read_u8("VoteProposal::vote")? {
            0 => Vote::Yay,
            1 => Vote::Nay,
            2 => Vote::Abstain,
            other => {
                return Err(ParserError::UnexpectedValue {
                    field: "VoteProposal::vote",
                    value: u64::from(other),
                })
            }
        };
        Ok(Self {
            id,
            vote,
            voter: Address::decode(ctx)?,
        })
    }
}

/// Withdraw or claim rewards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Withdraw {
    /// Validator withdrawn from.
    pub validator: Address,
    /// Delegator, when not the validator itself.
    pub source: Option<Address>,
}

impl Decode for Withdraw {
    fn decode(ctx: &mut ParserContext<'_>) -> Result<Self, ParserError> {
        Ok(Self {
            validator: Address::decode(ctx)?,
            source: ctx.read_option("Withdraw::source", Address::decode)?,
        })
    }
}

/// Validator commission rate change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommissionChange {
    /// Validator.
    pub validator: Address,
    /// New commission rate.
    pub new_rate: Dec,
}

impl Decode for CommissionChange {
    fn decode(ctx: &mut ParserContext<'_>) -> Result<Self, ParserError> {
        Ok(Self {
            validator: Address::decode(ctx)?,
            new_rate: Dec::decode(ctx)?,
        })
    }
}

/// Validator registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BecomeValidator {
    /// Validator account.
    pub address: Address,
    /// Consensus key.
    pub consensus_key: PublicKey,
    /// Ethereum cold key, must be Secp256k1.
    pub eth_cold_key: PublicKey,
    /// Ethereum hot key, must be Secp256k1.
    pub eth_hot_key: PublicKey,
    /// Protocol key.
    pub protocol_key: PublicKey,
    /// Commission rate.
    pub commission_rate: Dec,
    /// Maximum commission rate change per epoch.
    pub max_commission_rate_change: Dec,
    /// Contact email.
    pub email: String,
    /// Description.
    pub description: Option<String>,
    /// Website.
    pub website: Option<String>,
    /// Discord handle.
    pub discord_handle: Option<String>,
    /// Avatar URL.
    pub avatar: Option<String>,
    /// Display name.
    pub name: Option<String>,
}

impl Decode for BecomeValidator {
    fn decode(ctx: &mut ParserContext<'_>) -> Result<Self, ParserError> {
        Ok(Self {
            address: Address::decode(ctx)?,
            consensus_key: PublicKey::decode(ctx)?,
            eth_cold_key: PublicKey::decode(ctx)?,
            eth_hot_key: PublicKey::decode(ctx)?,
            protocol_key: PublicKey::decode(ctx)?,
            commission_rate: Dec::decode(ctx)?,
            max_commission_rate_change: Dec::decode(ctx)?,
            email: ctx.read_string("BecomeValidator::email")?,
            description: read_opt_string(ctx, "BecomeValidator::description")?,
            website: read_opt_string(ctx, "BecomeValidator::website")?,
            discord_handle: read_opt_string(ctx, "BecomeValidator::discord_handle")?,
            avatar: read_opt_string(ctx, "BecomeValidator::avatar")?,
            name: read_opt_string(ctx, "BecomeValidator::name")?,
        })
    }
}

/// Account update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateVp {
    /// Updated account.
    pub address: Address,
    /// Hash of the new validity predicate code section.
    pub vp_code_hash: Option<Hash>,
    /// New keys; empty keeps the current ones.
    pub public_keys: Vec<PublicKey>,
    /// New threshold.
    pub threshold: Option<u8>,
}

impl Decode for UpdateVp {
    fn decode(ctx: &mut ParserContext<'_>) -> Result<Self, ParserError> {
        Ok(Self {
            address: Address::decode(ctx)?,
            vp_code_hash: ctx.read_option("UpdateVp::vp_code_hash", |c| {
                read_hash(c, "UpdateVp::vp_code_hash")
            })?,
            public_keys: ctx.read_vec("UpdateVp::public_keys", PublicKey::decode)?,
            threshold: ctx.read_option("UpdateVp::threshold", |c| c.read_u8("UpdateVp::threshold"))?,
        })
    }
}

/// Validator state change naming only the validator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatorAction {
    /// Validator.
    pub validator: Address,
}

impl Decode for ValidatorAction {
    fn decode(ctx: &mut ParserContext<'_>) -> Result<Self, ParserError> {
        Ok(Self {
            validator: Address::decode(ctx)?,
        })
    }
}

/// Move of a bond between validators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redelegate {
    /// Validator the bond leaves.
    pub src_validator: Address,
    /// Validator the bond joins.
    pub dest_validator: Address,
    /// Bond owner.
    pub owner: Address,
    /// Amount in the native denomination.
    pub amount: Amount,
}

impl Decode for Redelegate {
    fn decode(ctx: &mut ParserContext<'_>) -> Result<Self, ParserError> {
        Ok(Self {
            src_validator: Address::decode(ctx)?,
            dest_validator: Address::decode(ctx)?,
            owner: Address::decode(ctx)?,
            amount: Amount::decode(ctx)?,
        })
    }
}

/// Consensus key rotation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeConsensusKey {
    /// New key.
    pub consensus_key: PublicKey,
    /// Validator.
    pub validator: Address,
}

impl Decode for ChangeConsensusKey {
    fn decode(ctx: &mut ParserContext<'_>) -> Result<Self, ParserError> {
        Ok(Self {
            consensus_key: PublicKey::decode(ctx)?,
            validator: Address::decode(ctx)?,
        })
    }
}

/// PGF steward reward split update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateStewardCommission {
    /// Steward.
    pub steward: Address,
    /// Reward share per address.
    pub commission: Vec<(Address, Dec)>,
}

impl Decode for UpdateStewardCommission {
    fn decode(ctx: &mut ParserContext<'_>) -> Result<Self, ParserError> {
        Ok(Self {
            steward: Address::decode(ctx)?,
            commission: ctx.read_vec("UpdateStewardCommission::commission", |c| {
                Ok((Address::decode(c)?, Dec::decode(c)?))
            })?,
        })
    }
}

/// Validator metadata update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeValidatorMetadata {
    /// Validator.
    pub validator: Address,
    /// New email.
    pub email: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New website.
    pub website: Option<String>,
    /// New discord handle.
    pub discord_handle: Option<String>,
    /// New avatar URL.
    pub avatar: Option<String>,
    /// New display name.
    pub name: Option<String>,
    /// New commission rate.
    pub commission_rate: Option<Dec>,
}

impl Decode for ChangeValidatorMetadata {
    fn decode(ctx: &mut ParserContext<'_>) -> Result<Self, ParserError> {
        Ok(Self {
            validator: Address::decode(ctx)?,
            email: read_opt_string(ctx, "ChangeValidatorMetadata::email")?,
            description: read_opt_string(ctx, "ChangeValidatorMetadata::description")?,
            website: read_opt_string(ctx, "ChangeValidatorMetadata::website")?,
            discord_handle: read_opt_string(ctx, "ChangeValidatorMetadata::discord_handle")?,
            avatar: read_opt_string(ctx, "ChangeValidatorMetadata::avatar")?,
            name: read_opt_string(ctx, "ChangeValidatorMetadata::name")?,
            commission_rate: ctx.read_option("ChangeValidatorMetadata::commission_rate", Dec::decode)?,
        })
    }
}

/// Token kind moved over the Ethereum bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BridgeTokenKind {
    /// Native ERC20.
    Erc20,
    /// Non-usable token.
    Nut,
}

/// Ethereum bridge pool transfer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgePoolTransfer {
    /// ERC20 contract.
    pub asset: [u8; ETH_ADDRESS_LEN],
    /// Ethereum recipient.
    pub recipient: [u8; ETH_ADDRESS_LEN],
    /// Sender on this chain.
    pub sender: Address,
    /// Amount moved.
    pub amount: Amount,
    /// Token kind.
    pub kind: BridgeTokenKind,
    /// Relayer gas fee amount.
    pub gas_amount: Amount,
    /// Gas payer.
    pub gas_payer: Address,
    /// Gas fee token.
    pub gas_token: Address,
}

impl Decode for BridgePoolTransfer {
    fn decode(ctx: &mut ParserContext<'_>) -> Result<Self, ParserError> {
        Ok(Self {
            asset: ctx.read_array("BridgePool::asset")?,
            recipient: ctx.read_array("BridgePool::recipient")?,
            sender: Address::decode(ctx)?,
            amount: Amount::decode(ctx)?,
            kind: match ctx.read_u8("BridgePool::kind")? {
                0 => BridgeTokenKind::Erc20,
                1 => BridgeTokenKind::Nut,
                other => {
                    return Err(ParserError::UnexpectedValue {
                        field: "BridgePool::kind",
                        value: u64::from(other),
                    })
                }
            },
            gas_amount: Amount::decode(ctx)?,
            gas_payer: Address::decode(ctx)?,
            gas_token: Address::decode(ctx)?,
        })
    }
}

fn read_opt_string(ctx: &mut ParserContext<'_>, field: &'static str) -> Result<Option<String>, ParserError> {
    ctx.read_option(field, |c| c.read_string(field))
}

/// Decoded payload, one case per supported transaction kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TxKind {
    /// Token transfer.
    Transfer(Transfer),
    /// IBC message.
    Ibc(Ibc),
    /// Bond.
    Bond(Bond),
    /// Unbond.
    Unbond(Bond),
    /// New account.
    InitAccount(InitAccount),
    /// Governance proposal.
    InitProposal(InitProposal),
    /// Governance vote.
    VoteProposal(VoteProposal),
    /// Public key reveal.
    RevealPubkey(PublicKey),
    /// Withdraw unbonded tokens.
    Withdraw(Withdraw),
    /// Commission rate change.
    CommissionChange(CommissionChange),
    /// Validator registration.
    BecomeValidator(BecomeValidator),
    /// Account update.
    UpdateVp(UpdateVp),
    /// Validator reactivation.
    ReactivateValidator(ValidatorAction),
    /// Validator deactivation.
    DeactivateValidator(ValidatorAction),
    /// Validator unjailing.
    UnjailValidator(ValidatorAction),
    /// Bond move.
    Redelegate(Redelegate),
    /// Reward claim.
    ClaimRewards(Withdraw),
    /// Steward resignation.
    ResignSteward(Address),
    /// Consensus key rotation.
    ChangeConsensusKey(ChangeConsensusKey),
    /// Steward reward split.
    UpdateStewardCommission(UpdateStewardCommission),
    /// Validator metadata update.
    ChangeValidatorMetadata(ChangeValidatorMetadata),
    /// Ethereum bridge transfer.
    BridgePoolTransfer(BridgePoolTransfer),
    /// Code this decoder does not know; the payload stays opaque.
    Custom,
}

impl TxKind {
    /// Decodes `ctx` with the decoder selected by the code section tag.
    ///
    /// [`TxKind::Custom`] leaves the payload unread.
    pub fn decode(code_tag: Option<&str>, ctx: &mut ParserContext<'_>) -> Result<Self, ParserError> {
        let kind = match code_tag.unwrap_or_default() {
            "tx_transfer.wasm" => TxKind::Transfer(Transfer::decode(ctx)?),
            "tx_ibc.wasm" => TxKind::Ibc(Ibc::decode(ctx)?),
            "tx_bond.wasm" => TxKind::Bond(Bond::decode(ctx)?),
            "tx_unbond.wasm" => TxKind::Unbond(Bond::decode(ctx)?),
            "tx_init_account.wasm" => TxKind::InitAccount(InitAccount::decode(ctx)?),
            "tx_init_proposal.wasm" => TxKind::InitProposal(InitProposal::decode(ctx)?),
            "tx_vote_proposal.wasm" => TxKind::VoteProposal(VoteProposal::decode(ctx)?),
            "tx_reveal_pk.wasm" => TxKind::RevealPubkey(PublicKey::decode(ctx)?),
            "tx_withdraw.wasm" => TxKind::Withdraw(Withdraw::decode(ctx)?),
            "tx_change_validator_commission.wasm" => {
                TxKind::CommissionChange(CommissionChange::decode(ctx)?)
            }
            "tx_become_validator.wasm" => TxKind::BecomeValidator(BecomeValidator::decode(ctx)?),
            "tx_update_account.wasm" => TxKind::UpdateVp(UpdateVp::decode(ctx)?),
            "tx_reactivate_validator.wasm" => {
                TxKind::ReactivateValidator(ValidatorAction::decode(ctx)?)
            }
            "tx_deactivate_validator.wasm" => {
                TxKind::DeactivateValidator(ValidatorAction::decode(ctx)?)
            }
            "tx_unjail_validator.wasm" => TxKind::UnjailValidator(ValidatorAction::decode(ctx)?),
            "tx_redelegate.wasm" => TxKind::Redelegate(Redelegate::decode(ctx)?),
            "tx_claim_rewards.wasm" => TxKind::ClaimRewards(Withdraw::decode(ctx)?),
            "tx_resign_steward.wasm" => TxKind::ResignSteward(Address::decode(ctx)?),
            "tx_change_consensus_key.wasm" => {
                TxKind::ChangeConsensusKey(ChangeConsensusKey::decode(ctx)?)
            }
            "tx_update_steward_commission.wasm" => {
                TxKind::UpdateStewardCommission(UpdateStewardCommission::decode(ctx)?)
            }
            "tx_change_validator_metadata.wasm" => {
                TxKind::ChangeValidatorMetadata(ChangeValidatorMetadata::decode(ctx)?)
            }
            "tx_bridge_pool.wasm" => TxKind::BridgePoolTransfer(BridgePoolTransfer::decode(ctx)?),
            _ => return Ok(TxKind::Custom),
        };
        ctx.expect_exhausted()?;
        Ok(kind)
    }

    /// Label shown as the transaction type.
    pub fn name(&self) -> &'static str {
        match self {
            TxKind::Transfer(_) => "Transfer",
            TxKind::Ibc(_) => "IBC",
            TxKind::Bond(_) => "Bond",
            TxKind::Unbond(_) => "Unbond",
            TxKind::InitAccount(_) => "Init Account",
            TxKind::InitProposal(_) => "Init Proposal",
            TxKind::VoteProposal(_) => "Vote Proposal",
            TxKind::RevealPubkey(_) => "Reveal Pubkey",
            TxKind::Withdraw(_) => "Withdraw",
            TxKind::CommissionChange(_) => "Change commission",
            TxKind::BecomeValidator(_) => "Become Validator",
            TxKind::UpdateVp(_) => "Update VP",
            TxKind::ReactivateValidator(_) => "Reactivate Validator",
            TxKind::DeactivateValidator(_) => "Deactivate Validator",
            TxKind::UnjailValidator(_) => "Unjail Validator",
            TxKind::Redelegate(_) => "Redelegate",
            TxKind::ClaimRewards(_) => "Claim Rewards",
            TxKind::ResignSteward(_) => "Resign Steward",
            TxKind::ChangeConsensusKey(_) => "Change consensus key",
            TxKind::UpdateStewardCommission(_) => "Update Steward Commission",
            TxKind::ChangeValidatorMetadata(_) => "Change metadata",
            TxKind::BridgePoolTransfer(_) => "Bridge Pool Transfer",
            TxKind::Custom => "Custom",
        }
    }

    /// Transfer part of the payload, for transfers and IBC messages carrying one.
    pub fn transfer(&self) -> Option<&Transfer> {
        match self {
            TxKind::Transfer(transfer) => Some(transfer),
            TxKind::Ibc(ibc) => ibc.transfer.as_ref(),
            _ => None,
        }
    }

    /// Mutable variant of [`TxKind::transfer`].
    pub fn transfer_mut(&mut self) -> Option<&mut Transfer> {
        match self {
            TxKind::Transfer(transfer) => Some(transfer),
            TxKind::Ibc(ibc) => ibc.transfer.as_mut(),
            _ => None,
        }
    }

    /// Shielded section hash embedded in the payload.
    pub fn shielded_section_hash(&self) -> Option<&Hash> {
        self.transfer().and_then(|t| t.shielded_section_hash.as_ref())
    }

    /// Returns `true` when the payload has a shielded part.
    pub fn is_masp(&self) -> bool {
        self.shielded_section_hash().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ADDRESS_LEN;

    fn address(fill: u8) -> Vec<u8> {
        let mut out = vec![0u8];
        out.extend_from_slice(&[fill; ADDRESS_LEN - 1]);
        out
    }

    fn amount(value: u64) -> Vec<u8> {
        let mut out = value.to_le_bytes().to_vec();
        out.resize(32, 0);
        out
    }

    #[test]
    fn bond_payload_with_source() {
        let mut payload = address(1);
        payload.extend(amount(500));
        payload.push(1);
        payload.extend(address(2));
        let mut ctx = ParserContext::new(&payload);
        let kind = TxKind::decode(Some("tx_bond.wasm"), &mut ctx).unwrap();
        match kind {
            TxKind::Bond(bond) => {
                assert_eq!(bond.amount, Amount(500u64.into()));
                assert!(bond.source.is_some());
            }
            other => panic!("unexpected kind {other:?}"),
        }
    }

    #[test]
    fn leftover_payload_bytes_are_rejected() {
        let mut payload = address(1);
        payload.extend(amount(1));
        payload.push(0);
        payload.push(0xee);
        let mut ctx = ParserContext::new(&payload);
        assert_eq!(
            TxKind::decode(Some("tx_unbond.wasm"), &mut ctx).unwrap_err(),
            ParserError::UnexpectedUnparsedBytes(1)
        );
    }

    #[test]
    fn unknown_code_is_custom() {
        let payload = [1u8, 2, 3];
        let mut ctx = ParserContext::new(&payload);
        assert_eq!(TxKind::decode(Some("my_code.wasm"), &mut ctx).unwrap(), TxKind::Custom);
        let mut ctx = ParserContext::new(&payload);
        assert_eq!(TxKind::decode(None, &mut ctx).unwrap(), TxKind::Custom);
    }

    #[test]
    fn invalid_vote_is_rejected() {
        let mut payload = 7u64.to_le_bytes().to_vec();
        payload.push(3);
        payload.extend(address(1));
        let mut ctx = ParserContext::new(&payload);
        assert_eq!(
            TxKind::decode(Some("tx_vote_proposal.wasm"), &mut ctx).unwrap_err(),
            ParserError::UnexpectedValue {
                field: "VoteProposal::vote",
                value: 3
            }
        );
    }

    #[test]
    fn pgf_payment_proposal() {
        let mut payload = vec![9u8; 32];
        payload.extend(address(3));
        payload.push(3);
        payload.extend_from_slice(&2u32.to_le_bytes());
        // continuous internal payment
        payload.extend_from_slice(&[0, 0]);
        payload.extend(address(4));
        payload.extend(amount(10));
        // retro IBC payment
        payload.extend_from_slice(&[1, 1]);
        for s in ["cosmos1xyz"] {
            payload.extend_from_slice(&(s.len() as u32).to_le_bytes());
            payload.extend_from_slice(s.as_bytes());
        }
        payload.extend(amount(20));
        for s in ["transfer", "channel-0"] {
            payload.extend_from_slice(&(s.len() as u32).to_le_bytes());
            payload.extend_from_slice(s.as_bytes());
        }
        for epoch in [10u64, 20, 30] {
            payload.extend_from_slice(&epoch.to_le_bytes());
        }
        let mut ctx = ParserContext::new(&payload);
        let TxKind::InitProposal(proposal) = TxKind::decode(Some("tx_init_proposal.wasm"), &mut ctx).unwrap() else {
            panic!("expected proposal");
        };
        let ProposalType::PgfPayment(actions) = proposal.proposal_type else {
            panic!("expected payments");
        };
        assert_eq!(actions.len(), 2);
        assert!(actions[0].continuous);
        assert!(matches!(actions[1].target, PgfTarget::Ibc { ref channel, .. } if channel == "channel-0"));
        assert_eq!(proposal.activation, 30);
    }

    #[test]
    fn masp_transfer_is_detected() {
        let mut payload = 0u32.to_le_bytes().to_vec();
        payload.extend_from_slice(&0u32.to_le_bytes());
        payload.push(1);
        payload.extend_from_slice(&[5u8; 32]);
        let mut ctx = ParserContext::new(&payload);
        let kind = TxKind::decode(Some("tx_transfer.wasm"), &mut ctx).unwrap();
        assert!(kind.is_masp());
        assert_eq!(kind.shielded_section_hash(), Some(&[5u8; 32]));
        assert_eq!(kind.name(), "Transfer");
    }
}
