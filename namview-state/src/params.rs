//! Item counts every transaction of a kind shows, before optional items are added.

use namview_common::DisplayMode;
use namview_parser::TxKind;

/// Items added by expert mode to every kind: chain id, expiration, timestamp, gas limit
/// and fee payer.
pub const EXPERT_EXTRA_ITEMS: usize = 5;

/// Bond and unbond: type, validator, amount, fee.
pub const BOND_NORMAL_PARAMS: usize = 4;
/// Expert count of the kind above.
pub const BOND_EXPERT_PARAMS: usize = 9;

/// Custom: type, code hash, fee.
pub const CUSTOM_NORMAL_PARAMS: usize = 3;
/// Expert count of the kind above.
pub const CUSTOM_EXPERT_PARAMS: usize = 8;

/// Transfer: type and fee, before legs.
pub const TRANSFER_NORMAL_PARAMS: usize = 2;
/// Expert count of the kind above.
pub const TRANSFER_EXPERT_PARAMS: usize = 7;
/// Expert MASP transfers also show the shielded section hash.
pub const TRANSFER_MASP_EXPERT_PARAMS: usize = 8;

/// Account creation: type, VP type, threshold, fee, before keys.
pub const INIT_ACCOUNT_NORMAL_PARAMS: usize = 4;
/// Expert count of the kind above.
pub const INIT_ACCOUNT_EXPERT_PARAMS: usize = 9;

/// Proposal: type, proposal type, author, three epochs, content, fee.
pub const INIT_PROPOSAL_NORMAL_PARAMS: usize = 8;
/// Expert count of the kind above.
pub const INIT_PROPOSAL_EXPERT_PARAMS: usize = 13;

/// Vote: type, id, vote, voter, fee.
pub const VOTE_PROPOSAL_NORMAL_PARAMS: usize = 5;
/// Expert count of the kind above.
pub const VOTE_PROPOSAL_EXPERT_PARAMS: usize = 10;

/// Key reveal: type, public key, fee.
pub const REVEAL_PUBKEY_NORMAL_PARAMS: usize = 3;
/// Expert count of the kind above.
pub const REVEAL_PUBKEY_EXPERT_PARAMS: usize = 8;

/// Withdraw and reward claims: type, validator, fee.
pub const WITHDRAW_NORMAL_PARAMS: usize = 3;
/// Expert count of the kind above.
pub const WITHDRAW_EXPERT_PARAMS: usize = 8;

/// Commission change: type, new rate, validator, fee.
pub const COMMISSION_CHANGE_NORMAL_PARAMS: usize = 4;
/// Expert count of the kind above.
pub const COMMISSION_CHANGE_EXPERT_PARAMS: usize = 9;

/// Validator registration: type, address, four keys, two rates, email, fee.
pub const BECOME_VALIDATOR_NORMAL_PARAMS: usize = 10;
/// Expert count of the kind above.
pub const BECOME_VALIDATOR_EXPERT_PARAMS: usize = 15;

/// Account update: type, address, fee.
pub const UPDATE_VP_NORMAL_PARAMS: usize = 3;
/// Expert count of the kind above.
pub const UPDATE_VP_EXPERT_PARAMS: usize = 8;

/// Reactivate, deactivate and unjail: type, validator, fee.
pub const VALIDATOR_ACTION_NORMAL_PARAMS: usize = 3;
/// Expert count of the kind above.
pub const VALIDATOR_ACTION_EXPERT_PARAMS: usize = 8;

/// Redelegation: type, both validators, owner, amount, fee.
pub const REDELEGATE_NORMAL_PARAMS: usize = 6;
/// Expert count of the kind above.
pub const REDELEGATE_EXPERT_PARAMS: usize = 11;

/// Steward resignation: type, steward, fee.
pub const RESIGN_STEWARD_NORMAL_PARAMS: usize = 3;
/// Expert count of the kind above.
pub const RESIGN_STEWARD_EXPERT_PARAMS: usize = 8;

/// Consensus key change: type, new key, validator, fee.
pub const CHANGE_CONSENSUS_KEY_NORMAL_PARAMS: usize = 4;
/// Expert count of the kind above.
pub const CHANGE_CONSENSUS_KEY_EXPERT_PARAMS: usize = 9;

/// Steward commission: type, steward, fee, before entries.
pub const UPDATE_STEWARD_COMMISSION_NORMAL_PARAMS: usize = 3;
/// Expert count of the kind above.
pub const UPDATE_STEWARD_COMMISSION_EXPERT_PARAMS: usize = 8;

/// Metadata change: type, validator, fee.
pub const CHANGE_VALIDATOR_METADATA_NORMAL_PARAMS: usize = 3;
/// Expert count of the kind above.
pub const CHANGE_VALIDATOR_METADATA_EXPERT_PARAMS: usize = 8;

/// Bridge pool transfer: type, kind, sender, recipient, asset, amount, gas payer, gas token, gas amount, fee.
pub const BRIDGE_POOL_TRANSFER_NORMAL_PARAMS: usize = 10;
/// Expert count of the kind above.
pub const BRIDGE_POOL_TRANSFER_EXPERT_PARAMS: usize = 15;

/// IBC: type, port, channel, token, sender, receiver, both timeouts, fee.
pub const IBC_NORMAL_PARAMS: usize = 9;
/// Expert count of the kind above.
pub const IBC_EXPERT_PARAMS: usize = 14;

/// Items always shown for `kind` in `mode`.
pub fn base_item_count(kind: &TxKind, mode: DisplayMode) -> usize {
    let (normal, expert) = match kind {
        TxKind::Bond(_) | TxKind::Unbond(_) => (BOND_NORMAL_PARAMS, BOND_EXPERT_PARAMS),
        TxKind::Custom => (CUSTOM_NORMAL_PARAMS, CUSTOM_EXPERT_PARAMS),
        TxKind::Transfer(transfer) if transfer.is_masp() => {
            (TRANSFER_NORMAL_PARAMS, TRANSFER_MASP_EXPERT_PARAMS)
        }
        TxKind::Transfer(_) => (TRANSFER_NORMAL_PARAMS, TRANSFER_EXPERT_PARAMS),
        TxKind::InitAccount(_) => (INIT_ACCOUNT_NORMAL_PARAMS, INIT_ACCOUNT_EXPERT_PARAMS),
        TxKind::InitProposal(_) => (INIT_PROPOSAL_NORMAL_PARAMS, INIT_PROPOSAL_EXPERT_PARAMS),
        TxKind::VoteProposal(_) => (VOTE_PROPOSAL_NORMAL_PARAMS, VOTE_PROPOSAL_EXPERT_PARAMS),
        TxKind::RevealPubkey(_) => (REVEAL_PUBKEY_NORMAL_PARAMS, REVEAL_PUBKEY_EXPERT_PARAMS),
        TxKind::Withdraw(_) | TxKind::ClaimRewards(_) => {
            (WITHDRAW_NORMAL_PARAMS, WITHDRAW_EXPERT_PARAMS)
        }
        TxKind::CommissionChange(_) => {
            (COMMISSION_CHANGE_NORMAL_PARAMS, COMMISSION_CHANGE_EXPERT_PARAMS)
        }
        TxKind::BecomeValidator(_) => {
            (BECOME_VALIDATOR_NORMAL_PARAMS, BECOME_VALIDATOR_EXPERT_PARAMS)
        }
        TxKind::UpdateVp(_) => (UPDATE_VP_NORMAL_PARAMS, UPDATE_VP_EXPERT_PARAMS),
        TxKind::ReactivateValidator(_)
        | TxKind::DeactivateValidator(_)
        | TxKind::UnjailValidator(_) => {
            (VALIDATOR_ACTION_NORMAL_PARAMS, VALIDATOR_ACTION_EXPERT_PARAMS)
        }
        TxKind::Redelegate(_) => (REDELEGATE_NORMAL_PARAMS, REDELEGATE_EXPERT_PARAMS),
        TxKind::ResignSteward(_) => (RESIGN_STEWARD_NORMAL_PARAMS, RESIGN_STEWARD_EXPERT_PARAMS),
        TxKind::ChangeConsensusKey(_) => {
            (CHANGE_CONSENSUS_KEY_NORMAL_PARAMS, CHANGE_CONSENSUS_KEY_EXPERT_PARAMS)
        }
        TxKind::UpdateStewardCommission(_) => (
            UPDATE_STEWARD_COMMISSION_NORMAL_PARAMS,
            UPDATE_STEWARD_COMMISSION_EXPERT_PARAMS,
        ),
        TxKind::ChangeValidatorMetadata(_) => (
            CHANGE_VALIDATOR_METADATA_NORMAL_PARAMS,
            CHANGE_VALIDATOR_METADATA_EXPERT_PARAMS,
        ),
        TxKind::BridgePoolTransfer(_) => (
            BRIDGE_POOL_TRANSFER_NORMAL_PARAMS,
            BRIDGE_POOL_TRANSFER_EXPERT_PARAMS,
        ),
        TxKind::Ibc(_) => (IBC_NORMAL_PARAMS, IBC_EXPERT_PARAMS),
    };
    if mode.is_expert() {
        expert
    } else {
        normal
    }
}
