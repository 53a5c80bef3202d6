//! One builder per transaction kind.
//!
//! Each builder starts from the smallest payload its kind accepts; arguments switch on
//! the optional fields or repeat the repeated ones.

use std::io::{self, Write};

use crate::{
    builder::{MaspBundle, RawHash, TxBuilder},
    encoding::{write_amount, write_fixed, write_option, write_string, write_u64_le, write_u8, write_vec},
    fixtures::{address, bond, native_token, vote},
};

/// Validity predicate code referenced by account payloads.
pub const VP_CODE_HASH: RawHash = [0x5a; 32];

/// Code attached to a proposal with wasm.
pub const PROPOSAL_CODE_HASH: RawHash = [0x6b; 32];

/// 0.05 as a 12 place decimal.
const FIVE_PERCENT: u64 = 50_000_000_000;

fn payload(f: impl FnOnce(&mut Vec<u8>) -> io::Result<()>) -> Vec<u8> {
    let mut out = Vec::new();
    f(&mut out).expect("writing to a vec does not fail");
    out
}

fn write_ed25519<W: Write>(mut w: W, fill: u8) -> io::Result<()> {
    write_u8(&mut w, 0)?;
    w.write_all(&[fill; 32])
}

fn write_secp256k1<W: Write>(mut w: W, fill: u8) -> io::Result<()> {
    write_u8(&mut w, 1)?;
    write_u8(&mut w, 2)?;
    w.write_all(&[fill; 32])
}

fn write_opt_string<W: Write>(w: W, value: Option<&str>) -> io::Result<()> {
    write_option(w, &value, |w, s| write_string(w, s))
}

/// The first `n` of `values`, the rest `None`.
fn first_n<'a>(values: &[&'a str], n: usize) -> Vec<Option<&'a str>> {
    values
        .iter()
        .enumerate()
        .map(|(i, v)| (i < n).then_some(*v))
        .collect()
}

/// IBC transfer of 1 ATOM, with NFT ids when `nft_ids` is non-empty.
pub fn ibc(nft_ids: &[&str], memo: &str) -> TxBuilder {
    let nft = (!nft_ids.is_empty()).then_some(nft_ids);
    TxBuilder::new(
        "tx_ibc.wasm",
        payload(|mut w| {
            write_string(&mut w, "transfer")?;
            write_string(&mut w, "channel-0")?;
            write_string(&mut w, "transfer/channel-0/uatom")?;
            write_amount(&mut w, 1_000_000)?;
            write_u8(&mut w, 6)?;
            write_string(&mut w, "tnam1qsender")?;
            write_string(&mut w, "cosmos1receiver")?;
            write_u64_le(&mut w, 100)?;
            write_u64_le(&mut w, 1_700_000_000_000_000_000)?;
            write_string(&mut w, memo)?;
            write_option(&mut w, &nft, |w, ids| {
                write_string(&mut *w, "nft-class")?;
                write_vec(&mut *w, *ids, |w, id| write_string(w, id))
            })?;
            write_u8(&mut w, 0)
        }),
    )
}

/// Account creation with `keys` ed25519 keys and threshold 1.
pub fn init_account(keys: u8) -> TxBuilder {
    let fills: Vec<u8> = (0..keys).map(|i| 0x10 + i).collect();
    TxBuilder::new(
        "tx_init_account.wasm",
        payload(|mut w| {
            write_vec(&mut w, &fills, |w, fill| write_ed25519(w, *fill))?;
            write_fixed(&mut w, &VP_CODE_HASH)?;
            write_u8(&mut w, 1)
        }),
    )
    .extra_code(VP_CODE_HASH)
}

fn init_proposal(write_type: impl FnOnce(&mut Vec<u8>) -> io::Result<()>) -> TxBuilder {
    TxBuilder::new(
        "tx_init_proposal.wasm",
        payload(|mut w| {
            write_fixed(&mut w, &[0x11; 32])?;
            write_fixed(&mut w, &address(5))?;
            write_type(&mut *w)?;
            for epoch in [10u64, 20, 30] {
                write_u64_le(&mut w, epoch)?;
            }
            Ok(())
        }),
    )
}

/// Plain proposal.
pub fn init_proposal_default() -> TxBuilder {
    init_proposal(|w| write_u8(w, 0))
}

/// Proposal executing [`PROPOSAL_CODE_HASH`].
pub fn init_proposal_with_wasm() -> TxBuilder {
    init_proposal(|mut w| {
        write_u8(&mut w, 1)?;
        write_fixed(&mut w, &PROPOSAL_CODE_HASH)
    })
    .extra_code(PROPOSAL_CODE_HASH)
}

/// Steward proposal alternating additions and removals.
pub fn init_proposal_stewards(actions: u8) -> TxBuilder {
    let actions: Vec<u8> = (0..actions).collect();
    init_proposal(|mut w| {
        write_u8(&mut w, 2)?;
        write_vec(&mut w, &actions, |mut w, i| {
            write_u8(&mut w, i % 2)?;
            write_fixed(&mut w, &address(0x20 + i))
        })
    })
}

/// Funding proposal with `internal` continuous payments followed by `ibc` retro ones.
pub fn init_proposal_payments(internal: usize, ibc: usize) -> TxBuilder {
    let targets: Vec<bool> = std::iter::repeat(false)
        .take(internal)
        .chain(std::iter::repeat(true).take(ibc))
        .collect();
    init_proposal(|mut w| {
        write_u8(&mut w, 3)?;
        write_vec(&mut w, &targets, |mut w, over_ibc| {
            if *over_ibc {
                write_u8(&mut w, 1)?;
                write_u8(&mut w, 1)?;
                write_string(&mut w, "cosmos1grantee")?;
                write_amount(&mut w, 20_000_000)?;
                write_string(&mut w, "transfer")?;
                write_string(&mut w, "channel-1")
            } else {
                write_u8(&mut w, 0)?;
                write_u8(&mut w, 0)?;
                write_fixed(&mut w, &address(6))?;
                write_amount(&mut w, 10_000_000)
            }
        })
    })
}

/// Public key reveal.
pub fn reveal_pk() -> TxBuilder {
    TxBuilder::new("tx_reveal_pk.wasm", payload(|w| write_ed25519(w, 7)))
}

fn withdraw_like(code_tag: &str, with_source: bool) -> TxBuilder {
    let source = with_source.then(|| address(2));
    TxBuilder::new(
        code_tag,
        payload(|mut w| {
            write_fixed(&mut w, &address(1))?;
            write_option(&mut w, &source, |w, s| write_fixed(w, s))
        }),
    )
}

/// Withdrawal from `address(1)`, optionally by `address(2)`.
pub fn withdraw(with_source: bool) -> TxBuilder {
    withdraw_like("tx_withdraw.wasm", with_source)
}

/// Reward claim from `address(1)`, optionally by `address(2)`.
pub fn claim_rewards(with_source: bool) -> TxBuilder {
    withdraw_like("tx_claim_rewards.wasm", with_source)
}

/// Commission change to 5%.
pub fn commission_change() -> TxBuilder {
    TxBuilder::new(
        "tx_change_validator_commission.wasm",
        payload(|mut w| {
            write_fixed(&mut w, &address(1))?;
            write_amount(&mut w, FIVE_PERCENT)
        }),
    )
}

/// Validator registration with the first `optional` of description, website, discord
/// handle, avatar and name set.
pub fn become_validator(optional: usize) -> TxBuilder {
    let fields = first_n(
        &["validating since genesis", "https://example.org", "val#0001", "https://example.org/a.png", "val"],
        optional,
    );
    TxBuilder::new(
        "tx_become_validator.wasm",
        payload(|mut w| {
            write_fixed(&mut w, &address(1))?;
            write_ed25519(&mut w, 0x31)?;
            write_secp256k1(&mut w, 0x32)?;
            write_secp256k1(&mut w, 0x33)?;
            write_ed25519(&mut w, 0x34)?;
            write_amount(&mut w, FIVE_PERCENT)?;
            write_amount(&mut w, FIVE_PERCENT / 5)?;
            write_string(&mut w, "ops@example.org")?;
            for field in &fields {
                write_opt_string(&mut w, *field)?;
            }
            Ok(())
        }),
    )
}

/// Account update with `keys` new keys and the threshold and code switched on by flag.
pub fn update_vp(keys: u8, threshold: bool, vp_code: bool) -> TxBuilder {
    let fills: Vec<u8> = (0..keys).map(|i| 0x40 + i).collect();
    let code = vp_code.then_some(VP_CODE_HASH);
    let threshold = threshold.then_some(1u8);
    let builder = TxBuilder::new(
        "tx_update_account.wasm",
        payload(|mut w| {
            write_fixed(&mut w, &address(1))?;
            write_option(&mut w, &code, |w, h| write_fixed(w, h))?;
            write_vec(&mut w, &fills, |w, fill| write_ed25519(w, *fill))?;
            write_option(&mut w, &threshold, |w, t| write_u8(w, *t))
        }),
    );
    match code {
        Some(hash) => builder.extra_code(hash),
        None => builder,
    }
}

/// Reactivate, deactivate or unjail `address(1)`, depending on `code_tag`.
pub fn validator_action(code_tag: &str) -> TxBuilder {
    TxBuilder::new(code_tag, address(1).to_vec())
}

/// Redelegation of 3 NAM.
pub fn redelegate() -> TxBuilder {
    TxBuilder::new(
        "tx_redelegate.wasm",
        payload(|mut w| {
            for fill in [1, 2, 3] {
                write_fixed(&mut w, &address(fill))?;
            }
            write_amount(&mut w, 3_000_000)
        }),
    )
}

/// Steward resignation.
pub fn resign_steward() -> TxBuilder {
    TxBuilder::new("tx_resign_steward.wasm", address(4).to_vec())
}

/// Consensus key rotation.
pub fn change_consensus_key() -> TxBuilder {
    TxBuilder::new(
        "tx_change_consensus_key.wasm",
        payload(|mut w| {
            write_ed25519(&mut w, 8)?;
            write_fixed(&mut w, &address(1))
        }),
    )
}

/// Steward reward split over `entries` addresses.
pub fn update_steward_commission(entries: u8) -> TxBuilder {
    let entries: Vec<u8> = (0..entries).collect();
    TxBuilder::new(
        "tx_update_steward_commission.wasm",
        payload(|mut w| {
            write_fixed(&mut w, &address(4))?;
            write_vec(&mut w, &entries, |mut w, i| {
                write_fixed(&mut w, &address(0x30 + i))?;
                write_amount(&mut w, FIVE_PERCENT)
            })
        }),
    )
}

/// Metadata change with the first `optional` of email, description, website, discord
/// handle, avatar, name and commission rate set.
pub fn change_validator_metadata(optional: usize) -> TxBuilder {
    let fields = first_n(
        &["ops@example.org", "new description", "https://example.org", "val#0001", "https://example.org/a.png", "val"],
        optional,
    );
    let rate = (optional > fields.len()).then_some(FIVE_PERCENT);
    TxBuilder::new(
        "tx_change_validator_metadata.wasm",
        payload(|mut w| {
            write_fixed(&mut w, &address(1))?;
            for field in &fields {
                write_opt_string(&mut w, *field)?;
            }
            write_option(&mut w, &rate, |w, r| write_amount(w, *r))
        }),
    )
}

/// ERC20 bridge pool transfer of 7 raw units, gas paid in the native token.
pub fn bridge_pool() -> TxBuilder {
    TxBuilder::new(
        "tx_bridge_pool.wasm",
        payload(|mut w| {
            write_fixed(&mut w, &[0xe1; 20])?;
            write_fixed(&mut w, &[0xe2; 20])?;
            write_fixed(&mut w, &address(1))?;
            write_amount(&mut w, 7)?;
            write_u8(&mut w, 0)?;
            write_amount(&mut w, 1_000)?;
            write_fixed(&mut w, &address(2))?;
            write_fixed(&mut w, &native_token())
        }),
    )
}

/// Every kind whose smallest payload shows only the items the kind always shows.
///
/// Transparent transfers and account creation are missing: they need at least one leg
/// or key.
pub fn minimal() -> Vec<(&'static str, TxBuilder)> {
    vec![
        ("bond", bond(false)),
        ("unbond", TxBuilder::unbond(address(1), 5, None)),
        ("custom", TxBuilder::custom(vec![1, 2, 3])),
        ("shielded transfer", TxBuilder::transfer().masp(MaspBundle::default())),
        ("ibc", ibc(&[], "")),
        ("init proposal", init_proposal_default()),
        ("vote", vote(1, 0)),
        ("reveal pubkey", reveal_pk()),
        ("withdraw", withdraw(false)),
        ("claim rewards", claim_rewards(false)),
        ("commission change", commission_change()),
        ("become validator", become_validator(0)),
        ("update vp", update_vp(0, false, false)),
        ("reactivate validator", validator_action("tx_reactivate_validator.wasm")),
        ("deactivate validator", validator_action("tx_deactivate_validator.wasm")),
        ("unjail validator", validator_action("tx_unjail_validator.wasm")),
        ("redelegate", redelegate()),
        ("resign steward", resign_steward()),
        ("change consensus key", change_consensus_key()),
        ("update steward commission", update_steward_commission(0)),
        ("change validator metadata", change_validator_metadata(0)),
        ("bridge pool", bridge_pool()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use namview_parser::{parse_transaction, Blake2bHasher, TokenRegistry};

    #[test]
    fn every_builder_parses_as_its_kind() {
        let registry = TokenRegistry::default();
        let mut names: Vec<&str> = minimal()
            .iter()
            .map(|(_, builder)| {
                let buffer = builder.build();
                parse_transaction(&buffer, &Blake2bHasher, &registry)
                    .unwrap()
                    .kind
                    .name()
            })
            .collect();
        names.sort_unstable();
        names.dedup();
        // One builder per kind.
        assert_eq!(names.len(), 22);
    }

    #[test]
    fn optional_fields_parse() {
        let registry = TokenRegistry::default();
        for builder in [
            become_validator(5),
            change_validator_metadata(7),
            update_vp(2, true, true),
            init_proposal_with_wasm(),
            init_proposal_stewards(3),
            init_proposal_payments(1, 2),
            ibc(&["a", "b"], "memo"),
            init_account(3),
        ] {
            parse_transaction(&builder.build(), &Blake2bHasher, &registry).unwrap();
        }
    }
}
