//! Item counts of every transaction kind against the per-kind base counts.

use namview_common::{DisplayMode, Network};
use namview_parser::{parse_transaction, types::Address, Blake2bHasher, Transaction};
use namview_state::{count_items, get_item, params::base_item_count, ItemContext};
use namview_testutils::{fixtures, kinds, TxBuilder};

const MODES: [DisplayMode; 2] = [DisplayMode::Normal, DisplayMode::Expert];

/// Normal and expert counts of `builder`'s transaction, every index checked to resolve.
fn item_counts(builder: &TxBuilder) -> ([usize; 2], Transaction) {
    let registry = fixtures::registry();
    let buffer = builder.build();
    let tx = parse_transaction(&buffer, &Blake2bHasher, &registry).expect("fixture parses");
    let counts = MODES.map(|mode| {
        let ctx = ItemContext {
            buffer: &buffer,
            hasher: &Blake2bHasher,
            registry: &registry,
            mode,
            value_width: 40,
        };
        let count = count_items(&tx, &ctx).unwrap();
        for index in 0..count {
            get_item(&tx, &ctx, index, 0).unwrap();
        }
        count
    });
    (counts, tx)
}

/// Base counts of the kind plus `normal` / `expert` extra items.
fn base_plus(tx: &Transaction, normal: usize, expert: usize) -> [usize; 2] {
    [
        base_item_count(&tx.kind, DisplayMode::Normal) + normal,
        base_item_count(&tx.kind, DisplayMode::Expert) + expert,
    ]
}

fn assert_extra(builder: TxBuilder, extra: usize, label: &str) {
    let (counts, tx) = item_counts(&builder);
    assert_eq!(counts, base_plus(&tx, extra, extra), "{label}");
}

/// Full `(key, value)` list at a width wide enough for one page per item.
fn items(builder: &TxBuilder, mode: DisplayMode) -> Vec<(String, String)> {
    let registry = fixtures::registry();
    let buffer = builder.build();
    let tx = parse_transaction(&buffer, &Blake2bHasher, &registry).unwrap();
    let ctx = ItemContext {
        buffer: &buffer,
        hasher: &Blake2bHasher,
        registry: &registry,
        mode,
        value_width: 4096,
    };
    (0..count_items(&tx, &ctx).unwrap())
        .map(|index| {
            let item = get_item(&tx, &ctx, index, 0).unwrap();
            (item.key, item.value)
        })
        .collect()
}

#[test]
fn smallest_payloads_show_the_base_items() {
    for (name, builder) in kinds::minimal() {
        let (counts, tx) = item_counts(&builder);
        assert_eq!(counts, base_plus(&tx, 0, 0), "{name}");
        assert_eq!(counts[1], counts[0] + if tx.is_masp() { 6 } else { 5 }, "{name}");
    }
}

#[test]
fn optional_fields_add_one_item_each() {
    for optional in 0..=5 {
        assert_extra(kinds::become_validator(optional), optional, "become validator");
    }
    for optional in 0..=7 {
        assert_extra(
            kinds::change_validator_metadata(optional),
            optional,
            "change validator metadata",
        );
    }
    assert_extra(kinds::update_vp(0, true, false), 1, "update vp threshold");
    assert_extra(kinds::update_vp(0, false, true), 1, "update vp code");
    assert_extra(kinds::update_vp(0, true, true), 2, "update vp threshold and code");
    assert_extra(kinds::withdraw(true), 1, "withdraw source");
    assert_extra(kinds::claim_rewards(true), 1, "claim rewards source");
    assert_extra(fixtures::bond(true), 1, "bond source");
}

#[test]
fn repeated_fields_add_items_per_entry() {
    for keys in 1..=3u8 {
        assert_extra(kinds::init_account(keys), usize::from(keys), "init account keys");
        assert_extra(kinds::update_vp(keys, false, false), usize::from(keys), "update vp keys");
    }
    assert_extra(kinds::init_proposal_with_wasm(), 1, "proposal code");
    for actions in 0..=3u8 {
        assert_extra(
            kinds::init_proposal_stewards(actions),
            usize::from(actions),
            "steward actions",
        );
    }
    for (internal, ibc) in [(1, 0), (0, 1), (2, 1), (1, 3)] {
        assert_extra(
            kinds::init_proposal_payments(internal, ibc),
            3 * internal + 5 * ibc,
            "payments",
        );
    }
    for entries in 0..=3u8 {
        assert_extra(
            kinds::update_steward_commission(entries),
            2 * usize::from(entries),
            "steward commission",
        );
    }
    assert_extra(kinds::ibc(&["a", "b", "c"], ""), 3, "ibc nft ids");
}

#[test]
fn ibc_memo_is_expert_only() {
    let (counts, tx) = item_counts(&kinds::ibc(&[], "forward to osmosis"));
    assert_eq!(counts, base_plus(&tx, 0, 1));

    let expert = items(&kinds::ibc(&[], "forward to osmosis"), DisplayMode::Expert);
    assert!(expert.contains(&("IBC memo".to_string(), "forward to osmosis".to_string())));
}

#[test]
fn transparent_transfer_legs_add_items() {
    let one_leg_each = TxBuilder::transfer()
        .source(fixtures::address(1), fixtures::native_token(), 1)
        .target(fixtures::address(2), fixtures::native_token(), 1);
    assert_extra(one_leg_each, 4, "resolved legs");

    let unresolved_target = TxBuilder::transfer()
        .source(fixtures::address(1), fixtures::native_token(), 1)
        .target(fixtures::address(2), fixtures::address(0x77), 1);
    assert_extra(unresolved_target, 5, "unresolved target token");
}

#[test]
fn pgf_payment_items() {
    let author = Address::from_bytes(fixtures::address(5)).unwrap();
    let target = Address::from_bytes(fixtures::address(6)).unwrap();
    let keys_values = items(&kinds::init_proposal_payments(1, 1), DisplayMode::Normal);
    let expected: Vec<(&str, String)> = vec![
        ("Type", "Init Proposal".into()),
        ("Proposal type", "PGF Payment".into()),
        ("Payment type", "Continuous".into()),
        ("Target", target.encode(Network::Testnet)),
        ("Amount", "NAM 10.0".into()),
        ("Payment type", "Retro".into()),
        ("Target", "cosmos1grantee".into()),
        ("Amount", "NAM 20.0".into()),
        ("Port", "transfer".into()),
        ("Channel", "channel-1".into()),
        ("Author", author.encode(Network::Testnet)),
        ("Voting start epoch", "10".into()),
        ("Voting end epoch", "20".into()),
        ("Activation epoch", "30".into()),
        ("Content", hex::encode([0x11; 32])),
        ("Fee", "NAM 0.05".into()),
    ];
    let expected: Vec<(String, String)> = expected
        .into_iter()
        .map(|(key, value)| (key.to_string(), value))
        .collect();
    assert_eq!(keys_values, expected);
}

#[test]
fn bridge_pool_items() {
    let items = items(&kinds::bridge_pool(), DisplayMode::Normal);
    let keys: Vec<&str> = items.iter().map(|(key, _)| key.as_str()).collect();
    assert_eq!(
        keys,
        [
            "Type",
            "Transfer kind",
            "Sender",
            "Recipient",
            "Asset",
            "Amount",
            "Gas payer",
            "Gas token",
            "Gas amount",
            "Fee"
        ]
    );
    assert_eq!(items[1].1, "ERC20");
    assert_eq!(items[3].1, format!("0x{}", "e2".repeat(20)));
    assert_eq!(items[5].1, "7");
    assert_eq!(items[8].1, "0.001");
}

#[test]
fn become_validator_items() {
    let items = items(&kinds::become_validator(5), DisplayMode::Normal);
    let keys: Vec<&str> = items.iter().map(|(key, _)| key.as_str()).collect();
    assert_eq!(
        keys,
        [
            "Type",
            "Address",
            "Consensus key",
            "Ethereum cold key",
            "Ethereum hot key",
            "Protocol key",
            "Commission rate",
            "Maximum commission rate change",
            "Email",
            "Description",
            "Website",
            "Discord handle",
            "Avatar",
            "Name",
            "Fee"
        ]
    );
    assert_eq!(items[6].1, "0.05");
    assert_eq!(items[7].1, "0.01");
}
