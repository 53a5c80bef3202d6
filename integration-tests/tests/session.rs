//! Sign session and reviewer flows end to end.

use namview_common::{BufferConfig, DisplayConfig, DisplayMode};
use namview_parser::{Blake2bHasher, ErrorKind, ParserError};
use namview_state::{SessionError, SessionState, SignSession};
use namview_testutils::{fixtures, kinds, Memo, TxBuilder};
use namviewdlib::{
    config::ReviewerConfig,
    review::{decode_input, render, review, session_from_config},
};

fn session() -> SignSession<Blake2bHasher> {
    SignSession::new(
        BufferConfig::default(),
        DisplayConfig::default(),
        fixtures::registry(),
        Blake2bHasher,
    )
}

#[test]
fn masp_transfer_through_session() {
    let mut session = session();
    let bytes = fixtures::masp_transfer().build();
    for chunk in bytes.chunks(200) {
        session.append(chunk).unwrap();
    }
    let tx = session.parse().unwrap();
    assert!(tx.is_masp());

    let normal = session.num_items().unwrap();
    session.set_mode(DisplayMode::Expert);
    assert_eq!(session.num_items().unwrap(), normal + 6);
    assert_eq!(session.get_item(normal + 5, 0).unwrap().key, "Fee payer");
}

#[test]
fn truncated_transaction_fails_then_session_recovers() {
    let mut session = session();
    let bytes = fixtures::bond(true).build();
    session.append(&bytes[..bytes.len() - 3]).unwrap();

    let err = session.parse().unwrap_err();
    let SessionError::Parser(parser_error) = &err else {
        panic!("unexpected error {err:?}");
    };
    assert_eq!(parser_error.kind(), ErrorKind::BufferExhausted);
    assert!(!parser_error.description().is_empty());
    assert!(matches!(session.state(), SessionState::Failed(_)));
    assert!(session.get_item(0, 0).is_err());

    session.reset();
    session.append(&bytes).unwrap();
    session.parse().unwrap();
    assert_eq!(session.get_item(0, 0).unwrap().value, "Bond");
}

#[test]
fn transaction_missing_its_last_byte_is_buffer_exhausted() {
    let mut builders = kinds::minimal();
    builders.push(("masp transfer", fixtures::masp_transfer()));
    builders.push((
        "unbond with memo",
        TxBuilder::unbond(fixtures::address(1), 42, None).memo(Memo::Inline(b"hi".to_vec())),
    ));
    builders.push(("init account", kinds::init_account(2)));
    for (name, builder) in builders {
        let bytes = builder.build();
        let mut session = session();
        session.append(&bytes[..bytes.len() - 1]).unwrap();
        let SessionError::Parser(err) = session.parse().unwrap_err() else {
            panic!("{name}: expected a parser error");
        };
        assert_eq!(err.kind(), ErrorKind::BufferExhausted, "{name}: {err:?}");

        session.reset();
        session.append(&bytes).unwrap();
        session.parse().unwrap();
    }
}

#[test]
fn empty_session_parse_is_no_data() {
    let mut session = session();
    assert_eq!(
        session.parse().unwrap_err(),
        SessionError::Parser(ParserError::NoData)
    );
}

#[test]
fn get_item_before_parse_is_invalid_state() {
    let session = session();
    assert!(matches!(
        session.get_item(0, 0).unwrap_err(),
        SessionError::InvalidState {
            operation: "get_item",
            actual: "Empty",
            ..
        }
    ));
}

#[test]
fn reviewer_prints_every_page() {
    let config = ReviewerConfig::default();
    let mut session = session_from_config(&config).unwrap();
    let bytes = TxBuilder::unbond(fixtures::address(9), 2_500_000, Some(fixtures::address(8)))
        .memo(Memo::Inline(b"unbonding for the winter, back in spring with more".to_vec()))
        .build();
    let input = hex::encode(&bytes).into_bytes();

    let items = review(&mut session, &decode_input(&input).unwrap(), 32, DisplayMode::Normal).unwrap();
    let keys: Vec<_> = items.iter().map(|i| i.key.as_str()).collect();
    assert_eq!(keys, ["Type", "Source", "Validator", "Amount", "Memo", "Fee"]);
    assert_eq!(items[3].pages.concat(), "NAM 2.5");
    assert_eq!(items[4].pages.concat(), "unbonding for the winter, back in spring with more");
    assert!(items[4].pages.len() > 1);

    let mut out = Vec::new();
    render(&mut out, &items).unwrap();
    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("[4] Memo (1/"));
    assert!(text.ends_with("[5] Fee: NAM 0.05\n"));
}
