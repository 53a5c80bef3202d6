//! Transaction builder producing wire-format buffers.

use std::io::{self, Write};

use namview_parser::{
    hash::{ASSET_PERSONALIZATION, COMMITMENT_PERSONALIZATION, MASP_TX_PERSONALIZATION},
    records::{DIVERSIFIER_LEN, EXTENDED_FVK_LEN, MEMO_LEN, MERKLE_NODE_LEN, PAYMENT_ADDR_LEN},
    sections::SALT_LEN,
    types::ADDRESS_LEN,
    Blake2bHasher, DomainHash,
};

use crate::encoding::{
    write_amount, write_fixed, write_length_prefixed, write_option, write_string, write_u32_le,
    write_u64_le, write_u8, write_vec,
};

/// Raw 21 byte address.
pub type RawAddress = [u8; ADDRESS_LEN];

/// 32 byte hash.
pub type RawHash = [u8; 32];

fn hash32(personalization: &[u8; 16], inputs: &[&[u8]]) -> RawHash {
    Blake2bHasher
        .hash32(personalization, inputs)
        .expect("blake2b accepts 32 byte output")
}

/// Commitment hash of inline section content.
pub fn commitment_hash(bytes: &[u8]) -> RawHash {
    hash32(COMMITMENT_PERSONALIZATION, &[bytes])
}

/// Memo attached to the header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Memo {
    /// Memo bytes carried inline.
    Inline(Vec<u8>),
    /// Memo carried elsewhere, referenced by hash.
    Hash(RawHash),
}

impl Memo {
    fn commitment_hash(&self) -> RawHash {
        match self {
            Memo::Inline(bytes) => commitment_hash(bytes),
            Memo::Hash(hash) => *hash,
        }
    }
}

/// One transparent transfer leg.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountLeg {
    /// Account.
    pub owner: RawAddress,
    /// Token.
    pub token: RawAddress,
    /// Raw amount.
    pub amount: u64,
    /// Denomination of `amount`.
    pub denom: u8,
}

impl AccountLeg {
    fn write<W: Write>(&self, mut w: W) -> io::Result<()> {
        write_fixed(&mut w, &self.owner)?;
        write_fixed(&mut w, &self.token)?;
        write_amount(&mut w, self.amount)?;
        write_u8(&mut w, self.denom)
    }
}

/// Entry of the MASP asset table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetEntry {
    /// Token.
    pub token: RawAddress,
    /// Denomination.
    pub denom: u8,
    /// Digit position, 0..=3.
    pub position: u8,
    /// Epoch.
    pub epoch: Option<u64>,
    /// Nonce.
    pub nonce: u8,
}

impl AssetEntry {
    /// Native denomination at position 0.
    pub fn new(token: RawAddress) -> Self {
        Self {
            token,
            denom: 6,
            position: 0,
            epoch: None,
            nonce: 0,
        }
    }

    /// Sets the digit position.
    pub fn position(mut self, position: u8) -> Self {
        self.position = position;
        self
    }

    /// Sets the nonce.
    pub fn nonce(mut self, nonce: u8) -> Self {
        self.nonce = nonce;
        self
    }

    /// Wire encoding.
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&self.token);
        out.push(self.denom);
        out.push(self.position);
        write_option(&mut out, &self.epoch, |w, e| write_u64_le(w, *e)).expect("vec write");
        out.push(self.nonce);
        out
    }

    /// Asset identifier derived from the entry.
    pub fn identifier(&self) -> RawHash {
        let bytes = self.encode();
        let (preimage, nonce) = bytes.split_at(bytes.len() - 1);
        hash32(ASSET_PERSONALIZATION, &[preimage, nonce])
    }
}

/// MASP spend record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpendEntry {
    /// Asset of the spent note.
    pub asset_type: RawHash,
    /// Raw note value.
    pub value: u64,
    /// Merkle path length.
    pub path_len: u8,
    /// Filler for key material.
    pub fill: u8,
}

impl SpendEntry {
    /// Spend with a two node merkle path.
    pub fn new(asset_type: RawHash, value: u64) -> Self {
        Self {
            asset_type,
            value,
            path_len: 2,
            fill: 0x11,
        }
    }

    fn write<W: Write>(&self, mut w: W) -> io::Result<()> {
        w.write_all(&[self.fill; EXTENDED_FVK_LEN])?;
        w.write_all(&[self.fill; DIVERSIFIER_LEN])?;
        write_fixed(&mut w, &self.asset_type)?;
        write_u64_le(&mut w, self.value)?;
        w.write_all(&[self.fill; 64])?;
        write_u8(&mut w, 1)?;
        w.write_all(&[self.fill; 32])?;
        write_u8(&mut w, self.path_len)?;
        for _ in 0..self.path_len {
            w.write_all(&[self.fill; MERKLE_NODE_LEN])?;
        }
        write_u64_le(&mut w, 42)
    }
}

/// MASP output record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputEntry {
    /// Outgoing viewing key.
    pub ovk: Option<RawHash>,
    /// Asset of the created note.
    pub asset_type: RawHash,
    /// Raw note value.
    pub value: u64,
    /// Filler for key material.
    pub fill: u8,
}

impl OutputEntry {
    /// Output without an outgoing viewing key.
    pub fn new(asset_type: RawHash, value: u64) -> Self {
        Self {
            ovk: None,
            asset_type,
            value,
            fill: 0x22,
        }
    }

    fn write<W: Write>(&self, mut w: W) -> io::Result<()> {
        write_u8(&mut w, u8::from(self.ovk.is_some()))?;
        if let Some(ovk) = &self.ovk {
            write_fixed(&mut w, ovk)?;
        }
        w.write_all(&[self.fill; PAYMENT_ADDR_LEN])?;
        write_fixed(&mut w, &self.asset_type)?;
        write_u64_le(&mut w, self.value)?;
        w.write_all(&[self.fill; 32])?;
        w.write_all(&[0u8; MEMO_LEN])
    }
}

/// Shielded part of a transfer: the opaque MASP transaction and its builder metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaspBundle {
    /// Asset table.
    pub assets: Vec<AssetEntry>,
    /// Spend records.
    pub spends: Vec<SpendEntry>,
    /// Output records.
    pub outputs: Vec<OutputEntry>,
    /// Opaque MASP transaction bytes.
    pub masp_tx: Vec<u8>,
    /// Builder target replacing the real hash.
    pub target_override: Option<RawHash>,
}

impl Default for MaspBundle {
    fn default() -> Self {
        Self {
            assets: Vec::new(),
            spends: Vec::new(),
            outputs: Vec::new(),
            masp_tx: b"masp-tx".to_vec(),
            target_override: None,
        }
    }
}

impl MaspBundle {
    /// Adds an asset table entry.
    pub fn asset(mut self, entry: AssetEntry) -> Self {
        self.assets.push(entry);
        self
    }

    /// Adds a spend.
    pub fn spend(mut self, spend: SpendEntry) -> Self {
        self.spends.push(spend);
        self
    }

    /// Adds an output.
    pub fn output(mut self, output: OutputEntry) -> Self {
        self.outputs.push(output);
        self
    }

    /// Hash binding the payload to the MASP transaction.
    pub fn shielded_hash(&self) -> RawHash {
        hash32(MASP_TX_PERSONALIZATION, &[&self.masp_tx])
    }

    fn write_builder<W: Write>(&self, mut w: W) -> io::Result<()> {
        write_fixed(&mut w, &self.target_override.unwrap_or_else(|| self.shielded_hash()))?;
        write_vec(&mut w, &self.assets, |w, a| w.write_all(&a.encode()))?;
        write_vec(&mut w, &self.spends, |w, s| s.write(w))?;
        write_vec(&mut w, &self.outputs, |w, o| o.write(w))
    }
}

#[derive(Debug, Clone)]
enum Payload {
    Raw(Vec<u8>),
    Transfer {
        sources: Vec<AccountLeg>,
        targets: Vec<AccountLeg>,
    },
}

/// Builds a transaction buffer: header, data and code sections, then the optional
/// memo, extra data, MASP and signature sections.
#[derive(Debug, Clone)]
pub struct TxBuilder {
    /// Chain id.
    pub chain_id: String,
    /// Expiration, unix seconds.
    pub expiration: Option<u64>,
    /// Timestamp, unix seconds.
    pub timestamp: u64,
    /// Fee per gas unit, raw.
    pub fee_per_gas: u64,
    /// Fee denomination.
    pub fee_denom: u8,
    /// Fee token.
    pub fee_token: RawAddress,
    /// Ed25519 fee payer key.
    pub fee_payer: [u8; 32],
    /// Gas limit.
    pub gas_limit: u64,
    code_tag: Option<String>,
    payload: Payload,
    memo: Option<Memo>,
    memo_hash_override: Option<RawHash>,
    fee_amount_override: Option<[u8; 32]>,
    extra_code: Vec<RawHash>,
    masp: Option<MaspBundle>,
    signatures: Vec<Vec<u8>>,
}

impl TxBuilder {
    /// Transaction running `code_tag` over `payload`.
    pub fn new(code_tag: &str, payload: Vec<u8>) -> Self {
        Self {
            chain_id: "namada-test.0a1b2c3d".to_string(),
            expiration: None,
            timestamp: 1_700_000_000,
            fee_per_gas: 10,
            fee_denom: 6,
            fee_token: crate::fixtures::native_token(),
            fee_payer: [4; 32],
            gas_limit: 5_000,
            code_tag: Some(code_tag.to_string()),
            payload: Payload::Raw(payload),
            memo: None,
            memo_hash_override: None,
            fee_amount_override: None,
            extra_code: Vec::new(),
            masp: None,
            signatures: Vec::new(),
        }
    }

    /// Transfer; legs are added with [`TxBuilder::source`] and [`TxBuilder::target`].
    pub fn transfer() -> Self {
        Self {
            payload: Payload::Transfer {
                sources: Vec::new(),
                targets: Vec::new(),
            },
            ..Self::new("tx_transfer.wasm", Vec::new())
        }
    }

    /// Bond of `amount` to `validator`.
    pub fn bond(validator: RawAddress, amount: u64, source: Option<RawAddress>) -> Self {
        Self::new("tx_bond.wasm", bond_payload(validator, amount, source))
    }

    /// Unbond of `amount` from `validator`.
    pub fn unbond(validator: RawAddress, amount: u64, source: Option<RawAddress>) -> Self {
        Self::new("tx_unbond.wasm", bond_payload(validator, amount, source))
    }

    /// Code section without a tag, decoded as a custom transaction.
    pub fn custom(payload: Vec<u8>) -> Self {
        Self {
            code_tag: None,
            ..Self::new("", payload)
        }
    }

    /// Adds a transparent source leg at the native denomination.
    pub fn source(mut self, owner: RawAddress, token: RawAddress, amount: u64) -> Self {
        if let Payload::Transfer { sources, .. } = &mut self.payload {
            sources.push(AccountLeg {
                owner,
                token,
                amount,
                denom: 6,
            });
        }
        self
    }

    /// Adds a transparent target leg at the native denomination.
    pub fn target(mut self, owner: RawAddress, token: RawAddress, amount: u64) -> Self {
        if let Payload::Transfer { targets, .. } = &mut self.payload {
            targets.push(AccountLeg {
                owner,
                token,
                amount,
                denom: 6,
            });
        }
        self
    }

    /// Attaches MASP sections; for transfers the payload also carries their hash.
    pub fn masp(mut self, bundle: MaspBundle) -> Self {
        self.masp = Some(bundle);
        self
    }

    /// Sets the memo.
    pub fn memo(mut self, memo: Memo) -> Self {
        self.memo = Some(memo);
        self
    }

    /// Header memo hash pointing at no section.
    pub fn dangling_memo_hash(mut self, hash: RawHash) -> Self {
        self.memo_hash_override = Some(hash);
        self
    }

    /// Adds an extra data section committing to `hash`.
    pub fn extra_code(mut self, hash: RawHash) -> Self {
        self.extra_code.push(hash);
        self
    }

    /// Adds a signature section.
    pub fn signature(mut self, bytes: Vec<u8>) -> Self {
        self.signatures.push(bytes);
        self
    }

    /// Sets the gas limit.
    pub fn gas_limit(mut self, gas_limit: u64) -> Self {
        self.gas_limit = gas_limit;
        self
    }

    /// Sets the fee token.
    pub fn fee_token(mut self, token: RawAddress) -> Self {
        self.fee_token = token;
        self
    }

    /// Writes `bytes` as the per gas fee amount instead of [`TxBuilder::fee_per_gas`].
    pub fn fee_amount_bytes(mut self, bytes: [u8; 32]) -> Self {
        self.fee_amount_override = Some(bytes);
        self
    }

    /// Sets the expiration.
    pub fn expiration(mut self, expiration: u64) -> Self {
        self.expiration = Some(expiration);
        self
    }

    fn payload_bytes(&self) -> io::Result<Vec<u8>> {
        let mut out = Vec::new();
        match &self.payload {
            Payload::Raw(bytes) => out.extend_from_slice(bytes),
            Payload::Transfer { sources, targets } => {
                write_vec(&mut out, sources, |w, leg| leg.write(w))?;
                write_vec(&mut out, targets, |w, leg| leg.write(w))?;
                let shielded = self.masp.as_ref().map(MaspBundle::shielded_hash);
                write_option(&mut out, &shielded, |w, h| write_fixed(w, h))?;
            }
        }
        Ok(out)
    }

    fn memo_hash(&self) -> Option<RawHash> {
        self.memo_hash_override
            .or_else(|| self.memo.as_ref().map(Memo::commitment_hash))
    }

    /// Writes the transaction to `w`.
    pub fn write<W: Write>(&self, mut w: W) -> io::Result<()> {
        write_string(&mut w, &self.chain_id)?;
        write_option(&mut w, &self.expiration, |w, e| write_u64_le(w, *e))?;
        write_u64_le(&mut w, self.timestamp)?;
        write_option(&mut w, &self.memo_hash(), |w, h| write_fixed(w, h))?;
        match &self.fee_amount_override {
            Some(bytes) => write_fixed(&mut w, bytes)?,
            None => write_amount(&mut w, self.fee_per_gas)?,
        }
        write_u8(&mut w, self.fee_denom)?;
        write_fixed(&mut w, &self.fee_token)?;
        write_u8(&mut w, 0)?;
        write_fixed(&mut w, &self.fee_payer)?;
        write_u64_le(&mut w, self.gas_limit)?;

        let count = 2
            + self.extra_code.len()
            + usize::from(self.memo.is_some())
            + if self.masp.is_some() { 2 } else { 0 }
            + self.signatures.len();
        write_u32_le(&mut w, count as u32)?;

        write_u8(&mut w, 0)?;
        w.write_all(&[0u8; SALT_LEN])?;
        write_length_prefixed(&mut w, &self.payload_bytes()?)?;

        write_u8(&mut w, 2)?;
        w.write_all(&[1u8; SALT_LEN])?;
        write_u8(&mut w, 0)?;
        write_fixed(&mut w, &[0xcc; 32])?;
        write_option(&mut w, &self.code_tag, |w, t| write_string(w, t))?;

        for hash in &self.extra_code {
            write_u8(&mut w, 1)?;
            w.write_all(&[2u8; SALT_LEN])?;
            write_u8(&mut w, 0)?;
            write_fixed(&mut w, hash)?;
            write_option(&mut w, &Some("vp.wasm"), |w, t| write_string(w, t))?;
        }

        if let Some(memo) = &self.memo {
            write_u8(&mut w, 1)?;
            w.write_all(&[3u8; SALT_LEN])?;
            match memo {
                Memo::Inline(bytes) => {
                    write_u8(&mut w, 1)?;
                    write_length_prefixed(&mut w, bytes)?;
                }
                Memo::Hash(hash) => {
                    write_u8(&mut w, 0)?;
                    write_fixed(&mut w, hash)?;
                }
            }
            write_u8(&mut w, 0)?;
        }

        if let Some(bundle) = &self.masp {
            write_u8(&mut w, 4)?;
            write_length_prefixed(&mut w, &bundle.masp_tx)?;
            write_u8(&mut w, 5)?;
            bundle.write_builder(&mut w)?;
        }

        for signature in &self.signatures {
            write_u8(&mut w, 3)?;
            write_length_prefixed(&mut w, signature)?;
        }
        Ok(())
    }

    /// Serialized transaction.
    pub fn build(&self) -> Vec<u8> {
        let mut out = Vec::new();
        self.write(&mut out).expect("writing to a vec does not fail");
        out
    }
}

/// Bond and unbond payload.
pub fn bond_payload(validator: RawAddress, amount: u64, source: Option<RawAddress>) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(&validator);
    write_amount(&mut out, amount).expect("vec write");
    write_option(&mut out, &source, |w, s| write_fixed(w, s)).expect("vec write");
    out
}
