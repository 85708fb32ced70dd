//! public transaction descriptors
//!
//! the public part of a shielded transfer: input nullifiers, output
//! commitments, the signed public amount, and the external-data structure
//! describing the transparent value movement. the hidden balance arithmetic
//! lives in the proof

use serde::{Deserialize, Serialize};

use crate::types::{Address, Commitment, FieldElement, MerkleRoot, Nullifier};
use crate::EXT_DATA_DOMAIN;

/// opaque zk proof bytes, consumed by the verifier oracle
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proof(pub Vec<u8>);

/// input nullifier slots, one variant per supported circuit arity
///
/// verification cost must be statically bounded, so variable-length input
/// lists are expressed as a closed set of fixed-size shapes. unused slots
/// carry [`Nullifier::SENTINEL`] and are excluded from spend checks
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputNullifiers {
    Transfer2([Nullifier; 2]),
    Transfer16(Box<[Nullifier; 16]>),
}

impl InputNullifiers {
    /// all slots, sentinel or not, in circuit order
    pub fn slots(&self) -> &[Nullifier] {
        match self {
            Self::Transfer2(slots) => slots.as_slice(),
            Self::Transfer16(slots) => slots.as_slice(),
        }
    }

    /// real (non-sentinel) input nullifiers
    pub fn real(&self) -> impl Iterator<Item = &Nullifier> {
        self.slots().iter().filter(|n| !n.is_sentinel())
    }

    pub fn arity(&self) -> usize {
        self.slots().len()
    }
}

/// public descriptor of one state transition
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionDescriptor {
    /// reference root; must be among the retained recent roots
    pub root: MerkleRoot,
    pub inputs: InputNullifiers,
    /// exactly two output commitments per transaction in this design
    pub outputs: [Commitment; 2],
    /// net public amount: positive = deposit, negative = withdrawal.
    /// equals `ext_data.ext_amount - ext_data.fee`
    pub public_amount: i128,
    /// binds the external data into the proof
    pub ext_data_hash: FieldElement,
}

impl TransactionDescriptor {
    /// public signals in the circuit's bit-exact order:
    /// `[root, public_amount, ext_data_hash, nullifier_1..k, out_commitment_1..2]`
    pub fn public_signals(&self) -> Vec<FieldElement> {
        let mut signals = Vec::with_capacity(3 + self.inputs.arity() + 2);
        signals.push(self.root.0);
        signals.push(FieldElement::from_i128(self.public_amount));
        signals.push(self.ext_data_hash);
        signals.extend(self.inputs.slots().iter().map(|n| n.0));
        signals.extend(self.outputs.iter().map(|c| c.0));
        signals
    }
}

/// transparent side of a transfer: who moves public value, and where
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtData {
    pub recipient: Address,
    pub relayer: Address,
    /// signed transparent amount: positive pulls tokens into the pool,
    /// negative pays `|ext_amount|` out to the recipient
    pub ext_amount: i128,
    /// relayer fee, paid from the pool on top of the shielded debit
    pub fee: u128,
    /// route the payout through the bridge gateway instead of paying locally
    pub is_l1_withdrawal: bool,
    /// output note ciphertexts, carried so recipients can discover their notes
    pub encrypted_output1: Vec<u8>,
    pub encrypted_output2: Vec<u8>,
}

impl ExtData {
    /// hash binding this struct into the proof
    ///
    /// the engine recomputes this independently and compares it against the
    /// descriptor before calling the verifier
    pub fn hash(&self) -> FieldElement {
        let mut hasher = blake3::Hasher::new();
        hasher.update(EXT_DATA_DOMAIN);
        hasher.update(&self.recipient.0);
        hasher.update(&self.relayer.0);
        hasher.update(&self.ext_amount.to_le_bytes());
        hasher.update(&self.fee.to_le_bytes());
        hasher.update(&[self.is_l1_withdrawal as u8]);
        hasher.update(&(self.encrypted_output1.len() as u64).to_le_bytes());
        hasher.update(&self.encrypted_output1);
        hasher.update(&(self.encrypted_output2.len() as u64).to_le_bytes());
        hasher.update(&self.encrypted_output2);
        FieldElement(*hasher.finalize().as_bytes())
    }

    /// net public amount the proof must attest to
    pub fn public_amount(&self) -> i128 {
        self.ext_amount - self.fee as i128
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ext_data(ext_amount: i128, fee: u128) -> ExtData {
        ExtData {
            recipient: Address([1u8; 20]),
            relayer: Address([2u8; 20]),
            ext_amount,
            fee,
            is_l1_withdrawal: false,
            encrypted_output1: vec![0xaa, 0xbb],
            encrypted_output2: vec![0xcc],
        }
    }

    #[test]
    fn real_inputs_exclude_sentinels() {
        let nf = Nullifier(FieldElement([5u8; 32]));
        let inputs = InputNullifiers::Transfer2([nf, Nullifier::SENTINEL]);
        assert_eq!(inputs.arity(), 2);
        assert_eq!(inputs.real().collect::<Vec<_>>(), vec![&nf]);

        let mut slots = [Nullifier::SENTINEL; 16];
        slots[3] = nf;
        let inputs = InputNullifiers::Transfer16(Box::new(slots));
        assert_eq!(inputs.arity(), 16);
        assert_eq!(inputs.real().count(), 1);
    }

    #[test]
    fn public_signal_ordering() {
        let nf1 = Nullifier(FieldElement([5u8; 32]));
        let nf2 = Nullifier(FieldElement([6u8; 32]));
        let c1 = Commitment(FieldElement([7u8; 32]));
        let c2 = Commitment(FieldElement([8u8; 32]));
        let ext = ext_data(-80, 5);

        let descriptor = TransactionDescriptor {
            root: MerkleRoot(FieldElement([9u8; 32])),
            inputs: InputNullifiers::Transfer2([nf1, nf2]),
            outputs: [c1, c2],
            public_amount: ext.public_amount(),
            ext_data_hash: ext.hash(),
        };

        let signals = descriptor.public_signals();
        assert_eq!(signals.len(), 7);
        assert_eq!(signals[0], descriptor.root.0);
        assert_eq!(signals[1], FieldElement::from_i128(-85));
        assert_eq!(signals[2], ext.hash());
        assert_eq!(&signals[3..5], &[nf1.0, nf2.0]);
        assert_eq!(&signals[5..7], &[c1.0, c2.0]);
    }

    #[test]
    fn ext_data_hash_covers_every_field() {
        let base = ext_data(100, 0);
        let mut variants = vec![base.clone()];

        let mut v = base.clone();
        v.recipient = Address([9u8; 20]);
        variants.push(v);

        let mut v = base.clone();
        v.ext_amount = -100;
        variants.push(v);

        let mut v = base.clone();
        v.fee = 1;
        variants.push(v);

        let mut v = base.clone();
        v.is_l1_withdrawal = true;
        variants.push(v);

        let mut v = base.clone();
        v.encrypted_output1 = vec![0xaa, 0xbb, 0x00];
        variants.push(v);

        let hashes: Vec<_> = variants.iter().map(ExtData::hash).collect();
        for i in 0..hashes.len() {
            for j in (i + 1)..hashes.len() {
                assert_ne!(hashes[i], hashes[j]);
            }
        }
    }

    #[test]
    fn ext_data_length_prefix_prevents_ciphertext_sliding() {
        // moving a byte between the two ciphertexts must change the hash
        let mut a = ext_data(0, 0);
        a.encrypted_output1 = vec![1, 2];
        a.encrypted_output2 = vec![3];

        let mut b = ext_data(0, 0);
        b.encrypted_output1 = vec![1];
        b.encrypted_output2 = vec![2, 3];

        assert_ne!(a.hash(), b.hash());
    }
}
