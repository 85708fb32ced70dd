//! core pool types
//!
//! commitments, nullifiers, and roots are opaque elements of the proof
//! system's native field. the pool never opens them - it only enforces
//! uniqueness and membership

use serde::{Deserialize, Serialize};

/// opaque 32-byte element of the proof system's native field
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldElement(pub [u8; 32]);

impl FieldElement {
    pub const ZERO: Self = Self([0u8; 32]);

    pub fn to_bytes(&self) -> [u8; 32] {
        self.0
    }

    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// encode a signed amount as a field element
    ///
    /// two's-complement little-endian, sign-extended to 32 bytes. the
    /// circuit and the engine must agree on this encoding bit-exactly
    pub fn from_i128(v: i128) -> Self {
        let mut bytes = [if v < 0 { 0xff } else { 0 }; 32];
        bytes[..16].copy_from_slice(&v.to_le_bytes());
        Self(bytes)
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }
}

impl core::fmt::Debug for FieldElement {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "FieldElement({})", hex::encode(self.0))
    }
}

impl AsRef<[u8]> for FieldElement {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// public, non-revealing handle for a utxo, inserted into the accumulator
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Commitment(pub FieldElement);

impl Commitment {
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(FieldElement(bytes))
    }
}

/// public, non-revealing handle proving a specific utxo was spent
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Nullifier(pub FieldElement);

impl Nullifier {
    /// marks an unused input slot in a fixed-arity transaction
    pub const SENTINEL: Self = Self(FieldElement::ZERO);

    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(FieldElement(bytes))
    }

    pub fn is_sentinel(&self) -> bool {
        self.0.is_zero()
    }
}

/// accumulator root after some sequence of commitment insertions
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MerkleRoot(pub FieldElement);

impl MerkleRoot {
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(FieldElement(bytes))
    }
}

/// transparent account address (token holders, recipients, relayers)
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Address(pub [u8; 20]);

impl Address {
    pub fn from_bytes(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }
}

impl core::fmt::Debug for Address {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "Address({})", hex::encode(self.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signed_amount_encoding() {
        assert_eq!(FieldElement::from_i128(0), FieldElement::ZERO);

        let pos = FieldElement::from_i128(1000);
        let mut expected = [0u8; 32];
        expected[..16].copy_from_slice(&1000i128.to_le_bytes());
        assert_eq!(pos.to_bytes(), expected);

        // negative amounts sign-extend
        let neg = FieldElement::from_i128(-1);
        assert_eq!(neg.to_bytes(), [0xff; 32]);

        assert_ne!(FieldElement::from_i128(-80), FieldElement::from_i128(80));
    }

    #[test]
    fn sentinel_nullifier() {
        assert!(Nullifier::SENTINEL.is_sentinel());
        assert!(!Nullifier::from_bytes([1u8; 32]).is_sentinel());
    }
}
