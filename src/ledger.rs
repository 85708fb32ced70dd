//! commitment/nullifier ledger
//!
//! tracks which commitments have been inserted and which nullifiers have been
//! spent. once recorded, a nullifier permanently marks its utxo unspendable
//! and a commitment can never be reinserted.
//!
//! the engine validates every record against this ledger before writing, so
//! a failed transaction leaves both sets untouched

use std::collections::HashSet;

use crate::error::{PoolError, Result};
use crate::types::{Commitment, Nullifier};

#[derive(Debug, Default)]
pub struct Ledger {
    commitments: HashSet<Commitment>,
    nullifiers: HashSet<Nullifier>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// mark a commitment as inserted; rejects reinsertion
    pub fn record_commitment(&mut self, commitment: Commitment) -> Result<()> {
        if !self.commitments.insert(commitment) {
            return Err(PoolError::DuplicateCommitment);
        }
        Ok(())
    }

    /// mark a nullifier as spent; rejects double-spends
    pub fn record_nullifier(&mut self, nullifier: Nullifier) -> Result<()> {
        if !self.nullifiers.insert(nullifier) {
            return Err(PoolError::DoubleSpend);
        }
        Ok(())
    }

    pub fn has_commitment(&self, commitment: &Commitment) -> bool {
        self.commitments.contains(commitment)
    }

    pub fn is_spent(&self, nullifier: &Nullifier) -> bool {
        self.nullifiers.contains(nullifier)
    }

    pub fn commitment_count(&self) -> usize {
        self.commitments.len()
    }

    pub fn nullifier_count(&self) -> usize {
        self.nullifiers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FieldElement;

    #[test]
    fn commitment_recorded_at_most_once() {
        let mut ledger = Ledger::new();
        let c = Commitment(FieldElement([7u8; 32]));

        assert!(!ledger.has_commitment(&c));
        ledger.record_commitment(c).unwrap();
        assert!(ledger.has_commitment(&c));
        assert_eq!(
            ledger.record_commitment(c),
            Err(PoolError::DuplicateCommitment)
        );
        assert_eq!(ledger.commitment_count(), 1);
    }

    #[test]
    fn nullifier_recorded_at_most_once() {
        let mut ledger = Ledger::new();
        let n = Nullifier(FieldElement([9u8; 32]));

        assert!(!ledger.is_spent(&n));
        ledger.record_nullifier(n).unwrap();
        assert!(ledger.is_spent(&n));
        assert_eq!(ledger.record_nullifier(n), Err(PoolError::DoubleSpend));
        assert_eq!(ledger.nullifier_count(), 1);
    }
}
