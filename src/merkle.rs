//! merkle accumulator over commitments
//!
//! append-only fixed-height binary tree. insertion recomputes only the path
//! from the new leaf to the root using cached filled subtrees and a
//! precomputed zero-hash chain, so each insert costs `height` hash calls.
//!
//! a bounded rolling window of recent roots is retained so proofs generated
//! slightly out of date relative to the latest insertion still validate;
//! older roots are forgotten to bound storage

use std::collections::{HashSet, VecDeque};

use crate::error::{PoolError, Result};
use crate::oracle::HashOracle;
use crate::types::{Commitment, FieldElement, MerkleRoot};

/// recent roots retained by default
pub const DEFAULT_ROOT_HISTORY: usize = 100;

/// fixed-capacity ring of recent roots plus a membership set for o(1) lookup
struct RootHistory {
    window: usize,
    order: VecDeque<MerkleRoot>,
    known: HashSet<MerkleRoot>,
}

impl RootHistory {
    fn new(window: usize) -> Self {
        assert!(window > 0, "root history window must be non-zero");
        Self {
            window,
            order: VecDeque::with_capacity(window),
            known: HashSet::new(),
        }
    }

    fn push(&mut self, root: MerkleRoot) {
        if self.order.len() == self.window {
            if let Some(evicted) = self.order.pop_front() {
                self.known.remove(&evicted);
            }
        }
        self.order.push_back(root);
        self.known.insert(root);
    }

    fn contains(&self, root: &MerkleRoot) -> bool {
        self.known.contains(root)
    }
}

/// append-only fixed-height accumulator; capacity `2^height` leaves
///
/// leaves are permanent - privacy relies on commitments being
/// indistinguishable after insertion, never removed
pub struct MerkleAccumulator<H: HashOracle> {
    hasher: H,
    height: usize,
    next_index: u64,
    /// left sibling cache per level, for the next insertion path
    filled_subtrees: Vec<FieldElement>,
    /// zeros[i] is the root of an empty subtree of height i
    zeros: Vec<FieldElement>,
    current_root: MerkleRoot,
    history: RootHistory,
}

impl<H: HashOracle> MerkleAccumulator<H> {
    pub fn new(hasher: H, height: usize) -> Self {
        Self::with_root_history(hasher, height, DEFAULT_ROOT_HISTORY)
    }

    pub fn with_root_history(hasher: H, height: usize, window: usize) -> Self {
        assert!(height > 0 && height < 64, "unsupported tree height");

        // the empty-leaf value comes from the injected oracle too, so the
        // whole zero chain is consistent with whatever hash the pool runs on
        let zero_leaf = hasher.hash(&FieldElement::ZERO, &FieldElement::ZERO);
        let mut zeros = Vec::with_capacity(height + 1);
        zeros.push(zero_leaf);
        for level in 0..height {
            let z = zeros[level];
            zeros.push(hasher.hash(&z, &z));
        }

        let filled_subtrees = zeros[..height].to_vec();
        let current_root = MerkleRoot(zeros[height]);
        let mut history = RootHistory::new(window);
        // the empty-tree root is citable by the first transaction
        history.push(current_root);

        Self {
            hasher,
            height,
            next_index: 0,
            filled_subtrees,
            zeros,
            current_root,
            history,
        }
    }

    /// append a commitment at the next leaf index
    ///
    /// recomputes the affected root path, retains the new root in the rolling
    /// history, and returns the assigned index
    pub fn insert(&mut self, commitment: Commitment) -> Result<u64> {
        if self.next_index == self.capacity() {
            return Err(PoolError::CapacityExceeded);
        }

        let index = self.next_index;
        let mut node = commitment.0;
        let mut position = index;

        for level in 0..self.height {
            if position & 1 == 0 {
                // left child: right sibling is still the empty subtree
                self.filled_subtrees[level] = node;
                node = self.hasher.hash(&node, &self.zeros[level]);
            } else {
                node = self.hasher.hash(&self.filled_subtrees[level], &node);
            }
            position >>= 1;
        }

        self.current_root = MerkleRoot(node);
        self.history.push(self.current_root);
        self.next_index += 1;
        Ok(index)
    }

    /// true iff `root` is the current root or any retained historical root
    pub fn is_known_root(&self, root: &MerkleRoot) -> bool {
        self.history.contains(root)
    }

    pub fn current_root(&self) -> MerkleRoot {
        self.current_root
    }

    pub fn leaf_count(&self) -> u64 {
        self.next_index
    }

    pub fn capacity(&self) -> u64 {
        1u64 << self.height
    }

    pub fn height(&self) -> usize {
        self.height
    }
}
