//! per-pool transaction policy

use serde::{Deserialize, Serialize};

/// bounds checked on every transaction's transparent amount
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolPolicy {
    /// withdrawals below this magnitude are rejected
    pub minimum_withdrawal_amount: u128,
    /// deposits above this are rejected
    pub maximum_deposit_amount: u128,
    /// chain id of the l1 the bridge gateway talks to
    pub l1_chain_id: u64,
}

impl PoolPolicy {
    pub fn new(
        minimum_withdrawal_amount: u128,
        maximum_deposit_amount: u128,
        l1_chain_id: u64,
    ) -> Self {
        Self {
            minimum_withdrawal_amount,
            maximum_deposit_amount,
            l1_chain_id,
        }
    }
}
