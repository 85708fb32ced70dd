//! token movement interface
//!
//! the pool moves transparent value through a standard fungible-token
//! contract. that contract lives outside this crate; the trait below is the
//! seam, and an in-memory implementation ships for tests and demos

use std::collections::HashMap;

use thiserror::Error;

use crate::types::Address;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("insufficient balance: needed {needed}, available {available}")]
    InsufficientBalance { needed: u128, available: u128 },
}

/// fungible-token movement from the pool's point of view
///
/// failures propagate as transaction failure
pub trait TokenVault {
    /// pull tokens from `from` into the pool
    fn transfer_in(&mut self, from: &Address, amount: u128) -> Result<(), TokenError>;

    /// push tokens from the pool to `to`
    fn transfer_out(&mut self, to: &Address, amount: u128) -> Result<(), TokenError>;

    fn balance_of(&self, who: &Address) -> u128;

    fn pool_balance(&self) -> u128;
}

/// in-memory fungible token with a designated pool account
#[derive(Clone, Debug)]
pub struct InMemoryToken {
    pool: Address,
    balances: HashMap<Address, u128>,
}

impl InMemoryToken {
    pub fn new(pool: Address) -> Self {
        Self {
            pool,
            balances: HashMap::new(),
        }
    }

    pub fn pool_account(&self) -> Address {
        self.pool
    }

    pub fn mint(&mut self, to: &Address, amount: u128) {
        *self.balances.entry(*to).or_default() += amount;
    }

    /// plain transfer between two accounts (test setup, relay simulation)
    pub fn transfer(&mut self, from: &Address, to: &Address, amount: u128) -> Result<(), TokenError> {
        let available = self.balance_of(from);
        if available < amount {
            return Err(TokenError::InsufficientBalance {
                needed: amount,
                available,
            });
        }
        *self.balances.entry(*from).or_default() -= amount;
        *self.balances.entry(*to).or_default() += amount;
        Ok(())
    }
}

impl TokenVault for InMemoryToken {
    fn transfer_in(&mut self, from: &Address, amount: u128) -> Result<(), TokenError> {
        let pool = self.pool;
        self.transfer(from, &pool, amount)
    }

    fn transfer_out(&mut self, to: &Address, amount: u128) -> Result<(), TokenError> {
        let pool = self.pool;
        self.transfer(&pool, to, amount)
    }

    fn balance_of(&self, who: &Address) -> u128 {
        self.balances.get(who).copied().unwrap_or(0)
    }

    fn pool_balance(&self) -> u128 {
        self.balance_of(&self.pool)
    }
}
