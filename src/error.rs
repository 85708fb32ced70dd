//! error types for the shielded pool

use thiserror::Error;

use crate::token::TokenError;

/// every failure aborts the whole state transition with no observable side
/// effect - there is no partial nullifier recording or tree insertion
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum PoolError {
    /// the accumulator is full; the pool accepts no further commitments
    #[error("merkle accumulator capacity exceeded")]
    CapacityExceeded,

    /// the reference root is stale or forged; refresh and retry
    #[error("unknown merkle root")]
    UnknownRoot,

    /// an input nullifier was already recorded
    #[error("nullifier already spent")]
    DoubleSpend,

    /// an output commitment was already inserted
    #[error("commitment already inserted")]
    DuplicateCommitment,

    /// proof rejected, or public signals inconsistent with the descriptor
    #[error("invalid transaction proof")]
    InvalidProof,

    /// deposit exceeds the configured maximum
    #[error("deposit above maximum deposit amount")]
    DepositTooLarge,

    /// withdrawal magnitude below the configured minimum
    #[error("withdrawal below minimum withdrawal amount")]
    WithdrawalTooSmall,

    /// a bridged deposit for this (source block, amount) was already applied
    #[error("duplicate bridge event")]
    DuplicateBridgeEvent,

    /// bridge payload failed to decode or disagrees with the bridged amount
    #[error("malformed bridge payload: {0}")]
    MalformedPayload(String),

    #[error("token transfer failed: {0}")]
    Token(#[from] TokenError),
}

pub type Result<T> = std::result::Result<T, PoolError>;
