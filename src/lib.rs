//! shade-pool: a shielded-value pool
//!
//! users deposit fungible tokens, hold balances as private utxos, transact
//! between shielded balances without revealing amounts or links, and move
//! value across an l1/l2 bridge
//!
//! # architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        SHIELDED POOL                          │
//! ├──────────────────────────────────────────────────────────────┤
//! │                                                               │
//! │  caller ──proof + descriptor──▶ transaction engine            │
//! │                                  ├─ known-root check          │
//! │                                  ├─ nullifier/commitment      │
//! │                                  │  uniqueness (ledger)       │
//! │                                  ├─ policy bounds             │
//! │                                  ├─ proof verifier oracle     │
//! │                                  ├─ merkle accumulator insert │
//! │                                  └─ token movement            │
//! │                                                               │
//! │  l1 relay ──bridged deposit──▶ bridge gateway ──▶ engine      │
//! │  engine ──l1 withdrawal──▶ bridge gateway ──▶ l1 relay        │
//! │                                                               │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! the zk circuits and the field hash gadget are external collaborators,
//! injected as the [`oracle::ProofVerifier`] and [`oracle::HashOracle`]
//! traits. the engine trusts the proof for value conservation and ownership
//! and independently enforces uniqueness, root freshness, and policy bounds.

pub mod bridge;
pub mod engine;
pub mod error;
pub mod ledger;
pub mod merkle;
pub mod oracle;
pub mod policy;
pub mod token;
pub mod transaction;
pub mod types;

pub use bridge::{BridgeGateway, BridgePayload, OutboundMessage};
pub use engine::{PoolEvent, ShieldedPool};
pub use error::{PoolError, Result};
pub use ledger::Ledger;
pub use merkle::MerkleAccumulator;
pub use oracle::{HashOracle, ProofVerifier, StubVerifier, TreeHasher};
pub use policy::PoolPolicy;
pub use token::{InMemoryToken, TokenError, TokenVault};
pub use transaction::{ExtData, InputNullifiers, Proof, TransactionDescriptor};
pub use types::{Address, Commitment, FieldElement, MerkleRoot, Nullifier};

/// domain separator for merkle tree nodes
pub const NODE_DOMAIN: &[u8] = b"shade-pool.merkle-node.v1";
/// domain separator for the external-data hash
pub const EXT_DATA_DOMAIN: &[u8] = b"shade-pool.ext-data.v1";
/// domain separator for proof/public-signal binding
pub const PROOF_BINDING_DOMAIN: &[u8] = b"shade-pool.proof-binding.v1";
