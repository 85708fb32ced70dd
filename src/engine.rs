//! transaction engine
//!
//! orchestrates one state transition: validates proof + public inputs against
//! the ledger and tree, updates ledger/tree, and moves tokens for the
//! transparent amount component.
//!
//! every failure is an immediate rejection of the whole transition. all
//! validation happens before the first write, so a rejected transaction
//! leaves no observable side effect - the system's core safety property,
//! since a partial application would let an attacker insert an output
//! without spending the matching input or vice versa

use tracing::{debug, info};

use crate::bridge::{BridgeGateway, BridgePayload, OutboundMessage};
use crate::error::{PoolError, Result};
use crate::ledger::Ledger;
use crate::merkle::MerkleAccumulator;
use crate::oracle::{HashOracle, ProofVerifier};
use crate::policy::PoolPolicy;
use crate::token::{TokenError, TokenVault};
use crate::transaction::{ExtData, InputNullifiers, Proof, TransactionDescriptor};
use crate::types::{Address, Commitment, MerkleRoot, Nullifier};

/// emitted once per applied transaction, scanned by wallets to discover notes
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PoolEvent {
    NewCommitment {
        commitment: Commitment,
        leaf_index: u64,
        encrypted_output: Vec<u8>,
    },
    NewNullifier {
        nullifier: Nullifier,
    },
}

/// where the transparent deposit amount comes from
enum Funding<'a> {
    /// pulled from the caller through the token contract
    Direct(&'a Address),
    /// already moved into the pool by the l1 relay
    Bridged,
}

/// the pool's entire mutable state as one owned aggregate
///
/// the execution environment serializes calls; within one call the
/// validate-then-commit ordering below makes every transition atomic
pub struct ShieldedPool<H: HashOracle, V: ProofVerifier> {
    tree: MerkleAccumulator<H>,
    ledger: Ledger,
    policy: PoolPolicy,
    verifier: V,
    gateway: BridgeGateway,
    events: Vec<PoolEvent>,
}

impl<H: HashOracle, V: ProofVerifier> ShieldedPool<H, V> {
    pub fn new(
        hasher: H,
        verifier: V,
        tree_height: usize,
        policy: PoolPolicy,
        bridge_account: Address,
    ) -> Self {
        Self {
            tree: MerkleAccumulator::new(hasher, tree_height),
            ledger: Ledger::new(),
            policy,
            verifier,
            gateway: BridgeGateway::new(bridge_account),
            events: Vec::new(),
        }
    }

    /// like [`Self::new`] but with a custom recent-root retention window
    pub fn with_root_history(
        hasher: H,
        verifier: V,
        tree_height: usize,
        root_history: usize,
        policy: PoolPolicy,
        bridge_account: Address,
    ) -> Self {
        Self {
            tree: MerkleAccumulator::with_root_history(hasher, tree_height, root_history),
            ledger: Ledger::new(),
            policy,
            verifier,
            gateway: BridgeGateway::new(bridge_account),
            events: Vec::new(),
        }
    }

    /// apply one shielded transaction submitted directly by `caller`
    ///
    /// positive transparent amounts are pulled from the caller; negative ones
    /// are paid out to `ext_data.recipient`, locally or via the bridge
    pub fn apply_transaction(
        &mut self,
        token: &mut dyn TokenVault,
        caller: &Address,
        descriptor: &TransactionDescriptor,
        ext_data: &ExtData,
        proof: &Proof,
    ) -> Result<()> {
        self.transact(token, Funding::Direct(caller), descriptor, ext_data, proof)
    }

    /// apply a deposit relayed from l1
    ///
    /// the relay has already moved `amount` tokens into the pool, so no
    /// transparent pull happens here; everything else is validated exactly
    /// like a direct deposit. the (source block, amount) replay guard is
    /// updated only on success
    pub fn on_bridged_deposit(
        &mut self,
        token: &mut dyn TokenVault,
        amount: u128,
        source_block: u64,
        payload: &[u8],
    ) -> Result<()> {
        self.gateway.check_inbound(source_block, amount)?;

        let payload = BridgePayload::decode(payload)?;
        let amount_signed = i128::try_from(amount)
            .map_err(|_| PoolError::MalformedPayload(format!("bridged amount {amount} overflows")))?;
        if payload.ext_data.ext_amount != amount_signed {
            return Err(PoolError::MalformedPayload(format!(
                "bridged amount {} disagrees with payload ext_amount {}",
                amount, payload.ext_data.ext_amount
            )));
        }

        self.transact(
            token,
            Funding::Bridged,
            &payload.descriptor,
            &payload.ext_data,
            &payload.proof,
        )?;
        self.gateway.mark_inbound(source_block, amount);
        debug!(source_block, amount, "bridged deposit applied");
        Ok(())
    }

    fn transact(
        &mut self,
        token: &mut dyn TokenVault,
        funding: Funding<'_>,
        descriptor: &TransactionDescriptor,
        ext_data: &ExtData,
        proof: &Proof,
    ) -> Result<()> {
        // reference root must be recent enough
        if !self.tree.is_known_root(&descriptor.root) {
            return Err(PoolError::UnknownRoot);
        }

        // no real input may be spent already, or repeated within this
        // transaction
        let real_inputs: Vec<Nullifier> = descriptor.inputs.real().copied().collect();
        for (i, nf) in real_inputs.iter().enumerate() {
            if self.ledger.is_spent(nf) || real_inputs[..i].contains(nf) {
                return Err(PoolError::DoubleSpend);
            }
        }

        // outputs must be fresh and distinct
        for commitment in &descriptor.outputs {
            if self.ledger.has_commitment(commitment) {
                return Err(PoolError::DuplicateCommitment);
            }
        }
        if descriptor.outputs[0] == descriptor.outputs[1] {
            return Err(PoolError::DuplicateCommitment);
        }

        // policy bounds, checked before the expensive proof verification
        let ext_amount = ext_data.ext_amount;
        if ext_amount > 0 && ext_amount as u128 > self.policy.maximum_deposit_amount {
            return Err(PoolError::DepositTooLarge);
        }
        if ext_amount < 0 && ext_amount.unsigned_abs() < self.policy.minimum_withdrawal_amount {
            return Err(PoolError::WithdrawalTooSmall);
        }

        // the descriptor's public signals must be the ones this ext data
        // produces; recomputing the hash here binds the transparent movement
        // into the proof independently of the prover
        if descriptor.public_amount != ext_data.public_amount()
            || descriptor.ext_data_hash != ext_data.hash()
        {
            return Err(PoolError::InvalidProof);
        }

        // sole source of truth for value conservation and ownership
        let signals = descriptor.public_signals();
        let verified = match &descriptor.inputs {
            InputNullifiers::Transfer2(_) => self.verifier.verify_transfer2(proof, &signals),
            InputNullifiers::Transfer16(_) => self.verifier.verify_transfer16(proof, &signals),
        };
        if !verified {
            return Err(PoolError::InvalidProof);
        }

        // both outputs must fit before anything is written
        if self.tree.leaf_count() + descriptor.outputs.len() as u64 > self.tree.capacity() {
            return Err(PoolError::CapacityExceeded);
        }

        // transparent movement plan; outgoing legs are prechecked so the
        // payouts after the ledger commit cannot fail
        let incoming = if ext_amount > 0 { ext_amount as u128 } else { 0 };
        let payout = if ext_amount < 0 { ext_amount.unsigned_abs() } else { 0 };
        let outgoing = payout + ext_data.fee;
        if outgoing > token.pool_balance() + incoming {
            return Err(PoolError::Token(TokenError::InsufficientBalance {
                needed: outgoing,
                available: token.pool_balance() + incoming,
            }));
        }

        if incoming > 0 {
            match funding {
                Funding::Direct(caller) => token.transfer_in(caller, incoming)?,
                Funding::Bridged => {}
            }
        }

        // commit: validated above, so none of these writes can fail and the
        // ledger and tree never diverge
        for nf in &real_inputs {
            self.ledger.record_nullifier(*nf)?;
            self.events.push(PoolEvent::NewNullifier { nullifier: *nf });
        }
        let ciphertexts = [&ext_data.encrypted_output1, &ext_data.encrypted_output2];
        for (commitment, ciphertext) in descriptor.outputs.iter().zip(ciphertexts) {
            self.ledger.record_commitment(*commitment)?;
            let leaf_index = self.tree.insert(*commitment)?;
            self.events.push(PoolEvent::NewCommitment {
                commitment: *commitment,
                leaf_index,
                encrypted_output: ciphertext.clone(),
            });
        }

        if payout > 0 {
            if ext_data.is_l1_withdrawal {
                token.transfer_out(&self.gateway.bridge_account(), payout)?;
                self.gateway.send_to_l1(ext_data.recipient, payout);
            } else {
                token.transfer_out(&ext_data.recipient, payout)?;
            }
        }
        if ext_data.fee > 0 {
            token.transfer_out(&ext_data.relayer, ext_data.fee)?;
        }

        info!(
            ext_amount,
            fee = ext_data.fee,
            inputs = real_inputs.len(),
            leaf_count = self.tree.leaf_count(),
            l1_withdrawal = ext_data.is_l1_withdrawal,
            "transaction applied"
        );
        Ok(())
    }

    // read endpoints for clients constructing proofs and for auditors

    pub fn is_known_root(&self, root: &MerkleRoot) -> bool {
        self.tree.is_known_root(root)
    }

    pub fn is_spent(&self, nullifier: &Nullifier) -> bool {
        self.ledger.is_spent(nullifier)
    }

    pub fn current_root(&self) -> MerkleRoot {
        self.tree.current_root()
    }

    pub fn leaf_count(&self) -> u64 {
        self.tree.leaf_count()
    }

    pub fn policy(&self) -> &PoolPolicy {
        &self.policy
    }

    pub fn bridge_account(&self) -> Address {
        self.gateway.bridge_account()
    }

    /// withdrawals queued for the l1 relay
    pub fn outbound_messages(&self) -> &[OutboundMessage] {
        self.gateway.outbound_messages()
    }

    /// applied-transaction event log, in application order
    pub fn events(&self) -> &[PoolEvent] {
        &self.events
    }
}
