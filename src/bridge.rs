//! bridge gateway
//!
//! relays value between this pool's domain and the l1 settlement domain.
//! inbound: the l1 relay delivers a token amount plus an encoded transaction
//! payload destined for the engine. outbound: cross-domain withdrawals are
//! packaged as messages for the relay; delivery is eventually-consistent and
//! local ledger state is final regardless of delivery outcome

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{PoolError, Result};
use crate::transaction::{ExtData, Proof, TransactionDescriptor};
use crate::types::Address;

/// proof + descriptor as carried across the bridge
///
/// encode/decode must round-trip losslessly; the exact wire bytes are
/// otherwise the relay's business
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgePayload {
    pub descriptor: TransactionDescriptor,
    pub ext_data: ExtData,
    pub proof: Proof,
}

impl BridgePayload {
    pub fn encode(&self) -> Result<Vec<u8>> {
        bincode::serialize(self).map_err(|e| PoolError::MalformedPayload(e.to_string()))
    }

    pub fn decode(bytes: &[u8]) -> Result<Self> {
        bincode::deserialize(bytes).map_err(|e| PoolError::MalformedPayload(e.to_string()))
    }
}

/// withdrawal handed to the relay for delivery on l1
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundMessage {
    pub recipient: Address,
    pub amount: u128,
}

/// tracks the bridge's local state: the l1-side escrow account, the
/// same-block inbound replay guard, and the outbound message queue
#[derive(Debug)]
pub struct BridgeGateway {
    bridge_account: Address,
    /// source block of the deposits in `current_block_amounts`
    current_block: Option<u64>,
    /// amounts already applied within `current_block`; cleared when the
    /// source block advances
    current_block_amounts: HashSet<u128>,
    outbound: Vec<OutboundMessage>,
}

impl BridgeGateway {
    pub fn new(bridge_account: Address) -> Self {
        Self {
            bridge_account,
            current_block: None,
            current_block_amounts: HashSet::new(),
            outbound: Vec::new(),
        }
    }

    /// account tokens are parked in while awaiting relay delivery to l1
    pub fn bridge_account(&self) -> Address {
        self.bridge_account
    }

    /// reject a second deposit notification for the same amount within the
    /// same source block (relay replay/duplication race), regardless of any
    /// other deposits applied in between
    pub fn check_inbound(&self, source_block: u64, amount: u128) -> Result<()> {
        if self.current_block == Some(source_block) && self.current_block_amounts.contains(&amount)
        {
            return Err(PoolError::DuplicateBridgeEvent);
        }
        Ok(())
    }

    /// record a successfully applied inbound deposit
    pub fn mark_inbound(&mut self, source_block: u64, amount: u128) {
        if self.current_block != Some(source_block) {
            self.current_block = Some(source_block);
            self.current_block_amounts.clear();
        }
        self.current_block_amounts.insert(amount);
    }

    /// queue a withdrawal for the l1 relay
    pub fn send_to_l1(&mut self, recipient: Address, amount: u128) {
        self.outbound.push(OutboundMessage { recipient, amount });
    }

    pub fn outbound_messages(&self) -> &[OutboundMessage] {
        &self.outbound
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transaction::InputNullifiers;
    use crate::types::{Commitment, FieldElement, MerkleRoot, Nullifier};

    #[test]
    fn payload_round_trips() {
        let ext_data = ExtData {
            recipient: Address([1u8; 20]),
            relayer: Address([0u8; 20]),
            ext_amount: 100,
            fee: 0,
            is_l1_withdrawal: false,
            encrypted_output1: vec![1, 2, 3],
            encrypted_output2: vec![],
        };
        let payload = BridgePayload {
            descriptor: TransactionDescriptor {
                root: MerkleRoot(FieldElement([4u8; 32])),
                inputs: InputNullifiers::Transfer2([
                    Nullifier::SENTINEL,
                    Nullifier(FieldElement([5u8; 32])),
                ]),
                outputs: [
                    Commitment(FieldElement([6u8; 32])),
                    Commitment(FieldElement([7u8; 32])),
                ],
                public_amount: 100,
                ext_data_hash: ext_data.hash(),
            },
            ext_data,
            proof: Proof(vec![9u8; 64]),
        };

        let bytes = payload.encode().unwrap();
        assert_eq!(BridgePayload::decode(&bytes).unwrap(), payload);
    }

    #[test]
    fn decode_rejects_garbage() {
        assert!(matches!(
            BridgePayload::decode(&[0xde, 0xad]),
            Err(PoolError::MalformedPayload(_))
        ));
    }

    #[test]
    fn inbound_guard_rejects_same_block_same_amount() {
        let mut gateway = BridgeGateway::new(Address([8u8; 20]));
        gateway.check_inbound(10, 100).unwrap();
        gateway.mark_inbound(10, 100);

        assert_eq!(
            gateway.check_inbound(10, 100),
            Err(PoolError::DuplicateBridgeEvent)
        );
        // different amount or later block passes
        gateway.check_inbound(10, 101).unwrap();
        gateway.check_inbound(11, 100).unwrap();
    }

    #[test]
    fn inbound_guard_survives_interleaved_deposit() {
        let mut gateway = BridgeGateway::new(Address([8u8; 20]));
        gateway.mark_inbound(7, 100);
        gateway.mark_inbound(7, 200);

        // every amount seen in the block stays guarded, not just the latest
        assert_eq!(
            gateway.check_inbound(7, 100),
            Err(PoolError::DuplicateBridgeEvent)
        );
        assert_eq!(
            gateway.check_inbound(7, 200),
            Err(PoolError::DuplicateBridgeEvent)
        );

        // advancing the source block clears the window
        gateway.mark_inbound(8, 300);
        gateway.check_inbound(8, 100).unwrap();
        assert_eq!(
            gateway.check_inbound(8, 300),
            Err(PoolError::DuplicateBridgeEvent)
        );
    }

    #[test]
    fn outbound_queue_accumulates() {
        let mut gateway = BridgeGateway::new(Address([8u8; 20]));
        gateway.send_to_l1(Address([1u8; 20]), 70);
        assert_eq!(
            gateway.outbound_messages(),
            &[OutboundMessage {
                recipient: Address([1u8; 20]),
                amount: 70
            }]
        );
    }
}
