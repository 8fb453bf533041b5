//! Sorted-pair keccak Merkle tree over program storage slots.

use anchor_lang::prelude::*;

use crate::{keccak, Bytes32};

/// Verifies that a `(contract, slot, value)` triple is committed to by a state root.
pub trait StorageVerifier {
    fn verify_storage(
        &self,
        state_root: &Bytes32,
        contract: &Pubkey,
        slot: &Bytes32,
        value: &Bytes32,
        proof: &[Bytes32],
    ) -> bool;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct MerkleVerifier;

impl StorageVerifier for MerkleVerifier {
    fn verify_storage(
        &self,
        state_root: &Bytes32,
        contract: &Pubkey,
        slot: &Bytes32,
        value: &Bytes32,
        proof: &[Bytes32],
    ) -> bool {
        verify(state_root, &storage_leaf(contract, slot, value), proof)
    }
}

/// Storage slot under which a destination portal commits the claimant of an
/// intent hash.
pub fn claimant_slot(intent_hash: &Bytes32) -> Bytes32 {
    keccak([CLAIMANTS_SLOT_SEED, intent_hash.as_ref()])
}

pub const CLAIMANTS_SLOT_SEED: &[u8] = b"claimants";

/// Double-hashed so that a leaf can never be mistaken for an inner node.
pub fn storage_leaf(contract: &Pubkey, slot: &Bytes32, value: &Bytes32) -> Bytes32 {
    let inner = keccak([contract.as_ref(), slot.as_ref(), value.as_ref()]);

    keccak([inner.as_ref()])
}

pub fn hash_pair(a: &Bytes32, b: &Bytes32) -> Bytes32 {
    let (first, second) = if a <= b { (a, b) } else { (b, a) };

    keccak([first.as_ref(), second.as_ref()])
}

pub fn verify(root: &Bytes32, leaf: &Bytes32, proof: &[Bytes32]) -> bool {
    proof
        .iter()
        .fold(*leaf, |hash, sibling| hash_pair(&hash, sibling))
        == *root
}

#[derive(Clone, Debug)]
pub struct MerkleTree {
    layers: Vec<Vec<Bytes32>>,
}

impl MerkleTree {
    /// Leaves are sorted and deduplicated; an odd node is carried up unchanged.
    pub fn new(mut leaves: Vec<Bytes32>) -> Self {
        leaves.sort();
        leaves.dedup();

        let mut layers = vec![leaves];
        while let Some(layer) = layers.last().filter(|layer| layer.len() > 1) {
            let next = layer
                .chunks(2)
                .filter_map(|pair| pair.iter().copied().reduce(|a, b| hash_pair(&a, &b)))
                .collect();

            layers.push(next);
        }

        Self { layers }
    }

    pub fn root(&self) -> Bytes32 {
        self.layers
            .last()
            .and_then(|layer| layer.first())
            .copied()
            .unwrap_or_default()
    }

    pub fn proof(&self, leaf: &Bytes32) -> Option<Vec<Bytes32>> {
        let (_, inner_layers) = self.layers.split_last()?;
        let mut index = self.layers.first()?.binary_search(leaf).ok()?;
        let mut proof = Vec::new();

        for layer in inner_layers {
            if let Some(sibling) = layer.get(index ^ 1) {
                proof.push(*sibling);
            }
            index /= 2;
        }

        Some(proof)
    }
}
