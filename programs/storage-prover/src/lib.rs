//! # Storage Prover
//!
//! Proves intents without any messaging layer. A trusted root oracle posts
//! finalized state roots of destination chains; anyone can then prove a
//! fulfillment by showing that the destination portal's claimant slot for
//! the intent holds the claimant under one of those roots.
//!
//! ## Flow
//!
//! 1. A solver fulfills the intent on the destination chain. The destination
//!    portal stores the claimant under `keccak256("claimants" ++ intent_hash)`.
//! 2. The root oracle calls `submit_state_root` once the destination block is
//!    final. Each `(chain_id, block)` root is written once.
//! 3. Anyone calls `prove_storage` with the Merkle siblings of the slot. The
//!    proof PDA at `[b"proof", intent_hash]` is written with the claimant.
//!
//! `prove`, which the portal calls after a destination fulfillment, sends
//! nothing: the claimant slot is already committed in destination storage.
//!
//! ## Security model
//!
//! - Only the configured root oracle may post state roots, and a posted root
//!   can never be replaced by a different one.
//! - A storage proof is checked against the portal configured for its
//!   destination chain; chains without a configured portal are rejected.
//! - Zero claimants are rejected before any proof is written.
//! - The first proof for an intent hash wins.
//!
//! ## Events
//!
//! - `StateRootSubmitted` when a new root is posted.
//! - `IntentProven` / `IntentAlreadyProven` through `emit_cpi!` from
//!   `prove_storage`.

use anchor_lang::prelude::*;
use eco_std::prover;

declare_id!("Dt2ussicQDCr7txieHDAcWjR6mN7uqWi7T3JnhmzmyPz");

pub mod events;
pub mod instructions;
pub mod state;

use instructions::*;

#[program]
pub mod storage_prover {
    use super::*;

    /// Creates the config with the root oracle and the destination portals.
    ///
    /// # Errors
    /// - `InvalidConfig`: the config account is not the config PDA
    /// - `TooManyDestinationPortals`: more portals than the config can hold
    pub fn init(ctx: Context<Init>, args: InitArgs) -> Result<()> {
        instructions::init(ctx, args)
    }

    /// Accepts the portal's proving call after a destination fulfillment.
    ///
    /// # Security
    /// Only callable through the portal, which signs with its dispatcher PDA.
    ///
    /// # Errors
    /// - `InvalidPortalDispatcher`: the signer is not the portal's dispatcher
    pub fn prove(ctx: Context<Prove>, args: prover::ProveArgs) -> Result<()> {
        prove_intent(ctx, args)
    }

    /// Posts the finalized state root of a destination block.
    ///
    /// # Arguments
    /// * `ctx` - the root oracle (also rent payer), the config and the state
    ///   root PDA of `(chain_id, block)`
    /// * `args` - destination chain, block number and state root
    ///
    /// # Security
    /// - Only the configured root oracle may sign
    /// - A block's root is immutable once written; posting it again is a no-op
    ///
    /// # Events
    /// Emits `StateRootSubmitted` when the root is new.
    ///
    /// # Errors
    /// - `UnauthorizedRootOracle`: the signer is not the root oracle
    /// - `InvalidStateRootAccount`: the account is not the block's PDA
    /// - `StateRootAlreadySubmitted`: a different root was posted for the block
    pub fn submit_state_root(
        ctx: Context<SubmitStateRoot>,
        args: SubmitStateRootArgs,
    ) -> Result<()> {
        instructions::submit_state_root(ctx, args)
    }

    /// Records a proof from a storage inclusion proof. Returns whether a new
    /// proof was written.
    ///
    /// # Arguments
    /// * `ctx` - rent payer, config, the block's state root PDA and the proof
    ///   PDA of the intent hash
    /// * `args` - destination chain, block, intent hash, claimant and the
    ///   Merkle siblings of the claimant slot
    ///
    /// # Security
    /// - The claimant slot is verified against the portal configured for the
    ///   destination chain under a root posted by the oracle
    /// - Callable by anyone; the proof itself is the authorization
    ///
    /// # Events
    /// Emits `IntentProven` for a new proof, `IntentAlreadyProven` otherwise.
    ///
    /// # Errors
    /// - `UnknownStateRoot`: no root was posted for the block
    /// - `UnsupportedChain`: no portal is configured for the destination
    /// - `ZeroClaimant`: the claimant is zero
    /// - `InvalidStorageProof`: the inclusion proof does not verify
    pub fn prove_storage(ctx: Context<ProveStorage>, args: ProveStorageArgs) -> Result<bool> {
        prove_intent_storage(ctx, args)
    }
}
