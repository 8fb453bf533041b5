//! # Local Prover
//!
//! Proves intents whose source and destination are both this chain. When a
//! solver fulfills such an intent, the portal hands the fulfilled
//! `(intent_hash, claimant)` pairs straight to this program, which records a
//! proof PDA for each of them in the same transaction. No messaging layer is
//! involved, so the creator's vault can be withdrawn from as soon as the
//! fulfillment lands.
//!
//! ## Proof records
//!
//! Every proof lives at `[b"proof", intent_hash]` under this program and holds
//! the chain the intent was fulfilled on together with the claimant that may
//! withdraw the reward. The portal reads these accounts directly when a
//! claimant withdraws: a proof is trusted only if it is owned by the prover
//! named in the intent's reward.
//!
//! The first proof for an intent hash wins. A second `prove` for the same
//! hash leaves the record untouched and emits `IntentAlreadyProven` instead
//! of failing, so one stale pair never aborts a whole batch.
//!
//! ## Security model
//!
//! - Only the portal's dispatcher PDA can sign `prove`; nobody can write a
//!   proof without the portal having recorded the fulfillment first.
//! - Both the proof's source chain and the batch's destination chain must be
//!   this chain.
//! - Proof accounts are checked against their PDA before they are written.
//!
//! ## Events
//!
//! Events are emitted through `emit_cpi!` so that indexers observe them even
//! when the program runs as a CPI of the portal:
//! - `IntentProven` with the intent hash, claimant and destination chain.
//! - `IntentAlreadyProven` for every pair that already had a proof.
//!
//! ## Comparison with the bridge provers
//!
//! | | Local | Hyperlane / LayerZero | Storage |
//! |---|---|---|---|
//! | Source chain | this chain | any whitelisted chain | any chain with a posted root |
//! | Latency | immediate | bridge delivery | root posting |
//! | Trust | portal only | bridge + whitelist | root oracle |

use anchor_lang::prelude::*;
use eco_std::prover;

declare_id!("2vYQYECW25TK8TVwNrF539VYSapwFhxbF9qchVhnUJZa");

pub mod instructions;
pub mod state;

use instructions::*;

#[program]
pub mod local_prover {
    use super::*;

    /// Records a proof for every fulfilled intent in the batch.
    ///
    /// # Arguments
    /// * `ctx` - the portal dispatcher, the rent payer and one proof PDA per
    ///   intent hash as remaining accounts
    /// * `args` - source chain, the `(intent_hash, claimant)` batch with its
    ///   destination chain, and prover data (unused here)
    ///
    /// # Security
    /// - Only callable through the portal, which signs with its dispatcher PDA
    /// - Source and destination must both be this chain
    /// - Each proof account must be the PDA of its intent hash
    ///
    /// # Events
    /// Emits `IntentProven` for each new proof and `IntentAlreadyProven` for
    /// each intent hash that was proven before.
    ///
    /// # Errors
    /// - `InvalidPortalDispatcher`: the signer is not the portal's dispatcher
    /// - `InvalidSourceChain`: source or destination is another chain
    /// - `InvalidProof`: the proof accounts do not match the batch
    pub fn prove<'info>(
        ctx: Context<'_, '_, '_, 'info, Prove<'info>>,
        args: prover::ProveArgs,
    ) -> Result<()> {
        prove_intent(ctx, args)
    }
}
