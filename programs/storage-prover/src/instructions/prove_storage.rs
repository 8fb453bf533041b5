use anchor_lang::prelude::*;
use eco_std::account::AccountExt;
use eco_std::merkle::{claimant_slot, MerkleVerifier, StorageVerifier};
use eco_std::prover::{
    mark_proven, IntentAlreadyProven, IntentHashClaimant, IntentProven, ProofRecord,
};
use eco_std::Bytes32;

use crate::instructions::StorageProverError;
use crate::state::{Config, ProofAccount, StateRoot};

#[derive(AnchorSerialize, AnchorDeserialize)]
pub struct ProveStorageArgs {
    pub destination: u64,
    pub block: u64,
    pub intent_hash: Bytes32,
    pub claimant: Bytes32,
    /// Merkle siblings of the destination portal's claimant slot.
    pub proof: Vec<Bytes32>,
}

#[event_cpi]
#[derive(Accounts)]
pub struct ProveStorage<'info> {
    #[account(mut)]
    pub payer: Signer<'info>,
    #[account(address = Config::pda().0 @ StorageProverError::InvalidConfig)]
    pub config: Account<'info, Config>,
    /// CHECK: address is validated
    pub state_root: UncheckedAccount<'info>,
    /// CHECK: address is validated
    #[account(mut)]
    pub proof: UncheckedAccount<'info>,
    pub system_program: Program<'info, System>,
}

/// Records a proof once the destination portal's claimant slot for the intent
/// is shown to hold `claimant` at a finalized block. Returns whether a new
/// proof was written.
pub fn prove_intent_storage(ctx: Context<ProveStorage>, args: ProveStorageArgs) -> Result<bool> {
    let ProveStorageArgs {
        destination,
        block,
        intent_hash,
        claimant,
        proof,
    } = args;

    require!(
        ctx.accounts.state_root.key() == StateRoot::pda(destination, block).0,
        StorageProverError::InvalidStateRootAccount
    );
    let state_root = StateRoot::read(&ctx.accounts.state_root)?
        .ok_or(StorageProverError::UnknownStateRoot)?
        .state_root;
    let portal = ctx
        .accounts
        .config
        .destination_portal(destination)
        .ok_or(StorageProverError::UnsupportedChain)?;
    require!(!claimant.is_zero(), StorageProverError::ZeroClaimant);
    require!(
        MerkleVerifier.verify_storage(
            &state_root,
            &portal,
            &claimant_slot(&intent_hash),
            &claimant,
            &proof
        ),
        StorageProverError::InvalidStorageProof
    );

    match mark_proven::<ProofAccount>(
        &ctx.accounts.proof,
        &ctx.accounts.payer,
        &ctx.accounts.system_program,
        None,
        &IntentHashClaimant::new(intent_hash, claimant),
        destination,
    )? {
        ProofRecord::Recorded(recorded) => {
            emit_cpi!(IntentProven::new(intent_hash, recorded.claimant, destination));

            Ok(true)
        }
        ProofRecord::AlreadyProven => {
            emit_cpi!(IntentAlreadyProven::new(intent_hash));

            Ok(false)
        }
    }
}
