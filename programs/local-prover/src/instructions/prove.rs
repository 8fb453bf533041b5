use anchor_lang::prelude::*;
use eco_std::prover::{
    mark_proven, IntentAlreadyProven, IntentHashClaimant, IntentHashesClaimants, IntentProven,
    ProofRecord, ProveArgs,
};
use eco_std::CHAIN_ID;

use crate::instructions::LocalProverError;
use crate::state::ProofAccount;

/// Remaining accounts: the proof PDA of every intent hash in the batch, in
/// batch order.
#[event_cpi]
#[derive(Accounts)]
pub struct Prove<'info> {
    #[account(address = portal::state::dispatcher_pda().0 @ LocalProverError::InvalidPortalDispatcher)]
    pub portal_dispatcher: Signer<'info>,
    #[account(mut)]
    pub payer: Signer<'info>,
    pub system_program: Program<'info, System>,
}

pub fn prove_intent<'info>(
    ctx: Context<'_, '_, '_, 'info, Prove<'info>>,
    args: ProveArgs,
) -> Result<()> {
    let ProveArgs {
        source,
        intent_hashes_claimants,
        ..
    } = args;

    require!(source == CHAIN_ID, LocalProverError::InvalidSourceChain);
    require!(
        intent_hashes_claimants.destination == CHAIN_ID,
        LocalProverError::InvalidSourceChain
    );

    mark_intent_hashes_proven(&ctx, intent_hashes_claimants)
}

fn mark_intent_hashes_proven<'info>(
    ctx: &Context<'_, '_, '_, 'info, Prove<'info>>,
    intent_hashes_claimants: IntentHashesClaimants,
) -> Result<()> {
    require!(
        ctx.remaining_accounts.len() == intent_hashes_claimants.len(),
        LocalProverError::InvalidProof
    );

    let destination = intent_hashes_claimants.destination;

    ctx.remaining_accounts
        .iter()
        .zip(intent_hashes_claimants.intent_hashes_claimants)
        .try_for_each(|(proof, intent_hash_claimant)| {
            mark_intent_hash_proven(ctx, proof, &intent_hash_claimant, destination)
        })
}

fn mark_intent_hash_proven<'info>(
    ctx: &Context<'_, '_, '_, 'info, Prove<'info>>,
    proof: &AccountInfo<'info>,
    intent_hash_claimant: &IntentHashClaimant,
    destination: u64,
) -> Result<()> {
    let intent_hash = intent_hash_claimant.intent_hash;

    match mark_proven::<ProofAccount>(
        proof,
        &ctx.accounts.payer,
        &ctx.accounts.system_program,
        None,
        intent_hash_claimant,
        destination,
    )? {
        ProofRecord::Recorded(recorded) => {
            emit_cpi!(IntentProven::new(intent_hash, recorded.claimant, destination))
        }
        ProofRecord::AlreadyProven => emit_cpi!(IntentAlreadyProven::new(intent_hash)),
    }

    Ok(())
}
