use anchor_lang::prelude::*;
use eco_std::prover::ProveArgs;

use crate::instructions::StorageProverError;

#[derive(Accounts)]
pub struct Prove<'info> {
    #[account(address = portal::state::dispatcher_pda().0 @ StorageProverError::InvalidPortalDispatcher)]
    pub portal_dispatcher: Signer<'info>,
}

/// Nothing is sent: the destination portal's storage already commits to the
/// fulfillment, and the proof is completed on the source chain by
/// `prove_storage`.
pub fn prove_intent(_ctx: Context<Prove>, _args: ProveArgs) -> Result<()> {
    Ok(())
}
