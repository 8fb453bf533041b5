use anchor_lang::prelude::*;
use eco_std::bridge::inbound_proofs;
use eco_std::prover::{mark_proven, IntentAlreadyProven, IntentProven, ProofRecord};

use crate::instructions::LayerZeroProverError;
use crate::layerzero::{eid_to_chain, receive_authority_pda, LzReceiveParams};
use crate::state::{pda_payer_pda, Config, ProofAccount, PDA_PAYER_SEED};

/// Remaining accounts: the proof PDA of every intent hash in the message, in
/// message order.
#[event_cpi]
#[derive(Accounts)]
pub struct LzReceive<'info> {
    #[account(address = receive_authority_pda().0 @ LayerZeroProverError::UnauthorizedHandle)]
    pub receive_authority: Signer<'info>,
    #[account(address = Config::pda().0 @ LayerZeroProverError::InvalidConfig)]
    pub config: Account<'info, Config>,
    pub system_program: Program<'info, System>,
    /// CHECK: address is validated
    #[account(mut, address = pda_payer_pda().0 @ LayerZeroProverError::InvalidPdaPayer)]
    pub pda_payer: UncheckedAccount<'info>,
}

pub fn lz_receive<'info>(
    ctx: Context<'_, '_, '_, 'info, LzReceive<'info>>,
    params: LzReceiveParams,
) -> Result<()> {
    let proofs = inbound_proofs(
        &ctx.accounts.config.whitelist,
        eid_to_chain(params.src_eid),
        &params.sender.into(),
        &params.message,
    )?;
    require!(
        ctx.remaining_accounts.len() == proofs.len(),
        LayerZeroProverError::InvalidProof
    );

    let destination = proofs.destination;
    let (_, bump) = pda_payer_pda();
    let pda_payer_seeds: [&[u8]; 2] = [PDA_PAYER_SEED, &[bump]];

    ctx.remaining_accounts
        .iter()
        .zip(proofs.intent_hashes_claimants)
        .try_for_each(|(proof, intent_hash_claimant)| {
            let intent_hash = intent_hash_claimant.intent_hash;

            match mark_proven::<ProofAccount>(
                proof,
                &ctx.accounts.pda_payer,
                &ctx.accounts.system_program,
                Some(pda_payer_seeds.as_slice()),
                &intent_hash_claimant,
                destination,
            )? {
                ProofRecord::Recorded(recorded) => {
                    emit_cpi!(IntentProven::new(intent_hash, recorded.claimant, destination))
                }
                ProofRecord::AlreadyProven => emit_cpi!(IntentAlreadyProven::new(intent_hash)),
            }

            Ok(())
        })
}
