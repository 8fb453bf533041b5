use anchor_lang::prelude::*;
use anchor_lang::system_program;
use eco_std::prover::{IntentHashesClaimants, Proof};
use eco_std::{event_authority_pda, SerializableAccountMeta};

use crate::layerzero::LzReceiveParams;
use crate::state::{pda_payer_pda, Config};

#[derive(Accounts)]
pub struct LzReceiveTypes {}

/// Accounts `lz_receive` needs after the receive authority, for the executor.
pub fn lz_receive_types(
    _ctx: Context<LzReceiveTypes>,
    params: LzReceiveParams,
) -> Result<Vec<SerializableAccountMeta>> {
    let proofs = IntentHashesClaimants::from_bytes(&params.message)?;
    let proof_accounts = proofs
        .intent_hashes_claimants
        .iter()
        .map(|intent_hash_claimant| {
            AccountMeta::new(
                Proof::pda(&intent_hash_claimant.intent_hash, &crate::ID).0,
                false,
            )
        });

    Ok([
        AccountMeta::new_readonly(Config::pda().0, false),
        AccountMeta::new_readonly(system_program::ID, false),
        AccountMeta::new(pda_payer_pda().0, false),
        AccountMeta::new_readonly(event_authority_pda(&crate::ID).0, false),
        AccountMeta::new_readonly(crate::ID, false),
    ]
    .into_iter()
    .chain(proof_accounts)
    .map(Into::into)
    .collect())
}
