use anchor_lang::prelude::*;
use anchor_spl::{token, token_2022};
use eco_std::{now, Bytes32, Proof};

use crate::events::IntentRefunded;
use crate::instructions::PortalError;
use crate::state::{RewardStatus, VaultMode, VaultState};
use crate::types::{self, Reward, TokenPrograms};
use crate::vault::{Settlement, Vault};

#[derive(AnchorSerialize, AnchorDeserialize)]
pub struct RefundArgs {
    pub destination: u64,
    pub route_hash: Bytes32,
    pub reward: Reward,
}

#[derive(Accounts)]
#[instruction(args: RefundArgs)]
pub struct Refund<'info> {
    #[account(mut)]
    pub payer: Signer<'info>,
    /// CHECK: address is validated
    #[account(mut, address = args.reward.creator @ PortalError::InvalidCreator)]
    pub creator: UncheckedAccount<'info>,
    /// CHECK: address is validated
    #[account(mut)]
    pub vault: UncheckedAccount<'info>,
    /// CHECK: address is validated
    pub proof: UncheckedAccount<'info>,
    /// CHECK: address is validated
    #[account(mut)]
    pub vault_state: UncheckedAccount<'info>,
    pub token_program: Program<'info, token::Token>,
    pub token_2022_program: Program<'info, token_2022::Token2022>,
    pub system_program: Program<'info, System>,
}

pub fn refund_intent<'info>(
    ctx: Context<'_, '_, '_, 'info, Refund<'info>>,
    args: RefundArgs,
) -> Result<()> {
    let RefundArgs {
        destination,
        route_hash,
        reward,
    } = args;
    let intent_hash = types::intent_hash(destination, &route_hash, &reward.hash());
    let vault = Vault::new(&ctx.accounts.vault, intent_hash)?;
    let mut vault_state = VaultState::load(&ctx.accounts.vault_state, &intent_hash)?;

    match vault_state.status {
        RewardStatus::Claimed => return Err(PortalError::RewardsAlreadyWithdrawn.into()),
        // a refunded intent only sweeps late deposits back to the creator
        RewardStatus::Refunded => {}
        RewardStatus::Initial | RewardStatus::Funded | RewardStatus::PartiallyFunded => {
            check_refundable(&ctx.accounts.proof, &intent_hash, destination, &reward)?
        }
    }

    let settlement = Settlement {
        payer: ctx.accounts.payer.to_account_info(),
        token_programs: TokenPrograms::new(
            &ctx.accounts.token_program,
            &ctx.accounts.token_2022_program,
        ),
        system_program: ctx.accounts.system_program.clone(),
    };

    vault_state.released(VaultMode::Refund, reward.creator);
    vault_state.save(
        &ctx.accounts.vault_state,
        &intent_hash,
        &settlement.payer,
        &settlement.system_program,
    )?;

    vault.release(
        &ctx.accounts.creator,
        ctx.remaining_accounts.try_into()?,
        &reward.token_amounts()?,
        &settlement,
    )?;

    emit!(IntentRefunded::new(intent_hash, reward.creator));

    Ok(())
}

/// A proof for another destination does not block the refund: it cannot
/// unlock a withdrawal of this intent either.
fn check_refundable(
    proof: &AccountInfo<'_>,
    intent_hash: &Bytes32,
    destination: u64,
    reward: &Reward,
) -> Result<()> {
    if let Some(proof) = Proof::load(proof, intent_hash, &reward.prover)? {
        require!(
            proof.destination != destination,
            PortalError::IntentNotClaimed
        );
    }

    require!(now()? > reward.deadline, PortalError::IntentNotExpired);

    Ok(())
}
