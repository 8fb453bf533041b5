use anchor_lang::prelude::*;
use anchor_spl::{token, token_2022};
use eco_std::Bytes32;

use crate::events::IntentTokenRecovered;
use crate::instructions::PortalError;
use crate::state::{VaultMode, VaultState};
use crate::types::{self, Reward, TokenPrograms, TokenTransferAccounts};
use crate::vault::Vault;

#[derive(AnchorSerialize, AnchorDeserialize)]
pub struct RecoverTokenArgs {
    pub destination: u64,
    pub route_hash: Bytes32,
    pub reward: Reward,
    pub token: Pubkey,
}

#[derive(Accounts)]
#[instruction(args: RecoverTokenArgs)]
pub struct RecoverToken<'info> {
    #[account(mut)]
    pub payer: Signer<'info>,
    /// CHECK: address is validated
    #[account(address = args.reward.creator @ PortalError::InvalidCreator)]
    pub creator: UncheckedAccount<'info>,
    /// CHECK: address is validated
    pub vault: UncheckedAccount<'info>,
    /// CHECK: address is validated
    #[account(mut)]
    pub vault_state: UncheckedAccount<'info>,
    /// CHECK: must be the vault's token account for `args.token`
    #[account(mut)]
    pub vault_token: UncheckedAccount<'info>,
    /// CHECK: must be a token account of the creator
    #[account(mut)]
    pub creator_token: UncheckedAccount<'info>,
    /// CHECK: address is validated
    #[account(address = args.token @ PortalError::InvalidMint)]
    pub mint: UncheckedAccount<'info>,
    pub token_program: Program<'info, token::Token>,
    pub token_2022_program: Program<'info, token_2022::Token2022>,
    pub system_program: Program<'info, System>,
}

/// Rescues a token that was sent to the vault but is not part of the reward.
/// Reward tokens only ever leave through withdraw or refund, and while the
/// reward carries native value the vault stays untouched until settlement.
pub fn recover_intent_token<'info>(
    ctx: Context<'_, '_, '_, 'info, RecoverToken<'info>>,
    args: RecoverTokenArgs,
) -> Result<()> {
    let RecoverTokenArgs {
        destination,
        route_hash,
        reward,
        token,
    } = args;
    let intent_hash = types::intent_hash(destination, &route_hash, &reward.hash());
    let vault = Vault::new(&ctx.accounts.vault, intent_hash)?;
    let mut vault_state = VaultState::load(&ctx.accounts.vault_state, &intent_hash)?;

    require!(
        token != Pubkey::default() && !reward.token_amounts()?.contains_key(&token),
        PortalError::InvalidRecoveryToken
    );
    require!(
        reward.native_amount == 0 || vault_state.status.is_settled(),
        PortalError::InvalidRecoveryToken
    );

    let (vault_token, creator_token, mint) = (
        ctx.accounts.vault_token.to_account_info(),
        ctx.accounts.creator_token.to_account_info(),
        ctx.accounts.mint.to_account_info(),
    );
    let accounts = TokenTransferAccounts::try_from(vec![&vault_token, &creator_token, &mint])?;
    vault.sweep_token(
        &accounts,
        &reward.creator,
        &TokenPrograms::new(
            &ctx.accounts.token_program,
            &ctx.accounts.token_2022_program,
        ),
    )?;

    vault_state.released(VaultMode::RecoverToken, reward.creator);
    vault_state.save(
        &ctx.accounts.vault_state,
        &intent_hash,
        &ctx.accounts.payer,
        &ctx.accounts.system_program,
    )?;

    emit!(IntentTokenRecovered::new(
        intent_hash,
        reward.creator,
        token
    ));

    Ok(())
}
