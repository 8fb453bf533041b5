use anchor_lang::prelude::*;
use anchor_spl::{associated_token, token, token_2022};
use eco_std::Bytes32;

use crate::events::IntentFunded;
use crate::instructions::fund_context::FundContext;
use crate::instructions::publish::publish;
use crate::instructions::PortalError;
use crate::state::{funding_delegate_pda, RewardStatus, VaultState};
use crate::types::{self, Reward};
use crate::vault::Vault;

#[derive(AnchorSerialize, AnchorDeserialize)]
pub struct FundArgs {
    pub destination: u64,
    pub route_hash: Bytes32,
    pub reward: Reward,
    pub allow_partial: bool,
}

#[derive(AnchorSerialize, AnchorDeserialize)]
pub struct PublishAndFundArgs {
    pub destination: u64,
    pub route: Vec<u8>,
    pub reward: Reward,
    pub allow_partial: bool,
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct PublishedVault {
    pub intent_hash: Bytes32,
    pub vault: Pubkey,
}

#[derive(Accounts)]
pub struct Fund<'info> {
    #[account(mut)]
    pub payer: Signer<'info>,
    #[account(mut)]
    pub funder: Signer<'info>,
    /// CHECK: address is validated
    #[account(mut)]
    pub vault: UncheckedAccount<'info>,
    /// CHECK: address is validated
    #[account(mut)]
    pub vault_state: UncheckedAccount<'info>,
    pub token_program: Program<'info, token::Token>,
    pub token_2022_program: Program<'info, token_2022::Token2022>,
    pub associated_token_program: Program<'info, associated_token::AssociatedToken>,
    pub system_program: Program<'info, System>,
}

/// Funding on behalf of `funder`, who approved the portal's funding delegate
/// on their token accounts. Native value comes from the payer.
#[derive(Accounts)]
pub struct FundFor<'info> {
    #[account(mut)]
    pub payer: Signer<'info>,
    /// CHECK: owner of the source token accounts
    pub funder: UncheckedAccount<'info>,
    /// CHECK: address is validated
    #[account(address = funding_delegate_pda().0 @ PortalError::InvalidFundingDelegate)]
    pub funding_delegate: UncheckedAccount<'info>,
    /// CHECK: address is validated
    #[account(mut)]
    pub vault: UncheckedAccount<'info>,
    /// CHECK: address is validated
    #[account(mut)]
    pub vault_state: UncheckedAccount<'info>,
    pub token_program: Program<'info, token::Token>,
    pub token_2022_program: Program<'info, token_2022::Token2022>,
    pub associated_token_program: Program<'info, associated_token::AssociatedToken>,
    pub system_program: Program<'info, System>,
}

pub fn fund_intent<'info>(
    ctx: Context<'_, '_, '_, 'info, Fund<'info>>,
    args: FundArgs,
) -> Result<Bytes32> {
    let FundArgs {
        destination,
        route_hash,
        reward,
        allow_partial,
    } = args;
    let intent_hash = types::intent_hash(destination, &route_hash, &reward.hash());

    fund(
        FundContext::from(&ctx),
        FundAccounts::from(&ctx),
        ctx.remaining_accounts,
        intent_hash,
        &reward,
        allow_partial,
    )?;

    Ok(intent_hash)
}

pub fn fund_intent_for<'info>(
    ctx: Context<'_, '_, '_, 'info, FundFor<'info>>,
    args: FundArgs,
) -> Result<Bytes32> {
    let FundArgs {
        destination,
        route_hash,
        reward,
        allow_partial,
    } = args;
    let intent_hash = types::intent_hash(destination, &route_hash, &reward.hash());

    fund(
        FundContext::from(&ctx),
        FundAccounts::from(&ctx),
        ctx.remaining_accounts,
        intent_hash,
        &reward,
        allow_partial,
    )?;

    Ok(intent_hash)
}

pub fn publish_and_fund_intent<'info>(
    ctx: Context<'_, '_, '_, 'info, Fund<'info>>,
    args: PublishAndFundArgs,
) -> Result<PublishedVault> {
    let PublishAndFundArgs {
        destination,
        route,
        reward,
        allow_partial,
    } = args;
    let intent_hash = publish(
        &ctx.accounts.vault_state,
        destination,
        route,
        reward.clone(),
    )?;

    fund(
        FundContext::from(&ctx),
        FundAccounts::from(&ctx),
        ctx.remaining_accounts,
        intent_hash,
        &reward,
        allow_partial,
    )?;

    Ok(PublishedVault {
        intent_hash,
        vault: ctx.accounts.vault.key(),
    })
}

pub fn publish_and_fund_intent_for<'info>(
    ctx: Context<'_, '_, '_, 'info, FundFor<'info>>,
    args: PublishAndFundArgs,
) -> Result<PublishedVault> {
    let PublishAndFundArgs {
        destination,
        route,
        reward,
        allow_partial,
    } = args;
    let intent_hash = publish(
        &ctx.accounts.vault_state,
        destination,
        route,
        reward.clone(),
    )?;

    fund(
        FundContext::from(&ctx),
        FundAccounts::from(&ctx),
        ctx.remaining_accounts,
        intent_hash,
        &reward,
        allow_partial,
    )?;

    Ok(PublishedVault {
        intent_hash,
        vault: ctx.accounts.vault.key(),
    })
}

struct FundAccounts<'info> {
    payer: AccountInfo<'info>,
    funder: Pubkey,
    vault: AccountInfo<'info>,
    vault_state: AccountInfo<'info>,
    system_program: Program<'info, System>,
}

impl<'info> From<&Context<'_, '_, '_, 'info, Fund<'info>>> for FundAccounts<'info> {
    fn from(ctx: &Context<'_, '_, '_, 'info, Fund<'info>>) -> Self {
        Self {
            payer: ctx.accounts.payer.to_account_info(),
            funder: ctx.accounts.funder.key(),
            vault: ctx.accounts.vault.to_account_info(),
            vault_state: ctx.accounts.vault_state.to_account_info(),
            system_program: ctx.accounts.system_program.clone(),
        }
    }
}

impl<'info> From<&Context<'_, '_, '_, 'info, FundFor<'info>>> for FundAccounts<'info> {
    fn from(ctx: &Context<'_, '_, '_, 'info, FundFor<'info>>) -> Self {
        Self {
            payer: ctx.accounts.payer.to_account_info(),
            funder: ctx.accounts.funder.key(),
            vault: ctx.accounts.vault.to_account_info(),
            vault_state: ctx.accounts.vault_state.to_account_info(),
            system_program: ctx.accounts.system_program.clone(),
        }
    }
}

fn fund<'info>(
    fund_context: FundContext<'info>,
    accounts: FundAccounts<'info>,
    remaining_accounts: &[AccountInfo<'info>],
    intent_hash: Bytes32,
    reward: &Reward,
    allow_partial: bool,
) -> Result<()> {
    Vault::new(&accounts.vault, intent_hash)?;
    let mut vault_state = VaultState::load(&accounts.vault_state, &intent_hash)?;

    match vault_state.status {
        RewardStatus::Funded => return Err(PortalError::IntentAlreadyFunded.into()),
        status if status.is_settled() => {
            return Err(PortalError::RewardsAlreadyWithdrawn.into())
        }
        _ => {}
    }

    let outcome = fund_context.fund(
        reward.native_amount,
        remaining_accounts.try_into()?,
        &reward.token_amounts()?,
        allow_partial,
    )?;

    // a partial pass that moved nothing leaves no trace
    if !outcome.moved && !outcome.complete {
        return Ok(());
    }

    vault_state.funded(outcome.complete, allow_partial);
    vault_state.save(
        &accounts.vault_state,
        &intent_hash,
        &accounts.payer,
        &accounts.system_program,
    )?;

    emit!(IntentFunded::new(
        intent_hash,
        accounts.funder,
        outcome.complete
    ));

    Ok(())
}
