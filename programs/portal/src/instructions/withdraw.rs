use anchor_lang::prelude::*;
use anchor_spl::{token, token_2022};
use eco_std::{Bytes32, Proof};
use itertools::izip;

use crate::events::IntentWithdrawn;
use crate::instructions::PortalError;
use crate::state::{VaultMode, VaultState};
use crate::types::{self, Reward, TokenPrograms, VEC_TOKEN_TRANSFER_ACCOUNTS_CHUNK_SIZE};
use crate::vault::{Settlement, Vault};

/// Accounts of one intent in `batch_withdraw`: claimant, vault, proof and
/// vault state, followed by the token transfer accounts of its reward.
pub const WITHDRAW_INTENT_ACCOUNT_COUNT: usize = 4;

#[derive(AnchorSerialize, AnchorDeserialize)]
pub struct WithdrawArgs {
    pub destination: u64,
    pub route_hash: Bytes32,
    pub reward: Reward,
}

#[derive(AnchorSerialize, AnchorDeserialize)]
pub struct BatchWithdrawArgs {
    pub destinations: Vec<u64>,
    pub route_hashes: Vec<Bytes32>,
    pub rewards: Vec<Reward>,
}

#[derive(Accounts)]
#[instruction(args: WithdrawArgs)]
pub struct Withdraw<'info> {
    #[account(mut)]
    pub payer: Signer<'info>,
    /// CHECK: validated against the proof
    #[account(mut)]
    pub claimant: UncheckedAccount<'info>,
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

#[derive(Accounts)]
#[instruction(args: BatchWithdrawArgs)]
pub struct BatchWithdraw<'info> {
    #[account(mut)]
    pub payer: Signer<'info>,
    pub token_program: Program<'info, token::Token>,
    pub token_2022_program: Program<'info, token_2022::Token2022>,
    pub system_program: Program<'info, System>,
}

pub fn withdraw_intent<'info>(
    ctx: Context<'_, '_, '_, 'info, Withdraw<'info>>,
    args: WithdrawArgs,
) -> Result<()> {
    let WithdrawArgs {
        destination,
        route_hash,
        reward,
    } = args;
    let settlement = Settlement {
        payer: ctx.accounts.payer.to_account_info(),
        token_programs: TokenPrograms::new(
            &ctx.accounts.token_program,
            &ctx.accounts.token_2022_program,
        ),
        system_program: ctx.accounts.system_program.clone(),
    };
    let accounts = IntentAccounts {
        claimant: ctx.accounts.claimant.to_account_info(),
        vault: ctx.accounts.vault.to_account_info(),
        proof: ctx.accounts.proof.to_account_info(),
        vault_state: ctx.accounts.vault_state.to_account_info(),
        token_accounts: ctx.remaining_accounts,
    };

    withdraw(&settlement, accounts, destination, &route_hash, &reward)
}

/// All or nothing: one intent that cannot be withdrawn fails the batch.
pub fn batch_withdraw_intents<'info>(
    ctx: Context<'_, '_, '_, 'info, BatchWithdraw<'info>>,
    args: BatchWithdrawArgs,
) -> Result<()> {
    let BatchWithdrawArgs {
        destinations,
        route_hashes,
        rewards,
    } = args;
    require!(
        destinations.len() == route_hashes.len() && destinations.len() == rewards.len(),
        PortalError::ArrayLengthMismatch
    );

    let settlement = Settlement {
        payer: ctx.accounts.payer.to_account_info(),
        token_programs: TokenPrograms::new(
            &ctx.accounts.token_program,
            &ctx.accounts.token_2022_program,
        ),
        system_program: ctx.accounts.system_program.clone(),
    };
    let mut remaining_accounts = ctx.remaining_accounts;

    izip!(destinations, route_hashes, rewards).try_for_each(
        |(destination, route_hash, reward)| {
            let account_count = WITHDRAW_INTENT_ACCOUNT_COUNT
                + reward.token_amounts()?.len() * VEC_TOKEN_TRANSFER_ACCOUNTS_CHUNK_SIZE;
            require!(
                account_count <= remaining_accounts.len(),
                PortalError::InvalidTokenTransferAccounts
            );
            let (intent_accounts, rest) = remaining_accounts.split_at(account_count);
            remaining_accounts = rest;

            withdraw(
                &settlement,
                IntentAccounts::try_from(intent_accounts)?,
                destination,
                &route_hash,
                &reward,
            )
        },
    )
}

struct IntentAccounts<'a, 'info> {
    claimant: AccountInfo<'info>,
    vault: AccountInfo<'info>,
    proof: AccountInfo<'info>,
    vault_state: AccountInfo<'info>,
    token_accounts: &'a [AccountInfo<'info>],
}

impl<'a, 'info> TryFrom<&'a [AccountInfo<'info>]> for IntentAccounts<'a, 'info> {
    type Error = anchor_lang::error::Error;

    fn try_from(accounts: &'a [AccountInfo<'info>]) -> Result<Self> {
        match accounts {
            [claimant, vault, proof, vault_state, token_accounts @ ..] => Ok(Self {
                claimant: claimant.clone(),
                vault: vault.clone(),
                proof: proof.clone(),
                vault_state: vault_state.clone(),
                token_accounts,
            }),
            _ => Err(PortalError::InvalidTokenTransferAccounts.into()),
        }
    }
}

fn withdraw<'info>(
    settlement: &Settlement<'info>,
    accounts: IntentAccounts<'_, 'info>,
    destination: u64,
    route_hash: &Bytes32,
    reward: &Reward,
) -> Result<()> {
    let intent_hash = types::intent_hash(destination, route_hash, &reward.hash());
    let vault = Vault::new(&accounts.vault, intent_hash)?;
    let mut vault_state = VaultState::load(&accounts.vault_state, &intent_hash)?;

    require!(
        !vault_state.status.is_settled(),
        PortalError::RewardsAlreadyWithdrawn
    );

    let claimant = accounts.claimant.key();
    match Proof::load(&accounts.proof, &intent_hash, &reward.prover)? {
        Some(proof) if proof.destination == destination => {
            require!(proof.claimant == claimant, PortalError::InvalidClaimant)
        }
        _ => return Err(PortalError::UnauthorizedWithdrawal.into()),
    }

    vault_state.released(VaultMode::Claim, claimant);
    vault_state.save(
        &accounts.vault_state,
        &intent_hash,
        &settlement.payer,
        &settlement.system_program,
    )?;

    vault.release(
        &accounts.claimant,
        accounts.token_accounts.try_into()?,
        &reward.token_amounts()?,
        settlement,
    )?;

    emit!(IntentWithdrawn::new(intent_hash, claimant));

    Ok(())
}
