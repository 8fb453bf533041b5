use std::iter;

use anchor_lang::prelude::*;
use anchor_lang::solana_program::instruction::{AccountMeta, Instruction};
use anchor_lang::solana_program::program::invoke_signed;
use eco_std::account::AccountExt;
use eco_std::prover::{self, IntentHashClaimant, IntentHashesClaimants, PROVE_DISCRIMINATOR};
use eco_std::{Bytes32, CHAIN_ID};

use crate::events::IntentProven;
use crate::instructions::fulfill::{
    __client_accounts_fulfill, __cpi_client_accounts_fulfill, fulfill, Fulfill, FulfillArgs,
    FulfillBumps,
};
use crate::instructions::PortalError;
use crate::state::{dispatcher_pda, FulfillMarker, DISPATCHER_SEED};

#[derive(AnchorSerialize, AnchorDeserialize)]
pub struct ProveArgs {
    pub source: u64,
    pub intent_hashes: Vec<Bytes32>,
    /// Prover-specific, passed through untouched.
    pub data: Vec<u8>,
}

#[derive(AnchorSerialize, AnchorDeserialize)]
pub struct FulfillAndProveArgs {
    pub intent_hash: Bytes32,
    pub route: crate::types::Route,
    pub reward_hash: Bytes32,
    pub claimant: Bytes32,
    pub source: u64,
    pub data: Vec<u8>,
}

#[derive(Accounts)]
pub struct Prove<'info> {
    /// CHECK: any prover program; it only learns what was fulfilled here
    #[account(executable)]
    pub prover: UncheckedAccount<'info>,
    /// CHECK: address is validated
    #[account(address = dispatcher_pda().0 @ PortalError::InvalidDispatcher)]
    pub dispatcher: UncheckedAccount<'info>,
}

#[derive(Accounts)]
pub struct FulfillAndProve<'info> {
    pub fulfill: Fulfill<'info>,
    /// CHECK: any prover program; it only learns what was fulfilled here
    #[account(executable)]
    pub prover: UncheckedAccount<'info>,
    /// CHECK: address is validated
    #[account(address = dispatcher_pda().0 @ PortalError::InvalidDispatcher)]
    pub dispatcher: UncheckedAccount<'info>,
}

/// Remaining accounts: one fulfill marker per intent hash, then the
/// accounts of the prover's `prove`.
pub fn prove_intent<'info>(
    ctx: Context<'_, '_, '_, 'info, Prove<'info>>,
    args: ProveArgs,
) -> Result<()> {
    let ProveArgs {
        source,
        intent_hashes,
        data,
    } = args;
    require!(
        intent_hashes.len() <= ctx.remaining_accounts.len(),
        PortalError::InvalidFulfillMarker
    );
    let (fulfill_markers, prover_accounts) =
        ctx.remaining_accounts.split_at(intent_hashes.len());

    let intent_hashes_claimants = intent_hashes
        .iter()
        .zip(fulfill_markers)
        .map(|(intent_hash, fulfill_marker)| {
            fulfilled_claimant(fulfill_marker, intent_hash)
                .map(|claimant| IntentHashClaimant::new(*intent_hash, claimant))
        })
        .collect::<Result<Vec<_>>>()?;

    prove(
        &ctx.accounts.prover,
        &ctx.accounts.dispatcher,
        prover_accounts,
        source,
        intent_hashes_claimants,
        data,
    )
}

/// Remaining accounts: those of `fulfill`, then the accounts of the
/// prover's `prove`.
pub fn fulfill_and_prove_intent<'info>(
    ctx: Context<'_, '_, '_, 'info, FulfillAndProve<'info>>,
    args: FulfillAndProveArgs,
) -> Result<()> {
    let FulfillAndProveArgs {
        intent_hash,
        route,
        reward_hash,
        claimant,
        source,
        data,
    } = args;
    let prover_accounts = fulfill(
        &ctx.accounts.fulfill,
        ctx.remaining_accounts,
        FulfillArgs {
            intent_hash,
            route,
            reward_hash,
            claimant,
        },
    )?;

    prove(
        &ctx.accounts.prover,
        &ctx.accounts.dispatcher,
        prover_accounts,
        source,
        vec![IntentHashClaimant::new(intent_hash, claimant)],
        data,
    )
}

fn fulfilled_claimant(fulfill_marker: &AccountInfo<'_>, intent_hash: &Bytes32) -> Result<Bytes32> {
    require!(
        fulfill_marker.key() == FulfillMarker::pda(intent_hash).0,
        PortalError::InvalidFulfillMarker
    );

    FulfillMarker::read(fulfill_marker)?
        .map(|fulfill_marker| fulfill_marker.claimant)
        .ok_or(PortalError::IntentNotFulfilled.into())
}

fn prove<'info>(
    prover: &AccountInfo<'info>,
    dispatcher: &AccountInfo<'info>,
    prover_accounts: &[AccountInfo<'info>],
    source: u64,
    intent_hashes_claimants: Vec<IntentHashClaimant>,
    data: Vec<u8>,
) -> Result<()> {
    let args = prover::ProveArgs::new(
        source,
        IntentHashesClaimants::new(CHAIN_ID, intent_hashes_claimants.clone()),
        data,
    );
    let ix_data: Vec<_> = PROVE_DISCRIMINATOR
        .into_iter()
        .chain(args.try_to_vec()?)
        .collect();

    let (_, bump) = dispatcher_pda();
    let signer_seeds: [&[u8]; 2] = [DISPATCHER_SEED, &[bump]];

    let prover_account_metas = prover_accounts.iter().map(|account| AccountMeta {
        pubkey: account.key(),
        is_signer: account.is_signer,
        is_writable: account.is_writable,
    });
    let ix = Instruction::new_with_bytes(
        prover.key(),
        &ix_data,
        iter::once(AccountMeta::new_readonly(dispatcher.key(), true))
            .chain(prover_account_metas)
            .collect(),
    );

    invoke_signed(
        &ix,
        iter::once(dispatcher.clone())
            .chain(prover_accounts.iter().cloned())
            .collect::<Vec<_>>()
            .as_slice(),
        &[&signer_seeds],
    )?;

    intent_hashes_claimants
        .into_iter()
        .for_each(|IntentHashClaimant { intent_hash, claimant }| {
            emit!(IntentProven::new(intent_hash, claimant, source))
        });

    Ok(())
}
