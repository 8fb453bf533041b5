use anchor_lang::prelude::*;
use anchor_lang::solana_program::instruction::{AccountMeta, Instruction};
use anchor_lang::solana_program::program::invoke_signed;
use anchor_spl::{associated_token, token, token_2022};
use eco_std::account::AccountExt;
use eco_std::{is_prover, now, Bytes32, CHAIN_ID};

use crate::events::IntentFulfilled;
use crate::instructions::fund_context::FundContext;
use crate::instructions::PortalError;
use crate::state::{executor_pda, FulfillMarker, EXECUTOR_SEED, FULFILL_MARKER_SEED};
use crate::types::{
    self, Call, Calldata, CalldataWithAccounts, Route, VecTokenTransferAccounts,
    VEC_TOKEN_TRANSFER_ACCOUNTS_CHUNK_SIZE,
};

#[derive(AnchorSerialize, AnchorDeserialize)]
pub struct FulfillArgs {
    pub intent_hash: Bytes32,
    /// Route whose call data is [`Calldata`]; the call accounts follow the
    /// route token accounts in the remaining accounts.
    pub route: Route,
    pub reward_hash: Bytes32,
    pub claimant: Bytes32,
}

#[derive(Accounts)]
pub struct Fulfill<'info> {
    #[account(mut)]
    pub payer: Signer<'info>,
    #[account(mut)]
    pub solver: Signer<'info>,
    /// CHECK: address is validated
    #[account(mut, address = executor_pda().0 @ PortalError::InvalidExecutor)]
    pub executor: UncheckedAccount<'info>,
    /// CHECK: address is validated
    #[account(mut)]
    pub fulfill_marker: UncheckedAccount<'info>,
    pub token_program: Program<'info, token::Token>,
    pub token_2022_program: Program<'info, token_2022::Token2022>,
    pub associated_token_program: Program<'info, associated_token::AssociatedToken>,
    pub system_program: Program<'info, System>,
}

pub fn fulfill_intent<'info>(
    ctx: Context<'_, '_, '_, 'info, Fulfill<'info>>,
    args: FulfillArgs,
) -> Result<()> {
    fulfill(&ctx.accounts, ctx.remaining_accounts, args).map(|_| ())
}

/// Runs the route once for its intent hash and records the claimant. Returns
/// the accounts left over after the token and call accounts.
pub(crate) fn fulfill<'c, 'info>(
    accounts: &Fulfill<'info>,
    remaining_accounts: &'c [AccountInfo<'info>],
    args: FulfillArgs,
) -> Result<&'c [AccountInfo<'info>]> {
    let FulfillArgs {
        intent_hash,
        route,
        reward_hash,
        claimant,
    } = args;
    let route_token_amounts = route.token_amounts()?;
    let (token_transfer_accounts, remaining_accounts) =
        split_token_transfer_accounts(remaining_accounts, route_token_amounts.len())?;
    let (calls, remaining_accounts) = route_calls(&route, remaining_accounts)?;
    let source_route = source_route(route, &calls)?;

    require!(
        types::intent_hash(CHAIN_ID, &source_route.hash(), &reward_hash) == intent_hash,
        PortalError::IntentHashMismatch
    );
    require!(now()? <= source_route.deadline, PortalError::IntentExpired);
    require!(
        source_route.portal == crate::ID,
        PortalError::InvalidPortal
    );
    require!(!claimant.is_zero(), PortalError::ZeroClaimant);

    mark_fulfilled(accounts, &intent_hash, claimant)?;

    let outcome = FundContext::from(accounts).fund(
        source_route.native_amount,
        token_transfer_accounts,
        &route_token_amounts,
        false,
    )?;
    require!(outcome.complete, PortalError::InsufficientFunding);

    calls
        .iter()
        .try_for_each(|call| execute_route_call(accounts, remaining_accounts, call))?;

    emit!(IntentFulfilled::new(intent_hash, claimant));

    Ok(remaining_accounts)
}

/// One route call with the transaction accounts it runs with.
struct RouteCall<'c, 'info> {
    target: Pubkey,
    value: u64,
    calldata: Calldata,
    accounts: &'c [AccountInfo<'info>],
}

fn split_token_transfer_accounts<'c, 'info>(
    remaining_accounts: &'c [AccountInfo<'info>],
    token_count: usize,
) -> Result<(VecTokenTransferAccounts<'info>, &'c [AccountInfo<'info>])> {
    let split_index = token_count * VEC_TOKEN_TRANSFER_ACCOUNTS_CHUNK_SIZE;
    require!(
        split_index <= remaining_accounts.len(),
        PortalError::InvalidTokenTransferAccounts
    );
    let (token_transfer_accounts, remaining_accounts) = remaining_accounts.split_at(split_index);

    Ok((token_transfer_accounts.try_into()?, remaining_accounts))
}

fn route_calls<'c, 'info>(
    route: &Route,
    mut remaining_accounts: &'c [AccountInfo<'info>],
) -> Result<(Vec<RouteCall<'c, 'info>>, &'c [AccountInfo<'info>])> {
    let calls = route
        .calls
        .iter()
        .map(|call| -> Result<RouteCall<'c, 'info>> {
            let calldata = Calldata::try_from_slice(&call.data)?;
            let account_count = calldata.account_count as usize;
            require!(
                account_count <= remaining_accounts.len(),
                PortalError::InvalidCalldata
            );
            let (call_accounts, rest) = remaining_accounts.split_at(account_count);
            remaining_accounts = rest;

            Ok(RouteCall {
                target: call.target.into(),
                value: call.value,
                calldata,
                accounts: call_accounts,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok((calls, remaining_accounts))
}

/// The route as the source chain hashed it: every call's data carries the
/// full account list.
fn source_route(mut route: Route, calls: &[RouteCall<'_, '_>]) -> Result<Route> {
    route.calls = route
        .calls
        .into_iter()
        .zip(calls)
        .map(|(call, route_call)| -> Result<Call> {
            let calldata_with_accounts = CalldataWithAccounts::new(
                route_call.calldata.clone(),
                route_call.accounts.to_vec(),
            )?;

            Ok(Call::new(
                call.target,
                calldata_with_accounts.try_to_vec()?,
                call.value,
            ))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(route)
}

fn mark_fulfilled(accounts: &Fulfill, intent_hash: &Bytes32, claimant: Bytes32) -> Result<()> {
    let (fulfill_marker, bump) = FulfillMarker::pda(intent_hash);
    require!(
        accounts.fulfill_marker.key() == fulfill_marker,
        PortalError::InvalidFulfillMarker
    );
    require!(
        accounts.fulfill_marker.data_is_empty(),
        PortalError::AlreadyFulfilled
    );
    let signer_seeds: [&[u8]; 3] = [FULFILL_MARKER_SEED, intent_hash.as_ref(), &[bump]];

    FulfillMarker::new(claimant, bump).init(
        &accounts.fulfill_marker,
        &accounts.payer,
        &accounts.system_program,
        &[&signer_seeds],
    )
}

fn execute_route_call<'info>(
    accounts: &Fulfill<'info>,
    transaction_accounts: &[AccountInfo<'info>],
    call: &RouteCall<'_, 'info>,
) -> Result<()> {
    require!(!is_prover(&call.target), PortalError::CallToProver);
    require!(call.value == 0, PortalError::CallValueUnsupported);

    let programs = [
        accounts.token_program.to_account_info(),
        accounts.token_2022_program.to_account_info(),
        accounts.associated_token_program.to_account_info(),
        accounts.system_program.to_account_info(),
    ];
    let target_is_program = programs
        .iter()
        .chain(call.accounts)
        .chain(transaction_accounts)
        .any(|account| *account.key == call.target && account.executable);
    require!(target_is_program, PortalError::CallToEoa);

    let executor = accounts.executor.key();
    let (_, bump) = executor_pda();
    let signer_seeds: [&[u8]; 2] = [EXECUTOR_SEED, &[bump]];
    let instruction = Instruction::new_with_bytes(
        call.target,
        &call.calldata.data,
        call.accounts
            .iter()
            .map(|account| AccountMeta {
                pubkey: account.key(),
                is_signer: account.is_signer || account.key() == executor,
                is_writable: account.is_writable,
            })
            .collect(),
    );

    invoke_signed(&instruction, call.accounts, &[&signer_seeds]).map_err(Into::into)
}
