use std::collections::BTreeMap;

use anchor_lang::prelude::*;
use anchor_spl::token_interface::TokenAccount;
use eco_std::account::AccountExt;
use eco_std::Bytes32;

use crate::instructions::PortalError;
use crate::state::{self, FulfillMarker, VaultState};
use crate::types::{self, Intent, Reward};
use crate::vault::Vault;

#[derive(AnchorSerialize, AnchorDeserialize)]
pub struct IsIntentFundedArgs {
    pub destination: u64,
    pub route_hash: Bytes32,
    pub reward: Reward,
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct IntentHashes {
    pub intent_hash: Bytes32,
    pub route_hash: Bytes32,
    pub reward_hash: Bytes32,
}

/// Remaining accounts: the vault's token account of every reward mint.
#[derive(Accounts)]
pub struct IsIntentFunded<'info> {
    /// CHECK: address is validated
    pub vault: UncheckedAccount<'info>,
    /// CHECK: address is validated
    pub vault_state: UncheckedAccount<'info>,
}

#[derive(Accounts)]
pub struct IsFulfilled<'info> {
    /// CHECK: address is validated
    pub fulfill_marker: UncheckedAccount<'info>,
}

#[derive(Accounts)]
pub struct GetIntentHash {}

pub fn is_intent_funded_view<'info>(
    ctx: Context<'_, '_, '_, 'info, IsIntentFunded<'info>>,
    args: IsIntentFundedArgs,
) -> Result<bool> {
    let IsIntentFundedArgs {
        destination,
        route_hash,
        reward,
    } = args;
    let intent_hash = types::intent_hash(destination, &route_hash, &reward.hash());
    let vault = Vault::new(&ctx.accounts.vault, intent_hash)?;
    let vault_state = VaultState::load(&ctx.accounts.vault_state, &intent_hash)?;

    let vault_balances = ctx
        .remaining_accounts
        .iter()
        .filter(|vault_token| !vault_token.data_is_empty())
        .map(|vault_token| -> Result<(Pubkey, u64)> {
            let token_data =
                TokenAccount::try_deserialize(&mut &vault_token.try_borrow_data()?[..])?;
            require!(
                vault_token.key() == vault.ata(&token_data.mint, vault_token.owner),
                PortalError::InvalidVaultAta
            );

            Ok((token_data.mint, token_data.amount))
        })
        .collect::<Result<BTreeMap<_, _>>>()?;

    state::is_intent_funded(
        &reward,
        vault_state.status,
        ctx.accounts.vault.lamports(),
        &vault_balances,
    )
}

pub fn is_fulfilled_view(ctx: Context<IsFulfilled>, intent_hash: Bytes32) -> Result<bool> {
    fulfilled_claimant(&ctx.accounts.fulfill_marker, &intent_hash)
        .map(|claimant| claimant.is_some())
}

pub fn claimant_view(ctx: Context<IsFulfilled>, intent_hash: Bytes32) -> Result<Option<Bytes32>> {
    fulfilled_claimant(&ctx.accounts.fulfill_marker, &intent_hash)
}

pub fn get_intent_hash_view(_: Context<GetIntentHash>, intent: Intent) -> Result<IntentHashes> {
    let (intent_hash, route_hash, reward_hash) = intent.hashes();

    Ok(IntentHashes {
        intent_hash,
        route_hash,
        reward_hash,
    })
}

fn fulfilled_claimant(
    fulfill_marker: &AccountInfo<'_>,
    intent_hash: &Bytes32,
) -> Result<Option<Bytes32>> {
    require!(
        fulfill_marker.key() == FulfillMarker::pda(intent_hash).0,
        PortalError::InvalidFulfillMarker
    );

    Ok(FulfillMarker::read(fulfill_marker)?.map(|fulfill_marker| fulfill_marker.claimant))
}
