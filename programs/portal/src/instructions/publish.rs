use anchor_lang::prelude::*;
use eco_std::Bytes32;

use crate::events::IntentPublished;
use crate::instructions::PortalError;
use crate::state::{RewardStatus, VaultState};
use crate::types::{self, Reward};

#[derive(AnchorSerialize, AnchorDeserialize)]
pub struct PublishArgs {
    pub destination: u64,
    /// Route as encoded for the destination chain.
    pub route: Vec<u8>,
    pub reward: Reward,
}

#[derive(Accounts)]
#[instruction(args: PublishArgs)]
pub struct Publish<'info> {
    /// CHECK: address is validated
    pub vault_state: UncheckedAccount<'info>,
}

pub fn publish_intent(ctx: Context<Publish>, args: PublishArgs) -> Result<Bytes32> {
    let PublishArgs {
        destination,
        route,
        reward,
    } = args;

    publish(&ctx.accounts.vault_state, destination, route, reward)
}

/// Route bytes are hashed as given. Only the destination chain can decode
/// them, so a route that does not match the intent only surfaces there as
/// a hash mismatch on `fulfill`.
pub(crate) fn publish(
    vault_state: &AccountInfo<'_>,
    destination: u64,
    route: Vec<u8>,
    reward: Reward,
) -> Result<Bytes32> {
    let intent_hash = types::intent_hash(destination, &types::route_hash(&route), &reward.hash());

    match VaultState::load(vault_state, &intent_hash)?.status {
        RewardStatus::Funded => return Err(PortalError::IntentAlreadyFunded.into()),
        status if status.is_settled() => {
            return Err(PortalError::RewardsAlreadyWithdrawn.into())
        }
        _ => {}
    }

    emit!(IntentPublished::new(intent_hash, destination, route, reward));

    Ok(intent_hash)
}
