use anchor_lang::prelude::*;
use eco_std::account::AccountExt;
use eco_std::Bytes32;

use crate::events::StateRootSubmitted;
use crate::instructions::StorageProverError;
use crate::state::{Config, StateRoot, STATE_ROOT_SEED};

#[derive(AnchorSerialize, AnchorDeserialize)]
pub struct SubmitStateRootArgs {
    pub chain_id: u64,
    pub block: u64,
    pub state_root: Bytes32,
}

#[derive(Accounts)]
pub struct SubmitStateRoot<'info> {
    #[account(mut, address = config.root_oracle @ StorageProverError::UnauthorizedRootOracle)]
    pub root_oracle: Signer<'info>,
    #[account(address = Config::pda().0 @ StorageProverError::InvalidConfig)]
    pub config: Account<'info, Config>,
    /// CHECK: address is validated
    #[account(mut)]
    pub state_root: UncheckedAccount<'info>,
    pub system_program: Program<'info, System>,
}

/// Resubmitting the same root for a block is a no-op.
pub fn submit_state_root(ctx: Context<SubmitStateRoot>, args: SubmitStateRootArgs) -> Result<()> {
    let SubmitStateRootArgs {
        chain_id,
        block,
        state_root,
    } = args;
    let (state_root_pda, bump) = StateRoot::pda(chain_id, block);
    require!(
        ctx.accounts.state_root.key() == state_root_pda,
        StorageProverError::InvalidStateRootAccount
    );

    match StateRoot::read(&ctx.accounts.state_root)? {
        Some(existing) if existing.state_root == state_root => Ok(()),
        Some(_) => Err(StorageProverError::StateRootAlreadySubmitted.into()),
        None => {
            let (chain_id_bytes, block_bytes) = (chain_id.to_be_bytes(), block.to_be_bytes());
            let signer_seeds: [&[u8]; 4] =
                [STATE_ROOT_SEED, &chain_id_bytes, &block_bytes, &[bump]];

            StateRoot { state_root }.init(
                &ctx.accounts.state_root,
                &ctx.accounts.root_oracle,
                &ctx.accounts.system_program,
                &[&signer_seeds],
            )?;

            emit!(StateRootSubmitted::new(chain_id, block, state_root));

            Ok(())
        }
    }
}
