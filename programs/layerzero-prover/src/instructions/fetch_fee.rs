use anchor_lang::prelude::*;
use eco_std::prover::ProveArgs;

use super::prove::quote_params;
use crate::instructions::LayerZeroProverError;
use crate::layerzero;
use crate::state::dispatcher_pda;

#[derive(Accounts)]
pub struct FetchFee<'info> {
    /// CHECK: address is validated
    #[account(address = layerzero::endpoint_pda().0 @ LayerZeroProverError::InvalidEndpoint)]
    pub endpoint: UncheckedAccount<'info>,
    /// CHECK: address is validated
    #[account(executable, address = layerzero::ENDPOINT_ID @ LayerZeroProverError::InvalidEndpoint)]
    pub endpoint_program: UncheckedAccount<'info>,
}

pub fn fetch_fee(ctx: Context<FetchFee>, args: ProveArgs) -> Result<u64> {
    let fee = layerzero::quote(
        &ctx.accounts.endpoint_program,
        &ctx.accounts.endpoint,
        quote_params(dispatcher_pda().0, &args)?,
    )?;

    Ok(fee.native_fee)
}
