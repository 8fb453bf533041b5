use anchor_lang::prelude::*;
use eco_std::bridge::ProveData;
use eco_std::prover::ProveArgs;

use crate::instructions::LayerZeroProverError;
use crate::layerzero::{self, chain_to_eid, QuoteParams, SendAccounts, SendParams};
use crate::state::{dispatcher_pda, DISPATCHER_SEED};

#[derive(Accounts)]
pub struct Prove<'info> {
    #[account(address = portal::state::dispatcher_pda().0 @ LayerZeroProverError::InvalidPortalDispatcher)]
    pub portal_dispatcher: Signer<'info>,
    /// CHECK: address is validated
    #[account(address = dispatcher_pda().0 @ LayerZeroProverError::InvalidDispatcher)]
    pub dispatcher: UncheckedAccount<'info>,
    #[account(mut)]
    pub payer: Signer<'info>,
    /// CHECK: address is validated
    #[account(mut, address = layerzero::endpoint_pda().0 @ LayerZeroProverError::InvalidEndpoint)]
    pub endpoint: UncheckedAccount<'info>,
    /// CHECK: Checked in CPI
    #[account(mut)]
    pub nonce: UncheckedAccount<'info>,
    pub system_program: Program<'info, System>,
    /// CHECK: address is validated
    #[account(executable, address = layerzero::ENDPOINT_ID @ LayerZeroProverError::InvalidEndpoint)]
    pub endpoint_program: UncheckedAccount<'info>,
}

/// The quote the endpoint would charge to carry `args` to the source chain.
pub(crate) fn quote_params(sender: Pubkey, args: &ProveArgs) -> Result<QuoteParams> {
    let ProveData {
        source_prover,
        gas_limit,
    } = ProveData::from_bytes(&args.data)?;

    Ok(QuoteParams::new(
        sender,
        chain_to_eid(args.source)?,
        source_prover.into(),
        args.intent_hashes_claimants.to_bytes(),
        layerzero::lz_receive_options(gas_limit),
        false,
    ))
}

pub fn prove_intent(ctx: Context<Prove>, args: ProveArgs) -> Result<()> {
    let params = quote_params(ctx.accounts.dispatcher.key(), &args)?;
    let fee = layerzero::quote(
        &ctx.accounts.endpoint_program,
        &ctx.accounts.endpoint,
        params.clone(),
    )?;
    let QuoteParams {
        dst_eid,
        receiver,
        message,
        options,
        ..
    } = params;
    let (_, bump) = dispatcher_pda();
    let signer_seeds = [DISPATCHER_SEED, &[bump]];

    layerzero::send(
        SendAccounts {
            sender: &ctx.accounts.dispatcher,
            payer: &ctx.accounts.payer,
            endpoint: &ctx.accounts.endpoint,
            nonce: &ctx.accounts.nonce,
            system_program: &ctx.accounts.system_program,
            endpoint_program: &ctx.accounts.endpoint_program,
        },
        SendParams::new(dst_eid, receiver, message, options, fee.native_fee, 0),
        &signer_seeds,
    )
}
