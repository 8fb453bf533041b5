//! # LayerZero Prover
//!
//! Second message-bridge prover, carrying the same proof batches as the
//! Hyperlane prover over a LayerZero endpoint. Only the transport plumbing
//! differs: the whitelist, the batch encoding and the proof records are
//! shared through `eco_std::bridge` and `eco_std::prover`.
//!
//! ## Outbound (`prove`)
//!
//! The prove data names the counterpart prover on the source chain and may
//! carry a gas limit for its `lz_receive` (default 200k, never below 100k).
//! The gas limit becomes a type-3 executor option. The prover quotes the
//! endpoint first and sends with exactly the quoted native fee, paid by the
//! payer; `fetch_fee` exposes the same quote to callers ahead of time.
//!
//! ## Inbound (`lz_receive`)
//!
//! The endpoint delivers packets in nonce order per path and signs each
//! delivery with its receive authority for this program. The packet sender
//! must be whitelisted for the source endpoint id and the batch must name that
//! chain; each pair is then recorded first-writer-wins, with rent paid by the
//! program's PDA payer.
//!
//! Endpoint ids are chain ids narrowed to 32 bits.
//!
//! ## Events
//!
//! `lz_receive` emits `IntentProven` / `IntentAlreadyProven` through
//! `emit_cpi!`, exactly like the Hyperlane prover's `handle`.

use anchor_lang::prelude::*;
use eco_std::prover;
use eco_std::SerializableAccountMeta;

declare_id!("AFgRX4DVUuxHgXEvHuBwZtkL6FHZfmxqds5Sk5CUiQVQ");

pub mod instructions;
pub mod layerzero;
pub mod state;

use instructions::*;
use layerzero::LzReceiveParams;

#[program]
pub mod layerzero_prover {
    use super::*;

    /// Creates the configuration with the per-chain sender whitelist.
    ///
    /// # Arguments
    /// * `ctx` - the config PDA and its rent payer
    /// * `args` - for each source chain, the counterpart senders to trust
    ///
    /// # Errors
    /// - `InvalidConfig`: the config account is not the config PDA
    /// - `TooManyWhitelistedChains` / `TooManyWhitelistedSenders`: the
    ///   whitelist does not fit the config account
    pub fn init(ctx: Context<Init>, args: InitArgs) -> Result<()> {
        instructions::init(ctx, args)
    }

    /// Sends a batch of fulfilled intents to the prover on the source chain.
    ///
    /// # Arguments
    /// * `ctx` - the portal dispatcher, this program's dispatcher, the payer
    ///   and the endpoint send accounts
    /// * `args` - source chain, the `(intent_hash, claimant)` batch and the
    ///   prove data naming the source-chain prover and gas limit
    ///
    /// # Security
    /// - Only callable through the portal, which signs with its dispatcher PDA
    /// - The endpoint is pinned to its program id
    ///
    /// # Errors
    /// - `InvalidPortalDispatcher`: the signer is not the portal's dispatcher
    /// - `InvalidProveData`: the prove data is neither 32 nor 40 bytes
    /// - `InvalidChainId`: the source chain does not fit an endpoint id
    pub fn prove(ctx: Context<Prove>, args: prover::ProveArgs) -> Result<()> {
        prove_intent(ctx, args)
    }

    /// Native fee `prove` would pay for `args`.
    pub fn fetch_fee(ctx: Context<FetchFee>, args: prover::ProveArgs) -> Result<u64> {
        instructions::fetch_fee(ctx, args)
    }

    /// Records the proofs carried by a packet the endpoint delivered.
    ///
    /// # Arguments
    /// * `ctx` - the endpoint receive authority, the config, the PDA payer and
    ///   one proof PDA per pair as remaining accounts
    /// * `params` - source endpoint id, sender, nonce, guid and the encoded
    ///   batch
    ///
    /// # Security
    /// - Only the endpoint's receive authority for this program can deliver
    /// - The sender must be whitelisted for the source chain
    /// - The batch must name the source as the chain it was fulfilled on
    ///
    /// # Events
    /// Emits `IntentProven` for each new proof and `IntentAlreadyProven` for
    /// each pair that already had one.
    ///
    /// # Errors
    /// - `UnauthorizedHandle`: not delivered by the endpoint
    /// - `NotWhitelisted`: the sender is not trusted for the source chain
    /// - `ChainIdMismatch`: the batch names another chain
    /// - `InvalidProof`: the proof accounts do not match the batch
    pub fn lz_receive<'info>(
        ctx: Context<'_, '_, '_, 'info, LzReceive<'info>>,
        params: LzReceiveParams,
    ) -> Result<()> {
        instructions::lz_receive(ctx, params)
    }

    /// Accounts `lz_receive` needs after the receive authority.
    pub fn lz_receive_types(
        ctx: Context<LzReceiveTypes>,
        params: LzReceiveParams,
    ) -> Result<Vec<SerializableAccountMeta>> {
        instructions::lz_receive_types(ctx, params)
    }
}
