//! # Hyper Prover
//!
//! Message-bridge prover whose transport is a Hyperlane mailbox. The same
//! program runs on both ends of a route: on the destination chain it sends
//! fulfilled `(intent_hash, claimant)` batches, on the source chain it
//! receives them and records the proofs the portal settles against.
//!
//! ## Outbound (`prove`)
//!
//! The portal signs with its dispatcher PDA and hands over the batch it
//! recorded. The prove data names the counterpart prover on the source chain
//! (32 bytes), optionally followed by a big-endian gas limit. The batch is
//! encoded as an 8-byte big-endian destination chain followed by fixed 64-byte
//! records and dispatched through the mailbox with this program's dispatcher
//! PDA as sender. The mailbox charges its protocol fee to the payer; delivery
//! gas is paid to the relayer out of band, so the gas limit is accepted for
//! wire compatibility and not forwarded.
//!
//! ## Inbound (`handle`)
//!
//! The mailbox delivers `handle(origin, sender, payload)` signed by its
//! process authority for this program. The sender must be whitelisted for the
//! origin domain and the batch must name the origin as its destination chain;
//! only then is a proof PDA written for each pair. Rent for those proofs is
//! paid by this program's PDA payer, which operators keep topped up.
//!
//! The whitelist is fixed by `init`, which can only run once.
//!
//! ## Security model
//!
//! - The whitelist is the whole trust boundary: a message from any other
//!   sender is rejected before a single proof is written.
//! - Proofs are first-writer-wins. A replayed or conflicting message can never
//!   change the claimant of an intent that is already proven.
//! - Only the portal dispatcher can make the program send, so a proof message
//!   always reflects a fulfillment the portal recorded.
//!
//! ## Domains
//!
//! Hyperlane domain ids are used directly as chain ids. A chain id wider than
//! 32 bits cannot be proven over this transport.
//!
//! ## Events
//!
//! `handle` emits `IntentProven` for every new proof and
//! `IntentAlreadyProven` for every pair that was proven before, both through
//! `emit_cpi!`.

use anchor_lang::prelude::*;
use eco_std::prover;

declare_id!("7jccbTLieovCG2wMvw3c34aTZYbkg5HiU6icyX2qc9PY");

pub mod hyperlane;
pub mod instructions;
pub mod state;

use instructions::*;

#[program]
pub mod hyper_prover {
    use super::*;

    /// Creates the configuration with the per-chain sender whitelist.
    ///
    /// # Arguments
    /// * `ctx` - the config PDA and its rent payer
    /// * `args` - for each origin chain, the counterpart senders to trust
    ///
    /// # Security
    /// - Runs once: the config PDA cannot be created twice
    /// - The whitelist is immutable afterwards
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
    ///   and the mailbox dispatch accounts
    /// * `args` - source chain, the `(intent_hash, claimant)` batch and the
    ///   prove data naming the source-chain prover
    ///
    /// # Security
    /// - Only callable through the portal, which signs with its dispatcher PDA
    /// - The mailbox is pinned to its program id
    ///
    /// # Errors
    /// - `InvalidPortalDispatcher`: the signer is not the portal's dispatcher
    /// - `InvalidProveData`: the prove data is neither 32 nor 40 bytes
    /// - `InvalidChainId`: the source chain does not fit a Hyperlane domain
    pub fn prove(ctx: Context<Prove>, args: prover::ProveArgs) -> Result<()> {
        prove_intent(ctx, args)
    }

    /// Records the proofs carried by a message the mailbox delivered.
    ///
    /// # Arguments
    /// * `ctx` - the mailbox process authority, the config, the PDA payer and
    ///   one proof PDA per pair as remaining accounts
    /// * `origin` - Hyperlane domain the message was sent from
    /// * `sender` - the sending prover on the origin domain
    /// * `payload` - the encoded `(intent_hash, claimant)` batch
    ///
    /// # Security
    /// - Only the mailbox's process authority for this program can deliver
    /// - The sender must be whitelisted for the origin chain
    /// - The batch must name the origin as the chain it was fulfilled on
    ///
    /// # Events
    /// Emits `IntentProven` for each new proof and `IntentAlreadyProven` for
    /// each pair that already had one.
    ///
    /// # Errors
    /// - `UnauthorizedHandle`: not delivered by the mailbox
    /// - `NotWhitelisted`: the sender is not trusted for the origin chain
    /// - `ChainIdMismatch`: the batch names another chain
    /// - `InvalidProof`: the proof accounts do not match the batch
    #[instruction(discriminator = &hyperlane::HANDLE_DISCRIMINATOR)]
    pub fn handle<'info>(
        ctx: Context<'_, '_, '_, 'info, Handle<'info>>,
        origin: u32,
        sender: [u8; 32],
        payload: Vec<u8>,
    ) -> Result<()> {
        instructions::handle(ctx, origin, sender, payload)
    }

    /// Returns, as return data, the accounts `handle` needs after the process
    /// authority. Relayers simulate this before delivering.
    #[instruction(discriminator = &hyperlane::HANDLE_ACCOUNT_METAS_DISCRIMINATOR)]
    pub fn handle_account_metas(
        ctx: Context<HandleAccountMetas>,
        origin: u32,
        sender: [u8; 32],
        payload: Vec<u8>,
    ) -> Result<()> {
        instructions::handle_account_metas(ctx, origin, sender, payload)
    }
}
