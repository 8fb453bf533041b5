//! # Portal Program
//!
//! The Portal is the single entry point of the Eco Routes intent protocol on
//! Solana. One deployment plays both roles of a cross-chain intent: it is the
//! *source* portal where users escrow rewards, and the *destination* portal
//! where solvers execute routes.
//!
//! ## Overview
//!
//! An intent is a `(destination, route, reward)` triple identified by
//! `keccak(destination ++ route_hash ++ reward_hash)`. The route describes
//! what must happen on the destination chain; the reward describes what the
//! solver who makes it happen is owed on the source chain, and which prover
//! decides who that solver was.
//!
//! ## Source side: intent ledger
//!
//! ### Vault (`vault`)
//! - Every intent owns a vault PDA at `["vault", intent_hash]`, so its address
//!   is known before the intent is published or funded
//! - Native rewards sit on the vault itself, token rewards in its associated
//!   token accounts
//! - Claim and refund sweep the whole native balance and every reward token
//!   balance to the target; token recovery moves a single non-reward token
//!
//! ### Settlement record (`VaultState`)
//! - Per intent PDA at `["vault_state", intent_hash]` holding the reward status
//!   (Initial, Funded, PartiallyFunded, Claimed, Refunded) and the last release
//! - Status only moves forward; Claimed and Refunded are terminal
//!
//! ### Operations
//! - `publish`, `fund`, `fund_for`, `publish_and_fund`, `publish_and_fund_for`
//! - `withdraw` and `batch_withdraw` once the reward's prover holds a proof
//! - `refund` once the reward deadline passed without a proof
//! - `recover_token` for tokens sent to a vault by mistake
//!
//! ## Destination side: fulfillment engine
//!
//! - `fulfill` checks the intent hash, route deadline, portal and claimant,
//!   records the claimant in a fulfill marker at `["fulfill_marker",
//!   intent_hash]`, funds the executor PDA from the solver and runs the route
//!   calls signed by the executor
//! - Every intent is fulfilled at most once; a second attempt fails with
//!   `AlreadyFulfilled`
//! - Calls into provers, into accounts that are not programs, or carrying
//!   native value are refused
//! - `prove` and `fulfill_and_prove` hand fulfilled `(intent_hash, claimant)`
//!   pairs to a prover, signed by the dispatcher PDA so the prover can tell
//!   the portal apart from anyone else
//!
//! ## Provers
//!
//! The portal never writes proofs. It reads the proof PDA that the reward's
//! prover keeps at `["proof", intent_hash]` under the prover's own program id;
//! local, Hyperlane, LayerZero and storage-proof provers all share that layout.
//!
//! ## Events
//!
//! `IntentPublished` carries the full route and reward: the ledger itself only
//! keeps hash-keyed status, so indexers rebuild intents from it. Every other
//! state change emits its own event (`IntentFunded`, `IntentWithdrawn`,
//! `IntentRefunded`, `IntentTokenRecovered`, `IntentFulfilled`,
//! `IntentProven`).

use anchor_lang::prelude::*;
use eco_std::Bytes32;

declare_id!("DZRgeBRvkCCeqAeVaRWpNNMTWVUG2GRpZxtTs9G2Xa98");

pub mod events;
pub mod instructions;
pub mod state;
pub mod types;
pub mod vault;

use instructions::*;
use types::Intent;

/// Vault of an intent whose route is encoded for its destination as
/// `route_hash`. Pure, so funders can pre-fund it before anything is
/// published.
pub fn vault_address(destination: u64, route_hash: &Bytes32, reward: &types::Reward) -> Pubkey {
    state::vault_pda(&types::intent_hash(destination, route_hash, &reward.hash())).0
}

/// Vault of an intent whose route is destined for Solana.
pub fn intent_vault_address(intent: &Intent) -> Pubkey {
    state::vault_pda(&intent.hash()).0
}

#[program]
pub mod portal {
    use super::*;

    /// Announces an intent.
    ///
    /// The ledger keeps no intent content, so the emitted event is the only
    /// record of the full route and reward.
    ///
    /// # Arguments
    /// * `ctx` - Program context with the intent's vault state
    /// * `args` - Destination chain, destination-encoded route bytes and reward
    ///
    /// # Events
    /// Emits `IntentPublished`.
    ///
    /// # Errors
    /// - `IntentAlreadyFunded`: If the intent is already fully funded
    /// - `RewardsAlreadyWithdrawn`: If the intent is already claimed or refunded
    pub fn publish(ctx: Context<Publish>, args: PublishArgs) -> Result<Bytes32> {
        publish_intent(ctx, args)
    }

    /// Moves the funder's native value and reward tokens into the intent's
    /// vault, up to what the reward requires.
    ///
    /// Legs the vault already covers are skipped, so funding again never
    /// pulls twice. Remaining accounts are `[funder token, vault token, mint]`
    /// for every reward mint.
    ///
    /// # Arguments
    /// * `ctx` - Program context with funder, vault and vault state
    /// * `args` - Intent hash components and whether partial funding is allowed
    ///
    /// # Security
    /// - Vault and vault state must be the PDAs of the intent hash
    /// - Token accounts must belong to the funder and to the vault
    /// - Without `allow_partial` every leg is checked before anything moves
    ///
    /// # Events
    /// Emits `IntentFunded`, unless a partial pass moved nothing.
    ///
    /// # Errors
    /// - `InsufficientNativeReward`: If the funder cannot cover the native leg
    /// - `InsufficientFunding`: If the funder cannot cover a token leg
    /// - `IntentAlreadyFunded`: If the intent is already fully funded
    /// - `RewardsAlreadyWithdrawn`: If the intent is already claimed or refunded
    /// - `InvalidMint`: If the token accounts do not match the reward mints
    pub fn fund<'info>(
        ctx: Context<'_, '_, '_, 'info, Fund<'info>>,
        args: FundArgs,
    ) -> Result<Bytes32> {
        fund_intent(ctx, args)
    }

    /// Funds an intent from a third party's token accounts.
    ///
    /// The funder approves the portal's funding delegate PDA on their token
    /// accounts beforehand; the portal pulls at most the delegated amount.
    /// Native value comes from the payer.
    ///
    /// # Arguments
    /// * `ctx` - Program context with funder, funding delegate, vault and vault state
    /// * `args` - Intent hash components and whether partial funding is allowed
    ///
    /// # Security
    /// - Only token accounts owned by `funder` can be drawn from
    /// - The delegate only signs for amounts the funder approved
    ///
    /// # Events
    /// Emits `IntentFunded`, unless a partial pass moved nothing.
    ///
    /// # Errors
    /// - `InsufficientTokenAllowance`: If the approved amount does not cover a token leg
    /// - `InvalidFunderToken`: If a source token account is not the funder's
    /// - Every error of `fund`
    pub fn fund_for<'info>(
        ctx: Context<'_, '_, '_, 'info, FundFor<'info>>,
        args: FundArgs,
    ) -> Result<Bytes32> {
        fund_intent_for(ctx, args)
    }

    /// `publish` followed by `fund`, returning the intent hash and its vault.
    pub fn publish_and_fund<'info>(
        ctx: Context<'_, '_, '_, 'info, Fund<'info>>,
        args: PublishAndFundArgs,
    ) -> Result<PublishedVault> {
        publish_and_fund_intent(ctx, args)
    }

    /// `publish` followed by `fund_for`, returning the intent hash and its vault.
    pub fn publish_and_fund_for<'info>(
        ctx: Context<'_, '_, '_, 'info, FundFor<'info>>,
        args: PublishAndFundArgs,
    ) -> Result<PublishedVault> {
        publish_and_fund_intent_for(ctx, args)
    }

    /// Releases the reward to the claimant the prover recorded.
    ///
    /// Remaining accounts are `[vault token, claimant token, mint]` for every
    /// reward mint. Vault token accounts are closed once emptied.
    ///
    /// # Arguments
    /// * `ctx` - Program context with claimant, vault, proof and vault state
    /// * `args` - Intent hash components
    ///
    /// # Security
    /// - The proof must be the reward prover's PDA for this intent, owned by
    ///   the prover, and name this destination and claimant
    /// - The intent is marked Claimed before funds move, and never released again
    ///
    /// # Events
    /// Emits `IntentWithdrawn`.
    ///
    /// # Errors
    /// - `UnauthorizedWithdrawal`: If no proof for this destination exists
    /// - `InvalidClaimant`: If the claimant account is not the proven claimant
    /// - `RewardsAlreadyWithdrawn`: If the intent is already claimed or refunded
    pub fn withdraw<'info>(
        ctx: Context<'_, '_, '_, 'info, Withdraw<'info>>,
        args: WithdrawArgs,
    ) -> Result<()> {
        withdraw_intent(ctx, args)
    }

    /// `withdraw` over several intents; one failure fails the whole batch.
    ///
    /// Remaining accounts are, per intent, `[claimant, vault, proof,
    /// vault state]` followed by its token transfer accounts.
    ///
    /// # Errors
    /// - `ArrayLengthMismatch`: If the argument arrays differ in length
    /// - Every error of `withdraw`
    pub fn batch_withdraw<'info>(
        ctx: Context<'_, '_, '_, 'info, BatchWithdraw<'info>>,
        args: BatchWithdrawArgs,
    ) -> Result<()> {
        batch_withdraw_intents(ctx, args)
    }

    /// Returns the reward to its creator once the intent expired unproven.
    ///
    /// Refunding an already refunded intent sweeps whatever reached the vault
    /// since back to the creator.
    ///
    /// # Arguments
    /// * `ctx` - Program context with creator, vault, proof and vault state
    /// * `args` - Intent hash components
    ///
    /// # Security
    /// - A proof for this destination blocks the refund for good
    ///
    /// # Events
    /// Emits `IntentRefunded`.
    ///
    /// # Errors
    /// - `IntentNotClaimed`: If a proof exists; the claimant must withdraw instead
    /// - `IntentNotExpired`: If the reward deadline has not passed
    /// - `RewardsAlreadyWithdrawn`: If the intent is already claimed
    pub fn refund<'info>(
        ctx: Context<'_, '_, '_, 'info, Refund<'info>>,
        args: RefundArgs,
    ) -> Result<()> {
        refund_intent(ctx, args)
    }

    /// Sends the vault's balance of a token that is not part of the reward
    /// to the creator.
    ///
    /// # Errors
    /// - `InvalidRecoveryToken`: If the token is a reward token or the default
    ///   key, or the reward carries native value and the intent is not settled
    pub fn recover_token<'info>(
        ctx: Context<'_, '_, '_, 'info, RecoverToken<'info>>,
        args: RecoverTokenArgs,
    ) -> Result<()> {
        recover_intent_token(ctx, args)
    }

    /// Executes a route on this chain and records who may claim its reward.
    ///
    /// The route's call data is [`types::Calldata`]; the call accounts are
    /// rebuilt into [`types::CalldataWithAccounts`] before hashing, matching
    /// what the source chain committed to. Remaining accounts are
    /// `[solver token, executor token, mint]` for every route mint, then the
    /// accounts of every call in order.
    ///
    /// # Arguments
    /// * `ctx` - Program context with solver, executor and fulfill marker
    /// * `args` - Expected intent hash, route, reward hash and claimant
    ///
    /// # Security
    /// - The intent hash is recomputed with this chain as destination
    /// - Calls run signed by the executor PDA, which only holds what the
    ///   solver moved in for this route
    /// - Provers can never be called from a route
    ///
    /// # Events
    /// Emits `IntentFulfilled`.
    ///
    /// # Errors
    /// - `IntentHashMismatch`: If the route and reward hash do not hash to `intent_hash`
    /// - `IntentExpired`: If the route deadline has passed
    /// - `InvalidPortal`: If the route names another portal
    /// - `ZeroClaimant`: If the claimant is zero
    /// - `AlreadyFulfilled`: If the intent was fulfilled before
    /// - `CallToProver`, `CallToEoa`, `CallValueUnsupported`: If a call is refused
    pub fn fulfill<'info>(
        ctx: Context<'_, '_, '_, 'info, Fulfill<'info>>,
        args: FulfillArgs,
    ) -> Result<()> {
        fulfill_intent(ctx, args)
    }

    /// `fulfill` followed by `prove` for the same intent, in one transaction.
    ///
    /// The prover's accounts follow the accounts of `fulfill`.
    pub fn fulfill_and_prove<'info>(
        ctx: Context<'_, '_, '_, 'info, FulfillAndProve<'info>>,
        args: FulfillAndProveArgs,
    ) -> Result<()> {
        fulfill_and_prove_intent(ctx, args)
    }

    /// Hands fulfilled intents to a prover for relay to their source chain.
    ///
    /// # Arguments
    /// * `ctx` - Program context with the prover and dispatcher; remaining
    ///   accounts are one fulfill marker per intent, then the prover's accounts
    /// * `args` - Source chain, intent hashes and prover-specific data
    ///
    /// # Security
    /// - Claimants come from the fulfill markers, never from the caller
    /// - The prover is invoked signed by the dispatcher PDA
    ///
    /// # Events
    /// Emits `IntentProven` for every intent.
    ///
    /// # Errors
    /// - `IntentNotFulfilled`: If an intent has no fulfill marker
    /// - `InvalidFulfillMarker`: If a marker account is not the intent's PDA
    pub fn prove<'info>(
        ctx: Context<'_, '_, '_, 'info, Prove<'info>>,
        args: ProveArgs,
    ) -> Result<()> {
        prove_intent(ctx, args)
    }

    /// Whether the vault currently covers the reward. Remaining accounts are
    /// the vault's token accounts.
    pub fn is_intent_funded<'info>(
        ctx: Context<'_, '_, '_, 'info, IsIntentFunded<'info>>,
        args: IsIntentFundedArgs,
    ) -> Result<bool> {
        is_intent_funded_view(ctx, args)
    }

    pub fn is_fulfilled(ctx: Context<IsFulfilled>, intent_hash: Bytes32) -> Result<bool> {
        is_fulfilled_view(ctx, intent_hash)
    }

    pub fn claimant(ctx: Context<IsFulfilled>, intent_hash: Bytes32) -> Result<Option<Bytes32>> {
        claimant_view(ctx, intent_hash)
    }

    pub fn get_intent_hash(ctx: Context<GetIntentHash>, intent: Intent) -> Result<IntentHashes> {
        get_intent_hash_view(ctx, intent)
    }
}
