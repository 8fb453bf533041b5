use std::collections::BTreeMap;

use anchor_lang::prelude::*;
use derive_new::new;
use eco_std::account::AccountExt;
use eco_std::Bytes32;

use crate::instructions::PortalError;
use crate::types::Reward;

pub const VAULT_SEED: &[u8] = b"vault";
pub const VAULT_STATE_SEED: &[u8] = b"vault_state";
pub const FULFILL_MARKER_SEED: &[u8] = b"fulfill_marker";
pub const EXECUTOR_SEED: &[u8] = b"executor";
pub const DISPATCHER_SEED: &[u8] = b"dispatcher";
pub const FUNDING_DELEGATE_SEED: &[u8] = b"funding_delegate";

/// System-owned escrow holding the reward of `intent_hash`. Reward tokens sit
/// in its associated token accounts.
pub fn vault_pda(intent_hash: &Bytes32) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[VAULT_SEED, intent_hash.as_ref()], &crate::ID)
}

/// Signs route calls during `fulfill`.
pub fn executor_pda() -> (Pubkey, u8) {
    Pubkey::find_program_address(&[EXECUTOR_SEED], &crate::ID)
}

/// Signs `prove` calls into provers, so a prover can tell the portal apart.
pub fn dispatcher_pda() -> (Pubkey, u8) {
    Pubkey::find_program_address(&[DISPATCHER_SEED], &crate::ID)
}

/// Token owners approve this PDA to let third parties fund on their behalf.
pub fn funding_delegate_pda() -> (Pubkey, u8) {
    Pubkey::find_program_address(&[FUNDING_DELEGATE_SEED], &crate::ID)
}

#[derive(
    AnchorSerialize, AnchorDeserialize, InitSpace, Clone, Copy, Debug, Default, PartialEq, Eq,
)]
pub enum RewardStatus {
    #[default]
    Initial,
    Funded,
    PartiallyFunded,
    Claimed,
    Refunded,
}

impl RewardStatus {
    /// Claimed and Refunded are terminal.
    pub fn is_settled(&self) -> bool {
        matches!(self, Self::Claimed | Self::Refunded)
    }
}

/// Why the vault last moved funds out, or `Fund` while it only takes them in.
#[derive(
    AnchorSerialize, AnchorDeserialize, InitSpace, Clone, Copy, Debug, Default, PartialEq, Eq,
)]
pub enum VaultMode {
    #[default]
    Fund,
    Claim,
    Refund,
    RecoverToken,
}

/// Settlement record of one intent. Created on first funding or settlement;
/// an intent without one reads as `Initial`.
#[account]
#[derive(InitSpace, Copy, Debug, Default, PartialEq, Eq)]
pub struct VaultState {
    pub status: RewardStatus,
    pub mode: VaultMode,
    pub target: Option<Pubkey>,
    pub allow_partial: bool,
}

impl AccountExt for VaultState {}

impl VaultState {
    pub fn pda(intent_hash: &Bytes32) -> (Pubkey, u8) {
        Pubkey::find_program_address(&[VAULT_STATE_SEED, intent_hash.as_ref()], &crate::ID)
    }

    pub fn load(account: &AccountInfo<'_>, intent_hash: &Bytes32) -> Result<Self> {
        require!(
            account.key() == Self::pda(intent_hash).0,
            PortalError::InvalidVaultState
        );

        Ok(Self::read(account)?.unwrap_or_default())
    }

    pub fn save<'info>(
        &self,
        account: &AccountInfo<'info>,
        intent_hash: &Bytes32,
        payer: &AccountInfo<'info>,
        system_program: &Program<'info, System>,
    ) -> Result<()> {
        if *account.owner == crate::ID && !account.data_is_empty() {
            return self.write(account);
        }

        let (_, bump) = Self::pda(intent_hash);
        let signer_seeds: [&[u8]; 3] = [VAULT_STATE_SEED, intent_hash.as_ref(), &[bump]];

        self.init(account, payer, system_program, &[&signer_seeds])
    }

    /// Status after a funding pass that left the vault `complete` or not.
    /// A top-up of an already partial vault stays partial until complete.
    pub fn funded(&mut self, complete: bool, allow_partial: bool) {
        self.mode = VaultMode::Fund;
        self.allow_partial = allow_partial;
        self.status = if complete {
            RewardStatus::Funded
        } else {
            RewardStatus::PartiallyFunded
        };
    }

    pub fn released(&mut self, mode: VaultMode, target: Pubkey) {
        self.mode = mode;
        self.target = Some(target);
        self.status = match mode {
            VaultMode::Claim => RewardStatus::Claimed,
            VaultMode::Refund => RewardStatus::Refunded,
            VaultMode::Fund | VaultMode::RecoverToken => self.status,
        };
    }
}

/// Written once by `fulfill`: who may claim the reward of the intent.
#[account]
#[derive(InitSpace, Debug, new)]
pub struct FulfillMarker {
    pub claimant: Bytes32,
    pub bump: u8,
}

impl AccountExt for FulfillMarker {}

impl FulfillMarker {
    pub fn pda(intent_hash: &Bytes32) -> (Pubkey, u8) {
        Pubkey::find_program_address(&[FULFILL_MARKER_SEED, intent_hash.as_ref()], &crate::ID)
    }
}

/// Whether the vault currently covers `reward`. Settled intents never count as
/// funded, whatever is left in the vault.
pub fn is_intent_funded(
    reward: &Reward,
    status: RewardStatus,
    vault_lamports: u64,
    vault_balances: &BTreeMap<Pubkey, u64>,
) -> Result<bool> {
    match status {
        RewardStatus::Funded => Ok(true),
        RewardStatus::Claimed | RewardStatus::Refunded => Ok(false),
        RewardStatus::Initial | RewardStatus::PartiallyFunded => {
            Ok(vault_lamports >= reward.native_amount
                && reward.token_amounts()?.iter().all(|(mint, amount)| {
                    vault_balances.get(mint).copied().unwrap_or_default() >= *amount
                }))
        }
    }
}
