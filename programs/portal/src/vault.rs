use std::collections::{BTreeMap, BTreeSet};

use anchor_lang::prelude::*;
use anchor_lang::solana_program::program::invoke_signed;
use anchor_lang::solana_program::system_instruction;
use anchor_spl::associated_token::get_associated_token_address_with_program_id;
use eco_std::Bytes32;

use crate::instructions::PortalError;
use crate::state::{vault_pda, VAULT_SEED};
use crate::types::{TokenPrograms, TokenTransferAccounts, VecTokenTransferAccounts};

/// Accounts every release needs besides the vault itself.
pub struct Settlement<'info> {
    /// Collects the rent of closed vault token accounts.
    pub payer: AccountInfo<'info>,
    pub token_programs: TokenPrograms<'info>,
    pub system_program: Program<'info, System>,
}

/// Escrow of one intent: a system-owned PDA holding the native reward, and
/// its associated token accounts holding the token rewards. Nothing but the
/// portal can sign for it, and every release empties what it releases.
pub struct Vault<'info> {
    account: AccountInfo<'info>,
    intent_hash: Bytes32,
    bump: u8,
}

impl<'info> Vault<'info> {
    pub fn new(account: &AccountInfo<'info>, intent_hash: Bytes32) -> Result<Self> {
        let (vault_pda, bump) = vault_pda(&intent_hash);
        require!(account.key() == vault_pda, PortalError::InvalidVault);

        Ok(Self {
            account: account.clone(),
            intent_hash,
            bump,
        })
    }

    pub fn account(&self) -> &AccountInfo<'info> {
        &self.account
    }

    pub fn ata(&self, mint: &Pubkey, token_program_id: &Pubkey) -> Pubkey {
        get_associated_token_address_with_program_id(self.account.key, mint, token_program_id)
    }

    fn signed<T>(&self, f: impl FnOnce(&[&[&[u8]]]) -> T) -> T {
        let bump = [self.bump];
        let signer_seeds: [&[u8]; 3] = [VAULT_SEED, self.intent_hash.as_ref(), &bump];

        f(&[&signer_seeds])
    }

    /// Claim and refund release: sweeps the whole native balance and every
    /// reward token balance to `target`.
    pub fn release(
        &self,
        target: &AccountInfo<'info>,
        token_accounts: VecTokenTransferAccounts<'info>,
        reward_token_amounts: &BTreeMap<Pubkey, u64>,
        settlement: &Settlement<'info>,
    ) -> Result<()> {
        self.sweep_native(target, &settlement.system_program.to_account_info())?;
        self.sweep_reward_tokens(
            token_accounts,
            reward_token_amounts,
            target.key,
            &settlement.payer,
            &settlement.token_programs,
        )
    }

    /// Moves the whole native balance to `target`.
    pub fn sweep_native(
        &self,
        target: &AccountInfo<'info>,
        system_program: &AccountInfo<'info>,
    ) -> Result<u64> {
        let amount = self.account.lamports();
        if amount == 0 {
            return Ok(0);
        }

        self.signed(|signer_seeds| {
            invoke_signed(
                &system_instruction::transfer(self.account.key, target.key, amount),
                &[
                    self.account.clone(),
                    target.clone(),
                    system_program.clone(),
                ],
                signer_seeds,
            )
        })?;

        Ok(amount)
    }

    /// Moves every reward token balance to `target`'s token accounts and
    /// closes the emptied vault token accounts, their rent going to
    /// `rent_collector`. Accounts are expected for exactly the reward mints;
    /// vault token accounts that were already closed are skipped.
    pub fn sweep_reward_tokens(
        &self,
        accounts: VecTokenTransferAccounts<'info>,
        reward_token_amounts: &BTreeMap<Pubkey, u64>,
        target: &Pubkey,
        rent_collector: &AccountInfo<'info>,
        token_programs: &TokenPrograms<'info>,
    ) -> Result<()> {
        let accounts = accounts.into_inner();
        let mints = accounts
            .iter()
            .map(|accounts| accounts.mint.key())
            .collect::<BTreeSet<_>>();

        require!(
            mints.len() == accounts.len() && mints.iter().eq(reward_token_amounts.keys()),
            PortalError::InvalidMint
        );

        accounts.iter().try_for_each(|accounts| {
            if accounts.from.data_is_empty() {
                return self.check_ata(accounts);
            }

            self.sweep_token(accounts, target, token_programs)?;

            let token_program = token_programs.select(accounts.token_program_id())?;
            self.signed(|signer_seeds| {
                accounts.close_from(&token_program, &self.account, rent_collector, signer_seeds)
            })
        })
    }

    /// Moves the vault's whole balance of one token to `target`'s token
    /// account, leaving the vault token account open.
    pub fn sweep_token(
        &self,
        accounts: &TokenTransferAccounts<'info>,
        target: &Pubkey,
        token_programs: &TokenPrograms<'info>,
    ) -> Result<u64> {
        self.check_ata(accounts)?;
        require!(
            accounts.to_data()?.owner == *target,
            PortalError::InvalidTargetToken
        );

        let amount = accounts.from_data()?.amount;
        let token_program = token_programs.select(accounts.token_program_id())?;
        self.signed(|signer_seeds| {
            accounts.transfer(&token_program, &self.account, signer_seeds, amount)
        })?;

        Ok(amount)
    }

    fn check_ata(&self, accounts: &TokenTransferAccounts<'info>) -> Result<()> {
        require!(
            accounts.from.key() == self.ata(accounts.mint.key, accounts.token_program_id()),
            PortalError::InvalidVaultAta
        );

        Ok(())
    }
}
