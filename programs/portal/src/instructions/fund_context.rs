use std::collections::{BTreeMap, BTreeSet};

use anchor_lang::prelude::*;
use anchor_lang::solana_program::program_option::COption;
use anchor_lang::system_program;
use anchor_spl::associated_token::{self, get_associated_token_address_with_program_id};
use anchor_spl::token_interface::TokenAccount;

use crate::instructions::{Fulfill, Fund, FundFor, PortalError};
use crate::state::{funding_delegate_pda, FUNDING_DELEGATE_SEED};
use crate::types::{TokenPrograms, TokenTransferAccounts, VecTokenTransferAccounts};

/// Who signs the pulls out of the funder's token accounts.
#[derive(Clone)]
pub enum FundingAuthority<'info> {
    /// The funder signed the transaction.
    Owner(AccountInfo<'info>),
    /// The funder approved the portal's funding delegate beforehand.
    Delegate(AccountInfo<'info>),
}

/// How one funding pass went.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FundingOutcome {
    /// Whether any lamports or tokens actually moved.
    pub moved: bool,
    /// Whether every leg of the requirement is now covered.
    pub complete: bool,
}

impl FundingOutcome {
    fn and(self, other: Self) -> Self {
        Self {
            moved: self.moved || other.moved,
            complete: self.complete && other.complete,
        }
    }
}

/// Tops up `fundee` (a vault, or the executor during `fulfill`) from a
/// funder's accounts until it holds the requested amounts.
pub struct FundContext<'info> {
    pub payer: AccountInfo<'info>,
    pub funder: Pubkey,
    pub native_source: AccountInfo<'info>,
    pub authority: FundingAuthority<'info>,
    pub fundee: AccountInfo<'info>,
    pub token_programs: TokenPrograms<'info>,
    pub associated_token_program: AccountInfo<'info>,
    pub system_program: AccountInfo<'info>,
}

impl<'info> From<&Context<'_, '_, '_, 'info, Fund<'info>>> for FundContext<'info> {
    fn from(ctx: &Context<'_, '_, '_, 'info, Fund<'info>>) -> Self {
        Self {
            payer: ctx.accounts.payer.to_account_info(),
            funder: ctx.accounts.funder.key(),
            native_source: ctx.accounts.funder.to_account_info(),
            authority: FundingAuthority::Owner(ctx.accounts.funder.to_account_info()),
            fundee: ctx.accounts.vault.to_account_info(),
            token_programs: TokenPrograms::new(
                &ctx.accounts.token_program,
                &ctx.accounts.token_2022_program,
            ),
            associated_token_program: ctx.accounts.associated_token_program.to_account_info(),
            system_program: ctx.accounts.system_program.to_account_info(),
        }
    }
}

impl<'info> From<&Context<'_, '_, '_, 'info, FundFor<'info>>> for FundContext<'info> {
    fn from(ctx: &Context<'_, '_, '_, 'info, FundFor<'info>>) -> Self {
        Self {
            payer: ctx.accounts.payer.to_account_info(),
            funder: ctx.accounts.funder.key(),
            // native value cannot be pulled from a third party
            native_source: ctx.accounts.payer.to_account_info(),
            authority: FundingAuthority::Delegate(ctx.accounts.funding_delegate.to_account_info()),
            fundee: ctx.accounts.vault.to_account_info(),
            token_programs: TokenPrograms::new(
                &ctx.accounts.token_program,
                &ctx.accounts.token_2022_program,
            ),
            associated_token_program: ctx.accounts.associated_token_program.to_account_info(),
            system_program: ctx.accounts.system_program.to_account_info(),
        }
    }
}

impl<'info> From<&Fulfill<'info>> for FundContext<'info> {
    fn from(accounts: &Fulfill<'info>) -> Self {
        Self {
            payer: accounts.payer.to_account_info(),
            funder: accounts.solver.key(),
            native_source: accounts.solver.to_account_info(),
            authority: FundingAuthority::Owner(accounts.solver.to_account_info()),
            fundee: accounts.executor.to_account_info(),
            token_programs: TokenPrograms::new(
                &accounts.token_program,
                &accounts.token_2022_program,
            ),
            associated_token_program: accounts.associated_token_program.to_account_info(),
            system_program: accounts.system_program.to_account_info(),
        }
    }
}

impl<'info> FundContext<'info> {
    /// Funds the native leg and every token leg. Without `allow_partial`,
    /// any leg that cannot be covered in full fails the whole pass before it
    /// moves anything.
    pub fn fund(
        &self,
        native_amount: u64,
        accounts: VecTokenTransferAccounts<'info>,
        token_amounts: &BTreeMap<Pubkey, u64>,
        allow_partial: bool,
    ) -> Result<FundingOutcome> {
        let accounts = accounts.into_inner();
        let mints = accounts
            .iter()
            .map(|accounts| accounts.mint.key())
            .collect::<BTreeSet<_>>();

        require!(
            mints.len() == accounts.len() && mints.iter().eq(token_amounts.keys()),
            PortalError::InvalidMint
        );

        if !allow_partial {
            self.check_native(native_amount)?;
            accounts
                .iter()
                .try_for_each(|accounts| self.check_token(accounts, token_amounts))?;
        }

        accounts.iter().try_fold(
            self.fund_native(native_amount)?,
            |outcome, accounts| {
                self.fund_token(accounts, token_amounts)
                    .map(|token_outcome| outcome.and(token_outcome))
            },
        )
    }

    fn check_native(&self, native_amount: u64) -> Result<()> {
        let remaining = native_amount.saturating_sub(self.fundee.lamports());
        require!(
            self.native_source.lamports() >= remaining,
            PortalError::InsufficientNativeReward
        );

        Ok(())
    }

    fn fund_native(&self, native_amount: u64) -> Result<FundingOutcome> {
        let amount = native_amount
            .saturating_sub(self.fundee.lamports())
            .min(self.native_source.lamports());

        if amount > 0 {
            system_program::transfer(
                CpiContext::new(
                    self.system_program.to_account_info(),
                    system_program::Transfer {
                        from: self.native_source.to_account_info(),
                        to: self.fundee.to_account_info(),
                    },
                ),
                amount,
            )?;
        }

        Ok(FundingOutcome {
            moved: amount > 0,
            complete: self.fundee.lamports() >= native_amount,
        })
    }

    fn check_token(
        &self,
        accounts: &TokenTransferAccounts<'info>,
        token_amounts: &BTreeMap<Pubkey, u64>,
    ) -> Result<()> {
        let required = required_amount(accounts, token_amounts)?;
        let funded = self.fundee_balance(accounts)?;
        let remaining = required.saturating_sub(funded);
        if remaining == 0 {
            return Ok(());
        }

        let from_data = self.source_data(accounts)?;
        require!(
            self.allowance(&from_data) >= remaining,
            PortalError::InsufficientTokenAllowance
        );
        require!(
            from_data.amount >= remaining,
            PortalError::InsufficientFunding
        );

        Ok(())
    }

    fn fund_token(
        &self,
        accounts: &TokenTransferAccounts<'info>,
        token_amounts: &BTreeMap<Pubkey, u64>,
    ) -> Result<FundingOutcome> {
        let required = required_amount(accounts, token_amounts)?;
        let funded = self.fundee_balance(accounts)?;

        let amount = match required.saturating_sub(funded) {
            0 => 0,
            remaining => {
                let from_data = self.source_data(accounts)?;
                remaining
                    .min(from_data.amount)
                    .min(self.allowance(&from_data))
            }
        };

        if amount == 0 {
            return Ok(FundingOutcome {
                moved: false,
                complete: funded >= required,
            });
        }

        let token_program = self
            .token_programs
            .select(accounts.token_program_id())?;
        self.ensure_fundee_ata_initialized(accounts, &token_program)?;

        match &self.authority {
            FundingAuthority::Owner(owner) => {
                accounts.transfer(&token_program, owner, &[], amount)?
            }
            FundingAuthority::Delegate(delegate) => {
                let (_, bump) = funding_delegate_pda();
                let signer_seeds: [&[u8]; 2] = [FUNDING_DELEGATE_SEED, &[bump]];

                accounts.transfer(&token_program, delegate, &[&signer_seeds], amount)?
            }
        }

        Ok(FundingOutcome {
            moved: true,
            complete: funded.saturating_add(amount) >= required,
        })
    }

    fn source_data(&self, accounts: &TokenTransferAccounts<'info>) -> Result<TokenAccount> {
        let from_data = accounts.from_data()?;
        require!(
            from_data.owner == self.funder,
            PortalError::InvalidFunderToken
        );

        Ok(from_data)
    }

    /// How much the authority may pull out of `from_data`.
    fn allowance(&self, from_data: &TokenAccount) -> u64 {
        match &self.authority {
            FundingAuthority::Owner(_) => u64::MAX,
            FundingAuthority::Delegate(delegate) => match from_data.delegate {
                COption::Some(approved) if approved == delegate.key() => {
                    from_data.delegated_amount
                }
                _ => 0,
            },
        }
    }

    fn fundee_balance(&self, accounts: &TokenTransferAccounts<'info>) -> Result<u64> {
        self.check_fundee_ata(accounts)?;

        match accounts.to.data_is_empty() {
            true => Ok(0),
            false => accounts.to_data().map(|to_data| to_data.amount),
        }
    }

    fn check_fundee_ata(&self, accounts: &TokenTransferAccounts<'info>) -> Result<()> {
        let fundee_ata = get_associated_token_address_with_program_id(
            self.fundee.key,
            accounts.mint.key,
            accounts.token_program_id(),
        );
        require!(fundee_ata == *accounts.to.key, PortalError::InvalidAta);

        Ok(())
    }

    fn ensure_fundee_ata_initialized(
        &self,
        accounts: &TokenTransferAccounts<'info>,
        token_program: &AccountInfo<'info>,
    ) -> Result<()> {
        if accounts.to.data_is_empty() {
            let cpi_accounts = associated_token::Create {
                payer: self.payer.to_account_info(),
                associated_token: accounts.to.to_account_info(),
                authority: self.fundee.to_account_info(),
                mint: accounts.mint.to_account_info(),
                system_program: self.system_program.to_account_info(),
                token_program: token_program.to_account_info(),
            };
            let cpi_ctx = CpiContext::new(
                self.associated_token_program.to_account_info(),
                cpi_accounts,
            );

            associated_token::create(cpi_ctx)?;
        }

        Ok(())
    }
}

fn required_amount(
    accounts: &TokenTransferAccounts<'_>,
    token_amounts: &BTreeMap<Pubkey, u64>,
) -> Result<u64> {
    token_amounts
        .get(accounts.mint.key)
        .copied()
        .ok_or(PortalError::InvalidMint.into())
}
