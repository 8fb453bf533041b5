use std::collections::BTreeMap;

use anchor_lang::prelude::*;
use anchor_spl::token_interface::{
    close_account, transfer_checked, CloseAccount, Mint, TokenAccount, TransferChecked,
};
use anchor_spl::{token, token_2022};
use derive_new::new;
use eco_std::{keccak, keccak_borsh, Bytes32, SerializableAccountMeta};
use itertools::Itertools;

use crate::instructions::PortalError;

pub const VEC_TOKEN_TRANSFER_ACCOUNTS_CHUNK_SIZE: usize = 3;

/// `[from, to, mint]` triples taken from an instruction's remaining accounts.
pub struct VecTokenTransferAccounts<'info>(Vec<TokenTransferAccounts<'info>>);

impl<'info> TryFrom<&[AccountInfo<'info>]> for VecTokenTransferAccounts<'info> {
    type Error = anchor_lang::error::Error;

    fn try_from(accounts: &[AccountInfo<'info>]) -> Result<Self> {
        accounts
            .iter()
            .chunks(VEC_TOKEN_TRANSFER_ACCOUNTS_CHUNK_SIZE)
            .into_iter()
            .map(|chunk| chunk.collect::<Vec<_>>().try_into())
            .collect::<Result<Vec<TokenTransferAccounts>>>()
            .map(Self)
    }
}

impl<'info> VecTokenTransferAccounts<'info> {
    pub fn into_inner(self) -> Vec<TokenTransferAccounts<'info>> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

pub struct TokenTransferAccounts<'info> {
    pub from: AccountInfo<'info>,
    pub to: AccountInfo<'info>,
    pub mint: AccountInfo<'info>,
}

impl<'info> TryFrom<Vec<&AccountInfo<'info>>> for TokenTransferAccounts<'info> {
    type Error = anchor_lang::error::Error;

    fn try_from(accounts: Vec<&AccountInfo<'info>>) -> Result<Self> {
        match accounts.as_slice() {
            [from, to, mint] => {
                // either side may not exist yet (or any more); the mint decides the program
                let token_program = mint.owner;
                require!(
                    from.data_is_empty() || token_program == from.owner,
                    PortalError::InvalidTokenTransferAccounts
                );
                require!(
                    to.data_is_empty() || token_program == to.owner,
                    PortalError::InvalidTokenTransferAccounts
                );

                Ok(Self {
                    from: from.to_account_info(),
                    to: to.to_account_info(),
                    mint: mint.to_account_info(),
                })
            }
            _ => Err(PortalError::InvalidTokenTransferAccounts.into()),
        }
    }
}

impl<'info> TokenTransferAccounts<'info> {
    /// `signer_seeds` is empty when `authority` signed the transaction itself.
    pub fn transfer(
        &self,
        token_program: &AccountInfo<'info>,
        authority: &AccountInfo<'info>,
        signer_seeds: &[&[&[u8]]],
        amount: u64,
    ) -> Result<()> {
        match amount {
            0 => Ok(()),
            amount => transfer_checked(
                CpiContext::new_with_signer(
                    token_program.to_account_info(),
                    TransferChecked {
                        from: self.from.to_account_info(),
                        to: self.to.to_account_info(),
                        mint: self.mint.to_account_info(),
                        authority: authority.to_account_info(),
                    },
                    signer_seeds,
                ),
                amount,
                self.mint_data()?.decimals,
            ),
        }
    }

    /// Closes `from`, sending its rent to `destination`.
    pub fn close_from(
        &self,
        token_program: &AccountInfo<'info>,
        authority: &AccountInfo<'info>,
        destination: &AccountInfo<'info>,
        signer_seeds: &[&[&[u8]]],
    ) -> Result<()> {
        close_account(CpiContext::new_with_signer(
            token_program.to_account_info(),
            CloseAccount {
                account: self.from.to_account_info(),
                destination: destination.to_account_info(),
                authority: authority.to_account_info(),
            },
            signer_seeds,
        ))
    }

    pub fn token_program_id(&self) -> &Pubkey {
        self.mint.owner
    }

    pub fn mint_data(&self) -> Result<Mint> {
        Mint::try_deserialize(&mut &self.mint.try_borrow_data()?[..])
    }

    pub fn from_data(&self) -> Result<TokenAccount> {
        TokenAccount::try_deserialize(&mut &self.from.try_borrow_data()?[..])
    }

    pub fn to_data(&self) -> Result<TokenAccount> {
        TokenAccount::try_deserialize(&mut &self.to.try_borrow_data()?[..])
    }
}

/// Both SPL token programs, so each transfer can use whichever one owns its mint.
#[derive(Clone)]
pub struct TokenPrograms<'info> {
    pub token_program: AccountInfo<'info>,
    pub token_2022_program: AccountInfo<'info>,
}

impl<'info> TokenPrograms<'info> {
    pub fn new(
        token_program: &Program<'info, token::Token>,
        token_2022_program: &Program<'info, token_2022::Token2022>,
    ) -> Self {
        Self {
            token_program: token_program.to_account_info(),
            token_2022_program: token_2022_program.to_account_info(),
        }
    }

    pub fn select(&self, token_program_id: &Pubkey) -> Result<AccountInfo<'info>> {
        if *token_program_id == token::ID {
            Ok(self.token_program.clone())
        } else if *token_program_id == token_2022::ID {
            Ok(self.token_2022_program.clone())
        } else {
            Err(PortalError::InvalidTokenProgram.into())
        }
    }
}

/// Call payload as carried by `fulfill` on Solana. Instruction data is capped
/// at 1232 bytes per transaction, so the accounts of a call travel as
/// transaction accounts and only their count is inlined.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq, new)]
pub struct Calldata {
    pub data: Vec<u8>,
    pub account_count: u8,
}

/// Call payload as committed to by the route hash: the calldata plus the
/// full account list it is invoked with. `fulfill` rebuilds it from
/// [`Calldata`] and the transaction accounts before hashing.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct CalldataWithAccounts {
    pub calldata: Calldata,
    pub accounts: Vec<SerializableAccountMeta>,
}

impl CalldataWithAccounts {
    pub fn new<T>(calldata: Calldata, accounts: Vec<T>) -> Result<Self>
    where
        T: Into<SerializableAccountMeta>,
    {
        require!(
            accounts.len() == calldata.account_count as usize,
            PortalError::InvalidCalldata,
        );

        Ok(Self {
            calldata,
            accounts: accounts.into_iter().map(Into::into).collect(),
        })
    }
}

pub fn intent_hash(destination: u64, route_hash: &Bytes32, reward_hash: &Bytes32) -> Bytes32 {
    keccak([
        destination.to_be_bytes().as_slice(),
        route_hash.as_ref(),
        reward_hash.as_ref(),
    ])
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq, new)]
pub struct Intent {
    pub destination: u64,
    pub route: Route,
    pub reward: Reward,
}

impl Intent {
    /// `(intent_hash, route_hash, reward_hash)`
    pub fn hashes(&self) -> (Bytes32, Bytes32, Bytes32) {
        let route_hash = self.route.hash();
        let reward_hash = self.reward.hash();

        (
            intent_hash(self.destination, &route_hash, &reward_hash),
            route_hash,
            reward_hash,
        )
    }

    pub fn hash(&self) -> Bytes32 {
        self.hashes().0
    }
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct Route {
    pub salt: Bytes32,
    pub deadline: u64,
    pub portal: Bytes32,
    pub native_amount: u64,
    pub tokens: Vec<TokenAmount>,
    pub calls: Vec<Call>,
}

impl Route {
    /// Hash of the route's borsh encoding. Routes published for Solana are
    /// published as exactly these bytes.
    pub fn hash(&self) -> Bytes32 {
        keccak_borsh(self)
    }

    pub fn token_amounts(&self) -> Result<BTreeMap<Pubkey, u64>> {
        token_amounts(&self.tokens)
    }
}

/// Hash of a route published as opaque, destination-encoded bytes.
pub fn route_hash(route: &[u8]) -> Bytes32 {
    keccak([route])
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct Reward {
    pub deadline: u64,
    pub creator: Pubkey,
    pub prover: Pubkey,
    pub native_amount: u64,
    pub tokens: Vec<TokenAmount>,
}

impl Reward {
    pub fn hash(&self) -> Bytes32 {
        keccak_borsh(self)
    }

    pub fn token_amounts(&self) -> Result<BTreeMap<Pubkey, u64>> {
        token_amounts(&self.tokens)
    }
}

/// Aggregates duplicate legs of the same mint.
fn token_amounts(tokens: &[TokenAmount]) -> Result<BTreeMap<Pubkey, u64>> {
    tokens
        .iter()
        .try_fold(BTreeMap::<Pubkey, u64>::new(), |mut result, token| {
            let entry = result.entry(token.token).or_default();
            *entry = entry
                .checked_add(token.amount)
                .ok_or(PortalError::TokenAmountOverflow)?;

            Ok(result)
        })
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq, new)]
pub struct TokenAmount {
    pub token: Pubkey,
    pub amount: u64,
}

/// One step of a route. On Solana `target` is the program to invoke and
/// `value` must be zero: lamports move through explicit system program calls.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq, new)]
pub struct Call {
    pub target: Bytes32,
    pub data: Vec<u8>,
    pub value: u64,
}
