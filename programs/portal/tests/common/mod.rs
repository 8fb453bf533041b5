#![allow(dead_code)]

use std::ops::Deref;

use anchor_lang::prelude::AccountMeta;
use anchor_lang::{AnchorSerialize, Event, InstructionData, ToAccountMetas};
use anchor_spl::associated_token::get_associated_token_address_with_program_id;
use anchor_spl::associated_token::spl_associated_token_account::instruction::create_associated_token_account;
use anchor_spl::token::{self, spl_token};
use anchor_spl::token_2022::{self, spl_token_2022};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use derive_more::{Deref, DerefMut};
use eco_std::{Bytes32, Proof};
use litesvm::types::{FailedTransactionMetadata, TransactionMetadata};
use litesvm::LiteSVM;
use portal::state::{self, FulfillMarker, VaultState};
use portal::types::{Call, Reward, Route, TokenAmount};
use rand::random;
use solana_sdk::clock::Clock;
use solana_sdk::compute_budget::ComputeBudgetInstruction;
use solana_sdk::instruction::{Instruction, InstructionError};
use solana_sdk::message::Message;
use solana_sdk::program_pack::Pack;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::rent::Rent;
use solana_sdk::signature::Keypair;
use solana_sdk::signer::Signer;
use solana_sdk::transaction::{Transaction, TransactionError};

const COMPUTE_UNIT_LIMIT: u32 = 1_000_000;
const PORTAL_BIN: &[u8] = include_bytes!("../../../../target/deploy/portal.so");

pub type TransactionResult = Result<TransactionMetadata, Box<FailedTransactionMetadata>>;

#[derive(Deref, DerefMut)]
pub struct Context {
    #[deref]
    #[deref_mut]
    svm: LiteSVM,
    mint_authority: Keypair,
    pub token_program: Pubkey,
    pub creator: Keypair,
    pub payer: Keypair,
    pub funder: Keypair,
    pub solver: Keypair,
}

impl Default for Context {
    fn default() -> Self {
        let mut svm = LiteSVM::new();
        svm.add_program(portal::ID, PORTAL_BIN);

        let mint_authority = Keypair::new();
        let creator = Keypair::new();
        let payer = Keypair::new();
        let funder = Keypair::new();
        let solver = Keypair::new();

        svm.airdrop(&mint_authority.pubkey(), sol_amount(100.0))
            .unwrap();
        svm.airdrop(&payer.pubkey(), sol_amount(10.0)).unwrap();

        Self {
            svm,
            mint_authority,
            token_program: token::ID,
            creator,
            payer,
            funder,
            solver,
        }
    }
}

impl Context {
    pub fn new_with_token_2022() -> Self {
        Self {
            token_program: token_2022::ID,
            ..Default::default()
        }
    }

    pub fn now(&self) -> u64 {
        self.svm.get_sysvar::<Clock>().unix_timestamp as u64
    }

    /// Reward of 1 SOL and two freshly minted tokens, proven by `prover`.
    pub fn rand_reward(&mut self, prover: Pubkey) -> Reward {
        let tokens = self.rand_tokens();

        Reward {
            deadline: self.now() + 3600,
            creator: self.creator.pubkey(),
            prover,
            native_amount: sol_amount(1.0),
            tokens,
        }
    }

    /// Route on this chain without calls and without native value.
    pub fn rand_route(&mut self) -> Route {
        let tokens = self.rand_tokens();

        Route {
            salt: random::<[u8; 32]>().into(),
            deadline: self.now() + 1800,
            portal: portal::ID.into(),
            native_amount: 0,
            tokens,
            calls: vec![],
        }
    }

    fn rand_tokens(&mut self) -> Vec<TokenAmount> {
        (0..2)
            .map(|i| {
                let mint = Pubkey::new_unique();
                self.set_mint_account(&mint);

                TokenAmount::new(mint, (i + 1) * 1_000_000)
            })
            .collect()
    }

    pub fn set_mint_account(&mut self, mint: &Pubkey) {
        let (data, len) = if self.token_program == token::ID {
            let mut data = [0u8; spl_token::state::Mint::LEN];
            spl_token::state::Mint::pack(
                spl_token::state::Mint {
                    decimals: 6,
                    is_initialized: true,
                    mint_authority: Some(self.mint_authority.pubkey()).into(),
                    supply: 0,
                    freeze_authority: None.into(),
                },
                &mut data,
            )
            .unwrap();

            (data.to_vec(), spl_token::state::Mint::LEN)
        } else {
            let mut data = [0u8; spl_token_2022::state::Mint::LEN];
            spl_token_2022::state::Mint::pack(
                spl_token_2022::state::Mint {
                    decimals: 6,
                    is_initialized: true,
                    mint_authority: Some(self.mint_authority.pubkey()).into(),
                    supply: 0,
                    freeze_authority: None.into(),
                },
                &mut data,
            )
            .unwrap();

            (data.to_vec(), spl_token_2022::state::Mint::LEN)
        };

        let mint_account = solana_sdk::account::Account {
            lamports: self.get_sysvar::<Rent>().minimum_balance(len),
            data,
            owner: self.token_program,
            executable: false,
            rent_epoch: 0,
        };

        self.set_account(*mint, mint_account).unwrap();
    }

    pub fn ata(&self, owner: &Pubkey, mint: &Pubkey) -> Pubkey {
        get_associated_token_address_with_program_id(owner, mint, &self.token_program)
    }

    pub fn airdrop_token_ata(&mut self, mint: &Pubkey, recipient: &Pubkey, amount: u64) {
        let recipient_token = self.ata(recipient, mint);

        let mut instructions = if self.get_account(&recipient_token).is_none() {
            vec![create_associated_token_account(
                &self.mint_authority.pubkey(),
                recipient,
                mint,
                &self.token_program,
            )]
        } else {
            vec![]
        };

        if amount > 0 {
            instructions.push(match self.token_program {
                token::ID => spl_token::instruction::mint_to(
                    &self.token_program,
                    mint,
                    &recipient_token,
                    &self.mint_authority.pubkey(),
                    &[],
                    amount,
                )
                .unwrap(),
                _ => spl_token_2022::instruction::mint_to(
                    &self.token_program,
                    mint,
                    &recipient_token,
                    &self.mint_authority.pubkey(),
                    &[],
                    amount,
                )
                .unwrap(),
            });
        }

        let transaction = Transaction::new(
            &[&self.mint_authority],
            Message::new(&instructions, Some(&self.mint_authority.pubkey())),
            self.latest_blockhash(),
        );

        self.send_transaction(transaction).unwrap();
    }

    /// Lets the portal's funding delegate pull `amount` of `mint` from the
    /// funder's token account.
    pub fn approve_funding_delegate(&mut self, mint: &Pubkey, amount: u64) {
        let funder = self.funder.pubkey();
        let funder_token = self.ata(&funder, mint);
        let delegate = state::funding_delegate_pda().0;
        let instruction = match self.token_program {
            token::ID => spl_token::instruction::approve(
                &self.token_program,
                &funder_token,
                &delegate,
                &funder,
                &[],
                amount,
            )
            .unwrap(),
            _ => spl_token_2022::instruction::approve(
                &self.token_program,
                &funder_token,
                &delegate,
                &funder,
                &[],
                amount,
            )
            .unwrap(),
        };
        let transaction = Transaction::new(
            &[&self.payer, &self.funder],
            Message::new(&[instruction], Some(&self.payer.pubkey())),
            self.latest_blockhash(),
        );

        self.send_transaction(transaction).unwrap();
    }

    pub fn balance(&self, pubkey: &Pubkey) -> u64 {
        self.svm.get_balance(pubkey).unwrap_or_default()
    }

    pub fn token_balance(&self, pubkey: &Pubkey) -> u64 {
        self.get_account(pubkey)
            .and_then(|account| {
                if self.token_program == token::ID {
                    spl_token::state::Account::unpack(&account.data)
                        .ok()
                        .map(|account| account.amount)
                } else {
                    spl_token_2022::extension::StateWithExtensions::<
                        spl_token_2022::state::Account,
                    >::unpack(&account.data)
                    .ok()
                    .map(|state| state.base.amount)
                }
            })
            .unwrap_or_default()
    }

    pub fn token_balance_ata(&self, mint: &Pubkey, owner: &Pubkey) -> u64 {
        self.token_balance(&self.ata(owner, mint))
    }

    pub fn account<T: anchor_lang::AccountDeserialize>(&self, pubkey: &Pubkey) -> Option<T> {
        self.svm
            .get_account(pubkey)
            .and_then(|account| T::try_deserialize(&mut account.data.as_slice()).ok())
    }

    pub fn vault_state(&self, intent_hash: &Bytes32) -> Option<VaultState> {
        self.account(&VaultState::pda(intent_hash).0)
    }

    pub fn fulfill_marker(&self, intent_hash: &Bytes32) -> Option<FulfillMarker> {
        self.account(&FulfillMarker::pda(intent_hash).0)
    }

    /// Stores a proof the way a prover program would have written it.
    pub fn set_proof(&mut self, intent_hash: &Bytes32, prover: &Pubkey, proof: Proof) {
        let mut data = vec![0u8; 8];
        proof.serialize(&mut data).unwrap();

        let account = solana_sdk::account::Account {
            lamports: self.get_sysvar::<Rent>().minimum_balance(data.len()),
            data,
            owner: *prover,
            executable: false,
            rent_epoch: 0,
        };

        self.set_account(Proof::pda(intent_hash, prover).0, account)
            .unwrap();
    }

    pub fn warp_to_timestamp(&mut self, unix_timestamp: u64) {
        let mut clock = self.get_sysvar::<Clock>();
        clock.unix_timestamp = unix_timestamp as i64;

        self.set_sysvar(&clock);
    }

    /// `[from token, to token, mint]` for every token, the layout every
    /// portal instruction expects in its remaining accounts.
    pub fn token_transfer_accounts(
        &self,
        from: &Pubkey,
        to: &Pubkey,
        tokens: &[TokenAmount],
    ) -> Vec<AccountMeta> {
        tokens
            .iter()
            .flat_map(|token| {
                vec![
                    AccountMeta::new(self.ata(from, &token.token), false),
                    AccountMeta::new(self.ata(to, &token.token), false),
                    AccountMeta::new_readonly(token.token, false),
                ]
            })
            .collect()
    }

    pub fn publish(&mut self, destination: u64, route: Vec<u8>, reward: Reward) -> TransactionResult {
        let intent_hash = portal::types::intent_hash(
            destination,
            &portal::types::route_hash(&route),
            &reward.hash(),
        );
        let args = portal::instructions::PublishArgs {
            destination,
            route,
            reward,
        };
        let accounts = portal::accounts::Publish {
            vault_state: VaultState::pda(&intent_hash).0,
        }
        .to_account_metas(None);

        self.send_portal_instruction(
            portal::instruction::Publish { args }.data(),
            accounts,
            &[],
        )
    }

    pub fn fund(
        &mut self,
        destination: u64,
        route_hash: Bytes32,
        reward: Reward,
        allow_partial: bool,
    ) -> TransactionResult {
        let tokens = reward.tokens.clone();

        self.fund_with_tokens(destination, route_hash, reward, allow_partial, &tokens)
    }

    /// Gives the funder exactly what `reward` asks for on top of one SOL and
    /// funds the intent in full.
    pub fn fund_fully(&mut self, destination: u64, route_hash: Bytes32, reward: &Reward) {
        let funder = self.funder.pubkey();

        self.airdrop(&funder, reward.native_amount + sol_amount(1.0))
            .unwrap();
        reward.tokens.iter().for_each(|token| {
            self.airdrop_token_ata(&token.token, &funder, token.amount);
        });

        self.fund(destination, route_hash, reward.clone(), false)
            .unwrap();
    }

    /// Creates empty token accounts of `owner` for every reward token.
    pub fn create_token_accounts(&mut self, owner: &Pubkey, reward: &Reward) {
        reward.tokens.iter().for_each(|token| {
            self.airdrop_token_ata(&token.token, owner, 0);
        });
    }

    /// `fund` passing token transfer accounts for `tokens` only.
    pub fn fund_with_tokens(
        &mut self,
        destination: u64,
        route_hash: Bytes32,
        reward: Reward,
        allow_partial: bool,
        tokens: &[TokenAmount],
    ) -> TransactionResult {
        let intent_hash = portal::types::intent_hash(destination, &route_hash, &reward.hash());
        let vault = state::vault_pda(&intent_hash).0;
        let token_accounts = self.token_transfer_accounts(&self.funder.pubkey(), &vault, tokens);
        let args = portal::instructions::FundArgs {
            destination,
            route_hash,
            reward,
            allow_partial,
        };
        let accounts = self.fund_accounts(vault, &intent_hash);

        self.send_portal_instruction_as_funder(
            portal::instruction::Fund { args }.data(),
            accounts.into_iter().chain(token_accounts).collect(),
        )
    }

    pub fn publish_and_fund(
        &mut self,
        destination: u64,
        route: Vec<u8>,
        reward: Reward,
        allow_partial: bool,
    ) -> TransactionResult {
        let intent_hash = portal::types::intent_hash(
            destination,
            &portal::types::route_hash(&route),
            &reward.hash(),
        );
        let vault = state::vault_pda(&intent_hash).0;
        let token_accounts =
            self.token_transfer_accounts(&self.funder.pubkey(), &vault, &reward.tokens);
        let args = portal::instructions::PublishAndFundArgs {
            destination,
            route,
            reward,
            allow_partial,
        };
        let accounts = self.fund_accounts(vault, &intent_hash);

        self.send_portal_instruction_as_funder(
            portal::instruction::PublishAndFund { args }.data(),
            accounts.into_iter().chain(token_accounts).collect(),
        )
    }

    pub fn fund_for(
        &mut self,
        destination: u64,
        route_hash: Bytes32,
        reward: Reward,
        allow_partial: bool,
    ) -> TransactionResult {
        let intent_hash = portal::types::intent_hash(destination, &route_hash, &reward.hash());
        let vault = state::vault_pda(&intent_hash).0;
        let token_accounts =
            self.token_transfer_accounts(&self.funder.pubkey(), &vault, &reward.tokens);
        let args = portal::instructions::FundArgs {
            destination,
            route_hash,
            reward,
            allow_partial,
        };
        let accounts = portal::accounts::FundFor {
            payer: self.payer.pubkey(),
            funder: self.funder.pubkey(),
            funding_delegate: state::funding_delegate_pda().0,
            vault,
            vault_state: VaultState::pda(&intent_hash).0,
            token_program: token::ID,
            token_2022_program: token_2022::ID,
            associated_token_program: anchor_spl::associated_token::ID,
            system_program: anchor_lang::system_program::ID,
        }
        .to_account_metas(None);

        self.send_portal_instruction(
            portal::instruction::FundFor { args }.data(),
            accounts.into_iter().chain(token_accounts).collect(),
            &[],
        )
    }

    fn fund_accounts(&self, vault: Pubkey, intent_hash: &Bytes32) -> Vec<AccountMeta> {
        portal::accounts::Fund {
            payer: self.payer.pubkey(),
            funder: self.funder.pubkey(),
            vault,
            vault_state: VaultState::pda(intent_hash).0,
            token_program: token::ID,
            token_2022_program: token_2022::ID,
            associated_token_program: anchor_spl::associated_token::ID,
            system_program: anchor_lang::system_program::ID,
        }
        .to_account_metas(None)
    }

    pub fn withdraw(
        &mut self,
        destination: u64,
        route_hash: Bytes32,
        reward: Reward,
        claimant: Pubkey,
    ) -> TransactionResult {
        let intent_hash = portal::types::intent_hash(destination, &route_hash, &reward.hash());
        let vault = state::vault_pda(&intent_hash).0;
        let token_accounts = self.token_transfer_accounts(&vault, &claimant, &reward.tokens);
        let accounts = portal::accounts::Withdraw {
            payer: self.payer.pubkey(),
            claimant,
            vault,
            proof: Proof::pda(&intent_hash, &reward.prover).0,
            vault_state: VaultState::pda(&intent_hash).0,
            token_program: token::ID,
            token_2022_program: token_2022::ID,
            system_program: anchor_lang::system_program::ID,
        }
        .to_account_metas(None);
        let args = portal::instructions::WithdrawArgs {
            destination,
            route_hash,
            reward,
        };

        self.send_portal_instruction(
            portal::instruction::Withdraw { args }.data(),
            accounts.into_iter().chain(token_accounts).collect(),
            &[],
        )
    }

    /// Every intent pays out to the same `claimant`.
    pub fn batch_withdraw(
        &mut self,
        intents: Vec<(u64, Bytes32, Reward)>,
        claimant: Pubkey,
    ) -> TransactionResult {
        let intent_accounts: Vec<_> = intents
            .iter()
            .flat_map(|(destination, route_hash, reward)| {
                let intent_hash =
                    portal::types::intent_hash(*destination, route_hash, &reward.hash());
                let vault = state::vault_pda(&intent_hash).0;

                vec![
                    AccountMeta::new(claimant, false),
                    AccountMeta::new(vault, false),
                    AccountMeta::new_readonly(Proof::pda(&intent_hash, &reward.prover).0, false),
                    AccountMeta::new(VaultState::pda(&intent_hash).0, false),
                ]
                .into_iter()
                .chain(self.token_transfer_accounts(&vault, &claimant, &reward.tokens))
            })
            .collect();
        let accounts = portal::accounts::BatchWithdraw {
            payer: self.payer.pubkey(),
            token_program: token::ID,
            token_2022_program: token_2022::ID,
            system_program: anchor_lang::system_program::ID,
        }
        .to_account_metas(None);
        let (destinations, (route_hashes, rewards)): (Vec<_>, (Vec<_>, Vec<_>)) = intents
            .into_iter()
            .map(|(destination, route_hash, reward)| (destination, (route_hash, reward)))
            .unzip();
        let args = portal::instructions::BatchWithdrawArgs {
            destinations,
            route_hashes,
            rewards,
        };

        self.send_portal_instruction(
            portal::instruction::BatchWithdraw { args }.data(),
            accounts.into_iter().chain(intent_accounts).collect(),
            &[],
        )
    }

    pub fn refund(&mut self, destination: u64, route_hash: Bytes32, reward: Reward) -> TransactionResult {
        let intent_hash = portal::types::intent_hash(destination, &route_hash, &reward.hash());
        let vault = state::vault_pda(&intent_hash).0;
        let token_accounts =
            self.token_transfer_accounts(&vault, &reward.creator, &reward.tokens);
        let accounts = portal::accounts::Refund {
            payer: self.payer.pubkey(),
            creator: reward.creator,
            vault,
            proof: Proof::pda(&intent_hash, &reward.prover).0,
            vault_state: VaultState::pda(&intent_hash).0,
            token_program: token::ID,
            token_2022_program: token_2022::ID,
            system_program: anchor_lang::system_program::ID,
        }
        .to_account_metas(None);
        let args = portal::instructions::RefundArgs {
            destination,
            route_hash,
            reward,
        };

        self.send_portal_instruction(
            portal::instruction::Refund { args }.data(),
            accounts.into_iter().chain(token_accounts).collect(),
            &[],
        )
    }

    pub fn is_intent_funded(
        &mut self,
        destination: u64,
        route_hash: Bytes32,
        reward: Reward,
    ) -> TransactionResult {
        let intent_hash = portal::types::intent_hash(destination, &route_hash, &reward.hash());
        let vault = state::vault_pda(&intent_hash).0;
        let vault_tokens = reward
            .tokens
            .iter()
            .map(|token| AccountMeta::new_readonly(self.ata(&vault, &token.token), false));
        let accounts = portal::accounts::IsIntentFunded {
            vault,
            vault_state: VaultState::pda(&intent_hash).0,
        }
        .to_account_metas(None);
        let args = portal::instructions::IsIntentFundedArgs {
            destination,
            route_hash,
            reward: reward.clone(),
        };

        self.send_portal_instruction(
            portal::instruction::IsIntentFunded { args }.data(),
            accounts.into_iter().chain(vault_tokens).collect(),
            &[],
        )
    }

    pub fn recover_token(
        &mut self,
        destination: u64,
        route_hash: Bytes32,
        reward: Reward,
        token: Pubkey,
    ) -> TransactionResult {
        let intent_hash = portal::types::intent_hash(destination, &route_hash, &reward.hash());
        let vault = state::vault_pda(&intent_hash).0;
        let accounts = portal::accounts::RecoverToken {
            payer: self.payer.pubkey(),
            creator: reward.creator,
            vault,
            vault_state: VaultState::pda(&intent_hash).0,
            vault_token: self.ata(&vault, &token),
            creator_token: self.ata(&reward.creator, &token),
            mint: token,
            token_program: token::ID,
            token_2022_program: token_2022::ID,
            system_program: anchor_lang::system_program::ID,
        }
        .to_account_metas(None);
        let args = portal::instructions::RecoverTokenArgs {
            destination,
            route_hash,
            reward,
            token,
        };

        self.send_portal_instruction(
            portal::instruction::RecoverToken { args }.data(),
            accounts,
            &[],
        )
    }

    pub fn fulfill_accounts(&self, intent_hash: &Bytes32) -> portal::accounts::Fulfill {
        portal::accounts::Fulfill {
            payer: self.payer.pubkey(),
            solver: self.solver.pubkey(),
            executor: state::executor_pda().0,
            fulfill_marker: FulfillMarker::pda(intent_hash).0,
            token_program: token::ID,
            token_2022_program: token_2022::ID,
            associated_token_program: anchor_spl::associated_token::ID,
            system_program: anchor_lang::system_program::ID,
        }
    }

    /// Remaining accounts are the solver's token transfer accounts followed
    /// by `call_accounts`.
    pub fn fulfill(
        &mut self,
        intent_hash: Bytes32,
        route: Route,
        reward_hash: Bytes32,
        claimant: Bytes32,
        call_accounts: impl IntoIterator<Item = AccountMeta>,
    ) -> TransactionResult {
        let token_accounts = self.token_transfer_accounts(
            &self.solver.pubkey(),
            &state::executor_pda().0,
            &route.tokens,
        );
        let accounts = self.fulfill_accounts(&intent_hash).to_account_metas(None);
        let args = portal::instructions::FulfillArgs {
            intent_hash,
            route,
            reward_hash,
            claimant,
        };
        let instruction = Instruction {
            program_id: portal::ID,
            accounts: accounts
                .into_iter()
                .chain(token_accounts)
                .chain(call_accounts)
                .collect(),
            data: portal::instruction::Fulfill { args }.data(),
        };
        let transaction = Transaction::new(
            &[&self.payer, &self.solver],
            Message::new(
                &[
                    ComputeBudgetInstruction::set_compute_unit_limit(COMPUTE_UNIT_LIMIT),
                    instruction,
                ],
                Some(&self.payer.pubkey()),
            ),
            self.latest_blockhash(),
        );

        self.send_transaction(transaction)
    }

    pub fn send_portal_instruction(
        &mut self,
        data: Vec<u8>,
        accounts: Vec<AccountMeta>,
        signers: &[&Keypair],
    ) -> TransactionResult {
        let instruction = Instruction {
            program_id: portal::ID,
            accounts,
            data,
        };
        let signers: Vec<_> = std::iter::once(&self.payer)
            .chain(signers.iter().copied())
            .collect();
        let transaction = Transaction::new(
            &signers,
            Message::new(
                &[
                    ComputeBudgetInstruction::set_compute_unit_limit(COMPUTE_UNIT_LIMIT),
                    instruction,
                ],
                Some(&self.payer.pubkey()),
            ),
            self.latest_blockhash(),
        );

        self.send_transaction(transaction)
    }

    fn send_portal_instruction_as_funder(
        &mut self,
        data: Vec<u8>,
        accounts: Vec<AccountMeta>,
    ) -> TransactionResult {
        let instruction = Instruction {
            program_id: portal::ID,
            accounts,
            data,
        };
        let transaction = Transaction::new(
            &[&self.payer, &self.funder],
            Message::new(
                &[
                    ComputeBudgetInstruction::set_compute_unit_limit(COMPUTE_UNIT_LIMIT),
                    instruction,
                ],
                Some(&self.payer.pubkey()),
            ),
            self.latest_blockhash(),
        );

        self.send_transaction(transaction)
    }

    pub fn send_transaction(&mut self, transaction: Transaction) -> TransactionResult {
        let result = self.svm.send_transaction(transaction);
        self.expire_blockhash();
        let slot = self.svm.get_sysvar::<Clock>().slot;
        self.svm.warp_to_slot(slot + 1);

        result.map_err(Box::new)
    }
}

pub fn sol_amount(amount: f64) -> u64 {
    (amount * 1_000_000_000.0) as u64
}

pub fn rand_call() -> Call {
    Call::new(
        random::<[u8; 32]>().into(),
        random::<[u8; 32]>().to_vec(),
        0,
    )
}

pub fn contains_event<E>(expected: E) -> impl Fn(TransactionMetadata) -> bool
where
    E: Event,
{
    let expected = STANDARD.encode(expected.data());

    move |actual: TransactionMetadata| {
        actual
            .logs
            .iter()
            .any(|log| log.contains(format!("Program data: {}", expected).as_str()))
    }
}

/// Whether the transaction logged any event of type `E`.
pub fn contains_event_type<E>() -> impl Fn(&TransactionMetadata) -> bool
where
    E: anchor_lang::Discriminator,
{
    move |actual: &TransactionMetadata| {
        actual.logs.iter().any(|log| {
            log.strip_prefix("Program data: ")
                .and_then(|data| STANDARD.decode(data).ok())
                .is_some_and(|data| data.starts_with(E::DISCRIMINATOR))
        })
    }
}

pub fn is_error<T, Err>(expected: Err) -> impl Fn(T) -> bool
where
    T: Deref<Target = FailedTransactionMetadata>,
    Err: Into<u32>,
{
    let expected = expected.into();

    move |actual: T| match actual.err {
        TransactionError::InstructionError(_, InstructionError::Custom(error_code)) => {
            error_code == expected
        }
        _ => false,
    }
}
