#![allow(dead_code)]

use std::ops::Deref;

use anchor_lang::prelude::borsh::BorshDeserialize;
use anchor_lang::prelude::AccountMeta;
use anchor_lang::Event;
use anchor_spl::associated_token::get_associated_token_address_with_program_id;
use anchor_spl::associated_token::spl_associated_token_account::instruction::create_associated_token_account;
use anchor_spl::token::{self, spl_token};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use derive_more::{Deref, DerefMut};
use eco_std::{Bytes32, SerializableAccountMeta, CHAIN_ID};
use litesvm::types::{FailedTransactionMetadata, TransactionMetadata};
use litesvm::LiteSVM;
use portal::types::{Intent, Reward, Route, TokenAmount};
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

mod layerzero_context;
mod layerzero_prover_context;
mod storage_prover_context;

pub use hyperlane_context::PROTOCOL_FEE;
pub use layerzero_context::{BASE_FEE, GAS_PRICE};

const COMPUTE_UNIT_LIMIT: u32 = 1_000_000;
const PORTAL_BIN: &[u8] = include_bytes!("../../../target/deploy/portal.so");
const LOCAL_PROVER_BIN: &[u8] = include_bytes!("../../../target/deploy/local_prover.so");
const HYPER_PROVER_BIN: &[u8] = include_bytes!("../../../target/deploy/hyper_prover.so");
const LAYERZERO_PROVER_BIN: &[u8] =
    include_bytes!("../../../target/deploy/layerzero_prover.so");
const STORAGE_PROVER_BIN: &[u8] = include_bytes!("../../../target/deploy/storage_prover.so");

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
    /// Relays mailbox messages and executes endpoint packets.
    pub relayer: Keypair,
    pub root_oracle: Keypair,
}

impl Default for Context {
    fn default() -> Self {
        let mut svm = LiteSVM::new();

        svm.add_program(portal::ID, PORTAL_BIN);
        svm.add_program(local_prover::ID, LOCAL_PROVER_BIN);
        svm.add_program(hyper_prover::ID, HYPER_PROVER_BIN);
        svm.add_program(layerzero_prover::ID, LAYERZERO_PROVER_BIN);
        svm.add_program(storage_prover::ID, STORAGE_PROVER_BIN);

        let mint_authority = Keypair::new();
        let creator = Keypair::new();
        let payer = Keypair::new();
        let funder = Keypair::new();
        let solver = Keypair::new();
        let relayer = Keypair::new();
        let root_oracle = Keypair::new();

        svm.airdrop(&mint_authority.pubkey(), sol_amount(100.0))
            .unwrap();
        svm.airdrop(&payer.pubkey(), sol_amount(10.0)).unwrap();
        svm.airdrop(&relayer.pubkey(), sol_amount(10.0)).unwrap();
        svm.airdrop(&root_oracle.pubkey(), sol_amount(1.0)).unwrap();

        hyperlane_context::add_hyperlane_programs(&mut svm);
        hyperlane_context::init_hyperlane(&mut svm, &relayer.pubkey());
        layerzero_context::add_layerzero_programs(&mut svm);
        layerzero_context::init_layerzero(&mut svm, &relayer.pubkey());

        Self {
            svm,
            mint_authority,
            token_program: token::ID,
            creator,
            payer,
            funder,
            solver,
            relayer,
            root_oracle,
        }
    }
}

impl Context {
    pub fn now(&self) -> u64 {
        self.svm.get_sysvar::<Clock>().unix_timestamp as u64
    }

    /// Intent with one route token, no calls, and a reward of 1 SOL plus one
    /// token, proven by `prover`.
    pub fn rand_intent(&mut self, destination: u64, prover: Pubkey) -> Intent {
        let route_token = Pubkey::new_unique();
        let reward_token = Pubkey::new_unique();
        self.set_mint_account(&route_token);
        self.set_mint_account(&reward_token);

        Intent {
            destination,
            route: Route {
                salt: random::<[u8; 32]>().into(),
                deadline: self.now() + 1800,
                portal: portal::ID.into(),
                native_amount: 0,
                tokens: vec![TokenAmount::new(route_token, 5_000_000)],
                calls: vec![],
            },
            reward: Reward {
                deadline: self.now() + 3600,
                creator: self.creator.pubkey(),
                prover,
                native_amount: sol_amount(1.0),
                tokens: vec![TokenAmount::new(reward_token, 5_000_000)],
            },
        }
    }

    /// Intent to be fulfilled on this chain.
    pub fn rand_local_intent(&mut self, prover: Pubkey) -> Intent {
        self.rand_intent(CHAIN_ID, prover)
    }

    pub fn set_mint_account(&mut self, mint: &Pubkey) {
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

        let mint_account = solana_sdk::account::Account {
            lamports: self
                .get_sysvar::<Rent>()
                .minimum_balance(spl_token::state::Mint::LEN),
            data: data.to_vec(),
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
            instructions.push(
                spl_token::instruction::mint_to(
                    &self.token_program,
                    mint,
                    &recipient_token,
                    &self.mint_authority.pubkey(),
                    &[],
                    amount,
                )
                .unwrap(),
            );
        }

        let transaction = Transaction::new(
            &[&self.mint_authority],
            Message::new(&instructions, Some(&self.mint_authority.pubkey())),
            self.latest_blockhash(),
        );

        self.send_transaction(transaction).unwrap();
    }

    pub fn balance(&self, pubkey: &Pubkey) -> u64 {
        self.svm.get_balance(pubkey).unwrap_or_default()
    }

    pub fn token_balance_ata(&self, mint: &Pubkey, owner: &Pubkey) -> u64 {
        self.get_account(&self.ata(owner, mint))
            .and_then(|account| spl_token::state::Account::unpack(&account.data).ok())
            .map(|account| account.amount)
            .unwrap_or_default()
    }

    pub fn account<T: anchor_lang::AccountDeserialize>(&self, pubkey: &Pubkey) -> Option<T> {
        self.svm
            .get_account(pubkey)
            .and_then(|account| T::try_deserialize(&mut account.data.as_slice()).ok())
    }

    pub fn warp_to_timestamp(&mut self, unix_timestamp: u64) {
        let mut clock = self.get_sysvar::<Clock>();
        clock.unix_timestamp = unix_timestamp as i64;

        self.set_sysvar(&clock);
    }

    /// Sends `instructions` paid for by the payer, who always signs.
    pub fn send_instructions(
        &mut self,
        instructions: Vec<Instruction>,
        signers: &[&Keypair],
    ) -> TransactionResult {
        let signers: Vec<_> = std::iter::once(&self.payer)
            .chain(signers.iter().copied())
            .collect();
        let instructions: Vec<_> =
            std::iter::once(ComputeBudgetInstruction::set_compute_unit_limit(COMPUTE_UNIT_LIMIT))
                .chain(instructions)
                .collect();
        let transaction = Transaction::new(
            &signers,
            Message::new(&instructions, Some(&self.payer.pubkey())),
            self.latest_blockhash(),
        );

        self.send_transaction(transaction)
    }

    /// Runs `instruction` and decodes its return data as account metas, the
    /// way relayers read `handle_account_metas` and `lz_receive_types`.
    pub fn account_metas_of(&mut self, instruction: Instruction) -> Vec<AccountMeta> {
        let result = self.send_instructions(vec![instruction], &[]).unwrap();
        let metas: Vec<SerializableAccountMeta> =
            BorshDeserialize::try_from_slice(&result.return_data.data).unwrap();

        metas
            .into_iter()
            .map(|meta| AccountMeta {
                pubkey: meta.pubkey,
                is_signer: meta.is_signer,
                is_writable: meta.is_writable,
            })
            .collect()
    }

    fn send_transaction(&mut self, transaction: Transaction) -> TransactionResult {
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

pub fn rand_bytes32() -> Bytes32 {
    random::<[u8; 32]>().into()
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

pub fn contains_cpi_event<E>(expected: E) -> impl Fn(TransactionMetadata) -> bool
where
    E: Event,
{
    let expected = expected.data();

    move |actual: TransactionMetadata| {
        actual
            .inner_instructions
            .iter()
            .flat_map(|inner_ix_list| inner_ix_list.iter())
            .any(
                |inner_instruction| match inner_instruction.instruction.data.get(8..) {
                    Some(data) => data == expected,
                    None => false,
                },
            )
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
