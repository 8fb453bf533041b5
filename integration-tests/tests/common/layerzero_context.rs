use anchor_lang::{InstructionData, ToAccountMetas};
use eco_std::CHAIN_ID;
use litesvm::LiteSVM;
use mock_endpoint::{EndpointSettings, Nonce, Packet};
use solana_sdk::instruction::{AccountMeta, Instruction};
use solana_sdk::message::Message;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Keypair;
use solana_sdk::signer::Signer;
use solana_sdk::transaction::Transaction;

use crate::common::{sol_amount, Context, TransactionResult};

const ENDPOINT_BIN: &[u8] = include_bytes!("../../../target/deploy/mock_endpoint.so");

pub const BASE_FEE: u64 = 1_000;
pub const GAS_PRICE: u64 = 1;

pub fn local_eid() -> u32 {
    CHAIN_ID.try_into().unwrap()
}

pub fn add_layerzero_programs(svm: &mut LiteSVM) {
    svm.add_program(mock_endpoint::ID, ENDPOINT_BIN);
}

pub fn init_layerzero(svm: &mut LiteSVM, executor: &Pubkey) {
    let initializer = Keypair::new();
    svm.airdrop(&initializer.pubkey(), sol_amount(1.0)).unwrap();

    let instruction = Instruction {
        program_id: mock_endpoint::ID,
        accounts: mock_endpoint::accounts::Init {
            endpoint: mock_endpoint::endpoint_pda().0,
            payer: initializer.pubkey(),
            system_program: anchor_lang::system_program::ID,
        }
        .to_account_metas(None),
        data: mock_endpoint::instruction::Init {
            eid: local_eid(),
            executor: *executor,
            base_fee: BASE_FEE,
            gas_price: GAS_PRICE,
        }
        .data(),
    };
    let transaction = Transaction::new(
        &[&initializer],
        Message::new(&[instruction], Some(&initializer.pubkey())),
        svm.latest_blockhash(),
    );

    svm.send_transaction(transaction).unwrap();
}

impl Context {
    pub fn endpoint_settings(&self) -> EndpointSettings {
        self.account(&mock_endpoint::endpoint_pda().0).unwrap()
    }

    pub fn endpoint_nonce(
        &self,
        local: &Pubkey,
        remote_eid: u32,
        remote: &[u8; 32],
    ) -> Option<Nonce> {
        self.account(&mock_endpoint::nonce_pda(local, remote_eid, remote).0)
    }

    /// Executes `packet` through the endpoint as the executor, with the
    /// receiver's accounts after the receive authority.
    pub fn execute_packet(
        &mut self,
        packet: Packet,
        receiver_accounts: Vec<AccountMeta>,
    ) -> TransactionResult {
        let executor = self.relayer.insecure_clone();
        let accounts = mock_endpoint::accounts::Deliver {
            executor: executor.pubkey(),
            endpoint: mock_endpoint::endpoint_pda().0,
            nonce: mock_endpoint::nonce_pda(&packet.receiver, packet.src_eid, &packet.sender).0,
            receive_authority: mock_endpoint::receive_authority_pda(&packet.receiver).0,
            receiver: packet.receiver,
            system_program: anchor_lang::system_program::ID,
        }
        .to_account_metas(None);
        let instruction = Instruction {
            program_id: mock_endpoint::ID,
            accounts: accounts.into_iter().chain(receiver_accounts).collect(),
            data: mock_endpoint::instruction::Deliver { packet }.data(),
        };

        self.send_instructions(vec![instruction], &[&executor])
    }
}
