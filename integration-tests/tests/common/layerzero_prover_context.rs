use anchor_lang::prelude::borsh::BorshDeserialize;
use anchor_lang::prelude::AccountMeta;
use anchor_lang::{InstructionData, ToAccountMetas};
use derive_more::{Deref, DerefMut};
use eco_std::bridge::ChainWhitelist;
use eco_std::prover::{Proof, ProveArgs};
use eco_std::Bytes32;
use layerzero_prover::layerzero::{self, LzReceiveParams};
use layerzero_prover::state::{dispatcher_pda, pda_payer_pda, Config, ProofAccount};
use solana_sdk::instruction::Instruction;
use solana_sdk::signer::Signer;

use crate::common::{sol_amount, Context, TransactionResult};

#[derive(Deref, DerefMut)]
pub struct LayerZeroProver<'a>(&'a mut Context);

impl Context {
    pub fn layerzero_prover(&mut self) -> LayerZeroProver {
        LayerZeroProver(self)
    }
}

impl LayerZeroProver<'_> {
    /// Creates the config and funds the PDA payer that pays proof rent.
    pub fn init(&mut self, whitelist: Vec<ChainWhitelist>) -> TransactionResult {
        self.airdrop(&pda_payer_pda().0, sol_amount(1.0)).unwrap();

        let instruction = Instruction {
            program_id: layerzero_prover::ID,
            accounts: layerzero_prover::accounts::Init {
                config: Config::pda().0,
                payer: self.payer.pubkey(),
                system_program: anchor_lang::system_program::ID,
            }
            .to_account_metas(None),
            data: layerzero_prover::instruction::Init {
                args: layerzero_prover::instructions::InitArgs { whitelist },
            }
            .data(),
        };

        self.send_instructions(vec![instruction], &[])
    }

    /// Accounts of `prove` after the portal dispatcher, sending to
    /// `receiver` on `dst_eid`.
    pub fn prover_accounts(&self, dst_eid: u32, receiver: &Bytes32) -> Vec<AccountMeta> {
        let dispatcher = dispatcher_pda().0;

        layerzero_prover::accounts::Prove {
            portal_dispatcher: portal::state::dispatcher_pda().0,
            dispatcher,
            payer: self.payer.pubkey(),
            endpoint: layerzero::endpoint_pda().0,
            nonce: layerzero::nonce_pda(&dispatcher, dst_eid, receiver).0,
            system_program: anchor_lang::system_program::ID,
            endpoint_program: layerzero::ENDPOINT_ID,
        }
        .to_account_metas(None)
        .into_iter()
        .skip(1)
        .collect()
    }

    pub fn fetch_fee(&mut self, args: ProveArgs) -> u64 {
        let instruction = Instruction {
            program_id: layerzero_prover::ID,
            accounts: layerzero_prover::accounts::FetchFee {
                endpoint: layerzero::endpoint_pda().0,
                endpoint_program: layerzero::ENDPOINT_ID,
            }
            .to_account_metas(None),
            data: layerzero_prover::instruction::FetchFee { args }.data(),
        };
        let result = self.send_instructions(vec![instruction], &[]).unwrap();

        u64::try_from_slice(&result.return_data.data).unwrap()
    }

    /// What an executor asks the prover before delivering `params`.
    pub fn lz_receive_types(&mut self, params: LzReceiveParams) -> Vec<AccountMeta> {
        let instruction = Instruction {
            program_id: layerzero_prover::ID,
            accounts: layerzero_prover::accounts::LzReceiveTypes {}.to_account_metas(None),
            data: layerzero_prover::instruction::LzReceiveTypes { params }.data(),
        };

        self.account_metas_of(instruction)
    }

    pub fn proof(&self, intent_hash: &Bytes32) -> Option<Proof> {
        self.account::<ProofAccount>(&Proof::pda(intent_hash, &layerzero_prover::ID).0)
            .map(|proof| proof.0)
    }
}
