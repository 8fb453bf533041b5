use anchor_lang::{InstructionData, ToAccountMetas};
use derive_more::{Deref, DerefMut};
use eco_std::prover::Proof;
use eco_std::{event_authority_pda, Bytes32};
use solana_sdk::instruction::Instruction;
use solana_sdk::signature::Keypair;
use solana_sdk::signer::Signer;
use storage_prover::instructions::{InitArgs, ProveStorageArgs, SubmitStateRootArgs};
use storage_prover::state::{Config, DestinationPortal, ProofAccount, StateRoot};

use crate::common::{Context, TransactionResult};

#[derive(Deref, DerefMut)]
pub struct StorageProver<'a>(&'a mut Context);

impl Context {
    pub fn storage_prover(&mut self) -> StorageProver {
        StorageProver(self)
    }
}

impl StorageProver<'_> {
    /// Creates the config with the context's root oracle.
    pub fn init(&mut self, destination_portals: Vec<DestinationPortal>) -> TransactionResult {
        let instruction = Instruction {
            program_id: storage_prover::ID,
            accounts: storage_prover::accounts::Init {
                config: Config::pda().0,
                payer: self.payer.pubkey(),
                system_program: anchor_lang::system_program::ID,
            }
            .to_account_metas(None),
            data: storage_prover::instruction::Init {
                args: InitArgs {
                    root_oracle: self.root_oracle.pubkey(),
                    destination_portals,
                },
            }
            .data(),
        };

        self.send_instructions(vec![instruction], &[])
    }

    pub fn submit_state_root(
        &mut self,
        root_oracle: &Keypair,
        chain_id: u64,
        block: u64,
        state_root: Bytes32,
    ) -> TransactionResult {
        let instruction = Instruction {
            program_id: storage_prover::ID,
            accounts: storage_prover::accounts::SubmitStateRoot {
                root_oracle: root_oracle.pubkey(),
                config: Config::pda().0,
                state_root: StateRoot::pda(chain_id, block).0,
                system_program: anchor_lang::system_program::ID,
            }
            .to_account_metas(None),
            data: storage_prover::instruction::SubmitStateRoot {
                args: SubmitStateRootArgs {
                    chain_id,
                    block,
                    state_root,
                },
            }
            .data(),
        };

        self.send_instructions(vec![instruction], &[root_oracle])
    }

    /// The return data says whether a new proof was written.
    pub fn prove_storage(&mut self, args: ProveStorageArgs) -> TransactionResult {
        let instruction = Instruction {
            program_id: storage_prover::ID,
            accounts: storage_prover::accounts::ProveStorage {
                payer: self.payer.pubkey(),
                config: Config::pda().0,
                state_root: StateRoot::pda(args.destination, args.block).0,
                proof: Proof::pda(&args.intent_hash, &storage_prover::ID).0,
                system_program: anchor_lang::system_program::ID,
                event_authority: event_authority_pda(&storage_prover::ID).0,
                program: storage_prover::ID,
            }
            .to_account_metas(None),
            data: storage_prover::instruction::ProveStorage { args }.data(),
        };

        self.send_instructions(vec![instruction], &[])
    }

    pub fn state_root(&self, chain_id: u64, block: u64) -> Option<Bytes32> {
        self.account::<StateRoot>(&StateRoot::pda(chain_id, block).0)
            .map(|state_root| state_root.state_root)
    }

    pub fn proof(&self, intent_hash: &Bytes32) -> Option<Proof> {
        self.account::<ProofAccount>(&Proof::pda(intent_hash, &storage_prover::ID).0)
            .map(|proof| proof.0)
    }
}
