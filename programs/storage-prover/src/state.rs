use anchor_lang::prelude::*;
use derive_new::new;
use eco_std::account::AccountExt;
use eco_std::prover::Proof;
use eco_std::Bytes32;

use crate::instructions::StorageProverError;

pub const CONFIG_SEED: &[u8] = b"config";
pub const STATE_ROOT_SEED: &[u8] = b"state_root";
pub const MAX_DESTINATION_PORTALS: usize = 16;

#[account]
#[derive(InitSpace)]
pub struct ProofAccount(pub Proof);

impl AccountExt for ProofAccount {}

impl From<Proof> for ProofAccount {
    fn from(proof: Proof) -> Self {
        Self(proof)
    }
}

#[derive(AnchorSerialize, AnchorDeserialize, InitSpace, Clone, Copy, Debug, PartialEq, Eq, new)]
pub struct DestinationPortal {
    pub chain_id: u64,
    pub portal: Pubkey,
}

#[account]
#[derive(InitSpace)]
pub struct Config {
    /// Sole submitter of finalized destination state roots.
    pub root_oracle: Pubkey,
    #[max_len(MAX_DESTINATION_PORTALS)]
    pub destination_portals: Vec<DestinationPortal>,
}

impl Config {
    pub fn new(root_oracle: Pubkey, destination_portals: Vec<DestinationPortal>) -> Result<Self> {
        require!(
            destination_portals.len() <= MAX_DESTINATION_PORTALS,
            StorageProverError::TooManyDestinationPortals
        );

        Ok(Self {
            root_oracle,
            destination_portals,
        })
    }

    pub fn pda() -> (Pubkey, u8) {
        Pubkey::find_program_address(&[CONFIG_SEED], &crate::ID)
    }

    pub fn destination_portal(&self, chain_id: u64) -> Option<Pubkey> {
        self.destination_portals
            .iter()
            .find(|destination| destination.chain_id == chain_id)
            .map(|destination| destination.portal)
    }
}

impl AccountExt for Config {}

/// Finalized state root of one destination block. Written once.
#[account]
#[derive(InitSpace)]
pub struct StateRoot {
    pub state_root: Bytes32,
}

impl StateRoot {
    pub fn pda(chain_id: u64, block: u64) -> (Pubkey, u8) {
        Pubkey::find_program_address(
            &[
                STATE_ROOT_SEED,
                &chain_id.to_be_bytes(),
                &block.to_be_bytes(),
            ],
            &crate::ID,
        )
    }
}

impl AccountExt for StateRoot {}
