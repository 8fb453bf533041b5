use anchor_lang::prelude::*;
use eco_std::account::AccountExt;
use eco_std::bridge::Whitelist;
use eco_std::prover::Proof;

pub const DISPATCHER_SEED: &[u8] = b"dispatcher";
pub const CONFIG_SEED: &[u8] = b"config";
pub const PDA_PAYER_SEED: &[u8] = b"pda_payer";

#[account]
#[derive(InitSpace)]
pub struct ProofAccount(pub Proof);

impl AccountExt for ProofAccount {}

impl From<Proof> for ProofAccount {
    fn from(proof: Proof) -> Self {
        Self(proof)
    }
}

/// Sender of every outbound message; counterparts whitelist this address.
pub fn dispatcher_pda() -> (Pubkey, u8) {
    Pubkey::find_program_address(&[DISPATCHER_SEED], &crate::ID)
}

/// Pays rent for proofs created on delivery, where no signer carries lamports.
pub fn pda_payer_pda() -> (Pubkey, u8) {
    Pubkey::find_program_address(&[PDA_PAYER_SEED], &crate::ID)
}

#[account]
#[derive(InitSpace)]
pub struct Config {
    pub whitelist: Whitelist,
}

impl Config {
    pub fn new(whitelist: Whitelist) -> Self {
        Self { whitelist }
    }

    pub fn pda() -> (Pubkey, u8) {
        Pubkey::find_program_address(&[CONFIG_SEED], &crate::ID)
    }
}

impl AccountExt for Config {}
