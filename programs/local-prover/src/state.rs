use anchor_lang::prelude::*;
use eco_std::account::AccountExt;
use eco_std::prover::Proof;

#[account]
#[derive(InitSpace)]
pub struct ProofAccount(pub Proof);

impl AccountExt for ProofAccount {}

impl From<Proof> for ProofAccount {
    fn from(proof: Proof) -> Self {
        Self(proof)
    }
}
