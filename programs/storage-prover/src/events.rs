use anchor_lang::prelude::*;
use derive_new::new;
use eco_std::Bytes32;

#[event]
#[derive(new)]
pub struct StateRootSubmitted {
    chain_id: u64,
    block: u64,
    state_root: Bytes32,
}
