use anchor_lang::prelude::*;
use anchor_lang::solana_program::instruction::Instruction;
use anchor_lang::solana_program::program::{get_return_data, invoke, invoke_signed};
use derive_new::new;

use crate::instructions::LayerZeroProverError;

#[cfg(feature = "mainnet")]
pub const ENDPOINT_ID: Pubkey = pubkey!("76y77prsiCMvXMjuoZ5VRrhG5qYBrUMYTE5WgHqgjEn6");
#[cfg(not(feature = "mainnet"))]
pub const ENDPOINT_ID: Pubkey = pubkey!("8ENdSS2rhWdKCktuESX3vAzWjhSHwvcQuQfWftduGBYU");

pub const SEND_DISCRIMINATOR: [u8; 8] = [102, 251, 20, 187, 65, 75, 12, 69];
pub const QUOTE_DISCRIMINATOR: [u8; 8] = [149, 42, 109, 247, 134, 146, 213, 123];

pub const ENDPOINT_SEED: &[u8] = b"Endpoint";
pub const NONCE_SEED: &[u8] = b"Nonce";
pub const RECEIVE_AUTHORITY_SEED: &[u8] = b"ReceiveAuthority";

const OPTIONS_TYPE_3: u16 = 3;
const EXECUTOR_WORKER_ID: u8 = 1;
const OPTION_TYPE_LZRECEIVE: u8 = 1;

pub fn endpoint_pda() -> (Pubkey, u8) {
    Pubkey::find_program_address(&[ENDPOINT_SEED], &ENDPOINT_ID)
}

/// Nonce account of the path between a local OApp and a remote one.
pub fn nonce_pda(local: &Pubkey, remote_eid: u32, remote: &[u8; 32]) -> (Pubkey, u8) {
    Pubkey::find_program_address(
        &[
            NONCE_SEED,
            local.as_ref(),
            &remote_eid.to_be_bytes(),
            remote.as_ref(),
        ],
        &ENDPOINT_ID,
    )
}

/// Signs every `lz_receive` the endpoint delivers to this program.
pub fn receive_authority_pda() -> (Pubkey, u8) {
    Pubkey::find_program_address(
        &[RECEIVE_AUTHORITY_SEED, crate::ID.as_ref()],
        &ENDPOINT_ID,
    )
}

// Endpoint ids are chain ids narrowed to 32 bits.
pub fn chain_to_eid(chain: u64) -> Result<u32> {
    chain
        .try_into()
        .map_err(|_| LayerZeroProverError::InvalidChainId.into())
}

pub fn eid_to_chain(eid: u32) -> u64 {
    eid.into()
}

/// Type-3 options carrying one executor `lzReceive` gas option.
pub fn lz_receive_options(gas_limit: u64) -> Vec<u8> {
    let option = [
        [OPTION_TYPE_LZRECEIVE].as_slice(),
        &u128::from(gas_limit).to_be_bytes(),
    ]
    .concat();
    let option_len = option.len() as u16;

    [
        OPTIONS_TYPE_3.to_be_bytes().as_slice(),
        &[EXECUTOR_WORKER_ID],
        &option_len.to_be_bytes(),
        &option,
    ]
    .concat()
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq, new)]
pub struct SendParams {
    pub dst_eid: u32,
    pub receiver: [u8; 32],
    pub message: Vec<u8>,
    pub options: Vec<u8>,
    pub native_fee: u64,
    pub lz_token_fee: u64,
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq, new)]
pub struct QuoteParams {
    pub sender: Pubkey,
    pub dst_eid: u32,
    pub receiver: [u8; 32],
    pub message: Vec<u8>,
    pub options: Vec<u8>,
    pub pay_in_lz_token: bool,
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq, new)]
pub struct MessagingFee {
    pub native_fee: u64,
    pub lz_token_fee: u64,
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq, new)]
pub struct LzReceiveParams {
    pub src_eid: u32,
    pub sender: [u8; 32],
    pub nonce: u64,
    pub guid: [u8; 32],
    pub message: Vec<u8>,
    pub extra_data: Vec<u8>,
}

/// Native fee the endpoint charges for `params`.
pub fn quote<'info>(
    endpoint_program: &AccountInfo<'info>,
    endpoint: &AccountInfo<'info>,
    params: QuoteParams,
) -> Result<MessagingFee> {
    let ix = Instruction {
        program_id: ENDPOINT_ID,
        accounts: vec![AccountMeta::new_readonly(endpoint.key(), false)],
        data: QUOTE_DISCRIMINATOR
            .into_iter()
            .chain(params.try_to_vec()?)
            .collect(),
    };

    invoke(&ix, &[endpoint.clone(), endpoint_program.clone()])?;

    let (program_id, data) =
        get_return_data().ok_or(LayerZeroProverError::InvalidEndpointResponse)?;
    require_keys_eq!(
        program_id,
        ENDPOINT_ID,
        LayerZeroProverError::InvalidEndpointResponse
    );

    MessagingFee::try_from_slice(&data).map_err(Into::into)
}

/// Accounts of an endpoint `send`, in the endpoint's order.
pub struct SendAccounts<'a, 'info> {
    pub sender: &'a AccountInfo<'info>,
    pub payer: &'a AccountInfo<'info>,
    pub endpoint: &'a AccountInfo<'info>,
    pub nonce: &'a AccountInfo<'info>,
    pub system_program: &'a AccountInfo<'info>,
    pub endpoint_program: &'a AccountInfo<'info>,
}

pub fn send(accounts: SendAccounts<'_, '_>, params: SendParams, signer_seeds: &[&[u8]]) -> Result<()> {
    let ix = Instruction {
        program_id: ENDPOINT_ID,
        accounts: vec![
            AccountMeta::new_readonly(accounts.sender.key(), true),
            AccountMeta::new(accounts.payer.key(), true),
            AccountMeta::new(accounts.endpoint.key(), false),
            AccountMeta::new(accounts.nonce.key(), false),
            AccountMeta::new_readonly(accounts.system_program.key(), false),
        ],
        data: SEND_DISCRIMINATOR
            .into_iter()
            .chain(params.try_to_vec()?)
            .collect(),
    };

    invoke_signed(
        &ix,
        &[
            accounts.sender.clone(),
            accounts.payer.clone(),
            accounts.endpoint.clone(),
            accounts.nonce.clone(),
            accounts.system_program.clone(),
            accounts.endpoint_program.clone(),
        ],
        &[signer_seeds],
    )
    .map_err(Into::into)
}
