use anchor_lang::prelude::borsh::{BorshDeserialize, BorshSerialize};
use anchor_lang::prelude::*;
use anchor_lang::solana_program::instruction::Instruction;
use anchor_lang::solana_program::program::invoke_signed;
use anchor_lang::system_program;
use eco_std::Bytes32;

use crate::instructions::{HyperProverError, Prove};

#[cfg(feature = "mainnet")]
pub const MAILBOX_ID: Pubkey = pubkey!("E588QtVUvresuXq2KoNEwAmoifCzYGpRBdHByN9KQMbi");
#[cfg(not(feature = "mainnet"))]
pub const MAILBOX_ID: Pubkey = pubkey!("C9esaCazBzJDt8K4PkkfxJzTqkm23GLKkr13mtysvsDD");

pub const HANDLE_DISCRIMINATOR: [u8; 8] = [33, 210, 5, 66, 196, 212, 239, 142];
pub const HANDLE_ACCOUNT_METAS_DISCRIMINATOR: [u8; 8] = [194, 141, 30, 82, 241, 41, 169, 52];

pub fn process_authority_pda() -> (Pubkey, u8) {
    Pubkey::find_program_address(
        &[
            b"hyperlane",
            b"-",
            b"process_authority",
            b"-",
            crate::ID.as_ref(),
        ],
        &MAILBOX_ID,
    )
}

pub fn outbox_pda() -> (Pubkey, u8) {
    Pubkey::find_program_address(&[b"hyperlane", b"-", b"outbox"], &MAILBOX_ID)
}

pub fn dispatched_message_pda(unique_message: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(
        &[
            b"hyperlane",
            b"-",
            b"dispatched_message",
            b"-",
            unique_message.as_ref(),
        ],
        &MAILBOX_ID,
    )
}

// Hyperlane domain ids are used directly as chain ids.
pub fn chain_to_domain(chain: u64) -> Result<u32> {
    chain
        .try_into()
        .map_err(|_| HyperProverError::InvalidChainId.into())
}

pub fn domain_to_chain(domain: u32) -> u64 {
    domain.into()
}

// The mailbox dispatches on the borsh variant index, so the variant order
// must match the mailbox even for the variants that are never sent.
#[derive(BorshSerialize, BorshDeserialize)]
#[allow(dead_code)]
pub enum MailboxInstruction {
    Init(Init),
    InboxProcess(InboxProcess),
    InboxSetDefaultIsm(Pubkey),
    InboxGetRecipientIsm(Pubkey),
    OutboxDispatch(OutboxDispatch),
    OutboxGetCount,
    OutboxGetLatestCheckpoint,
    OutboxGetRoot,
    GetOwner,
    TransferOwnership(Option<Pubkey>),
    ClaimProtocolFees,
    SetProtocolFeeConfig,
}

#[derive(BorshSerialize, BorshDeserialize)]
pub struct Init {}

#[derive(BorshSerialize, BorshDeserialize)]
pub struct InboxProcess {}

#[derive(BorshSerialize, BorshDeserialize)]
pub struct OutboxDispatch {
    pub sender: Pubkey,
    pub destination_domain: u32,
    pub recipient: [u8; 32],
    pub message_body: Vec<u8>,
}

pub fn dispatch_msg(
    ctx: &Context<Prove>,
    destination_domain: u32,
    recipient: Bytes32,
    message_body: Vec<u8>,
    signer_seeds: &[&[u8]],
) -> Result<()> {
    let outbox_dispatch = MailboxInstruction::OutboxDispatch(OutboxDispatch {
        sender: ctx.accounts.dispatcher.key(),
        destination_domain,
        recipient: recipient.into(),
        message_body,
    });
    let ix = Instruction {
        program_id: MAILBOX_ID,
        accounts: vec![
            AccountMeta::new(ctx.accounts.outbox_pda.key(), false),
            AccountMeta::new_readonly(ctx.accounts.dispatcher.key(), true),
            AccountMeta::new_readonly(system_program::ID, false),
            AccountMeta::new_readonly(ctx.accounts.spl_noop_program.key(), false),
            AccountMeta::new(ctx.accounts.payer.key(), true),
            AccountMeta::new_readonly(ctx.accounts.unique_message.key(), true),
            AccountMeta::new(ctx.accounts.dispatched_message_pda.key(), false),
        ],
        data: outbox_dispatch.try_to_vec()?,
    };

    invoke_signed(
        &ix,
        &[
            ctx.accounts.outbox_pda.to_account_info(),
            ctx.accounts.dispatcher.to_account_info(),
            ctx.accounts.system_program.to_account_info(),
            ctx.accounts.spl_noop_program.to_account_info(),
            ctx.accounts.payer.to_account_info(),
            ctx.accounts.unique_message.to_account_info(),
            ctx.accounts.dispatched_message_pda.to_account_info(),
        ],
        &[signer_seeds],
    )
    .map_err(Into::into)
}
