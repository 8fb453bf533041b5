//! Hyperlane mailbox stand-in for tests. Speaks the mailbox's wire format
//! for `OutboxDispatch` and delivers inbound messages to a recipient's
//! `handle` signed by the recipient's process authority.

use anchor_lang::prelude::*;
use anchor_lang::solana_program::instruction::Instruction;
use anchor_lang::solana_program::program::invoke_signed;
use anchor_lang::system_program::{self, Transfer};

declare_id!("C9esaCazBzJDt8K4PkkfxJzTqkm23GLKkr13mtysvsDD");

pub const OUTBOX_SEED: &[&[u8]] = &[b"hyperlane", b"-", b"outbox"];
pub const HANDLE_DISCRIMINATOR: [u8; 8] = [33, 210, 5, 66, 196, 212, 239, 142];

pub fn outbox_pda() -> (Pubkey, u8) {
    Pubkey::find_program_address(OUTBOX_SEED, &ID)
}

pub fn dispatched_message_pda(unique_message: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(
        &[
            b"hyperlane".as_ref(),
            b"-",
            b"dispatched_message",
            b"-",
            unique_message.as_ref(),
        ],
        &ID,
    )
}

/// Replay guard of the message `nonce` from `origin`.
pub fn processed_message_pda(origin: u32, nonce: u32) -> (Pubkey, u8) {
    Pubkey::find_program_address(
        &[
            b"hyperlane".as_ref(),
            b"-",
            b"processed_message",
            b"-",
            &origin.to_le_bytes(),
            &nonce.to_le_bytes(),
        ],
        &ID,
    )
}

pub fn process_authority_pda(recipient: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(
        &[
            b"hyperlane".as_ref(),
            b"-",
            b"process_authority",
            b"-",
            recipient.as_ref(),
        ],
        &ID,
    )
}

#[program]
pub mod mock_mailbox {
    use super::*;

    #[instruction(discriminator = &[0])]
    pub fn init(
        ctx: Context<Init>,
        local_domain: u32,
        relayer: Pubkey,
        protocol_fee: u64,
    ) -> Result<()> {
        ctx.accounts.outbox.set_inner(Outbox {
            local_domain,
            relayer,
            protocol_fee,
            nonce: 0,
        });

        Ok(())
    }

    #[instruction(discriminator = &[1])]
    pub fn inbox_process<'info>(
        ctx: Context<'_, '_, '_, 'info, InboxProcess<'info>>,
        message: Message,
    ) -> Result<()> {
        require!(
            message.destination == ctx.accounts.outbox.local_domain,
            MailboxError::InvalidDestination
        );

        let recipient = ctx.accounts.recipient.key();
        let (process_authority, bump) = process_authority_pda(&recipient);
        let signer_seeds: [&[u8]; 6] = [
            b"hyperlane".as_ref(),
            b"-",
            b"process_authority",
            b"-",
            recipient.as_ref(),
            &[bump],
        ];
        let handle = HandleInstruction {
            origin: message.origin,
            sender: message.sender,
            message: message.body,
        };
        let ix = Instruction {
            program_id: recipient,
            accounts: std::iter::once(AccountMeta::new_readonly(process_authority, true))
                .chain(ctx.remaining_accounts.iter().map(|account| AccountMeta {
                    pubkey: account.key(),
                    is_signer: account.is_signer,
                    is_writable: account.is_writable,
                }))
                .collect(),
            data: HANDLE_DISCRIMINATOR
                .into_iter()
                .chain(handle.try_to_vec()?)
                .collect(),
        };
        let account_infos: Vec<_> =
            std::iter::once(ctx.accounts.process_authority.to_account_info())
                .chain(ctx.remaining_accounts.iter().cloned())
                .chain(std::iter::once(ctx.accounts.recipient.to_account_info()))
                .collect();

        invoke_signed(&ix, &account_infos, &[&signer_seeds]).map_err(Into::into)
    }

    #[instruction(discriminator = &[4])]
    pub fn outbox_dispatch(
        ctx: Context<OutboxDispatch>,
        sender: Pubkey,
        destination_domain: u32,
        recipient: [u8; 32],
        message_body: Vec<u8>,
    ) -> Result<()> {
        require_keys_eq!(
            sender,
            ctx.accounts.sender.key(),
            MailboxError::InvalidSender
        );

        let outbox = &mut ctx.accounts.outbox;
        if outbox.protocol_fee > 0 {
            system_program::transfer(
                CpiContext::new(
                    ctx.accounts.system_program.to_account_info(),
                    Transfer {
                        from: ctx.accounts.payer.to_account_info(),
                        to: outbox.to_account_info(),
                    },
                ),
                outbox.protocol_fee,
            )?;
        }

        ctx.accounts.dispatched_message.set_inner(DispatchedMessage {
            message: Message {
                nonce: outbox.nonce,
                origin: outbox.local_domain,
                sender: sender.to_bytes(),
                destination: destination_domain,
                recipient: Pubkey::new_from_array(recipient),
                body: message_body,
            },
        });
        outbox.nonce += 1;

        Ok(())
    }
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct Message {
    pub nonce: u32,
    pub origin: u32,
    pub sender: [u8; 32],
    pub destination: u32,
    pub recipient: Pubkey,
    pub body: Vec<u8>,
}

#[derive(AnchorSerialize, AnchorDeserialize)]
struct HandleInstruction {
    origin: u32,
    sender: [u8; 32],
    message: Vec<u8>,
}

#[account]
#[derive(InitSpace)]
pub struct Outbox {
    pub local_domain: u32,
    pub relayer: Pubkey,
    pub protocol_fee: u64,
    pub nonce: u32,
}

#[account]
pub struct DispatchedMessage {
    pub message: Message,
}

#[account]
#[derive(InitSpace)]
pub struct ProcessedMessage {}

#[derive(Accounts)]
pub struct Init<'info> {
    #[account(init, payer = payer, space = 8 + Outbox::INIT_SPACE, seeds = [b"hyperlane".as_ref(), b"-", b"outbox"], bump)]
    pub outbox: Account<'info, Outbox>,
    #[account(mut)]
    pub payer: Signer<'info>,
    pub system_program: Program<'info, System>,
}

#[derive(Accounts)]
#[instruction(message: Message)]
pub struct InboxProcess<'info> {
    #[account(mut, address = outbox.relayer @ MailboxError::UnauthorizedRelayer)]
    pub relayer: Signer<'info>,
    #[account(seeds = [b"hyperlane".as_ref(), b"-", b"outbox"], bump)]
    pub outbox: Account<'info, Outbox>,
    #[account(
        init,
        payer = relayer,
        space = 8 + ProcessedMessage::INIT_SPACE,
        seeds = [
            b"hyperlane".as_ref(),
            b"-",
            b"processed_message",
            b"-",
            &message.origin.to_le_bytes(),
            &message.nonce.to_le_bytes()
        ],
        bump
    )]
    pub processed_message: Account<'info, ProcessedMessage>,
    /// CHECK: signs the recipient's handle through seeds
    #[account(
        seeds = [b"hyperlane".as_ref(), b"-", b"process_authority", b"-", message.recipient.as_ref()],
        bump
    )]
    pub process_authority: UncheckedAccount<'info>,
    /// CHECK: address is validated
    #[account(executable, address = message.recipient @ MailboxError::InvalidRecipient)]
    pub recipient: UncheckedAccount<'info>,
    pub system_program: Program<'info, System>,
}

#[derive(Accounts)]
#[instruction(sender: Pubkey, destination_domain: u32, recipient: [u8; 32], message_body: Vec<u8>)]
pub struct OutboxDispatch<'info> {
    #[account(mut, seeds = [b"hyperlane".as_ref(), b"-", b"outbox"], bump)]
    pub outbox: Account<'info, Outbox>,
    pub sender: Signer<'info>,
    pub system_program: Program<'info, System>,
    /// CHECK: unused
    pub spl_noop_program: UncheckedAccount<'info>,
    #[account(mut)]
    pub payer: Signer<'info>,
    pub unique_message: Signer<'info>,
    #[account(
        init,
        payer = payer,
        space = 8 + 4 + 4 + 32 + 4 + 32 + 4 + message_body.len(),
        seeds = [b"hyperlane".as_ref(), b"-", b"dispatched_message", b"-", unique_message.key().as_ref()],
        bump
    )]
    pub dispatched_message: Account<'info, DispatchedMessage>,
}

#[error_code]
pub enum MailboxError {
    InvalidDestination,
    InvalidRecipient,
    InvalidSender,
    UnauthorizedRelayer,
}
