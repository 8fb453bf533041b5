//! LayerZero endpoint stand-in for tests. Quotes and charges a linear fee on
//! the requested `lzReceive` gas, tracks per-path nonces, and lets the
//! configured executor deliver packets to a receiver's `lz_receive`.

use anchor_lang::prelude::*;
use anchor_lang::solana_program::instruction::Instruction;
use anchor_lang::solana_program::program::invoke_signed;
use anchor_lang::system_program::{self, Transfer};
use derive_new::new;
use eco_std::keccak;

declare_id!("8ENdSS2rhWdKCktuESX3vAzWjhSHwvcQuQfWftduGBYU");

pub const ENDPOINT_SEED: &[u8] = b"Endpoint";
pub const NONCE_SEED: &[u8] = b"Nonce";
pub const RECEIVE_AUTHORITY_SEED: &[u8] = b"ReceiveAuthority";
pub const LZ_RECEIVE_DISCRIMINATOR: [u8; 8] = [8, 179, 120, 109, 33, 118, 189, 80];

pub fn endpoint_pda() -> (Pubkey, u8) {
    Pubkey::find_program_address(&[ENDPOINT_SEED], &ID)
}

pub fn nonce_pda(local: &Pubkey, remote_eid: u32, remote: &[u8; 32]) -> (Pubkey, u8) {
    Pubkey::find_program_address(
        &[NONCE_SEED, local.as_ref(), &remote_eid.to_be_bytes(), remote],
        &ID,
    )
}

pub fn receive_authority_pda(receiver: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[RECEIVE_AUTHORITY_SEED, receiver.as_ref()], &ID)
}

/// Packet id as the endpoint derives it.
pub fn guid(
    nonce: u64,
    src_eid: u32,
    sender: &Pubkey,
    dst_eid: u32,
    receiver: &[u8; 32],
) -> [u8; 32] {
    *keccak([
        nonce.to_be_bytes().as_slice(),
        &src_eid.to_be_bytes(),
        sender.as_ref(),
        &dst_eid.to_be_bytes(),
        receiver,
    ])
}

#[program]
pub mod mock_endpoint {
    use super::*;

    pub fn init(
        ctx: Context<Init>,
        eid: u32,
        executor: Pubkey,
        base_fee: u64,
        gas_price: u64,
    ) -> Result<()> {
        ctx.accounts.endpoint.set_inner(EndpointSettings {
            eid,
            executor,
            base_fee,
            gas_price,
        });

        Ok(())
    }

    pub fn quote(ctx: Context<Quote>, params: QuoteParams) -> Result<MessagingFee> {
        Ok(MessagingFee::new(
            ctx.accounts.endpoint.native_fee(&params.options),
            0,
        ))
    }

    pub fn send(ctx: Context<SendPacket>, params: SendParams) -> Result<()> {
        let native_fee = ctx.accounts.endpoint.native_fee(&params.options);
        require_gte!(params.native_fee, native_fee, EndpointError::InsufficientFee);

        system_program::transfer(
            CpiContext::new(
                ctx.accounts.system_program.to_account_info(),
                Transfer {
                    from: ctx.accounts.payer.to_account_info(),
                    to: ctx.accounts.endpoint.to_account_info(),
                },
            ),
            params.native_fee,
        )?;

        let nonce = &mut ctx.accounts.nonce;
        nonce.outbound_nonce += 1;

        let sender = ctx.accounts.sender.key();
        emit!(PacketSent::new(
            guid(
                nonce.outbound_nonce,
                ctx.accounts.endpoint.eid,
                &sender,
                params.dst_eid,
                &params.receiver,
            ),
            nonce.outbound_nonce,
            params.dst_eid,
            sender,
            params.receiver,
            params.message,
        ));

        Ok(())
    }

    /// Executes a packet from a remote OApp on its local receiver, in nonce
    /// order.
    pub fn deliver<'info>(
        ctx: Context<'_, '_, '_, 'info, Deliver<'info>>,
        packet: Packet,
    ) -> Result<()> {
        let nonce = &mut ctx.accounts.nonce;
        require_eq!(
            packet.nonce,
            nonce.inbound_nonce + 1,
            EndpointError::InvalidNonce
        );
        nonce.inbound_nonce = packet.nonce;

        let receiver = ctx.accounts.receiver.key();
        let (receive_authority, bump) = receive_authority_pda(&receiver);
        let signer_seeds: [&[u8]; 3] = [RECEIVE_AUTHORITY_SEED, receiver.as_ref(), &[bump]];
        let params = LzReceiveParams {
            src_eid: packet.src_eid,
            sender: packet.sender,
            nonce: packet.nonce,
            guid: packet.guid,
            message: packet.message,
            extra_data: vec![],
        };
        let ix = Instruction {
            program_id: receiver,
            accounts: std::iter::once(AccountMeta::new_readonly(receive_authority, true))
                .chain(ctx.remaining_accounts.iter().map(|account| AccountMeta {
                    pubkey: account.key(),
                    is_signer: account.is_signer,
                    is_writable: account.is_writable,
                }))
                .collect(),
            data: LZ_RECEIVE_DISCRIMINATOR
                .into_iter()
                .chain(params.try_to_vec()?)
                .collect(),
        };
        let account_infos: Vec<_> =
            std::iter::once(ctx.accounts.receive_authority.to_account_info())
                .chain(ctx.remaining_accounts.iter().cloned())
                .chain(std::iter::once(ctx.accounts.receiver.to_account_info()))
                .collect();

        invoke_signed(&ix, &account_infos, &[&signer_seeds]).map_err(Into::into)
    }
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug)]
pub struct QuoteParams {
    pub sender: Pubkey,
    pub dst_eid: u32,
    pub receiver: [u8; 32],
    pub message: Vec<u8>,
    pub options: Vec<u8>,
    pub pay_in_lz_token: bool,
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug)]
pub struct SendParams {
    pub dst_eid: u32,
    pub receiver: [u8; 32],
    pub message: Vec<u8>,
    pub options: Vec<u8>,
    pub native_fee: u64,
    pub lz_token_fee: u64,
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq, new)]
pub struct MessagingFee {
    pub native_fee: u64,
    pub lz_token_fee: u64,
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug)]
pub struct LzReceiveParams {
    pub src_eid: u32,
    pub sender: [u8; 32],
    pub nonce: u64,
    pub guid: [u8; 32],
    pub message: Vec<u8>,
    pub extra_data: Vec<u8>,
}

/// A packet as the executor hands it to `deliver`.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, new)]
pub struct Packet {
    pub receiver: Pubkey,
    pub src_eid: u32,
    pub sender: [u8; 32],
    pub nonce: u64,
    pub guid: [u8; 32],
    pub message: Vec<u8>,
}

#[account]
#[derive(InitSpace)]
pub struct EndpointSettings {
    pub eid: u32,
    pub executor: Pubkey,
    pub base_fee: u64,
    pub gas_price: u64,
}

impl EndpointSettings {
    /// Base fee plus the `lzReceive` gas, read from the trailing 16 bytes of
    /// the options, at the configured price.
    pub fn native_fee(&self, options: &[u8]) -> u64 {
        let gas = options
            .len()
            .checked_sub(16)
            .and_then(|start| options[start..].try_into().ok())
            .map(u128::from_be_bytes)
            .unwrap_or_default();

        u64::try_from(gas)
            .unwrap_or(u64::MAX)
            .saturating_mul(self.gas_price)
            .saturating_add(self.base_fee)
    }
}

#[account]
#[derive(InitSpace)]
pub struct Nonce {
    pub outbound_nonce: u64,
    pub inbound_nonce: u64,
}

#[event]
#[derive(new)]
pub struct PacketSent {
    guid: [u8; 32],
    nonce: u64,
    dst_eid: u32,
    sender: Pubkey,
    receiver: [u8; 32],
    message: Vec<u8>,
}

#[derive(Accounts)]
pub struct Init<'info> {
    #[account(init, payer = payer, space = 8 + EndpointSettings::INIT_SPACE, seeds = [ENDPOINT_SEED], bump)]
    pub endpoint: Account<'info, EndpointSettings>,
    #[account(mut)]
    pub payer: Signer<'info>,
    pub system_program: Program<'info, System>,
}

#[derive(Accounts)]
pub struct Quote<'info> {
    #[account(seeds = [ENDPOINT_SEED], bump)]
    pub endpoint: Account<'info, EndpointSettings>,
}

#[derive(Accounts)]
#[instruction(params: SendParams)]
pub struct SendPacket<'info> {
    pub sender: Signer<'info>,
    #[account(mut)]
    pub payer: Signer<'info>,
    #[account(mut, seeds = [ENDPOINT_SEED], bump)]
    pub endpoint: Account<'info, EndpointSettings>,
    #[account(
        init_if_needed,
        payer = payer,
        space = 8 + Nonce::INIT_SPACE,
        seeds = [NONCE_SEED, sender.key().as_ref(), &params.dst_eid.to_be_bytes(), params.receiver.as_ref()],
        bump
    )]
    pub nonce: Account<'info, Nonce>,
    pub system_program: Program<'info, System>,
}

#[derive(Accounts)]
#[instruction(packet: Packet)]
pub struct Deliver<'info> {
    #[account(mut, address = endpoint.executor @ EndpointError::UnauthorizedExecutor)]
    pub executor: Signer<'info>,
    #[account(seeds = [ENDPOINT_SEED], bump)]
    pub endpoint: Account<'info, EndpointSettings>,
    #[account(
        init_if_needed,
        payer = executor,
        space = 8 + Nonce::INIT_SPACE,
        seeds = [NONCE_SEED, packet.receiver.as_ref(), &packet.src_eid.to_be_bytes(), packet.sender.as_ref()],
        bump
    )]
    pub nonce: Account<'info, Nonce>,
    /// CHECK: signs the receiver's lz_receive through seeds
    #[account(seeds = [RECEIVE_AUTHORITY_SEED, packet.receiver.as_ref()], bump)]
    pub receive_authority: UncheckedAccount<'info>,
    /// CHECK: address is validated
    #[account(executable, address = packet.receiver @ EndpointError::InvalidReceiver)]
    pub receiver: UncheckedAccount<'info>,
    pub system_program: Program<'info, System>,
}

#[error_code]
pub enum EndpointError {
    InsufficientFee,
    InvalidNonce,
    InvalidReceiver,
    UnauthorizedExecutor,
}
