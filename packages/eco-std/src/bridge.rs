//! Shared plumbing for provers that relay proofs over a message bridge.
//!
//! A bridge prover on the destination chain sends an
//! [`IntentHashesClaimants`] batch to its counterpart on the source chain.
//! The receiving side only accepts messages from senders that were
//! whitelisted for the origin chain at initialization.

use anchor_lang::prelude::*;
use derive_new::new;

use crate::prover::IntentHashesClaimants;
use crate::{Bytes32, EcoStdError};

pub const MAX_WHITELIST_LEN: usize = 20;
pub const MAX_WHITELIST_CHAINS: usize = 8;
pub const DEFAULT_GAS_LIMIT: u64 = 200_000;
pub const MIN_GAS_LIMIT: u64 = 100_000;

#[derive(AnchorSerialize, AnchorDeserialize, InitSpace, Clone, Debug, PartialEq, Eq, new)]
pub struct ChainWhitelist {
    pub chain_id: u64,
    #[max_len(MAX_WHITELIST_LEN)]
    pub senders: Vec<Bytes32>,
}

#[derive(AnchorSerialize, AnchorDeserialize, InitSpace, Clone, Debug, Default, PartialEq, Eq)]
pub struct Whitelist {
    #[max_len(MAX_WHITELIST_CHAINS)]
    pub chains: Vec<ChainWhitelist>,
}

impl Whitelist {
    pub fn new(chains: Vec<ChainWhitelist>) -> Result<Self> {
        require!(
            chains.len() <= MAX_WHITELIST_CHAINS,
            EcoStdError::TooManyWhitelistedChains
        );
        require!(
            chains
                .iter()
                .all(|chain| chain.senders.len() <= MAX_WHITELIST_LEN),
            EcoStdError::TooManyWhitelistedSenders
        );

        Ok(Self { chains })
    }

    pub fn is_whitelisted(&self, origin_chain: u64, sender: &Bytes32) -> bool {
        self.chains
            .iter()
            .filter(|chain| chain.chain_id == origin_chain)
            .any(|chain| chain.senders.contains(sender))
    }
}

/// Prover-specific bytes a caller attaches to `prove`: the counterpart prover
/// on the source chain, optionally followed by a big-endian gas limit for the
/// delivery.
#[derive(Clone, Copy, Debug, PartialEq, Eq, new)]
pub struct ProveData {
    pub source_prover: Bytes32,
    pub gas_limit: u64,
}

impl ProveData {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        match bytes.len() {
            32 => Ok(Self::new(bytes.try_into()?, DEFAULT_GAS_LIMIT)),
            40 => {
                let (source_prover, gas_limit) = bytes.split_at(32);
                let gas_limit = gas_limit
                    .try_into()
                    .map(u64::from_be_bytes)
                    .map_err(|_| EcoStdError::InvalidProveData)?;

                Ok(Self::new(
                    source_prover.try_into()?,
                    gas_limit.max(MIN_GAS_LIMIT),
                ))
            }
            _ => Err(EcoStdError::InvalidProveData.into()),
        }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        [
            self.source_prover.as_ref(),
            self.gas_limit.to_be_bytes().as_slice(),
        ]
        .concat()
    }
}

/// Authenticates and decodes a proof message that arrived over a bridge.
pub fn inbound_proofs(
    whitelist: &Whitelist,
    origin_chain: u64,
    sender: &Bytes32,
    payload: &[u8],
) -> Result<IntentHashesClaimants> {
    require!(
        whitelist.is_whitelisted(origin_chain, sender),
        EcoStdError::NotWhitelisted
    );

    let proofs = IntentHashesClaimants::from_bytes(payload)?;
    require!(
        proofs.destination == origin_chain,
        EcoStdError::ChainIdMismatch
    );

    Ok(proofs)
}
