use anchor_lang::prelude::*;
use derive_more::Deref;
use tiny_keccak::{Hasher, Keccak};

pub mod account;
pub mod bridge;
pub mod merkle;
pub mod prover;

pub use prover::{is_prover, Proof};

#[cfg(feature = "mainnet")]
pub const CHAIN_ID: u64 = 1399811149;
#[cfg(not(feature = "mainnet"))]
pub const CHAIN_ID: u64 = 1399811150;

pub const EVENT_AUTHORITY_SEED: &[u8] = b"__event_authority";

/// Width of a chain-native address on EVM counterparts.
pub const EVM_ADDRESS_LEN: usize = 20;

#[error_code(offset = 7000)]
pub enum EcoStdError {
    InvalidAddress,
    InvalidEncodedProofs,
    InvalidProveData,
    InvalidProofAccount,
    TooManyWhitelistedSenders,
    TooManyWhitelistedChains,
    NotWhitelisted,
    ChainIdMismatch,
}

/// Universal 32-byte identifier shared by every chain the protocol speaks to.
/// Also the hash type.
#[derive(
    AnchorSerialize,
    AnchorDeserialize,
    InitSpace,
    Deref,
    Clone,
    Copy,
    Default,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
)]
pub struct Bytes32([u8; 32]);

impl Bytes32 {
    pub const ZERO: Self = Self([0u8; 32]);

    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }

    /// Widens an EVM address by left-padding it with zero bytes.
    pub fn from_evm_address(address: [u8; EVM_ADDRESS_LEN]) -> Self {
        let mut bytes = [0u8; 32];
        bytes[32 - EVM_ADDRESS_LEN..].copy_from_slice(&address);

        Self(bytes)
    }

    /// Narrows to an EVM address; the padding must be zero or the conversion
    /// would drop data.
    pub fn to_evm_address(&self) -> Result<[u8; EVM_ADDRESS_LEN]> {
        let (padding, address) = self.0.split_at(32 - EVM_ADDRESS_LEN);
        require!(
            padding.iter().all(|byte| *byte == 0),
            EcoStdError::InvalidAddress
        );

        address
            .try_into()
            .map_err(|_| EcoStdError::InvalidAddress.into())
    }
}

impl From<[u8; 32]> for Bytes32 {
    fn from(bytes: [u8; 32]) -> Self {
        Bytes32(bytes)
    }
}

impl From<Bytes32> for [u8; 32] {
    fn from(bytes: Bytes32) -> Self {
        bytes.0
    }
}

impl From<Pubkey> for Bytes32 {
    fn from(pubkey: Pubkey) -> Self {
        Bytes32(pubkey.to_bytes())
    }
}

impl From<Bytes32> for Pubkey {
    fn from(bytes: Bytes32) -> Self {
        Pubkey::new_from_array(bytes.0)
    }
}

impl AsRef<[u8]> for Bytes32 {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl PartialEq<Pubkey> for Bytes32 {
    fn eq(&self, pubkey: &Pubkey) -> bool {
        self.0 == pubkey.to_bytes()
    }
}

impl TryFrom<&[u8]> for Bytes32 {
    type Error = anchor_lang::error::Error;

    fn try_from(bytes: &[u8]) -> Result<Self> {
        <[u8; 32]>::try_from(bytes)
            .map(Self)
            .map_err(|_| EcoStdError::InvalidAddress.into())
    }
}

pub fn keccak<'a>(parts: impl IntoIterator<Item = &'a [u8]>) -> Bytes32 {
    let mut hasher = Keccak::v256();
    let mut hash = [0u8; 32];
    parts.into_iter().for_each(|part| hasher.update(part));
    hasher.finalize(&mut hash);

    hash.into()
}

/// keccak256 over the borsh encoding of `value`, streamed into the hasher.
pub fn keccak_borsh<T: AnchorSerialize>(value: &T) -> Bytes32 {
    let mut writer = KeccakWriter(Keccak::v256());
    let mut hash = [0u8; 32];
    // the writer never fails, so neither does serialization into it
    let _ = value.serialize(&mut writer);
    writer.0.finalize(&mut hash);

    hash.into()
}

struct KeccakWriter(Keccak);

impl std::io::Write for KeccakWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.update(buf);

        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

pub fn event_authority_pda(program_id: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[EVENT_AUTHORITY_SEED], program_id)
}

/// Current cluster time; a clock before the epoch reads as zero.
pub fn now() -> Result<u64> {
    Ok(u64::try_from(Clock::get()?.unix_timestamp).unwrap_or_default())
}

/// Serializable version of Solana's `AccountMeta`, used to rebuild the
/// account list of a route call when hashing the route.
#[derive(AnchorDeserialize, AnchorSerialize, Clone, Debug, PartialEq, Eq)]
pub struct SerializableAccountMeta {
    pub pubkey: Pubkey,
    pub is_signer: bool,
    pub is_writable: bool,
}

impl From<AccountInfo<'_>> for SerializableAccountMeta {
    fn from(account_info: AccountInfo<'_>) -> Self {
        Self {
            pubkey: account_info.key(),
            is_signer: account_info.is_signer,
            is_writable: account_info.is_writable,
        }
    }
}

impl From<AccountMeta> for SerializableAccountMeta {
    fn from(account_meta: AccountMeta) -> Self {
        Self {
            pubkey: account_meta.pubkey,
            is_signer: account_meta.is_signer,
            is_writable: account_meta.is_writable,
        }
    }
}
