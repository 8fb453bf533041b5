use anchor_lang::prelude::*;

mod init;
mod prove;
mod prove_storage;
mod submit_state_root;

pub use init::*;
pub use prove::*;
pub use prove_storage::*;
pub use submit_state_root::*;

#[error_code]
pub enum StorageProverError {
    InvalidPortalDispatcher,
    InvalidConfig,
    TooManyDestinationPortals,
    UnauthorizedRootOracle,
    InvalidStateRootAccount,
    StateRootAlreadySubmitted,
    UnknownStateRoot,
    UnsupportedChain,
    ZeroClaimant,
    InvalidStorageProof,
}
