use anchor_lang::prelude::*;

mod handle;
mod handle_account_metas;
mod init;
mod prove;

pub use handle::*;
pub use handle_account_metas::*;
pub use init::*;
pub use prove::*;

#[error_code]
pub enum HyperProverError {
    InvalidPortalDispatcher,
    InvalidDispatcher,
    InvalidMailbox,
    InvalidChainId,
    InvalidConfig,
    InvalidPdaPayer,
    UnauthorizedHandle,
    InvalidProof,
}
