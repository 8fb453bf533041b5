use anchor_lang::prelude::*;

mod fetch_fee;
mod init;
mod lz_receive;
mod lz_receive_types;
mod prove;

pub use fetch_fee::*;
pub use init::*;
pub use lz_receive::*;
pub use lz_receive_types::*;
pub use prove::*;

#[error_code]
pub enum LayerZeroProverError {
    InvalidPortalDispatcher,
    InvalidDispatcher,
    InvalidEndpoint,
    InvalidEndpointResponse,
    InvalidChainId,
    InvalidConfig,
    InvalidPdaPayer,
    UnauthorizedHandle,
    InvalidProof,
}
