use anchor_lang::prelude::*;

mod prove;

pub use prove::*;

#[error_code]
pub enum LocalProverError {
    InvalidPortalDispatcher,
    InvalidSourceChain,
    InvalidProof,
}
