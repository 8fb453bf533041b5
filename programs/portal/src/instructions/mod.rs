use anchor_lang::prelude::*;

pub mod fulfill;
pub mod fund;
pub mod fund_context;
pub mod prove;
pub mod publish;
pub mod recover_token;
pub mod refund;
pub mod view;
pub mod withdraw;

pub use fulfill::*;
pub use fund::*;
pub use prove::*;
pub use publish::*;
pub use recover_token::*;
pub use refund::*;
pub use view::*;
pub use withdraw::*;

#[error_code]
pub enum PortalError {
    InvalidTokenTransferAccounts,
    InvalidTokenProgram,
    InvalidCalldata,
    TokenAmountOverflow,
    InvalidVault,
    InvalidVaultState,
    InvalidVaultAta,
    InvalidAta,
    InvalidMint,
    InvalidTargetToken,
    InvalidFunderToken,
    InvalidFundingDelegate,
    InsufficientFunding,
    InsufficientTokenAllowance,
    InsufficientNativeReward,
    IntentAlreadyFunded,
    RewardsAlreadyWithdrawn,
    UnauthorizedWithdrawal,
    InvalidClaimant,
    InvalidCreator,
    IntentNotClaimed,
    IntentNotExpired,
    InvalidRecoveryToken,
    ArrayLengthMismatch,
    InvalidExecutor,
    InvalidFulfillMarker,
    IntentHashMismatch,
    IntentExpired,
    InvalidPortal,
    ZeroClaimant,
    AlreadyFulfilled,
    CallToProver,
    CallToEoa,
    CallValueUnsupported,
    InvalidDispatcher,
    IntentNotFulfilled,
}
