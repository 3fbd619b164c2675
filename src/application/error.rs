use thiserror::Error;

use crate::domain::Cents;
use crate::store::LedgerError;

/// Errors surfaced at the presentation boundary. The validation variants are
/// the UI-side pre-checks from the original design; anything that slips past
/// them is still caught by the store and arrives as [`LedgerError`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    #[error("No user is logged in")]
    NotLoggedIn,

    #[error("No registered user with email: {0}")]
    RecipientNotFound(String),

    #[error("Recipient must be a different user")]
    TransferToSelf,

    #[error("Amount must be positive, got {0}")]
    InvalidAmount(Cents),

    #[error("Insufficient funds: balance {balance}, required {required}")]
    InsufficientFunds { balance: Cents, required: Cents },

    #[error(transparent)]
    Ledger(#[from] LedgerError),
}
