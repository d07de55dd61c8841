//! Error types for ledger operations, amounts, snapshots and sessions

use std::path::PathBuf;

use thiserror::Error;

use crate::amount::Amount;

/// Failure to parse a monetary amount.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AmountError {
    /// Nothing to parse
    #[error("empty amount")]
    Empty,

    /// A character that is not part of a decimal number
    #[error("invalid amount '{0}': expected digits with at most two decimal places")]
    Malformed(String),

    /// More than two digits after the decimal point
    #[error("invalid amount '{0}': at most two decimal places are allowed")]
    TooPrecise(String),

    /// Does not fit in 64 bits of minor units
    #[error("amount '{0}' is out of range")]
    Overflow(String),
}

/// Main error type for ledger operations.
///
/// Every variant is a rejection: the ledger is left exactly as it was
/// before the call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// Amount must be strictly positive (or non-negative for an opening balance)
    #[error("invalid amount {amount} for {operation}: amount must be positive")]
    InvalidAmount {
        /// The operation that rejected the amount
        operation: &'static str,
        /// The rejected amount
        amount: Amount,
    },

    /// Holder name is empty or whitespace
    #[error("account holder must not be blank")]
    MissingHolder,

    /// No account with this holder
    #[error("no account for holder '{holder}'")]
    AccountNotFound {
        /// Requested holder
        holder: String,
    },

    /// Holder already has an account
    #[error("an account for holder '{holder}' already exists")]
    AccountExists {
        /// Duplicate holder
        holder: String,
    },

    /// Withdrawal larger than the balance
    #[error("insufficient funds: requested {requested}, available {available}")]
    InsufficientFunds {
        /// Amount requested
        requested: Amount,
        /// Current balance
        available: Amount,
    },

    /// Loan larger than the bank's pooled deposits
    #[error("insufficient reserves: requested {requested}, total deposits {available}")]
    InsufficientReserves {
        /// Loan amount requested
        requested: Amount,
        /// Current total deposits
        available: Amount,
    },

    /// Repayment larger than the outstanding loan
    #[error("repayment {requested} exceeds outstanding loan {outstanding}")]
    RepaymentExceedsLoan {
        /// Repayment requested
        requested: Amount,
        /// Current outstanding loan
        outstanding: Amount,
    },

    /// Arithmetic left the representable range
    #[error("amount overflow during {operation}")]
    Overflow {
        /// The operation that overflowed
        operation: &'static str,
    },
}

impl LedgerError {
    /// Check if this error came from an unknown holder.
    pub fn is_not_found(&self) -> bool {
        matches!(self, LedgerError::AccountNotFound { .. })
    }

    /// Check if this error came from amount validation.
    pub fn is_invalid_amount(&self) -> bool {
        matches!(self, LedgerError::InvalidAmount { .. })
    }
}

/// Failure to persist or restore a ledger.
#[derive(Error, Debug)]
pub enum SnapshotError {
    /// Filesystem failure
    #[error("I/O error on {path}: {source}")]
    Io {
        /// File involved
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// JSON encoding or decoding failure
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV encoding failure
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Snapshot format version this build does not understand
    #[error("unsupported snapshot version {found} (expected {expected})")]
    UnsupportedVersion {
        /// Version found in the file
        found: u32,
        /// Version this build writes
        expected: u32,
    },

    /// Decoded fine, but the contents break a ledger invariant
    #[error("corrupt snapshot: {0}")]
    Corrupt(String),
}

/// Failure while interpreting a session command.
#[derive(Error, Debug)]
pub enum SessionError {
    /// The line could not be parsed into a command
    #[error("parse error: {0}")]
    Parse(String),

    /// An amount argument failed to parse
    #[error(transparent)]
    Amount(#[from] AmountError),

    /// The ledger rejected the operation
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// Saving, loading or exporting failed
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),

    /// Reading a script or writing output failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A script line failed
    #[error("line {line}: {source}")]
    Script {
        /// 1-based line number
        line: usize,
        /// What went wrong on that line
        #[source]
        source: Box<SessionError>,
    },
}

/// Result type alias for ledger operations
pub type Result<T> = std::result::Result<T, LedgerError>;
