//! # Erebor
//!
//! An in-memory account and loan ledger.
//!
//! Erebor keeps customer accounts keyed by holder name, a bank-wide pool of
//! total deposits, and a journal of every successful operation. Loans are
//! drawn from the pool and repayments return to it.
//!
//! ## Architecture
//!
//! - **Amounts**: exact two-decimal money, never floating point
//! - **Accounts**: one holder's balance and outstanding loan
//! - **Manager**: all accounts plus the deposit pool and journal
//! - **Snapshots**: JSON persistence and CSV journal export
//! - **Sessions**: the text command language used by the `erebor` binary
//!
//! ## Example
//!
//! ```
//! use erebor::{AccountManager, Amount, LedgerError};
//!
//! let mut bank = AccountManager::new();
//! bank.add_account("Alice", Amount::from_major(1000)).unwrap();
//! bank.withdraw("Alice", Amount::from_major(200)).unwrap();
//!
//! assert_eq!(bank.balance("Alice"), Some(Amount::from_major(800)));
//! assert_eq!(bank.total_deposits(), Amount::from_major(800));
//!
//! let err = bank.approve_loan("Alice", Amount::from_major(1200)).unwrap_err();
//! assert!(matches!(err, LedgerError::InsufficientReserves { .. }));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod account;
pub mod amount;
pub mod config;
pub mod error;
pub mod journal;
pub mod manager;
pub mod session;
pub mod snapshot;

// Re-export main types
pub use account::Account;
pub use amount::Amount;
pub use config::Settings;
pub use error::{AmountError, LedgerError, Result, SessionError, SnapshotError};
pub use journal::{Journal, Transaction, TransactionKind};
pub use manager::AccountManager;
pub use session::{Command, Outcome, ScriptSummary, Session};
pub use snapshot::Snapshot;

/// Erebor version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
