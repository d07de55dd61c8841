//! The bank: accounts keyed by holder, and the pool of total deposits

use indexmap::IndexMap;
use tracing::{debug, info};

use crate::account::{require_positive, Account};
use crate::amount::Amount;
use crate::error::{LedgerError, Result};
use crate::journal::{Journal, TransactionKind};

/// Manages every account and the bank-wide deposit pool.
///
/// The pool grows with deposits and loan repayments and shrinks with
/// withdrawals and approved loans, so at all times
/// `total_deposits == Σ balance − Σ loan`. Loans are only approved while
/// the pool can cover them.
///
/// Failed operations leave the accounts, the pool and the journal exactly
/// as they were.
///
/// # Example
///
/// ```
/// use erebor::{AccountManager, Amount};
///
/// let mut bank = AccountManager::new();
/// bank.add_account("Alice", Amount::from_major(1000)).unwrap();
///
/// bank.approve_loan("Alice", Amount::from_major(500)).unwrap();
/// bank.repay_loan("Alice", Amount::from_major(200)).unwrap();
///
/// assert_eq!(bank.loan("Alice"), Some(Amount::from_major(300)));
/// assert_eq!(bank.total_deposits(), Amount::from_major(700));
/// assert_eq!(bank.balance("Bob"), None);
/// ```
#[derive(Debug, Clone, Default)]
pub struct AccountManager {
    /// Accounts in opening order
    accounts: IndexMap<String, Account>,

    /// Deposits available to lend
    total_deposits: Amount,

    /// Every successful mutation
    journal: Journal,
}

fn lookup_mut<'a>(
    accounts: &'a mut IndexMap<String, Account>,
    holder: &str,
) -> Result<&'a mut Account> {
    accounts
        .get_mut(holder)
        .ok_or_else(|| LedgerError::AccountNotFound {
            holder: holder.to_string(),
        })
}

/// The four ways an existing account can change.
#[derive(Debug, Clone, Copy)]
enum Movement {
    Deposit,
    Withdrawal,
    LoanApproved,
    LoanRepayment,
}

impl Movement {
    fn kind(self) -> TransactionKind {
        match self {
            Movement::Deposit => TransactionKind::Deposit,
            Movement::Withdrawal => TransactionKind::Withdrawal,
            Movement::LoanApproved => TransactionKind::LoanApproved,
            Movement::LoanRepayment => TransactionKind::LoanRepayment,
        }
    }
}

fn rejected<T>(operation: &'static str, holder: &str, err: LedgerError) -> Result<T> {
    debug!(operation, holder, error = %err, "operation rejected");
    Err(err)
}

impl AccountManager {
    /// Create a bank with no accounts and an empty pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a manager from persisted parts. Callers validate first.
    pub(crate) fn from_parts(
        accounts: IndexMap<String, Account>,
        total_deposits: Amount,
        journal: Journal,
    ) -> Self {
        Self {
            accounts,
            total_deposits,
            journal,
        }
    }

    // ═══════════════════════════════════════════════════════════════════
    // Account Lifecycle
    // ═══════════════════════════════════════════════════════════════════

    /// Open an account. The initial deposit must be strictly positive and
    /// joins the pool.
    ///
    /// # Errors
    ///
    /// - `InvalidAmount` if `initial_deposit <= 0`
    /// - `MissingHolder` if `holder` is blank
    /// - `AccountExists` if `holder` already has an account
    pub fn add_account(
        &mut self,
        holder: impl Into<String>,
        initial_deposit: Amount,
    ) -> Result<()> {
        let holder = holder.into();
        if let Err(err) = require_positive("open", initial_deposit) {
            return rejected("open", &holder, err);
        }
        if self.accounts.contains_key(&holder) {
            let err = LedgerError::AccountExists {
                holder: holder.clone(),
            };
            return rejected("open", &holder, err);
        }
        let Some(new_total) = self.total_deposits.checked_add(initial_deposit) else {
            return rejected("open", &holder, LedgerError::Overflow { operation: "open" });
        };

        let account = match Account::new(holder.clone(), initial_deposit) {
            Ok(account) => account,
            Err(err) => return rejected("open", &holder, err),
        };
        self.total_deposits = new_total;
        self.journal.record(
            &holder,
            TransactionKind::Open,
            initial_deposit,
            account.balance(),
            account.loan(),
            new_total,
        );
        info!(holder = %holder, amount = %initial_deposit, total = %new_total, "account opened");
        self.accounts.insert(holder, account);
        Ok(())
    }

    // ═══════════════════════════════════════════════════════════════════
    // Cash Movements
    // ═══════════════════════════════════════════════════════════════════

    /// Deposit into `holder`'s account. The pool grows by the same amount.
    pub fn deposit(&mut self, holder: &str, amount: Amount) -> Result<()> {
        self.apply(holder, amount, Movement::Deposit)
    }

    /// Withdraw from `holder`'s account. The pool shrinks by the same amount.
    ///
    /// # Errors
    ///
    /// - `InvalidAmount` if `amount <= 0`
    /// - `AccountNotFound` if `holder` has no account
    /// - `InsufficientFunds` if `amount` exceeds the balance
    pub fn withdraw(&mut self, holder: &str, amount: Amount) -> Result<()> {
        self.apply(holder, amount, Movement::Withdrawal)
    }

    // ═══════════════════════════════════════════════════════════════════
    // Loans
    // ═══════════════════════════════════════════════════════════════════

    /// Lend `amount` to `holder` out of the pool.
    ///
    /// The loan is recorded against the account; the balance is not
    /// credited.
    ///
    /// # Errors
    ///
    /// - `InvalidAmount` if `amount <= 0`
    /// - `AccountNotFound` if `holder` has no account
    /// - `InsufficientReserves` if `amount` exceeds total deposits
    pub fn approve_loan(&mut self, holder: &str, amount: Amount) -> Result<()> {
        self.apply(holder, amount, Movement::LoanApproved)
    }

    /// Pay back part or all of `holder`'s loan into the pool.
    ///
    /// # Errors
    ///
    /// - `InvalidAmount` if `amount <= 0`
    /// - `AccountNotFound` if `holder` has no account
    /// - `RepaymentExceedsLoan` if `amount` exceeds the outstanding loan
    pub fn repay_loan(&mut self, holder: &str, amount: Amount) -> Result<()> {
        self.apply(holder, amount, Movement::LoanRepayment)
    }

    /// Shared path for every mutation of an existing account.
    ///
    /// Amount validation happens before the holder lookup. The new pool
    /// figure is computed before the account is touched, so an overflow
    /// cannot leave the two out of step.
    fn apply(&mut self, holder: &str, amount: Amount, movement: Movement) -> Result<()> {
        let kind = movement.kind();
        let operation = kind.as_str();
        if let Err(err) = require_positive(operation, amount) {
            return rejected(operation, holder, err);
        }
        let account = match lookup_mut(&mut self.accounts, holder) {
            Ok(account) => account,
            Err(err) => return rejected(operation, holder, err),
        };

        let new_total = match movement {
            Movement::Deposit | Movement::LoanRepayment => self.total_deposits.checked_add(amount),
            Movement::Withdrawal => self.total_deposits.checked_sub(amount),
            Movement::LoanApproved => {
                if amount > self.total_deposits {
                    let err = LedgerError::InsufficientReserves {
                        requested: amount,
                        available: self.total_deposits,
                    };
                    return rejected(operation, holder, err);
                }
                Some(self.total_deposits - amount)
            }
        };
        let Some(new_total) = new_total else {
            return rejected(operation, holder, LedgerError::Overflow { operation });
        };

        let outcome = match movement {
            Movement::Deposit => account.deposit(amount),
            Movement::Withdrawal => account.withdraw(amount),
            Movement::LoanApproved => account.approve_loan(amount),
            Movement::LoanRepayment => account.repay_loan(amount),
        };
        if let Err(err) = outcome {
            return rejected(operation, holder, err);
        }

        self.total_deposits = new_total;
        self.journal.record(
            holder,
            kind,
            amount,
            account.balance(),
            account.loan(),
            new_total,
        );
        info!(
            operation,
            holder,
            amount = %amount,
            balance = %account.balance(),
            loan = %account.loan(),
            total = %new_total,
            "operation applied"
        );
        Ok(())
    }

    // ═══════════════════════════════════════════════════════════════════
    // Queries
    // ═══════════════════════════════════════════════════════════════════

    /// The bank-wide deposit pool.
    pub fn total_deposits(&self) -> Amount {
        self.total_deposits
    }

    /// `holder`'s balance, or `None` if there is no such account.
    pub fn balance(&self, holder: &str) -> Option<Amount> {
        self.accounts.get(holder).map(Account::balance)
    }

    /// `holder`'s outstanding loan, or `None` if there is no such account.
    pub fn loan(&self, holder: &str) -> Option<Amount> {
        self.accounts.get(holder).map(Account::loan)
    }

    /// Look up an account.
    pub fn account(&self, holder: &str) -> Option<&Account> {
        self.accounts.get(holder)
    }

    /// Iterate over accounts in the order they were opened.
    pub fn accounts(&self) -> impl Iterator<Item = &Account> {
        self.accounts.values()
    }

    /// Check if `holder` has an account.
    pub fn contains(&self, holder: &str) -> bool {
        self.accounts.contains_key(holder)
    }

    /// Number of accounts.
    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    /// Check if there are no accounts.
    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// The journal of successful operations.
    pub fn journal(&self) -> &Journal {
        &self.journal
    }

    /// Recompute `Σ balance − Σ loan` from the accounts.
    ///
    /// Returns `None` if the sum leaves the representable range.
    pub fn computed_total(&self) -> Option<Amount> {
        self.accounts.values().try_fold(Amount::ZERO, |total, account| {
            total
                .checked_add(account.balance())?
                .checked_sub(account.loan())
        })
    }
}
