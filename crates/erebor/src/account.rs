//! A single customer account

use serde::{Deserialize, Serialize};

use crate::amount::Amount;
use crate::error::{LedgerError, Result};

/// One holder's account: a cash balance and an outstanding loan.
///
/// Both figures are never negative. Every mutating method either succeeds
/// completely or returns an error and leaves the account untouched.
///
/// # Example
///
/// ```
/// use erebor::{Account, Amount};
///
/// let mut account = Account::new("Testy McTest", Amount::from_major(100)).unwrap();
/// account.deposit(Amount::from_major(50)).unwrap();
/// assert_eq!(account.balance(), Amount::from_major(150));
///
/// // Loans are tracked separately and never credited to the balance
/// account.approve_loan(Amount::from_major(200)).unwrap();
/// assert_eq!(account.loan(), Amount::from_major(200));
/// assert_eq!(account.balance(), Amount::from_major(150));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Display name, unique within a manager
    holder: String,

    /// Cash on deposit
    balance: Amount,

    /// Outstanding loan principal
    loan: Amount,
}

/// Reject anything that is not strictly positive.
pub(crate) fn require_positive(operation: &'static str, amount: Amount) -> Result<()> {
    if amount.is_positive() {
        Ok(())
    } else {
        Err(LedgerError::InvalidAmount { operation, amount })
    }
}

impl Account {
    /// Open an account with an initial deposit.
    ///
    /// # Errors
    ///
    /// - `MissingHolder` if `holder` is blank
    /// - `InvalidAmount` if `initial_deposit` is negative
    pub fn new(holder: impl Into<String>, initial_deposit: Amount) -> Result<Self> {
        let holder = holder.into();
        if holder.trim().is_empty() {
            return Err(LedgerError::MissingHolder);
        }
        if initial_deposit.is_negative() {
            return Err(LedgerError::InvalidAmount {
                operation: "open",
                amount: initial_deposit,
            });
        }
        Ok(Self {
            holder,
            balance: initial_deposit,
            loan: Amount::ZERO,
        })
    }

    /// The account holder's name.
    pub fn holder(&self) -> &str {
        &self.holder
    }

    /// Current cash balance.
    pub fn balance(&self) -> Amount {
        self.balance
    }

    /// Current outstanding loan.
    pub fn loan(&self) -> Amount {
        self.loan
    }

    // ═══════════════════════════════════════════════════════════════════
    // Cash
    // ═══════════════════════════════════════════════════════════════════

    /// Add a strictly positive amount to the balance.
    pub fn deposit(&mut self, amount: Amount) -> Result<()> {
        require_positive("deposit", amount)?;
        self.balance = self
            .balance
            .checked_add(amount)
            .ok_or(LedgerError::Overflow {
                operation: "deposit",
            })?;
        Ok(())
    }

    /// Take a strictly positive amount out of the balance.
    ///
    /// # Errors
    ///
    /// - `InvalidAmount` if `amount <= 0`
    /// - `InsufficientFunds` if `amount` exceeds the balance
    pub fn withdraw(&mut self, amount: Amount) -> Result<()> {
        require_positive("withdraw", amount)?;
        if amount > self.balance {
            return Err(LedgerError::InsufficientFunds {
                requested: amount,
                available: self.balance,
            });
        }
        self.balance -= amount;
        Ok(())
    }

    // ═══════════════════════════════════════════════════════════════════
    // Loans
    // ═══════════════════════════════════════════════════════════════════

    /// Increase the outstanding loan. The balance is not credited.
    ///
    /// Checking the bank's reserves is the manager's job, not the account's.
    pub fn approve_loan(&mut self, amount: Amount) -> Result<()> {
        require_positive("approve loan", amount)?;
        self.loan = self.loan.checked_add(amount).ok_or(LedgerError::Overflow {
            operation: "approve loan",
        })?;
        Ok(())
    }

    /// Pay down the outstanding loan.
    ///
    /// # Errors
    ///
    /// - `InvalidAmount` if `amount <= 0`
    /// - `RepaymentExceedsLoan` if `amount` is more than is owed
    pub fn repay_loan(&mut self, amount: Amount) -> Result<()> {
        require_positive("repay loan", amount)?;
        if amount > self.loan {
            return Err(LedgerError::RepaymentExceedsLoan {
                requested: amount,
                outstanding: self.loan,
            });
        }
        self.loan -= amount;
        Ok(())
    }
}
