//! Append-only journal of successful ledger operations

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::amount::Amount;

/// What a journal entry records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    /// Account opened with an initial deposit
    Open,
    /// Cash deposited
    Deposit,
    /// Cash withdrawn
    Withdrawal,
    /// Loan granted out of the deposit pool
    LoanApproved,
    /// Loan paid back into the deposit pool
    LoanRepayment,
}

impl TransactionKind {
    /// Short lowercase label, matching the serialized form.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Open => "open",
            TransactionKind::Deposit => "deposit",
            TransactionKind::Withdrawal => "withdrawal",
            TransactionKind::LoanApproved => "loan_approved",
            TransactionKind::LoanRepayment => "loan_repayment",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// A single journaled operation, with the figures it left behind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Position in the journal, starting at 1
    pub sequence: u64,
    /// Account the operation applied to
    pub holder: String,
    /// Kind of operation
    pub kind: TransactionKind,
    /// Amount moved
    pub amount: Amount,
    /// Holder's balance afterwards
    pub balance_after: Amount,
    /// Holder's outstanding loan afterwards
    pub loan_after: Amount,
    /// Bank-wide deposit pool afterwards
    pub total_deposits_after: Amount,
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{:<4} {:<15} {:<20} {:>12}  balance {:>12}  loan {:>12}  pool {:>12}",
            self.sequence,
            self.kind,
            self.holder,
            self.amount,
            self.balance_after,
            self.loan_after,
            self.total_deposits_after
        )
    }
}

/// Ordered list of transactions.
///
/// Only the ledger appends to it, so sequence numbers are always
/// contiguous from 1.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Journal {
    entries: Vec<Transaction>,
}

impl Journal {
    /// Create an empty journal.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry, assigning the next sequence number.
    pub(crate) fn record(
        &mut self,
        holder: &str,
        kind: TransactionKind,
        amount: Amount,
        balance_after: Amount,
        loan_after: Amount,
        total_deposits_after: Amount,
    ) -> &Transaction {
        let sequence = self.entries.len() as u64 + 1;
        self.entries.push(Transaction {
            sequence,
            holder: holder.to_string(),
            kind,
            amount,
            balance_after,
            loan_after,
            total_deposits_after,
        });
        &self.entries[self.entries.len() - 1]
    }

    /// All entries in order.
    pub fn entries(&self) -> &[Transaction] {
        &self.entries
    }

    /// Entries touching one holder, in order.
    pub fn for_holder<'a>(&'a self, holder: &'a str) -> impl Iterator<Item = &'a Transaction> {
        self.entries.iter().filter(move |t| t.holder == holder)
    }

    /// The most recent entry.
    pub fn last(&self) -> Option<&Transaction> {
        self.entries.last()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if nothing has been journaled.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Check that sequence numbers run 1, 2, 3, ...
    pub(crate) fn is_contiguous(&self) -> bool {
        self.entries
            .iter()
            .enumerate()
            .all(|(i, t)| t.sequence == i as u64 + 1)
    }
}
