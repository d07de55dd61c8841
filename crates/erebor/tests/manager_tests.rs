//! AccountManager tests

use erebor::*;
use pretty_assertions::assert_eq;

fn amt(major: i64) -> Amount {
    Amount::from_major(major)
}

/// Bank with Alice holding 1000.
fn bank_with_alice() -> AccountManager {
    let mut bank = AccountManager::new();
    bank.add_account("Alice", amt(1000)).unwrap();
    bank
}

// ═══════════════════════════════════════════════════════════════════════
// Opening Accounts
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_add_account_valid() {
    let bank = bank_with_alice();
    assert_eq!(bank.balance("Alice"), Some(amt(1000)));
    assert_eq!(bank.total_deposits(), amt(1000));
    assert_eq!(bank.len(), 1);
    assert!(bank.contains("Alice"));
}

#[test]
fn test_add_account_zero_initial_deposit() {
    let mut bank = AccountManager::new();
    assert!(matches!(
        bank.add_account("Bob", Amount::ZERO),
        Err(LedgerError::InvalidAmount { .. })
    ));
    assert!(bank.is_empty());
}

#[test]
fn test_add_account_negative_initial_deposit() {
    let mut bank = AccountManager::new();
    assert!(matches!(
        bank.add_account("Alice", amt(-100)),
        Err(LedgerError::InvalidAmount { .. })
    ));
    assert_eq!(bank.total_deposits(), Amount::ZERO);
}

#[test]
fn test_add_account_duplicate_holder() {
    let mut bank = bank_with_alice();
    assert_eq!(
        bank.add_account("Alice", amt(5)),
        Err(LedgerError::AccountExists {
            holder: "Alice".into()
        })
    );
    assert_eq!(bank.balance("Alice"), Some(amt(1000)));
    assert_eq!(bank.total_deposits(), amt(1000));
}

#[test]
fn test_add_account_blank_holder() {
    let mut bank = AccountManager::new();
    assert_eq!(bank.add_account("  ", amt(5)), Err(LedgerError::MissingHolder));
    assert_eq!(bank.total_deposits(), Amount::ZERO);
    assert!(bank.journal().is_empty());
}

#[test]
fn test_accounts_keep_opening_order() {
    let mut bank = AccountManager::new();
    for holder in ["Carol", "Alice", "Bob"] {
        bank.add_account(holder, amt(10)).unwrap();
    }
    let holders: Vec<_> = bank.accounts().map(Account::holder).collect();
    assert_eq!(holders, vec!["Carol", "Alice", "Bob"]);
}

// ═══════════════════════════════════════════════════════════════════════
// Deposits and Withdrawals
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_deposit_edge_cases() {
    let cases = [(0, false), (-50, false), (500, true), (1000, true)];
    for (major, valid) in cases {
        let mut bank = bank_with_alice();
        let result = bank.deposit("Alice", amt(major));
        if valid {
            assert!(result.is_ok(), "deposit {} should succeed", major);
            assert_eq!(bank.balance("Alice"), Some(amt(1000 + major)));
            assert_eq!(bank.total_deposits(), amt(1000 + major));
        } else {
            assert!(result.unwrap_err().is_invalid_amount());
            assert_eq!(bank.total_deposits(), amt(1000));
        }
    }
}

#[test]
fn test_deposit_account_not_found() {
    let mut bank = AccountManager::new();
    assert!(bank.deposit("Bob", amt(500)).unwrap_err().is_not_found());
    assert_eq!(bank.total_deposits(), Amount::ZERO);
}

#[test]
fn test_invalid_amount_checked_before_holder() {
    let mut bank = AccountManager::new();
    assert!(bank.deposit("Bob", amt(-1)).unwrap_err().is_invalid_amount());
    assert!(bank.withdraw("Bob", Amount::ZERO).unwrap_err().is_invalid_amount());
}

#[test]
fn test_withdraw_valid() {
    let mut bank = bank_with_alice();
    bank.withdraw("Alice", amt(200)).unwrap();
    assert_eq!(bank.balance("Alice"), Some(amt(800)));
    assert_eq!(bank.total_deposits(), amt(800));
}

#[test]
fn test_withdraw_insufficient_funds() {
    let mut bank = bank_with_alice();
    assert!(matches!(
        bank.withdraw("Alice", amt(1500)),
        Err(LedgerError::InsufficientFunds { .. })
    ));
    assert_eq!(bank.balance("Alice"), Some(amt(1000)));
    assert_eq!(bank.total_deposits(), amt(1000));
}

#[test]
fn test_withdraw_negative_amount() {
    let mut bank = bank_with_alice();
    assert!(bank.withdraw("Alice", amt(-200)).unwrap_err().is_invalid_amount());
    assert_eq!(bank.balance("Alice"), Some(amt(1000)));
    assert_eq!(bank.total_deposits(), amt(1000));
}

#[test]
fn test_withdraw_account_not_found() {
    let mut bank = AccountManager::new();
    assert!(bank.withdraw("Bob", amt(200)).unwrap_err().is_not_found());
    assert_eq!(bank.total_deposits(), Amount::ZERO);
}

// ═══════════════════════════════════════════════════════════════════════
// Loans
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_approve_loan_valid() {
    let mut bank = bank_with_alice();
    bank.approve_loan("Alice", amt(200)).unwrap();
    assert_eq!(bank.loan("Alice"), Some(amt(200)));
    assert_eq!(bank.balance("Alice"), Some(amt(1000)));
    assert_eq!(bank.total_deposits(), amt(800));
}

#[test]
fn test_approve_loan_account_not_found() {
    let mut bank = AccountManager::new();
    assert!(bank.approve_loan("Bob", amt(200)).unwrap_err().is_not_found());
    assert_eq!(bank.total_deposits(), Amount::ZERO);
}

#[test]
fn test_approve_loan_insufficient_total_deposits() {
    let mut bank = bank_with_alice();
    assert_eq!(
        bank.approve_loan("Alice", amt(1200)),
        Err(LedgerError::InsufficientReserves {
            requested: amt(1200),
            available: amt(1000),
        })
    );
    assert_eq!(bank.loan("Alice"), Some(Amount::ZERO));
    assert_eq!(bank.total_deposits(), amt(1000));
}

#[test]
fn test_approve_loan_exactly_total_deposits() {
    let mut bank = bank_with_alice();
    bank.approve_loan("Alice", amt(1000)).unwrap();
    assert_eq!(bank.total_deposits(), Amount::ZERO);
}

#[test]
fn test_approve_loan_draws_on_other_holders_deposits() {
    let mut bank = bank_with_alice();
    bank.add_account("Bob", amt(500)).unwrap();
    bank.approve_loan("Bob", amt(1200)).unwrap();
    assert_eq!(bank.loan("Bob"), Some(amt(1200)));
    assert_eq!(bank.total_deposits(), amt(300));
}

#[test]
fn test_approve_loan_negative_amount() {
    let mut bank = bank_with_alice();
    assert!(bank.approve_loan("Alice", amt(-200)).unwrap_err().is_invalid_amount());
    assert_eq!(bank.loan("Alice"), Some(Amount::ZERO));
    assert_eq!(bank.total_deposits(), amt(1000));
}

#[test]
fn test_repay_loan_valid() {
    let mut bank = bank_with_alice();
    bank.approve_loan("Alice", amt(500)).unwrap();
    bank.repay_loan("Alice", amt(200)).unwrap();
    assert_eq!(bank.loan("Alice"), Some(amt(300)));
    assert_eq!(bank.total_deposits(), amt(700));
}

#[test]
fn test_repay_loan_account_not_found() {
    let mut bank = AccountManager::new();
    assert!(bank.repay_loan("Bob", amt(200)).unwrap_err().is_not_found());
    assert_eq!(bank.total_deposits(), Amount::ZERO);
}

#[test]
fn test_repay_loan_exceeds_loan_amount() {
    let mut bank = bank_with_alice();
    bank.approve_loan("Alice", amt(200)).unwrap();
    assert!(matches!(
        bank.repay_loan("Alice", amt(300)),
        Err(LedgerError::RepaymentExceedsLoan { .. })
    ));
    assert_eq!(bank.loan("Alice"), Some(amt(200)));
    assert_eq!(bank.total_deposits(), amt(800));
}

#[test]
fn test_repay_loan_negative_amount() {
    let mut bank = bank_with_alice();
    assert!(bank.repay_loan("Alice", amt(-100)).unwrap_err().is_invalid_amount());
    assert_eq!(bank.loan("Alice"), Some(Amount::ZERO));
    assert_eq!(bank.total_deposits(), amt(1000));
}

// ═══════════════════════════════════════════════════════════════════════
// Queries
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_total_deposits_no_accounts() {
    assert_eq!(AccountManager::new().total_deposits(), Amount::ZERO);
}

#[test]
fn test_total_deposits_with_accounts() {
    let mut bank = bank_with_alice();
    bank.add_account("Bob", amt(500)).unwrap();
    assert_eq!(bank.total_deposits(), amt(1500));
}

#[test]
fn test_balance_and_loan_account_not_found() {
    let bank = AccountManager::new();
    assert_eq!(bank.balance("Bob"), None);
    assert_eq!(bank.loan("Bob"), None);
    assert!(bank.account("Bob").is_none());
}

#[test]
fn test_get_loan_valid() {
    let mut bank = bank_with_alice();
    bank.approve_loan("Alice", amt(200)).unwrap();
    assert_eq!(bank.loan("Alice"), Some(amt(200)));
}

// ═══════════════════════════════════════════════════════════════════════
// Journal
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_journal_records_successes_only() {
    let mut bank = bank_with_alice();
    bank.deposit("Alice", amt(50)).unwrap();
    let _ = bank.withdraw("Alice", amt(5000));
    let _ = bank.deposit("Nobody", amt(1));
    bank.approve_loan("Alice", amt(100)).unwrap();
    bank.repay_loan("Alice", amt(40)).unwrap();

    let kinds: Vec<_> = bank.journal().entries().iter().map(|t| t.kind).collect();
    assert_eq!(
        kinds,
        vec![
            TransactionKind::Open,
            TransactionKind::Deposit,
            TransactionKind::LoanApproved,
            TransactionKind::LoanRepayment,
        ]
    );

    let last = bank.journal().last().unwrap();
    assert_eq!(
        last,
        &Transaction {
            sequence: 4,
            holder: "Alice".into(),
            kind: TransactionKind::LoanRepayment,
            amount: amt(40),
            balance_after: amt(1050),
            loan_after: amt(60),
            total_deposits_after: amt(990),
        }
    );
}

#[test]
fn test_total_matches_balances_less_loans() {
    let mut bank = AccountManager::new();
    bank.add_account("Alice", amt(1000)).unwrap();
    bank.add_account("Bob", amt(250)).unwrap();
    bank.approve_loan("Bob", amt(900)).unwrap();
    bank.withdraw("Alice", amt(400)).unwrap();
    bank.repay_loan("Bob", amt(100)).unwrap();
    bank.deposit("Bob", "12.34".parse().unwrap()).unwrap();

    assert_eq!(bank.computed_total(), Some(bank.total_deposits()));
    assert_eq!(bank.total_deposits().to_string(), "62.34");
}
