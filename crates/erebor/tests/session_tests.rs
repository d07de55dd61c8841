//! Session command tests

use erebor::*;

fn message(session: &mut Session, line: &str) -> String {
    match session.execute(line) {
        Ok(Outcome::Message(text)) => text,
        other => panic!("expected a message from {:?}, got {:?}", line, other),
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Ledger Commands
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_open_and_query() {
    let mut session = Session::new();
    assert_eq!(
        message(&mut session, "open Alice 1000"),
        "Opened account for Alice with 1000.00"
    );
    assert_eq!(message(&mut session, "balance Alice"), "Alice: balance 1000.00");
    assert_eq!(message(&mut session, "owed Alice"), "Alice: owed 0.00");
    assert_eq!(message(&mut session, "total"), "Total deposits: 1000.00");
}

#[test]
fn test_quoted_holder() {
    let mut session = Session::new();
    message(&mut session, r#"open "Testy McTest" 100"#);
    assert_eq!(
        message(&mut session, r#"deposit "Testy McTest" 50"#),
        "Deposited 50.00 to Testy McTest; balance 150.00"
    );
    assert!(session.manager().contains("Testy McTest"));
}

#[test]
fn test_loan_cycle_messages() {
    let mut session = Session::new();
    message(&mut session, "open Alice 1000");
    assert_eq!(
        message(&mut session, "loan Alice 500"),
        "Approved loan of 500.00 for Alice; owed 500.00"
    );
    assert_eq!(
        message(&mut session, "repay Alice 200"),
        "Alice repaid 200.00; owed 300.00"
    );
    assert_eq!(message(&mut session, "total"), "Total deposits: 700.00");
}

#[test]
fn test_rejections_leave_session_usable() {
    let mut session = Session::new();
    message(&mut session, "open Alice 100");

    assert!(matches!(
        session.execute("withdraw Alice 150"),
        Err(SessionError::Ledger(LedgerError::InsufficientFunds { .. }))
    ));
    assert!(matches!(
        session.execute("deposit Alice -5"),
        Err(SessionError::Ledger(LedgerError::InvalidAmount { .. }))
    ));
    assert!(matches!(
        session.execute("balance Bob"),
        Err(SessionError::Ledger(LedgerError::AccountNotFound { .. }))
    ));
    assert!(matches!(
        session.execute("deposit Alice 1.999"),
        Err(SessionError::Amount(AmountError::TooPrecise(_)))
    ));

    assert_eq!(
        message(&mut session, "withdraw Alice 40"),
        "Withdrew 40.00 from Alice; balance 60.00"
    );
}

#[test]
fn test_accounts_and_history() {
    let mut session = Session::new();
    assert_eq!(message(&mut session, "accounts"), "No accounts");
    assert_eq!(message(&mut session, "history"), "No transactions");

    message(&mut session, "open Alice 1000");
    message(&mut session, "open Bob 500");
    message(&mut session, "deposit Bob 5");

    let accounts = message(&mut session, "accounts");
    let lines: Vec<_> = accounts.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("Alice"));
    assert!(lines[1].starts_with("Bob"));

    assert_eq!(message(&mut session, "history").lines().count(), 3);
    let bob = message(&mut session, "history Bob");
    assert_eq!(bob.lines().count(), 2);
    assert!(bob.contains("deposit"));
    assert_eq!(message(&mut session, "history Carol"), "No transactions");
}

#[test]
fn test_help_lists_commands() {
    let mut session = Session::new();
    let help = message(&mut session, "help");
    for word in ["open", "deposit", "withdraw", "loan", "repay", "export"] {
        assert!(help.contains(word), "help is missing {}", word);
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Scripts
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_script_stops_at_quit() {
    let script = "open Alice 10\nquit\nopen Bob 10\n";
    let mut session = Session::new();
    let summary = session
        .run_script(script.as_bytes(), &mut std::io::sink(), false)
        .unwrap();
    assert_eq!(
        summary,
        ScriptSummary {
            executed: 2,
            failed: 0,
            quit: true
        }
    );
    assert!(!session.manager().contains("Bob"));
}

#[test]
fn test_script_keep_going_counts_failures() {
    let script = "# comment\n\nopen Alice 10\nwithdraw Alice 20\nbogus\ndeposit Alice 5\n";
    let mut session = Session::new();
    let mut out = Vec::new();
    let summary = session.run_script(script.as_bytes(), &mut out, true).unwrap();

    assert_eq!(summary.executed, 4);
    assert_eq!(summary.failed, 2);
    assert_eq!(session.manager().balance("Alice"), Some(Amount::from_major(15)));

    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("error: line 4: insufficient funds"));
    assert!(text.contains("error: line 5: parse error: unknown command 'bogus'"));
}

#[test]
fn test_script_keep_going_past_non_utf8_line() {
    let script: &[u8] = b"open Alice 10\n\xff\ndeposit Alice 5\n";
    let mut session = Session::new();
    let mut out = Vec::new();
    let summary = session.run_script(script, &mut out, true).unwrap();

    assert_eq!(summary.executed, 3);
    assert_eq!(summary.failed, 1);
    assert_eq!(session.manager().balance("Alice"), Some(Amount::from_major(15)));
    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("error: line 2: parse error: line is not valid UTF-8"));
}

#[test]
fn test_script_non_utf8_line_reports_line_number() {
    let script: &[u8] = b"open Alice 10\n\xff\ndeposit Alice 5\n";
    let mut session = Session::new();
    let err = session
        .run_script(script, &mut std::io::sink(), false)
        .unwrap_err();

    assert!(matches!(err, SessionError::Script { line: 2, .. }));
    assert_eq!(session.manager().balance("Alice"), Some(Amount::from_major(10)));
}

#[test]
fn test_script_accepts_crlf_lines() {
    let script: &[u8] = b"open Alice 10\r\ndeposit Alice 5\r\n";
    let mut session = Session::new();
    let summary = session
        .run_script(script, &mut std::io::sink(), false)
        .unwrap();
    assert_eq!(summary.executed, 2);
    assert_eq!(session.manager().balance("Alice"), Some(Amount::from_major(15)));
}

#[test]
fn test_into_manager_hands_back_ledger() {
    let mut session = Session::with_manager(AccountManager::new());
    message(&mut session, "open Alice 10");
    let bank = session.into_manager();
    assert_eq!(bank.total_deposits(), Amount::from_major(10));
}
