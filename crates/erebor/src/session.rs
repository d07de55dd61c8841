//! Line-oriented command sessions over a ledger
//!
//! The interactive shell, script files and the built-in demonstration all
//! drive the ledger through [`Session::execute`].

mod command;

pub use command::{tokenize, Command, HELP};

use std::io::{BufRead, Write};

use tracing::{debug, warn};

use crate::amount::Amount;
use crate::error::{LedgerError, SessionError};
use crate::manager::AccountManager;
use crate::snapshot;

/// What a command produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Text for the user
    Message(String),
    /// Nothing to print (blank line or comment)
    Silent,
    /// The user asked to leave
    Quit,
}

/// Counts from a script run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScriptSummary {
    /// Lines that held a command
    pub executed: usize,
    /// Commands that failed (only non-zero when continuing past errors)
    pub failed: usize,
    /// Whether the script ended with `quit`
    pub quit: bool,
}

/// Scripted walkthrough run by `erebor demo`.
pub const DEMO_SCRIPT: &str = r#"# Open two accounts
open Alice 1000
open Bob 500
total

# Cash in and out
deposit Alice 500
withdraw Bob 200
withdraw Bob 1500

# Lend out of the deposit pool and pay some back
loan Alice 300
repay Alice 100
owed Alice
total

accounts
history Alice
"#;

/// A ledger plus the command language on top of it.
#[derive(Debug, Default)]
pub struct Session {
    manager: AccountManager,
}

impl Session {
    /// Start a session over an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a session over an existing ledger.
    pub fn with_manager(manager: AccountManager) -> Self {
        Self { manager }
    }

    /// The ledger being driven.
    pub fn manager(&self) -> &AccountManager {
        &self.manager
    }

    /// Give the ledger back.
    pub fn into_manager(self) -> AccountManager {
        self.manager
    }

    /// Parse and run one line.
    ///
    /// A rejected command leaves the ledger unchanged and the session
    /// usable.
    pub fn execute(&mut self, line: &str) -> Result<Outcome, SessionError> {
        match Command::parse(line)? {
            Some(command) => self.run(command),
            None => Ok(Outcome::Silent),
        }
    }

    /// Run a parsed command.
    pub fn run(&mut self, command: Command) -> Result<Outcome, SessionError> {
        debug!(?command, "running command");
        let bank = &mut self.manager;
        let message = match command {
            Command::Open { holder, amount } => {
                bank.add_account(holder.as_str(), amount)?;
                format!("Opened account for {} with {}", holder, amount)
            }
            Command::Deposit { holder, amount } => {
                bank.deposit(&holder, amount)?;
                format!(
                    "Deposited {} to {}; balance {}",
                    amount,
                    holder,
                    balance_of(bank, &holder)?
                )
            }
            Command::Withdraw { holder, amount } => {
                bank.withdraw(&holder, amount)?;
                format!(
                    "Withdrew {} from {}; balance {}",
                    amount,
                    holder,
                    balance_of(bank, &holder)?
                )
            }
            Command::Loan { holder, amount } => {
                bank.approve_loan(&holder, amount)?;
                format!(
                    "Approved loan of {} for {}; owed {}",
                    amount,
                    holder,
                    loan_of(bank, &holder)?
                )
            }
            Command::Repay { holder, amount } => {
                bank.repay_loan(&holder, amount)?;
                format!(
                    "{} repaid {}; owed {}",
                    holder,
                    amount,
                    loan_of(bank, &holder)?
                )
            }
            Command::Balance { holder } => {
                format!("{}: balance {}", holder, balance_of(bank, &holder)?)
            }
            Command::Owed { holder } => format!("{}: owed {}", holder, loan_of(bank, &holder)?),
            Command::Total => format!("Total deposits: {}", bank.total_deposits()),
            Command::Accounts => {
                if bank.is_empty() {
                    "No accounts".to_string()
                } else {
                    bank.accounts()
                        .map(|a| {
                            format!(
                                "{:<20} balance {:>12}  owed {:>12}",
                                a.holder(),
                                a.balance(),
                                a.loan()
                            )
                        })
                        .collect::<Vec<_>>()
                        .join("\n")
                }
            }
            Command::History { holder } => {
                let journal = bank.journal();
                let lines: Vec<String> = match holder.as_deref() {
                    Some(h) => journal.for_holder(h).map(ToString::to_string).collect(),
                    None => journal.entries().iter().map(ToString::to_string).collect(),
                };
                if lines.is_empty() {
                    "No transactions".to_string()
                } else {
                    lines.join("\n")
                }
            }
            Command::Save { path } => {
                snapshot::save(bank, &path)?;
                format!("Saved ledger to {}", path.display())
            }
            Command::Load { path } => {
                *bank = snapshot::load(&path)?;
                format!(
                    "Loaded {} account(s) from {}",
                    bank.len(),
                    path.display()
                )
            }
            Command::Export { path } => {
                snapshot::export_journal_csv(bank.journal(), &path)?;
                format!(
                    "Exported {} transaction(s) to {}",
                    bank.journal().len(),
                    path.display()
                )
            }
            Command::Help => HELP.to_string(),
            Command::Quit => return Ok(Outcome::Quit),
        };
        Ok(Outcome::Message(message))
    }

    /// Run every line of a script, writing messages to `out`.
    ///
    /// Without `keep_going` the first failure stops the run and is returned
    /// with its line number. With it, failures are written to `out` as
    /// `error: ...` lines and counted. A line that is not UTF-8 counts as a
    /// failed line; a read error always stops the run.
    pub fn run_script<R: BufRead, W: Write>(
        &mut self,
        reader: R,
        out: &mut W,
        keep_going: bool,
    ) -> Result<ScriptSummary, SessionError> {
        let mut summary = ScriptSummary::default();
        for (index, bytes) in reader.split(b'\n').enumerate() {
            let number = index + 1;
            let bytes = bytes.map_err(|err| SessionError::Script {
                line: number,
                source: Box::new(err.into()),
            })?;
            let result = match std::str::from_utf8(&bytes) {
                Ok(line) => self.execute(line),
                Err(_) => Err(SessionError::Parse("line is not valid UTF-8".into())),
            };
            match result {
                Ok(Outcome::Silent) => {}
                Ok(Outcome::Message(text)) => {
                    summary.executed += 1;
                    writeln!(out, "{}", text)?;
                }
                Ok(Outcome::Quit) => {
                    summary.executed += 1;
                    summary.quit = true;
                    break;
                }
                Err(err) => {
                    summary.executed += 1;
                    let err = SessionError::Script {
                        line: number,
                        source: Box::new(err),
                    };
                    if !keep_going {
                        return Err(err);
                    }
                    warn!(error = %err, "script line failed");
                    summary.failed += 1;
                    writeln!(out, "error: {}", err)?;
                }
            }
        }
        Ok(summary)
    }
}

fn balance_of(bank: &AccountManager, holder: &str) -> Result<Amount, LedgerError> {
    bank.balance(holder).ok_or_else(|| LedgerError::AccountNotFound {
        holder: holder.to_string(),
    })
}

fn loan_of(bank: &AccountManager, holder: &str) -> Result<Amount, LedgerError> {
    bank.loan(holder).ok_or_else(|| LedgerError::AccountNotFound {
        holder: holder.to_string(),
    })
}
