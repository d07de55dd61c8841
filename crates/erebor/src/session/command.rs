//! Tokenizing and parsing session commands

use std::path::PathBuf;

use crate::amount::Amount;
use crate::error::SessionError;

/// A parsed session command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `open <holder> <amount>`
    Open {
        /// Account holder
        holder: String,
        /// Initial deposit
        amount: Amount,
    },
    /// `deposit <holder> <amount>`
    Deposit {
        /// Account holder
        holder: String,
        /// Amount deposited
        amount: Amount,
    },
    /// `withdraw <holder> <amount>`
    Withdraw {
        /// Account holder
        holder: String,
        /// Amount withdrawn
        amount: Amount,
    },
    /// `loan <holder> <amount>`
    Loan {
        /// Account holder
        holder: String,
        /// Amount lent
        amount: Amount,
    },
    /// `repay <holder> <amount>`
    Repay {
        /// Account holder
        holder: String,
        /// Amount repaid
        amount: Amount,
    },
    /// `balance <holder>`
    Balance {
        /// Account holder
        holder: String,
    },
    /// `owed <holder>`
    Owed {
        /// Account holder
        holder: String,
    },
    /// `total`
    Total,
    /// `accounts`
    Accounts,
    /// `history [holder]`
    History {
        /// Restrict to one holder
        holder: Option<String>,
    },
    /// `save <path>`
    Save {
        /// Snapshot destination
        path: PathBuf,
    },
    /// `load <path>`
    Load {
        /// Snapshot source
        path: PathBuf,
    },
    /// `export <path>`
    Export {
        /// CSV destination
        path: PathBuf,
    },
    /// `help`
    Help,
    /// `quit` or `exit`
    Quit,
}

/// Usage summary printed by `help`.
pub const HELP: &str = "\
Commands:
  open <holder> <amount>       open an account with an initial deposit
  deposit <holder> <amount>    deposit into an account
  withdraw <holder> <amount>   withdraw from an account
  loan <holder> <amount>       approve a loan out of total deposits
  repay <holder> <amount>      repay part of an outstanding loan
  balance <holder>             show an account balance
  owed <holder>                show an outstanding loan
  total                        show total deposits
  accounts                     list all accounts
  history [holder]             show the transaction journal
  save <path>                  write a JSON snapshot
  load <path>                  replace the ledger with a JSON snapshot
  export <path>                write the journal as CSV
  help                         show this message
  quit                         leave the shell

Holders with spaces go in double quotes: open \"Testy McTest\" 100";

/// Split a line into words, grouping double-quoted runs.
///
/// ```
/// use erebor::session::tokenize;
///
/// let words = tokenize(r#"open "Testy McTest" 100"#).unwrap();
/// assert_eq!(words, vec!["open", "Testy McTest", "100"]);
/// ```
pub fn tokenize(line: &str) -> Result<Vec<String>, SessionError> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut in_quotes = false;

    for c in line.chars() {
        match c {
            '"' => {
                in_quotes = !in_quotes;
                in_word = true;
            }
            c if c.is_whitespace() && !in_quotes => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            c => {
                current.push(c);
                in_word = true;
            }
        }
    }

    if in_quotes {
        return Err(SessionError::Parse("unterminated quote".into()));
    }
    if in_word {
        words.push(current);
    }
    Ok(words)
}

fn expect_args<'a>(
    name: &str,
    usage: &str,
    args: &'a [String],
    count: usize,
) -> Result<&'a [String], SessionError> {
    if args.len() == count {
        Ok(args)
    } else {
        Err(SessionError::Parse(format!("usage: {} {}", name, usage)))
    }
}

fn holder_and_amount(name: &str, args: &[String]) -> Result<(String, Amount), SessionError> {
    let args = expect_args(name, "<holder> <amount>", args, 2)?;
    let amount = args[1].parse()?;
    Ok((args[0].clone(), amount))
}

impl Command {
    /// Parse a line. Blank lines and `#` comments yield `None`.
    pub fn parse(line: &str) -> Result<Option<Command>, SessionError> {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            return Ok(None);
        }

        let words = tokenize(trimmed)?;
        let Some((name, args)) = words.split_first() else {
            return Ok(None);
        };

        let command = match name.to_ascii_lowercase().as_str() {
            "open" => {
                let (holder, amount) = holder_and_amount("open", args)?;
                Command::Open { holder, amount }
            }
            "deposit" => {
                let (holder, amount) = holder_and_amount("deposit", args)?;
                Command::Deposit { holder, amount }
            }
            "withdraw" => {
                let (holder, amount) = holder_and_amount("withdraw", args)?;
                Command::Withdraw { holder, amount }
            }
            "loan" => {
                let (holder, amount) = holder_and_amount("loan", args)?;
                Command::Loan { holder, amount }
            }
            "repay" => {
                let (holder, amount) = holder_and_amount("repay", args)?;
                Command::Repay { holder, amount }
            }
            "balance" => Command::Balance {
                holder: expect_args("balance", "<holder>", args, 1)?[0].clone(),
            },
            "owed" => Command::Owed {
                holder: expect_args("owed", "<holder>", args, 1)?[0].clone(),
            },
            "total" => {
                expect_args("total", "", args, 0)?;
                Command::Total
            }
            "accounts" => {
                expect_args("accounts", "", args, 0)?;
                Command::Accounts
            }
            "history" => match args {
                [] => Command::History { holder: None },
                [holder] => Command::History {
                    holder: Some(holder.clone()),
                },
                _ => return Err(SessionError::Parse("usage: history [holder]".into())),
            },
            "save" => Command::Save {
                path: expect_args("save", "<path>", args, 1)?[0].clone().into(),
            },
            "load" => Command::Load {
                path: expect_args("load", "<path>", args, 1)?[0].clone().into(),
            },
            "export" => Command::Export {
                path: expect_args("export", "<path>", args, 1)?[0].clone().into(),
            },
            "help" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            other => {
                return Err(SessionError::Parse(format!(
                    "unknown command '{}' (try 'help')",
                    other
                )))
            }
        };
        Ok(Some(command))
    }
}
