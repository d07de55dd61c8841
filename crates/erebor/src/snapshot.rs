//! Saving and restoring a ledger
//!
//! Snapshots are pretty-printed JSON. The journal can also be exported as
//! CSV for spreadsheets.

use std::collections::HashSet;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{info, info_span, warn};

use crate::account::Account;
use crate::amount::Amount;
use crate::error::SnapshotError;
use crate::journal::Journal;
use crate::manager::AccountManager;

/// Format version written by this build.
pub const SNAPSHOT_VERSION: u32 = 1;

/// Serializable image of an [`AccountManager`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Format version
    pub version: u32,
    /// Accounts in opening order
    pub accounts: Vec<Account>,
    /// Pool of total deposits
    pub total_deposits: Amount,
    /// Transaction history
    #[serde(default)]
    pub journal: Journal,
}

impl Snapshot {
    /// Capture the current state of a manager.
    pub fn capture(manager: &AccountManager) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            accounts: manager.accounts().cloned().collect(),
            total_deposits: manager.total_deposits(),
            journal: manager.journal().clone(),
        }
    }

    /// Validate and turn back into a live manager.
    ///
    /// # Errors
    ///
    /// - `UnsupportedVersion` for any version but [`SNAPSHOT_VERSION`]
    /// - `Corrupt` for blank or duplicate holders, negative figures, a pool
    ///   that disagrees with the accounts, or a gapped journal
    pub fn restore(self) -> Result<AccountManager, SnapshotError> {
        if self.version != SNAPSHOT_VERSION {
            return Err(SnapshotError::UnsupportedVersion {
                found: self.version,
                expected: SNAPSHOT_VERSION,
            });
        }

        let mut seen = HashSet::new();
        let mut accounts = IndexMap::with_capacity(self.accounts.len());
        for account in self.accounts {
            let holder = account.holder().to_string();
            if holder.trim().is_empty() {
                return Err(SnapshotError::Corrupt("account with blank holder".into()));
            }
            if !seen.insert(holder.clone()) {
                return Err(SnapshotError::Corrupt(format!("duplicate holder '{}'", holder)));
            }
            if account.balance().is_negative() || account.loan().is_negative() {
                return Err(SnapshotError::Corrupt(format!(
                    "negative balance or loan for '{}'",
                    holder
                )));
            }
            accounts.insert(holder, account);
        }

        if !self.journal.is_contiguous() {
            return Err(SnapshotError::Corrupt(
                "journal sequence numbers are not contiguous".into(),
            ));
        }

        let manager = AccountManager::from_parts(accounts, self.total_deposits, self.journal);
        match manager.computed_total() {
            Some(total) if total == manager.total_deposits() => Ok(manager),
            Some(total) => Err(SnapshotError::Corrupt(format!(
                "total deposits {} do not match balances less loans {}",
                manager.total_deposits(),
                total
            ))),
            None => Err(SnapshotError::Corrupt(
                "balances and loans overflow when summed".into(),
            )),
        }
    }
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> SnapshotError + '_ {
    move |source| SnapshotError::Io {
        path: path.to_path_buf(),
        source,
    }
}

fn temp_sibling(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("snapshot"));
    name.push(".tmp");
    path.with_file_name(name)
}

/// Write `manager` to `path` as JSON.
///
/// The file is written next to its destination first and renamed into
/// place, so a crash never leaves a half-written snapshot.
pub fn save(manager: &AccountManager, path: &Path) -> Result<(), SnapshotError> {
    let _span = info_span!(
        "snapshot_save",
        path = %path.display(),
        accounts = manager.len()
    )
    .entered();
    let json = serde_json::to_string_pretty(&Snapshot::capture(manager))?;
    let tmp = temp_sibling(path);
    fs::write(&tmp, json).map_err(io_error(&tmp))?;
    if let Err(err) = fs::rename(&tmp, path) {
        if let Err(cleanup) = fs::remove_file(&tmp) {
            warn!(path = %tmp.display(), error = %cleanup, "failed to remove temp snapshot");
        }
        return Err(io_error(path)(err));
    }
    info!(path = %path.display(), "snapshot saved");
    Ok(())
}

/// Read a manager back from a JSON snapshot at `path`.
pub fn load(path: &Path) -> Result<AccountManager, SnapshotError> {
    let _span = info_span!("snapshot_load", path = %path.display()).entered();
    let text = fs::read_to_string(path).map_err(io_error(path))?;
    let snapshot: Snapshot = serde_json::from_str(&text)?;
    let manager = snapshot.restore().map_err(|err| {
        warn!(path = %path.display(), error = %err, "rejected snapshot");
        err
    })?;
    info!(
        path = %path.display(),
        accounts = manager.len(),
        transactions = manager.journal().len(),
        "snapshot loaded"
    );
    Ok(manager)
}

/// Write every journal entry to `path` as CSV, one row per transaction.
pub fn export_journal_csv(journal: &Journal, path: &Path) -> Result<(), SnapshotError> {
    let _span = info_span!(
        "journal_export",
        path = %path.display(),
        rows = journal.len()
    )
    .entered();
    let file = fs::File::create(path).map_err(io_error(path))?;
    let mut writer = csv::Writer::from_writer(file);
    for entry in journal.entries() {
        writer.serialize(entry)?;
    }
    writer.flush().map_err(io_error(path))?;
    info!(path = %path.display(), "journal exported");
    Ok(())
}
