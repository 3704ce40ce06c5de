//! Block statistics and log listings over the indexer ledger.

use crate::ledger_file::{LedgerFileError, load_ledger};
use crate::records::{LedgerRecord, TransactionLog};
use jetsam_kernel::BlockStats;
use std::path::{Path, PathBuf};

/// Errors raised by a [`BlockStore`].
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error(transparent)]
    Ledger(#[from] LedgerFileError),

    /// No block has been indexed yet, so there is no highest index.
    #[error("no indexed blocks")]
    Empty,
}

/// Aggregate reads over whatever the indexer has written.
pub trait BlockStore {
    /// Highest indexed block, chain head, and the gap between them.
    fn block_stats(&self) -> Result<BlockStats, StoreError>;

    /// Highest indexed block number.
    fn highest_index(&self) -> Result<i64, StoreError>;

    /// All indexed logs, by block ascending then log index descending.
    fn transaction_logs(&self) -> Result<Vec<TransactionLog>, StoreError>;
}

impl<T: BlockStore + ?Sized> BlockStore for &T {
    fn block_stats(&self) -> Result<BlockStats, StoreError> {
        (**self).block_stats()
    }

    fn highest_index(&self) -> Result<i64, StoreError> {
        (**self).highest_index()
    }

    fn transaction_logs(&self) -> Result<Vec<TransactionLog>, StoreError> {
        (**self).transaction_logs()
    }
}

impl<T: BlockStore + ?Sized> BlockStore for std::sync::Arc<T> {
    fn block_stats(&self) -> Result<BlockStats, StoreError> {
        (**self).block_stats()
    }

    fn highest_index(&self) -> Result<i64, StoreError> {
        (**self).highest_index()
    }

    fn transaction_logs(&self) -> Result<Vec<TransactionLog>, StoreError> {
        (**self).transaction_logs()
    }
}

/// A [`BlockStore`] over a JSONL ledger file, re-read on every query.
#[derive(Debug, Clone)]
pub struct LedgerStore {
    path: PathBuf,
}

impl LedgerStore {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn records(&self) -> Result<Vec<LedgerRecord>, StoreError> {
        Ok(load_ledger(&self.path)?)
    }
}

impl BlockStore for LedgerStore {
    fn block_stats(&self) -> Result<BlockStats, StoreError> {
        block_stats(&self.records()?)
    }

    fn highest_index(&self) -> Result<i64, StoreError> {
        highest_index(&self.records()?)
    }

    fn transaction_logs(&self) -> Result<Vec<TransactionLog>, StoreError> {
        Ok(transaction_logs(self.records()?))
    }
}

/// Highest `block` record.
pub fn highest_index(records: &[LedgerRecord]) -> Result<i64, StoreError> {
    records
        .iter()
        .filter_map(|r| match r {
            LedgerRecord::Block { block_number } => Some(*block_number),
            _ => None,
        })
        .max()
        .ok_or(StoreError::Empty)
}

/// Compute [`BlockStats`] from ledger records.
///
/// Without a `head` record the head is taken to be the highest indexed
/// block. `behind` never goes negative.
pub fn block_stats(records: &[LedgerRecord]) -> Result<BlockStats, StoreError> {
    let highest_index = highest_index(records)?;
    let latest = records
        .iter()
        .filter_map(|r| match r {
            LedgerRecord::Head { latest } => Some(*latest),
            _ => None,
        })
        .max()
        .unwrap_or(highest_index);
    Ok(BlockStats {
        highest_index,
        latest,
        behind: (latest - highest_index).max(0),
    })
}

/// Logs sorted by block ascending, then log index descending.
pub fn transaction_logs(records: Vec<LedgerRecord>) -> Vec<TransactionLog> {
    let mut logs: Vec<TransactionLog> = records
        .into_iter()
        .filter_map(|r| match r {
            LedgerRecord::Log(log) => Some(log),
            _ => None,
        })
        .collect();
    logs.sort_by(|a, b| {
        a.block_number
            .cmp(&b.block_number)
            .then(b.log_index.cmp(&a.log_index))
    });
    logs
}
