//! # jetsam-ledger
//!
//! Read side of the indexer ledger.
//!
//! The indexer follows the contract's events and records what it has seen:
//! the chain head, each block it has indexed, and each decoded log. This
//! crate reads that record back as block statistics and log listings.
//!
//! ## Data model
//!
//! ```text
//! JSONL (on disk, one tagged record per line)
//!     ↓  re-read per query
//! BlockStore (highest_index, block_stats, transaction_logs)
//! ```

pub mod ledger_file;
pub mod records;
pub mod store;

pub use jetsam_kernel::BlockStats;
pub use ledger_file::{Defect, LedgerFileError, load_ledger, parse_ledger};
pub use records::{LedgerRecord, TransactionLog};
pub use store::{BlockStore, LedgerStore, StoreError};
