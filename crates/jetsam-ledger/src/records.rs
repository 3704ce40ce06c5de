//! Rows the indexer appends to the ledger.

use serde::{Deserialize, Serialize};

/// One decoded contract event, as listed by the logs endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionLog {
    pub transaction_hash: String,
    pub block_number: i64,
    pub log_index: i64,
    pub from_address: String,
    pub data: String,
    #[serde(default)]
    pub removed: bool,
    pub topic_hash: String,
    pub role: String,
    pub action: String,
    pub scalar: String,
}

/// A single ledger line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LedgerRecord {
    /// The chain head as last seen by the indexer.
    Head { latest: i64 },

    /// A block whose logs have been indexed.
    Block { block_number: i64 },

    /// An indexed event.
    Log(TransactionLog),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_are_tagged_by_kind() {
        let head: LedgerRecord =
            serde_json::from_str(r#"{"kind": "head", "latest": 42}"#).expect("head");
        assert_eq!(head, LedgerRecord::Head { latest: 42 });

        let log: LedgerRecord = serde_json::from_str(
            r#"{"kind": "log", "transaction_hash": "0x01", "block_number": 7, "log_index": 0,
                "from_address": "0xaa", "data": "0x", "topic_hash": "0xbb",
                "role": "0", "action": "1", "scalar": "1"}"#,
        )
        .expect("log");
        match log {
            LedgerRecord::Log(row) => {
                assert_eq!(row.block_number, 7);
                assert!(!row.removed);
            }
            other => panic!("expected log, got {other:?}"),
        }
    }
}
