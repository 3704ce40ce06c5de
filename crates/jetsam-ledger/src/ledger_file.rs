//! The ledger file the indexer appends to.
//!
//! One tagged [`LedgerRecord`] per line. Blank lines and lines starting
//! with `#` carry no record. The file must be UTF-8 and free of NUL bytes;
//! a torn append usually shows up as one or the other.

use crate::records::LedgerRecord;
use std::fmt;
use std::path::{Path, PathBuf};

/// Load every record in the ledger at `path`.
pub fn load_ledger(path: &Path) -> Result<Vec<LedgerRecord>, LedgerFileError> {
    let bytes = std::fs::read(path).map_err(|reason| LedgerFileError::Unreadable {
        path: path.to_path_buf(),
        reason,
    })?;
    let text = ledger_text(&bytes).map_err(|defect| LedgerFileError::Corrupt {
        path: path.to_path_buf(),
        defect,
    })?;
    parse_ledger(text)
}

/// Parse ledger text that has already been read.
pub fn parse_ledger(text: &str) -> Result<Vec<LedgerRecord>, LedgerFileError> {
    text.lines()
        .enumerate()
        .map(|(idx, raw)| (idx + 1, raw.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
        .map(|(line, body)| {
            serde_json::from_str(body).map_err(|reason| LedgerFileError::Malformed { line, reason })
        })
        .collect()
}

fn ledger_text(bytes: &[u8]) -> Result<&str, Defect> {
    if let Some(at) = bytes.iter().position(|b| *b == 0) {
        return Err(Defect::NulByte { at });
    }
    std::str::from_utf8(bytes).map_err(|e| Defect::InvalidUtf8 {
        at: e.valid_up_to(),
    })
}

/// What makes a ledger file unusable before any line is parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Defect {
    NulByte { at: usize },
    InvalidUtf8 { at: usize },
}

impl fmt::Display for Defect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Defect::NulByte { at } => write!(f, "NUL byte at byte {at}"),
            Defect::InvalidUtf8 { at } => write!(f, "invalid UTF-8 at byte {at}"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LedgerFileError {
    #[error("cannot read ledger {}: {reason}", path.display())]
    Unreadable {
        path: PathBuf,
        reason: std::io::Error,
    },

    #[error("corrupted ledger {}: {defect}", path.display())]
    Corrupt { path: PathBuf, defect: Defect },

    #[error("ledger line {line}: {reason}")]
    Malformed {
        line: usize,
        reason: serde_json::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_path(prefix: &str) -> PathBuf {
        let unique = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock should be after unix epoch")
            .as_nanos();
        std::env::temp_dir().join(format!(
            "jetsam-ledger-file-{prefix}-{}-{unique}.jsonl",
            std::process::id()
        ))
    }

    #[test]
    fn annotations_and_blank_lines_carry_no_record() {
        let text = "# indexer ledger\n\n  {\"kind\":\"head\",\"latest\":9}  \n{\"kind\":\"block\",\"block_number\":8}\n";
        assert_eq!(
            parse_ledger(text).expect("records should parse"),
            vec![
                LedgerRecord::Head { latest: 9 },
                LedgerRecord::Block { block_number: 8 },
            ]
        );
    }

    #[test]
    fn malformed_line_is_reported_by_its_file_line() {
        let text = "# header\n{\"kind\":\"head\",\"latest\":9}\n\n{\"kind\":\"nope\"}\n";
        match parse_ledger(text) {
            Err(LedgerFileError::Malformed { line, .. }) => assert_eq!(line, 4),
            other => panic!("expected malformed line, got {other:?}"),
        }
    }

    #[test]
    fn torn_append_with_nul_bytes_is_corrupt() {
        let path = temp_path("nul");
        fs::write(&path, b"{\"kind\":\"head\",\"latest\":1}\n\0\0\0").expect("fixture should write");

        match load_ledger(&path) {
            Err(LedgerFileError::Corrupt { defect, .. }) => {
                assert_eq!(defect, Defect::NulByte { at: 27 })
            }
            other => panic!("expected corrupt ledger, got {other:?}"),
        }

        let _ = fs::remove_file(path);
    }

    #[test]
    fn invalid_utf8_is_corrupt_not_lossy() {
        let path = temp_path("utf8");
        fs::write(&path, b"{\"kind\":\"head\",\"latest\":1}\n\xff\n").expect("fixture should write");

        match load_ledger(&path) {
            Err(LedgerFileError::Corrupt { defect, .. }) => {
                assert_eq!(defect, Defect::InvalidUtf8 { at: 27 })
            }
            other => panic!("expected corrupt ledger, got {other:?}"),
        }

        let _ = fs::remove_file(path);
    }

    #[test]
    fn shipped_fixture_loads() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../fixtures/ledger.jsonl");
        let records = load_ledger(&path).expect("fixture ledger should load");
        assert!(records.contains(&LedgerRecord::Head { latest: 104 }));
    }
}
