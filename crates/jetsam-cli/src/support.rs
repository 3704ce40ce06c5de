use crate::cli::SourceArgs;
use jetsam_kernel::FixtureChain;
use jetsam_ledger::LedgerStore;
use jetsam_observe::{AssembleError, SnapshotService, validate_address, validate_endpoint};
use std::io::Write;
use std::process;

pub type FixtureService = SnapshotService<FixtureChain, LedgerStore>;

pub fn service_or_exit(source: &SourceArgs) -> FixtureService {
    if let Err(e) =
        validate_address(&source.address).and_then(|()| validate_endpoint(&source.endpoint))
    {
        eprintln!("error: {e}");
        process::exit(1);
    }
    SnapshotService::new(
        FixtureChain::new(&source.endpoint),
        LedgerStore::open(&source.ledger),
        source.address.clone(),
    )
}

pub fn unwrap_or_exit<T>(result: Result<T, AssembleError>, what: &str) -> T {
    result.unwrap_or_else(|e| {
        eprintln!("error: failed to read {what}: {e}");
        process::exit(1);
    })
}

/// Write `bytes` plus a trailing newline to stdout.
pub fn emit_or_exit(bytes: &[u8]) {
    let mut stdout = std::io::stdout().lock();
    if let Err(e) = stdout
        .write_all(bytes)
        .and_then(|()| stdout.write_all(b"\n"))
        .and_then(|()| stdout.flush())
    {
        eprintln!("error: failed to write output: {e}");
        process::exit(1);
    }
}
