use crate::cli::SourceArgs;
use crate::support::{emit_or_exit, service_or_exit, unwrap_or_exit};

pub fn run(source: SourceArgs) {
    let service = service_or_exit(&source);
    let bytes = unwrap_or_exit(service.snapshot_json(), "snapshot");
    emit_or_exit(&bytes);
}
