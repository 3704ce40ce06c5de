use crate::cli::SourceArgs;
use crate::support::{emit_or_exit, service_or_exit, unwrap_or_exit};
use jetsam_observe::ObserveQuery;
use std::fs;
use std::path::PathBuf;
use std::process;
use tracing::info;

pub fn run(source: SourceArgs, out: Option<PathBuf>) {
    let service = service_or_exit(&source);
    let rendered = unwrap_or_exit(service.query(ObserveQuery::Svg), "declaration");

    match out {
        Some(path) => {
            if let Err(e) = fs::write(&path, &rendered.body) {
                eprintln!("error: failed to write {}: {e}", path.display());
                process::exit(1);
            }
            info!(path = %path.display(), bytes = rendered.body.len(), "svg written");
        }
        None => emit_or_exit(&rendered.body),
    }
}
