use crate::cli::SourceArgs;
use crate::support::{emit_or_exit, service_or_exit, unwrap_or_exit};
use jetsam_observe::ObserveQuery;

pub fn run(source: SourceArgs) {
    let service = service_or_exit(&source);
    let rendered = unwrap_or_exit(service.query(ObserveQuery::Declaration), "declaration");
    emit_or_exit(&rendered.body);
}
