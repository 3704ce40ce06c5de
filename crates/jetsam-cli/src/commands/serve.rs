use crate::cli::ServeArgs;
use jetsam_kernel::FixtureChain;
use jetsam_ledger::LedgerStore;
use jetsam_observe::http::{HttpServerConfig, serve_snapshot_api};
use jetsam_observe::{DatabaseConfig, ServiceConfig, SnapshotService, StatsTicker, TelemetryConfig};
use std::process;
use std::thread;
use std::time::Duration;
use tokio::sync::oneshot;
use tracing::{error, info, warn};

pub fn run(args: ServeArgs) {
    let config = ServiceConfig {
        bind: args.bind,
        endpoint: args.source.endpoint,
        address: args.source.address,
        ledger: args.source.ledger,
        database: DatabaseConfig {
            username: args.db_username,
            password: args.db_password,
            hostname: args.db_hostname,
        },
        telemetry: TelemetryConfig {
            license_key: args.license_key,
            app_name: args.app_name,
        },
        stats_period: Duration::from_secs(args.stats_period_secs),
    };

    if let Err(e) = config.validate() {
        eprintln!("error: {e}");
        process::exit(1);
    }

    info!(
        bind = %config.bind,
        endpoint = %config.endpoint.display(),
        ledger = %config.ledger.display(),
        database = %config.database.redacted(),
        "starting jetsam"
    );
    if config.telemetry.enabled() {
        info!(app = %config.telemetry.app_name, "telemetry license set");
    } else {
        info!("telemetry license not set; metrics are logged only");
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .unwrap_or_else(|e| {
            eprintln!("error: failed to create tokio runtime: {e}");
            process::exit(1);
        });

    let ticker = StatsTicker::spawn(
        runtime.handle(),
        LedgerStore::open(&config.ledger),
        config.telemetry.metric_sink(),
        config.stats_period,
    );

    let service = SnapshotService::new(
        FixtureChain::new(&config.endpoint),
        LedgerStore::open(&config.ledger),
        config.address.clone(),
    );
    let http = HttpServerConfig::new(config.bind);
    let (done_tx, done_rx) = oneshot::channel();
    thread::spawn(move || {
        let _ = done_tx.send(serve_snapshot_api(http, &service));
    });

    let outcome = runtime.block_on(async move {
        let outcome = tokio::select! {
            signal = tokio::signal::ctrl_c() => {
                if let Err(e) = signal {
                    warn!(error = %e, "failed to listen for ctrl-c");
                }
                info!("shutdown requested");
                Ok(())
            }
            served = done_rx => served.unwrap_or_else(|_| {
                error!("http server thread exited without a result");
                Ok(())
            }),
        };
        ticker.stop().await;
        outcome
    });

    if let Err(e) = outcome {
        eprintln!("error: snapshot API failed: {e}");
        process::exit(1);
    }
}
