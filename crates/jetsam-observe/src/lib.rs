//! Composition layer.
//!
//! This crate assembles snapshots from a [`ChainReader`] and a
//! [`BlockStore`]. Chain access and the indexer store stay adapters; this
//! crate owns the read pipeline that every surface (HTTP, CLI) shares.

pub mod config;
pub mod http;
pub mod metrics;
pub mod page;
pub mod ticker;

pub use config::{
    DEFAULT_APP_NAME, DEFAULT_CONTRACT_ADDRESS, DatabaseConfig, ServiceConfig, StartupError,
    TelemetryConfig, validate_address, validate_endpoint,
};
pub use metrics::{MetricSink, TracingMetricSink};
pub use ticker::{DEFAULT_PERIOD, StatsTicker, publish};

use jetsam_kernel::{
    BuildError, ChainError, ChainReader, MetaModel, Snapshot, SnapshotError, StateError,
    action_labels, merge_state, model_json, render_svg, snapshot_json,
};
use jetsam_ledger::{BlockStore, StoreError, TransactionLog};
use thiserror::Error;

/// Raised when any step of the read pipeline fails. Nothing partial is
/// ever returned alongside it.
#[derive(Debug, Error)]
pub enum AssembleError {
    #[error("chain read failed: {0}")]
    Chain(#[from] ChainError),

    #[error("model build failed: {0}")]
    Build(#[from] BuildError),

    #[error("state merge failed: {0}")]
    State(#[from] StateError<ChainError>),

    #[error("block store read failed: {0}")]
    Store(#[from] StoreError),

    #[error("snapshot rejected: {0}")]
    Snapshot(#[from] SnapshotError),

    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Read-only queries a surface can ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObserveQuery {
    Snapshot,
    State,
    Declaration,
    Svg,
    Logs,
    HighestIndex,
}

/// A rendered query result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub content_type: &'static str,
    pub body: Vec<u8>,
}

pub const JSON: &str = "application/json";
pub const SVG: &str = "image/svg+xml";
pub const HTML: &str = "text/html; charset=utf-8";

impl Rendered {
    fn json(body: Vec<u8>) -> Self {
        Self {
            content_type: JSON,
            body,
        }
    }
}

/// The snapshot pipeline over one chain and one block store.
///
/// Every call reads fresh from both collaborators; nothing is cached
/// between calls, so concurrent callers never share intermediate state.
#[derive(Debug, Clone)]
pub struct SnapshotService<C, S> {
    chain: C,
    store: S,
    address: String,
}

impl<C: ChainReader, S: BlockStore> SnapshotService<C, S> {
    pub fn new(chain: C, store: S, address: impl Into<String>) -> Self {
        Self {
            chain,
            store,
            address: address.into(),
        }
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Declaration, model, state, actions, then block stats, in that order.
    /// The first failure aborts.
    pub fn assemble(&self) -> Result<Snapshot, AssembleError> {
        let declaration = self.chain.declaration()?;
        let model = self.chain.model()?;
        let net = MetaModel::from_declaration(&declaration)?;
        let state = merge_state(&model, |offset| self.chain.state(offset))?;
        let actions = action_labels(&model);
        let block_stats = self.store.block_stats()?;
        Ok(Snapshot::new(
            self.address.clone(),
            declaration,
            net,
            model,
            state,
            actions,
            block_stats,
        )?)
    }

    /// The net built from the declaration alone.
    pub fn net(&self) -> Result<MetaModel, AssembleError> {
        Ok(MetaModel::from_declaration(&self.chain.declaration()?)?)
    }

    /// Marking indexed by place offset.
    pub fn state(&self) -> Result<Vec<i64>, AssembleError> {
        let model = self.chain.model()?;
        Ok(merge_state(&model, |offset| self.chain.state(offset))?)
    }

    pub fn transaction_logs(&self) -> Result<Vec<TransactionLog>, AssembleError> {
        Ok(self.store.transaction_logs()?)
    }

    pub fn highest_index(&self) -> Result<i64, AssembleError> {
        Ok(self.store.highest_index()?)
    }

    pub fn snapshot_json(&self) -> Result<Vec<u8>, AssembleError> {
        Ok(snapshot_json(&self.assemble()?)?)
    }

    pub fn query(&self, query: ObserveQuery) -> Result<Rendered, AssembleError> {
        match query {
            ObserveQuery::Snapshot => self.snapshot_json().map(Rendered::json),
            ObserveQuery::State => Ok(Rendered::json(serde_json::to_vec(&self.state()?)?)),
            ObserveQuery::Declaration => Ok(Rendered::json(model_json(&self.net()?)?)),
            ObserveQuery::Svg => Ok(Rendered {
                content_type: SVG,
                body: render_svg(&self.net()?).into_bytes(),
            }),
            ObserveQuery::Logs => Ok(Rendered::json(serde_json::to_vec_pretty(
                &self.transaction_logs()?,
            )?)),
            ObserveQuery::HighestIndex => Ok(Rendered::json(serde_json::to_vec(
                &serde_json::json!({ "highest_index": self.highest_index()? }),
            )?)),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::testing::*;
    use super::*;
    use jetsam_kernel::BlockStats;
    use serde_json::Value;

    fn service(chain: MockChain, stats: Option<BlockStats>) -> SnapshotService<MockChain, MockStore> {
        SnapshotService::new(chain, MockStore { stats }, ADDRESS)
    }

    #[test]
    fn assemble_bundles_every_piece() {
        let svc = service(MockChain::new(vec![2]), Some(stats()));
        let snapshot = svc.assemble().expect("snapshot");
        assert_eq!(snapshot.address(), ADDRESS);
        assert_eq!(snapshot.state(), &[2]);
        assert_eq!(snapshot.actions(), &[Some("T1".to_string())]);
        assert_eq!(snapshot.block_stats(), stats());
    }

    #[test]
    fn snapshot_json_matches_single_arc_scenario() {
        let svc = service(MockChain::new(vec![3]), Some(stats()));
        let value: Value =
            serde_json::from_slice(&svc.snapshot_json().expect("json")).expect("parse");
        assert_eq!(value["places"]["P1"]["y"], 22);
        assert_eq!(value["transitions"]["T1"]["x"], 80);
        assert_eq!(value["state"]["P1"], 3);
        assert_eq!(value["actions"]["T1"], 0);
        assert_eq!(value["block_stats"]["behind"], 4);
        assert_eq!(value["address"], ADDRESS);
    }

    #[test]
    fn repeated_assembly_is_byte_identical() {
        let svc = service(MockChain::new(vec![3]), Some(stats()));
        assert_eq!(
            svc.snapshot_json().expect("first"),
            svc.snapshot_json().expect("second")
        );
    }

    #[test]
    fn state_failure_aborts_the_snapshot() {
        let mut chain = MockChain::new(vec![3]);
        chain.fail_state_at = Some(0);
        let svc = service(chain, Some(stats()));
        assert!(matches!(
            svc.assemble(),
            Err(AssembleError::State(StateError::Query { offset: 0, .. }))
        ));
    }

    #[test]
    fn empty_store_aborts_the_snapshot() {
        let svc = service(MockChain::new(vec![3]), None);
        assert!(matches!(
            svc.assemble(),
            Err(AssembleError::Store(StoreError::Empty))
        ));
    }

    #[test]
    fn queries_pick_content_types() {
        let svc = service(MockChain::new(vec![7]), Some(stats()));

        let state = svc.query(ObserveQuery::State).expect("state");
        assert_eq!(state.content_type, JSON);
        assert_eq!(state.body, b"[7]");

        let svg = svc.query(ObserveQuery::Svg).expect("svg");
        assert_eq!(svg.content_type, SVG);
        assert!(svg.body.starts_with(b"<svg"));

        let highest = svc.query(ObserveQuery::HighestIndex).expect("highest");
        assert_eq!(highest.body, br#"{"highest_index":100}"#);

        let logs = svc.query(ObserveQuery::Logs).expect("logs");
        assert_eq!(logs.body, b"[]");
    }

    #[test]
    fn declaration_query_does_not_touch_state() {
        let svc = service(MockChain::new(vec![7]), None);
        let rendered = svc.query(ObserveQuery::Declaration).expect("declaration");
        let value: Value = serde_json::from_slice(&rendered.body).expect("parse");
        assert_eq!(value["modelType"], "petriNet");
        assert_eq!(
            svc.chain
                .state_reads
                .load(std::sync::atomic::Ordering::SeqCst),
            0
        );
    }
}
