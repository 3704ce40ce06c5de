//! One immutable view of the contract at a point in time.

use crate::declaration::DeclarationPetriNet;
use crate::metamodel::MetaModel;
use crate::model::ModelPetriNet;
use serde::{Deserialize, Serialize};

/// How far the indexer trails the chain head.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockStats {
    pub highest_index: i64,
    pub latest: i64,
    pub behind: i64,
}

/// Raised when the pieces handed to [`Snapshot::new`] do not line up.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SnapshotError {
    #[error("state vector has {actual} entries but the model has {expected} places")]
    StateLength { expected: usize, actual: usize },

    #[error("action vector has {actual} entries but the model has {expected} transitions")]
    ActionLength { expected: usize, actual: usize },
}

/// Declaration, compiled model, marking, actions and block statistics,
/// bundled once and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    address: String,
    declaration: DeclarationPetriNet,
    net: MetaModel,
    model: ModelPetriNet,
    state: Vec<i64>,
    actions: Vec<Option<String>>,
    block_stats: BlockStats,
}

impl Snapshot {
    /// Bundle the pieces, checking that the state and action vectors are
    /// aligned with the compiled model.
    pub fn new(
        address: impl Into<String>,
        declaration: DeclarationPetriNet,
        net: MetaModel,
        model: ModelPetriNet,
        state: Vec<i64>,
        actions: Vec<Option<String>>,
        block_stats: BlockStats,
    ) -> Result<Self, SnapshotError> {
        if state.len() != model.places.len() {
            return Err(SnapshotError::StateLength {
                expected: model.places.len(),
                actual: state.len(),
            });
        }
        if actions.len() != model.transitions.len() {
            return Err(SnapshotError::ActionLength {
                expected: model.transitions.len(),
                actual: actions.len(),
            });
        }
        Ok(Self {
            address: address.into(),
            declaration,
            net,
            model,
            state,
            actions,
            block_stats,
        })
    }

    /// Contract address the snapshot was read from.
    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn declaration(&self) -> &DeclarationPetriNet {
        &self.declaration
    }

    /// The net built from the declaration; this is what gets rendered.
    pub fn net(&self) -> &MetaModel {
        &self.net
    }

    /// The compiled model the state was read against.
    pub fn model(&self) -> &ModelPetriNet {
        &self.model
    }

    /// Marking, indexed by place offset.
    pub fn state(&self) -> &[i64] {
        &self.state
    }

    /// Transition labels, indexed by transition offset.
    pub fn actions(&self) -> &[Option<String>] {
        &self.actions
    }

    pub fn block_stats(&self) -> BlockStats {
        self.block_stats
    }
}
