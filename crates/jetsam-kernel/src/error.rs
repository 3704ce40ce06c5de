//! Error types for kernel operations.

use crate::model::NodeKind;

/// Errors raised while building a [`crate::MetaModel`] from a declaration.
///
/// Every variant is fatal to the build; no partial model is returned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BuildError {
    /// An arc names a label that is neither a place nor a transition.
    #[error("arc {arc}: unresolved {end} label `{label}`")]
    Resolution {
        arc: usize,
        end: ArcEnd,
        label: String,
    },

    /// Two places, or two transitions, share a label.
    #[error("duplicate {kind:?} label `{label}`")]
    DuplicateLabel { kind: NodeKind, label: String },

    /// An arc joins two nodes of the same kind.
    #[error("arc {arc}: `{source_label}` -> `{target_label}` joins two {kind:?} nodes")]
    SameKindArc {
        arc: usize,
        kind: NodeKind,
        source_label: String,
        target_label: String,
    },
}

/// Which end of an arc failed to resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArcEnd {
    Source,
    Target,
}

impl std::fmt::Display for ArcEnd {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Source => write!(f, "source"),
            Self::Target => write!(f, "target"),
        }
    }
}

/// Errors raised by a [`crate::ChainReader`].
#[derive(Debug, thiserror::Error)]
pub enum ChainError {
    #[error("failed to read chain source: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to decode chain response: {0}")]
    Json(#[from] serde_json::Error),

    /// The contract call itself failed.
    #[error("contract call `{call}` failed: {message}")]
    Call { call: &'static str, message: String },
}

/// Errors raised while merging per-place state into a vector.
#[derive(Debug, thiserror::Error)]
pub enum StateError<E> {
    /// The state query for one place failed; the merge was abandoned.
    #[error("state query for offset {offset} failed: {reason}")]
    Query { offset: u8, reason: E },

    /// A place claims an offset outside the place vector.
    #[error("place `{label}` has offset {offset} but the model has {len} places")]
    OffsetOutOfRange { label: String, offset: u8, len: usize },

    /// Two places claim the same offset.
    #[error("place `{label}` reuses offset {offset}, already claimed by `{first}`")]
    DuplicateOffset {
        label: String,
        first: String,
        offset: u8,
    },
}
