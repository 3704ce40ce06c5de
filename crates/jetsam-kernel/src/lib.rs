//! # Jetsam Kernel
//!
//! Model assembly for a Petri net that lives inside a contract.
//!
//! The contract exposes the same net twice: a **declaration** addressed by
//! label and laid out on a grid, and a compiled **model** addressed by
//! dense offsets. This crate turns the declaration into an indexed
//! [`MetaModel`], reads the live marking against the model, and writes the
//! result out as canonical JSON or SVG.
//!
//! ## Architecture
//!
//! ```text
//! ChainReader           ← declaration(), model(), state(offset)
//!     │
//! MetaModel             ← from_declaration: offsets, pixels, typed arcs
//!     │
//! merge_state           ← marking vector aligned to place offsets
//!     │
//! Snapshot              ← declaration + model + state + actions + stats
//!     │
//! canonical / svg       ← deterministic JSON, static SVG
//! ```
//!
//! Nothing here caches or mutates chain state; every snapshot is built
//! from fresh reads and dropped once written out.

pub mod canonical;
pub mod chain;
pub mod declaration;
pub mod error;
pub mod metamodel;
pub mod model;
pub mod snapshot;
pub mod state;
pub mod svg;

pub use canonical::{VERSION, model_json, snapshot_json};
pub use chain::{ChainFixture, ChainReader, FixtureChain};
pub use declaration::{
    DeclarationArc, DeclarationPetriNet, DeclarationPlace, DeclarationTransition,
};
pub use error::{ArcEnd, BuildError, ChainError, StateError};
pub use metamodel::{MetaModel, NodeRef, Place, Position, Transition};
pub use model::{
    ModelArc, ModelNode, ModelPetriNet, ModelPlace, ModelPosition, ModelTransition, NodeKind,
};
pub use snapshot::{BlockStats, Snapshot, SnapshotError};
pub use state::{action_labels, merge_state};
pub use svg::render_svg;
