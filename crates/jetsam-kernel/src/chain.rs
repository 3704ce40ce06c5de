//! Read-only access to the contract.
//!
//! [`ChainReader`] is the seam between the kernel and whatever actually
//! talks to the chain. The kernel only ever reads: the declaration, the
//! compiled model, and one marking value per place offset.
//!
//! [`FixtureChain`] answers the same three calls from a JSON document on
//! disk. It re-reads the file on every call, the same way a live reader
//! would hit the RPC endpoint every time.

use crate::declaration::DeclarationPetriNet;
use crate::error::ChainError;
use crate::model::ModelPetriNet;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Read-only views exposed by the contract.
pub trait ChainReader {
    fn declaration(&self) -> Result<DeclarationPetriNet, ChainError>;
    fn model(&self) -> Result<ModelPetriNet, ChainError>;
    fn state(&self, offset: u8) -> Result<i64, ChainError>;
}

impl<T: ChainReader + ?Sized> ChainReader for &T {
    fn declaration(&self) -> Result<DeclarationPetriNet, ChainError> {
        (**self).declaration()
    }

    fn model(&self) -> Result<ModelPetriNet, ChainError> {
        (**self).model()
    }

    fn state(&self, offset: u8) -> Result<i64, ChainError> {
        (**self).state(offset)
    }
}

/// On-disk shape read by [`FixtureChain`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainFixture {
    pub declaration: DeclarationPetriNet,
    pub model: ModelPetriNet,

    /// Marking indexed by place offset.
    #[serde(default)]
    pub state: Vec<i64>,
}

/// A [`ChainReader`] backed by a JSON file.
#[derive(Debug, Clone)]
pub struct FixtureChain {
    path: PathBuf,
}

impl FixtureChain {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<ChainFixture, ChainError> {
        let bytes = fs::read(&self.path)?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

impl ChainReader for FixtureChain {
    fn declaration(&self) -> Result<DeclarationPetriNet, ChainError> {
        self.load().map(|f| f.declaration)
    }

    fn model(&self) -> Result<ModelPetriNet, ChainError> {
        self.load().map(|f| f.model)
    }

    fn state(&self, offset: u8) -> Result<i64, ChainError> {
        let fixture = self.load()?;
        fixture
            .state
            .get(usize::from(offset))
            .copied()
            .ok_or_else(|| ChainError::Call {
                call: "state",
                message: format!(
                    "offset {offset} out of range ({} values)",
                    fixture.state.len()
                ),
            })
    }
}
