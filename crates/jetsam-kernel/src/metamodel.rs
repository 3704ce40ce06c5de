//! The indexed net built from a declaration.
//!
//! A [`MetaModel`] is what the rest of the system renders: places and
//! transitions hold pixel positions and dense offsets, and arcs point at
//! nodes through a typed [`NodeRef`] rather than a bare label.
//!
//! ```text
//! DeclarationPetriNet   label-addressed, grid coordinates
//!     │  from_declaration
//! MetaModel             offset-addressed, pixel coordinates, typed arcs
//! ```
//!
//! Places and transitions are kept in offset order, which is also the
//! order they were declared in. Every consumer that iterates them sees
//! that order, so serialisation order never depends on a hash table.

use crate::declaration::{DeclarationArc, DeclarationPetriNet};
use crate::error::{ArcEnd, BuildError};
use crate::model::NodeKind;
use std::collections::BTreeMap;

/// Horizontal pixels per grid column.
pub const SCALE_X: i64 = 80;

/// Vertical pixels per grid row.
pub const SCALE_Y: i64 = 80;

/// Vertical offset applied to every node.
pub const MARGIN: i64 = 22;

/// Model type reported when nothing else is declared.
pub const DEFAULT_MODEL_TYPE: &str = "petriNet";

/// Pixel coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: i64,
    pub y: i64,
}

impl Position {
    /// Map grid coordinates to pixels: `(x*80, y*80 + 22)`.
    pub fn from_grid(x: u8, y: u8) -> Self {
        Self {
            x: i64::from(x) * SCALE_X,
            y: i64::from(y) * SCALE_Y + MARGIN,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Place {
    pub label: String,
    pub offset: usize,
    pub initial: i64,
    pub capacity: i64,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub label: String,
    pub offset: usize,
    pub position: Position,

    /// One slot per place. Always zero: arcs are not folded into deltas.
    pub delta: Vec<i64>,
}

/// A typed reference to one node of the net.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeRef {
    Place(usize),
    Transition(usize),
}

impl NodeRef {
    pub fn kind(self) -> NodeKind {
        match self {
            Self::Place(_) => NodeKind::Place,
            Self::Transition(_) => NodeKind::Transition,
        }
    }

    pub fn offset(self) -> usize {
        match self {
            Self::Place(offset) | Self::Transition(offset) => offset,
        }
    }

    pub fn is_place(self) -> bool {
        matches!(self, Self::Place(_))
    }
}

/// A resolved arc. Direction is carried by which end is the place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Arc {
    pub source: NodeRef,
    pub target: NodeRef,
    pub weight: i64,
    pub inhibitor: bool,
    pub read: bool,
}

/// An immutable, indexed Petri net.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetaModel {
    model_type: String,
    places: Vec<Place>,
    transitions: Vec<Transition>,
    arcs: Vec<Arc>,
    place_index: BTreeMap<String, usize>,
    transition_index: BTreeMap<String, usize>,
}

impl MetaModel {
    /// Build the indexed net from a declaration.
    ///
    /// Places and transitions get offsets in input order, numbered
    /// independently. `capacity` is copied from `initial`; the declared
    /// capacity is not consulted. Transition roles and the arc
    /// `consume`/`produce` flags are not carried over.
    pub fn from_declaration(declaration: &DeclarationPetriNet) -> Result<Self, BuildError> {
        let mut places = Vec::with_capacity(declaration.places.len());
        let mut place_index = BTreeMap::new();
        for p in &declaration.places {
            let offset = places.len();
            if place_index.insert(p.label.clone(), offset).is_some() {
                return Err(BuildError::DuplicateLabel {
                    kind: NodeKind::Place,
                    label: p.label.clone(),
                });
            }
            places.push(Place {
                label: p.label.clone(),
                offset,
                initial: p.initial,
                capacity: p.initial,
                position: Position::from_grid(p.x, p.y),
            });
        }

        let mut transitions = Vec::with_capacity(declaration.transitions.len());
        let mut transition_index = BTreeMap::new();
        for t in &declaration.transitions {
            let offset = transitions.len();
            if transition_index.insert(t.label.clone(), offset).is_some() {
                return Err(BuildError::DuplicateLabel {
                    kind: NodeKind::Transition,
                    label: t.label.clone(),
                });
            }
            transitions.push(Transition {
                label: t.label.clone(),
                offset,
                position: Position::from_grid(t.x, t.y),
                delta: vec![0; places.len()],
            });
        }

        let mut model = Self {
            model_type: DEFAULT_MODEL_TYPE.to_string(),
            places,
            transitions,
            arcs: Vec::with_capacity(declaration.arcs.len()),
            place_index,
            transition_index,
        };

        for (idx, a) in declaration.arcs.iter().enumerate() {
            let arc = model.resolve_arc(idx, a)?;
            model.arcs.push(arc);
        }

        Ok(model)
    }

    fn resolve_arc(&self, idx: usize, arc: &DeclarationArc) -> Result<Arc, BuildError> {
        let source = self.node(&arc.source).ok_or_else(|| BuildError::Resolution {
            arc: idx,
            end: ArcEnd::Source,
            label: arc.source.clone(),
        })?;
        let target = self.node(&arc.target).ok_or_else(|| BuildError::Resolution {
            arc: idx,
            end: ArcEnd::Target,
            label: arc.target.clone(),
        })?;

        if source.kind() == target.kind() {
            return Err(BuildError::SameKindArc {
                arc: idx,
                kind: source.kind(),
                source_label: arc.source.clone(),
                target_label: arc.target.clone(),
            });
        }

        Ok(Arc {
            source,
            target,
            weight: arc.weight,
            inhibitor: arc.inhibit,
            read: arc.read,
        })
    }

    /// Replace the reported model type.
    pub fn with_model_type(mut self, model_type: impl Into<String>) -> Self {
        self.model_type = model_type.into();
        self
    }

    pub fn model_type(&self) -> &str {
        &self.model_type
    }

    /// Places in offset order.
    pub fn places(&self) -> &[Place] {
        &self.places
    }

    /// Transitions in offset order.
    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    /// Arcs in declaration order.
    pub fn arcs(&self) -> &[Arc] {
        &self.arcs
    }

    pub fn place(&self, label: &str) -> Option<&Place> {
        self.place_index.get(label).map(|&offset| &self.places[offset])
    }

    pub fn transition(&self, label: &str) -> Option<&Transition> {
        self.transition_index
            .get(label)
            .map(|&offset| &self.transitions[offset])
    }

    /// Resolve a label to a node. Places shadow transitions.
    pub fn node(&self, label: &str) -> Option<NodeRef> {
        if let Some(&offset) = self.place_index.get(label) {
            return Some(NodeRef::Place(offset));
        }
        self.transition_index
            .get(label)
            .map(|&offset| NodeRef::Transition(offset))
    }

    /// The label a node reference points at.
    ///
    /// `None` only if the reference came from a different model.
    pub fn label(&self, node: NodeRef) -> Option<&str> {
        match node {
            NodeRef::Place(offset) => self.places.get(offset).map(|p| p.label.as_str()),
            NodeRef::Transition(offset) => {
                self.transitions.get(offset).map(|t| t.label.as_str())
            }
        }
    }

    pub fn position(&self, node: NodeRef) -> Option<Position> {
        match node {
            NodeRef::Place(offset) => self.places.get(offset).map(|p| p.position),
            NodeRef::Transition(offset) => self.transitions.get(offset).map(|t| t.position),
        }
    }
}
