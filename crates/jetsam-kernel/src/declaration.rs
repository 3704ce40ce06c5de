//! The declaration form of a net.
//!
//! This is what the contract's `declaration()` view returns: the
//! human-authored net, addressed by label and laid out on a coarse grid.
//! Nothing here is indexed; the builder in [`crate::metamodel`] assigns
//! offsets.

use serde::{Deserialize, Serialize};

/// A place as declared on chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeclarationPlace {
    /// Unique among places.
    pub label: String,

    /// Grid column.
    pub x: u8,

    /// Grid row.
    pub y: u8,

    /// Initial token count.
    pub initial: i64,

    /// Declared upper bound. Ignored by the builder (see
    /// [`crate::metamodel::MetaModel::from_declaration`]).
    pub capacity: i64,
}

/// A transition as declared on chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeclarationTransition {
    /// Unique among transitions.
    pub label: String,

    /// Grid column.
    pub x: u8,

    /// Grid row.
    pub y: u8,

    /// Role tag of the actor allowed to fire this transition.
    pub role: u8,
}

/// An arc between a place and a transition, in either direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeclarationArc {
    /// Label of a place or transition.
    pub source: String,

    /// Label of a place or transition.
    pub target: String,

    pub weight: i64,

    #[serde(default)]
    pub consume: bool,

    #[serde(default)]
    pub produce: bool,

    #[serde(default)]
    pub inhibit: bool,

    #[serde(default)]
    pub read: bool,
}

/// The full declaration tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeclarationPetriNet {
    #[serde(default)]
    pub places: Vec<DeclarationPlace>,

    #[serde(default)]
    pub transitions: Vec<DeclarationTransition>,

    #[serde(default)]
    pub arcs: Vec<DeclarationArc>,
}

impl DeclarationPetriNet {
    /// Empty declaration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a place.
    pub fn place(mut self, label: impl Into<String>, x: u8, y: u8, initial: i64) -> Self {
        self.places.push(DeclarationPlace {
            label: label.into(),
            x,
            y,
            initial,
            capacity: initial,
        });
        self
    }

    /// Append a transition.
    pub fn transition(mut self, label: impl Into<String>, x: u8, y: u8, role: u8) -> Self {
        self.transitions.push(DeclarationTransition {
            label: label.into(),
            x,
            y,
            role,
        });
        self
    }

    /// Append a plain arc. `consume`/`produce` are left unset; use the
    /// struct directly for inhibitor or read arcs.
    pub fn arc(mut self, source: impl Into<String>, target: impl Into<String>, weight: i64) -> Self {
        self.arcs.push(DeclarationArc {
            source: source.into(),
            target: target.into(),
            weight,
            consume: false,
            produce: false,
            inhibit: false,
            read: false,
        });
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declaration_parses_with_missing_flags() {
        let net: DeclarationPetriNet = serde_json::from_str(
            r#"{
                "places": [{"label": "p0", "x": 1, "y": 2, "initial": 3, "capacity": 5}],
                "transitions": [{"label": "t0", "x": 0, "y": 0, "role": 1}],
                "arcs": [{"source": "p0", "target": "t0", "weight": 1, "consume": true}]
            }"#,
        )
        .expect("declaration should parse");

        assert_eq!(net.places[0].capacity, 5);
        assert_eq!(net.transitions[0].role, 1);
        assert!(net.arcs[0].consume);
        assert!(!net.arcs[0].inhibit);
    }

    #[test]
    fn builder_helpers_keep_input_order() {
        let net = DeclarationPetriNet::new()
            .place("b", 0, 0, 0)
            .place("a", 1, 0, 0)
            .transition("t", 2, 0, 0)
            .arc("a", "t", 1);
        let labels: Vec<_> = net.places.iter().map(|p| p.label.as_str()).collect();
        assert_eq!(labels, vec!["b", "a"]);
        assert_eq!(net.arcs.len(), 1);
    }
}
