//! The compiled model form of a net.
//!
//! This is what the contract's `model()` view returns: every place and
//! transition carries a dense offset into its own vector, and every
//! transition carries its compiled `delta` and `guard` vectors.

use serde::{Deserialize, Serialize};

/// Grid coordinates as stored on chain.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelPosition {
    pub x: u8,
    pub y: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelPlace {
    pub label: String,

    /// Index into the state vector.
    pub offset: u8,

    pub position: ModelPosition,
    pub initial: i64,
    pub capacity: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelTransition {
    pub label: String,

    /// Index into the action vector.
    pub offset: u8,

    pub position: ModelPosition,
    pub role: u8,

    /// Net effect of firing, one entry per place.
    #[serde(default)]
    pub delta: Vec<i64>,

    /// Firing preconditions, one entry per place.
    #[serde(default)]
    pub guard: Vec<i64>,
}

/// Which vector a [`ModelNode`] offset points into.
///
/// Serialised as the contract's enum tag (`0` place, `1` transition).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum NodeKind {
    Place,
    Transition,
}

impl TryFrom<u8> for NodeKind {
    type Error = String;

    fn try_from(tag: u8) -> Result<Self, Self::Error> {
        match tag {
            0 => Ok(Self::Place),
            1 => Ok(Self::Transition),
            other => Err(format!("unknown node kind tag {other}")),
        }
    }
}

impl From<NodeKind> for u8 {
    fn from(kind: NodeKind) -> Self {
        match kind {
            NodeKind::Place => 0,
            NodeKind::Transition => 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelNode {
    pub label: String,
    pub offset: u8,
    pub kind: NodeKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelArc {
    pub weight: i64,
    pub source: ModelNode,
    pub target: ModelNode,
    #[serde(default)]
    pub inhibitor: bool,
    #[serde(default)]
    pub read: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelPetriNet {
    #[serde(default)]
    pub places: Vec<ModelPlace>,

    #[serde(default)]
    pub transitions: Vec<ModelTransition>,

    #[serde(default)]
    pub arcs: Vec<ModelArc>,
}

impl ModelPetriNet {
    /// The place stored at `offset`, if any.
    ///
    /// Looks the offset up rather than indexing the list, since nothing
    /// guarantees the contract returns places sorted.
    pub fn place_at(&self, offset: usize) -> Option<&ModelPlace> {
        self.places.iter().find(|p| usize::from(p.offset) == offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_kind_uses_contract_tags() {
        let node: ModelNode =
            serde_json::from_str(r#"{"label": "t0", "offset": 2, "kind": 1}"#).expect("parse");
        assert_eq!(node.kind, NodeKind::Transition);
        assert_eq!(
            serde_json::to_value(NodeKind::Place).expect("serialize"),
            serde_json::json!(0)
        );

        let bad = serde_json::from_str::<ModelNode>(r#"{"label": "x", "offset": 0, "kind": 7}"#);
        assert!(bad.is_err());
    }

    #[test]
    fn place_at_follows_offsets_not_list_order() {
        let net = ModelPetriNet {
            places: vec![
                ModelPlace {
                    label: "second".to_string(),
                    offset: 1,
                    position: ModelPosition::default(),
                    initial: 0,
                    capacity: 0,
                },
                ModelPlace {
                    label: "first".to_string(),
                    offset: 0,
                    position: ModelPosition::default(),
                    initial: 0,
                    capacity: 0,
                },
            ],
            ..ModelPetriNet::default()
        };
        assert_eq!(net.place_at(0).map(|p| p.label.as_str()), Some("first"));
        assert!(net.place_at(2).is_none());
    }
}
