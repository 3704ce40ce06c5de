//! Canonical JSON for models and snapshots.
//!
//! The published documents have a fixed key order and a fixed field set:
//!
//! ```text
//! model:     modelType, version, places, transitions, arcs
//! snapshot:  model keys, then state, actions, address, block_stats
//! ```
//!
//! Labelled maps are written in offset order. The output is laid out by
//! [`CanonicalFormatter`]: the top two levels are indented, anything deeper
//! (a single place, transition or arc) stays on one line.

use crate::metamodel::{MetaModel, NodeRef};
use crate::snapshot::{BlockStats, Snapshot};
use serde::ser::Error as _;
use serde::{Serialize, Serializer};
use std::io;

/// Value of the `version` key.
pub const VERSION: &str = "v0";

/// Render the built model.
pub fn model_json(net: &MetaModel) -> Result<Vec<u8>, serde_json::Error> {
    to_canonical_vec(&ModelDocument::from_net(net)?)
}

/// Render a full snapshot.
pub fn snapshot_json(snapshot: &Snapshot) -> Result<Vec<u8>, serde_json::Error> {
    to_canonical_vec(&SnapshotDocument::from_snapshot(snapshot)?)
}

fn to_canonical_vec<T: Serialize>(value: &T) -> Result<Vec<u8>, serde_json::Error> {
    let mut out = Vec::with_capacity(512);
    let mut ser = serde_json::Serializer::with_formatter(&mut out, CanonicalFormatter::new());
    value.serialize(&mut ser)?;
    Ok(out)
}

/// Map written in the order its entries were pushed.
struct Ordered<K, V>(Vec<(K, V)>);

impl<K: Serialize, V: Serialize> Serialize for Ordered<K, V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().map(|(k, v)| (k, v)))
    }
}

#[derive(Serialize)]
struct PlaceView {
    initial: i64,
    capacity: i64,
    x: i64,
    y: i64,
}

#[derive(Serialize)]
struct TransitionView {
    x: i64,
    y: i64,
}

#[derive(Serialize)]
struct ArcView<'a> {
    source: &'a str,
    target: &'a str,
    weight: i64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ModelDocument<'a> {
    model_type: &'a str,
    version: &'static str,
    places: Ordered<&'a str, PlaceView>,
    transitions: Ordered<&'a str, TransitionView>,
    arcs: Vec<ArcView<'a>>,
}

impl<'a> ModelDocument<'a> {
    fn from_net(net: &'a MetaModel) -> Result<Self, serde_json::Error> {
        let places = net
            .places()
            .iter()
            .map(|p| {
                (
                    p.label.as_str(),
                    PlaceView {
                        initial: p.initial,
                        capacity: p.capacity,
                        x: p.position.x,
                        y: p.position.y,
                    },
                )
            })
            .collect();

        let transitions = net
            .transitions()
            .iter()
            .map(|t| {
                (
                    t.label.as_str(),
                    TransitionView {
                        x: t.position.x,
                        y: t.position.y,
                    },
                )
            })
            .collect();

        let arcs = net
            .arcs()
            .iter()
            .map(|arc| {
                Ok(ArcView {
                    source: node_label(net, arc.source)?,
                    target: node_label(net, arc.target)?,
                    weight: arc.weight,
                })
            })
            .collect::<Result<Vec<_>, serde_json::Error>>()?;

        Ok(Self {
            model_type: net.model_type(),
            version: VERSION,
            places: Ordered(places),
            transitions: Ordered(transitions),
            arcs,
        })
    }
}

fn node_label(net: &MetaModel, node: NodeRef) -> Result<&str, serde_json::Error> {
    net.label(node)
        .ok_or_else(|| serde_json::Error::custom(format!("arc endpoint {node:?} is not in the model")))
}

#[derive(Serialize)]
struct SnapshotDocument<'a> {
    #[serde(flatten)]
    model: ModelDocument<'a>,
    state: Ordered<&'a str, i64>,
    actions: Ordered<&'a str, usize>,
    address: &'a str,
    block_stats: BlockStats,
}

impl<'a> SnapshotDocument<'a> {
    fn from_snapshot(snapshot: &'a Snapshot) -> Result<Self, serde_json::Error> {
        let compiled = snapshot.model();

        // Offsets no place claims have no label to key them by.
        let state = snapshot
            .state()
            .iter()
            .enumerate()
            .filter_map(|(offset, &value)| {
                compiled
                    .place_at(offset)
                    .map(|place| (place.label.as_str(), value))
            })
            .collect();

        let actions = snapshot
            .actions()
            .iter()
            .enumerate()
            .filter_map(|(offset, label)| label.as_deref().map(|label| (label, offset)))
            .collect();

        Ok(Self {
            model: ModelDocument::from_net(snapshot.net())?,
            state: Ordered(state),
            actions: Ordered(actions),
            address: snapshot.address(),
            block_stats: snapshot.block_stats(),
        })
    }
}

/// Indent the outer two levels, keep deeper values inline.
#[derive(Debug, Clone, Default)]
pub struct CanonicalFormatter {
    depth: usize,
    has_value: bool,
}

const PRETTY_DEPTH: usize = 2;
const INDENT: &[u8] = b"  ";

impl CanonicalFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    fn pretty(&self) -> bool {
        self.depth <= PRETTY_DEPTH
    }

    fn begin_nested<W: ?Sized + io::Write>(&mut self, writer: &mut W, open: &[u8]) -> io::Result<()> {
        self.depth += 1;
        self.has_value = false;
        writer.write_all(open)
    }

    fn end_nested<W: ?Sized + io::Write>(&mut self, writer: &mut W, close: &[u8]) -> io::Result<()> {
        let was_pretty = self.pretty();
        self.depth -= 1;
        if was_pretty && self.has_value {
            writer.write_all(b"\n")?;
            indent(writer, self.depth)?;
        }
        writer.write_all(close)
    }

    fn begin_item<W: ?Sized + io::Write>(&mut self, writer: &mut W, first: bool) -> io::Result<()> {
        if self.pretty() {
            writer.write_all(if first { b"\n" } else { b",\n" })?;
            indent(writer, self.depth)
        } else if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }
}

fn indent<W: ?Sized + io::Write>(writer: &mut W, depth: usize) -> io::Result<()> {
    for _ in 0..depth {
        writer.write_all(INDENT)?;
    }
    Ok(())
}

impl serde_json::ser::Formatter for CanonicalFormatter {
    fn begin_array<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.begin_nested(writer, b"[")
    }

    fn end_array<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.end_nested(writer, b"]")
    }

    fn begin_array_value<W: ?Sized + io::Write>(
        &mut self,
        writer: &mut W,
        first: bool,
    ) -> io::Result<()> {
        self.begin_item(writer, first)
    }

    fn end_array_value<W: ?Sized + io::Write>(&mut self, _writer: &mut W) -> io::Result<()> {
        self.has_value = true;
        Ok(())
    }

    fn begin_object<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.begin_nested(writer, b"{")
    }

    fn end_object<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.end_nested(writer, b"}")
    }

    fn begin_object_key<W: ?Sized + io::Write>(
        &mut self,
        writer: &mut W,
        first: bool,
    ) -> io::Result<()> {
        self.begin_item(writer, first)
    }

    fn begin_object_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        writer.write_all(b": ")
    }

    fn end_object_value<W: ?Sized + io::Write>(&mut self, _writer: &mut W) -> io::Result<()> {
        self.has_value = true;
        Ok(())
    }
}
