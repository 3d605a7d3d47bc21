//! Derivation graph module.
//!
//! Records which base fields of a species' tables can be combined with
//! which of its curves. Nodes are base fields and curves; an edge from a
//! base field to a curve means the pair is a virtual-plot candidate, and
//! carries the match rank. One base field may feed several curves and one
//! curve may be fed by several base fields; every edge is an independent
//! candidate.

use crate::curve::StatCurve;
use crate::synth::{base_fields, match_rank, MatchRank, SemanticKey};
use crate::table::StatTable;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use serde::Serialize;
use std::collections::HashMap;

/// A node of the derivation graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DerivationNode {
    BaseField { table: String, field: String },
    Curve { name: String },
}

/// A (table, base field, curve) combination that can be synthesized.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VirtualCandidate {
    pub table: String,
    pub field: String,
    pub curve: String,
    pub rank: MatchRank,
}

/// Directed graph from base fields to the curves they can scale.
///
/// # Examples
///
/// ```rust
/// use curvestat::curve::{Curve, NamedCurve, StatCurve};
/// use curvestat::derivation::DerivationGraph;
/// use curvestat::table::{RowValue, StatTable, TableRow};
///
/// let table = StatTable {
///     name: "BalanceAttributes".into(),
///     rows: ["Damage.Bite", "Damage.Tail"]
///         .iter()
///         .map(|l| TableRow { label: l.to_string(), value: RowValue::Number(50.0) })
///         .collect(),
/// };
/// let curve = StatCurve {
///     name: "AttackPower".into(),
///     series: vec![NamedCurve {
///         label: "Senior".into(),
///         curve: Curve::from_samples([(0.0, 0.5), (1.0, 1.0)]),
///     }],
/// };
///
/// let graph = DerivationGraph::build([&table], [&curve]);
/// assert_eq!(graph.candidates().len(), 2);
/// assert!(graph.is_available("BalanceAttributes", "AttackPower"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct DerivationGraph {
    graph: DiGraph<DerivationNode, MatchRank>,
    node_map: HashMap<DerivationNode, NodeIndex>,
}

impl DerivationGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the graph of every matching (base field, plottable curve) pair.
    ///
    /// Edges are added in table order, then field order, then curve order.
    pub fn build<'a, T, C>(tables: T, curves: C) -> Self
    where
        T: IntoIterator<Item = &'a StatTable>,
        C: IntoIterator<Item = &'a StatCurve>,
    {
        let curves: Vec<(&StatCurve, SemanticKey)> = curves
            .into_iter()
            .filter(|c| c.is_plottable())
            .map(|c| (c, SemanticKey::of_curve(&c.name)))
            .collect();

        let mut graph = Self::new();
        for table in tables {
            for field in base_fields(table) {
                for (curve, curve_key) in &curves {
                    if let Some(rank) = match_rank(&field.key, curve_key) {
                        graph.add_edge(
                            DerivationNode::BaseField {
                                table: table.name.clone(),
                                field: field.label.clone(),
                            },
                            DerivationNode::Curve {
                                name: curve.name.clone(),
                            },
                            rank,
                        );
                    }
                }
            }
        }
        graph
    }

    /// Add a node if it doesn't exist, returning its index.
    pub fn add_node(&mut self, node: DerivationNode) -> NodeIndex {
        if let Some(&idx) = self.node_map.get(&node) {
            idx
        } else {
            let idx = self.graph.add_node(node.clone());
            self.node_map.insert(node, idx);
            idx
        }
    }

    /// `from` (a base field) can scale `to` (a curve).
    pub fn add_edge(&mut self, from: DerivationNode, to: DerivationNode, rank: MatchRank) {
        let from_idx = self.add_node(from);
        let to_idx = self.add_node(to);
        self.graph.add_edge(from_idx, to_idx, rank);
    }

    /// Every candidate, in insertion order.
    pub fn candidates(&self) -> Vec<VirtualCandidate> {
        self.graph
            .edge_indices()
            .filter_map(|e| {
                let (from, to) = self.graph.edge_endpoints(e)?;
                self.candidate(from, to, self.graph[e])
            })
            .collect()
    }

    /// Curves a base field can scale, in insertion order.
    pub fn curves_for_field(&self, table: &str, field: &str) -> Vec<String> {
        let node = DerivationNode::BaseField {
            table: table.to_string(),
            field: field.to_string(),
        };
        let Some(&idx) = self.node_map.get(&node) else {
            return Vec::new();
        };
        let mut curves: Vec<String> = self
            .graph
            .neighbors_directed(idx, Direction::Outgoing)
            .filter_map(|n| match &self.graph[n] {
                DerivationNode::Curve { name } => Some(name.clone()),
                DerivationNode::BaseField { .. } => None,
            })
            .collect();
        // petgraph walks neighbors newest first
        curves.reverse();
        curves
    }

    /// Candidates feeding a curve, best match first.
    pub fn fields_for_curve(&self, curve: &str) -> Vec<VirtualCandidate> {
        let node = DerivationNode::Curve {
            name: curve.to_string(),
        };
        let Some(&idx) = self.node_map.get(&node) else {
            return Vec::new();
        };
        let mut found: Vec<VirtualCandidate> = self
            .graph
            .edges_directed(idx, Direction::Incoming)
            .filter_map(|e| self.candidate(e.source(), e.target(), *e.weight()))
            .collect();
        found.reverse();
        found.sort_by_key(|c| c.rank);
        found
    }

    /// At least one base field of `table` can scale `curve`.
    pub fn is_available(&self, table: &str, curve: &str) -> bool {
        self.fields_for_curve(curve).iter().any(|c| c.table == table)
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    fn candidate(&self, from: NodeIndex, to: NodeIndex, rank: MatchRank) -> Option<VirtualCandidate> {
        match (&self.graph[from], &self.graph[to]) {
            (DerivationNode::BaseField { table, field }, DerivationNode::Curve { name }) => {
                Some(VirtualCandidate {
                    table: table.clone(),
                    field: field.clone(),
                    curve: name.clone(),
                    rank,
                })
            }
            _ => None,
        }
    }
}
