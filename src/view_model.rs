//! Data embedded in the interactive page: placed nodes, displayable edges
//! and per-node statistics over the filtered graph.

use std::collections::{BTreeSet, HashMap, HashSet};

use serde::Serialize;

use crate::config::{Direction, LayoutOptions, ViewOptions};
use crate::display_width::plain_text;
use crate::graph_ast::EdgeStatus;
use crate::reachability::Reachability;
use crate::view_layout::{self, Bounds, LayoutInput};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewModel {
    pub start: String,
    pub direction: Direction,
    pub second_degree: bool,
    pub nodes: Vec<ViewNode>,
    pub edges: Vec<ViewEdge>,
    pub bounds: Bounds,
    pub node_count: usize,
    pub edge_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewNode {
    pub id: String,
    pub label: String,
    pub distance: usize,
    pub level: usize,
    pub x: f64,
    pub y: f64,
    pub size: f64,
    pub in_degree: usize,
    pub out_degree: usize,
    /// Direct neighbors under the filter's direction, in node order.
    pub neighbors: Vec<String>,
    /// Nodes two hops away that are neither this node nor a direct neighbor.
    pub second_neighbors: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewEdge {
    pub id: usize,
    pub from: String,
    pub to: String,
    pub status: EdgeStatus,
    /// A reverse edge exists and is drawn as the same line.
    pub bidirectional: bool,
}

impl ViewModel {
    pub fn node(&self, id: &str) -> Option<&ViewNode> {
        self.nodes.iter().find(|n| n.id == id)
    }
}

pub fn build(reach: &Reachability, layout: &LayoutOptions, options: &ViewOptions) -> ViewModel {
    let graph = &reach.graph;
    let order: HashMap<&str, usize> = graph
        .nodes()
        .iter()
        .enumerate()
        .map(|(i, n)| (n.id.as_str(), i))
        .collect();

    let sub_levels = view_layout::split_levels(reach.levels(), options.max_per_level);
    let mut level_of: HashMap<&str, usize> = HashMap::new();
    for (i, group) in sub_levels.iter().enumerate() {
        for id in group {
            level_of.insert(id.as_str(), i);
        }
    }

    let labels: Vec<String> = graph
        .nodes()
        .iter()
        .map(|n| plain_text(n.display_name()))
        .collect();
    let placed = {
        let inputs: Vec<LayoutInput<'_>> = graph
            .nodes()
            .iter()
            .zip(&labels)
            .map(|(n, label)| LayoutInput {
                label,
                level: level_of.get(n.id.as_str()).copied().unwrap_or(0),
                is_start: n.id == reach.start,
            })
            .collect();
        view_layout::compute(&inputs, layout.rankdir)
    };

    let mut in_degree: HashMap<&str, usize> = HashMap::new();
    let mut out_degree: HashMap<&str, usize> = HashMap::new();
    let mut adjacent: HashMap<&str, BTreeSet<usize>> = HashMap::new();
    for edge in graph.edges() {
        *out_degree.entry(&edge.from).or_default() += 1;
        *in_degree.entry(&edge.to).or_default() += 1;
        if reach.direction.follows_outgoing() && edge.from != edge.to {
            adjacent.entry(&edge.from).or_default().insert(order[edge.to.as_str()]);
        }
        if reach.direction.follows_incoming() && edge.from != edge.to {
            adjacent.entry(&edge.to).or_default().insert(order[edge.from.as_str()]);
        }
    }

    let nodes: Vec<ViewNode> = graph
        .nodes()
        .iter()
        .zip(labels)
        .zip(&placed.placements)
        .enumerate()
        .map(|(i, ((node, label), place))| {
            let direct = adjacent.get(node.id.as_str()).cloned().unwrap_or_default();
            let mut second = BTreeSet::new();
            for &n in &direct {
                let id = graph.nodes()[n].id.as_str();
                for &m in adjacent.get(id).into_iter().flatten() {
                    if m != i && !direct.contains(&m) {
                        second.insert(m);
                    }
                }
            }
            let ids = |set: &BTreeSet<usize>| -> Vec<String> {
                set.iter().map(|&k| graph.nodes()[k].id.clone()).collect()
            };
            ViewNode {
                id: node.id.clone(),
                label,
                distance: reach.distance(&node.id).unwrap_or(0),
                level: place.level,
                x: place.x,
                y: place.y,
                size: place.size,
                in_degree: in_degree.get(node.id.as_str()).copied().unwrap_or(0),
                out_degree: out_degree.get(node.id.as_str()).copied().unwrap_or(0),
                neighbors: ids(&direct),
                second_neighbors: ids(&second),
            }
        })
        .collect();

    ViewModel {
        start: reach.start.clone(),
        direction: reach.direction,
        second_degree: options.second_degree,
        nodes,
        edges: merge_reverse_pairs(reach),
        bounds: placed.bounds,
        node_count: graph.node_count(),
        edge_count: graph.edge_count(),
    }
}

/// One displayed edge per ordered pair; a pair whose reverse is present
/// collapses into a single bidirectional line.
fn merge_reverse_pairs(reach: &Reachability) -> Vec<ViewEdge> {
    let mut edges: Vec<ViewEdge> = Vec::new();
    let mut seen: HashMap<(&str, &str), usize> = HashMap::new();
    let mut drawn: HashSet<(&str, &str)> = HashSet::new();
    for edge in reach.graph.edges() {
        let pair = (edge.from.as_str(), edge.to.as_str());
        if !drawn.insert(pair) {
            continue;
        }
        let key = if pair.0 <= pair.1 { pair } else { (pair.1, pair.0) };
        if let Some(&idx) = seen.get(&key) {
            edges[idx].bidirectional = true;
            continue;
        }
        seen.insert(key, edges.len());
        edges.push(ViewEdge {
            id: edges.len(),
            from: edge.from.clone(),
            to: edge.to.clone(),
            status: edge.status,
            bidirectional: false,
        });
    }
    edges
}
