use std::collections::{HashMap, VecDeque};

use tracing::{debug, warn};

use crate::config::{Direction, FilterOptions};
use crate::error::{Error, Result};
use crate::graph_ast::*;

/// Presentation bucket derived from a node's hop distance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DegreeBucket {
    Start,
    Direct,
    SecondDegree,
    Beyond(usize),
}

impl DegreeBucket {
    pub fn from_distance(distance: usize) -> Self {
        match distance {
            0 => DegreeBucket::Start,
            1 => DegreeBucket::Direct,
            2 => DegreeBucket::SecondDegree,
            n => DegreeBucket::Beyond(n),
        }
    }
}

/// Induced subgraph reached from `start`, with hop distances.
#[derive(Debug, Clone, PartialEq)]
pub struct Reachability {
    pub graph: Graph,
    pub start: String,
    pub direction: Direction,
    distances: HashMap<String, usize>,
    levels: Vec<Vec<String>>,
}

impl Reachability {
    pub fn distance(&self, id: &str) -> Option<usize> {
        self.distances.get(id).copied()
    }

    pub fn degree_bucket(&self, id: &str) -> Option<DegreeBucket> {
        self.distance(id).map(DegreeBucket::from_distance)
    }

    /// Reached node ids grouped by distance, each level in input order.
    pub fn levels(&self) -> &[Vec<String>] {
        &self.levels
    }

    pub fn contains(&self, id: &str) -> bool {
        self.distances.contains_key(id)
    }
}

/// Resolves a start reference: exact id first, then exact label. Among
/// several nodes sharing the label, the first declared wins.
pub fn resolve_start<'g>(graph: &'g Graph, reference: &str) -> Result<&'g Node> {
    let reference = reference.trim();
    if let Some(node) = graph.node(reference) {
        return Ok(node);
    }
    let matches = graph.nodes_with_label(reference);
    let Some((&first, rest)) = matches.split_first() else {
        return Err(Error::StartNodeNotFound {
            reference: reference.to_string(),
        });
    };
    let others: Vec<&str> = rest.iter().map(|n| n.id.as_str()).collect();
    if !others.is_empty() {
        warn!(
            label = reference,
            chosen = %first.id,
            ignored = ?others,
            "start label is ambiguous, using the first declared node"
        );
    }
    Ok(first)
}

/// Bounded breadth-first search from `start_ref`.
///
/// Traversable edges are chosen by `options.direction`; with `enabled_only`
/// disabled and suspended edges neither propagate reachability nor appear
/// in the result. The result holds every qualifying edge between reached
/// nodes, not only the edges of the BFS tree.
pub fn filter(graph: &Graph, start_ref: &str, options: &FilterOptions) -> Result<Reachability> {
    let start = resolve_start(graph, start_ref)?.id.clone();
    let usable = |e: &Edge| !options.enabled_only || e.enabled();

    let mut adjacency: HashMap<&str, Vec<&str>> = HashMap::new();
    for edge in graph.edges().iter().filter(|e| usable(e)) {
        if options.direction.follows_outgoing() {
            adjacency.entry(&edge.from).or_default().push(&edge.to);
        }
        if options.direction.follows_incoming() {
            adjacency.entry(&edge.to).or_default().push(&edge.from);
        }
    }

    let mut distances: HashMap<String, usize> = HashMap::new();
    let mut queue: VecDeque<(&str, usize)> = VecDeque::new();
    distances.insert(start.clone(), 0);
    queue.push_back((start.as_str(), 0));

    while let Some((current, depth)) = queue.pop_front() {
        if depth >= options.depth {
            continue;
        }
        for &next in adjacency.get(current).map(Vec::as_slice).unwrap_or_default() {
            if !distances.contains_key(next) {
                distances.insert(next.to_string(), depth + 1);
                queue.push_back((next, depth + 1));
            }
        }
    }

    let mut induced = graph.empty_like();
    let max_distance = distances.values().copied().max().unwrap_or(0);
    let mut levels: Vec<Vec<String>> = vec![Vec::new(); max_distance + 1];
    for node in graph.nodes() {
        if let Some(&d) = distances.get(&node.id) {
            induced.add_node(&node.id, &node.attrs);
            levels[d].push(node.id.clone());
        }
    }
    for edge in graph.edges() {
        if usable(edge) && distances.contains_key(&edge.from) && distances.contains_key(&edge.to) {
            induced.add_edge(edge.clone());
        }
    }

    debug!(
        start = %start,
        depth = options.depth,
        direction = %options.direction,
        nodes = induced.node_count(),
        edges = induced.edge_count(),
        "reachability computed"
    );

    Ok(Reachability {
        graph: induced,
        start,
        direction: options.direction,
        distances,
        levels,
    })
}
