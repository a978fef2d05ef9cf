use std::collections::HashMap;

use serde::Serialize;

/// Ordered key/value attribute bag. Keys are unique; re-inserting a key
/// replaces its value in place so the original ordering survives.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes(Vec<(String, String)>);

impl Attributes {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.0.push((key, value)),
        }
    }

    pub fn merge(&mut self, other: &Attributes) {
        for (k, v) in other.iter() {
            self.insert(k, v);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        let idx = self.0.iter().position(|(k, _)| k == key)?;
        Some(self.0.remove(idx).1)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut attrs = Attributes::new();
        for (k, v) in iter {
            attrs.insert(k, v);
        }
        attrs
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: String,
    pub attrs: Attributes,
}

impl Node {
    pub fn label(&self) -> Option<&str> {
        self.attrs.get("label")
    }

    /// Label if present, otherwise the identifier.
    pub fn display_name(&self) -> &str {
        self.label().unwrap_or(&self.id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum EdgeStatus {
    #[serde(rename = "E")]
    Enabled,
    #[serde(rename = "S")]
    Suspended,
    #[serde(rename = "D")]
    Disabled,
}

impl EdgeStatus {
    pub fn from_attrs(attrs: &Attributes) -> Self {
        if let Some(flag) = attrs.get("enabled") {
            match flag.trim().to_ascii_lowercase().as_str() {
                "false" | "0" | "no" | "off" => return EdgeStatus::Disabled,
                "true" | "1" | "yes" | "on" => return EdgeStatus::Enabled,
                _ => {}
            }
        }
        if let Some(status) = attrs.get("status") {
            return Self::from_code(status).unwrap_or(EdgeStatus::Enabled);
        }
        if let Some(label) = attrs.get("label") {
            let first = label.split('|').next().unwrap_or("");
            if let Some(status) = Self::from_code(first) {
                return status;
            }
        }
        let greyed = attrs.get("color").is_some_and(is_grey);
        let invisible = attrs
            .get("style")
            .is_some_and(|s| s.to_ascii_lowercase().contains("invis"));
        if greyed || invisible {
            return EdgeStatus::Disabled;
        }
        EdgeStatus::Enabled
    }

    /// Status with `defaults` (the graph's `edge [...]` settings) underneath
    /// the edge's own attributes.
    pub fn resolve(defaults: &Attributes, attrs: &Attributes) -> Self {
        if defaults.is_empty() {
            return Self::from_attrs(attrs);
        }
        let mut merged = defaults.clone();
        merged.merge(attrs);
        Self::from_attrs(&merged)
    }

    fn from_code(code: &str) -> Option<Self> {
        match code.trim().chars().next()?.to_ascii_uppercase() {
            'E' => Some(EdgeStatus::Enabled),
            'S' => Some(EdgeStatus::Suspended),
            'D' => Some(EdgeStatus::Disabled),
            _ => None,
        }
    }

    pub fn code(self) -> char {
        match self {
            EdgeStatus::Enabled => 'E',
            EdgeStatus::Suspended => 'S',
            EdgeStatus::Disabled => 'D',
        }
    }
}

fn is_grey(color: &str) -> bool {
    let color = color.trim().to_ascii_lowercase();
    if color == "#999999" || color == "#666666" {
        return true;
    }
    ["gray", "grey"].iter().any(|name| {
        color
            .strip_prefix(name)
            .is_some_and(|rest| rest.chars().all(|c| c.is_ascii_digit()))
    })
}

#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub from: String,
    pub to: String,
    pub attrs: Attributes,
    pub status: EdgeStatus,
}

impl Edge {
    pub fn new(from: impl Into<String>, to: impl Into<String>, attrs: Attributes) -> Self {
        let status = EdgeStatus::from_attrs(&attrs);
        Self {
            from: from.into(),
            to: to.into(),
            attrs,
            status,
        }
    }

    pub fn enabled(&self) -> bool {
        self.status == EdgeStatus::Enabled
    }
}

/// Directed multigraph with nodes kept in first-mention order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Graph {
    pub name: Option<String>,
    pub strict: bool,
    pub graph_attrs: Attributes,
    pub node_defaults: Attributes,
    pub edge_defaults: Attributes,
    nodes: Vec<Node>,
    index: HashMap<String, usize>,
    edges: Vec<Edge>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty graph carrying the same name, flags and defaults as `self`.
    pub fn empty_like(&self) -> Self {
        Self {
            name: self.name.clone(),
            strict: self.strict,
            graph_attrs: self.graph_attrs.clone(),
            node_defaults: self.node_defaults.clone(),
            edge_defaults: self.edge_defaults.clone(),
            ..Self::default()
        }
    }

    /// Declares a node, merging `attrs` into an existing declaration.
    pub fn add_node(&mut self, id: &str, attrs: &Attributes) {
        let idx = self.ensure_node(id);
        self.nodes[idx].attrs.merge(attrs);
    }

    fn ensure_node(&mut self, id: &str) -> usize {
        if let Some(&idx) = self.index.get(id) {
            return idx;
        }
        let idx = self.nodes.len();
        self.nodes.push(Node {
            id: id.to_string(),
            attrs: Attributes::new(),
        });
        self.index.insert(id.to_string(), idx);
        idx
    }

    /// Re-resolves every edge status against the current `edge [...]` defaults.
    pub fn resolve_edge_status(&mut self) {
        for edge in &mut self.edges {
            edge.status = EdgeStatus::resolve(&self.edge_defaults, &edge.attrs);
        }
    }

    /// Appends an edge; unknown endpoints become attribute-less nodes.
    pub fn add_edge(&mut self, edge: Edge) {
        self.ensure_node(&edge.from);
        self.ensure_node(&edge.to);
        self.edges.push(edge);
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.index.get(id).map(|&idx| &self.nodes[idx])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Nodes whose label equals `label` exactly, in declaration order.
    pub fn nodes_with_label(&self, label: &str) -> Vec<&Node> {
        self.nodes.iter().filter(|n| n.label() == Some(label)).collect()
    }
}
