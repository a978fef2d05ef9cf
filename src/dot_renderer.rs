use std::collections::HashMap;
use std::fmt::Write;

use crate::config::{EdgeLabels, LayoutOptions};
use crate::graph_ast::*;
use crate::reachability::Reachability;

const KEYWORDS: &[&str] = &["node", "edge", "graph", "digraph", "subgraph", "strict"];

const START_FILL: &str = "#fff3cd";

/// Renders the filtered subgraph, grouping each BFS level on one rank.
pub fn render(reach: &Reachability, options: &LayoutOptions) -> String {
    write_dot(&reach.graph, reach.levels(), Some(reach.start.as_str()), options)
}

/// Renders a graph with layout options but no level information.
pub fn render_graph(graph: &Graph, options: &LayoutOptions) -> String {
    write_dot(graph, &[], None, options)
}

fn write_dot(graph: &Graph, levels: &[Vec<String>], start: Option<&str>, options: &LayoutOptions) -> String {
    let mut out = String::new();
    if graph.strict {
        out.push_str("strict ");
    }
    match &graph.name {
        Some(name) => {
            let _ = writeln!(out, "digraph {} {{", quote_id(name));
        }
        None => out.push_str("digraph {\n"),
    }

    let graph_attrs = layout_attrs(&graph.graph_attrs, options);
    write_stmt(&mut out, "graph", &graph_attrs);
    if !graph.node_defaults.is_empty() {
        write_stmt(&mut out, "node", &graph.node_defaults);
    }
    if !graph.edge_defaults.is_empty() {
        write_stmt(&mut out, "edge", &graph.edge_defaults);
    }
    out.push('\n');

    for node in graph.nodes() {
        if options.highlight_start && start == Some(node.id.as_str()) {
            let mut attrs = node.attrs.clone();
            set_default(&mut attrs, "fillcolor", START_FILL);
            if graph.node_defaults.get("style").is_none() {
                set_default(&mut attrs, "style", "filled");
            }
            write_stmt(&mut out, &quote_id(&node.id), &attrs);
        } else {
            write_stmt(&mut out, &quote_id(&node.id), &node.attrs);
        }
    }

    if options.rank_levels && levels.len() > 1 {
        out.push('\n');
        for group in levels.iter().filter(|g| !g.is_empty()) {
            let members: Vec<String> = group.iter().map(|id| quote_id(id)).collect();
            let _ = writeln!(out, "  {{ rank=same; {}; }}", members.join("; "));
        }
    }

    if graph.edge_count() > 0 {
        out.push('\n');
    }
    let level_of: HashMap<&str, usize> = levels
        .iter()
        .enumerate()
        .flat_map(|(i, g)| g.iter().map(move |id| (id.as_str(), i)))
        .collect();
    for edge in graph.edges() {
        let span = match (level_of.get(edge.from.as_str()), level_of.get(edge.to.as_str())) {
            (Some(&a), Some(&b)) => Some(a.abs_diff(b)),
            _ => None,
        };
        if options.level_edges_only && !levels.is_empty() && span != Some(1) {
            continue;
        }
        let head = format!("{} -> {}", quote_id(&edge.from), quote_id(&edge.to));
        let attrs = edge_attrs(graph, edge, span, options);
        write_stmt(&mut out, &head, &attrs);
    }

    out.push_str("}\n");
    out
}

/// The edge's own attributes plus presentation defaults it does not set
/// itself. Adds an explicit `status` when the styling would otherwise
/// change how the edge reads back.
fn edge_attrs(graph: &Graph, edge: &Edge, span: Option<usize>, options: &LayoutOptions) -> Attributes {
    let mut attrs = edge.attrs.clone();
    match options.edge_labels {
        EdgeLabels::Full => {}
        EdgeLabels::Status => attrs.insert("label", edge.status.code().to_string()),
        EdgeLabels::None => {
            attrs.remove("label");
        }
    }

    let crosses = span.is_some_and(|d| d != 1);
    if options.deemphasize_cross && crosses {
        set_default(&mut attrs, "constraint", "false");
        set_default(&mut attrs, "style", "dotted");
        set_default(&mut attrs, "color", "#999999");
        set_default(&mut attrs, "penwidth", "0.9");
        if let Some(d) = span.filter(|&d| d > 1) {
            set_default(&mut attrs, "minlen", d.to_string());
        }
    } else if options.style_edges {
        let (color, style, width) = match edge.status {
            EdgeStatus::Enabled => ("#2e7d32", "solid", "1.8"),
            EdgeStatus::Suspended => ("#b71c1c", "dashed", "1.2"),
            EdgeStatus::Disabled => ("#666666", "dotted", "1.0"),
        };
        for (key, value) in [("color", color), ("style", style), ("penwidth", width)] {
            if graph.edge_defaults.get(key).is_none() {
                set_default(&mut attrs, key, value);
            }
        }
    }

    if options.ports {
        let (tail, head) = options.rankdir.ports();
        set_default(&mut attrs, "tailport", tail);
        set_default(&mut attrs, "headport", head);
    }

    if EdgeStatus::resolve(&graph.edge_defaults, &attrs) != edge.status {
        attrs.insert("status", edge.status.code().to_string());
    }
    attrs
}

fn set_default(attrs: &mut Attributes, key: &str, value: impl Into<String>) {
    if attrs.get(key).is_none() {
        attrs.insert(key, value);
    }
}

fn layout_attrs(original: &Attributes, options: &LayoutOptions) -> Attributes {
    let mut attrs = original.clone();
    attrs.insert("rankdir", options.rankdir.as_str());
    attrs.insert("splines", options.splines.as_str());
    if options.no_overlap {
        attrs.insert("overlap", "false");
    }
    if options.concentrate {
        attrs.insert("concentrate", "true");
    }
    attrs.insert("nodesep", options.nodesep.to_string());
    attrs.insert("ranksep", options.ranksep.to_string());
    attrs
}

fn write_stmt(out: &mut String, head: &str, attrs: &Attributes) {
    if attrs.is_empty() {
        let _ = writeln!(out, "  {head};");
        return;
    }
    let list: Vec<String> = attrs
        .iter()
        .map(|(k, v)| format!("{}={}", quote_id(k), quote_id(v)))
        .collect();
    let _ = writeln!(out, "  {head} [{}];", list.join(", "));
}

/// Writes `s` bare when DOT accepts it unquoted, otherwise as a quoted string.
pub fn quote_id(s: &str) -> String {
    if is_plain_id(s) || is_numeral(s) {
        s.to_string()
    } else {
        format!("\"{}\"", s.replace('"', "\\\""))
    }
}

fn is_plain_id(s: &str) -> bool {
    let mut chars = s.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first.is_ascii_alphabetic() || first == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        && !KEYWORDS.contains(&s.to_ascii_lowercase().as_str())
}

fn is_numeral(s: &str) -> bool {
    let digits = s.strip_prefix('-').unwrap_or(s);
    if digits.is_empty() || digits == "." {
        return false;
    }
    let mut dots = 0;
    for c in digits.chars() {
        match c {
            '.' => dots += 1,
            c if c.is_ascii_digit() => {}
            _ => return false,
        }
    }
    dots <= 1
}
