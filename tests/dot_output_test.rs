use pretty_assertions::assert_eq;
use reachviz::config::{Direction, EdgeLabels, FilterOptions, LayoutOptions, RankDir, Splines};
use reachviz::dot_renderer::{render, render_graph};
use reachviz::graph_ast::Graph;
use reachviz::graph_parser::parse_graph;
use reachviz::reachability::filter;

const INPUT: &str = r##"
/* deployment topology */
digraph "prod topology" {
  graph [fontsize=10];
  node [shape=box, style="rounded,filled"];
  edge [arrowsize=0.6];

  gw [label="12\nGateway", fillcolor="#e0f2fe"];
  "auth-svc" [label="Auth \"core\""];
  db [label="DB"];
  cache;
  old [label="Legacy"];

  gw -> "auth-svc" [label="E|login"];
  "auth-svc" -> db [weight=2];
  "auth-svc" -> cache -> db;
  gw -> old [enabled=false];
  old -> db [label="S|batch"];
  gw -> gw;
  subgraph cluster_x { label="ignored"; x -> y }
}
"##;

fn snapshot(graph: &Graph) -> (Vec<(String, Vec<(String, String)>)>, Vec<(String, String, Vec<(String, String)>)>) {
    let attrs = |a: &reachviz::graph_ast::Attributes| -> Vec<(String, String)> {
        a.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    };
    let nodes = graph
        .nodes()
        .iter()
        .map(|n| (n.id.clone(), attrs(&n.attrs)))
        .collect();
    let mut edges: Vec<_> = graph
        .edges()
        .iter()
        .map(|e| (e.from.clone(), e.to.clone(), attrs(&e.attrs)))
        .collect();
    edges.sort();
    (nodes, edges)
}

fn options(depth: usize, direction: Direction) -> FilterOptions {
    FilterOptions {
        depth,
        direction,
        enabled_only: false,
    }
}

// =============================================================================
// Round trip
// =============================================================================

#[test]
fn filtered_output_reparses_to_same_graph() {
    let graph = parse_graph(INPUT).unwrap();
    for (depth, direction) in [(1, Direction::Out), (2, Direction::Both), (3, Direction::In)] {
        let reach = filter(&graph, "gw", &options(depth, direction)).unwrap();
        let dot = render(&reach, &LayoutOptions::verbatim());
        let reparsed = parse_graph(&dot).unwrap();
        assert_eq!(snapshot(&reparsed), snapshot(&reach.graph), "{dot}");
        assert_eq!(reparsed.name, reach.graph.name);
        assert_eq!(reparsed.node_defaults, reach.graph.node_defaults);
        assert_eq!(reparsed.edge_defaults, reach.graph.edge_defaults);
    }
}

#[test]
fn round_trip_keeps_edge_status() {
    let graph = parse_graph(INPUT).unwrap();
    let reach = filter(&graph, "gw", &options(2, Direction::Out)).unwrap();
    let statuses = |g: &Graph| g.edges().iter().map(|e| e.status).collect::<Vec<_>>();
    for layout in [LayoutOptions::verbatim(), LayoutOptions::default()] {
        let reparsed = parse_graph(&render(&reach, &layout)).unwrap();
        assert_eq!(statuses(&reparsed), statuses(&reach.graph));
    }
}

#[test]
fn styled_output_only_adds_attributes() {
    let graph = parse_graph(INPUT).unwrap();
    let reach = filter(&graph, "gw", &options(3, Direction::Both)).unwrap();
    let layout = LayoutOptions {
        ports: true,
        ..LayoutOptions::default()
    };
    let dot = render(&reach, &layout);
    let reparsed = parse_graph(&dot).unwrap();
    assert_eq!(reparsed.edge_count(), reach.graph.edge_count());
    for (before, after) in reach.graph.edges().iter().zip(reparsed.edges()) {
        assert_eq!((&after.from, &after.to), (&before.from, &before.to));
        assert_eq!(after.status, before.status, "{dot}");
        for (key, value) in before.attrs.iter() {
            assert_eq!(after.attrs.get(key), Some(value), "{key} on {} -> {}", before.from, before.to);
        }
        assert!(after.attrs.get("color").is_some());
    }
    for (before, after) in reach.graph.nodes().iter().zip(reparsed.nodes()) {
        for (key, value) in before.attrs.iter() {
            assert_eq!(after.attrs.get(key), Some(value));
        }
    }
    assert!(dot.contains("  gw -> old [enabled=false, color=\"#666666\", style=dotted, penwidth=1.0, tailport=s, headport=n];"), "{dot}");
}

#[test]
fn status_labels_read_back_as_status() {
    let graph = parse_graph(INPUT).unwrap();
    let reach = filter(&graph, "gw", &options(3, Direction::Both)).unwrap();
    let statuses = |g: &Graph| g.edges().iter().map(|e| e.status).collect::<Vec<_>>();
    for edge_labels in [EdgeLabels::Status, EdgeLabels::None] {
        let layout = LayoutOptions {
            edge_labels,
            ..LayoutOptions::default()
        };
        let reparsed = parse_graph(&render(&reach, &layout)).unwrap();
        assert_eq!(statuses(&reparsed), statuses(&reach.graph));
    }
}

#[test]
fn subgraph_edge_defaults_survive_round_trip() {
    let src = "digraph { a -> b; subgraph { edge [style=invis]; b -> c } }";
    let graph = parse_graph(src).unwrap();
    let reach = filter(&graph, "a", &options(2, Direction::Out)).unwrap();
    let dot = render(&reach, &LayoutOptions::verbatim());
    assert!(dot.contains("  b -> c [style=invis];"), "{dot}");
    let reparsed = parse_graph(&dot).unwrap();
    assert!(!reparsed.edges()[1].enabled());
}

#[test]
fn round_trip_with_every_layout_option() {
    let layout = LayoutOptions {
        rankdir: RankDir::LeftRight,
        splines: Splines::Ortho,
        no_overlap: false,
        concentrate: true,
        nodesep: 1.25,
        ranksep: 2.0,
        rank_levels: false,
        deemphasize_cross: false,
        highlight_start: false,
        style_edges: false,
        edge_labels: EdgeLabels::Full,
        ports: false,
        level_edges_only: false,
    };
    let graph = parse_graph(INPUT).unwrap();
    let reach = filter(&graph, "auth-svc", &options(2, Direction::Both)).unwrap();
    let dot = render(&reach, &layout);
    let reparsed = parse_graph(&dot).unwrap();
    assert_eq!(snapshot(&reparsed), snapshot(&reach.graph));
    assert_eq!(reparsed.graph_attrs.get("rankdir"), Some("LR"));
    assert_eq!(reparsed.graph_attrs.get("splines"), Some("ortho"));
    assert_eq!(reparsed.graph_attrs.get("concentrate"), Some("true"));
    assert_eq!(reparsed.graph_attrs.get("overlap"), None);
    assert_eq!(reparsed.graph_attrs.get("fontsize"), Some("10"));
    assert!(!dot.contains("rank=same"));
}

#[test]
fn unfiltered_graph_round_trips() {
    let graph = parse_graph(INPUT).unwrap();
    let reparsed = parse_graph(&render_graph(&graph, &LayoutOptions::verbatim())).unwrap();
    assert_eq!(snapshot(&reparsed), snapshot(&graph));
}

// =============================================================================
// Determinism
// =============================================================================

#[test]
fn identical_runs_are_byte_identical() {
    let run = || {
        let graph = parse_graph(INPUT).unwrap();
        let reach = filter(&graph, "gw", &options(3, Direction::Both)).unwrap();
        render(&reach, &LayoutOptions::default())
    };
    let first = run();
    for _ in 0..5 {
        assert_eq!(run(), first);
    }
}

#[test]
fn output_follows_declaration_order() {
    let graph = parse_graph(INPUT).unwrap();
    let reach = filter(&graph, "gw", &options(1, Direction::Out)).unwrap();
    let dot = render(&reach, &LayoutOptions::default());
    let gw = dot.find("  gw [").unwrap();
    let auth = dot.find("  \"auth-svc\" [").unwrap();
    let old = dot.find("  old [").unwrap();
    assert!(gw < auth && auth < old, "{dot}");
    assert!(dot.contains("  { rank=same; gw; }"));
    assert!(dot.contains("  { rank=same; \"auth-svc\"; old; }"));
    assert!(dot.contains("  gw -> gw [constraint=false, style=dotted,"), "{dot}");
}

#[test]
fn subgraph_members_are_flattened() {
    let graph = parse_graph(INPUT).unwrap();
    assert!(graph.contains("x"));
    assert!(graph.contains("y"));
    assert_eq!(graph.node_count(), 7);
    assert_eq!(graph.edge_count(), 8);
}
