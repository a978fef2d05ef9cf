pub mod config;
pub mod display_width;
pub mod dot_renderer;
pub mod error;
pub mod graph_ast;
pub mod graph_parser;
pub mod graphviz;
pub mod pipeline;
pub mod reachability;
pub mod view_layout;
pub mod view_model;
pub mod view_renderer;
pub mod view_state;

pub use config::{Config, Direction, FilterOptions, LayoutOptions};
pub use error::{Error, Result};
pub use pipeline::{Artifacts, run, write_artifacts};

/// Parses `input`, keeps what is reachable from `start` and returns the
/// filtered graph as DOT text.
pub fn filter_dot(input: &str, start: &str, filter: &FilterOptions, layout: &LayoutOptions) -> Result<String> {
    let graph = graph_parser::parse_graph(input)?;
    let reach = reachability::filter(&graph, start, filter)?;
    Ok(dot_renderer::render(&reach, layout))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_dot_keeps_reachable_part() {
        let output = filter_dot(
            "digraph { a -> b; b -> c; z -> q }",
            "a",
            &FilterOptions::default(),
            &LayoutOptions::default(),
        )
        .unwrap();
        assert!(output.contains("a -> b"), "got: {output}");
        assert!(output.contains("b -> c"), "got: {output}");
        assert!(!output.contains("z -> q"), "got: {output}");
    }

    #[test]
    fn filter_dot_rejects_undirected_input() {
        let err = filter_dot("graph { a -- b }", "a", &FilterOptions::default(), &LayoutOptions::default())
            .unwrap_err();
        assert!(matches!(err, Error::Parse { .. }), "got: {err}");
    }

    #[test]
    fn filter_dot_reports_missing_start() {
        let err = filter_dot("digraph { a }", "b", &FilterOptions::default(), &LayoutOptions::default())
            .unwrap_err();
        assert_eq!(err.to_string(), "start node `b` matches no node id or label");
    }
}
