use std::fs;
use std::panic;
use std::path::{Path, PathBuf};
use std::thread;

use tracing::{debug, info};

use crate::config::Config;
use crate::dot_renderer;
use crate::error::{Error, Result};
use crate::graph_parser::parse_graph;
use crate::graphviz;
use crate::reachability::{self, Reachability};
use crate::view_model;
use crate::view_renderer;

/// Everything produced for one input, before anything touches the disk.
#[derive(Debug)]
pub struct Artifacts {
    pub dot: String,
    /// `None` when no HTML output is configured.
    pub html: Option<String>,
    pub reachability: Reachability,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Written {
    pub dot_path: PathBuf,
    pub html_path: Option<PathBuf>,
    pub image_path: Option<PathBuf>,
}

pub fn run(input: &str, config: &Config) -> Result<Artifacts> {
    config.validate()?;
    let graph = parse_graph(input)?;
    debug!(nodes = graph.node_count(), edges = graph.edge_count(), "parsed graph");

    let reach = reachability::filter(&graph, &config.start, &config.filter)?;
    info!(
        start = %reach.start,
        nodes = reach.graph.node_count(),
        edges = reach.graph.edge_count(),
        "filtered graph"
    );

    let want_html = config.output.html_path.is_some();
    let (dot, html) = thread::scope(|s| {
        let html = s.spawn(|| {
            want_html
                .then(|| {
                    let model = view_model::build(&reach, &config.layout, &config.view);
                    view_renderer::render(&model)
                })
                .transpose()
        });
        let dot = dot_renderer::render(&reach, &config.layout);
        let html = html.join().unwrap_or_else(|e| panic::resume_unwind(e));
        (dot, html)
    });

    Ok(Artifacts {
        dot,
        html: html?,
        reachability: reach,
    })
}

/// Writes the DOT file and the page, then renders an image if asked to.
pub fn write_artifacts(artifacts: &Artifacts, config: &Config) -> Result<Written> {
    let dot_path = config.output.dot_path.clone();
    write_file(&dot_path, &artifacts.dot)?;
    info!(path = %dot_path.display(), "wrote filtered graph");

    let html_path = match (&config.output.html_path, &artifacts.html) {
        (Some(path), Some(html)) => {
            write_file(path, html)?;
            info!(path = %path.display(), "wrote interactive view");
            Some(path.clone())
        }
        _ => None,
    };

    let image_path = graphviz::render(&dot_path, &config.output);
    Ok(Written {
        dot_path,
        html_path,
        image_path,
    })
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }
    fs::write(path, contents).map_err(|e| Error::io(path, e))
}
