use std::io::Read;
use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use reachviz::config::{
    Config, Direction, EdgeLabels, FilterOptions, LayoutOptions, OutputOptions, RankDir, RenderFormat, Splines, ViewOptions,
    parse_depth,
};
use reachviz::{Error, Result};

#[derive(Parser)]
#[command(
    name = "reachviz",
    about = "Filter a DOT graph to the neighborhood of one node and render it as DOT and an interactive HTML view"
)]
struct Cli {
    /// Input DOT file (reads from stdin if not provided)
    file: Option<PathBuf>,

    /// Start node, by id or by label
    #[arg(long, short = 's')]
    start: String,

    /// Maximum number of hops from the start node
    #[arg(long, short = 'd', default_value = "2", value_parser = parse_depth)]
    depth: usize,

    /// Which edges to follow
    #[arg(long, value_enum, ignore_case = true, default_value_t = Direction::Both)]
    direction: Direction,

    /// Only traverse and keep enabled edges
    #[arg(long)]
    enabled_only: bool,

    #[arg(long, value_enum, ignore_case = true, default_value = "TB")]
    rankdir: RankDir,

    /// Edge-curve style
    #[arg(long, value_enum, ignore_case = true, default_value = "curved")]
    splines: Splines,

    /// Let the layout engine overlap nodes
    #[arg(long)]
    allow_overlap: bool,

    /// Merge parallel edges
    #[arg(long)]
    concentrate: bool,

    #[arg(long, default_value_t = 0.35)]
    nodesep: f64,

    #[arg(long, default_value_t = 0.6)]
    ranksep: f64,

    /// Do not group BFS levels on a shared rank
    #[arg(long)]
    no_rank_levels: bool,

    /// Fade edges that skip or stay within a level and drop their rank constraint (default)
    #[arg(long, overrides_with = "no_deemphasize_cross")]
    deemphasize_cross: bool,

    /// Draw cross-level edges like any other edge
    #[arg(long, overrides_with = "deemphasize_cross")]
    no_deemphasize_cross: bool,

    /// What edge labels show
    #[arg(long, value_enum, ignore_case = true, default_value = "full")]
    edge_labels: EdgeLabels,

    /// Attach edges to the node sides facing along the rank direction
    #[arg(long)]
    ports: bool,

    /// Keep only edges between adjacent levels in the DOT output
    #[arg(long)]
    level_edges_only: bool,

    /// No status colors, start fill or cross-level fading; nodes and edges keep exactly their input attributes
    #[arg(long)]
    plain: bool,

    /// Start with second-degree highlighting off in the HTML view
    #[arg(long)]
    no_second_degree: bool,

    /// Split wider levels of the HTML view into several rows
    #[arg(long, default_value_t = 20)]
    max_per_level: usize,

    /// Filtered DOT output path
    #[arg(long, short = 'o', default_value = "reachability_view.dot")]
    output: PathBuf,

    /// Interactive HTML output path
    #[arg(long, default_value = "reachability.html", conflicts_with = "no_html")]
    html: PathBuf,

    /// Skip the HTML view
    #[arg(long)]
    no_html: bool,

    /// Also render an image with Graphviz
    #[arg(long, value_enum, ignore_case = true, default_value = "none")]
    render: RenderFormat,

    /// Graphviz layout engine
    #[arg(long, default_value = "dot")]
    layout: String,

    /// Path to the Graphviz `dot` executable
    #[arg(long)]
    graphviz: Option<PathBuf>,

    /// Log debug details to stderr
    #[arg(long, short = 'v')]
    verbose: bool,
}

impl Cli {
    fn config(&self) -> Config {
        Config {
            start: self.start.clone(),
            filter: FilterOptions {
                depth: self.depth,
                direction: self.direction,
                enabled_only: self.enabled_only,
            },
            layout: LayoutOptions {
                rankdir: self.rankdir,
                splines: self.splines,
                no_overlap: !self.allow_overlap,
                concentrate: self.concentrate,
                nodesep: self.nodesep,
                ranksep: self.ranksep,
                rank_levels: !self.no_rank_levels,
                deemphasize_cross: !self.plain && (self.deemphasize_cross || !self.no_deemphasize_cross),
                highlight_start: !self.plain,
                style_edges: !self.plain,
                edge_labels: self.edge_labels,
                ports: self.ports,
                level_edges_only: self.level_edges_only,
            },
            view: ViewOptions {
                second_degree: !self.no_second_degree,
                max_per_level: self.max_per_level,
            },
            output: OutputOptions {
                dot_path: self.output.clone(),
                html_path: (!self.no_html).then(|| self.html.clone()),
                render: self.render,
                engine: self.layout.clone(),
                graphviz: self.graphviz.clone(),
            },
        }
    }
}

fn read_input(file: Option<&PathBuf>) -> Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(path).map_err(|e| Error::io(path, e)),
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .map_err(|e| Error::io("<stdin>", e))?;
            Ok(buf)
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let config = cli.config();
    let input = read_input(cli.file.as_ref())?;
    let artifacts = reachviz::run(&input, &config)?;
    let written = reachviz::write_artifacts(&artifacts, &config)?;

    println!(
        "{} nodes, {} edges reachable from {} -> {}",
        artifacts.reachability.graph.node_count(),
        artifacts.reachability.graph.edge_count(),
        artifacts.reachability.start,
        written.dot_path.display()
    );
    if let Some(path) = &written.html_path {
        println!("interactive view -> {}", path.display());
    }
    if let Some(path) = &written.image_path {
        println!("image -> {}", path.display());
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "reachviz=debug" } else { "reachviz=info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(&cli) {
        eprintln!("ERROR: {e}");
        std::process::exit(1);
    }
}
