use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use clap::ValueEnum;
use serde::Serialize;

use crate::error::{Error, Result};

/// Which edges the frontier may follow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Out,
    In,
    #[default]
    Both,
}

impl Direction {
    pub fn follows_outgoing(self) -> bool {
        matches!(self, Direction::Out | Direction::Both)
    }

    pub fn follows_incoming(self) -> bool {
        matches!(self, Direction::In | Direction::Both)
    }
}

impl FromStr for Direction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "out" => Ok(Direction::Out),
            "in" => Ok(Direction::In),
            "both" => Ok(Direction::Both),
            _ => Err(Error::invalid_option("direction", s, "out|in|both")),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Direction::Out => "out",
            Direction::In => "in",
            Direction::Both => "both",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum RankDir {
    #[default]
    #[value(name = "TB")]
    TopBottom,
    #[value(name = "LR")]
    LeftRight,
    #[value(name = "BT")]
    BottomTop,
    #[value(name = "RL")]
    RightLeft,
}

impl RankDir {
    pub fn as_str(self) -> &'static str {
        match self {
            RankDir::TopBottom => "TB",
            RankDir::LeftRight => "LR",
            RankDir::BottomTop => "BT",
            RankDir::RightLeft => "RL",
        }
    }

    /// Tail and head compass ports that keep edges flowing along the ranks.
    pub fn ports(self) -> (&'static str, &'static str) {
        match self {
            RankDir::TopBottom => ("s", "n"),
            RankDir::BottomTop => ("n", "s"),
            RankDir::LeftRight => ("e", "w"),
            RankDir::RightLeft => ("w", "e"),
        }
    }
}

impl FromStr for RankDir {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "TB" | "TD" => Ok(RankDir::TopBottom),
            "LR" => Ok(RankDir::LeftRight),
            "BT" => Ok(RankDir::BottomTop),
            "RL" => Ok(RankDir::RightLeft),
            _ => Err(Error::invalid_option("rank direction", s, "TB|LR|BT|RL")),
        }
    }
}

/// Edge-curve style handed to the layout engine as `splines=`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Splines {
    #[default]
    Curved,
    Ortho,
    Polyline,
    Line,
    Spline,
    True,
    False,
}

impl Splines {
    pub fn as_str(self) -> &'static str {
        match self {
            Splines::Curved => "curved",
            Splines::Ortho => "ortho",
            Splines::Polyline => "polyline",
            Splines::Line => "line",
            Splines::Spline => "spline",
            Splines::True => "true",
            Splines::False => "false",
        }
    }
}

impl FromStr for Splines {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "curved" => Ok(Splines::Curved),
            "ortho" => Ok(Splines::Ortho),
            "polyline" => Ok(Splines::Polyline),
            "line" | "straight" => Ok(Splines::Line),
            "spline" => Ok(Splines::Spline),
            "true" => Ok(Splines::True),
            "false" => Ok(Splines::False),
            _ => Err(Error::invalid_option(
                "edge-curve style",
                s,
                "curved|ortho|polyline|line|spline|true|false",
            )),
        }
    }
}

/// What the serialized edge label shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum EdgeLabels {
    /// The original label, untouched.
    #[default]
    Full,
    /// Only the one-letter status code.
    Status,
    None,
}

impl FromStr for EdgeLabels {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "full" => Ok(EdgeLabels::Full),
            "status" => Ok(EdgeLabels::Status),
            "none" => Ok(EdgeLabels::None),
            _ => Err(Error::invalid_option("edge labels", s, "full|status|none")),
        }
    }
}

/// Image format requested from the external renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum RenderFormat {
    #[default]
    None,
    Svg,
    Png,
}

impl RenderFormat {
    pub fn extension(self) -> Option<&'static str> {
        match self {
            RenderFormat::None => None,
            RenderFormat::Svg => Some("svg"),
            RenderFormat::Png => Some("png"),
        }
    }
}

impl FromStr for RenderFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" | "" => Ok(RenderFormat::None),
            "svg" | "vector" => Ok(RenderFormat::Svg),
            "png" | "bitmap" => Ok(RenderFormat::Png),
            _ => Err(Error::invalid_option("render format", s, "none|svg|png")),
        }
    }
}

pub fn parse_depth(s: &str) -> Result<usize> {
    s.trim()
        .parse::<usize>()
        .map_err(|_| Error::invalid_option("depth", s, "a non-negative integer"))
}

#[derive(Debug, Clone, PartialEq)]
pub struct FilterOptions {
    pub depth: usize,
    pub direction: Direction,
    pub enabled_only: bool,
}

impl Default for FilterOptions {
    fn default() -> Self {
        Self {
            depth: 2,
            direction: Direction::Both,
            enabled_only: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LayoutOptions {
    pub rankdir: RankDir,
    pub splines: Splines,
    pub no_overlap: bool,
    pub concentrate: bool,
    pub nodesep: f64,
    pub ranksep: f64,
    /// Emit one `rank=same` group per BFS level.
    pub rank_levels: bool,
    /// Edges that skip or stay within a level lose their rank constraint and
    /// are drawn dotted and grey.
    pub deemphasize_cross: bool,
    /// Fill the start node with a distinct color.
    pub highlight_start: bool,
    /// Color, line style and width per edge status.
    pub style_edges: bool,
    pub edge_labels: EdgeLabels,
    /// Pin `tailport`/`headport` to the sides facing along `rankdir`.
    pub ports: bool,
    /// Drop every edge that does not go exactly one level deeper.
    pub level_edges_only: bool,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            rankdir: RankDir::TopBottom,
            splines: Splines::Curved,
            no_overlap: true,
            concentrate: false,
            nodesep: 0.35,
            ranksep: 0.6,
            rank_levels: true,
            deemphasize_cross: true,
            highlight_start: true,
            style_edges: true,
            edge_labels: EdgeLabels::Full,
            ports: false,
            level_edges_only: false,
        }
    }
}

impl LayoutOptions {
    /// Layout attributes only; node and edge statements keep exactly their input attributes.
    pub fn verbatim() -> Self {
        Self {
            deemphasize_cross: false,
            highlight_start: false,
            style_edges: false,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ViewOptions {
    /// Initial state of the second-degree highlight toggle.
    pub second_degree: bool,
    /// Wider BFS levels are split into presentation sub-levels.
    pub max_per_level: usize,
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self {
            second_degree: true,
            max_per_level: 20,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OutputOptions {
    pub dot_path: PathBuf,
    pub html_path: Option<PathBuf>,
    pub render: RenderFormat,
    /// Graphviz layout engine passed as `-K`.
    pub engine: String,
    /// Explicit path to the `dot` executable; otherwise looked up on `PATH`.
    pub graphviz: Option<PathBuf>,
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            dot_path: PathBuf::from("reachability_view.dot"),
            html_path: Some(PathBuf::from("reachability.html")),
            render: RenderFormat::None,
            engine: "dot".to_string(),
            graphviz: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub start: String,
    pub filter: FilterOptions,
    pub layout: LayoutOptions,
    pub view: ViewOptions,
    pub output: OutputOptions,
}

impl Config {
    pub fn new(start: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            filter: FilterOptions::default(),
            layout: LayoutOptions::default(),
            view: ViewOptions::default(),
            output: OutputOptions::default(),
        }
    }

    /// Rejects option values that cannot produce a meaningful run.
    pub fn validate(&self) -> Result<()> {
        if self.start.trim().is_empty() {
            return Err(Error::invalid_option("start", &self.start, "a node id or label"));
        }
        for (option, value) in [("nodesep", self.layout.nodesep), ("ranksep", self.layout.ranksep)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(Error::invalid_option(option, value.to_string(), "a positive number"));
            }
        }
        if self.view.max_per_level == 0 {
            return Err(Error::invalid_option("max-per-level", "0", "a positive integer"));
        }
        if self.output.engine.trim().is_empty() {
            return Err(Error::invalid_option("layout", &self.output.engine, "a Graphviz engine name"));
        }
        Ok(())
    }
}
