use serde::Serialize;

use crate::config::RankDir;
use crate::display_width::multiline_width;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Placement {
    pub level: usize,
    pub x: f64,
    pub y: f64,
    pub size: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ViewLayout {
    /// One placement per input node, in the order given to `compute`.
    pub placements: Vec<Placement>,
    pub bounds: Bounds,
}

pub struct LayoutInput<'a> {
    pub label: &'a str,
    pub level: usize,
    pub is_start: bool,
}

const BASE_NODE_SPACING: f64 = 100.0;
const BASE_LEVEL_SEPARATION: f64 = 60.0;
const START_NODE_SIZE: f64 = 25.0;
const NODE_SIZE: f64 = 18.0;
const MAX_LABEL_GROWTH: f64 = 64.0;

/// Splits BFS levels into presentation sub-levels of at most `max_per_level`
/// nodes, keeping level order.
pub fn split_levels<T: Clone>(levels: &[Vec<T>], max_per_level: usize) -> Vec<Vec<T>> {
    let max = max_per_level.max(1);
    levels
        .iter()
        .flat_map(|group| group.chunks(max).map(<[T]>::to_vec))
        .collect()
}

/// Hierarchical placement: one row (or column) per level along `rankdir`,
/// spacing grown from the average and widest label.
pub fn compute(nodes: &[LayoutInput<'_>], rankdir: RankDir) -> ViewLayout {
    let widths: Vec<usize> = nodes.iter().map(|n| multiline_width(n.label)).collect();
    let count = widths.len().max(1) as f64;
    let avg = widths.iter().sum::<usize>() as f64 / count;
    let widest = widths.iter().copied().max().unwrap_or(0) as f64;
    let node_spacing = BASE_NODE_SPACING + (avg * 6.0).floor() + (widest * 2.0).floor();
    let level_separation = BASE_LEVEL_SEPARATION + (avg * 3.0).floor() + widest;

    let level_count = nodes.iter().map(|n| n.level + 1).max().unwrap_or(0);
    let mut per_level = vec![0usize; level_count];
    for n in nodes {
        per_level[n.level] += 1;
    }
    let mut seen = vec![0usize; level_count];

    let mut placements = Vec::with_capacity(nodes.len());
    for (n, width) in nodes.iter().zip(&widths) {
        let slot = seen[n.level];
        seen[n.level] += 1;
        let across = (slot as f64 - (per_level[n.level] as f64 - 1.0) / 2.0) * node_spacing;
        let along = n.level as f64 * level_separation;
        let (x, y) = match rankdir {
            RankDir::TopBottom => (across, along),
            RankDir::BottomTop => (across, -along),
            RankDir::LeftRight => (along, across),
            RankDir::RightLeft => (-along, across),
        };
        let base = if n.is_start { START_NODE_SIZE } else { NODE_SIZE };
        let size = base + (*width as f64 * 3.2).floor().min(MAX_LABEL_GROWTH);
        placements.push(Placement {
            level: n.level,
            x,
            y,
            size,
        });
    }

    let bounds = bounds_of(&placements);
    ViewLayout { placements, bounds }
}

fn bounds_of(placements: &[Placement]) -> Bounds {
    if placements.is_empty() {
        return Bounds {
            min_x: 0.0,
            min_y: 0.0,
            max_x: 0.0,
            max_y: 0.0,
        };
    }
    let mut b = Bounds {
        min_x: f64::INFINITY,
        min_y: f64::INFINITY,
        max_x: f64::NEG_INFINITY,
        max_y: f64::NEG_INFINITY,
    };
    for p in placements {
        b.min_x = b.min_x.min(p.x - p.size);
        b.min_y = b.min_y.min(p.y - p.size);
        b.max_x = b.max_x.max(p.x + p.size);
        b.max_y = b.max_y.max(p.y + p.size);
    }
    b
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn input(label: &str, level: usize) -> LayoutInput<'_> {
        LayoutInput {
            label,
            level,
            is_start: level == 0,
        }
    }

    #[test]
    fn split_levels_chunks_wide_levels() {
        let levels = vec![vec![1], vec![2, 3, 4, 5, 6], vec![7]];
        let split = split_levels(&levels, 2);
        assert_eq!(split, vec![vec![1], vec![2, 3], vec![4, 5], vec![6], vec![7]]);
    }

    #[test]
    fn split_levels_keeps_narrow_levels() {
        let levels = vec![vec!["a"], vec!["b", "c"]];
        assert_eq!(split_levels(&levels, 20), levels);
    }

    #[test]
    fn top_bottom_places_levels_on_rows() {
        let nodes = vec![input("a", 0), input("b", 1), input("c", 1)];
        let layout = compute(&nodes, RankDir::TopBottom);
        let p = &layout.placements;
        assert_eq!(p[0].x, 0.0);
        assert_eq!(p[0].y, 0.0);
        assert!(p[1].y > 0.0);
        assert_eq!(p[1].y, p[2].y);
        assert_eq!(p[1].x, -p[2].x, "siblings centered around the axis");
    }

    #[test]
    fn left_right_swaps_axes() {
        let nodes = vec![input("a", 0), input("b", 1)];
        let layout = compute(&nodes, RankDir::LeftRight);
        assert!(layout.placements[1].x > 0.0);
        assert_eq!(layout.placements[1].y, 0.0);
    }

    #[test]
    fn reversed_directions_mirror() {
        let nodes = vec![input("a", 0), input("b", 1)];
        let bt = compute(&nodes, RankDir::BottomTop);
        let rl = compute(&nodes, RankDir::RightLeft);
        assert!(bt.placements[1].y < 0.0);
        assert!(rl.placements[1].x < 0.0);
    }

    #[test]
    fn start_and_long_labels_are_larger() {
        let long = "x".repeat(40);
        let nodes = vec![input("a", 0), input("b", 1), input(&long, 1)];
        let layout = compute(&nodes, RankDir::TopBottom);
        let p = &layout.placements;
        assert_eq!(p[0].size, 25.0 + 3.0);
        assert_eq!(p[1].size, 18.0 + 3.0);
        assert_eq!(p[2].size, 18.0 + 64.0, "growth is capped");
    }

    #[test]
    fn bounds_cover_node_extents() {
        let nodes = vec![input("a", 0), input("b", 1)];
        let layout = compute(&nodes, RankDir::TopBottom);
        let b = layout.bounds;
        assert!(b.min_y < 0.0);
        assert!(b.max_y > layout.placements[1].y);
    }

    #[test]
    fn empty_input_has_zero_bounds() {
        let layout = compute(&[], RankDir::TopBottom);
        assert!(layout.placements.is_empty());
        assert_eq!(layout.bounds.max_x, 0.0);
    }
}
