use std::collections::HashSet;

use serde::Serialize;

use crate::data_loader::*;
use crate::view_context::ViewContext;

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NodeCategory {
    HighInfluence,
    Standard,
}

impl NodeCategory {
    pub fn color(self) -> &'static str {
        match self {
            Self::HighInfluence => "#3B82F6",
            Self::Standard => "#6B7280",
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct GraphNode {
    pub id: String,
    pub size: f64,
    pub category: NodeCategory,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct GraphLink {
    pub source: String,
    pub target: String,
    pub weight: f64,
}

#[derive(Serialize, Debug, Clone, Default, PartialEq)]
pub struct ProjectedGraph {
    pub nodes: Vec<GraphNode>,
    pub links: Vec<GraphLink>,
}

impl ProjectedGraph {
    pub fn high_influence(&self) -> impl Iterator<Item = &GraphNode> {
        self.nodes.iter().filter(|n| n.category == NodeCategory::HighInfluence)
    }
}

// The shape react-force-graph style renderers take: `val` for size, `value` for link weight
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ForceGraphNode<'a> {
    pub id: &'a str,
    pub name: &'a str,
    pub val: f64,
    pub category: NodeCategory,
    pub color: &'static str,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ForceGraphLink<'a> {
    pub source: &'a str,
    pub target: &'a str,
    pub value: f64,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ForceGraphData<'a> {
    pub nodes: Vec<ForceGraphNode<'a>>,
    pub links: Vec<ForceGraphLink<'a>>,
}

impl ProjectedGraph {
    pub fn to_force_graph(&self) -> ForceGraphData<'_> {
        ForceGraphData {
            nodes: self
                .nodes
                .iter()
                .map(|n| ForceGraphNode {
                    id: &n.id,
                    name: &n.id,
                    val: n.size,
                    category: n.category,
                    color: n.category.color(),
                })
                .collect(),
            links: self
                .links
                .iter()
                .map(|l| ForceGraphLink { source: &l.source, target: &l.target, value: l.weight })
                .collect(),
        }
    }
}

pub fn project_with_context(rankings: &[PlayerRanking], edges: &[RelationshipEdge], ctx: &ViewContext) -> ProjectedGraph {
    project(
        rankings,
        edges,
        ctx.node_cap,
        ctx.edge_cap,
        ctx.size_scale,
        ctx.influence_threshold,
    )
}

// Builds the force-graph input: top node_cap players, and whichever of the first edge_cap edges
// connect two of them.
//
// Note that the edge cap is a plain prefix of the input order, not the heaviest edges. edges.json
// is ordered by balls faced upstream, so this is what the dashboard has always shown.
pub fn project(
    rankings: &[PlayerRanking],
    edges: &[RelationshipEdge],
    node_cap: usize,
    edge_cap: usize,
    size_scale: f64,
    influence_threshold: f64,
) -> ProjectedGraph {
    let mut ranked: Vec<&PlayerRanking> = rankings.iter().collect();

    // Stable, so an already sorted list keeps its order on ties
    ranked.sort_by(|a, b| rank_key(b.influence).total_cmp(&rank_key(a.influence)));
    ranked.truncate(node_cap);

    let retained: HashSet<&str> = ranked.iter().map(|p| p.id.as_str()).collect();

    let nodes: Vec<GraphNode> = ranked
        .iter()
        .map(|p| GraphNode {
            id: p.id.clone(),
            size: p.influence * size_scale,
            category: if p.influence > influence_threshold {
                NodeCategory::HighInfluence
            } else {
                NodeCategory::Standard
            },
        })
        .collect();

    let capped_edges = &edges[..edges.len().min(edge_cap)];

    let links: Vec<GraphLink> = capped_edges
        .iter()
        .filter(|e| retained.contains(e.source.as_str()) && retained.contains(e.target.as_str()))
        .map(|e| GraphLink {
            source: e.source.clone(),
            target: e.target.clone(),
            weight: e.dominance,
        })
        .collect();

    log::debug!(
        "projected {} of {} players, {} of {} capped edges survived",
        nodes.len(),
        rankings.len(),
        links.len(),
        capped_edges.len(),
    );

    ProjectedGraph { nodes, links }
}

// NaN goes to the bottom instead of the top, where total_cmp would otherwise put it
pub(crate) fn rank_key(influence: f64) -> f64 {
    if influence.is_nan() { f64::NEG_INFINITY } else { influence }
}
