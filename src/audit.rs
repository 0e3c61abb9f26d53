use std::collections::HashSet;

use crate::data_loader::*;
use crate::graph_projection::*;
use crate::stats_store::MatchInnings;
use crate::team_totals::*;
use crate::view_context::ViewContext;

// Sanity pass over what the views would show. Recomputes the graph and the team totals
// from the loaded data and checks the structural guarantees against the raw input.
#[derive(Debug, Clone, PartialEq)]
pub struct Check {
    pub name: String,
    pub passed: bool,
    pub detail: String,
}

impl Check {
    fn new(name: &str, passed: bool, detail: String) -> Self {
        Self { name: name.to_string(), passed, detail }
    }
}

pub fn audit_network(snapshot: &Snapshot, ctx: &ViewContext) -> Vec<Check> {
    let graph = project_with_context(&snapshot.players, &snapshot.edges, ctx);
    let node_ids: HashSet<&str> = graph.nodes.iter().map(|n| n.id.as_str()).collect();

    let node_limit = ctx.node_cap.min(snapshot.players.len());
    let dangling = graph
        .links
        .iter()
        .filter(|l| !node_ids.contains(l.source.as_str()) || !node_ids.contains(l.target.as_str()))
        .count();

    // Upstream promises players sorted by pagerank. The projector copes either way, but it's
    // worth knowing when the promise breaks.
    let unsorted = snapshot
        .players
        .windows(2)
        .filter(|w| rank_key(w[0].influence) < rank_key(w[1].influence))
        .count();

    vec![
        Check::new("node cap", graph.nodes.len() <= node_limit,
            format!("{} nodes, limit {}", graph.nodes.len(), node_limit)),
        Check::new("no dangling links", dangling == 0,
            format!("{} of {} links dangling", dangling, graph.links.len())),
        Check::new("unique node ids", node_ids.len() == graph.nodes.len(),
            format!("{} ids for {} nodes", node_ids.len(), graph.nodes.len())),
        Check::new("players sorted by influence", unsorted == 0,
            format!("{unsorted} out-of-order pairs")),
    ]
}

pub fn audit_team_totals(innings: &[MatchInnings], team_filter: Option<&str>) -> Vec<Check> {
    let totals = aggregate(innings, team_filter);
    let selected = team_filter.filter(|t| *t != ALL_TEAMS);

    let input: Vec<&MatchInnings> = innings
        .iter()
        .filter(|i| selected.map_or(true, |t| i.team == t))
        .collect();

    let input_runs: u64 = input.iter().map(|i| i.runs).sum();
    let output_runs: u64 = totals.iter().map(|t| t.runs).sum();
    let output_matches: usize = totals.iter().map(|t| t.matches as usize).sum();
    let sorted = totals.windows(2).all(|w| w[0].runs >= w[1].runs);

    vec![
        Check::new("runs conserved", input_runs == output_runs,
            format!("input {input_runs}, totals {output_runs}")),
        Check::new("innings conserved", input.len() == output_matches,
            format!("input {}, totals {}", input.len(), output_matches)),
        Check::new("sorted by runs", sorted, format!("{} teams", totals.len())),
    ]
}

pub fn report_checks(checks: &[Check]) -> String {
    let mut out = String::new();
    for c in checks {
        out.push_str(&format!("[{}] {:<30} {}\n", if c.passed { " ok " } else { "FAIL" }, c.name, c.detail));
    }
    out
}
