use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

// All the knobs for the views live here. Every stage takes a &ViewContext so you can
// tweak caps and thresholds without touching the code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewContext {
    // Network graph
    pub node_cap: usize,
    pub edge_cap: usize,
    pub size_scale: f64,
    pub influence_threshold: f64,   // Strictly above this counts as high influence

    // Leaderboards
    pub leaderboard_len: usize,
    pub pagerank_len: usize,
    pub matchup_len: usize,

    // Store queries and tables
    pub stats_limit: usize,
    pub table_rows: usize,

    pub chart_bars: usize,
    pub chart_width: usize,
}

impl Default for ViewContext {
    fn default() -> Self {
        Self {
            node_cap: 100,
            edge_cap: 300,
            size_scale: 500.0,
            influence_threshold: 0.15,

            leaderboard_len: 10,
            pagerank_len: 20,
            matchup_len: 20,

            stats_limit: 50,
            table_rows: 20,

            chart_bars: 10,
            chart_width: 40,
        }
    }
}

impl ViewContext {
    // Reads overrides from a JSON file. Keys that are left out keep their default.
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;

        serde_json::from_str(&raw)
            .with_context(|| format!("invalid config file {}", path.display()))
    }

    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::from_file(p),
            None => Ok(Self::default()),
        }
    }
}
