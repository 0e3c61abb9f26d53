mod audit;
mod data_loader;
mod graph_projection;
mod logger;
mod report;
mod stats_store;
mod team_totals;
mod util;
mod view_context;

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use audit::*;
use data_loader::*;
use graph_projection::*;
use report::*;
use stats_store::*;
use team_totals::*;
use view_context::ViewContext;

/*
    Everything heavy (pagerank, dominance, the per-player aggregates) is computed upstream.
    This just loads the snapshot and the stats tables from --data and renders them.
    Tweak caps and thresholds through a JSON file passed with --config.
*/

#[derive(Debug, Parser)]
#[command(author, version, about = "Cricket player network and stats viewer")]
struct Args {
    /// Directory with the JSON snapshot and the CSV stats tables
    #[arg(long, global = true, default_value = "./data")]
    data: PathBuf,

    /// JSON file overriding view settings
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Totals and most active batters/bowlers
    Overview,
    /// Project the player network for force-directed rendering
    Network {
        /// Write the projected graph here as JSON
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Top players by influence
    Pagerank,
    /// Batters who dominated quality bowlers
    Matchups,
    /// Batter stats, filtered by minimum runs
    Batters {
        #[arg(long, default_value_t = 0)]
        min_runs: u64,
    },
    /// Bowler stats, filtered by minimum wickets
    Bowlers {
        #[arg(long, default_value_t = 0)]
        min_wickets: u32,
    },
    /// Innings and total runs per team
    Matches {
        #[arg(long, default_value = ALL_TEAMS)]
        team: String,
    },
    /// Check the derived views against the loaded data
    Audit,
}

fn main() -> Result<()> {
    let args = Args::parse();
    logger::init(logger::level_for(args.verbose, args.quiet));

    let ctx = ViewContext::load(args.config.as_deref())?;
    let store = StatsStore::new(&args.data);

    match args.command {
        Command::Overview => {
            let snapshot = load_snapshot_or_empty(&args.data);
            print!("{}", overview_report(&snapshot.metrics, &ctx));
        }
        Command::Network { out } => {
            let snapshot = load_snapshot_or_empty(&args.data);
            let graph = project_with_context(&snapshot.players, &snapshot.edges, &ctx);

            if let Some(path) = out {
                let json = serde_json::to_string_pretty(&graph.to_force_graph())?;
                fs::write(&path, json)
                    .with_context(|| format!("failed to write graph to {}", path.display()))?;
                log::info!("wrote {} nodes and {} links to {}", graph.nodes.len(), graph.links.len(), path.display());
            }

            print!("{}", network_report(&graph));
        }
        Command::Pagerank => {
            let snapshot = load_snapshot_or_empty(&args.data);
            print!("{}", pagerank_report(&snapshot.metrics, &ctx));
        }
        Command::Matchups => {
            let snapshot = load_snapshot_or_empty(&args.data);
            print!("{}", matchups_report(&snapshot.matchups, &ctx));
        }
        Command::Batters { min_runs } => {
            let query = Query::ordered_by("total_runs").at_least(min_runs as f64).limit(ctx.stats_limit);
            let rows: Vec<BatterStats> = store.query(&query);
            print!("{}", batters_report(&rows, &ctx));
        }
        Command::Bowlers { min_wickets } => {
            let query = Query::ordered_by("wickets_taken").at_least(min_wickets as f64).limit(ctx.stats_limit);
            let rows: Vec<BowlerStats> = store.query(&query);
            print!("{}", bowlers_report(&rows, &ctx));
        }
        Command::Matches { team } => {
            let view = matches_view(&store, &team);
            print!("{}", matches_report(&view.innings, &view.totals, &view.teams, &ctx));
        }
        Command::Audit => {
            let snapshot = load_snapshot_or_empty(&args.data);
            let innings: Vec<MatchInnings> = store.load_or_empty();

            let mut checks = audit_network(&snapshot, &ctx);
            checks.extend(audit_team_totals(&innings, Some(ALL_TEAMS)));
            for team in team_names(&innings) {
                checks.extend(audit_team_totals(&innings, Some(team.as_str())));
            }

            print!("{}", report_checks(&checks));

            let failed = checks.iter().filter(|c| !c.passed).count();
            if failed > 0 {
                log::warn!("{failed} of {} checks failed", checks.len());
            }
        }
    }

    Ok(())
}
