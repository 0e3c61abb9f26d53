use crate::data_loader::*;
use crate::graph_projection::*;
use crate::stats_store::*;
use crate::team_totals::TeamTotal;
use crate::util::*;
use crate::view_context::ViewContext;

const LABEL_WIDTH: usize = 24;

// A horizontal bar per row, scaled against the biggest value in the first chart_bars rows
pub fn bar_chart(title: &str, bars: &[(String, f64)], ctx: &ViewContext) -> String {
    let mut out = format!("{title}\n");

    if bars.is_empty() {
        out.push_str("No data\n");
        return out;
    }

    let shown = &bars[..bars.len().min(ctx.chart_bars)];
    let max_value = shown.iter().map(|b| b.1).fold(0.0, f64::max);

    for (label, value) in shown {
        let width = if max_value > 0.0 {
            remap_value_clamped(*value, 0.0, max_value, 0.0, ctx.chart_width as f64).round() as usize
        } else {
            0
        };

        out.push_str(&format!("{0:<1$} {2:>10} {3}\n",
            truncate_label(label, LABEL_WIDTH),
            LABEL_WIDTH,
            format_number(*value),
            "█".repeat(width),
        ));
    }
    out
}

// Plain column table. First table_rows rows only, blank or missing cells show as N/A.
pub fn stats_table(headers: &[&str], rows: &[Vec<String>], ctx: &ViewContext) -> String {
    let shown: Vec<Vec<&str>> = rows
        .iter()
        .take(ctx.table_rows)
        .map(|row| {
            (0..headers.len())
                .map(|i| row.get(i).map(String::as_str).filter(|c| !c.is_empty()).unwrap_or("N/A"))
                .collect()
        })
        .collect();

    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in &shown {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let mut out = String::new();
    let header: Vec<String> = headers.iter().zip(&widths).map(|(h, &w)| format!("{h:<w$}")).collect();
    out.push_str(&format!("| {} |\n", header.join(" | ")));

    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    out.push_str(&format!("|-{}-|\n", rule.join("-|-")));

    for row in &shown {
        let cells: Vec<String> = row.iter().zip(&widths).map(|(c, &w)| format!("{c:<w$}")).collect();
        out.push_str(&format!("| {} |\n", cells.join(" | ")));
    }
    out
}

pub fn overview_report(metrics: &OverallMetrics, ctx: &ViewContext) -> String {
    let mut out = String::new();

    out.push_str("Cricket Player Network Analysis\n");
    out.push_str(&format!("{} players | {} interactions | {:.2}M deliveries analyzed\n\n",
        format_thousands(metrics.total_players),
        format_thousands(metrics.total_interactions),
        metrics.total_deliveries_analyzed as f64 / 1_000_000.0,
    ));

    out.push_str("Most Active Batters (unique bowlers faced)\n");
    for (i, b) in metrics.most_active_batters.iter().take(ctx.leaderboard_len).enumerate() {
        out.push_str(&format!("{0:3}. {1:<30} {2:>5} bowlers\n", i + 1, b.player, b.bowlers_faced));
    }

    out.push_str("\nMost Active Bowlers (unique batters bowled to)\n");
    for (i, b) in metrics.most_active_bowlers.iter().take(ctx.leaderboard_len).enumerate() {
        out.push_str(&format!("{0:3}. {1:<30} {2:>5} batters\n", i + 1, b.player, b.batters_bowled_to));
    }
    out
}

pub fn pagerank_report(metrics: &OverallMetrics, ctx: &ViewContext) -> String {
    let top: Vec<&PagerankEntry> = metrics.top_players_by_pagerank.iter().take(ctx.pagerank_len).collect();
    let bars: Vec<(String, f64)> = top.iter().map(|p| (p.player.clone(), p.score)).collect();

    let mut out = bar_chart("Top Players by Network Influence", &bars, ctx);
    out.push('\n');
    for (i, p) in top.iter().enumerate() {
        out.push_str(&format!("#{0:<3} {1:<30} {2:.3}\n", i + 1, p.player, p.score));
    }
    out
}

pub fn network_report(graph: &ProjectedGraph) -> String {
    let mut out = String::new();

    out.push_str("Player Interaction Network\n");
    out.push_str(&format!("{} nodes, {} links\n\n", graph.nodes.len(), graph.links.len()));

    out.push_str("High influence:\n");
    for n in graph.high_influence() {
        out.push_str(&format!("  {0:<30} size {1:8.1}\n", n.id, n.size));
    }

    out.push_str("\nStrongest links:\n");
    let mut links: Vec<&GraphLink> = graph.links.iter().collect();
    links.sort_by(|a, b| b.weight.total_cmp(&a.weight));
    for l in links.iter().take(10) {
        out.push_str(&format!("  {0:<24} -> {1:<24} {2:6.2}\n", l.source, l.target, l.weight));
    }
    out
}

pub fn matchups_report(matchups: &[AsymmetricMatchup], ctx: &ViewContext) -> String {
    let mut out = String::from("Asymmetric Batter-Bowler Matchups\n");

    for m in matchups.iter().take(ctx.matchup_len) {
        out.push_str(&format!("{0} vs {1}: {2} runs off {3} balls, {4} dismissals, SR {5:.1}, dominance {6:.2}\n",
            m.batter,
            m.bowler,
            m.runs,
            m.balls,
            m.dismissals,
            m.strike_rate,
            m.dominance,
        ));
    }
    out
}

pub fn batters_report(rows: &[BatterStats], ctx: &ViewContext) -> String {
    let bars: Vec<(String, f64)> = rows.iter().map(|r| (r.batter.clone(), r.total_runs as f64)).collect();

    let table: Vec<Vec<String>> = rows
        .iter()
        .map(|r| vec![
            r.batter.clone(),
            format_thousands(r.matches_played as u64),
            format_thousands(r.total_runs),
            format_optional(r.batting_average),
            format_optional(r.strike_rate),
            r.centuries.to_string(),
            r.half_centuries.to_string(),
        ])
        .collect();

    let mut out = bar_chart("Top Run Scorers", &bars, ctx);
    out.push('\n');
    out.push_str(&stats_table(&["Player", "Matches", "Runs", "Average", "Strike Rate", "100s", "50s"], &table, ctx));
    out
}

pub fn bowlers_report(rows: &[BowlerStats], ctx: &ViewContext) -> String {
    let bars: Vec<(String, f64)> = rows.iter().map(|r| (r.bowler.clone(), r.wickets_taken as f64)).collect();

    let table: Vec<Vec<String>> = rows
        .iter()
        .map(|r| vec![
            r.bowler.clone(),
            format_thousands(r.matches_played as u64),
            format_thousands(r.wickets_taken as u64),
            format_optional(r.bowling_average),
            format_optional(r.economy_rate),
            format_optional(r.strike_rate),
            r.five_wickets.to_string(),
        ])
        .collect();

    let mut out = bar_chart("Top Wicket Takers", &bars, ctx);
    out.push('\n');
    out.push_str(&stats_table(&["Player", "Matches", "Wickets", "Average", "Economy", "Strike Rate", "5W"], &table, ctx));
    out
}

pub fn matches_report(innings: &[MatchInnings], totals: &[TeamTotal], teams: &[String], ctx: &ViewContext) -> String {
    let mut out = format!("Teams: All, {}\n\n", teams.join(", "));

    let bars: Vec<(String, f64)> = totals.iter().map(|t| (t.team.clone(), t.runs as f64)).collect();
    out.push_str(&bar_chart("Total Runs by Team", &bars, ctx));
    out.push('\n');

    let table: Vec<Vec<String>> = innings
        .iter()
        .map(|m| vec![
            m.match_date.clone(),
            m.team.clone(),
            m.venue.clone(),
            format_thousands(m.runs),
            m.wickets.to_string(),
            format_number(m.overs),
        ])
        .collect();

    out.push_str(&stats_table(&["Date", "Team", "Venue", "Score", "Wickets", "Overs"], &table, ctx));
    out
}
