use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Result;
use chrono::{DateTime, Utc};
use clap::Args;
use kith_analytics::{AnalysisReport, Engine, GraphStats};
use kith_core::EngineConfig;
use kith_core::config::InferenceMode;
use kith_core::model::NodeMetrics;
use serde::Serialize;

use crate::output::{OutputMode, pretty_kv, pretty_rule, pretty_section, render_mode, score};
use crate::snapshot::Snapshot;

/// Arguments for `kith analyze`.
#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Snapshot JSON file (`-` for stdin).
    pub snapshot: PathBuf,

    /// Show only the N highest-value contacts.
    #[arg(long, value_name = "N")]
    pub top: Option<usize>,

    /// Skip relationship inference regardless of config.
    #[arg(long)]
    pub no_infer: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RankedContact<'a> {
    rank: usize,
    id: &'a str,
    label: &'a str,
    metrics: &'a NodeMetrics,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AnalyzeOutput<'a> {
    analyzed_at: DateTime<Utc>,
    content_hash: &'a str,
    stats: &'a GraphStats,
    inferred_edge_count: usize,
    page_rank_iterations: usize,
    page_rank_converged: bool,
    contacts: Vec<RankedContact<'a>>,
}

impl<'a> AnalyzeOutput<'a> {
    fn new(report: &'a AnalysisReport, top: Option<usize>) -> Self {
        let ranked = report.ranked();
        let limit = top.unwrap_or(ranked.len());
        let contacts = ranked
            .into_iter()
            .take(limit)
            .enumerate()
            .map(|(i, node)| RankedContact {
                rank: i + 1,
                id: &node.contact.id,
                label: &node.contact.label,
                metrics: &node.metrics,
            })
            .collect();

        Self {
            analyzed_at: report.analyzed_at,
            content_hash: &report.content_hash,
            stats: &report.stats,
            inferred_edge_count: report.inferred_edge_count,
            page_rank_iterations: report.page_rank_iterations,
            page_rank_converged: report.page_rank_converged,
            contacts,
        }
    }
}

/// Execute `kith analyze`.
///
/// # Errors
///
/// Returns an error if the snapshot cannot be loaded or analysis fails.
pub fn run_analyze(args: &AnalyzeArgs, mut config: EngineConfig, output: OutputMode) -> Result<()> {
    if args.no_infer {
        config.inference.mode = InferenceMode::Never;
    }

    let snapshot = Snapshot::load(&args.snapshot)?;
    let report = Engine::new(config).analyze(snapshot.nodes, snapshot.edges)?;
    let view = AnalyzeOutput::new(&report, args.top);

    render_mode(output, &view, render_text, render_pretty)
}

fn render_text(view: &AnalyzeOutput<'_>, w: &mut dyn Write) -> io::Result<()> {
    writeln!(w, "rank\tid\tnetwork_value\tdegree\tbetweenness\tcloseness\tpage_rank")?;
    for c in &view.contacts {
        let m = c.metrics;
        writeln!(
            w,
            "{}\t{}\t{}\t{}\t{}\t{}\t{}",
            c.rank,
            c.id,
            score(m.network_value),
            score(m.degree),
            score(m.betweenness),
            score(m.closeness),
            score(m.page_rank),
        )?;
    }
    Ok(())
}

fn render_pretty(view: &AnalyzeOutput<'_>, w: &mut dyn Write) -> io::Result<()> {
    pretty_section(w, "Network analysis")?;
    pretty_kv(w, "Contacts", view.stats.node_count.to_string())?;
    pretty_kv(
        w,
        "Relationships",
        format!("{} ({} inferred)", view.stats.edge_count, view.inferred_edge_count),
    )?;
    pretty_kv(w, "Density", format!("{:.4}", view.stats.density))?;
    pretty_kv(w, "Components", view.stats.component_count.to_string())?;
    pretty_kv(
        w,
        "PageRank",
        if view.page_rank_converged {
            format!("converged in {} iterations", view.page_rank_iterations)
        } else {
            format!("stopped after {} iterations", view.page_rank_iterations)
        },
    )?;
    pretty_kv(w, "Hash", view.content_hash)?;
    writeln!(w)?;

    if view.contacts.is_empty() {
        writeln!(w, "No contacts.")?;
        return Ok(());
    }

    writeln!(
        w,
        "{:>4}  {:<24} {:>7} {:>7} {:>7} {:>7} {:>7}",
        "#", "Contact", "Value", "Degree", "Betw.", "Close.", "PR"
    )?;
    pretty_rule(w)?;
    for c in &view.contacts {
        let m = c.metrics;
        let name = if c.label.is_empty() { c.id } else { c.label };
        writeln!(
            w,
            "{:>4}  {:<24} {:>7} {:>7} {:>7} {:>7} {:>7}",
            c.rank,
            truncate(name, 24),
            score(m.network_value),
            score(m.degree),
            score(m.betweenness),
            score(m.closeness),
            score(m.page_rank),
        )?;
    }
    Ok(())
}

fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        s.to_string()
    } else {
        let mut out: String = s.chars().take(width.saturating_sub(1)).collect();
        out.push('…');
        out
    }
}
