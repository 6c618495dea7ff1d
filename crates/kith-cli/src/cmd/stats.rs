use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use kith_analytics::graph::build::isolated_contacts;
use kith_analytics::{ContactGraph, GraphStats};
use serde::Serialize;

use crate::output::{OutputMode, pretty_kv, pretty_section, render_mode};
use crate::snapshot::Snapshot;

/// Arguments for `kith stats`.
#[derive(Args, Debug)]
pub struct StatsArgs {
    /// Snapshot JSON file (`-` for stdin).
    pub snapshot: PathBuf,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct StatsOutput {
    content_hash: String,
    #[serde(flatten)]
    stats: GraphStats,
    isolated: Vec<String>,
}

/// Execute `kith stats`: validate the snapshot and summarize its explicit
/// graph. No inference or metrics are run.
///
/// # Errors
///
/// Returns an error if the snapshot cannot be loaded or is not a valid
/// graph.
pub fn run_stats(args: &StatsArgs, output: OutputMode) -> Result<()> {
    let snapshot = Snapshot::load(&args.snapshot)?;
    let cg = ContactGraph::build(snapshot.nodes, snapshot.edges)?;

    let view = StatsOutput {
        content_hash: cg.content_hash().to_string(),
        stats: GraphStats::from_graph(&cg),
        isolated: isolated_contacts(&cg).into_iter().map(str::to_string).collect(),
    };

    render_mode(output, &view, render_text, render_pretty)
}

fn render_text(view: &StatsOutput, w: &mut dyn Write) -> io::Result<()> {
    let s = &view.stats;
    writeln!(w, "nodes\t{}", s.node_count)?;
    writeln!(w, "edges\t{}", s.edge_count)?;
    writeln!(w, "density\t{:.6}", s.density)?;
    writeln!(w, "components\t{}", s.component_count)?;
    writeln!(w, "isolated\t{}", s.isolated_node_count)?;
    writeln!(w, "max_degree\t{}", s.max_degree)?;
    writeln!(w, "mean_strength\t{:.3}", s.mean_strength)?;
    writeln!(w, "hash\t{}", view.content_hash)
}

fn render_pretty(view: &StatsOutput, w: &mut dyn Write) -> io::Result<()> {
    let s = &view.stats;
    pretty_section(w, "Graph statistics")?;
    pretty_kv(w, "Contacts", s.node_count.to_string())?;
    pretty_kv(w, "Relationships", s.edge_count.to_string())?;
    pretty_kv(w, "Density", format!("{:.4}", s.density))?;
    pretty_kv(w, "Components", s.component_count.to_string())?;
    pretty_kv(w, "Max degree", s.max_degree.to_string())?;
    pretty_kv(w, "Mean strength", format!("{:.2}", s.mean_strength))?;
    if view.isolated.is_empty() {
        pretty_kv(w, "Isolated", "none")?;
    } else {
        pretty_kv(
            w,
            "Isolated",
            format!("{} ({})", view.isolated.len(), view.isolated.join(", ")),
        )?;
    }
    pretty_kv(w, "Hash", &view.content_hash)
}
