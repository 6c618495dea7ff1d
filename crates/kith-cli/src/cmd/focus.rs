use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use kith_analytics::{Engine, FocusedReport};
use kith_core::EngineConfig;

use crate::output::{OutputMode, pretty_kv, pretty_rule, pretty_section, render_mode, score};
use crate::snapshot::Snapshot;

/// Arguments for `kith focus`.
#[derive(Args, Debug)]
pub struct FocusArgs {
    /// Snapshot JSON file (`-` for stdin).
    pub snapshot: PathBuf,

    /// Contact id at the center of the view.
    pub node_id: String,

    /// Maximum hop distance from the focus contact.
    #[arg(long, short = 'd', default_value_t = 2)]
    pub depth: usize,
}

/// Execute `kith focus`: analyze the whole snapshot, then narrow the
/// report to the focus neighborhood.
///
/// # Errors
///
/// Returns an error if the snapshot cannot be loaded, analysis fails, or
/// the focus contact is unknown.
pub fn run_focus(args: &FocusArgs, config: EngineConfig, output: OutputMode) -> Result<()> {
    let snapshot = Snapshot::load(&args.snapshot)?;
    snapshot.contact(&args.node_id)?;

    let report = Engine::new(config).analyze(snapshot.nodes, snapshot.edges)?;
    let focused = report.focus(&args.node_id, args.depth)?;

    render_mode(output, &focused, render_text, render_pretty)
}

fn render_text(view: &FocusedReport, w: &mut dyn Write) -> io::Result<()> {
    writeln!(w, "hops\tid\tnetwork_value")?;
    for node in &view.nodes {
        writeln!(
            w,
            "{}\t{}\t{}",
            node.hops,
            node.contact.id,
            score(node.metrics.network_value)
        )?;
    }
    for edge in &view.edges {
        writeln!(w, "edge\t{}\t{}\t{}\t{}", edge.id, edge.from, edge.to, edge.strength)?;
    }
    Ok(())
}

fn render_pretty(view: &FocusedReport, w: &mut dyn Write) -> io::Result<()> {
    pretty_section(w, &format!("Focus: {}", view.focus))?;
    pretty_kv(w, "Depth", view.depth.to_string())?;
    pretty_kv(w, "Contacts", view.nodes.len().to_string())?;
    pretty_kv(w, "Relationships", view.edges.len().to_string())?;
    writeln!(w)?;

    writeln!(w, "{:>4}  {:<24} {:>7}", "Hops", "Contact", "Value")?;
    pretty_rule(w)?;
    for node in &view.nodes {
        let name = if node.contact.label.is_empty() {
            &node.contact.id
        } else {
            &node.contact.label
        };
        writeln!(
            w,
            "{:>4}  {:<24} {:>7}",
            node.hops,
            name,
            score(node.metrics.network_value)
        )?;
    }

    if !view.edges.is_empty() {
        writeln!(w)?;
        for edge in &view.edges {
            writeln!(
                w,
                "  {} — {}  ({}, strength {:.1})",
                edge.from, edge.to, edge.kind, edge.strength
            )?;
        }
    }
    Ok(())
}
