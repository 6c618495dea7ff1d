use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use kith_analytics::Engine;
use kith_analytics::estimate::should_create_edge;
use kith_core::EngineConfig;
use serde::Serialize;

use crate::output::{OutputMode, pretty_kv, pretty_section, render_mode};
use crate::snapshot::Snapshot;

/// Arguments for `kith estimate`.
#[derive(Args, Debug)]
pub struct EstimateArgs {
    /// Snapshot JSON file (`-` for stdin).
    pub snapshot: PathBuf,

    /// First contact id.
    pub a: String,

    /// Second contact id.
    pub b: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct EstimateOutput {
    a: String,
    b: String,
    score: f64,
    threshold: f64,
    would_create: bool,
    /// Id of an explicit edge already joining the pair, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    explicit_edge: Option<String>,
}

/// Execute `kith estimate`.
///
/// # Errors
///
/// Returns an error if the snapshot cannot be loaded or either contact is
/// unknown.
pub fn run_estimate(args: &EstimateArgs, config: EngineConfig, output: OutputMode) -> Result<()> {
    let snapshot = Snapshot::load(&args.snapshot)?;
    let a = snapshot.contact(&args.a)?;
    let b = snapshot.contact(&args.b)?;

    let threshold = config.estimator.threshold;
    let score = Engine::new(config).estimate(a, b);
    let explicit_edge = snapshot
        .edges
        .iter()
        .find(|e| {
            (e.from == a.id && e.to == b.id) || (e.from == b.id && e.to == a.id)
        })
        .map(|e| e.id.clone());

    let view = EstimateOutput {
        a: a.id.clone(),
        b: b.id.clone(),
        score,
        threshold,
        would_create: explicit_edge.is_none() && should_create_edge(score, threshold),
        explicit_edge,
    };

    render_mode(output, &view, render_text, render_pretty)
}

fn render_text(view: &EstimateOutput, w: &mut dyn Write) -> io::Result<()> {
    writeln!(
        w,
        "{}\t{}\t{:.1}\t{}",
        view.a,
        view.b,
        view.score,
        if view.would_create { "create" } else { "skip" }
    )
}

fn render_pretty(view: &EstimateOutput, w: &mut dyn Write) -> io::Result<()> {
    pretty_section(w, &format!("{} ↔ {}", view.a, view.b))?;
    pretty_kv(w, "Score", format!("{:.1} / 100", view.score))?;
    pretty_kv(w, "Threshold", format!("{:.1}", view.threshold))?;
    let verdict = match &view.explicit_edge {
        Some(id) => format!("no, explicit edge {id} exists"),
        None if view.would_create => format!("yes, strength {:.1}", view.score / 10.0),
        None => "no, below threshold".to_string(),
    };
    pretty_kv(w, "Infer edge", verdict)
}
