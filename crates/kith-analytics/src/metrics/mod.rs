//! Centrality metrics for the contact graph.
//!
//! # Overview
//!
//! Four independent per-contact scores, all computed on the same
//! [`ContactGraph`] snapshot treated as undirected and weighted by
//! relationship strength:
//!
//! - **Degree centrality** (`degree`): how many direct relationships?
//! - **Closeness centrality** (`closeness`): how near is everyone else?
//! - **Betweenness centrality** (`betweenness`): which contacts broker
//!   introductions between otherwise distant groups?
//! - **PageRank** (`pagerank`): who is tied strongly to other important
//!   contacts?
//!
//! Every function returns a `Vec<f64>` in node order (see
//! [`ContactGraph::nodes`]); [`ContactGraph::scores_by_id`] maps it to ids.
//!
//! # Determinism
//!
//! Per-source work in closeness and betweenness may run on rayon. Sources
//! are grouped into fixed-size chunks whose partial sums are merged in
//! chunk order, so the parallel and sequential paths perform identical
//! floating-point operations and produce bit-identical results.
//!
//! ```rust,ignore
//! use kith_analytics::metrics::{betweenness, closeness, degree, pagerank};
//!
//! let cancel = CancelFlag::new();
//! let dc = degree::degree_centrality(&cg);
//! let cc = closeness::closeness_centrality(&cg, true, &cancel)?;
//! let bc = betweenness::betweenness_centrality(&cg, true, &cancel)?;
//! let pr = pagerank::pagerank(&cg, &PageRankConfig::default(), &cancel)?;
//! ```

pub mod betweenness;
pub mod closeness;
pub mod degree;
pub mod pagerank;
pub(crate) mod paths;

use kith_core::CancelFlag;
use kith_core::error::EngineError;
use rayon::prelude::*;

/// Sources per accumulation chunk. Fixed so chunking never depends on the
/// thread count.
pub(crate) const SOURCE_CHUNK: usize = 32;

/// Chunk accumulators held in memory at once before they are folded into
/// the total. Bounds peak memory at `CHUNK_BATCH * n` floats.
pub(crate) const CHUNK_BATCH: usize = 16;

/// Run `visit(source, acc)` for every source in `0..n` and sum the
/// per-chunk accumulators in chunk order.
///
/// Chunks are evaluated [`CHUNK_BATCH`] at a time; each batch is folded
/// into the total before the next starts. The fold order is always chunk
/// order, so the result does not depend on `parallel` or on batching.
///
/// The cancel flag is checked before each source.
pub(crate) fn accumulate_over_sources<F>(
    n: usize,
    parallel: bool,
    cancel: &CancelFlag,
    visit: F,
) -> Result<Vec<f64>, EngineError>
where
    F: Fn(usize, &mut [f64]) + Sync,
{
    let chunk_count = n.div_ceil(SOURCE_CHUNK);
    let run_chunk = |chunk: usize| -> Result<Vec<f64>, EngineError> {
        let mut acc = vec![0.0_f64; n];
        let start = chunk * SOURCE_CHUNK;
        for source in start..(start + SOURCE_CHUNK).min(n) {
            cancel.check()?;
            visit(source, &mut acc);
        }
        Ok(acc)
    };

    let mut total = vec![0.0_f64; n];
    let mut batch_start = 0;
    while batch_start < chunk_count {
        let batch = batch_start..(batch_start + CHUNK_BATCH).min(chunk_count);
        let partials: Vec<Vec<f64>> = if parallel {
            batch
                .into_par_iter()
                .map(&run_chunk)
                .collect::<Result<_, _>>()?
        } else {
            batch.map(&run_chunk).collect::<Result<_, _>>()?
        };

        for partial in &partials {
            for (t, p) in total.iter_mut().zip(partial) {
                *t += p;
            }
        }
        batch_start += CHUNK_BATCH;
    }
    Ok(total)
}

/// Compute `score(source)` for every source in `0..n`, in order.
pub(crate) fn map_over_sources<F>(
    n: usize,
    parallel: bool,
    cancel: &CancelFlag,
    score: F,
) -> Result<Vec<f64>, EngineError>
where
    F: Fn(usize) -> f64 + Sync,
{
    let run = |source: usize| -> Result<f64, EngineError> {
        cancel.check()?;
        Ok(score(source))
    };

    if parallel {
        (0..n).into_par_iter().map(run).collect()
    } else {
        (0..n).map(run).collect()
    }
}

#[allow(clippy::cast_precision_loss)]
pub(crate) fn count_f64(count: usize) -> f64 {
    count as f64
}
