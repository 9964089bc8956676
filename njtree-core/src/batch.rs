use std::io::Write;
use std::path::Path;
use std::time::Instant;

use crate::error::NjResult;
use crate::phylo::{build_newick, DistanceMatrix};

/// Outcome of one neighbor-joining run in a batch.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchResult {
    pub name: Box<str>,
    pub newick: String,
    pub seconds: f64,
}

/// Runs neighbor-joining over independent inputs, one worker per input when
/// the `parallel` feature is enabled. Each run owns its matrix; results
/// come back in input order.
pub fn run_batch(inputs: &[(Box<str>, DistanceMatrix)]) -> Vec<BatchResult> {
    par_map!(inputs, |(name, dist): &(Box<str>, DistanceMatrix)| {
        let start = Instant::now();
        let newick = build_newick(dist.clone());
        BatchResult {
            name: name.clone(),
            newick,
            seconds: start.elapsed().as_secs_f64(),
        }
    })
}

/// Reads every matrix under `dir` and runs the whole batch.
pub fn run_batch_dir(dir: impl AsRef<Path>) -> NjResult<Vec<BatchResult>> {
    let inputs = crate::io::phylip::read_dir(dir)?;
    Ok(run_batch(&inputs))
}

/// Writes `name,seconds,method` CSV rows for a finished batch.
pub fn write_timing_report<W: Write>(
    writer: W,
    results: &[BatchResult],
    method: &str,
) -> NjResult<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for result in results {
        let seconds = format!("{:.2}", result.seconds);
        csv_writer.write_record([&*result.name, seconds.as_str(), method])?;
    }
    csv_writer.flush()?;
    Ok(())
}
