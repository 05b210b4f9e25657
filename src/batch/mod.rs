//! Concurrent batch processing of a SMILES table.
//!
//! [`run_batch`] reads a delimited table, computes descriptors for every row
//! on a [`WorkerPool`], and streams the completed rows to an output table in
//! completion order. Rows move through the states of [`RowState`]:
//!
//! ```text
//! Pending ──► Dispatched ──┬──► Completed   (row written)
//!                          ├──► Failed      (reported, row dropped)
//!                          └──► TimedOut    (silent, row dropped)
//! ```
//!
//! A row's timeout starts when a worker picks it up. When it expires, the
//! row's cancellation token is signalled and a fresh worker takes its slot in
//! the pool; a result that arrives later is discarded. Results already
//! waiting in the completion queue always win over an expiry. A failing,
//! panicking or hanging row never aborts the run.

mod error;
mod pool;

pub use error::Error;
pub use pool::{PoolEvent, TaskHandle, TaskOutcome, WorkerPool};

use std::collections::HashMap;
use std::io::{Read, Write};
use std::sync::Arc;
use std::sync::mpsc::RecvTimeoutError;
use std::time::{Duration, Instant};

use log::{debug, info};
use serde::Deserialize;

use crate::io::table::{RowWriter, read_table};
use crate::model::descriptor::DescriptorRecord;
use crate::shape::{self, ShapeConfig, compute};
use crate::toolkit::Toolkit;

/// Columns appended to every output row.
pub const OUTPUT_COLUMNS: [&str; 3] = ["primary_amine", "globularity", "rotatable_bonds"];

/// Settings for a batch run, readable from the `[batch]` table of a TOML file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BatchConfig {
    /// Header of the column holding the SMILES strings.
    #[serde(default = "default_smiles_column")]
    pub smiles_column: String,
    /// Per-row timeout in seconds, measured from when a worker picks the row up.
    #[serde(default = "default_timeout")]
    pub timeout: f64,
    /// Worker count; `0` uses the available parallelism.
    #[serde(default)]
    pub workers: usize,
}

fn default_smiles_column() -> String {
    "canonical_smiles".to_string()
}
fn default_timeout() -> f64 {
    10.0
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            smiles_column: default_smiles_column(),
            timeout: default_timeout(),
            workers: 0,
        }
    }
}

#[derive(Deserialize)]
struct BatchDocument {
    #[serde(default)]
    batch: BatchConfig,
}

impl BatchConfig {
    /// Reads the `[batch]` table of a TOML document; other tables are ignored.
    pub fn from_toml(source: &str) -> Result<Self, shape::Error> {
        let doc: BatchDocument = toml::from_str(source)?;
        doc.batch.validate()?;
        Ok(doc.batch)
    }

    pub fn validate(&self) -> Result<(), shape::Error> {
        if self.smiles_column.is_empty() {
            return Err(shape::Error::invalid_config(
                "batch.smiles_column",
                "must not be empty",
            ));
        }
        if !(self.timeout > 0.0) || Duration::try_from_secs_f64(self.timeout).is_err() {
            return Err(shape::Error::invalid_config(
                "batch.timeout",
                format!("must be a positive number of seconds, got {}", self.timeout),
            ));
        }
        Ok(())
    }

    /// The per-row timeout. Call [`validate`](Self::validate) first.
    pub fn timeout(&self) -> Duration {
        Duration::try_from_secs_f64(self.timeout).unwrap_or(Duration::MAX)
    }

    /// Resolved worker count.
    pub fn worker_count(&self) -> usize {
        if self.workers > 0 {
            self.workers
        } else {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowState {
    Pending,
    Dispatched,
    Completed,
    Failed,
    TimedOut,
}

impl RowState {
    #[inline]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::TimedOut)
    }

    /// Terminal without an output row.
    #[inline]
    pub fn is_dropped(&self) -> bool {
        matches!(self, Self::Failed | Self::TimedOut)
    }
}

/// Progress notifications delivered on the orchestrating thread.
///
/// `row` is the zero-based index of the data row in the input table.
#[derive(Debug)]
pub enum BatchEvent<'a> {
    Loaded { rows: usize, workers: usize },
    Dispatched { row: usize, smiles: &'a str },
    Completed { row: usize, record: &'a DescriptorRecord },
    Failed { row: usize, smiles: &'a str, reason: &'a str },
    TimedOut { row: usize, smiles: &'a str },
}

/// Terminal-state counts of a finished run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub total: usize,
    pub completed: usize,
    pub failed: usize,
    pub timed_out: usize,
}

impl BatchSummary {
    #[inline]
    pub fn dropped(&self) -> usize {
        self.failed + self.timed_out
    }
}

/// Output header and the position of each appended column in it.
///
/// A descriptor column whose name already exists in the input is overwritten
/// in place instead of being duplicated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLayout {
    pub headers: Vec<String>,
    positions: [usize; 3],
}

impl OutputLayout {
    pub fn new(input_headers: &[String]) -> Self {
        let mut headers = input_headers.to_vec();
        let positions = OUTPUT_COLUMNS.map(|name| {
            headers.iter().position(|h| h == name).unwrap_or_else(|| {
                headers.push(name.to_string());
                headers.len() - 1
            })
        });
        Self { headers, positions }
    }

    /// The input row extended with the descriptor values.
    pub fn fill(&self, input: &[String], record: &DescriptorRecord) -> Vec<String> {
        let mut row = input.to_vec();
        row.resize(self.headers.len(), String::new());
        let [amine, glob, rb] = self.positions;
        row[amine] = record.primary_amine.to_string();
        row[glob] = record.globularity.to_string();
        row[rb] = record.rotatable_bonds.to_string();
        row
    }
}

/// Runs the descriptor pipeline over every row of `input` and writes the
/// completed rows to `output`.
///
/// # Errors
///
/// Only run-level failures are returned: an unreadable input table, a missing
/// SMILES column, an invalid configuration, an output write failure, or a
/// worker pool that cannot start. Individual rows never fail the run.
pub fn run_batch<R, W, F>(
    input: R,
    output: W,
    toolkit: Arc<dyn Toolkit>,
    shape_config: &ShapeConfig,
    config: &BatchConfig,
    mut on_event: F,
) -> Result<BatchSummary, Error>
where
    R: Read,
    W: Write,
    F: FnMut(&BatchEvent<'_>),
{
    shape_config.validate()?;
    config.validate()?;

    let table = read_table(input)?;
    let column = table.column_index(&config.smiles_column)?;
    let layout = OutputLayout::new(&table.headers);
    let mut writer = RowWriter::new(output, &layout.headers)?;

    let timeout = config.timeout();
    let shape_config = *shape_config;
    let mut pool = WorkerPool::new(config.worker_count(), move |smiles, cancel| {
        compute(smiles, toolkit.as_ref(), &shape_config, cancel)
    })
    .map_err(Error::Spawn)?;

    let mut summary = BatchSummary {
        total: table.len(),
        ..Default::default()
    };
    on_event(&BatchEvent::Loaded {
        rows: table.len(),
        workers: pool.size(),
    });

    let smiles_of = |row: usize| table.rows[row][column].as_str();
    let handles: Vec<TaskHandle> = (0..table.len())
        .map(|row| pool.submit(row, smiles_of(row).trim()))
        .collect();

    let mut states = vec![RowState::Pending; table.len()];
    let mut deadlines: HashMap<usize, Instant> = HashMap::new();
    let mut remaining = table.len();

    while remaining > 0 {
        // Queued events go first: a result the loop has not read yet never
        // counts as a timeout.
        let event = match pool.try_recv() {
            Some(event) => event,
            None => {
                let now = Instant::now();
                let mut expired: Vec<usize> = deadlines
                    .iter()
                    .filter(|(_, deadline)| **deadline <= now)
                    .map(|(row, _)| *row)
                    .collect();
                expired.sort_unstable();
                for row in expired {
                    deadlines.remove(&row);
                    pool.abandon(&handles[row]).map_err(Error::Spawn)?;
                    states[row] = RowState::TimedOut;
                    summary.timed_out += 1;
                    remaining -= 1;
                    debug!("Row {} timed out after {:?}", row + 1, timeout);
                    on_event(&BatchEvent::TimedOut {
                        row,
                        smiles: smiles_of(row),
                    });
                }
                if remaining == 0 {
                    break;
                }

                match deadlines.values().min() {
                    Some(nearest) => {
                        match pool.recv_timeout(nearest.saturating_duration_since(Instant::now())) {
                            Ok(event) => event,
                            Err(RecvTimeoutError::Timeout) => continue,
                            Err(RecvTimeoutError::Disconnected) => break,
                        }
                    }
                    None => match pool.recv() {
                        Some(event) => event,
                        None => break,
                    },
                }
            }
        };

        match event {
            PoolEvent::Started { id, at } => {
                if states[id] == RowState::Pending {
                    states[id] = RowState::Dispatched;
                    deadlines.insert(id, at + timeout);
                    on_event(&BatchEvent::Dispatched {
                        row: id,
                        smiles: smiles_of(id),
                    });
                }
            }
            PoolEvent::Finished { id, outcome } => {
                if states[id] != RowState::Dispatched {
                    debug!("Discarding late result for row {}", id + 1);
                    continue;
                }
                deadlines.remove(&id);
                remaining -= 1;

                let failure = match outcome {
                    TaskOutcome::Returned(Ok(record)) => {
                        writer.write_row(&layout.fill(&table.rows[id], &record))?;
                        states[id] = RowState::Completed;
                        summary.completed += 1;
                        on_event(&BatchEvent::Completed { row: id, record: &record });
                        None
                    }
                    TaskOutcome::Returned(Err(e)) => Some(e.to_string()),
                    TaskOutcome::Panicked(message) => Some(format!("worker panicked: {message}")),
                };

                if let Some(reason) = failure {
                    states[id] = RowState::Failed;
                    summary.failed += 1;
                    debug!("Row {} ({}) failed: {}", id + 1, smiles_of(id), reason);
                    on_event(&BatchEvent::Failed {
                        row: id,
                        smiles: smiles_of(id),
                        reason: &reason,
                    });
                }
            }
        }
    }

    writer.flush()?;

    for state in states.iter_mut().filter(|s| !s.is_terminal()) {
        *state = RowState::Failed;
        summary.failed += 1;
    }

    info!(
        "Batch finished: {} rows, {} completed, {} failed, {} timed out",
        summary.total, summary.completed, summary.failed, summary.timed_out
    );

    Ok(summary)
}
