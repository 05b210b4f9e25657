use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result, bail};

use shape_forge::{BatchEvent, BatchSummary, OpenBabel, Toolkit, run_batch};

use crate::cli::BatchArgs;
use crate::config::{FileConfig, build_batch_config, build_shape_config};
use crate::display::{Context as DisplayContext, RowProgress, print_batch_summary, print_settings};
use crate::io::{create_output, open_input, stdin_is_tty};
use crate::util::path::batch_output_for;

pub fn run_batch_command(args: BatchArgs, ctx: DisplayContext) -> Result<()> {
    if args.input.is_none() && stdin_is_tty() {
        bail!(
            "No input table specified and stdin is a terminal.\n\nUsage: sforge batch <FILE> or pipe a CSV table via stdin."
        );
    }

    let file = FileConfig::load(args.common.config.as_deref())?;
    let shape = build_shape_config(file.shape, &args.conformers)?;
    let batch = build_batch_config(file.batch, &args.batch)?;
    let output_path = resolve_output(args.input.as_deref(), args.common.output.clone())?;

    if ctx.interactive {
        print_settings(&shape, Some(&batch));
    }

    let input = open_input(args.input.as_deref())?;
    let output = create_output(output_path.as_deref())?;
    let toolkit: Arc<dyn Toolkit> = Arc::new(OpenBabel::new(args.common.obabel.clone()));

    let mut progress = RowProgress::new(ctx.interactive);
    let summary = run_batch(input, output, toolkit, &shape, &batch, |event| match event {
        BatchEvent::Loaded { rows, workers } => progress.set_rows(*rows, *workers),
        BatchEvent::Dispatched { .. } => {}
        BatchEvent::Completed { .. } | BatchEvent::TimedOut { .. } => progress.row_done(),
        BatchEvent::Failed {
            row,
            smiles,
            reason,
        } => {
            progress.row_done();
            progress.report(&format!("row {}: '{}' dropped: {}", row + 1, smiles, reason));
        }
    })
    .context("Batch run failed")?;

    progress.complete(
        "Processing rows",
        &summary_substeps(&summary, args.input.as_deref(), output_path.as_deref()),
    );
    if ctx.interactive {
        print_batch_summary(&summary);
    }
    progress.finish();

    Ok(())
}

/// Explicit `-o` wins; otherwise a file input gets a sibling CSV and stdin
/// goes to stdout.
fn resolve_output(input: Option<&Path>, output: Option<PathBuf>) -> Result<Option<PathBuf>> {
    let resolved = output.or_else(|| input.map(batch_output_for));

    if let (Some(input), Some(out)) = (input, resolved.as_deref()) {
        if same_file(input, out) {
            bail!(
                "Output path {} would overwrite the input table",
                out.display()
            );
        }
    }

    Ok(resolved)
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

fn summary_substeps(
    summary: &BatchSummary,
    input: Option<&Path>,
    output: Option<&Path>,
) -> Vec<String> {
    let name = |p: Option<&Path>, fallback: &str| {
        p.and_then(Path::file_name)
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| fallback.to_string())
    };

    let mut steps = vec![
        format!("Read {} rows from {}", summary.total, name(input, "stdin")),
        format!("Wrote {} rows to {}", summary.completed, name(output, "stdout")),
    ];
    if summary.dropped() > 0 {
        steps.push(format!(
            "Dropped {} rows ({} failed, {} timed out)",
            summary.dropped(),
            summary.failed,
            summary.timed_out
        ));
    }
    steps
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_defaults_next_to_input() {
        let out = resolve_output(Some(Path::new("data/mols.smi")), None).unwrap();
        assert_eq!(out, Some(PathBuf::from("data/mols.csv")));

        let out = resolve_output(None, None).unwrap();
        assert_eq!(out, None);
    }

    #[test]
    fn explicit_output_equal_to_input_is_refused() {
        let err = resolve_output(Some(Path::new("mols.csv")), Some(PathBuf::from("mols.csv")))
            .unwrap_err();
        assert!(err.to_string().contains("overwrite"));
    }

    #[test]
    fn substeps_mention_dropped_rows_only_when_present() {
        let clean = BatchSummary {
            total: 3,
            completed: 3,
            failed: 0,
            timed_out: 0,
        };
        assert_eq!(summary_substeps(&clean, None, None).len(), 2);

        let lossy = BatchSummary {
            total: 5,
            completed: 3,
            failed: 1,
            timed_out: 1,
        };
        let steps = summary_substeps(&lossy, Some(Path::new("in.csv")), Some(Path::new("out.csv")));
        assert_eq!(steps[0], "Read 5 rows from in.csv");
        assert_eq!(steps[2], "Dropped 2 rows (1 failed, 1 timed out)");
    }
}
