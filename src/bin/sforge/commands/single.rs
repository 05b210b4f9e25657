use std::io::{self, Write};

use anyhow::{Context, Result, bail};

use shape_forge::io::table::write_records;
use shape_forge::{CancelToken, OpenBabel, ShapeConfig, compute};

use crate::cli::SingleArgs;
use crate::config::{FileConfig, build_shape_config};
use crate::display::{Context as DisplayContext, Progress, print_settings, write_report};
use crate::io::create_output;

pub fn run_single(args: SingleArgs, ctx: DisplayContext) -> Result<()> {
    let smiles = args.smiles.trim();
    if smiles.is_empty() {
        bail!("The SMILES string is empty.\n\nUsage: sforge single '<SMILES>'");
    }

    let file = FileConfig::load(args.common.config.as_deref())?;
    let config = build_shape_config(file.shape, &args.conformers)?;
    let toolkit = OpenBabel::new(args.common.obabel.clone());

    if ctx.interactive {
        print_settings(&config, None);
    }

    let total_steps = if args.common.output.is_some() { 2 } else { 1 };
    let mut progress = Progress::new(ctx.interactive, total_steps);

    progress.step("Computing descriptors");
    let record = compute(smiles, &toolkit, &config, &CancelToken::new())
        .with_context(|| format!("Failed to compute descriptors for '{smiles}'"))?;
    progress.complete_step("Computing descriptors", &compute_substeps(&toolkit, &config));

    match args.common.output.as_deref() {
        Some(path) => {
            progress.step("Writing output");
            let out = create_output(Some(path))?;
            write_records(out, std::slice::from_ref(&record))
                .with_context(|| format!("Failed to write {}", path.display()))?;
            let name = path.file_name().unwrap_or_default().to_string_lossy();
            progress.complete_step("Writing output", &[format!("CSV → {name}")]);
            progress.finish();
        }
        None => {
            progress.finish();
            let mut stdout = io::stdout().lock();
            write_report(&mut stdout, &record)
                .and_then(|()| stdout.flush())
                .context("Failed to write report")?;
        }
    }

    Ok(())
}

fn compute_substeps(toolkit: &OpenBabel, config: &ShapeConfig) -> Vec<String> {
    let c = &config.conformers;
    vec![
        format!("Embed 3D structure ({})", toolkit.program().display()),
        format!(
            "Search conformers (≤ {}, RMSD {:.2} Å, window {:.1})",
            c.max_conformers, c.rmsd_cutoff, c.energy_window
        ),
        "Average globularity and PBF over the ensemble".to_string(),
        if config.topology.include_amides {
            "Count rotatable bonds (amides included)".to_string()
        } else {
            "Count rotatable bonds".to_string()
        },
    ]
}
