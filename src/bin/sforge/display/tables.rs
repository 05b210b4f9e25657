use std::io::{self, Write};

use shape_forge::{BatchConfig, BatchSummary, DescriptorRecord, ShapeConfig};

use crate::util::text::truncate;

const INDENT: &str = "      ";

const BOX_INNER_WIDTH: usize = 62;
const SAFE_TABLE_WIDTH: usize = BOX_INNER_WIDTH - INDENT.len();

/// Plain-text report with the tab-aligned layout downstream scripts parse.
pub fn write_report(out: &mut impl Write, record: &DescriptorRecord) -> io::Result<()> {
    writeln!(out, "Properties for {}", record.source)?;
    writeln!(out, "{}", "-".repeat(26))?;
    writeln!(out, "Mol. Wt.:\t{:.6}", record.molecular_weight)?;
    writeln!(out, "Formula:\t{}", record.formula)?;
    writeln!(out, "RB:\t\t{}", record.rotatable_bonds)?;
    writeln!(out, "Glob:\t\t{:.6}", record.globularity)?;
    writeln!(out, "PBF:\t\t{:.6}", record.pbf)?;
    writeln!(out, "Amine:\t\t{}", record.primary_amine)?;
    Ok(())
}

pub fn print_settings(shape: &ShapeConfig, batch: Option<&BatchConfig>) {
    let mut out = io::stderr().lock();

    let c = &shape.conformers;
    let mut rows = vec![
        ("Max Conformers", c.max_conformers.to_string()),
        ("RMSD Cutoff", format!("{:.2} Å", c.rmsd_cutoff)),
        ("Energy Window", format!("{:.1} kcal/mol", c.energy_window)),
        (
            "Amide Rotors",
            if shape.topology.include_amides { "counted" } else { "excluded" }.to_string(),
        ),
    ];

    if let Some(batch) = batch {
        rows.push(("SMILES Column", batch.smiles_column.clone()));
        rows.push(("Timeout", format!("{:.1} s", batch.timeout)));
        rows.push(("Workers", batch.worker_count().to_string()));
    }

    print_kv_table(&mut out, "Settings", &rows);
}

pub fn print_batch_summary(summary: &BatchSummary) {
    let mut out = io::stderr().lock();

    let pct = |n: usize| {
        if summary.total == 0 {
            0.0
        } else {
            100.0 * n as f64 / summary.total as f64
        }
    };

    let rows = [
        ("Rows Read", summary.total.to_string()),
        (
            "Completed",
            format!("{} ({:.1}%)", summary.completed, pct(summary.completed)),
        ),
        ("Failed", format!("{} ({:.1}%)", summary.failed, pct(summary.failed))),
        (
            "Timed Out",
            format!("{} ({:.1}%)", summary.timed_out, pct(summary.timed_out)),
        ),
    ];

    print_kv_table(&mut out, "Batch Summary", &rows);
}

fn print_kv_table(out: &mut impl Write, title: &str, rows: &[(&str, String)]) {
    let key_w = 16usize;
    let sep_overhead = 6;
    let val_w = SAFE_TABLE_WIDTH.saturating_sub(key_w + sep_overhead);
    let k_line = "─".repeat(key_w + 2);
    let v_line = "─".repeat(val_w + 2);

    let _ = writeln!(out);
    let _ = writeln!(out, "{INDENT}┌─ {} ─┐", truncate(title, SAFE_TABLE_WIDTH - 6));
    let _ = writeln!(out, "{INDENT}┌{k_line}┬{v_line}┐");
    for (key, val) in rows {
        let _ = writeln!(
            out,
            "{INDENT}│ {:<key_w$} │ {:>val_w$} │",
            truncate(key, key_w),
            truncate(val, val_w),
        );
    }
    let _ = writeln!(out, "{INDENT}└{k_line}┴{v_line}┘");
    let _ = writeln!(out);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_lists_every_descriptor() {
        let record = DescriptorRecord {
            source: "CCCCN".to_string(),
            formula: "C4H11N".to_string(),
            molecular_weight: 73.139,
            rotatable_bonds: 2,
            globularity: 0.25,
            pbf: 0.5,
            primary_amine: 1,
        };
        let mut buf = Vec::new();
        write_report(&mut buf, &record).unwrap();
        let text = String::from_utf8(buf).unwrap();

        assert_eq!(
            text,
            "Properties for CCCCN\n\
             --------------------------\n\
             Mol. Wt.:\t73.139000\n\
             Formula:\tC4H11N\n\
             RB:\t\t2\n\
             Glob:\t\t0.250000\n\
             PBF:\t\t0.500000\n\
             Amine:\t\t1\n"
        );
    }

    #[test]
    fn degenerate_globularity_keeps_its_sentinel() {
        let record = DescriptorRecord {
            source: "[He]".to_string(),
            formula: "He".to_string(),
            molecular_weight: 4.0026,
            rotatable_bonds: 0,
            globularity: -1.0,
            pbf: 0.0,
            primary_amine: 0,
        };
        let mut buf = Vec::new();
        write_report(&mut buf, &record).unwrap();
        assert!(String::from_utf8(buf).unwrap().contains("Glob:\t\t-1.000000\n"));
    }

    #[test]
    fn kv_rows_fit_the_box() {
        let mut buf = Vec::new();
        print_kv_table(&mut buf, "Settings", &[("Workers", "8".to_string())]);
        let text = String::from_utf8(buf).unwrap();
        let width_of = |marker: char| {
            text.lines()
                .find(|l| l.contains(marker))
                .map(|l| l.chars().count())
        };
        assert_eq!(width_of('│'), width_of('└'));
    }
}
