use std::io::{self, Write};

use anyhow::Error;

use shape_forge::ShapeError;
use shape_forge::batch::Error as BatchError;
use shape_forge::io::Error as IoError;
use shape_forge::toolkit::Error as ToolkitError;

use crate::util::text::wrap;

#[rustfmt::skip]
pub fn print_error(err: &Error) {
    let mut stderr = io::stderr().lock();

    let _ = writeln!(stderr);
    let _ = writeln!(stderr, "   ╔══════════════════════════════════════════════════════════════╗");
    let _ = writeln!(stderr, "   ║  ✗ Error                                                     ║");
    let _ = writeln!(stderr, "   ╟──────────────────────────────────────────────────────────────╢");

    for line in wrap(&err.to_string(), 59) {
        let _ = writeln!(stderr, "   ║  {:<59} ║", line);
    }

    for cause in err.chain().skip(1) {
        let _ = writeln!(stderr, "   ╟──────────────────────────────────────────────────────────────╢");
        let _ = writeln!(stderr, "   ║  Caused by:                                                  ║");
        for line in wrap(&cause.to_string(), 57) {
            let _ = writeln!(stderr, "   ║    {:<57} ║", line);
        }
    }

    let hints = collect_hints(err);
    if !hints.is_empty() {
        let _ = writeln!(stderr, "   ╟──────────────────────────────────────────────────────────────╢");
        let _ = writeln!(stderr, "   ║  Hints:                                                      ║");
        for hint in hints {
            let wrapped = wrap(&hint, 55);
            if let Some((first, rest)) = wrapped.split_first() {
                let _ = writeln!(stderr, "   ║    • {:<55} ║", first);
                for line in rest {
                    let _ = writeln!(stderr, "   ║      {:<55} ║", line);
                }
            }
        }
    }

    let _ = writeln!(stderr, "   ╚══════════════════════════════════════════════════════════════╝");
    let _ = writeln!(stderr);
}

fn collect_hints(err: &Error) -> Vec<String> {
    let mut hints = Hints::default();

    for cause in err.chain() {
        if let Some(e) = cause.downcast_ref::<BatchError>() {
            hints.batch(e);
        } else if let Some(e) = cause.downcast_ref::<ShapeError>() {
            hints.shape(e);
        } else if let Some(e) = cause.downcast_ref::<ToolkitError>() {
            hints.toolkit(e);
        } else if let Some(e) = cause.downcast_ref::<IoError>() {
            hints.table(e);
        } else if let Some(e) = cause.downcast_ref::<io::Error>() {
            hints.std_io(e);
        }

        if !hints.0.is_empty() {
            break;
        }
    }

    hints.0
}

#[derive(Default)]
struct Hints(Vec<String>);

impl Hints {
    fn add(&mut self, hint: impl Into<String>) {
        self.0.push(hint.into());
    }

    fn batch(&mut self, err: &BatchError) {
        match err {
            BatchError::Table(e) => self.table(e),
            BatchError::Config(e) => self.shape(e),
            BatchError::Spawn(_) => {
                self.add("The system refused to start more threads");
                self.add("Lower the worker count with -j/--jobs");
            }
        }
    }

    fn shape(&mut self, err: &ShapeError) {
        match err {
            ShapeError::ConfigParse(_) => {
                self.add("The --config file is not valid TOML");
                self.add("Expected tables: [conformers], [topology], [batch]");
            }
            ShapeError::InvalidConfig { key, .. } => {
                self.add(format!("Check the value of '{key}' in --config or on the command line"));
            }
            ShapeError::Toolkit(e) => self.toolkit(e),
            ShapeError::EmptySystem | ShapeError::InvalidBond { .. } => {
                self.add("The toolkit returned a structure that could not be interpreted");
                self.add("Check the SMILES string and the Open Babel version");
            }
            ShapeError::EmptyEnsemble(_) => {
                self.add("The conformer search returned no conformers");
                self.add("Try a larger --energy-window or a smaller --rmsd-cutoff");
            }
            ShapeError::ConformerMismatch { .. } => {
                self.add("Conformers do not match the embedded structure");
                self.add("Make sure the toolkit keeps explicit hydrogens");
            }
            ShapeError::Cancelled => {}
        }
    }

    fn toolkit(&mut self, err: &ToolkitError) {
        match err {
            ToolkitError::Launch { program, source } => {
                if source.kind() == io::ErrorKind::NotFound {
                    self.add(format!("'{program}' was not found on PATH"));
                    self.add("Install Open Babel or point --obabel at its executable");
                } else {
                    self.add(format!("'{program}' could not be started"));
                    self.std_io(source);
                }
            }
            ToolkitError::Io { .. } => {
                self.add("The toolkit process closed its pipes unexpectedly");
            }
            ToolkitError::Failed { .. } => {
                self.add("Run the toolkit by hand to see its full output");
            }
            ToolkitError::Embed { .. } => {
                self.add("Check the SMILES string for typos and unbalanced brackets");
                self.add("Quote the SMILES in the shell, e.g. 'C[C@H](N)C(=O)O'");
            }
            ToolkitError::Conformers(_) => {
                self.add("The conformer search failed for this molecule");
                self.add("Try --max-conformers with a smaller value");
            }
            ToolkitError::Output(e) => self.table(e),
            ToolkitError::Cancelled => {}
        }
    }

    fn table(&mut self, err: &IoError) {
        match err {
            IoError::Io { source } => self.std_io(source),
            IoError::Parse { format, line, .. } => {
                self.add(format!("Malformed {format} data near line {line}"));
            }
            IoError::Table(_) => {
                self.add("The input is not a well-formed CSV table");
                self.add("Fields containing commas must be quoted");
            }
            IoError::MissingColumn { .. } => {
                self.add("Select the SMILES column with -c/--column");
            }
            IoError::NoRecords(_) => {
                self.add("The toolkit produced no structure for this input");
            }
        }
    }

    fn std_io(&mut self, source: &io::Error) {
        use io::ErrorKind;

        match source.kind() {
            ErrorKind::NotFound => {
                self.add("File or directory not found");
                self.add("Check the path spelling and ensure the file exists");
            }
            ErrorKind::PermissionDenied => {
                self.add("Permission denied accessing the file");
                self.add("Check file permissions with `ls -la`");
            }
            ErrorKind::BrokenPipe => {
                self.add("Output consumer terminated early");
                self.add("This may occur when piping to commands like `head`");
            }
            ErrorKind::WriteZero => {
                self.add("Failed to write data (disk full?)");
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn missing_column_suggests_flag() {
        let err: Error = Err::<(), _>(BatchError::Table(IoError::missing_column(
            "canonical_smiles",
            &["smiles".to_string()],
        )))
        .context("Batch run failed")
        .unwrap_err();

        let hints = collect_hints(&err);
        assert!(hints.iter().any(|h| h.contains("--column")));
    }

    #[test]
    fn missing_toolkit_suggests_install() {
        let launch = ToolkitError::Launch {
            program: "obabel".to_string(),
            source: io::Error::from(io::ErrorKind::NotFound),
        };
        let err = Error::from(ShapeError::from(launch));

        let hints = collect_hints(&err);
        assert!(hints.iter().any(|h| h.contains("--obabel")));
    }

    #[test]
    fn plain_errors_have_no_hints() {
        let err = anyhow::anyhow!("something odd");
        assert!(collect_hints(&err).is_empty());
    }
}
