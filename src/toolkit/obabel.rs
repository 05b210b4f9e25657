use std::io::{Cursor, Read, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use log::debug;

use super::{Ensemble, Error, Toolkit};
use crate::cancel::CancelToken;
use crate::io::sdf;
use crate::model::system::System;
use crate::shape::config::ConformerSearch;

const DEFAULT_PROGRAM: &str = "obabel";
const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// [`Toolkit`] backed by the Open Babel command-line tool.
///
/// Every call spawns one `obabel` process and exchanges structures with it as
/// SDF over pipes. The process is polled rather than waited on, so a
/// cancelled call kills its child within one poll interval.
#[derive(Debug, Clone)]
pub struct OpenBabel {
    program: PathBuf,
    poll_interval: Duration,
}

impl Default for OpenBabel {
    fn default() -> Self {
        Self::new(DEFAULT_PROGRAM)
    }
}

#[derive(Debug)]
struct Output {
    stdout: Vec<u8>,
    stderr: String,
}

impl OpenBabel {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            poll_interval: POLL_INTERVAL,
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    fn embed_args(smiles: &str) -> Vec<String> {
        vec![
            format!("-:{smiles}"),
            "-osdf".into(),
            "--gen3d".into(),
            "-h".into(),
        ]
    }

    fn confab_args(search: &ConformerSearch) -> Vec<String> {
        vec![
            "-isdf".into(),
            "-osdf".into(),
            "--confab".into(),
            "--rcutoff".into(),
            search.rmsd_cutoff.to_string(),
            "--conf".into(),
            search.max_conformers.to_string(),
            "--ecutoff".into(),
            search.energy_window.to_string(),
            "--original".into(),
        ]
    }

    fn run(&self, args: &[String], input: Option<Vec<u8>>, cancel: &CancelToken) -> Result<Output, Error> {
        let program = self.program.display().to_string();
        if cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }

        let mut child = Command::new(&self.program)
            .args(args)
            .stdin(if input.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| Error::Launch {
                program: program.clone(),
                source,
            })?;

        let stdin_thread = child
            .stdin
            .take()
            .zip(input)
            .map(|(mut pipe, data)| thread::spawn(move || pipe.write_all(&data)));
        let stdout_thread = child.stdout.take().map(spawn_reader);
        let stderr_thread = child.stderr.take().map(spawn_reader);

        let status = loop {
            if cancel.is_cancelled() {
                reap(&mut child);
                debug!("Killed '{}' after cancellation", program);
                return Err(Error::Cancelled);
            }
            match child.try_wait() {
                Ok(Some(status)) => break status,
                Ok(None) => thread::sleep(self.poll_interval),
                Err(source) => {
                    reap(&mut child);
                    return Err(Error::Io { program, source });
                }
            }
        };

        if let Some(handle) = stdin_thread {
            match handle.join() {
                Ok(Err(e)) if e.kind() != std::io::ErrorKind::BrokenPipe => {
                    return Err(Error::Io { program, source: e });
                }
                _ => {}
            }
        }

        let stdout = join_reader(stdout_thread, &program)?;
        let stderr = String::from_utf8_lossy(&join_reader(stderr_thread, &program)?).into_owned();

        if !status.success() {
            return Err(Error::Failed {
                program,
                status: describe_status(status),
                stderr: summarize_stderr(&stderr),
            });
        }

        Ok(Output { stdout, stderr })
    }
}

impl Toolkit for OpenBabel {
    fn name(&self) -> &str {
        "Open Babel"
    }

    fn embed(&self, smiles: &str, cancel: &CancelToken) -> Result<System, Error> {
        if smiles.trim().is_empty() {
            return Err(Error::embed(smiles, "empty SMILES string"));
        }

        let out = self.run(&Self::embed_args(smiles.trim()), None, cancel)?;
        let structure = sdf::read_all(Cursor::new(&out.stdout))?
            .into_iter()
            .next()
            .ok_or_else(|| Error::embed(smiles, summarize_stderr(&out.stderr)))?;

        if structure.atoms.is_empty() {
            return Err(Error::embed(smiles, "toolkit produced a structure with no atoms"));
        }
        Ok(structure)
    }

    fn generate_ensemble(
        &self,
        structure: &System,
        search: &ConformerSearch,
        cancel: &CancelToken,
    ) -> Result<Ensemble, Error> {
        let mut input = Vec::new();
        sdf::write(&mut input, structure)?;

        let out = self.run(&Self::confab_args(search), Some(input), cancel)?;
        let structures = sdf::read_all(Cursor::new(&out.stdout))?;
        if structures.is_empty() {
            return Err(Error::conformers(summarize_stderr(&out.stderr)));
        }

        debug!("Conformer search returned {} structures", structures.len());
        Ok(Ensemble::from_structures(structure.clone(), &structures))
    }
}

/// Kills `child` and waits for it so no zombie is left behind.
fn reap(child: &mut Child) {
    let _ = child.kill();
    let _ = child.wait();
}

fn spawn_reader<R: Read + Send + 'static>(mut pipe: R) -> JoinHandle<std::io::Result<Vec<u8>>> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        pipe.read_to_end(&mut buf)?;
        Ok(buf)
    })
}

fn join_reader(
    handle: Option<JoinHandle<std::io::Result<Vec<u8>>>>,
    program: &str,
) -> Result<Vec<u8>, Error> {
    let Some(handle) = handle else {
        return Ok(Vec::new());
    };
    handle
        .join()
        .unwrap_or_else(|_| Err(std::io::Error::other("pipe reader thread panicked")))
        .map_err(|source| Error::Io {
            program: program.to_string(),
            source,
        })
}

fn describe_status(status: ExitStatus) -> String {
    match status.code() {
        Some(code) => format!("exit code {code}"),
        None => "a signal".to_string(),
    }
}

/// The most informative stderr line, skipping Open Babel's conversion tally.
fn summarize_stderr(stderr: &str) -> String {
    stderr
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .filter(|l| !(l.ends_with("converted") && l.contains("molecule")))
        .filter(|l| !l.chars().all(|c| c == '='))
        .next_back()
        .map(str::to_string)
        .unwrap_or_else(|| "no structure was produced".to_string())
}
