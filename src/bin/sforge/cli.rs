use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "sforge",
    about = "Conformer-averaged shape descriptors for small molecules",
    version,
    author,
    before_help = crate::display::banner_for_help(),
    propagate_version = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Compute descriptors for a single SMILES string
    #[command(visible_alias = "s")]
    Single(SingleArgs),

    /// Compute descriptors for every row of a CSV table
    #[command(visible_alias = "b")]
    Batch(BatchArgs),
}

impl Command {
    pub fn common(&self) -> &CommonOptions {
        match self {
            Command::Single(args) => &args.common,
            Command::Batch(args) => &args.common,
        }
    }
}

/// Options shared by all commands.
#[derive(Args)]
pub struct CommonOptions {
    /// Output CSV file
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Suppress banner and progress output (for scripting)
    #[arg(short, long)]
    pub quiet: bool,

    /// TOML configuration file ([conformers], [topology] and [batch] tables)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Open Babel executable
    #[arg(long, value_name = "PATH", default_value = "obabel")]
    pub obabel: PathBuf,
}

/// Conformer search and topology overrides.
///
/// Unset flags keep the value from `--config`, or the built-in default.
#[derive(Args)]
#[command(next_help_heading = "Conformer Search")]
pub struct ConformerOptions {
    /// RMSD cutoff below which two conformers are duplicates (Å) [default: 0.5]
    #[arg(long = "rmsd-cutoff", value_name = "Å")]
    pub rmsd_cutoff: Option<f64>,

    /// Maximum number of conformers to generate [default: 100000]
    #[arg(long = "max-conformers", value_name = "N")]
    pub max_conformers: Option<u32>,

    /// Energy window above the lowest conformer (kcal/mol) [default: 50]
    #[arg(long = "energy-window", value_name = "E")]
    pub energy_window: Option<f64>,

    /// Count amide C–N bonds as rotatable
    #[arg(long = "include-amides")]
    pub include_amides: bool,
}

#[derive(Args)]
pub struct SingleArgs {
    /// SMILES string of the molecule
    #[arg(value_name = "SMILES")]
    pub smiles: String,

    #[command(flatten)]
    pub common: CommonOptions,

    #[command(flatten)]
    pub conformers: ConformerOptions,
}

/// Batch scheduling options.
#[derive(Args)]
#[command(next_help_heading = "Batch Processing")]
pub struct BatchOptions {
    /// Column holding the SMILES strings [default: canonical_smiles]
    #[arg(short = 'c', long, value_name = "NAME")]
    pub column: Option<String>,

    /// Per-molecule timeout in seconds [default: 10]
    #[arg(short, long, value_name = "SECS")]
    pub timeout: Option<f64>,

    /// Number of worker threads [default: available cores]
    #[arg(short = 'j', long, value_name = "N")]
    pub jobs: Option<usize>,
}

#[derive(Args)]
pub struct BatchArgs {
    /// Input CSV table (stdin if omitted)
    #[arg(value_name = "FILE")]
    pub input: Option<PathBuf>,

    #[command(flatten)]
    pub common: CommonOptions,

    #[command(flatten)]
    pub batch: BatchOptions,

    #[command(flatten)]
    pub conformers: ConformerOptions,
}

pub fn parse() -> Cli {
    Cli::parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn batch_flags_parse() {
        let cli = Cli::try_parse_from([
            "sforge", "batch", "mols.csv", "-c", "smiles", "-t", "2.5", "-j", "4", "-q",
        ])
        .unwrap();
        let Command::Batch(args) = cli.command else {
            panic!("expected batch command");
        };
        assert_eq!(args.input.as_deref(), Some(std::path::Path::new("mols.csv")));
        assert_eq!(args.batch.column.as_deref(), Some("smiles"));
        assert_eq!(args.batch.timeout, Some(2.5));
        assert_eq!(args.batch.jobs, Some(4));
        assert!(args.common.quiet);
        assert!(args.conformers.max_conformers.is_none());
    }

    #[test]
    fn single_alias_and_overrides() {
        let cli = Cli::try_parse_from([
            "sforge",
            "s",
            "CCN",
            "--max-conformers",
            "50",
            "--include-amides",
        ])
        .unwrap();
        let Command::Single(args) = cli.command else {
            panic!("expected single command");
        };
        assert_eq!(args.smiles, "CCN");
        assert_eq!(args.conformers.max_conformers, Some(50));
        assert!(args.conformers.include_amides);
        assert_eq!(args.common.obabel, PathBuf::from("obabel"));
    }
}
