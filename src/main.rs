//! Command-line access to accumulated results files

use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use breeding_results::dataset::{
    kinship_file_names, phenotype_file_name, KinshipStack, PhenotypeLoader, TrainValSplit,
};
use breeding_results::experiment::ResultsParser;

/// Inspect genomic-prediction results files
#[derive(Parser, Debug)]
#[command(name = "breeding-results")]
#[command(version)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Expand the config column of a results file and print it as CSV
    Parse {
        /// Results file written by the result store
        file: PathBuf,

        /// Print the mean of --value per distinct value of this column instead
        #[arg(long)]
        group_by: Option<String>,

        /// Column averaged by --group-by
        #[arg(long, default_value = "val_pearson")]
        value: String,

        /// Name of the serialized config column
        #[arg(long, default_value = "config")]
        config_column: String,
    },

    /// List the input file names of a dataset
    Files {
        /// Phenotype file stem
        #[arg(long, default_value = "phenotypes")]
        phenotype_stem: String,

        /// Use the unsorted phenotype file
        #[arg(long)]
        unsorted: bool,
    },

    /// Load a trait's phenotypes and show its train/validation split
    Split {
        /// Folder holding the phenotype file
        data_dir: PathBuf,

        /// Trait column to select
        #[arg(long = "trait")]
        trait_name: String,

        /// Folder of kinship matrices to check the sample order against
        #[arg(long)]
        kinship_dir: Option<PathBuf>,

        /// Fraction of samples held out for validation
        #[arg(long, default_value_t = 0.2)]
        validation_split: f64,

        /// Random seed of the split
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Phenotype file stem
        #[arg(long, default_value = "phenotypes")]
        phenotype_stem: String,
    },
}

fn setup_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run_parse(file: &Path, group_by: Option<&str>, value: &str, config_column: &str) -> Result<()> {
    let table = ResultsParser::new()
        .with_config_column(config_column)
        .parse(file)
        .with_context(|| format!("Failed to parse results file {}", file.display()))?;
    info!(rows = table.num_rows(), columns = table.num_columns(), "parsed results");

    match group_by {
        Some(by) => {
            for (group, mean) in table.group_mean(by, value)? {
                println!("{by}={group}\t{value}={mean}");
            }
        }
        None => table.write_csv(io::stdout().lock())?,
    }
    Ok(())
}

fn run_files(phenotype_stem: &str, unsorted: bool) {
    for name in kinship_file_names() {
        println!("{name}");
    }
    println!("{}", phenotype_file_name(phenotype_stem, !unsorted));
}

fn run_split(
    data_dir: &Path,
    trait_name: &str,
    kinship_dir: Option<&Path>,
    validation_split: f64,
    seed: u64,
    phenotype_stem: &str,
) -> Result<()> {
    let phenotypes = PhenotypeLoader::new()
        .with_stem(phenotype_stem)
        .load(data_dir, trait_name)
        .with_context(|| format!("Failed to load trait {trait_name}"))?;

    if let Some(dir) = kinship_dir {
        let kinship = KinshipStack::load_dir(dir)
            .with_context(|| format!("Failed to stack kinship matrices in {}", dir.display()))?;
        phenotypes.check_alignment(&kinship)?;
    }

    let split = TrainValSplit::new(phenotypes.len(), validation_split, seed)?;
    let (train, validation) = split.apply(phenotypes.samples())?;
    println!(
        "trait={}\tsample_size={}\tobserved={}\ttrain={}\tvalidation={}",
        phenotypes.trait_name(),
        phenotypes.len(),
        phenotypes.observed(),
        train.len(),
        validation.len()
    );
    for sample in validation {
        println!("{sample}");
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    let result = match &cli.command {
        Commands::Parse {
            file,
            group_by,
            value,
            config_column,
        } => run_parse(file, group_by.as_deref(), value, config_column),
        Commands::Files {
            phenotype_stem,
            unsorted,
        } => {
            run_files(phenotype_stem, *unsorted);
            Ok(())
        }
        Commands::Split {
            data_dir,
            trait_name,
            kinship_dir,
            validation_split,
            seed,
            phenotype_stem,
        } => run_split(
            data_dir,
            trait_name,
            kinship_dir.as_deref(),
            *validation_split,
            *seed,
            phenotype_stem,
        ),
    };

    if let Err(e) = result {
        error!("Error: {e:#}");
        std::process::exit(1);
    }
}
