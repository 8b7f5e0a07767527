//! Phenotype table loading

use std::fs::File;
use std::io::Read;
use std::path::Path;

use tracing::{debug, info};

use super::catalog::phenotype_file_name;
use super::KinshipStack;
use crate::experiment::RunMetadata;
use crate::{Error, Result};

/// Reads a trait column from `<dir>/<stem>[_sorted].csv`.
///
/// The table's first column holds sample identifiers, every other column is
/// one trait. An empty cell is a missing phenotype and loads as NaN.
#[derive(Debug, Clone)]
pub struct PhenotypeLoader {
    stem: String,
    sorted: bool,
    delimiter: u8,
}

impl Default for PhenotypeLoader {
    fn default() -> Self {
        Self {
            stem: "phenotypes".to_string(),
            sorted: true,
            delimiter: b',',
        }
    }
}

impl PhenotypeLoader {
    /// Loader for the sorted `phenotypes` file.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a different file stem.
    #[must_use]
    pub fn with_stem(mut self, stem: impl Into<String>) -> Self {
        self.stem = stem.into();
        self
    }

    /// Read the unsorted file, whose samples do not follow kinship order.
    #[must_use]
    pub const fn unsorted(mut self) -> Self {
        self.sorted = false;
        self
    }

    /// Use a different field delimiter.
    #[must_use]
    pub const fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// File name this loader reads.
    #[must_use]
    pub fn file_name(&self) -> String {
        phenotype_file_name(&self.stem, self.sorted)
    }

    /// Load `trait_name` from the phenotype file in `dir`.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read, has no such trait column,
    /// or holds a non-numeric phenotype
    pub fn load(&self, dir: impl AsRef<Path>, trait_name: &str) -> Result<TraitPhenotypes> {
        let path = dir.as_ref().join(self.file_name());
        info!("select trait {trait_name} from phenotype file {}", path.display());
        self.load_reader(File::open(&path)?, trait_name)
            .map_err(|e| match e {
                Error::InvalidData { message, .. } => Error::InvalidData {
                    file: path.display().to_string(),
                    message,
                },
                other => other,
            })
    }

    /// Load `trait_name` from any reader.
    ///
    /// # Errors
    ///
    /// Returns error if the input is not valid CSV, has no such trait
    /// column, or holds a non-numeric phenotype
    pub fn load_reader<R: Read>(&self, reader: R, trait_name: &str) -> Result<TraitPhenotypes> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(true)
            .from_reader(reader);

        let column = reader
            .headers()?
            .iter()
            .skip(1)
            .position(|h| h == trait_name)
            .map(|pos| pos + 1)
            .ok_or_else(|| Error::InvalidData {
                file: self.file_name(),
                message: format!("no trait column '{trait_name}'"),
            })?;

        let mut samples = Vec::new();
        let mut values = Vec::new();
        for (row, record) in reader.records().enumerate() {
            let record = record?;
            let sample = record.get(0).unwrap_or_default();
            let cell = record.get(column).unwrap_or_default().trim();
            let value = if cell.is_empty() || cell.eq_ignore_ascii_case("nan") {
                f64::NAN
            } else {
                cell.parse().map_err(|_| Error::InvalidData {
                    file: self.file_name(),
                    message: format!("row {row}, sample '{sample}': '{cell}' is not a number"),
                })?
            };
            samples.push(sample.to_string());
            values.push(value);
        }
        debug!(samples = samples.len(), "loaded phenotypes");

        Ok(TraitPhenotypes {
            trait_name: trait_name.to_string(),
            samples,
            values,
        })
    }
}

/// One trait's phenotypes in file order.
#[derive(Debug, Clone, PartialEq)]
pub struct TraitPhenotypes {
    trait_name: String,
    samples: Vec<String>,
    values: Vec<f64>,
}

impl TraitPhenotypes {
    /// Trait name.
    #[must_use]
    pub fn trait_name(&self) -> &str {
        &self.trait_name
    }

    /// Sample identifiers.
    #[must_use]
    pub fn samples(&self) -> &[String] {
        &self.samples
    }

    /// Phenotype values, NaN where missing.
    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Iterate over `(sample, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.samples
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().copied())
    }

    /// Number of samples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Check if the trait has no samples.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Number of samples with an observed phenotype.
    #[must_use]
    pub fn observed(&self) -> usize {
        self.values.iter().filter(|v| !v.is_nan()).count()
    }

    /// Check that the samples follow the kinship matrices' sample order.
    ///
    /// # Errors
    ///
    /// Returns error at the first sample that differs, or if the counts differ
    pub fn check_alignment(&self, kinship: &KinshipStack) -> Result<()> {
        let mismatch = |message: String| Error::InvalidData {
            file: format!("phenotypes of '{}'", self.trait_name),
            message,
        };
        if self.samples.len() != kinship.samples().len() {
            return Err(mismatch(format!(
                "{} samples, kinship matrices have {}",
                self.samples.len(),
                kinship.samples().len()
            )));
        }
        if let Some((i, (p, k))) = self
            .samples
            .iter()
            .zip(kinship.samples())
            .enumerate()
            .find(|(_, (p, k))| p != k)
        {
            return Err(mismatch(format!(
                "sample {i} is '{p}', kinship matrices have '{k}'; use the sorted phenotype file"
            )));
        }
        Ok(())
    }

    /// Run metadata for this trait, `sample_size` being the sample count.
    #[must_use]
    pub fn run_metadata(&self) -> RunMetadata {
        RunMetadata::new(self.trait_name.as_str(), self.len())
    }
}
